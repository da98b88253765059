//! Price normalization modes.
//!
//! The scale factor and dividend sum live on the subscription and are kept
//! current by the scale-factor maintenance pass; this module only reads them.

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use super::error::TradefeedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataNormalizationMode {
    Raw,
    #[default]
    Adjusted,
    SplitAdjusted,
    TotalReturn,
}

impl DataNormalizationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DataNormalizationMode::Raw => "raw",
            DataNormalizationMode::Adjusted => "adjusted",
            DataNormalizationMode::SplitAdjusted => "split_adjusted",
            DataNormalizationMode::TotalReturn => "total_return",
        }
    }
}

impl fmt::Display for DataNormalizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataNormalizationMode {
    type Err = TradefeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "raw" => Ok(DataNormalizationMode::Raw),
            "adjusted" => Ok(DataNormalizationMode::Adjusted),
            "split_adjusted" | "splitadjusted" => Ok(DataNormalizationMode::SplitAdjusted),
            "total_return" | "totalreturn" => Ok(DataNormalizationMode::TotalReturn),
            _ => Err(TradefeedError::UnknownNormalizationMode {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<u8> for DataNormalizationMode {
    type Error = TradefeedError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DataNormalizationMode::Raw),
            1 => Ok(DataNormalizationMode::Adjusted),
            2 => Ok(DataNormalizationMode::SplitAdjusted),
            3 => Ok(DataNormalizationMode::TotalReturn),
            _ => Err(TradefeedError::UnknownNormalizationMode {
                value: value.to_string(),
            }),
        }
    }
}

/// Map a raw price to its canonical value under `mode`.
///
/// - raw: `price`
/// - adjusted / split-adjusted: `price * scale_factor`
/// - total-return: `price * scale_factor + dividend_sum`
///
/// A result outside the `Decimal` range saturates at `Decimal::MAX` or
/// `Decimal::MIN` and is logged.
pub fn normalize_price(
    mode: DataNormalizationMode,
    price: Decimal,
    scale_factor: Decimal,
    dividend_sum: Decimal,
) -> Decimal {
    let checked = match mode {
        DataNormalizationMode::Raw => return price,
        DataNormalizationMode::Adjusted | DataNormalizationMode::SplitAdjusted => {
            price.checked_mul(scale_factor)
        }
        DataNormalizationMode::TotalReturn => price
            .checked_mul(scale_factor)
            .and_then(|p| p.checked_add(dividend_sum)),
    };
    checked.unwrap_or_else(|| {
        warn!(%mode, %price, %scale_factor, %dividend_sum, "normalized price overflows, saturating");
        match mode {
            DataNormalizationMode::TotalReturn => price
                .saturating_mul(scale_factor)
                .saturating_add(dividend_sum),
            _ => price.saturating_mul(scale_factor),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_is_adjusted() {
        assert_eq!(DataNormalizationMode::default(), DataNormalizationMode::Adjusted);
    }

    #[test]
    fn adjusted_scales() {
        let p = normalize_price(DataNormalizationMode::Adjusted, dec!(100), dec!(0.5), dec!(3));
        assert_eq!(p, dec!(50));
    }

    #[test]
    fn split_adjusted_ignores_dividends() {
        let p = normalize_price(
            DataNormalizationMode::SplitAdjusted,
            dec!(100),
            dec!(0.25),
            dec!(7),
        );
        assert_eq!(p, dec!(25));
    }

    #[test]
    fn total_return_adds_dividends() {
        let p = normalize_price(
            DataNormalizationMode::TotalReturn,
            dec!(100),
            dec!(0.5),
            dec!(1.25),
        );
        assert_eq!(p, dec!(51.25));
    }

    #[test]
    fn overflow_saturates() {
        let p = normalize_price(DataNormalizationMode::Adjusted, Decimal::MAX, dec!(2), Decimal::ZERO);
        assert_eq!(p, Decimal::MAX);
        let p = normalize_price(DataNormalizationMode::TotalReturn, Decimal::MIN, dec!(1), dec!(-1));
        assert_eq!(p, Decimal::MIN);
        let p = normalize_price(DataNormalizationMode::Raw, Decimal::MAX, dec!(2), dec!(5));
        assert_eq!(p, Decimal::MAX);
    }

    #[test]
    fn parse_modes() {
        assert_eq!(
            "Split-Adjusted".parse::<DataNormalizationMode>().unwrap(),
            DataNormalizationMode::SplitAdjusted
        );
        assert_eq!(
            "totalreturn".parse::<DataNormalizationMode>().unwrap(),
            DataNormalizationMode::TotalReturn
        );
        assert!(matches!(
            "smoothed".parse::<DataNormalizationMode>(),
            Err(TradefeedError::UnknownNormalizationMode { .. })
        ));
    }

    #[test]
    fn from_discriminant_rejects_out_of_range() {
        assert_eq!(
            DataNormalizationMode::try_from(0).unwrap(),
            DataNormalizationMode::Raw
        );
        assert!(matches!(
            DataNormalizationMode::try_from(9),
            Err(TradefeedError::UnknownNormalizationMode { value }) if value == "9"
        ));
    }

    fn decimal() -> impl Strategy<Value = Decimal> {
        (-1_000_000_000i64..1_000_000_000i64, 0u32..6).prop_map(|(m, s)| Decimal::new(m, s))
    }

    proptest! {
        #[test]
        fn raw_is_identity(price in decimal(), scale in decimal(), div in decimal()) {
            prop_assert_eq!(
                normalize_price(DataNormalizationMode::Raw, price, scale, div),
                price
            );
        }

        #[test]
        fn total_return_formula(price in decimal(), scale in decimal(), div in decimal()) {
            prop_assert_eq!(
                normalize_price(DataNormalizationMode::TotalReturn, price, scale, div),
                price * scale + div
            );
        }

        #[test]
        fn total_return_without_dividends_is_adjusted(price in decimal(), scale in decimal()) {
            prop_assert_eq!(
                normalize_price(DataNormalizationMode::TotalReturn, price, scale, Decimal::ZERO),
                normalize_price(DataNormalizationMode::Adjusted, price, scale, Decimal::ZERO)
            );
        }
    }
}
