//! A holding of one currency and its live conversion rate.

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use tracing::{debug, warn};

use super::data::TimeSlice;
use super::error::TradefeedError;

/// The subscription a cash entry reads its conversion rate from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFeed {
    pub subscription_index: usize,
    pub symbol: String,
    /// The feed quotes account currency per unit of this currency's
    /// counterpart, so the received price must be reciprocated.
    pub inverted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cash {
    symbol: String,
    pub quantity: Decimal,
    conversion_rate: Decimal,
    feed: Option<CurrencyFeed>,
    is_base_currency: bool,
}

/// Uppercased currency code, rejecting anything but three ASCII letters.
pub fn validate_currency_code(code: &str) -> Result<String, TradefeedError> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(TradefeedError::InvalidCurrencyCode {
            code: code.to_string(),
        });
    }
    Ok(code.to_uppercase())
}

impl Cash {
    pub fn new(
        symbol: &str,
        quantity: Decimal,
        conversion_rate: Decimal,
    ) -> Result<Self, TradefeedError> {
        let symbol = validate_currency_code(symbol)?;
        if conversion_rate.is_sign_negative() && !conversion_rate.is_zero() {
            return Err(TradefeedError::InvalidConversionRate {
                symbol,
                rate: conversion_rate.to_string(),
            });
        }
        Ok(Self {
            symbol,
            quantity,
            conversion_rate,
            feed: None,
            is_base_currency: false,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn conversion_rate(&self) -> Decimal {
        self.conversion_rate
    }

    pub fn feed(&self) -> Option<&CurrencyFeed> {
        self.feed.as_ref()
    }

    pub fn is_base_currency(&self) -> bool {
        self.is_base_currency
    }

    /// `quantity * rate`, saturating at the `Decimal` bounds.
    pub fn value_in_account_currency(&self) -> Decimal {
        self.quantity
            .checked_mul(self.conversion_rate)
            .unwrap_or_else(|| {
                warn!(cash = %self.symbol, "account currency value overflows, saturating");
                self.quantity.saturating_mul(self.conversion_rate)
            })
    }

    /// Mark as the account currency: identity rate, no feed.
    pub(crate) fn mark_base_currency(&mut self) {
        self.is_base_currency = true;
        self.conversion_rate = Decimal::ONE;
        self.feed = None;
    }

    pub(crate) fn bind_feed(&mut self, feed: CurrencyFeed) {
        debug!(
            cash = %self.symbol,
            feed = %feed.symbol,
            index = feed.subscription_index,
            inverted = feed.inverted,
            "bound currency feed"
        );
        self.feed = Some(feed);
    }

    /// Refresh the conversion rate from this slice.
    ///
    /// Missing data for the bound feed leaves the previous rate in place.
    pub fn update(&mut self, slice: &TimeSlice) {
        if self.is_base_currency {
            return;
        }
        let Some(feed) = &self.feed else {
            return;
        };
        let Some(price) = slice.last_value(feed.subscription_index) else {
            return;
        };

        if price.is_sign_negative() && !price.is_zero() {
            warn!(cash = %self.symbol, feed = %feed.symbol, %price, "ignoring negative conversion price");
            return;
        }

        let rate = if feed.inverted {
            match Decimal::ONE.checked_div(price) {
                Some(r) => r,
                None => {
                    warn!(cash = %self.symbol, feed = %feed.symbol, "zero price on inverted feed");
                    Decimal::ZERO
                }
            }
        } else {
            price
        };

        if rate.is_zero() {
            warn!(cash = %self.symbol, feed = %feed.symbol, "conversion rate is zero, feed may be stale");
        }
        self.conversion_rate = rate;
    }
}

impl fmt::Display for Cash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rate = if self.conversion_rate < Decimal::ONE_THOUSAND {
            self.conversion_rate
                .round_sf(5)
                .unwrap_or(self.conversion_rate)
        } else {
            self.conversion_rate.round_dp(2)
        };
        let quantity = self
            .quantity
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let value = self
            .value_in_account_currency()
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(
            f,
            "{}: {:>10.2} @ ${:>10} = ${:.2}",
            self.symbol,
            quantity,
            rate.normalize(),
            value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::domain::data::DataPoint;

    fn slice_with(index: usize, values: &[Decimal]) -> TimeSlice {
        let time = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let mut slice = TimeSlice::new(time);
        for &value in values {
            slice.push(DataPoint {
                subscription_index: index,
                symbol: "EURUSD".into(),
                time,
                value,
            });
        }
        slice
    }

    fn bound(inverted: bool) -> Cash {
        let mut cash = Cash::new("eur", dec!(1000), dec!(1.1)).unwrap();
        cash.bind_feed(CurrencyFeed {
            subscription_index: 2,
            symbol: if inverted { "USDEUR" } else { "EURUSD" }.into(),
            inverted,
        });
        cash
    }

    #[test]
    fn construction_uppercases() {
        let cash = Cash::new("eur", dec!(10), dec!(1)).unwrap();
        assert_eq!(cash.symbol(), "EUR");
        assert!(!cash.is_base_currency());
        assert!(cash.feed().is_none());
    }

    #[test]
    fn rejects_codes_not_three_letters() {
        for code in ["US", "USDX", "", "U1D", "€UR"] {
            assert!(
                matches!(
                    Cash::new(code, dec!(1), dec!(1)),
                    Err(TradefeedError::InvalidCurrencyCode { .. })
                ),
                "{code}"
            );
        }
    }

    #[test]
    fn rejects_negative_rate() {
        assert!(matches!(
            Cash::new("EUR", dec!(1), dec!(-1)),
            Err(TradefeedError::InvalidConversionRate { .. })
        ));
    }

    #[test]
    fn value_in_account_currency() {
        let cash = Cash::new("EUR", dec!(-200), dec!(1.25)).unwrap();
        assert_eq!(cash.value_in_account_currency(), dec!(-250));

        let huge = Cash::new("EUR", Decimal::MIN, dec!(3)).unwrap();
        assert_eq!(huge.value_in_account_currency(), Decimal::MIN);
    }

    #[test]
    fn update_direct_takes_last_value() {
        let mut cash = bound(false);
        cash.update(&slice_with(2, &[dec!(1.20), dec!(1.25)]));
        assert_eq!(cash.conversion_rate(), dec!(1.25));
    }

    #[test]
    fn update_inverted_takes_reciprocal() {
        let mut cash = bound(true);
        cash.update(&slice_with(2, &[dec!(1.25)]));
        assert_eq!(cash.conversion_rate(), dec!(0.8));
    }

    #[test]
    fn update_without_data_keeps_rate() {
        let mut cash = bound(false);
        cash.update(&slice_with(7, &[dec!(9)]));
        assert_eq!(cash.conversion_rate(), dec!(1.1));
        cash.update(&slice_with(2, &[]));
        assert_eq!(cash.conversion_rate(), dec!(1.1));
    }

    #[test]
    fn update_is_noop_for_base_currency() {
        let mut cash = Cash::new("USD", dec!(100), dec!(1)).unwrap();
        cash.mark_base_currency();
        cash.update(&slice_with(0, &[dec!(3)]));
        assert_eq!(cash.conversion_rate(), Decimal::ONE);
    }

    #[test]
    fn zero_on_inverted_feed_yields_zero_rate() {
        let mut cash = bound(true);
        cash.update(&slice_with(2, &[Decimal::ZERO]));
        assert_eq!(cash.conversion_rate(), Decimal::ZERO);
    }

    #[test]
    fn negative_price_ignored() {
        let mut cash = bound(false);
        cash.update(&slice_with(2, &[dec!(-1.3)]));
        assert_eq!(cash.conversion_rate(), dec!(1.1));
    }

    #[test]
    fn display_format() {
        let cash = Cash::new("EUR", dec!(1000), dec!(1.123456)).unwrap();
        assert_eq!(cash.to_string(), "EUR:    1000.00 @ $    1.1235 = $1123.46");
    }
}
