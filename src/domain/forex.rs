//! Supported forex pairs and pair-symbol helpers.

use std::fmt;

/// Every pair a conversion feed can be synthesized for, in search order.
pub const CURRENCY_PAIRS: &[&str] = &[
    "EURUSD", "GBPUSD", "USDJPY", "AUDUSD", "USDCAD", "USDCHF", "NZDUSD", "EURGBP", "EURJPY",
    "EURCHF", "EURAUD", "EURCAD", "EURNZD", "EURSEK", "EURNOK", "EURTRY", "EURHKD", "GBPJPY",
    "GBPCHF", "GBPAUD", "GBPCAD", "GBPNZD", "AUDJPY", "AUDCHF", "AUDCAD", "AUDNZD", "NZDJPY",
    "NZDCHF", "NZDCAD", "CADJPY", "CADCHF", "CHFJPY", "USDHKD", "USDSGD", "USDSEK", "USDNOK",
    "USDDKK", "USDMXN", "USDZAR", "USDTRY", "USDPLN", "USDHUF", "USDCZK", "USDCNH", "USDRUB",
    "ZARJPY", "TRYJPY", "XAUUSD", "XAGUSD",
];

/// A six-letter pair symbol split into its base and quote currencies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub base: String,
    pub quote: String,
}

impl CurrencyPair {
    pub fn parse(symbol: &str) -> Option<Self> {
        if symbol.len() != 6 || !symbol.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let upper = symbol.to_uppercase();
        Some(Self {
            base: upper[..3].to_string(),
            quote: upper[3..].to_string(),
        })
    }

    pub fn symbol(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// The two symbols that can convert `currency` into `account_currency`:
/// `(direct, inverted)`, e.g. `("EURUSD", "USDEUR")`.
pub fn candidate_symbols(currency: &str, account_currency: &str) -> (String, String) {
    (
        format!("{currency}{account_currency}"),
        format!("{account_currency}{currency}"),
    )
}

/// First entry of `universe` matching either candidate, with its inversion flag.
pub fn find_pair<'a>(
    universe: &[&'a str],
    currency: &str,
    account_currency: &str,
) -> Option<(&'a str, bool)> {
    let (direct, inverted) = candidate_symbols(currency, account_currency);
    universe.iter().find_map(|&symbol| {
        if symbol == direct {
            Some((symbol, false))
        } else if symbol == inverted {
            Some((symbol, true))
        } else {
            None
        }
    })
}
