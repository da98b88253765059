//! Tradable instruments registered alongside their subscriptions.

use rust_decimal::Decimal;

use super::forex::CurrencyPair;
use super::subscription::{SecurityType, SubscriptionConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct Security {
    pub symbol: String,
    pub security_type: SecurityType,
    pub subscription_index: usize,
    pub leverage: Decimal,
    /// Present for forex instruments.
    pub currency_pair: Option<CurrencyPair>,
}

impl Security {
    pub fn from_config(config: &SubscriptionConfig, leverage: Decimal) -> Self {
        let currency_pair = match config.security_type() {
            SecurityType::Forex => CurrencyPair::parse(config.symbol()),
            _ => None,
        };
        Self {
            symbol: config.symbol().to_string(),
            security_type: config.security_type(),
            subscription_index: config.subscription_index(),
            leverage,
            currency_pair,
        }
    }

    /// A forex pair backed by `config`.
    pub fn forex(config: &SubscriptionConfig, leverage: Decimal) -> Self {
        Self {
            currency_pair: CurrencyPair::parse(config.symbol()),
            security_type: SecurityType::Forex,
            ..Self::from_config(config, leverage)
        }
    }
}
