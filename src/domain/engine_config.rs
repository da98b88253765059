//! Engine configuration.
//!
//! Parsed once from a [`ConfigPort`] and passed explicitly to setup and the
//! currency-feed resolver. Layout:
//!
//! ```ini
//! [engine]
//! algorithm = Daily Arbitrage
//! account_currency = USD
//! cash = 100000
//! subscriptions = SPY, EURUSD
//!
//! [subscription.spy]
//! security_type = equity
//! resolution = minute
//! market = usa
//!
//! [cash]
//! eur = 1000 @ 1.10
//! ```

use chrono_tz::Tz;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;

use super::cash::validate_currency_code;
use super::error::TradefeedError;
use super::normalization::DataNormalizationMode;
use super::resolution::Resolution;
use super::subscription::{validate_market, DataKind, SecurityType};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_ACCOUNT_CURRENCY: &str = "USD";
pub const DEFAULT_INITIAL_CASH: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionSpec {
    pub symbol: String,
    pub security_type: SecurityType,
    pub resolution: Resolution,
    pub market: String,
    /// Falls back to the exchange's time zone when unset.
    pub time_zone: Option<Tz>,
    pub data_kind: DataKind,
    pub normalization_mode: DataNormalizationMode,
    pub scale_factor: Decimal,
    pub fill_forward: bool,
    pub extended_hours: bool,
    pub leverage: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CashSpec {
    pub symbol: String,
    pub quantity: Decimal,
    pub conversion_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub algorithm: String,
    pub account_currency: String,
    pub initial_cash: Decimal,
    pub live_mode: bool,
    pub data_folder: PathBuf,
    pub subscriptions: Vec<SubscriptionSpec>,
    pub cash: Vec<CashSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            algorithm: "Unnamed".to_string(),
            account_currency: DEFAULT_ACCOUNT_CURRENCY.to_string(),
            initial_cash: DEFAULT_INITIAL_CASH,
            live_mode: false,
            data_folder: PathBuf::from("data"),
            subscriptions: Vec::new(),
            cash: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TradefeedError> {
        let defaults = EngineConfig::default();

        let account_currency = match config.get_string("engine", "account_currency") {
            Some(code) => validate_currency_code(code.trim()).map_err(|_| {
                invalid("engine", "account_currency", "must be a 3-letter currency code")
            })?,
            None => defaults.account_currency,
        };

        let initial_cash = match config.get_string("engine", "cash") {
            Some(s) => parse_decimal(&s, "engine", "cash")?,
            None => defaults.initial_cash,
        };

        let symbols = match config.get_string("engine", "subscriptions") {
            Some(list) if !list.trim().is_empty() => parse_symbol_list(&list)?,
            _ => Vec::new(),
        };
        let subscriptions = symbols
            .iter()
            .map(|symbol| parse_subscription(config, symbol))
            .collect::<Result<Vec<_>, _>>()?;

        let cash = config
            .keys("cash")
            .iter()
            .map(|key| parse_cash(config, key))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EngineConfig {
            algorithm: config
                .get_string("engine", "algorithm")
                .unwrap_or(defaults.algorithm),
            account_currency,
            initial_cash,
            live_mode: config.get_bool("engine", "live_mode", defaults.live_mode),
            data_folder: config
                .get_string("engine", "data_folder")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_folder),
            subscriptions,
            cash,
        })
    }

    /// Section holding the settings of one subscription.
    pub fn subscription_section(symbol: &str) -> String {
        format!("subscription.{}", symbol.to_lowercase())
    }
}

/// Parse every section eagerly, discarding the result.
pub fn validate_engine_config(config: &dyn ConfigPort) -> Result<(), TradefeedError> {
    EngineConfig::from_config(config).map(|_| ())
}

fn invalid(section: &str, key: &str, reason: &str) -> TradefeedError {
    TradefeedError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_decimal(value: &str, section: &str, key: &str) -> Result<Decimal, TradefeedError> {
    Decimal::from_str(value.trim()).map_err(|_| invalid(section, key, "expected a decimal number"))
}

/// Comma-separated symbols, uppercased, in the order given.
pub fn parse_symbol_list(input: &str) -> Result<Vec<String>, TradefeedError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(invalid("engine", "subscriptions", "empty token in symbol list"));
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(invalid(
                "engine",
                "subscriptions",
                &format!("duplicate symbol {symbol}"),
            ));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

fn parse_subscription(
    config: &dyn ConfigPort,
    symbol: &str,
) -> Result<SubscriptionSpec, TradefeedError> {
    let section = EngineConfig::subscription_section(symbol);
    let required = |key: &str| {
        config
            .get_string(&section, key)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| TradefeedError::ConfigMissing {
                section: section.clone(),
                key: key.to_string(),
            })
    };

    let security_type = SecurityType::from_str(&required("security_type")?)
        .map_err(|e| invalid(&section, "security_type", &e.to_string()))?;
    let resolution = Resolution::from_str(&required("resolution")?)
        .map_err(|e| invalid(&section, "resolution", &e.to_string()))?;

    let market = required("market")?.trim().to_string();
    validate_market(&market).map_err(|e| invalid(&section, "market", &e.to_string()))?;

    let time_zone = match config.get_string(&section, "time_zone") {
        Some(name) => Some(
            name.trim()
                .parse::<Tz>()
                .map_err(|_| invalid(&section, "time_zone", "unknown time zone"))?,
        ),
        None => None,
    };

    let data_kind = match config.get_string(&section, "data_kind") {
        Some(kind) => DataKind::from_str(&kind)
            .map_err(|e| invalid(&section, "data_kind", &e.to_string()))?,
        None if resolution == Resolution::Tick => DataKind::Tick,
        None => DataKind::TradeBar,
    };

    let normalization_mode = match config.get_string(&section, "normalization") {
        Some(mode) => DataNormalizationMode::from_str(&mode)
            .map_err(|e| invalid(&section, "normalization", &e.to_string()))?,
        None => DataNormalizationMode::default(),
    };

    let scale_factor = match config.get_string(&section, "scale_factor") {
        Some(s) => parse_decimal(&s, &section, "scale_factor")?,
        None => Decimal::ONE,
    };
    if scale_factor.is_sign_negative() {
        return Err(invalid(&section, "scale_factor", "must be non-negative"));
    }

    let leverage = match config.get_string(&section, "leverage") {
        Some(s) => parse_decimal(&s, &section, "leverage")?,
        None => Decimal::ONE,
    };
    if leverage <= Decimal::ZERO {
        return Err(invalid(&section, "leverage", "must be positive"));
    }

    Ok(SubscriptionSpec {
        symbol: symbol.to_uppercase(),
        security_type,
        resolution,
        market,
        time_zone,
        data_kind,
        normalization_mode,
        scale_factor,
        fill_forward: config.get_bool(&section, "fill_forward", true),
        extended_hours: config.get_bool(&section, "extended_hours", false),
        leverage,
    })
}

/// `<ccy> = quantity` or `<ccy> = quantity @ rate`.
fn parse_cash(config: &dyn ConfigPort, key: &str) -> Result<CashSpec, TradefeedError> {
    let symbol = validate_currency_code(key.trim())
        .map_err(|_| invalid("cash", key, "cash keys must be 3-letter currency codes"))?;
    let value = config.get_string("cash", key).unwrap_or_default();

    let (quantity, rate) = match value.split_once('@') {
        Some((q, r)) => (q, Some(r)),
        None => (value.as_str(), None),
    };
    let quantity = parse_decimal(quantity, "cash", key)?;
    let conversion_rate = match rate {
        Some(r) => parse_decimal(r, "cash", key)?,
        None => Decimal::ZERO,
    };
    if conversion_rate.is_sign_negative() {
        return Err(invalid("cash", key, "conversion rate must be non-negative"));
    }

    Ok(CashSpec {
        symbol,
        quantity,
        conversion_rate,
    })
}
