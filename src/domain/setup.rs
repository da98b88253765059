//! Run bootstrap: subscriptions, securities and the cash book.

use rust_decimal::Decimal;
use tracing::info;

use super::cash_book::CashBook;
use super::currency_feed::{CurrencyFeedResolver, FeedResolution};
use super::engine_config::{EngineConfig, SubscriptionSpec};
use super::error::TradefeedError;
use super::security::Security;
use super::subscription::{DataKind, SubscriptionRequest};
use super::subscription_manager::SubscriptionManager;
use crate::ports::exchange_hours_port::ExchangeHoursPort;
use crate::ports::security_port::SecurityPort;

#[derive(Debug, Clone)]
pub struct Setup {
    pub subscriptions: SubscriptionManager,
    pub cash_book: CashBook,
    /// How each cash entry obtained its rate, in currency-code order.
    pub feeds: Vec<(String, FeedResolution)>,
    /// Replay reports as a live result instead of a backtest result.
    pub live_mode: bool,
}

/// Build everything a run needs. Any error aborts before data is processed.
pub fn initialize(
    config: &EngineConfig,
    exchange_hours: &dyn ExchangeHoursPort,
    securities: &mut dyn SecurityPort,
) -> Result<Setup, TradefeedError> {
    let mut subscriptions = SubscriptionManager::new();
    for spec in &config.subscriptions {
        register(spec, exchange_hours, &mut subscriptions, securities)?;
    }

    let mut cash_book = CashBook::new(&config.account_currency)?;
    cash_book.add(&config.account_currency, config.initial_cash, Decimal::ONE)?;
    for spec in &config.cash {
        cash_book.add(&spec.symbol, spec.quantity, spec.conversion_rate)?;
    }

    let resolver = CurrencyFeedResolver::new(config, exchange_hours);
    let feeds = cash_book.ensure_currency_data_feeds(&resolver, &mut subscriptions, securities)?;

    info!(
        algorithm = %config.algorithm,
        subscriptions = subscriptions.len(),
        currencies = cash_book.len(),
        "setup complete"
    );

    Ok(Setup {
        subscriptions,
        cash_book,
        feeds,
        live_mode: config.live_mode,
    })
}

fn register(
    spec: &SubscriptionSpec,
    exchange_hours: &dyn ExchangeHoursPort,
    subscriptions: &mut SubscriptionManager,
    securities: &mut dyn SecurityPort,
) -> Result<usize, TradefeedError> {
    let time_zone = match spec.time_zone {
        Some(tz) => tz,
        None => {
            exchange_hours
                .exchange_hours(&spec.market, &spec.symbol, spec.security_type)?
                .time_zone
        }
    };

    let is_trade_bar = spec.data_kind == DataKind::TradeBar;
    let request = SubscriptionRequest::new(
        spec.security_type,
        &spec.symbol,
        spec.resolution,
        &spec.market,
        time_zone,
    )
    .with_data_kind(spec.data_kind)
    .with_fill_forward(spec.fill_forward)
    .with_extended_hours(spec.extended_hours)
    .with_trade_bar(is_trade_bar)
    .with_volume(is_trade_bar);

    let index = subscriptions.add(request)?;
    let config = subscriptions
        .config_mut(index)
        .ok_or(TradefeedError::DuplicateSubscriptionIndex { index })?;
    config.set_normalization_mode(spec.normalization_mode);
    config.set_price_scale_factor(spec.scale_factor)?;

    securities.add(&spec.symbol, Security::from_config(config, spec.leverage))?;
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::exchange_hours_adapter::StaticExchangeHours;
    use crate::adapters::in_memory_securities::InMemorySecurities;
    use crate::domain::engine_config::CashSpec;
    use crate::domain::normalization::DataNormalizationMode;
    use crate::domain::resolution::Resolution;
    use crate::domain::subscription::SecurityType;
    use chrono_tz::America::New_York;
    use rust_decimal_macros::dec;

    fn spec(symbol: &str, security_type: SecurityType, market: &str) -> SubscriptionSpec {
        SubscriptionSpec {
            symbol: symbol.to_string(),
            security_type,
            resolution: Resolution::Minute,
            market: market.to_string(),
            time_zone: None,
            data_kind: DataKind::TradeBar,
            normalization_mode: DataNormalizationMode::Adjusted,
            scale_factor: Decimal::ONE,
            fill_forward: true,
            extended_hours: false,
            leverage: Decimal::ONE,
        }
    }

    #[test]
    fn registers_subscriptions_and_synthesizes_feeds() {
        let mut spy = spec("SPY", SecurityType::Equity, "usa");
        spy.normalization_mode = DataNormalizationMode::Raw;
        spy.scale_factor = dec!(0.5);
        let config = EngineConfig {
            initial_cash: dec!(1000),
            subscriptions: vec![spy],
            cash: vec![CashSpec {
                symbol: "EUR".into(),
                quantity: dec!(10),
                conversion_rate: Decimal::ZERO,
            }],
            ..EngineConfig::default()
        };
        let hours = StaticExchangeHours::new();
        let mut securities = InMemorySecurities::new();

        let setup = initialize(&config, &hours, &mut securities).unwrap();

        assert_eq!(setup.subscriptions.len(), 2);
        let spy = setup.subscriptions.get(0).unwrap();
        assert_eq!(spy.time_zone(), New_York);
        assert_eq!(spy.normalization_mode(), DataNormalizationMode::Raw);
        assert_eq!(spy.price_scale_factor(), dec!(0.5));
        assert!(spy.is_trade_bar());

        let eurusd = setup.subscriptions.get(1).unwrap();
        assert_eq!(eurusd.symbol(), "EURUSD");
        assert!(eurusd.is_internal());
        assert_eq!(eurusd.market(), "usa");

        assert_eq!(setup.cash_book.get("USD").unwrap().quantity, dec!(1000));
        assert_eq!(securities.symbols(), vec!["EURUSD", "SPY"]);
        assert_eq!(setup.feeds.len(), 2);
        assert!(!setup.live_mode);
    }

    #[test]
    fn explicit_time_zone_skips_exchange_lookup() {
        let mut custom = spec("WEATHER", SecurityType::Base, "nowhere");
        custom.time_zone = Some(chrono_tz::UTC);
        let config = EngineConfig {
            subscriptions: vec![custom],
            ..EngineConfig::default()
        };
        let hours = StaticExchangeHours::empty();
        let mut securities = InMemorySecurities::new();
        let setup = initialize(&config, &hours, &mut securities).unwrap();
        assert_eq!(setup.subscriptions.get(0).unwrap().time_zone(), chrono_tz::UTC);
    }

    #[test]
    fn unknown_exchange_aborts() {
        let config = EngineConfig {
            subscriptions: vec![spec("VOD", SecurityType::Equity, "lse")],
            ..EngineConfig::default()
        };
        let hours = StaticExchangeHours::new();
        let mut securities = InMemorySecurities::new();
        assert!(matches!(
            initialize(&config, &hours, &mut securities),
            Err(TradefeedError::UnknownExchangeHours { .. })
        ));
    }

    #[test]
    fn foreign_cash_without_subscriptions_fails() {
        let config = EngineConfig {
            cash: vec![CashSpec {
                symbol: "GBP".into(),
                quantity: dec!(5),
                conversion_rate: Decimal::ZERO,
            }],
            ..EngineConfig::default()
        };
        let hours = StaticExchangeHours::new();
        let mut securities = InMemorySecurities::new();
        assert!(matches!(
            initialize(&config, &hours, &mut securities),
            Err(TradefeedError::NoSubscriptionsPresent { currency }) if currency == "GBP"
        ));
    }
}
