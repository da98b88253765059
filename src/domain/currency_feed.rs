//! Currency conversion feed resolution.
//!
//! Every non-account currency held needs a live rate. The resolver binds a
//! [`Cash`] entry to an existing forex subscription when one quotes the pair,
//! and otherwise synthesizes an internal subscription for it.
//!
//! Resolution order:
//! 1. The account currency is bound to nothing and has rate 1.
//! 2. An empty registry is an error, there is no market to infer.
//! 3. An existing forex subscription quoting `CCYBASE` is used as is. Failing
//!    that, one quoting `BASECCY` is used inverted. Ties go to the earliest
//!    registered.
//! 4. Otherwise the market comes from the first forex subscription, or the
//!    first subscription of any kind.
//! 5. The new feed runs at the registry's finest resolution, tick-shaped only
//!    when that resolution is tick.
//! 6. The pair must be in the supported universe.
//! 7. The feed is registered as internal and fill-forward, and a forex
//!    security is added for it. A symbol the security registry already
//!    holds is rejected before anything is registered.

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::cash::{Cash, CurrencyFeed};
use super::engine_config::EngineConfig;
use super::error::TradefeedError;
use super::forex::{candidate_symbols, find_pair, CURRENCY_PAIRS};
use super::resolution::Resolution;
use super::security::Security;
use super::subscription::{DataKind, SecurityType, SubscriptionRequest};
use super::subscription_manager::SubscriptionManager;
use crate::ports::exchange_hours_port::ExchangeHoursPort;
use crate::ports::security_port::SecurityPort;

/// How a cash entry obtained its conversion rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedResolution {
    BaseCurrency,
    Existing {
        subscription_index: usize,
        inverted: bool,
    },
    Synthesized {
        subscription_index: usize,
        symbol: String,
        inverted: bool,
    },
}

pub struct CurrencyFeedResolver<'a> {
    account_currency: String,
    exchange_hours: &'a dyn ExchangeHoursPort,
    currency_pairs: &'a [&'a str],
}

impl<'a> CurrencyFeedResolver<'a> {
    pub fn new(config: &EngineConfig, exchange_hours: &'a dyn ExchangeHoursPort) -> Self {
        Self {
            account_currency: config.account_currency.to_uppercase(),
            exchange_hours,
            currency_pairs: CURRENCY_PAIRS,
        }
    }

    /// Replace the supported pair universe.
    pub fn with_currency_pairs(mut self, currency_pairs: &'a [&'a str]) -> Self {
        self.currency_pairs = currency_pairs;
        self
    }

    pub fn account_currency(&self) -> &str {
        &self.account_currency
    }

    /// Create a cash entry for `symbol` and wire it to a conversion feed.
    pub fn resolve(
        &self,
        symbol: &str,
        quantity: Decimal,
        subscriptions: &mut SubscriptionManager,
        securities: &mut dyn SecurityPort,
    ) -> Result<Cash, TradefeedError> {
        let mut cash = Cash::new(symbol, quantity, Decimal::ZERO)?;
        self.ensure(&mut cash, subscriptions, securities)?;
        Ok(cash)
    }

    /// Guarantee `cash` has a feed converting it into the account currency,
    /// adding a subscription at the finest registered resolution if none exists.
    pub fn ensure(
        &self,
        cash: &mut Cash,
        subscriptions: &mut SubscriptionManager,
        securities: &mut dyn SecurityPort,
    ) -> Result<FeedResolution, TradefeedError> {
        let account = self.account_currency.as_str();

        if cash.symbol() == account {
            cash.mark_base_currency();
            return Ok(FeedResolution::BaseCurrency);
        }

        if subscriptions.is_empty() {
            return Err(TradefeedError::NoSubscriptionsPresent {
                currency: cash.symbol().to_string(),
            });
        }

        let (direct, inverted) = candidate_symbols(cash.symbol(), account);

        let forex_feed = |symbol: &str| {
            subscriptions
                .iter()
                .find(|c| c.security_type() == SecurityType::Forex && c.symbol() == symbol)
                .map(|c| (c.subscription_index(), c.symbol().to_string()))
        };
        let existing = forex_feed(&direct)
            .map(|(index, symbol)| (index, symbol, false))
            .or_else(|| forex_feed(&inverted).map(|(index, symbol)| (index, symbol, true)));

        if let Some((subscription_index, symbol, is_inverted)) = existing {
            cash.bind_feed(CurrencyFeed {
                subscription_index,
                symbol,
                inverted: is_inverted,
            });
            return Ok(FeedResolution::Existing {
                subscription_index,
                inverted: is_inverted,
            });
        }

        let market = subscriptions
            .iter()
            .find(|c| c.security_type() == SecurityType::Forex)
            .or_else(|| subscriptions.iter().next())
            .map(|c| c.market().to_string())
            .ok_or_else(|| TradefeedError::NoSubscriptionsPresent {
                currency: cash.symbol().to_string(),
            })?;

        let resolution = subscriptions
            .minimum_resolution()
            .unwrap_or(Resolution::Minute);
        let data_kind = if resolution == Resolution::Tick {
            DataKind::Tick
        } else {
            DataKind::TradeBar
        };
        let is_trade_bar = data_kind == DataKind::TradeBar;

        let (symbol, is_inverted) = find_pair(self.currency_pairs, cash.symbol(), account)
            .ok_or_else(|| TradefeedError::UnsupportedCurrencyPair {
                currency: cash.symbol().to_string(),
                direct,
                inverted,
            })?;

        if securities.contains(symbol) {
            return Err(TradefeedError::DuplicateSecurity {
                symbol: symbol.to_string(),
            });
        }

        let hours = self
            .exchange_hours
            .exchange_hours(&market, symbol, SecurityType::Forex)?;

        let request = SubscriptionRequest::new(
            SecurityType::Forex,
            symbol,
            resolution,
            &market,
            hours.time_zone,
        )
        .with_data_kind(data_kind)
        .with_fill_forward(true)
        .with_extended_hours(false)
        .with_trade_bar(is_trade_bar)
        .with_volume(is_trade_bar)
        .internal(true);

        let subscription_index = subscriptions.add(request)?;
        let config = subscriptions
            .get(subscription_index)
            .ok_or(TradefeedError::DuplicateSubscriptionIndex {
                index: subscription_index,
            })?;

        securities.add(symbol, Security::forex(config, Decimal::ONE))?;
        cash.bind_feed(CurrencyFeed {
            subscription_index,
            symbol: symbol.to_string(),
            inverted: is_inverted,
        });

        info!(
            cash = %cash.symbol(),
            feed = symbol,
            %market,
            %resolution,
            inverted = is_inverted,
            "adding currency feed"
        );
        debug!(subscription_index, "currency feed registered as internal");

        Ok(FeedResolution::Synthesized {
            subscription_index,
            symbol: symbol.to_string(),
            inverted: is_inverted,
        })
    }
}
