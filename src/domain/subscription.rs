//! Subscription descriptors: one declared data feed for one instrument.

use chrono::Duration;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use super::error::TradefeedError;
use super::normalization::{normalize_price, DataNormalizationMode};
use super::resolution::Resolution;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityType {
    Base,
    Equity,
    Option,
    Commodity,
    Forex,
    Future,
    Cfd,
}

impl SecurityType {
    pub fn as_str(self) -> &'static str {
        match self {
            SecurityType::Base => "base",
            SecurityType::Equity => "equity",
            SecurityType::Option => "option",
            SecurityType::Commodity => "commodity",
            SecurityType::Forex => "forex",
            SecurityType::Future => "future",
            SecurityType::Cfd => "cfd",
        }
    }
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityType {
    type Err = TradefeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(SecurityType::Base),
            "equity" => Ok(SecurityType::Equity),
            "option" => Ok(SecurityType::Option),
            "commodity" => Ok(SecurityType::Commodity),
            "forex" | "fx" => Ok(SecurityType::Forex),
            "future" => Ok(SecurityType::Future),
            "cfd" => Ok(SecurityType::Cfd),
            _ => Err(TradefeedError::UnknownSecurityType {
                value: s.to_string(),
            }),
        }
    }
}

/// Shape of the records a feed delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    TradeBar,
    Tick,
    /// User-defined tabular data read through a header-resolved schema.
    Custom,
}

impl FromStr for DataKind {
    type Err = TradefeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "trade_bar" | "tradebar" => Ok(DataKind::TradeBar),
            "tick" => Ok(DataKind::Tick),
            "custom" => Ok(DataKind::Custom),
            _ => Err(TradefeedError::UnknownDataKind {
                value: s.to_string(),
            }),
        }
    }
}

/// Everything needed to describe a feed except its registry index.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionRequest {
    pub data_kind: DataKind,
    pub security_type: SecurityType,
    pub symbol: String,
    pub resolution: Resolution,
    pub market: String,
    pub time_zone: Tz,
    pub fill_forward: bool,
    pub extended_hours: bool,
    pub is_trade_bar: bool,
    pub has_volume: bool,
    pub is_internal: bool,
}

impl SubscriptionRequest {
    /// A trade-bar feed with fill-forward on and every other flag off.
    pub fn new(
        security_type: SecurityType,
        symbol: &str,
        resolution: Resolution,
        market: &str,
        time_zone: Tz,
    ) -> Self {
        Self {
            data_kind: DataKind::TradeBar,
            security_type,
            symbol: symbol.to_string(),
            resolution,
            market: market.to_string(),
            time_zone,
            fill_forward: true,
            extended_hours: false,
            is_trade_bar: true,
            has_volume: true,
            is_internal: false,
        }
    }

    pub fn with_data_kind(mut self, data_kind: DataKind) -> Self {
        self.data_kind = data_kind;
        self
    }

    pub fn with_fill_forward(mut self, fill_forward: bool) -> Self {
        self.fill_forward = fill_forward;
        self
    }

    pub fn with_extended_hours(mut self, extended_hours: bool) -> Self {
        self.extended_hours = extended_hours;
        self
    }

    pub fn with_trade_bar(mut self, is_trade_bar: bool) -> Self {
        self.is_trade_bar = is_trade_bar;
        self
    }

    pub fn with_volume(mut self, has_volume: bool) -> Self {
        self.has_volume = has_volume;
        self
    }

    pub fn internal(mut self, is_internal: bool) -> Self {
        self.is_internal = is_internal;
        self
    }
}

/// Market tags name a data vendor or venue and are letters only.
pub fn validate_market(market: &str) -> Result<(), TradefeedError> {
    if market.trim().is_empty() {
        return Err(TradefeedError::InvalidMarketTag {
            market: market.to_string(),
            reason: "the market cannot be an empty string".into(),
        });
    }
    if !market.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(TradefeedError::InvalidMarketTag {
            market: market.to_string(),
            reason: "the market must only contain letters A-Z".into(),
        });
    }
    Ok(())
}

/// A registered data feed.
///
/// `subscription_index` is assigned by the
/// [`SubscriptionManager`](super::subscription_manager::SubscriptionManager)
/// and equals the config's position in it; tick data is routed by that index.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionConfig {
    data_kind: DataKind,
    security_type: SecurityType,
    symbol: String,
    resolution: Resolution,
    increment: Duration,
    fill_forward: bool,
    extended_hours: bool,
    is_trade_bar: bool,
    has_volume: bool,
    is_internal: bool,
    subscription_index: usize,
    market: String,
    time_zone: Tz,
    mapped_symbol: String,
    price_scale_factor: Decimal,
    sum_of_dividends: Decimal,
    normalization_mode: DataNormalizationMode,
}

impl SubscriptionConfig {
    pub(crate) fn new(
        request: SubscriptionRequest,
        subscription_index: usize,
    ) -> Result<Self, TradefeedError> {
        validate_market(&request.market)?;

        // ticks are individual events, there is nothing to fill forward
        let fill_forward = request.fill_forward && request.resolution != Resolution::Tick;

        Ok(Self {
            data_kind: request.data_kind,
            security_type: request.security_type,
            symbol: request.symbol.to_uppercase(),
            resolution: request.resolution,
            increment: request.resolution.increment(),
            fill_forward,
            extended_hours: request.extended_hours,
            is_trade_bar: request.is_trade_bar,
            has_volume: request.has_volume,
            is_internal: request.is_internal,
            subscription_index,
            market: request.market,
            time_zone: request.time_zone,
            mapped_symbol: request.symbol,
            price_scale_factor: Decimal::ONE,
            sum_of_dividends: Decimal::ZERO,
            normalization_mode: DataNormalizationMode::default(),
        })
    }

    pub fn data_kind(&self) -> DataKind {
        self.data_kind
    }

    pub fn security_type(&self) -> SecurityType {
        self.security_type
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn increment(&self) -> Duration {
        self.increment
    }

    pub fn fill_forward(&self) -> bool {
        self.fill_forward
    }

    pub fn extended_hours(&self) -> bool {
        self.extended_hours
    }

    pub fn is_trade_bar(&self) -> bool {
        self.is_trade_bar
    }

    pub fn has_volume(&self) -> bool {
        self.has_volume
    }

    /// Internal feeds exist only to supply conversion rates and are not
    /// delivered to the algorithm.
    pub fn is_internal(&self) -> bool {
        self.is_internal
    }

    pub fn subscription_index(&self) -> usize {
        self.subscription_index
    }

    pub fn market(&self) -> &str {
        &self.market
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Symbol used to locate source data when a ticker is renamed over time.
    pub fn mapped_symbol(&self) -> &str {
        &self.mapped_symbol
    }

    pub fn price_scale_factor(&self) -> Decimal {
        self.price_scale_factor
    }

    pub fn sum_of_dividends(&self) -> Decimal {
        self.sum_of_dividends
    }

    pub fn normalization_mode(&self) -> DataNormalizationMode {
        self.normalization_mode
    }

    pub fn set_mapped_symbol(&mut self, mapped_symbol: &str) {
        self.mapped_symbol = mapped_symbol.to_string();
    }

    pub fn set_price_scale_factor(&mut self, factor: Decimal) -> Result<(), TradefeedError> {
        if factor.is_sign_negative() {
            return Err(TradefeedError::InvalidScaleFactor {
                value: factor.to_string(),
            });
        }
        self.price_scale_factor = factor;
        Ok(())
    }

    pub fn set_sum_of_dividends(&mut self, sum: Decimal) {
        self.sum_of_dividends = sum;
    }

    pub fn set_normalization_mode(&mut self, mode: DataNormalizationMode) {
        self.normalization_mode = mode;
    }

    /// Normalize `price` with this feed's mode, scale factor and dividend sum.
    #[inline]
    pub fn normalized_price(&self, price: Decimal) -> Decimal {
        normalize_price(
            self.normalization_mode,
            price,
            self.price_scale_factor,
            self.sum_of_dividends,
        )
    }
}
