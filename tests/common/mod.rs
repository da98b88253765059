#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::America::New_York;
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::collections::HashMap;
use tradefeed::domain::data::DataPoint;
use tradefeed::domain::engine_config::SubscriptionSpec;
use tradefeed::domain::error::TradefeedError;
use tradefeed::domain::exchange_hours::ExchangeHours;
use tradefeed::domain::normalization::DataNormalizationMode;
use tradefeed::domain::resolution::Resolution;
use tradefeed::domain::subscription::{
    DataKind, SecurityType, SubscriptionConfig, SubscriptionRequest,
};
use tradefeed::ports::data_port::DataPort;
use tradefeed::ports::exchange_hours_port::ExchangeHoursPort;

/// Points served by symbol; the subscription index of each request is stamped on.
pub struct MockDataPort {
    pub data: HashMap<String, Vec<(NaiveDateTime, Decimal)>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_points(mut self, symbol: &str, points: Vec<(NaiveDateTime, Decimal)>) -> Self {
        self.data.insert(symbol.to_uppercase(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_uppercase(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch(&self, config: &SubscriptionConfig) -> Result<Vec<DataPoint>, TradefeedError> {
        if let Some(reason) = self.errors.get(config.symbol()) {
            return Err(TradefeedError::DataParse {
                source_name: "mock".into(),
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(config.symbol())
            .map(|points| {
                points
                    .iter()
                    .map(|&(time, value)| DataPoint {
                        subscription_index: config.subscription_index(),
                        symbol: config.symbol().to_string(),
                        time,
                        value,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Always-open New York hours for every market, recording each lookup.
pub struct RecordingExchangeHours {
    pub calls: RefCell<Vec<(String, String, SecurityType)>>,
}

impl RecordingExchangeHours {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ExchangeHoursPort for RecordingExchangeHours {
    fn exchange_hours(
        &self,
        market: &str,
        symbol: &str,
        security_type: SecurityType,
    ) -> Result<ExchangeHours, TradefeedError> {
        self.calls
            .borrow_mut()
            .push((market.to_string(), symbol.to_string(), security_type));
        Ok(ExchangeHours::always_open(New_York))
    }
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

pub fn forex_request(symbol: &str, resolution: Resolution, market: &str) -> SubscriptionRequest {
    SubscriptionRequest::new(SecurityType::Forex, symbol, resolution, market, New_York)
}

pub fn equity_request(symbol: &str, resolution: Resolution) -> SubscriptionRequest {
    SubscriptionRequest::new(SecurityType::Equity, symbol, resolution, "usa", New_York)
}

pub fn make_spec(
    symbol: &str,
    security_type: SecurityType,
    resolution: Resolution,
    market: &str,
) -> SubscriptionSpec {
    SubscriptionSpec {
        symbol: symbol.to_string(),
        security_type,
        resolution,
        market: market.to_string(),
        time_zone: None,
        data_kind: if resolution == Resolution::Tick {
            DataKind::Tick
        } else {
            DataKind::TradeBar
        },
        normalization_mode: DataNormalizationMode::Adjusted,
        scale_factor: Decimal::ONE,
        fill_forward: true,
        extended_hours: false,
        leverage: Decimal::ONE,
    }
}
