//! Static exchange-hours table.
//!
//! Entries are keyed by market and security type, optionally narrowed to one
//! symbol. A symbol-specific entry takes precedence over the market default.

use chrono::{NaiveTime, Weekday};
use chrono_tz::America::New_York;
use std::collections::HashMap;

use crate::domain::error::TradefeedError;
use crate::domain::exchange_hours::{ExchangeHours, SessionHours};
use crate::domain::subscription::SecurityType;
use crate::ports::exchange_hours_port::ExchangeHoursPort;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct HoursKey {
    market: String,
    security_type: SecurityType,
    symbol: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StaticExchangeHours {
    entries: HashMap<HoursKey, ExchangeHours>,
}

/// US equities: 09:30 to 16:00 New York time, Monday to Friday.
pub fn us_equity_hours() -> ExchangeHours {
    let open = NaiveTime::from_hms_opt(9, 30, 0).unwrap_or(NaiveTime::MIN);
    let close = NaiveTime::from_hms_opt(16, 0, 0).unwrap_or(NaiveTime::MIN);
    ExchangeHours::weekdays(New_York, open, close)
}

/// Spot forex: Sunday 17:00 to Friday 17:00 New York time.
pub fn forex_hours() -> ExchangeHours {
    let five_pm = NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN);
    ExchangeHours::always_open(New_York)
        .with_session(
            Weekday::Sun,
            SessionHours::Window {
                open: five_pm,
                close: NaiveTime::MIN,
            },
        )
        .with_session(
            Weekday::Fri,
            SessionHours::Window {
                open: NaiveTime::MIN,
                close: five_pm,
            },
        )
        .with_session(Weekday::Sat, SessionHours::Closed)
}

impl StaticExchangeHours {
    /// Table with the built-in markets: `usa`, `fxcm`, `oanda`.
    pub fn new() -> Self {
        Self::empty()
            .with_entry("usa", SecurityType::Equity, None, us_equity_hours())
            .with_entry("usa", SecurityType::Option, None, us_equity_hours())
            .with_entry("usa", SecurityType::Forex, None, forex_hours())
            .with_entry("usa", SecurityType::Base, None, ExchangeHours::always_open(New_York))
            .with_entry("fxcm", SecurityType::Forex, None, forex_hours())
            .with_entry("oanda", SecurityType::Forex, None, forex_hours())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_entry(
        mut self,
        market: &str,
        security_type: SecurityType,
        symbol: Option<&str>,
        hours: ExchangeHours,
    ) -> Self {
        let key = HoursKey {
            market: market.to_lowercase(),
            security_type,
            symbol: symbol.map(str::to_uppercase),
        };
        self.entries.insert(key, hours);
        self
    }
}

impl ExchangeHoursPort for StaticExchangeHours {
    fn exchange_hours(
        &self,
        market: &str,
        symbol: &str,
        security_type: SecurityType,
    ) -> Result<ExchangeHours, TradefeedError> {
        let market_key = market.to_lowercase();
        let specific = HoursKey {
            market: market_key.clone(),
            security_type,
            symbol: Some(symbol.to_uppercase()),
        };
        let default = HoursKey {
            market: market_key,
            security_type,
            symbol: None,
        };
        self.entries
            .get(&specific)
            .or_else(|| self.entries.get(&default))
            .cloned()
            .ok_or_else(|| TradefeedError::UnknownExchangeHours {
                market: market.to_string(),
                symbol: symbol.to_string(),
                security_type: security_type.to_string(),
            })
    }
}
