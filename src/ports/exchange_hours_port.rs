//! Exchange-hours lookup port.

use crate::domain::error::TradefeedError;
use crate::domain::exchange_hours::ExchangeHours;
use crate::domain::subscription::SecurityType;

pub trait ExchangeHoursPort {
    /// Hours for `symbol` on `market`; fails with `UnknownExchangeHours`
    /// when the combination is not known.
    fn exchange_hours(
        &self,
        market: &str,
        symbol: &str,
        security_type: SecurityType,
    ) -> Result<ExchangeHours, TradefeedError>;
}
