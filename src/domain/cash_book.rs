//! All cash held by the algorithm, keyed by currency.

use rust_decimal::Decimal;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use super::cash::{validate_currency_code, Cash};
use super::currency_feed::{CurrencyFeedResolver, FeedResolution};
use super::data::TimeSlice;
use super::error::TradefeedError;
use super::subscription_manager::SubscriptionManager;
use crate::ports::security_port::SecurityPort;

#[derive(Debug, Clone, PartialEq)]
pub struct CashBook {
    account_currency: String,
    entries: BTreeMap<String, Cash>,
}

impl CashBook {
    /// Book holding zero units of the account currency at rate 1.
    pub fn new(account_currency: &str) -> Result<Self, TradefeedError> {
        let mut base = Cash::new(account_currency, Decimal::ZERO, Decimal::ONE)?;
        base.mark_base_currency();
        let account_currency = base.symbol().to_string();
        let mut entries = BTreeMap::new();
        entries.insert(account_currency.clone(), base);
        Ok(Self {
            account_currency,
            entries,
        })
    }

    pub fn account_currency(&self) -> &str {
        &self.account_currency
    }

    /// Add to an existing entry, or create it with `conversion_rate`.
    ///
    /// The rate of an existing entry is left alone.
    pub fn add(
        &mut self,
        symbol: &str,
        quantity: Decimal,
        conversion_rate: Decimal,
    ) -> Result<&Cash, TradefeedError> {
        let code = validate_currency_code(symbol)?;
        let entry = match self.entries.entry(code) {
            Entry::Occupied(e) => {
                let cash = e.into_mut();
                cash.quantity += quantity;
                cash
            }
            Entry::Vacant(e) => {
                let cash = Cash::new(symbol, quantity, conversion_rate)?;
                e.insert(cash)
            }
        };
        Ok(entry)
    }

    pub fn get(&self, symbol: &str) -> Option<&Cash> {
        self.entries.get(&symbol.to_uppercase())
    }

    pub fn get_mut(&mut self, symbol: &str) -> Option<&mut Cash> {
        self.entries.get_mut(&symbol.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in currency-code order.
    pub fn iter(&self) -> impl Iterator<Item = &Cash> {
        self.entries.values()
    }

    /// Wire every entry to a conversion feed. Stops at the first failure.
    pub fn ensure_currency_data_feeds(
        &mut self,
        resolver: &CurrencyFeedResolver<'_>,
        subscriptions: &mut SubscriptionManager,
        securities: &mut dyn SecurityPort,
    ) -> Result<Vec<(String, FeedResolution)>, TradefeedError> {
        let mut resolutions = Vec::with_capacity(self.entries.len());
        for (symbol, cash) in self.entries.iter_mut() {
            let resolution = resolver.ensure(cash, subscriptions, securities)?;
            resolutions.push((symbol.clone(), resolution));
        }
        Ok(resolutions)
    }

    pub fn update(&mut self, slice: &TimeSlice) {
        for cash in self.entries.values_mut() {
            cash.update(slice);
        }
    }

    pub fn total_value_in_account_currency(&self) -> Decimal {
        self.entries
            .values()
            .map(Cash::value_in_account_currency)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Convert `amount` of `from` into `to` through the account currency.
    pub fn convert(&self, amount: Decimal, from: &str, to: &str) -> Result<Decimal, TradefeedError> {
        let source = self.lookup(from)?;
        let target = self.lookup(to)?;
        if source.symbol() == target.symbol() {
            return Ok(amount);
        }
        let in_account = amount.checked_mul(source.conversion_rate()).ok_or_else(|| {
            TradefeedError::ConversionOverflow {
                from: source.symbol().to_string(),
                to: target.symbol().to_string(),
            }
        })?;
        if target.conversion_rate().is_zero() {
            return Err(TradefeedError::ZeroConversionRate {
                symbol: target.symbol().to_string(),
            });
        }
        in_account
            .checked_div(target.conversion_rate())
            .ok_or_else(|| TradefeedError::ConversionOverflow {
                from: source.symbol().to_string(),
                to: target.symbol().to_string(),
            })
    }

    pub fn convert_to_account_currency(
        &self,
        amount: Decimal,
        from: &str,
    ) -> Result<Decimal, TradefeedError> {
        let source = self.lookup(from)?;
        amount
            .checked_mul(source.conversion_rate())
            .ok_or_else(|| TradefeedError::ConversionOverflow {
                from: source.symbol().to_string(),
                to: self.account_currency.clone(),
            })
    }

    fn lookup(&self, symbol: &str) -> Result<&Cash, TradefeedError> {
        self.get(symbol).ok_or_else(|| TradefeedError::UnknownCurrency {
            symbol: symbol.to_uppercase(),
        })
    }
}

impl fmt::Display for CashBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cash in self.entries.values() {
            writeln!(f, "{cash}")?;
        }
        write!(
            f,
            "Total: ${:.2} {}",
            self.total_value_in_account_currency().round_dp(2),
            self.account_currency
        )
    }
}
