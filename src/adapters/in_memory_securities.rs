//! In-memory security registry.

use std::collections::HashMap;

use crate::domain::error::TradefeedError;
use crate::domain::security::Security;
use crate::ports::security_port::SecurityPort;

#[derive(Debug, Default)]
pub struct InMemorySecurities {
    securities: HashMap<String, Security>,
}

impl InMemorySecurities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.securities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }

    /// Registered symbols, sorted.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.securities.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }
}

impl SecurityPort for InMemorySecurities {
    fn add(&mut self, symbol: &str, security: Security) -> Result<(), TradefeedError> {
        let key = symbol.to_uppercase();
        if self.securities.contains_key(&key) {
            return Err(TradefeedError::DuplicateSecurity { symbol: key });
        }
        self.securities.insert(key, security);
        Ok(())
    }

    fn get(&self, symbol: &str) -> Option<&Security> {
        self.securities.get(&symbol.to_uppercase())
    }
}
