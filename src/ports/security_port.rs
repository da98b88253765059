//! Security registry port.

use crate::domain::error::TradefeedError;
use crate::domain::security::Security;

pub trait SecurityPort {
    /// Register `security` under `symbol`. Duplicate symbols are rejected.
    fn add(&mut self, symbol: &str, security: Security) -> Result<(), TradefeedError>;

    fn get(&self, symbol: &str) -> Option<&Security>;

    fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }
}
