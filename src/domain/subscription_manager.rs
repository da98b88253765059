//! Registry of all subscriptions for a run.
//!
//! Populated during setup, then read-only for the tick loop apart from the
//! scale-factor maintenance pass.

use super::error::TradefeedError;
use super::resolution::Resolution;
use super::subscription::{SubscriptionConfig, SubscriptionRequest};

#[derive(Debug, Clone, Default)]
pub struct SubscriptionManager {
    subscriptions: Vec<SubscriptionConfig>,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a feed and return its index.
    pub fn add(&mut self, request: SubscriptionRequest) -> Result<usize, TradefeedError> {
        let index = self.subscriptions.len();
        let config = SubscriptionConfig::new(request, index)?;
        self.insert(config)?;
        Ok(index)
    }

    fn insert(&mut self, config: SubscriptionConfig) -> Result<(), TradefeedError> {
        let index = config.subscription_index();
        if index != self.subscriptions.len() {
            return Err(TradefeedError::DuplicateSubscriptionIndex { index });
        }
        self.subscriptions.push(config);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&SubscriptionConfig> {
        self.subscriptions.get(index)
    }

    /// Mutable access for scale-factor and dividend maintenance.
    pub fn config_mut(&mut self, index: usize) -> Option<&mut SubscriptionConfig> {
        self.subscriptions.get_mut(index)
    }

    /// First subscription in registration order for `symbol`, case-insensitive.
    pub fn find_by_symbol(&self, symbol: &str) -> Option<&SubscriptionConfig> {
        self.subscriptions
            .iter()
            .find(|c| c.symbol().eq_ignore_ascii_case(symbol))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubscriptionConfig> {
        self.subscriptions.iter()
    }

    /// Subscriptions delivered to the algorithm, i.e. not internal.
    pub fn user_visible(&self) -> impl Iterator<Item = &SubscriptionConfig> {
        self.subscriptions.iter().filter(|c| !c.is_internal())
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Finest resolution across every subscription, `None` when empty.
    pub fn minimum_resolution(&self) -> Option<Resolution> {
        self.subscriptions.iter().map(|c| c.resolution()).min()
    }
}
