//! Data access port trait.

use crate::domain::data::DataPoint;
use crate::domain::error::TradefeedError;
use crate::domain::subscription::SubscriptionConfig;

pub trait DataPort {
    /// Raw points for one subscription, in time order. A source with no data
    /// for the subscription returns an empty vector.
    fn fetch(&self, config: &SubscriptionConfig) -> Result<Vec<DataPoint>, TradefeedError>;
}
