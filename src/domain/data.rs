//! Data points and the per-time slices delivered to the tick loop.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub subscription_index: usize,
    pub symbol: String,
    pub time: NaiveDateTime,
    pub value: Decimal,
}

/// All data delivered at one instant, keyed by subscription index.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlice {
    pub time: NaiveDateTime,
    pub data: HashMap<usize, Vec<DataPoint>>,
}

impl TimeSlice {
    pub fn new(time: NaiveDateTime) -> Self {
        Self {
            time,
            data: HashMap::new(),
        }
    }

    pub fn push(&mut self, point: DataPoint) {
        self.data
            .entry(point.subscription_index)
            .or_default()
            .push(point);
    }

    pub fn get(&self, subscription_index: usize) -> Option<&[DataPoint]> {
        self.data.get(&subscription_index).map(Vec::as_slice)
    }

    /// Most recent value for a subscription, `None` if it has no data in this slice.
    pub fn last_value(&self, subscription_index: usize) -> Option<Decimal> {
        self.get(subscription_index)
            .and_then(|points| points.last())
            .map(|p| p.value)
    }

    pub fn point_count(&self) -> usize {
        self.data.values().map(Vec::len).sum()
    }
}

/// Group points into chronologically ordered slices.
///
/// Points sharing a timestamp keep their input order within a subscription.
pub fn build_timeline(points: impl IntoIterator<Item = DataPoint>) -> Vec<TimeSlice> {
    let mut by_time: BTreeMap<NaiveDateTime, TimeSlice> = BTreeMap::new();
    for point in points {
        by_time
            .entry(point.time)
            .or_insert_with(|| TimeSlice::new(point.time))
            .push(point);
    }
    by_time.into_values().collect()
}
