//! Tick loop over a prepared timeline.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::data::TimeSlice;
use super::packet::{AlgorithmStatus, Packet, ResultQueue};
use super::setup::Setup;

#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    pub slices: usize,
    /// Points delivered to the algorithm. Internal feeds are excluded.
    pub user_points: usize,
    pub internal_points: usize,
    pub first_time: Option<NaiveDateTime>,
    pub last_time: Option<NaiveDateTime>,
    pub total_value: Decimal,
}

/// Replay `slices` in order: normalize prices, refresh conversion rates and
/// report rate changes. Ends with a `BacktestResult` carrying the valuation,
/// or a `LiveResult` when the setup is in live mode.
pub fn run_replay(
    setup: &mut Setup,
    slices: impl IntoIterator<Item = TimeSlice>,
    queue: &mut ResultQueue,
) -> ReplaySummary {
    queue.push(Packet::AlgorithmStatus {
        status: AlgorithmStatus::Running,
    });

    let mut summary = ReplaySummary {
        slices: 0,
        user_points: 0,
        internal_points: 0,
        first_time: None,
        last_time: None,
        total_value: Decimal::ZERO,
    };

    for mut slice in slices {
        for (index, points) in slice.data.iter_mut() {
            let Some(config) = setup.subscriptions.get(*index) else {
                warn!(index, "dropping data for unregistered subscription");
                continue;
            };
            for point in points.iter_mut() {
                point.value = config.normalized_price(point.value);
            }
            if config.is_internal() {
                summary.internal_points += points.len();
            } else {
                summary.user_points += points.len();
            }
        }

        let before: BTreeMap<String, Decimal> = setup
            .cash_book
            .iter()
            .map(|c| (c.symbol().to_string(), c.conversion_rate()))
            .collect();
        setup.cash_book.update(&slice);
        for cash in setup.cash_book.iter() {
            let previous = before.get(cash.symbol()).copied().unwrap_or_default();
            if previous != cash.conversion_rate() {
                debug!(cash = %cash.symbol(), from = %previous, to = %cash.conversion_rate(), "conversion rate changed");
                queue.push(Packet::debug(format!(
                    "{} {} conversion rate {} -> {}",
                    slice.time,
                    cash.symbol(),
                    previous.normalize(),
                    cash.conversion_rate().normalize()
                )));
            }
        }

        summary.slices += 1;
        summary.first_time.get_or_insert(slice.time);
        summary.last_time = Some(slice.time);
    }

    summary.total_value = setup.cash_book.total_value_in_account_currency();
    let account = setup.cash_book.account_currency().to_string();
    let statistics = vec![
        ("Slices".to_string(), summary.slices.to_string()),
        ("Data Points".to_string(), summary.user_points.to_string()),
        (
            "Internal Data Points".to_string(),
            summary.internal_points.to_string(),
        ),
        (
            "Total Cash".to_string(),
            format!("${:.2} {account}", summary.total_value.round_dp(2)),
        ),
    ];
    queue.push(if setup.live_mode {
        Packet::LiveResult { statistics }
    } else {
        Packet::BacktestResult { statistics }
    });
    queue.push(Packet::AlgorithmStatus {
        status: AlgorithmStatus::Completed,
    });

    summary
}
