//! Result messages emitted by a run and the queue that carries them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmStatus {
    Initializing,
    Running,
    Completed,
    Stopped,
    RuntimeError,
}

impl fmt::Display for AlgorithmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlgorithmStatus::Initializing => "initializing",
            AlgorithmStatus::Running => "running",
            AlgorithmStatus::Completed => "completed",
            AlgorithmStatus::Stopped => "stopped",
            AlgorithmStatus::RuntimeError => "runtime error",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// Final statistics of a backtest, as ordered name/value pairs.
    BacktestResult { statistics: Vec<(String, String)> },
    LiveResult { statistics: Vec<(String, String)> },
    AlgorithmStatus { status: AlgorithmStatus },
    RuntimeError {
        message: String,
        stack_trace: Option<String>,
    },
    HandledError { message: String },
    Log { message: String },
    Debug { message: String },
    OrderEvent {
        order_id: u64,
        symbol: String,
        quantity: Decimal,
    },
}

impl Packet {
    pub fn debug(message: impl Into<String>) -> Self {
        Packet::Debug {
            message: message.into(),
        }
    }

    pub fn log(message: impl Into<String>) -> Self {
        Packet::Log {
            message: message.into(),
        }
    }

    /// Text shown to the user, `None` for packets that carry no message.
    pub fn message(&self) -> Option<&str> {
        match self {
            Packet::RuntimeError { message, .. }
            | Packet::HandledError { message }
            | Packet::Log { message }
            | Packet::Debug { message } => Some(message),
            Packet::BacktestResult { .. }
            | Packet::LiveResult { .. }
            | Packet::AlgorithmStatus { .. }
            | Packet::OrderEvent { .. } => None,
        }
    }
}

/// FIFO of packets awaiting a consumer.
#[derive(Debug, Clone, Default)]
pub struct ResultQueue {
    packets: VecDeque<Packet>,
}

impl ResultQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, packet: Packet) {
        self.packets.push_back(packet);
    }

    pub fn try_dequeue(&mut self) -> Option<Packet> {
        self.packets.pop_front()
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    /// Empty the queue, rendering each message-bearing packet as a line
    /// stamped with `now`. Other packets are consumed silently.
    pub fn drain_messages(&mut self, now: DateTime<Utc>) -> Vec<String> {
        let stamp = now.format("%Y-%m-%d %H:%M:%SZ");
        let mut lines = Vec::new();
        while let Some(packet) = self.try_dequeue() {
            if let Some(message) = packet.message() {
                lines.push(format!("{stamp} {message}"));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn every_variant() -> Vec<Packet> {
        vec![
            Packet::BacktestResult {
                statistics: vec![("Total".into(), "$1.00".into())],
            },
            Packet::LiveResult { statistics: vec![] },
            Packet::AlgorithmStatus {
                status: AlgorithmStatus::Running,
            },
            Packet::RuntimeError {
                message: "boom".into(),
                stack_trace: Some("at tick".into()),
            },
            Packet::HandledError {
                message: "recovered".into(),
            },
            Packet::log("hello"),
            Packet::debug("rate"),
            Packet::OrderEvent {
                order_id: 7,
                symbol: "SPY".into(),
                quantity: dec!(10),
            },
        ]
    }

    #[test]
    fn queue_is_fifo() {
        let mut queue = ResultQueue::new();
        queue.push(Packet::log("first"));
        queue.push(Packet::log("second"));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.try_dequeue(), Some(Packet::log("first")));
        assert_eq!(queue.try_dequeue(), Some(Packet::log("second")));
        assert_eq!(queue.try_dequeue(), None);
    }

    #[test]
    fn drain_renders_message_packets_only() {
        let mut queue = ResultQueue::new();
        for packet in every_variant() {
            queue.push(packet);
        }
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let lines = queue.drain_messages(now);
        assert_eq!(
            lines,
            vec![
                "2024-01-15 10:30:00Z boom",
                "2024-01-15 10:30:00Z recovered",
                "2024-01-15 10:30:00Z hello",
                "2024-01-15 10:30:00Z rate",
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn status_display() {
        assert_eq!(AlgorithmStatus::RuntimeError.to_string(), "runtime error");
    }
}
