//! Per-client daily quota tracking.
//!
//! Each client gets a fixed number of price checks per UTC calendar day.
//! The check-then-increment runs under one mutex so two concurrent
//! requests from the same client cannot both take the last slot.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::clock::Clock;

#[derive(Debug, Clone)]
struct RateRecord {
    count: u32,
    day: String,
}

/// Outcome of a quota check. `remaining` counts the slots left after this
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaDecision {
    pub allowed: bool,
    pub remaining: u32,
}

/// Daily quota tracker keyed by the client's self-reported identifier.
pub struct DailyQuota {
    max_per_day: u32,
    clock: Arc<dyn Clock>,
    records: Mutex<HashMap<String, RateRecord>>,
}

impl DailyQuota {
    #[must_use]
    pub fn new(max_per_day: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_per_day,
            clock,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Consumes one quota slot for `client_id` if any remain today.
    ///
    /// A new client or a day rollover resets the count to 1. At or beyond
    /// the cap the stored count is left untouched and the request is
    /// denied with `remaining = 0`. The day boundary is the UTC calendar
    /// day at call time, not the client's timezone.
    pub fn check_and_consume(&self, client_id: &str) -> QuotaDecision {
        let today = self.today();
        let mut records = self.records.lock().expect("quota lock poisoned");

        let record = records.get_mut(client_id);
        match record {
            Some(record) if record.day == today => {
                if record.count >= self.max_per_day {
                    return QuotaDecision {
                        allowed: false,
                        remaining: 0,
                    };
                }
                record.count += 1;
                QuotaDecision {
                    allowed: true,
                    remaining: self.max_per_day - record.count,
                }
            }
            _ => {
                records.insert(
                    client_id.to_string(),
                    RateRecord {
                        count: 1,
                        day: today,
                    },
                );
                QuotaDecision {
                    allowed: true,
                    remaining: self.max_per_day.saturating_sub(1),
                }
            }
        }
    }

    /// Drops records whose day is no longer today, bounding memory across
    /// many distinct clients. Returns the number removed.
    pub fn sweep(&self) -> usize {
        let today = self.today();
        let mut records = self.records.lock().expect("quota lock poisoned");
        let before = records.len();
        records.retain(|_, record| record.day == today);
        before - records.len()
    }

    #[must_use]
    pub fn max_per_day(&self) -> u32 {
        self.max_per_day
    }

    fn today(&self) -> String {
        self.clock.now().format("%Y-%m-%d").to_string()
    }
}
