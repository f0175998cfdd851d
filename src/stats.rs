use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::proposal::Record;

/// Dashboard counters. Always rebuilt from a full record list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub total: usize,
    pub accepted: usize,
    pub pending: usize,
    #[serde(rename = "acceptanceRatePercent")]
    pub acceptance_rate_percent: u32,
}

impl StatsSnapshot {
    pub fn rate_label(&self) -> String {
        format!("{}%", self.acceptance_rate_percent)
    }
}

impl Display for StatsSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "submitted={} accepted={} pending={} acceptance={}",
            self.total,
            self.accepted,
            self.pending,
            self.rate_label()
        )
    }
}

/// Percentage rounded half-up in integer arithmetic.
fn rate_percent(accepted: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((accepted * 200 + total) / (total * 2)) as u32
}

pub fn derive_stats(records: &[Record]) -> StatsSnapshot {
    let total = records.len();
    let accepted = records.iter().filter(|r| r.is_accepted()).count();
    let pending = records.iter().filter(|r| r.is_pending()).count();
    StatsSnapshot { total, accepted, pending, acceptance_rate_percent: rate_percent(accepted, total) }
}
