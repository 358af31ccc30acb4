//! Whole-window roll-up of a usage report, as used by report summaries
//! (accepted versus dropped volume over the covered period).

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{Outcome, UsageReport};

#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq)]
/// Totals over every bucket of a report window.
pub struct UsageSummary {
    /// Accepted volume across the window.
    pub accepted: u64,
    /// Filtered, rate-limited and invalid volume combined.
    pub server_discarded: u64,
    /// Client-side discard volume: the reason breakdown when it applies,
    /// the bare category count otherwise.
    pub client_discarded: u64,
    /// Number of distinct bucket timestamps covered.
    pub buckets: usize,
}

impl UsageSummary {
    /// Total volume the window accounts for.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.accepted + self.server_discarded + self.client_discarded
    }

    /// Fraction of total volume that was accepted, zero for an empty window.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn accepted_ratio(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.accepted as f64 / total as f64
        }
    }
}

/// Roll a report up into whole-window totals.
#[must_use]
pub fn summarize(report: &UsageReport) -> UsageSummary {
    let breakdown = report.active_client_breakdown();
    let mut summary = UsageSummary::default();
    let mut axis: BTreeSet<u64> = BTreeSet::new();

    for (outcome, counts) in &report.outcomes {
        for tracked in counts {
            axis.insert(tracked.timestamp);
            match outcome {
                Outcome::Accepted => summary.accepted += tracked.count,
                Outcome::Filtered | Outcome::RateLimited | Outcome::Invalid => {
                    summary.server_discarded += tracked.count;
                }
                Outcome::ClientDiscard => {
                    if breakdown.is_none() {
                        summary.client_discarded += tracked.count;
                    }
                }
            }
        }
    }
    if let Some(reasons) = breakdown {
        for counts in reasons.values() {
            for tracked in counts {
                axis.insert(tracked.timestamp);
                summary.client_discarded += tracked.count;
            }
        }
    }
    if let Some(indexed) = &report.indexed {
        axis.extend(indexed.iter().map(|tracked| tracked.timestamp));
    }

    summary.buckets = axis.len();
    summary
}
