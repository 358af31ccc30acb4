//! Wire model for per-project usage-outcome statistics, meant to be
//! deserialized from the usage-statistics endpoint.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
/// Server-assigned classification of what happened to an ingested event.
///
/// The set is closed: a report carrying a category name outside this
/// enumeration fails to deserialize rather than being silently ignored.
pub enum Outcome {
    /// Passed ingestion and counted toward processed volume.
    Accepted,
    /// Dropped by an inbound data filter.
    Filtered,
    /// Dropped by a quota or spike-protection limit.
    RateLimited,
    /// Rejected as malformed.
    Invalid,
    /// Discarded by the client before send; the client reports the count.
    ClientDiscard,
}

impl Outcome {
    /// Whether this category counts toward server-side discarded volume.
    #[must_use]
    pub fn is_server_discard(self) -> bool {
        matches!(self, Self::Filtered | Self::RateLimited | Self::Invalid)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
/// A single time-bucketed count.
pub struct TrackedCount {
    /// Bucket-aligned unix timestamp in milliseconds.
    pub timestamp: u64,
    /// Number of events observed in this bucket.
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
/// Per-project outcome counts over a charting window.
///
/// Buckets across categories share one aligned timestamp set; a category
/// absent at a given timestamp implies a count of zero there.
pub struct UsageReport {
    /// Bucketed counts per outcome category.
    pub outcomes: FxHashMap<Outcome, Vec<TrackedCount>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Independently reported indexed counts: events actually retained
    /// after the sampling decision. When present these are used directly
    /// instead of deriving indexed volume from a sampling rate.
    pub indexed: Option<Vec<TrackedCount>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Client-reported discard reasons, keyed by reason name. Consulted
    /// only when [`Outcome::ClientDiscard`] itself appears in `outcomes`,
    /// which signals that the client separately reported why it dropped
    /// events locally.
    pub client_discards: Option<FxHashMap<String, Vec<TrackedCount>>>,
}

impl UsageReport {
    /// The client-discard breakdown, when it applies to this report.
    #[must_use]
    pub fn active_client_breakdown(&self) -> Option<&FxHashMap<String, Vec<TrackedCount>>> {
        if self.outcomes.contains_key(&Outcome::ClientDiscard) {
            self.client_discards.as_ref()
        } else {
            None
        }
    }
}
