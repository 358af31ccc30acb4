//! The usage-report to chart-series transform.

use rustc_hash::FxHashMap;

use crate::chart::{Point, Series, SeriesName};
use crate::model::{Outcome, UsageReport};

/// Per-bucket aggregates gathered in one pass over the report.
#[derive(Debug, Default, Clone, Copy)]
struct BucketTotals {
    /// Accepted volume, before the indexing decision.
    processed: u64,
    /// Filtered, rate-limited and invalid volume combined.
    discarded_server: u64,
    /// Bare `client_discard` category volume.
    client_bare: u64,
    /// Client-discard breakdown volume, summed across reasons.
    client_breakdown: u64,
    /// Independently reported indexed volume.
    indexed: u64,
}

/// Build the three stacked usage series from `report`.
///
/// `sampling_rate`, when supplied, must lie in `(0, 1]`: the fraction of
/// processed events retained as indexed. Out-of-range values are a caller
/// error and are not checked; counts are likewise taken as-is.
///
/// The returned series share one ascending timestamp axis covering every
/// bucket present anywhere in the input. A category absent at a bucket
/// contributes zero there, never a missing point, so a zero-volume bucket
/// still yields three zero-valued points.
///
/// When the report carries no indexed counts, indexed volume is derived as
/// `round(processed * rate)`, or taken as fully indexed without a rate.
/// When the report carries no client-discard data at all, a rate below 1.0
/// projects the client-side discard volume the rate implies.
#[must_use]
pub fn build_series(report: &UsageReport, sampling_rate: Option<f64>) -> [Series; 3] {
    let breakdown = report.active_client_breakdown();
    let client_reported = report.outcomes.contains_key(&Outcome::ClientDiscard);
    let has_indexed = report.indexed.is_some();

    let mut totals: FxHashMap<u64, BucketTotals> = FxHashMap::default();

    for (outcome, counts) in &report.outcomes {
        for tracked in counts {
            let slot = totals.entry(tracked.timestamp).or_default();
            match outcome {
                Outcome::Accepted => slot.processed += tracked.count,
                Outcome::Filtered | Outcome::RateLimited | Outcome::Invalid => {
                    slot.discarded_server += tracked.count;
                }
                Outcome::ClientDiscard => slot.client_bare += tracked.count,
            }
        }
    }
    if let Some(indexed) = &report.indexed {
        for tracked in indexed {
            totals.entry(tracked.timestamp).or_default().indexed += tracked.count;
        }
    }
    if let Some(reasons) = breakdown {
        for counts in reasons.values() {
            for tracked in counts {
                totals.entry(tracked.timestamp).or_default().client_breakdown += tracked.count;
            }
        }
    }

    let mut axis: Vec<u64> = totals.keys().copied().collect();
    axis.sort_unstable();

    let mut indexed_points = Vec::with_capacity(axis.len());
    let mut processed_points = Vec::with_capacity(axis.len());
    let mut discarded_points = Vec::with_capacity(axis.len());

    for &timestamp in &axis {
        let bucket = totals[&timestamp];

        let indexed = if has_indexed {
            bucket.indexed
        } else if let Some(rate) = sampling_rate {
            scale(bucket.processed, rate)
        } else {
            bucket.processed
        };

        let discarded_client = if breakdown.is_some() {
            bucket.client_breakdown
        } else if client_reported {
            bucket.client_bare
        } else if let Some(rate) = sampling_rate {
            // The client kept only fraction `rate` of its events; project
            // the volume it dropped locally from the volume that arrived.
            project_client_discards(bucket.processed, rate)
        } else {
            0
        };

        indexed_points.push(Point {
            timestamp,
            value: indexed,
        });
        processed_points.push(Point {
            timestamp,
            value: bucket.processed.saturating_sub(indexed),
        });
        discarded_points.push(Point {
            timestamp,
            value: bucket.discarded_server + discarded_client,
        });
    }

    [
        Series::usage_bar(SeriesName::IndexedAndProcessed, indexed_points),
        Series::usage_bar(SeriesName::Processed, processed_points),
        Series::usage_bar(SeriesName::Discarded, discarded_points),
    ]
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale(count: u64, rate: f64) -> u64 {
    ((count as f64) * rate).round() as u64
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn project_client_discards(processed: u64, rate: f64) -> u64 {
    ((processed as f64) * (1.0 - rate) / rate).round() as u64
}
