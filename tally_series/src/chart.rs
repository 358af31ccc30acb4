//! Chart-ready shapes for the usage chart surface.
//!
//! The downstream chart accepts named, colored bar series stacked on a
//! shared time axis. Serialization matches its field names (`seriesName`,
//! `type`, `stack`, `barMinHeight`, points as `{name, value}`).

use std::fmt;

use serde::Serialize;

/// Stack identifier shared by the three usage series.
pub const USAGE_STACK: &str = "usage";

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
/// Legend names of the three stacked usage series, in display order.
pub enum SeriesName {
    /// Events retained after the sampling decision.
    #[serde(rename = "Indexed and Processed")]
    IndexedAndProcessed,
    /// Events processed but not retained: dropped by sampling, not
    /// discarded outright.
    #[serde(rename = "Processed")]
    Processed,
    /// Events discarded server-side or by the client.
    #[serde(rename = "Discarded")]
    Discarded,
}

impl SeriesName {
    /// Legend label shown by the chart.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::IndexedAndProcessed => "Indexed and Processed",
            Self::Processed => "Processed",
            Self::Discarded => "Discarded",
        }
    }

    /// Fixed display color for this series.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::IndexedAndProcessed => "#2BA185",
            Self::Processed => "#F5B000",
            Self::Discarded => "#F55459",
        }
    }
}

impl fmt::Display for SeriesName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
/// A single point on the shared time axis.
pub struct Point {
    #[serde(rename = "name")]
    /// Bucket-aligned unix timestamp in milliseconds.
    pub timestamp: u64,
    /// Stacked bar segment height at this bucket.
    pub value: u64,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
/// One stacked bar series as consumed by the chart surface.
pub struct Series {
    #[serde(rename = "seriesName")]
    /// Legend name.
    pub name: SeriesName,
    /// Fixed display color.
    pub color: &'static str,
    #[serde(rename = "barMinHeight")]
    /// Minimum rendered bar height in pixels.
    pub bar_min_height: u32,
    #[serde(rename = "type")]
    /// Chart mark type; always `"bar"` for usage series.
    pub kind: &'static str,
    /// Stack identifier; the three usage series share [`USAGE_STACK`].
    pub stack: &'static str,
    /// Per-bucket values, ascending by timestamp, aligned across series.
    pub data: Vec<Point>,
}

impl Series {
    /// A usage bar series named `name` over `data`.
    #[must_use]
    pub fn usage_bar(name: SeriesName, data: Vec<Point>) -> Self {
        Self {
            name,
            color: name.color(),
            bar_min_height: 0,
            kind: "bar",
            stack: USAGE_STACK,
            data,
        }
    }
}
