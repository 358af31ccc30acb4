//! Reshape per-project ingestion outcome statistics into chart-ready series.
//!
//! The usage-statistics endpoint reports, per outcome category, how many
//! events landed in each time bucket for a project. This crate turns that
//! report into the three stacked bar series the usage chart renders --
//! "Indexed and Processed", "Processed", "Discarded" -- all sharing one
//! aligned time axis, and into whole-window totals for report summaries.
//!
//! Everything here is pure: no I/O, no shared state, safe to call from any
//! number of threads.

#![deny(clippy::all)]
#![deny(clippy::perf)]
#![deny(clippy::suspicious)]
#![deny(clippy::complexity)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![deny(unreachable_pub)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod chart;
pub mod model;
pub mod series;
pub mod summary;

pub use chart::{Point, Series, SeriesName};
pub use model::{Outcome, TrackedCount, UsageReport};
pub use series::build_series;
pub use summary::{summarize, UsageSummary};
