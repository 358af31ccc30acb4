//! Single-flight fetch cell backing hover previews.
//!
//! Hovering an issue row pops up a preview of the offending event. The
//! event is fetched lazily, and the cell guarantees the contract the UI
//! depends on: at most one request in flight per cell, a cell that has
//! loaded never re-fetches, and a resolution that arrives after the cell
//! has closed (the hover ended, the row unmounted) is discarded instead of
//! mutating dead state. The in-flight request itself is never cancelled
//! and there is no retry or timeout.
//!
//! Presentation is three-state: loading, loaded with the event payload,
//! or failed with a static message.

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

use std::fmt;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tally_bus::{Bus, Subscriber};
use tracing::{debug, warn};

pub mod query;

pub use query::PreviewQuery;

/// Errors produced by an [`EventSource`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The API request failed. The cell renders this as the static
    /// failure state; the reason is only logged.
    #[error("preview request failed: {reason}")]
    Request {
        /// Transport- or API-level failure description.
        reason: String,
    },
}

/// Asynchronous source of preview events, the seam over the API client.
#[async_trait]
pub trait EventSource {
    /// Event payload produced on success.
    type Event: Clone + Send + Sync + fmt::Debug;

    /// Fetch the event named by `query`.
    ///
    /// # Errors
    ///
    /// [`SourceError::Request`] when the underlying request fails.
    async fn fetch(&self, query: &PreviewQuery) -> Result<Self::Event, SourceError>;
}

/// Presentation states of a preview cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState<E> {
    /// Fetch not yet resolved; the UI shows a spinner.
    Loading,
    /// Fetch resolved with the event payload.
    Loaded(E),
    /// Fetch failed; the UI shows a static failure message.
    Failed,
}

impl<E> PreviewState<E> {
    /// Whether this state is terminal for the cell.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Failed)
    }
}

/// Fetch lifecycle of a cell, tracked separately from the presentation
/// state so a closed cell can be told apart from one still loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    InFlight,
    Done,
    Closed,
}

/// A single hover-preview instance.
///
/// Share the cell (for example behind an `Arc`) between whoever triggers
/// loading and whoever renders the state.
#[derive(Debug)]
pub struct PreviewCell<S: EventSource> {
    source: S,
    query: PreviewQuery,
    phase: Mutex<Phase>,
    bus: Bus<PreviewState<S::Event>>,
}

impl<S> PreviewCell<S>
where
    S: EventSource + Send + Sync,
{
    /// Create a cell for `query`, starting in [`PreviewState::Loading`].
    pub fn new(source: S, query: PreviewQuery) -> Self {
        Self {
            source,
            query,
            phase: Mutex::new(Phase::Idle),
            bus: Bus::new(PreviewState::Loading),
        }
    }

    /// Current presentation state.
    #[must_use]
    pub fn state(&self) -> PreviewState<S::Event> {
        self.bus.snapshot()
    }

    /// Subscribe to presentation-state transitions.
    #[must_use]
    pub fn subscribe(&self) -> Subscriber<PreviewState<S::Event>> {
        self.bus.subscribe()
    }

    /// Resolve this cell, fetching at most once.
    ///
    /// The first caller issues the fetch; callers arriving while it is in
    /// flight wait for that same resolution. A cell that has already
    /// resolved returns its state without touching the source again, and
    /// a failed cell stays failed: there is no retry.
    pub async fn load(&self) -> PreviewState<S::Event> {
        // Register for transitions before inspecting the phase so a
        // resolution landing in between cannot be missed.
        let mut sub = self.bus.subscribe();

        let issue_fetch = {
            let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
            match *phase {
                Phase::Idle => {
                    *phase = Phase::InFlight;
                    true
                }
                Phase::InFlight => false,
                Phase::Done | Phase::Closed => return self.bus.snapshot(),
            }
        };

        if issue_fetch {
            let resolved = match self.source.fetch(&self.query).await {
                Ok(event) => PreviewState::Loaded(event),
                Err(error) => {
                    warn!(%error, "preview fetch failed");
                    PreviewState::Failed
                }
            };
            return self.resolve(resolved);
        }

        loop {
            match sub.recv().await {
                Ok(state) => {
                    if state.is_resolved() {
                        return state;
                    }
                    // A non-terminal transition while waiting means the
                    // cell closed under us; its state is frozen.
                    let phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
                    if *phase == Phase::Closed {
                        return state;
                    }
                }
                Err(_) => return self.bus.snapshot(),
            }
        }
    }

    /// Close the cell. An in-flight fetch keeps running, but its
    /// resolution is discarded and the presentation state stops changing.
    pub fn close(&self) {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        *phase = Phase::Closed;
        // Wake anyone blocked on the in-flight fetch; the state they
        // observe is the frozen snapshot.
        self.bus.publish(self.bus.snapshot());
        drop(phase);
    }

    /// Apply a fetch resolution, unless the cell closed while the request
    /// was in flight.
    fn resolve(&self, state: PreviewState<S::Event>) -> PreviewState<S::Event> {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        if *phase == Phase::Closed {
            drop(phase);
            debug!("discarding late preview resolution");
            return self.bus.snapshot();
        }
        *phase = Phase::Done;
        // Published under the phase lock so a caller observing `Done`
        // always finds the resolved state in the snapshot.
        self.bus.publish(state.clone());
        drop(phase);
        state
    }
}
