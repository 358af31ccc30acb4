//! Typed broadcast state container.
//!
//! UI surfaces need to learn when shared state changes: an overlay opening
//! or closing, a preview resolving. Instead of a global observable store,
//! this crate provides an externally-owned bus: the owner publishes state
//! transitions, any number of subscribers receive them, and dropping a
//! subscriber unsubscribes it. There is no singleton; callers own their
//! `Bus` and hand out clones.
//!
//! The bus always holds a current state. Late subscribers can read it via
//! [`Bus::snapshot`] and then wait for transitions, so no one depends on
//! having been subscribed from the start.

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

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;
use tracing::debug;

/// Pending states a slow subscriber may buffer before it lags.
const CHANNEL_CAPACITY: usize = 16;

/// Errors for [`Subscriber::recv`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvError {
    /// Every `Bus` handle has been dropped; no further states will arrive.
    #[error("bus closed")]
    Closed,
    /// The subscriber fell behind and missed this many states.
    #[error("subscriber lagged, skipped {0} states")]
    Lagged(u64),
}

/// Errors for [`Subscriber::try_recv`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryRecvError {
    /// No state has been published since the last receive.
    #[error("no pending state")]
    Empty,
    /// Every `Bus` handle has been dropped; no further states will arrive.
    #[error("bus closed")]
    Closed,
    /// The subscriber fell behind and missed this many states.
    #[error("subscriber lagged, skipped {0} states")]
    Lagged(u64),
}

#[derive(Debug)]
struct Shared<T> {
    /// Current state, readable at any time via `snapshot`.
    state: Mutex<T>,
    /// The state the bus was created with, republished by `reset`.
    initial: T,
    /// Transmission point for state transitions.
    sender: broadcast::Sender<T>,
}

/// Cloneable handle that owns the current state and broadcasts transitions.
#[derive(Debug)]
pub struct Bus<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Bus<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Clone> Bus<T> {
    /// Create a bus holding `initial` as its current state.
    #[must_use]
    pub fn new(initial: T) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(initial.clone()),
                initial,
                sender,
            }),
        }
    }

    /// Replace the current state and broadcast it to all subscribers.
    ///
    /// Publishing never fails: without live subscribers the snapshot is
    /// still updated for anyone subscribing later.
    pub fn publish(&self, next: T) {
        let mut state = self
            .shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *state = next.clone();
        drop(state);
        let receivers = self.shared.sender.send(next).unwrap_or(0);
        debug!(receivers, "published state transition");
    }

    /// The current state.
    #[must_use]
    pub fn snapshot(&self) -> T {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Publish the initial state again, returning the bus to its created
    /// form. Subscribers observe this as an ordinary transition.
    pub fn reset(&self) {
        self.publish(self.shared.initial.clone());
    }

    /// Register a new subscriber. It receives states published from this
    /// point on; dropping it unsubscribes. Pair with [`Bus::snapshot`] to
    /// catch up on the current state first.
    #[must_use]
    pub fn subscribe(&self) -> Subscriber<T> {
        Subscriber {
            receiver: self.shared.sender.subscribe(),
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.sender.receiver_count()
    }
}

/// Receiving half registered against a [`Bus`]. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscriber<T> {
    receiver: broadcast::Receiver<T>,
}

impl<T: Clone> Subscriber<T> {
    /// Wait for the next published state.
    ///
    /// # Errors
    ///
    /// [`RecvError::Closed`] once every `Bus` handle has been dropped,
    /// [`RecvError::Lagged`] when this subscriber fell behind the channel
    /// capacity; the next call resumes from the oldest retained state.
    pub async fn recv(&mut self) -> Result<T, RecvError> {
        self.receiver.recv().await.map_err(|err| match err {
            broadcast::error::RecvError::Closed => RecvError::Closed,
            broadcast::error::RecvError::Lagged(skipped) => RecvError::Lagged(skipped),
        })
    }

    /// Take the next published state without waiting.
    ///
    /// # Errors
    ///
    /// [`TryRecvError::Empty`] when nothing is pending, otherwise as
    /// [`Subscriber::recv`].
    pub fn try_recv(&mut self) -> Result<T, TryRecvError> {
        self.receiver.try_recv().map_err(|err| match err {
            broadcast::error::TryRecvError::Empty => TryRecvError::Empty,
            broadcast::error::TryRecvError::Closed => TryRecvError::Closed,
            broadcast::error::TryRecvError::Lagged(skipped) => TryRecvError::Lagged(skipped),
        })
    }
}
