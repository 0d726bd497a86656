//! In-process location provider driven by pushed samples.
//!
//! Used by the test suite and by the CLI `replay` command. Behaves like a
//! platform provider: permission can be granted or denied, subscriptions can
//! be made to fail, and samples pushed in are fanned out to every live
//! subscription.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use super::error::{StreamKind, TrackingError};
use super::options::TrackingOptions;
use super::provider::{BoxFuture, LocationProvider, PermissionStatus};
use crate::coord::{Heading, PositionFix};

/// Buffered samples per subscription before new ones are dropped.
pub const SUBSCRIPTION_BUFFER: usize = 64;

/// Scriptable [`LocationProvider`].
#[derive(Debug)]
pub struct SimulatedProvider {
    permission: Mutex<PermissionStatus>,
    position_failure: Mutex<Option<String>>,
    heading_failure: Mutex<Option<String>>,
    positions: Mutex<Vec<mpsc::Sender<PositionFix>>>,
    headings: Mutex<Vec<mpsc::Sender<Heading>>>,
    last_options: Mutex<Option<TrackingOptions>>,
    permission_requests: AtomicUsize,
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedProvider {
    /// Create a provider that grants permission.
    pub fn new() -> Self {
        Self {
            permission: Mutex::new(PermissionStatus::Granted),
            position_failure: Mutex::new(None),
            heading_failure: Mutex::new(None),
            positions: Mutex::new(Vec::new()),
            headings: Mutex::new(Vec::new()),
            last_options: Mutex::new(None),
            permission_requests: AtomicUsize::new(0),
        }
    }

    /// Create a provider whose permission prompt is refused.
    pub fn denying() -> Self {
        let provider = Self::new();
        provider.set_permission(PermissionStatus::Denied);
        provider
    }

    /// Change the outcome of future permission requests.
    pub fn set_permission(&self, status: PermissionStatus) {
        *self.permission.lock() = status;
    }

    /// Make the next position subscriptions fail with `reason` (`None` clears).
    pub fn fail_position_subscriptions(&self, reason: Option<&str>) {
        *self.position_failure.lock() = reason.map(str::to_string);
    }

    /// Make the next heading subscriptions fail with `reason` (`None` clears).
    pub fn fail_heading_subscriptions(&self, reason: Option<&str>) {
        *self.heading_failure.lock() = reason.map(str::to_string);
    }

    /// Deliver a position sample to every live subscription.
    ///
    /// Returns how many subscriptions accepted it.
    pub fn push_position(&self, fix: impl Into<PositionFix>) -> usize {
        fan_out(&self.positions, fix.into(), StreamKind::Position)
    }

    /// Deliver a heading sample to every live subscription.
    pub fn push_heading(&self, heading: Heading) -> usize {
        fan_out(&self.headings, heading, StreamKind::Heading)
    }

    /// End every open subscription, as a platform does when location
    /// services are switched off mid-session.
    pub fn close_feeds(&self) {
        self.positions.lock().clear();
        self.headings.lock().clear();
    }

    /// Position subscriptions whose receiver is still alive.
    pub fn active_position_subscriptions(&self) -> usize {
        count_live(&self.positions)
    }

    /// Heading subscriptions whose receiver is still alive.
    pub fn active_heading_subscriptions(&self) -> usize {
        count_live(&self.headings)
    }

    /// Number of permission prompts shown so far.
    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::Relaxed)
    }

    /// Options passed with the most recent position subscription.
    pub fn last_options(&self) -> Option<TrackingOptions> {
        *self.last_options.lock()
    }
}

impl LocationProvider for SimulatedProvider {
    fn request_permission(&self) -> BoxFuture<'_, PermissionStatus> {
        Box::pin(async move {
            self.permission_requests.fetch_add(1, Ordering::Relaxed);
            *self.permission.lock()
        })
    }

    fn watch_position(
        &self,
        options: TrackingOptions,
    ) -> BoxFuture<'_, Result<mpsc::Receiver<PositionFix>, TrackingError>> {
        Box::pin(async move {
            if let Some(reason) = self.position_failure.lock().clone() {
                return Err(TrackingError::subscription(StreamKind::Position, reason));
            }
            *self.last_options.lock() = Some(options);
            let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
            self.positions.lock().push(tx);
            debug!(accuracy = %options.accuracy, "Simulated position subscription opened");
            Ok(rx)
        })
    }

    fn watch_heading(&self) -> BoxFuture<'_, Result<mpsc::Receiver<Heading>, TrackingError>> {
        Box::pin(async move {
            if let Some(reason) = self.heading_failure.lock().clone() {
                return Err(TrackingError::subscription(StreamKind::Heading, reason));
            }
            let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
            self.headings.lock().push(tx);
            debug!("Simulated heading subscription opened");
            Ok(rx)
        })
    }
}

/// Send `value` to all open senders, pruning released subscriptions.
fn fan_out<T: Clone>(senders: &Mutex<Vec<mpsc::Sender<T>>>, value: T, stream: StreamKind) -> usize {
    let mut senders = senders.lock();
    senders.retain(|tx| !tx.is_closed());

    let mut delivered = 0;
    for tx in senders.iter() {
        match tx.try_send(value.clone()) {
            Ok(()) => delivered += 1,
            Err(TrySendError::Full(_)) => {
                warn!(%stream, "Subscription buffer full, dropping sample");
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }
    delivered
}

fn count_live<T>(senders: &Mutex<Vec<mpsc::Sender<T>>>) -> usize {
    senders.lock().iter().filter(|tx| !tx.is_closed()).count()
}
