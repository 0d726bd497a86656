//! Live subscription bookkeeping.
//!
//! A [`TrackingSession`] owns the two update tasks of one tracking run and
//! the cancellation token that ends them. At most one session exists per
//! tracker, so at most one position and one heading subscription are live.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use super::options::TrackingOptions;
use super::state::LocationState;
use super::throttle::UpdateThrottle;
use crate::coord::{Heading, PositionFix};
use crate::geofence::GeofenceEvaluator;
use crate::proximity::ProximityNotifier;

/// Destination and notifier a session evaluates against.
#[derive(Debug, Clone)]
pub(crate) struct ProximityTarget {
    pub destination: Option<String>,
    pub notifier: Option<ProximityNotifier>,
}

impl ProximityTarget {
    /// Whether this target has the same destination and notifier channel.
    pub fn matches(&self, destination: Option<&str>, notifier: Option<&ProximityNotifier>) -> bool {
        let same_notifier = match (&self.notifier, notifier) {
            (Some(a), Some(b)) => a.same_channel(b),
            (None, None) => true,
            _ => false,
        };
        self.destination.as_deref() == destination && same_notifier
    }
}

/// One tracking run: a position task, a heading task and their cancellation.
pub(crate) struct TrackingSession {
    target: ProximityTarget,
    cancellation: CancellationToken,
    location_task: Option<JoinHandle<()>>,
    heading_task: Option<JoinHandle<()>>,
}

impl TrackingSession {
    /// Create an empty session for `target`; tasks are attached as their
    /// subscriptions come up.
    pub fn new(target: ProximityTarget) -> Self {
        Self {
            target,
            cancellation: CancellationToken::new(),
            location_task: None,
            heading_task: None,
        }
    }

    pub fn target(&self) -> &ProximityTarget {
        &self.target
    }

    /// Spawn the task draining the position subscription.
    pub fn attach_positions(
        &mut self,
        positions: mpsc::Receiver<PositionFix>,
        evaluator: GeofenceEvaluator,
        state: Arc<LocationState>,
        options: TrackingOptions,
    ) {
        let worker = LocationWorker {
            target: self.target.clone(),
            evaluator,
            state,
            throttle: UpdateThrottle::new(&options),
        };
        self.location_task = Some(tokio::spawn(
            worker.run(positions, self.cancellation.clone()),
        ));
    }

    /// Spawn the task draining the heading subscription.
    pub fn attach_headings(&mut self, headings: mpsc::Receiver<Heading>, state: Arc<LocationState>) {
        self.heading_task = Some(tokio::spawn(run_heading_updates(
            headings,
            state,
            self.cancellation.clone(),
        )));
    }

    /// Whether both subscriptions are still being drained.
    pub fn is_live(&self) -> bool {
        let running = |task: &Option<JoinHandle<()>>| task.as_ref().is_some_and(|t| !t.is_finished());
        running(&self.location_task) && running(&self.heading_task)
    }

    /// Cancel both tasks and wait for them to finish.
    ///
    /// Once this returns the subscription receivers are dropped and no event
    /// from this session can still be delivered.
    pub async fn stop(mut self) {
        self.cancellation.cancel();
        for task in [self.location_task.take(), self.heading_task.take()]
            .into_iter()
            .flatten()
        {
            if let Err(e) = task.await {
                warn!(error = %e, "Tracking task ended abnormally");
            }
        }
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        // Tasks observe the token and release their receivers on their own
        self.cancellation.cancel();
    }
}

/// State owned by the position task.
struct LocationWorker {
    target: ProximityTarget,
    evaluator: GeofenceEvaluator,
    state: Arc<LocationState>,
    throttle: UpdateThrottle,
}

impl LocationWorker {
    async fn run(mut self, mut positions: mpsc::Receiver<PositionFix>, cancellation: CancellationToken) {
        let mut received: u64 = 0;
        let mut published: u64 = 0;

        loop {
            let fix = tokio::select! {
                biased;
                _ = cancellation.cancelled() => break,
                fix = positions.recv() => match fix {
                    Some(fix) => fix,
                    None => {
                        error!("Location tracking unavailable: position feed closed by provider");
                        break;
                    }
                },
            };
            received += 1;

            if !fix.is_valid() {
                debug!(
                    lat = fix.coordinate.latitude,
                    lon = fix.coordinate.longitude,
                    "Dropping invalid position fix"
                );
                continue;
            }

            if !self.throttle.should_emit(fix.coordinate, Instant::now()) {
                trace!(received, "Position update throttled");
                continue;
            }
            published += 1;
            self.handle_fix(fix);
        }

        debug!(received, published, "Position updates stopped");
    }

    fn handle_fix(&self, fix: PositionFix) {
        trace!(
            lat = fix.coordinate.latitude,
            lon = fix.coordinate.longitude,
            accuracy_m = ?fix.accuracy_m,
            "Position update"
        );

        // Dispatch first: a reader woken by the new location must find its
        // arrival event already queued.
        if let (Some(destination), Some(notifier)) =
            (self.target.destination.as_deref(), self.target.notifier.as_ref())
        {
            self.evaluator.evaluate(destination, &fix.coordinate, notifier);
        }

        self.state.publish_location(fix.coordinate);
    }
}

async fn run_heading_updates(
    mut headings: mpsc::Receiver<Heading>,
    state: Arc<LocationState>,
    cancellation: CancellationToken,
) {
    let mut received: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => break,
            heading = headings.recv() => match heading {
                Some(heading) if heading.is_finite() => {
                    received += 1;
                    state.publish_heading(heading);
                }
                Some(heading) => {
                    debug!(degrees = heading.degrees(), "Dropping non-finite heading");
                }
                None => {
                    error!("Location tracking unavailable: heading feed closed by provider");
                    break;
                }
            },
        }
    }

    debug!(received, "Heading updates stopped");
}
