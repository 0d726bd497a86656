//! Location tracker: session lifecycle and controller entry point.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info};

use super::error::TrackingError;
use super::options::TrackingOptions;
use super::provider::{LocationProvider, PermissionStatus};
use super::session::{ProximityTarget, TrackingSession};
use super::state::LocationState;
use crate::coord::{Coordinate, Heading};
use crate::geofence::GeofenceEvaluator;
use crate::proximity::ProximityNotifier;

/// Desired tracking state, as supplied by the navigation controller.
#[derive(Debug, Clone, Default)]
pub struct TrackingRequest {
    /// Whether the user is currently navigating.
    pub navigation_active: bool,
    /// Destination to watch for.
    pub destination: Option<String>,
    /// Where arrival events go.
    pub notifier: Option<ProximityNotifier>,
}

impl TrackingRequest {
    /// Request active navigation towards `destination`.
    pub fn navigate(destination: impl Into<String>, notifier: ProximityNotifier) -> Self {
        Self {
            navigation_active: true,
            destination: Some(destination.into()),
            notifier: Some(notifier),
        }
    }

    /// Request that tracking stops.
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Result of [`LocationTracker::reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingStatus {
    /// Not tracking (navigation inactive or no destination).
    Idle,
    /// Subscriptions are live for `destination`.
    Active { destination: String },
    /// The user refused location permission.
    PermissionDenied,
    /// Subscriptions could not be established.
    Unavailable { reason: String },
}

/// Owns the platform subscriptions and the observable location state.
///
/// The tracker is the sole writer of [`LocationState`]. Consumers read via
/// [`location`](Self::location), [`heading`](Self::heading) and
/// [`navigation_active`](Self::navigation_active).
///
/// # Example
///
/// ```ignore
/// let tracker = LocationTracker::new(provider, evaluator);
/// let (notifier, mut arrivals) = ProximityNotifier::channel();
///
/// let status = tracker
///     .reconcile(TrackingRequest::navigate("GJB", notifier))
///     .await;
/// ```
pub struct LocationTracker {
    provider: Arc<dyn LocationProvider>,
    evaluator: GeofenceEvaluator,
    options: TrackingOptions,
    state: Arc<LocationState>,
    session: Mutex<Option<TrackingSession>>,
}

impl LocationTracker {
    /// Create a tracker with default subscription options.
    pub fn new(provider: Arc<dyn LocationProvider>, evaluator: GeofenceEvaluator) -> Self {
        Self {
            provider,
            evaluator,
            options: TrackingOptions::default(),
            state: Arc::new(LocationState::new()),
            session: Mutex::new(None),
        }
    }

    /// Use custom subscription options for future sessions.
    pub fn with_options(mut self, options: TrackingOptions) -> Self {
        self.options = options;
        self
    }

    /// Subscription options in use.
    pub fn options(&self) -> &TrackingOptions {
        &self.options
    }

    /// Start a session, replacing any running one.
    ///
    /// The previous session is fully stopped before permission is requested,
    /// so two sessions never overlap. Failures are logged here and returned;
    /// nothing is retried.
    pub async fn start(
        &self,
        destination: Option<String>,
        notifier: Option<ProximityNotifier>,
    ) -> Result<(), TrackingError> {
        let mut session = self.session.lock().await;
        self.replace_session(
            &mut session,
            ProximityTarget {
                destination,
                notifier,
            },
        )
        .await
    }

    /// Stop tracking. A no-op when nothing is running.
    ///
    /// Waits for any `start` or `reconcile` in progress, including one blocked
    /// on the platform permission prompt. The session it opens is then torn
    /// down here.
    pub async fn stop(&self) {
        let mut session = self.session.lock().await;
        if let Some(previous) = session.take() {
            previous.stop().await;
            info!("Location tracking stopped");
        }
    }

    /// Bring the tracker in line with the controller's request.
    ///
    /// Tracking runs only while navigation is active and a destination is
    /// set. A different destination or notifier rebuilds the session; an
    /// identical request leaves a live session untouched. Errors are reduced
    /// to a status value.
    ///
    /// The session lock is held while the permission prompt is open, so a
    /// concurrent `stop` or idle request takes effect once the user answers.
    pub async fn reconcile(&self, request: TrackingRequest) -> TrackingStatus {
        self.state.set_navigation_active(request.navigation_active);

        let destination = match (request.navigation_active, request.destination) {
            (true, Some(destination)) => destination,
            _ => {
                self.stop().await;
                return TrackingStatus::Idle;
            }
        };

        let mut session = self.session.lock().await;
        if let Some(current) = session.as_ref() {
            if current.is_live()
                && current
                    .target()
                    .matches(Some(destination.as_str()), request.notifier.as_ref())
            {
                debug!(destination = %destination, "Tracking request unchanged");
                return TrackingStatus::Active { destination };
            }
        }

        let target = ProximityTarget {
            destination: Some(destination.clone()),
            notifier: request.notifier,
        };
        match self.replace_session(&mut session, target).await {
            Ok(()) => TrackingStatus::Active { destination },
            Err(TrackingError::PermissionDenied) => TrackingStatus::PermissionDenied,
            Err(e) => TrackingStatus::Unavailable {
                reason: e.to_string(),
            },
        }
    }

    async fn replace_session(
        &self,
        slot: &mut Option<TrackingSession>,
        target: ProximityTarget,
    ) -> Result<(), TrackingError> {
        if let Some(previous) = slot.take() {
            debug!(
                destination = ?previous.target().destination,
                "Tearing down previous tracking session"
            );
            previous.stop().await;
        }

        let destination = target.destination.clone();
        let session = self.open_session(target).await.inspect_err(|e| {
            error!(error = %e, "Location tracking unavailable");
        })?;
        *slot = Some(session);

        info!(
            destination = ?destination,
            accuracy = %self.options.accuracy,
            distance_interval_m = self.options.distance_interval_m,
            time_interval_ms = self.options.time_interval.as_millis() as u64,
            "Location tracking started"
        );
        Ok(())
    }

    async fn open_session(&self, target: ProximityTarget) -> Result<TrackingSession, TrackingError> {
        if self.provider.request_permission().await == PermissionStatus::Denied {
            return Err(TrackingError::PermissionDenied);
        }

        // Dropping `session` on an early return cancels whatever was attached
        let mut session = TrackingSession::new(target);

        let positions = self.provider.watch_position(self.options).await?;
        session.attach_positions(
            positions,
            self.evaluator.clone(),
            Arc::clone(&self.state),
            self.options,
        );

        let headings = match self.provider.watch_heading().await {
            Ok(headings) => headings,
            Err(e) => {
                session.stop().await;
                return Err(e);
            }
        };
        session.attach_headings(headings, Arc::clone(&self.state));

        Ok(session)
    }

    /// Whether a session is running with both feeds still open.
    ///
    /// A session whose provider closed a feed reports `false`; the next
    /// [`reconcile`](Self::reconcile) rebuilds it.
    pub async fn is_tracking(&self) -> bool {
        self.session.lock().await.as_ref().is_some_and(|s| s.is_live())
    }

    /// Destination of the running session, if any.
    pub async fn active_destination(&self) -> Option<String> {
        self.session
            .lock()
            .await
            .as_ref()
            .filter(|s| s.is_live())
            .and_then(|s| s.target().destination.clone())
    }

    /// Subscribe to location updates.
    pub fn location(&self) -> watch::Receiver<Option<Coordinate>> {
        self.state.location()
    }

    /// Subscribe to heading updates.
    pub fn heading(&self) -> watch::Receiver<Option<Heading>> {
        self.state.heading()
    }

    /// Subscribe to the navigation-active flag.
    pub fn navigation_active(&self) -> watch::Receiver<bool> {
        self.state.navigation_active()
    }

    /// Last published location.
    pub fn current_location(&self) -> Option<Coordinate> {
        self.state.current_location()
    }

    /// Last published heading.
    pub fn current_heading(&self) -> Option<Heading> {
        self.state.current_heading()
    }
}
