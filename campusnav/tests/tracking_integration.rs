//! End-to-end tracking tests against the bundled campus boundaries.
//!
//! Each test drives a `LocationTracker` through a `SimulatedProvider` and
//! observes the outcome the way a navigation controller would: through the
//! proximity receiver and the location watch channels.

use std::sync::Arc;
use std::time::Duration;

use campusnav::coord::{Coordinate, Heading};
use campusnav::geofence::{BoundaryRegistry, GeofenceEvaluator};
use campusnav::proximity::{ProximityEvent, ProximityNotifier, ProximityReceiver};
use campusnav::tracking::{
    LocationProvider, LocationTracker, PermissionStatus, SimulatedProvider, TrackingOptions,
    TrackingRequest, TrackingStatus,
};

// =============================================================================
// Fixtures
// =============================================================================

const ADMIN_ENTRANCE: Coordinate = Coordinate::new(12.283828309006749, 76.64158989783473);
const ADMIN_LOBBY: Coordinate = Coordinate::new(12.283878309006749, 76.64158989783473);
const GJB_COURTYARD: Coordinate = Coordinate::new(12.2812, 76.6407);
const TRULIT_GATE: Coordinate = Coordinate::new(12.2759, 76.64327);
const MAIN_ROAD: Coordinate = Coordinate::new(12.2790, 76.6420);

const EVENT_TIMEOUT: Duration = Duration::from_secs(2);

fn setup(options: TrackingOptions) -> (Arc<SimulatedProvider>, LocationTracker) {
    let registry = Arc::new(BoundaryRegistry::campus_default().expect("bundled boundaries"));
    let provider = Arc::new(SimulatedProvider::new());
    let dyn_provider: Arc<dyn LocationProvider> = provider.clone();
    let tracker =
        LocationTracker::new(dyn_provider, GeofenceEvaluator::new(registry)).with_options(options);
    (provider, tracker)
}

async fn next_event(rx: &mut ProximityReceiver) -> ProximityEvent {
    tokio::time::timeout(EVENT_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for proximity event")
        .expect("proximity channel closed")
}

/// Push a fix that lands outside every boundary and wait until the tracker
/// has published it, so everything pushed before it has been processed.
async fn flush(provider: &SimulatedProvider, tracker: &LocationTracker) {
    let mut location = tracker.location();
    provider.push_position(MAIN_ROAD);
    tokio::time::timeout(EVENT_TIMEOUT, location.wait_for(|c| *c == Some(MAIN_ROAD)))
        .await
        .expect("timed out waiting for location")
        .expect("location channel closed");
}

// =============================================================================
// Arrival
// =============================================================================

#[tokio::test]
async fn test_arrival_emits_event_per_inside_sample() {
    let (provider, tracker) = setup(TrackingOptions::unthrottled());
    let (notifier, mut arrivals) = ProximityNotifier::channel();

    let status = tracker
        .reconcile(TrackingRequest::navigate("NIE Admin", notifier))
        .await;
    assert_eq!(
        status,
        TrackingStatus::Active {
            destination: "NIE Admin".to_string()
        }
    );

    provider.push_position(MAIN_ROAD);
    provider.push_position(ADMIN_ENTRANCE);
    provider.push_position(ADMIN_ENTRANCE);

    let first = next_event(&mut arrivals).await;
    let second = next_event(&mut arrivals).await;
    assert_eq!(first.destination, "NIE Admin");
    assert_eq!(first.coordinate, ADMIN_ENTRANCE);
    assert_eq!((first.sequence, second.sequence), (1, 2));

    tracker.stop().await;
}

#[tokio::test]
async fn test_samples_near_other_destinations_are_ignored() {
    let (provider, tracker) = setup(TrackingOptions::unthrottled());
    let (notifier, mut arrivals) = ProximityNotifier::channel();

    tracker
        .start(Some("TruLit Herbals".to_string()), Some(notifier))
        .await
        .unwrap();

    provider.push_position(ADMIN_ENTRANCE);
    provider.push_position(GJB_COURTYARD);
    provider.push_position(TRULIT_GATE);

    let event = next_event(&mut arrivals).await;
    assert_eq!(event.destination, "TruLit Herbals");
    assert_eq!(event.sequence, 1);

    tracker.stop().await;
}

#[tokio::test]
async fn test_unregistered_destination_never_arrives() {
    let (provider, tracker) = setup(TrackingOptions::unthrottled());
    let (notifier, mut arrivals) = ProximityNotifier::channel();

    tracker
        .start(Some("Library".to_string()), Some(notifier))
        .await
        .unwrap();

    provider.push_position(ADMIN_ENTRANCE);
    provider.push_position(GJB_COURTYARD);
    flush(&provider, &tracker).await;

    assert!(arrivals.drain().is_empty());
    tracker.stop().await;
}

// =============================================================================
// Session replacement
// =============================================================================

#[tokio::test]
async fn test_destination_switch_leaves_single_session() {
    let (provider, tracker) = setup(TrackingOptions::unthrottled());
    let (notifier, mut arrivals) = ProximityNotifier::channel();

    tracker
        .reconcile(TrackingRequest::navigate("NIE Admin", notifier.clone()))
        .await;
    provider.push_position(ADMIN_ENTRANCE);
    assert_eq!(next_event(&mut arrivals).await.destination, "NIE Admin");

    tracker
        .reconcile(TrackingRequest::navigate("GJB", notifier))
        .await;
    assert_eq!(provider.active_position_subscriptions(), 1);
    assert_eq!(provider.active_heading_subscriptions(), 1);

    // Every sample goes through the single new session, evaluated against GJB
    assert_eq!(provider.push_position(ADMIN_ENTRANCE), 1);
    assert_eq!(provider.push_position(GJB_COURTYARD), 1);

    let event = next_event(&mut arrivals).await;
    assert_eq!(event.destination, "GJB");
    assert_eq!(event.coordinate, GJB_COURTYARD);

    tracker.stop().await;
    assert_eq!(provider.active_position_subscriptions(), 0);
    assert_eq!(provider.active_heading_subscriptions(), 0);
}

#[tokio::test]
async fn test_navigation_end_stops_updates() {
    let (provider, tracker) = setup(TrackingOptions::unthrottled());
    let (notifier, mut arrivals) = ProximityNotifier::channel();

    tracker
        .reconcile(TrackingRequest::navigate("NIE Admin", notifier))
        .await;
    flush(&provider, &tracker).await;

    let status = tracker.reconcile(TrackingRequest::idle()).await;
    assert_eq!(status, TrackingStatus::Idle);
    assert_eq!(provider.push_position(ADMIN_ENTRANCE), 0);
    assert_eq!(provider.push_heading(Heading::new(10.0)), 0);

    assert!(arrivals.drain().is_empty());
    assert_eq!(tracker.current_location(), Some(MAIN_ROAD));
}

// =============================================================================
// Rate limiting
// =============================================================================

#[tokio::test]
async fn test_distance_interval_drops_stationary_samples() {
    let options = TrackingOptions::unthrottled().with_distance_interval_m(2.0);
    let (provider, tracker) = setup(options);
    let (notifier, mut arrivals) = ProximityNotifier::channel();

    tracker
        .start(Some("NIE Admin".to_string()), Some(notifier))
        .await
        .unwrap();

    provider.push_position(ADMIN_ENTRANCE);
    provider.push_position(ADMIN_ENTRANCE);
    provider.push_position(ADMIN_LOBBY);

    let first = next_event(&mut arrivals).await;
    let second = next_event(&mut arrivals).await;
    assert_eq!(first.coordinate, ADMIN_ENTRANCE);
    assert_eq!(second.coordinate, ADMIN_LOBBY);

    flush(&provider, &tracker).await;
    assert!(arrivals.drain().is_empty());

    tracker.stop().await;
}

// =============================================================================
// Permission
// =============================================================================

#[tokio::test]
async fn test_denied_permission_then_granted() {
    let (provider, tracker) = setup(TrackingOptions::unthrottled());
    provider.set_permission(PermissionStatus::Denied);
    let (notifier, mut arrivals) = ProximityNotifier::channel();

    let status = tracker
        .reconcile(TrackingRequest::navigate("NIE Admin", notifier.clone()))
        .await;
    assert_eq!(status, TrackingStatus::PermissionDenied);
    assert_eq!(provider.push_position(ADMIN_ENTRANCE), 0);
    assert!(tracker.current_location().is_none());
    assert!(arrivals.try_recv().is_none());

    // Denial is not retried on its own; the next request asks again
    provider.set_permission(PermissionStatus::Granted);
    let status = tracker
        .reconcile(TrackingRequest::navigate("NIE Admin", notifier))
        .await;
    assert!(matches!(status, TrackingStatus::Active { .. }));
    assert_eq!(provider.permission_requests(), 2);

    provider.push_position(ADMIN_ENTRANCE);
    assert_eq!(next_event(&mut arrivals).await.sequence, 1);
    tracker.stop().await;
}
