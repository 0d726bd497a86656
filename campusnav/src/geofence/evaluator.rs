//! Geofence evaluation and proximity dispatch.

use std::sync::Arc;

use tracing::{debug, trace};

use super::polygon::is_inside;
use super::registry::BoundaryRegistry;
use crate::coord::Coordinate;
use crate::proximity::ProximityNotifier;

/// Tests coordinates against registered destination boundaries.
///
/// The evaluator keeps no per-destination state: every sample that lands
/// inside the boundary produces one event, including repeated samples while
/// the user stays inside.
#[derive(Debug, Clone)]
pub struct GeofenceEvaluator {
    registry: Arc<BoundaryRegistry>,
}

impl GeofenceEvaluator {
    /// Create an evaluator over a shared registry.
    pub fn new(registry: Arc<BoundaryRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this evaluator reads from.
    pub fn registry(&self) -> &Arc<BoundaryRegistry> {
        &self.registry
    }

    /// Whether `point` is inside the boundary of `destination`.
    ///
    /// An unregistered destination is never "inside".
    pub fn contains(&self, destination: &str, point: &Coordinate) -> bool {
        match self.registry.get(destination) {
            Some(polygon) => is_inside(point, polygon),
            None => {
                trace!(destination, "Destination not registered, treating as outside");
                false
            }
        }
    }

    /// Evaluate a sample against `destination` and notify on containment.
    ///
    /// Returns whether the sample was inside.
    pub fn evaluate(
        &self,
        destination: &str,
        point: &Coordinate,
        notifier: &ProximityNotifier,
    ) -> bool {
        if !self.contains(destination, point) {
            return false;
        }

        debug!(
            destination,
            lat = point.latitude,
            lon = point.longitude,
            "Inside destination boundary"
        );
        notifier.notify(destination, *point);
        true
    }

    /// Every registered destination whose boundary contains `point`.
    pub fn destinations_containing(&self, point: &Coordinate) -> Vec<&str> {
        self.registry
            .iter()
            .filter(|(_, polygon)| is_inside(point, polygon))
            .map(|(name, _)| name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geofence::BoundaryPolygon;

    fn evaluator() -> GeofenceEvaluator {
        let square =
            BoundaryPolygon::from_pairs(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)])
                .unwrap();
        let strip = BoundaryPolygon::from_pairs(&[(4.0, -5.0), (4.0, 20.0), (6.0, 20.0), (6.0, -5.0)])
            .unwrap();
        let registry =
            BoundaryRegistry::from_entries(vec![("Square", square), ("Strip", strip)]).unwrap();
        GeofenceEvaluator::new(Arc::new(registry))
    }

    #[test]
    fn test_inside_sample_notifies() {
        let (notifier, mut rx) = ProximityNotifier::channel();
        assert!(evaluator().evaluate("Square", &Coordinate::new(5.0, 5.0), &notifier));

        let event = rx.try_recv().unwrap();
        assert_eq!(event.destination, "Square");
        assert_eq!(event.coordinate, Coordinate::new(5.0, 5.0));
    }

    #[test]
    fn test_outside_sample_does_not_notify() {
        let (notifier, mut rx) = ProximityNotifier::channel();
        assert!(!evaluator().evaluate("Square", &Coordinate::new(15.0, 15.0), &notifier));
        assert!(rx.try_recv().is_none());
    }

    #[test]
    fn test_unregistered_destination_never_notifies() {
        let (notifier, mut rx) = ProximityNotifier::channel();
        let evaluator = evaluator();

        for point in [
            Coordinate::new(5.0, 5.0),
            Coordinate::new(0.0, 0.0),
            Coordinate::new(-40.0, 100.0),
        ] {
            assert!(!evaluator.evaluate("Library", &point, &notifier));
        }
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn test_repeated_inside_samples_notify_every_time() {
        let (notifier, mut rx) = ProximityNotifier::channel();
        let evaluator = evaluator();
        let point = Coordinate::new(5.0, 5.0);

        for _ in 0..7 {
            evaluator.evaluate("Square", &point, &notifier);
        }

        let events = rx.drain();
        assert_eq!(events.len(), 7);
        assert_eq!(events.last().unwrap().sequence, 7);
    }

    #[test]
    fn test_destinations_containing() {
        let evaluator = evaluator();

        assert_eq!(
            evaluator.destinations_containing(&Coordinate::new(5.0, 5.0)),
            vec!["Square", "Strip"]
        );
        assert_eq!(
            evaluator.destinations_containing(&Coordinate::new(5.0, 15.0)),
            vec!["Strip"]
        );
        assert!(evaluator
            .destinations_containing(&Coordinate::new(50.0, 50.0))
            .is_empty());
    }
}
