//! Proximity event channel.
//!
//! Arrival at a destination is reported as a [`ProximityEvent`] sent through a
//! [`ProximityNotifier`]. The navigation controller owns the matching
//! [`ProximityReceiver`] and reacts to events however the host app needs.
//!
//! The notifier also serves as the identity of the "proximity callback": the
//! tracker compares notifiers with [`ProximityNotifier::same_channel`] to
//! decide whether a request needs a fresh session.
//!
//! # Example
//!
//! ```ignore
//! let (notifier, mut events) = ProximityNotifier::channel();
//! tracker.start(Some("NIE Admin".into()), Some(notifier)).await?;
//!
//! while let Some(event) = events.recv().await {
//!     println!("arrived at {} (#{})", event.destination, event.sequence);
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::coord::Coordinate;

/// A location sample landed inside the destination's boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityEvent {
    /// Destination whose boundary contains the sample.
    pub destination: String,
    /// The sample that triggered the event.
    pub coordinate: Coordinate,
    /// 1-based count of events sent through this channel.
    pub sequence: u64,
}

/// Sending half of a proximity channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ProximityNotifier {
    tx: mpsc::UnboundedSender<ProximityEvent>,
    sequence: Arc<AtomicU64>,
}

/// Receiving half of a proximity channel.
#[derive(Debug)]
pub struct ProximityReceiver {
    rx: mpsc::UnboundedReceiver<ProximityEvent>,
}

impl ProximityNotifier {
    /// Create a connected notifier/receiver pair.
    pub fn channel() -> (ProximityNotifier, ProximityReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            ProximityNotifier {
                tx,
                sequence: Arc::new(AtomicU64::new(0)),
            },
            ProximityReceiver { rx },
        )
    }

    /// Send an event for `destination`.
    ///
    /// Returns false when the receiver has been dropped. That is not an
    /// error: nobody is listening for arrivals any more.
    pub fn notify(&self, destination: &str, coordinate: Coordinate) -> bool {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let event = ProximityEvent {
            destination: destination.to_string(),
            coordinate,
            sequence,
        };
        match self.tx.send(event) {
            Ok(()) => true,
            Err(_) => {
                debug!(destination, "Proximity receiver dropped, event discarded");
                false
            }
        }
    }

    /// Whether both notifiers feed the same receiver.
    pub fn same_channel(&self, other: &ProximityNotifier) -> bool {
        self.tx.same_channel(&other.tx)
    }

    /// Whether the receiver has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl ProximityReceiver {
    /// Wait for the next event. Returns `None` once every notifier is gone.
    pub async fn recv(&mut self) -> Option<ProximityEvent> {
        self.rx.recv().await
    }

    /// Take the next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<ProximityEvent> {
        self.rx.try_recv().ok()
    }

    /// Take every event currently queued.
    pub fn drain(&mut self) -> Vec<ProximityEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_are_sequenced() {
        let (notifier, mut rx) = ProximityNotifier::channel();
        let here = Coordinate::new(1.0, 2.0);

        assert!(notifier.notify("GJB", here));
        assert!(notifier.clone().notify("GJB", here));

        let events = rx.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].sequence, 1);
        assert_eq!(events[1].sequence, 2);
        assert_eq!(events[1].destination, "GJB");
        assert_eq!(events[1].coordinate, here);
    }

    #[test]
    fn test_notify_after_receiver_dropped() {
        let (notifier, rx) = ProximityNotifier::channel();
        drop(rx);
        assert!(notifier.is_closed());
        assert!(!notifier.notify("GJB", Coordinate::new(0.0, 0.0)));
    }

    #[test]
    fn test_same_channel() {
        let (a, _rx_a) = ProximityNotifier::channel();
        let (b, _rx_b) = ProximityNotifier::channel();

        assert!(a.same_channel(&a.clone()));
        assert!(!a.same_channel(&b));
    }

    #[test]
    fn test_try_recv_empty() {
        let (_notifier, mut rx) = ProximityNotifier::channel();
        assert!(rx.try_recv().is_none());
    }
}
