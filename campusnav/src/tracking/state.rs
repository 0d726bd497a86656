//! Observable location state.
//!
//! The current location, heading and navigation flag are published through
//! `tokio::sync::watch` channels. The tracker owns the only [`LocationState`]
//! (the writer); everything else holds receivers, which always see the last
//! delivered value and nothing fresher.

use tokio::sync::watch;

use crate::coord::{Coordinate, Heading};

/// Writer side of the shared location values.
#[derive(Debug)]
pub struct LocationState {
    location: watch::Sender<Option<Coordinate>>,
    heading: watch::Sender<Option<Heading>>,
    navigation_active: watch::Sender<bool>,
}

impl Default for LocationState {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationState {
    /// Create state with no location, no heading and navigation inactive.
    pub fn new() -> Self {
        let (location, _) = watch::channel(None);
        let (heading, _) = watch::channel(None);
        let (navigation_active, _) = watch::channel(false);
        Self {
            location,
            heading,
            navigation_active,
        }
    }

    pub(crate) fn publish_location(&self, coordinate: Coordinate) {
        self.location.send_replace(Some(coordinate));
    }

    pub(crate) fn publish_heading(&self, heading: Heading) {
        self.heading.send_replace(Some(heading));
    }

    pub(crate) fn set_navigation_active(&self, active: bool) {
        self.navigation_active.send_if_modified(|current| {
            let changed = *current != active;
            *current = active;
            changed
        });
    }

    /// Subscribe to location updates.
    pub fn location(&self) -> watch::Receiver<Option<Coordinate>> {
        self.location.subscribe()
    }

    /// Subscribe to heading updates.
    pub fn heading(&self) -> watch::Receiver<Option<Heading>> {
        self.heading.subscribe()
    }

    /// Subscribe to the navigation-active flag.
    pub fn navigation_active(&self) -> watch::Receiver<bool> {
        self.navigation_active.subscribe()
    }

    /// Last published location.
    pub fn current_location(&self) -> Option<Coordinate> {
        *self.location.borrow()
    }

    /// Last published heading.
    pub fn current_heading(&self) -> Option<Heading> {
        *self.heading.borrow()
    }
}
