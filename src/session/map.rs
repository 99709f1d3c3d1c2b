//! Map widget seam
//!
//! [`MapView`] is everything a map renderer needs from a session: where to
//! center, which pins to draw and the route line. [`MapWidget`] carries click
//! events the other way. A [`ClickSubscription`] is released when it is
//! dropped, so a session view that goes away can never be left registered.

use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

/// A labelled pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub coords: Coordinates,
    pub label: String,
}

/// Render input for the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinates,
    pub markers: Vec<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polyline: Option<Vec<Coordinates>>,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    subscribers: HashMap<u64, mpsc::UnboundedSender<Coordinates>>,
}

/// Fans map clicks out to subscribers
#[derive(Debug, Clone, Default)]
pub struct MapWidget {
    registry: Arc<Mutex<Registry>>,
}

impl MapWidget {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register for click events until the returned guard is dropped
    pub fn subscribe(&self) -> ClickSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut registry = self.registry();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.insert(id, tx);

        ClickSubscription {
            id,
            receiver: rx,
            widget: self.clone(),
        }
    }

    /// Deliver a click to every subscriber; returns how many received it
    pub fn emit_click(&self, coords: Coordinates) -> usize {
        let mut registry = self.registry();
        registry
            .subscribers
            .retain(|_, tx| tx.send(coords).is_ok());
        registry.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry().subscribers.len()
    }

    fn unsubscribe(&self, id: u64) {
        self.registry().subscribers.remove(&id);
    }
}

/// Live registration for map clicks
#[derive(Debug)]
pub struct ClickSubscription {
    id: u64,
    receiver: mpsc::UnboundedReceiver<Coordinates>,
    widget: MapWidget,
}

impl ClickSubscription {
    /// Next pending click, without waiting
    pub fn try_next(&mut self) -> Option<Coordinates> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the next click
    pub async fn next(&mut self) -> Option<Coordinates> {
        self.receiver.recv().await
    }
}

impl Drop for ClickSubscription {
    fn drop(&mut self) {
        self.widget.unsubscribe(self.id);
    }
}
