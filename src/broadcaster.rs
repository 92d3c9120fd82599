// SPDX-License-Identifier: MIT
//! Event fan-out to subscribers.

use crate::watcher::ConnectivityEvent;
use tokio::sync::broadcast;

/// Broadcasts connectivity events to all subscribers.
///
/// Cheaply cloneable — all clones feed the same set of receivers.
#[derive(Debug, Clone)]
pub struct StatusBroadcaster {
    tx: broadcast::Sender<ConnectivityEvent>,
}

impl StatusBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Send an event to all subscribers.
    pub fn emit(&self, event: ConnectivityEvent) {
        // Ignore errors — no subscribers is fine
        let _ = self.tx.send(event);
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectivityEvent> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_to_every_subscriber() {
        let broadcaster = StatusBroadcaster::new(8);
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();

        broadcaster.emit(ConnectivityEvent::Offline);

        assert_eq!(first.recv().await.unwrap(), ConnectivityEvent::Offline);
        assert_eq!(second.recv().await.unwrap(), ConnectivityEvent::Offline);
    }

    #[test]
    fn emit_without_subscribers_is_harmless() {
        let broadcaster = StatusBroadcaster::new(8);
        broadcaster.emit(ConnectivityEvent::Online);
    }
}
