// ==========================================
// Seguimiento - change notification
// ==========================================
// Broadcast pub/sub over tracking-state writes. No payload
// filtering by request: every subscriber sees every write and
// reacts with a full recompute, which makes duplicate delivery
// a correctness no-op (only a wasted read).
// ==========================================

use tokio::sync::broadcast;

/// Event published after every successful tracking save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingChanged {
    pub request_id: i64,
}

/// Broadcast channel for tracking-state changes.
///
/// Views and the statistics engine subscribe; the tracking store
/// notifies. Slow subscribers may observe lag (missed events are
/// acceptable: the next event triggers the same full recompute).
#[derive(Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<TrackingChanged>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TrackingChanged> {
        self.tx.subscribe()
    }

    /// Publish a change. Fire-and-forget: with no subscribers the
    /// event is dropped, which is not an error.
    pub fn notify(&self, event: TrackingChanged) {
        match self.tx.send(event) {
            Ok(receivers) => {
                tracing::debug!(receivers, "tracking change broadcast");
            }
            Err(_) => {
                tracing::debug!("tracking change dropped: no subscribers");
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        // enough headroom for bursts of saves between view refreshes
        Self::new(64)
    }
}
