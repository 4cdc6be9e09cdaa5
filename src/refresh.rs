//! Dashboard-wide refresh broadcast.
//!
//! One documented event, `dashboard:refresh`, no payload. Any widget may
//! publish it (a manual refresh button, a mutation elsewhere on the page);
//! every subscriber invalidates and refetches on receipt. Subscribers that
//! lag just miss ticks — refreshes are read-only, so a missed tick only
//! delays staleness recovery until the next one.

use tokio::sync::broadcast;

/// Documented event name, for hosts that bridge the bus onto their own
/// event system.
pub const REFRESH_EVENT: &str = "dashboard:refresh";

/// Buffer a handful of ticks; anything more is already redundant.
const CHANNEL_CAPACITY: usize = 8;

#[derive(Clone)]
pub struct RefreshBus {
    sender: broadcast::Sender<()>,
}

impl RefreshBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Broadcast one refresh tick. Returns the number of live subscribers.
    pub fn publish(&self) -> usize {
        match self.sender.send(()) {
            Ok(n) => n,
            Err(_) => 0, // no subscribers mounted right now
        }
    }

    /// Subscribe at mount; drop the receiver to unsubscribe at unmount.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }
}

impl Default for RefreshBus {
    fn default() -> Self {
        Self::new()
    }
}
