//! Deferred writes of compiled CSS.
//!
//! Recomputation only records what changed. Writing to the injection target
//! happens later, once per burst of changes: the registry posts a
//! [`FlushRequest`] through a [`FlushContext`] and whoever owns the
//! [`FlushReceiver`] calls [`FontManager::flush`](crate::FontManager::flush).
//!
//! Under a tokio runtime that is [`run_flush_loop`], spawned on a
//! `LocalSet` because the engine is single-threaded. The loop only holds a
//! weak handle, so it ends once the last [`FontManager`](crate::FontManager)
//! is dropped:
//!
//! ```ignore
//! let (flush, receiver) = fontsync::flush::channel();
//! let manager = FontManager::new(Box::new(target), flush);
//! tokio::task::spawn_local(run_flush_loop(receiver, manager.downgrade()));
//! ```
//!
//! Hosts without a runtime call [`FlushReceiver::drain`] from their own loop.

use tokio::sync::mpsc;

use crate::manager::WeakFontManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushRequest;

/// Posts flush requests. Cheap to clone.
#[derive(Clone, Debug)]
pub struct FlushContext {
    sender: mpsc::UnboundedSender<FlushRequest>,
}

impl FlushContext {
    /// Returns `false` if nobody is listening any more.
    pub fn request(&self) -> bool {
        self.sender.send(FlushRequest).is_ok()
    }
}

#[derive(Debug)]
pub struct FlushReceiver {
    receiver: mpsc::UnboundedReceiver<FlushRequest>,
}

impl FlushReceiver {
    /// Waits for a request, then swallows any others already queued.
    pub async fn recv(&mut self) -> Option<FlushRequest> {
        let request = self.receiver.recv().await?;
        while self.receiver.try_recv().is_ok() {}
        Some(request)
    }

    /// Takes every queued request without waiting. Returns how many there were.
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        while self.receiver.try_recv().is_ok() {
            count += 1;
        }
        count
    }
}

pub fn channel() -> (FlushContext, FlushReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (FlushContext { sender }, FlushReceiver { receiver })
}

/// Flushes `manager` once per wake-up until the engine or every
/// [`FlushContext`] is gone.
pub async fn run_flush_loop(mut receiver: FlushReceiver, manager: WeakFontManager) {
    while receiver.recv().await.is_some() {
        let Some(manager) = manager.upgrade() else {
            break;
        };
        let written = manager.flush();
        log::trace!("flushed {written} style element(s)");
    }
    log::debug!("flush loop stopped");
}
