//! Single-slot suspension gate for manually stepped playback.

use parking_lot::Mutex;
use tokio::sync::oneshot;

/// A single-slot rendezvous: `arm()` hands back a receiver that resolves when
/// `release()` fires, and `release()` with nothing armed is a no-op.
///
/// The playback run is strictly sequential, so at most one wait is ever
/// outstanding; a single slot (rather than a queue) makes that invariant
/// structural.
#[derive(Debug, Default)]
pub struct StepGate {
    slot: Mutex<Option<oneshot::Sender<()>>>,
}

impl StepGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the gate and return the signal to await. Any previously armed
    /// slot is dropped, which also resolves its receiver (with an error);
    /// callers treat either resolution as "wake up and re-check".
    pub fn arm(&self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        *self.slot.lock() = Some(tx);
        rx
    }

    /// Fire the armed slot, if any. Returns whether a wait was released;
    /// spurious calls are side-effect-free.
    pub fn release(&self) -> bool {
        match self.slot.lock().take() {
            Some(tx) => {
                // The receiver may already be gone if the run was abandoned.
                let _ = tx.send(());
                true
            }
            None => false,
        }
    }

    /// Drop the armed slot without firing it. The abandoned receiver wakes
    /// with a closed-channel error, letting a superseded run notice and
    /// bail out. Used by reset.
    pub fn clear(&self) {
        self.slot.lock().take();
    }

    pub fn is_armed(&self) -> bool {
        self.slot.lock().is_some()
    }
}
