//! Backend readiness for renderers whose device arrives asynchronously.

use std::fmt;
use std::sync::mpsc::{self, Receiver, TryRecvError};

/// Lifecycle of a renderer backend.
///
/// `Uninitialized → Initializing → Ready`, or `→ Failed` from either of the
/// first two. Any state may move to `Disposed`, which is terminal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Readiness {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
    Disposed,
}

impl Readiness {
    pub fn name(self) -> &'static str {
        match self {
            Readiness::Uninitialized => "uninitialized",
            Readiness::Initializing => "initializing",
            Readiness::Ready => "ready",
            Readiness::Failed => "failed",
            Readiness::Disposed => "disposed",
        }
    }
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result a background initializer sends back.
pub type InitResult<T> = Result<T, String>;

/// Holds a backend value `T` once it is ready.
///
/// Frames requested before `Ready` are dropped, never queued: at most one
/// frame is ever in hand and only once the value exists. Dropped frames are
/// counted.
pub struct ReadinessCell<T> {
    state: Readiness,
    pending: Option<Receiver<InitResult<T>>>,
    value: Option<T>,
    error: Option<String>,
    dropped: u64,
}

impl<T> Default for ReadinessCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReadinessCell<T> {
    pub fn new() -> Self {
        Self { state: Readiness::Uninitialized, pending: None, value: None, error: None, dropped: 0 }
    }

    pub fn state(&self) -> Readiness {
        self.state
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped
    }

    /// Why the backend failed, once `Failed`.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Moves to `Initializing` and returns the sender the initializer reports
    /// through. `None` unless currently `Uninitialized`.
    pub fn begin(&mut self) -> Option<mpsc::Sender<InitResult<T>>> {
        if self.state != Readiness::Uninitialized {
            return None;
        }
        let (tx, rx) = mpsc::channel();
        self.pending = Some(rx);
        self.state = Readiness::Initializing;
        Some(tx)
    }

    /// Synchronous completion. Ignored once ready, failed or disposed.
    pub fn resolve(&mut self, result: InitResult<T>) {
        if !matches!(self.state, Readiness::Uninitialized | Readiness::Initializing) {
            return;
        }
        self.pending = None;
        match result {
            Ok(value) => {
                self.value = Some(value);
                self.state = Readiness::Ready;
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, reason: String) {
        log::error!("renderer backend failed: {reason}");
        self.error = Some(reason);
        self.state = Readiness::Failed;
    }

    /// Checks for a finished initializer without blocking.
    pub fn poll(&mut self) -> Readiness {
        if self.state != Readiness::Initializing {
            return self.state;
        }
        let Some(rx) = self.pending.as_ref() else {
            self.fail("initializer missing".to_string());
            return self.state;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.resolve(result);
                if self.state == Readiness::Ready {
                    log::info!("renderer backend ready after {} dropped frame(s)", self.dropped);
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.fail("initializer exited without reporting".to_string());
            }
        }
        self.state
    }

    /// The value for one frame, or `None` (and one more dropped frame) when
    /// not ready. Nothing is counted after dispose.
    pub fn acquire(&mut self) -> Option<&mut T> {
        match self.poll() {
            Readiness::Ready => self.value.as_mut(),
            Readiness::Disposed => None,
            state => {
                self.dropped += 1;
                log::trace!("frame dropped, backend {state}");
                None
            }
        }
    }

    /// The value if ready, without counting a drop.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self.poll() {
            Readiness::Ready => self.value.as_mut(),
            _ => None,
        }
    }

    /// Drops the value and any pending initializer. Idempotent.
    ///
    /// A late result from an initializer still running is discarded.
    pub fn dispose(&mut self) -> Option<T> {
        if self.state == Readiness::Disposed {
            return None;
        }
        self.state = Readiness::Disposed;
        self.pending = None;
        self.value.take()
    }
}

impl<T> fmt::Debug for ReadinessCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadinessCell")
            .field("state", &self.state)
            .field("dropped", &self.dropped)
            .field("error", &self.error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    // ── transitions ───────────────────────────────────────────────────────

    #[test]
    fn starts_uninitialized_and_drops_frames() {
        let mut cell = ReadinessCell::<u32>::new();
        assert_eq!(cell.state(), Readiness::Uninitialized);
        assert!(cell.acquire().is_none());
        assert!(cell.acquire().is_none());
        assert_eq!(cell.dropped_frames(), 2);
    }

    #[test]
    fn synchronous_resolve_is_ready() {
        let mut cell = ReadinessCell::new();
        cell.resolve(Ok(5));
        assert_eq!(cell.state(), Readiness::Ready);
        assert_eq!(cell.acquire().copied(), Some(5));
        assert_eq!(cell.dropped_frames(), 0);
    }

    #[test]
    fn begin_only_from_uninitialized() {
        let mut cell = ReadinessCell::<u32>::new();
        assert!(cell.begin().is_some());
        assert!(cell.begin().is_none());
        assert_eq!(cell.state(), Readiness::Initializing);
    }

    #[test]
    fn frames_before_ready_are_dropped_not_queued() {
        let mut cell = ReadinessCell::new();
        let tx = cell.begin().unwrap();
        assert!(cell.acquire().is_none());
        assert!(cell.acquire().is_none());
        tx.send(Ok(9)).unwrap();
        assert_eq!(cell.acquire().copied(), Some(9));
        assert_eq!(cell.acquire().copied(), Some(9));
        assert_eq!(cell.dropped_frames(), 2);
    }

    #[test]
    fn background_result_arrives() {
        let mut cell = ReadinessCell::new();
        let tx = cell.begin().unwrap();
        thread::spawn(move || tx.send(Ok("gpu")).unwrap()).join().unwrap();
        assert_eq!(cell.poll(), Readiness::Ready);
    }

    #[test]
    fn error_result_fails() {
        let mut cell = ReadinessCell::<u32>::new();
        let tx = cell.begin().unwrap();
        tx.send(Err("no adapter".into())).unwrap();
        assert_eq!(cell.poll(), Readiness::Failed);
        assert_eq!(cell.error(), Some("no adapter"));
        assert!(cell.acquire().is_none());
        assert_eq!(cell.dropped_frames(), 1);
    }

    #[test]
    fn vanished_initializer_fails() {
        let mut cell = ReadinessCell::<u32>::new();
        drop(cell.begin());
        assert_eq!(cell.poll(), Readiness::Failed);
    }

    #[test]
    fn get_mut_does_not_count_drops() {
        let mut cell = ReadinessCell::<u32>::new();
        let _tx = cell.begin();
        assert!(cell.get_mut().is_none());
        assert_eq!(cell.dropped_frames(), 0);
    }

    // ── dispose ───────────────────────────────────────────────────────────

    #[test]
    fn dispose_is_terminal_and_idempotent() {
        let mut cell = ReadinessCell::new();
        cell.resolve(Ok(1));
        assert_eq!(cell.dispose(), Some(1));
        assert_eq!(cell.dispose(), None);
        assert!(cell.acquire().is_none());
        assert_eq!(cell.dropped_frames(), 0);
        cell.resolve(Ok(2));
        assert_eq!(cell.state(), Readiness::Disposed);
    }

    #[test]
    fn late_result_after_dispose_is_discarded() {
        let mut cell = ReadinessCell::new();
        let tx = cell.begin().unwrap();
        cell.dispose();
        assert!(tx.send(Ok(3)).is_err());
        assert_eq!(cell.poll(), Readiness::Disposed);
    }
}
