/// Opaque id of a requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// "Call me before the next repaint" primitive supplied by the host
pub trait FrameScheduler {
    /// Ask for one frame callback
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request. Unknown or already delivered handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Single-slot frame queue for hosts that run their own redraw loop.
///
/// The host calls [`FrameQueue::take_due`] once per redraw and hands the
/// returned handle back to the engine.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Option<FrameHandle>,
    requested: u64,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the pending frame, if any
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Total number of frames ever requested
    pub fn requested(&self) -> u64 {
        self.requested
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_then_take() {
        let mut queue = FrameQueue::new();
        assert_eq!(queue.take_due(), None);

        let handle = queue.request_frame();
        assert!(queue.has_pending());
        assert_eq!(queue.take_due(), Some(handle));
        assert_eq!(queue.take_due(), None);
        assert_eq!(queue.requested(), 1);
    }

    #[test]
    fn test_handles_are_unique() {
        let mut queue = FrameQueue::new();
        let a = queue.request_frame();
        let b = queue.request_frame();
        assert_ne!(a, b);
        assert_eq!(queue.take_due(), Some(b));
    }

    #[test]
    fn test_cancel_only_matching() {
        let mut queue = FrameQueue::new();
        let stale = queue.request_frame();
        let current = queue.request_frame();

        queue.cancel_frame(stale);
        assert!(queue.has_pending());

        queue.cancel_frame(current);
        assert!(!queue.has_pending());

        // Cancelling twice is harmless
        queue.cancel_frame(current);
        assert_eq!(queue.take_due(), None);
    }
}
