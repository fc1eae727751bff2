//! Clock and frame scheduling primitives
//!
//! Everything time-driven on the clock page reads a [`Clock`] once per frame
//! and is woken through an injected [`FrameScheduler`], so tests can swap in
//! [`ManualClock`] and pump a [`FrameQueue`] by hand.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};

/// Source of time for the page
pub trait Clock {
    /// Monotonic milliseconds since an arbitrary origin. Never decreases.
    fn monotonic_ms(&self) -> f64;
    /// Current wall-clock instant, used only for world-clock rendering
    fn wall_now(&self) -> DateTime<Utc>;
}

/// Clock backed by `Instant` and the system wall clock
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn monotonic_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn wall_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now_ms: Rc<Cell<f64>>,
    wall_origin: DateTime<Utc>,
}

impl ManualClock {
    pub fn new(wall_origin: DateTime<Utc>) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(0.0)),
            wall_origin,
        }
    }

    pub fn advance(&self, ms: f64) {
        // Monotonic: negative steps are ignored
        if ms > 0.0 {
            self.now_ms.set(self.now_ms.get() + ms);
        }
    }
}

impl Clock for ManualClock {
    fn monotonic_ms(&self) -> f64 {
        self.now_ms.get()
    }

    fn wall_now(&self) -> DateTime<Utc> {
        self.wall_origin + Duration::milliseconds(self.now_ms.get() as i64)
    }
}

/// Opaque identifier of a requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(u64);

/// Per-frame callback primitive (the `requestAnimationFrame` pair)
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler whose frames fire when the host drains it.
///
/// The desktop app drains once per window update; tests drain whenever they
/// want a frame to happen.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: BTreeSet<FrameHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending frame. Each handle fires at most once.
    pub fn drain(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.insert(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.remove(&handle);
    }
}

/// A self-rescheduling frame loop: at most one outstanding frame request.
#[derive(Debug, Default)]
pub struct FrameLoop {
    handle: Option<FrameHandle>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Request the next frame unless one is already outstanding
    pub fn ensure(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        if self.handle.is_some() {
            return false;
        }
        self.handle = Some(scheduler.request_frame());
        true
    }

    pub fn cancel(&mut self, scheduler: &mut impl FrameScheduler) {
        if let Some(handle) = self.handle.take() {
            scheduler.cancel_frame(handle);
        }
    }

    /// Claim a delivered frame. Returns false for handles this loop does not own.
    pub fn fire(&mut self, handle: FrameHandle) -> bool {
        if self.handle == Some(handle) {
            self.handle = None;
            true
        } else {
            false
        }
    }
}

/// Fixed-period repeating wakeup
#[derive(Debug, Clone)]
pub struct Interval {
    period_ms: f64,
    next_due: Option<f64>,
}

impl Interval {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            next_due: None,
        }
    }

    pub fn arm(&mut self, now_ms: f64) {
        self.next_due = Some(now_ms + self.period_ms);
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// True once per elapsed period; missed periods collapse into one firing
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.next_due {
            Some(due) if now_ms >= due => {
                let mut next = due;
                while next <= now_ms {
                    next += self.period_ms;
                }
                self.next_due = Some(next);
                true
            }
            _ => false,
        }
    }
}

/// One-shot deferred action
#[derive(Debug, Clone, Default)]
pub struct Timeout {
    due: Option<f64>,
}

impl Timeout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, now_ms: f64, delay_ms: f64) {
        self.due = Some(now_ms + delay_ms.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// True exactly once, on the first poll at or after the deadline
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.due {
            Some(due) if now_ms >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(DateTime::<Utc>::UNIX_EPOCH);
        let other = clock.clone();
        clock.advance(250.0);
        clock.advance(-100.0);
        assert_eq!(other.monotonic_ms(), 250.0);
        assert_eq!(other.wall_now().timestamp_millis(), 250);
    }

    #[test]
    fn test_frame_loop_single_outstanding_request() {
        let mut frames = FrameQueue::new();
        let mut frame_loop = FrameLoop::new();
        assert!(frame_loop.ensure(&mut frames));
        assert!(!frame_loop.ensure(&mut frames));
        assert_eq!(frames.pending_count(), 1);

        let due = frames.drain();
        assert_eq!(due.len(), 1);
        assert!(frame_loop.fire(due[0]));
        assert!(!frame_loop.is_active());
        assert!(!frame_loop.fire(due[0]));
    }

    #[test]
    fn test_frame_loop_cancel_removes_request() {
        let mut frames = FrameQueue::new();
        let mut frame_loop = FrameLoop::new();
        frame_loop.ensure(&mut frames);
        frame_loop.cancel(&mut frames);
        assert_eq!(frames.pending_count(), 0);
        assert!(frames.drain().is_empty());
    }

    #[test]
    fn test_interval_fires_once_per_period() {
        let mut interval = Interval::new(1000.0);
        assert!(!interval.poll(5000.0));

        interval.arm(0.0);
        assert!(!interval.poll(999.0));
        assert!(interval.poll(1000.0));
        assert!(!interval.poll(1500.0));
        // A long stall fires once, not three times
        assert!(interval.poll(4200.0));
        assert!(!interval.poll(4900.0));
        assert!(interval.poll(5000.0));

        interval.disarm();
        assert!(!interval.poll(10_000.0));
    }

    #[test]
    fn test_timeout_fires_once() {
        let mut timeout = Timeout::new();
        timeout.set(100.0, 3000.0);
        assert!(!timeout.poll(3000.0));
        assert!(timeout.poll(3100.0));
        assert!(!timeout.poll(9000.0));

        timeout.set(0.0, 10.0);
        timeout.cancel();
        assert!(!timeout.poll(100.0));
    }
}
