//! Elapsed-time engine for the stopwatch and countdown timer
//!
//! Time is accumulated across run segments from monotonic clock readings
//! supplied by the caller. Whether the engine is running is derived from the
//! segment anchor, so there is exactly one source of truth for it.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::laps::LapRecorder;

/// Which way the engine counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerMode {
    /// Counts up without bound
    Stopwatch,
    /// Counts down from a configured duration
    Timer,
}

/// Result of a single frame tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Engine was not running; nothing changed
    Idle,
    /// Display updated, engine still running
    Running,
    /// The countdown reached zero on this tick
    Completed,
}

/// Stopwatch/timer state
#[derive(Debug, Clone)]
pub struct ElapsedTimer {
    mode: TimerMode,
    /// Time counted before the current run segment
    accumulated_ms: f64,
    /// Monotonic reading at the start of the current segment; `Some` iff running
    anchor_ms: Option<f64>,
    /// Duration locked in when a countdown run starts
    target_ms: Option<u64>,
    /// Duration currently dialled in for the next countdown
    configured_ms: u64,
    /// Last computed display value, floored
    display_ms: u64,
    laps: LapRecorder,
}

impl ElapsedTimer {
    pub fn new(mode: TimerMode) -> Self {
        Self {
            mode,
            accumulated_ms: 0.0,
            anchor_ms: None,
            target_ms: None,
            configured_ms: 0,
            display_ms: 0,
            laps: LapRecorder::new(),
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.anchor_ms.is_some()
    }

    pub fn display_ms(&self) -> u64 {
        self.display_ms
    }

    pub fn target_ms(&self) -> Option<u64> {
        self.target_ms
    }

    pub fn configured_ms(&self) -> u64 {
        self.configured_ms
    }

    pub fn laps(&self) -> &LapRecorder {
        &self.laps
    }

    /// Set the countdown duration used by the next start from zero.
    /// A run that is already armed keeps its target until reset.
    pub fn set_configured(&mut self, ms: u64) {
        self.configured_ms = ms;
    }

    /// Time counted so far at `now_ms`, including the open segment
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        let segment = self
            .anchor_ms
            .map(|anchor| (now_ms - anchor).max(0.0))
            .unwrap_or(0.0);
        self.accumulated_ms + segment
    }

    /// Countdown time left at `now_ms`; `None` in stopwatch mode or before a target is locked
    pub fn remaining_ms(&self, now_ms: f64) -> Option<f64> {
        match self.mode {
            TimerMode::Stopwatch => None,
            TimerMode::Timer => self
                .target_ms
                .map(|target| (target as f64 - self.elapsed_ms(now_ms)).max(0.0)),
        }
    }

    /// A countdown with time left that can be resumed without re-arming
    fn has_remaining(&self) -> bool {
        match self.target_ms {
            Some(target) => self.accumulated_ms < target as f64,
            None => false,
        }
    }

    pub fn can_start(&self) -> bool {
        match self.mode {
            TimerMode::Stopwatch => true,
            TimerMode::Timer => self.has_remaining() || self.configured_ms > 0,
        }
    }

    /// Reset stays available except while the stopwatch is counting
    pub fn can_reset(&self) -> bool {
        !(self.mode == TimerMode::Stopwatch && self.is_running())
    }

    pub fn can_lap(&self) -> bool {
        self.mode == TimerMode::Stopwatch && self.is_running()
    }

    /// Begin or resume a run segment. Returns false when the start was refused.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.is_running() {
            return false;
        }
        if self.mode == TimerMode::Timer && !self.has_remaining() {
            if self.configured_ms == 0 {
                debug!("refusing to start a zero-length timer");
                return false;
            }
            self.target_ms = Some(self.configured_ms);
            self.accumulated_ms = 0.0;
            self.display_ms = self.configured_ms;
        }
        self.anchor_ms = Some(now_ms);
        debug!(mode = ?self.mode, now_ms, "run segment started");
        true
    }

    /// Close the current run segment and freeze the display
    pub fn pause(&mut self, now_ms: f64) {
        if let Some(anchor) = self.anchor_ms.take() {
            self.accumulated_ms += (now_ms - anchor).max(0.0);
            if let Some(target) = self.target_ms {
                self.accumulated_ms = self.accumulated_ms.min(target as f64);
            }
            self.refresh_display(now_ms);
            debug!(mode = ?self.mode, accumulated_ms = self.accumulated_ms, "paused");
        }
    }

    pub fn reset(&mut self) {
        self.anchor_ms = None;
        self.accumulated_ms = 0.0;
        self.display_ms = 0;
        match self.mode {
            TimerMode::Stopwatch => self.laps.clear(),
            TimerMode::Timer => {
                self.target_ms = None;
                self.configured_ms = 0;
            }
        }
        debug!(mode = ?self.mode, "reset");
    }

    /// Recompute the display for this frame
    pub fn tick(&mut self, now_ms: f64) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }
        if let Some(remaining) = self.remaining_ms(now_ms) {
            if remaining <= 0.0 {
                self.anchor_ms = None;
                self.accumulated_ms = self.target_ms.unwrap_or(0) as f64;
                self.display_ms = 0;
                info!("timer finished");
                return TickOutcome::Completed;
            }
        }
        self.refresh_display(now_ms);
        TickOutcome::Running
    }

    /// Prepend the current elapsed time to the lap list; stopwatch only, while running
    pub fn record_lap(&mut self, now_ms: f64) -> bool {
        if !self.can_lap() {
            return false;
        }
        let elapsed = self.elapsed_ms(now_ms).floor() as u64;
        self.laps.record(elapsed);
        debug!(elapsed, count = self.laps.len(), "lap recorded");
        true
    }

    fn refresh_display(&mut self, now_ms: f64) {
        let value = match self.remaining_ms(now_ms) {
            Some(remaining) => remaining,
            None if self.mode == TimerMode::Timer => 0.0,
            None => self.elapsed_ms(now_ms),
        };
        self.display_ms = value.max(0.0).floor() as u64;
    }
}
