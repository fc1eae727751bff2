//! Clock page state
//!
//! [`ClockPage`] is the one authoritative state for the page: mode, engine,
//! timer input pickers and world clocks. Hosts feed it input events and, once
//! per display frame, the frame handles their scheduler fired.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::elapsed::{ElapsedTimer, TickOutcome, TimerMode};
use crate::format::{display_digits, format_duration};
use crate::laps::LapRecorder;
use crate::picker::{CoastStep, PickerConfig, Release, ScrollPicker};
use crate::schedule::{Clock, FrameHandle, FrameLoop, FrameQueue, FrameScheduler, Interval, Timeout};
use crate::time_engine::TimezoneError;
use crate::world_clock::{
    default_world_clocks, render_world_clocks, WorldClockList, WorldClockReading, WorldClockSpec,
};

const WORLD_REFRESH_MS: f64 = 1000.0;
const COMPLETION_NOTICE: &str = "Time's up";

/// Top-level page mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageMode {
    #[default]
    Stopwatch,
    Timer,
    WorldClock,
}

impl PageMode {
    pub fn all() -> &'static [PageMode] {
        &[PageMode::Stopwatch, PageMode::Timer, PageMode::WorldClock]
    }

    pub fn label(&self) -> &'static str {
        match self {
            PageMode::Stopwatch => "Stopwatch",
            PageMode::Timer => "Timer",
            PageMode::WorldClock => "World Clock",
        }
    }

    fn timer_mode(&self) -> TimerMode {
        match self {
            PageMode::Timer => TimerMode::Timer,
            PageMode::Stopwatch | PageMode::WorldClock => TimerMode::Stopwatch,
        }
    }
}

/// One column of the countdown input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Hours,
    Minutes,
    Seconds,
}

impl TimeField {
    pub const ALL: [TimeField; 3] = [TimeField::Hours, TimeField::Minutes, TimeField::Seconds];

    pub fn max(&self) -> u32 {
        match self {
            TimeField::Hours => 23,
            TimeField::Minutes | TimeField::Seconds => 59,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeField::Hours => "h",
            TimeField::Minutes => "m",
            TimeField::Seconds => "s",
        }
    }

    fn index(&self) -> usize {
        match self {
            TimeField::Hours => 0,
            TimeField::Minutes => 1,
            TimeField::Seconds => 2,
        }
    }
}

/// Countdown duration as dialled on the pickers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerInput {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl TimerInput {
    pub fn total_ms(&self) -> u64 {
        self.hours as u64 * 3_600_000 + self.minutes as u64 * 60_000 + self.seconds as u64 * 1_000
    }

    pub fn get(&self, field: TimeField) -> u32 {
        match field {
            TimeField::Hours => self.hours,
            TimeField::Minutes => self.minutes,
            TimeField::Seconds => self.seconds,
        }
    }

    pub fn set(&mut self, field: TimeField, value: u32) {
        let value = value.min(field.max());
        match field {
            TimeField::Hours => self.hours = value,
            TimeField::Minutes => self.minutes = value,
            TimeField::Seconds => self.seconds = value,
        }
    }
}

/// Construction parameters for the page
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub initial_mode: PageMode,
    pub picker: PickerConfig,
    pub world_clocks: Vec<WorldClockSpec>,
    /// How long the completion notice stays up
    pub notice_ms: f64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            initial_mode: PageMode::Stopwatch,
            picker: PickerConfig::default(),
            world_clocks: default_world_clocks(),
            notice_ms: 3000.0,
        }
    }
}

/// Things the host may want to react to after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    TimerCompleted,
}

#[derive(Debug)]
struct PickerColumn {
    picker: ScrollPicker,
    coast: FrameLoop,
}

pub struct ClockPage<C: Clock, S: FrameScheduler = FrameQueue> {
    clock: C,
    frames: S,
    mode: PageMode,
    engine: ElapsedTimer,
    engine_loop: FrameLoop,
    timer_input: TimerInput,
    columns: [PickerColumn; 3],
    world_clocks: WorldClockList,
    world_readings: Vec<WorldClockReading>,
    world_refresh: Interval,
    notice: Option<&'static str>,
    notice_timeout: Timeout,
    notice_ms: f64,
    /// Events raised outside `update`, handed out by the next `update`
    pending_events: Vec<PageEvent>,
}

impl<C: Clock, S: FrameScheduler> ClockPage<C, S> {
    pub fn new(clock: C, frames: S, config: PageConfig) -> Self {
        let column = |field: TimeField| PickerColumn {
            picker: ScrollPicker::new(field.max(), config.picker),
            coast: FrameLoop::new(),
        };
        let mut page = Self {
            clock,
            frames,
            mode: config.initial_mode,
            engine: ElapsedTimer::new(config.initial_mode.timer_mode()),
            engine_loop: FrameLoop::new(),
            timer_input: TimerInput::default(),
            columns: [
                column(TimeField::Hours),
                column(TimeField::Minutes),
                column(TimeField::Seconds),
            ],
            world_clocks: WorldClockList::from_specs(&config.world_clocks),
            world_readings: Vec::new(),
            world_refresh: Interval::new(WORLD_REFRESH_MS),
            notice: None,
            notice_timeout: Timeout::new(),
            notice_ms: config.notice_ms,
            pending_events: Vec::new(),
        };
        if page.mode == PageMode::WorldClock {
            page.enter_world_clock();
        }
        page
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn frames_mut(&mut self) -> &mut S {
        &mut self.frames
    }

    pub fn mode(&self) -> PageMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn display_ms(&self) -> u64 {
        self.engine.display_ms()
    }

    pub fn display_text(&self) -> String {
        format_duration(self.engine.display_ms())
    }

    pub fn display_digits(&self) -> Vec<[u8; 2]> {
        display_digits(self.engine.display_ms())
    }

    pub fn laps(&self) -> &LapRecorder {
        self.engine.laps()
    }

    pub fn timer_target_ms(&self) -> Option<u64> {
        self.engine.target_ms()
    }

    pub fn can_start(&self) -> bool {
        self.mode != PageMode::WorldClock && self.engine.can_start()
    }

    pub fn can_reset(&self) -> bool {
        self.mode != PageMode::WorldClock && self.engine.can_reset()
    }

    pub fn can_lap(&self) -> bool {
        self.engine.can_lap()
    }

    pub fn timer_input(&self) -> TimerInput {
        self.timer_input
    }

    /// The countdown input is shown only while a timer is idle at zero
    pub fn pickers_visible(&self) -> bool {
        self.mode == PageMode::Timer && !self.engine.is_running() && self.engine.display_ms() == 0
    }

    pub fn picker(&self, field: TimeField) -> &ScrollPicker {
        &self.columns[field.index()].picker
    }

    pub fn world_readings(&self) -> &[WorldClockReading] {
        &self.world_readings
    }

    pub fn world_clocks(&self) -> &WorldClockList {
        &self.world_clocks
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    /// Leave the current mode. The outgoing state is always discarded.
    pub fn switch_mode(&mut self, mode: PageMode) {
        debug!(from = ?self.mode, to = ?mode, "switching mode");
        self.engine_loop.cancel(&mut self.frames);
        self.engine = ElapsedTimer::new(mode.timer_mode());
        self.clear_timer_input();
        self.dismiss_notice();

        self.mode = mode;
        if mode == PageMode::WorldClock {
            self.enter_world_clock();
        } else {
            self.world_refresh.disarm();
            self.world_readings.clear();
        }
    }

    pub fn toggle_start_pause(&mut self) {
        if self.engine.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn start(&mut self) -> bool {
        if self.mode == PageMode::WorldClock {
            return false;
        }
        let now = self.clock.monotonic_ms();
        if !self.engine.start(now) {
            return false;
        }
        self.dismiss_notice();
        self.release_pickers();
        self.engine_loop.ensure(&mut self.frames);
        true
    }

    pub fn pause(&mut self) {
        let now = self.clock.monotonic_ms();
        self.engine_loop.cancel(&mut self.frames);
        if !self.catch_up(now) {
            self.engine.pause(now);
        }
    }

    pub fn reset(&mut self) -> bool {
        if !self.can_reset() {
            return false;
        }
        let now = self.clock.monotonic_ms();
        self.engine_loop.cancel(&mut self.frames);
        self.catch_up(now);
        self.engine.reset();
        if self.mode == PageMode::Timer {
            self.clear_timer_input();
        }
        self.dismiss_notice();
        true
    }

    pub fn record_lap(&mut self) -> bool {
        let now = self.clock.monotonic_ms();
        self.engine.record_lap(now)
    }

    /// Set the countdown input from outside the pickers
    pub fn set_timer_input(&mut self, input: TimerInput) {
        for field in TimeField::ALL {
            let column = &mut self.columns[field.index()];
            column.coast.cancel(&mut self.frames);
            column.picker.set_value(input.get(field));
            self.timer_input.set(field, column.picker.value());
        }
        self.engine.set_configured(self.timer_input.total_ms());
    }

    pub fn picker_pointer_down(&mut self, field: TimeField, y: f32) {
        if !self.pickers_visible() {
            return;
        }
        let now = self.clock.monotonic_ms();
        let column = &mut self.columns[field.index()];
        column.coast.cancel(&mut self.frames);
        column.picker.pointer_down(y, now);
    }

    pub fn picker_pointer_move(&mut self, field: TimeField, y: f32) {
        if !self.pickers_visible() {
            return;
        }
        let now = self.clock.monotonic_ms();
        if let Some(value) = self.columns[field.index()].picker.pointer_move(y, now) {
            self.apply_field(field, value);
        }
    }

    pub fn picker_pointer_up(&mut self, field: TimeField) {
        let column = &mut self.columns[field.index()];
        match column.picker.pointer_up() {
            Release::Snapped(value) => self.apply_field(field, value),
            Release::Coasting => {
                column.coast.ensure(&mut self.frames);
            }
            Release::Ignored => {}
        }
    }

    /// Release every column that is mid-drag, e.g. when the pointer leaves the window
    pub fn release_all_pickers(&mut self) {
        for field in TimeField::ALL {
            if self.columns[field.index()].picker.is_dragging() {
                self.picker_pointer_up(field);
            }
        }
    }

    pub fn picker_wheel(&mut self, field: TimeField, delta_y: f32) {
        if !self.pickers_visible() {
            return;
        }
        if let Some(value) = self.columns[field.index()].picker.wheel(delta_y) {
            self.apply_field(field, value);
        }
    }

    pub fn add_world_clock(&mut self, timezone: &str, display_name: &str) -> Result<u32, TimezoneError> {
        let id = self.world_clocks.add(timezone, display_name)?;
        info!("added world clock {}", timezone);
        self.refresh_world_clocks();
        Ok(id)
    }

    pub fn remove_world_clock(&mut self, id: u32) -> bool {
        let removed = self.world_clocks.remove(id);
        if removed {
            self.refresh_world_clocks();
        }
        removed
    }

    /// Run one display frame: dispatch the fired handles, then the time-based wakeups
    pub fn update(&mut self, fired: &[FrameHandle]) -> Vec<PageEvent> {
        let now = self.clock.monotonic_ms();
        let mut events = std::mem::take(&mut self.pending_events);
        let mut settled = Vec::new();

        for &handle in fired {
            if self.engine_loop.fire(handle) {
                match self.engine.tick(now) {
                    TickOutcome::Running => {
                        self.engine_loop.ensure(&mut self.frames);
                    }
                    TickOutcome::Completed => {
                        self.complete(now);
                        events.append(&mut self.pending_events);
                    }
                    TickOutcome::Idle => {}
                }
                continue;
            }
            for (index, column) in self.columns.iter_mut().enumerate() {
                if !column.coast.fire(handle) {
                    continue;
                }
                match column.picker.coast_step() {
                    CoastStep::Moving => {
                        column.coast.ensure(&mut self.frames);
                    }
                    CoastStep::Settled(value) => settled.push((TimeField::ALL[index], value)),
                }
                break;
            }
        }
        for (field, value) in settled {
            self.apply_field(field, value);
        }

        if self.world_refresh.poll(now) {
            self.refresh_world_clocks();
        }
        if self.notice_timeout.poll(now) {
            self.notice = None;
        }
        events
    }

    /// Drop every pending frame request and wakeup
    pub fn teardown(&mut self) {
        self.engine_loop.cancel(&mut self.frames);
        for column in self.columns.iter_mut() {
            column.coast.cancel(&mut self.frames);
        }
        self.world_refresh.disarm();
        self.notice_timeout.cancel();
        debug!("clock page torn down");
    }

    /// Bring a countdown that ran out between frames to its completion.
    /// Returns true when this call completed it.
    fn catch_up(&mut self, now: f64) -> bool {
        if self.engine.tick(now) == TickOutcome::Completed {
            self.complete(now);
            true
        } else {
            false
        }
    }

    fn complete(&mut self, now: f64) {
        self.notice = Some(COMPLETION_NOTICE);
        self.notice_timeout.set(now, self.notice_ms);
        self.pending_events.push(PageEvent::TimerCompleted);
    }

    /// End every drag and coast, keeping the values the columns settle on
    fn release_pickers(&mut self) {
        for field in TimeField::ALL {
            let column = &mut self.columns[field.index()];
            column.coast.cancel(&mut self.frames);
            let value = column.picker.cancel_drag();
            self.timer_input.set(field, value);
        }
        self.engine.set_configured(self.timer_input.total_ms());
    }

    fn apply_field(&mut self, field: TimeField, value: u32) {
        self.timer_input.set(field, value);
        self.engine.set_configured(self.timer_input.total_ms());
    }

    fn clear_timer_input(&mut self) {
        self.release_pickers();
        self.set_timer_input(TimerInput::default());
    }

    fn dismiss_notice(&mut self) {
        self.notice = None;
        self.notice_timeout.cancel();
    }

    fn enter_world_clock(&mut self) {
        let now = self.clock.monotonic_ms();
        self.world_refresh.arm(now);
        self.refresh_world_clocks();
    }

    fn refresh_world_clocks(&mut self) {
        if self.mode != PageMode::WorldClock {
            return;
        }
        self.world_readings = render_world_clocks(self.world_clocks.entries(), self.clock.wall_now());
    }

    /// World clock entries as they should be persisted
    pub fn world_clock_specs(&self) -> Vec<WorldClockSpec> {
        self.world_clocks.to_specs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualClock;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn page(mode: PageMode) -> (ClockPage<ManualClock>, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 10, 16, 7, 0).unwrap());
        let config = PageConfig {
            initial_mode: mode,
            ..PageConfig::default()
        };
        (ClockPage::new(clock.clone(), FrameQueue::new(), config), clock)
    }

    fn frame(page: &mut ClockPage<ManualClock>) -> Vec<PageEvent> {
        let fired = page.frames_mut().drain();
        page.update(&fired)
    }

    #[test]
    fn test_stopwatch_accumulates_running_segments_only() {
        let (mut page, clock) = page(PageMode::Stopwatch);
        assert!(page.start());
        clock.advance(1000.0);
        frame(&mut page);
        page.pause();
        clock.advance(5000.0);
        frame(&mut page);
        assert_eq!(page.display_ms(), 1000);

        page.start();
        clock.advance(500.0);
        frame(&mut page);
        assert_eq!(page.display_ms(), 1500);
        assert_eq!(page.display_text(), "00:01.50");
    }

    #[test]
    fn test_single_frame_loop_while_running() {
        let (mut page, clock) = page(PageMode::Stopwatch);
        page.start();
        page.start();
        page.toggle_start_pause();
        page.toggle_start_pause();
        assert_eq!(page.frames_mut().pending_count(), 1);

        for _ in 0..5 {
            clock.advance(16.0);
            frame(&mut page);
            assert_eq!(page.frames_mut().pending_count(), 1);
        }
        page.pause();
        assert_eq!(page.frames_mut().pending_count(), 0);
    }

    #[test]
    fn test_stale_frame_after_pause_is_ignored() {
        let (mut page, clock) = page(PageMode::Stopwatch);
        page.start();
        let stale = page.frames_mut().drain();
        clock.advance(300.0);
        page.pause();
        clock.advance(700.0);
        page.update(&stale);
        assert_eq!(page.display_ms(), 300);
        assert!(!page.is_running());
    }

    #[test]
    fn test_timer_runs_out_once() {
        let (mut page, clock) = page(PageMode::Timer);
        assert!(!page.can_start());
        page.set_timer_input(TimerInput {
            hours: 0,
            minutes: 0,
            seconds: 2,
        });
        assert_eq!(page.picker(TimeField::Seconds).value(), 2);
        assert!(page.start());
        assert!(!page.pickers_visible());

        clock.advance(2500.0);
        let events = frame(&mut page);
        assert_eq!(events, vec![PageEvent::TimerCompleted]);
        assert_eq!(page.display_ms(), 0);
        assert!(!page.is_running());
        assert_eq!(page.notice(), Some("Time's up"));

        clock.advance(100.0);
        assert!(frame(&mut page).is_empty());
        assert_eq!(page.frames_mut().pending_count(), 0);

        clock.advance(3000.0);
        frame(&mut page);
        assert_eq!(page.notice(), None);
        assert!(page.pickers_visible());
    }

    fn two_second_timer() -> (ClockPage<ManualClock>, ManualClock) {
        let (mut page, clock) = page(PageMode::Timer);
        page.set_timer_input(TimerInput {
            hours: 0,
            minutes: 0,
            seconds: 2,
        });
        assert!(page.start());
        (page, clock)
    }

    #[test]
    fn test_pause_after_expiry_completes_once() {
        let (mut page, clock) = two_second_timer();
        clock.advance(2500.0);
        page.pause();
        assert!(!page.is_running());
        assert_eq!(page.display_ms(), 0);
        assert_eq!(page.notice(), Some("Time's up"));

        assert_eq!(frame(&mut page), vec![PageEvent::TimerCompleted]);
        clock.advance(16.0);
        assert!(frame(&mut page).is_empty());
        assert_eq!(page.frames_mut().pending_count(), 0);
    }

    #[test]
    fn test_pause_before_expiry_keeps_remaining() {
        let (mut page, clock) = two_second_timer();
        clock.advance(500.0);
        page.pause();
        assert_eq!(page.display_ms(), 1500);
        assert_eq!(page.notice(), None);
        assert!(frame(&mut page).is_empty());
    }

    #[test]
    fn test_reset_after_expiry_still_reports_completion() {
        let (mut page, clock) = two_second_timer();
        clock.advance(2500.0);
        assert!(page.reset());
        assert_eq!(page.notice(), None);
        assert_eq!(page.display_ms(), 0);
        assert_eq!(page.timer_input(), TimerInput::default());

        assert_eq!(frame(&mut page), vec![PageEvent::TimerCompleted]);
        assert!(frame(&mut page).is_empty());
    }

    #[test]
    fn test_mode_switch_mid_drag_releases_picker() {
        let (mut page, clock) = page(PageMode::Timer);
        page.picker_pointer_down(TimeField::Hours, 0.0);
        clock.advance(16.0);
        page.picker_pointer_move(TimeField::Hours, -100.0);
        assert_eq!(page.timer_input().hours, 2);

        page.switch_mode(PageMode::Stopwatch);
        page.switch_mode(PageMode::Timer);
        let hours = page.picker(TimeField::Hours);
        assert!(!hours.is_dragging());
        assert_eq!(hours.value(), 0);
        assert_eq!(hours.visual_offset(), 0.0);
        assert_eq!(page.timer_input(), TimerInput::default());

        page.picker_wheel(TimeField::Hours, 1.0);
        assert_eq!(page.timer_input().hours, 1);
    }

    #[test]
    fn test_mode_switch_mid_coast_stops_frames() {
        let (mut page, clock) = page(PageMode::Timer);
        page.picker_pointer_down(TimeField::Minutes, 0.0);
        clock.advance(16.0);
        page.picker_pointer_move(TimeField::Minutes, -40.0);
        page.picker_pointer_up(TimeField::Minutes);
        assert!(page.picker(TimeField::Minutes).is_coasting());
        assert_eq!(page.frames_mut().pending_count(), 1);

        page.switch_mode(PageMode::WorldClock);
        assert_eq!(page.frames_mut().pending_count(), 0);
        assert!(!page.picker(TimeField::Minutes).is_coasting());
        assert_eq!(page.picker(TimeField::Minutes).value(), 0);
    }

    #[test]
    fn test_drag_ends_when_timer_starts() {
        let (mut page, clock) = page(PageMode::Timer);
        page.picker_wheel(TimeField::Seconds, 1.0);
        page.picker_pointer_down(TimeField::Seconds, 0.0);
        assert!(page.start());
        assert!(!page.picker(TimeField::Seconds).is_dragging());

        clock.advance(16.0);
        page.picker_pointer_move(TimeField::Seconds, -200.0);
        page.picker_pointer_up(TimeField::Seconds);
        assert_eq!(page.timer_input().seconds, 1);
        assert_eq!(page.timer_target_ms(), Some(1000));
    }

    #[test]
    fn test_notice_dismissed_by_mode_switch() {
        let (mut page, clock) = page(PageMode::Timer);
        page.set_timer_input(TimerInput {
            hours: 0,
            minutes: 0,
            seconds: 1,
        });
        page.start();
        clock.advance(1000.0);
        frame(&mut page);
        assert_eq!(page.notice(), Some("Time's up"));

        page.switch_mode(PageMode::Stopwatch);
        assert_eq!(page.notice(), None);
        page.switch_mode(PageMode::Timer);
        clock.advance(5000.0);
        frame(&mut page);
        assert_eq!(page.notice(), None);
    }

    #[test]
    fn test_mode_switch_clears_stopwatch() {
        let (mut page, clock) = page(PageMode::Stopwatch);
        page.start();
        clock.advance(1000.0);
        page.record_lap();
        clock.advance(1000.0);
        frame(&mut page);
        assert_eq!(page.laps().len(), 1);

        page.switch_mode(PageMode::Timer);
        assert!(page.laps().is_empty());
        assert_eq!(page.display_ms(), 0);
        assert_eq!(page.timer_target_ms(), None);
        assert!(!page.is_running());
        assert_eq!(page.frames_mut().pending_count(), 0);
    }

    #[test]
    fn test_reset_refused_while_stopwatch_runs() {
        let (mut page, clock) = page(PageMode::Stopwatch);
        page.start();
        clock.advance(400.0);
        assert!(!page.reset());
        page.pause();
        assert!(page.reset());
        assert_eq!(page.display_ms(), 0);
    }

    #[test]
    fn test_timer_reset_clears_pickers() {
        let (mut page, _clock) = page(PageMode::Timer);
        page.picker_wheel(TimeField::Minutes, 1.0);
        page.picker_wheel(TimeField::Minutes, 1.0);
        assert_eq!(page.timer_input().minutes, 2);
        assert!(page.can_start());

        assert!(page.reset());
        assert_eq!(page.timer_input(), TimerInput::default());
        assert_eq!(page.picker(TimeField::Minutes).value(), 0);
        assert_eq!(page.picker(TimeField::Minutes).visual_offset(), 0.0);
    }

    #[test]
    fn test_picker_coast_driven_by_frames() {
        let (mut page, clock) = page(PageMode::Timer);
        page.picker_pointer_down(TimeField::Seconds, 200.0);
        clock.advance(16.0);
        page.picker_pointer_move(TimeField::Seconds, 170.0);
        page.picker_pointer_up(TimeField::Seconds);
        assert_eq!(page.frames_mut().pending_count(), 1);

        let mut frames = 0;
        while page.frames_mut().pending_count() > 0 {
            clock.advance(16.0);
            frame(&mut page);
            frames += 1;
            assert!(frames < 1000);
        }
        let picker = page.picker(TimeField::Seconds);
        assert!(!picker.is_coasting());
        assert_eq!(page.timer_input().seconds, picker.value());
        assert_eq!(picker.visual_offset(), -(picker.value() as f32) * 44.0);
    }

    #[test]
    fn test_pickers_ignored_outside_timer_setup() {
        let (mut page, _clock) = page(PageMode::Stopwatch);
        page.picker_wheel(TimeField::Hours, 1.0);
        page.picker_pointer_down(TimeField::Hours, 0.0);
        assert_eq!(page.timer_input(), TimerInput::default());
        assert!(!page.picker(TimeField::Hours).is_dragging());
    }

    #[test]
    fn test_world_clock_refreshes_only_while_active() {
        let (mut page, clock) = page(PageMode::Stopwatch);
        clock.advance(5000.0);
        frame(&mut page);
        assert!(page.world_readings().is_empty());

        page.switch_mode(PageMode::WorldClock);
        assert_eq!(page.world_readings().len(), 12);
        let london = |page: &ClockPage<ManualClock>| {
            page.world_readings()
                .iter()
                .find(|reading| reading.display_name == "London")
                .map(|reading| reading.time.clone())
        };
        assert_eq!(london(&page), Some("16:07".to_string()));

        clock.advance(60_000.0);
        frame(&mut page);
        assert_eq!(london(&page), Some("16:08".to_string()));

        page.switch_mode(PageMode::Stopwatch);
        assert!(page.world_readings().is_empty());
    }

    #[test]
    fn test_world_clock_edits() {
        let (mut page, _clock) = page(PageMode::WorldClock);
        let id = page.add_world_clock("Pacific/Auckland", "").unwrap();
        assert_eq!(page.world_readings().len(), 13);
        assert!(page.remove_world_clock(id));
        assert_eq!(page.world_readings().len(), 12);
        assert!(page.add_world_clock("Atlantis/Capital", "Atlantis").is_err());
    }

    #[test]
    fn test_teardown_cancels_everything() {
        let (mut page, clock) = page(PageMode::Stopwatch);
        page.start();
        page.teardown();
        assert_eq!(page.frames_mut().pending_count(), 0);
        clock.advance(1000.0);
        frame(&mut page);
        assert_eq!(page.display_ms(), 0);
    }
}
