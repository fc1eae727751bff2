//! Shared library for the clock page
//!
//! Platform-free timekeeping: stopwatch/timer engine, duration formatting,
//! the inertial scroll picker, world clocks and config persistence.

pub mod config;
pub mod elapsed;
pub mod format;
pub mod laps;
pub mod page;
pub mod picker;
pub mod schedule;
pub mod time_engine;
pub mod world_clock;

pub use config::{load_config, save_config, ConfigError};
pub use elapsed::{ElapsedTimer, TickOutcome, TimerMode};
pub use format::{display_digits, format_duration, segments_for, DurationParts, SegmentPattern};
pub use laps::{LapEntry, LapRecorder};
pub use page::{ClockPage, PageConfig, PageEvent, PageMode, TimeField, TimerInput};
pub use picker::{PickerConfig, PickerItem, ScrollPicker};
pub use schedule::{Clock, FrameHandle, FrameQueue, FrameScheduler, ManualClock, SystemClock};
pub use time_engine::{search_timezones, timezone_count, TimezoneError};
pub use world_clock::{city_name, WorldClockReading, WorldClockSpec};
