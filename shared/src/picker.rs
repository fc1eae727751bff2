//! Inertial scroll picker
//!
//! A cyclic integer selector over `[0, max]`. Pointer samples move the strip
//! 1:1, the release velocity hands off to a geometrically decaying coast, and
//! the strip always comes to rest aligned on a whole item.

use serde::{Deserialize, Serialize};

/// Highest damping kept by [`PickerConfig::sanitized`]; at 1.0 a coast never ends
const MAX_DAMPING: f32 = 0.99;

/// Tuning for the picker. The defaults were tuned by feel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Height of one item in pixels
    pub item_height: f32,
    /// Rows visible in the picker window
    pub visible_items: usize,
    /// Velocity multiplier applied every coast frame
    pub damping: f32,
    /// Coasting stops below this speed (px/frame)
    pub coast_threshold: f32,
    /// Releasing below this speed snaps without coasting (px/frame)
    pub release_threshold: f32,
    /// Length of one frame in milliseconds, the unit for velocity
    pub frame_ms: f32,
    /// Number of `[0, max]` cycles laid out to fake an endless strip
    pub repeat_count: usize,
    /// Items further than this many rows from center are not materialized
    pub render_radius: f32,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            item_height: 44.0,
            visible_items: 5,
            damping: 0.95,
            coast_threshold: 0.1,
            release_threshold: 1.0,
            frame_ms: 16.0,
            repeat_count: 3,
            render_radius: 10.0,
        }
    }
}

impl PickerConfig {
    /// Clamp user-supplied tuning into values that keep every coast finite.
    /// Non-finite or non-positive sizes fall back to the defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let positive = |value: f32, fallback: f32| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };
        Self {
            item_height: positive(self.item_height, defaults.item_height),
            visible_items: self.visible_items.max(1),
            damping: if self.damping.is_finite() {
                self.damping.clamp(0.0, MAX_DAMPING)
            } else {
                defaults.damping
            },
            coast_threshold: positive(self.coast_threshold, defaults.coast_threshold),
            release_threshold: positive(self.release_threshold, defaults.release_threshold),
            frame_ms: positive(self.frame_ms, defaults.frame_ms),
            repeat_count: self.repeat_count.max(1),
            render_radius: positive(self.render_radius, defaults.render_radius),
        }
    }
}

/// Map any index onto `[0, count)`. A count of 0 or 1 always yields 0.
pub fn wrap_index(index: i64, count: u32) -> u32 {
    if count <= 1 {
        return 0;
    }
    index.rem_euclid(count as i64) as u32
}

/// What a pointer release led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Slow release: aligned immediately on this value
    Snapped(u32),
    /// Fast release: the caller must drive `coast_step` every frame
    Coasting,
    /// Release without a preceding press
    Ignored,
}

/// One frame of momentum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoastStep {
    Moving,
    /// Momentum ran out and the strip snapped onto this value
    Settled(u32),
}

/// A materialized row of the strip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerItem {
    pub value: u32,
    /// Offset of the row from the selection line, in pixels (positive = below)
    pub y: f32,
    pub opacity: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, Copy)]
struct DragSample {
    y: f32,
    t_ms: f64,
}

#[derive(Debug, Clone)]
pub struct ScrollPicker {
    config: PickerConfig,
    max: u32,
    selected: u32,
    visual_offset: f32,
    /// Pixels per frame
    velocity: f32,
    drag: Option<DragSample>,
}

impl ScrollPicker {
    pub fn new(max: u32, config: PickerConfig) -> Self {
        Self {
            config: config.sanitized(),
            max,
            selected: 0,
            visual_offset: 0.0,
            velocity: 0.0,
            drag: None,
        }
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn value(&self) -> u32 {
        self.selected
    }

    pub fn visual_offset(&self) -> f32 {
        self.visual_offset
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Whether momentum still needs frames
    pub fn is_coasting(&self) -> bool {
        !self.is_dragging() && self.velocity.abs() >= self.config.coast_threshold
    }

    fn count(&self) -> u32 {
        self.max + 1
    }

    fn index_at(&self, offset: f32) -> u32 {
        let raw = (-offset / self.config.item_height).round() as i64;
        wrap_index(raw, self.count())
    }

    fn aligned_offset(&self, value: u32) -> f32 {
        -(value as f32) * self.config.item_height
    }

    /// Start a drag. Any coast in flight is abandoned.
    pub fn pointer_down(&mut self, y: f32, t_ms: f64) {
        self.drag = Some(DragSample { y, t_ms });
        self.velocity = 0.0;
    }

    /// Follow the pointer. Returns the new value when the selection changed.
    pub fn pointer_move(&mut self, y: f32, t_ms: f64) -> Option<u32> {
        let last = self.drag?;
        let delta_y = y - last.y;
        let delta_t = t_ms - last.t_ms;
        // Samples with no elapsed time keep the previous velocity
        if delta_t > 0.0 {
            self.velocity = delta_y / delta_t as f32 * self.config.frame_ms;
        }
        self.visual_offset += delta_y;
        self.drag = Some(DragSample { y, t_ms });

        let value = self.index_at(self.visual_offset);
        if value != self.selected {
            self.selected = value;
            Some(value)
        } else {
            None
        }
    }

    pub fn pointer_up(&mut self) -> Release {
        if self.drag.take().is_none() {
            return Release::Ignored;
        }
        if self.velocity.abs() < self.config.release_threshold {
            Release::Snapped(self.settle())
        } else {
            Release::Coasting
        }
    }

    /// Abandon a drag or coast in flight and align on the nearest item
    pub fn cancel_drag(&mut self) -> u32 {
        self.drag = None;
        self.settle()
    }

    /// Advance momentum by one frame
    pub fn coast_step(&mut self) -> CoastStep {
        if self.is_dragging() {
            return CoastStep::Moving;
        }
        self.velocity *= self.config.damping;
        if self.velocity.abs() < self.config.coast_threshold {
            return CoastStep::Settled(self.settle());
        }
        self.visual_offset += self.velocity;
        CoastStep::Moving
    }

    /// Align on the nearest item and stop. Idempotent once settled.
    pub fn settle(&mut self) -> u32 {
        let value = self.index_at(self.visual_offset);
        self.selected = value;
        self.visual_offset = self.aligned_offset(value);
        self.velocity = 0.0;
        value
    }

    /// Step one item per wheel notch. Positive deltas move to the next value.
    pub fn wheel(&mut self, delta_y: f32) -> Option<u32> {
        if delta_y == 0.0 || self.is_dragging() {
            return None;
        }
        let step = if delta_y > 0.0 { 1 } else { -1 };
        let value = wrap_index(self.selected as i64 + step, self.count());
        self.selected = value;
        self.visual_offset = self.aligned_offset(value);
        self.velocity = 0.0;
        Some(value)
    }

    /// Value pushed in by the owner, e.g. a reset
    pub fn set_value(&mut self, value: u32) {
        self.selected = value.min(self.max);
        if !self.is_dragging() {
            self.visual_offset = self.aligned_offset(self.selected);
            self.velocity = 0.0;
        }
    }

    /// Rows near the selection line, laid out over several cycles of the range
    pub fn visible_items(&self) -> Vec<PickerItem> {
        let count = self.count() as i64;
        let repeats = self.config.repeat_count.max(1) as i64;
        let first_cycle = -(repeats / 2);
        let height = self.config.item_height;
        let limit = height * self.config.render_radius;

        let mut items = Vec::new();
        for cycle in first_cycle..first_cycle + repeats {
            for value in 0..count {
                let index = cycle * count + value;
                let y = index as f32 * height + self.visual_offset;
                if y.abs() >= limit {
                    continue;
                }
                let distance = (y / height).abs();
                items.push(PickerItem {
                    value: value as u32,
                    y,
                    opacity: (1.0 - distance * 0.3).max(0.2),
                    scale: (1.0 - distance * 0.15).max(0.7),
                });
            }
        }
        items
    }
}
