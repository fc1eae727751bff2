//! Drawing module - seven-segment readout, picker columns, laps and world clock cards
//!
//! Renders the clock page using nannou's Draw API. Nothing here mutates page state.

use nannou::prelude::*;
use shared::{
    format_duration, segments_for, ClockPage, LapRecorder, ScrollPicker,
    SystemClock, TimeField, WorldClockReading,
};

/// Color palette
pub mod colors {
    use nannou::prelude::*;

    pub const BACKGROUND: Srgb<u8> = Srgb {
        red: 24,
        green: 24,
        blue: 28,
        standard: std::marker::PhantomData,
    };
    pub const CARD: Srgb<u8> = Srgb {
        red: 38,
        green: 38,
        blue: 44,
        standard: std::marker::PhantomData,
    };
    pub const TEXT_PRIMARY: Srgb<u8> = Srgb {
        red: 240,
        green: 240,
        blue: 240,
        standard: std::marker::PhantomData,
    };
    pub const TEXT_SECONDARY: Srgb<u8> = Srgb {
        red: 150,
        green: 150,
        blue: 160,
        standard: std::marker::PhantomData,
    };
    pub const ACCENT: Srgb<u8> = Srgb {
        red: 53,
        green: 191,
        blue: 171,
        standard: std::marker::PhantomData,
    };
    pub const SEGMENT_OFF: Srgb<u8> = Srgb {
        red: 48,
        green: 48,
        blue: 54,
        standard: std::marker::PhantomData,
    };
    pub const NOTICE_BG: Srgb<u8> = Srgb {
        red: 30,
        green: 90,
        blue: 80,
        standard: std::marker::PhantomData,
    };
}

const DIGIT_WIDTH: f32 = 58.0;
const DIGIT_HEIGHT: f32 = 104.0;
const SEGMENT_THICKNESS: f32 = 9.0;
const DIGIT_GAP: f32 = 10.0;
const COLON_WIDTH: f32 = 22.0;
const PICKER_WIDTH: f32 = 96.0;
const PICKER_GAP: f32 = 40.0;

/// Page regions, in window coordinates
pub struct Layout {
    /// Big readout
    pub readout: Rect,
    /// Pickers, laps or world clock cards
    pub content: Rect,
}

impl Layout {
    /// Leaves room for the egui tab bar on top and the control bar at the bottom
    pub fn calculate(window_rect: Rect) -> Self {
        let inner = Rect::from_corners(
            pt2(window_rect.left() + 32.0, window_rect.bottom() + 72.0),
            pt2(window_rect.right() - 32.0, window_rect.top() - 56.0),
        );
        let readout_h = DIGIT_HEIGHT + 64.0;
        Layout {
            readout: Rect::from_x_y_w_h(
                inner.x(),
                inner.top() - readout_h / 2.0,
                inner.w(),
                readout_h,
            ),
            content: Rect::from_corners(
                pt2(inner.left(), inner.bottom()),
                pt2(inner.right(), inner.top() - readout_h - 16.0),
            ),
        }
    }

    /// World clock cards use the whole area under the tab bar
    pub fn world_area(&self) -> Rect {
        Rect::from_corners(self.content.bottom_left(), self.readout.top_right())
    }

    /// Hit rectangles for the three countdown pickers
    pub fn picker_columns(&self, item_height: f32, visible_items: usize) -> [(TimeField, Rect); 3] {
        let height = item_height * visible_items as f32;
        let center_y = self.content.top() - 24.0 - height / 2.0;
        let step = PICKER_WIDTH + PICKER_GAP;
        let column = |index: f32| {
            Rect::from_x_y_w_h(self.content.x() + (index - 1.0) * step, center_y, PICKER_WIDTH, height)
        };
        [
            (TimeField::Hours, column(0.0)),
            (TimeField::Minutes, column(1.0)),
            (TimeField::Seconds, column(2.0)),
        ]
    }
}

/// Find the picker under a point
pub fn picker_at(layout: &Layout, item_height: f32, visible_items: usize, pos: Point2) -> Option<TimeField> {
    layout
        .picker_columns(item_height, visible_items)
        .into_iter()
        .find(|(_, rect)| rect.contains(pos))
        .map(|(field, _)| field)
}

/// Draw the stopwatch/timer readout as seven-segment digits
pub fn draw_segment_readout(draw: &Draw, groups: &[[u8; 2]], rect: Rect) {
    let group_w = DIGIT_WIDTH * 2.0 + DIGIT_GAP;
    let total_w = group_w * groups.len() as f32 + COLON_WIDTH * (groups.len().saturating_sub(1)) as f32;
    let mut x = rect.x() - total_w / 2.0;
    let y = rect.y();

    for (index, pair) in groups.iter().enumerate() {
        if index > 0 {
            draw_colon(draw, pt2(x + COLON_WIDTH / 2.0, y));
            x += COLON_WIDTH;
        }
        for (slot, &digit) in pair.iter().enumerate() {
            let cx = x + DIGIT_WIDTH / 2.0 + slot as f32 * (DIGIT_WIDTH + DIGIT_GAP);
            draw_digit(draw, digit, pt2(cx, y));
        }
        x += group_w;
    }
}

fn draw_digit(draw: &Draw, digit: u8, center: Point2) {
    let segments = segments_for(digit);
    for (lit, rect) in segments.iter().zip(segment_rects(center).iter()) {
        let color = if *lit { colors::ACCENT } else { colors::SEGMENT_OFF };
        draw.rect().xy(rect.xy()).wh(rect.wh()).color(color);
    }
}

/// Segment rectangles in a..g order
fn segment_rects(center: Point2) -> [Rect; 7] {
    let t = SEGMENT_THICKNESS;
    let half_w = DIGIT_WIDTH / 2.0;
    let half_h = DIGIT_HEIGHT / 2.0;
    let bar_w = DIGIT_WIDTH - t * 2.0;
    let post_h = half_h - t;
    let quarter = half_h / 2.0;
    let at = |dx: f32, dy: f32, w: f32, h: f32| Rect::from_x_y_w_h(center.x + dx, center.y + dy, w, h);

    [
        at(0.0, half_h - t / 2.0, bar_w, t),
        at(half_w - t / 2.0, quarter, t, post_h),
        at(half_w - t / 2.0, -quarter, t, post_h),
        at(0.0, -half_h + t / 2.0, bar_w, t),
        at(-half_w + t / 2.0, -quarter, t, post_h),
        at(-half_w + t / 2.0, quarter, t, post_h),
        at(0.0, 0.0, bar_w, t),
    ]
}

fn draw_colon(draw: &Draw, center: Point2) {
    for dy in [-16.0, 16.0] {
        draw.rect()
            .xy(center + vec2(0.0, dy))
            .w_h(7.0, 7.0)
            .color(colors::ACCENT);
    }
}

/// Draw one picker column: depth-faded numbers around a selection band
pub fn draw_picker(draw: &Draw, picker: &ScrollPicker, field: TimeField, rect: Rect, reduced_motion: bool) {
    let item_height = picker.config().item_height;

    draw.rect().xy(rect.xy()).wh(rect.wh()).color(colors::CARD);
    draw.rect()
        .xy(rect.xy())
        .w_h(rect.w(), item_height)
        .color(srgba(53u8, 191u8, 171u8, 30u8));

    let half = rect.h() / 2.0 - item_height / 2.0;
    for item in picker.visible_items() {
        if item.y.abs() > half {
            continue;
        }
        let (alpha, scale) = if reduced_motion {
            (255u8, 1.0)
        } else {
            ((item.opacity * 255.0) as u8, item.scale)
        };
        // Strip offsets grow downward, window y grows upward
        draw.text(&format!("{:02}", item.value))
            .xy(pt2(rect.x(), rect.y() - item.y))
            .color(srgba(240u8, 240u8, 240u8, alpha))
            .font_size((30.0 * scale) as u32)
            .w(rect.w());
    }

    draw.text(field.label())
        .xy(pt2(rect.x(), rect.top() + 14.0))
        .color(colors::TEXT_SECONDARY)
        .font_size(14)
        .w(rect.w());
}

/// Draw all three pickers
pub fn draw_timer_input(draw: &Draw, page: &ClockPage<SystemClock>, layout: &Layout, reduced_motion: bool) {
    let config = *page.picker(TimeField::Hours).config();
    let columns = layout.picker_columns(config.item_height, config.visible_items);
    for (index, (field, rect)) in columns.iter().enumerate() {
        draw_picker(draw, page.picker(*field), *field, *rect, reduced_motion);
        if index > 0 {
            draw.text(":")
                .xy(pt2(rect.left() - PICKER_GAP / 2.0, rect.y()))
                .color(colors::TEXT_SECONDARY)
                .font_size(28)
                .w(PICKER_GAP);
        }
    }
}

/// Draw laps as a three-column grid, newest first
pub fn draw_laps(draw: &Draw, laps: &LapRecorder, rect: Rect) {
    let columns = 3;
    let cell_w = rect.w() / columns as f32;
    let cell_h = 44.0;

    for (slot, (number, lap)) in laps.numbered().enumerate() {
        let row = slot / columns;
        let col = slot % columns;
        let y = rect.top() - cell_h / 2.0 - row as f32 * (cell_h + 8.0);
        if y < rect.bottom() {
            break;
        }
        let x = rect.left() + cell_w / 2.0 + col as f32 * cell_w;
        draw.rect()
            .x_y(x, y)
            .w_h(cell_w - 12.0, cell_h)
            .color(colors::CARD);
        draw.text(&format!("{}.  {}", number, format_duration(lap.elapsed_ms)))
            .x_y(x, y)
            .color(colors::TEXT_PRIMARY)
            .font_size(16)
            .w(cell_w - 20.0);
    }
}

/// Draw the world clock grid
pub fn draw_world_clocks(draw: &Draw, readings: &[WorldClockReading], rect: Rect) {
    let columns = if rect.w() >= 640.0 { 3 } else { 2 };
    let gap = 14.0;
    let card_w = (rect.w() - gap * (columns - 1) as f32) / columns as f32;
    let card_h = 112.0;

    for (index, reading) in readings.iter().enumerate() {
        let row = index / columns;
        let col = index % columns;
        let x = rect.left() + card_w / 2.0 + col as f32 * (card_w + gap);
        let y = rect.top() - card_h / 2.0 - row as f32 * (card_h + gap);
        if y - card_h / 2.0 < rect.bottom() {
            break;
        }
        let card = Rect::from_x_y_w_h(x, y, card_w, card_h);
        draw_world_clock_card(draw, reading, card);
    }
}

fn draw_world_clock_card(draw: &Draw, reading: &WorldClockReading, card: Rect) {
    draw.rect().xy(card.xy()).wh(card.wh()).color(colors::CARD);

    let text_w = card.w() - 24.0;
    let left = card.left() + 12.0 + text_w / 2.0;
    draw.text(&reading.display_name)
        .x_y(left, card.top() - 20.0)
        .color(colors::TEXT_PRIMARY)
        .font_size(18)
        .left_justify()
        .w(text_w);
    draw.text(&reading.time)
        .x_y(left, card.y())
        .color(colors::ACCENT)
        .font_size(34)
        .left_justify()
        .w(text_w);

    if let Some(note) = &reading.dst_note {
        draw.text(note)
            .x_y(left, card.top() - 20.0)
            .color(colors::ACCENT)
            .font_size(11)
            .right_justify()
            .w(text_w);
    }

    let dst = if reading.is_dst { " · DST" } else { "" };
    draw.text(&format!("{}  {}{}", reading.date, reading.utc_offset, dst))
        .x_y(left, card.bottom() + 18.0)
        .color(colors::TEXT_SECONDARY)
        .font_size(12)
        .left_justify()
        .w(text_w);
}

/// Banner shown when the countdown runs out
pub fn draw_notice_banner(draw: &Draw, message: &str, rect: Rect) {
    let banner = Rect::from_x_y_w_h(rect.x(), rect.bottom() + 24.0, 260.0, 40.0);
    draw.rect().xy(banner.xy()).wh(banner.wh()).color(colors::NOTICE_BG);
    draw.text(message)
        .xy(banner.xy())
        .color(colors::TEXT_PRIMARY)
        .font_size(18)
        .w(banner.w() - 20.0);
}
