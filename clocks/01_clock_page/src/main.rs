//! Clock Page
//!
//! Stopwatch with laps, countdown timer dialled in on inertial scroll pickers,
//! and a world clock grid.

mod drawing;
mod ui;

use nannou::prelude::*;
use nannou_egui::{self, Egui};
use serde::{Deserialize, Serialize};
use shared::{
    ClockPage, FrameQueue, PageConfig, PageEvent, PageMode, PickerConfig, SystemClock, TimeField,
    WorldClockSpec,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::drawing::{
    colors, draw_laps, draw_notice_banner, draw_segment_readout, draw_timer_input,
    draw_world_clocks, picker_at, Layout,
};
use crate::ui::{
    draw_controls, draw_mode_tabs, draw_settings_panel, draw_zone_editor, ControlAction,
    ControlsView, ZoneEditorState,
};

const APP_NAME: &str = "clock_page";

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().compact())
        .with(filter)
        .init();

    nannou::app(model).update(update).exit(exit).run();
}

/// Persisted configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct Config {
    default_mode: PageMode,
    world_clocks: Vec<WorldClockSpec>,
    picker: PickerConfig,
    reduced_motion: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_mode: PageMode::Stopwatch,
            world_clocks: shared::world_clock::default_world_clocks(),
            picker: PickerConfig::default(),
            reduced_motion: false,
        }
    }
}

/// Application state
struct Model {
    page: ClockPage<SystemClock, FrameQueue>,
    /// Picker column currently being dragged
    dragging: Option<TimeField>,
    mouse_position: Point2,
    editor: ZoneEditorState,
    reduced_motion: bool,
    config: Config,
    egui: Egui,
}

fn load_config() -> Config {
    match shared::load_config::<Config>(APP_NAME) {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            warn!("falling back to default config: {}", e);
            Config::default()
        }
    }
}

fn save_config(model: &mut Model) {
    model.config.world_clocks = model.page.world_clock_specs();
    model.config.reduced_motion = model.reduced_motion;
    if let Err(e) = shared::save_config(APP_NAME, &model.config) {
        error!("failed to save config: {}", e);
    }
}

fn model(app: &App) -> Model {
    let window_id = app
        .new_window()
        .title("Clock")
        .size(900, 720)
        .min_size(640, 600)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_moved(mouse_moved)
        .mouse_wheel(mouse_wheel)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let config = load_config();
    if config.picker.sanitized() != config.picker {
        warn!(picker = ?config.picker, "picker tuning out of range, clamping");
    }
    let page = ClockPage::new(
        SystemClock::new(),
        FrameQueue::new(),
        PageConfig {
            initial_mode: config.default_mode,
            picker: config.picker,
            world_clocks: config.world_clocks.clone(),
            ..PageConfig::default()
        },
    );
    info!(mode = ?page.mode(), "clock page ready");

    Model {
        page,
        dragging: None,
        mouse_position: pt2(0.0, 0.0),
        editor: ZoneEditorState::default(),
        reduced_motion: config.reduced_motion,
        config,
        egui,
    }
}

fn update(_app: &App, model: &mut Model, update: Update) {
    // Frames requested since the last update fire now
    let fired = model.page.frames_mut().drain();
    for event in model.page.update(&fired) {
        match event {
            PageEvent::TimerCompleted => info!("countdown finished"),
        }
    }

    model.egui.set_elapsed_time(update.since_start);
    let ctx = model.egui.begin_frame();

    let controls = ControlsView {
        mode: model.page.mode(),
        is_running: model.page.is_running(),
        can_start: model.page.can_start(),
        can_reset: model.page.can_reset(),
        can_lap: model.page.can_lap(),
    };
    let mut reduced_motion = model.reduced_motion;

    let mode_selection = draw_mode_tabs(&ctx, controls.mode);
    let action = draw_controls(&ctx, &controls);
    let settings_changed = draw_settings_panel(&ctx, &mut reduced_motion);
    let world_clocks = model.page.world_clocks();
    let editor_result = draw_zone_editor(
        &ctx,
        &mut model.editor,
        model.page.world_readings(),
        |tz| world_clocks.contains(tz),
    );

    drop(ctx);

    if let Some(mode) = mode_selection {
        switch_mode(model, mode);
    }
    if let Some(action) = action {
        apply_action(model, action);
    }
    if settings_changed {
        model.reduced_motion = reduced_motion;
        save_config(model);
    }

    let mut clocks_changed = false;
    if let Some(tz) = editor_result.add {
        match model.page.add_world_clock(tz.name(), "") {
            Ok(_) => clocks_changed = true,
            Err(e) => warn!("{}", e),
        }
    }
    if let Some(id) = editor_result.remove {
        clocks_changed |= model.page.remove_world_clock(id);
    }
    if clocks_changed {
        save_config(model);
    }
    if editor_result.close {
        model.editor.close();
    }
}

fn switch_mode(model: &mut Model, mode: PageMode) {
    model.dragging = None;
    model.editor.close();
    model.page.switch_mode(mode);
}

fn apply_action(model: &mut Model, action: ControlAction) {
    match action {
        ControlAction::StartPause => model.page.toggle_start_pause(),
        ControlAction::Reset => {
            model.page.reset();
        }
        ControlAction::Lap => {
            model.page.record_lap();
        }
        ControlAction::EditWorldClocks => model.editor.open(),
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();

    draw.background().color(colors::BACKGROUND);

    let layout = Layout::calculate(window_rect);
    match model.page.mode() {
        PageMode::WorldClock => {
            draw_world_clocks(&draw, model.page.world_readings(), layout.world_area());
        }
        PageMode::Stopwatch => {
            draw_segment_readout(&draw, &model.page.display_digits(), layout.readout);
            draw_laps(&draw, model.page.laps(), layout.content);
        }
        PageMode::Timer => {
            draw_segment_readout(&draw, &model.page.display_digits(), layout.readout);
            if model.page.pickers_visible() {
                draw_timer_input(&draw, &model.page, &layout, model.reduced_motion);
            }
        }
    }

    if let Some(message) = model.page.notice() {
        draw_notice_banner(&draw, message, layout.content);
    }

    draw.to_frame(app, &frame).unwrap();
    model.egui.draw_to_frame(&frame).unwrap();
}

fn exit(_app: &App, mut model: Model) {
    model.page.teardown();
    save_config(&mut model);
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    if model.editor.is_open {
        if key == Key::Escape {
            model.editor.close();
        }
        return;
    }
    match key {
        Key::Space => model.page.toggle_start_pause(),
        Key::R => apply_action(model, ControlAction::Reset),
        Key::L => apply_action(model, ControlAction::Lap),
        Key::Key1 => switch_mode(model, PageMode::Stopwatch),
        Key::Key2 => switch_mode(model, PageMode::Timer),
        Key::Key3 => switch_mode(model, PageMode::WorldClock),
        Key::E if model.page.mode() == PageMode::WorldClock => model.editor.open(),
        _ => {}
    }
}

fn hovered_picker(app: &App, model: &Model) -> Option<TimeField> {
    let config = model.page.picker(TimeField::Hours).config();
    let layout = Layout::calculate(app.window_rect());
    picker_at(&layout, config.item_height, config.visible_items, model.mouse_position)
}

// Pickers work in screen coordinates (y down); nannou's y grows upward
fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left || !model.page.pickers_visible() {
        return;
    }
    if let Some(field) = hovered_picker(app, model) {
        model.page.picker_pointer_down(field, -model.mouse_position.y);
        model.dragging = Some(field);
    }
}

fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left {
        return;
    }
    if let Some(field) = model.dragging.take() {
        model.page.picker_pointer_up(field);
    }
}

fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    model.mouse_position = pos;
    if let Some(field) = model.dragging {
        model.page.picker_pointer_move(field, -pos.y);
    }
}

fn mouse_wheel(app: &App, model: &mut Model, delta: MouseScrollDelta, _phase: TouchPhase) {
    let scroll_y = match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
    };
    if let Some(field) = hovered_picker(app, model) {
        // Scrolling down moves to the next value
        model.page.picker_wheel(field, -scroll_y);
    }
}

fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
    if let nannou::winit::event::WindowEvent::CursorLeft { .. } = event {
        model.dragging = None;
        model.page.release_all_pickers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_defaults_fill_missing_keys() {
        let config: Config = toml::from_str(
            r#"
            default_mode = "Timer"

            [picker]
            damping = 0.9
            "#,
        )
        .unwrap();
        assert_eq!(config.default_mode, PageMode::Timer);
        assert_eq!(config.picker.damping, 0.9);
        assert_eq!(config.picker.item_height, 44.0);
        assert_eq!(config.world_clocks.len(), 12);
        assert!(!config.reduced_motion);
    }

    #[test]
    fn test_undamped_picker_config_is_clamped() {
        let config: Config = toml::from_str(
            r#"
            [picker]
            damping = 1.0
            item_height = -3.0
            "#,
        )
        .unwrap();
        let picker = shared::ScrollPicker::new(23, config.picker);
        assert!(picker.config().damping < 1.0);
        assert_eq!(picker.config().item_height, 44.0);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.world_clocks.truncate(2);
        config.reduced_motion = true;
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.world_clocks, config.world_clocks);
        assert_eq!(parsed.picker, config.picker);
        assert!(parsed.reduced_motion);
    }
}
