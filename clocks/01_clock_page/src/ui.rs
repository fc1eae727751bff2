//! UI module - egui mode tabs, control bar and world clock editor
//!
//! Every function returns what the user asked for; main.rs applies it to the page.

use chrono_tz::Tz;
use nannou_egui::egui;
use shared::{city_name, search_timezones, timezone_count, PageMode, WorldClockReading};

/// Control bar state for this frame
pub struct ControlsView {
    pub mode: PageMode,
    pub is_running: bool,
    pub can_start: bool,
    pub can_reset: bool,
    pub can_lap: bool,
}

/// Button presses from the control bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    StartPause,
    Reset,
    Lap,
    EditWorldClocks,
}

/// Draw the mode selector tabs
pub fn draw_mode_tabs(ctx: &egui::Context, current: PageMode) -> Option<PageMode> {
    let mut selected = None;

    egui::TopBottomPanel::top("mode_tabs")
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for &mode in PageMode::all() {
                    if ui.selectable_label(mode == current, mode.label()).clicked() {
                        selected = Some(mode);
                    }
                }
            });
        });

    selected
}

/// Draw the bottom control bar
pub fn draw_controls(ctx: &egui::Context, view: &ControlsView) -> Option<ControlAction> {
    let mut action = None;

    egui::TopBottomPanel::bottom("controls")
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if view.mode == PageMode::WorldClock {
                    if ui.button("Edit cities").clicked() {
                        action = Some(ControlAction::EditWorldClocks);
                    }
                    return;
                }

                if view.mode == PageMode::Stopwatch
                    && ui.add_enabled(view.can_lap, egui::Button::new("Lap")).clicked()
                {
                    action = Some(ControlAction::Lap);
                }

                let label = if view.is_running { "Pause" } else { "Start" };
                let enabled = view.is_running || view.can_start;
                if ui.add_enabled(enabled, egui::Button::new(label)).clicked() {
                    action = Some(ControlAction::StartPause);
                }

                if ui.add_enabled(view.can_reset, egui::Button::new("Reset")).clicked() {
                    action = Some(ControlAction::Reset);
                }

                ui.separator();
                ui.label("Space start/pause · R reset · L lap · 1-3 modes");
            });
        });

    action
}

/// State for the world clock editor window
#[derive(Default)]
pub struct ZoneEditorState {
    pub is_open: bool,
    pub search_query: String,
    pub search_results: Vec<Tz>,
    pub should_focus_search: bool,
    /// Keyboard selection in the results list
    pub selected_index: Option<usize>,
}

impl ZoneEditorState {
    pub fn open(&mut self) {
        self.is_open = true;
        self.search_query.clear();
        self.search_results = search_timezones("");
        self.should_focus_search = true;
        self.selected_index = None;
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.search_query.clear();
        self.search_results.clear();
        self.selected_index = None;
    }

    pub fn update_search(&mut self) {
        self.search_results = search_timezones(&self.search_query);
        self.selected_index = if self.search_results.is_empty() {
            None
        } else {
            Some(0)
        };
    }

    /// Move the keyboard selection, wrapping at both ends
    pub fn move_selection(&mut self, delta: i32) {
        if self.search_results.is_empty() {
            self.selected_index = None;
            return;
        }
        let len = self.search_results.len() as i32;
        let next = match self.selected_index {
            None if delta > 0 => 0,
            None => len - 1,
            Some(idx) => (idx as i32 + delta).rem_euclid(len),
        };
        self.selected_index = Some(next as usize);
    }

    pub fn get_selected(&self) -> Option<Tz> {
        self.selected_index
            .and_then(|idx| self.search_results.get(idx).copied())
    }
}

/// Result of editor interactions
#[derive(Default)]
pub struct EditorResult {
    pub add: Option<Tz>,
    pub remove: Option<u32>,
    pub close: bool,
}

/// Draw the world clock editor: current cities plus a timezone search
pub fn draw_zone_editor(
    ctx: &egui::Context,
    state: &mut ZoneEditorState,
    readings: &[WorldClockReading],
    is_listed: impl Fn(Tz) -> bool,
) -> EditorResult {
    let mut result = EditorResult::default();

    if !state.is_open {
        return result;
    }

    egui::Window::new("World Clocks")
        .collapsible(false)
        .resizable(true)
        .default_width(380.0)
        .default_height(480.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("Showing:");
            for reading in readings {
                ui.horizontal(|ui| {
                    if ui.small_button("✕").clicked() {
                        result.remove = Some(reading.id);
                    }
                    ui.label(format!("{} · {}", reading.display_name, reading.utc_offset));
                });
            }

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Add:");
                let response = ui.text_edit_singleline(&mut state.search_query);
                if state.should_focus_search {
                    response.request_focus();
                    state.should_focus_search = false;
                }
                if response.changed() {
                    state.update_search();
                }
            });

            ui.label(format!(
                "Showing {} of {} time zones",
                state.search_results.len(),
                timezone_count()
            ));

            egui::ScrollArea::vertical()
                .max_height(240.0)
                .show(ui, |ui| {
                    for (idx, &tz) in state.search_results.iter().enumerate() {
                        let listed = is_listed(tz);
                        let is_keyboard_selected = state.selected_index == Some(idx);
                        let label = format!("{} ({})", tz.name(), city_name(tz));
                        let response = ui.add_enabled(
                            !listed,
                            egui::SelectableLabel::new(is_keyboard_selected, label),
                        );
                        if is_keyboard_selected {
                            response.scroll_to_me(Some(egui::Align::Center));
                        }
                        if response.clicked() {
                            result.add = Some(tz);
                        }
                    }
                });

            ui.separator();
            ui.label("↑↓ Navigate · Enter Add · Esc Close");

            if ui.button("Close").clicked() {
                result.close = true;
            }
        });

    ctx.input(|i| {
        if i.key_pressed(egui::Key::ArrowDown) {
            state.move_selection(1);
        }
        if i.key_pressed(egui::Key::ArrowUp) {
            state.move_selection(-1);
        }
        if i.key_pressed(egui::Key::Enter) {
            if let Some(tz) = state.get_selected() {
                if !is_listed(tz) {
                    result.add = Some(tz);
                }
            }
        }
    });

    result
}

/// Draw the settings panel
pub fn draw_settings_panel(ctx: &egui::Context, reduced_motion: &mut bool) -> bool {
    let mut changed = false;

    egui::Window::new("Settings")
        .collapsible(true)
        .default_open(false)
        .resizable(false)
        .default_width(200.0)
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 40.0])
        .show(ctx, |ui| {
            if ui.checkbox(reduced_motion, "Reduced Motion").changed() {
                changed = true;
            }
            ui.label("Flattens the picker depth effect");
        });

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_editor_selection_wraps() {
        let mut state = ZoneEditorState::default();
        state.open();
        state.search_query = "Europe/Lond".to_string();
        state.update_search();
        assert_eq!(state.selected_index, Some(0));
        assert_eq!(state.get_selected().map(|tz| tz.name()), Some("Europe/London"));

        state.move_selection(-1);
        assert_eq!(state.selected_index, Some(state.search_results.len() - 1));
        state.move_selection(1);
        assert_eq!(state.selected_index, Some(0));

        state.close();
        assert!(state.search_results.is_empty());
        assert_eq!(state.get_selected(), None);
    }
}
