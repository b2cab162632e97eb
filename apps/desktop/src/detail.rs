use crate::clock::{Scroller, SharedScheduler};
use crate::keyboard::KeyCommand;
use crate::overlay::FloatingOverlay;
use crate::player::{transport_controls, ScrollView};
use eframe::egui;
use playback::{Extent, FrameEvent, PlaybackError};
use scripts::{Script, FONT_SIZE_RANGE, SCROLL_SPEED_RANGE};

/// Store writes the detail view asks the app to perform.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DetailAction {
    SaveEdit { title: String, content: String },
    SaveSettings { font_size: f64, scroll_speed: f64 },
}

/// Player, editor and settings sheet for the selected script.
pub(crate) struct ScriptDetail {
    pub(crate) script: Script,
    editing: bool,
    edited_title: String,
    edited_content: String,
    settings_open: bool,
    font_draft: f64,
    speed_draft: f64,
    scroller: Scroller,
    view: ScrollView,
    overlay: Option<FloatingOverlay>,
    scheduler: SharedScheduler,
    step_delta: f32,
    overlay_size: Extent,
}

impl ScriptDetail {
    pub(crate) fn open(
        scheduler: SharedScheduler,
        script: Script,
        step_delta: f32,
        overlay_size: Extent,
    ) -> Result<Self, PlaybackError> {
        let scroller = Scroller::new(scheduler.clone(), script.scroll_speed as f32)?
            .with_step_delta(step_delta);
        tracing::debug!(id = %script.id, "opened script");
        Ok(Self {
            edited_title: script.title.clone().unwrap_or_default(),
            edited_content: script.content.clone().unwrap_or_default(),
            font_draft: script.font_size,
            speed_draft: script.scroll_speed,
            view: ScrollView::new(("detail_scroll", script.id.as_str())),
            script,
            editing: false,
            settings_open: false,
            scroller,
            overlay: None,
            scheduler,
            step_delta,
            overlay_size,
        })
    }

    pub(crate) fn id(&self) -> &str {
        &self.script.id
    }

    /// The store accepted an edit; leave edit mode with the saved record.
    pub(crate) fn edit_saved(&mut self, script: Script) {
        self.editing = false;
        self.edited_title = script.title.clone().unwrap_or_default();
        self.edited_content = script.content.clone().unwrap_or_default();
        self.script = script;
    }

    /// The store accepted new display settings; close the sheet.
    pub(crate) fn settings_saved(&mut self, script: Script) {
        self.settings_open = false;
        self.font_draft = script.font_size;
        self.speed_draft = script.scroll_speed;
        self.script = script;
        self.apply_speed(self.speed_draft);
    }

    fn apply_speed(&mut self, speed: f64) {
        let speed = speed as f32;
        if let Err(err) = self.scroller.set_speed(speed) {
            tracing::warn!(error = %err, "ignoring scroll speed");
        }
        if let Some(overlay) = self.overlay.as_mut() {
            if let Err(err) = overlay.scroller.set_speed(speed) {
                tracing::warn!(error = %err, "ignoring overlay scroll speed");
            }
        }
    }

    /// The script as currently displayed, with unsaved settings drafts applied.
    fn preview(&self) -> Script {
        let mut shown = self.script.clone();
        shown.scroll_speed = self.speed_draft;
        shown.font_size = self.font_draft;
        shown
    }

    fn preview_font_size(&self) -> f32 {
        self.font_draft as f32
    }

    fn toggle_edit(&mut self) {
        self.editing = !self.editing;
        if self.editing {
            self.scroller.stop();
        }
    }

    fn toggle_floating(&mut self, ctx: &egui::Context) {
        if self.overlay.take().is_some() {
            tracing::debug!(id = %self.script.id, "floating overlay closed");
            return;
        }
        match FloatingOverlay::open(
            ctx,
            self.scheduler.clone(),
            &self.preview(),
            self.overlay_size,
            self.step_delta,
        ) {
            Ok(overlay) => self.overlay = Some(overlay),
            Err(err) => tracing::error!(error = %err, "failed to open floating overlay"),
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        for command in KeyCommand::pressed(ctx) {
            match command {
                KeyCommand::ToggleEdit => self.toggle_edit(),
                KeyCommand::ToggleFloating => self.toggle_floating(ctx),
                KeyCommand::ToggleLock => {
                    if let Some(overlay) = self.overlay.as_mut() {
                        overlay.toggle_lock();
                    }
                }
                KeyCommand::TogglePlay if !self.editing => {
                    self.scroller.toggle_play();
                }
                KeyCommand::Reset if !self.editing => self.view.apply(now, self.scroller.reset()),
                KeyCommand::StepBackward if !self.editing => {
                    self.view.apply(now, self.scroller.step_backward())
                }
                KeyCommand::StepForward if !self.editing => {
                    self.view.apply(now, self.scroller.step_forward())
                }
                _ => {}
            }
        }
    }

    pub(crate) fn show(&mut self, ui: &mut egui::Ui) -> Option<DetailAction> {
        let ctx = ui.ctx().clone();
        self.handle_keys(&ctx);
        let mut action = None;

        ui.horizontal(|ui| {
            let heading = if self.editing {
                "Edit Script"
            } else {
                self.script.display_title()
            };
            ui.heading(heading);
            if self.editing {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Save").clicked() {
                        action = Some(DetailAction::SaveEdit {
                            title: self.edited_title.clone(),
                            content: self.edited_content.clone(),
                        });
                    }
                });
            }
        });
        ui.separator();

        let toolbar_height = 40.0;
        let body_height = (ui.available_height() - toolbar_height).max(80.0);
        ui.allocate_ui(egui::vec2(ui.available_width(), body_height), |ui| {
            if self.editing {
                ui.add(
                    egui::TextEdit::singleline(&mut self.edited_title)
                        .hint_text("Title")
                        .desired_width(f32::INFINITY),
                );
                egui::ScrollArea::vertical()
                    .id_salt(("detail_editor", self.script.id.as_str()))
                    .show(ui, |ui| {
                        ui.add_sized(
                            ui.available_size(),
                            egui::TextEdit::multiline(&mut self.edited_content).hint_text("Content"),
                        );
                    });
            } else {
                let font_size = self.preview_font_size();
                self.view.show(
                    ui,
                    &mut self.scroller,
                    self.script.display_content(),
                    font_size,
                );
            }
        });

        ui.separator();
        ui.horizontal(|ui| {
            let edit_text = if self.editing { "▶" } else { "✏" };
            if ui
                .button(edit_text)
                .on_hover_text(KeyCommand::ToggleEdit.description())
                .clicked()
            {
                self.toggle_edit();
            }
            if ui.button("⚙").on_hover_text("Display settings").clicked() {
                self.settings_open = !self.settings_open;
            }
            if !self.editing {
                transport_controls(ui, &mut self.view, &mut self.scroller);
                let floating = if self.overlay.is_some() { "🗗 Close" } else { "🗗" };
                if ui
                    .button(floating)
                    .on_hover_text(KeyCommand::ToggleFloating.description())
                    .clicked()
                {
                    self.toggle_floating(&ctx);
                }
            }
        });

        if self.settings_open {
            if let Some(settings) = self.settings_window(&ctx) {
                action = Some(settings);
            }
        }

        let font_size = self.preview_font_size();
        if let Some(overlay) = self.overlay.as_mut() {
            if let Some(FrameEvent::CloseRequested) = overlay.show(&ctx, &self.script, font_size) {
                self.overlay = None;
                tracing::debug!(id = %self.script.id, "floating overlay closed");
            }
        }

        action
    }

    fn settings_window(&mut self, ctx: &egui::Context) -> Option<DetailAction> {
        let mut action = None;
        let mut open = true;
        let prev_speed = self.speed_draft;
        egui::Window::new("Settings")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("Display Settings").strong());
                egui::Grid::new("script_settings_grid")
                    .num_columns(2)
                    .show(ui, |ui| {
                        ui.label("Font Size");
                        ui.add(
                            egui::Slider::new(&mut self.font_draft, FONT_SIZE_RANGE)
                                .step_by(1.0)
                                .fixed_decimals(0),
                        );
                        ui.end_row();
                        ui.label("Scroll Speed");
                        ui.add(
                            egui::Slider::new(&mut self.speed_draft, SCROLL_SPEED_RANGE)
                                .step_by(1.0)
                                .fixed_decimals(1),
                        );
                        ui.end_row();
                    });
                ui.add_space(8.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Done").clicked() {
                        action = Some(DetailAction::SaveSettings {
                            font_size: self.font_draft,
                            scroll_speed: self.speed_draft,
                        });
                    }
                });
            });
        if self.speed_draft != prev_speed {
            self.apply_speed(self.speed_draft);
        }
        if !open {
            // Closing without Done reverts the drafts
            self.settings_open = false;
            self.font_draft = self.script.font_size;
            self.speed_draft = self.script.scroll_speed;
            self.apply_speed(self.speed_draft);
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::shared_scheduler;

    fn detail() -> ScriptDetail {
        let mut script = Script::sample();
        script.font_size = 32.0;
        script.scroll_speed = 2.0;
        ScriptDetail::open(shared_scheduler(), script, 50.0, Extent::new(300.0, 400.0)).unwrap()
    }

    #[test]
    fn test_overlay_follows_unsaved_font_draft() {
        let mut detail = detail();
        detail.font_draft = 56.0;
        detail.speed_draft = 7.0;

        assert_eq!(detail.preview_font_size(), 56.0);
        let shown = detail.preview();
        assert_eq!(shown.font_size, 56.0);
        assert_eq!(shown.scroll_speed, 7.0);
        assert_eq!(detail.script.font_size, 32.0);
    }

    #[test]
    fn test_saved_settings_become_the_drafts() {
        let mut detail = detail();
        detail.font_draft = 56.0;
        let mut saved = detail.script.clone();
        saved.font_size = 40.0;
        saved.scroll_speed = 3.0;
        detail.settings_saved(saved);

        assert_eq!(detail.preview_font_size(), 40.0);
        assert_eq!(detail.scroller.speed(), 3.0);
    }
}
