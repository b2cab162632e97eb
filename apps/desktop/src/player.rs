use crate::clock::Scroller;
use eframe::egui;
use playback::{ScrollAnimation, ScrollUpdate};

const EASED_SECS: f64 = 0.25;

/// Offset the view is gliding between, in egui input time.
#[derive(Clone, Copy, Debug, Default)]
struct OffsetAnimation {
    from: f32,
    to: f32,
    started: f64,
    duration: f64,
    eased: bool,
}

impl OffsetAnimation {
    fn value_at(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let mut t = ((now - self.started) / self.duration).clamp(0.0, 1.0) as f32;
        if self.eased {
            t = t * t * (3.0 - 2.0 * t);
        }
        self.from + (self.to - self.from) * t
    }

    fn finished(&self, now: f64) -> bool {
        now - self.started >= self.duration
    }

    fn retarget(&mut self, update: ScrollUpdate, now: f64) {
        self.from = self.value_at(now);
        self.to = update.offset;
        self.started = now;
        match update.animation {
            ScrollAnimation::Linear(d) => {
                self.duration = d.as_secs_f64();
                self.eased = false;
            }
            ScrollAnimation::Eased => {
                self.duration = EASED_SECS;
                self.eased = true;
            }
        }
    }

    fn jump(&mut self, offset: f32) {
        self.from = offset;
        self.to = offset;
        self.duration = 0.0;
    }

    fn clamp_target(&mut self, max: f32) {
        self.from = self.from.min(max);
        self.to = self.to.min(max);
    }
}

/// Scrolling text surface driven by a [`Scroller`].
///
/// Pointer drags move the content through the controller. Wheel scrolling is
/// left to egui's scroll area and the controller adopts the resulting offset.
pub(crate) struct ScrollView {
    id: egui::Id,
    anim: OffsetAnimation,
    rect: Option<egui::Rect>,
}

impl ScrollView {
    pub(crate) fn new(id: impl std::hash::Hash) -> Self {
        Self {
            id: egui::Id::new(id),
            anim: OffsetAnimation::default(),
            rect: None,
        }
    }

    /// Feed a manual control result (reset, step) into the view.
    pub(crate) fn apply(&mut self, ui_time: f64, update: ScrollUpdate) {
        self.anim.retarget(update, ui_time);
    }

    pub(crate) fn show(&mut self, ui: &mut egui::Ui, scroller: &mut Scroller, text: &str, font_size: f32) {
        let now = ui.input(|i| i.time);
        if let Some(update) = scroller.poll() {
            self.anim.retarget(update, now);
        }

        let (dragging, wheeling) = match self.rect {
            Some(rect) => ui.input(|i| {
                let dragging = i.pointer.primary_down()
                    && i.pointer.press_origin().is_some_and(|p| rect.contains(p));
                let wheeling = i.raw_scroll_delta.y != 0.0
                    && i.pointer.hover_pos().is_some_and(|p| rect.contains(p));
                (dragging, wheeling)
            }),
            None => (false, false),
        };
        if dragging && !scroller.is_dragging() {
            scroller.begin_drag();
        } else if !dragging && scroller.is_dragging() {
            scroller.end_drag();
        }
        if dragging {
            let delta = ui.input(|i| i.pointer.delta().y);
            scroller.drag_scroll(-delta);
            self.anim.jump(scroller.offset());
        }

        let mut area = egui::ScrollArea::vertical()
            .id_salt(self.id)
            .auto_shrink([false, false])
            .drag_to_scroll(false);
        if !wheeling {
            area = area.vertical_scroll_offset(self.anim.value_at(now));
        }
        let output = area.show(ui, |ui| {
            egui::Frame::none().inner_margin(16.0).show(ui, |ui| {
                ui.add(
                    egui::Label::new(egui::RichText::new(text).size(font_size).strong())
                        .wrap()
                        .selectable(false),
                );
            });
        });
        self.rect = Some(output.inner_rect);

        if wheeling {
            scroller.sync_offset(output.state.offset.y);
            self.anim.jump(scroller.offset());
        }
        // Ticks keep running past the last line; hold the offset at the end
        let max_offset = (output.content_size.y - output.inner_rect.height()).max(0.0);
        if scroller.clamp_to_end(max_offset) {
            self.anim.clamp_target(scroller.offset());
        }

        if !self.anim.finished(now) || dragging || wheeling {
            ui.ctx().request_repaint();
        } else if let Some(next) = scroller.next_tick_in() {
            ui.ctx().request_repaint_after(next);
        }
    }
}

/// Reset / back / play / forward row shared by the player and the overlay.
pub(crate) fn transport_controls(ui: &mut egui::Ui, view: &mut ScrollView, scroller: &mut Scroller) {
    let now = ui.input(|i| i.time);
    if ui.button("⟲").on_hover_text("Back to top").clicked() {
        view.apply(now, scroller.reset());
    }
    if ui.button("⏪").on_hover_text("Step backward").clicked() {
        view.apply(now, scroller.step_backward());
    }
    let play_text = if scroller.is_playing() { "⏸" } else { "▶" };
    if ui
        .button(egui::RichText::new(play_text).size(18.0))
        .on_hover_text("Play/Pause")
        .clicked()
    {
        scroller.toggle_play();
    }
    if ui.button("⏩").on_hover_text("Step forward").clicked() {
        view.apply(now, scroller.step_forward());
    }
}
