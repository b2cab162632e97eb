use crate::clock::{Scroller, SharedScheduler};
use crate::player::{transport_controls, ScrollView};
use eframe::egui;
use playback::{Extent, FrameEvent, PlaybackError, Point, WindowFrame};
use scripts::Script;

const HEADER_HEIGHT: f32 = 24.0;

fn container_of(ctx: &egui::Context) -> Extent {
    let rect = ctx.screen_rect();
    Extent::new(rect.width(), rect.height())
}

/// Draggable, pinch-resizable, lockable window playing the same script.
///
/// Dropping the overlay releases its tick source.
pub(crate) struct FloatingOverlay {
    pub(crate) frame: WindowFrame,
    pub(crate) scroller: Scroller,
    view: ScrollView,
}

impl FloatingOverlay {
    pub(crate) fn open(
        ctx: &egui::Context,
        scheduler: SharedScheduler,
        script: &Script,
        size: Extent,
        step_delta: f32,
    ) -> Result<Self, PlaybackError> {
        let container = container_of(ctx);
        let scroller =
            Scroller::new(scheduler, script.scroll_speed as f32)?.with_step_delta(step_delta);
        tracing::debug!(id = %script.id, "floating overlay opened");
        Ok(Self {
            frame: WindowFrame::new(container.center(), size),
            scroller,
            view: ScrollView::new(("overlay_scroll", script.id.as_str())),
        })
    }

    pub(crate) fn toggle_lock(&mut self) -> FrameEvent {
        self.frame.toggle_lock()
    }

    /// Returns `CloseRequested` when the user closes the window. `font_size`
    /// follows the detail view's draft so the overlay previews unsaved changes.
    pub(crate) fn show(
        &mut self,
        ctx: &egui::Context,
        script: &Script,
        font_size: f32,
    ) -> Option<FrameEvent> {
        let container = container_of(ctx);
        let size = self.frame.size;
        let top_left = egui::pos2(
            self.frame.position.x - size.width / 2.0,
            self.frame.position.y - size.height / 2.0,
        );
        let mut event = None;

        let area = egui::Area::new(egui::Id::new("floating_overlay"))
            .order(egui::Order::Foreground)
            .fixed_pos(top_left)
            .show(ctx, |ui| {
                egui::Frame::window(ui.style()).show(ui, |ui| {
                    ui.set_width(size.width);
                    ui.set_height(size.height);
                    ui.vertical(|ui| {
                        ui.horizontal(|ui| {
                            let handle_width = (ui.available_width() - 64.0).max(40.0);
                            let (rect, handle) = ui.allocate_exact_size(
                                egui::vec2(handle_width, HEADER_HEIGHT),
                                egui::Sense::drag(),
                            );
                            ui.painter().text(
                                rect.left_center(),
                                egui::Align2::LEFT_CENTER,
                                script.display_title(),
                                egui::FontId::proportional(16.0),
                                ui.visuals().strong_text_color(),
                            );
                            if handle.dragged() {
                                if let Some(p) = handle.interact_pointer_pos() {
                                    self.frame.drag_changed(Point::new(p.x, p.y));
                                }
                            }
                            if handle.drag_stopped() {
                                self.frame.drag_ended();
                            }

                            let lock_text = if self.frame.locked { "🔒" } else { "🔓" };
                            if ui
                                .button(lock_text)
                                .on_hover_text("Lock position and size")
                                .clicked()
                            {
                                self.frame.toggle_lock();
                            }
                            if ui.button("✖").on_hover_text("Close").clicked() {
                                event = Some(self.frame.close());
                            }
                        });
                        ui.separator();

                        let controls_height = 36.0;
                        let body_height = (ui.available_height() - controls_height).max(40.0);
                        ui.allocate_ui(egui::vec2(ui.available_width(), body_height), |ui| {
                            self.view.show(
                                ui,
                                &mut self.scroller,
                                script.display_content(),
                                font_size,
                            );
                        });

                        ui.separator();
                        ui.horizontal(|ui| {
                            transport_controls(ui, &mut self.view, &mut self.scroller);
                        });
                    });
                });
            });

        let hovered = ctx
            .input(|i| i.pointer.hover_pos())
            .is_some_and(|p| area.response.rect.contains(p));
        if hovered {
            let zoom = ctx.input(|i| i.zoom_delta());
            if zoom != 1.0 {
                self.frame.magnify(zoom, container);
            }
        }
        event
    }
}
