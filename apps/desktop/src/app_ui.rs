use super::{App, NewScriptForm, PendingOp};
use crate::keyboard::KeyCommand;
use chrono::Local;
use egui::{ComboBox, RichText, ScrollArea};
use scripts::ScriptOrder;

fn order_label(order: ScriptOrder) -> &'static str {
    match order {
        ScriptOrder::Title => "Title",
        ScriptOrder::RecentlyCreated => "Recently created",
    }
}

pub(super) fn script_list(app: &mut App, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.heading("Scripts");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .button("+")
                .on_hover_text(format!(
                    "Add Script ({})",
                    KeyCommand::NewScript.shortcut_text()
                ))
                .clicked()
            {
                app.new_script.get_or_insert_with(NewScriptForm::default);
            }
            let edit_text = if app.list_editing { "Done" } else { "Edit" };
            if ui.button(edit_text).clicked() {
                app.list_editing = !app.list_editing;
            }
        });
    });

    let mut order = app.config.list_order;
    ComboBox::from_label("Sort")
        .selected_text(order_label(order))
        .show_ui(ui, |ui| {
            for o in [ScriptOrder::Title, ScriptOrder::RecentlyCreated] {
                ui.selectable_value(&mut order, o, order_label(o));
            }
        });
    if order != app.config.list_order {
        app.set_list_order(order);
    }
    ui.separator();

    if app.scripts.is_empty() {
        ui.label(RichText::new("No scripts yet").weak());
        return;
    }

    let selected = app.detail.as_ref().map(|d| d.id().to_string());
    let mut open = None;
    let mut delete = None;
    ScrollArea::vertical()
        .id_salt("script_list_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for script in &app.scripts {
                ui.horizontal(|ui| {
                    if app.list_editing
                        && ui
                            .button(RichText::new("⊖").color(egui::Color32::from_rgb(220, 70, 70)))
                            .on_hover_text("Delete")
                            .clicked()
                    {
                        delete = Some(script.id.clone());
                    }
                    let is_selected = selected.as_deref() == Some(script.id.as_str());
                    let row = ui
                        .vertical(|ui| {
                            ui.label(RichText::new(script.display_title()).strong());
                            ui.label(RichText::new(script.preview()).small().weak());
                        })
                        .response
                        .interact(egui::Sense::click());
                    if is_selected {
                        ui.painter().rect_stroke(
                            row.rect.expand(2.0),
                            4.0,
                            ui.visuals().selection.stroke,
                        );
                    }
                    let updated = script.updated_at.with_timezone(&Local);
                    let row = row.on_hover_text(format!("Updated {}", updated.format("%Y-%m-%d %H:%M")));
                    if row.clicked() && !app.list_editing {
                        open = Some(script.clone());
                    }
                });
                ui.separator();
            }
        });

    if let Some(id) = delete {
        super::app_scripts::run(app, PendingOp::Delete { id });
    }
    if let Some(script) = open {
        app.open_script(script);
    }
}

pub(super) fn new_script_window(app: &mut App, ctx: &egui::Context) {
    let Some(form) = app.new_script.as_mut() else {
        return;
    };
    let mut save = false;
    let mut cancel = false;
    egui::Window::new("New Script")
        .collapsible(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.add(
                egui::TextEdit::singleline(&mut form.title)
                    .hint_text("Title")
                    .desired_width(f32::INFINITY),
            );
            ui.add(
                egui::TextEdit::multiline(&mut form.content)
                    .hint_text("Content")
                    .desired_rows(10)
                    .desired_width(f32::INFINITY),
            );
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Save").clicked() {
                        save = true;
                    }
                });
            });
        });

    if cancel {
        app.new_script = None;
    } else if save {
        let op = PendingOp::Create {
            title: form.title.clone(),
            content: form.content.clone(),
        };
        super::app_scripts::run(app, op);
    }
}
