use super::App;
use eframe::egui;
use scripts::{ScriptStore, StoreError};

/// A store operation, kept so a failed one can be retried from the alert.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PendingOp {
    Reload,
    Create {
        title: String,
        content: String,
    },
    SaveEdit {
        id: String,
        title: String,
        content: String,
    },
    SaveSettings {
        id: String,
        font_size: f64,
        scroll_speed: f64,
    },
    Delete {
        id: String,
    },
}

impl PendingOp {
    fn label(&self) -> &'static str {
        match self {
            Self::Reload => "load scripts",
            Self::Create { .. } => "create script",
            Self::SaveEdit { .. } => "save script",
            Self::SaveSettings { .. } => "save display settings",
            Self::Delete { .. } => "delete script",
        }
    }
}

pub(crate) struct Alert {
    pub(crate) message: String,
    pub(crate) op: PendingOp,
}

/// Run `op` against the store, then re-list. Failures are logged and raised
/// as an alert; the list reload is retried on its own.
pub(super) fn run(app: &mut App, op: PendingOp) {
    match execute(app, &op) {
        Ok(()) if op != PendingOp::Reload => run(app, PendingOp::Reload),
        Ok(()) => {}
        Err(err) => {
            tracing::error!(op = op.label(), error = %err, "script store operation failed");
            app.alert = Some(Alert {
                message: format!("Could not {}: {err}", op.label()),
                op,
            });
        }
    }
}

fn execute(app: &mut App, op: &PendingOp) -> Result<(), StoreError> {
    match op {
        PendingOp::Reload => reload(app),
        PendingOp::Create { title, content } => {
            let script = app.db.create(title, content)?;
            tracing::info!(id = %script.id, "created script");
            app.new_script = None;
            app.open_script(script);
            Ok(())
        }
        PendingOp::SaveEdit { id, title, content } => {
            let mut script = app.db.get(id)?;
            script.edit(title.as_str(), content.as_str());
            app.db.update(&script)?;
            tracing::info!(id = %script.id, "saved script");
            if let Some(detail) = app.detail.as_mut().filter(|d| d.id() == id) {
                detail.edit_saved(script);
            }
            Ok(())
        }
        PendingOp::SaveSettings {
            id,
            font_size,
            scroll_speed,
        } => {
            let mut script = app.db.get(id)?;
            script.apply_settings(*font_size, *scroll_speed)?;
            app.db.update(&script)?;
            tracing::info!(id = %script.id, font_size, scroll_speed, "saved display settings");
            if let Some(detail) = app.detail.as_mut().filter(|d| d.id() == id) {
                detail.settings_saved(script);
            }
            Ok(())
        }
        PendingOp::Delete { id } => {
            app.db.delete(id)?;
            tracing::info!(id = %id, "deleted script");
            if app.detail.as_ref().is_some_and(|d| d.id() == id) {
                app.detail = None;
            }
            Ok(())
        }
    }
}

fn reload(app: &mut App) -> Result<(), StoreError> {
    app.scripts = app.db.list_by(app.config.list_order)?;
    tracing::debug!(count = app.scripts.len(), "reloaded script list");
    Ok(())
}

pub(super) fn alert_window(app: &mut App, ctx: &egui::Context) {
    let Some(alert) = app.alert.as_ref() else {
        return;
    };
    let mut retry = None;
    let mut dismiss = false;
    egui::Window::new("Something went wrong")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(&alert.message);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Retry").clicked() {
                    retry = Some(alert.op.clone());
                }
                if ui.button("Dismiss").clicked() {
                    dismiss = true;
                }
            });
        });
    if let Some(op) = retry {
        app.alert = None;
        run(app, op);
    } else if dismiss {
        app.alert = None;
    }
}
