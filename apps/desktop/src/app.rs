mod app_scripts;
mod app_ui;

use app_scripts::{Alert, PendingOp};

/// Draft for the new-script sheet. Kept open until the store accepts it.
#[derive(Clone, Debug, Default)]
struct NewScriptForm {
    title: String,
    content: String,
}

struct App {
    db: ScriptDb,
    config: AppConfig,
    config_path: PathBuf,
    scheduler: SharedScheduler,
    scripts: Vec<Script>,
    detail: Option<ScriptDetail>,
    list_editing: bool,
    new_script: Option<NewScriptForm>,
    alert: Option<Alert>,
}

impl App {
    fn new(db: ScriptDb, config: AppConfig, config_path: PathBuf) -> Self {
        let mut app = Self {
            db,
            config,
            config_path,
            scheduler: clock::shared_scheduler(),
            scripts: Vec::new(),
            detail: None,
            list_editing: false,
            new_script: None,
            alert: None,
        };
        app_scripts::run(&mut app, PendingOp::Reload);
        app
    }

    fn open_script(&mut self, script: Script) {
        if self.detail.as_ref().is_some_and(|d| d.id() == script.id) {
            return;
        }
        match ScriptDetail::open(
            self.scheduler.clone(),
            script,
            self.config.step_delta,
            self.config.overlay_size,
        ) {
            Ok(detail) => self.detail = Some(detail),
            Err(err) => tracing::error!(error = %err, "failed to open script"),
        }
    }

    fn set_list_order(&mut self, order: ScriptOrder) {
        if self.config.list_order == order {
            return;
        }
        self.config.list_order = order;
        if let Err(err) = self.config.save(&self.config_path) {
            tracing::warn!(error = %err, "failed to save config");
        }
        app_scripts::run(self, PendingOp::Reload);
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if KeyCommand::NewScript.check(ctx) && self.new_script.is_none() {
            self.new_script = Some(NewScriptForm::default());
        }

        egui::SidePanel::left("script_list")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| app_ui::script_list(self, ui));

        let mut action = None;
        egui::CentralPanel::default().show(ctx, |ui| match self.detail.as_mut() {
            Some(detail) => {
                action = detail.show(ui).map(|a| (detail.id().to_string(), a));
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label(egui::RichText::new("Select a script").weak());
                });
            }
        });
        if let Some((id, action)) = action {
            let op = match action {
                DetailAction::SaveEdit { title, content } => PendingOp::SaveEdit { id, title, content },
                DetailAction::SaveSettings {
                    font_size,
                    scroll_speed,
                } => PendingOp::SaveSettings {
                    id,
                    font_size,
                    scroll_speed,
                },
            };
            app_scripts::run(self, op);
        }

        app_ui::new_script_window(self, ctx);
        app_scripts::alert_window(self, ctx);
    }
}
