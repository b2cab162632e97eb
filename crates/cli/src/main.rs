use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use scripts::{transfer, Script, ScriptDb, ScriptOrder, ScriptStore};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "teleprompter-cli")]
#[command(about = "Teleprompter CLI - Manage scripts without the desktop app")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Script database (defaults to the app data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OrderArg {
    Title,
    Recent,
}

impl From<OrderArg> for ScriptOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Title => ScriptOrder::Title,
            OrderArg::Recent => ScriptOrder::RecentlyCreated,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List scripts with a short preview
    List {
        #[arg(long, value_enum, default_value = "title")]
        order: OrderArg,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print one script with its display settings
    Show { id: String },

    /// Add a new script
    Add {
        #[arg(short, long)]
        title: String,

        /// Script text
        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,

        /// Read the script text from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Replace the title and/or text of a script
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,

        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Change font size or scroll speed
    Set {
        id: String,

        /// Font size (10-100)
        #[arg(long)]
        font_size: Option<f64>,

        /// Scroll speed (1-100)
        #[arg(long)]
        scroll_speed: Option<f64>,
    },

    /// Delete a script permanently
    Delete { id: String },

    /// Print the number of stored scripts
    Count,

    /// Add the welcome sample script
    Sample,

    /// Write every script as JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Add scripts from an export file, skipping ids already present
    Import { path: PathBuf },
}

#[derive(Serialize)]
struct ListRow<'a> {
    id: &'a str,
    title: &'a str,
    preview: String,
    updated_at: DateTime<Utc>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let db_path = cli.db.clone().unwrap_or_else(scripts::default_db_path);
    let mut db = ScriptDb::open_or_create(&db_path)
        .with_context(|| format!("open script database {}", db_path.display()))?;
    let mut out = std::io::stdout().lock();
    run(cli.command, &mut db, &mut out)
}

fn run(command: Commands, store: &mut dyn ScriptStore, out: &mut dyn Write) -> Result<()> {
    match command {
        Commands::List { order, json } => list_command(store, order.into(), json, out),
        Commands::Show { id } => show_command(store, &id, out),
        Commands::Add {
            title,
            content,
            file,
        } => {
            let content = read_content(content, file.as_deref())?.unwrap_or_default();
            let script = store.create(&title, &content).context("add script")?;
            info!(id = %script.id, "added script");
            writeln!(out, "{}", script.id)?;
            Ok(())
        }
        Commands::Edit {
            id,
            title,
            content,
            file,
        } => edit_command(store, &id, title, read_content(content, file.as_deref())?, out),
        Commands::Set {
            id,
            font_size,
            scroll_speed,
        } => set_command(store, &id, font_size, scroll_speed, out),
        Commands::Delete { id } => {
            store
                .delete(&id)
                .with_context(|| format!("delete script {id}"))?;
            info!(id = %id, "deleted script");
            writeln!(out, "Deleted {id}")?;
            Ok(())
        }
        Commands::Count => {
            writeln!(out, "{}", store.count()?)?;
            Ok(())
        }
        Commands::Sample => {
            let sample = Script::sample();
            store.insert(&sample).context("add sample script")?;
            writeln!(out, "{}", sample.id)?;
            Ok(())
        }
        Commands::Export { out: path } => {
            let json = transfer::export_json(&*store).context("export scripts")?;
            match path {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("write {}", path.display()))?;
                    info!(path = %path.display(), "exported scripts");
                }
                None => writeln!(out, "{json}")?,
            }
            Ok(())
        }
        Commands::Import { path } => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            let added = transfer::import_json(store, &json).context("import scripts")?;
            writeln!(out, "Imported {added} script(s)")?;
            Ok(())
        }
    }
}

fn read_content(content: Option<String>, file: Option<&Path>) -> Result<Option<String>> {
    match (content, file) {
        (Some(_), Some(_)) => bail!("pass either --content or --file, not both"),
        (Some(text), None) => Ok(Some(text)),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Some(text))
        }
        (None, None) => Ok(None),
    }
}

fn list_command(
    store: &dyn ScriptStore,
    order: ScriptOrder,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let scripts = store.list_by(order)?;
    if json {
        let rows: Vec<ListRow> = scripts
            .iter()
            .map(|s| ListRow {
                id: &s.id,
                title: s.display_title(),
                preview: s.preview(),
                updated_at: s.updated_at,
            })
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
        return Ok(());
    }
    for s in &scripts {
        writeln!(out, "{}  {}", s.id, s.display_title())?;
        writeln!(out, "    {}", s.preview())?;
    }
    Ok(())
}

fn show_command(store: &dyn ScriptStore, id: &str, out: &mut dyn Write) -> Result<()> {
    let s = store.get(id).with_context(|| format!("show script {id}"))?;
    writeln!(out, "Title:        {}", s.display_title())?;
    writeln!(out, "Font size:    {}", s.font_size)?;
    writeln!(out, "Scroll speed: {:.1}", s.scroll_speed)?;
    writeln!(out, "Created:      {}", s.created_at.to_rfc3339())?;
    writeln!(out, "Updated:      {}", s.updated_at.to_rfc3339())?;
    writeln!(out)?;
    writeln!(out, "{}", s.display_content())?;
    Ok(())
}

fn edit_command(
    store: &mut dyn ScriptStore,
    id: &str,
    title: Option<String>,
    content: Option<String>,
    out: &mut dyn Write,
) -> Result<()> {
    if title.is_none() && content.is_none() {
        bail!("nothing to edit: pass --title, --content or --file");
    }
    let mut script = store.get(id).with_context(|| format!("edit script {id}"))?;
    let title = title.unwrap_or_else(|| script.display_title().to_string());
    let content = content.unwrap_or_else(|| script.display_content().to_string());
    script.edit(title, content);
    store.update(&script).context("save script")?;
    info!(id = %id, "edited script");
    writeln!(out, "Updated {id}")?;
    Ok(())
}

fn set_command(
    store: &mut dyn ScriptStore,
    id: &str,
    font_size: Option<f64>,
    scroll_speed: Option<f64>,
    out: &mut dyn Write,
) -> Result<()> {
    if font_size.is_none() && scroll_speed.is_none() {
        bail!("nothing to set: pass --font-size or --scroll-speed");
    }
    let mut script = store.get(id).with_context(|| format!("set script {id}"))?;
    script.apply_settings(
        font_size.unwrap_or(script.font_size),
        scroll_speed.unwrap_or(script.scroll_speed),
    )?;
    store.update(&script).context("save display settings")?;
    writeln!(
        out,
        "Font size {}, scroll speed {:.1}",
        script.font_size, script.scroll_speed
    )?;
    Ok(())
}
