use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

mod db;
pub use db::*;
mod memory;
pub use memory::*;
mod model;
pub use model::*;
pub mod transfer;

pub fn app_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| std::env::temp_dir());
    base.join("teleprompter")
}

pub fn default_db_path() -> PathBuf {
    app_data_dir().join("scripts.db")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write script store: {0}")]
    Write(#[source] rusqlite::Error),
    #[error("failed to read script store: {0}")]
    Read(#[from] rusqlite::Error),
    #[error("schema migration failed: {0}")]
    Migration(String),
    #[error("{field} {value} outside allowed range {min}..={max}")]
    Validation {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("script {id} updated at {updated_at} before it was created at {created_at}")]
    Timestamps {
        id: String,
        created_at: chrono::DateTime<chrono::Utc>,
        updated_at: chrono::DateTime<chrono::Utc>,
    },
    #[error("script not found: {0}")]
    NotFound(String),
    #[error("script already exists: {0}")]
    Duplicate(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptOrder {
    /// Title ascending, case-insensitive; ties by creation time.
    #[default]
    Title,
    /// Newest first.
    RecentlyCreated,
}

/// Persistence for [`Script`] records. Engines plug in behind this trait.
pub trait ScriptStore {
    /// Persist a fully formed record. Fails with `Duplicate` if the id exists.
    fn insert(&mut self, script: &Script) -> Result<()>;
    fn get(&self, id: &str) -> Result<Script>;
    fn list_by(&self, order: ScriptOrder) -> Result<Vec<Script>>;
    /// Write back an edited record. The caller bumps `updated_at`.
    fn update(&mut self, script: &Script) -> Result<()>;
    fn delete(&mut self, id: &str) -> Result<()>;
    fn count(&self) -> Result<usize>;

    /// Insert several records, all or none. Adapters with transactions
    /// override this; the default validates everything up front.
    fn insert_batch(&mut self, scripts: &[Script]) -> Result<()> {
        for script in scripts {
            script.validate()?;
            if self.contains(&script.id)? {
                return Err(StoreError::Duplicate(script.id.clone()));
            }
        }
        for script in scripts {
            self.insert(script)?;
        }
        Ok(())
    }

    /// New script with fresh id, current timestamps and default display settings.
    fn create(&mut self, title: &str, content: &str) -> Result<Script> {
        let script = Script::new(title, content);
        self.insert(&script)?;
        Ok(script)
    }

    fn list(&self) -> Result<Vec<Script>> {
        self.list_by(ScriptOrder::Title)
    }

    fn contains(&self, id: &str) -> Result<bool> {
        match self.get(id) {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

pub(crate) fn sort_scripts(scripts: &mut [Script], order: ScriptOrder) {
    match order {
        ScriptOrder::Title => scripts.sort_by(|a, b| {
            let at = a.display_title().to_ascii_lowercase();
            let bt = b.display_title().to_ascii_lowercase();
            at.cmp(&bt).then(a.created_at.cmp(&b.created_at))
        }),
        ScriptOrder::RecentlyCreated => scripts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}
