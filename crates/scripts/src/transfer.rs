//! JSON export and import of a whole store.

use crate::{Result, Script, ScriptOrder, ScriptStore};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const EXPORT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptExport {
    pub version: u32,
    pub scripts: Vec<Script>,
}

pub fn export_json(store: &dyn ScriptStore) -> Result<String> {
    let doc = ScriptExport {
        version: EXPORT_VERSION,
        scripts: store.list_by(ScriptOrder::RecentlyCreated)?,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Insert every exported script whose id is not already present.
/// Returns how many were added. Nothing is inserted unless every new record
/// is valid.
pub fn import_json(store: &mut dyn ScriptStore, json: &str) -> Result<usize> {
    let doc: ScriptExport = serde_json::from_str(json)?;
    if doc.version > EXPORT_VERSION {
        tracing::warn!(version = doc.version, "export written by a newer version");
    }
    let mut seen = HashSet::new();
    let mut fresh = Vec::new();
    for script in doc.scripts {
        script.validate()?;
        if !seen.insert(script.id.clone()) || store.contains(&script.id)? {
            tracing::debug!(id = %script.id, "skipping existing script");
            continue;
        }
        fresh.push(script);
    }
    store.insert_batch(&fresh)?;
    Ok(fresh.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn test_import_skips_existing() {
        let mut src = MemoryStore::new();
        src.create("One", "1").unwrap();
        src.create("Two", "2").unwrap();
        let json = export_json(&src).unwrap();

        let mut dst = MemoryStore::new();
        assert_eq!(import_json(&mut dst, &json).unwrap(), 2);
        assert_eq!(import_json(&mut dst, &json).unwrap(), 0);
        assert_eq!(dst.count().unwrap(), 2);
        assert_eq!(dst.list().unwrap(), src.list().unwrap());
    }

    #[test]
    fn test_import_skips_repeated_ids_in_one_document() {
        let script = Script::new("Twice", "same id");
        let doc = ScriptExport {
            version: EXPORT_VERSION,
            scripts: vec![script.clone(), script],
        };
        let json = serde_json::to_string(&doc).unwrap();
        let mut dst = MemoryStore::new();
        assert_eq!(import_json(&mut dst, &json).unwrap(), 1);
        assert_eq!(dst.count().unwrap(), 1);
    }

    #[test]
    fn test_import_rejects_garbage() {
        let mut dst = MemoryStore::new();
        assert!(import_json(&mut dst, "{\"scripts\": 3}").is_err());
        assert_eq!(dst.count().unwrap(), 0);
    }
}
