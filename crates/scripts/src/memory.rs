use crate::{sort_scripts, Result, Script, ScriptOrder, ScriptStore, StoreError};
use std::collections::HashMap;

/// Non-persistent [`ScriptStore`] for previews and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    scripts: HashMap<String, Script>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding only the sample script.
    pub fn preview() -> Self {
        let mut store = Self::new();
        let sample = Script::sample();
        store.scripts.insert(sample.id.clone(), sample);
        store
    }
}

impl ScriptStore for MemoryStore {
    fn insert(&mut self, script: &Script) -> Result<()> {
        script.validate()?;
        if self.scripts.contains_key(&script.id) {
            return Err(StoreError::Duplicate(script.id.clone()));
        }
        self.scripts.insert(script.id.clone(), script.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Script> {
        self.scripts
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list_by(&self, order: ScriptOrder) -> Result<Vec<Script>> {
        let mut out: Vec<Script> = self.scripts.values().cloned().collect();
        sort_scripts(&mut out, order);
        Ok(out)
    }

    fn update(&mut self, script: &Script) -> Result<()> {
        script.validate()?;
        match self.scripts.get_mut(&script.id) {
            Some(slot) => {
                *slot = script.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(script.id.clone())),
        }
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.scripts
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn count(&self) -> Result<usize> {
        Ok(self.scripts.len())
    }
}
