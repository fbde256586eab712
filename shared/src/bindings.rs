use std::collections::BTreeMap;

use crate::protocol::RecognitionEntry;

/// Variables learned from assignment results, sent back with every
/// submission so the recognizer can resolve them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariableBindings {
    vars: BTreeMap<String, String>,
}

impl VariableBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Merges every assignment entry, keyed by its expression text. Returns
    /// how many entries were merged.
    pub fn merge_assignments(&mut self, entries: &[RecognitionEntry]) -> usize {
        let mut merged = 0;
        for entry in entries.iter().filter(|entry| entry.assign) {
            self.vars.insert(entry.expr.clone(), entry.result.clone());
            merged += 1;
        }
        merged
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.vars.clone()
    }
}
