//! Unique names for imported submeshes.
use std::collections::{HashMap, HashSet};

/// Tracks the names issued during a single import.
///
/// Names are made unique by appending a 3 digit counter to the base name
/// before the tag suffix like `"col0.001@SOLID"`.
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    issued: HashSet<String>,
    // The highest counter used for each base name and tag suffix pair.
    counters: HashMap<String, u32>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `name` was already returned by [NameRegistry::resolve].
    pub fn contains(&self, name: &str) -> bool {
        self.issued.contains(name)
    }

    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }

    /// Finds the first unused name of the form `base_name + tag_suffix`
    /// or `base_name.NNN + tag_suffix` and records it as used.
    pub fn resolve(&mut self, base_name: &str, tag_suffix: &str) -> String {
        let name = format!("{}{}", base_name, tag_suffix);
        if self.issued.insert(name.clone()) {
            return name;
        }

        let counter = self.counters.entry(name).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{}.{:03}{}", base_name, counter, tag_suffix);
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
