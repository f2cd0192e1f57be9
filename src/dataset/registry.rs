//! Class-name → class-id registry.

use std::collections::{BTreeSet, HashMap};

/// Sorted set of class names with dense ids assigned in sort order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassRegistry {
    names: Vec<String>,
    name_to_id: HashMap<String, usize>,
}

impl ClassRegistry {
    /// Build from any collection of (possibly repeated) class names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        let names: Vec<String> = unique.into_iter().collect();
        let name_to_id = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();

        Self { names, name_to_id }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn id(&self, name: &str) -> Option<usize> {
        self.name_to_id.get(name).copied()
    }

    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Class names ordered by id
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
