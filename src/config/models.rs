//! Model-mapping table: schema type name -> Rust type path.

use std::collections::btree_map;
use std::collections::BTreeMap;

/// Where a mapping entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingOrigin {
    /// Built-in scalar mapping
    Builtin,
    /// Declared in the config file
    User,
    /// Written by a generation plugin
    Generated,
}

/// One mapping entry. The first path in `model` is the one generated code refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapEntry {
    pub model: Vec<String>,
    pub origin: MappingOrigin,
}

impl TypeMapEntry {
    pub fn user(model: Vec<String>) -> Self {
        Self {
            model,
            origin: MappingOrigin::User,
        }
    }

    pub fn generated(reference: String) -> Self {
        Self {
            model: vec![reference],
            origin: MappingOrigin::Generated,
        }
    }

    fn builtin(reference: &str) -> Self {
        Self {
            model: vec![reference.to_string()],
            origin: MappingOrigin::Builtin,
        }
    }

    pub fn primary(&self) -> Option<&str> {
        self.model.first().map(String::as_str)
    }
}

const BUILTIN_SCALARS: [(&str, &str); 5] = [
    ("ID", "String"),
    ("String", "String"),
    ("Int", "i32"),
    ("Float", "f64"),
    ("Boolean", "bool"),
];

/// Ordered model-mapping table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelMap {
    entries: BTreeMap<String, TypeMapEntry>,
}

impl ModelMap {
    pub fn with_builtins() -> Self {
        let entries = BUILTIN_SCALARS
            .iter()
            .map(|(name, reference)| (name.to_string(), TypeMapEntry::builtin(reference)))
            .collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&TypeMapEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// True when the config file declared a mapping for `name`.
    pub fn user_defined(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .is_some_and(|entry| entry.origin == MappingOrigin::User)
    }

    /// Insert or overwrite in place; entries are never removed.
    pub fn insert(&mut self, name: String, entry: TypeMapEntry) {
        self.entries.insert(name, entry);
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, TypeMapEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
