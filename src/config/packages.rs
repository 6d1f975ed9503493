//! Type resolution cache derived from the model map.
//!
//! Rebuilt wholesale by `Config::invalidate_type_cache`; never patched in place.

use crate::config::models::ModelMap;
use std::collections::BTreeMap;

/// A model path split into module and identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Module path; empty for prelude types such as `String`
    pub module: String,
    pub ident: String,
}

impl ResolvedType {
    pub fn parse(path: &str) -> Self {
        match path.rsplit_once("::") {
            Some((module, ident)) => Self {
                module: module.to_string(),
                ident: ident.to_string(),
            },
            None => Self {
                module: String::new(),
                ident: path.to_string(),
            },
        }
    }

    pub fn path(&self) -> String {
        if self.module.is_empty() {
            self.ident.clone()
        } else {
            format!("{}::{}", self.module, self.ident)
        }
    }
}

/// Resolved schema type name -> Rust type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packages {
    types: BTreeMap<String, ResolvedType>,
}

impl Packages {
    pub fn build(models: &ModelMap) -> Self {
        let types = models
            .iter()
            .filter_map(|(name, entry)| {
                entry
                    .primary()
                    .map(|path| (name.clone(), ResolvedType::parse(path)))
            })
            .collect();
        Self { types }
    }

    pub fn resolve(&self, name: &str) -> Option<&ResolvedType> {
        self.types.get(name)
    }

    /// True when `name` resolves to a type defined in `module`.
    pub fn is_in_module(&self, name: &str, module: &str) -> bool {
        self.resolve(name).is_some_and(|ty| ty.module == module)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
