//! Schema model consumed by the generator.
//!
//! Schema files are TOML documents holding an ordered `[[types]]` array.
//! Declaration order is preserved: file order first, then entry order.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Kind of a schema type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Scalar,
    Object,
    InputObject,
    Interface,
    Union,
    Enum,
}

/// One value of an enum type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Field of an object or input type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// Name of the schema type this field holds
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub list: bool,
    #[serde(default)]
    pub description: String,
}

/// A named type declared in the schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaType {
    pub name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub values: Vec<EnumValue>,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Member type names of a union
    #[serde(default)]
    pub members: Vec<String>,
}

impl SchemaType {
    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }
}

/// Ordered collection of schema types
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub types: Vec<SchemaType>,
}

impl Schema {
    /// Parse one schema document.
    pub fn from_toml_str(source: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|source| ConfigError::SchemaParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load and concatenate schema files in the given order.
    pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ConfigError> {
        let mut schema = Schema::default();
        for path in paths {
            let path = path.as_ref();
            let source =
                std::fs::read_to_string(path).map_err(|source| ConfigError::SchemaRead {
                    path: path.to_path_buf(),
                    source,
                })?;
            let document = Self::from_toml_str(&source, path)?;
            schema.types.extend(document.types);
        }
        Ok(schema)
    }

    pub fn get(&self, name: &str) -> Option<&SchemaType> {
        self.types.iter().find(|ty| ty.name == name)
    }

    /// Enum types in declaration order.
    pub fn enums(&self) -> impl Iterator<Item = &SchemaType> {
        self.types.iter().filter(|ty| ty.is_enum())
    }
}
