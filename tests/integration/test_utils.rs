//! Shared test utilities for integration tests
//!
//! Builds schema types and configs rooted in a temporary directory so every test
//! writes its generated files in isolation.

use schemagen::config::{Config, ModelPackage};
use schemagen::schema::{EnumValue, Field, Schema, SchemaType, TypeKind};
use std::collections::BTreeMap;
use std::path::Path;

pub const IMPORT_PATH: &str = "crate::model";

pub fn enum_type(name: &str, values: &[&str]) -> SchemaType {
    SchemaType {
        name: name.to_string(),
        kind: TypeKind::Enum,
        description: String::new(),
        values: values
            .iter()
            .map(|value| EnumValue {
                name: value.to_string(),
                description: String::new(),
            })
            .collect(),
        fields: Vec::new(),
        members: Vec::new(),
    }
}

pub fn object_type(name: &str, fields: &[(&str, &str)]) -> SchemaType {
    SchemaType {
        name: name.to_string(),
        kind: TypeKind::Object,
        description: String::new(),
        values: Vec::new(),
        fields: fields
            .iter()
            .map(|(field, ty)| Field {
                name: field.to_string(),
                ty: ty.to_string(),
                required: true,
                list: false,
                description: String::new(),
            })
            .collect(),
        members: Vec::new(),
    }
}

pub fn union_type(name: &str, members: &[&str]) -> SchemaType {
    SchemaType {
        name: name.to_string(),
        kind: TypeKind::Union,
        description: String::new(),
        values: Vec::new(),
        fields: Vec::new(),
        members: members.iter().map(|member| member.to_string()).collect(),
    }
}

pub fn model_package(dir: &Path) -> ModelPackage {
    ModelPackage {
        filename: dir.join("models_gen.rs"),
        package: "model".to_string(),
        import_path: IMPORT_PATH.to_string(),
    }
}

/// Config over `types` with optional user overrides, writing into `dir`.
pub fn config_in(dir: &Path, types: Vec<SchemaType>, overrides: &[(&str, &str)]) -> Config {
    let user_models: BTreeMap<String, Vec<String>> = overrides
        .iter()
        .map(|(name, reference)| (name.to_string(), vec![reference.to_string()]))
        .collect();
    Config::new(Schema { types }, model_package(dir), user_models)
}

/// Write a `schemagen.toml` and a one-enum schema into `dir`.
pub fn write_project(dir: &Path) {
    std::fs::write(
        dir.join("schema.toml"),
        r#"
[[types]]
name = "Status"
kind = "enum"
values = [{ name = "ACTIVE" }, { name = "INACTIVE" }]

[[types]]
name = "User"
kind = "object"
fields = [
    { name = "id", type = "ID", required = true },
    { name = "status", type = "Status", required = true },
]
"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("schemagen.toml"),
        r#"
schema = ["schema.toml"]

[model]
filename = "model/models_gen.rs"
package = "model"
import_path = "crate::model"
"#,
    )
    .unwrap();
}
