//! Default model plugin.
//!
//! Emits a definition for every object, input, interface, union and enum type
//! that has no mapping yet, maps it into the model module, and writes the primary
//! model file. Types that already have a mapping are referenced through the type
//! cache, never redefined.

use crate::config::{Config, Packages};
use crate::error::{ConfigError, PluginError, RenderError};
use crate::plugin::Plugin;
use crate::schema::{Field, SchemaType, TypeKind};
use crate::templates::{
    exported_ident, type_ident, variant_idents, write_doc, write_header, write_source,
};
use async_trait::async_trait;
use convert_case::{Case, Casing};
use std::fmt::{self, Write};
use tracing::{debug, info};

pub const MODELGEN_NAME: &str = "modelgen";

/// Keywords that can only be used as field names in raw form.
const RUST_KEYWORDS: [&str; 48] = [
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const NON_RAW_KEYWORDS: [&str; 3] = ["self", "super", "crate"];

/// Default model emission
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelGenPlugin;

impl ModelGenPlugin {
    pub fn new() -> Self {
        Self
    }
}

fn emits(ty: &SchemaType) -> bool {
    matches!(
        ty.kind,
        TypeKind::Object
            | TypeKind::InputObject
            | TypeKind::Interface
            | TypeKind::Union
            | TypeKind::Enum
    )
}

#[async_trait]
impl Plugin for ModelGenPlugin {
    fn name(&self) -> &str {
        MODELGEN_NAME
    }

    async fn mutate_config(&self, config: &mut Config) -> Result<(), PluginError> {
        // Fails if an earlier plugin left the cache dirty.
        config.packages()?;

        let pending: Vec<SchemaType> = config
            .schema
            .types
            .iter()
            .filter(|ty| emits(ty) && !config.models().contains(&ty.name))
            .cloned()
            .collect();
        if pending.is_empty() {
            debug!("All schema types already mapped; no models to emit");
            return Ok(());
        }

        for ty in &pending {
            let reference = config.model.qualify(&exported_ident(&ty.name));
            config.map_type(ty.name.clone(), reference);
        }
        config.invalidate_type_cache();

        let filename = config.model.filename.clone();
        let source = render_models(config, &pending).map_err(PluginError::Models)?;
        write_source(&filename, &source)
            .await
            .map_err(PluginError::Models)?;

        info!(
            models = pending.len(),
            path = %filename.display(),
            "Wrote model definitions"
        );
        Ok(())
    }
}

/// A model definition with every identifier and type already resolved.
enum Model<'a> {
    Struct(Vec<(&'a Field, String, String)>),
    Enum(Vec<String>),
    Union(Vec<(String, String)>),
}

fn render_models(config: &Config, types: &[SchemaType]) -> Result<String, RenderError> {
    let packages = config.packages()?;
    let module = config.model.import_path.as_str();

    let models = types
        .iter()
        .map(|ty| -> Result<_, RenderError> {
            let ident = type_ident(&ty.name)?;
            let model = match ty.kind {
                TypeKind::Enum => Model::Enum(variant_idents(
                    &ty.name,
                    ty.values.iter().map(|value| value.name.as_str()),
                )?),
                TypeKind::Union => {
                    let variants = variant_idents(&ty.name, ty.members.iter().map(String::as_str))?;
                    let members = ty
                        .members
                        .iter()
                        .map(|member| rust_path(member, packages, module))
                        .collect::<Result<Vec<_>, ConfigError>>()?;
                    Model::Union(variants.into_iter().zip(members).collect())
                }
                _ => Model::Struct(struct_fields(ty, packages, module)?),
            };
            Ok((ty, ident, model))
        })
        .collect::<Result<Vec<_>, RenderError>>()?;

    let mut out = String::new();
    let write_file = |out: &mut String| -> fmt::Result {
        write_header(
            out,
            true,
            &format!("Model types for the `{}` module.", config.model.package),
        )?;
        for (index, (ty, ident, model)) in models.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            match model {
                Model::Struct(fields) => write_struct(out, ty, ident, fields)?,
                Model::Enum(variants) => write_plain_enum(out, ty, ident, variants)?,
                Model::Union(members) => write_union(out, ty, ident, members)?,
            }
        }
        Ok(())
    };
    write_file(&mut out).map_err(|source| RenderError::Format {
        filename: config.model.filename.clone(),
        source,
    })?;
    Ok(out)
}

fn struct_fields<'a>(
    ty: &'a SchemaType,
    packages: &Packages,
    module: &str,
) -> Result<Vec<(&'a Field, String, String)>, RenderError> {
    let mut fields: Vec<(&Field, String, String)> = Vec::with_capacity(ty.fields.len());
    for field in &ty.fields {
        let ident = field_ident(&field.name)?;
        if fields.iter().any(|(_, existing, _)| *existing == ident) {
            return Err(RenderError::Identifier {
                name: field.name.clone(),
                reason: format!("field {ident:?} of {} is defined twice", ty.name),
            });
        }
        fields.push((field, ident, field_type(field, packages, module)?));
    }
    Ok(fields)
}

/// Rust path of a schema type; types in the model module are referenced unqualified.
fn rust_path(name: &str, packages: &Packages, module: &str) -> Result<String, ConfigError> {
    let resolved = packages
        .resolve(name)
        .ok_or_else(|| ConfigError::Unmapped(name.to_string()))?;
    Ok(if resolved.module == module {
        resolved.ident.clone()
    } else {
        resolved.path()
    })
}

/// Rust type for a field, wrapped for list and optional fields.
fn field_type(field: &Field, packages: &Packages, module: &str) -> Result<String, ConfigError> {
    let mut ty = rust_path(&field.ty, packages, module)?;
    if field.list {
        ty = format!("Vec<{ty}>");
    }
    if !field.required {
        ty = format!("Option<{ty}>");
    }
    Ok(ty)
}

fn field_ident(name: &str) -> Result<String, RenderError> {
    let ident = name.to_case(Case::Snake);
    match ident.chars().next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => {
            return Err(RenderError::Identifier {
                name: name.to_string(),
                reason: format!("{ident:?} is not a valid field name"),
            })
        }
    }
    if ident == "_" {
        return Err(RenderError::Identifier {
            name: name.to_string(),
            reason: "`_` is not a valid field name".to_string(),
        });
    }
    Ok(if NON_RAW_KEYWORDS.contains(&ident.as_str()) {
        format!("{ident}_")
    } else if RUST_KEYWORDS.contains(&ident.as_str()) {
        format!("r#{ident}")
    } else {
        ident
    })
}

fn write_struct(
    out: &mut String,
    ty: &SchemaType,
    ident: &str,
    fields: &[(&Field, String, String)],
) -> fmt::Result {
    write_doc(out, "", &ty.description)?;
    writeln!(out, "#[derive(Debug, Clone, PartialEq)]")?;
    writeln!(out, "pub struct {ident} {{")?;
    for (field, field_ident, rust_ty) in fields {
        write_doc(out, "    ", &field.description)?;
        writeln!(out, "    pub {field_ident}: {rust_ty},")?;
    }
    writeln!(out, "}}")
}

fn write_plain_enum(
    out: &mut String,
    ty: &SchemaType,
    ident: &str,
    variants: &[String],
) -> fmt::Result {
    write_doc(out, "", &ty.description)?;
    writeln!(out, "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]")?;
    writeln!(out, "pub enum {ident} {{")?;
    for (value, variant) in ty.values.iter().zip(variants) {
        write_doc(out, "    ", &value.description)?;
        writeln!(out, "    {variant},")?;
    }
    writeln!(out, "}}")
}

fn write_union(
    out: &mut String,
    ty: &SchemaType,
    ident: &str,
    members: &[(String, String)],
) -> fmt::Result {
    write_doc(out, "", &ty.description)?;
    writeln!(out, "#[derive(Debug, Clone, PartialEq)]")?;
    writeln!(out, "pub enum {ident} {{")?;
    for (variant, rust_ty) in members {
        writeln!(out, "    {variant}({rust_ty}),")?;
    }
    writeln!(out, "}}")
}
