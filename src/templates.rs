//! Source templates for generated files.
//!
//! Rendering is split from writing so output can be checked byte-for-byte in tests;
//! [`SourceRenderer`] does both and is the renderer plugins use by default.

use crate::config::ModelMap;
use crate::error::RenderError;
use crate::plugin::EnumDescriptor;
use async_trait::async_trait;
use convert_case::{Case, Casing};
use std::fmt::{self, Write};
use std::path::Path;
use tracing::info;

/// First line of every generated file.
pub const GENERATED_MARKER: &str = "// Code generated by schemagen. DO NOT EDIT.";

/// Type names the generated files define or import themselves.
const RESERVED_TYPE_IDENTS: [&str; 7] = [
    "Self", "UnknownEnumValue", "FromStr", "Option", "Vec", "String", "Result",
];

/// Convert a schema name to an exported Rust identifier.
pub fn exported_ident(name: &str) -> String {
    name.to_case(Case::Pascal)
}

fn identifier_error(name: &str, reason: impl Into<String>) -> RenderError {
    RenderError::Identifier {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Exported identifier for `name`, or an error when it cannot be a Rust ident.
fn checked_ident(name: &str) -> Result<String, RenderError> {
    let ident = exported_ident(name);
    match ident.chars().next() {
        None => Err(identifier_error(name, "converts to an empty identifier")),
        Some(first) if !(first.is_alphabetic() || first == '_') => Err(identifier_error(
            name,
            format!("{ident:?} does not start with a letter"),
        )),
        Some(_) if ident == "Self" => Err(identifier_error(name, "converts to keyword `Self`")),
        Some(_) => Ok(ident),
    }
}

/// Identifier for a generated type.
pub fn type_ident(name: &str) -> Result<String, RenderError> {
    let ident = checked_ident(name)?;
    if RESERVED_TYPE_IDENTS.contains(&ident.as_str()) {
        return Err(identifier_error(
            name,
            format!("{ident:?} collides with a name used by generated code"),
        ));
    }
    Ok(ident)
}

/// Variant identifiers for `values` of `type_name`, in order, without duplicates.
pub fn variant_idents<'a>(
    type_name: &str,
    values: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<String>, RenderError> {
    let mut idents: Vec<String> = Vec::new();
    for value in values {
        let ident = checked_ident(value)?;
        if idents.contains(&ident) {
            return Err(identifier_error(
                value,
                format!("variant {ident:?} of {type_name} is defined twice"),
            ));
        }
        idents.push(ident);
    }
    Ok(idents)
}

/// Inputs to one render of the enum template
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Module the file belongs to
    pub package_name: &'a str,
    /// Rust path of that module
    pub import_path: &'a str,
    pub filename: &'a Path,
    pub data: &'a [EnumDescriptor],
    /// Prefix the file with [`GENERATED_MARKER`]
    pub generated_header: bool,
    /// Table the rendered types must resolve through
    pub models: &'a ModelMap,
}

/// Renders descriptors into a source file.
#[async_trait]
pub trait TemplateRenderer: Send + Sync {
    async fn render(&self, options: RenderOptions<'_>) -> Result<(), RenderError>;
}

/// Renders the fixed enum template and writes it with `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceRenderer;

#[async_trait]
impl TemplateRenderer for SourceRenderer {
    async fn render(&self, options: RenderOptions<'_>) -> Result<(), RenderError> {
        check_resolution(&options)?;
        let source = render_enums(&options)?;
        write_source(options.filename, &source).await?;
        info!(
            path = %options.filename.display(),
            enums = options.data.len(),
            "Wrote enum definitions"
        );
        Ok(())
    }
}

/// Every rendered enum must be what the model map points at.
fn check_resolution(options: &RenderOptions<'_>) -> Result<(), RenderError> {
    for descriptor in options.data {
        let expected = format!("{}::{}", options.import_path, exported_ident(&descriptor.name));
        let actual = options
            .models
            .get(&descriptor.name)
            .and_then(|entry| entry.primary());
        if actual != Some(expected.as_str()) {
            return Err(RenderError::ForeignType {
                name: descriptor.name.clone(),
                reference: actual.unwrap_or("<unmapped>").to_string(),
                package: options.import_path.to_string(),
            });
        }
    }
    Ok(())
}

/// Create parent directories and write `source` to `path`.
pub async fn write_source(path: &Path, source: &str) -> Result<(), RenderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| RenderError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(path, source)
        .await
        .map_err(|source| RenderError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Write `///` lines for a description; nothing when it is blank.
pub fn write_doc(out: &mut String, indent: &str, description: &str) -> fmt::Result {
    for line in description.trim().lines() {
        let line = line.trim_end();
        if line.is_empty() {
            writeln!(out, "{indent}///")?;
        } else {
            writeln!(out, "{indent}/// {line}")?;
        }
    }
    Ok(())
}

/// Write the generated-file marker and module doc.
pub fn write_header(out: &mut String, generated: bool, doc: &str) -> fmt::Result {
    if generated {
        writeln!(out, "{GENERATED_MARKER}")?;
        writeln!(out, "// @generated")?;
        writeln!(out)?;
    }
    writeln!(out, "//! {doc}")?;
    writeln!(out)
}

/// Render the enum file contents.
///
/// Every identifier is checked before anything is formatted.
pub fn render_enums(options: &RenderOptions<'_>) -> Result<String, RenderError> {
    let idents = options
        .data
        .iter()
        .map(|descriptor| -> Result<_, RenderError> {
            let ident = type_ident(&descriptor.name)?;
            let variants = variant_idents(
                &descriptor.name,
                descriptor.values.iter().map(|value| value.name.as_str()),
            )?;
            Ok((ident, variants))
        })
        .collect::<Result<Vec<_>, RenderError>>()?;

    let mut out = String::new();
    let write_file = |out: &mut String| -> fmt::Result {
        write_header(
            out,
            options.generated_header,
            &format!("Enum types for the `{}` module.", options.package_name),
        )?;
        out.push_str(UNKNOWN_VALUE_ERROR);
        for (descriptor, (ident, variants)) in options.data.iter().zip(&idents) {
            writeln!(out)?;
            write_enum(out, descriptor, ident, variants)?;
        }
        Ok(())
    };
    write_file(&mut out).map_err(|source| RenderError::Format {
        filename: options.filename.to_path_buf(),
        source,
    })?;
    Ok(out)
}

const UNKNOWN_VALUE_ERROR: &str = r#"use std::fmt;
use std::str::FromStr;

/// Returned when a string names no value of the target enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEnumValue {
    pub type_name: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownEnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} is not a valid {}", self.value, self.type_name)
    }
}

impl std::error::Error for UnknownEnumValue {}
"#;

fn write_enum(
    out: &mut String,
    descriptor: &EnumDescriptor,
    ident: &str,
    variants: &[String],
) -> fmt::Result {
    write_doc(out, "", &descriptor.description)?;
    writeln!(out, "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]")?;
    writeln!(out, "pub enum {ident} {{")?;
    for (value, variant) in descriptor.values.iter().zip(variants) {
        write_doc(out, "    ", &value.description)?;
        writeln!(out, "    {variant},")?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "impl {ident} {{")?;
    let all: Vec<String> = variants.iter().map(|v| format!("{ident}::{v}")).collect();
    writeln!(
        out,
        "    pub const ALL: [{ident}; {}] = [{}];",
        variants.len(),
        all.join(", ")
    )?;
    writeln!(out)?;
    writeln!(out, "    pub fn as_str(&self) -> &'static str {{")?;
    writeln!(out, "        match *self {{")?;
    for (value, variant) in descriptor.values.iter().zip(variants) {
        writeln!(out, "            {ident}::{variant} => {:?},", value.name)?;
    }
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "impl fmt::Display for {ident} {{")?;
    writeln!(
        out,
        "    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {{"
    )?;
    writeln!(out, "        f.write_str(self.as_str())")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "impl FromStr for {ident} {{")?;
    writeln!(out, "    type Err = UnknownEnumValue;")?;
    writeln!(out)?;
    writeln!(out, "    fn from_str(s: &str) -> Result<Self, Self::Err> {{")?;
    writeln!(out, "        match s {{")?;
    for (value, variant) in descriptor.values.iter().zip(variants) {
        writeln!(out, "            {:?} => Ok({ident}::{variant}),", value.name)?;
    }
    writeln!(out, "            _ => Err(UnknownEnumValue {{")?;
    writeln!(out, "                type_name: {:?},", ident)?;
    writeln!(out, "                value: s.to_string(),")?;
    writeln!(out, "            }}),")?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")
}
