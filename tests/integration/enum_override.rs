//! Enum override plugin behavior end to end

use crate::integration::test_utils::{config_in, enum_type, object_type, IMPORT_PATH};
use async_trait::async_trait;
use schemagen::api::Generator;
use schemagen::config::{Config, MappingOrigin};
use schemagen::error::{GenerateError, PluginError};
use schemagen::plugin::{EnumOverridePlugin, ModelGenPlugin, Plugin, ENUMS_FILENAME};
use schemagen::templates::GENERATED_MARKER;
use tempfile::TempDir;

struct RejectingDelegate;

#[async_trait]
impl Plugin for RejectingDelegate {
    fn name(&self) -> &str {
        "modelgen"
    }

    async fn mutate_config(&self, _config: &mut Config) -> Result<(), PluginError> {
        Err(PluginError::Failed {
            plugin: "modelgen".to_string(),
            message: "model directory is read-only".to_string(),
        })
    }
}

#[tokio::test]
async fn test_enum_generated_and_mapped() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_in(
        temp_dir.path(),
        vec![
            enum_type("Status", &["ACTIVE", "INACTIVE"]),
            object_type("User", &[("id", "ID"), ("status", "Status")]),
        ],
        &[],
    );

    Generator::default().generate(&mut config).await.unwrap();

    let entry = config.models().get("Status").unwrap();
    assert_eq!(entry.primary(), Some("crate::model::Status"));
    assert_eq!(entry.origin, MappingOrigin::Generated);

    let enums = std::fs::read_to_string(temp_dir.path().join(ENUMS_FILENAME)).unwrap();
    assert!(enums.starts_with(GENERATED_MARKER));
    assert!(enums.contains("pub enum Status {\n    Active,\n    Inactive,\n}"));
    let active = enums.find("Status::Active => \"ACTIVE\"").unwrap();
    let inactive = enums.find("Status::Inactive => \"INACTIVE\"").unwrap();
    assert!(active < inactive);

    // The model file references the enum instead of defining it again.
    let models = std::fs::read_to_string(temp_dir.path().join("models_gen.rs")).unwrap();
    assert!(!models.contains("pub enum Status"));
    assert!(models.contains("    pub status: Status,\n"));
    assert!(config.packages().unwrap().is_in_module("Status", IMPORT_PATH));
}

#[tokio::test]
async fn test_user_override_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_in(
        temp_dir.path(),
        vec![
            enum_type("Status", &["ACTIVE", "INACTIVE"]),
            object_type("User", &[("status", "Status")]),
        ],
        &[("Status", "crate::types::Status")],
    );

    Generator::default().generate(&mut config).await.unwrap();

    let entry = config.models().get("Status").unwrap();
    assert_eq!(entry.origin, MappingOrigin::User);
    assert_eq!(entry.primary(), Some("crate::types::Status"));
    assert!(!temp_dir.path().join(ENUMS_FILENAME).exists());

    let models = std::fs::read_to_string(temp_dir.path().join("models_gen.rs")).unwrap();
    assert!(models.contains("    pub status: crate::types::Status,\n"));
}

#[tokio::test]
async fn test_delegate_error_returned_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_in(
        temp_dir.path(),
        vec![enum_type("Status", &["ACTIVE"])],
        &[],
    );

    let err = EnumOverridePlugin::new(RejectingDelegate)
        .mutate_config(&mut config)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PluginError::Failed { ref plugin, ref message }
            if plugin == "modelgen" && message == "model directory is read-only"
    ));

    // The enum file written before delegation stays on disk.
    assert!(temp_dir.path().join(ENUMS_FILENAME).exists());
    assert!(!config.is_type_cache_stale());
}

#[tokio::test]
async fn test_delegate_error_named_by_generator() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_in(
        temp_dir.path(),
        vec![enum_type("Status", &["ACTIVE"])],
        &[],
    );

    let err = Generator::empty()
        .add_plugin(EnumOverridePlugin::new(RejectingDelegate))
        .generate(&mut config)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GenerateError::Plugin { ref name, source: PluginError::Failed { .. } } if name == "modelgen"
    ));
}

#[tokio::test]
async fn test_schema_without_enums() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_in(
        temp_dir.path(),
        vec![object_type("User", &[("id", "ID")])],
        &[],
    );

    EnumOverridePlugin::new(ModelGenPlugin::new())
        .mutate_config(&mut config)
        .await
        .unwrap();

    assert!(!temp_dir.path().join(ENUMS_FILENAME).exists());
    assert!(temp_dir.path().join("models_gen.rs").exists());
    assert!(config.models().get("Status").is_none());
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let types = vec![
        enum_type("Status", &["ACTIVE", "INACTIVE"]),
        enum_type("Role", &["ADMIN", "MEMBER"]),
        object_type("User", &[("role", "Role"), ("status", "Status")]),
    ];

    let mut first = config_in(temp_dir.path(), types.clone(), &[]);
    Generator::default().generate(&mut first).await.unwrap();
    let enums = std::fs::read(temp_dir.path().join(ENUMS_FILENAME)).unwrap();
    let models = std::fs::read(temp_dir.path().join("models_gen.rs")).unwrap();

    let mut second = config_in(temp_dir.path(), types, &[]);
    Generator::default().generate(&mut second).await.unwrap();
    assert_eq!(std::fs::read(temp_dir.path().join(ENUMS_FILENAME)).unwrap(), enums);
    assert_eq!(std::fs::read(temp_dir.path().join("models_gen.rs")).unwrap(), models);
    assert_eq!(first.models(), second.models());
}
