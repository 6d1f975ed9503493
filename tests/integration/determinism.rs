//! Property tests: enum selection order and rendered output are deterministic

use crate::integration::test_utils::{config_in, enum_type, IMPORT_PATH};
use async_trait::async_trait;
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;
use schemagen::config::Config;
use schemagen::error::PluginError;
use schemagen::plugin::{enum_descriptors, EnumOverridePlugin, Plugin, ENUMS_FILENAME};
use schemagen::templates::{render_enums, RenderOptions};
use std::path::Path;
use tempfile::TempDir;

struct Noop;

#[async_trait]
impl Plugin for Noop {
    fn name(&self) -> &str {
        "noop"
    }

    async fn mutate_config(&self, config: &mut Config) -> Result<(), PluginError> {
        config.packages()?;
        Ok(())
    }
}

fn enum_names() -> impl Strategy<Value = Vec<String>> {
    btree_set("[A-Z][a-z]{2,8}Kind", 1..6).prop_flat_map(|names| {
        let names: Vec<String> = names.into_iter().collect();
        Just(names).prop_shuffle()
    })
}

fn values() -> impl Strategy<Value = Vec<String>> {
    btree_set("V[A-Z]{1,5}", 1..5).prop_map(|set| set.into_iter().collect())
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn descriptors_follow_declaration_order(
        names in enum_names(),
        value_sets in vec(values(), 5),
    ) {
        let temp_dir = TempDir::new().unwrap();
        let types = names
            .iter()
            .zip(value_sets.iter().cycle())
            .map(|(name, values)| {
                let values: Vec<&str> = values.iter().map(String::as_str).collect();
                enum_type(name, &values)
            })
            .collect();
        let config = config_in(temp_dir.path(), types, &[]);

        let descriptors = enum_descriptors(&config);
        let order: Vec<&str> = descriptors.iter().map(|d| d.name.as_str()).collect();
        let expected: Vec<&str> = names.iter().map(String::as_str).collect();
        prop_assert_eq!(order, expected);

        let render = || {
            render_enums(&RenderOptions {
                package_name: "model",
                import_path: IMPORT_PATH,
                filename: Path::new(ENUMS_FILENAME),
                data: &descriptors,
                generated_header: true,
                models: config.models(),
            })
            .unwrap()
        };
        prop_assert_eq!(render(), render());
    }

    #[test]
    fn every_generated_enum_maps_into_model_module(names in enum_names()) {
        let temp_dir = TempDir::new().unwrap();
        let types = names.iter().map(|name| enum_type(name, &["ONE", "TWO"])).collect();
        let mut config = config_in(temp_dir.path(), types, &[]);

        runtime()
            .block_on(EnumOverridePlugin::new(Noop).mutate_config(&mut config))
            .unwrap();

        let packages = config.packages().unwrap();
        for name in &names {
            let resolved = packages.resolve(name).unwrap();
            prop_assert_eq!(resolved.module.as_str(), IMPORT_PATH);
            prop_assert_eq!(&resolved.ident, name);
        }
    }
}
