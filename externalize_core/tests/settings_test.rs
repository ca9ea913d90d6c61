use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tempfile::TempDir;

use externalize_core::bundler::{OutputFormat, PluginSpec};
use externalize_core::config::ExternalizeConfig;
use externalize_core::settings::{Settings, SettingsOverrides};
use externalize_core::whitelist::WhitelistLookup;

#[test]
fn defaults_apply_without_config_or_overrides() {
    let dir = Path::new("/project");
    let settings = Settings::resolve(dir, &ExternalizeConfig::default(), &Default::default());
    assert_eq!(settings.whitelist_path, Path::new("/project/whitelist.json"));
    assert_eq!(settings.format, OutputFormat::Module);
    assert_eq!(settings.build.base, "./");
    assert_eq!(settings.build.plugins, vec![PluginSpec::react()]);
}

#[test]
fn overrides_beat_config_file_values() {
    let dir = Path::new("/project/build");
    let file = ExternalizeConfig {
        lookup: Some(WhitelistLookup::Parent),
        base: Some("/from-file/".to_string()),
        format: Some(OutputFormat::Json),
        globals: Some(IndexMap::from([
            ("react".to_string(), "React".to_string()),
            ("vue".to_string(), "Vue".to_string()),
        ])),
        ..ExternalizeConfig::default()
    };
    let overrides = SettingsOverrides {
        lookup: Some(WhitelistLookup::Sibling),
        base: Some("/from-cli/".to_string()),
        globals: vec![("react".to_string(), "R".to_string())],
        ..SettingsOverrides::default()
    };

    let settings = Settings::resolve(dir, &file, &overrides);
    assert_eq!(settings.whitelist_path, Path::new("/project/build/whitelist.json"));
    assert_eq!(settings.build.base, "/from-cli/");
    assert_eq!(settings.format, OutputFormat::Json);
    assert_eq!(settings.build.globals.get("react").map(String::as_str), Some("R"));
    assert_eq!(settings.build.globals.get("vue").map(String::as_str), Some("Vue"));
}

#[test]
fn file_whitelist_path_is_relative_to_config_dir() {
    let dir = Path::new("/project");
    let file = ExternalizeConfig {
        whitelist: Some("deps/whitelist.json".to_string()),
        lookup: Some(WhitelistLookup::Parent),
        ..ExternalizeConfig::default()
    };
    let settings = Settings::resolve(dir, &file, &SettingsOverrides::default());
    assert_eq!(
        settings.whitelist_path,
        PathBuf::from("/project/deps/whitelist.json")
    );
}

#[test]
fn parent_lookup_reads_whitelist_one_level_up() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("whitelist.json"), r#"{ "react": "18" }"#).unwrap();
    let build_dir = temp.path().join("build");
    std::fs::create_dir_all(&build_dir).unwrap();

    let overrides = SettingsOverrides {
        lookup: Some(WhitelistLookup::Parent),
        ..SettingsOverrides::default()
    };
    let settings = Settings::resolve(&build_dir, &ExternalizeConfig::default(), &overrides);
    assert_eq!(settings.build_config().externals(), ["react"]);

    let sibling = Settings::resolve(
        &build_dir,
        &ExternalizeConfig::default(),
        &SettingsOverrides::default(),
    );
    assert!(sibling.build_config().externals().is_empty());
}
