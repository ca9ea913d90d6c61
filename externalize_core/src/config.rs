use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::bundler::{OutputFormat, PluginSpec};
use crate::error::ExternalizeError;
use crate::whitelist::WhitelistLookup;

const PACKAGE_JSON: &str = "package.json";
const PACKAGE_JSON_KEY: &str = "externalize";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalizeConfig {
    pub whitelist: Option<String>,
    pub lookup: Option<WhitelistLookup>,
    pub base: Option<String>,
    pub plugins: Option<Vec<PluginSpec>>,
    pub globals: Option<IndexMap<String, String>>,
    pub format: Option<OutputFormat>,
}

/// Nearest ancestor of `start` holding a `package.json`, or `start` itself.
pub fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(PACKAGE_JSON).is_file())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| start.to_path_buf())
}

pub fn discover_config_path(dir: &Path) -> Option<PathBuf> {
    let names = [
        "externalize.toml",
        "externalize.config.json",
        "externalize.config.json5",
        "externalize.config.jsonc",
        "externalize.config.yaml",
        "externalize.config.yml",
        ".externalizerc",
        ".externalizerc.json",
        ".externalizerc.yaml",
        ".externalizerc.yml",
    ];
    names
        .into_iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

pub fn load_externalize_config(dir: &Path) -> Result<ExternalizeConfig, ExternalizeError> {
    if let Some(path) = discover_config_path(dir) {
        tracing::debug!(path = %path.display(), "loading externalize config");
        return load_externalize_config_from_path(&path);
    }

    let package_json_path = dir.join(PACKAGE_JSON);
    if package_json_path.is_file() {
        if let Some(config) = load_package_json_config(&package_json_path)? {
            return Ok(config);
        }
    }

    Ok(ExternalizeConfig::default())
}

pub fn load_externalize_config_from_path(
    path: &Path,
) -> Result<ExternalizeConfig, ExternalizeError> {
    let ext = path
        .extension()
        .and_then(|x| x.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" | "json5" | "jsonc" | "" => load_json_config(path),
        "yaml" | "yml" => load_yaml_config(path),
        "toml" => load_toml_config(path),
        _ => Ok(ExternalizeConfig::default()),
    }
}

fn read_config_text(path: &Path) -> Result<String, ExternalizeError> {
    std::fs::read_to_string(path).map_err(|source| ExternalizeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_error(path: &Path, err: impl ToString) -> ExternalizeError {
    ExternalizeError::ConfigParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn load_json_config(path: &Path) -> Result<ExternalizeConfig, ExternalizeError> {
    let raw = read_config_text(path)?;
    json5::from_str::<ExternalizeConfig>(&raw)
        .or_else(|_| serde_json::from_str::<ExternalizeConfig>(&raw))
        .map_err(|err| parse_error(path, err))
}

fn load_yaml_config(path: &Path) -> Result<ExternalizeConfig, ExternalizeError> {
    let raw = read_config_text(path)?;
    serde_yaml::from_str::<ExternalizeConfig>(&raw).map_err(|err| parse_error(path, err))
}

fn load_toml_config(path: &Path) -> Result<ExternalizeConfig, ExternalizeError> {
    let raw = read_config_text(path)?;
    toml::from_str::<ExternalizeConfig>(&raw).map_err(|err| parse_error(path, err))
}

fn load_package_json_config(path: &Path) -> Result<Option<ExternalizeConfig>, ExternalizeError> {
    let raw = read_config_text(path)?;
    let package = serde_json::from_str::<JsonValue>(&raw).map_err(|err| parse_error(path, err))?;
    let Some(section) = package.get(PACKAGE_JSON_KEY) else {
        return Ok(None);
    };
    tracing::debug!(path = %path.display(), "loading externalize config from package.json");
    serde_json::from_value::<ExternalizeConfig>(section.clone())
        .map(Some)
        .map_err(|err| parse_error(path, err))
}
