use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use indexmap::IndexMap;
use path_slash::PathExt;
use serde::Deserialize;
use serde::de::IgnoredAny;
use thiserror::Error;

pub const WHITELIST_FILENAME: &str = "whitelist.json";

/// Where `whitelist.json` is looked up relative to the configuration directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WhitelistLookup {
    /// Next to the configuration file (config copied into the build directory).
    #[default]
    Sibling,
    /// One level above the configuration file (config kept at the project root).
    Parent,
}

impl FromStr for WhitelistLookup {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sibling" => Ok(Self::Sibling),
            "parent" => Ok(Self::Parent),
            other => Err(format!(
                "unknown whitelist lookup `{other}` (expected sibling|parent)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Error)]
pub enum WhitelistError {
    #[error(
        "Whitelist file not found at {}. Proceeding without external modules.",
        display_path(.path)
    )]
    Missing { path: PathBuf },

    #[error("Error loading whitelist at {}: {source}", display_path(.path))]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing whitelist at {}: {source}", display_path(.path))]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl WhitelistError {
    pub fn severity(&self) -> Severity {
        match self {
            WhitelistError::Missing { .. } => Severity::Warning,
            WhitelistError::Unreadable { .. } | WhitelistError::Malformed { .. } => Severity::Error,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            WhitelistError::Missing { path }
            | WhitelistError::Unreadable { path, .. }
            | WhitelistError::Malformed { path, .. } => path,
        }
    }
}

fn display_path(path: &Path) -> String {
    path.to_slash_lossy().to_string()
}

/// Resolves the whitelist location against `config_dir`.
///
/// An explicit path wins over `lookup`; relative explicit paths are joined onto
/// `config_dir`, absolute ones are kept.
pub fn resolve_whitelist_path(
    config_dir: &Path,
    lookup: WhitelistLookup,
    explicit: Option<&Path>,
) -> PathBuf {
    if let Some(path) = explicit {
        return if path.is_absolute() {
            path.to_path_buf()
        } else {
            config_dir.join(path)
        };
    }
    match lookup {
        WhitelistLookup::Sibling => config_dir.join(WHITELIST_FILENAME),
        WhitelistLookup::Parent => parent_dir(config_dir).join(WHITELIST_FILENAME),
    }
}

// `Path::parent` is lexical: it yields "" for "." and "build/" for "build/..".
fn parent_dir(dir: &Path) -> PathBuf {
    match (dir.components().next_back(), dir.parent()) {
        (Some(Component::Normal(_)), Some(parent)) => parent.to_path_buf(),
        _ => dir.join(".."),
    }
}

pub fn parse_whitelist_keys(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    let entries = serde_json::from_str::<IndexMap<String, IgnoredAny>>(raw)?;
    Ok(entries.into_keys().collect())
}

pub fn read_whitelist(path: &Path) -> Result<Vec<String>, WhitelistError> {
    if !path.exists() {
        return Err(WhitelistError::Missing {
            path: path.to_path_buf(),
        });
    }
    let raw = std::fs::read_to_string(path).map_err(|source| WhitelistError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_whitelist_keys(&raw).map_err(|source| WhitelistError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the module names to externalize from `path`.
///
/// Never fails: a missing or broken whitelist is reported as a diagnostic and
/// yields an empty list, so the bundler inlines everything.
pub fn load_whitelist(path: &Path) -> Vec<String> {
    match read_whitelist(path) {
        Ok(modules) => {
            if !modules.is_empty() {
                tracing::info!(
                    count = modules.len(),
                    "Whitelisted modules (external): {}",
                    modules.join(", ")
                );
            }
            modules
        }
        Err(err) => {
            report(&err);
            vec![]
        }
    }
}

fn report(err: &WhitelistError) {
    match err.severity() {
        Severity::Warning => tracing::warn!("{err}"),
        Severity::Error => tracing::error!("{err}"),
    }
}
