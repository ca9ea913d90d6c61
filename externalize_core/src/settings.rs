use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::bundler::{
    BuildConfig, BuildSettings, DEFAULT_BASE, OutputFormat, PluginSpec, assemble_build_config,
};
use crate::config::ExternalizeConfig;
use crate::whitelist::{WhitelistLookup, load_whitelist, resolve_whitelist_path};

/// Values given on the command line; each one beats the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    pub whitelist: Option<PathBuf>,
    pub lookup: Option<WhitelistLookup>,
    pub base: Option<String>,
    pub globals: Vec<(String, String)>,
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub config_dir: PathBuf,
    pub whitelist_path: PathBuf,
    pub format: OutputFormat,
    pub build: BuildSettings,
}

impl Settings {
    pub fn resolve(
        config_dir: &Path,
        file: &ExternalizeConfig,
        overrides: &SettingsOverrides,
    ) -> Self {
        let lookup = overrides.lookup.or(file.lookup).unwrap_or_default();
        let explicit = overrides
            .whitelist
            .clone()
            .or_else(|| file.whitelist.as_ref().map(PathBuf::from));
        let whitelist_path = resolve_whitelist_path(config_dir, lookup, explicit.as_deref());

        let mut globals: IndexMap<String, String> = file.globals.clone().unwrap_or_default();
        globals.extend(overrides.globals.iter().cloned());

        Self {
            config_dir: config_dir.to_path_buf(),
            whitelist_path,
            format: overrides.format.or(file.format).unwrap_or_default(),
            build: BuildSettings {
                plugins: file
                    .plugins
                    .clone()
                    .unwrap_or_else(|| vec![PluginSpec::react()]),
                base: overrides
                    .base
                    .clone()
                    .or_else(|| file.base.clone())
                    .unwrap_or_else(|| DEFAULT_BASE.to_string()),
                globals,
            },
        }
    }

    pub fn load_externals(&self) -> Vec<String> {
        load_whitelist(&self.whitelist_path)
    }

    /// Reads the whitelist and assembles the configuration handed to the bundler.
    pub fn build_config(&self) -> BuildConfig {
        assemble_build_config(&self.build, self.load_externals())
    }
}
