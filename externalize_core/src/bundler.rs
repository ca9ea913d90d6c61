use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ExternalizeError;

pub const DEFAULT_BASE: &str = "./";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSpec {
    /// Binding the plugin factory is imported as.
    pub name: String,
    /// Package the factory is the default export of.
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

impl PluginSpec {
    pub fn react() -> Self {
        Self {
            name: "react".to_string(),
            module: "@vitejs/plugin-react".to_string(),
            options: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    Json,
    #[default]
    Module,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "module" | "esm" | "js" => Ok(Self::Module),
            other => Err(format!(
                "unknown output format `{other}` (expected json|module)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildSettings {
    pub plugins: Vec<PluginSpec>,
    pub base: String,
    pub globals: IndexMap<String, String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            plugins: vec![PluginSpec::react()],
            base: DEFAULT_BASE.to_string(),
            globals: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    pub plugins: Vec<PluginSpec>,
    pub base: String,
    pub build: BuildSection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSection {
    pub rollup_options: RollupOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupOptions {
    pub external: Vec<String>,
    pub output: OutputOptions,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub globals: IndexMap<String, String>,
}

impl BuildConfig {
    pub fn externals(&self) -> &[String] {
        &self.build.rollup_options.external
    }
}

pub fn assemble_build_config(settings: &BuildSettings, externals: Vec<String>) -> BuildConfig {
    BuildConfig {
        plugins: settings.plugins.clone(),
        base: settings.base.clone(),
        build: BuildSection {
            rollup_options: RollupOptions {
                external: externals,
                output: OutputOptions {
                    globals: settings.globals.clone(),
                },
            },
        },
    }
}

pub fn render(config: &BuildConfig, format: OutputFormat) -> Result<String, ExternalizeError> {
    match format {
        OutputFormat::Json => render_json(config),
        OutputFormat::Module => render_module(config),
    }
}

pub fn render_json(config: &BuildConfig) -> Result<String, ExternalizeError> {
    serde_json::to_string_pretty(config)
        .map(|mut text| {
            text.push('\n');
            text
        })
        .map_err(|err| ExternalizeError::Render {
            message: err.to_string(),
        })
}

/// Renders `config` as a `vite.config.*` ES module.
pub fn render_module(config: &BuildConfig) -> Result<String, ExternalizeError> {
    let mut out = String::new();
    out.push_str("import { defineConfig } from \"vite\";\n");
    for plugin in &config.plugins {
        validate_binding(&plugin.name)?;
        out.push_str(&format!(
            "import {} from {};\n",
            plugin.name,
            to_js_literal(&plugin.module)?
        ));
    }
    out.push('\n');

    let plugin_calls = config
        .plugins
        .iter()
        .map(|plugin| match &plugin.options {
            Some(options) => to_js_literal(options).map(|args| format!("{}({args})", plugin.name)),
            None => Ok(format!("{}()", plugin.name)),
        })
        .collect::<Result<Vec<_>, _>>()?;

    out.push_str("export default defineConfig({\n");
    out.push_str(&format!("  plugins: [{}],\n", plugin_calls.join(", ")));
    out.push_str(&format!("  base: {},\n", to_js_literal(&config.base)?));
    out.push_str(&format!(
        "  build: {},\n",
        indent_continuation(&to_js_pretty(&config.build)?, "  ")
    ));
    out.push_str("});\n");
    Ok(out)
}

fn validate_binding(name: &str) -> Result<(), ExternalizeError> {
    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$');
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if starts_ok && rest_ok {
        return Ok(());
    }
    Err(ExternalizeError::Render {
        message: format!("plugin name `{name}` is not a valid JavaScript identifier"),
    })
}

fn to_js_literal<T: Serialize + ?Sized>(value: &T) -> Result<String, ExternalizeError> {
    serde_json::to_string(value).map_err(|err| ExternalizeError::Render {
        message: err.to_string(),
    })
}

fn to_js_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, ExternalizeError> {
    serde_json::to_string_pretty(value).map_err(|err| ExternalizeError::Render {
        message: err.to_string(),
    })
}

fn indent_continuation(text: &str, prefix: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                line.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
