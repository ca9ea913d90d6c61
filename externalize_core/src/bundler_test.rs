use indexmap::IndexMap;

use crate::bundler::{
    BuildSettings, OutputFormat, PluginSpec, assemble_build_config, render, render_json,
    render_module,
};
use crate::error::ExternalizeError;

fn react_externals() -> Vec<String> {
    vec!["react".to_string(), "react-dom".to_string()]
}

#[test]
fn default_settings_use_react_plugin_and_relative_base() {
    let config = assemble_build_config(&BuildSettings::default(), react_externals());
    assert_eq!(config.plugins, vec![PluginSpec::react()]);
    assert_eq!(config.base, "./");
    assert_eq!(config.externals(), react_externals().as_slice());
    assert!(config.build.rollup_options.output.globals.is_empty());
}

#[test]
fn module_render_matches_vite_config_layout() {
    let config = assemble_build_config(&BuildSettings::default(), react_externals());
    let expected = r#"import { defineConfig } from "vite";
import react from "@vitejs/plugin-react";

export default defineConfig({
  plugins: [react()],
  base: "./",
  build: {
    "rollupOptions": {
      "external": [
        "react",
        "react-dom"
      ],
      "output": {}
    }
  },
});
"#;
    let rendered = render_module(&config).unwrap();
    similar_asserts::assert_eq!(rendered.as_str(), expected);
}

#[test]
fn module_render_with_no_externals_still_produces_config() {
    let config = assemble_build_config(&BuildSettings::default(), vec![]);
    let rendered = render(&config, OutputFormat::Module).unwrap();
    assert!(rendered.contains("      \"external\": [],\n"));
    assert!(rendered.ends_with("});\n"));
}

#[test]
fn plugin_options_are_passed_to_the_factory() {
    let settings = BuildSettings {
        plugins: vec![PluginSpec {
            name: "vue".to_string(),
            module: "@vitejs/plugin-vue".to_string(),
            options: Some(serde_json::json!({ "isProduction": true })),
        }],
        ..BuildSettings::default()
    };
    let rendered = render_module(&assemble_build_config(&settings, vec![])).unwrap();
    assert!(rendered.contains("import vue from \"@vitejs/plugin-vue\";\n"));
    assert!(rendered.contains("  plugins: [vue({\"isProduction\":true})],\n"));
}

#[test]
fn invalid_plugin_binding_is_a_render_error() {
    let settings = BuildSettings {
        plugins: vec![PluginSpec {
            name: "plugin-react".to_string(),
            module: "@vitejs/plugin-react".to_string(),
            options: None,
        }],
        ..BuildSettings::default()
    };
    let err = render_module(&assemble_build_config(&settings, vec![])).unwrap_err();
    assert!(matches!(err, ExternalizeError::Render { .. }));
}

#[test]
fn json_render_uses_camel_case_and_skips_empty_globals() {
    let config = assemble_build_config(&BuildSettings::default(), react_externals());
    let value: serde_json::Value = serde_json::from_str(&render_json(&config).unwrap()).unwrap();
    assert_eq!(
        value["build"]["rollupOptions"]["external"],
        serde_json::json!(["react", "react-dom"])
    );
    assert_eq!(value["build"]["rollupOptions"]["output"], serde_json::json!({}));
    assert_eq!(value["base"], "./");
    assert_eq!(value["plugins"][0]["module"], "@vitejs/plugin-react");
}

#[test]
fn json_render_keeps_globals_in_declaration_order() {
    let mut globals = IndexMap::new();
    globals.insert("react-dom".to_string(), "ReactDOM".to_string());
    globals.insert("react".to_string(), "React".to_string());
    let settings = BuildSettings {
        globals,
        ..BuildSettings::default()
    };
    let rendered = render_json(&assemble_build_config(&settings, react_externals())).unwrap();
    let react_dom_at = rendered.find("\"react-dom\": \"ReactDOM\"").unwrap();
    let react_at = rendered.find("\"react\": \"React\"").unwrap();
    assert!(react_dom_at < react_at);
}

#[test]
fn output_format_parses_aliases() {
    assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
    assert_eq!("ESM".parse::<OutputFormat>(), Ok(OutputFormat::Module));
    assert!("yaml".parse::<OutputFormat>().is_err());
}
