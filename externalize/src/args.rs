use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use externalize_core::bundler::OutputFormat;
use externalize_core::settings::SettingsOverrides;
use externalize_core::whitelist::WhitelistLookup;

#[derive(Debug, Clone, Parser)]
#[command(name = "externalize", version)]
#[command(about = "Turn whitelist.json keys into bundler externals", long_about = None)]
pub struct Cli {
    /// Directory the bundler configuration lives in; relative paths resolve against it.
    ///
    /// Defaults to the nearest ancestor of the current directory holding a package.json.
    #[arg(long = "config-dir", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Whitelist file, overriding --lookup.
    #[arg(long, global = true)]
    pub whitelist: Option<PathBuf>,

    /// Where to look for whitelist.json: sibling|parent.
    #[arg(long, global = true)]
    pub lookup: Option<WhitelistLookup>,

    /// Log debug diagnostics.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the externalized module names, one per line.
    List,

    /// Render the bundler configuration with the externals filled in.
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Args, Default)]
pub struct ConfigArgs {
    /// Output format: json|module.
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Base path for emitted asset references.
    #[arg(long)]
    pub base: Option<String>,

    /// Global variable for an external, as NAME=VAR. Repeatable.
    #[arg(long = "global", value_parser = parse_global)]
    pub globals: Vec<(String, String)>,

    /// Write to this file instead of stdout.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

fn parse_global(raw: &str) -> Result<(String, String), String> {
    let (name, var) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VAR, got `{raw}`"))?;
    let (name, var) = (name.trim(), var.trim());
    if name.is_empty() || var.is_empty() {
        return Err(format!("expected NAME=VAR, got `{raw}`"));
    }
    Ok((name.to_string(), var.to_string()))
}

impl Cli {
    pub fn overrides(&self) -> SettingsOverrides {
        let config_args = match &self.command {
            Command::Config(args) => args.clone(),
            Command::List => ConfigArgs::default(),
        };
        SettingsOverrides {
            whitelist: self.whitelist.clone(),
            lookup: self.lookup,
            base: config_args.base,
            globals: config_args.globals,
            format: config_args.format,
        }
    }
}
