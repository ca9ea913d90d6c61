use std::io::Write;
use std::path::{Path, PathBuf};

use externalize_core::bundler::render;
use externalize_core::config::{ExternalizeConfig, find_project_root, load_externalize_config};
use externalize_core::error::ExternalizeError;
use externalize_core::settings::Settings;

use crate::args::{Cli, Command};

pub fn resolve_config_dir(cli: &Cli, cwd: &Path) -> PathBuf {
    let dir = match &cli.config_dir {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => cwd.join(dir),
        None => find_project_root(cwd),
    };
    dunce::canonicalize(&dir).unwrap_or(dir)
}

fn load_config_or_default(config_dir: &Path) -> ExternalizeConfig {
    match load_externalize_config(config_dir) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("{err}; using default settings");
            ExternalizeConfig::default()
        }
    }
}

pub fn resolve_settings(cli: &Cli, cwd: &Path) -> Settings {
    let config_dir = resolve_config_dir(cli, cwd);
    let file_config = load_config_or_default(&config_dir);
    let settings = Settings::resolve(&config_dir, &file_config, &cli.overrides());
    tracing::debug!(
        config_dir = %settings.config_dir.display(),
        whitelist = %settings.whitelist_path.display(),
        format = ?settings.format,
        "resolved settings"
    );
    settings
}

pub fn run(cli: &Cli, cwd: &Path) -> Result<(), ExternalizeError> {
    tracing::debug!(version = externalize_core::core_version(), "externalize starting");
    let settings = resolve_settings(cli, cwd);
    match &cli.command {
        Command::List => {
            let text = settings
                .load_externals()
                .into_iter()
                .map(|name| format!("{name}\n"))
                .collect::<String>();
            write_stdout(&text)
        }
        Command::Config(args) => {
            let rendered = render(&settings.build_config(), settings.format)?;
            match &args.out {
                Some(out) => write_file(&cwd.join(out), &rendered),
                None => write_stdout(&rendered),
            }
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), ExternalizeError> {
    std::fs::write(path, contents).map_err(|source| ExternalizeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "wrote bundler config");
    Ok(())
}

fn write_stdout(text: &str) -> Result<(), ExternalizeError> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|source| ExternalizeError::Io {
            path: PathBuf::from("<stdout>"),
            source,
        })
}
