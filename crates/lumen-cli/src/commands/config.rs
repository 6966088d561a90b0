//! `lumen config`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use lumen_core::Config;

use crate::output::{Output, OutputFormat};

#[derive(Serialize)]
struct ConfigView<'a> {
    file: PathBuf,
    #[serde(flatten)]
    config: &'a Config,
}

pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config = Config::load_with_cli_override(config_path).context("Cannot load config")?;
    let file = effective_path(config_path);

    match output.format {
        OutputFormat::Json => output.json(&ConfigView {
            file,
            config: &config,
        }),
        OutputFormat::Quiet => println!("{}", config.data_dir.display()),
        OutputFormat::Human => {
            let log_file = match &config.log_file {
                Some(path) => path.display().to_string(),
                None => format!("{} (default)", config.log_path().display()),
            };
            println!("{}", file.display());
            println!("  data_dir  {}", config.data_dir.display());
            println!("  log_file  {}", log_file);
            println!("  splash    {}", config.splash);
        }
    }
    Ok(())
}

/// Change one key and write the file back
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config = Config::load_with_cli_override(config_path).context("Cannot load config")?;
    apply(&mut config, &key, &value)?;

    let file = effective_path(config_path);
    config.save_to_path(&file)?;
    output.success(&format!("{} = {} ({})", key, value, file.display()));
    Ok(())
}

fn effective_path(config_path: Option<&PathBuf>) -> PathBuf {
    config_path.cloned().unwrap_or_else(Config::config_file_path)
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "log_file" => {
            config.log_file = match value {
                "" | "none" => None,
                path => Some(path.into()),
            };
        }
        "splash" => {
            config.splash = value
                .parse()
                .with_context(|| format!("splash must be true or false, got '{}'", value))?;
        }
        _ => {
            bail!("No config key '{}' (expected data_dir, log_file or splash)", key);
        }
    }
    Ok(())
}
