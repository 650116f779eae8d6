//! Config commands

use std::path::PathBuf;

use crate::config::Config;
use crate::output;
use crate::ConfigCommands;

const KEYS: [&str; 5] = ["api_url", "zip_dataset", "timeout_secs", "max_retries", "default_format"];

pub async fn handle(action: ConfigCommands, profile: Option<&str>) -> Result<(), String> {
    match action {
        ConfigCommands::Init => {
            let path = Config::default().save(profile)?;
            output::success(&format!("Configuration initialized at {}", path.display()));
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load(profile).unwrap_or_default();
            set(&mut config, &key, value)?;
            config.save(profile)?;
            output::success(&format!("Set {} successfully", key));
        }
        ConfigCommands::Get { key } => {
            let config = Config::load(profile)?;
            println!("{}: {}", key, get(&config, &key)?.unwrap_or_else(|| "(not set)".into()));
        }
        ConfigCommands::List => {
            let config = Config::load(profile)?;
            for key in KEYS {
                println!("{}: {}", key, get(&config, key)?.unwrap_or_else(|| "(not set)".into()));
            }
        }
    }
    Ok(())
}

fn set(config: &mut Config, key: &str, value: String) -> Result<(), String> {
    match key {
        "api_url" => config.api_url = Some(value),
        "zip_dataset" => config.zip_dataset = Some(PathBuf::from(value)),
        "timeout_secs" => {
            config.timeout_secs = Some(value.parse().map_err(|_| format!("Not a number: {}", value))?)
        }
        "max_retries" => {
            config.max_retries = Some(value.parse().map_err(|_| format!("Not a number: {}", value))?)
        }
        "default_format" => config.default_format = Some(value),
        _ => return Err(format!("Unknown config key: {}", key)),
    }
    Ok(())
}

fn get(config: &Config, key: &str) -> Result<Option<String>, String> {
    let value = match key {
        "api_url" => config.api_url.clone(),
        "zip_dataset" => config.zip_dataset.as_ref().map(|p| p.display().to_string()),
        "timeout_secs" => config.timeout_secs.map(|v| v.to_string()),
        "max_retries" => config.max_retries.map(|v| v.to_string()),
        "default_format" => config.default_format.clone(),
        _ => return Err(format!("Unknown config key: {}", key)),
    };
    Ok(value)
}
