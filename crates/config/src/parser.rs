use crate::Settings;
use anyhow::{Context, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

#[instrument(skip(path))]
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    info!("Loading settings from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {:?}", path))?;

    let substituted = substitute_env_vars(&content);
    debug!("Environment variable substitution completed");

    let settings: Settings = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML settings")?;

    info!("Settings loaded successfully");
    Ok(settings)
}

#[instrument(skip(settings))]
pub fn save_settings<P: AsRef<Path> + std::fmt::Debug>(settings: &Settings, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving settings to: {:?}", path);

    let yaml = serde_yaml::to_string(settings)
        .with_context(|| "Failed to serialize settings to YAML")?;

    fs::write(path, yaml).with_context(|| format!("Failed to write settings file: {:?}", path))?;

    Ok(())
}

/// Substitute `${VAR_NAME}` placeholders with environment variable values.
///
/// Unset variables keep their placeholder; typed parsing of the affected
/// field reports the problem afterwards.
pub fn substitute_env_vars(content: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)\}").expect("placeholder pattern is valid");
    let mut result = content.to_string();

    for caps in re.captures_iter(content) {
        let var_name = &caps[1];
        let placeholder = &caps[0];

        match env::var(var_name) {
            Ok(value) => {
                debug!("Substituting environment variable: {}", var_name);
                result = result.replace(placeholder, &value);
            }
            Err(_) => {
                warn!("Environment variable '{}' not set", var_name);
            }
        }
    }

    result
}
