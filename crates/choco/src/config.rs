//! `choco.toml` loading

use anyhow::{Context, Result};
use choco_transform::ClosureConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "choco.toml";

/// Contents of `choco.toml`. Every table is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChocoConfig {
    pub closures: ClosureConfig,
}

/// Load the configuration from `explicit`, or from `./choco.toml` when it
/// exists. With neither, every setting takes its default.
pub fn load(explicit: Option<&Path>) -> Result<ChocoConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(CONFIG_FILE);
            if !path.exists() {
                log::debug!("no {} found, using defaults", CONFIG_FILE);
                return Ok(ChocoConfig::default());
            }
            path
        }
    };
    let text = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = parse(&text).with_context(|| format!("Invalid config file: {}", path.display()))?;
    log::debug!("loaded {}: {:?}", path.display(), config);
    Ok(config)
}

pub fn parse(text: &str) -> Result<ChocoConfig> {
    let config: ChocoConfig = toml::from_str(text)?;
    config.closures.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.closures, ClosureConfig::default());
    }

    #[test]
    fn test_partial_closures_table() {
        let config = parse("[closures]\nclass_prefix = \"Lam\"\n").unwrap();
        assert_eq!(config.closures.class_prefix, "Lam");
        assert_eq!(config.closures.call_method, "__call__");
        assert_eq!(config.closures.receiver, "self");
    }

    #[test]
    fn test_rejects_unknown_keys_and_bad_names() {
        assert!(parse("[closures]\nprefix = \"Lam\"\n").is_err());
        assert!(parse("[closures]\nreceiver = \"\"\n").is_err());
        assert!(parse("[optimizer]\nlevel = 2\n").is_err());
    }
}
