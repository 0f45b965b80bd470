//! Naming conventions of the synthesized closure classes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Names closure conversion gives to what it generates.
///
/// The code generator must agree on `call_method` and `constructor`; the
/// defaults match the runtime's calling convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClosureConfig {
    /// Classes are named `<class_prefix>_<n>_<closure name>`
    pub class_prefix: String,
    pub call_method: String,
    pub constructor: String,
    /// Name of the call method's receiver parameter
    pub receiver: String,
}

impl Default for ClosureConfig {
    fn default() -> Self {
        Self {
            class_prefix: "Clo".to_string(),
            call_method: "__call__".to_string(),
            constructor: "__init__".to_string(),
            receiver: "self".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("closures.{field} must be an identifier, got {value:?}")]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
}

impl ClosureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("class_prefix", &self.class_prefix),
            ("call_method", &self.call_method),
            ("constructor", &self.constructor),
            ("receiver", &self.receiver),
        ];
        for (field, value) in fields {
            if !is_identifier(value) {
                return Err(ConfigError {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ClosureConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_names() {
        let config = ClosureConfig {
            receiver: "my self".into(),
            ..ClosureConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "receiver");

        let config = ClosureConfig {
            class_prefix: "1Clo".into(),
            ..ClosureConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
