//! Runtime configuration, resolved once at startup from the environment.

use std::path::PathBuf;

use crate::adapters::sanitize::DEFAULT_SANITIZE_MAX_BYTES;
use crate::adapters::ArtifactPaths;
use crate::CardioRiskError;

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal (the TUI owns the screen), stdout otherwise
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Whether to log to a file given whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub features_path: PathBuf,
    /// Label the classifier emits for "disease present"
    pub positive_label: String,
    pub require_manifest: bool,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    /// Per-line cap for log redaction
    pub sanitize_max_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/heart_disease_model.json"),
            features_path: PathBuf::from("models/model_features.json"),
            positive_label: "Presence".to_string(),
            require_manifest: false,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from("cardiorisk.log"),
            sanitize_max_bytes: DEFAULT_SANITIZE_MAX_BYTES,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "yes" | "YES")
}

impl AppConfig {
    /// Read `CARDIORISK_*` variables from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or empty keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            model_path: get("CARDIORISK_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            features_path: get("CARDIORISK_FEATURES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.features_path),
            positive_label: get("CARDIORISK_POSITIVE_LABEL")
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.positive_label),
            require_manifest: get("CARDIORISK_REQUIRE_MANIFEST")
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.require_manifest),
            log_mode: get("CARDIORISK_LOG_MODE")
                .map(|v| LogMode::parse(&v))
                .unwrap_or(defaults.log_mode),
            log_file: get("CARDIORISK_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            sanitize_max_bytes: get("CARDIORISK_SANITIZE_MAX_BYTES")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|&v| v > 0)
                .unwrap_or(defaults.sanitize_max_bytes),
        }
    }

    /// Check that both artifacts exist before anything tries to load them.
    ///
    /// # Errors
    /// Returns `CardioRiskError::Config` naming the missing path and the
    /// variable that overrides it.
    pub fn validate(&self) -> Result<(), CardioRiskError> {
        for (path, var) in [
            (&self.model_path, "CARDIORISK_MODEL_PATH"),
            (&self.features_path, "CARDIORISK_FEATURES_PATH"),
        ] {
            if !path.is_file() {
                return Err(CardioRiskError::Config(format!(
                    "Artifact not found at {path:?}. Set {var} to the correct file."
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.model_path.clone(),
            features: self.features_path.clone(),
            require_manifest: self.require_manifest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.model_path, PathBuf::from("models/heart_disease_model.json"));
        assert_eq!(config.features_path, PathBuf::from("models/model_features.json"));
        assert_eq!(config.positive_label, "Presence");
        assert!(!config.require_manifest);
        assert_eq!(config.log_mode, LogMode::Auto);
        assert_eq!(config.sanitize_max_bytes, 16 * 1024);
    }

    #[test]
    fn test_sanitize_limit_resolved_once() {
        let config = config_from(&[("CARDIORISK_SANITIZE_MAX_BYTES", " 4096 ")]);
        assert_eq!(config.sanitize_max_bytes, 4096);

        for bad in ["0", "-5", "lots"] {
            let config = config_from(&[("CARDIORISK_SANITIZE_MAX_BYTES", bad)]);
            assert_eq!(config.sanitize_max_bytes, DEFAULT_SANITIZE_MAX_BYTES);
        }
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("CARDIORISK_MODEL_PATH", "/srv/model.json"),
            ("CARDIORISK_POSITIVE_LABEL", " 1 "),
            ("CARDIORISK_REQUIRE_MANIFEST", "yes"),
            ("CARDIORISK_LOG_MODE", "STDOUT"),
            ("CARDIORISK_LOG_FILE", ""),
        ]);
        assert_eq!(config.model_path, PathBuf::from("/srv/model.json"));
        assert_eq!(config.positive_label, "1");
        assert!(config.require_manifest);
        assert_eq!(config.log_mode, LogMode::Stdout);
        assert_eq!(config.log_file, PathBuf::from("cardiorisk.log"));
        assert!(config.artifact_paths().require_manifest);
    }

    #[test]
    fn test_validate_reports_missing_artifact() {
        assert!(AppConfig::default().validate().is_ok());

        let config = config_from(&[("CARDIORISK_FEATURES_PATH", "models/nope.json")]);
        let err = config.validate().expect_err("must fail");
        assert!(err.to_string().contains("CARDIORISK_FEATURES_PATH"));
    }

    #[test]
    fn test_log_mode_selection() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
    }
}
