//! Runtime settings loaded from the environment (and `.env` via dotenv)

use crate::error::ChatbotError;
use crate::Result;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStoreKind {
    File,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub model_path: PathBuf,
    pub model_store: ModelStoreKind,
    /// `None` disables the linguistic tokenizer
    pub stopwords_path: Option<PathBuf>,
    pub api_prefix: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub fetch_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/intent_classifier"),
            model_store: ModelStoreKind::File,
            stopwords_path: Some(PathBuf::from("data/stopwords/english")),
            api_prefix: "/api/v1".to_string(),
            port: 8000,
            cors_origins: vec!["http://localhost:3000".to_string()],
            fetch_timeout: Duration::from_millis(5000),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(path) = lookup("NLP_MODEL_PATH").filter(|v| !v.trim().is_empty()) {
            settings.model_path = PathBuf::from(path);
        }

        if let Some(kind) = lookup("MODEL_STORE") {
            settings.model_store = match kind.trim().to_lowercase().as_str() {
                "file" | "" => ModelStoreKind::File,
                "memory" => ModelStoreKind::Memory,
                other => {
                    return Err(ChatbotError::ConfigError(format!(
                        "MODEL_STORE must be 'file' or 'memory', got '{}'",
                        other
                    )))
                }
            };
        }

        if let Some(path) = lookup("STOPWORDS_PATH") {
            settings.stopwords_path = match path.trim() {
                "" => None,
                p => Some(PathBuf::from(p)),
            };
        }

        if let Some(prefix) = lookup("API_PREFIX") {
            settings.api_prefix = normalize_prefix(&prefix);
        }

        if let Some(port) = lookup("PORT").or_else(|| lookup("API_PORT")) {
            settings.port = port.trim().parse().map_err(|_| {
                ChatbotError::ConfigError(format!("Invalid port '{}'", port))
            })?;
        }

        if let Some(origins) = lookup("CORS_ORIGINS") {
            settings.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(timeout) = lookup("DATA_FETCH_TIMEOUT_MS") {
            let millis: u64 = timeout.trim().parse().map_err(|_| {
                ChatbotError::ConfigError(format!("Invalid DATA_FETCH_TIMEOUT_MS '{}'", timeout))
            })?;
            settings.fetch_timeout = Duration::from_millis(millis);
        }

        Ok(settings)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Leading slash, no trailing slash; "" and "/" mean no prefix
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.model_path, PathBuf::from("models/intent_classifier"));
        assert_eq!(settings.model_store, ModelStoreKind::File);
        assert_eq!(settings.api_prefix, "/api/v1");
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.fetch_timeout, Duration::from_secs(5));
        assert!(!settings.allows_any_origin());
    }

    #[test]
    fn test_overrides() {
        let settings = settings_from(&[
            ("NLP_MODEL_PATH", "/var/lib/finchat/model.bin"),
            ("MODEL_STORE", "Memory"),
            ("STOPWORDS_PATH", ""),
            ("API_PREFIX", "api/v2/"),
            ("API_PORT", "9090"),
            ("CORS_ORIGINS", "http://a.test, *"),
            ("DATA_FETCH_TIMEOUT_MS", "250"),
        ])
        .unwrap();

        assert_eq!(settings.model_path, PathBuf::from("/var/lib/finchat/model.bin"));
        assert_eq!(settings.model_store, ModelStoreKind::Memory);
        assert!(settings.stopwords_path.is_none());
        assert_eq!(settings.api_prefix, "/api/v2");
        assert_eq!(settings.port, 9090);
        assert_eq!(settings.cors_origins, vec!["http://a.test", "*"]);
        assert!(settings.allows_any_origin());
        assert_eq!(settings.fetch_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_port_takes_precedence_over_api_port() {
        let settings = settings_from(&[("PORT", "7000"), ("API_PORT", "9090")]).unwrap();
        assert_eq!(settings.port, 7000);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(settings_from(&[("PORT", "eighty")]).is_err());
        assert!(settings_from(&[("MODEL_STORE", "s3")]).is_err());
        assert!(settings_from(&[("DATA_FETCH_TIMEOUT_MS", "-1")]).is_err());
    }

    #[test]
    fn test_root_prefix_is_empty() {
        let settings = settings_from(&[("API_PREFIX", "/")]).unwrap();
        assert_eq!(settings.api_prefix, "");
    }
}
