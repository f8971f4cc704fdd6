//! Runtime configuration, read once from the environment at startup.
//!
//! | Variable                 | Default                      |
//! |--------------------------|------------------------------|
//! | `FORMGEN_HOST`           | `127.0.0.1`                  |
//! | `FORMGEN_PORT`           | `8080`                       |
//! | `FORMGEN_DATABASE`       | `formgen.sqlite`             |
//! | `OPENAI_API_KEY`         | unset (AI features disabled) |
//! | `OPENAI_BASE_URL`        | `https://api.openai.com/v1`  |
//! | `OPENAI_ASSISTANT_ID`    | unset (assistant disabled)   |
//! | `OPENAI_OCR_MODEL`       | `gpt-4o`                     |
//! | `OCR_MAX_UPLOAD_BYTES`   | `20971520` (20 MiB)          |
//! | `ASSISTANT_TIMEOUT_SECS` | `90` (at most `3600`)        |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OCR_MODEL: &str = "gpt-4o";
pub const DEFAULT_OCR_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_ASSISTANT_TIMEOUT: Duration = Duration::from_secs(90);
pub const MAX_ASSISTANT_TIMEOUT_SECS: u64 = 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Credentials and endpoint of the remote AI service.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub assistant_id: Option<String>,
    pub ocr_model: String,
    pub assistant_timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        OpenAiConfig {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            assistant_id: None,
            ocr_model: DEFAULT_OCR_MODEL.to_string(),
            assistant_timeout: DEFAULT_ASSISTANT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub ocr_max_upload_bytes: usize,
    pub openai: OpenAiConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source. Blank
    /// values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let assistant_timeout = parse_or(
            get("ASSISTANT_TIMEOUT_SECS"),
            "ASSISTANT_TIMEOUT_SECS",
            "number of seconds",
            0u64,
        )?;
        if assistant_timeout > MAX_ASSISTANT_TIMEOUT_SECS {
            return Err(ConfigError::Invalid {
                name: "ASSISTANT_TIMEOUT_SECS",
                expected: "number of seconds up to 3600",
                value: assistant_timeout.to_string(),
            });
        }

        Ok(AppConfig {
            host: get("FORMGEN_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(get("FORMGEN_PORT"), "FORMGEN_PORT", "port number", 8080)?,
            database_path: PathBuf::from(
                get("FORMGEN_DATABASE").unwrap_or_else(|| "formgen.sqlite".to_string()),
            ),
            ocr_max_upload_bytes: parse_or(
                get("OCR_MAX_UPLOAD_BYTES"),
                "OCR_MAX_UPLOAD_BYTES",
                "byte count",
                DEFAULT_OCR_MAX_UPLOAD_BYTES,
            )?,
            openai: OpenAiConfig {
                api_key: get("OPENAI_API_KEY"),
                base_url: get("OPENAI_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
                assistant_id: get("OPENAI_ASSISTANT_ID"),
                ocr_model: get("OPENAI_OCR_MODEL").unwrap_or_else(|| DEFAULT_OCR_MODEL.to_string()),
                assistant_timeout: match assistant_timeout {
                    0 => DEFAULT_ASSISTANT_TIMEOUT,
                    secs => Duration::from_secs(secs),
                },
            },
        })
    }

    pub fn bind_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(
    raw: Option<String>,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_url(), "http://127.0.0.1:8080");
        assert_eq!(config.database_path, PathBuf::from("formgen.sqlite"));
        assert_eq!(config.ocr_max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.openai.api_key, None);
        assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
        assert_eq!(config.openai.ocr_model, "gpt-4o");
        assert_eq!(config.openai.assistant_timeout, Duration::from_secs(90));
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let config = config_from(&[
            ("FORMGEN_PORT", "9000"),
            ("OPENAI_API_KEY", " sk-test "),
            ("OPENAI_BASE_URL", "http://localhost:4010/v1/"),
            ("ASSISTANT_TIMEOUT_SECS", "15"),
            ("OPENAI_ASSISTANT_ID", ""),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.openai.base_url, "http://localhost:4010/v1");
        assert_eq!(config.openai.assistant_timeout, Duration::from_secs(15));
        assert_eq!(config.openai.assistant_id, None);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = config_from(&[("FORMGEN_PORT", "eighty")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "FORMGEN_PORT",
                expected: "port number",
                value: "eighty".into()
            }
        );
        assert!(config_from(&[("OCR_MAX_UPLOAD_BYTES", "-1")]).is_err());
    }

    #[test]
    fn oversized_assistant_timeout_is_rejected() {
        let err = config_from(&[("ASSISTANT_TIMEOUT_SECS", "18446744073709551615")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "ASSISTANT_TIMEOUT_SECS",
                expected: "number of seconds up to 3600",
                value: "18446744073709551615".into()
            }
        );
        let config = config_from(&[("ASSISTANT_TIMEOUT_SECS", "3600")]).unwrap();
        assert_eq!(config.openai.assistant_timeout, Duration::from_secs(3600));
    }
}
