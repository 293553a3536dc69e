use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    provider::{Provider, ProviderError},
    storage::{DiagnosticSink, PersistedState, StorageContext},
    types::DetailLevel,
};

pub const SETTINGS_KEY: &str = "konspekt.settings";
pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const MAX_HISTORY_LIMIT: usize = 500;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Unknown setting {key:?}, expected one of: provider, language, detail, history-limit")]
    UnknownKey { key: String },

    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// User preferences. Missing fields in stored JSON take their defaults, so
/// settings written by older versions still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub provider: Provider,
    /// Summary language; `None` keeps the video's own language.
    pub language: Option<String>,
    pub detail: DetailLevel,
    pub history_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            language: None,
            detail: DetailLevel::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl Settings {
    /// Persisted settings for `context`.
    pub fn load(
        context: &StorageContext,
        sink: Arc<dyn DiagnosticSink>,
    ) -> PersistedState<Settings> {
        PersistedState::new(context, SETTINGS_KEY, Settings::default(), sink)
    }

    /// Set one field from its textual form.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let value = value.trim();
        match key.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "provider" => {
                self.provider =
                    value
                        .parse()
                        .map_err(|e: ProviderError| SettingsError::InvalidValue {
                            key: "provider",
                            value: value.to_string(),
                            reason: e.to_string(),
                        })?;
            }
            "language" | "lang" => {
                self.language = match value {
                    "" | "auto" => None,
                    lang if is_language_code(lang) => Some(lang.to_ascii_lowercase()),
                    _ => {
                        return Err(SettingsError::InvalidValue {
                            key: "language",
                            value: value.to_string(),
                            reason: "expected a language code such as en, uk or pt-br, or auto"
                                .to_string(),
                        });
                    }
                };
            }
            "detail" => {
                self.detail = value.parse().map_err(|reason| SettingsError::InvalidValue {
                    key: "detail",
                    value: value.to_string(),
                    reason,
                })?;
            }
            "history-limit" => {
                self.history_limit = value
                    .parse::<usize>()
                    .ok()
                    .filter(|n| (1..=MAX_HISTORY_LIMIT).contains(n))
                    .ok_or_else(|| SettingsError::InvalidValue {
                        key: "history-limit",
                        value: value.to_string(),
                        reason: format!("expected a number from 1 to {MAX_HISTORY_LIMIT}"),
                    })?;
            }
            _ => {
                return Err(SettingsError::UnknownKey {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    /// `(name, value)` rows for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("provider", self.provider.id().to_string()),
            (
                "language",
                self.language.clone().unwrap_or_else(|| "auto".to_string()),
            ),
            ("detail", self.detail.to_string()),
            ("history-limit", self.history_limit.to_string()),
        ]
    }
}

fn is_language_code(value: &str) -> bool {
    value.len() <= 16 && value.chars().all(|c| c.is_ascii_alphabetic() || c == '-')
}
