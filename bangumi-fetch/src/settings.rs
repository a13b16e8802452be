use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::FetchError;

const APP_DIR: &str = "bangumi-shelf";
const DB_FILE_NAME: &str = "bangumi.db";
const LEGACY_FILE_NAME: &str = "bangumi-other.json";

const ENV_API_URL: &str = "BANGUMI_API_URL";
const ENV_USER_ID: &str = "BANGUMI_USER_ID";

/// Process-wide settings, read from `config.json` once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_subject_type")]
    pub subject_type: u32,
    #[serde(default = "default_collection_type")]
    pub collection_type: u32,
    /// Database file; defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    /// Legacy flat JSON snapshot used for first-run migration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_snapshot_path: Option<PathBuf>,
}

fn default_page_size() -> u32 {
    30
}

fn default_subject_type() -> u32 {
    2
}

fn default_collection_type() -> u32 {
    2
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: None,
            user_id: None,
            page_size: default_page_size(),
            subject_type: default_subject_type(),
            collection_type: default_collection_type(),
            db_path: None,
            legacy_snapshot_path: None,
        }
    }
}

/// Where a setting's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the settings file.
    ConfigFile,
    /// Built-in default value.
    Default,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for SettingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of the remote-fetch fields.
#[derive(Debug, Clone)]
pub struct SettingSources {
    pub api_url: SettingSource,
    pub user_id: SettingSource,
    pub page_size: SettingSource,
    pub subject_type: SettingSource,
    pub collection_type: SettingSource,
}

/// Validated parameters for walking the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub api_url: String,
    pub user_id: String,
    pub page_size: u32,
    pub subject_type: u32,
    pub collection_type: u32,
}

impl Settings {
    /// Load settings from `path`, then apply environment overrides.
    ///
    /// Priority: env vars > settings file > defaults. A missing file is not
    /// an error; an unreadable or malformed one is.
    pub fn load(path: &Path) -> Result<Self, FetchError> {
        Self::load_with(path, |var| std::env::var(var).ok()).map(|(settings, _)| settings)
    }

    /// Like [`Settings::load`], with an explicit environment lookup, also
    /// reporting where each remote field came from.
    pub fn load_with(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<(Self, SettingSources), FetchError> {
        let (mut settings, file_fields) = match std::fs::read_to_string(path) {
            Ok(contents) => {
                let raw: serde_json::Value = serde_json::from_str(&contents).map_err(|e| {
                    FetchError::Config(format!("Failed to parse {}: {}", path.display(), e))
                })?;
                let settings: Settings = serde_json::from_value(raw.clone()).map_err(|e| {
                    FetchError::Config(format!("Invalid settings in {}: {}", path.display(), e))
                })?;
                log::info!("Loaded settings from {}", path.display());
                (settings, raw)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings file at {}, using defaults", path.display());
                (Settings::default(), serde_json::Value::Null)
            }
            Err(e) => {
                return Err(FetchError::Config(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let in_file = |key: &str| file_fields.get(key).is_some_and(|v| !v.is_null());
        let fixed = |key: &str| {
            if in_file(key) {
                SettingSource::ConfigFile
            } else {
                SettingSource::Default
            }
        };

        let mut sources = SettingSources {
            api_url: SettingSource::Missing,
            user_id: SettingSource::Missing,
            page_size: fixed("pageSize"),
            subject_type: fixed("subjectType"),
            collection_type: fixed("collectionType"),
        };

        if let Some(url) = env(ENV_API_URL) {
            settings.api_url = Some(url);
            sources.api_url = SettingSource::EnvVar(ENV_API_URL);
        } else if settings.api_url.is_some() {
            sources.api_url = SettingSource::ConfigFile;
        }

        if let Some(id) = env(ENV_USER_ID) {
            settings.user_id = Some(id);
            sources.user_id = SettingSource::EnvVar(ENV_USER_ID);
        } else if settings.user_id.is_some() {
            sources.user_id = SettingSource::ConfigFile;
        }

        Ok((settings, sources))
    }

    /// Write the settings file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), FetchError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FetchError::Config(format!("Cannot create {}: {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| FetchError::Config(format!("Cannot write {}: {}", path.display(), e)))
    }

    /// Check the remote fields and produce the parameters for a fetch.
    pub fn remote(&self) -> Result<RemoteConfig, FetchError> {
        let api_url = non_blank(self.api_url.as_deref()).ok_or_else(|| {
            FetchError::Config(format!(
                "Missing apiUrl. Set {} or add it to the settings file",
                ENV_API_URL
            ))
        })?;
        let user_id = non_blank(self.user_id.as_deref()).ok_or_else(|| {
            FetchError::Config(format!(
                "Missing userId. Set {} or add it to the settings file",
                ENV_USER_ID
            ))
        })?;
        if self.page_size == 0 {
            return Err(FetchError::Config("pageSize must be at least 1".to_string()));
        }

        Ok(RemoteConfig {
            api_url: api_url.to_string(),
            user_id: user_id.to_string(),
            page_size: self.page_size,
            subject_type: self.subject_type,
            collection_type: self.collection_type,
        })
    }

    /// Database file to use, falling back to the platform data directory.
    pub fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| default_data_dir().join(DB_FILE_NAME))
    }

    /// Legacy snapshot location, falling back to the platform data directory.
    pub fn legacy_snapshot_path(&self) -> PathBuf {
        self.legacy_snapshot_path
            .clone()
            .unwrap_or_else(|| default_data_dir().join(LEGACY_FILE_NAME))
    }
}

/// Return the path to the settings file.
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.json"))
}

/// Per-user data directory (`~/.local/share/bangumi-shelf` on Linux).
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
