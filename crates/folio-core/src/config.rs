use crate::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default browser-style quota for the key-value store (5 MiB).
pub const DEFAULT_STORAGE_QUOTA: usize = 5 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct IdentitySettings {
    /// Base URL of the hosted auth service (e.g. “https://xyz.supabase.co”).
    pub url: String,
    /// Public API key sent with every auth request.
    pub anon_key: String,
}

impl IdentitySettings {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }
}

/// Owner details shown on the public pages.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub headline: String,
    pub bio: String,
    pub email: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Portfolio".to_string(),
            headline: "Full Stack Developer".to_string(),
            bio: String::new(),
            email: None,
            github: None,
            linkedin: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the key-value storage file and logs.
    pub data_dir: PathBuf,

    /// Key under which the project collection is stored.
    pub storage_key: String,

    /// Maximum size in bytes of the storage file.
    pub storage_quota_bytes: usize,

    /// Hosted identity provider used for the admin area.
    pub identity: IdentitySettings,

    pub profile: Profile,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            storage_key: "portfolio_projects".to_string(),
            storage_quota_bytes: DEFAULT_STORAGE_QUOTA,
            identity: IdentitySettings::default(),
            profile: Profile::default(),
        }
    }
}

impl Settings {
    const STORAGE_FILE: &'static str = "storage.json";

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "folio").ok_or(Error::ConfigDirNotFound)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("settings.toml"))
    }

    pub fn new() -> Result<Self> {
        let config_path = Self::config_path()?;
        let default_data_dir = Self::project_dirs()?.data_dir().to_path_buf();
        Self::load(&config_path, &default_data_dir)
    }

    /// Loads settings from an explicit file, falling back to `default_data_dir`
    /// when the file does not name one. `FOLIO_*` environment variables win
    /// over the file (nested keys use `__`, e.g. `FOLIO_IDENTITY__URL`).
    pub fn load(config_path: &Path, default_data_dir: &Path) -> Result<Self> {
        let config_builder = config::Config::builder()
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("FOLIO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("data_dir", default_data_dir.to_string_lossy().to_string())?
            .build()?;
        config_builder.try_deserialize().map_err(Error::Config)
    }

    /// Path of the file backing the key-value store.
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(Self::STORAGE_FILE)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}
