use crate::error::{GroupctlError, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "appsettings.json";
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
pub const DEFAULT_GRAPH_ENDPOINT: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_GROUP_ID: &str = "669c3f6d-2e41-40d1-8fa6-3688e47b3e0c";

pub const ENV_APPLICATION_ID: &str = "GROUPCTL_APPLICATION_ID";
pub const ENV_TENANT_ID: &str = "GROUPCTL_TENANT_ID";

/// Validated application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub application_id: String,
    pub tenant_id: String,
    pub authority_host: String,
    pub graph_endpoint: String,
    pub group_id: String,
}

/// Settings file as written on disk, before validation
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSettings {
    #[serde(default)]
    application_id: Option<String>,
    #[serde(default)]
    tenant_id: Option<String>,
    #[serde(default)]
    authority_host: Option<String>,
    #[serde(default)]
    graph_endpoint: Option<String>,
    #[serde(default)]
    group_id: Option<String>,
}

impl RawSettings {
    fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = env(ENV_APPLICATION_ID).filter(|v| !v.is_empty()) {
            self.application_id = Some(value);
        }
        if let Some(value) = env(ENV_TENANT_ID).filter(|v| !v.is_empty()) {
            self.tenant_id = Some(value);
        }
    }

    fn validate(self) -> Option<AppSettings> {
        let application_id = self.application_id.filter(|v| !v.is_empty())?;
        let tenant_id = self.tenant_id.filter(|v| !v.is_empty())?;

        Some(AppSettings {
            application_id,
            tenant_id,
            authority_host: self
                .authority_host
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string()),
            graph_endpoint: self
                .graph_endpoint
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_GRAPH_ENDPOINT.to_string()),
            group_id: self
                .group_id
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_GROUP_ID.to_string()),
        })
    }
}

impl AppSettings {
    /// Load settings from `path` (or the default locations), layering
    /// `GROUPCTL_*` environment variables on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Same as [`AppSettings::load`] with an explicit environment lookup
    pub fn load_with<F>(path: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path(),
        };
        tracing::debug!("Loading settings from {:?}", path);

        let mut raw = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawSettings>(&contents) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::debug!("Settings file {:?} is not valid JSON: {}", path, e);
                    return Err(invalid());
                }
            },
            Err(e) => {
                tracing::debug!("Settings file {:?} could not be read: {}", path, e);
                RawSettings::default()
            }
        };

        raw.apply_env(env);
        raw.validate().ok_or_else(|| {
            tracing::debug!("applicationId or tenantId is missing or empty");
            invalid()
        })
    }

    /// Parse and validate settings from a JSON document, without any
    /// environment overrides
    pub fn from_json(contents: &str) -> Result<Self> {
        let raw: RawSettings = serde_json::from_str(contents).map_err(|e| {
            tracing::debug!("Settings are not valid JSON: {}", e);
            invalid()
        })?;
        raw.validate().ok_or_else(invalid)
    }

    /// `./appsettings.json` if present, otherwise the per-user config directory
    pub fn default_path() -> PathBuf {
        let local = PathBuf::from(SETTINGS_FILE);
        if local.exists() {
            return local;
        }

        ProjectDirs::from("com", "groupctl", "groupctl")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
            .unwrap_or(local)
    }
}

fn invalid() -> GroupctlError {
    GroupctlError::InvalidConfig(SETTINGS_FILE.to_string())
}
