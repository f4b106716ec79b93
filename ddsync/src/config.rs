use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::sync::SyncOptions;
use crate::sync::remote_state::Ownership;

const DEFAULT_API_URL: &str = "https://api.datadoghq.com";
const DEFAULT_LOCK_FILE: &str = "lock.json";
const DEFAULT_OWNER_TAG: &str = "created_by:ddsync";
const DEFAULT_DESCRIPTION_TAG: &str = "[managed by ddsync]";
const DEFAULT_ALERT_GRAPH_TAG: &str = "ddsync:alert-graph";

const API_KEY_ENV: &str = "DD_API_KEY";
const APP_KEY_ENV: &str = "DD_APP_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "missing Datadog credentials: {}\n  export them (or add them to a .env file) and run again",
        .missing.join(", ")
    )]
    MissingCredentials { missing: Vec<&'static str> },
}

#[derive(Clone, Debug)]
pub struct SyncConfig {
    pub api_key: String,
    pub app_key: String,
    pub api_url: String,
    pub lock_path: PathBuf,
    pub owner_tag: String,
    pub description_tag: String,
    pub alert_graph_tag: String,
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let api_key = read(API_KEY_ENV);
        let app_key = read(APP_KEY_ENV);
        let (api_key, app_key) = match (api_key, app_key) {
            (Some(api_key), Some(app_key)) => (api_key, app_key),
            (api_key, app_key) => {
                let mut missing = Vec::new();
                if api_key.is_none() {
                    missing.push(API_KEY_ENV);
                }
                if app_key.is_none() {
                    missing.push(APP_KEY_ENV);
                }
                return Err(ConfigError::MissingCredentials { missing });
            }
        };

        let home = dirs::home_dir();
        let lock_path = read("DDSYNC_LOCK_FILE")
            .map(|value| match &home {
                Some(home) => expand_with_home(&value, home),
                None => PathBuf::from(value),
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCK_FILE));

        Ok(Self {
            api_key,
            app_key,
            api_url: read("DD_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            lock_path,
            owner_tag: read("DDSYNC_OWNER_TAG").unwrap_or_else(|| DEFAULT_OWNER_TAG.to_string()),
            description_tag: read("DDSYNC_DESCRIPTION_TAG")
                .unwrap_or_else(|| DEFAULT_DESCRIPTION_TAG.to_string()),
            alert_graph_tag: read("DDSYNC_ALERT_GRAPH_TAG")
                .unwrap_or_else(|| DEFAULT_ALERT_GRAPH_TAG.to_string()),
        })
    }

    pub fn sync_options(&self, name_filter: Option<String>) -> SyncOptions {
        SyncOptions {
            ownership: Ownership {
                owner_tag: self.owner_tag.clone(),
                description_tag: self.description_tag.clone(),
            },
            alert_graph_tag: self.alert_graph_tag.clone(),
            name_filter,
        }
    }
}

pub fn expand_with_home(value: &str, home: &Path) -> PathBuf {
    if value == "~" {
        return home.to_path_buf();
    }
    if let Some(rest) = value.strip_prefix("~/") {
        return home.join(rest);
    }
    PathBuf::from(value)
}
