use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pages_core::PopupOptions;
use pages_engine::ApiSettings;
use pages_logging::{pages_info, pages_warn};
use serde::{Deserialize, Serialize};

pub(crate) const CONFIG_FILENAME: &str = "prompt_pages.ron";
pub(crate) const API_BASE_ENV: &str = "PROMPT_PAGES_API_BASE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    /// Use localhost in dev, the deployed HTTPS host in prod.
    pub api_base: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Directory holding the relay file and registered menus.
    pub store_dir: PathBuf,
    pub autofill_staged_question: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let api = ApiSettings::default();
        Self {
            api_base: api.base_url,
            connect_timeout_secs: api.connect_timeout.as_secs(),
            request_timeout_secs: api.request_timeout.as_secs(),
            store_dir: PathBuf::from(".prompt_pages"),
            autofill_staged_question: false,
        }
    }
}

impl AppConfig {
    pub(crate) fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.api_base.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub(crate) fn popup_options(&self) -> PopupOptions {
        PopupOptions {
            autofill_staged_question: self.autofill_staged_question,
        }
    }
}

/// Reads `prompt_pages.ron` from `dir`, falling back to defaults on any
/// problem, then applies the environment override for the API base.
pub(crate) fn load_config(dir: &Path) -> AppConfig {
    let mut config = read_config_file(&dir.join(CONFIG_FILENAME));
    apply_api_base_override(&mut config, std::env::var(API_BASE_ENV).ok());
    if config.store_dir.is_relative() {
        config.store_dir = dir.join(&config.store_dir);
    }
    config
}

fn read_config_file(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppConfig::default();
        }
        Err(err) => {
            pages_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            pages_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            pages_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}

fn apply_api_base_override(config: &mut AppConfig, value: Option<String>) {
    if let Some(base) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        pages_info!("API base overridden by {}: {}", API_BASE_ENV, base);
        config.api_base = base;
    }
}
