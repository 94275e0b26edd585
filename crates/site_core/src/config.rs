use std::{collections::HashMap, fs, path::Path};

use content_client::{ContentServiceConfig, DEFAULT_BASE_URL};
use thiserror::Error;
use url::Url;

pub const SETTINGS_FILE: &str = "site.toml";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub content_base_url: String,
    pub content_api_token: Option<String>,
    pub site_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            content_base_url: DEFAULT_BASE_URL.into(),
            content_api_token: None,
            site_url: DEFAULT_SITE_URL.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{setting} '{value}' is not a valid URL: {source}")]
    InvalidUrl {
        setting: &'static str,
        value: String,
        source: url::ParseError,
    },
    #[error("{setting} '{value}' must use http or https")]
    UnsupportedScheme { setting: &'static str, value: String },
}

impl Settings {
    /// Client configuration for the content service, with the base URL checked.
    pub fn content_service_config(&self) -> Result<ContentServiceConfig, ConfigError> {
        let base_url = validate_base_url("content_base_url", &self.content_base_url)?;
        Ok(ContentServiceConfig::new(
            base_url,
            self.content_api_token.clone(),
        ))
    }

    pub fn validated_site_url(&self) -> Result<String, ConfigError> {
        validate_base_url("site_url", &self.site_url)
    }
}

fn validate_base_url(setting: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|source| ConfigError::InvalidUrl {
        setting,
        value: raw.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme {
            setting,
            value: raw.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Defaults, then `site.toml` in the working directory, then the environment.
pub fn load_settings() -> Settings {
    load_settings_with(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_with(
    settings_file: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(settings_file) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, env);

    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        return;
    };
    if let Some(v) = file_cfg.get("content_base_url") {
        settings.content_base_url = v.clone();
    }
    if let Some(v) = file_cfg.get("content_api_token") {
        settings.content_api_token = non_blank(v);
    }
    if let Some(v) = file_cfg.get("site_url") {
        settings.site_url = v.clone();
    }
}

fn apply_env(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("CONTENT_SERVICE_URL") {
        settings.content_base_url = v;
    }
    if let Some(v) = env("APP__CONTENT_SERVICE_URL") {
        settings.content_base_url = v;
    }

    if let Some(v) = env("CONTENT_SERVICE_TOKEN") {
        settings.content_api_token = non_blank(&v);
    }
    if let Some(v) = env("APP__CONTENT_SERVICE_TOKEN") {
        settings.content_api_token = non_blank(&v);
    }

    if let Some(v) = env("SITE_URL") {
        settings.site_url = v;
    }
    if let Some(v) = env("APP__SITE_URL") {
        settings.site_url = v;
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
