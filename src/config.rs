use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::api::providers::servicedesk::Credentials;
use crate::env_vars;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notes: NotesConfig,
    #[serde(default)]
    pub agents: AgentsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Notes report (helpdesk ticketing API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesConfig {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Company name sent as `Tenant`
    #[serde(default)]
    pub tenant: Option<String>,
    #[serde(default)]
    pub server_url: Option<String>,
    /// Size of the recent-activity window in days (default: 30)
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    /// Tickets per search page (default: 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_notes_output")]
    pub output: String,
}

/// Agent count (RMM asset inventory API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub server_url: Option<String>,
    /// Appended to the server URL as `:{port}`; `None` leaves the URL untouched
    #[serde(default = "default_asset_port")]
    pub port: Option<u16>,
    /// `$top` for each page (default: 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_agents_output")]
    pub output: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_lookback_days() -> u32 {
    30
}

fn default_page_size() -> u32 {
    100
}

fn default_notes_output() -> String {
    "filtered_notes.csv".to_string()
}

fn default_asset_port() -> Option<u16> {
    Some(443)
}

fn default_agents_output() -> String {
    "response.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            tenant: None,
            server_url: None,
            lookback_days: default_lookback_days(),
            page_size: default_page_size(),
            output: default_notes_output(),
        }
    }
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            token: None,
            server_url: None,
            port: default_asset_port(),
            page_size: default_page_size(),
            output: default_agents_output(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Configuration problems detected before any request is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required {pipeline} configuration: {}", .fields.join(", "))]
    MissingFields {
        pipeline: &'static str,
        fields: Vec<String>,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Validated settings for the notes report
#[derive(Debug, Clone)]
pub struct NotesAccess {
    pub server_url: String,
    pub credentials: Credentials,
}

/// Validated settings for the agent count
#[derive(Debug, Clone)]
pub struct AssetAccess {
    pub server_url: String,
    pub token: String,
    pub port: Option<u16>,
}

/// Environment variables that override individual config keys
const LEGACY_OVERRIDES: &[(&str, &str)] = &[
    (env_vars::API_USERNAME, "notes.username"),
    (env_vars::API_PASSWORD, "notes.password"),
    (env_vars::COMPANY_NAME, "notes.tenant"),
    (env_vars::SERVER_URL, "notes.server_url"),
    (env_vars::ASSET_API_TOKEN, "agents.token"),
    (env_vars::ASSET_SERVER_URL, "agents.server_url"),
];

/// Resolve the legacy variables through `lookup`, skipping unset or empty values
fn legacy_overrides(lookup: impl Fn(&str) -> Option<String>) -> Vec<(&'static str, String)> {
    LEGACY_OVERRIDES
        .iter()
        .filter_map(|(var, key)| {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .map(|value| (*key, value))
        })
        .collect()
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn missing_label(var: &str, key: &str) -> String {
    format!("{var} ({key})")
}

impl Config {
    /// Project-local config file, read from the working directory
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("deskreport.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the tool works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // User config in ~/.config/deskreport/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("deskreport").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables: DESKREPORT_<SECTION>__<KEY>
        builder = builder.add_source(
            config::Environment::with_prefix("DESKREPORT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        for (key, value) in legacy_overrides(|var| std::env::var(var).ok()) {
            builder = builder
                .set_override(key, value)
                .with_context(|| format!("Failed to apply override for {key}"))?;
        }

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl NotesConfig {
    /// Validate credentials and paging settings for the notes report
    pub fn access(&self) -> Result<NotesAccess, ConfigError> {
        let username = present(self.username.as_ref());
        let password = present(self.password.as_ref());
        let tenant = present(self.tenant.as_ref());
        let server_url = present(self.server_url.as_ref());

        let mut missing = Vec::new();
        if username.is_none() {
            missing.push(missing_label(env_vars::API_USERNAME, "notes.username"));
        }
        if password.is_none() {
            missing.push(missing_label(env_vars::API_PASSWORD, "notes.password"));
        }
        if tenant.is_none() {
            missing.push(missing_label(env_vars::COMPANY_NAME, "notes.tenant"));
        }
        if server_url.is_none() {
            missing.push(missing_label(env_vars::SERVER_URL, "notes.server_url"));
        }

        match (username, password, tenant, server_url) {
            (Some(username), Some(password), Some(tenant), Some(server_url)) => {
                if self.page_size == 0 {
                    return Err(ConfigError::Invalid(
                        "notes.page_size must be greater than zero".to_string(),
                    ));
                }
                Ok(NotesAccess {
                    server_url: normalize_url(server_url),
                    credentials: Credentials {
                        username: username.to_string(),
                        password: password.to_string(),
                        tenant: tenant.to_string(),
                    },
                })
            }
            _ => Err(ConfigError::MissingFields {
                pipeline: "notes",
                fields: missing,
            }),
        }
    }

    /// Fill absent credentials from `prompt`, which receives a human-readable label
    pub fn fill_missing(
        &mut self,
        mut prompt: impl FnMut(&str) -> std::io::Result<String>,
    ) -> std::io::Result<()> {
        let fields: [(&mut Option<String>, &str); 4] = [
            (&mut self.username, "Enter your API username: "),
            (&mut self.password, "Enter your API password: "),
            (&mut self.tenant, "Enter your Company Name: "),
            (
                &mut self.server_url,
                "Enter your server URL (example: https://api.bms.kaseya.com): ",
            ),
        ];
        for (slot, label) in fields {
            if present(slot.as_ref()).is_none() {
                *slot = Some(prompt(label)?);
            }
        }
        Ok(())
    }
}

impl AgentsConfig {
    /// Validate token and server settings for the agent count
    pub fn access(&self) -> Result<AssetAccess, ConfigError> {
        let token = present(self.token.as_ref());
        let server_url = present(self.server_url.as_ref());

        let mut missing = Vec::new();
        if token.is_none() {
            missing.push(missing_label(env_vars::ASSET_API_TOKEN, "agents.token"));
        }
        if server_url.is_none() {
            missing.push(missing_label(env_vars::ASSET_SERVER_URL, "agents.server_url"));
        }

        match (token, server_url) {
            (Some(token), Some(server_url)) => {
                if self.page_size == 0 {
                    return Err(ConfigError::Invalid(
                        "agents.page_size must be greater than zero".to_string(),
                    ));
                }
                Ok(AssetAccess {
                    server_url: normalize_url(server_url),
                    token: token.to_string(),
                    port: self.port,
                })
            }
            _ => Err(ConfigError::MissingFields {
                pipeline: "agents",
                fields: missing,
            }),
        }
    }

    /// Fill absent token/server URL from `prompt`
    pub fn fill_missing(
        &mut self,
        mut prompt: impl FnMut(&str) -> std::io::Result<String>,
    ) -> std::io::Result<()> {
        let fields: [(&mut Option<String>, &str); 2] = [
            (&mut self.token, "Please enter the API token: "),
            (
                &mut self.server_url,
                "Please enter the server URL (example: https://saas44.kaseya.net): ",
            ),
        ];
        for (slot, label) in fields {
            if present(slot.as_ref()).is_none() {
                *slot = Some(prompt(label)?);
            }
        }
        Ok(())
    }
}
