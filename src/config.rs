use anyhow::Result;
use config::{Config as ConfigLoader, File};
use serde::{Deserialize, Deserializer, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::defaults;
use crate::loopback::LOOPBACK_HOSTS;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "defaults::default_cdp_url")]
    pub cdp_url: String,
    #[serde(default = "default_true")]
    pub prime_no_proxy: bool,
    #[serde(default, deserialize_with = "deserialize_entries")]
    pub extra_no_proxy: Option<Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cdp_url: defaults::default_cdp_url(),
            prime_no_proxy: true,
            extra_no_proxy: None,
        }
    }
}

impl AppConfig {
    /// Loopback forms followed by any configured extras.
    pub fn no_proxy_entries(&self) -> Vec<String> {
        let mut entries: Vec<String> = LOOPBACK_HOSTS.iter().map(|host| host.to_string()).collect();
        if let Some(extra) = &self.extra_no_proxy {
            entries.extend(extra.iter().cloned());
        }
        entries
    }
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntriesRepr {
    List(Vec<String>),
    Comma(String),
}

fn deserialize_entries<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<EntriesRepr>::deserialize(deserializer)?;
    Ok(repr.map(|repr| match repr {
        EntriesRepr::List(items) => items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        EntriesRepr::Comma(value) => crate::no_proxy::parse_no_proxy(&value),
    }))
}

pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir =
        dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
    let app_config_dir = config_dir.join("cdpctl-rs");
    fs::create_dir_all(&app_config_dir)?;
    Ok(app_config_dir)
}

pub fn get_config_file() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

pub fn load_config() -> Result<AppConfig> {
    let config_file = get_config_file()?;

    let loader = ConfigLoader::builder()
        .add_source(File::from(config_file).required(false))
        .build()?;

    let config: AppConfig = loader.try_deserialize()?;
    Ok(config)
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    let config_file = get_config_file()?;

    let toml = toml::to_string(config)?;
    fs::write(config_file, toml)?;
    Ok(())
}

pub fn initialize_config() -> Result<()> {
    let config_file = get_config_file()?;

    // Create default config if it doesn't exist
    if !config_file.exists() {
        save_config(&AppConfig::default())?;
    }

    Ok(())
}

/// CDP endpoint, with the environment override taking precedence.
pub fn get_cdp_url() -> Result<String> {
    if let Ok(value) = env::var(defaults::CDP_URL_ENV) {
        if !value.trim().is_empty() {
            return Ok(value.trim().to_string());
        }
    }
    Ok(load_config()?.cdp_url)
}
