use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::app_data_dir,
    domain::Role,
    errors::{FinanceError, Result},
    storage::{
        json_backend::{tmp_path, write_atomic},
        StoreKeys, DEFAULT_KEY_PREFIX,
    },
};

const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

/// User preferences for the shell and the store layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub currency: String,
    pub locale: String,
    #[serde(default = "Config::default_key_prefix")]
    pub key_prefix: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub default_role: Role,
    /// Optional custom directory for the store files. Defaults to `<home>/store`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "MXN".into(),
            locale: "es-MX".into(),
            key_prefix: Self::default_key_prefix(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            default_role: Role::User,
            data_root: None,
        }
    }
}

impl Config {
    pub fn default_key_prefix() -> String {
        DEFAULT_KEY_PREFIX.into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn store_keys(&self) -> StoreKeys {
        StoreKeys::with_prefix(&self.key_prefix)
    }

    /// Updates one setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "currency" => self.currency = value.to_uppercase(),
            "locale" => self.locale = value.to_string(),
            "key_prefix" => self.key_prefix = value.to_string(),
            "ui_color_enabled" | "color" => {
                self.ui_color_enabled = parse_flag(value)
                    .ok_or_else(|| FinanceError::InvalidInput(format!("`{value}` is not on/off")))?
            }
            "default_role" => {
                self.default_role = value.parse().map_err(FinanceError::InvalidInput)?
            }
            "data_root" => {
                self.data_root = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            other => {
                return Err(FinanceError::Config(format!(
                    "unknown setting `{other}`"
                )))
            }
        }
        Ok(())
    }

    /// `(key, value)` pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("currency", self.currency.clone()),
            ("locale", self.locale.clone()),
            ("key_prefix", self.key_prefix.clone()),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
            ("default_role", self.default_role.to_string()),
            (
                "data_root",
                self.data_root
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "-".into()),
            ),
        ]
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Loads and saves [`Config`] as `config/config.json` under a base directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        let config_dir = base.join(CONFIG_DIR);
        fs::create_dir_all(&config_dir)?;
        Ok(Self {
            path: config_dir.join(CONFIG_FILE),
            base,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| FinanceError::Config(err.to_string()))
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
