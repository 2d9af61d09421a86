use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::panel::{FirstLoadStrategy, PanelConfig};

pub const CONFIG_FILE: &str = "followpanel.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub api_base_url: String,
    pub page_size: u32,
    pub degrade_delay_ms: u64,
    pub first_load_strategy: FirstLoadStrategy,
    pub sentinel_threshold: usize,
    pub request_timeout_secs: u64,
    pub tick_rate_ms: u64,
    pub log_file: String,
    pub log_level: String,
}

impl Settings {
    /// Loads the layered configuration. `explicit` replaces the user config
    /// file when given on the command line.
    pub fn new(explicit: Option<&Path>) -> Result<Self> {
        let blueprint_path = match std::env::var("CARGO_MANIFEST_DIR") {
            Ok(manifest_dir) => PathBuf::from(manifest_dir).join(CONFIG_FILE),
            // Release builds look next to the working directory.
            Err(_) => PathBuf::from(CONFIG_FILE),
        };

        let user_config_path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = get_user_config_path()?;
                if !path.exists() {
                    seed_user_config(&blueprint_path, &path)?;
                }
                path
            }
        };

        Self::from_sources(&blueprint_path, &user_config_path, Some(Path::new(CONFIG_FILE)))
    }

    pub fn from_sources(blueprint: &Path, user: &Path, local: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("api_base_url", "http://localhost:8080/api")?
            .set_default("page_size", 20)?
            .set_default("degrade_delay_ms", 500)?
            .set_default("first_load_strategy", "always-fetch")?
            .set_default("sentinel_threshold", 2)?
            .set_default("request_timeout_secs", 10)?
            .set_default("tick_rate_ms", 100)?
            .set_default("log_file", "~/.cache/followpanel/followpanel.log")?
            .set_default("log_level", "info")?
            // 1. Project defaults shipped next to the manifest.
            .add_source(File::from(blueprint.to_path_buf()).required(false))
            // 2. The user's global config.
            .add_source(File::from(user.to_path_buf()).required(false));
        // 3. Local override from the working directory.
        if let Some(local) = local {
            builder = builder.add_source(File::from(local.to_path_buf()).required(false));
        }
        // 4. FOLLOWPANEL_PAGE_SIZE=30 and friends.
        builder = builder.add_source(Environment::with_prefix("FOLLOWPANEL"));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("page_size must be greater than zero");
        }
        if self.tick_rate_ms == 0 {
            bail!("tick_rate_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn panel_config(&self) -> PanelConfig {
        PanelConfig {
            page_size: self.page_size,
            degrade_delay: Duration::from_millis(self.degrade_delay_ms),
            first_load_strategy: self.first_load_strategy,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.log_file).into_owned())
    }
}

pub fn get_user_config_path() -> Result<PathBuf> {
    let mut path = dirs::home_dir().context("failed to get home directory")?;
    path.push(".config");
    path.push("followpanel");
    path.push(CONFIG_FILE);
    Ok(path)
}

fn seed_user_config(blueprint: &Path, user: &Path) -> Result<()> {
    let Ok(content) = fs::read_to_string(blueprint) else {
        return Ok(());
    };
    if let Some(parent) = user.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(user, content).with_context(|| format!("writing {}", user.display()))?;
    Ok(())
}

/// Rewrites one key of a TOML config file, keeping the rest.
pub fn save_setting(path: &Path, key: &str, value: toml::Value) -> Result<()> {
    let config_str = fs::read_to_string(path).unwrap_or_default();
    let mut doc = config_str.parse::<toml::Table>()?;
    doc.insert(key.to_string(), value);
    fs::write(path, doc.to_string())?;
    Ok(())
}
