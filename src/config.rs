// SPDX-License-Identifier: MIT
//! Handler configuration
//!
//! Read once at startup from `$XDG_CONFIG_HOME/HelloDevice/HelloDevice.conf`,
//! a key file in the usual `key=value` form:
//!
//! ```ini
//! [General]
//! command=/home/user/bin/device-handler.sh
//! settle_delay_ms=1000
//! max_devices=256
//! ```
//!
//! Only `command` is required. Values may be quoted.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::{Ini, Properties};

use crate::APPID;
use crate::error::{AppError, Result};

/// Overrides the config file location when set
pub const CONFIG_PATH_ENV: &str = "HELLO_DEVICE_CONFIG";

/// Default number of device ids the name cache can hold
pub const DEFAULT_MAX_DEVICES: usize = 256;

const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;

const GENERAL: &str = "General";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Handler program, looked up in `PATH` (which includes the config dir)
    pub command: String,
    /// How long to wait before reporting an added/removed device
    pub settle_delay_ms: u64,
    /// Capacity of the device name cache
    pub max_devices: usize,
}

impl Config {
    /// Load the config from the default location (or `HELLO_DEVICE_CONFIG`)
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => default_path()?,
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Reading config from {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::ConfigMissing {
                    path: path.to_path_buf(),
                }
            } else {
                AppError::ConfigMalformed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        })?;
        Self::parse(&contents).map_err(|reason| AppError::ConfigMalformed {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn parse(contents: &str) -> std::result::Result<Self, String> {
        let file = Ini::load_from_str(contents).map_err(|e| e.to_string())?;
        let general = file
            .section(Some(GENERAL))
            .ok_or_else(|| format!("missing [{GENERAL}] group"))?;

        let command = general.get("command").map(str::trim).unwrap_or_default();
        if command.is_empty() {
            return Err("Failed to load command string.".to_string());
        }

        let settle_delay_ms = number(general, "settle_delay_ms")?.unwrap_or(DEFAULT_SETTLE_DELAY_MS);
        let max_devices = number(general, "max_devices")?.unwrap_or(DEFAULT_MAX_DEVICES);
        if max_devices == 0 {
            return Err("max_devices must be at least 1".to_string());
        }

        Ok(Self {
            command: command.to_string(),
            settle_delay_ms,
            max_devices,
        })
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

fn number<T>(section: &Properties, key: &str) -> std::result::Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    section
        .get(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|e| format!("invalid {key} {value:?}: {e}"))
        })
        .transpose()
}

/// Per-user directory holding the config file and handler scripts
pub fn app_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APPID))
        .ok_or_else(|| AppError::ConfigMissing {
            path: PathBuf::from(APPID),
        })
}

fn default_path() -> Result<PathBuf> {
    Ok(app_config_dir()?.join(format!("{APPID}.conf")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config = Config::parse("[General]\ncommand=/home/user/bin/device-handler.sh\n").unwrap();
        assert_eq!(config.command, "/home/user/bin/device-handler.sh");
        assert_eq!(config.settle_delay(), Duration::from_secs(1));
        assert_eq!(config.max_devices, DEFAULT_MAX_DEVICES);
    }

    #[test]
    fn test_quoted_command() {
        let config = Config::parse("[General]\ncommand = \"notify-device\"\n").unwrap();
        assert_eq!(config.command, "notify-device");
        assert_eq!(config.settle_delay(), Duration::from_secs(1));
        assert_eq!(config.max_devices, DEFAULT_MAX_DEVICES);
    }

    #[test]
    fn test_overrides() {
        let config = Config::parse(
            "# device handler\n[General]\ncommand=x\nsettle_delay_ms=250\nmax_devices=40\n",
        )
        .unwrap();
        assert_eq!(config.settle_delay(), Duration::from_millis(250));
        assert_eq!(config.max_devices, 40);
    }

    #[test]
    fn test_missing_command() {
        assert!(Config::parse("[General]\nsettle_delay_ms=10\n").is_err());
        assert!(Config::parse("[General]\ncommand=\n").is_err());
        assert!(Config::parse("[Other]\ncommand=x\n").is_err());
    }

    #[test]
    fn test_bad_number() {
        assert!(Config::parse("[General]\ncommand=x\nsettle_delay_ms=soon\n").is_err());
        assert!(Config::parse("[General]\ncommand=x\nmax_devices=-1\n").is_err());
    }

    #[test]
    fn test_missing_section() {
        assert!(Config::parse("command=x\n").is_err());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(Config::parse("[General]\ncommand=x\nmax_devices=0\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("hello-device-test-does-not-exist.conf");
        match Config::load_from(&path) {
            Err(AppError::ConfigMissing { path: reported }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("hello-device-test-{}.conf", std::process::id()));
        std::fs::write(&path, "[General]\ncommand=handler.sh\n").unwrap();
        let config = Config::load_from(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(config.unwrap().command, "handler.sh");
    }
}
