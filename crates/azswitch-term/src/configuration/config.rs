#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;
use std::time::Duration;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use strum::EnumIter;
use strum::IntoEnumIterator;
use tokio::fs;

use crate::domain::services::ActionTimeouts;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, EnumIter, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ConfigFile,
    AzPath,
    CommandTimeout,
    LoginTimeout,
    TickRate,
    NoColor,
    LogLevel,
    LogFile,
}

impl ConfigKey {
    /// Id of the matching command line argument.
    pub fn arg_id(self) -> String {
        return self.to_string().replace('-', "_");
    }
}

/// Settings resolved once at startup from defaults, the config file and the
/// command line, in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub config_file: path::PathBuf,
    pub az_path: String,
    pub command_timeout: Duration,
    pub login_timeout: Duration,
    pub tick_rate: Duration,
    pub no_color: bool,
    pub log_level: String,
    pub log_file: path::PathBuf,
}

impl Default for Config {
    fn default() -> Config {
        return Config {
            config_file: Config::default_path(),
            az_path: "az".to_string(),
            command_timeout: Duration::from_secs(60),
            login_timeout: Duration::from_secs(300),
            tick_rate: Duration::from_millis(100),
            no_color: false,
            log_level: "info".to_string(),
            log_file: Config::default_log_file(),
        };
    }
}

impl Config {
    pub fn default_path() -> path::PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| path::PathBuf::from("."));
        return base.join("azswitch").join("config.toml");
    }

    pub fn default_log_file() -> path::PathBuf {
        let base = dirs::cache_dir().unwrap_or_else(env::temp_dir);
        return base.join("azswitch").join("azswitch.log");
    }

    pub fn get(&self, key: ConfigKey) -> String {
        return match key {
            ConfigKey::ConfigFile => self.config_file.display().to_string(),
            ConfigKey::AzPath => self.az_path.to_string(),
            ConfigKey::CommandTimeout => self.command_timeout.as_secs().to_string(),
            ConfigKey::LoginTimeout => self.login_timeout.as_secs().to_string(),
            ConfigKey::TickRate => self.tick_rate.as_millis().to_string(),
            ConfigKey::NoColor => self.no_color.to_string(),
            ConfigKey::LogLevel => self.log_level.to_string(),
            ConfigKey::LogFile => self.log_file.display().to_string(),
        };
    }

    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        match key {
            ConfigKey::ConfigFile => self.config_file = path::PathBuf::from(value),
            ConfigKey::AzPath => self.az_path = value.to_string(),
            ConfigKey::CommandTimeout => {
                self.command_timeout = Duration::from_secs(parse_positive(key, value)?)
            }
            ConfigKey::LoginTimeout => {
                self.login_timeout = Duration::from_secs(parse_positive(key, value)?)
            }
            ConfigKey::TickRate => self.tick_rate = Duration::from_millis(parse_positive(key, value)?),
            ConfigKey::NoColor => {
                self.no_color = value
                    .parse::<bool>()
                    .with_context(|| format!("invalid value for key '{key}': {value}"))?
            }
            ConfigKey::LogLevel => self.log_level = value.to_string(),
            ConfigKey::LogFile => self.log_file = path::PathBuf::from(value),
        }

        return Ok(());
    }

    pub fn action_timeouts(&self) -> ActionTimeouts {
        return ActionTimeouts {
            command: self.command_timeout,
            login: self.login_timeout,
        };
    }

    /// Applies the keys found in a config file. Unknown keys are ignored.
    pub fn merge_toml(&mut self, toml_str: &str) -> Result<()> {
        let doc = toml_str
            .parse::<toml_edit::Document>()
            .context("config file is not valid TOML")?;

        for key in ConfigKey::iter() {
            if key == ConfigKey::ConfigFile {
                continue;
            }
            let Some(item) = doc.get(&key.to_string()) else {
                continue;
            };

            let val = if let Some(val_int) = item.as_integer() {
                val_int.to_string()
            } else if let Some(val_bool) = item.as_bool() {
                val_bool.to_string()
            } else if let Some(val_str) = item.as_str() {
                if val_str.is_empty() {
                    continue;
                }
                val_str.to_string()
            } else {
                bail!("config.toml has an invalid value for key '{key}'");
            };

            self.set(key, &val)
                .with_context(|| format!("config.toml has an invalid value for key '{key}'"))?;
        }

        return Ok(());
    }

    fn merge_args(&mut self, matches: &ArgMatches) -> Result<()> {
        for key in ConfigKey::iter() {
            if let Some(val) = arg_value(matches, key) {
                self.set(key, &val)?;
            }
        }

        return Ok(());
    }

    pub async fn load(matches: &ArgMatches) -> Result<Config> {
        let mut config = Config::default();

        if let Some(config_file) = arg_value(matches, ConfigKey::ConfigFile) {
            config.set(ConfigKey::ConfigFile, &config_file)?;
        }

        if config.config_file.exists() {
            let toml_str = fs::read_to_string(&config.config_file)
                .await
                .with_context(|| format!("failed to read {}", config.config_file.display()))?;
            config.merge_toml(&toml_str)?;
        }

        config.merge_args(matches)?;

        if env::var_os("NO_COLOR").is_some_and(|e| !e.is_empty()) {
            config.no_color = true;
        }

        tracing::debug!(
            config_file = %config.config_file.display(),
            az_path = %config.az_path,
            command_timeout = config.command_timeout.as_secs(),
            login_timeout = config.login_timeout.as_secs(),
            no_color = config.no_color,
            "config"
        );

        return Ok(config);
    }

    /// A commented config file holding every default.
    pub fn serialize_default(cmd: &Command) -> String {
        let defaults = Config::default();

        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let name = key.to_string();
                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(name.as_str()))?;

                let description = arg
                    .get_help()
                    .map(|e| return e.to_string())
                    .unwrap_or_default();

                let val = match key {
                    ConfigKey::CommandTimeout => {
                        toml_edit::Value::from(defaults.command_timeout.as_secs() as i64)
                    }
                    ConfigKey::LoginTimeout => {
                        toml_edit::Value::from(defaults.login_timeout.as_secs() as i64)
                    }
                    ConfigKey::TickRate => {
                        toml_edit::Value::from(defaults.tick_rate.as_millis() as i64)
                    }
                    ConfigKey::NoColor => toml_edit::Value::from(defaults.no_color),
                    _ => toml_edit::Value::from(defaults.get(key)),
                };

                return Some(format!(
                    "# {description}\n{name} = {}",
                    val.to_string().trim()
                ));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}

fn parse_positive(key: ConfigKey, value: &str) -> Result<u64> {
    let Ok(num) = value.trim().parse::<u64>() else {
        bail!("invalid value for key '{key}': {value}");
    };
    if num == 0 {
        bail!("invalid value for key '{key}': must be greater than zero");
    }

    return Ok(num);
}

fn arg_value(matches: &ArgMatches, key: ConfigKey) -> Option<String> {
    let id = key.arg_id();
    if let Ok(Some(val)) = matches.try_get_one::<String>(&id) {
        if val.is_empty() {
            return None;
        }
        return Some(val.to_string());
    }
    if let Ok(Some(val)) = matches.try_get_one::<u64>(&id) {
        return Some(val.to_string());
    }
    if let Ok(Some(true)) = matches.try_get_one::<bool>(&id) {
        return Some("true".to_string());
    }

    return None;
}
