use crate::logger::LogConfig;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use toml::Value;

quick_error! {
    #[derive(Debug)]
    pub enum ConfigError {
        NotFound(path: PathBuf) {
            display("config file {} not found", path.display())
        }
        Io(path: PathBuf, err: io::Error) {
            display("couldn't read config file {}: {}", path.display(), err)
            cause(err)
        }
        Parse(err: toml::de::Error) {
            display("invalid config: {}", err)
            from()
            cause(err)
        }
        Invalid(msg: String) {
            display("invalid config: {}", msg)
        }
    }
}

/// A module to load: which builder to use and what to hand it
#[derive(Clone, Debug, Deserialize)]
pub struct ModuleDef {
    pub module_type: String,
    pub config: Option<Value>,
}

fn default_nick() -> String {
    "bot".to_owned()
}

#[derive(Clone, Debug, Deserialize)]
pub struct BotConfig {
    pub command_char: String,
    #[serde(default = "default_nick")]
    pub nick: String,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleDef>,
}

impl Default for BotConfig {
    /// Used when there's no config file: `/` commands and the EatDrink module
    /// with its default settings
    fn default() -> BotConfig {
        let mut modules = BTreeMap::new();
        modules.insert(
            "eat_drink".to_owned(),
            ModuleDef {
                module_type: "EatDrink".to_owned(),
                config: None,
            },
        );
        BotConfig {
            command_char: "/".to_owned(),
            nick: default_nick(),
            log: LogConfig::default(),
            modules,
        }
    }
}

impl BotConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<BotConfig, ConfigError> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(ref err) if err.kind() == ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Err(err) => return Err(ConfigError::Io(path.to_path_buf(), err)),
        };
        BotConfig::parse(&text)
    }

    pub fn parse(text: &str) -> Result<BotConfig, ConfigError> {
        let config: BotConfig = toml::from_str(text)?;
        if config.command_char.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "command_char must not be empty".to_owned(),
            ));
        }
        config.log.level_filter().map_err(|_| {
            ConfigError::Invalid(format!("unknown log level {}", config.log.level))
        })?;
        Ok(config)
    }
}
