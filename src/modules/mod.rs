pub mod eat_drink;

pub use self::eat_drink::EatDrink;
use crate::config::BotConfig;
use crate::core::{CoreAPI, SourceEvent};
use std::collections::HashMap;
use toml::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResumeEventHandling {
    Stop,
    Resume,
}

quick_error! {
    #[derive(Debug)]
    pub enum ModuleError {
        InvalidConfig(id: String, err: toml::de::Error) {
            display("invalid configuration for module {}: {}", id, err)
            cause(err)
        }
        InvalidSetting(id: String, msg: String) {
            display("invalid configuration for module {}: {}", id, msg)
        }
    }
}

pub trait Module {
    fn handle_event(&mut self, core: &mut CoreAPI, event: SourceEvent) -> ResumeEventHandling;

    /// Called once when the core stops
    fn shutdown(&mut self) {}
}

pub type ModuleBuilder =
    fn(String, Option<Value>, &BotConfig) -> Result<Box<dyn Module>, ModuleError>;

/// Builders for every module type a config can refer to
pub fn builders() -> HashMap<String, ModuleBuilder> {
    let mut builders = HashMap::<String, ModuleBuilder>::new();
    builders.insert("EatDrink".to_owned(), EatDrink::create);
    builders
}
