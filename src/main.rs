#[macro_use]
extern crate log;

use eat_drink_bot::config::{BotConfig, ConfigError};
use eat_drink_bot::core::{Core, SourceId};
use eat_drink_bot::logger::Logger;
use eat_drink_bot::modules;
use eat_drink_bot::sources::{EventSourceBuilder, StdinSource};
use std::env;
use std::error::Error;
use std::process;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn run() -> Result<(), Box<dyn Error>> {
    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_owned());
    let (config, missing) = match BotConfig::load(&config_path) {
        Ok(config) => (config, false),
        Err(ConfigError::NotFound(_)) => (BotConfig::default(), true),
        Err(err) => return Err(err.into()),
    };
    Logger::init(&config.log)?;
    if missing {
        warn!("{} not found, running with the default config", config_path);
    }

    // Create a core object
    let mut core = Core::new(&modules::builders(), &config)?;
    let console = SourceId("console".to_owned());
    let stdin = StdinSource::build_source(console.clone(), core.event_sender(), &config);
    core.add_source(console, Box::new(stdin));
    // Connect all event sources
    core.connect_all();
    // Run the event processing loop
    core.run();
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("eat-drink-bot: {}", err);
        process::exit(1);
    }
}
