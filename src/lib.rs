#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate quick_error;
#[macro_use]
extern crate serde_derive;

pub mod config;
pub mod core;
pub mod logger;
pub mod modules;
pub mod sources;
