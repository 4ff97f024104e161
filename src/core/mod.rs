mod bot_core;
mod types;

pub use self::bot_core::{Core, CoreAPI, CoreError};
pub use self::types::{Channel, Command, Event, Message, MessageContent, SourceEvent, SourceId};
