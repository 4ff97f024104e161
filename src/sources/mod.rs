use crate::config::BotConfig;
use crate::core::{Channel, MessageContent, SourceEvent, SourceId};
use std::io;
use std::sync::mpsc::Sender;

pub mod stdin;

pub use self::stdin::StdinSource;

quick_error! {
    #[derive(Debug)]
    pub enum SourceError {
        UnknownSource(id: SourceId) {
            display("unknown source {}", id.0)
        }
        Io(err: io::Error) {
            display("I/O error: {}", err)
            from()
            cause(err)
        }
    }
}

pub type SourceResult<T> = Result<T, SourceError>;

pub trait EventSource {
    fn connect(&mut self) -> SourceResult<()>;
    fn send(&mut self, dst: Channel, msg: MessageContent) -> SourceResult<()>;
}

pub trait EventSourceBuilder {
    type Source: EventSource;
    fn build_source(
        source_id: SourceId,
        sender: Sender<SourceEvent>,
        config: &BotConfig,
    ) -> Self::Source;
}
