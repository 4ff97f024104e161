use regex::Regex;

lazy_static! {
    static ref WORD_SEPARATOR: Regex = Regex::new(r"\s+").unwrap();
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct SourceId(pub String);

/// Different kinds of communication channels
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Channel {
    /// The source has only one conversation, like the console
    None,
}

/// Content of a message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageContent {
    /// Simple text message
    Text(String),
}

impl MessageContent {
    pub fn display_with_nick(&self, nick: &str) -> String {
        match *self {
            MessageContent::Text(ref txt) => format!("<{}> {}", nick, txt),
        }
    }
}

/// Message content bundled with the author and the source channel
#[derive(Clone, Debug)]
pub struct Message {
    pub author: String,
    pub channel: Channel,
    pub content: MessageContent,
}

/// A message starting with the command character, split into words
#[derive(Clone, Debug)]
pub struct Command {
    pub sender: String,
    pub channel: Channel,
    /// Never empty; the first word is the command name
    params: Vec<String>,
}

impl Command {
    pub fn name(&self) -> &str {
        &self.params[0]
    }

    pub fn args(&self) -> &[String] {
        &self.params[1..]
    }
}

impl Message {
    pub fn parse_command(&self, command_char: &str) -> Option<Command> {
        let txt = match self.content {
            MessageContent::Text(ref txt) => txt.trim(),
        };
        if command_char.is_empty() || !txt.starts_with(command_char) {
            return None;
        }
        let text = txt[command_char.len()..].trim_start();
        if text.is_empty() {
            return None;
        }
        Some(Command {
            sender: self.author.clone(),
            channel: self.channel.clone(),
            params: WORD_SEPARATOR.split(text).map(str::to_owned).collect(),
        })
    }
}

/// Type representing events that can be sent by the sources
#[derive(Clone, Debug)]
pub enum Event {
    Connected,
    Disconnected,
    ReceivedMessage(Message),
}

/// The event bundled with the source ID
#[derive(Clone, Debug)]
pub struct SourceEvent {
    pub source: SourceId,
    pub event: Event,
}
