use crate::config::BotConfig;
use crate::core::{Channel, Event, Message, MessageContent, SourceEvent, SourceId};
use crate::sources::*;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

/// Author of every line typed into the console
pub const CONSOLE_USER: &str = "console";

/// A source reading messages from the standard input and printing replies
/// to the standard output
pub struct StdinSource {
    id: SourceId,
    nick: String,
    sender: Sender<SourceEvent>,
    handle: Option<JoinHandle<()>>,
}

impl EventSourceBuilder for StdinSource {
    type Source = StdinSource;

    fn build_source(source_id: SourceId, sender: Sender<SourceEvent>, config: &BotConfig) -> Self {
        StdinSource {
            id: source_id,
            nick: config.nick.clone(),
            sender,
            handle: None,
        }
    }
}

/// Forwards stdin lines to the core until EOF
fn read_loop<R: BufRead>(input: R, id: SourceId, sender: Sender<SourceEvent>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                error!("couldn't read from stdin: {}", err);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event = Event::ReceivedMessage(Message {
            author: CONSOLE_USER.to_owned(),
            channel: Channel::None,
            content: MessageContent::Text(line.to_owned()),
        });
        if sender
            .send(SourceEvent {
                source: id.clone(),
                event,
            })
            .is_err()
        {
            // core is gone
            return;
        }
    }
    let _ = sender.send(SourceEvent {
        source: id,
        event: Event::Disconnected,
    });
}

impl EventSource for StdinSource {
    fn connect(&mut self) -> SourceResult<()> {
        if self.handle.is_some() {
            return Ok(());
        }
        let id = self.id.clone();
        let sender = self.sender.clone();
        let handle = thread::Builder::new()
            .name("stdin".to_owned())
            .spawn(move || {
                let stdin = io::stdin();
                read_loop(stdin.lock(), id, sender)
            })?;
        self.handle = Some(handle);
        let _ = self.sender.send(SourceEvent {
            source: self.id.clone(),
            event: Event::Connected,
        });
        Ok(())
    }

    fn send(&mut self, _: Channel, msg: MessageContent) -> SourceResult<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{}", msg.display_with_nick(&self.nick))?;
        out.flush()?;
        Ok(())
    }
}
