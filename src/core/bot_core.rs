use crate::config::BotConfig;
use crate::core::{Event, Message, SourceEvent, SourceId};
use crate::modules::{Module, ModuleBuilder, ModuleError, ResumeEventHandling};
use crate::sources::{EventSource, SourceError, SourceResult};
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};

quick_error! {
    #[derive(Debug)]
    pub enum CoreError {
        UnknownModuleType(id: String, module_type: String) {
            display("module {} has unknown type {}", id, module_type)
        }
        Module(err: ModuleError) {
            display("{}", err)
            from()
            cause(err)
        }
    }
}

/// The part of the core that modules get to use
pub struct CoreAPI {
    sources: HashMap<SourceId, Box<dyn EventSource>>,
}

impl CoreAPI {
    pub fn send(&mut self, source: &SourceId, msg: Message) -> SourceResult<()> {
        match self.sources.get_mut(source) {
            Some(src) => src.send(msg.channel, msg.content),
            None => Err(SourceError::UnknownSource(source.clone())),
        }
    }
}

pub struct Core {
    api: CoreAPI,
    modules: Vec<(String, Box<dyn Module>)>,
    event_tx: Sender<SourceEvent>,
    event_rx: Receiver<SourceEvent>,
}

impl Core {
    /// Builds every module listed in the config, in order of their ids
    pub fn new(
        builders: &HashMap<String, ModuleBuilder>,
        config: &BotConfig,
    ) -> Result<Core, CoreError> {
        let (event_tx, event_rx) = channel();
        let mut modules = Vec::new();
        for (id, def) in &config.modules {
            let builder = builders.get(&def.module_type).ok_or_else(|| {
                CoreError::UnknownModuleType(id.clone(), def.module_type.clone())
            })?;
            let module = builder(id.clone(), def.config.clone(), config)?;
            info!("loaded module {} ({})", id, def.module_type);
            modules.push((id.clone(), module));
        }
        Ok(Core {
            api: CoreAPI {
                sources: HashMap::new(),
            },
            modules,
            event_tx,
            event_rx,
        })
    }

    /// Channel end for sources to send their events to
    pub fn event_sender(&self) -> Sender<SourceEvent> {
        self.event_tx.clone()
    }

    pub fn add_source(&mut self, id: SourceId, source: Box<dyn EventSource>) {
        self.api.sources.insert(id, source);
    }

    pub fn connect_all(&mut self) {
        let mut failed = Vec::new();
        for (id, source) in self.api.sources.iter_mut() {
            if let Err(err) = source.connect() {
                error!("couldn't connect source {}: {}", id.0, err);
                failed.push(id.clone());
            }
        }
        for id in failed {
            self.api.sources.remove(&id);
        }
    }

    /// Processes events until every source has disconnected, then shuts the
    /// modules down.
    pub fn run(&mut self) {
        while !self.api.sources.is_empty() {
            match self.event_rx.recv() {
                Ok(event) => self.handle_event(event),
                Err(_) => break,
            }
        }
        self.shutdown();
    }

    pub fn handle_event(&mut self, event: SourceEvent) {
        let source = event.source.clone();
        let disconnected = match event.event {
            Event::Connected => {
                info!("source {} connected", source.0);
                false
            }
            Event::Disconnected => true,
            Event::ReceivedMessage(_) => false,
        };

        for &mut (ref id, ref mut module) in self.modules.iter_mut() {
            if module.handle_event(&mut self.api, event.clone()) == ResumeEventHandling::Stop {
                debug!("event from {} handled by module {}", source.0, id);
                break;
            }
        }

        if disconnected {
            info!("source {} disconnected", source.0);
            self.api.sources.remove(&source);
        }
    }

    pub fn shutdown(&mut self) {
        for &mut (_, ref mut module) in self.modules.iter_mut() {
            module.shutdown();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::{Channel, MessageContent};
    use crate::modules;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;

    struct MockSource {
        sent: Rc<RefCell<Vec<MessageContent>>>,
    }

    impl EventSource for MockSource {
        fn connect(&mut self) -> SourceResult<()> {
            Ok(())
        }

        fn send(&mut self, _: Channel, msg: MessageContent) -> SourceResult<()> {
            self.sent.borrow_mut().push(msg);
            Ok(())
        }
    }

    fn message(source: &SourceId, txt: &str) -> SourceEvent {
        SourceEvent {
            source: source.clone(),
            event: Event::ReceivedMessage(Message {
                author: "bob".to_owned(),
                channel: Channel::None,
                content: MessageContent::Text(txt.to_owned()),
            }),
        }
    }

    fn config_for(dir: &tempfile::TempDir) -> BotConfig {
        let templates = dir.path().join("templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("food.txt"), "火锅\n").unwrap();
        fs::write(templates.join("drink.txt"), "奶茶\n").unwrap();
        BotConfig::parse(&format!(
            r#"
            command_char = "!"

            [modules.eat]
            module_type = "EatDrink"

            [modules.eat.config]
            data_dir = '{}'
            template_dir = '{}'
            "#,
            dir.path().join("data").display(),
            templates.display()
        ))
        .unwrap()
    }

    #[test]
    fn dispatches_commands_to_modules() {
        let dir = tempfile::tempdir().unwrap();
        let mut core = Core::new(&modules::builders(), &config_for(&dir)).unwrap();
        let sent = Rc::new(RefCell::new(Vec::new()));
        let id = SourceId("mock".to_owned());
        core.add_source(id.clone(), Box::new(MockSource { sent: sent.clone() }));
        core.connect_all();

        core.handle_event(message(&id, "!吃什么"));
        core.handle_event(message(&id, "just chatting"));
        core.handle_event(message(&id, "!推荐 喝"));

        assert_eq!(
            *sent.borrow(),
            vec![
                MessageContent::Text("🍚 推荐你吃：火锅\n（发送 !吃什么 可重新随机）".to_owned()),
                MessageContent::Text("🥤 推荐你喝：奶茶".to_owned()),
            ]
        );
    }

    #[test]
    fn run_stops_when_sources_disconnect() {
        let dir = tempfile::tempdir().unwrap();
        let mut core = Core::new(&modules::builders(), &config_for(&dir)).unwrap();
        let sent = Rc::new(RefCell::new(Vec::new()));
        let id = SourceId("mock".to_owned());
        core.add_source(id.clone(), Box::new(MockSource { sent: sent.clone() }));

        let tx = core.event_sender();
        tx.send(message(&id, "!吃喝什么")).unwrap();
        tx.send(SourceEvent {
            source: id.clone(),
            event: Event::Disconnected,
        })
        .unwrap();
        core.run();

        assert_eq!(sent.borrow().len(), 1);
    }

    #[test]
    fn unknown_module_type() {
        let config = BotConfig::parse(
            r#"
            command_char = "/"
            [modules.x]
            module_type = "Eightball"
            "#,
        )
        .unwrap();
        match Core::new(&modules::builders(), &config) {
            Err(CoreError::UnknownModuleType(id, ty)) => {
                assert_eq!(id, "x");
                assert_eq!(ty, "Eightball");
            }
            Err(err) => panic!("unexpected error: {}", err),
            Ok(_) => panic!("unknown module type was accepted"),
        }
    }

    #[test]
    fn sending_to_unknown_source_fails() {
        let mut api = CoreAPI {
            sources: HashMap::new(),
        };
        let msg = Message {
            author: "".to_owned(),
            channel: Channel::None,
            content: MessageContent::Text("hi".to_owned()),
        };
        assert!(api.send(&SourceId("nowhere".to_owned()), msg).is_err());
    }
}
