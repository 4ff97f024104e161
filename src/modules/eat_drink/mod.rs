pub mod store;
pub mod suggest;

use self::store::{to_list, Category, DefaultSet, ListStore, DEFAULT_DRINK, DEFAULT_FOOD};
use self::suggest::{PickError, Suggester};
use crate::config::BotConfig;
use crate::core::{Command, CoreAPI, Event, Message, MessageContent, SourceEvent};
use crate::modules::{Module, ModuleError, ResumeEventHandling};
use rand::{thread_rng, Rng};
use std::path::PathBuf;
use toml::Value;

fn names(names: &[&str]) -> Vec<String> {
    to_list(names)
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
struct CommandNames {
    food: Vec<String>,
    drink: Vec<String>,
    combo: Vec<String>,
    recommend: Vec<String>,
}

impl Default for CommandNames {
    fn default() -> CommandNames {
        CommandNames {
            food: names(&["吃什么", "推荐吃的", "随机吃"]),
            drink: names(&["喝什么", "推荐喝的", "随机喝"]),
            combo: names(&["吃喝什么", "推荐搭配", "随机套餐"]),
            recommend: names(&["推荐"]),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
struct EatDrinkConfig {
    data_dir: PathBuf,
    template_dir: PathBuf,
    default_food: Option<Vec<String>>,
    default_drink: Option<Vec<String>>,
    commands: CommandNames,
}

impl EatDrinkConfig {
    /// An empty default list would leave nothing to suggest and no file to edit
    fn check(&self) -> Result<(), String> {
        let lists = [
            ("default_food", &self.default_food),
            ("default_drink", &self.default_drink),
        ];
        for &(key, list) in lists.iter() {
            if list.as_ref().map_or(false, |list| list.is_empty()) {
                return Err(format!("{} must not be empty", key));
            }
        }
        Ok(())
    }
}

impl Default for EatDrinkConfig {
    fn default() -> EatDrinkConfig {
        EatDrinkConfig {
            data_dir: PathBuf::from("data/eat_drink"),
            template_dir: PathBuf::from("templates"),
            default_food: None,
            default_drink: None,
            commands: CommandNames::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Request {
    Pick(Category),
    Combo,
}

impl Request {
    fn from_kind(kind: &str) -> Option<Request> {
        match kind {
            "吃的" | "吃" | "美食" => Some(Request::Pick(Category::Food)),
            "喝的" | "喝" | "饮品" => Some(Request::Pick(Category::Drink)),
            "搭配" | "套餐" | "都要" => Some(Request::Combo),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Reply {
    /// A suggestion; `again` is the command to repeat it with, if it's worth mentioning
    Suggest {
        request: Request,
        again: Option<String>,
    },
    BadFormat {
        command: String,
    },
}

fn pick_line(category: Category, entry: &str) -> String {
    match category {
        Category::Food => format!("🍚 推荐你吃：{}", entry),
        Category::Drink => format!("🥤 推荐你喝：{}", entry),
    }
}

/// Answers "what should I eat/drink" commands with a random pick
pub struct EatDrink {
    module_id: String,
    command_char: String,
    commands: CommandNames,
    store: ListStore,
    suggester: Suggester,
}

impl EatDrink {
    pub fn create(
        id: String,
        config: Option<Value>,
        bot_config: &BotConfig,
    ) -> Result<Box<dyn Module>, ModuleError> {
        let config: EatDrinkConfig = match config {
            Some(value) => value
                .try_into()
                .map_err(|err| ModuleError::InvalidConfig(id.clone(), err))?,
            None => EatDrinkConfig::default(),
        };
        config
            .check()
            .map_err(|msg| ModuleError::InvalidSetting(id.clone(), msg))?;
        Ok(Box::new(EatDrink::new(id, config, &bot_config.command_char)))
    }

    fn new(module_id: String, config: EatDrinkConfig, command_char: &str) -> EatDrink {
        let defaults = DefaultSet::new(
            config.default_food.unwrap_or_else(|| to_list(DEFAULT_FOOD)),
            config.default_drink.unwrap_or_else(|| to_list(DEFAULT_DRINK)),
        );
        let store = ListStore::new(config.data_dir, config.template_dir, defaults);
        let suggester = Suggester::from_store(&store);
        info!(
            "module {} ready with {} foods and {} drinks",
            module_id,
            suggester.list(Category::Food).len(),
            suggester.list(Category::Drink).len()
        );
        EatDrink {
            module_id,
            command_char: command_char.to_owned(),
            commands: config.commands,
            store,
            suggester,
        }
    }

    fn classify(&self, command: &Command) -> Option<Reply> {
        let name = command.name();
        let is = |names: &[String]| names.iter().any(|n| n == name);
        let again = Some(name.to_owned());

        if is(&self.commands.food) {
            Some(Reply::Suggest {
                request: Request::Pick(Category::Food),
                again,
            })
        } else if is(&self.commands.drink) {
            Some(Reply::Suggest {
                request: Request::Pick(Category::Drink),
                again,
            })
        } else if is(&self.commands.combo) {
            Some(Reply::Suggest {
                request: Request::Combo,
                again,
            })
        } else if is(&self.commands.recommend) {
            let request = command
                .args()
                .first()
                .and_then(|kind| Request::from_kind(kind));
            Some(match request {
                Some(request) => Reply::Suggest {
                    request,
                    again: None,
                },
                None => Reply::BadFormat {
                    command: name.to_owned(),
                },
            })
        } else {
            None
        }
    }

    fn suggest<R: Rng + ?Sized>(
        &self,
        request: Request,
        sender: &str,
        rng: &mut R,
    ) -> Result<String, PickError> {
        match request {
            Request::Pick(category) => {
                let entry = self.suggester.pick_with(category, rng)?;
                info!("suggested {} {} to {}", category.name(), entry, sender);
                Ok(pick_line(category, entry))
            }
            Request::Combo => {
                let (food, drink) = self.suggester.pick_combo_with(rng)?;
                info!("suggested combo {} + {} to {}", food, drink, sender);
                Ok(format!("🍽️ 推荐搭配：{} + {}", food, drink))
            }
        }
    }

    /// Builds the reply to `command`, or `None` if the command isn't ours
    fn respond_with<R: Rng + ?Sized>(&self, command: &Command, rng: &mut R) -> Option<String> {
        let cc = &self.command_char;
        let response = match self.classify(command)? {
            Reply::Suggest { request, again } => match self.suggest(request, &command.sender, rng) {
                Ok(text) => match again {
                    Some(again) => format!("{}\n（发送 {}{} 可重新随机）", text, cc, again),
                    None => text,
                },
                Err(PickError::EmptyList(category)) => {
                    let path = self.store.backing_path(category);
                    warn!(
                        "{} asked for {}, but the list is empty",
                        command.sender,
                        category.name()
                    );
                    format!(
                        "❌ 还没有配置任何{}选项，请编辑 {} 后重启",
                        category.label(),
                        path.display()
                    )
                }
            },
            Reply::BadFormat { command: name } => format!(
                "❌ 格式错误！请输入：\n{cc}{n} 吃的\n或\n{cc}{n} 喝的\n或\n{cc}{n} 搭配",
                cc = cc,
                n = name
            ),
        };
        Some(response)
    }
}

impl Module for EatDrink {
    fn handle_event(&mut self, core: &mut CoreAPI, event: SourceEvent) -> ResumeEventHandling {
        let SourceEvent { source, event } = event;
        let msg = match event {
            Event::ReceivedMessage(msg) => msg,
            _ => return ResumeEventHandling::Resume,
        };
        let command = match msg.parse_command(&self.command_char) {
            Some(command) => command,
            // ignore non-commands
            None => return ResumeEventHandling::Resume,
        };
        let response = match self.respond_with(&command, &mut thread_rng()) {
            Some(response) => response,
            None => return ResumeEventHandling::Resume,
        };
        let reply = Message {
            author: "".to_owned(),
            channel: command.channel,
            content: MessageContent::Text(response),
        };
        if let Err(err) = core.send(&source, reply) {
            error!("module {} couldn't send a reply: {}", self.module_id, err);
        }
        ResumeEventHandling::Stop
    }

    fn shutdown(&mut self) {
        info!("module {} unloaded", self.module_id);
    }
}
