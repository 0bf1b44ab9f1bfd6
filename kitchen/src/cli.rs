// Copyright 2021 Jeremy Wall
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use tracing::{debug, instrument};

use kitchen_web::api::RecipeProvider;
use kitchen_web::app_state::{get_state_handler, Handler, Message, StateMachine};
use kitchen_web::store::Storage;
use recipes::{parse, IngredientLine, DEFAULT_SERVINGS};

use crate::console::{ConsoleRender, Section};

/// Largest `--servings` the cli will step a recipe to.
pub const MAX_SERVINGS: u32 = 1000;

#[derive(Debug)]
pub enum Error {
    IO(std::io::Error),
    Usage(String),
    /// The command ran but something it asked for failed.
    Failed(Vec<String>),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IO(err) => write!(f, "{}", err),
            Error::Usage(msg) => write!(f, "{}", msg),
            Error::Failed(msgs) => write!(f, "{}", msgs.join("\n")),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IO(err)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Usage(s)
    }
}

pub fn parse_ingredients<P>(path: P) -> Result<Vec<IngredientLine>, Error>
where
    P: AsRef<Path>,
{
    let mut br = BufReader::new(File::open(path)?);
    let mut buf = Vec::new();
    br.read_to_end(&mut buf)?;
    let i = String::from_utf8_lossy(&buf).to_string();
    Ok(parse::as_ingredient_lines(
        i.lines().filter(|l| !l.trim().is_empty()),
    ))
}

pub fn output_ingredients<W: Write>(out: &mut W, lines: &[IngredientLine]) -> Result<(), Error> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListCommand {
    Show,
    Add {
        ingredient: String,
        count: Option<f64>,
        unit: String,
    },
    Remove(String),
    Set(String, f64),
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LikesCommand {
    Show,
    Remove(String),
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search {
        query: String,
        page: usize,
    },
    Recipe {
        id: String,
        servings: Option<u32>,
        add_to_list: bool,
        like: bool,
    },
    List(ListCommand),
    Likes(LikesCommand),
}

/// One run of the cli against the stored state.
pub struct Session<P, S> {
    handler: Handler<StateMachine<P, S, ConsoleRender>>,
}

impl<P, S> Session<P, S>
where
    P: RecipeProvider,
    S: Storage,
{
    /// Start a session with the list and likes restored from `storage`.
    pub async fn open(provider: P, storage: S) -> Self {
        let handler = get_state_handler(provider, storage, ConsoleRender::new());
        handler.dispatch(Message::LoadState).await;
        Self { handler }
    }

    fn render(&self) -> &ConsoleRender {
        self.handler.mapper().render()
    }

    fn is_liked(&self, id: &str) -> bool {
        self.handler
            .state()
            .likes
            .as_ref()
            .map(|l| l.is_liked(id))
            .unwrap_or(false)
    }

    async fn show_recipe(
        &self,
        id: String,
        servings: Option<u32>,
        add_to_list: bool,
        like: bool,
    ) -> Result<Vec<Section>, Error> {
        match servings {
            Some(0) => return Err(Error::Usage("servings must be at least 1".to_owned())),
            Some(n) if n > MAX_SERVINGS => {
                return Err(Error::Usage(format!(
                    "servings must be at most {}",
                    MAX_SERVINGS
                )))
            }
            _ => (),
        }
        self.handler
            .dispatch(Message::Navigate(format!("#{}", id)))
            .await;
        let loaded = self.handler.state().recipe.is_some();
        if !loaded {
            return Ok(vec![]);
        }
        if let Some(target) = servings {
            let (msg, steps) = if target > DEFAULT_SERVINGS {
                (Message::IncreaseServings, target - DEFAULT_SERVINGS)
            } else {
                (Message::DecreaseServings, DEFAULT_SERVINGS - target)
            };
            for _ in 0..steps {
                self.handler.dispatch(msg.clone()).await;
            }
        }
        let mut sections = vec![Section::Recipe];
        if add_to_list {
            self.handler.dispatch(Message::AddRecipeToList).await;
            sections.push(Section::List);
        }
        if like {
            if !self.is_liked(&id) {
                self.handler.dispatch(Message::ToggleLike).await;
            }
            sections.push(Section::Likes);
        }
        Ok(sections)
    }

    /// Run `cmd` and return the sections of the screen it changed.
    #[instrument(skip(self))]
    pub async fn run(&self, cmd: Command) -> Result<Vec<Section>, Error> {
        let sections = match cmd {
            Command::Search { query, page } => {
                self.handler.dispatch(Message::SubmitSearch(query)).await;
                if page != 1 {
                    self.handler.dispatch(Message::GotoPage(page)).await;
                }
                vec![Section::Results]
            }
            Command::Recipe {
                id,
                servings,
                add_to_list,
                like,
            } => self.show_recipe(id, servings, add_to_list, like).await?,
            Command::List(cmd) => {
                let msg = match cmd {
                    ListCommand::Show => None,
                    ListCommand::Add {
                        ingredient,
                        count,
                        unit,
                    } => Some(Message::AddListItem {
                        count,
                        unit,
                        ingredient,
                    }),
                    ListCommand::Remove(id) => Some(Message::DeleteListItem(id)),
                    ListCommand::Set(id, count) => Some(Message::UpdateListCount(id, count)),
                    ListCommand::Clear => Some(Message::ClearList),
                };
                if let Some(msg) = msg {
                    self.handler.dispatch(msg).await;
                }
                vec![Section::List]
            }
            Command::Likes(cmd) => {
                let msg = match cmd {
                    LikesCommand::Show => None,
                    LikesCommand::Remove(id) => Some(Message::RemoveLike(id)),
                    LikesCommand::Clear => Some(Message::ClearLikes),
                };
                if let Some(msg) = msg {
                    self.handler.dispatch(msg).await;
                }
                vec![Section::Likes]
            }
        };
        debug!(?sections, "Command finished");
        Ok(sections)
    }

    /// Print `sections` to `out`. Any errors the command ran into come back
    /// as `Error::Failed`.
    pub fn finish<W: Write>(&self, out: &mut W, sections: &[Section]) -> Result<(), Error> {
        for section in sections {
            self.render().write_section(out, *section)?;
        }
        let errors = self.render().errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Failed(errors))
        }
    }
}
