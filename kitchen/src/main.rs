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
mod catalog;
mod cli;
mod console;
mod storage;

use std::io::Write;
use std::str::FromStr;

use clap::{crate_authors, crate_version, Arg, ArgMatches, Command};
use tracing::{debug, Level};

use cli::{Error, LikesCommand, ListCommand};

fn create_app() -> Command<'static> {
    Command::new("kitchen")
        .version(crate_version!())
        .author(crate_authors!())
        .about("Recipe search and shopping list CLI")
        .arg(
            Arg::new("verbose")
                .short('v')
                .multiple_occurrences(true)
                .help("Raise the log level. Repeat for more."),
        )
        .arg(
            Arg::new("store")
                .long("store")
                .takes_value(true)
                .default_value("kitchen-store.json")
                .help("File the shopping list and likes are kept in"),
        )
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .takes_value(true)
                .default_value("recipes")
                .help("Directory of <id>.json recipe files"),
        )
        .subcommand(
            Command::new("parse")
                .about("parse a file of ingredient lines and print them normalized")
                .arg(Arg::new("INPUT").required(true).help("Ingredient file, one per line")),
        )
        .subcommand(
            Command::new("search")
                .about("search the catalog for recipes")
                .arg(Arg::new("QUERY").required(true))
                .arg(
                    Arg::new("page")
                        .long("page")
                        .takes_value(true)
                        .default_value("1")
                        .help("Page of results to show"),
                ),
        )
        .subcommand(
            Command::new("recipe")
                .about("show a recipe")
                .arg(Arg::new("ID").required(true))
                .arg(
                    Arg::new("servings")
                        .long("servings")
                        .takes_value(true)
                        .help("Scale the ingredients to this many servings"),
                )
                .arg(
                    Arg::new("add-to-list")
                        .long("add-to-list")
                        .help("Add the ingredients to the shopping list"),
                )
                .arg(Arg::new("like").long("like").help("Like the recipe")),
        )
        .subcommand(
            Command::new("list")
                .about("show or change the shopping list")
                .subcommand(
                    Command::new("add")
                        .about("add an item")
                        .arg(Arg::new("INGREDIENT").required(true))
                        .arg(Arg::new("count").long("count").takes_value(true))
                        .arg(Arg::new("unit").long("unit").takes_value(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("remove an item")
                        .arg(Arg::new("ID").required(true)),
                )
                .subcommand(
                    Command::new("set")
                        .about("change the count of an item")
                        .arg(Arg::new("ID").required(true))
                        .arg(Arg::new("COUNT").required(true)),
                )
                .subcommand(Command::new("clear").about("remove every item")),
        )
        .subcommand(
            Command::new("likes")
                .about("show or change liked recipes")
                .subcommand(
                    Command::new("rm")
                        .about("unlike a recipe")
                        .arg(Arg::new("ID").required(true)),
                )
                .subcommand(Command::new("clear").about("unlike everything")),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
}

fn parse_value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, Error> {
    match matches.value_of(name) {
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| Error::Usage(format!("invalid value for {}: {}", name, v))),
        None => Ok(None),
    }
}

fn required_str(matches: &ArgMatches, name: &str) -> Result<String, Error> {
    matches
        .value_of(name)
        .map(|s| s.to_owned())
        .ok_or_else(|| Error::Usage(format!("missing {}", name)))
}

fn to_command(matches: &ArgMatches) -> Result<Option<cli::Command>, Error> {
    let cmd = match matches.subcommand() {
        Some(("search", matches)) => cli::Command::Search {
            query: required_str(matches, "QUERY")?,
            page: parse_value(matches, "page")?.unwrap_or(1),
        },
        Some(("recipe", matches)) => cli::Command::Recipe {
            id: required_str(matches, "ID")?,
            servings: parse_value(matches, "servings")?,
            add_to_list: matches.is_present("add-to-list"),
            like: matches.is_present("like"),
        },
        Some(("list", matches)) => cli::Command::List(match matches.subcommand() {
            Some(("add", matches)) => ListCommand::Add {
                ingredient: required_str(matches, "INGREDIENT")?,
                count: parse_value(matches, "count")?,
                unit: matches.value_of("unit").unwrap_or("").to_owned(),
            },
            Some(("rm", matches)) => ListCommand::Remove(required_str(matches, "ID")?),
            Some(("set", matches)) => ListCommand::Set(
                required_str(matches, "ID")?,
                parse_value(matches, "COUNT")?
                    .ok_or_else(|| Error::Usage("missing COUNT".to_owned()))?,
            ),
            Some(("clear", _)) => ListCommand::Clear,
            _ => ListCommand::Show,
        }),
        Some(("likes", matches)) => cli::Command::Likes(match matches.subcommand() {
            Some(("rm", matches)) => LikesCommand::Remove(required_str(matches, "ID")?),
            Some(("clear", _)) => LikesCommand::Clear,
            _ => LikesCommand::Show,
        }),
        _ => return Ok(None),
    };
    Ok(Some(cmd))
}

async fn run(matches: ArgMatches) -> Result<(), Error> {
    let mut out = std::io::stdout();
    if let Some(("parse", matches)) = matches.subcommand() {
        let lines = cli::parse_ingredients(required_str(matches, "INPUT")?)?;
        return cli::output_ingredients(&mut out, &lines);
    }
    let cmd = match to_command(&matches)? {
        Some(cmd) => cmd,
        None => return Err(Error::Usage("no command given".to_owned())),
    };
    let store = required_str(&matches, "store")?;
    let catalog = required_str(&matches, "catalog")?;
    debug!(%store, %catalog, "Opening session");
    let session = cli::Session::open(
        catalog::CatalogProvider::new(catalog),
        storage::FileStorage::open(store),
    )
    .await;
    let sections = session.run(cmd).await?;
    session.finish(&mut out, &sections)?;
    out.flush()?;
    Ok(())
}

fn main() {
    let matches = create_app().get_matches();
    let level = match matches.occurrences_of("verbose") {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
    if let Err(err) = async_std::task::block_on(run(matches)) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
pub fn test_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("kitchen-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

#[cfg(test)]
mod test {
    use super::*;

    fn command(args: &[&str]) -> Option<cli::Command> {
        let matches = create_app()
            .try_get_matches_from(args)
            .expect("arguments should parse");
        to_command(&matches).expect("command should convert")
    }

    #[test]
    fn test_app_definition_is_valid() {
        create_app().debug_assert();
    }

    #[test]
    fn test_search_args() {
        assert_eq!(
            command(&["kitchen", "search", "pizza", "--page", "2"]),
            Some(cli::Command::Search {
                query: "pizza".to_owned(),
                page: 2
            })
        );
        assert_eq!(
            command(&["kitchen", "--store", "s.json", "search", "pizza"]),
            Some(cli::Command::Search {
                query: "pizza".to_owned(),
                page: 1
            })
        );
    }

    #[test]
    fn test_recipe_args() {
        assert_eq!(
            command(&["kitchen", "recipe", "abc123", "--servings", "6", "--like"]),
            Some(cli::Command::Recipe {
                id: "abc123".to_owned(),
                servings: Some(6),
                add_to_list: false,
                like: true,
            })
        );
    }

    #[test]
    fn test_list_args() {
        assert_eq!(
            command(&["kitchen", "list"]),
            Some(cli::Command::List(ListCommand::Show))
        );
        assert_eq!(
            command(&["kitchen", "list", "add", "milk", "--count", "2", "--unit", "cup"]),
            Some(cli::Command::List(ListCommand::Add {
                ingredient: "milk".to_owned(),
                count: Some(2.0),
                unit: "cup".to_owned(),
            }))
        );
        assert_eq!(
            command(&["kitchen", "list", "set", "abc", "1.5"]),
            Some(cli::Command::List(ListCommand::Set("abc".to_owned(), 1.5)))
        );
        assert_eq!(
            command(&["kitchen", "likes", "clear"]),
            Some(cli::Command::Likes(LikesCommand::Clear))
        );
    }

    #[test]
    fn test_bad_values_are_usage_errors() {
        let matches = create_app()
            .try_get_matches_from(&["kitchen", "search", "pizza", "--page", "two"])
            .expect("arguments should parse");
        assert!(matches!(to_command(&matches), Err(Error::Usage(_))));
    }
}
