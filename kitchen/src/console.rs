// Copyright 2022 Jeremy Wall (jeremy@marzhillstudios.com)
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
use std::cell::RefCell;
use std::io::{self, Write};

use tracing::debug;

use client_api::RecipeSummary;
use kitchen_web::likes::Like;
use kitchen_web::render::{PageButtons, Pager, Pane, Render};
use kitchen_web::shopping_list::ShoppingListItem;
use recipes::Recipe;

/// The parts of the screen a command can print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Results,
    Recipe,
    List,
    Likes,
}

#[derive(Debug, Default)]
struct Screen {
    results: Vec<(String, String)>,
    footer: Option<String>,
    selected: Option<String>,
    recipe: Vec<String>,
    liked: bool,
    list: Vec<(String, String)>,
    likes: Vec<(String, String)>,
    errors: Vec<String>,
}

fn recipe_lines(recipe: &Recipe) -> Vec<String> {
    let mut lines = vec![
        recipe.title.clone(),
        format!("by {}", recipe.author),
        format!("Servings: {}  Time: {} minutes", recipe.servings, recipe.time),
        "Ingredients:".to_owned(),
    ];
    for i in recipe.ingredients.iter() {
        lines.push(format!("  - {}", i));
    }
    lines.push(format!("Source: {}", recipe.url));
    lines
}

fn item_line(item: &ShoppingListItem) -> String {
    let mut parts = vec![item.count.to_string()];
    if !item.unit.is_empty() {
        parts.push(item.unit.clone());
    }
    parts.push(item.ingredient.clone());
    parts.join(" ")
}

fn footer(pager: &Pager, page: usize) -> String {
    let buttons = match pager.buttons(page) {
        PageButtons::None => String::new(),
        PageButtons::Next(next) => format!(" (next: {})", next),
        PageButtons::Prev(prev) => format!(" (prev: {})", prev),
        PageButtons::Both { prev, next } => format!(" (prev: {}, next: {})", prev, next),
    };
    format!(
        "Page {} of {}{}",
        pager.clamp(page),
        pager.page_count(),
        buttons
    )
}

/// Keeps what a screen would be showing so a command can print the parts it
/// cares about once it is done.
#[derive(Debug, Default)]
pub struct ConsoleRender {
    screen: RefCell<Screen>,
}

impl ConsoleRender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.screen.borrow().errors.clone()
    }

    pub fn write_section<W: Write>(&self, out: &mut W, section: Section) -> io::Result<()> {
        let screen = self.screen.borrow();
        match section {
            Section::Results => {
                if screen.results.is_empty() {
                    writeln!(out, "No results.")?;
                }
                for (id, line) in screen.results.iter() {
                    let marker = if screen.selected.as_ref() == Some(id) {
                        "*"
                    } else {
                        " "
                    };
                    writeln!(out, "{} {}\t{}", marker, id, line)?;
                }
                if let Some(footer) = &screen.footer {
                    writeln!(out, "{}", footer)?;
                }
            }
            Section::Recipe => {
                if screen.recipe.is_empty() {
                    writeln!(out, "No recipe.")?;
                    return Ok(());
                }
                for line in screen.recipe.iter() {
                    writeln!(out, "{}", line)?;
                }
                if screen.liked {
                    writeln!(out, "Liked")?;
                }
            }
            Section::List => {
                writeln!(out, "Shopping list ({} items)", screen.list.len())?;
                for (id, line) in screen.list.iter() {
                    writeln!(out, "  {}  {}", id, line)?;
                }
            }
            Section::Likes => {
                writeln!(out, "Likes ({})", screen.likes.len())?;
                for (id, line) in screen.likes.iter() {
                    writeln!(out, "  {}  {}", id, line)?;
                }
            }
        }
        Ok(())
    }
}

impl Render for ConsoleRender {
    fn render_loader(&self, pane: Pane) {
        debug!(?pane, "Loading");
    }

    fn clear_loader(&self, pane: Pane) {
        debug!(?pane, "Done loading");
    }

    fn clear_results(&self) {
        let mut screen = self.screen.borrow_mut();
        screen.results.clear();
        screen.footer = None;
    }

    fn render_results(&self, results: &[RecipeSummary], page: usize) {
        let pager = Pager::new(results.len());
        let mut screen = self.screen.borrow_mut();
        screen.results = pager
            .page_of(results, page)
            .iter()
            .map(|r| (r.id.clone(), format!("{} ({})", r.title, r.author)))
            .collect();
        screen.footer = Some(footer(&pager, page));
    }

    fn highlight_selected(&self, id: &str) {
        self.screen.borrow_mut().selected = Some(id.to_owned());
    }

    fn clear_recipe(&self) {
        self.screen.borrow_mut().recipe.clear();
    }

    fn render_recipe(&self, recipe: &Recipe, liked: bool) {
        let mut screen = self.screen.borrow_mut();
        screen.recipe = recipe_lines(recipe);
        screen.liked = liked;
    }

    fn update_servings(&self, recipe: &Recipe) {
        self.screen.borrow_mut().recipe = recipe_lines(recipe);
    }

    fn render_item(&self, item: &ShoppingListItem) {
        self.screen
            .borrow_mut()
            .list
            .push((item.id.clone(), item_line(item)));
    }

    fn update_item(&self, item: &ShoppingListItem) {
        let mut screen = self.screen.borrow_mut();
        if let Some(entry) = screen.list.iter_mut().find(|(id, _)| id == &item.id) {
            entry.1 = item_line(item);
        }
    }

    fn remove_item(&self, id: &str) {
        self.screen.borrow_mut().list.retain(|(i, _)| i != id);
    }

    fn render_list_controls(&self, len: usize) {
        debug!(len, "List controls");
    }

    fn render_like(&self, like: &Like) {
        self.screen
            .borrow_mut()
            .likes
            .push((like.id.clone(), format!("{} ({})", like.title, like.author)));
    }

    fn remove_like(&self, id: &str) {
        self.screen.borrow_mut().likes.retain(|(i, _)| i != id);
    }

    fn toggle_like_button(&self, liked: bool) {
        self.screen.borrow_mut().liked = liked;
    }

    fn toggle_likes_menu(&self, visible: bool) {
        debug!(visible, "Likes menu");
    }

    fn notify_error(&self, message: &str) {
        self.screen.borrow_mut().errors.push(message.to_owned());
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn section(render: &ConsoleRender, section: Section) -> String {
        let mut out = Vec::new();
        render.write_section(&mut out, section).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn summaries(count: usize) -> Vec<RecipeSummary> {
        (1..=count)
            .map(|i| {
                RecipeSummary::new(
                    format!("r{}", i),
                    format!("Recipe {}", i),
                    "Closet Cooking".to_owned(),
                    String::new(),
                )
            })
            .collect()
    }

    #[test]
    fn test_results_page() {
        let render = ConsoleRender::new();
        assert_eq!(section(&render, Section::Results), "No results.\n");
        render.render_results(&summaries(12), 2);
        render.highlight_selected("r12");
        assert_eq!(
            section(&render, Section::Results),
            "  r11\tRecipe 11 (Closet Cooking)\n\
             * r12\tRecipe 12 (Closet Cooking)\n\
             Page 2 of 2 (prev: 1)\n"
        );
        render.clear_results();
        assert_eq!(section(&render, Section::Results), "No results.\n");
    }

    #[test]
    fn test_list_items() {
        let render = ConsoleRender::new();
        let mut item = ShoppingListItem {
            id: "a".to_owned(),
            count: 4.5,
            unit: "cup".to_owned(),
            ingredient: "flour".to_owned(),
        };
        render.render_item(&item);
        render.render_item(&ShoppingListItem {
            id: "b".to_owned(),
            count: 1.0,
            unit: String::new(),
            ingredient: "salt to taste".to_owned(),
        });
        item.count = 2.0;
        render.update_item(&item);
        assert_eq!(
            section(&render, Section::List),
            "Shopping list (2 items)\n  a  2 cup flour\n  b  1 salt to taste\n"
        );
        render.remove_item("a");
        assert_eq!(
            section(&render, Section::List),
            "Shopping list (1 items)\n  b  1 salt to taste\n"
        );
    }

    #[test]
    fn test_recipe_and_likes() {
        let render = ConsoleRender::new();
        assert_eq!(section(&render, Section::Recipe), "No recipe.\n");
        let mut recipe = Recipe::new("abc123").with_details(
            "Pizza Dip",
            "Closet Cooking",
            "",
            "http://src",
            vec!["2 cups flour".to_owned()],
        );
        recipe.parse_ingredients();
        recipe.compute_time();
        render.render_recipe(&recipe, false);
        render.toggle_like_button(true);
        render.render_like(&Like::from(&recipe));
        assert_eq!(
            section(&render, Section::Recipe),
            "Pizza Dip\nby Closet Cooking\nServings: 4  Time: 15 minutes\n\
             Ingredients:\n  - 2 cup flour\nSource: http://src\nLiked\n"
        );
        assert_eq!(
            section(&render, Section::Likes),
            "Likes (1)\n  abc123  Pizza Dip (Closet Cooking)\n"
        );
        render.notify_error("Error processing recipe!");
        assert_eq!(render.errors(), vec!["Error processing recipe!".to_owned()]);
    }
}
