// Copyright 2022 Jeremy Wall
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
//! Fakes shared by the unit tests.
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::channel::oneshot;

use client_api::{RecipeDetail, RecipeSummary};
use recipes::Recipe;

use crate::api::{Error, RecipeProvider};
use crate::likes::Like;
use crate::render::{Pager, Pane, Render};
use crate::shopping_list::ShoppingListItem;
use crate::store::{self, MemoryStorage, Storage};

const INGREDIENTS: [&str; 6] = [
    "4 1/2 cups bread flour",
    "2 tsp salt",
    "1 tbsp olive oil",
    "1 1/2 cups water",
    "2 cloves garlic",
    "salt to taste",
];

/// A recipe provider answering from canned data. A gated call waits until
/// the sender returned by `gate_search`/`gate_recipe` fires or is dropped.
#[derive(Default)]
pub struct ScriptedProvider {
    searches: RefCell<BTreeMap<String, Result<Vec<RecipeSummary>, Error>>>,
    recipes: RefCell<BTreeMap<String, Result<RecipeDetail, Error>>>,
    gates: RefCell<BTreeMap<String, oneshot::Receiver<()>>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summaries(prefix: &str, count: usize) -> Vec<RecipeSummary> {
        (1..=count)
            .map(|i| {
                RecipeSummary::new(
                    format!("{}-{}", prefix, i),
                    format!("{} recipe {}", prefix, i),
                    "Closet Cooking".to_owned(),
                    format!("http://img/{}/{}.jpg", prefix, i),
                )
            })
            .collect()
    }

    pub fn detail(id: &str, ingredients: usize) -> RecipeDetail {
        RecipeDetail {
            id: id.to_owned(),
            title: format!("Recipe {}", id),
            author: "Closet Cooking".to_owned(),
            img: format!("http://img/{}.jpg", id),
            url: format!("http://src/{}", id),
            ingredients: INGREDIENTS
                .iter()
                .cycle()
                .take(ingredients)
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn add_search(&self, query: &str, results: Vec<RecipeSummary>) {
        self.searches
            .borrow_mut()
            .insert(query.to_owned(), Ok(results));
    }

    pub fn fail_search(&self, query: &str, err: Error) {
        self.searches.borrow_mut().insert(query.to_owned(), Err(err));
    }

    pub fn add_recipe(&self, detail: RecipeDetail) {
        self.recipes
            .borrow_mut()
            .insert(detail.id.clone(), Ok(detail));
    }

    pub fn fail_recipe(&self, id: &str, err: Error) {
        self.recipes.borrow_mut().insert(id.to_owned(), Err(err));
    }

    pub fn gate_search(&self, query: &str) -> oneshot::Sender<()> {
        self.gate(format!("search:{}", query))
    }

    pub fn gate_recipe(&self, id: &str) -> oneshot::Sender<()> {
        self.gate(format!("get:{}", id))
    }

    fn gate(&self, key: String) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(key, rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    async fn wait(&self, key: String) {
        self.calls.borrow_mut().push(key.clone());
        let gate = self.gates.borrow_mut().remove(&key);
        if let Some(rx) = gate {
            // A dropped sender opens the gate too.
            let _ = rx.await;
        }
    }
}

#[async_trait(?Send)]
impl RecipeProvider for ScriptedProvider {
    async fn search_recipes(&self, query: &str) -> Result<Vec<RecipeSummary>, Error> {
        self.wait(format!("search:{}", query)).await;
        match self.searches.borrow().get(query) {
            Some(result) => result.clone(),
            None => Err(Error::Network(format!("no results scripted for {}", query))),
        }
    }

    async fn get_recipe(&self, id: &str) -> Result<RecipeDetail, Error> {
        self.wait(format!("get:{}", id)).await;
        match self.recipes.borrow().get(id) {
            Some(result) => result.clone(),
            None => Err(Error::Network(format!("no recipe scripted for {}", id))),
        }
    }
}

/// Memory storage that counts writes.
#[derive(Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    writes: Cell<usize>,
}

impl CountingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl Storage for CountingStorage {
    fn get(&self, key: &str) -> Result<Option<String>, store::Error> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), store::Error> {
        self.writes.set(self.writes.get() + 1);
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), store::Error> {
        self.writes.set(self.writes.get() + 1);
        self.inner.remove(key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Loader(Pane),
    ClearLoader(Pane),
    ClearResults,
    /// The ids shown and the page that was asked for.
    Results(Vec<String>, usize),
    Highlight(String),
    ClearRecipe,
    Recipe { id: String, liked: bool },
    Servings(u32),
    Item(String),
    UpdateItem(String, f64),
    RemoveItem(String),
    ListControls(usize),
    Like(String),
    RemoveLike(String),
    LikeButton(bool),
    LikesMenu(bool),
    Error(String),
}

/// A renderer that writes down every call it gets.
#[derive(Default)]
pub struct RecordingRender {
    events: RefCell<Vec<Event>>,
}

impl RecordingRender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Return and forget the events so far.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn errors(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Error(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl Render for RecordingRender {
    fn render_loader(&self, pane: Pane) {
        self.push(Event::Loader(pane));
    }

    fn clear_loader(&self, pane: Pane) {
        self.push(Event::ClearLoader(pane));
    }

    fn clear_results(&self) {
        self.push(Event::ClearResults);
    }

    fn render_results(&self, results: &[RecipeSummary], page: usize) {
        let shown = Pager::new(results.len())
            .page_of(results, page)
            .iter()
            .map(|r| r.id.clone())
            .collect();
        self.push(Event::Results(shown, page));
    }

    fn highlight_selected(&self, id: &str) {
        self.push(Event::Highlight(id.to_owned()));
    }

    fn clear_recipe(&self) {
        self.push(Event::ClearRecipe);
    }

    fn render_recipe(&self, recipe: &Recipe, liked: bool) {
        self.push(Event::Recipe {
            id: recipe.id.clone(),
            liked,
        });
    }

    fn update_servings(&self, recipe: &Recipe) {
        self.push(Event::Servings(recipe.servings));
    }

    fn render_item(&self, item: &ShoppingListItem) {
        self.push(Event::Item(item.ingredient.clone()));
    }

    fn update_item(&self, item: &ShoppingListItem) {
        self.push(Event::UpdateItem(item.id.clone(), item.count));
    }

    fn remove_item(&self, id: &str) {
        self.push(Event::RemoveItem(id.to_owned()));
    }

    fn render_list_controls(&self, len: usize) {
        self.push(Event::ListControls(len));
    }

    fn render_like(&self, like: &Like) {
        self.push(Event::Like(like.id.clone()));
    }

    fn remove_like(&self, id: &str) {
        self.push(Event::RemoveLike(id.to_owned()));
    }

    fn toggle_like_button(&self, liked: bool) {
        self.push(Event::LikeButton(liked));
    }

    fn toggle_likes_menu(&self, visible: bool) {
        self.push(Event::LikesMenu(visible));
    }

    fn notify_error(&self, message: &str) {
        self.push(Event::Error(message.to_owned()));
    }
}
