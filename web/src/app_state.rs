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
use std::cell::{Cell, Ref, RefCell};

use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};

use recipes::{Recipe, Servings};

use crate::api::{fetch_detail, RecipeProvider};
use crate::likes::{Like, Likes};
use crate::render::{Pane, Render};
use crate::routing::recipe_id_from_fragment;
use crate::search::Search;
use crate::shopping_list::ShoppingList;
use crate::store::Storage;

pub const SEARCH_ERROR: &str = "Something went wrong with the search...";
pub const RECIPE_ERROR: &str = "Error processing recipe!";

/// Every slice of the application. A slice is `None` until something first
/// creates it and is replaced rather than merged afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub search: Option<Search>,
    pub recipe: Option<Recipe>,
    pub list: Option<ShoppingList>,
    pub likes: Option<Likes>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    LoadState,
    SubmitSearch(String),
    GotoPage(usize),
    /// A new location fragment.
    Navigate(String),
    IncreaseServings,
    DecreaseServings,
    AddRecipeToList,
    AddListItem {
        count: Option<f64>,
        unit: String,
        ingredient: String,
    },
    DeleteListItem(String),
    UpdateListCount(String, f64),
    ClearList,
    ToggleLike,
    RemoveLike(String),
    ClearLikes,
}

/// A monotonic request token. Each new fetch takes the next token and a
/// completion only counts if its token is still the latest.
#[derive(Debug, Default)]
pub struct Generation(Cell<u64>);

impl Generation {
    pub fn next(&self) -> u64 {
        let token = self.0.get().wrapping_add(1);
        self.0.set(token);
        token
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.0.get() == token
    }
}

#[async_trait(?Send)]
pub trait MessageMapper<Msg, Val> {
    async fn map(&self, msg: Msg, original: &RefCell<Val>);
}

pub struct StateMachine<P, S, V> {
    provider: P,
    storage: S,
    render: V,
    search_generation: Generation,
    recipe_generation: Generation,
}

impl<P, S, V> StateMachine<P, S, V>
where
    P: RecipeProvider,
    S: Storage,
    V: Render,
{
    pub fn new(provider: P, storage: S, render: V) -> Self {
        Self {
            provider,
            storage,
            render,
            search_generation: Generation::default(),
            recipe_generation: Generation::default(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn render(&self) -> &V {
        &self.render
    }

    fn load_state(&self, original: &RefCell<AppState>) {
        info!("Restoring saved state");
        let likes = Likes::restore(&self.storage);
        for like in likes.iter() {
            self.render.render_like(like);
        }
        self.render.toggle_likes_menu(likes.count() > 0);

        let list = ShoppingList::restore(&self.storage);
        for item in list.iter() {
            self.render.render_item(item);
        }
        self.render.render_list_controls(list.len());

        let mut state = original.borrow_mut();
        state.likes = Some(likes);
        state.list = Some(list);
    }

    async fn submit_search(&self, query: String, original: &RefCell<AppState>) {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring empty search");
            return;
        }
        let token = self.search_generation.next();
        self.render.clear_results();
        self.render.render_loader(Pane::Results);

        let mut search = Search::new(query);
        let result = search.fetch_results(&self.provider).await;
        if !self.search_generation.is_current(token) {
            debug!(query, token, "Discarding stale search");
            return;
        }
        self.render.clear_loader(Pane::Results);
        match result {
            Ok(()) => {
                self.render.render_results(&search.results, 1);
                original.borrow_mut().search = Some(search);
            }
            Err(err) => {
                error!(query, ?err, "Search failed");
                self.render.notify_error(SEARCH_ERROR);
            }
        }
    }

    fn goto_page(&self, page: usize, original: &RefCell<AppState>) {
        let state = original.borrow();
        match &state.search {
            Some(search) => {
                self.render.clear_results();
                self.render.render_results(&search.results, page);
            }
            None => debug!(page, "No search to page through"),
        }
    }

    async fn navigate(&self, fragment: String, original: &RefCell<AppState>) {
        let id = match recipe_id_from_fragment(&fragment) {
            Some(id) => id.to_owned(),
            None => return,
        };
        let token = self.recipe_generation.next();
        let has_search = {
            let mut state = original.borrow_mut();
            state.recipe = None;
            state.search.is_some()
        };
        self.render.clear_recipe();
        self.render.render_loader(Pane::Recipe);
        if has_search {
            self.render.highlight_selected(&id);
        }

        let result = fetch_detail(&self.provider, &id).await;
        if !self.recipe_generation.is_current(token) {
            debug!(id, token, "Discarding stale recipe");
            return;
        }
        self.render.clear_loader(Pane::Recipe);
        match result {
            Ok(mut recipe) => {
                recipe.parse_ingredients();
                recipe.compute_time();
                let mut state = original.borrow_mut();
                let liked = state
                    .likes
                    .as_ref()
                    .map(|l| l.is_liked(&id))
                    .unwrap_or(false);
                self.render.render_recipe(&recipe, liked);
                state.recipe = Some(recipe);
            }
            Err(err) => {
                error!(id, ?err, "Recipe fetch failed");
                self.render.notify_error(RECIPE_ERROR);
            }
        }
    }

    fn update_servings(&self, direction: Servings, original: &RefCell<AppState>) {
        let mut state = original.borrow_mut();
        match state.recipe.as_mut() {
            Some(recipe) => {
                if recipe.update_servings(direction) {
                    self.render.update_servings(recipe);
                }
            }
            None => debug!(?direction, "No recipe to change servings for"),
        }
    }

    fn add_recipe_to_list(&self, original: &RefCell<AppState>) {
        let mut state = original.borrow_mut();
        let AppState { recipe, list, .. } = &mut *state;
        let recipe = match recipe {
            Some(r) => r,
            None => {
                warn!("No recipe to add to the list");
                return;
            }
        };
        let list = list.get_or_insert_with(ShoppingList::new);
        for line in recipe.ingredients.iter() {
            let count = line.count.map(|q| q.approx_f64());
            let item = list.add_item(&self.storage, count, line.unit_str(), &line.ingredient);
            self.render.render_item(item);
        }
        self.render.render_list_controls(list.len());
    }

    fn add_list_item(
        &self,
        count: Option<f64>,
        unit: String,
        ingredient: String,
        original: &RefCell<AppState>,
    ) {
        let mut state = original.borrow_mut();
        let list = state.list.get_or_insert_with(ShoppingList::new);
        if ingredient.trim().is_empty() {
            debug!("Not adding an item without an ingredient");
        } else {
            let item = list.add_item(&self.storage, count, &unit, &ingredient);
            self.render.render_item(item);
        }
        self.render.render_list_controls(list.len());
    }

    fn delete_list_item(&self, id: String, original: &RefCell<AppState>) {
        let mut state = original.borrow_mut();
        if let Some(list) = state.list.as_mut() {
            if list.delete_item(&self.storage, &id) {
                self.render.remove_item(&id);
            }
            self.render.render_list_controls(list.len());
        }
    }

    fn update_list_count(&self, id: String, count: f64, original: &RefCell<AppState>) {
        let mut state = original.borrow_mut();
        if let Some(item) = state
            .list
            .as_mut()
            .and_then(|l| l.update_count(&self.storage, &id, count))
        {
            self.render.update_item(item);
        }
    }

    fn clear_list(&self, original: &RefCell<AppState>) {
        let mut state = original.borrow_mut();
        if let Some(list) = state.list.as_mut() {
            for item in list.clear(&self.storage) {
                self.render.remove_item(&item.id);
            }
            self.render.render_list_controls(list.len());
        }
    }

    fn toggle_like(&self, original: &RefCell<AppState>) {
        let mut state = original.borrow_mut();
        let AppState { recipe, likes, .. } = &mut *state;
        let recipe = match recipe {
            Some(r) => r,
            None => {
                warn!("No recipe to like");
                return;
            }
        };
        let likes = likes.get_or_insert_with(Likes::new);
        if likes.is_liked(&recipe.id) {
            likes.delete_like(&self.storage, &recipe.id);
            self.render.toggle_like_button(false);
            self.render.remove_like(&recipe.id);
        } else if let Some(like) = likes.add_like(&self.storage, Like::from(&*recipe)) {
            self.render.toggle_like_button(true);
            self.render.render_like(like);
        }
        self.render.toggle_likes_menu(likes.count() > 0);
    }

    fn remove_like(&self, id: String, original: &RefCell<AppState>) {
        let mut state = original.borrow_mut();
        let AppState { recipe, likes, .. } = &mut *state;
        if let Some(likes) = likes.as_mut() {
            if likes.delete_like(&self.storage, &id) {
                self.render.remove_like(&id);
                if recipe.as_ref().map(|r| r.id == id).unwrap_or(false) {
                    self.render.toggle_like_button(false);
                }
            }
            self.render.toggle_likes_menu(likes.count() > 0);
        }
    }

    fn clear_likes(&self, original: &RefCell<AppState>) {
        let mut state = original.borrow_mut();
        let AppState { recipe, likes, .. } = &mut *state;
        if let Some(likes) = likes.as_mut() {
            for like in likes.clear(&self.storage) {
                self.render.remove_like(&like.id);
            }
            if recipe.is_some() {
                self.render.toggle_like_button(false);
            }
            self.render.toggle_likes_menu(false);
        }
    }
}

#[async_trait(?Send)]
impl<P, S, V> MessageMapper<Message, AppState> for StateMachine<P, S, V>
where
    P: RecipeProvider,
    S: Storage,
    V: Render,
{
    #[instrument(skip_all, fields(?msg))]
    async fn map(&self, msg: Message, original: &RefCell<AppState>) {
        match msg {
            Message::LoadState => self.load_state(original),
            Message::SubmitSearch(query) => self.submit_search(query, original).await,
            Message::GotoPage(page) => self.goto_page(page, original),
            Message::Navigate(fragment) => self.navigate(fragment, original).await,
            Message::IncreaseServings => self.update_servings(Servings::Increase, original),
            Message::DecreaseServings => self.update_servings(Servings::Decrease, original),
            Message::AddRecipeToList => self.add_recipe_to_list(original),
            Message::AddListItem {
                count,
                unit,
                ingredient,
            } => self.add_list_item(count, unit, ingredient, original),
            Message::DeleteListItem(id) => self.delete_list_item(id, original),
            Message::UpdateListCount(id, count) => self.update_list_count(id, count, original),
            Message::ClearList => self.clear_list(original),
            Message::ToggleLike => self.toggle_like(original),
            Message::RemoveLike(id) => self.remove_like(id, original),
            Message::ClearLikes => self.clear_likes(original),
        }
    }
}

/// Owns the application state and routes every message through its mapper.
/// Dispatches may overlap; each one only borrows the state between awaits.
pub struct Handler<M> {
    state: RefCell<AppState>,
    mapper: M,
}

impl<M> Handler<M>
where
    M: MessageMapper<Message, AppState>,
{
    pub fn new(initial: AppState, mapper: M) -> Self {
        Self {
            state: RefCell::new(initial),
            mapper,
        }
    }

    pub async fn dispatch(&self, msg: Message) {
        self.mapper.map(msg, &self.state).await
    }

    pub fn state(&self) -> Ref<'_, AppState> {
        self.state.borrow()
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    pub fn into_state(self) -> AppState {
        self.state.into_inner()
    }
}

pub fn get_state_handler<P, S, V>(
    provider: P,
    storage: S,
    render: V,
) -> Handler<StateMachine<P, S, V>>
where
    P: RecipeProvider,
    S: Storage,
    V: Render,
{
    Handler::new(AppState::new(), StateMachine::new(provider, storage, render))
}
