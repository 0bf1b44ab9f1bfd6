// Copyright 2022 Jeremy Wall (Jeremy@marzhilsltudios.com)
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
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, error, info, instrument};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use client_api::RecipeSummary;
use recipes::Recipe;

use crate::api::HttpStore;
use crate::app_state::{get_state_handler, Handler, Message, StateMachine};
use crate::js_lib::{current_fragment, LocalStorage};
use crate::likes::Like;
use crate::render::{PageButtons, Pager, Pane, Render};
use crate::shopping_list::ShoppingListItem;

pub const DEFAULT_API_ROOT: &str = "https://forkify-api.herokuapp.com/api";

#[wasm_bindgen]
extern "C" {
    /// The page's view. It is handed plain JS objects describing what to show.
    pub type View;

    #[wasm_bindgen(method, js_name = renderLoader)]
    fn render_loader(this: &View, pane: &str);
    #[wasm_bindgen(method, js_name = clearLoader)]
    fn clear_loader(this: &View, pane: &str);
    #[wasm_bindgen(method, js_name = clearResults)]
    fn clear_results(this: &View);
    #[wasm_bindgen(method, js_name = renderResults)]
    fn render_results(this: &View, results: JsValue, buttons: JsValue);
    #[wasm_bindgen(method, js_name = highlightSelected)]
    fn highlight_selected(this: &View, id: &str);
    #[wasm_bindgen(method, js_name = clearRecipe)]
    fn clear_recipe(this: &View);
    #[wasm_bindgen(method, js_name = renderRecipe)]
    fn render_recipe(this: &View, recipe: JsValue, liked: bool);
    #[wasm_bindgen(method, js_name = updateServings)]
    fn update_servings(this: &View, recipe: JsValue);
    #[wasm_bindgen(method, js_name = renderItem)]
    fn render_item(this: &View, item: JsValue);
    #[wasm_bindgen(method, js_name = updateItem)]
    fn update_item(this: &View, item: JsValue);
    #[wasm_bindgen(method, js_name = removeItem)]
    fn remove_item(this: &View, id: &str);
    #[wasm_bindgen(method, js_name = renderListControls)]
    fn render_list_controls(this: &View, len: usize);
    #[wasm_bindgen(method, js_name = renderLike)]
    fn render_like(this: &View, like: JsValue);
    #[wasm_bindgen(method, js_name = removeLike)]
    fn remove_like(this: &View, id: &str);
    #[wasm_bindgen(method, js_name = toggleLikeButton)]
    fn toggle_like_button(this: &View, liked: bool);
    #[wasm_bindgen(method, js_name = toggleLikesMenu)]
    fn toggle_likes_menu(this: &View, visible: bool);
    #[wasm_bindgen(method, js_name = notifyError)]
    fn notify_error(this: &View, message: &str);
}

#[derive(Serialize)]
struct IngredientView {
    count: String,
    unit: &'static str,
    ingredient: String,
}

#[derive(Serialize)]
struct RecipeView<'a> {
    id: &'a str,
    title: &'a str,
    author: &'a str,
    img: &'a str,
    url: &'a str,
    servings: u32,
    time: u32,
    ingredients: Vec<IngredientView>,
}

impl<'a> From<&'a Recipe> for RecipeView<'a> {
    fn from(recipe: &'a Recipe) -> Self {
        Self {
            id: &recipe.id,
            title: &recipe.title,
            author: &recipe.author,
            img: &recipe.img,
            url: &recipe.url,
            servings: recipe.servings,
            time: recipe.time,
            ingredients: recipe
                .ingredients
                .iter()
                .map(|i| IngredientView {
                    count: i.count.map(|c| c.to_string()).unwrap_or_default(),
                    unit: i.unit_str(),
                    ingredient: i.ingredient.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct ButtonsView {
    prev: Option<usize>,
    next: Option<usize>,
}

impl From<PageButtons> for ButtonsView {
    fn from(buttons: PageButtons) -> Self {
        let (prev, next) = match buttons {
            PageButtons::None => (None, None),
            PageButtons::Next(next) => (None, Some(next)),
            PageButtons::Prev(prev) => (Some(prev), None),
            PageButtons::Both { prev, next } => (Some(prev), Some(next)),
        };
        Self { prev, next }
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    match serde_wasm_bindgen::to_value(value) {
        Ok(v) => v,
        Err(err) => {
            error!(?err, "Unable to convert for the view");
            JsValue::NULL
        }
    }
}

fn pane_name(pane: Pane) -> &'static str {
    match pane {
        Pane::Results => "results",
        Pane::Recipe => "recipe",
    }
}

/// Renders by calling into the page's `View` object.
pub struct DomRender(View);

impl Render for DomRender {
    fn render_loader(&self, pane: Pane) {
        self.0.render_loader(pane_name(pane));
    }

    fn clear_loader(&self, pane: Pane) {
        self.0.clear_loader(pane_name(pane));
    }

    fn clear_results(&self) {
        self.0.clear_results();
    }

    fn render_results(&self, results: &[RecipeSummary], page: usize) {
        let pager = Pager::new(results.len());
        let buttons = ButtonsView::from(pager.buttons(page));
        self.0
            .render_results(to_js(pager.page_of(results, page)), to_js(&buttons));
    }

    fn highlight_selected(&self, id: &str) {
        self.0.highlight_selected(id);
    }

    fn clear_recipe(&self) {
        self.0.clear_recipe();
    }

    fn render_recipe(&self, recipe: &Recipe, liked: bool) {
        self.0.render_recipe(to_js(&RecipeView::from(recipe)), liked);
    }

    fn update_servings(&self, recipe: &Recipe) {
        self.0.update_servings(to_js(&RecipeView::from(recipe)));
    }

    fn render_item(&self, item: &ShoppingListItem) {
        self.0.render_item(to_js(item));
    }

    fn update_item(&self, item: &ShoppingListItem) {
        self.0.update_item(to_js(item));
    }

    fn remove_item(&self, id: &str) {
        self.0.remove_item(id);
    }

    fn render_list_controls(&self, len: usize) {
        self.0.render_list_controls(len);
    }

    fn render_like(&self, like: &Like) {
        self.0.render_like(to_js(like));
    }

    fn remove_like(&self, id: &str) {
        self.0.remove_like(id);
    }

    fn toggle_like_button(&self, liked: bool) {
        self.0.toggle_like_button(liked);
    }

    fn toggle_likes_menu(&self, visible: bool) {
        self.0.toggle_likes_menu(visible);
    }

    fn notify_error(&self, message: &str) {
        self.0.notify_error(message);
    }
}

type WebHandler = Handler<StateMachine<HttpStore, LocalStorage, DomRender>>;

fn send(handler: &Rc<WebHandler>, msg: Message) {
    let handler = handler.clone();
    spawn_local(async move {
        handler.dispatch(msg).await;
    });
}

#[instrument(skip_all)]
fn listen_for_navigation(handler: Rc<WebHandler>) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move || {
        let fragment = current_fragment();
        debug!(fragment, "Fragment changed");
        send(&handler, Message::Navigate(fragment));
    }) as Box<dyn FnMut()>);
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("No window present"))?
        .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// The application as seen from the page's scripts. Each method queues one
/// message for the coordinator.
#[wasm_bindgen]
pub struct App {
    handler: Rc<WebHandler>,
}

#[wasm_bindgen]
impl App {
    #[wasm_bindgen(constructor)]
    pub fn new(view: View, api_root: Option<String>) -> Result<App, JsValue> {
        let root = api_root.unwrap_or_else(|| DEFAULT_API_ROOT.to_owned());
        info!(root, "Starting app");
        let storage = LocalStorage::new().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let handler = Rc::new(get_state_handler(
            HttpStore::new(root),
            storage,
            DomRender(view),
        ));
        listen_for_navigation(handler.clone())?;
        Ok(App { handler })
    }

    /// Restore saved state and show the recipe in the current location.
    pub fn start(&self) {
        let handler = self.handler.clone();
        spawn_local(async move {
            handler.dispatch(Message::LoadState).await;
            handler.dispatch(Message::Navigate(current_fragment())).await;
        });
    }

    pub fn search(&self, query: String) {
        send(&self.handler, Message::SubmitSearch(query));
    }

    #[wasm_bindgen(js_name = gotoPage)]
    pub fn goto_page(&self, page: usize) {
        send(&self.handler, Message::GotoPage(page));
    }

    #[wasm_bindgen(js_name = increaseServings)]
    pub fn increase_servings(&self) {
        send(&self.handler, Message::IncreaseServings);
    }

    #[wasm_bindgen(js_name = decreaseServings)]
    pub fn decrease_servings(&self) {
        send(&self.handler, Message::DecreaseServings);
    }

    #[wasm_bindgen(js_name = addRecipeToList)]
    pub fn add_recipe_to_list(&self) {
        send(&self.handler, Message::AddRecipeToList);
    }

    #[wasm_bindgen(js_name = addListItem)]
    pub fn add_list_item(&self, count: Option<f64>, unit: String, ingredient: String) {
        send(
            &self.handler,
            Message::AddListItem {
                count,
                unit,
                ingredient,
            },
        );
    }

    #[wasm_bindgen(js_name = deleteListItem)]
    pub fn delete_list_item(&self, id: String) {
        send(&self.handler, Message::DeleteListItem(id));
    }

    #[wasm_bindgen(js_name = updateListCount)]
    pub fn update_list_count(&self, id: String, count: f64) {
        send(&self.handler, Message::UpdateListCount(id, count));
    }

    #[wasm_bindgen(js_name = clearList)]
    pub fn clear_list(&self) {
        send(&self.handler, Message::ClearList);
    }

    #[wasm_bindgen(js_name = toggleLike)]
    pub fn toggle_like(&self) {
        send(&self.handler, Message::ToggleLike);
    }

    #[wasm_bindgen(js_name = removeLike)]
    pub fn remove_like(&self, id: String) {
        send(&self.handler, Message::RemoveLike(id));
    }

    #[wasm_bindgen(js_name = clearLikes)]
    pub fn clear_likes(&self) {
        send(&self.handler, Message::ClearLikes);
    }
}
