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
use async_trait::async_trait;
use tracing::{debug, instrument};

use client_api::{RecipeDetail, RecipeSummary};
use recipes::Recipe;

/// Ways a fetch from the recipe service can fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The service was unreachable or answered with a non success status.
    Network(String),
    /// The response body wasn't what we expected.
    Parse(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Network(msg) => write!(f, "network error: {}", msg),
            Error::Parse(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(item: serde_json::Error) -> Self {
        Error::Parse(format!("{}", item))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<gloo_net::Error> for Error {
    fn from(item: gloo_net::Error) -> Self {
        match item {
            gloo_net::Error::SerdeError(e) => Error::Parse(format!("{}", e)),
            err => Error::Network(format!("{}", err)),
        }
    }
}

/// The remote recipe service. Everything runs on a single thread so the
/// futures don't need to be `Send`.
#[async_trait(?Send)]
pub trait RecipeProvider {
    async fn search_recipes(&self, query: &str) -> Result<Vec<RecipeSummary>, Error>;
    async fn get_recipe(&self, id: &str) -> Result<RecipeDetail, Error>;
}

/// Fetch the details for recipe `id`. The returned recipe still needs its
/// ingredients parsed.
#[instrument(skip(provider))]
pub async fn fetch_detail<P>(provider: &P, id: &str) -> Result<Recipe, Error>
where
    P: RecipeProvider + ?Sized,
{
    let detail = provider.get_recipe(id).await?;
    debug!(title = %detail.title, ingredients = detail.ingredients.len(), "Fetched recipe");
    if detail.id != id {
        debug!(requested = id, got = %detail.id, "Provider answered with a different id");
    }
    Ok(Recipe::new(id).with_details(
        detail.title,
        detail.author,
        detail.img,
        detail.url,
        detail.ingredients,
    ))
}

#[cfg(target_arch = "wasm32")]
pub use http::HttpStore;

#[cfg(target_arch = "wasm32")]
mod http {
    use async_trait::async_trait;
    use gloo_net::http::Request;
    use tracing::{debug, error, instrument};

    use client_api::{
        recipe_path, search_path, RecipeDetail, RecipeResponse, RecipeSummary, SearchResponse,
    };

    use super::{Error, RecipeProvider};

    /// The recipe service over http.
    #[derive(Clone, Debug)]
    pub struct HttpStore {
        root: String,
    }

    impl HttpStore {
        pub fn new(root: String) -> Self {
            Self { root }
        }
    }

    #[async_trait(?Send)]
    impl RecipeProvider for HttpStore {
        #[instrument(skip(self))]
        async fn search_recipes(&self, query: &str) -> Result<Vec<RecipeSummary>, Error> {
            let path = search_path(&self.root, query);
            let resp = Request::get(&path).send().await?;
            if !resp.ok() {
                error!(path, status = resp.status(), "Search failed");
                return Err(Error::Network(format!("Status: {}", resp.status())));
            }
            debug!("We got a valid response back!");
            let payload = resp
                .json::<SearchResponse>()
                .await?
                .into_result()
                .map_err(Error::Parse)?;
            Ok(payload.recipes)
        }

        #[instrument(skip(self))]
        async fn get_recipe(&self, id: &str) -> Result<RecipeDetail, Error> {
            let path = recipe_path(&self.root, id);
            let resp = Request::get(&path).send().await?;
            if !resp.ok() {
                error!(path, status = resp.status(), "Recipe fetch failed");
                return Err(Error::Network(format!("Status: {}", resp.status())));
            }
            debug!("We got a valid response back!");
            let payload = resp
                .json::<RecipeResponse>()
                .await?
                .into_result()
                .map_err(Error::Parse)?;
            Ok(payload.recipe)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::ScriptedProvider;
    use futures::executor::block_on;

    #[test]
    fn test_fetch_detail_builds_unparsed_recipe() {
        let provider = ScriptedProvider::new();
        provider.add_recipe(ScriptedProvider::detail("abc123", 6));
        let recipe = block_on(fetch_detail(&provider, "abc123")).expect("recipe should fetch");
        assert_eq!(recipe.id, "abc123");
        assert_eq!(recipe.raw_ingredients.len(), 6);
        assert!(!recipe.is_parsed());
        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn test_fetch_detail_propagates_errors() {
        let provider = ScriptedProvider::new();
        let err = block_on(fetch_detail(&provider, "missing")).unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[test]
    fn test_json_errors_are_parse_errors() {
        let err: Error = serde_json::from_str::<RecipeDetail>("{").unwrap_err().into();
        assert!(matches!(err, Error::Parse(_)));
        assert!(format!("{}", err).starts_with("malformed response"));
    }
}
