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
//! Wire types for the recipe search service.
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Either the payload we asked for or the service's `{"error": ...}` body.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Response<T> {
    Success(T),
    Err { error: String },
}

impl<T> Response<T> {
    pub fn error<S: Into<String>>(msg: S) -> Self {
        Self::Err { error: msg.into() }
    }

    pub fn success(payload: T) -> Self {
        Self::Success(payload)
    }

    pub fn as_success(self) -> Option<T> {
        if let Self::Success(val) = self {
            Some(val)
        } else {
            None
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Success(val) => Ok(val),
            Self::Err { error } => Err(error),
        }
    }
}

/// One search hit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecipeSummary {
    #[serde(rename = "recipe_id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "publisher")]
    pub author: String,
    #[serde(rename = "image_url")]
    pub img: String,
}

impl RecipeSummary {
    pub fn new<S: Into<String>>(id: S, title: S, author: S, img: S) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            img: img.into(),
        }
    }
}

/// Full details of a single recipe. Ingredients are free text lines.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecipeDetail {
    #[serde(rename = "recipe_id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "publisher")]
    pub author: String,
    #[serde(rename = "image_url")]
    pub img: String,
    #[serde(rename = "source_url")]
    pub url: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

impl RecipeDetail {
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            img: self.img.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchPayload {
    #[serde(default)]
    pub count: usize,
    pub recipes: Vec<RecipeSummary>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecipePayload {
    pub recipe: RecipeDetail,
}

pub type SearchResponse = Response<SearchPayload>;

pub type RecipeResponse = Response<RecipePayload>;

/// Path of the search endpoint under `root`.
pub fn search_path(root: &str, query: &str) -> String {
    format!(
        "{}/search?q={}",
        root.trim_end_matches('/'),
        utf8_percent_encode(query, NON_ALPHANUMERIC)
    )
}

/// Path of the recipe detail endpoint under `root`.
pub fn recipe_path(root: &str, id: &str) -> String {
    format!(
        "{}/get?rId={}",
        root.trim_end_matches('/'),
        utf8_percent_encode(id, NON_ALPHANUMERIC)
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::from_str;

    #[test]
    fn test_search_response_decodes_service_fields() {
        let body = r#"{"count": 1, "recipes": [{
            "publisher": "Closet Cooking",
            "title": "Pizza Dip",
            "source_url": "http://www.closetcooking.com/pizza-dip",
            "recipe_id": "35477",
            "image_url": "http://forkify-api.herokuapp.com/images/pizza.jpg",
            "social_rank": 99.99
        }]}"#;
        let payload = from_str::<SearchResponse>(body)
            .expect("search body should decode")
            .as_success()
            .expect("search body is a success");
        assert_eq!(payload.count, 1);
        assert_eq!(
            payload.recipes,
            vec![RecipeSummary::new(
                "35477",
                "Pizza Dip",
                "Closet Cooking",
                "http://forkify-api.herokuapp.com/images/pizza.jpg"
            )]
        );
    }

    #[test]
    fn test_recipe_response_decodes_ingredients() {
        let body = r#"{"recipe": {
            "publisher": "Closet Cooking",
            "ingredients": ["4 1/2 cups bread flour", "salt to taste"],
            "source_url": "http://www.closetcooking.com/pizza-dip",
            "recipe_id": "35477",
            "image_url": "http://img/pizza.jpg",
            "title": "Pizza Dip"
        }}"#;
        let recipe = from_str::<RecipeResponse>(body)
            .expect("recipe body should decode")
            .into_result()
            .expect("recipe body is a success")
            .recipe;
        assert_eq!(recipe.id, "35477");
        assert_eq!(recipe.url, "http://www.closetcooking.com/pizza-dip");
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.summary().author, "Closet Cooking");
    }

    #[test]
    fn test_error_body_is_not_a_success() {
        let resp = from_str::<RecipeResponse>(r#"{"error": "Couldn't find recipe"}"#)
            .expect("error body should decode");
        assert_eq!(resp, Response::error("Couldn't find recipe"));
        assert_eq!(resp.into_result(), Err("Couldn't find recipe".to_owned()));
    }

    #[test]
    fn test_paths_are_encoded() {
        assert_eq!(
            search_path("https://example.com/api/", "mac & cheese"),
            "https://example.com/api/search?q=mac%20%26%20cheese"
        );
        assert_eq!(
            recipe_path("https://example.com/api", "abc123"),
            "https://example.com/api/get?rId=abc123"
        );
    }
}
