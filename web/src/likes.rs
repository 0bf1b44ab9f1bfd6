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
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use recipes::Recipe;

use crate::store::{load_json, save_json, Storage, LIKES_KEY};

/// A bookmarked recipe.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Like {
    pub id: String,
    pub title: String,
    pub author: String,
    pub img: String,
}

impl Like {
    pub fn new<S: Into<String>>(id: S, title: S, author: S, img: S) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            img: img.into(),
        }
    }
}

impl From<&Recipe> for Like {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            author: recipe.author.clone(),
            img: recipe.img.clone(),
        }
    }
}

/// Liked recipes, at most one per recipe id, in the order they were liked.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Likes {
    likes: Vec<Like>,
}

impl Likes {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(skip_all)]
    pub fn restore(storage: &dyn Storage) -> Self {
        let stored: Vec<Like> = load_json(storage, LIKES_KEY).unwrap_or_default();
        let mut seen = BTreeSet::new();
        let mut likes = Vec::with_capacity(stored.len());
        for like in stored {
            if seen.insert(like.id.clone()) {
                likes.push(like);
            } else {
                warn!(id = %like.id, "Dropping duplicate stored like");
            }
        }
        debug!(count = likes.len(), "Restored likes");
        Self { likes }
    }

    fn persist(&self, storage: &dyn Storage) {
        save_json(storage, LIKES_KEY, &self.likes);
    }

    /// Add `like` unless that recipe is already liked, in which case nothing
    /// changes and `None` comes back.
    pub fn add_like(&mut self, storage: &dyn Storage, like: Like) -> Option<&Like> {
        if self.is_liked(&like.id) {
            debug!(id = %like.id, "Recipe is already liked");
            return None;
        }
        self.likes.push(like);
        self.persist(storage);
        self.likes.last()
    }

    pub fn delete_like(&mut self, storage: &dyn Storage, id: &str) -> bool {
        match self.likes.iter().position(|l| l.id == id) {
            Some(idx) => {
                self.likes.remove(idx);
                self.persist(storage);
                true
            }
            None => false,
        }
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.likes.iter().any(|l| l.id == id)
    }

    pub fn count(&self) -> usize {
        self.likes.len()
    }

    pub fn get(&self, id: &str) -> Option<&Like> {
        self.likes.iter().find(|l| l.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Like> {
        self.likes.iter()
    }

    /// Unlike everything, returning what was removed.
    pub fn clear(&mut self, storage: &dyn Storage) -> Vec<Like> {
        if self.likes.is_empty() {
            return Vec::new();
        }
        let removed = std::mem::take(&mut self.likes);
        self.persist(storage);
        removed
    }
}
