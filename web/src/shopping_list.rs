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
use uuid::Uuid;

use recipes::unit::Unit;

use crate::store::{load_json, save_json, Storage, LIST_KEY};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ShoppingListItem {
    pub id: String,
    pub count: f64,
    pub unit: String,
    pub ingredient: String,
}

/// Counts that don't make sense on a list become a single item so that
/// things like "salt to taste" still show up.
fn coalesce_count(count: Option<f64>) -> f64 {
    match count {
        Some(c) if c.is_finite() && c > 0.0 => c,
        _ => 1.0,
    }
}

fn canonical_unit(unit: &str) -> String {
    let unit = unit.trim();
    match Unit::parse(unit) {
        Some(u) => u.as_str().to_owned(),
        None => unit.to_owned(),
    }
}

/// The shopping list in display order. Every change is written through to
/// storage as a whole.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShoppingList {
    items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the list saved under `LIST_KEY`. Nothing stored or unreadable
    /// data gives an empty list.
    #[instrument(skip_all)]
    pub fn restore(storage: &dyn Storage) -> Self {
        let stored: Vec<ShoppingListItem> = load_json(storage, LIST_KEY).unwrap_or_default();
        let mut seen = BTreeSet::new();
        let mut items = Vec::with_capacity(stored.len());
        for item in stored {
            if seen.insert(item.id.clone()) {
                items.push(item);
            } else {
                warn!(id = %item.id, "Dropping duplicate stored list item");
            }
        }
        debug!(count = items.len(), "Restored shopping list");
        Self { items }
    }

    fn persist(&self, storage: &dyn Storage) {
        save_json(storage, LIST_KEY, &self.items);
    }

    pub fn add_item(
        &mut self,
        storage: &dyn Storage,
        count: Option<f64>,
        unit: &str,
        ingredient: &str,
    ) -> &ShoppingListItem {
        let item = ShoppingListItem {
            id: Uuid::new_v4().to_string(),
            count: coalesce_count(count),
            unit: canonical_unit(unit),
            ingredient: ingredient.trim().to_owned(),
        };
        debug!(id = %item.id, ingredient = %item.ingredient, "Adding list item");
        self.items.push(item);
        self.persist(storage);
        &self.items[self.items.len() - 1]
    }

    /// Remove the item with `id`. Returns false if there wasn't one.
    pub fn delete_item(&mut self, storage: &dyn Storage, id: &str) -> bool {
        match self.items.iter().position(|i| i.id == id) {
            Some(idx) => {
                self.items.remove(idx);
                self.persist(storage);
                true
            }
            None => {
                debug!(id, "No list item to delete");
                false
            }
        }
    }

    /// Replace the count of the item with `id`. Returns the updated item.
    pub fn update_count(
        &mut self,
        storage: &dyn Storage,
        id: &str,
        count: f64,
    ) -> Option<&ShoppingListItem> {
        if !count.is_finite() {
            warn!(id, count, "Ignoring non-finite count");
            return None;
        }
        let idx = self.items.iter().position(|i| i.id == id)?;
        if self.items[idx].count != count {
            self.items[idx].count = count;
            self.persist(storage);
        }
        Some(&self.items[idx])
    }

    /// Delete every item, returning what was removed.
    pub fn clear(&mut self, storage: &dyn Storage) -> Vec<ShoppingListItem> {
        if self.items.is_empty() {
            return Vec::new();
        }
        let removed = std::mem::take(&mut self.items);
        self.persist(storage);
        removed
    }

    pub fn get(&self, id: &str) -> Option<&ShoppingListItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShoppingListItem> {
        self.items.iter()
    }
}
