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
pub mod parse;
pub mod unit;

use tracing::{debug, warn};

use unit::*;

/// Servings a freshly fetched recipe starts out with.
pub const DEFAULT_SERVINGS: u32 = 4;
/// Minutes of prep time estimated per group of ingredients.
pub const MINUTES_PER_PERIOD: u32 = 15;
/// Ingredients per prep time period.
pub const INGREDIENTS_PER_PERIOD: usize = 3;

/// A single structured line of a recipe's ingredient list. A missing count
/// means the recipe didn't specify one ("salt to taste").
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientLine {
    pub count: Option<Quantity>,
    pub unit: Option<Unit>,
    pub ingredient: String,
}

impl IngredientLine {
    pub fn new<S: Into<String>>(count: Option<Quantity>, unit: Option<Unit>, ingredient: S) -> Self {
        Self {
            count,
            unit,
            ingredient: ingredient.into(),
        }
    }

    /// The count as a plain number. Lines without a count are treated as one
    /// of whatever they are.
    pub fn approx_count(&self) -> f64 {
        self.count.map(|q| q.approx_f64()).unwrap_or(1.0)
    }

    /// The unit as text, empty when there is none.
    pub fn unit_str(&self) -> &'static str {
        self.unit.map(|u| u.as_str()).unwrap_or("")
    }
}

impl std::fmt::Display for IngredientLine {
    fn fmt(&self, w: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::with_capacity(3);
        if let Some(count) = &self.count {
            parts.push(count.to_string());
        }
        if let Some(unit) = &self.unit {
            parts.push(unit.to_string());
        }
        if !self.ingredient.is_empty() {
            parts.push(self.ingredient.clone());
        }
        write!(w, "{}", parts.join(" "))
    }
}

/// Direction for a servings change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Servings {
    Increase,
    Decrease,
}

/// The recipe currently being viewed. It starts out with just an id, gets the
/// fetched details filled in and then has its ingredient lines parsed once.
/// After that only the servings change.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub author: String,
    pub img: String,
    pub url: String,
    pub raw_ingredients: Vec<String>,
    pub ingredients: Vec<IngredientLine>,
    pub servings: u32,
    /// Estimated prep time in minutes.
    pub time: u32,
    // The counts as parsed along with the servings they were parsed for.
    // Scaling always works from these so changes never compound.
    base_counts: Vec<Option<Quantity>>,
    base_servings: u32,
    parsed: bool,
}

impl Recipe {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            author: String::new(),
            img: String::new(),
            url: String::new(),
            raw_ingredients: Vec::new(),
            ingredients: Vec::new(),
            servings: DEFAULT_SERVINGS,
            time: 0,
            base_counts: Vec::new(),
            base_servings: DEFAULT_SERVINGS,
            parsed: false,
        }
    }

    pub fn with_details<S, Iter>(
        mut self,
        title: S,
        author: S,
        img: S,
        url: S,
        raw_ingredients: Iter,
    ) -> Self
    where
        S: Into<String>,
        Iter: IntoIterator<Item = String>,
    {
        self.title = title.into();
        self.author = author.into();
        self.img = img.into();
        self.url = url.into();
        self.raw_ingredients = raw_ingredients.into_iter().collect();
        self
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Parse the raw ingredient lines. This happens once per fetched recipe;
    /// later calls would throw away any scaling so they are ignored.
    pub fn parse_ingredients(&mut self) {
        if self.parsed {
            warn!(id = %self.id, "Ingredients were already parsed");
            return;
        }
        self.ingredients =
            parse::as_ingredient_lines(self.raw_ingredients.iter().map(|s| s.as_str()));
        self.base_counts = self.ingredients.iter().map(|i| i.count).collect();
        self.base_servings = self.servings;
        self.parsed = true;
        debug!(id = %self.id, count = self.ingredients.len(), "Parsed ingredients");
    }

    /// Estimate prep time from the number of ingredients: every started
    /// group of three is fifteen minutes and nothing takes less than fifteen.
    pub fn compute_time(&mut self) -> u32 {
        let periods = ((self.ingredients.len() + INGREDIENTS_PER_PERIOD - 1)
            / INGREDIENTS_PER_PERIOD)
            .max(1);
        self.time = (periods as u32).saturating_mul(MINUTES_PER_PERIOD);
        self.time
    }

    /// Change the servings by one in the given direction and rescale every
    /// counted ingredient. Returns false when nothing changed: decreasing at
    /// a single serving or a change that doesn't fit.
    pub fn update_servings(&mut self, direction: Servings) -> bool {
        let new_servings = match direction {
            Servings::Increase => self.servings.checked_add(1),
            Servings::Decrease if self.servings > 1 => Some(self.servings - 1),
            Servings::Decrease => None,
        };
        let new_servings = match new_servings {
            Some(s) => s,
            None => {
                debug!(id = %self.id, servings = self.servings, ?direction, "Servings unchanged");
                return false;
            }
        };
        let mut scaled = Vec::with_capacity(self.ingredients.len());
        for base in self.base_counts.iter() {
            match base {
                Some(qty) => match qty.scale(new_servings, self.base_servings) {
                    Some(q) => scaled.push(Some(q)),
                    None => {
                        warn!(id = %self.id, new_servings, "Scaled count overflowed");
                        return false;
                    }
                },
                None => scaled.push(None),
            }
        }
        for (line, count) in self.ingredients.iter_mut().zip(scaled) {
            line.count = count;
        }
        self.servings = new_servings;
        true
    }
}
