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
use std::ops::Range;

use client_api::RecipeSummary;
use recipes::Recipe;

use crate::likes::Like;
use crate::shopping_list::ShoppingListItem;

pub const RESULTS_PER_PAGE: usize = 10;

/// The parts of the view that show a loading indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Results,
    Recipe,
}

/// Everything the coordinator asks of the view. Each call mirrors the
/// current state of one slice and should be safe to repeat.
pub trait Render {
    fn render_loader(&self, pane: Pane);
    fn clear_loader(&self, pane: Pane);

    fn clear_results(&self);
    /// Show page `page` of `results`. Use a `Pager` to pick the slice.
    fn render_results(&self, results: &[RecipeSummary], page: usize);
    fn highlight_selected(&self, id: &str);

    fn clear_recipe(&self);
    fn render_recipe(&self, recipe: &Recipe, liked: bool);
    fn update_servings(&self, recipe: &Recipe);

    fn render_item(&self, item: &ShoppingListItem);
    fn update_item(&self, item: &ShoppingListItem);
    fn remove_item(&self, id: &str);
    fn render_list_controls(&self, len: usize);

    fn render_like(&self, like: &Like);
    fn remove_like(&self, id: &str);
    fn toggle_like_button(&self, liked: bool);
    fn toggle_likes_menu(&self, visible: bool);

    fn notify_error(&self, message: &str);
}

/// Which page navigation buttons to show. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButtons {
    None,
    Next(usize),
    Prev(usize),
    Both { prev: usize, next: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    total: usize,
    per_page: usize,
}

impl Pager {
    pub fn new(total: usize) -> Self {
        Self::with_page_size(total, RESULTS_PER_PAGE)
    }

    pub fn with_page_size(total: usize, per_page: usize) -> Self {
        Self {
            total,
            per_page: per_page.max(1),
        }
    }

    /// Number of pages. An empty result set still has one (empty) page.
    pub fn page_count(&self) -> usize {
        ((self.total + self.per_page - 1) / self.per_page).max(1)
    }

    pub fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.page_count())
    }

    pub fn range(&self, page: usize) -> Range<usize> {
        let start = (self.clamp(page) - 1) * self.per_page;
        let end = (start + self.per_page).min(self.total);
        start.min(end)..end
    }

    pub fn page_of<'a, T>(&self, items: &'a [T], page: usize) -> &'a [T] {
        let range = self.range(page);
        let end = range.end.min(items.len());
        &items[range.start.min(end)..end]
    }

    pub fn buttons(&self, page: usize) -> PageButtons {
        let pages = self.page_count();
        let page = self.clamp(page);
        if pages == 1 {
            PageButtons::None
        } else if page == 1 {
            PageButtons::Next(2)
        } else if page == pages {
            PageButtons::Prev(page - 1)
        } else {
            PageButtons::Both {
                prev: page - 1,
                next: page + 1,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_page_count() {
        for (total, pages) in [(0, 1), (1, 1), (10, 1), (11, 2), (20, 2), (21, 3)] {
            assert_eq!(Pager::new(total).page_count(), pages, "total {}", total);
        }
    }

    #[test]
    fn test_page_slices() {
        let items: Vec<usize> = (1..=20).collect();
        let pager = Pager::new(items.len());
        assert_eq!(pager.page_of(&items, 1), &items[0..10]);
        assert_eq!(pager.page_of(&items, 2), &items[10..20]);
        // Out of range pages are clamped.
        assert_eq!(pager.page_of(&items, 0), &items[0..10]);
        assert_eq!(pager.page_of(&items, 7), &items[10..20]);

        let items: Vec<usize> = (1..=23).collect();
        assert_eq!(Pager::new(items.len()).page_of(&items, 3), &[21, 22, 23]);
        let empty: Vec<usize> = Vec::new();
        assert!(Pager::new(0).page_of(&empty, 1).is_empty());
    }

    #[test]
    fn test_buttons() {
        assert_eq!(Pager::new(5).buttons(1), PageButtons::None);
        assert_eq!(Pager::new(20).buttons(1), PageButtons::Next(2));
        assert_eq!(Pager::new(20).buttons(2), PageButtons::Prev(1));
        assert_eq!(
            Pager::new(30).buttons(2),
            PageButtons::Both { prev: 1, next: 3 }
        );
        assert_eq!(Pager::new(30).buttons(9), PageButtons::Prev(2));
    }

    #[test]
    fn test_custom_page_size() {
        let pager = Pager::with_page_size(7, 3);
        assert_eq!(pager.page_count(), 3);
        assert_eq!(pager.range(3), 6..7);
        assert_eq!(Pager::with_page_size(7, 0).page_count(), 7);
    }
}
