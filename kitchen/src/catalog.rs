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
use async_std::{
    fs::{read_dir, read_to_string, DirEntry},
    path::PathBuf,
    stream::StreamExt,
};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use client_api::{RecipeDetail, RecipeSummary};
use kitchen_web::api::{Error, RecipeProvider};

fn io_error(err: std::io::Error) -> Error {
    Error::Network(format!("{:?}", err))
}

/// A directory of `<id>.json` recipe files standing in for the recipe
/// service.
#[derive(Clone, Debug)]
pub struct CatalogProvider {
    path: PathBuf,
}

impl CatalogProvider {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { path: root.into() }
    }

    fn get_recipe_path(&self, id: &str) -> PathBuf {
        let mut recipe_path = self.path.clone();
        recipe_path.push(format!("{}.json", id));
        recipe_path
    }

    /// Every recipe file in the catalog ordered by file name.
    async fn get_recipe_paths(&self) -> Result<Vec<PathBuf>, Error> {
        let mut entries = read_dir(&self.path).await.map_err(io_error)?;
        let mut paths = Vec::new();
        while let Some(res) = entries.next().await {
            let entry: DirEntry = res.map_err(io_error)?;
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                paths.push(path);
            } else {
                warn!(file = %path.to_string_lossy(), "skipping file not a recipe");
            }
        }
        paths.sort();
        Ok(paths)
    }
}

async fn read_detail(path: &PathBuf) -> Result<RecipeDetail, Error> {
    let contents = read_to_string(path).await.map_err(io_error)?;
    Ok(serde_json::from_str(&contents)?)
}

#[async_trait(?Send)]
impl RecipeProvider for CatalogProvider {
    #[instrument(skip(self))]
    async fn search_recipes(&self, query: &str) -> Result<Vec<RecipeSummary>, Error> {
        let query = query.to_lowercase();
        let mut results = Vec::new();
        for path in self.get_recipe_paths().await? {
            match read_detail(&path).await {
                Ok(detail) => {
                    if detail.title.to_lowercase().contains(&query) {
                        results.push(detail.summary());
                    }
                }
                Err(err) => {
                    warn!(file = %path.to_string_lossy(), ?err, "skipping unreadable recipe");
                }
            }
        }
        debug!(count = results.len(), "Searched catalog");
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn get_recipe(&self, id: &str) -> Result<RecipeDetail, Error> {
        if id.contains(|c: char| c == '/' || c == '\\') || id.starts_with('.') {
            return Err(Error::Network(format!("Invalid recipe id {}", id)));
        }
        let recipe_path = self.get_recipe_path(id);
        if !recipe_path.is_file().await {
            return Err(Error::Network(format!("No recipe {}", id)));
        }
        debug!("Found recipe file {}", recipe_path.to_string_lossy());
        read_detail(&recipe_path).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_dir;
    use async_std::task::block_on;
    use std::fs;

    fn write_recipe(dir: &std::path::Path, id: &str, title: &str) {
        let detail = RecipeDetail {
            id: id.to_owned(),
            title: title.to_owned(),
            author: "Closet Cooking".to_owned(),
            img: format!("http://img/{}.jpg", id),
            url: format!("http://src/{}", id),
            ingredients: vec!["2 cups flour".to_owned(), "salt to taste".to_owned()],
        };
        fs::write(
            dir.join(format!("{}.json", id)),
            serde_json::to_string(&detail).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_search_matches_titles_in_file_order() {
        let dir = test_dir();
        write_recipe(&dir, "b-pizza", "Pepperoni Pizza");
        write_recipe(&dir, "a-pizza", "PIZZA dip");
        write_recipe(&dir, "c-pasta", "Pasta");
        fs::write(dir.join("notes.txt"), "not a recipe").unwrap();
        fs::write(dir.join("broken.json"), "{").unwrap();

        let catalog = CatalogProvider::new(dir.clone());
        let results = block_on(catalog.search_recipes("pizza")).unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a-pizza", "b-pizza"]);
        assert!(block_on(catalog.search_recipes("sushi")).unwrap().is_empty());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_get_recipe() {
        let dir = test_dir();
        write_recipe(&dir, "abc123", "Pizza Dip");
        fs::write(dir.join("broken.json"), "{").unwrap();
        let catalog = CatalogProvider::new(dir.clone());

        let detail = block_on(catalog.get_recipe("abc123")).unwrap();
        assert_eq!(detail.title, "Pizza Dip");
        assert_eq!(detail.ingredients.len(), 2);
        assert!(matches!(
            block_on(catalog.get_recipe("missing")),
            Err(Error::Network(_))
        ));
        assert!(matches!(
            block_on(catalog.get_recipe("broken")),
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            block_on(catalog.get_recipe("../abc123")),
            Err(Error::Network(_))
        ));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_catalog_is_an_error() {
        let dir = test_dir();
        let catalog = CatalogProvider::new(dir.join("nope"));
        assert!(block_on(catalog.search_recipes("pizza")).is_err());
        fs::remove_dir_all(dir).unwrap();
    }
}
