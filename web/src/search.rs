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
use tracing::{debug, instrument};

use client_api::RecipeSummary;

use crate::api::{Error, RecipeProvider};

/// The results for one search query. Paging is done by the render layer so
/// this holds every result the provider returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Search {
    pub query: String,
    pub results: Vec<RecipeSummary>,
}

impl Search {
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
            results: Vec::new(),
        }
    }

    #[instrument(skip(self, provider), fields(query = %self.query))]
    pub async fn fetch_results<P>(&mut self, provider: &P) -> Result<(), Error>
    where
        P: RecipeProvider + ?Sized,
    {
        self.results = provider.search_recipes(&self.query).await?;
        debug!(count = self.results.len(), "Got search results");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::ScriptedProvider;
    use futures::executor::block_on;

    #[test]
    fn test_fetch_results_keeps_everything() {
        let provider = ScriptedProvider::new();
        provider.add_search("pizza", ScriptedProvider::summaries("pizza", 20));
        let mut search = Search::new("pizza");
        block_on(search.fetch_results(&provider)).expect("search should succeed");
        assert_eq!(search.results.len(), 20);
        assert_eq!(search.results[0].id, "pizza-1");
    }

    #[test]
    fn test_fetch_results_failure_leaves_results_empty() {
        let provider = ScriptedProvider::new();
        provider.fail_search("pizza", Error::Network("offline".to_owned()));
        let mut search = Search::new("pizza");
        assert!(block_on(search.fetch_results(&provider)).is_err());
        assert!(search.results.is_empty());
    }
}
