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
use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{from_str, to_string};
use tracing::{debug, error, warn};

/// Storage key for the shopping list.
pub const LIST_KEY: &str = "shopping_list";
/// Storage key for the liked recipes.
pub const LIKES_KEY: &str = "likes";

#[derive(Debug, Clone, PartialEq)]
pub struct Error(String);

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "storage error: {}", self.0)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(item: std::io::Error) -> Self {
        Error(format!("{:?}", item))
    }
}

impl From<serde_json::Error> for Error {
    fn from(item: serde_json::Error) -> Self {
        Error(format!("{}", item))
    }
}

impl From<String> for Error {
    fn from(item: String) -> Self {
        Error(item)
    }
}

impl From<&'static str> for Error {
    fn from(item: &'static str) -> Self {
        Error(item.to_owned())
    }
}

/// A simple string key value store. Browser local storage is the model so
/// writes go through a shared reference.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, Error>;
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
    fn remove(&self, key: &str) -> Result<(), Error>;
}

/// Serialize `value` as json and store it under `key`. Failures are logged
/// and otherwise ignored.
pub fn save_json<T: Serialize + ?Sized>(storage: &dyn Storage, key: &str, value: &T) {
    let serialized = match to_string(value) {
        Ok(s) => s,
        Err(err) => {
            error!(key, ?err, "Unable to serialize for storage");
            return;
        }
    };
    if let Err(err) = storage.set(key, &serialized) {
        error!(key, ?err, "Unable to write to storage");
    } else {
        debug!(key, bytes = serialized.len(), "Persisted");
    }
}

/// Load and deserialize the json stored under `key`. A missing key,
/// unreadable storage and corrupt data all come back as `None`.
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let data = match storage.get(key) {
        Ok(Some(data)) => data,
        Ok(None) => {
            debug!(key, "Nothing stored");
            return None;
        }
        Err(err) => {
            warn!(key, ?err, "Unable to read from storage");
            return None;
        }
    };
    match from_str(&data) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, ?err, "Discarding corrupt stored data");
            None
        }
    }
}

/// In process storage. Cloning takes a snapshot of the current contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, Error> {
            Err("storage is unavailable".into())
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), Error> {
            Err("storage is full".into())
        }

        fn remove(&self, _key: &str) -> Result<(), Error> {
            Err("storage is unavailable".into())
        }
    }

    #[test]
    fn test_json_round_trip() {
        let storage = MemoryStorage::new();
        save_json(&storage, LIKES_KEY, &vec!["a".to_owned(), "b".to_owned()]);
        let loaded: Option<Vec<String>> = load_json(&storage, LIKES_KEY);
        assert_eq!(loaded, Some(vec!["a".to_owned(), "b".to_owned()]));
    }

    #[test]
    fn test_load_degrades_to_none() {
        let storage = MemoryStorage::new();
        assert_eq!(load_json::<Vec<String>>(&storage, LIST_KEY), None);
        storage.set(LIST_KEY, "{not json").unwrap();
        assert_eq!(load_json::<Vec<String>>(&storage, LIST_KEY), None);
        storage.set(LIST_KEY, r#"{"an": "object"}"#).unwrap();
        assert_eq!(load_json::<Vec<String>>(&storage, LIST_KEY), None);
        assert_eq!(load_json::<Vec<String>>(&BrokenStorage, LIST_KEY), None);
    }

    #[test]
    fn test_save_failures_are_swallowed() {
        save_json(&BrokenStorage, LIST_KEY, &vec![1, 2, 3]);
    }

    #[test]
    fn test_memory_storage_clone_is_a_snapshot() {
        let storage = MemoryStorage::new();
        storage.set("k", "v1").unwrap();
        let snapshot = storage.clone();
        storage.set("k", "v2").unwrap();
        storage.remove("other").unwrap();
        assert_eq!(snapshot.get("k").unwrap(), Some("v1".to_owned()));
        assert_eq!(storage.get("k").unwrap(), Some("v2".to_owned()));
        assert_eq!(storage.len(), 1);
    }
}
