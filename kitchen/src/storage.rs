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
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, instrument, warn};

use kitchen_web::store::{Error, Storage};

/// A key value store kept as a single json object on disk. The whole file
/// is rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open the store at `path`. A missing or unreadable file starts out
    /// empty.
    #[instrument]
    pub fn open<P: Into<PathBuf> + std::fmt::Debug>(path: P) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(?err, "Store file is corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(err) => {
                debug!(?err, "No store file, starting empty");
                BTreeMap::new()
            }
        };
        Self {
            path,
            entries: RefCell::new(entries),
        }
    }

    fn flush(&self) -> Result<(), Error> {
        let contents = serde_json::to_string_pretty(&*self.entries.borrow())?;
        fs::write(&self.path, contents)?;
        debug!(path = ?self.path, "Wrote store file");
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        if self.entries.borrow_mut().remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
