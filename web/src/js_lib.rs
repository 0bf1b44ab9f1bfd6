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
use wasm_bindgen::JsValue;
use web_sys::window;

use crate::store::{Error, Storage};

impl From<JsValue> for Error {
    fn from(item: JsValue) -> Self {
        Error::from(format!("{:?}", item))
    }
}

pub fn get_storage() -> Result<web_sys::Storage, Error> {
    window()
        .ok_or("No window present")?
        .local_storage()?
        .ok_or_else(|| Error::from("No storage available"))
}

/// The current location fragment including the leading `#`, or an empty
/// string when there is none.
pub fn current_fragment() -> String {
    window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

/// Browser local storage.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            storage: get_storage()?,
        })
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.storage.get_item(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        Ok(self.storage.set_item(key, value)?)
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        Ok(self.storage.remove_item(key)?)
    }
}
