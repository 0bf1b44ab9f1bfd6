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
use tracing::debug;

/// The recipe id named by a location fragment like `#abc123`.
pub fn recipe_id_from_fragment(fragment: &str) -> Option<&str> {
    let fragment = fragment.trim();
    let id = fragment.strip_prefix('#').unwrap_or(fragment).trim();
    if id.is_empty() {
        debug!(fragment, "No recipe in fragment");
        None
    } else {
        Some(id)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_recipe_id_from_fragment() {
        for (fragment, expected) in [
            ("#abc123", Some("abc123")),
            ("abc123", Some("abc123")),
            (" #47746 ", Some("47746")),
            ("", None),
            ("#", None),
            ("  # ", None),
        ] {
            assert_eq!(recipe_id_from_fragment(fragment), expected, "{:?}", fragment);
        }
    }
}
