// Copyright 2025 Fernando Borretti
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

use std::collections::HashSet;
use std::fs::read_to_string;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::content_type::ContentType;
use crate::types::word::Word;

/// Provides the words of a deck. The engine does not care where they come
/// from.
pub trait WordSource {
    fn list_words(&self, deck_id: &str) -> Fallible<Vec<Word>>;
}

/// A deck file.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct Deck {
    pub name: String,
    /// The deck's category, e.g. `user`, `kana`, or `jlpt`.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Deck {
    pub fn parse(content: &str) -> Fallible<Self> {
        let deck: Deck = toml::from_str(content)?;
        let mut seen = HashSet::new();
        for word in &deck.words {
            if !seen.insert(&word.id) {
                return fail(format!(
                    "duplicate word id '{}' in deck '{}'.",
                    word.id, deck.name
                ));
            }
        }
        Ok(deck)
    }

    /// The content type the deck's mastery is tracked under.
    pub fn content_type(&self) -> ContentType {
        ContentType::from_deck_category(self.category.as_deref())
    }
}

/// Reads decks from `<directory>/<deck_id>.toml`.
pub struct DeckDirectory {
    directory: PathBuf,
}

impl DeckDirectory {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    pub fn deck(&self, deck_id: &str) -> Fallible<Deck> {
        let path = self.deck_path(deck_id)?;
        if !path.exists() {
            return fail(format!("deck file {} does not exist.", path.display()));
        }
        log::debug!("Loading deck from {}", path.display());
        Deck::parse(&read_to_string(path)?)
    }

    fn deck_path(&self, deck_id: &str) -> Fallible<PathBuf> {
        let deck_id = deck_id.trim();
        if deck_id.is_empty() {
            return fail("deck id must not be empty.");
        }
        // Deck ids name files directly inside the directory.
        if deck_id.contains(['/', '\\']) || deck_id.starts_with('.') {
            return fail(format!("invalid deck id: {deck_id}"));
        }
        Ok(self.directory.join(format!("{deck_id}.toml")))
    }
}

impl WordSource for DeckDirectory {
    fn list_words(&self, deck_id: &str) -> Fallible<Vec<Word>> {
        Ok(self.deck(deck_id)?.words)
    }
}
