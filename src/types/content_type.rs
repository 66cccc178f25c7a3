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

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use clap::ValueEnum;
use rusqlite::ToSql;
use rusqlite::types::ToSqlOutput;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// The learning context a mastery table belongs to. Performance in one
/// context never biases selection in another.
#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ContentType {
    CustomDecks,
    ProvidedDecks,
    KanaPractice,
    JlptDecks,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::CustomDecks,
        ContentType::ProvidedDecks,
        ContentType::KanaPractice,
        ContentType::JlptDecks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::CustomDecks => "custom_decks",
            ContentType::ProvidedDecks => "provided_decks",
            ContentType::KanaPractice => "kana_practice",
            ContentType::JlptDecks => "jlpt_decks",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ContentType::CustomDecks => "Custom Decks",
            ContentType::ProvidedDecks => "Provided Decks",
            ContentType::KanaPractice => "Kana Practice",
            ContentType::JlptDecks => "JLPT Decks",
        }
    }

    /// Map a deck's category to the content type its mastery is tracked
    /// under. Unknown or missing categories count as provided decks.
    pub fn from_deck_category(category: Option<&str>) -> Self {
        match category {
            Some("user") => ContentType::CustomDecks,
            Some("kana") => ContentType::KanaPractice,
            Some("jlpt") => ContentType::JlptDecks,
            _ => ContentType::ProvidedDecks,
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "custom_decks" => Ok(ContentType::CustomDecks),
            "provided_decks" => Ok(ContentType::ProvidedDecks),
            "kana_practice" => Ok(ContentType::KanaPractice),
            "jlpt_decks" => Ok(ContentType::JlptDecks),
            _ => fail(format!("Invalid content type: {s}")),
        }
    }
}

impl ToSql for ContentType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}
