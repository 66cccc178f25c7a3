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

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Deserialize;
use serde::Serialize;

/// A stable, opaque reference to a vocabulary item.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[serde(transparent)]
pub struct WordId(String);

impl WordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for WordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for WordId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for WordId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        Ok(WordId(string))
    }
}

/// A vocabulary item, as provided by the word source.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Word {
    pub id: WordId,
    /// The term shown to the learner.
    #[serde(rename = "display")]
    pub display_form: String,
    /// The answer the learner is expected to type.
    #[serde(rename = "answer")]
    pub answer_form: String,
    /// The meaning of the term.
    #[serde(default)]
    pub glossary: String,
}

impl Word {
    pub fn new(
        id: impl Into<String>,
        display_form: impl Into<String>,
        answer_form: impl Into<String>,
        glossary: impl Into<String>,
    ) -> Self {
        Self {
            id: WordId::new(id),
            display_form: display_form.into(),
            answer_form: answer_form.into(),
            glossary: glossary.into(),
        }
    }

    /// Check a typed answer. Surrounding whitespace and letter case are
    /// ignored.
    pub fn is_correct_answer(&self, input: &str) -> bool {
        input.trim().to_lowercase() == self.answer_form.to_lowercase()
    }
}
