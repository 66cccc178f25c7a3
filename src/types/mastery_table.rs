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

use std::collections::BTreeMap;
use std::collections::btree_map::Iter;

use serde::Deserialize;
use serde::Serialize;

use crate::types::weight::Weight;
use crate::types::word::WordId;
use crate::types::word_stat::WordStat;

/// Per-word mastery for one user in one content type.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
#[serde(transparent)]
pub struct MasteryTable {
    stats: BTreeMap<WordId, WordStat>,
}

impl MasteryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn get(&self, word_id: &WordId) -> Option<&WordStat> {
        self.stats.get(word_id)
    }

    /// The word's weight, or the baseline if it has never been answered.
    pub fn weight_of(&self, word_id: &WordId) -> Weight {
        self.stats
            .get(word_id)
            .map(|stat| stat.weight)
            .unwrap_or_default()
    }

    pub fn insert(&mut self, word_id: WordId, stat: WordStat) {
        self.stats.insert(word_id, stat);
    }

    /// Record an answer for a word, creating its entry if needed. Returns the
    /// updated entry.
    pub fn record_answer(&mut self, word_id: &WordId, was_correct: bool) -> WordStat {
        let stat = self.stats.entry(word_id.clone()).or_default();
        stat.record(was_correct);
        *stat
    }

    /// Lay `other`'s entries over this table. Entries only in this table
    /// are kept.
    pub fn merge(&mut self, other: &MasteryTable) {
        for (word_id, stat) in other {
            self.stats.insert(word_id.clone(), *stat);
        }
    }

    pub fn iter(&self) -> Iter<'_, WordId, WordStat> {
        self.stats.iter()
    }
}

impl<'a> IntoIterator for &'a MasteryTable {
    type Item = (&'a WordId, &'a WordStat);
    type IntoIter = Iter<'a, WordId, WordStat>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
