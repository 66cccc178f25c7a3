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

use serde::Deserialize;
use serde::Serialize;

use crate::selector::update_weight;
use crate::types::weight::Weight;

/// Mastery information for a single word.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
pub struct WordStat {
    /// The number of times the word was answered correctly.
    #[serde(rename = "correct", default)]
    pub correct_count: u64,
    /// The number of times the word was answered incorrectly.
    #[serde(rename = "incorrect", default)]
    pub incorrect_count: u64,
    /// The word's current sampling weight.
    #[serde(default)]
    pub weight: Weight,
}

impl WordStat {
    /// Record an answer, returning the new weight.
    pub fn record(&mut self, was_correct: bool) -> Weight {
        if was_correct {
            self.correct_count = self.correct_count.saturating_add(1);
        } else {
            self.incorrect_count = self.incorrect_count.saturating_add(1);
        }
        self.weight = update_weight(self.weight, was_correct);
        self.weight
    }
}
