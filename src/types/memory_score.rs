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

use serde::Serialize;

/// Aggregate memory-test results for one user in one content type.
#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct MemoryScore {
    /// Correct answers across all flushed sessions.
    pub score: u64,
    /// Answers across all flushed sessions.
    pub total: u64,
}

impl MemoryScore {
    /// The percentage of correct answers, or zero if nothing was answered.
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.score as f64 / self.total as f64) * 100.0
    }

    pub fn add(&mut self, correct: u64, total: u64) {
        self.score = self.score.saturating_add(correct);
        self.total = self.total.saturating_add(total);
    }
}
