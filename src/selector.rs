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

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::ErrorKind;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::weight::Weight;
use crate::types::word::Word;

/// A correct answer on a word lighter than this resets it to the baseline.
const RESET_THRESHOLD: f64 = 8.0;

/// A correct answer on a heavier word divides its weight by this.
const CORRECT_DIVISOR: f64 = 8.0;

/// A miss multiplies the weight by this.
const MISS_MULTIPLIER: f64 = 10.0;

/// A word the selector may pick, with its current weight.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub word: Word,
    pub weight: Weight,
}

/// Picks words with probability proportional to their weight.
pub struct WeightedSelector {
    rng: ChaCha8Rng,
}

impl WeightedSelector {
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// A selector whose draws are reproducible.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Pick a candidate, returning its index. Candidates are walked in the
    /// order given, so the same draw always maps to the same word.
    ///
    /// This is sampling with replacement: a heavy word can come up again
    /// before every other word has been seen.
    pub fn pick(&mut self, candidates: &[Candidate]) -> Fallible<usize> {
        let Some(last) = candidates.len().checked_sub(1) else {
            return Err(ErrorReport::with_kind(
                ErrorKind::EmptyCandidateSet,
                "no words left to pick from.",
            ));
        };
        let mut scale: f64 = 1.0;
        let mut total: f64 = candidates.iter().map(|c| c.weight.value()).sum();
        if !total.is_finite() {
            // Huge weights can overflow the sum. Sampling is scale-invariant,
            // so divide everything by the heaviest weight.
            scale = candidates
                .iter()
                .map(|c| c.weight.value())
                .fold(f64::MIN_POSITIVE, f64::max);
            total = candidates.iter().map(|c| c.weight.value() / scale).sum();
        }
        let mut remainder: f64 = self.rng.r#gen::<f64>() * total;
        for (index, candidate) in candidates.iter().enumerate() {
            remainder -= candidate.weight.value() / scale;
            if remainder <= 0.0 {
                return Ok(index);
            }
        }
        // Rounding can leave a sliver of the draw unaccounted for.
        Ok(last)
    }
}

impl Default for WeightedSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute a word's weight after an answer.
///
/// A correct answer on a light word resets it to the baseline. On a heavy
/// word it only divides the weight, so a word with a long history of misses
/// takes several correct answers to leave the difficult pool. A miss
/// multiplies the weight. There is no ceiling other than the largest finite
/// float.
pub fn update_weight(old: Weight, was_correct: bool) -> Weight {
    let old = old.value();
    let new = if was_correct {
        if old < RESET_THRESHOLD {
            Weight::BASELINE.value()
        } else {
            old / CORRECT_DIVISOR
        }
    } else {
        (old * MISS_MULTIPLIER).min(f64::MAX)
    };
    Weight::sanitize(new)
}
