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
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use crate::cmd::drill::open_store;
use crate::error::Fallible;
use crate::store::MasteryStore;
use crate::store::ScoreStore;
use crate::types::content_type::ContentType;
use crate::types::mastery_table::MasteryTable;
use crate::types::user_id::UserId;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(
    database: &Path,
    user: &UserId,
    content_type: ContentType,
    format: StatsFormat,
) -> Fallible<()> {
    let store = open_store(database)?;
    let words = store.load(user, content_type)?;
    let score = store.memory_score(user, content_type)?;
    let stats = Stats {
        user: user.as_str(),
        content_type,
        memory_score: score.score,
        memory_total: score.total,
        memory_rate: score.rate(),
        words: &words,
    };
    match format {
        StatsFormat::Text => print!("{}", render_text(&stats)),
        StatsFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats<'a> {
    user: &'a str,
    content_type: ContentType,
    memory_score: u64,
    memory_total: u64,
    memory_rate: f64,
    words: &'a MasteryTable,
}

/// Render the stats with the hardest words first.
fn render_text(stats: &Stats) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} / {}: {}/{} correct ({:.1}%)\n",
        stats.user,
        stats.content_type.display_name(),
        stats.memory_score,
        stats.memory_total,
        stats.memory_rate
    ));
    let mut rows: Vec<_> = stats.words.iter().collect();
    rows.sort_by(|(_, a), (_, b)| b.weight.value().total_cmp(&a.weight.value()));
    for (word_id, stat) in rows {
        out.push_str(&format!(
            "{word_id}\tweight={}\tcorrect={}\tincorrect={}\n",
            stat.weight, stat.correct_count, stat.incorrect_count
        ));
    }
    out
}
