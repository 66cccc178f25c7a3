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

use std::path::Path;
use std::sync::Arc;

use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::io::stdin;

use crate::config::Config;
use crate::deck::DeckDirectory;
use crate::error::ErrorKind;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::session::Session;
use crate::session::SessionOptions;
use crate::store::sqlite::SqliteStore;
use crate::types::content_type::ContentType;
use crate::types::user_id::UserId;

/// Typing this instead of an answer ends the drill.
const QUIT: &str = ":q";

pub async fn drill(
    deck_id: &str,
    user: UserId,
    content_type: Option<ContentType>,
    config: &Config,
    seed: Option<u64>,
) -> Fallible<()> {
    let deck = DeckDirectory::new(config.decks.clone()).deck(deck_id)?;
    let content_type = content_type.unwrap_or_else(|| deck.content_type());
    let store = open_store(&config.database)?;
    println!(
        "Drilling {} ({} words, {}). Type {QUIT} to stop.",
        deck.name,
        deck.words.len(),
        content_type.display_name()
    );

    let options = SessionOptions {
        seed,
        ..SessionOptions::from_config(config)
    };
    let mut session =
        Session::start(Arc::new(store), user, content_type, deck.words, options).await;
    let mut lines = BufReader::new(stdin()).lines();
    loop {
        let word = match session.next_word() {
            Ok(word) => word.clone(),
            Err(e) if e.kind() == ErrorKind::EmptyCandidateSet => {
                println!("No words to drill.");
                break;
            }
            Err(e) => return Err(e),
        };
        println!();
        println!("Q: {}", word.display_form);
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line == QUIT {
            break;
        }
        // An empty line means "I don't know".
        let answer = session.submit(line)?;
        if answer.was_correct {
            println!("Correct!");
        } else if word.glossary.is_empty() {
            println!("Incorrect. A: {}", word.answer_form);
        } else {
            println!("Incorrect. A: {} ({})", word.answer_form, word.glossary);
        }
    }

    let summary = session.end().await?;
    println!();
    println!(
        "Session completed: {}/{} correct.",
        summary.correct, summary.total
    );
    if !summary.table_saved {
        println!("Warning: your progress could not be saved.");
    }
    Ok(())
}

pub fn open_store(database: &Path) -> Fallible<SqliteStore> {
    let path: &str = database
        .to_str()
        .ok_or_else(|| ErrorReport::new("invalid path"))?;
    SqliteStore::open(path)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_open_store_creates_database() -> Fallible<()> {
        let directory = tempdir()?;
        let path = directory.path().join("mastery.db");
        open_store(&path)?;
        assert!(path.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_drill_on_missing_deck() -> Fallible<()> {
        let directory = tempdir()?;
        let config = Config {
            database: directory.path().join("mastery.db"),
            decks: directory.path().to_path_buf(),
            ..Config::default()
        };
        let user = UserId::new("1")?;
        let result = drill("nope", user, None, &config, Some(0)).await;
        assert!(result.is_err());
        Ok(())
    }
}
