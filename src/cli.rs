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

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::drill::drill;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::config::Config;
use crate::error::Fallible;
use crate::types::content_type::ContentType;
use crate::types::user_id::UserId;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Drill a deck. Words you miss come up more often.
    Drill {
        /// The deck to drill: the name of a deck file, without `.toml`.
        deck: String,
        /// The learner's id.
        #[arg(long)]
        user: String,
        /// Track mastery under this content type instead of the deck's.
        #[arg(long, value_enum)]
        content_type: Option<ContentType>,
        /// Directory containing deck files.
        #[arg(long)]
        decks: Option<PathBuf>,
        /// Path to the mastery database.
        #[arg(long)]
        database: Option<PathBuf>,
        /// Path to the configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Seed for word selection, for reproducible drills.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print a learner's mastery table and memory score.
    Stats {
        /// The learner's id.
        #[arg(long)]
        user: String,
        /// The content type to report on.
        #[arg(long, value_enum)]
        content_type: ContentType,
        /// Output format.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
        /// Path to the mastery database.
        #[arg(long)]
        database: Option<PathBuf>,
        /// Path to the configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill {
            deck,
            user,
            content_type,
            decks,
            database,
            config,
            seed,
        } => {
            let mut config = Config::load(config.as_deref())?;
            if let Some(decks) = decks {
                config.decks = decks;
            }
            if let Some(database) = database {
                config.database = database;
            }
            let user = UserId::new(user)?;
            drill(&deck, user, content_type, &config, seed).await
        }
        Command::Stats {
            user,
            content_type,
            format,
            database,
            config,
        } => {
            let config = Config::load(config.as_deref())?;
            let database = database.unwrap_or(config.database);
            let user = UserId::new(user)?;
            print_stats(&database, &user, content_type, format)
        }
    }
}
