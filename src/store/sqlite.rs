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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rusqlite::Connection;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::ErrorKind;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::store::MasteryStore;
use crate::store::ScoreStore;
use crate::store::SessionRecord;
use crate::types::content_type::ContentType;
use crate::types::mastery_table::MasteryTable;
use crate::types::memory_score::MemoryScore;
use crate::types::timestamp::Timestamp;
use crate::types::user_id::UserId;
use crate::types::weight::Weight;
use crate::types::word::WordId;
use crate::types::word_stat::WordStat;

/// A mastery store backed by a SQLite database.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(database_path: &str) -> Fallible<Self> {
        log::debug!("Opening database at {database_path}");
        Self::from_connection(Connection::open(database_path)?)
    }

    pub fn open_in_memory() -> Fallible<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Fallible<Self> {
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating schema.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self { conn })
    }

    fn acquire(&self) -> Fallible<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            ErrorReport::with_kind(
                ErrorKind::PersistenceUnavailable,
                "database connection is poisoned",
            )
        })
    }
}

impl MasteryStore for SqliteStore {
    fn load(&self, user: &UserId, content_type: ContentType) -> Fallible<MasteryTable> {
        let mut conn = self.acquire()?;
        let tx = conn.transaction()?;
        let scope_id = get_or_create_scope(&tx, user, content_type)?;
        let mut table = MasteryTable::new();
        {
            let sql = "select word_id, correct_count, incorrect_count, weight from word_stats where scope_id = ?;";
            let mut stmt = tx.prepare(sql)?;
            let mut rows = stmt.query([scope_id])?;
            while let Some(row) = rows.next()? {
                let word_id: WordId = row.get(0)?;
                let correct_count: i64 = row.get(1)?;
                let incorrect_count: i64 = row.get(2)?;
                let weight: Option<f64> = row.get(3)?;
                let weight = match weight {
                    Some(w) if Weight::is_valid(w) => Weight::sanitize(w),
                    other => {
                        log::warn!(
                            "Invalid weight {other:?} for word {word_id} ({user}, {content_type}), using baseline."
                        );
                        Weight::BASELINE
                    }
                };
                let stat = WordStat {
                    correct_count: count_from_sql(correct_count),
                    incorrect_count: count_from_sql(incorrect_count),
                    weight,
                };
                table.insert(word_id, stat);
            }
        }
        tx.commit()?;
        log::debug!(
            "Loaded {} word stats for ({user}, {content_type}).",
            table.len()
        );
        Ok(table)
    }

    fn save(
        &self,
        user: &UserId,
        content_type: ContentType,
        table: &MasteryTable,
    ) -> Fallible<()> {
        let mut conn = self.acquire()?;
        let tx = conn.transaction()?;
        let scope_id = get_or_create_scope(&tx, user, content_type)?;
        tx.execute("delete from word_stats where scope_id = ?;", [scope_id])?;
        {
            let sql = "insert into word_stats (scope_id, word_id, correct_count, incorrect_count, weight) values (?, ?, ?, ?, ?);";
            let mut stmt = tx.prepare(sql)?;
            for (word_id, stat) in table {
                stmt.execute((
                    scope_id,
                    word_id,
                    count_to_sql(stat.correct_count),
                    count_to_sql(stat.incorrect_count),
                    stat.weight,
                ))?;
            }
        }
        touch_scope(&tx, scope_id)?;
        tx.commit()?;
        Ok(())
    }
}

impl ScoreStore for SqliteStore {
    fn record_session(
        &self,
        user: &UserId,
        content_type: ContentType,
        record: &SessionRecord,
    ) -> Fallible<()> {
        let mut conn = self.acquire()?;
        let tx = conn.transaction()?;
        let scope_id = get_or_create_scope(&tx, user, content_type)?;
        let correct = count_to_sql(record.correct);
        let total = count_to_sql(record.total);
        tx.execute(
            "insert into sessions (scope_id, started_at, ended_at, correct, total) values (?, ?, ?, ?, ?);",
            (scope_id, &record.started_at, &record.ended_at, correct, total),
        )?;
        tx.execute(
            "update scopes set memory_score = memory_score + ?, memory_total = memory_total + ? where scope_id = ?;",
            (correct, total, scope_id),
        )?;
        touch_scope(&tx, scope_id)?;
        tx.commit()?;
        Ok(())
    }

    fn memory_score(&self, user: &UserId, content_type: ContentType) -> Fallible<MemoryScore> {
        let mut conn = self.acquire()?;
        let tx = conn.transaction()?;
        let scope_id = get_or_create_scope(&tx, user, content_type)?;
        let (score, total): (i64, i64) = tx.query_row(
            "select memory_score, memory_total from scopes where scope_id = ?;",
            [scope_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        tx.commit()?;
        Ok(MemoryScore {
            score: count_from_sql(score),
            total: count_from_sql(total),
        })
    }
}

type ScopeId = i64;

fn get_or_create_scope(
    tx: &Transaction,
    user: &UserId,
    content_type: ContentType,
) -> Fallible<ScopeId> {
    let now = Timestamp::now();
    let sql = "insert into scopes (user_id, content_type, created_at, updated_at) values (?, ?, ?, ?) on conflict (user_id, content_type) do nothing;";
    tx.execute(sql, (user, content_type, now, now))?;
    let sql = "select scope_id from scopes where user_id = ? and content_type = ?;";
    let scope_id: ScopeId = tx.query_row(sql, (user, content_type), |row| row.get(0))?;
    Ok(scope_id)
}

fn touch_scope(tx: &Transaction, scope_id: ScopeId) -> Fallible<()> {
    let sql = "update scopes set updated_at = ? where scope_id = ?;";
    tx.execute(sql, (Timestamp::now(), scope_id))?;
    Ok(())
}

fn count_to_sql(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

fn count_from_sql(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["scopes"], |row| row.get(0))?;
    Ok(count > 0)
}
