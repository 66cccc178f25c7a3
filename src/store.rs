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

pub mod memory;
pub mod sqlite;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::spawn_blocking;
use tokio::time::timeout;

use crate::error::ErrorKind;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::content_type::ContentType;
use crate::types::mastery_table::MasteryTable;
use crate::types::memory_score::MemoryScore;
use crate::types::timestamp::Timestamp;
use crate::types::user_id::UserId;

/// Durable storage for mastery tables, addressed by user and content type.
pub trait MasteryStore: Send + Sync {
    /// Return the stored table, or an empty one if the scope has never been
    /// written. Never fails with "not found".
    fn load(&self, user: &UserId, content_type: ContentType) -> Fallible<MasteryTable>;

    /// Replace the stored table wholesale.
    fn save(&self, user: &UserId, content_type: ContentType, table: &MasteryTable)
    -> Fallible<()>;
}

/// Aggregate session results.
pub trait ScoreStore: Send + Sync {
    /// Add a finished session's counters to the aggregate score.
    fn record_session(
        &self,
        user: &UserId,
        content_type: ContentType,
        record: &SessionRecord,
    ) -> Fallible<()>;

    fn memory_score(&self, user: &UserId, content_type: ContentType) -> Fallible<MemoryScore>;
}

/// A backend that stores both mastery tables and session scores.
pub trait Store: MasteryStore + ScoreStore {}

impl<T: MasteryStore + ScoreStore> Store for T {}

/// The counters of a finished session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionRecord {
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    pub correct: u64,
    pub total: u64,
}

/// Load a table on the blocking pool, giving up after `limit`.
pub async fn load_within(
    store: Arc<dyn Store>,
    user: UserId,
    content_type: ContentType,
    limit: Duration,
) -> Fallible<MasteryTable> {
    let task = spawn_blocking(move || store.load(&user, content_type));
    timeout(limit, task).await??.map_err(unavailable)
}

/// Save a table on the blocking pool, giving up after `limit`.
pub async fn save_within(
    store: Arc<dyn Store>,
    user: UserId,
    content_type: ContentType,
    table: MasteryTable,
    limit: Duration,
) -> Fallible<()> {
    let task = spawn_blocking(move || store.save(&user, content_type, &table));
    timeout(limit, task).await??.map_err(unavailable)
}

/// Record a session on the blocking pool, giving up after `limit`.
pub async fn record_session_within(
    store: Arc<dyn Store>,
    user: UserId,
    content_type: ContentType,
    record: SessionRecord,
    limit: Duration,
) -> Fallible<()> {
    let task = spawn_blocking(move || store.record_session(&user, content_type, &record));
    timeout(limit, task).await??.map_err(unavailable)
}

/// Backend failures all mean the store is unavailable to the caller.
fn unavailable(err: ErrorReport) -> ErrorReport {
    ErrorReport::with_kind(ErrorKind::PersistenceUnavailable, err.message())
}
