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

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::error::ErrorKind;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::store::MasteryStore;
use crate::store::ScoreStore;
use crate::store::SessionRecord;
use crate::types::content_type::ContentType;
use crate::types::mastery_table::MasteryTable;
use crate::types::memory_score::MemoryScore;
use crate::types::user_id::UserId;

/// A store that keeps everything in process memory. Nothing survives the
/// process.
#[derive(Default)]
pub struct MemoryStore {
    scopes: Mutex<HashMap<(UserId, ContentType), Scope>>,
}

#[derive(Default)]
struct Scope {
    table: MasteryTable,
    score: MemoryScore,
    sessions: Vec<SessionRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sessions recorded for a scope, oldest first.
    pub fn sessions(
        &self,
        user: &UserId,
        content_type: ContentType,
    ) -> Fallible<Vec<SessionRecord>> {
        let scopes = self.acquire()?;
        Ok(scopes
            .get(&(user.clone(), content_type))
            .map(|scope| scope.sessions.clone())
            .unwrap_or_default())
    }

    fn acquire(&self) -> Fallible<MutexGuard<'_, HashMap<(UserId, ContentType), Scope>>> {
        self.scopes.lock().map_err(|_| {
            ErrorReport::with_kind(ErrorKind::PersistenceUnavailable, "memory store is poisoned")
        })
    }
}

impl MasteryStore for MemoryStore {
    fn load(&self, user: &UserId, content_type: ContentType) -> Fallible<MasteryTable> {
        let mut scopes = self.acquire()?;
        let scope = scopes.entry((user.clone(), content_type)).or_default();
        Ok(scope.table.clone())
    }

    fn save(
        &self,
        user: &UserId,
        content_type: ContentType,
        table: &MasteryTable,
    ) -> Fallible<()> {
        let mut scopes = self.acquire()?;
        let scope = scopes.entry((user.clone(), content_type)).or_default();
        scope.table = table.clone();
        Ok(())
    }
}

impl ScoreStore for MemoryStore {
    fn record_session(
        &self,
        user: &UserId,
        content_type: ContentType,
        record: &SessionRecord,
    ) -> Fallible<()> {
        let mut scopes = self.acquire()?;
        let scope = scopes.entry((user.clone(), content_type)).or_default();
        scope.score.add(record.correct, record.total);
        scope.sessions.push(record.clone());
        Ok(())
    }

    fn memory_score(&self, user: &UserId, content_type: ContentType) -> Fallible<MemoryScore> {
        let scopes = self.acquire()?;
        Ok(scopes
            .get(&(user.clone(), content_type))
            .map(|scope| scope.score)
            .unwrap_or_default())
    }
}
