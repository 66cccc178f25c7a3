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
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::selector::Candidate;
use crate::selector::WeightedSelector;
use crate::store::SessionRecord;
use crate::store::Store;
use crate::store::load_within;
use crate::store::record_session_within;
use crate::store::save_within;
use crate::types::content_type::ContentType;
use crate::types::mastery_table::MasteryTable;
use crate::types::timestamp::Timestamp;
use crate::types::user_id::UserId;
use crate::types::word::Word;
use crate::types::word_stat::WordStat;

#[derive(Clone, Debug)]
pub struct SessionOptions {
    /// Bound on each load, save, and score flush.
    pub store_timeout: Duration,
    /// Seed for the selector. Draws are random when absent.
    pub seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            store_timeout: config.store_timeout(),
            seed: None,
        }
    }
}

/// The outcome of answering the current word.
#[derive(Clone, Debug)]
pub struct Answer {
    pub word: Word,
    pub was_correct: bool,
    /// The word's stats after the answer, including its new weight.
    pub stat: WordStat,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    pub correct: u64,
    pub total: u64,
    /// Whether the last mastery table reached the store.
    pub table_saved: bool,
    /// Whether the counters reached the score store.
    pub score_recorded: bool,
}

/// One memory test over a deck, for one user in one content type.
///
/// Every answer updates the mastery table and queues a save of the whole
/// table. Saves happen in the background, so a slow store never holds up
/// the next question. Call [`Session::end`] to flush the session's score.
///
/// If the stored table could not be loaded at the start, nothing is saved
/// until a later load succeeds, and the session's entries are then laid
/// over the stored table rather than replacing it.
pub struct Session {
    user: UserId,
    content_type: ContentType,
    store: Arc<dyn Store>,
    store_timeout: Duration,
    selector: WeightedSelector,
    table: MasteryTable,
    candidates: Vec<Candidate>,
    current: Option<usize>,
    correct: u64,
    total: u64,
    started_at: Timestamp,
    writer: Option<Writer>,
    /// The outcome of the writer's most recent save.
    save_status: watch::Receiver<Option<ErrorReport>>,
}

struct Writer {
    tx: watch::Sender<MasteryTable>,
    handle: JoinHandle<()>,
}

impl Session {
    /// Start a session. If the mastery table cannot be loaded, the session
    /// starts from an empty table, where every word has the baseline weight.
    pub async fn start(
        store: Arc<dyn Store>,
        user: UserId,
        content_type: ContentType,
        words: Vec<Word>,
        options: SessionOptions,
    ) -> Self {
        let started_at = Timestamp::now();
        let load = load_within(
            store.clone(),
            user.clone(),
            content_type,
            options.store_timeout,
        );
        let (table, loaded) = match load.await {
            Ok(table) => (table, true),
            Err(e) => {
                log::warn!(
                    "Could not load mastery for ({user}, {content_type}), starting without it: {e}"
                );
                (MasteryTable::new(), false)
            }
        };
        let candidates: Vec<Candidate> = words
            .into_iter()
            .map(|word| {
                let weight = table.weight_of(&word.id);
                Candidate { word, weight }
            })
            .collect();
        log::debug!(
            "Session started for ({user}, {content_type}) with {} words.",
            candidates.len()
        );
        let selector = match options.seed {
            Some(seed) => WeightedSelector::seeded(seed),
            None => WeightedSelector::new(),
        };
        let (status_tx, save_status) = watch::channel(None);
        let persister = Persister {
            store: store.clone(),
            user: user.clone(),
            content_type,
            limit: options.store_timeout,
            base: loaded.then(MasteryTable::new),
            status: status_tx,
        };
        let writer = spawn_writer(persister, table.clone());
        Self {
            user,
            content_type,
            store,
            store_timeout: options.store_timeout,
            selector,
            table,
            candidates,
            current: None,
            correct: 0,
            total: 0,
            started_at,
            writer: Some(writer),
            save_status,
        }
    }

    /// Pick the next word to present. Fails with
    /// [`ErrorKind::EmptyCandidateSet`](crate::error::ErrorKind::EmptyCandidateSet)
    /// when the deck has no words.
    pub fn next_word(&mut self) -> Fallible<&Word> {
        let index = self.selector.pick(&self.candidates)?;
        self.current = Some(index);
        let candidate = &self.candidates[index];
        log::debug!(
            "Picked {} (weight {}).",
            candidate.word.id,
            candidate.weight
        );
        Ok(&candidate.word)
    }

    /// The word awaiting an answer, if any.
    pub fn current_word(&self) -> Option<&Word> {
        self.current.map(|index| &self.candidates[index].word)
    }

    /// Whether `input` is the right answer for the current word.
    pub fn check_answer(&self, input: &str) -> Fallible<bool> {
        match self.current_word() {
            Some(word) => Ok(word.is_correct_answer(input)),
            None => fail("no word is awaiting an answer."),
        }
    }

    /// Check `input` against the current word and record the result.
    pub fn submit(&mut self, input: &str) -> Fallible<Answer> {
        let was_correct = self.check_answer(input)?;
        self.answer(was_correct)
    }

    /// Record an answer for the current word.
    pub fn answer(&mut self, was_correct: bool) -> Fallible<Answer> {
        let Some(index) = self.current.take() else {
            return fail("no word is awaiting an answer.");
        };
        self.total += 1;
        if was_correct {
            self.correct += 1;
        }
        let word = self.candidates[index].word.clone();
        let stat = self.table.record_answer(&word.id, was_correct);
        for candidate in self.candidates.iter_mut() {
            if candidate.word.id == word.id {
                candidate.weight = stat.weight;
            }
        }
        log::debug!(
            "{} {} weight={} correct={} incorrect={}",
            word.id,
            if was_correct { "correct" } else { "incorrect" },
            stat.weight,
            stat.correct_count,
            stat.incorrect_count
        );
        self.queue_save();
        Ok(Answer {
            word,
            was_correct,
            stat,
        })
    }

    /// Finish the session: wait for the last save, then add the session's
    /// counters to the score store. Consumes the session, so this runs at
    /// most once.
    pub async fn end(mut self) -> Fallible<SessionSummary> {
        if let Some(writer) = self.writer.take() {
            // Closing the channel lets the writer drain and stop.
            drop(writer.tx);
            writer.handle.await?;
        }
        let table_saved = self.save_status.borrow().is_none();
        let ended_at = Timestamp::now();
        let mut score_recorded = false;
        if self.total > 0 {
            let record = SessionRecord {
                started_at: self.started_at,
                ended_at,
                correct: self.correct,
                total: self.total,
            };
            let flush = record_session_within(
                self.store.clone(),
                self.user.clone(),
                self.content_type,
                record,
                self.store_timeout,
            );
            match flush.await {
                Ok(()) => score_recorded = true,
                Err(e) => log::error!(
                    "Could not record session for ({}, {}): {e}",
                    self.user,
                    self.content_type
                ),
            }
        }
        log::debug!(
            "Session ended for ({}, {}): {}/{} correct.",
            self.user,
            self.content_type,
            self.correct,
            self.total
        );
        Ok(SessionSummary {
            started_at: self.started_at,
            ended_at,
            correct: self.correct,
            total: self.total,
            table_saved,
            score_recorded,
        })
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn table(&self) -> &MasteryTable {
        &self.table
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn session_correct(&self) -> u64 {
        self.correct
    }

    pub fn session_total(&self) -> u64 {
        self.total
    }

    /// The error from the most recent save, if it failed. Cleared by the
    /// next save that succeeds.
    pub fn last_save_error(&self) -> Option<ErrorReport> {
        self.save_status.borrow().clone()
    }

    fn queue_save(&self) {
        if let Some(writer) = &self.writer {
            writer.tx.send_replace(self.table.clone());
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.writer.is_some() && self.total > 0 {
            log::warn!(
                "Session for ({}, {}) dropped without being ended, its score was not recorded.",
                self.user,
                self.content_type
            );
        }
    }
}

/// Spawn the task that persists tables. It always writes the newest table it
/// has been sent, so a burst of answers costs one save, and saves can never
/// land out of order. A failed save is retried by the next one, since every
/// save carries the whole table.
fn spawn_writer(mut persister: Persister, initial: MasteryTable) -> Writer {
    let (tx, mut rx) = watch::channel(initial);
    let handle = tokio::spawn(async move {
        let mut unsaved: Option<MasteryTable> = None;
        while rx.changed().await.is_ok() {
            let table: MasteryTable = rx.borrow_and_update().clone();
            unsaved = persister.persist(table).await;
        }
        // No answer is coming to retry a failed final save, so try once more.
        if let Some(table) = unsaved {
            persister.persist(table).await;
        }
    });
    Writer { tx, handle }
}

struct Persister {
    store: Arc<dyn Store>,
    user: UserId,
    content_type: ContentType,
    limit: Duration,
    /// The stored table that session entries are laid over. `None` until a
    /// load has succeeded.
    base: Option<MasteryTable>,
    status: watch::Sender<Option<ErrorReport>>,
}

impl Persister {
    /// Save a table, returning it back if the save failed.
    async fn persist(&mut self, table: MasteryTable) -> Option<MasteryTable> {
        match self.try_persist(&table).await {
            Ok(()) => {
                log::debug!("Saved mastery for ({}, {}).", self.user, self.content_type);
                self.status.send_replace(None);
                None
            }
            Err(e) => {
                log::error!(
                    "Could not save mastery for ({}, {}): {e}",
                    self.user,
                    self.content_type
                );
                self.status.send_replace(Some(e));
                Some(table)
            }
        }
    }

    async fn try_persist(&mut self, table: &MasteryTable) -> Fallible<()> {
        if self.base.is_none() {
            let stored = load_within(
                self.store.clone(),
                self.user.clone(),
                self.content_type,
                self.limit,
            )
            .await?;
            log::info!(
                "Loaded {} stored entries for ({}, {}), merging the session into them.",
                stored.len(),
                self.user,
                self.content_type
            );
            self.base = Some(stored);
        }
        let mut merged = self.base.clone().unwrap_or_default();
        merged.merge(table);
        save_within(
            self.store.clone(),
            self.user.clone(),
            self.content_type,
            merged,
            self.limit,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::thread::sleep;
    use std::time::Instant;

    use super::*;
    use crate::error::ErrorKind;
    use crate::error::ErrorReport;
    use crate::store::MasteryStore;
    use crate::store::ScoreStore;
    use crate::store::memory::MemoryStore;
    use crate::types::memory_score::MemoryScore;
    use crate::types::weight::Weight;
    use crate::types::word::WordId;

    fn words() -> Vec<Word> {
        vec![
            Word::new("w1", "食べる", "たべる", "to eat"),
            Word::new("w2", "飲む", "のむ", "to drink"),
        ]
    }

    fn user() -> UserId {
        UserId::new("1").unwrap()
    }

    fn options(seed: u64) -> SessionOptions {
        SessionOptions {
            store_timeout: Duration::from_millis(200),
            seed: Some(seed),
        }
    }

    /// A store whose every operation fails, and which counts save attempts.
    #[derive(Default)]
    struct BrokenStore {
        saves: AtomicUsize,
    }

    impl MasteryStore for BrokenStore {
        fn load(&self, _: &UserId, _: ContentType) -> Fallible<MasteryTable> {
            Err(ErrorReport::with_kind(
                ErrorKind::PersistenceUnavailable,
                "connection refused",
            ))
        }

        fn save(&self, _: &UserId, _: ContentType, _: &MasteryTable) -> Fallible<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            fail("connection refused")
        }
    }

    impl ScoreStore for BrokenStore {
        fn record_session(
            &self,
            _: &UserId,
            _: ContentType,
            _: &SessionRecord,
        ) -> Fallible<()> {
            fail("connection refused")
        }

        fn memory_score(&self, _: &UserId, _: ContentType) -> Fallible<MemoryScore> {
            fail("connection refused")
        }
    }

    /// A store that takes far longer to load than the session allows.
    struct SlowStore;

    impl MasteryStore for SlowStore {
        fn load(&self, _: &UserId, _: ContentType) -> Fallible<MasteryTable> {
            sleep(Duration::from_millis(500));
            let mut table = MasteryTable::new();
            table.record_answer(&WordId::new("w1"), false);
            Ok(table)
        }

        fn save(&self, _: &UserId, _: ContentType, _: &MasteryTable) -> Fallible<()> {
            Ok(())
        }
    }

    impl ScoreStore for SlowStore {
        fn record_session(
            &self,
            _: &UserId,
            _: ContentType,
            _: &SessionRecord,
        ) -> Fallible<()> {
            Ok(())
        }

        fn memory_score(&self, _: &UserId, _: ContentType) -> Fallible<MemoryScore> {
            Ok(MemoryScore::default())
        }
    }

    /// Wraps a memory store, failing its first few loads and saves, and
    /// optionally taking its time over each save.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        failing_loads: AtomicUsize,
        failing_saves: AtomicUsize,
        save_delay: Duration,
        saves: AtomicUsize,
    }

    fn take_failure(remaining: &AtomicUsize) -> bool {
        remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    impl MasteryStore for FlakyStore {
        fn load(&self, user: &UserId, content_type: ContentType) -> Fallible<MasteryTable> {
            if take_failure(&self.failing_loads) {
                return Err(ErrorReport::with_kind(
                    ErrorKind::PersistenceUnavailable,
                    "connection reset",
                ));
            }
            self.inner.load(user, content_type)
        }

        fn save(
            &self,
            user: &UserId,
            content_type: ContentType,
            table: &MasteryTable,
        ) -> Fallible<()> {
            sleep(self.save_delay);
            self.saves.fetch_add(1, Ordering::SeqCst);
            if take_failure(&self.failing_saves) {
                return fail("connection reset");
            }
            self.inner.save(user, content_type, table)
        }
    }

    impl ScoreStore for FlakyStore {
        fn record_session(
            &self,
            user: &UserId,
            content_type: ContentType,
            record: &SessionRecord,
        ) -> Fallible<()> {
            self.inner.record_session(user, content_type, record)
        }

        fn memory_score(&self, user: &UserId, content_type: ContentType) -> Fallible<MemoryScore> {
            self.inner.memory_score(user, content_type)
        }
    }

    /// Give the background writer time until `done` holds.
    async fn settle(mut done: impl FnMut() -> bool) {
        for _ in 0..400 {
            if done() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("the writer never settled");
    }

    #[tokio::test]
    async fn test_repeated_misses() -> Fallible<()> {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::start(
            store.clone(),
            user(),
            ContentType::CustomDecks,
            words(),
            options(3),
        )
        .await;
        let w1 = WordId::new("w1");
        let mut w1_misses = 0;
        while w1_misses < 3 {
            let picked = session.next_word()?.id.clone();
            session.answer(false)?;
            if picked == w1 {
                w1_misses += 1;
            }
        }
        let stat = *session.table().get(&w1).unwrap();
        assert_eq!(stat.weight.value(), 1000.0);
        assert_eq!(stat.incorrect_count, 3);
        assert_eq!(stat.correct_count, 0);
        assert_eq!(session.candidates()[0].weight.value(), 1000.0);

        let table = session.table().clone();
        let total = session.session_total();
        let summary = session.end().await?;
        assert_eq!(summary.correct, 0);
        assert_eq!(summary.total, total);
        assert!(summary.table_saved);
        assert!(summary.score_recorded);
        assert_eq!(store.load(&user(), ContentType::CustomDecks)?, table);
        Ok(())
    }

    #[tokio::test]
    async fn test_stored_weights_are_used() -> Fallible<()> {
        let store = Arc::new(MemoryStore::new());
        let mut table = MasteryTable::new();
        table.insert(
            WordId::new("w2"),
            WordStat {
                correct_count: 0,
                incorrect_count: 2,
                weight: Weight::new(100.0)?,
            },
        );
        store.save(&user(), ContentType::JlptDecks, &table)?;
        let session = Session::start(
            store.clone(),
            user(),
            ContentType::JlptDecks,
            words(),
            options(0),
        )
        .await;
        let weights: Vec<f64> = session
            .candidates()
            .iter()
            .map(|c| c.weight.value())
            .collect();
        assert_eq!(weights, vec![1.0, 100.0]);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_failure_falls_back_to_baseline() -> Fallible<()> {
        let store = Arc::new(BrokenStore::default());
        let mut session = Session::start(
            store.clone(),
            user(),
            ContentType::CustomDecks,
            words(),
            options(0),
        )
        .await;
        assert!(session.table().is_empty());
        for candidate in session.candidates() {
            assert_eq!(candidate.weight, Weight::BASELINE);
        }
        // Failed saves do not get in the way of answering.
        for _ in 0..5 {
            session.next_word()?;
            session.answer(true)?;
        }
        settle(|| session.last_save_error().is_some()).await;
        let err = session.last_save_error().unwrap();
        assert_eq!(err.kind(), ErrorKind::PersistenceUnavailable);
        let summary = session.end().await?;
        assert_eq!(summary.correct, 5);
        assert!(!summary.table_saved);
        assert!(!summary.score_recorded);
        // The stored table was never read, so it is never overwritten.
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_load_keeps_stored_entries() -> Fallible<()> {
        let store = Arc::new(FlakyStore {
            failing_loads: AtomicUsize::new(1),
            ..FlakyStore::default()
        });
        let mut stored = MasteryTable::new();
        for n in 0..50 {
            stored.record_answer(&WordId::new(format!("old{n}")), false);
        }
        store.inner.save(&user(), ContentType::CustomDecks, &stored)?;

        let mut session = Session::start(
            store.clone(),
            user(),
            ContentType::CustomDecks,
            words(),
            options(0),
        )
        .await;
        assert!(session.table().is_empty());
        let answered = session.next_word()?.id.clone();
        session.answer(false)?;
        let summary = session.end().await?;
        assert!(summary.table_saved);

        let after = store.inner.load(&user(), ContentType::CustomDecks)?;
        assert_eq!(after.len(), 51);
        for (word_id, stat) in &stored {
            assert_eq!(after.get(word_id), Some(stat));
        }
        assert_eq!(after.weight_of(&answered).value(), 10.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_save_is_retried_by_next_answer() -> Fallible<()> {
        let store = Arc::new(FlakyStore {
            failing_saves: AtomicUsize::new(1),
            ..FlakyStore::default()
        });
        let mut session = Session::start(
            store.clone(),
            user(),
            ContentType::ProvidedDecks,
            words(),
            options(2),
        )
        .await;
        session.next_word()?;
        session.answer(false)?;
        settle(|| session.last_save_error().is_some()).await;
        assert!(store.inner.load(&user(), ContentType::ProvidedDecks)?.is_empty());

        session.next_word()?;
        session.answer(false)?;
        settle(|| session.last_save_error().is_none()).await;
        let stored = store.inner.load(&user(), ContentType::ProvidedDecks)?;
        assert_eq!(&stored, session.table());

        let summary = session.end().await?;
        assert!(summary.table_saved);
        assert_eq!(store.saves.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_slow_save_does_not_block_answers() -> Fallible<()> {
        let store = Arc::new(FlakyStore {
            save_delay: Duration::from_millis(200),
            ..FlakyStore::default()
        });
        let mut session = Session::start(
            store.clone(),
            user(),
            ContentType::JlptDecks,
            words(),
            SessionOptions {
                store_timeout: Duration::from_secs(2),
                seed: Some(4),
            },
        )
        .await;
        session.next_word()?;
        session.answer(false)?;
        // Let the writer start on the first save.
        tokio::time::sleep(Duration::from_millis(10)).await;

        let started = Instant::now();
        for _ in 0..10 {
            session.next_word()?;
            session.answer(false)?;
        }
        assert!(started.elapsed() < Duration::from_millis(100));

        let table = session.table().clone();
        let summary = session.end().await?;
        assert!(summary.table_saved);
        assert_eq!(store.inner.load(&user(), ContentType::JlptDecks)?, table);
        Ok(())
    }

    #[tokio::test]
    async fn test_missed_word_dominates_selection() -> Fallible<()> {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::start(
            store,
            user(),
            ContentType::CustomDecks,
            words(),
            options(7),
        )
        .await;
        let w1 = WordId::new("w1");
        let mut misses = 0;
        while misses < 3 {
            let picked = session.next_word()?.id.clone();
            let was_correct = picked != w1;
            session.answer(was_correct)?;
            if !was_correct {
                misses += 1;
            }
        }
        assert_eq!(session.table().weight_of(&w1).value(), 1000.0);
        assert_eq!(session.table().weight_of(&WordId::new("w2")), Weight::BASELINE);

        let mut w1_picks = 0;
        for _ in 0..1000 {
            if session.next_word()?.id == w1 {
                w1_picks += 1;
            }
        }
        // Expected share is 1000 / 1001.
        assert!(w1_picks > 980, "w1 picked {w1_picks} times");
        session.end().await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_load_timeout_falls_back_to_baseline() -> Fallible<()> {
        let session = Session::start(
            Arc::new(SlowStore),
            user(),
            ContentType::CustomDecks,
            words(),
            SessionOptions {
                store_timeout: Duration::from_millis(20),
                seed: Some(0),
            },
        )
        .await;
        assert!(session.table().is_empty());
        assert_eq!(session.candidates()[0].weight, Weight::BASELINE);
        Ok(())
    }

    #[tokio::test]
    async fn test_end_records_score() -> Fallible<()> {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::start(
            store.clone(),
            user(),
            ContentType::KanaPractice,
            words(),
            options(11),
        )
        .await;
        session.next_word()?;
        session.answer(true)?;
        session.next_word()?;
        session.answer(false)?;
        session.next_word()?;
        session.answer(true)?;
        let summary = session.end().await?;
        assert_eq!((summary.correct, summary.total), (2, 3));
        let score = store.memory_score(&user(), ContentType::KanaPractice)?;
        assert_eq!(score, MemoryScore { score: 2, total: 3 });
        assert_eq!(store.sessions(&user(), ContentType::KanaPractice)?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_session_records_nothing() -> Fallible<()> {
        let store = Arc::new(MemoryStore::new());
        let session = Session::start(
            store.clone(),
            user(),
            ContentType::KanaPractice,
            words(),
            options(0),
        )
        .await;
        let summary = session.end().await?;
        assert!(!summary.score_recorded);
        assert!(store.sessions(&user(), ContentType::KanaPractice)?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_deck() -> Fallible<()> {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::start(
            store,
            user(),
            ContentType::CustomDecks,
            Vec::new(),
            options(0),
        )
        .await;
        let err = session.next_word().err().unwrap();
        assert_eq!(err.kind(), ErrorKind::EmptyCandidateSet);
        Ok(())
    }

    #[tokio::test]
    async fn test_answer_requires_a_picked_word() -> Fallible<()> {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::start(
            store,
            user(),
            ContentType::CustomDecks,
            words(),
            options(0),
        )
        .await;
        assert!(session.answer(true).is_err());
        assert!(session.check_answer("たべる").is_err());
        session.next_word()?;
        session.answer(true)?;
        // Each pick takes exactly one answer.
        assert!(session.answer(true).is_err());
        assert_eq!(session.session_total(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_submit() -> Fallible<()> {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::start(
            store,
            user(),
            ContentType::CustomDecks,
            words(),
            options(5),
        )
        .await;
        let word = session.next_word()?.clone();
        let answer = session.submit(&format!(" {} ", word.answer_form))?;
        assert!(answer.was_correct);
        assert_eq!(answer.stat.correct_count, 1);
        assert_eq!(answer.stat.weight, Weight::BASELINE);
        session.next_word()?;
        let answer = session.submit("")?;
        assert!(!answer.was_correct);
        assert_eq!(answer.stat.weight.value(), 10.0);
        Ok(())
    }
}
