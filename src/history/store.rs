//! Brew history store.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::HistoryError;
use crate::storage::KeyValueStore;
use crate::types::{BrewSession, SessionDraft};

/// Storage key holding the serialized history.
pub const HISTORY_STORAGE_KEY: &str = "brew_history";

/// Length of the random part of a session id.
const ID_SUFFIX_LEN: usize = 7;

// ============================================================================
// HistorySnapshot
// ============================================================================

/// Read-only view of the store published to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistorySnapshot {
    /// Sessions, newest first
    pub sessions: Arc<Vec<BrewSession>>,
    /// True while a load is in flight
    pub is_loading: bool,
    /// Message of the last failed operation, cleared by the next success
    pub error: Option<String>,
}

// ============================================================================
// BrewHistoryStore
// ============================================================================

/// Owner of the brew session collection.
///
/// Mutations take `&mut self`; callers sharing a store must serialize access
/// themselves.
pub struct BrewHistoryStore<S> {
    storage: S,
    key: String,
    sessions: Arc<Vec<BrewSession>>,
    is_loading: bool,
    last_error: Option<String>,
    snapshot_tx: watch::Sender<HistorySnapshot>,
}

impl<S: KeyValueStore> BrewHistoryStore<S> {
    /// Creates an empty store. Call [`load`](Self::load) to read persisted
    /// sessions.
    pub fn new(storage: S) -> Self {
        let (snapshot_tx, _) = watch::channel(HistorySnapshot::default());
        Self {
            storage,
            key: HISTORY_STORAGE_KEY.to_string(),
            sessions: Arc::new(Vec::new()),
            is_loading: false,
            last_error: None,
            snapshot_tx,
        }
    }

    /// Creates a store and loads the persisted sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted history cannot be read.
    pub async fn open(storage: S) -> Result<Self, HistoryError> {
        let mut store = Self::new(storage);
        store.load().await?;
        Ok(store)
    }

    /// Uses a storage key other than [`HISTORY_STORAGE_KEY`].
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Replaces the in-memory collection with the persisted one.
    ///
    /// A missing snapshot loads as empty, and so does one that is not a JSON
    /// list. List entries that do not decode are skipped.
    ///
    /// Returns the number of sessions loaded.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Load` if the storage read fails; the previous
    /// collection is kept in that case.
    pub async fn load(&mut self) -> Result<usize, HistoryError> {
        self.is_loading = true;
        self.publish();

        let outcome = match self.storage.get(&self.key).await {
            Ok(raw) => {
                let sessions = raw.as_deref().map(decode_history).unwrap_or_default();
                debug!("Loaded {} brew sessions", sessions.len());
                self.sessions = Arc::new(sessions);
                self.last_error = None;
                Ok(self.sessions.len())
            }
            Err(e) => {
                warn!("Failed to load brew history: {}", e);
                let err = HistoryError::Load(e);
                self.last_error = Some(err.user_message().to_string());
                Err(err)
            }
        };

        self.is_loading = false;
        self.publish();
        outcome
    }

    /// Re-reads the persisted history, discarding the in-memory copy.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub async fn refresh(&mut self) -> Result<usize, HistoryError> {
        self.load().await
    }

    /// Records a new session at the front of the history.
    ///
    /// The id and creation time are assigned here. The draft is not
    /// validated; callers check required fields such as the bean name.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated history cannot be written; the
    /// in-memory collection is unchanged in that case.
    pub async fn add_session(&mut self, draft: SessionDraft) -> Result<BrewSession, HistoryError> {
        let id = self.unique_id();
        let session = draft.into_session(id, Utc::now());

        let mut updated = Vec::with_capacity(self.sessions.len() + 1);
        updated.push(session.clone());
        updated.extend(self.sessions.iter().cloned());

        self.persist(&updated).await?;
        self.commit(updated);
        info!("Saved brew session {} ({})", session.id, session.bean_name);
        Ok(session)
    }

    /// Removes the session with `id`.
    ///
    /// Returns false, without writing anything, if no session has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated history cannot be written; the
    /// in-memory collection is unchanged in that case.
    pub async fn delete_session(&mut self, id: &str) -> Result<bool, HistoryError> {
        if !self.sessions.iter().any(|s| s.id == id) {
            debug!("No brew session with id {}", id);
            return Ok(false);
        }

        let updated: Vec<BrewSession> = self
            .sessions
            .iter()
            .filter(|s| s.id != id)
            .cloned()
            .collect();

        self.persist(&updated).await?;
        self.commit(updated);
        info!("Deleted brew session {}", id);
        Ok(true)
    }

    /// Removes the persisted history and empties the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted history cannot be removed; the
    /// in-memory collection is unchanged in that case.
    pub async fn clear_history(&mut self) -> Result<(), HistoryError> {
        if let Err(e) = self.storage.delete(&self.key).await {
            let err = HistoryError::Clear(e);
            self.fail(&err);
            return Err(err);
        }

        self.commit(Vec::new());
        info!("Cleared brew history");
        Ok(())
    }

    /// Sessions, newest first.
    pub fn sessions(&self) -> &[BrewSession] {
        &self.sessions
    }

    /// Looks up a session by id.
    pub fn get(&self, id: &str) -> Option<&BrewSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Number of sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if there are no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Returns true while a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message of the last failed operation.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            sessions: Arc::clone(&self.sessions),
            is_loading: self.is_loading,
            error: self.last_error.clone(),
        }
    }

    /// Subscribes to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<HistorySnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Writes `sessions` as the full persisted collection.
    async fn persist(&mut self, sessions: &[BrewSession]) -> Result<(), HistoryError> {
        let result = match serde_json::to_string(sessions) {
            Ok(json) => self
                .storage
                .set(&self.key, &json)
                .await
                .map_err(HistoryError::Save),
            Err(e) => Err(HistoryError::Encode(e)),
        };

        if let Err(err) = &result {
            self.fail(err);
        }
        result
    }

    /// Makes `sessions` the authoritative collection.
    fn commit(&mut self, sessions: Vec<BrewSession>) {
        self.sessions = Arc::new(sessions);
        self.last_error = None;
        self.publish();
    }

    fn fail(&mut self, err: &HistoryError) {
        warn!("{}: {}", err, error_chain(err));
        self.last_error = Some(err.user_message().to_string());
        self.publish();
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }

    /// Generates an id that no current session uses.
    fn unique_id(&self) -> String {
        loop {
            let id = generate_session_id();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

/// Returns `"<unix millis>-<random suffix>"`.
fn generate_session_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        &suffix[..ID_SUFFIX_LEN]
    )
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut parts = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

/// Decodes a persisted snapshot, falling back to an empty history.
fn decode_history(raw: &str) -> Vec<BrewSession> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!("Stored brew history is not a list, starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!("Stored brew history is corrupt, starting empty: {}", e);
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<BrewSession>(item) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Skipping unreadable brew session #{}: {}", index, e);
                None
            }
        })
        .filter(|session| {
            let fresh = seen.insert(session.id.clone());
            if !fresh {
                warn!("Skipping duplicate brew session id {}", session.id);
            }
            fresh
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
