//! Per-user dialogue sessions and their in-memory store.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Local;
use uuid::Uuid;

use dealscout_llm::ChatMessage;

use crate::error::DialogueError;
use crate::types::DialogueState;

/// Everything remembered about one user's conversation.
///
/// Slot fields fill once and never overwrite (`fill_*`); a completed
/// search discards the whole session, so there is no reset path.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: Uuid,
    pub state: DialogueState,
    /// The raw product utterance that opened the dialogue.
    pub product_query: String,
    /// True for a concrete branded item, false for a category request.
    pub is_specific: bool,
    pub brand: Option<String>,
    pub budget: Option<String>,
    pub priority: Option<String>,
    pub location: Option<String>,
    /// Recent user/assistant turns, oldest first, bounded by the store.
    pub history: Vec<ChatMessage>,
    pub started_at: i64,
    pub last_turn_at: i64,
}

impl Session {
    pub fn new() -> Self {
        let now = Local::now().timestamp();
        Self {
            id: Uuid::new_v4(),
            state: DialogueState::Idle,
            product_query: String::new(),
            is_specific: false,
            brand: None,
            budget: None,
            priority: None,
            location: None,
            history: Vec::new(),
            started_at: now,
            last_turn_at: now,
        }
    }

    /// Mark activity on this session.
    pub fn touch(&mut self) {
        self.last_turn_at = Local::now().timestamp();
    }

    pub fn fill_brand(&mut self, value: impl Into<String>) {
        if self.brand.is_none() {
            self.brand = Some(value.into());
        }
    }

    pub fn fill_budget(&mut self, value: impl Into<String>) {
        if self.budget.is_none() {
            self.budget = Some(value.into());
        }
    }

    pub fn fill_priority(&mut self, value: impl Into<String>) {
        if self.priority.is_none() {
            self.priority = Some(value.into());
        }
    }

    pub fn fill_location(&mut self, value: impl Into<String>) {
        if self.location.is_none() {
            self.location = Some(value.into());
        }
    }

    /// Next unfilled slot for a generic request, in fixed asking order:
    /// brand, then budget, then priority. `None` means ready to search.
    pub fn first_missing_slot(&self) -> Option<DialogueState> {
        if self.brand.is_none() {
            Some(DialogueState::AskingBrand)
        } else if self.budget.is_none() {
            Some(DialogueState::AskingBudget)
        } else if self.priority.is_none() {
            Some(DialogueState::AskingPriority)
        } else {
            None
        }
    }

    /// Append a message, dropping the oldest entries beyond `cap`.
    pub fn push_history(&mut self, message: ChatMessage, cap: usize) {
        self.history.push(message);
        if self.history.len() > cap {
            let excess = self.history.len() - cap;
            self.history.drain(..excess);
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe map of user id to session.
///
/// The lock is only ever held for synchronous map work; nothing awaits
/// while holding it.
pub struct SessionStore {
    sessions: Mutex<HashMap<i64, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<i64, Session>>, DialogueError> {
        self.sessions
            .lock()
            .map_err(|e| DialogueError::StorageError(e.to_string()))
    }

    /// Run one turn's state transition atomically. The closure receives
    /// the user's session (created fresh on first contact) and returns
    /// the session to keep, or `None` to discard it.
    pub fn apply<T, F>(&self, user_id: i64, f: F) -> Result<T, DialogueError>
    where
        F: FnOnce(Session) -> (Option<Session>, T),
    {
        let mut sessions = self.lock()?;
        let session = sessions.remove(&user_id).unwrap_or_default();
        let (keep, out) = f(session);
        if let Some(session) = keep {
            sessions.insert(user_id, session);
        }
        Ok(out)
    }

    /// Record a generated assistant reply in the user's history. A no-op
    /// when the session was discarded in the meantime.
    pub fn append_assistant(
        &self,
        user_id: i64,
        text: &str,
        cap: usize,
    ) -> Result<(), DialogueError> {
        let mut sessions = self.lock()?;
        if let Some(session) = sessions.get_mut(&user_id) {
            session.push_history(ChatMessage::assistant(text), cap);
        }
        Ok(())
    }

    /// Snapshot of a user's session, if one exists.
    pub fn get(&self, user_id: i64) -> Result<Option<Session>, DialogueError> {
        Ok(self.lock()?.get(&user_id).cloned())
    }

    /// Drop a user's session entirely.
    pub fn remove(&self, user_id: i64) -> Result<(), DialogueError> {
        self.lock()?.remove(&user_id);
        Ok(())
    }

    pub fn len(&self) -> Result<usize, DialogueError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, DialogueError> {
        Ok(self.lock()?.is_empty())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
