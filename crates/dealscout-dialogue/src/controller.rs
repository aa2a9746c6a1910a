//! The dialogue engine: one state-machine turn per user message.
//!
//! Each turn runs in three phases so the session lock is never held
//! across an await:
//!   1. take the session, run the pure transition, commit or discard;
//!   2. call the text backend (if a reply needs generating), unlocked;
//!   3. record the generated reply in the session history.

use std::sync::Arc;

use tracing::{debug, info};

use dealscout_core::config::ChatConfig;
use dealscout_llm::{ChatMessage, TextGenerator};

use crate::error::DialogueError;
use crate::extractor;
use crate::response::{self, ResponseGenerator};
use crate::session::{Session, SessionStore};
use crate::types::{DialogueState, Intent, TurnReply};

/// What a turn decided, before any text generation happens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TurnDisposition {
    /// The query is complete. Acknowledge and fire the search; the
    /// session is discarded.
    Ready { ack: String, query: String },
    /// A slot is still missing. Ask for it; `opening` marks the first
    /// question of a new dialogue.
    Ask { opening: bool },
    /// Idle small talk, no product request yet.
    Chat,
}

/// Pure state transition for one user utterance.
///
/// Touches timestamps, classifies or harvests, fills slots, and picks
/// the next state. No I/O, no locking, no text generation.
pub(crate) fn apply_turn(mut session: Session, text: &str) -> (Session, TurnDisposition) {
    session.touch();

    if session.state == DialogueState::Idle {
        return match extractor::classify(text) {
            Intent::Specific => {
                session.product_query = text.to_string();
                session.is_specific = true;
                if let Some(city) = extractor::harvest(text).location {
                    session.fill_location(city);
                    let query = build_specific_query(&session);
                    let ack = format!("מצוין! מחפש {text}...");
                    (session, TurnDisposition::Ready { ack, query })
                } else {
                    session.state = DialogueState::AskingLocation;
                    (session, TurnDisposition::Ask { opening: true })
                }
            }
            Intent::Generic => {
                session.product_query = text.to_string();
                session.is_specific = false;
                let slots = extractor::harvest(text);
                if let Some(budget) = slots.budget {
                    session.fill_budget(budget);
                }
                if let Some(brand) = slots.brand {
                    session.fill_brand(brand);
                }
                session.state = DialogueState::AskingBrand;
                (session, TurnDisposition::Ask { opening: true })
            }
            Intent::Chat => (session, TurnDisposition::Chat),
        };
    }

    merge_slots(&mut session, text);

    if session.is_specific {
        if let Some(location) = session.location.clone() {
            let query = build_specific_query(&session);
            let ack = format!("מעולה! מחפש {} באזור {}...", session.product_query, location);
            return (session, TurnDisposition::Ready { ack, query });
        }
        session.state = DialogueState::AskingLocation;
        return (session, TurnDisposition::Ask { opening: false });
    }

    match session.first_missing_slot() {
        None => {
            let query = build_generic_query(&session);
            let ack = format!("מצוין, יש לי את כל מה שצריך! מחפש {query}...");
            (session, TurnDisposition::Ready { ack, query })
        }
        Some(next) => {
            session.state = next;
            (session, TurnDisposition::Ask { opening: false })
        }
    }
}

/// Fill slots from whatever the utterance volunteers, never overwriting.
/// An utterance with no recognizable slot is taken verbatim as the
/// answer to the question currently being asked.
fn merge_slots(session: &mut Session, text: &str) {
    let slots = extractor::harvest(text);
    let contextual = slots.is_empty();

    if let Some(budget) = slots.budget {
        session.fill_budget(budget);
    }
    if let Some(brand) = slots.brand {
        session.fill_brand(brand);
    }
    if let Some(location) = slots.location {
        session.fill_location(location);
    }

    if contextual {
        match session.state {
            DialogueState::AskingBrand => session.fill_brand(text),
            DialogueState::AskingBudget => session.fill_budget(text),
            DialogueState::AskingPriority => session.fill_priority(text),
            DialogueState::AskingLocation => session.fill_location(text),
            DialogueState::Idle => {}
        }
    }
}

/// Search query for a generic request: the opening utterance, the brand,
/// and the budget as an upper bound.
fn build_generic_query(session: &Session) -> String {
    let mut parts = vec![session.product_query.clone()];
    if let Some(brand) = &session.brand {
        parts.push(brand.clone());
    }
    if let Some(budget) = &session.budget {
        parts.push(format!("עד {budget}"));
    }
    parts.join(" ")
}

/// Search query for a specific item: the opening utterance, with the
/// location appended unless it already appears in the text.
fn build_specific_query(session: &Session) -> String {
    match &session.location {
        Some(location)
            if !session
                .product_query
                .to_lowercase()
                .contains(&location.to_lowercase()) =>
        {
            format!("{} {}", session.product_query, location)
        }
        _ => session.product_query.clone(),
    }
}

/// Result of the locked phase of a turn.
enum Planned {
    Ready { ack: String, query: String },
    Converse { snapshot: Session, chat_only: bool, opening: bool },
}

/// Conversational front end over the per-user session store.
pub struct DialogueEngine {
    store: SessionStore,
    responder: ResponseGenerator,
    config: ChatConfig,
}

impl DialogueEngine {
    pub fn new(generator: Arc<dyn TextGenerator>, config: ChatConfig) -> Self {
        Self {
            store: SessionStore::new(),
            responder: ResponseGenerator::new(generator),
            config,
        }
    }

    /// Handle one user message and produce the reply for it.
    pub async fn process_turn(&self, user_id: i64, text: &str) -> Result<TurnReply, DialogueError> {
        if !self.config.enabled {
            return Err(DialogueError::Disabled);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(DialogueError::EmptyMessage);
        }
        if text.chars().count() > self.config.max_message_length {
            return Err(DialogueError::MessageTooLong(self.config.max_message_length));
        }

        let max_history = self.config.max_history;
        let planned = self.store.apply(user_id, |session| {
            let (mut session, disposition) = apply_turn(session, text);
            match disposition {
                TurnDisposition::Ready { ack, query } => (None, Planned::Ready { ack, query }),
                TurnDisposition::Ask { opening } => {
                    session.push_history(ChatMessage::user(text), max_history);
                    let snapshot = session.clone();
                    (
                        Some(session),
                        Planned::Converse { snapshot, chat_only: false, opening },
                    )
                }
                TurnDisposition::Chat => {
                    session.push_history(ChatMessage::user(text), max_history);
                    let snapshot = session.clone();
                    (
                        Some(session),
                        Planned::Converse { snapshot, chat_only: true, opening: false },
                    )
                }
            }
        })?;

        match planned {
            Planned::Ready { ack, query } => {
                info!(user_id, %query, "query complete, triggering search");
                Ok(TurnReply {
                    text: ack,
                    should_search: true,
                    query: Some(query),
                })
            }
            Planned::Converse { snapshot, chat_only, opening } => {
                let prompt = self.responder.build_prompt(&snapshot, chat_only);
                let text = match self.responder.generate(&prompt).await {
                    Ok(reply) => {
                        self.store.append_assistant(user_id, &reply, max_history)?;
                        reply
                    }
                    Err(e) => {
                        debug!(user_id, "generation failed, using template: {e}");
                        if chat_only {
                            response::fallback_chat(text)
                        } else {
                            response::fallback_question(&snapshot, opening)
                        }
                    }
                };
                Ok(TurnReply {
                    text,
                    should_search: false,
                    query: None,
                })
            }
        }
    }

    /// Snapshot of a user's session, if one exists.
    pub fn get_session(&self, user_id: i64) -> Result<Option<Session>, DialogueError> {
        self.store.get(user_id)
    }

    /// Forget everything about a user.
    pub fn clear_session(&self, user_id: i64) -> Result<(), DialogueError> {
        self.store.remove(user_id)
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> Result<usize, DialogueError> {
        self.store.len()
    }
}
