//! Shared types for the dialogue engine.

use serde::{Deserialize, Serialize};

/// State of the per-user dialogue state machine.
///
/// `Idle` is initial. There is no terminal state: reaching a complete
/// query discards the session, so the next turn starts a fresh `Idle`
/// session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    /// Waiting for a product request.
    #[default]
    Idle,
    /// Waiting for a brand or model preference.
    AskingBrand,
    /// Waiting for a budget.
    AskingBudget,
    /// Waiting for the customer's priority (quality / price / brand).
    AskingPriority,
    /// Waiting for a delivery area.
    AskingLocation,
}

/// Classification of an idle-state utterance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    /// A specific branded item ("אייפון 15 פרו").
    Specific,
    /// A generic product category ("טלפון").
    Generic,
    /// Anything else: small talk, questions, off-topic chatter.
    Chat,
}

/// Slot values harvested from a single utterance. Any subset may be
/// present; all three absent means the utterance is a contextual answer
/// to whatever the dialogue is currently asking.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedSlots {
    pub budget: Option<String>,
    pub brand: Option<String>,
    pub location: Option<String>,
}

impl ExtractedSlots {
    /// True when no slot was found in the utterance.
    pub fn is_empty(&self) -> bool {
        self.budget.is_none() && self.brand.is_none() && self.location.is_none()
    }
}

/// Outcome of one dialogue turn, handed back to the transport layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReply {
    /// User-facing reply text (generated or templated).
    pub text: String,
    /// True when the accumulated slots form a complete query.
    pub should_search: bool,
    /// The assembled search query; present iff `should_search` is true.
    pub query: Option<String>,
}
