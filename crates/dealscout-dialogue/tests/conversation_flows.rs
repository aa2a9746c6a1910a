//! End-to-end dialogue flows through the public engine API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use dealscout_core::config::ChatConfig;
use dealscout_dialogue::{DialogueEngine, DialogueState};
use dealscout_llm::{ChatMessage, LlmError, NullGenerator, TextGenerator};

/// Backend stub that always answers with the same text and counts calls.
struct CannedGenerator {
    reply: String,
    calls: AtomicUsize,
}

impl CannedGenerator {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

fn engine_without_backend() -> DialogueEngine {
    DialogueEngine::new(Arc::new(NullGenerator), ChatConfig::default())
}

// ---- Generic flow ----

#[tokio::test]
async fn test_generic_flow_collects_all_slots_then_searches() {
    let engine = engine_without_backend();

    let reply = engine.process_turn(1, "טלפון עד 1500").await.unwrap();
    assert!(!reply.should_search);
    assert!(reply.query.is_none());

    let session = engine.get_session(1).unwrap().unwrap();
    assert_eq!(session.state, DialogueState::AskingBrand);
    assert_eq!(session.budget.as_deref(), Some("1500"));

    let reply = engine.process_turn(1, "סמסונג").await.unwrap();
    assert!(!reply.should_search);
    let session = engine.get_session(1).unwrap().unwrap();
    assert_eq!(session.state, DialogueState::AskingPriority);
    assert_eq!(session.brand.as_deref(), Some("סמסונג"));

    let reply = engine.process_turn(1, "מחיר").await.unwrap();
    assert!(reply.should_search);
    assert_eq!(reply.query.as_deref(), Some("טלפון עד 1500 סמסונג עד 1500"));

    // Completed search discards the session.
    assert!(engine.get_session(1).unwrap().is_none());
}

#[tokio::test]
async fn test_generic_flow_asks_every_slot_without_shortcuts() {
    let engine = engine_without_backend();

    engine.process_turn(2, "מקרר").await.unwrap();
    let session = engine.get_session(2).unwrap().unwrap();
    assert_eq!(session.state, DialogueState::AskingBrand);

    engine.process_turn(2, "בוש").await.unwrap();
    let session = engine.get_session(2).unwrap().unwrap();
    assert_eq!(session.state, DialogueState::AskingBudget);

    engine.process_turn(2, "עד 4000 שקל").await.unwrap();
    let session = engine.get_session(2).unwrap().unwrap();
    assert_eq!(session.state, DialogueState::AskingPriority);
    assert_eq!(session.budget.as_deref(), Some("4000"));

    let reply = engine.process_turn(2, "איכות").await.unwrap();
    assert!(reply.should_search);
    assert_eq!(reply.query.as_deref(), Some("מקרר בוש עד 4000"));
}

// ---- Specific flow ----

#[tokio::test]
async fn test_specific_item_with_location_fires_immediately() {
    let engine = engine_without_backend();

    let reply = engine.process_turn(3, "אייפון 15 פרו בתל אביב").await.unwrap();
    assert!(reply.should_search);
    assert_eq!(reply.query.as_deref(), Some("אייפון 15 פרו בתל אביב"));
    assert!(engine.get_session(3).unwrap().is_none());
}

#[tokio::test]
async fn test_specific_item_asks_location_then_searches() {
    let engine = engine_without_backend();

    let reply = engine.process_turn(4, "אייפון 15 פרו").await.unwrap();
    assert!(!reply.should_search);
    let session = engine.get_session(4).unwrap().unwrap();
    assert_eq!(session.state, DialogueState::AskingLocation);
    assert!(session.is_specific);

    let reply = engine.process_turn(4, "רמת גן").await.unwrap();
    assert!(reply.should_search);
    assert_eq!(reply.query.as_deref(), Some("אייפון 15 פרו רמת גן"));
    assert!(engine.get_session(4).unwrap().is_none());
}

// ---- Chat and refusals ----

#[tokio::test]
async fn test_off_topic_message_gets_refusal_and_fills_nothing() {
    let engine = engine_without_backend();

    let reply = engine.process_turn(5, "מה דעתך על פוליטיקה").await.unwrap();
    assert!(!reply.should_search);
    assert!(reply.query.is_none());
    assert_eq!(
        reply.text,
        "אני מתמחה רק בקניות והשוואת מחירים.\nמה תרצה לחפש?"
    );

    let session = engine.get_session(5).unwrap().unwrap();
    assert_eq!(session.state, DialogueState::Idle);
    assert!(session.product_query.is_empty());
    assert!(session.brand.is_none());
    assert!(session.budget.is_none());
    assert!(session.priority.is_none());
    assert!(session.location.is_none());
}

#[tokio::test]
async fn test_greeting_gets_template_without_backend() {
    let engine = engine_without_backend();
    let reply = engine.process_turn(6, "היי").await.unwrap();
    assert!(!reply.should_search);
    assert!(reply.text.contains("מה נחפש"));
}

// ---- Backend integration ----

#[tokio::test]
async fn test_generated_replies_are_used_and_recorded() {
    let generator = CannedGenerator::new("איזה מותג תרצה?");
    let engine = DialogueEngine::new(generator.clone(), ChatConfig::default());

    let reply = engine.process_turn(7, "טלפון").await.unwrap();
    assert_eq!(reply.text, "איזה מותג תרצה?");
    assert_eq!(generator.call_count(), 1);

    // History holds both sides of the turn.
    let session = engine.get_session(7).unwrap().unwrap();
    assert_eq!(session.history.len(), 2);
    assert_eq!(session.history[0].content, "טלפון");
    assert_eq!(session.history[1].content, "איזה מותג תרצה?");
}

#[tokio::test]
async fn test_readiness_reply_is_deterministic_even_with_backend() {
    let generator = CannedGenerator::new("תשובה מומצאת");
    let engine = DialogueEngine::new(generator.clone(), ChatConfig::default());

    let reply = engine.process_turn(8, "אייפון 15 פרו בחיפה").await.unwrap();
    assert!(reply.should_search);
    assert!(reply.text.starts_with("מצוין! מחפש"));
    // The completion turn never consults the backend.
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_history_is_capped() {
    let generator = CannedGenerator::new("עוד שאלה?");
    let config = ChatConfig {
        max_history: 4,
        ..ChatConfig::default()
    };
    let engine = DialogueEngine::new(generator, config);

    engine.process_turn(9, "טלפון").await.unwrap();
    for _ in 0..5 {
        // The digit reads as a budget, so the message is never taken as
        // a verbatim brand answer and the dialogue keeps asking.
        engine.process_turn(9, "משהו עם 0 המלצות").await.unwrap();
    }
    let session = engine.get_session(9).unwrap().unwrap();
    assert!(session.history.len() <= 4);
}

// ---- Session lifecycle ----

#[tokio::test]
async fn test_clear_session_restarts_dialogue() {
    let engine = engine_without_backend();

    engine.process_turn(10, "טלפון").await.unwrap();
    assert!(engine.get_session(10).unwrap().is_some());

    engine.clear_session(10).unwrap();
    assert!(engine.get_session(10).unwrap().is_none());

    // The next product message starts from scratch.
    engine.process_turn(10, "אוזניות").await.unwrap();
    let session = engine.get_session(10).unwrap().unwrap();
    assert_eq!(session.product_query, "אוזניות");
    assert_eq!(session.state, DialogueState::AskingBrand);
}

#[tokio::test]
async fn test_users_do_not_share_sessions() {
    let engine = engine_without_backend();

    engine.process_turn(11, "טלפון עד 1500").await.unwrap();
    engine.process_turn(12, "מקרר").await.unwrap();

    let a = engine.get_session(11).unwrap().unwrap();
    let b = engine.get_session(12).unwrap().unwrap();
    assert_eq!(a.product_query, "טלפון עד 1500");
    assert_eq!(b.product_query, "מקרר");
    assert_eq!(a.budget.as_deref(), Some("1500"));
    assert!(b.budget.is_none());
    assert_eq!(engine.session_count().unwrap(), 2);
}

#[tokio::test]
async fn test_concurrent_turns_for_different_users() {
    let engine = Arc::new(engine_without_backend());

    let mut handles = Vec::new();
    for user_id in 100..110 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.process_turn(user_id, "טלפון").await.unwrap();
            engine.process_turn(user_id, "סמסונג").await.unwrap()
        }));
    }
    for handle in handles {
        let reply = handle.await.unwrap();
        assert!(!reply.should_search);
    }
    assert_eq!(engine.session_count().unwrap(), 10);
}
