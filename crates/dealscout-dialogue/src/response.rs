//! Reply construction: prompt assembly for the language model and the
//! deterministic Hebrew templates used when no backend is available.

use std::sync::Arc;

use dealscout_llm::{ChatMessage, LlmError, TextGenerator};

use crate::lexicon;
use crate::session::Session;
use crate::types::DialogueState;

/// Fixed persona and policy preamble, prepended to every generation call.
const SYSTEM_PROMPT: &str = "\
אתה \"דילי\", סוכן הקניות החכם של DealScout.

כללים מחייבים:
1. דבר רק בעברית.
2. אישיות: חם, ידידותי, מכירתי. אתה אוהב לעזור ללקוחות.
3. מקסימום 3 שורות בכל תשובה.
4. תמיד סיים בשאלה אחת בדיוק.
5. נושאים מותרים בלבד: מוצרים, מחירים, משלוחים, חנויות, קניות, השוואת מחירים.
6. כל נושא אחר (פוליטיקה, דת, רגשות, חדשות, בדיחות, תכנות): \
ענה בדיוק \"אני יכול לעזור רק בנושא קניות 😊 מה תרצה לחפש היום?\"
7. אל תמציא מחירים. אם שואלים כמה עולה משהו, אמור שתבדוק.
8. \"יקר לי\" / \"לא בתקציב\": הצע חלופות זולות, שאל מה התקציב, היה אופטימי.

אתה עוזר ללקוחות למצוא מוצרים מ-15+ חנויות ישראליות.";

/// Builds prompts and replies for one dialogue turn.
pub struct ResponseGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl ResponseGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Ask the backend for a reply to the session's current history.
    pub async fn generate(&self, prompt: &[ChatMessage]) -> Result<String, LlmError> {
        self.generator.generate(prompt).await
    }

    /// Assemble the full message list for a generation call: persona,
    /// collected-slot context with a next-question directive, then the
    /// bounded history (which already ends with the current user turn).
    ///
    /// `chat_only` skips the slot context for idle small talk.
    pub fn build_prompt(&self, session: &Session, chat_only: bool) -> Vec<ChatMessage> {
        let mut context = SYSTEM_PROMPT.to_string();

        if !chat_only && !session.product_query.is_empty() {
            let mut parts = vec![format!("מוצר: {}", session.product_query)];
            if let Some(brand) = &session.brand {
                parts.push(format!("מותג: {brand}"));
            }
            if let Some(budget) = &session.budget {
                parts.push(format!("תקציב: {budget}"));
            }
            if let Some(priority) = &session.priority {
                parts.push(format!("עדיפות: {priority}"));
            }
            if let Some(location) = &session.location {
                parts.push(format!("מיקום: {location}"));
            }
            context.push_str("\n\nמידע שנאסף: ");
            context.push_str(&parts.join(", "));

            if session.is_specific {
                if session.location.is_none() {
                    context.push_str("\nשאל באיזה אזור הלקוח נמצא.");
                }
            } else {
                match session.first_missing_slot() {
                    Some(DialogueState::AskingBrand) => {
                        context.push_str("\nשאל איזה מותג/דגם מעניין אותו.");
                    }
                    Some(DialogueState::AskingBudget) => {
                        context.push_str("\nשאל מה התקציב שלו.");
                    }
                    Some(DialogueState::AskingPriority) => {
                        context.push_str("\nשאל מה הכי חשוב לו (איכות/מחיר/מותג).");
                    }
                    _ => {}
                }
            }
        }

        let mut messages = Vec::with_capacity(session.history.len() + 1);
        messages.push(ChatMessage::system(context));
        messages.extend(session.history.iter().cloned());
        messages
    }
}

/// Template reply for idle small talk, keyed off the utterance.
pub fn fallback_chat(text: &str) -> String {
    if lexicon::is_greeting(text) {
        return "היי! אני דילי, העוזר האישי שלך לקניות.\n\
                אני סורק 15+ חנויות ומוצא לך את העסקאות הכי טובות. מה נחפש?"
            .to_string();
    }
    if lexicon::mentions_disallowed_topic(text) {
        return "אני מתמחה רק בקניות והשוואת מחירים.\nמה תרצה לחפש?".to_string();
    }
    if lexicon::mentions_price(text) {
        return "אני אמצא לך בדיוק מה שאתה צריך במחיר שמתאים לך!\nאיזה מוצר מעניין אותך?"
            .to_string();
    }
    "אני כאן כדי לעזור לך למצוא את המוצר המושלם.\nספר לי מה אתה מחפש?".to_string()
}

/// Template question for the slot the session is currently asking about.
///
/// `opening` marks the first question of a dialogue, which gets a fuller
/// pitch than a mid-dialogue follow-up.
pub fn fallback_question(session: &Session, opening: bool) -> String {
    if opening {
        if session.is_specific {
            return "בחירה מעולה! באיזה אזור אתה נמצא כדי שאחשב משלוח?".to_string();
        }
        return format!(
            "יופי, {}! יש לי גישה ל-15+ חנויות.\n\
             איזה מותג או דגם מעניין אותך? או שתרצה שאני אמליץ?",
            session.product_query
        );
    }

    match session.state {
        DialogueState::AskingBrand => format!(
            "יופי! יש המון אפשרויות ב{}.\nאיזה מותג מעניין אותך? אם לא בטוח, אני יכול להמליץ.",
            session.product_query
        ),
        DialogueState::AskingBudget => {
            let brand_info = session
                .brand
                .as_ref()
                .map(|b| format!(" של {b}"))
                .unwrap_or_default();
            format!(
                "מה התקציב שלך ל{}{}? ככה אוכל למצוא בדיוק מה שמתאים.",
                session.product_query, brand_info
            )
        }
        DialogueState::AskingPriority => {
            "מה הכי חשוב לך? איכות, מחיר נמוך, או מותג מסוים?".to_string()
        }
        DialogueState::AskingLocation => "באיזה אזור אתה נמצא?".to_string(),
        DialogueState::Idle => "ספר לי עוד על מה שאתה מחפש.".to_string(),
    }
}
