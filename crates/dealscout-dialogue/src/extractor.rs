//! Intent classification and slot harvesting.

use std::sync::LazyLock;

use regex::Regex;

use crate::lexicon;
use crate::types::{ExtractedSlots, Intent};

// First digit run, with optional thousands separators ("1,500").
static BUDGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d[\d,]*)").expect("budget regex is valid"));

/// Classify an idle-state utterance.
///
/// Specific beats generic: a brand name together with a digit or a
/// model-tier word ("אייפון 15 פרו") is a concrete item even when a
/// category word also appears. A category word alone is a generic
/// request. Everything else is chat.
pub fn classify(text: &str) -> Intent {
    let has_brand = lexicon::find_brand(text).is_some();
    if has_brand && (lexicon::has_digit(text) || lexicon::has_model_qualifier(text)) {
        return Intent::Specific;
    }
    if lexicon::find_category(text).is_some() {
        return Intent::Generic;
    }
    Intent::Chat
}

/// Extract a budget figure from text like "עד 1500" or "1,500 שקל".
/// Thousands separators are stripped; the value stays a string.
pub fn extract_budget(text: &str) -> Option<String> {
    BUDGET_RE
        .find(text)
        .map(|m| m.as_str().replace(',', ""))
}

/// Harvest every slot the utterance volunteers, regardless of which
/// question the dialogue is currently asking.
pub fn harvest(text: &str) -> ExtractedSlots {
    ExtractedSlots {
        budget: extract_budget(text),
        brand: lexicon::find_brand(text).map(str::to_string),
        location: lexicon::find_city(text).map(str::to_string),
    }
}
