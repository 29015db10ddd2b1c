//! Keyword rules for degraded mode
//!
//! Used when neither a persisted nor a freshly trained model is available.
//! Rules are evaluated in a fixed order and the first match wins.

use crate::models::{ClassificationResult, IntentLabel};

/// Static keyword lists
const GREETING_KEYWORDS: &[&str] = &[
    "hello", "hi", "hey", "greetings", "howdy",
    "good morning", "good afternoon", "good evening",
];

const GOODBYE_KEYWORDS: &[&str] = &[
    "goodbye", "bye", "farewell", "see you", "good night", "take care",
];

const ADVICE_KEYWORDS: &[&str] = &["advice", "invest"];

const GREETING_CONFIDENCE: f64 = 0.9;
const GOODBYE_CONFIDENCE: f64 = 0.9;
const TOPIC_CONFIDENCE: f64 = 0.8;
const NO_MATCH_CONFIDENCE: f64 = 0.5;

/// Rule-based classifier
pub struct KeywordRules;

impl KeywordRules {
    pub fn classify(text: &str) -> ClassificationResult {
        let lowered = text.to_lowercase();

        let (intent, confidence) = if contains_any(&lowered, GREETING_KEYWORDS) {
            (IntentLabel::Greeting, GREETING_CONFIDENCE)
        } else if contains_any(&lowered, GOODBYE_KEYWORDS) {
            (IntentLabel::Goodbye, GOODBYE_CONFIDENCE)
        } else if lowered.contains("stock") && lowered.contains("price") {
            (IntentLabel::StockPrice, TOPIC_CONFIDENCE)
        } else if lowered.contains("market") {
            (IntentLabel::MarketInfo, TOPIC_CONFIDENCE)
        } else if contains_any(&lowered, ADVICE_KEYWORDS) {
            (IntentLabel::FinancialAdvice, TOPIC_CONFIDENCE)
        } else {
            (IntentLabel::Unknown, NO_MATCH_CONFIDENCE)
        };

        ClassificationResult::new(intent, confidence)
    }
}

/// Plain substring match; "hi" also fires inside "this"
fn contains_any(lowered: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| lowered.contains(kw))
}
