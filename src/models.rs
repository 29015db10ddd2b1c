//! Core data models for the intent pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

//
// ================= Intent =================
//

/// Closed set of intents a user message can carry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum IntentLabel {
    StockPrice,
    MarketInfo,
    FinancialAdvice,
    PortfolioManagement,
    GeneralQuestion,
    Greeting,
    Goodbye,
    Unknown,
}

impl IntentLabel {
    pub const ALL: [IntentLabel; 8] = [
        IntentLabel::StockPrice,
        IntentLabel::MarketInfo,
        IntentLabel::FinancialAdvice,
        IntentLabel::PortfolioManagement,
        IntentLabel::GeneralQuestion,
        IntentLabel::Greeting,
        IntentLabel::Goodbye,
        IntentLabel::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentLabel::StockPrice => "stock_price",
            IntentLabel::MarketInfo => "market_info",
            IntentLabel::FinancialAdvice => "financial_advice",
            IntentLabel::PortfolioManagement => "portfolio_management",
            IntentLabel::GeneralQuestion => "general_question",
            IntentLabel::Greeting => "greeting",
            IntentLabel::Goodbye => "goodbye",
            IntentLabel::Unknown => "unknown",
        }
    }

    /// Intents whose response needs a data fetch first
    pub fn requires_data(&self) -> bool {
        matches!(
            self,
            IntentLabel::StockPrice | IntentLabel::MarketInfo | IntentLabel::FinancialAdvice
        )
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unlisted names collapse to `Unknown`; parsing never fails.
impl FromStr for IntentLabel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let label = IntentLabel::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == normalized)
            .unwrap_or(IntentLabel::Unknown);
        Ok(label)
    }
}

//
// ================= Training =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub label: IntentLabel,
}

impl TrainingExample {
    pub fn new(text: impl Into<String>, label: IntentLabel) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

//
// ================= Classification =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    pub intent: IntentLabel,
    pub confidence: f64,
}

impl ClassificationResult {
    /// Build a result, clamping confidence into [0, 1]. NaN becomes 0.
    pub fn new(intent: IntentLabel, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };

        Self { intent, confidence }
    }

    pub fn unknown() -> Self {
        Self::new(IntentLabel::Unknown, 0.0)
    }
}
