//! Financial data provider
//!
//! The caller fetches data between classification and response generation.
//! The reference provider is a stub with fixed figures; real market data
//! sources plug in behind the same trait.

use crate::models::IntentLabel;
use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};
use tracing::info;

pub const NO_SYMBOL_ERROR: &str = "No stock symbol found in the message";

pub const ADVICE_DISCLAIMER: &str =
    "This is general advice and not personalized to your specific financial situation.";

const STUB_TIMESTAMP: &str = "2023-05-01T16:00:00Z";

/// Checked in order; first hit wins
const COMPANY_TICKERS: &[(&str, &str)] = &[
    ("apple", "AAPL"),
    ("microsoft", "MSFT"),
    ("amazon", "AMZN"),
    ("google", "GOOGL"),
    ("tesla", "TSLA"),
];

lazy_static! {
    static ref TICKER_PATTERN: Regex = Regex::new(r"\b[A-Z]{1,5}\b").expect("ticker pattern is valid");
}

/// Trait for the data-fetch collaborator
#[async_trait::async_trait]
pub trait FinancialDataProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Structured data for `intent`. Domain misses (e.g. no ticker) come back
    /// as an `{"error": ...}` payload; `Err` is reserved for provider failures.
    async fn fetch(&self, intent: IntentLabel, text: &str, context: &Value) -> Result<Value>;
}

/// Provider returning fixed reference values
#[derive(Debug, Default, Clone)]
pub struct StubFinancialDataProvider;

impl StubFinancialDataProvider {
    pub fn new() -> Self {
        Self
    }

    fn stock_price(&self, text: &str) -> Value {
        let Some(symbol) = extract_stock_symbol(text) else {
            return json!({ "error": NO_SYMBOL_ERROR });
        };

        info!(symbol = %symbol, "Retrieved stock price");
        json!({
            "symbol": symbol,
            "price": 150.25,
            "change": 2.5,
            "change_percent": 1.7,
            "volume": 1_500_000,
            "timestamp": STUB_TIMESTAMP,
        })
    }

    fn market_info(&self) -> Value {
        info!("Retrieved market information");
        json!({
            "indices": [
                { "name": "S&P 500", "value": 4200.50, "change_percent": 0.8 },
                { "name": "Dow Jones", "value": 33500.25, "change_percent": 0.5 },
                { "name": "NASDAQ", "value": 14200.75, "change_percent": 1.2 },
            ],
            "market_status": "open",
            "trending_sectors": [
                { "name": "Technology", "change_percent": 1.5 },
                { "name": "Healthcare", "change_percent": 0.7 },
                { "name": "Energy", "change_percent": -0.3 },
            ],
            "timestamp": STUB_TIMESTAMP,
        })
    }
}

#[async_trait::async_trait]
impl FinancialDataProvider for StubFinancialDataProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn fetch(&self, intent: IntentLabel, text: &str, _context: &Value) -> Result<Value> {
        let data = match intent {
            IntentLabel::StockPrice => self.stock_price(text),
            IntentLabel::MarketInfo => self.market_info(),
            IntentLabel::FinancialAdvice => financial_advice(text),
            _ => json!({}),
        };
        Ok(data)
    }
}

/// First standalone 1 to 5 letter uppercase token, else a known company name
pub fn extract_stock_symbol(text: &str) -> Option<String> {
    if let Some(m) = TICKER_PATTERN.find(text) {
        return Some(m.as_str().to_string());
    }

    let lowered = text.to_lowercase();
    COMPANY_TICKERS
        .iter()
        .find(|(company, _)| lowered.contains(company))
        .map(|(_, ticker)| ticker.to_string())
}

/// Keyword-selected canned advice; first matching topic wins
pub fn financial_advice(text: &str) -> Value {
    let lowered = text.to_lowercase();

    let (advice_type, advice) = if lowered.contains("retire") {
        (
            "retirement",
            "For retirement planning, consider a diversified portfolio with a mix of stocks and bonds. The general rule is to subtract your age from 110 to get the percentage to allocate to stocks.",
        )
    } else if lowered.contains("invest")
        && (lowered.contains("beginner") || lowered.contains("start"))
    {
        (
            "beginner_investing",
            "For beginners, consider starting with index funds which provide broad market exposure with lower fees. Establish an emergency fund before investing.",
        )
    } else if lowered.contains("dividend") {
        (
            "dividend_investing",
            "Dividend investing can provide regular income. Look for companies with a history of stable or increasing dividend payments and reasonable payout ratios.",
        )
    } else {
        (
            "general",
            "It's important to have a diversified portfolio that aligns with your risk tolerance and financial goals. Consider consulting with a financial advisor for personalized advice.",
        )
    };

    json!({
        "type": advice_type,
        "advice": advice,
        "disclaimer": ADVICE_DISCLAIMER,
    })
}
