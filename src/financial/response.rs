//! Response dispatcher
//!
//! Pure mapping from (intent, message, optional data) to a reply string.
//! An `error` key in the data short-circuits every intent branch.

use crate::models::IntentLabel;
use serde_json::{Map, Value};

pub const APOLOGY_PREFIX: &str = "I'm sorry, I couldn't get that information.";

pub const GREETING_RESPONSE: &str =
    "Hello! I'm your financial assistant. How can I help you with your financial questions today?";

pub const GOODBYE_RESPONSE: &str =
    "Goodbye! Feel free to come back if you have more financial questions.";

pub const NO_MARKET_INFO_RESPONSE: &str =
    "I couldn't find specific market information at the moment.";

pub const FALLBACK_RESPONSE: &str =
    "I'm not sure how to respond to that. Could you try rephrasing your question about financial matters?";

pub fn generate_response(intent: IntentLabel, _text: &str, data: Option<&Value>) -> String {
    // an empty object carries no data
    let data = data
        .and_then(Value::as_object)
        .filter(|map| !map.is_empty());

    if let Some(error) = data.and_then(|map| map.get("error")) {
        return format!("{} {}", APOLOGY_PREFIX, display_value(error));
    }

    let reply = match (intent, data) {
        (IntentLabel::StockPrice, Some(map)) => stock_price_response(map),
        (IntentLabel::MarketInfo, Some(map)) => Some(market_info_response(map)),
        (IntentLabel::FinancialAdvice, Some(map)) => advice_response(map),
        (IntentLabel::Greeting, _) => Some(GREETING_RESPONSE.to_string()),
        (IntentLabel::Goodbye, _) => Some(GOODBYE_RESPONSE.to_string()),
        _ => None,
    };

    reply.unwrap_or_else(|| FALLBACK_RESPONSE.to_string())
}

fn stock_price_response(data: &Map<String, Value>) -> Option<String> {
    let symbol = data.get("symbol").map(display_value)?;
    let price = data.get("price").and_then(Value::as_f64)?;
    let change_percent = data.get("change_percent").and_then(Value::as_f64)?;
    let change = data.get("change").and_then(Value::as_f64)?;

    Some(format!(
        "The current price of {} is ${:.2}, which is {:.1}% {} today.",
        symbol,
        price,
        change_percent,
        direction(change)
    ))
}

fn market_info_response(data: &Map<String, Value>) -> String {
    let first = data
        .get("indices")
        .and_then(Value::as_array)
        .and_then(|indices| indices.first());

    let Some(index) = first else {
        return NO_MARKET_INFO_RESPONSE.to_string();
    };

    let name = index.get("name").map(display_value);
    let value = index.get("value").and_then(Value::as_f64);
    let change_percent = index.get("change_percent").and_then(Value::as_f64);

    let (Some(name), Some(value), Some(change_percent)) = (name, value, change_percent) else {
        return NO_MARKET_INFO_RESPONSE.to_string();
    };

    let status = data
        .get("market_status")
        .map(display_value)
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        "Here's the latest market information: The {} is currently at {:.2}, {:.1}% {}. The market is currently {}.",
        name,
        value,
        change_percent,
        direction(change_percent),
        status
    )
}

fn advice_response(data: &Map<String, Value>) -> Option<String> {
    let advice = data.get("advice").map(display_value)?;
    let disclaimer = data.get("disclaimer").map(display_value)?;
    Some(format!("{} {}", advice, disclaimer))
}

fn direction(change: f64) -> &'static str {
    if change > 0.0 {
        "up"
    } else {
        "down"
    }
}

/// Strings render bare, everything else as JSON
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
