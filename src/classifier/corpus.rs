//! Seed corpus used when no persisted model exists

use crate::models::{IntentLabel, TrainingExample};

const SEED_EXAMPLES: &[(&str, IntentLabel)] = &[
    // stock_price
    ("What's the current price of Apple stock?", IntentLabel::StockPrice),
    ("How much is MSFT trading for?", IntentLabel::StockPrice),
    ("Tell me the stock price of Amazon", IntentLabel::StockPrice),
    // market_info
    ("How is the market performing today?", IntentLabel::MarketInfo),
    ("What's the current state of the S&P 500?", IntentLabel::MarketInfo),
    ("Tell me about today's market trends", IntentLabel::MarketInfo),
    // financial_advice
    ("Should I invest in tech stocks?", IntentLabel::FinancialAdvice),
    ("What's a good investment strategy for retirement?", IntentLabel::FinancialAdvice),
    ("How should I diversify my portfolio?", IntentLabel::FinancialAdvice),
    // portfolio_management
    ("Show me my portfolio performance", IntentLabel::PortfolioManagement),
    ("What's my current balance?", IntentLabel::PortfolioManagement),
    ("How are my investments doing?", IntentLabel::PortfolioManagement),
    // general_question
    ("What is a stock?", IntentLabel::GeneralQuestion),
    ("Explain what a bond is", IntentLabel::GeneralQuestion),
    ("How do dividends work?", IntentLabel::GeneralQuestion),
    // greeting
    ("Hello", IntentLabel::Greeting),
    ("Hi there", IntentLabel::Greeting),
    ("Good morning", IntentLabel::Greeting),
    // goodbye
    ("Goodbye", IntentLabel::Goodbye),
    ("Bye", IntentLabel::Goodbye),
    ("See you later", IntentLabel::Goodbye),
];

/// The 21 ordered seed examples
pub fn default_corpus() -> Vec<TrainingExample> {
    SEED_EXAMPLES
        .iter()
        .map(|(text, label)| TrainingExample::new(*text, *label))
        .collect()
}
