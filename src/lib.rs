//! Financial Intent Chatbot
//!
//! An intent classification pipeline for a financial chatbot:
//! - Tokenizes and normalizes messages (linguistic or regex backend)
//! - Classifies them with TF-IDF features and multinomial naive Bayes
//! - Persists the fitted model and retrains when it is missing or corrupt
//! - Falls back to keyword rules when no model can be built
//! - Fetches financial data for data-bearing intents and renders a reply
//!
//! REQUEST PATH:
//! MESSAGE → CLASSIFY → FETCH? → RESPOND

pub mod api;
pub mod chat;
pub mod classifier;
pub mod config;
pub mod error;
pub mod financial;
pub mod models;
pub mod nlp;
pub mod state;

pub use error::Result;

// Re-export common types
pub use chat::{ChatReply, ChatService};
pub use classifier::{ClassifierState, IntentClassifier, LoadOutcome};
pub use config::Settings;
pub use error::ChatbotError;
pub use financial::generate_response;
pub use models::*;
