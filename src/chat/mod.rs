//! Chat service - the request path
//!
//! CLASSIFY → FETCH (only for data intents) → GENERATE

use crate::classifier::{default_corpus, IntentClassifier};
use crate::config::{ModelStoreKind, Settings};
use crate::error::ChatbotError;
use crate::financial::{generate_response, FinancialDataProvider, StubFinancialDataProvider};
use crate::models::IntentLabel;
use crate::nlp::TextAnalyzer;
use crate::state::{FileModelStore, InMemoryModelStore, ModelStore};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub intent: IntentLabel,
    pub confidence: f64,
    pub data: Option<Value>,
}

/// Composes the classifier, a data provider and the response dispatcher.
/// Holds no per-request state.
pub struct ChatService {
    classifier: Arc<IntentClassifier>,
    provider: Arc<dyn FinancialDataProvider>,
    fetch_timeout: Duration,
}

impl ChatService {
    pub fn new(
        classifier: Arc<IntentClassifier>,
        provider: Arc<dyn FinancialDataProvider>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            classifier,
            provider,
            fetch_timeout,
        }
    }

    /// Wire up the default stack: configured tokenizer and model store,
    /// a classifier initialized from the seed corpus, and the stub provider.
    pub fn from_settings(settings: &Settings) -> Self {
        let analyzer = Arc::new(TextAnalyzer::initialize(settings.stopwords_path.as_deref()));

        let store: Arc<dyn ModelStore> = match settings.model_store {
            ModelStoreKind::File => Arc::new(FileModelStore::new(settings.model_path.clone())),
            ModelStoreKind::Memory => Arc::new(InMemoryModelStore::new()),
        };

        let classifier = IntentClassifier::initialize(analyzer, store, &default_corpus());
        info!(
            state = ?classifier.state(),
            tokenizer = classifier.analyzer().backend().name(),
            "Intent classifier ready"
        );

        Self::new(
            Arc::new(classifier),
            Arc::new(StubFinancialDataProvider::new()),
            settings.fetch_timeout,
        )
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub async fn process_message(&self, text: &str, context: &Value) -> ChatReply {
        let start = Instant::now();

        let classification = self.classifier.classify(text);
        let intent = classification.intent;

        let data = if intent.requires_data() {
            Some(self.fetch_data(intent, text, context).await)
        } else {
            None
        };

        let response = generate_response(intent, text, data.as_ref());

        info!(
            intent = %intent,
            confidence = classification.confidence,
            fetched = data.is_some(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Processed message"
        );

        ChatReply {
            response,
            intent,
            confidence: classification.confidence,
            data,
        }
    }

    /// Provider failures and timeouts become `{"error": ...}` payloads
    async fn fetch_data(&self, intent: IntentLabel, text: &str, context: &Value) -> Value {
        let fetch = self.provider.fetch(intent, text, context);

        let error = match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Ok(Ok(data)) => return data,
            Ok(Err(e)) => e,
            Err(_) => ChatbotError::Timeout(self.fetch_timeout.as_millis() as u64),
        };

        warn!(
            provider = self.provider.name(),
            intent = %intent,
            error = %error,
            "Error getting financial data"
        );
        json!({ "error": error.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ClassifierState;
    use crate::financial::response::{APOLOGY_PREFIX, GREETING_RESPONSE};
    use crate::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SlowProvider;

    #[async_trait::async_trait]
    impl FinancialDataProvider for SlowProvider {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn fetch(&self, _: IntentLabel, _: &str, _: &Value) -> Result<Value> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(json!({}))
        }
    }

    struct FailingProvider;

    #[async_trait::async_trait]
    impl FinancialDataProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch(&self, _: IntentLabel, _: &str, _: &Value) -> Result<Value> {
            Err(ChatbotError::DataProviderError("upstream unavailable".to_string()))
        }
    }

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl FinancialDataProvider for CountingProvider {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn fetch(&self, _: IntentLabel, _: &str, _: &Value) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({}))
        }
    }

    fn classifier() -> Arc<IntentClassifier> {
        Arc::new(IntentClassifier::initialize(
            Arc::new(TextAnalyzer::regex_fallback()),
            Arc::new(InMemoryModelStore::new()),
            &default_corpus(),
        ))
    }

    fn service(provider: Arc<dyn FinancialDataProvider>, timeout: Duration) -> ChatService {
        ChatService::new(classifier(), provider, timeout)
    }

    #[tokio::test]
    async fn test_stock_price_end_to_end() {
        let service = service(Arc::new(StubFinancialDataProvider::new()), DEFAULT_FETCH_TIMEOUT);
        let reply = service
            .process_message("What's the current price of Apple stock?", &json!({}))
            .await;

        assert_eq!(reply.intent, IntentLabel::StockPrice);
        assert_eq!(
            reply.response,
            "The current price of AAPL is $150.25, which is 1.7% up today."
        );
        assert_eq!(reply.data.unwrap()["symbol"], "AAPL");
    }

    #[tokio::test]
    async fn test_greeting_skips_fetch() {
        let provider = Arc::new(CountingProvider::default());
        let service = service(provider.clone(), DEFAULT_FETCH_TIMEOUT);

        let reply = service.process_message("Hello", &json!({})).await;

        assert_eq!(reply.intent, IntentLabel::Greeting);
        assert_eq!(reply.response, GREETING_RESPONSE);
        assert!(reply.data.is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provider_error_becomes_apology() {
        let service = service(Arc::new(FailingProvider), DEFAULT_FETCH_TIMEOUT);
        let reply = service
            .process_message("How is the market performing today?", &json!({}))
            .await;

        assert_eq!(reply.intent, IntentLabel::MarketInfo);
        assert!(reply.response.starts_with(APOLOGY_PREFIX));
        assert!(reply.response.contains("upstream unavailable"));
        assert!(reply.data.unwrap().get("error").is_some());
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let service = service(Arc::new(SlowProvider), Duration::from_millis(50));
        let reply = service
            .process_message("Should I invest in tech stocks?", &json!({}))
            .await;

        assert_eq!(reply.intent, IntentLabel::FinancialAdvice);
        assert!(reply.response.starts_with(APOLOGY_PREFIX));
        assert!(reply.response.contains("timed out"));
    }

    #[tokio::test]
    async fn test_unrecognized_text_takes_prior_label() {
        let service = service(Arc::new(StubFinancialDataProvider::new()), DEFAULT_FETCH_TIMEOUT);
        let reply = service.process_message("qwerty asdf", &json!({})).await;

        // no known terms: the first of the equally likely classes wins
        assert_eq!(reply.intent, IntentLabel::StockPrice);
        assert!((reply.confidence - 1.0 / 7.0).abs() < 1e-9);
        assert_eq!(
            reply.response,
            format!("{} {}", APOLOGY_PREFIX, crate::financial::NO_SYMBOL_ERROR)
        );
    }

    #[tokio::test]
    async fn test_from_settings_with_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            model_path: dir.path().join("models").join("intent_classifier"),
            stopwords_path: None,
            ..Settings::default()
        };

        let first = ChatService::from_settings(&settings);
        assert_eq!(first.classifier().state(), ClassifierState::Trained);
        assert!(settings.model_path.exists());

        let second = ChatService::from_settings(&settings);
        assert_eq!(second.classifier().state(), ClassifierState::Loaded);

        let reply = second.process_message("Goodbye", &json!({})).await;
        assert_eq!(reply.intent, IntentLabel::Goodbye);
    }

    #[test]
    fn test_from_settings_with_memory_store() {
        let settings = Settings {
            model_store: ModelStoreKind::Memory,
            stopwords_path: None,
            ..Settings::default()
        };

        let service = ChatService::from_settings(&settings);
        assert_eq!(service.classifier().state(), ClassifierState::Trained);
        assert_eq!(service.fetch_timeout, settings.fetch_timeout);
    }
}
