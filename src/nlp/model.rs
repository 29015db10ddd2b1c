//! Fitted intent model and its persisted blob format

use crate::error::ChatbotError;
use crate::models::{IntentLabel, TrainingExample};
use crate::nlp::naive_bayes::MultinomialNaiveBayes;
use crate::nlp::tokenizer::TextAnalyzer;
use crate::nlp::vectorizer::TfIdfVectorizer;
use crate::Result;
use bincode::Options;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Bump when the serialized layout of `TrainedModel` changes
pub const MODEL_FORMAT_VERSION: u32 = 2;

const MAX_BLOB_BYTES: u64 = 64 * 1024 * 1024;

/// TF-IDF vectorizer plus naive Bayes classifier, immutable once fitted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainedModel {
    /// `TextAnalyzer::signature` of the analyzer the model was fitted with
    analyzer_signature: String,
    vectorizer: TfIdfVectorizer,
    classifier: MultinomialNaiveBayes,
}

/// Raw model output before the classifier applies its confidence policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: IntentLabel,
    /// Max class posterior; `None` when posteriors are unavailable
    pub probability: Option<f64>,
}

#[derive(Serialize, Deserialize)]
struct ModelEnvelope {
    format_version: u32,
    checksum: String,
    payload: Vec<u8>,
}

impl TrainedModel {
    pub fn train(analyzer: &TextAnalyzer, corpus: &[TrainingExample]) -> Result<Self> {
        let documents: Vec<Vec<String>> = corpus
            .iter()
            .map(|example| analyzer.analyze(&example.text))
            .collect();
        let labels: Vec<IntentLabel> = corpus.iter().map(|example| example.label).collect();

        let vectorizer = TfIdfVectorizer::fit(&documents)?;
        let rows: Vec<Vec<f64>> = documents
            .iter()
            .map(|doc| vectorizer.transform(doc))
            .collect();

        let classifier =
            MultinomialNaiveBayes::fit(&rows, &labels, MultinomialNaiveBayes::DEFAULT_ALPHA)?;

        Ok(Self {
            analyzer_signature: analyzer.signature(),
            vectorizer,
            classifier,
        })
    }

    pub fn predict(&self, analyzer: &TextAnalyzer, text: &str) -> Prediction {
        let tokens = analyzer.analyze(text);
        // a row without known terms scores on the class priors alone
        let row = self.vectorizer.transform(&tokens);

        let label = self.classifier.predict(&row);
        let probability = self
            .classifier
            .predict_proba(&row)
            .and_then(|probs| probs.into_iter().reduce(f64::max));

        Prediction { label, probability }
    }

    /// Whether `analyzer` tokenizes the way the fitting analyzer did
    pub fn matches_analyzer(&self, analyzer: &TextAnalyzer) -> bool {
        self.analyzer_signature == analyzer.signature()
    }

    pub fn analyzer_signature(&self) -> &str {
        &self.analyzer_signature
    }

    pub fn classes(&self) -> &[IntentLabel] {
        self.classifier.classes()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary_size()
    }

    #[cfg(test)]
    pub(crate) fn classifier_mut(&mut self) -> &mut MultinomialNaiveBayes {
        &mut self.classifier
    }

    /// Encode as an opaque, checksummed blob
    pub fn to_blob(&self) -> Result<Vec<u8>> {
        let payload = codec().serialize(self)?;
        let envelope = ModelEnvelope {
            format_version: MODEL_FORMAT_VERSION,
            checksum: checksum(&payload),
            payload,
        };
        Ok(codec().serialize(&envelope)?)
    }

    /// Decode a blob written by `to_blob`, rejecting stale or corrupt data
    pub fn from_blob(blob: &[u8]) -> Result<Self> {
        let envelope: ModelEnvelope = codec().deserialize(blob).map_err(|e| {
            ChatbotError::ModelFormatError(format!("Unreadable model envelope: {}", e))
        })?;

        if envelope.format_version != MODEL_FORMAT_VERSION {
            return Err(ChatbotError::ModelFormatError(format!(
                "Unsupported model format version {} (expected {})",
                envelope.format_version, MODEL_FORMAT_VERSION
            )));
        }

        if checksum(&envelope.payload) != envelope.checksum {
            return Err(ChatbotError::ModelFormatError(
                "Model checksum mismatch".to_string(),
            ));
        }

        let model: TrainedModel = codec().deserialize(&envelope.payload)?;
        Ok(model)
    }
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new().with_limit(MAX_BLOB_BYTES)
}

fn checksum(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::corpus::default_corpus;

    fn trained() -> (TextAnalyzer, TrainedModel) {
        let analyzer = TextAnalyzer::regex_fallback();
        let model = TrainedModel::train(&analyzer, &default_corpus()).unwrap();
        (analyzer, model)
    }

    #[test]
    fn test_model_covers_corpus_labels() {
        let (_, model) = trained();
        assert_eq!(model.classes().len(), 7);
        assert!(!model.classes().contains(&IntentLabel::Unknown));
        assert!(model.vocabulary_size() > 20);
    }

    #[test]
    fn test_predict_known_terms() {
        let (analyzer, model) = trained();

        let hit = model.predict(&analyzer, "tell me the stock price");
        assert_eq!(hit.label, IntentLabel::StockPrice);
        assert!(hit.probability.is_some());
    }

    #[test]
    fn test_unknown_terms_fall_back_to_priors() {
        let (analyzer, model) = trained();

        // seed classes are balanced, so the first class wins the tie
        let miss = model.predict(&analyzer, "qwerty zxcv");
        assert_eq!(miss.label, model.classes()[0]);
        let probability = miss.probability.unwrap();
        assert!((probability - 1.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_model_records_its_analyzer() {
        let (analyzer, model) = trained();
        assert_eq!(model.analyzer_signature(), analyzer.signature());
        assert!(model.matches_analyzer(&analyzer));

        let linguistic = TextAnalyzer::linguistic(["the".to_string()].into_iter().collect());
        assert!(!model.matches_analyzer(&linguistic));
    }

    #[test]
    fn test_blob_round_trip_is_exact() {
        let (analyzer, model) = trained();
        let restored = TrainedModel::from_blob(&model.to_blob().unwrap()).unwrap();

        assert_eq!(restored, model);
        assert_eq!(
            restored.predict(&analyzer, "How is the market today?"),
            model.predict(&analyzer, "How is the market today?")
        );
    }

    #[test]
    fn test_corrupt_blob_is_rejected() {
        let (_, model) = trained();
        let mut blob = model.to_blob().unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0xff;

        assert!(TrainedModel::from_blob(&blob).is_err());
        assert!(TrainedModel::from_blob(b"not a model").is_err());
        assert!(TrainedModel::from_blob(&[]).is_err());
    }

    #[test]
    fn test_empty_corpus_fails_to_train() {
        let analyzer = TextAnalyzer::regex_fallback();
        assert!(TrainedModel::train(&analyzer, &[]).is_err());
    }
}
