//! Intent Classifier
//!
//! Owns the fitted model and its lifecycle:
//!
//! UNINITIALIZED → LOADED   (persisted model found and decoded)
//! UNINITIALIZED → TRAINED  (no usable persisted model; seed corpus fitted and saved)
//! UNINITIALIZED → DEGRADED (load and train both failed; keyword rules)
//!
//! Initialization runs once, before the classifier is shared. Afterwards the
//! classifier is read-only and can be used from any number of tasks.

pub mod corpus;
pub mod rules;

use crate::models::{ClassificationResult, IntentLabel, TrainingExample};
use crate::nlp::{TextAnalyzer, TrainedModel};
use crate::state::ModelStore;
use crate::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub use corpus::default_corpus;
pub use rules::KeywordRules;

/// Confidence reported when the model yields a label but no posterior
/// probabilities. Kept as a fixed documented value.
pub const DEFAULT_CONFIDENCE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierState {
    Uninitialized,
    Loaded,
    Trained,
    Degraded,
}

/// What `load` found in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    NotFound,
    Invalid(String),
}

pub struct IntentClassifier {
    analyzer: Arc<TextAnalyzer>,
    store: Arc<dyn ModelStore>,
    model: Option<TrainedModel>,
    state: ClassifierState,
}

impl IntentClassifier {
    /// Uninitialized classifier; call `load`/`train` or use `initialize`.
    pub fn new(analyzer: Arc<TextAnalyzer>, store: Arc<dyn ModelStore>) -> Self {
        Self {
            analyzer,
            store,
            model: None,
            state: ClassifierState::Uninitialized,
        }
    }

    /// Load-or-train-or-degrade. Never fails; the returned classifier is in
    /// `Loaded`, `Trained` or `Degraded`.
    pub fn initialize(
        analyzer: Arc<TextAnalyzer>,
        store: Arc<dyn ModelStore>,
        corpus: &[TrainingExample],
    ) -> Self {
        let mut classifier = Self::new(analyzer, store);

        if classifier.load() == LoadOutcome::Loaded {
            return classifier;
        }

        if let Err(e) = classifier.train(corpus) {
            error!(error = %e, "Training failed, classifier entering degraded mode");
            classifier.state = ClassifierState::Degraded;
        }

        classifier
    }

    /// Read and decode the persisted model. Problems are logged and reported
    /// through the outcome; the state only changes on success.
    pub fn load(&mut self) -> LoadOutcome {
        let location = self.store.describe();

        let blob = match self.store.load() {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                warn!(location = %location, "Model file not found");
                return LoadOutcome::NotFound;
            }
            Err(e) => {
                error!(location = %location, error = %e, "Error reading model");
                return LoadOutcome::Invalid(e.to_string());
            }
        };

        match TrainedModel::from_blob(&blob) {
            Ok(model) if !model.matches_analyzer(&self.analyzer) => {
                let reason = format!(
                    "Model was trained with analyzer {}, current analyzer is {}",
                    model.analyzer_signature(),
                    self.analyzer.signature()
                );
                warn!(location = %location, reason = %reason, "Discarding persisted model");
                LoadOutcome::Invalid(reason)
            }
            Ok(model) => {
                info!(
                    location = %location,
                    vocabulary = model.vocabulary_size(),
                    "Loaded intent classification model"
                );
                self.model = Some(model);
                self.state = ClassifierState::Loaded;
                LoadOutcome::Loaded
            }
            Err(e) => {
                error!(location = %location, error = %e, "Error loading model");
                LoadOutcome::Invalid(e.to_string())
            }
        }
    }

    /// Fit a fresh model on `corpus` and persist it. A persistence failure
    /// is logged; the fitted model still serves requests.
    pub fn train(&mut self, corpus: &[TrainingExample]) -> Result<()> {
        info!(examples = corpus.len(), "Training intent classification model");

        let model = TrainedModel::train(&self.analyzer, corpus)?;
        let location = self.store.describe();

        match model.to_blob().and_then(|blob| self.store.save(&blob)) {
            Ok(()) => info!(location = %location, "Trained and saved model"),
            Err(e) => warn!(
                location = %location,
                error = %e,
                "Trained model could not be persisted, serving from memory"
            ),
        }

        self.model = Some(model);
        self.state = ClassifierState::Trained;
        Ok(())
    }

    pub fn state(&self) -> ClassifierState {
        self.state
    }

    pub fn analyzer(&self) -> &TextAnalyzer {
        &self.analyzer
    }

    /// Always returns a label from the fixed set with confidence in [0, 1].
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let result = match (self.state, &self.model) {
            (ClassifierState::Degraded, _) => KeywordRules::classify(text),
            (_, Some(model)) => {
                let prediction = model.predict(&self.analyzer, text);
                ClassificationResult::new(
                    prediction.label,
                    prediction.probability.unwrap_or(DEFAULT_CONFIDENCE),
                )
            }
            (_, None) => {
                warn!("Model not loaded, returning default intent");
                ClassificationResult::unknown()
            }
        };

        debug!(
            intent = %result.intent,
            confidence = result.confidence,
            state = ?self.state,
            "Classified message"
        );

        result
    }

    /// Labels the classifier can emit in its current state
    pub fn labels(&self) -> Vec<IntentLabel> {
        match (&self.model, self.state) {
            (Some(model), ClassifierState::Loaded | ClassifierState::Trained) => {
                let mut labels = model.classes().to_vec();
                labels.push(IntentLabel::Unknown);
                labels
            }
            _ => IntentLabel::ALL.to_vec(),
        }
    }
}
