//! Text analysis and statistical model
//!
//! analyze → TF-IDF row → multinomial naive Bayes posterior

pub mod model;
pub mod naive_bayes;
pub mod tokenizer;
pub mod vectorizer;

pub use model::{Prediction, TrainedModel, MODEL_FORMAT_VERSION};
pub use naive_bayes::MultinomialNaiveBayes;
pub use tokenizer::{TextAnalyzer, TokenizerBackend};
pub use vectorizer::TfIdfVectorizer;
