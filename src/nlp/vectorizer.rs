//! TF-IDF vectorizer over analyzed tokens

use crate::error::ChatbotError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Term-frequency / inverse-document-frequency feature extractor.
///
/// Rows are raw term counts scaled by smoothed IDF
/// (`ln((1 + n) / (1 + df)) + 1`) and then L2-normalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TfIdfVectorizer {
    /// term -> column index
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    n_documents: usize,
}

impl TfIdfVectorizer {
    /// Fit vocabulary and IDF weights on already-analyzed documents.
    pub fn fit(documents: &[Vec<String>]) -> Result<Self> {
        if documents.is_empty() {
            return Err(ChatbotError::TrainingError(
                "Cannot fit vectorizer on an empty corpus".to_string(),
            ));
        }

        let mut vocabulary = BTreeMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        for doc in documents {
            // first-seen order keeps column indices stable across fits
            let mut seen: HashSet<&String> = HashSet::new();
            for term in doc.iter().filter(|term| seen.insert(*term)) {
                let next_index = vocabulary.len();
                let idx = *vocabulary.entry(term.clone()).or_insert(next_index);
                if idx == document_frequency.len() {
                    document_frequency.push(0);
                }
                document_frequency[idx] += 1;
            }
        }

        if vocabulary.is_empty() {
            return Err(ChatbotError::TrainingError(
                "Corpus produced an empty vocabulary".to_string(),
            ));
        }

        let n = documents.len() as f64;
        let idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        Ok(Self {
            vocabulary,
            idf,
            n_documents: documents.len(),
        })
    }

    /// Dense feature row for one analyzed document. Unknown terms are dropped.
    pub fn transform(&self, tokens: &[String]) -> Vec<f64> {
        let mut row = vec![0.0; self.vocabulary.len()];

        for token in tokens {
            if let Some(&idx) = self.vocabulary.get(token) {
                row[idx] += 1.0;
            }
        }

        for (value, idf) in row.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut row {
                *value /= norm;
            }
        }

        row
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }
}
