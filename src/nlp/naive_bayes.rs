//! Multinomial naive Bayes over TF-IDF rows

use crate::error::ChatbotError;
use crate::models::IntentLabel;
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MultinomialNaiveBayes {
    /// Labels seen during fit, in `IntentLabel` order
    classes: Vec<IntentLabel>,
    class_log_prior: Vec<f64>,
    /// `[class][feature]`
    feature_log_prob: Vec<Vec<f64>>,
    alpha: f64,
}

impl MultinomialNaiveBayes {
    /// Laplace smoothing
    pub const DEFAULT_ALPHA: f64 = 1.0;

    pub fn fit(rows: &[Vec<f64>], labels: &[IntentLabel], alpha: f64) -> Result<Self> {
        if rows.is_empty() || rows.len() != labels.len() {
            return Err(ChatbotError::TrainingError(format!(
                "Expected one label per row, got {} rows and {} labels",
                rows.len(),
                labels.len()
            )));
        }

        let width = rows[0].len();
        if width == 0 || rows.iter().any(|row| row.len() != width) {
            return Err(ChatbotError::TrainingError(
                "Feature rows must share a non-zero width".to_string(),
            ));
        }

        let mut classes = labels.to_vec();
        classes.sort();
        classes.dedup();

        let mut class_counts = vec![0usize; classes.len()];
        let mut feature_counts = vec![vec![0.0; width]; classes.len()];

        for (row, label) in rows.iter().zip(labels) {
            // classes was built from labels, so the search always succeeds
            let Ok(c) = classes.binary_search(label) else {
                continue;
            };
            class_counts[c] += 1;
            for (acc, value) in feature_counts[c].iter_mut().zip(row) {
                *acc += value;
            }
        }

        let total = rows.len() as f64;
        let class_log_prior = class_counts
            .iter()
            .map(|&count| (count as f64 / total).ln())
            .collect();

        let feature_log_prob = feature_counts
            .iter()
            .map(|counts| {
                let denominator = counts.iter().sum::<f64>() + alpha * width as f64;
                counts
                    .iter()
                    .map(|count| ((count + alpha) / denominator).ln())
                    .collect()
            })
            .collect();

        Ok(Self {
            classes,
            class_log_prior,
            feature_log_prob,
            alpha,
        })
    }

    pub fn classes(&self) -> &[IntentLabel] {
        &self.classes
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[cfg(test)]
    pub(crate) fn set_feature_log_prob(&mut self, class: usize, feature: usize, value: f64) {
        self.feature_log_prob[class][feature] = value;
    }

    /// Unnormalized log posterior per class
    pub fn joint_log_likelihood(&self, row: &[f64]) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_probs)| {
                prior
                    + log_probs
                        .iter()
                        .zip(row)
                        .map(|(log_prob, value)| log_prob * value)
                        .sum::<f64>()
            })
            .collect()
    }

    /// Best class; the first class wins ties
    pub fn predict(&self, row: &[f64]) -> IntentLabel {
        let jll = self.joint_log_likelihood(row);
        let best = argmax(&jll).unwrap_or(0);
        self.classes
            .get(best)
            .copied()
            .unwrap_or(IntentLabel::Unknown)
    }

    /// Class posteriors in `classes()` order, or `None` when they cannot be
    /// computed (non-finite likelihoods).
    pub fn predict_proba(&self, row: &[f64]) -> Option<Vec<f64>> {
        let jll = self.joint_log_likelihood(row);
        if jll.is_empty() || jll.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let max = jll.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = jll.iter().map(|v| (v - max).exp()).collect();
        let sum: f64 = exps.iter().sum();

        let probs: Vec<f64> = exps.iter().map(|v| v / sum).collect();
        if probs.iter().any(|p| !p.is_finite()) {
            return None;
        }

        Some(probs)
    }
}

/// Index of the largest value; NaN never wins
fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, value)| !value.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (idx, &value)| match best {
            Some((_, current)) if value <= current => best,
            _ => Some((idx, value)),
        })
        .map(|(idx, _)| idx)
}
