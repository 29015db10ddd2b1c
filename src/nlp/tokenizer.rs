//! Text analysis: tokenization and stopword filtering
//!
//! Two interchangeable backends produce the same token contract (lowercase
//! alphanumeric words, punctuation stripped):
//! - Linguistic: Unicode word segmentation (UAX #29) with an external stopword corpus
//! - Regex: plain word scan with the built-in stopword set
//!
//! The backend is picked once when the analyzer is initialized.

use crate::error::ChatbotError;
use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use unicode_segmentation::UnicodeSegmentation;

/// Common English function words, 127 entries
const BUILTIN_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now",
];

lazy_static! {
    // Word characters minus underscore, so "up_down" splits like "up-down".
    static ref WORD_PATTERN: Regex = Regex::new(r"[^\W_]+").expect("word pattern is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerBackend {
    Linguistic,
    Regex,
}

impl TokenizerBackend {
    pub fn name(&self) -> &'static str {
        match self {
            TokenizerBackend::Linguistic => "linguistic",
            TokenizerBackend::Regex => "regex",
        }
    }
}

/// Tokenizer plus stopword set, fixed for the process lifetime
#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    backend: TokenizerBackend,
    stopwords: HashSet<String>,
}

impl TextAnalyzer {
    /// Pick the backend once. A missing, unreadable or empty stopword
    /// resource degrades to the regex tokenizer with built-in stopwords.
    pub fn initialize(resource: Option<&Path>) -> Self {
        let Some(path) = resource else {
            warn!("No stopword resource configured, using regex tokenizer with built-in stopwords");
            return Self::regex_fallback();
        };

        match load_stopword_resource(path) {
            Ok(stopwords) => {
                info!(
                    path = %path.display(),
                    stopword_count = stopwords.len(),
                    "Linguistic tokenizer initialized"
                );
                Self::linguistic(stopwords)
            }
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Stopword resource unavailable, falling back to regex tokenizer"
                );
                Self::regex_fallback()
            }
        }
    }

    pub fn linguistic(stopwords: HashSet<String>) -> Self {
        Self {
            backend: TokenizerBackend::Linguistic,
            stopwords,
        }
    }

    pub fn regex_fallback() -> Self {
        Self {
            backend: TokenizerBackend::Regex,
            stopwords: BUILTIN_STOPWORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn backend(&self) -> TokenizerBackend {
        self.backend
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    /// Backend name plus a digest of the stopword set, e.g. `regex:1f0c...`.
    /// Two analyzers with equal signatures produce the same analyzed tokens.
    pub fn signature(&self) -> String {
        let mut words: Vec<&str> = self.stopwords.iter().map(String::as_str).collect();
        words.sort_unstable();
        let digest = hex::encode(Sha256::digest(words.join("\n").as_bytes()));
        format!("{}:{}", self.backend.name(), &digest[..16])
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Lowercase word tokens, split on every non-alphanumeric character
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        match self.backend {
            TokenizerBackend::Linguistic => text
                .unicode_words()
                .flat_map(|word| word.split(|c: char| !c.is_alphanumeric()))
                .filter(|piece| !piece.is_empty())
                .map(|piece| piece.to_lowercase())
                .collect(),
            TokenizerBackend::Regex => {
                let lowered = text.to_lowercase();
                WORD_PATTERN
                    .find_iter(&lowered)
                    .map(|m| m.as_str().to_string())
                    .collect()
            }
        }
    }

    /// Tokens with stopwords removed; this is what the vectorizer sees
    pub fn analyze(&self, text: &str) -> Vec<String> {
        self.tokenize(text)
            .into_iter()
            .filter(|token| !self.is_stopword(token))
            .collect()
    }
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::regex_fallback()
    }
}

/// One word per line, `#` starts a comment line
fn load_stopword_resource(path: &Path) -> Result<HashSet<String>> {
    let content = fs::read_to_string(path)?;

    let stopwords: HashSet<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect();

    if stopwords.is_empty() {
        return Err(ChatbotError::ConfigError(format!(
            "Stopword resource {} contains no words",
            path.display()
        )));
    }

    Ok(stopwords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_stopword_set_size() {
        let analyzer = TextAnalyzer::regex_fallback();
        assert_eq!(analyzer.stopword_count(), 127);
        assert!(analyzer.is_stopword("the"));
        assert!(!analyzer.is_stopword("stock"));
    }

    #[test]
    fn test_signature_tracks_backend_and_stopwords() {
        let regex = TextAnalyzer::regex_fallback();
        assert!(regex.signature().starts_with("regex:"));
        assert_eq!(regex.signature(), TextAnalyzer::default().signature());

        let builtin: HashSet<String> = BUILTIN_STOPWORDS.iter().map(|w| w.to_string()).collect();
        let linguistic = TextAnalyzer::linguistic(builtin.clone());
        assert!(linguistic.signature().starts_with("linguistic:"));
        assert_ne!(linguistic.signature(), regex.signature());

        let mut fewer = builtin;
        fewer.remove("the");
        assert_ne!(TextAnalyzer::linguistic(fewer).signature(), linguistic.signature());
    }

    #[test]
    fn test_regex_tokenize_strips_punctuation() {
        let analyzer = TextAnalyzer::regex_fallback();
        assert_eq!(
            analyzer.tokenize("What's the S&P 500 doing?!"),
            vec!["what", "s", "the", "s", "p", "500", "doing"]
        );
    }

    #[test]
    fn test_analyze_removes_stopwords() {
        let analyzer = TextAnalyzer::regex_fallback();
        assert_eq!(
            analyzer.analyze("What's the current price of Apple stock?"),
            vec!["current", "price", "apple", "stock"]
        );
    }

    #[test]
    fn test_backends_agree_on_ascii_text() {
        let regex = TextAnalyzer::regex_fallback();
        let linguistic = TextAnalyzer::linguistic(HashSet::new());

        for text in [
            "Hello, World! What's up_down 42",
            "How much is MSFT trading for?",
            "e-mail me at 3pm... thanks",
            "",
        ] {
            assert_eq!(regex.tokenize(text), linguistic.tokenize(text), "text: {text}");
        }
    }

    #[test]
    fn test_non_linguistic_input_is_harmless() {
        let analyzer = TextAnalyzer::regex_fallback();
        assert!(analyzer.analyze("!!! ??? ---").is_empty());
        assert!(analyzer.analyze("").is_empty());
    }

    #[test]
    fn test_initialize_without_resource_falls_back() {
        let analyzer = TextAnalyzer::initialize(None);
        assert_eq!(analyzer.backend(), TokenizerBackend::Regex);
    }

    #[test]
    fn test_initialize_with_missing_resource_falls_back() {
        let analyzer = TextAnalyzer::initialize(Some(Path::new("/nonexistent/stopwords/english")));
        assert_eq!(analyzer.backend(), TokenizerBackend::Regex);
        assert_eq!(analyzer.stopword_count(), 127);
    }

    #[test]
    fn test_initialize_with_empty_resource_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# nothing but a comment").unwrap();

        let analyzer = TextAnalyzer::initialize(Some(file.path()));
        assert_eq!(analyzer.backend(), TokenizerBackend::Regex);
    }

    #[test]
    fn test_initialize_with_resource_uses_linguistic_backend() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# custom list").unwrap();
        writeln!(file, "The").unwrap();
        writeln!(file, "of").unwrap();

        let analyzer = TextAnalyzer::initialize(Some(file.path()));
        assert_eq!(analyzer.backend(), TokenizerBackend::Linguistic);
        assert_eq!(analyzer.stopword_count(), 2);
        assert_eq!(analyzer.analyze("The price of gold"), vec!["price", "gold"]);
    }
}
