//! TF-IDF vectorization over a fixed vocabulary.
//!
//! Mirrors the word analyzer of the pipeline the model was trained with:
//! lowercase, regex tokens, stop-word removal, n-grams, counts, idf weighting
//! and row normalization. Output rows are sparse and sorted by vocabulary index.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap, HashSet},
};
use tracing::debug;

use crate::error::AppError;

pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
    None,
}

/// Sparse TF-IDF row: `(vocabulary index, weight)` pairs in ascending index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn from_entries(mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|(_, weight)| *weight != 0.0);
        entries.sort_by_key(|(index, _)| *index);
        entries.dedup_by_key(|(index, _)| *index);
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|(index, _)| *index)
    }
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Norm {
    Norm::L2
}

/// Vectorizer section of the model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerSection {
    pub vocabulary: Vec<String>,
    pub idf: Vec<f64>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_true")]
    pub use_idf: bool,
    #[serde(default = "default_norm")]
    pub norm: Norm,
}

pub struct TfidfVectorizer {
    vocabulary: Vec<String>,
    index: HashMap<String, usize>,
    idf: Vec<f64>,
    lowercase: bool,
    token_pattern: Regex,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    sublinear_tf: bool,
    use_idf: bool,
    norm: Norm,
}

impl TfidfVectorizer {
    pub fn from_section(section: VectorizerSection) -> Result<Self, AppError> {
        if section.vocabulary.is_empty() {
            return Err(AppError::ModelLoad("vocabulary is empty".to_string()));
        }
        if section.idf.len() != section.vocabulary.len() {
            return Err(AppError::ModelLoad(format!(
                "idf has {} entries but vocabulary has {}",
                section.idf.len(),
                section.vocabulary.len()
            )));
        }
        if let Some(bad) = section.idf.iter().position(|v| !v.is_finite() || *v < 0.0) {
            return Err(AppError::ModelLoad(format!("idf[{}] is not a finite non-negative value", bad)));
        }

        let (min_n, max_n) = section.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(AppError::ModelLoad(format!("invalid ngram_range ({}, {})", min_n, max_n)));
        }

        let mut index = HashMap::with_capacity(section.vocabulary.len());
        for (i, term) in section.vocabulary.iter().enumerate() {
            if index.insert(term.clone(), i).is_some() {
                return Err(AppError::ModelLoad(format!("duplicate vocabulary term {:?}", term)));
            }
        }

        let token_pattern = Regex::new(&section.token_pattern)?;

        Ok(Self {
            vocabulary: section.vocabulary,
            index,
            idf: section.idf,
            lowercase: section.lowercase,
            token_pattern,
            ngram_range: section.ngram_range,
            stop_words: section.stop_words.into_iter().collect(),
            sublinear_tf: section.sublinear_tf,
            use_idf: section.use_idf,
            norm: section.norm,
        })
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    pub fn transform(&self, text: &str) -> FeatureVector {
        let terms = self.analyze(text);

        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for term in &terms {
            if let Some(&i) = self.index.get(term) {
                *counts.entry(i).or_insert(0) += 1;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(i, count)| {
                let mut tf = count as f64;
                if self.sublinear_tf {
                    tf = 1.0 + tf.ln();
                }
                let weight = if self.use_idf { tf * self.idf[i] } else { tf };
                (i, weight)
            })
            .collect();

        let norm = match self.norm {
            Norm::L2 => entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt(),
            Norm::L1 => entries.iter().map(|(_, w)| w.abs()).sum::<f64>(),
            Norm::None => 0.0,
        };
        if norm > 0.0 {
            for (_, w) in entries.iter_mut() {
                *w /= norm;
            }
        }

        debug!("Vectorized {} terms into {} known features", terms.len(), entries.len());
        FeatureVector::from_entries(entries)
    }

    /// Tokens after stop-word removal, expanded to the configured n-grams.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text: Cow<'_, str> = if self.lowercase {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        };

        let tokens: Vec<&str> = if self.token_pattern.captures_len() > 1 {
            self.token_pattern
                .captures_iter(&text)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
                .collect()
        } else {
            self.token_pattern.find_iter(&text).map(|m| m.as_str()).collect()
        };

        let tokens: Vec<&str> = tokens
            .into_iter()
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        word_ngrams(&tokens, self.ngram_range)
    }
}

fn word_ngrams(tokens: &[&str], (min_n, max_n): (usize, usize)) -> Vec<String> {
    let mut out = Vec::new();
    for n in min_n..=max_n.min(tokens.len()) {
        for window in tokens.windows(n) {
            out.push(window.join(" "));
        }
    }
    out
}
