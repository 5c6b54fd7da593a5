use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const HAM_CLASS: usize = 0;
pub const SPAM_CLASS: usize = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Label {
    #[serde(rename = "Not Spam")]
    Ham,
    Spam,
}

impl Label {
    pub fn from_class(class: usize) -> Self {
        if class == SPAM_CLASS {
            Label::Spam
        } else {
            Label::Ham
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Ham => "Not Spam",
            Label::Spam => "Spam",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub label: Label,
    pub ham_prob: f64,
    pub spam_prob: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordEntry {
    pub term: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    pub entries: Vec<KeywordEntry>,
    pub is_empty: bool,
}

impl From<Vec<KeywordEntry>> for Explanation {
    fn from(entries: Vec<KeywordEntry>) -> Self {
        let is_empty = entries.is_empty();
        Self { entries, is_empty }
    }
}

impl Explanation {
    pub fn keywords(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.term.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResponse {
    pub request_id: Uuid,
    pub prediction: PredictionResult,
    pub explanation: Explanation,
    pub summary: String,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfoResponse {
    pub model_version: String,
    pub format_version: u32,
    pub fingerprint: String,
    pub vocabulary_size: usize,
    pub ngram_range: (usize, usize),
    pub top_k: usize,
}
