use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{fs, path::Path};
use tracing::info;

use crate::{
    classifier::{ClassifierSection, NaiveBayes},
    error::AppError,
    vectorizer::{TfidfVectorizer, VectorizerSection},
};

pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// On-disk layout of an exported TF-IDF + naive Bayes pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default = "default_model_version")]
    pub model_version: String,
    pub vectorizer: VectorizerSection,
    pub classifier: ClassifierSection,
}

fn default_model_version() -> String {
    "unversioned".to_string()
}

/// Loaded pipeline. Built once at startup and shared read-only.
pub struct ModelContext {
    model_version: String,
    format_version: u32,
    fingerprint: String,
    vectorizer: TfidfVectorizer,
    classifier: NaiveBayes,
}

impl ModelContext {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|e| AppError::ModelLoad(format!("cannot read {}: {}", path.display(), e)))?;
        let model = Self::from_bytes(&bytes)?;

        info!(
            "Loaded model {} from {} ({} terms, sha256 {})",
            model.model_version,
            path.display(),
            model.vocabulary().len(),
            model.fingerprint
        );
        Ok(model)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AppError> {
        let artifact: ModelArtifact = serde_json::from_slice(bytes)?;
        let fingerprint = hex::encode(Sha256::digest(bytes));
        Self::from_artifact(artifact, fingerprint)
    }

    pub fn from_artifact(artifact: ModelArtifact, fingerprint: String) -> Result<Self, AppError> {
        if artifact.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(AppError::ModelLoad(format!(
                "unsupported format_version {} (expected {})",
                artifact.format_version, SUPPORTED_FORMAT_VERSION
            )));
        }

        let vectorizer = TfidfVectorizer::from_section(artifact.vectorizer)?;
        let classifier = NaiveBayes::from_section(artifact.classifier, vectorizer.vocabulary().len())?;

        Ok(Self {
            model_version: artifact.model_version,
            format_version: artifact.format_version,
            fingerprint,
            vectorizer,
            classifier,
        })
    }

    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &NaiveBayes {
        &self.classifier
    }

    pub fn vocabulary(&self) -> &[String] {
        self.vectorizer.vocabulary()
    }

    pub fn spam_log_probs(&self) -> &[f64] {
        self.classifier.spam_log_probs()
    }
}
