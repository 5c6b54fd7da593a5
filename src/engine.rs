use std::{sync::Arc, time::Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    explain::explain,
    inference::InferenceAdapter,
    metrics::Metrics,
    model::ModelContext,
    report,
    types::{ClassifyResponse, Explanation, ModelInfoResponse},
};

/// Request path: validate, vectorize, classify, explain, summarize.
pub struct SpamEngine {
    adapter: InferenceAdapter,
    top_k: usize,
    metrics: Metrics,
}

impl SpamEngine {
    pub fn new(model: Arc<ModelContext>, top_k: usize) -> Self {
        info!(
            "Spam engine ready: model {} ({} terms), top_k {}",
            model.model_version(),
            model.vocabulary().len(),
            top_k
        );
        Self {
            adapter: InferenceAdapter::new(model),
            top_k,
            metrics: Metrics::new(),
        }
    }

    pub fn classify(&self, message: &str) -> Result<ClassifyResponse, AppError> {
        let start = Instant::now();

        let message = report::validate_message(message).map_err(|e| {
            warn!("Rejected blank message");
            self.metrics.inc_rejected();
            e
        })?;

        let prediction = self.adapter.classify(message);
        let x = self.adapter.vectorize(message);

        let model = self.adapter.model();
        let entries = explain(&x, model.spam_log_probs(), model.vocabulary(), self.top_k)?;
        let explanation = Explanation::from(entries);
        let summary = report::summary(prediction.label, &explanation);

        let elapsed = start.elapsed();
        self.metrics.observe_classification(prediction.label, elapsed);

        let latency_ms = elapsed.as_secs_f64() * 1000.0;
        debug!(
            "Classified {} chars as {} (spam {:.3}, {} keywords, {:.3}ms)",
            message.chars().count(),
            prediction.label,
            prediction.spam_prob,
            explanation.entries.len(),
            latency_ms
        );

        Ok(ClassifyResponse {
            request_id: Uuid::new_v4(),
            prediction,
            explanation,
            summary,
            latency_ms,
        })
    }

    pub fn model_info(&self) -> ModelInfoResponse {
        let model = self.adapter.model();
        ModelInfoResponse {
            model_version: model.model_version().to_string(),
            format_version: model.format_version(),
            fingerprint: model.fingerprint().to_string(),
            vocabulary_size: model.vocabulary().len(),
            ngram_range: model.vectorizer().ngram_range(),
            top_k: self.top_k,
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
