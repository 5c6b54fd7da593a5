use std::sync::Arc;

use crate::{model::ModelContext, types::PredictionResult, vectorizer::FeatureVector};

/// Text in, model outputs out. Total for any input string.
#[derive(Clone)]
pub struct InferenceAdapter {
    model: Arc<ModelContext>,
}

impl InferenceAdapter {
    pub fn new(model: Arc<ModelContext>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &ModelContext {
        &self.model
    }

    pub fn vectorize(&self, text: &str) -> FeatureVector {
        self.model.vectorizer().transform(text)
    }

    pub fn classify(&self, text: &str) -> PredictionResult {
        let x = self.vectorize(text);
        self.model.classifier().predict(&x)
    }
}
