use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    types::{Label, PredictionResult, HAM_CLASS, SPAM_CLASS},
    vectorizer::FeatureVector,
};

/// Classifier section of the model artifact: one row per class, ham first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSection {
    pub class_log_prior: Vec<f64>,
    pub feature_log_prob: Vec<Vec<f64>>,
}

/// Two-class multinomial naive Bayes over TF-IDF rows.
pub struct NaiveBayes {
    class_log_prior: [f64; 2],
    feature_log_prob: [Vec<f64>; 2],
}

impl NaiveBayes {
    pub fn from_section(section: ClassifierSection, n_features: usize) -> Result<Self, AppError> {
        let prior: [f64; 2] = section
            .class_log_prior
            .as_slice()
            .try_into()
            .map_err(|_| {
                AppError::ModelLoad(format!(
                    "expected 2 class log-priors, found {}",
                    section.class_log_prior.len()
                ))
            })?;
        if prior.iter().any(|p| !p.is_finite()) {
            return Err(AppError::ModelLoad("class_log_prior contains a non-finite value".to_string()));
        }

        let rows = section.feature_log_prob.len();
        let [ham, spam]: [Vec<f64>; 2] = section
            .feature_log_prob
            .try_into()
            .map_err(|_| AppError::ModelLoad(format!("expected 2 feature_log_prob rows, found {}", rows)))?;

        for (class, row) in [(HAM_CLASS, &ham), (SPAM_CLASS, &spam)] {
            if row.len() != n_features {
                return Err(AppError::ModelLoad(format!(
                    "feature_log_prob[{}] has {} entries but vocabulary has {}",
                    class,
                    row.len(),
                    n_features
                )));
            }
            if let Some(bad) = row.iter().position(|v| !v.is_finite()) {
                return Err(AppError::ModelLoad(format!(
                    "feature_log_prob[{}][{}] is not finite",
                    class, bad
                )));
            }
        }

        Ok(Self {
            class_log_prior: prior,
            feature_log_prob: [ham, spam],
        })
    }

    pub fn spam_log_probs(&self) -> &[f64] {
        &self.feature_log_prob[SPAM_CLASS]
    }

    /// `log P(c) + sum_i x_i * log P(term_i | c)` for both classes.
    ///
    /// Row indices must be in range for the vocabulary; the model loader
    /// guarantees this for rows produced by the paired vectorizer.
    pub fn joint_log_likelihood(&self, x: &FeatureVector) -> [f64; 2] {
        let mut jll = self.class_log_prior;
        for (i, value) in x.iter() {
            jll[HAM_CLASS] += value * self.feature_log_prob[HAM_CLASS][i];
            jll[SPAM_CLASS] += value * self.feature_log_prob[SPAM_CLASS][i];
        }
        jll
    }

    pub fn predict_proba(&self, x: &FeatureVector) -> [f64; 2] {
        normalize_log_probs(self.joint_log_likelihood(x))
    }

    pub fn predict(&self, x: &FeatureVector) -> PredictionResult {
        let [ham_prob, spam_prob] = self.predict_proba(x);

        // arg-max, first class wins ties
        let class = if spam_prob > ham_prob { SPAM_CLASS } else { HAM_CLASS };

        PredictionResult {
            label: Label::from_class(class),
            ham_prob,
            spam_prob,
        }
    }
}

fn normalize_log_probs(jll: [f64; 2]) -> [f64; 2] {
    let max = jll[0].max(jll[1]);
    let log_norm = max + ((jll[0] - max).exp() + (jll[1] - max).exp()).ln();
    [(jll[0] - log_norm).exp(), (jll[1] - log_norm).exp()]
}
