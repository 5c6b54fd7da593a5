//! Keyword explanations.
//!
//! Every term present in the message is ranked by its spam-class
//! log-probability, regardless of the predicted label. The feature weight only
//! decides membership; it does not influence the ranking.

use tracing::debug;

use crate::{
    error::{inconsistency, AppError},
    types::KeywordEntry,
    vectorizer::FeatureVector,
};

pub const DEFAULT_TOP_K: usize = 5;

/// Top-`top_k` terms of `vector` by spam log-probability, highest first.
///
/// Ties keep the order of `vector` (ascending vocabulary index).
pub fn explain(
    vector: &FeatureVector,
    spam_log_probs: &[f64],
    vocabulary: &[String],
    top_k: usize,
) -> Result<Vec<KeywordEntry>, AppError> {
    if vocabulary.len() != spam_log_probs.len() {
        return Err(inconsistency(format!(
            "vocabulary has {} terms but spam log-probability table has {}",
            vocabulary.len(),
            spam_log_probs.len()
        )));
    }

    if vector.is_empty() {
        debug!("No vocabulary terms present, nothing to explain");
        return Ok(Vec::new());
    }

    let mut scored = Vec::with_capacity(vector.len());
    for index in vector.indices() {
        let (term, weight) = vocabulary
            .get(index)
            .zip(spam_log_probs.get(index))
            .ok_or_else(|| {
                inconsistency(format!(
                    "feature index {} out of range for vocabulary of {}",
                    index,
                    vocabulary.len()
                ))
            })?;
        scored.push(KeywordEntry {
            term: term.clone(),
            weight: *weight,
        });
    }

    // sort_by is stable
    scored.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    scored.truncate(top_k);

    debug!("Explained {} present terms, kept {}", vector.len(), scored.len());
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(terms: &[&str]) -> Vec<String> {
        terms.iter().map(|s| s.to_string()).collect()
    }

    fn present(indices: &[usize]) -> FeatureVector {
        FeatureVector::from_entries(indices.iter().map(|&i| (i, 0.3)).collect())
    }

    fn weights(entries: &[KeywordEntry]) -> Vec<f64> {
        entries.iter().map(|e| e.weight).collect()
    }

    #[test]
    fn test_ranks_by_spam_log_probability() {
        let vocabulary = vocab(&["cash", "click", "free", "now", "prize"]);
        let spam = vec![-1.9, -2.1, -1.4, -2.0, -1.7];

        let result = explain(&present(&[0, 1, 2, 3, 4]), &spam, &vocabulary, DEFAULT_TOP_K).unwrap();
        let terms: Vec<&str> = result.iter().map(|e| e.term.as_str()).collect();
        assert_eq!(terms, vec!["free", "prize", "cash", "now", "click"]);
        assert!(weights(&result).windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_feature_weight_does_not_affect_rank() {
        let vocabulary = vocab(&["a1", "b2"]);
        let spam = vec![-5.0, -1.0];
        let x = FeatureVector::from_entries(vec![(0, 0.99), (1, 0.01)]);

        let result = explain(&x, &spam, &vocabulary, 5).unwrap();
        assert_eq!(result[0].term, "b2");
    }

    #[test]
    fn test_truncates_to_top_k() {
        let vocabulary = vocab(&["t0", "t1", "t2", "t3", "t4", "t5", "t6"]);
        let spam = vec![-7.0, -6.0, -5.0, -4.0, -3.0, -2.0, -1.0];

        let result = explain(&present(&[0, 1, 2, 3, 4, 5, 6]), &spam, &vocabulary, 5).unwrap();
        assert_eq!(result.len(), 5);
        assert_eq!(weights(&result), vec![-1.0, -2.0, -3.0, -4.0, -5.0]);

        assert!(explain(&present(&[0, 1]), &spam, &vocabulary, 0).unwrap().is_empty());
    }

    #[test]
    fn test_fewer_terms_than_top_k() {
        let vocabulary = vocab(&["cash", "lunch", "prize"]);
        let spam = vec![-1.9, -4.8, -1.7];

        let result = explain(&present(&[0, 2]), &spam, &vocabulary, 5).unwrap();
        assert_eq!(
            result,
            vec![
                KeywordEntry { term: "prize".to_string(), weight: -1.7 },
                KeywordEntry { term: "cash".to_string(), weight: -1.9 },
            ]
        );
    }

    #[test]
    fn test_empty_vector_gives_empty_explanation() {
        let vocabulary = vocab(&["cash"]);
        let result = explain(&FeatureVector::default(), &[-1.0], &vocabulary, 5).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_ties_keep_index_order() {
        let vocabulary = vocab(&["alpha", "beta", "gamma", "delta"]);
        let spam = vec![-2.0, -1.0, -2.0, -2.0];

        let result = explain(&present(&[3, 0, 2, 1]), &spam, &vocabulary, 5).unwrap();
        let terms: Vec<&str> = result.iter().map(|e| e.term.as_str()).collect();
        assert_eq!(terms, vec!["beta", "alpha", "gamma", "delta"]);
    }

    #[test]
    fn test_is_deterministic() {
        let vocabulary = vocab(&["a1", "b2", "c3"]);
        let spam = vec![-1.5, -1.5, -0.5];
        let x = present(&[0, 1, 2]);

        let first = explain(&x, &spam, &vocabulary, 2).unwrap();
        for _ in 0..10 {
            assert_eq!(explain(&x, &spam, &vocabulary, 2).unwrap(), first);
        }
    }

    #[test]
    fn test_fails_fast_on_inconsistent_tables() {
        let vocabulary = vocab(&["cash", "free"]);

        let mismatch = explain(&present(&[0]), &[-1.0], &vocabulary, 5);
        assert!(matches!(mismatch, Err(AppError::ModelInconsistency(_))));

        let out_of_range = explain(&present(&[0, 7]), &[-1.0, -2.0], &vocabulary, 5);
        assert!(matches!(out_of_range, Err(AppError::ModelInconsistency(_))));
    }
}
