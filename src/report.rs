//! User-facing wording for a classification.

use crate::{
    error::{validation_error, AppError},
    types::{Explanation, Label},
};

pub const BLANK_MESSAGE_WARNING: &str = "Please enter a non-empty message.";
pub const WAITING_MESSAGE: &str = "Waiting for input… Type a message on the left and press Classify.";
pub const NO_KEYWORDS_MESSAGE: &str = "No known spam keywords from the model's vocabulary appeared in this message. \
     The decision is based on the overall word distribution.";

/// Blank or whitespace-only messages never reach the model.
pub fn validate_message(message: &str) -> Result<&str, AppError> {
    if message.trim().is_empty() {
        return Err(validation_error(BLANK_MESSAGE_WARNING));
    }
    Ok(message)
}

pub fn summary(label: Label, explanation: &Explanation) -> String {
    if explanation.is_empty {
        return NO_KEYWORDS_MESSAGE.to_string();
    }

    let keywords = explanation.keywords();
    match label {
        Label::Spam => format!(
            "The model marked this as Spam mainly because it contains highly spammy words such as: {}.",
            keywords
        ),
        Label::Ham => format!(
            "The model marked this as Not Spam. It did not detect strong spam patterns; \
             the detected words ({}) are common in normal messages.",
            keywords
        ),
    }
}

/// `0.1234` -> `"12.34%"`
pub fn percent(prob: f64) -> String {
    format!("{:.2}%", prob * 100.0)
}

/// Bar width for a probability, in percent with one decimal.
pub fn bar_width(prob: f64) -> String {
    format!("{:.1}", prob.clamp(0.0, 1.0) * 100.0)
}

pub fn weight(weight: f64) -> String {
    format!("{:.2}", weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KeywordEntry;

    fn explanation(terms: &[&str]) -> Explanation {
        terms
            .iter()
            .map(|t| KeywordEntry { term: t.to_string(), weight: -2.0 })
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_blank_messages_are_rejected() {
        for blank in ["", "   ", "\n\t "] {
            assert!(matches!(validate_message(blank), Err(AppError::InvalidInput(_))));
        }
        assert_eq!(validate_message(" hi ").unwrap(), " hi ");
    }

    #[test]
    fn test_spam_summary_lists_keywords() {
        let text = summary(Label::Spam, &explanation(&["free", "prize"]));
        assert_eq!(
            text,
            "The model marked this as Spam mainly because it contains highly spammy words such as: free, prize."
        );
    }

    #[test]
    fn test_ham_summary_still_uses_keywords() {
        let text = summary(Label::Ham, &explanation(&["lunch"]));
        assert!(text.starts_with("The model marked this as Not Spam."));
        assert!(text.contains("(lunch)"));
    }

    #[test]
    fn test_no_keywords_fallback() {
        assert_eq!(summary(Label::Ham, &explanation(&[])), NO_KEYWORDS_MESSAGE);
        assert_eq!(summary(Label::Spam, &explanation(&[])), NO_KEYWORDS_MESSAGE);
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(percent(0.1234), "12.34%");
        assert_eq!(bar_width(0.98765), "98.8");
        assert_eq!(weight(-6.2149), "-6.21");
    }
}
