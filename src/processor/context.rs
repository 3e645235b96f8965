//! Consolidated context assembly.
//!
//! Partial analyses are joined in chunk order and capped at a character
//! budget before they are sent for consolidation.

use tracing::{info, warn};

/// Separator placed between partial analyses.
pub const PART_SEPARATOR: &str = "\n\n";

/// Marker appended to a context cut at the budget.
pub const TRUNCATION_MARKER: &str = "\n... [TRUNCATED]";

/// Joins ordered partial texts and caps the result at `max_chars`.
///
/// # Examples
///
/// ```
/// use docreduce::processor::build_context;
///
/// let parts = vec!["first".to_string(), "second".to_string()];
/// assert_eq!(build_context(&parts, 100), "first\n\nsecond");
/// assert_eq!(build_context(&parts, 5), "first\n... [TRUNCATED]");
/// ```
#[must_use]
pub fn build_context(parts: &[String], max_chars: usize) -> String {
    truncate_context(parts.join(PART_SEPARATOR), max_chars)
}

/// Cuts `text` to `max_chars` characters and appends the marker.
///
/// Text at or under the budget is returned unchanged. Lengths are counted in
/// characters, never splitting a multi-byte character.
#[must_use]
pub fn truncate_context(mut text: String, max_chars: usize) -> String {
    let cut = text.char_indices().nth(max_chars).map(|(index, _)| index);
    let Some(cut) = cut else {
        info!(chars = text.chars().count(), "consolidated context built");
        return text;
    };

    let before = text.chars().count();
    text.truncate(cut);
    text.push_str(TRUNCATION_MARKER);
    warn!(
        before,
        after = max_chars,
        "consolidated context over budget, truncated"
    );
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PartialResult, order_results};
    use proptest::prelude::*;

    #[test]
    fn test_under_budget_unchanged() {
        let parts = vec!["a".repeat(10), "b".repeat(10)];
        assert_eq!(build_context(&parts, 22), format!("{}\n\n{}", "a".repeat(10), "b".repeat(10)));
    }

    #[test]
    fn test_exactly_at_budget_unchanged() {
        assert_eq!(truncate_context("abcd".to_string(), 4), "abcd");
    }

    #[test]
    fn test_over_budget_truncated() {
        assert_eq!(truncate_context("abcdef".to_string(), 4), "abcd\n... [TRUNCATED]");
    }

    #[test]
    fn test_zero_budget() {
        assert_eq!(truncate_context("abc".to_string(), 0), TRUNCATION_MARKER);
    }

    #[test]
    fn test_multibyte_characters() {
        let text = "ñandú über straße".to_string();
        let cut = truncate_context(text, 5);
        assert_eq!(cut, format!("ñandú{TRUNCATION_MARKER}"));
    }

    #[test]
    fn test_empty_parts() {
        assert_eq!(build_context(&[], 10), "");
    }

    proptest! {
        #[test]
        fn truncation_respects_budget(text in "\\PC{0,300}", budget in 0usize..200) {
            let len = text.chars().count();
            let out = truncate_context(text.clone(), budget);
            if len <= budget {
                prop_assert_eq!(out, text);
            } else {
                prop_assert!(out.ends_with(TRUNCATION_MARKER));
                let kept: String = text.chars().take(budget).collect();
                prop_assert_eq!(out.chars().count(), budget + TRUNCATION_MARKER.chars().count());
                prop_assert!(out.starts_with(&kept));
            }
        }

        #[test]
        fn context_independent_of_completion_order(
            (texts, completion) in prop::collection::vec("[a-z ]{0,20}", 1..12)
                .prop_flat_map(|texts| {
                    let indices: Vec<usize> = (0..texts.len()).collect();
                    (Just(texts), Just(indices).prop_shuffle())
                })
        ) {
            let completed: Vec<PartialResult> = completion
                .iter()
                .map(|&i| PartialResult::new(i + 1, texts[i].clone()))
                .collect();

            let context = build_context(&order_results(completed), 10_000);
            prop_assert_eq!(context, texts.join(PART_SEPARATOR));
        }
    }
}
