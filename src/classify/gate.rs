/// Cost-skip decision: invoke the classifier unless this content is a known
/// duplicate that already carries a classification and the skip policy is
/// enabled. Pure so the policy is testable without a live classifier.
pub fn should_classify(
    is_duplicate: bool,
    has_existing_classification: bool,
    skip_duplicates: bool,
) -> bool {
    !(is_duplicate && has_existing_classification && skip_duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_content_always_classified() {
        assert!(should_classify(false, false, true));
        assert!(should_classify(false, true, true));
        assert!(should_classify(false, false, false));
    }

    #[test]
    fn test_duplicate_with_prior_skipped_under_policy() {
        assert!(!should_classify(true, true, true));
    }

    #[test]
    fn test_duplicate_without_prior_still_classified() {
        assert!(should_classify(true, false, true));
    }

    #[test]
    fn test_policy_disabled_classifies_duplicates() {
        assert!(should_classify(true, true, false));
    }
}
