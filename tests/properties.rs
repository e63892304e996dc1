//! Property tests for matching and comparison.

use cobie_validation::prelude::*;
use proptest::prelude::*;

fn style_strategy() -> impl Strategy<Value = VisualAttentionStyle> {
    prop_oneof![
        Just(VisualAttentionStyle::None),
        Just(VisualAttentionStyle::Green),
        Just(VisualAttentionStyle::Amber),
        Just(VisualAttentionStyle::Red),
    ]
}

fn object_with_codes(name: &str, prefix: &str, codes: &[u8]) -> CobieObject {
    codes.iter().fold(CobieObject::new(name), |object, code| {
        object.with_category(Category::new("Uniclass2015", format!("{}_{}", prefix, code)))
    })
}

/// Requirement with integer attributes `a0..an` and a submission carrying a
/// subset of them with possibly different values.
fn requirement_and_submission(
    required: &[i64],
    submitted: &[Option<i64>],
) -> (CobieObject, CobieObject) {
    let category = Category::new("Uniclass2015", "Pr_40");
    let mut requirement = CobieObject::new("Node").with_category(category.clone());
    let mut submission = CobieObject::new("Node").with_category(category);

    for (i, value) in required.iter().enumerate() {
        requirement = requirement.with_attribute(format!("a{}", i), *value);
        if let Some(Some(found)) = submitted.get(i) {
            submission = submission.with_attribute(format!("a{}", i), *found);
        }
    }
    (requirement, submission)
}

proptest! {
    /// Nodes sharing no category never become candidates.
    #[test]
    fn no_shared_category_no_candidates(
        required in prop::collection::vec(0u8..50, 1..5),
        pooled in prop::collection::vec(prop::collection::vec(0u8..50, 0..4), 0..8),
    ) {
        let requirement = object_with_codes("Door", "Pr", &required);
        let pool: Vec<CobieObject> = pooled
            .iter()
            .map(|codes| object_with_codes("Door", "Ss", codes))
            .collect();

        let matcher = CandidateMatcher::new(&pool, MatchStrategy::Category);
        prop_assert!(matcher.candidates(&requirement).is_empty());
    }

    /// Full termination reports one outcome per required attribute.
    #[test]
    fn full_mode_reports_every_attribute(
        required in prop::collection::vec(0i64..5, 0..8),
        submitted in prop::collection::vec(prop::option::of(0i64..5), 0..8),
    ) {
        let (requirement, submission) = requirement_and_submission(&required, &submitted);
        let result = ObjectValidator::new().validate(&requirement, Some(&submission), TerminationMode::Full);

        prop_assert_eq!(result.outcomes.len(), required.len());
        prop_assert!(result.outcomes.iter().all(|o| o.style != VisualAttentionStyle::None));
    }

    /// After the first non-green outcome everything stays unevaluated.
    #[test]
    fn stop_on_first_fail_leaves_rest_none(
        required in prop::collection::vec(0i64..3, 1..8),
        submitted in prop::collection::vec(prop::option::of(0i64..3), 0..8),
    ) {
        let (requirement, submission) = requirement_and_submission(&required, &submitted);
        let result = ObjectValidator::new().validate(
            &requirement,
            Some(&submission),
            TerminationMode::StopOnFirstFail,
        );

        prop_assert_eq!(result.outcomes.len(), required.len());
        if let Some(first) = result.outcomes.iter().position(|o| !o.style.is_green()) {
            prop_assert_ne!(result.outcomes[first].style, VisualAttentionStyle::None);
            prop_assert!(result.outcomes[first + 1..]
                .iter()
                .all(|o| o.style == VisualAttentionStyle::None));
        }
    }

    /// Red wins, then Amber, then Green only when everything is green.
    #[test]
    fn roll_up_law(styles in prop::collection::vec(style_strategy(), 0..10)) {
        let rolled = VisualAttentionStyle::roll_up(styles.iter().copied());

        let expected = if styles.contains(&VisualAttentionStyle::Red) {
            VisualAttentionStyle::Red
        } else if styles.contains(&VisualAttentionStyle::Amber) {
            VisualAttentionStyle::Amber
        } else if !styles.is_empty() && styles.iter().all(|s| *s == VisualAttentionStyle::Green) {
            VisualAttentionStyle::Green
        } else {
            VisualAttentionStyle::None
        };
        prop_assert_eq!(rolled, expected);
    }

    /// Decimals within the tolerance compare equal.
    #[test]
    fn decimals_within_tolerance_match(value in -1.0e6f64..1.0e6, offset in -0.9e-7f64..0.9e-7) {
        let required = AttributeValue::Decimal(value);
        let submitted = AttributeValue::Decimal(value + offset);
        prop_assert!(required.matches(&submitted));
    }
}
