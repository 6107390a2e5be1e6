// crates/rule-logic/tests/proptest_laws.rs
// ============================================================================
// Module: Rule Property-Based Tests
// Description: Algebraic laws of rule combinators over random verdicts.
// Purpose: Check combinators against reference boolean and counting logic.
// ============================================================================

//! Property-based tests for combinator laws.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use rule_logic::Evaluator;
use rule_logic::Quantifier;
use rule_logic::Rule;

fn constants(verdicts: &[bool]) -> Vec<Rule<()>> {
    verdicts
        .iter()
        .copied()
        .enumerate()
        .map(|(index, verdict)| Rule::new(format!("leaf-{index}"), move |_: &()| Ok(verdict)))
        .collect()
}

fn quantifier_strategy() -> impl Strategy<Value = Quantifier> {
    prop_oneof![
        (0usize .. 10).prop_map(Quantifier::AtLeast),
        (0usize .. 10).prop_map(Quantifier::Exactly),
        (0usize .. 10).prop_map(Quantifier::AtMost),
    ]
}

fn reference_count(quantifier: Quantifier, verdicts: &[bool]) -> bool {
    let count = verdicts.iter().filter(|verdict| **verdict).count();
    match quantifier {
        Quantifier::AtLeast(n) => count >= n,
        Quantifier::Exactly(n) => count == n,
        Quantifier::AtMost(n) => count <= n,
    }
}

proptest! {
    #[test]
    fn and_or_match_iterator_logic(verdicts in prop::collection::vec(any::<bool>(), 1 .. 8)) {
        let and = Rule::and("and", constants(&verdicts));
        let or = Rule::or("or", constants(&verdicts));
        prop_assert_eq!(and.evaluate(&()).ok(), Some(verdicts.iter().all(|v| *v)));
        prop_assert_eq!(or.evaluate(&()).ok(), Some(verdicts.iter().any(|v| *v)));
    }

    #[test]
    fn double_negation_is_identity(value in any::<i32>(), threshold in any::<i32>()) {
        let rule = Rule::condition("above", move |n: &i32| *n > threshold);
        let twice = !!rule.clone();
        prop_assert_eq!(twice.evaluate(&value).ok(), rule.evaluate(&value).ok());
    }

    #[test]
    fn none_of_is_and_of_negations(verdicts in prop::collection::vec(any::<bool>(), 1 .. 8)) {
        let none = Rule::none_of("none", constants(&verdicts));
        let negated: Vec<Rule<()>> = constants(&verdicts).into_iter().map(|rule| !rule).collect();
        let all_negated = Rule::and("all negated", negated);
        prop_assert_eq!(none.evaluate(&()).ok(), all_negated.evaluate(&()).ok());
    }

    #[test]
    fn quantifiers_match_reference_count(
        quantifier in quantifier_strategy(),
        verdicts in prop::collection::vec(any::<bool>(), 0 .. 8)
    ) {
        let rule = Rule::quantified("count", quantifier, constants(&verdicts));
        let expected = reference_count(quantifier, &verdicts);
        prop_assert_eq!(rule.evaluate(&()).ok(), Some(expected));

        let evaluator = Evaluator::new(rule);
        let full = evaluator.evaluate_detailed(&());
        let pruned = evaluator.evaluate_detailed_short_circuit(&());
        prop_assert_eq!(full.satisfied, expected);
        prop_assert_eq!(pruned.satisfied, expected);
        prop_assert_eq!(full.children.len(), verdicts.len());
        prop_assert!(pruned.children.len() <= full.children.len());
    }

    #[test]
    fn detailed_modes_agree_with_fast(verdicts in prop::collection::vec(any::<bool>(), 1 .. 8)) {
        let left = Rule::and("left", constants(&verdicts));
        let right = Rule::not("right", Rule::or("inner", constants(&verdicts)));
        let rule = Rule::or("root", [left, right]);
        let evaluator = Evaluator::new(rule);
        let fast = evaluator.evaluate_fast(&()).ok();
        let full = evaluator.evaluate_detailed(&());
        let pruned = evaluator.evaluate_detailed_short_circuit(&());
        prop_assert_eq!(Some(full.satisfied), fast);
        prop_assert_eq!(Some(pruned.satisfied), fast);
        prop_assert!(pruned.node_count() <= full.node_count());

        let pruned_names: Vec<&str> =
            pruned.children.iter().map(|child| child.rule_name.as_str()).collect();
        let full_names: Vec<&str> =
            full.children.iter().map(|child| child.rule_name.as_str()).collect();
        prop_assert!(full_names.starts_with(&pruned_names));
    }

    #[test]
    fn identity_map_preserves_verdict(value in any::<u16>(), limit in any::<u16>()) {
        let inner = Rule::condition("under limit", move |n: &u16| *n < limit);
        let mapped: Rule<u16> = Rule::map("same value", inner.clone(), |n: &u16| *n);
        prop_assert_eq!(mapped.evaluate(&value).ok(), inner.evaluate(&value).ok());
    }
}
