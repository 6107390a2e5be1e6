// crates/rule-logic/tests/adapter.rs
// ============================================================================
// Module: Adapter Tests
// Description: Cross-type `map` and `combine` behavior.
// Purpose: Ensure adapted rules delegate faithfully and keep AND semantics.
// Dependencies: rule_logic::adapter, support fixtures
// ============================================================================
//! ## Overview
//! Integration tests for rules lifted across input types.

// ============================================================================
// SECTION: Test Support
// ============================================================================

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

#[path = "support/fixtures.rs"]
mod fixtures;

use fixtures::counted;
use rule_logic::ErrorKind;
use rule_logic::Rule;
use rule_logic::RuleKind;
use rule_logic::combine;
use rule_logic::combine_many;
use rule_logic::combine3;
use rule_logic::map;
use support::TestResult;
use support::ensure;
use support::ensure_eq;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Account owner.
#[derive(Debug, Clone)]
struct User {
    /// Age in years.
    age: u32,
    /// Whether the e-mail address was confirmed.
    verified: bool,
}

/// Incoming request combining a user and a payload.
#[derive(Debug, Clone)]
struct Request {
    /// Requesting user.
    user: User,
    /// Payload size in bytes.
    size: usize,
    /// Request path.
    path: String,
}

/// Returns a request with the given fields.
fn request(age: u32, verified: bool, size: usize) -> Request {
    Request {
        user: User {
            age,
            verified,
        },
        size,
        path: "/orders".to_owned(),
    }
}

/// Rule over users: adult.
fn adult() -> Rule<User> {
    Rule::condition("adult", |user: &User| user.age >= 18)
}

/// Rule over sizes: small payload.
fn small() -> Rule<usize> {
    Rule::condition("small", |size: &usize| *size <= 1024)
}

// ============================================================================
// SECTION: Map
// ============================================================================

/// Tests that a map agrees with the inner rule on the extracted value.
#[test]
fn test_map_delegates_to_inner() -> TestResult {
    let mapped = Rule::map("adult requester", adult(), |req: &Request| req.user.clone());
    for age in [10, 17, 18, 40] {
        let input = request(age, true, 0);
        ensure_eq(&mapped.evaluate(&input)?, &adult().evaluate(&input.user)?, "agreement")?;
    }
    ensure_eq(&mapped.kind(), &RuleKind::Mapped, "kind")?;
    ensure(mapped.children().is_empty(), "mapped rules expose no same-type children")?;
    Ok(())
}

/// Tests that the free function and the associated constructor agree.
#[test]
fn test_free_map() -> TestResult {
    let path_rule = Rule::condition("api path", |path: &String| path.starts_with('/'));
    let mapped: Rule<Request> = map("request path", path_rule, |req: &Request| req.path.clone());
    ensure_eq(&mapped.evaluate(&request(20, true, 0))?, &true, "verdict")?;
    ensure_eq(mapped.name(), "request path", "name")?;
    Ok(())
}

/// Tests that a missing inner rule fails without running the extractor.
#[test]
fn test_map_missing_inner() -> TestResult {
    let (target, target_calls) = counted::<Request>("target", true);
    let mapped = Rule::map("orphan", None::<Rule<User>>, move |req: &Request| {
        let _ = target.evaluate(req);
        req.user.clone()
    });
    let Err(error) = mapped.evaluate(&request(30, true, 0)) else {
        return Err("missing inner rule must fail".into());
    };
    ensure_eq(&error.kind(), &ErrorKind::NilRule, "kind")?;
    ensure_eq(&error.to_string(), &"evaluating mapped rule \"orphan\": nil rule", "message")?;
    ensure_eq(&target_calls.get(), &0, "extractor not run")?;
    Ok(())
}

/// Tests that inner errors carry both the map and the inner rule in context.
#[test]
fn test_map_wraps_inner_error() -> TestResult {
    let inner = fixtures::broken::<User>("credit check", "bureau");
    let mapped = Rule::map("requester credit", inner, |req: &Request| req.user.clone());
    let Err(error) = mapped.evaluate(&request(30, true, 0)) else {
        return Err("inner error must surface".into());
    };
    ensure_eq(&error.rule_path(), &["requester credit", "credit check"], "path")?;
    Ok(())
}

/// Tests structural accounting across a map boundary.
#[test]
fn test_map_structure() -> TestResult {
    let inner = Rule::and("profile", [adult(), Rule::condition("verified", |u: &User| u.verified)]);
    let mapped = Rule::map("requester", inner, |req: &Request| req.user.clone());
    ensure_eq(&mapped.complexity(), &4, "complexity")?;
    ensure_eq(&mapped.depth(), &3, "depth")?;
    Ok(())
}

// ============================================================================
// SECTION: Combine
// ============================================================================

/// Tests the two-way combine.
#[test]
fn test_combine_two() -> TestResult {
    let rule = combine(
        "valid request",
        adult(),
        |req: &Request| req.user.clone(),
        small(),
        |req: &Request| req.size,
    );
    ensure_eq(&rule.kind(), &RuleKind::And, "kind")?;
    let names: Vec<&str> = rule.children().iter().flatten().map(Rule::name).collect();
    ensure_eq(&names, &["extracted-1", "extracted-2"], "child names")?;

    ensure_eq(&rule.evaluate(&request(30, true, 100))?, &true, "both hold")?;
    ensure_eq(&rule.evaluate(&request(12, true, 100))?, &false, "minor")?;
    ensure_eq(&rule.evaluate(&request(30, true, 4096))?, &false, "oversized")?;
    Ok(())
}

/// Tests that combine keeps AND's short-circuit order.
#[test]
fn test_combine_short_circuits() -> TestResult {
    let (second, second_calls) = counted::<usize>("size check", true);
    let rule = combine(
        "valid request",
        adult(),
        |req: &Request| req.user.clone(),
        second,
        |req: &Request| req.size,
    );
    ensure_eq(&rule.evaluate(&request(12, true, 0))?, &false, "verdict")?;
    ensure_eq(&second_calls.get(), &0, "second extractor branch skipped")?;
    Ok(())
}

/// Tests the three-way combine.
#[test]
fn test_combine_three() -> TestResult {
    let verified = Rule::condition("verified", |flag: &bool| *flag);
    let rule = combine3(
        "strict request",
        adult(),
        |req: &Request| req.user.clone(),
        small(),
        |req: &Request| req.size,
        verified,
        |req: &Request| req.user.verified,
    );
    ensure_eq(&rule.children().len(), &3, "children")?;
    ensure_eq(
        &rule.children()[2].as_ref().map(Rule::name),
        &Some("extracted-3"),
        "third child name",
    )?;
    ensure_eq(&rule.evaluate(&request(30, true, 10))?, &true, "all hold")?;
    ensure_eq(&rule.evaluate(&request(30, false, 10))?, &false, "unverified")?;
    Ok(())
}

/// Tests combining pre-mapped rules.
#[test]
fn test_combine_many() -> TestResult {
    let rules = vec![
        Rule::map("age", adult(), |req: &Request| req.user.clone()),
        Rule::map("size", small(), |req: &Request| req.size),
        Rule::condition("path", |req: &Request| req.path == "/orders"),
    ];
    let rule = combine_many("request", rules);
    ensure_eq(&rule.evaluate(&request(30, true, 10))?, &true, "all hold")?;
    ensure_eq(&rule.evaluate(&request(30, true, 2048))?, &false, "size fails")?;

    let empty = combine_many("nothing", Vec::<Rule<Request>>::new());
    let Err(error) = empty.evaluate(&request(1, true, 1)) else {
        return Err("empty combine must fail".into());
    };
    ensure_eq(&error.kind(), &ErrorKind::EmptyRuleSet, "empty combine")?;
    Ok(())
}
