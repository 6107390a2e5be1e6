// crates/rule-logic/tests/support/fixtures.rs
// ============================================================================
// Module: Rule Fixtures
// Description: Shared inputs and instrumented rules for integration tests.
// ============================================================================
//! ## Overview
//! Call-counting and failing rules plus a small order model used across
//! the rule, adapter, and evaluator suites.

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
    dead_code,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use rule_logic::Rule;

// ========================================================================
// Call Counters
// ========================================================================

/// Shared invocation counter attached to an instrumented rule.
#[derive(Debug, Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    /// Returns how many times the instrumented predicate ran.
    #[must_use]
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// Records one invocation.
    fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Returns a rule with a fixed verdict and a counter of its invocations.
pub fn counted<T: 'static>(name: &str, verdict: bool) -> (Rule<T>, Calls) {
    let calls = Calls::default();
    let tracker = calls.clone();
    let rule = Rule::new(name, move |_: &T| {
        tracker.hit();
        Ok(verdict)
    });
    (rule, calls)
}

/// Returns a rule that always holds.
pub fn pass<T>(name: &str) -> Rule<T> {
    Rule::always(name)
}

/// Returns a rule that never holds.
pub fn fail<T>(name: &str) -> Rule<T> {
    Rule::never(name)
}

// ========================================================================
// Failing Predicates
// ========================================================================

/// Caller-defined predicate failure used to check error chaining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDown {
    /// Name of the unavailable dependency.
    pub service: &'static str,
}

impl fmt::Display for ServiceDown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} unavailable", self.service)
    }
}

impl std::error::Error for ServiceDown {}

/// Returns a rule whose predicate always fails with [`ServiceDown`].
pub fn broken<T>(name: &str, service: &'static str) -> Rule<T> {
    Rule::new(name, move |_: &T| {
        Err(ServiceDown {
            service,
        }
        .into())
    })
}

// ========================================================================
// Order Model
// ========================================================================

/// Order input used by the eligibility scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Number of line items.
    pub items: u32,
    /// Order total in cents.
    pub amount: u32,
    /// ISO country code of the buyer.
    pub country: &'static str,
    /// Whether the buyer is a VIP.
    pub vip: bool,
}

impl Order {
    /// Returns an order failing every standard check.
    #[must_use]
    pub const fn rejected(vip: bool) -> Self {
        Self {
            items: 0,
            amount: 50,
            country: "FR",
            vip,
        }
    }

    /// Returns an order passing every standard check.
    #[must_use]
    pub const fn accepted() -> Self {
        Self {
            items: 3,
            amount: 250,
            country: "US",
            vip: false,
        }
    }
}

/// Rule: the order has at least one item.
pub fn has_items() -> Rule<Order> {
    Rule::condition("has items", |order: &Order| order.items > 0)
}

/// Rule: the order total is at least 100.
pub fn valid_amount() -> Rule<Order> {
    Rule::condition("valid amount", |order: &Order| order.amount >= 100)
}

/// Rule: the buyer ships to a supported country.
pub fn valid_country() -> Rule<Order> {
    Rule::condition("valid country", |order: &Order| matches!(order.country, "US" | "CA"))
}

/// Rule: the buyer is a VIP.
pub fn is_vip() -> Rule<Order> {
    Rule::condition("vip", |order: &Order| order.vip)
}
