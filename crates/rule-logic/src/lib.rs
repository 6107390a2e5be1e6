// crates/rule-logic/src/lib.rs
// ============================================================================
// Module: Rule Logic Root
// Description: Public API surface for composable rule trees.
// Purpose: Wire together core modules, re-exports, and the construction macro.
// Dependencies: crate::{adapter, builder, config, error, evaluator, identity, outline,
//              registry, result, rule, trace}
// ============================================================================

//! ## Overview
//! Typed, immutable predicate trees. Leaves wrap caller predicates; AND, OR,
//! NOT, and the counting quantifiers compose them; maps let rules written for
//! different input types join one tree. [`Rule::evaluate`] answers with a
//! boolean, and [`Evaluator`] returns timed result trees.
//!
//! ```
//! use rule_logic::{Evaluator, Rule};
//!
//! struct Order { items: u32, amount: u32 }
//!
//! let has_items = Rule::condition("has items", |o: &Order| o.items > 0);
//! let valid_amount = Rule::condition("valid amount", |o: &Order| o.amount >= 100);
//! let checkout = Rule::and("checkout", [has_items, valid_amount]);
//!
//! let result = Evaluator::new(checkout).evaluate_detailed(&Order { items: 0, amount: 50 });
//! assert_eq!(result.unsatisfied_rules(), ["checkout", "has items", "valid amount"]);
//! ```

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod adapter;
pub mod builder;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod identity;
pub mod outline;
pub mod registry;
pub mod result;
pub mod rule;
pub mod trace;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use adapter::combine;
pub use adapter::combine_many;
pub use adapter::combine3;
pub use adapter::map;
pub use builder::RuleBuilder;
pub use config::ConfigError;
pub use config::EvaluatorConfig;
pub use config::MAX_DEPTH_LIMIT;
pub use config::Traversal;
pub use error::ErrorKind;
pub use error::PredicateError;
pub use error::RuleError;
pub use error::RuleResult;
pub use error::SharedError;
pub use evaluator::Evaluator;
pub use identity::RuleId;
pub use identity::RuleIdError;
pub use outline::RuleOutline;
pub use registry::Domain;
pub use registry::MemoryRegistry;
pub use registry::RegisteredRule;
pub use registry::RegistryError;
pub use registry::RuleMetadata;
pub use registry::RuleRegistry;
pub use registry::inherit_domains;
pub use registry::register_with_domains;
pub use result::EvaluationResult;
pub use rule::Quantifier;
pub use rule::Rule;
pub use rule::RuleKind;
pub use trace::EvaluationTrace;
pub use trace::LogTrace;
pub use trace::NoopTrace;
pub use trace::TraceEvent;

// ============================================================================
// SECTION: Rule Macro
// ============================================================================

/// Macro for declarative rule tree construction
///
/// Leaves are any expression evaluating to a `Rule<T>`; wrap multi-token
/// expressions in parentheses. Nested combinators are written in parentheses.
///
/// ```
/// use rule_logic::{Rule, rule};
///
/// let positive = Rule::condition("positive", |n: &i64| *n > 0);
/// let even = Rule::condition("even", |n: &i64| n % 2 == 0);
/// let small = Rule::condition("small", |n: &i64| *n < 100);
///
/// let tree = rule! {
///     and "eligible" => [
///         (positive.clone()),
///         (or "shape" => [(even.clone()), (not "large" => (small.clone()))]),
///         (at_least "two of three", 2 => [positive, even, small]),
///     ]
/// };
/// assert_eq!(tree.evaluate(&42).ok(), Some(true));
/// ```
#[macro_export]
macro_rules! rule {
    (and $name:expr => [$($child:tt),* $(,)?]) => {
        $crate::Rule::and($name, [$($crate::rule!($child)),*])
    };

    (or $name:expr => [$($child:tt),* $(,)?]) => {
        $crate::Rule::or($name, [$($crate::rule!($child)),*])
    };

    (not $name:expr => $child:tt) => {
        $crate::Rule::not($name, $crate::rule!($child))
    };

    (at_least $name:expr, $n:expr => [$($child:tt),* $(,)?]) => {
        $crate::Rule::at_least($name, $n, [$($crate::rule!($child)),*])
    };

    (exactly $name:expr, $n:expr => [$($child:tt),* $(,)?]) => {
        $crate::Rule::exactly($name, $n, [$($crate::rule!($child)),*])
    };

    (at_most $name:expr, $n:expr => [$($child:tt),* $(,)?]) => {
        $crate::Rule::at_most($name, $n, [$($crate::rule!($child)),*])
    };

    // Parenthesized group: nested combinator or multi-token leaf
    (($($inner:tt)+)) => {
        $crate::rule!($($inner)+)
    };

    ($leaf:expr) => {
        $leaf
    };
}
