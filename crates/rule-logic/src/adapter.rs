// crates/rule-logic/src/adapter.rs
// ============================================================================
// Module: Cross-Type Adapters
// Description: Lift rules over one input type into rules over another.
// Purpose: Provide `map`, `combine`, `combine3`, and `combine_many`.
// Dependencies: crate::{error, evaluator, outline, rule}
// ============================================================================

//! ## Overview
//! [`Rule::map`] turns a `Rule<U>` into a `Rule<S>` by running an extractor
//! `Fn(&S) -> U` before delegating. The combine helpers are sugar over
//! `map` + [`Rule::and`]: they add no evaluation semantics of their own and
//! reuse AND's short-circuit and error behavior.
//!
//! ```
//! use rule_logic::Rule;
//!
//! struct User { age: u32 }
//! struct Request { user: User }
//!
//! let adult = Rule::condition("adult", |user: &User| user.age >= 18);
//! let request_rule: Rule<Request> =
//!     Rule::map("request from adult", adult, |req: &Request| User { age: req.user.age });
//! assert_eq!(request_rule.evaluate(&Request { user: User { age: 30 } }).ok(), Some(true));
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::error::RuleError;
use crate::error::RuleResult;
use crate::evaluator::NodeOutcome;
use crate::evaluator::Walk;
use crate::outline::RuleOutline;
use crate::rule::Rule;
use crate::rule::RuleBody;

// ============================================================================
// SECTION: Mapped Node Contract
// ============================================================================

/// Type-erased view of a mapped rule, seen from its source input type `S`.
pub(crate) trait MappedNode<S>: Send + Sync {
    /// Extracts the inner input and evaluates the inner rule.
    fn evaluate(&self, input: &S) -> RuleResult;

    /// Extracts the inner input and descends into the inner rule in detail.
    fn visit(&self, input: &S, walk: &mut Walk<'_>) -> NodeOutcome;

    /// Returns the structural outline of the inner rule, if present.
    fn inner_outline(&self) -> Option<RuleOutline>;

    /// Returns the node count of the inner rule.
    fn inner_complexity(&self) -> usize;

    /// Returns the height of the inner rule.
    fn inner_depth(&self) -> usize;
}

/// Inner rule plus the extractor that feeds it.
struct Mapping<U, F> {
    /// Rule over the extracted type; `None` fails with `NilRule` when evaluated.
    inner: Option<Rule<U>>,
    /// Projection from the source input.
    extractor: F,
}

impl<S, U, F> MappedNode<S> for Mapping<U, F>
where
    F: Fn(&S) -> U + Send + Sync,
{
    fn evaluate(&self, input: &S) -> RuleResult {
        let inner = self.inner.as_ref().ok_or(RuleError::NilRule)?;
        let target = (self.extractor)(input);
        inner.evaluate(&target)
    }

    fn visit(&self, input: &S, walk: &mut Walk<'_>) -> NodeOutcome {
        let Some(inner) = self.inner.as_ref() else {
            return NodeOutcome::failed(RuleError::NilRule);
        };
        let target = (self.extractor)(input);
        let child = walk.visit(inner, &target);
        let outcome = child.error.clone().map_or(Ok(child.satisfied), Err);
        NodeOutcome {
            outcome,
            children: vec![child],
        }
    }

    fn inner_outline(&self) -> Option<RuleOutline> {
        self.inner.as_ref().map(Rule::outline)
    }

    fn inner_complexity(&self) -> usize {
        self.inner.as_ref().map_or(0, Rule::complexity)
    }

    fn inner_depth(&self) -> usize {
        self.inner.as_ref().map_or(0, Rule::depth)
    }
}

// ============================================================================
// SECTION: Map
// ============================================================================

impl<S: 'static> Rule<S> {
    /// Adapts a rule over `U` into a rule over `S`
    ///
    /// Construction never fails; a missing inner rule surfaces as
    /// [`RuleError::NilRule`] wrapped in this rule's context when evaluated.
    pub fn map<U, F>(
        name: impl Into<String>,
        inner: impl Into<Option<Rule<U>>>,
        extractor: F,
    ) -> Self
    where
        U: 'static,
        F: Fn(&S) -> U + Send + Sync + 'static,
    {
        let mapping = Mapping {
            inner: inner.into(),
            extractor,
        };
        Self::from_body(name, RuleBody::Mapped(Arc::new(mapping)))
    }
}

/// Free-function form of [`Rule::map`]
pub fn map<S, U, F>(
    name: impl Into<String>,
    inner: impl Into<Option<Rule<U>>>,
    extractor: F,
) -> Rule<S>
where
    S: 'static,
    U: 'static,
    F: Fn(&S) -> U + Send + Sync + 'static,
{
    Rule::map(name, inner, extractor)
}

// ============================================================================
// SECTION: Combine Helpers
// ============================================================================

/// ANDs two rules over different parts of a composite input
///
/// The mapped children are named `extracted-1` and `extracted-2`.
pub fn combine<S, A, B, FA, FB>(
    name: impl Into<String>,
    rule_a: impl Into<Option<Rule<A>>>,
    extract_a: FA,
    rule_b: impl Into<Option<Rule<B>>>,
    extract_b: FB,
) -> Rule<S>
where
    S: 'static,
    A: 'static,
    B: 'static,
    FA: Fn(&S) -> A + Send + Sync + 'static,
    FB: Fn(&S) -> B + Send + Sync + 'static,
{
    Rule::and(
        name,
        [Rule::map("extracted-1", rule_a, extract_a), Rule::map("extracted-2", rule_b, extract_b)],
    )
}

/// ANDs three rules over different parts of a composite input
pub fn combine3<S, A, B, C, FA, FB, FC>(
    name: impl Into<String>,
    rule_a: impl Into<Option<Rule<A>>>,
    extract_a: FA,
    rule_b: impl Into<Option<Rule<B>>>,
    extract_b: FB,
    rule_c: impl Into<Option<Rule<C>>>,
    extract_c: FC,
) -> Rule<S>
where
    S: 'static,
    A: 'static,
    B: 'static,
    C: 'static,
    FA: Fn(&S) -> A + Send + Sync + 'static,
    FB: Fn(&S) -> B + Send + Sync + 'static,
    FC: Fn(&S) -> C + Send + Sync + 'static,
{
    Rule::and(
        name,
        [
            Rule::map("extracted-1", rule_a, extract_a),
            Rule::map("extracted-2", rule_b, extract_b),
            Rule::map("extracted-3", rule_c, extract_c),
        ],
    )
}

/// ANDs already-mapped rules over a shared composite input
pub fn combine_many<S, I>(name: impl Into<String>, mapped_rules: I) -> Rule<S>
where
    I: IntoIterator,
    I::Item: Into<Option<Rule<S>>>,
{
    Rule::and(name, mapped_rules)
}
