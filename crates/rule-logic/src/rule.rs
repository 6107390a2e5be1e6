// crates/rule-logic/src/rule.rs
// ============================================================================
// Module: Rule Core Types
// Description: Typed rule trees with boolean and counting combinators.
// Purpose: Define `Rule`, `RuleKind`, and `Quantifier` along with constructors
// and the short-circuit evaluation path.
// Dependencies: crate::{adapter, error, identity}, smallvec::SmallVec
// ============================================================================

//! ## Overview
//! A [`Rule<T>`] is a named, immutable node in a predicate tree over inputs of
//! type `T`. Leaves wrap caller predicates; inner nodes combine children with
//! AND/OR/NOT or with counting quantifiers. Composition never mutates a node:
//! it wraps existing handles, so one sub-rule can be shared by many trees and
//! evaluated from many threads at once.
//!
//! Missing children are modelled as `None` slots. AND, OR, and NOT reject
//! them at evaluation time with [`RuleError::NilRule`]; quantifiers skip them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;

use crate::adapter::MappedNode;
use crate::error::PredicateError;
use crate::error::RuleError;
use crate::error::RuleResult;
use crate::identity::RuleId;

// ============================================================================
// SECTION: Type Aliases
// ============================================================================

/// Caller-supplied predicate stored in a simple rule.
type PredicateFn<T> = dyn Fn(&T) -> Result<bool, PredicateError> + Send + Sync;

/// Ordered child slots of a combinator; `None` marks a missing rule.
pub(crate) type Children<T> = SmallVec<[Option<Rule<T>>; 4]>;

// ============================================================================
// SECTION: Rule Kind
// ============================================================================

/// Closed set of rule variants, used for introspection and dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Leaf wrapping a predicate
    Simple,
    /// Satisfied when every child is satisfied
    And,
    /// Satisfied when at least one child is satisfied
    Or,
    /// Satisfied when its child is not
    Not,
    /// Satisfied when at least `n` children are satisfied
    AtLeast,
    /// Satisfied when exactly `n` children are satisfied
    Exactly,
    /// Satisfied when at most `n` children are satisfied
    AtMost,
    /// Adapts a rule over another input type
    Mapped,
}

impl RuleKind {
    /// Short uppercase label used in outlines and reports
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Simple => "RULE",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::AtLeast => "AT LEAST",
            Self::Exactly => "EXACTLY",
            Self::AtMost => "AT MOST",
            Self::Mapped => "MAPPED",
        }
    }

    /// Phrase used when this kind of rule wraps a forwarded error
    #[must_use]
    pub const fn context_label(self) -> &'static str {
        match self {
            Self::Simple => "rule",
            Self::And => "AND rule",
            Self::Or => "OR rule",
            Self::Not => "NOT rule",
            Self::AtLeast => "AT LEAST rule",
            Self::Exactly => "EXACTLY rule",
            Self::AtMost => "AT MOST rule",
            Self::Mapped => "mapped rule",
        }
    }

    /// Returns true for variants that own child rules of the same input type
    #[must_use]
    pub const fn is_combinator(self) -> bool {
        !matches!(self, Self::Simple | Self::Mapped)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Quantifier
// ============================================================================

/// Counting relation applied by quantifier rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantifier {
    /// Count must be `>= n`
    AtLeast(usize),
    /// Count must be `== n`
    Exactly(usize),
    /// Count must be `<= n`
    AtMost(usize),
}

impl Quantifier {
    /// Returns the threshold `n`
    #[must_use]
    pub const fn threshold(self) -> usize {
        match self {
            Self::AtLeast(n) | Self::Exactly(n) | Self::AtMost(n) => n,
        }
    }

    /// Returns the rule kind for this quantifier
    #[must_use]
    pub const fn kind(self) -> RuleKind {
        match self {
            Self::AtLeast(_) => RuleKind::AtLeast,
            Self::Exactly(_) => RuleKind::Exactly,
            Self::AtMost(_) => RuleKind::AtMost,
        }
    }

    /// Returns the final verdict once `satisfied` settles it, before all children are seen
    ///
    /// `AtLeast` settles once the threshold is reached (immediately for `n = 0`),
    /// `AtMost` settles as soon as the threshold is exceeded, and `Exactly`
    /// never settles early.
    #[must_use]
    pub const fn settled(self, satisfied: usize) -> Option<bool> {
        match self {
            Self::AtLeast(n) if satisfied >= n => Some(true),
            Self::AtMost(n) if satisfied > n => Some(false),
            _ => None,
        }
    }

    /// Returns the verdict for a complete count
    #[must_use]
    pub const fn verdict(self, satisfied: usize) -> bool {
        match self {
            Self::AtLeast(n) => satisfied >= n,
            Self::Exactly(n) => satisfied == n,
            Self::AtMost(n) => satisfied <= n,
        }
    }
}

// ============================================================================
// SECTION: Rule Node
// ============================================================================

/// Variant-specific payload of a rule node.
pub(crate) enum RuleBody<T> {
    /// Leaf predicate.
    Simple(Arc<PredicateFn<T>>),
    /// Conjunction over ordered children.
    And(Children<T>),
    /// Disjunction over ordered children.
    Or(Children<T>),
    /// Negation of a single child.
    Not(Option<Rule<T>>),
    /// Counting combinator over ordered children.
    Quantified {
        /// Relation and threshold.
        quantifier: Quantifier,
        /// Child slots; missing entries are skipped.
        children: Children<T>,
    },
    /// Input adapter around a rule of another type.
    Mapped(Arc<dyn MappedNode<T>>),
}

impl<T> Clone for RuleBody<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Simple(predicate) => Self::Simple(Arc::clone(predicate)),
            Self::And(children) => Self::And(children.clone()),
            Self::Or(children) => Self::Or(children.clone()),
            Self::Not(child) => Self::Not(child.clone()),
            Self::Quantified {
                quantifier,
                children,
            } => Self::Quantified {
                quantifier: *quantifier,
                children: children.clone(),
            },
            Self::Mapped(mapped) => Self::Mapped(Arc::clone(mapped)),
        }
    }
}

/// Immutable node shared behind a [`Rule`] handle.
struct RuleNode<T> {
    /// Stable identifier.
    id: RuleId,
    /// Caller-supplied label; not required to be unique.
    name: String,
    /// Optional documentation text.
    description: Option<String>,
    /// Variant payload.
    body: RuleBody<T>,
}

impl<T> Clone for RuleNode<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            body: self.body.clone(),
        }
    }
}

// ============================================================================
// SECTION: Rule Handle
// ============================================================================

/// A named, evaluable boolean condition over inputs of type `T`
///
/// Cloning a rule clones the handle, not the tree; clones share the same
/// [`RuleId`].
///
/// # Invariants
/// - Nodes are never mutated after construction.
/// - Evaluation touches no shared mutable state.
pub struct Rule<T> {
    /// Shared immutable node.
    node: Arc<RuleNode<T>>,
}

impl<T> Clone for Rule<T> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Rule");
        debug.field("id", &self.node.id).field("name", &self.node.name).field("kind", &self.kind());
        if let Some(quantifier) = self.quantifier() {
            debug.field("threshold", &quantifier.threshold());
        }
        if self.kind().is_combinator() {
            debug.field("children", &self.children());
        }
        debug.finish()
    }
}

// ============================================================================
// SECTION: Constructor Helpers
// ============================================================================

impl<T> Rule<T> {
    /// Builds a node with a fresh id.
    pub(crate) fn from_body(name: impl Into<String>, body: RuleBody<T>) -> Self {
        Self {
            node: Arc::new(RuleNode {
                id: RuleId::next(),
                name: name.into(),
                description: None,
                body,
            }),
        }
    }

    /// Creates a simple rule from a fallible predicate
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        Self::from_body(name, RuleBody::Simple(Arc::new(predicate)))
    }

    /// Creates a simple rule with a documentation description
    pub fn new_with_description<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        predicate: F,
    ) -> Self
    where
        F: Fn(&T) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        Self::new(name, predicate).with_description(description)
    }

    /// Creates a simple rule from an infallible condition
    pub fn condition<F>(name: impl Into<String>, condition: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::new(name, move |input: &T| Ok(condition(input)))
    }

    /// Creates a rule that is always satisfied
    pub fn always(name: impl Into<String>) -> Self {
        Self::new(name, |_: &T| Ok(true))
    }

    /// Creates a rule that is never satisfied
    pub fn never(name: impl Into<String>) -> Self {
        Self::new(name, |_: &T| Ok(false))
    }

    /// Creates a logical AND of the given rules
    ///
    /// Short-circuits on the first unsatisfied child. Zero children is an
    /// error at evaluation time, not a vacuous `true`.
    pub fn and<I>(name: impl Into<String>, rules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Self>>,
    {
        Self::from_body(name, RuleBody::And(collect_children(rules)))
    }

    /// Creates a logical OR of the given rules
    ///
    /// Short-circuits on the first satisfied child. Zero children is an
    /// error at evaluation time, not a vacuous `false`.
    pub fn or<I>(name: impl Into<String>, rules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Self>>,
    {
        Self::from_body(name, RuleBody::Or(collect_children(rules)))
    }

    /// Creates a logical NOT of the given rule
    pub fn not(name: impl Into<String>, rule: impl Into<Option<Self>>) -> Self {
        Self::from_body(name, RuleBody::Not(rule.into()))
    }

    /// Creates a counting rule for the given quantifier
    pub fn quantified<I>(name: impl Into<String>, quantifier: Quantifier, rules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Self>>,
    {
        Self::from_body(
            name,
            RuleBody::Quantified {
                quantifier,
                children: collect_children(rules),
            },
        )
    }

    /// Creates a rule satisfied when at least `n` of the given rules are
    pub fn at_least<I>(name: impl Into<String>, n: usize, rules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Self>>,
    {
        Self::quantified(name, Quantifier::AtLeast(n), rules)
    }

    /// Creates a rule satisfied when exactly `n` of the given rules are
    pub fn exactly<I>(name: impl Into<String>, n: usize, rules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Self>>,
    {
        Self::quantified(name, Quantifier::Exactly(n), rules)
    }

    /// Creates a rule satisfied when at most `n` of the given rules are
    pub fn at_most<I>(name: impl Into<String>, n: usize, rules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Self>>,
    {
        Self::quantified(name, Quantifier::AtMost(n), rules)
    }

    /// Alias for [`Rule::and`]
    pub fn all_of<I>(name: impl Into<String>, rules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Self>>,
    {
        Self::and(name, rules)
    }

    /// Alias for [`Rule::or`]
    pub fn any_of<I>(name: impl Into<String>, rules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Self>>,
    {
        Self::or(name, rules)
    }

    /// Creates a rule satisfied only when none of the given rules are
    ///
    /// Built as `NOT(OR(...))`; the inner OR is named `"<name> (internal)"`.
    pub fn none_of<I>(name: impl Into<String>, rules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Self>>,
    {
        let name = name.into();
        let inner = Self::or(format!("{name} (internal)"), rules);
        Self::not(name, inner)
    }

    /// Returns this rule with a documentation description attached
    ///
    /// The id is preserved; if the node is shared, the handle is re-pointed at
    /// a copy carrying the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.node).description = Some(description.into());
        self
    }
}

/// Collects child slots in declared order.
fn collect_children<T, I>(rules: I) -> Children<T>
where
    I: IntoIterator,
    I::Item: Into<Option<Rule<T>>>,
{
    rules.into_iter().map(Into::into).collect()
}

impl<T> std::ops::Not for Rule<T> {
    type Output = Self;

    fn not(self) -> Self::Output {
        let name = format!("NOT {}", self.name());
        Self::not(name, self)
    }
}

// ============================================================================
// SECTION: Introspection
// ============================================================================

impl<T> Rule<T> {
    /// Returns the stable identifier of this node
    #[must_use]
    pub fn id(&self) -> RuleId {
        self.node.id
    }

    /// Returns the caller-supplied name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.node.name
    }

    /// Returns the documentation description, falling back to the name
    #[must_use]
    pub fn description(&self) -> &str {
        self.node.description.as_deref().unwrap_or(&self.node.name)
    }

    /// Returns the variant of this node
    #[must_use]
    pub fn kind(&self) -> RuleKind {
        match &self.node.body {
            RuleBody::Simple(_) => RuleKind::Simple,
            RuleBody::And(_) => RuleKind::And,
            RuleBody::Or(_) => RuleKind::Or,
            RuleBody::Not(_) => RuleKind::Not,
            RuleBody::Quantified {
                quantifier, ..
            } => quantifier.kind(),
            RuleBody::Mapped(_) => RuleKind::Mapped,
        }
    }

    /// Returns the quantifier of a counting rule
    #[must_use]
    pub fn quantifier(&self) -> Option<Quantifier> {
        match &self.node.body {
            RuleBody::Quantified {
                quantifier, ..
            } => Some(*quantifier),
            _ => None,
        }
    }

    /// Returns the ordered child slots of a combinator
    ///
    /// Simple and mapped rules return an empty slice; use [`Rule::outline`]
    /// to see through a map.
    #[must_use]
    pub fn children(&self) -> &[Option<Self>] {
        match &self.node.body {
            RuleBody::And(children)
            | RuleBody::Or(children)
            | RuleBody::Quantified {
                children, ..
            } => children,
            RuleBody::Not(child) => std::slice::from_ref(child),
            RuleBody::Simple(_) | RuleBody::Mapped(_) => &[],
        }
    }

    /// Returns true when both handles point at the same node
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Returns the variant payload.
    pub(crate) fn body(&self) -> &RuleBody<T> {
        &self.node.body
    }

    /// Returns the number of nodes in this tree, counting through maps
    #[must_use]
    pub fn complexity(&self) -> usize {
        match &self.node.body {
            RuleBody::Simple(_) => 1,
            RuleBody::Mapped(mapped) => 1 + mapped.inner_complexity(),
            _ => 1 + self.children().iter().flatten().map(Self::complexity).sum::<usize>(),
        }
    }

    /// Returns the height of this tree; a lone leaf has depth 1
    #[must_use]
    pub fn depth(&self) -> usize {
        match &self.node.body {
            RuleBody::Simple(_) => 1,
            RuleBody::Mapped(mapped) => 1 + mapped.inner_depth(),
            _ => 1 + self.children().iter().flatten().map(Self::depth).max().unwrap_or(0),
        }
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

impl<T> Rule<T> {
    /// Evaluates this rule against `input` with short-circuiting
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] wrapped with the name of every rule it passed
    /// through when a predicate fails, a required child is missing, or an
    /// AND/OR has no children. The boolean is not produced in that case.
    pub fn evaluate(&self, input: &T) -> RuleResult {
        self.evaluate_body(input).map_err(|error| self.wrap(error))
    }

    /// Wraps an error with this rule's context.
    pub(crate) fn wrap(&self, error: RuleError) -> RuleError {
        error.within(self.kind(), self.node.name.as_str())
    }

    /// Evaluates the variant logic without adding this node's context.
    fn evaluate_body(&self, input: &T) -> RuleResult {
        match &self.node.body {
            RuleBody::Simple(predicate) => predicate(input).map_err(RuleError::predicate),

            // Short-circuit AND: exit on first failure
            RuleBody::And(children) => {
                if children.is_empty() {
                    return Err(RuleError::EmptyRuleSet);
                }
                for child in children {
                    let child = child.as_ref().ok_or(RuleError::NilRule)?;
                    if !child.evaluate(input)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }

            // Short-circuit OR: exit on first success
            RuleBody::Or(children) => {
                if children.is_empty() {
                    return Err(RuleError::EmptyRuleSet);
                }
                for child in children {
                    let child = child.as_ref().ok_or(RuleError::NilRule)?;
                    if child.evaluate(input)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }

            RuleBody::Not(child) => {
                let child = child.as_ref().ok_or(RuleError::NilRule)?;
                child.evaluate(input).map(|satisfied| !satisfied)
            }

            // Missing children are absent, not errors
            RuleBody::Quantified {
                quantifier,
                children,
            } => {
                let mut satisfied = 0usize;
                if let Some(verdict) = quantifier.settled(satisfied) {
                    return Ok(verdict);
                }
                for child in children.iter().flatten() {
                    if child.evaluate(input)? {
                        satisfied += 1;
                        if let Some(verdict) = quantifier.settled(satisfied) {
                            return Ok(verdict);
                        }
                    }
                }
                Ok(quantifier.verdict(satisfied))
            }

            RuleBody::Mapped(mapped) => mapped.evaluate(input),
        }
    }
}
