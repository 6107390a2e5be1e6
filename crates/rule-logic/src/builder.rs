// crates/rule-logic/src/builder.rs
// ============================================================================
// Module: Rule Builder
// Description: Fluent builder over rule combinators.
// Purpose: Collect children incrementally, then close them under one combinator.
// Dependencies: crate::{error, rule}
// ============================================================================

//! ## Overview
//! [`RuleBuilder`] gathers child slots in order and finishes with one of the
//! combinator constructors. It keeps the same invariants as [`Rule`]: an empty
//! builder produces an AND/OR that errors with `EmptyRuleSet` when evaluated.

use crate::error::PredicateError;
use crate::rule::Rule;

// ============================================================================
// SECTION: Fluent Builder API
// ============================================================================

/// Fluent builder for constructing combinators programmatically
///
/// # Type Parameter
/// * `T` - The input type of the collected rules
pub struct RuleBuilder<T> {
    /// Collected child slots, in insertion order.
    rules: Vec<Option<Rule<T>>>,
}

impl<T> RuleBuilder<T> {
    /// Creates an empty builder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rules: Vec::new(),
        }
    }

    /// Adds a rule
    #[must_use]
    pub fn add(mut self, rule: Rule<T>) -> Self {
        self.rules.push(Some(rule));
        self
    }

    /// Adds a slot that may be missing
    #[must_use]
    pub fn add_slot(mut self, rule: Option<Rule<T>>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds multiple rules
    #[must_use]
    pub fn add_all<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = Rule<T>>,
    {
        self.rules.extend(rules.into_iter().map(Some));
        self
    }

    /// Adds a simple rule from a fallible predicate
    #[must_use]
    pub fn add_simple<F>(self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        self.add(Rule::new(name, predicate))
    }

    /// Adds a simple rule from an infallible condition
    #[must_use]
    pub fn add_condition<F>(self, name: impl Into<String>, condition: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.add(Rule::condition(name, condition))
    }

    /// Removes every collected rule
    #[must_use]
    pub fn clear(mut self) -> Self {
        self.rules.clear();
        self
    }

    /// Returns the number of collected slots
    #[must_use]
    pub fn count(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when no slot was collected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Builds an AND over the collected rules
    #[must_use]
    pub fn build_and(self, name: impl Into<String>) -> Rule<T> {
        Rule::and(name, self.rules)
    }

    /// Builds an OR over the collected rules
    #[must_use]
    pub fn build_or(self, name: impl Into<String>) -> Rule<T> {
        Rule::or(name, self.rules)
    }

    /// Builds an at-least-`n` quantifier over the collected rules
    #[must_use]
    pub fn build_at_least(self, name: impl Into<String>, n: usize) -> Rule<T> {
        Rule::at_least(name, n, self.rules)
    }

    /// Builds an exactly-`n` quantifier over the collected rules
    #[must_use]
    pub fn build_exactly(self, name: impl Into<String>, n: usize) -> Rule<T> {
        Rule::exactly(name, n, self.rules)
    }

    /// Builds an at-most-`n` quantifier over the collected rules
    #[must_use]
    pub fn build_at_most(self, name: impl Into<String>, n: usize) -> Rule<T> {
        Rule::at_most(name, n, self.rules)
    }
}

impl<T> Default for RuleBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<Rule<T>> for RuleBuilder<T> {
    fn extend<I: IntoIterator<Item = Rule<T>>>(&mut self, iter: I) {
        self.rules.extend(iter.into_iter().map(Some));
    }
}
