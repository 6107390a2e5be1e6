// crates/rule-logic/src/error.rs
// ============================================================================
// Module: Rule Error Definitions
// Description: Structured diagnostics for rule construction and evaluation.
// Purpose: Wrap failures with rule-name context while keeping the cause reachable.
// Dependencies: serde::{Deserialize, Serialize}, thiserror
// ============================================================================

//! ## Overview
//! Every level of a rule tree that forwards an error wraps it in
//! [`RuleError::Context`], so a failure deep in a tree renders as a
//! breadcrumb trail from the root down to the leaf:
//!
//! ```text
//! evaluating AND rule "checkout": evaluating rule "stock": warehouse offline
//! ```
//!
//! The original cause stays reachable through [`RuleError::root_cause`],
//! [`RuleError::predicate_error`], and the standard `source()` chain.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::error::Error as StdError;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::rule::RuleKind;

// ============================================================================
// SECTION: Type Aliases
// ============================================================================

/// Error type returned by caller-supplied predicates.
pub type PredicateError = Box<dyn StdError + Send + Sync>;

/// Shared handle to a caller error so evaluation results can be cloned.
pub type SharedError = Arc<dyn StdError + Send + Sync>;

/// Convenient Result type for rule operations
pub type RuleResult<T = bool> = Result<T, RuleError>;

// ============================================================================
// SECTION: Error Taxonomy
// ============================================================================

/// Root-cause classification of a [`RuleError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A combinator met a missing child where one was required
    NilRule,
    /// AND or OR was evaluated with zero children
    EmptyRuleSet,
    /// The caller-supplied predicate returned an error
    PredicateFailure,
    /// The evaluator's depth limit was exceeded
    TooDeep,
}

/// Errors that can occur during rule evaluation
///
/// # Invariants
/// - `Context` always wraps exactly one inner error; the innermost error is
///   never `Context`.
#[derive(Debug, Clone, Error)]
pub enum RuleError {
    /// A missing child was found where one was required (AND, OR, NOT, map)
    #[error("nil rule")]
    NilRule,

    /// AND or OR has no children
    #[error("empty rules list")]
    EmptyRuleSet,

    /// The caller's predicate failed
    #[error("{0}")]
    Predicate(#[source] SharedError),

    /// The rule tree is deeper than the configured evaluation limit
    #[error("rule tree exceeds maximum depth of {max_depth}")]
    TooDeep {
        /// Maximum allowed depth
        max_depth: usize,
    },

    /// An error forwarded through a named rule
    #[error("evaluating {} \"{}\": {}", .kind.context_label(), .name, .source)]
    Context {
        /// Variant of the rule that forwarded the error
        kind: RuleKind,
        /// Name of the rule that forwarded the error
        name: String,
        /// The forwarded error
        #[source]
        source: Box<Self>,
    },
}

// ============================================================================
// SECTION: Construction Helpers
// ============================================================================

impl RuleError {
    /// Wraps a caller error as a predicate failure
    #[must_use]
    pub fn predicate(error: PredicateError) -> Self {
        Self::Predicate(Arc::from(error))
    }

    /// Wraps `self` with the context of the rule that forwarded it
    #[must_use]
    pub fn within(self, kind: RuleKind, name: impl Into<String>) -> Self {
        Self::Context {
            kind,
            name: name.into(),
            source: Box::new(self),
        }
    }
}

// ============================================================================
// SECTION: Inspection
// ============================================================================

impl RuleError {
    /// Returns the innermost error, skipping every context layer
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Self::Context {
            source, ..
        } = current
        {
            current = source;
        }
        current
    }

    /// Returns the classification of the root cause
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self.root_cause() {
            Self::NilRule => ErrorKind::NilRule,
            Self::EmptyRuleSet => ErrorKind::EmptyRuleSet,
            Self::TooDeep {
                ..
            } => ErrorKind::TooDeep,
            Self::Predicate(_) | Self::Context {
                ..
            } => ErrorKind::PredicateFailure,
        }
    }

    /// Returns the names of the rules the error passed through, root first
    #[must_use]
    pub fn rule_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self;
        while let Self::Context {
            name,
            source,
            ..
        } = current
        {
            path.push(name.as_str());
            current = source;
        }
        path
    }

    /// Returns the caller's original predicate error, if that is the root cause
    #[must_use]
    pub fn predicate_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self.root_cause() {
            Self::Predicate(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}
