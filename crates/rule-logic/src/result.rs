// crates/rule-logic/src/result.rs
// ============================================================================
// Module: Evaluation Results
// Description: Result trees produced by the evaluator.
// Purpose: Carry per-node verdicts, timing, errors, and child results.
// Dependencies: crate::{error, identity, rule}, serde::Serialize
// ============================================================================

//! ## Overview
//! An [`EvaluationResult`] is rebuilt on every evaluator call. Children appear
//! in declared order; under short-circuit traversal they may be a prefix of
//! the declared children. Missing quantifier children leave no entry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde::Serializer;

use crate::error::RuleError;
use crate::identity::RuleId;
use crate::rule::RuleKind;

// ============================================================================
// SECTION: Evaluation Result
// ============================================================================

/// Outcome of evaluating one rule node
///
/// # Invariants
/// - When `error` is set, `satisfied` is `false` and is not a verdict.
/// - `children` is empty for simple rules and for flat evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    /// Verdict for this node
    pub satisfied: bool,
    /// Name of the evaluated rule
    pub rule_name: String,
    /// Id of the evaluated rule
    pub rule_id: RuleId,
    /// Variant of the evaluated rule
    pub kind: RuleKind,
    /// Inclusive wall-clock time of this node
    #[serde(rename = "duration_us", serialize_with = "serialize_micros")]
    pub duration: Duration,
    /// Error recorded for this node, wrapped with its rule context
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<RuleError>,
    /// Results of evaluated children, in declared order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Self>,
}

impl EvaluationResult {
    /// Returns true if the rule was satisfied and no error occurred
    #[must_use]
    pub const fn is_successful(&self) -> bool {
        self.satisfied && self.error.is_none()
    }

    /// Returns true if an error occurred during evaluation
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns the names of every unsatisfied node, parent before children
    ///
    /// Includes the root when it failed and nodes that recorded an error.
    #[must_use]
    pub fn unsatisfied_rules(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_unsatisfied(&mut names);
        names
    }

    /// Appends unsatisfied names in pre-order.
    fn collect_unsatisfied<'a>(&'a self, names: &mut Vec<&'a str>) {
        if !self.satisfied {
            names.push(self.rule_name.as_str());
        }
        for child in &self.children {
            child.collect_unsatisfied(names);
        }
    }

    /// Returns the first node with the given name, searching in pre-order
    #[must_use]
    pub fn find(&self, rule_name: &str) -> Option<&Self> {
        if self.rule_name == rule_name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(rule_name))
    }

    /// Returns the number of nodes in this result tree
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Writes this node and its children, two spaces per level.
    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let status = if self.error.is_some() {
            "⚠"
        } else if self.satisfied {
            "✓"
        } else {
            "✗"
        };
        write!(
            f,
            "{:width$}{status} {} (took {}µs)",
            "",
            self.rule_name,
            self.duration.as_micros(),
            width = indent * 2
        )?;
        if let Some(error) = &self.error {
            write!(f, " - Error: {error}")?;
        }
        for child in &self.children {
            writeln!(f)?;
            child.write_indented(f, indent + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

// ============================================================================
// SECTION: Serialization Helpers
// ============================================================================

/// Serializes a duration as whole microseconds.
fn serialize_micros<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_micros()).unwrap_or(u64::MAX))
}

/// Serializes an error as its display message.
#[allow(
    clippy::ref_option,
    reason = "serde's serialize_with passes a reference to the field type."
)]
fn serialize_error<S: Serializer>(
    error: &Option<RuleError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.collect_str(error),
        None => serializer.serialize_none(),
    }
}
