// crates/rule-logic/src/trace.rs
// ============================================================================
// Module: Evaluation Tracing
// Description: Per-node hooks for detailed evaluation.
// Purpose: Let callers observe each evaluated node without changing results.
// Dependencies: crate::{error, identity, rule}, tracing
// ============================================================================

//! ## Overview
//! Detailed evaluation reports every finished node to an [`EvaluationTrace`].
//! [`NoopTrace`] is the default. [`LogTrace`] forwards events to the `tracing`
//! ecosystem; installing a subscriber is left to the application.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use crate::error::RuleError;
use crate::identity::RuleId;
use crate::rule::RuleKind;

// ============================================================================
// SECTION: Trace Event
// ============================================================================

/// A finished node in a detailed evaluation
#[derive(Debug, Clone, Copy)]
pub struct TraceEvent<'a> {
    /// Id of the evaluated rule
    pub rule_id: RuleId,
    /// Name of the evaluated rule
    pub rule_name: &'a str,
    /// Variant of the evaluated rule
    pub kind: RuleKind,
    /// Depth of the node; the root is depth 1
    pub depth: usize,
    /// Verdict; not meaningful when `error` is set
    pub satisfied: bool,
    /// Error recorded for the node
    pub error: Option<&'a RuleError>,
    /// Inclusive wall-clock time of the node
    pub duration: Duration,
}

// ============================================================================
// SECTION: Trace Hooks
// ============================================================================

/// Observer for nodes finished during detailed evaluation
///
/// Children are reported before their parent.
pub trait EvaluationTrace {
    /// Called once per evaluated node
    fn on_rule_evaluated(&mut self, event: &TraceEvent<'_>);
}

/// Trace hook that ignores all events
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTrace;

impl EvaluationTrace for NoopTrace {
    fn on_rule_evaluated(&mut self, _event: &TraceEvent<'_>) {}
}

/// Trace hook that emits a `tracing` event per node
///
/// Errors are logged at `warn`, everything else at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTrace;

impl EvaluationTrace for LogTrace {
    fn on_rule_evaluated(&mut self, event: &TraceEvent<'_>) {
        let duration_us = u64::try_from(event.duration.as_micros()).unwrap_or(u64::MAX);
        match event.error {
            Some(error) => tracing::warn!(
                rule = event.rule_name,
                rule_id = event.rule_id.value(),
                kind = event.kind.label(),
                depth = event.depth,
                duration_us,
                error = %error,
                "rule evaluation failed"
            ),
            None => tracing::debug!(
                rule = event.rule_name,
                rule_id = event.rule_id.value(),
                kind = event.kind.label(),
                depth = event.depth,
                satisfied = event.satisfied,
                duration_us,
                "rule evaluated"
            ),
        }
    }
}
