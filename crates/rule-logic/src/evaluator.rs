// crates/rule-logic/src/evaluator.rs
// ============================================================================
// Module: Rule Evaluator
// Description: Tiered evaluation modes over a root rule.
// Purpose: Trade detail for cost: raw verdict, timed verdict, or full result tree.
// Dependencies: crate::{config, error, result, rule, trace}, tracing
// ============================================================================

//! ## Overview
//! | Mode | Output | Cost |
//! |---|---|---|
//! | [`Evaluator::evaluate_fast`] | `RuleResult<bool>` | same as [`Rule::evaluate`] |
//! | [`Evaluator::evaluate`] | flat [`EvaluationResult`] | one clock sample pair |
//! | [`Evaluator::evaluate_detailed`] | full result tree | every child evaluated |
//! | [`Evaluator::evaluate_detailed_short_circuit`] | pruned result tree | stops once settled |
//!
//! Detailed modes derive each parent's verdict from its children's recorded
//! results instead of calling the parent's own `evaluate`, so every leaf
//! predicate runs at most once per call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Instant;

use crate::config::ConfigError;
use crate::config::EvaluatorConfig;
use crate::config::Traversal;
use crate::error::RuleError;
use crate::error::RuleResult;
use crate::result::EvaluationResult;
use crate::rule::Rule;
use crate::rule::RuleBody;
use crate::trace::EvaluationTrace;
use crate::trace::NoopTrace;
use crate::trace::TraceEvent;

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// Evaluates a root rule in one of several detail tiers
#[derive(Debug, Clone)]
pub struct Evaluator<T> {
    /// Root of the evaluated tree.
    rule: Rule<T>,
    /// Validated settings.
    config: EvaluatorConfig,
}

impl<T> Evaluator<T> {
    /// Creates an evaluator with the default configuration
    #[must_use]
    pub fn new(rule: Rule<T>) -> Self {
        Self {
            rule,
            config: EvaluatorConfig::default(),
        }
    }

    /// Creates an evaluator with a validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is out of range.
    pub fn with_config(rule: Rule<T>, config: EvaluatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rule,
            config,
        })
    }

    /// Returns the root rule
    #[must_use]
    pub const fn rule(&self) -> &Rule<T> {
        &self.rule
    }

    /// Returns the active configuration
    #[must_use]
    pub const fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Delegates to the root rule with no timing and no result tree
    ///
    /// # Errors
    ///
    /// Returns the root rule's [`RuleError`] unchanged.
    pub fn evaluate_fast(&self, input: &T) -> RuleResult {
        self.rule.evaluate(input)
    }

    /// Times a single evaluation of the root and returns a flat result
    #[must_use]
    pub fn evaluate(&self, input: &T) -> EvaluationResult {
        let start = Instant::now();
        let outcome = self.rule.evaluate(input);
        let duration = start.elapsed();
        let (satisfied, error) = split(outcome);
        EvaluationResult {
            satisfied,
            rule_name: self.rule.name().to_owned(),
            rule_id: self.rule.id(),
            kind: self.rule.kind(),
            duration,
            error,
            children: Vec::new(),
        }
    }

    /// Evaluates every child of every combinator and returns the full tree
    #[must_use]
    pub fn evaluate_detailed(&self, input: &T) -> EvaluationResult {
        self.evaluate_with_trace(input, Traversal::Exhaustive, &mut NoopTrace)
    }

    /// Evaluates the tree, pruning siblings once a parent verdict is settled
    #[must_use]
    pub fn evaluate_detailed_short_circuit(&self, input: &T) -> EvaluationResult {
        self.evaluate_with_trace(input, Traversal::ShortCircuit, &mut NoopTrace)
    }

    /// Runs detailed evaluation with the configured traversal
    #[must_use]
    pub fn evaluate_configured(&self, input: &T) -> EvaluationResult {
        self.evaluate_with_trace(input, self.config.traversal, &mut NoopTrace)
    }

    /// Runs detailed evaluation, reporting every finished node to `trace`
    pub fn evaluate_with_trace(
        &self,
        input: &T,
        traversal: Traversal,
        trace: &mut dyn EvaluationTrace,
    ) -> EvaluationResult {
        let mut walk = Walk {
            traversal,
            max_depth: self.config.max_depth,
            depth: 0,
            trace,
        };
        let result = walk.visit(&self.rule, input);
        tracing::debug!(
            rule = %result.rule_name,
            rule_id = result.rule_id.value(),
            traversal = ?traversal,
            satisfied = result.satisfied,
            failed = result.has_error(),
            nodes = result.node_count(),
            unsatisfied = result.unsatisfied_rules().len(),
            duration_us = u64::try_from(result.duration.as_micros()).unwrap_or(u64::MAX),
            "detailed rule evaluation finished"
        );
        result
    }
}

/// Splits an outcome into the result's verdict and error fields.
fn split(outcome: RuleResult) -> (bool, Option<RuleError>) {
    match outcome {
        Ok(satisfied) => (satisfied, None),
        Err(error) => (false, Some(error)),
    }
}

// ============================================================================
// SECTION: Detailed Walk
// ============================================================================

/// Verdict of one node before context wrapping, plus its child results.
pub(crate) struct NodeOutcome {
    /// Verdict or unwrapped error.
    pub(crate) outcome: RuleResult,
    /// Child results in declared order.
    pub(crate) children: Vec<EvaluationResult>,
}

impl NodeOutcome {
    /// Outcome for a node that failed before evaluating any child.
    pub(crate) const fn failed(error: RuleError) -> Self {
        Self {
            outcome: Err(error),
            children: Vec::new(),
        }
    }
}

/// State threaded through one detailed evaluation.
pub(crate) struct Walk<'a> {
    /// Sibling pruning policy.
    traversal: Traversal,
    /// Depth limit, if any.
    max_depth: Option<usize>,
    /// Depth of the node being visited; zero before the root.
    depth: usize,
    /// Observer for finished nodes.
    trace: &'a mut dyn EvaluationTrace,
}

impl Walk<'_> {
    /// Evaluates `rule` and its subtree, recording a result node.
    pub(crate) fn visit<T>(&mut self, rule: &Rule<T>, input: &T) -> EvaluationResult {
        let start = Instant::now();
        self.depth += 1;
        let node = match self.max_depth {
            Some(max_depth) if self.depth > max_depth => NodeOutcome::failed(RuleError::TooDeep {
                max_depth,
            }),
            _ => self.visit_body(rule, input),
        };
        let duration = start.elapsed();

        let (satisfied, error) = split(node.outcome.map_err(|error| rule.wrap(error)));
        self.trace.on_rule_evaluated(&TraceEvent {
            rule_id: rule.id(),
            rule_name: rule.name(),
            kind: rule.kind(),
            depth: self.depth,
            satisfied,
            error: error.as_ref(),
            duration,
        });
        tracing::trace!(rule = rule.name(), depth = self.depth, satisfied, "rule node evaluated");
        self.depth -= 1;

        EvaluationResult {
            satisfied,
            rule_name: rule.name().to_owned(),
            rule_id: rule.id(),
            kind: rule.kind(),
            duration,
            error,
            children: node.children,
        }
    }

    /// Computes a node's verdict from its children's recorded results.
    fn visit_body<T>(&mut self, rule: &Rule<T>, input: &T) -> NodeOutcome {
        let short_circuit = self.traversal.short_circuits();
        match rule.body() {
            RuleBody::Simple(predicate) => NodeOutcome {
                outcome: predicate(input).map_err(RuleError::predicate),
                children: Vec::new(),
            },

            RuleBody::And(slots) | RuleBody::Or(slots) => {
                if slots.is_empty() {
                    return NodeOutcome::failed(RuleError::EmptyRuleSet);
                }
                // AND settles on the first false child, OR on the first true one
                let settles_on = matches!(rule.body(), RuleBody::Or(_));
                let mut verdict = !settles_on;
                let mut children = Vec::with_capacity(slots.len());
                for slot in slots {
                    let Some(child) = slot else {
                        return NodeOutcome {
                            outcome: Err(RuleError::NilRule),
                            children,
                        };
                    };
                    let result = self.visit(child, input);
                    let child_error = result.error.clone();
                    let child_satisfied = result.satisfied;
                    children.push(result);
                    if let Some(error) = child_error {
                        return NodeOutcome {
                            outcome: Err(error),
                            children,
                        };
                    }
                    if child_satisfied == settles_on {
                        verdict = settles_on;
                        if short_circuit {
                            break;
                        }
                    }
                }
                NodeOutcome {
                    outcome: Ok(verdict),
                    children,
                }
            }

            RuleBody::Not(slot) => {
                let Some(child) = slot else {
                    return NodeOutcome::failed(RuleError::NilRule);
                };
                let result = self.visit(child, input);
                let outcome = result.error.clone().map_or(Ok(!result.satisfied), Err);
                NodeOutcome {
                    outcome,
                    children: vec![result],
                }
            }

            RuleBody::Quantified {
                quantifier,
                children: slots,
            } => {
                let mut satisfied = 0usize;
                let mut children = Vec::with_capacity(slots.len());
                let mut settled = if short_circuit { quantifier.settled(0) } else { None };
                for child in slots.iter().flatten() {
                    if settled.is_some() {
                        break;
                    }
                    let result = self.visit(child, input);
                    let child_error = result.error.clone();
                    let child_satisfied = result.satisfied;
                    children.push(result);
                    if let Some(error) = child_error {
                        return NodeOutcome {
                            outcome: Err(error),
                            children,
                        };
                    }
                    if child_satisfied {
                        satisfied += 1;
                        if short_circuit {
                            settled = quantifier.settled(satisfied);
                        }
                    }
                }
                NodeOutcome {
                    outcome: Ok(settled.unwrap_or_else(|| quantifier.verdict(satisfied))),
                    children,
                }
            }

            RuleBody::Mapped(mapped) => mapped.visit(input, self),
        }
    }
}
