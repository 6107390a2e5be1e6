// crates/rule-logic/src/config.rs
// ============================================================================
// Module: Evaluator Configuration
// Description: Serializable evaluator settings with strict validation.
// Purpose: Select traversal mode and bound tree depth for detailed evaluation.
// Dependencies: serde::{Deserialize, Serialize}, thiserror
// ============================================================================

//! ## Overview
//! [`EvaluatorConfig`] is plain data: callers deserialize it from whatever
//! format they already use, then [`EvaluatorConfig::validate`] rejects
//! out-of-range values before an [`Evaluator`](crate::Evaluator) accepts it.
//! Unknown fields are rejected so typos fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Largest depth limit a configuration may request.
pub const MAX_DEPTH_LIMIT: usize = 1024;

// ============================================================================
// SECTION: Traversal
// ============================================================================

/// How detailed evaluation walks combinator children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Traversal {
    /// Evaluate every child so the result tree shows every failure
    #[default]
    Exhaustive,
    /// Stop descending into siblings once the parent verdict is settled
    ShortCircuit,
}

impl Traversal {
    /// Returns true for [`Traversal::ShortCircuit`]
    #[must_use]
    pub const fn short_circuits(self) -> bool {
        matches!(self, Self::ShortCircuit)
    }
}

// ============================================================================
// SECTION: Config
// ============================================================================

/// Evaluator settings
///
/// # Invariants
/// - After [`EvaluatorConfig::validate`], `max_depth` is `None` or within
///   `1..=MAX_DEPTH_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluatorConfig {
    /// Traversal used by configured detailed evaluation
    #[serde(default)]
    pub traversal: Traversal,
    /// Maximum node depth for detailed evaluation; the root is depth 1
    #[serde(default)]
    pub max_depth: Option<usize>,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A depth limit of zero would reject every tree
    #[error("max_depth must be at least 1")]
    ZeroDepth,
    /// The depth limit is above [`MAX_DEPTH_LIMIT`]
    #[error("max_depth {requested} exceeds the limit of {limit}")]
    DepthTooLarge {
        /// Requested depth
        requested: usize,
        /// Largest accepted depth
        limit: usize,
    },
}

impl EvaluatorConfig {
    /// Returns this config with the given traversal
    #[must_use]
    pub const fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Returns this config with the given depth limit
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Checks value ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `max_depth` is zero or above [`MAX_DEPTH_LIMIT`].
    pub const fn validate(&self) -> Result<(), ConfigError> {
        match self.max_depth {
            Some(0) => Err(ConfigError::ZeroDepth),
            Some(requested) if requested > MAX_DEPTH_LIMIT => Err(ConfigError::DepthTooLarge {
                requested,
                limit: MAX_DEPTH_LIMIT,
            }),
            _ => Ok(()),
        }
    }
}
