// crates/rule-logic/src/identity.rs
// ============================================================================
// Module: Rule Identity
// Description: Stable opaque identifiers for rule nodes.
// Purpose: Key external bookkeeping by id instead of handle or address identity.
// Dependencies: serde::{Deserialize, Serialize}, std::sync::atomic
// ============================================================================

//! ## Overview
//! Every constructed rule node receives a [`RuleId`] from a process-wide
//! monotonic counter. Ids survive cloning of the rule handle, so metadata
//! stores (see [`crate::registry`]) can correlate a rule with its entry
//! regardless of how many parent trees share it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU64;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Allocator
// ============================================================================

/// Next raw id handed out by [`RuleId::next`].
static NEXT_RULE_ID: AtomicU64 = AtomicU64::new(1);

// ============================================================================
// SECTION: Rule Id
// ============================================================================

/// A unique identifier for a constructed rule node
///
/// # Invariants
/// - Never zero.
/// - Unique per node within a process; clones of a rule share its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct RuleId(NonZeroU64);

/// Errors that can occur while constructing a [`RuleId`] from a raw value
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RuleIdError {
    /// The provided raw ID was zero, which is not allowed
    #[error("RuleId cannot be zero")]
    Zero,
}

impl RuleId {
    /// Allocates a fresh id.
    pub(crate) fn next() -> Self {
        let raw = NEXT_RULE_ID.fetch_add(1, Ordering::Relaxed);
        // The counter starts at one; wrapping past u64::MAX is not reachable in practice.
        Self(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
    }

    /// Creates a rule id from a known non-zero value.
    #[must_use]
    pub const fn new(id: NonZeroU64) -> Self {
        Self(id)
    }

    /// Attempts to create a rule id, returning `None` when the raw value is zero.
    #[must_use]
    pub fn from_raw(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(Self::new)
    }

    /// Returns the raw ID value
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule#{}", self.0)
    }
}

impl From<RuleId> for u64 {
    fn from(id: RuleId) -> Self {
        id.value()
    }
}

impl TryFrom<u64> for RuleId {
    type Error = RuleIdError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::from_raw(value).ok_or(RuleIdError::Zero)
    }
}
