// crates/rule-logic/src/outline.rs
// ============================================================================
// Module: Rule Outlines
// Description: Type-erased structural snapshots of rule trees.
// Purpose: Give documentation tooling a read-only view that crosses map boundaries.
// Dependencies: crate::{identity, rule}, serde::{Deserialize, Serialize}
// ============================================================================

//! ## Overview
//! [`Rule::children`] only reaches children of the same input type. An
//! outline erases the input type, so renderers can walk a whole tree,
//! including the inner rules of maps, and serialize it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::identity::RuleId;
use crate::rule::Rule;
use crate::rule::RuleBody;
use crate::rule::RuleKind;

// ============================================================================
// SECTION: Outline
// ============================================================================

/// Structural snapshot of one rule node and its subtree
///
/// # Invariants
/// - `threshold` is set exactly for quantifier kinds.
/// - A `None` child marks a missing rule slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutline {
    /// Id of the rule
    pub id: RuleId,
    /// Name of the rule
    pub name: String,
    /// Description of the rule (the name when none was given)
    pub description: String,
    /// Variant of the rule
    pub kind: RuleKind,
    /// Quantifier threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<usize>,
    /// Child slots in declared order; a map has its inner rule as sole child
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Option<Self>>,
}

impl RuleOutline {
    /// Returns every node in pre-order, starting with `self`
    #[must_use]
    pub fn nodes(&self) -> Vec<&Self> {
        let mut nodes = Vec::new();
        self.collect(&mut nodes);
        nodes
    }

    /// Appends nodes in pre-order.
    fn collect<'a>(&'a self, nodes: &mut Vec<&'a Self>) {
        nodes.push(self);
        for child in self.children.iter().flatten() {
            child.collect(nodes);
        }
    }

    /// Returns the node with the given id
    #[must_use]
    pub fn find(&self, id: RuleId) -> Option<&Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().flatten().find_map(|child| child.find(id))
    }

    /// Returns the number of missing child slots anywhere in the tree
    #[must_use]
    pub fn missing_slots(&self) -> usize {
        self.children
            .iter()
            .map(|slot| slot.as_ref().map_or(1, Self::missing_slots))
            .sum()
    }
}

impl<T> Rule<T> {
    /// Takes a structural snapshot of this tree
    #[must_use]
    pub fn outline(&self) -> RuleOutline {
        let children = match self.body() {
            RuleBody::Mapped(mapped) => vec![mapped.inner_outline()],
            _ => self.children().iter().map(|slot| slot.as_ref().map(Self::outline)).collect(),
        };
        RuleOutline {
            id: self.id(),
            name: self.name().to_owned(),
            description: self.description().to_owned(),
            kind: self.kind(),
            threshold: self.quantifier().map(|quantifier| quantifier.threshold()),
            children,
        }
    }
}
