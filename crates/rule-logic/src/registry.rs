// crates/rule-logic/src/registry.rs
// ============================================================================
// Module: Rule Registry
// Description: Injected metadata store keyed by rule id.
// Purpose: Track domain tags for documentation without touching evaluation.
// Dependencies: crate::{identity, rule}, serde, thiserror, std::sync::RwLock
// ============================================================================

//! ## Overview
//! The registry is advisory bookkeeping. It is passed explicitly to the
//! helpers that use it, never reached through global state, and evaluation
//! never reads it. Entries are keyed by [`RuleId`], so clones of a rule map to
//! the same entry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::RwLock;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::identity::RuleId;
use crate::rule::Rule;

// ============================================================================
// SECTION: Domain
// ============================================================================

/// A business domain tag
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    /// Creates a domain tag
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the tag text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Domain {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

// ============================================================================
// SECTION: Registry Entries
// ============================================================================

/// Ownership and cross-reference details attached to a registered rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleMetadata {
    /// Free-form tags beyond the domain
    #[serde(default)]
    pub tags: Vec<String>,
    /// Maintainer of the rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Version label of the rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Names of related rules
    #[serde(default)]
    pub related_rules: Vec<String>,
    /// Other domains this rule depends on
    #[serde(default)]
    pub dependencies: Vec<Domain>,
}

/// Metadata recorded for a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredRule {
    /// Id of the rule
    pub id: RuleId,
    /// Name of the rule at registration time
    pub name: String,
    /// Description of the rule at registration time
    pub description: String,
    /// Domain tags, sorted and deduplicated
    pub domains: Vec<Domain>,
    /// Human-readable group name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Ownership and cross-reference details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RuleMetadata>,
}

impl RegisteredRule {
    /// Creates an entry for `rule` with the given domains
    pub fn new<T>(rule: &Rule<T>, domains: impl IntoIterator<Item = Domain>) -> Self {
        let domains: BTreeSet<Domain> = domains.into_iter().collect();
        Self {
            id: rule.id(),
            name: rule.name().to_owned(),
            description: rule.description().to_owned(),
            domains: domains.into_iter().collect(),
            group: None,
            metadata: None,
        }
    }

    /// Returns this entry tagged with a group name
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Returns this entry with metadata attached
    #[must_use]
    pub fn with_metadata(mut self, metadata: RuleMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Registry failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A writer panicked while holding the registry lock
    #[error("rule registry lock poisoned")]
    Poisoned,
}

// ============================================================================
// SECTION: Registry Contract
// ============================================================================

/// Metadata store for rules, keyed by id
pub trait RuleRegistry: Send + Sync {
    /// Records an entry; domains merge into any existing entry for the same id
    ///
    /// A group or metadata on the new entry replaces the stored one; absent
    /// values keep what was recorded before.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the store is unavailable.
    fn register(&self, entry: RegisteredRule) -> Result<(), RegistryError>;

    /// Returns the entry for `id`
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the store is unavailable.
    fn get(&self, id: RuleId) -> Result<Option<RegisteredRule>, RegistryError>;

    /// Returns entries tagged with `domain`, ordered by id
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the store is unavailable.
    fn rules_in_domain(&self, domain: &Domain) -> Result<Vec<RegisteredRule>, RegistryError>;

    /// Returns entries tagged with any of `domains`, ordered by id
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the store is unavailable.
    fn rules_in_domains(&self, domains: &[Domain]) -> Result<Vec<RegisteredRule>, RegistryError>;

    /// Returns entries in the named group, ordered by id
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the store is unavailable.
    fn rules_in_group(&self, group: &str) -> Result<Vec<RegisteredRule>, RegistryError>;

    /// Returns every known group name, sorted
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the store is unavailable.
    fn groups(&self) -> Result<Vec<String>, RegistryError>;

    /// Replaces the description of a registered rule; returns false when `id` is unknown
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the store is unavailable.
    fn update_description(&self, id: RuleId, description: &str) -> Result<bool, RegistryError>;

    /// Replaces the metadata of a registered rule; returns false when `id` is unknown
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the store is unavailable.
    fn update_metadata(&self, id: RuleId, metadata: RuleMetadata) -> Result<bool, RegistryError>;

    /// Returns every known domain, sorted
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the store is unavailable.
    fn domains(&self) -> Result<Vec<Domain>, RegistryError>;

    /// Removes every entry
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the store is unavailable.
    fn clear(&self) -> Result<(), RegistryError>;

    /// Returns the domains recorded for `id`, empty when unregistered
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the store is unavailable.
    fn domains_of(&self, id: RuleId) -> Result<Vec<Domain>, RegistryError> {
        Ok(self.get(id)?.map(|entry| entry.domains).unwrap_or_default())
    }
}

// ============================================================================
// SECTION: In-Memory Registry
// ============================================================================

/// Thread-safe registry held in memory
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    /// Entries by id.
    entries: RwLock<BTreeMap<RuleId, RegisteredRule>>,
}

impl MemoryRegistry {
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RuleRegistry for MemoryRegistry {
    fn register(&self, entry: RegisteredRule) -> Result<(), RegistryError> {
        let mut entries = self.entries.write().map_err(|_| RegistryError::Poisoned)?;
        match entries.get_mut(&entry.id) {
            Some(existing) => {
                let merged: BTreeSet<Domain> =
                    existing.domains.drain(..).chain(entry.domains).collect();
                existing.domains = merged.into_iter().collect();
                existing.name = entry.name;
                existing.description = entry.description;
                if entry.group.is_some() {
                    existing.group = entry.group;
                }
                if entry.metadata.is_some() {
                    existing.metadata = entry.metadata;
                }
            }
            None => {
                entries.insert(entry.id, entry);
            }
        }
        Ok(())
    }

    fn get(&self, id: RuleId) -> Result<Option<RegisteredRule>, RegistryError> {
        let entries = self.entries.read().map_err(|_| RegistryError::Poisoned)?;
        Ok(entries.get(&id).cloned())
    }

    fn rules_in_domain(&self, domain: &Domain) -> Result<Vec<RegisteredRule>, RegistryError> {
        let entries = self.entries.read().map_err(|_| RegistryError::Poisoned)?;
        Ok(entries.values().filter(|entry| entry.domains.contains(domain)).cloned().collect())
    }

    fn rules_in_domains(&self, domains: &[Domain]) -> Result<Vec<RegisteredRule>, RegistryError> {
        let entries = self.entries.read().map_err(|_| RegistryError::Poisoned)?;
        Ok(entries
            .values()
            .filter(|entry| entry.domains.iter().any(|domain| domains.contains(domain)))
            .cloned()
            .collect())
    }

    fn rules_in_group(&self, group: &str) -> Result<Vec<RegisteredRule>, RegistryError> {
        let entries = self.entries.read().map_err(|_| RegistryError::Poisoned)?;
        Ok(entries
            .values()
            .filter(|entry| entry.group.as_deref() == Some(group))
            .cloned()
            .collect())
    }

    fn groups(&self) -> Result<Vec<String>, RegistryError> {
        let entries = self.entries.read().map_err(|_| RegistryError::Poisoned)?;
        let groups: BTreeSet<&str> =
            entries.values().filter_map(|entry| entry.group.as_deref()).collect();
        Ok(groups.into_iter().map(str::to_owned).collect())
    }

    fn update_description(&self, id: RuleId, description: &str) -> Result<bool, RegistryError> {
        let mut entries = self.entries.write().map_err(|_| RegistryError::Poisoned)?;
        let Some(entry) = entries.get_mut(&id) else {
            return Ok(false);
        };
        entry.description = description.to_owned();
        Ok(true)
    }

    fn update_metadata(&self, id: RuleId, metadata: RuleMetadata) -> Result<bool, RegistryError> {
        let mut entries = self.entries.write().map_err(|_| RegistryError::Poisoned)?;
        let Some(entry) = entries.get_mut(&id) else {
            return Ok(false);
        };
        entry.metadata = Some(metadata);
        Ok(true)
    }

    fn domains(&self) -> Result<Vec<Domain>, RegistryError> {
        let entries = self.entries.read().map_err(|_| RegistryError::Poisoned)?;
        let domains: BTreeSet<&Domain> =
            entries.values().flat_map(|entry| entry.domains.iter()).collect();
        Ok(domains.into_iter().cloned().collect())
    }

    fn clear(&self) -> Result<(), RegistryError> {
        self.entries.write().map_err(|_| RegistryError::Poisoned)?.clear();
        Ok(())
    }
}

// ============================================================================
// SECTION: Registration Helpers
// ============================================================================

/// Registers `rule` under the given domains and returns the rule
///
/// # Errors
///
/// Returns [`RegistryError`] when the store is unavailable.
pub fn register_with_domains<T, R>(
    registry: &R,
    rule: Rule<T>,
    domains: impl IntoIterator<Item = Domain>,
) -> Result<Rule<T>, RegistryError>
where
    R: RuleRegistry + ?Sized,
{
    registry.register(RegisteredRule::new(&rule, domains))?;
    Ok(rule)
}

/// Tags a combinator with the union of its direct children's domains
///
/// Nothing is registered when no child carries a domain. Returns the
/// inherited domains, sorted and deduplicated.
///
/// # Errors
///
/// Returns [`RegistryError`] when the store is unavailable.
pub fn inherit_domains<T, R>(registry: &R, rule: &Rule<T>) -> Result<Vec<Domain>, RegistryError>
where
    R: RuleRegistry + ?Sized,
{
    let mut inherited = BTreeSet::new();
    for child in rule.children().iter().flatten() {
        inherited.extend(registry.domains_of(child.id())?);
    }
    let inherited: Vec<Domain> = inherited.into_iter().collect();
    if !inherited.is_empty() {
        registry.register(RegisteredRule::new(rule, inherited.iter().cloned()))?;
    }
    Ok(inherited)
}
