//! Effective permission sets and the guard predicates evaluated against them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Permission;

/// Deduplicated set of permission tokens held by one user.
///
/// Tokens are kept as strings so that stored overrides outside the
/// current catalog survive resolution unchanged. Iteration order is sorted
/// and therefore deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Inserts one token, returning whether it was newly added.
    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        self.0.insert(token.into())
    }

    /// Returns whether the token is present.
    #[must_use]
    pub fn contains(&self, token: impl AsRef<str>) -> bool {
        self.0.contains(token.as_ref())
    }

    /// Returns whether at least one of the tokens is present.
    #[must_use]
    pub fn contains_any<I>(&self, tokens: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        tokens.into_iter().any(|token| self.contains(token))
    }

    /// Returns whether every token is present.
    ///
    /// An empty requirement list is satisfied only by a non-empty set, so an
    /// empty set never passes a guard.
    #[must_use]
    pub fn contains_all<I>(&self, tokens: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        !self.is_empty() && tokens.into_iter().all(|token| self.contains(token))
    }

    /// Returns whether `other` is fully contained in this set.
    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        self.0.is_superset(&other.0)
    }

    /// Returns the number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the tokens in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Materializes the set as a sorted, deduplicated list.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl FromIterator<String> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Self(iter.into_iter().map(ToOwned::to_owned).collect())
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
        )
    }
}

impl IntoIterator for PermissionSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<PermissionSet> for Vec<String> {
    fn from(value: PermissionSet) -> Self {
        value.0.into_iter().collect()
    }
}

/// Coerces an arbitrary stored override value into a clean token list.
///
/// Anything other than an array yields an empty list. Non-string entries
/// are dropped and duplicates removed while keeping first-seen order.
#[must_use]
pub fn sanitize_overrides(value: &Value) -> Vec<String> {
    let Value::Array(entries) = value else {
        return Vec::new();
    };

    dedup_tokens(entries.iter().filter_map(Value::as_str))
}

/// Removes duplicate tokens while keeping first-seen order.
#[must_use]
pub fn dedup_tokens<I>(tokens: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen = BTreeSet::new();
    let mut ordered = Vec::new();
    for token in tokens {
        let token = token.as_ref();
        if seen.insert(token.to_owned()) {
            ordered.push(token.to_owned());
        }
    }

    ordered
}

/// Returns whether `permissions` holds `token`.
#[must_use]
pub fn has_permission<S: AsRef<str>>(permissions: &[S], token: impl AsRef<str>) -> bool {
    let token = token.as_ref();
    permissions.iter().any(|held| held.as_ref() == token)
}

/// Returns whether `permissions` holds at least one of `tokens`.
#[must_use]
pub fn has_any_permission<S, T>(permissions: &[S], tokens: &[T]) -> bool
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    tokens.iter().any(|token| has_permission(permissions, token))
}

/// Returns whether `permissions` holds every one of `tokens`.
///
/// An empty `permissions` slice never satisfies the guard.
#[must_use]
pub fn has_all_permissions<S, T>(permissions: &[S], tokens: &[T]) -> bool
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    !permissions.is_empty() && tokens.iter().all(|token| has_permission(permissions, token))
}
