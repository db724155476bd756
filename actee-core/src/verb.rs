// SPDX-License-Identifier: MIT OR Apache-2.0

//! Verbs are atomic permission strings, for example `form.read` or `user.update`.
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::collections::btree_set;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single permission.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Verb(String);

impl Verb {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Verb {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Verb {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Verb {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Ordered set of verbs.
///
/// Verb sets describe both the capability ceiling of a role and the effective capability an
/// actor holds on an actee. Effective capabilities are always computed as the _union_ of
/// everything granted, there is no way to subtract verbs.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerbSet(BTreeSet<Verb>);

impl VerbSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a verb, returns `true` if it was not already present.
    pub fn insert(&mut self, verb: impl Into<Verb>) -> bool {
        self.0.insert(verb.into())
    }

    pub fn contains(&self, verb: &str) -> bool {
        self.0.contains(verb)
    }

    /// Extends this set with all verbs of the other one.
    pub fn extend_from(&mut self, other: &VerbSet) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Returns a new set containing the verbs of both sets.
    pub fn union(&self, other: &VerbSet) -> VerbSet {
        Self(self.0.union(&other.0).cloned().collect())
    }

    /// Returns `true` if every verb of this set is also contained in the other one.
    ///
    /// The empty set is a subset of every set.
    pub fn is_subset(&self, other: &VerbSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn is_superset(&self, other: &VerbSet) -> bool {
        self.0.is_superset(&other.0)
    }

    /// Verbs of this set which are missing in the other one.
    pub fn missing_from(&self, other: &VerbSet) -> VerbSet {
        Self(self.0.difference(&other.0).cloned().collect())
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Verb> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> FromIterator<V> for VerbSet
where
    V: Into<Verb>,
{
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<V, const N: usize> From<[V; N]> for VerbSet
where
    V: Into<Verb>,
{
    fn from(value: [V; N]) -> Self {
        value.into_iter().collect()
    }
}

impl IntoIterator for VerbSet {
    type Item = Verb;
    type IntoIter = btree_set::IntoIter<Verb>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a VerbSet {
    type Item = &'a Verb;
    type IntoIter = btree_set::Iter<'a, Verb>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Debug for VerbSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for VerbSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verbs: Vec<&str> = self.0.iter().map(Verb::as_str).collect();
        write!(f, "{{{}}}", verbs.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::VerbSet;

    #[test]
    fn subset_and_missing() {
        let editor = VerbSet::from(["form.read", "form.update"]);
        let viewer = VerbSet::from(["form.read"]);

        assert!(viewer.is_subset(&editor));
        assert!(!editor.is_subset(&viewer));
        assert!(VerbSet::new().is_subset(&viewer));

        assert_eq!(
            editor.missing_from(&viewer),
            VerbSet::from(["form.update"])
        );
        assert!(viewer.missing_from(&editor).is_empty());
    }

    #[test]
    fn union_only_adds() {
        let mut verbs = VerbSet::from(["form.read"]);
        verbs.extend_from(&VerbSet::from(["form.read", "form.delete"]));
        assert_eq!(verbs.len(), 2);
        assert!(verbs.contains("form.read"));
        assert!(verbs.contains("form.delete"));

        let union = VerbSet::from(["a"]).union(&VerbSet::from(["b"]));
        assert_eq!(union, VerbSet::from(["a", "b"]));
    }

    #[test]
    fn display() {
        let verbs = VerbSet::from(["user.update", "user.read"]);
        assert_eq!(verbs.to_string(), "{user.read, user.update}");
    }
}
