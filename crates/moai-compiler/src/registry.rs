//! Ordered, name-keyed storage for model declarations.

use moai_core::{Parameter, Set, Variable};

/// Anything stored in a [`NamedList`].
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Set {
    fn name(&self) -> &str {
        Set::name(self)
    }
}

impl Named for Parameter {
    fn name(&self) -> &str {
        Parameter::name(self)
    }
}

impl Named for Variable {
    fn name(&self) -> &str {
        Variable::name(self)
    }
}

/// A list that keeps insertion order and unique names.
///
/// Replacing an entry keeps its original position so emission order stays
/// stable across edits.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedList<T> {
    items: Vec<T>,
}

impl<T> Default for NamedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Named> NamedList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces by name. Returns the replaced entry.
    pub fn upsert(&mut self, item: T) -> Option<T> {
        match self.position(item.name()) {
            Some(pos) => Some(std::mem::replace(&mut self.items[pos], item)),
            None => {
                self.items.push(item);
                None
            }
        }
    }

    /// Removes an entry by name, shifting later entries up.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        self.position(name).map(|pos| self.items.remove(pos))
    }

    /// Looks up an entry by name.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.items.iter().find(|item| item.name() == name)
    }

    /// Returns true if an entry has this name.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Returns the names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(Named::name).collect()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name() == name)
    }
}

impl<T: Named> FromIterator<T> for NamedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = NamedList::new();
        for item in iter {
            list.upsert(item);
        }
        list
    }
}

impl<'a, T> IntoIterator for &'a NamedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_keeps_position() {
        let mut list = NamedList::new();
        list.upsert(Set::new("I", [1, 2]));
        list.upsert(Set::new("J", [1]));
        let old = list.upsert(Set::new("I", [5]));

        assert_eq!(old.map(|s| s.len()), Some(2));
        assert_eq!(list.names(), vec!["I", "J"]);
        assert_eq!(list.get("I").map(Set::len), Some(1));
    }

    #[test]
    fn test_remove() {
        let mut list: NamedList<Set> =
            [Set::new("I", [1]), Set::new("J", [2])].into_iter().collect();
        assert!(list.remove("I").is_some());
        assert!(list.remove("I").is_none());
        assert_eq!(list.names(), vec!["J"]);
        assert!(!list.contains("I"));
    }
}
