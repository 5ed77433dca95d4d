//! Keyed icon store

use crate::fragment::IconFragment;
use indexmap::IndexMap;

/// Ordered set of icons with an optional shared prefix.
///
/// Iteration follows insertion order so exports are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    /// Icon set namespace, e.g. `"mdi"`
    pub prefix: Option<String>,
    items: IndexMap<String, IconFragment>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            items: IndexMap::new(),
        }
    }

    /// Insert an icon, replacing any previous entry with the same keyword
    pub fn add(&mut self, keyword: impl Into<String>, icon: IconFragment) {
        self.items.insert(keyword.into(), icon);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.items.contains_key(keyword)
    }

    pub fn get(&self, keyword: &str) -> Option<&IconFragment> {
        self.items.get(keyword)
    }

    pub fn get_mut(&mut self, keyword: &str) -> Option<&mut IconFragment> {
        self.items.get_mut(keyword)
    }

    /// Remove an icon, keeping the order of the remaining entries
    pub fn remove(&mut self, keyword: &str) -> Option<IconFragment> {
        self.items.shift_remove(keyword)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IconFragment)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Drop `len` leading bytes from every keyword, keeping order.
    ///
    /// Caller guarantees every key is longer than `len` and that `len` falls
    /// on a char boundary.
    pub(crate) fn strip_key_prefix(&mut self, len: usize) {
        let items = std::mem::take(&mut self.items);
        self.items = items
            .into_iter()
            .map(|(key, icon)| (key[len..].to_string(), icon))
            .collect();
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = (&'a String, &'a IconFragment);
    type IntoIter = indexmap::map::Iter<'a, String, IconFragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
