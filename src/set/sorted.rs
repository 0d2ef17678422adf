//! SortedSet implementation
//!
//! Vec-backed ordered set of `i32`.

use std::fmt;

/// Ascending, duplicate-free sequence of integers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedSet {
    values: Vec<i32>,
}

impl SortedSet {
    /// Create a new empty set
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Insert a value, keeping ascending order
    ///
    /// Returns `true` if the set changed, `false` if the value was already present.
    pub fn insert(&mut self, value: i32) -> bool {
        match self.values.binary_search(&value) {
            Ok(_) => false,
            Err(pos) => {
                self.values.insert(pos, value);
                true
            }
        }
    }

    /// Remove a value
    ///
    /// Returns `true` if the set changed, `false` if the value was absent.
    pub fn remove(&mut self, value: i32) -> bool {
        match self.values.binary_search(&value) {
            Ok(pos) => {
                self.values.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub fn contains(&self, value: i32) -> bool {
        self.values.binary_search(&value).is_ok()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the values in ascending order
    pub fn as_slice(&self) -> &[i32] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, i32> {
        self.values.iter()
    }

    /// Consume the set, returning the ascending values
    pub fn into_vec(self) -> Vec<i32> {
        self.values
    }
}

impl From<Vec<i32>> for SortedSet {
    /// Sorts and dedups arbitrary input
    fn from(mut values: Vec<i32>) -> Self {
        values.sort_unstable();
        values.dedup();
        Self { values }
    }
}

impl FromIterator<i32> for SortedSet {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a SortedSet {
    type Item = &'a i32;
    type IntoIter = std::slice::Iter<'a, i32>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for SortedSet {
    /// Space-separated values, e.g. `3 5 8`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}
