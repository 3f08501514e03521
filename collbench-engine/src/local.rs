//! Local Collection
//!
//! Sequential, in-memory rendition of the dataflow collection API. Every
//! transformation runs immediately on the calling thread over a single `Vec`.

use fxhash::FxHashMap;
use std::hash::Hash;

/// In-memory collection with dataflow-style operations
#[derive(Debug, Clone, PartialEq)]
pub struct LocalCollection<T> {
    items: Vec<T>,
}

impl<T> From<Vec<T>> for LocalCollection<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for LocalCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> LocalCollection<T> {
    /// Number of elements
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrowing iterator
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Apply `f` to every element
    pub fn map<U, F>(&self, f: F) -> LocalCollection<U>
    where
        F: Fn(&T) -> U,
    {
        self.items.iter().map(f).collect()
    }

    /// Apply `f` to every element and flatten the results
    pub fn flat_map<U, I, F>(&self, f: F) -> LocalCollection<U>
    where
        I: IntoIterator<Item = U>,
        F: Fn(&T) -> I,
    {
        self.items.iter().flat_map(f).collect()
    }

    /// Keep elements matching `predicate`
    pub fn filter<F>(&self, predicate: F) -> LocalCollection<T>
    where
        T: Clone,
        F: Fn(&T) -> bool,
    {
        self.items.iter().filter(|x| predicate(*x)).cloned().collect()
    }

    /// Fold all elements into one value
    pub fn aggregate<A, F>(&self, zero: A, fold: F) -> A
    where
        F: Fn(A, &T) -> A,
    {
        self.items.iter().fold(zero, fold)
    }

    /// Copy every element out into a `Vec`
    pub fn collect(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.clone()
    }

    /// Take the elements without copying
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl LocalCollection<f64> {
    /// Sum of all elements
    pub fn sum(&self) -> f64 {
        self.items.iter().sum()
    }

    /// Largest element, `None` when empty
    pub fn max(&self) -> Option<f64> {
        self.items.iter().copied().reduce(f64::max)
    }
}

impl<K, V> LocalCollection<(K, V)>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Merge the values of each key with `reduce`
    pub fn reduce_by_key<F>(&self, reduce: F) -> LocalCollection<(K, V)>
    where
        F: Fn(V, V) -> V,
    {
        let mut merged: FxHashMap<K, V> = FxHashMap::default();
        for (key, value) in &self.items {
            match merged.get_mut(key) {
                Some(current) => *current = reduce(current.clone(), value.clone()),
                None => {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }
        merged.into_iter().collect()
    }

    /// Gather all values of each key, preserving their order
    pub fn group_by_key(&self) -> LocalCollection<(K, Vec<V>)> {
        let mut groups: FxHashMap<K, Vec<V>> = FxHashMap::default();
        for (key, value) in &self.items {
            groups.entry(key.clone()).or_default().push(value.clone());
        }
        groups.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> LocalCollection<(String, i32)> {
        vec![
            ("apple".to_string(), 1),
            ("banana".to_string(), 2),
            ("apple".to_string(), 3),
            ("cherry".to_string(), 1),
            ("banana".to_string(), 4),
            ("apple".to_string(), 2),
        ]
        .into()
    }

    #[test]
    fn test_map_filter_flat_map() {
        let c: LocalCollection<f64> = vec![1.0, 2.0, 3.0].into();
        assert_eq!(c.map(|x| x * 2.0).collect(), vec![2.0, 4.0, 6.0]);
        assert_eq!(c.filter(|x| *x > 1.5).count(), 2);
        assert_eq!(c.flat_map(|x| vec![*x; 2]).count(), 6);
    }

    #[test]
    fn test_sum_and_max() {
        let c: LocalCollection<f64> = vec![0.25, 0.75, 0.5].into();
        assert_eq!(c.sum(), 1.5);
        assert_eq!(c.max(), Some(0.75));

        let empty: LocalCollection<f64> = Vec::new().into();
        assert_eq!(empty.max(), None);
        assert_eq!(empty.sum(), 0.0);
    }

    #[test]
    fn test_reduce_by_key() {
        let mut reduced = pairs().reduce_by_key(|a, b| a + b).into_vec();
        reduced.sort();
        assert_eq!(
            reduced,
            vec![
                ("apple".to_string(), 6),
                ("banana".to_string(), 6),
                ("cherry".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_group_by_key_keeps_value_order() {
        let mut grouped = pairs().group_by_key().into_vec();
        grouped.sort();
        assert_eq!(grouped[0], ("apple".to_string(), vec![1, 3, 2]));
        assert_eq!(grouped[1], ("banana".to_string(), vec![2, 4]));
        assert_eq!(grouped.len(), 3);
    }

    #[test]
    fn test_aggregate() {
        let c: LocalCollection<u32> = (1..=4).collect();
        assert_eq!(c.aggregate(0, |acc, x| acc + x), 10);
    }
}
