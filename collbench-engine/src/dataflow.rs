//! Partitioned Dataflow Collection
//!
//! A single-process stand-in for a distributed dataflow engine running in
//! local mode. Data is split into partitions; each transformation runs one
//! task per partition on a dedicated worker pool. By-key operations are wide:
//! records are redistributed to output partitions by key hash (the shuffle)
//! before the per-key work happens.
//!
//! ```text
//!  partition 0 ─┐  map-side   ┌─ bucket 0 ─┐           ┌─ out 0
//!  partition 1 ─┼─ combine ───┼─ bucket 1 ─┼─ shuffle ─┼─ out 1
//!  partition 2 ─┘             └─ bucket 2 ─┘           └─ out 2
//! ```

use crate::error::EngineError;
use fxhash::{FxHashMap, FxHasher};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Worker pool and default partitioning for dataflow collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataflowConfig {
    /// Partitions per collection
    #[serde(default = "default_partitions")]
    pub partitions: usize,
    /// Worker threads (0 = one per available core)
    #[serde(default)]
    pub threads: usize,
}

impl Default for DataflowConfig {
    fn default() -> Self {
        Self {
            partitions: default_partitions(),
            threads: 0,
        }
    }
}

fn default_partitions() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Assigns keys to partitions by hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashPartitioner {
    partitions: usize,
}

impl HashPartitioner {
    /// Create a partitioner over `partitions` outputs
    pub fn new(partitions: usize) -> Result<Self, EngineError> {
        if partitions == 0 {
            return Err(EngineError::InvalidPartitions);
        }
        Ok(Self { partitions })
    }

    /// Number of output partitions
    pub fn num_partitions(&self) -> usize {
        self.partitions
    }

    /// Output partition for `key`
    #[inline]
    pub fn partition<K: Hash + ?Sized>(&self, key: &K) -> usize {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        (hasher.finish() % self.partitions as u64) as usize
    }
}

/// Entry point for creating partitioned collections
#[derive(Clone)]
pub struct DataflowContext {
    pool: Arc<ThreadPool>,
    partitions: usize,
}

impl std::fmt::Debug for DataflowContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataflowContext")
            .field("threads", &self.pool.current_num_threads())
            .field("partitions", &self.partitions)
            .finish()
    }
}

impl DataflowContext {
    /// Build the worker pool
    pub fn new(config: &DataflowConfig) -> Result<Self, EngineError> {
        if config.partitions == 0 {
            return Err(EngineError::InvalidPartitions);
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("collbench-worker-{i}"))
            .build()?;

        tracing::debug!(
            threads = pool.current_num_threads(),
            partitions = config.partitions,
            "dataflow context ready"
        );

        Ok(Self {
            pool: Arc::new(pool),
            partitions: config.partitions,
        })
    }

    /// Default partition count
    pub fn default_partitions(&self) -> usize {
        self.partitions
    }

    /// Worker threads in the pool
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Split `items` into the default number of partitions
    pub fn parallelize<T>(&self, items: Vec<T>) -> PartitionedCollection<T> {
        self.split(items, self.partitions)
    }

    /// Split `items` into `partitions` contiguous partitions
    pub fn parallelize_with<T>(
        &self,
        items: Vec<T>,
        partitions: usize,
    ) -> Result<PartitionedCollection<T>, EngineError> {
        if partitions == 0 {
            return Err(EngineError::InvalidPartitions);
        }
        Ok(self.split(items, partitions))
    }

    fn split<T>(&self, items: Vec<T>, partitions: usize) -> PartitionedCollection<T> {
        // Sizes differ by at most one; leading partitions take the remainder.
        let len = items.len();
        let base = len / partitions;
        let extra = len % partitions;

        let mut iter = items.into_iter();
        let parts: Vec<Vec<T>> = (0..partitions)
            .map(|i| {
                let size = base + usize::from(i < extra);
                iter.by_ref().take(size).collect()
            })
            .collect();

        PartitionedCollection {
            partitions: parts,
            pool: Arc::clone(&self.pool),
        }
    }
}

/// Collection split into partitions that are processed in parallel
pub struct PartitionedCollection<T> {
    partitions: Vec<Vec<T>>,
    pool: Arc<ThreadPool>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for PartitionedCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartitionedCollection")
            .field("partitions", &self.partitions)
            .finish()
    }
}

impl<T> PartitionedCollection<T> {
    /// Number of partitions
    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    /// Raw partitions
    pub fn partitions(&self) -> &[Vec<T>] {
        &self.partitions
    }

    /// Total number of elements
    pub fn count(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    /// Whether there are no elements
    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(Vec::is_empty)
    }

    fn derive<U>(&self, partitions: Vec<Vec<U>>) -> PartitionedCollection<U> {
        PartitionedCollection {
            partitions,
            pool: Arc::clone(&self.pool),
        }
    }
}

impl<T: Sync> PartitionedCollection<T> {
    /// Apply `f` to every element, one task per partition
    pub fn map<U, F>(&self, f: F) -> PartitionedCollection<U>
    where
        U: Send,
        F: Fn(&T) -> U + Sync,
    {
        let parts: Vec<Vec<U>> = self.pool.install(|| {
            self.partitions
                .par_iter()
                .map(|p| p.iter().map(&f).collect())
                .collect()
        });
        self.derive(parts)
    }

    /// Apply `f` to every element and flatten the results within each partition
    pub fn flat_map<U, I, F>(&self, f: F) -> PartitionedCollection<U>
    where
        U: Send,
        I: IntoIterator<Item = U>,
        F: Fn(&T) -> I + Sync,
    {
        let parts: Vec<Vec<U>> = self.pool.install(|| {
            self.partitions
                .par_iter()
                .map(|p| p.iter().flat_map(&f).collect())
                .collect()
        });
        self.derive(parts)
    }

    /// Keep elements matching `predicate`
    pub fn filter<F>(&self, predicate: F) -> PartitionedCollection<T>
    where
        T: Clone + Send,
        F: Fn(&T) -> bool + Sync,
    {
        let parts: Vec<Vec<T>> = self.pool.install(|| {
            self.partitions
                .par_iter()
                .map(|p| p.iter().filter(|x| predicate(*x)).cloned().collect())
                .collect()
        });
        self.derive(parts)
    }

    /// Fold each partition with `fold`, then merge partition results with `combine`
    pub fn aggregate<A, Z, F, C>(&self, zero: Z, fold: F, combine: C) -> A
    where
        A: Send,
        Z: Fn() -> A + Sync,
        F: Fn(A, &T) -> A + Sync,
        C: Fn(A, A) -> A + Sync,
    {
        let partials: Vec<A> = self.pool.install(|| {
            self.partitions
                .par_iter()
                .map(|p| p.iter().fold(zero(), &fold))
                .collect()
        });
        partials.into_iter().fold(zero(), combine)
    }

    /// Gather every element to the caller, in partition order
    pub fn collect(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut out = Vec::with_capacity(self.count());
        for p in &self.partitions {
            out.extend_from_slice(p);
        }
        out
    }
}

impl PartitionedCollection<f64> {
    /// Sum of all elements
    pub fn sum(&self) -> f64 {
        self.aggregate(|| 0.0, |acc, x| acc + x, |a, b| a + b)
    }

    /// Largest element, `None` when empty
    pub fn max(&self) -> Option<f64> {
        self.aggregate(
            || None,
            |acc: Option<f64>, x| Some(acc.map_or(*x, |m| m.max(*x))),
            |a, b| match (a, b) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            },
        )
    }
}

impl<K, V> PartitionedCollection<(K, V)>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    /// Merge the values of each key with `reduce`.
    ///
    /// Values are combined inside each partition first, so only one record
    /// per key and source partition crosses the shuffle.
    pub fn reduce_by_key<F>(
        &self,
        reduce: F,
        partitioner: &HashPartitioner,
    ) -> PartitionedCollection<(K, V)>
    where
        F: Fn(V, V) -> V + Sync,
    {
        let outputs = partitioner.num_partitions();

        let merge = |map: &mut FxHashMap<K, V>, key: K, value: V| match map.get_mut(&key) {
            Some(current) => *current = reduce(current.clone(), value),
            None => {
                map.insert(key, value);
            }
        };

        let buckets: Vec<Vec<FxHashMap<K, V>>> = self.pool.install(|| {
            self.partitions
                .par_iter()
                .map(|p| {
                    let mut out: Vec<FxHashMap<K, V>> =
                        (0..outputs).map(|_| FxHashMap::default()).collect();
                    for (key, value) in p {
                        let target = partitioner.partition(key);
                        merge(&mut out[target], key.clone(), value.clone());
                    }
                    out
                })
                .collect()
        });

        let shuffled = transpose(buckets, outputs);

        let parts: Vec<Vec<(K, V)>> = self.pool.install(|| {
            shuffled
                .into_par_iter()
                .map(|maps| {
                    let mut merged: FxHashMap<K, V> = FxHashMap::default();
                    for map in maps {
                        for (key, value) in map {
                            merge(&mut merged, key, value);
                        }
                    }
                    merged.into_iter().collect()
                })
                .collect()
        });
        self.derive(parts)
    }

    /// Gather all values of each key.
    ///
    /// Every record crosses the shuffle. Values of a key keep their source
    /// order within a partition, and partitions are visited in order.
    pub fn group_by_key(&self, partitioner: &HashPartitioner) -> PartitionedCollection<(K, Vec<V>)> {
        let outputs = partitioner.num_partitions();

        let buckets: Vec<Vec<Vec<(K, V)>>> = self.pool.install(|| {
            self.partitions
                .par_iter()
                .map(|p| {
                    let mut out: Vec<Vec<(K, V)>> = (0..outputs).map(|_| Vec::new()).collect();
                    for (key, value) in p {
                        out[partitioner.partition(key)].push((key.clone(), value.clone()));
                    }
                    out
                })
                .collect()
        });

        let shuffled = transpose(buckets, outputs);

        let parts: Vec<Vec<(K, Vec<V>)>> = self.pool.install(|| {
            shuffled
                .into_par_iter()
                .map(|chunks| {
                    let mut groups: FxHashMap<K, Vec<V>> = FxHashMap::default();
                    for (key, value) in chunks.into_iter().flatten() {
                        groups.entry(key).or_default().push(value);
                    }
                    groups.into_iter().collect()
                })
                .collect()
        });
        self.derive(parts)
    }
}

/// Turn per-source buckets into per-target inputs: `out[target][source]`.
fn transpose<B>(buckets: Vec<Vec<B>>, outputs: usize) -> Vec<Vec<B>> {
    let sources = buckets.len();
    let mut shuffled: Vec<Vec<B>> = (0..outputs).map(|_| Vec::with_capacity(sources)).collect();
    for source in buckets {
        for (target, bucket) in source.into_iter().enumerate() {
            shuffled[target].push(bucket);
        }
    }
    shuffled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(partitions: usize) -> DataflowContext {
        DataflowContext::new(&DataflowConfig {
            partitions,
            threads: 2,
        })
        .unwrap()
    }

    fn pairs() -> Vec<(String, i32)> {
        vec![
            ("apple".to_string(), 1),
            ("banana".to_string(), 2),
            ("apple".to_string(), 3),
            ("cherry".to_string(), 1),
            ("banana".to_string(), 4),
            ("apple".to_string(), 2),
        ]
    }

    #[test]
    fn test_zero_partitions_rejected() {
        assert!(matches!(
            DataflowContext::new(&DataflowConfig {
                partitions: 0,
                threads: 1
            }),
            Err(EngineError::InvalidPartitions)
        ));
        assert!(matches!(
            HashPartitioner::new(0),
            Err(EngineError::InvalidPartitions)
        ));
        assert!(context(2).parallelize_with(vec![1, 2], 0).is_err());
    }

    #[test]
    fn test_parallelize_balances_partitions() {
        let c = context(3).parallelize((0..10).collect::<Vec<u32>>());
        let sizes: Vec<usize> = c.partitions().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        assert_eq!(c.collect(), (0..10).collect::<Vec<u32>>());
    }

    #[test]
    fn test_more_partitions_than_items() {
        let c = context(8).parallelize(vec![1.0, 2.0]);
        assert_eq!(c.num_partitions(), 8);
        assert_eq!(c.count(), 2);
        assert_eq!(c.sum(), 3.0);
    }

    #[test]
    fn test_narrow_transformations() {
        let c = context(4).parallelize((1..=100).map(f64::from).collect());

        assert_eq!(c.sum(), 5050.0);
        assert_eq!(c.max(), Some(100.0));
        assert_eq!(c.filter(|x| *x > 50.0).count(), 50);
        assert_eq!(c.map(|x| x * 2.0).sum(), 10100.0);
        assert_eq!(c.flat_map(|x| [*x, *x]).count(), 200);
    }

    #[test]
    fn test_max_of_empty_is_none() {
        let c = context(3).parallelize(Vec::<f64>::new());
        assert!(c.is_empty());
        assert_eq!(c.max(), None);
    }

    #[test]
    fn test_reduce_by_key_matches_sequential() {
        let ctx = context(3);
        let partitioner = HashPartitioner::new(2).unwrap();

        let reduced = ctx.parallelize(pairs()).reduce_by_key(|a, b| a + b, &partitioner);
        assert_eq!(reduced.num_partitions(), 2);

        let mut out = reduced.collect();
        out.sort();
        assert_eq!(
            out,
            vec![
                ("apple".to_string(), 6),
                ("banana".to_string(), 6),
                ("cherry".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_keys_land_in_their_hash_partition() {
        let ctx = context(3);
        let partitioner = HashPartitioner::new(4).unwrap();
        let reduced = ctx.parallelize(pairs()).reduce_by_key(|a, b| a + b, &partitioner);

        for (idx, part) in reduced.partitions().iter().enumerate() {
            for (key, _) in part {
                assert_eq!(partitioner.partition(key), idx);
            }
        }
    }

    #[test]
    fn test_group_by_key() {
        let ctx = context(1);
        let partitioner = HashPartitioner::new(3).unwrap();

        let mut grouped = ctx.parallelize(pairs()).group_by_key(&partitioner).collect();
        grouped.sort();
        assert_eq!(grouped.len(), 3);
        // Single source partition keeps value order
        assert_eq!(grouped[0], ("apple".to_string(), vec![1, 3, 2]));
        assert_eq!(grouped[2], ("cherry".to_string(), vec![1]));
    }

    #[test]
    fn test_partitioner_is_deterministic() {
        let partitioner = HashPartitioner::new(16).unwrap();
        assert_eq!(partitioner.partition(&42u64), partitioner.partition(&42u64));
        assert!(partitioner.partition("key") < 16);
    }
}
