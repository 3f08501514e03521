//! Backends
//!
//! The seven benchmarked operations, implemented once per execution model.
//! Both backends express every operation through the same collection
//! vocabulary (`flat_map`, `filter`, `aggregate`, `map`, by-key reduce and
//! group) so timings compare engines, not algorithms.

use crate::dataflow::{DataflowConfig, DataflowContext, HashPartitioner, PartitionedCollection};
use crate::dataset::{Dataset, Record};
use crate::error::EngineError;
use crate::local::LocalCollection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cells strictly above this value pass the `filter` operation
pub const FILTER_THRESHOLD: f64 = 0.5;

/// Scale factor applied by the `map` operation
pub const MAP_FACTOR: f64 = 2.0;

/// Execution model selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Sequential in-memory collection
    Local,
    /// Partitioned collection on a worker pool
    Dataflow,
}

impl BackendKind {
    /// Every backend, baseline first
    pub const ALL: [BackendKind; 2] = [BackendKind::Local, BackendKind::Dataflow];

    /// Lowercase name used in reports and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::Dataflow => "dataflow",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(BackendKind::Local),
            "dataflow" => Ok(BackendKind::Dataflow),
            other => Err(EngineError::UnknownBackend(other.to_string())),
        }
    }
}

/// One execution model for the benchmarked operations.
///
/// `load` turns the dataset into the backend's collection once; every other
/// method is one measured unit of work against that collection.
pub trait Backend: Send + Sync + 'static {
    /// Loaded form of a dataset
    type Collection: Send + Sync + 'static;

    /// Which execution model this is
    fn kind(&self) -> BackendKind;

    /// Load the dataset rows into a collection
    fn load(&self, dataset: &Dataset) -> Result<Self::Collection, EngineError>;

    /// Sum of every cell
    fn sum(&self, data: &Self::Collection) -> f64;

    /// Largest cell
    fn max(&self, data: &Self::Collection) -> Result<f64, EngineError>;

    /// Number of cells above `threshold`
    fn filter(&self, data: &Self::Collection, threshold: f64) -> usize;

    /// Materialise every cell multiplied by `factor`, returning how many were produced
    fn map(&self, data: &Self::Collection, factor: f64) -> usize;

    /// Bring every row back to the caller
    fn collect(&self, data: &Self::Collection) -> Vec<Record>;

    /// Row sums added up per key
    fn reduce_by_key(&self, data: &Self::Collection) -> Vec<(u64, f64)>;

    /// Row sums gathered per key
    fn group_by_key(&self, data: &Self::Collection) -> Vec<(u64, Vec<f64>)>;
}

/// Sequential backend over a single `Vec`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalBackend;

impl LocalBackend {
    /// Create the local backend
    pub fn new() -> Self {
        Self
    }
}

impl Backend for LocalBackend {
    type Collection = LocalCollection<Record>;

    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn load(&self, dataset: &Dataset) -> Result<Self::Collection, EngineError> {
        Ok(dataset.records().to_vec().into())
    }

    fn sum(&self, data: &Self::Collection) -> f64 {
        data.aggregate(0.0, |acc, row| acc + row.total())
    }

    fn max(&self, data: &Self::Collection) -> Result<f64, EngineError> {
        data.aggregate(None, |acc, row| fold_max(acc, &row.values))
            .ok_or(EngineError::EmptyCollection { operation: "max" })
    }

    fn filter(&self, data: &Self::Collection, threshold: f64) -> usize {
        data.flat_map(|row| row.values.clone())
            .filter(|v| *v > threshold)
            .count()
    }

    fn map(&self, data: &Self::Collection, factor: f64) -> usize {
        data.flat_map(|row| scale(&row.values, factor)).count()
    }

    fn collect(&self, data: &Self::Collection) -> Vec<Record> {
        data.collect()
    }

    fn reduce_by_key(&self, data: &Self::Collection) -> Vec<(u64, f64)> {
        data.map(keyed_total).reduce_by_key(|a, b| a + b).into_vec()
    }

    fn group_by_key(&self, data: &Self::Collection) -> Vec<(u64, Vec<f64>)> {
        data.map(keyed_total).group_by_key().into_vec()
    }
}

/// Partitioned backend running on its own worker pool
#[derive(Debug, Clone)]
pub struct DataflowBackend {
    context: DataflowContext,
    partitioner: HashPartitioner,
}

impl DataflowBackend {
    /// Build the worker pool and shuffle partitioner
    pub fn new(config: &DataflowConfig) -> Result<Self, EngineError> {
        let context = DataflowContext::new(config)?;
        let partitioner = HashPartitioner::new(config.partitions)?;
        Ok(Self {
            context,
            partitioner,
        })
    }

    /// Partition count used for loading and shuffles
    pub fn partitions(&self) -> usize {
        self.context.default_partitions()
    }

    /// Worker threads in the pool
    pub fn threads(&self) -> usize {
        self.context.threads()
    }
}

impl Backend for DataflowBackend {
    type Collection = PartitionedCollection<Record>;

    fn kind(&self) -> BackendKind {
        BackendKind::Dataflow
    }

    fn load(&self, dataset: &Dataset) -> Result<Self::Collection, EngineError> {
        Ok(self.context.parallelize(dataset.records().to_vec()))
    }

    fn sum(&self, data: &Self::Collection) -> f64 {
        data.aggregate(|| 0.0, |acc, row| acc + row.total(), |a, b| a + b)
    }

    fn max(&self, data: &Self::Collection) -> Result<f64, EngineError> {
        data.aggregate(
            || None,
            |acc, row| fold_max(acc, &row.values),
            |a, b| match (a, b) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            },
        )
        .ok_or(EngineError::EmptyCollection { operation: "max" })
    }

    fn filter(&self, data: &Self::Collection, threshold: f64) -> usize {
        data.flat_map(|row| row.values.clone())
            .filter(|v| *v > threshold)
            .count()
    }

    fn map(&self, data: &Self::Collection, factor: f64) -> usize {
        data.flat_map(|row| scale(&row.values, factor)).count()
    }

    fn collect(&self, data: &Self::Collection) -> Vec<Record> {
        data.collect()
    }

    fn reduce_by_key(&self, data: &Self::Collection) -> Vec<(u64, f64)> {
        data.map(keyed_total)
            .reduce_by_key(|a, b| a + b, &self.partitioner)
            .collect()
    }

    fn group_by_key(&self, data: &Self::Collection) -> Vec<(u64, Vec<f64>)> {
        data.map(keyed_total)
            .group_by_key(&self.partitioner)
            .collect()
    }
}

fn keyed_total(row: &Record) -> (u64, f64) {
    (row.key, row.total())
}

fn scale(values: &[f64], factor: f64) -> Vec<f64> {
    values.iter().map(|v| v * factor).collect()
}

fn fold_max(acc: Option<f64>, values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .fold(acc, |m, v| Some(m.map_or(v, |m| m.max(v))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetConfig;

    fn dataset() -> Dataset {
        Dataset::generate(&DatasetConfig {
            rows: 500,
            cols: 8,
            keys: 7,
            seed: 11,
        })
        .unwrap()
    }

    fn dataflow(partitions: usize) -> DataflowBackend {
        DataflowBackend::new(&DataflowConfig {
            partitions,
            threads: 2,
        })
        .unwrap()
    }

    fn sorted<V>(mut pairs: Vec<(u64, V)>) -> Vec<(u64, V)> {
        pairs.sort_by_key(|(k, _)| *k);
        pairs
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("local".parse::<BackendKind>().unwrap(), BackendKind::Local);
        assert_eq!(
            "Dataflow".parse::<BackendKind>().unwrap(),
            BackendKind::Dataflow
        );
        assert!("spark".parse::<BackendKind>().is_err());
        assert_eq!(BackendKind::Dataflow.to_string(), "dataflow");
    }

    #[test]
    fn test_local_operations() {
        let data = Dataset::from_rows(vec![vec![0.25, 0.75], vec![0.5, 1.0]], 2).unwrap();
        let backend = LocalBackend::new();
        let c = backend.load(&data).unwrap();

        assert_eq!(backend.sum(&c), 2.5);
        assert_eq!(backend.max(&c).unwrap(), 1.0);
        assert_eq!(backend.filter(&c, FILTER_THRESHOLD), 2);
        assert_eq!(backend.map(&c, MAP_FACTOR), 4);
        assert_eq!(backend.collect(&c).len(), 2);
        assert_eq!(
            sorted(backend.reduce_by_key(&c)),
            vec![(0, 1.0), (1, 1.5)]
        );
    }

    #[test]
    fn test_max_on_empty_dataset_fails() {
        let data = Dataset::from_rows(Vec::new(), 1).unwrap();

        let local = LocalBackend::new();
        let c = local.load(&data).unwrap();
        assert!(matches!(
            local.max(&c),
            Err(EngineError::EmptyCollection { operation: "max" })
        ));

        let flow = dataflow(3);
        let c = flow.load(&data).unwrap();
        assert!(flow.max(&c).is_err());
        assert_eq!(flow.sum(&c), 0.0);
    }

    #[test]
    fn test_backends_agree() {
        let data = dataset();
        let local = LocalBackend::new();
        let lc = local.load(&data).unwrap();

        for partitions in [1, 3, 16] {
            let flow = dataflow(partitions);
            let dc = flow.load(&data).unwrap();

            assert!((local.sum(&lc) - flow.sum(&dc)).abs() < 1e-6);
            assert_eq!(local.max(&lc).unwrap(), flow.max(&dc).unwrap());
            assert_eq!(
                local.filter(&lc, FILTER_THRESHOLD),
                flow.filter(&dc, FILTER_THRESHOLD)
            );
            assert_eq!(local.map(&lc, MAP_FACTOR), flow.map(&dc, MAP_FACTOR));
            assert_eq!(local.collect(&lc), flow.collect(&dc));

            let lr = sorted(local.reduce_by_key(&lc));
            let dr = sorted(flow.reduce_by_key(&dc));
            assert_eq!(lr.len(), 7);
            assert_eq!(lr.len(), dr.len());
            for ((lk, lv), (dk, dv)) in lr.iter().zip(&dr) {
                assert_eq!(lk, dk);
                assert!((lv - dv).abs() < 1e-9);
            }

            // Partitions are contiguous row ranges, so group order matches
            assert_eq!(
                sorted(local.group_by_key(&lc)),
                sorted(flow.group_by_key(&dc))
            );
        }
    }

    #[test]
    fn test_dataflow_reports_pool_shape() {
        let flow = dataflow(5);
        assert_eq!(flow.partitions(), 5);
        assert_eq!(flow.threads(), 2);
        assert_eq!(flow.kind(), BackendKind::Dataflow);
    }
}
