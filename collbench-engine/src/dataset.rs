//! Random Matrix Dataset
//!
//! The benchmark input: a `rows x cols` matrix of uniform `[0, 1)` values.
//! Each row carries a key (`row_index % keys`) so the same data can feed both
//! the plain and the by-key operations.

use crate::error::EngineError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// One matrix row with its grouping key
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Grouping key for by-key operations
    pub key: u64,
    /// Row values
    pub values: Vec<f64>,
}

impl Record {
    /// Sum of the row's values
    #[inline]
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Shape and seed of the generated matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Number of rows
    #[serde(default = "default_rows")]
    pub rows: usize,
    /// Number of columns
    #[serde(default = "default_cols")]
    pub cols: usize,
    /// Number of distinct keys
    #[serde(default = "default_keys")]
    pub keys: usize,
    /// RNG seed
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            keys: default_keys(),
            seed: default_seed(),
        }
    }
}

fn default_rows() -> usize {
    10_000
}
fn default_cols() -> usize {
    100
}
fn default_keys() -> usize {
    100
}
fn default_seed() -> u64 {
    42
}

impl DatasetConfig {
    /// Reject empty shapes and zero keys
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(EngineError::InvalidDataset(format!(
                "matrix shape must be non-empty, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.keys == 0 {
            return Err(EngineError::InvalidDataset(
                "keys must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Keyed random matrix shared by every operation of a run
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    cols: usize,
    keys: usize,
}

impl Dataset {
    /// Generate a reproducible random matrix
    pub fn generate(config: &DatasetConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let records = (0..config.rows)
            .map(|i| Record {
                key: (i % config.keys) as u64,
                values: (0..config.cols).map(|_| rng.r#gen::<f64>()).collect(),
            })
            .collect();

        tracing::debug!(
            rows = config.rows,
            cols = config.cols,
            keys = config.keys,
            seed = config.seed,
            "generated dataset"
        );

        Ok(Self {
            records,
            cols: config.cols,
            keys: config.keys,
        })
    }

    /// Build a dataset from explicit rows, keyed by `row_index % keys`.
    ///
    /// All rows must have the same length. An empty row list is allowed.
    pub fn from_rows(rows: Vec<Vec<f64>>, keys: usize) -> Result<Self, EngineError> {
        if keys == 0 {
            return Err(EngineError::InvalidDataset(
                "keys must be at least 1".to_string(),
            ));
        }
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
            return Err(EngineError::InvalidDataset(format!(
                "row {} has {} columns, expected {}",
                bad,
                rows[bad].len(),
                cols
            )));
        }

        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, values)| Record {
                key: (i % keys) as u64,
                values,
            })
            .collect();

        Ok(Self {
            records,
            cols,
            keys,
        })
    }

    /// All rows
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.records.len()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of distinct keys requested
    pub fn keys(&self) -> usize {
        self.keys
    }

    /// Total number of matrix cells
    pub fn cell_count(&self) -> usize {
        self.records.len() * self.cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> DatasetConfig {
        DatasetConfig {
            rows: 50,
            cols: 8,
            keys: 7,
            seed: 7,
        }
    }

    #[test]
    fn test_shape_and_range() {
        let data = Dataset::generate(&small()).unwrap();
        assert_eq!(data.rows(), 50);
        assert_eq!(data.cols(), 8);
        assert_eq!(data.cell_count(), 400);
        assert!(
            data.records()
                .iter()
                .flat_map(|r| r.values.iter())
                .all(|v| (0.0..1.0).contains(v))
        );
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = Dataset::generate(&small()).unwrap();
        let b = Dataset::generate(&small()).unwrap();
        assert_eq!(a.records(), b.records());

        let c = Dataset::generate(&DatasetConfig { seed: 8, ..small() }).unwrap();
        assert_ne!(a.records(), c.records());
    }

    #[test]
    fn test_keys_cycle() {
        let data = Dataset::generate(&small()).unwrap();
        assert_eq!(data.records()[0].key, 0);
        assert_eq!(data.records()[6].key, 6);
        assert_eq!(data.records()[7].key, 0);
    }

    #[test]
    fn test_rejects_empty_shape() {
        let config = DatasetConfig { rows: 0, ..small() };
        assert!(matches!(
            Dataset::generate(&config),
            Err(EngineError::InvalidDataset(_))
        ));
        let config = DatasetConfig { keys: 0, ..small() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            Dataset::from_rows(rows, 2),
            Err(EngineError::InvalidDataset(_))
        ));
    }

    #[test]
    fn test_record_total() {
        let data = Dataset::from_rows(vec![vec![1.0, 2.5], vec![0.5, 0.5]], 1).unwrap();
        assert_eq!(data.records()[0].total(), 3.5);
        assert_eq!(data.records()[1].key, 0);
    }
}
