//! Operation Registry
//!
//! Named, one-argument operations that all act on the same input object.
//! The registry is filled once during setup and only read afterwards.

use crate::error::{HarnessError, OperationError};
use crate::harness::Harness;
use crate::result::{BenchmarkResults, Timing};
use std::collections::BTreeMap;
use tracing::info;

type BoxedOperation<I> = Box<dyn Fn(&I) -> Result<(), OperationError> + Send + Sync>;

/// Mapping from operation name to the callable that performs it.
pub struct OperationRegistry<I: ?Sized> {
    operations: BTreeMap<String, BoxedOperation<I>>,
}

impl<I: ?Sized> Default for OperationRegistry<I> {
    fn default() -> Self {
        Self {
            operations: BTreeMap::new(),
        }
    }
}

impl<I: ?Sized> std::fmt::Debug for OperationRegistry<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("operations", &self.operations.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<I: ?Sized> OperationRegistry<I> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operation under a unique name.
    ///
    /// The operation's output is discarded through `black_box` after each
    /// call so the work that produced it is still performed.
    pub fn register<T, E, F>(&mut self, name: impl Into<String>, op: F) -> Result<(), HarnessError>
    where
        F: Fn(&I) -> Result<T, E> + Send + Sync + 'static,
        E: Into<OperationError>,
    {
        let name = name.into();
        if self.operations.contains_key(&name) {
            return Err(HarnessError::DuplicateOperation(name));
        }

        let boxed: BoxedOperation<I> = Box::new(move |input: &I| match op(input) {
            Ok(output) => {
                std::hint::black_box(output);
                Ok(())
            }
            Err(e) => Err(e.into()),
        });
        self.operations.insert(name, boxed);
        Ok(())
    }

    /// Registered names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    /// Whether an operation is registered
    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Number of registered operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Time one registered operation
    pub fn time(&self, name: &str, input: &I, harness: &Harness) -> Result<Timing, HarnessError> {
        let op = self.lookup(name)?;
        let timing = harness.measure_with(name, input, |i| op(i))?;
        info!(operation = name, best_ms = timing.best_ms, "timed");
        Ok(timing)
    }

    /// Time every registered operation, stopping at the first failure.
    pub fn time_all(&self, input: &I, harness: &Harness) -> Result<BenchmarkResults, HarnessError> {
        self.time_each(input, harness)
            .map(|(name, timing)| timing.map(|t| (name.to_string(), t)))
            .collect()
    }

    /// Time every registered operation, yielding each outcome separately.
    ///
    /// Operations run lazily, one per `next()`, so the caller decides whether
    /// a failure ends the run or is skipped.
    pub fn time_each<'a>(
        &'a self,
        input: &'a I,
        harness: &'a Harness,
    ) -> impl Iterator<Item = (&'a str, Result<Timing, HarnessError>)> + 'a {
        self.operations.keys().map(move |name| {
            let name = name.as_str();
            (name, self.time(name, input, harness))
        })
    }

    fn lookup(&self, name: &str) -> Result<&BoxedOperation<I>, HarnessError> {
        self.operations
            .get(name)
            .ok_or_else(|| HarnessError::UnknownOperation(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::HarnessConfig;
    use std::convert::Infallible;

    fn sample_registry() -> OperationRegistry<Vec<u64>> {
        let mut registry = OperationRegistry::new();
        registry
            .register("sum", |v: &Vec<u64>| Ok::<_, Infallible>(v.iter().sum::<u64>()))
            .unwrap();
        registry
            .register("max", |v: &Vec<u64>| {
                v.iter().copied().max().ok_or("empty collection")
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut registry = sample_registry();
        let err = registry
            .register("sum", |_: &Vec<u64>| Ok::<_, Infallible>(()))
            .unwrap_err();
        assert!(matches!(err, HarnessError::DuplicateOperation(name) if name == "sum"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_names_sorted() {
        let registry = sample_registry();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["max", "sum"]);
        assert!(registry.contains("sum"));
        assert!(!registry.contains("filter"));
    }

    #[test]
    fn test_time_all_covers_every_operation() {
        let registry = sample_registry();
        let data: Vec<u64> = (0..10_000).collect();
        let harness = Harness::default();

        let results = registry.time_all(&data, &harness).unwrap();
        assert_eq!(results.len(), 2);
        for (_, timing) in results.iter() {
            assert!(timing.best_ms >= 0.0);
        }
    }

    #[test]
    fn test_time_unknown_operation() {
        let registry = sample_registry();
        let harness = Harness::default();
        assert!(matches!(
            registry.time("collect", &vec![1], &harness),
            Err(HarnessError::UnknownOperation(_))
        ));
    }

    #[test]
    fn test_time_all_propagates_failure() {
        let registry = sample_registry();
        let empty: Vec<u64> = Vec::new();
        let harness = Harness::new(HarnessConfig::new(2, 2).unwrap()).unwrap();

        let err = registry.time_all(&empty, &harness).unwrap_err();
        assert_eq!(err.operation_name(), Some("max"));
    }

    #[test]
    fn test_time_each_keeps_going_after_failure() {
        let registry = sample_registry();
        let empty: Vec<u64> = Vec::new();
        let harness = Harness::default();

        let outcomes: Vec<_> = registry.time_each(&empty, &harness).collect();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].1.is_err()); // max
        assert!(outcomes[1].1.is_ok()); // sum
    }
}
