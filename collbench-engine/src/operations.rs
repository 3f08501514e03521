//! Benchmarked Operations
//!
//! The fixed operation set and the registry builder that binds it to a backend.

use crate::backend::{Backend, FILTER_THRESHOLD, MAP_FACTOR};
use collbench_core::{HarnessError, OperationRegistry};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// One of the benchmarked collection operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    /// Sum of every cell
    Sum,
    /// Largest cell
    Max,
    /// Count of cells above the threshold
    Filter,
    /// Scaled copy of every cell
    Map,
    /// Every row returned to the caller
    Collect,
    /// Row sums reduced per key
    ReduceByKey,
    /// Row sums grouped per key
    GroupByKey,
}

impl Operation {
    /// Every operation, in report order
    pub const ALL: [Operation; 7] = [
        Operation::Sum,
        Operation::Max,
        Operation::Filter,
        Operation::Map,
        Operation::Collect,
        Operation::ReduceByKey,
        Operation::GroupByKey,
    ];

    /// Registry name
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Sum => "sum",
            Operation::Max => "max",
            Operation::Filter => "filter",
            Operation::Map => "map",
            Operation::Collect => "collect",
            Operation::ReduceByKey => "reduce_by_key",
            Operation::GroupByKey => "group_by_key",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| HarnessError::UnknownOperation(s.to_string()))
    }
}

/// Registry of all seven operations bound to `backend`.
///
/// The registry input is the backend's loaded collection, so loading is not
/// part of any timed call.
pub fn registry_for<B: Backend>(
    backend: Arc<B>,
) -> Result<OperationRegistry<B::Collection>, HarnessError> {
    let kind = backend.kind();
    let mut registry = OperationRegistry::new();

    let b = Arc::clone(&backend);
    registry.register(Operation::Sum.name(), move |c: &B::Collection| {
        Ok::<_, Infallible>(b.sum(c))
    })?;

    let b = Arc::clone(&backend);
    registry.register(Operation::Max.name(), move |c: &B::Collection| b.max(c))?;

    let b = Arc::clone(&backend);
    registry.register(Operation::Filter.name(), move |c: &B::Collection| {
        Ok::<_, Infallible>(b.filter(c, FILTER_THRESHOLD))
    })?;

    let b = Arc::clone(&backend);
    registry.register(Operation::Map.name(), move |c: &B::Collection| {
        Ok::<_, Infallible>(b.map(c, MAP_FACTOR))
    })?;

    let b = Arc::clone(&backend);
    registry.register(Operation::Collect.name(), move |c: &B::Collection| {
        Ok::<_, Infallible>(b.collect(c))
    })?;

    let b = Arc::clone(&backend);
    registry.register(Operation::ReduceByKey.name(), move |c: &B::Collection| {
        Ok::<_, Infallible>(b.reduce_by_key(c))
    })?;

    registry.register(Operation::GroupByKey.name(), move |c: &B::Collection| {
        Ok::<_, Infallible>(backend.group_by_key(c))
    })?;

    tracing::debug!(backend = %kind, operations = registry.len(), "registry built");
    Ok(registry)
}
