//! collbench Library Example
//!
//! Times both backends through the library API instead of the CLI, then
//! registers a few extra operations on the local collection.
//!
//! Run with:
//!   cargo run --example benchmarks

use collbench::prelude::*;
use collbench::{BenchmarkResults, EngineError, LocalCollection, Record, compare_backends};
use std::convert::Infallible;
use std::sync::Arc;

fn time_backend<B: Backend>(
    backend: B,
    dataset: &Dataset,
    harness: &Harness,
) -> anyhow::Result<BenchmarkResults> {
    let backend = Arc::new(backend);
    let input = backend.load(dataset)?;
    Ok(registry_for(backend)?.time_all(&input, harness)?)
}

fn main() -> anyhow::Result<()> {
    let dataset = Dataset::generate(&DatasetConfig {
        rows: 2_000,
        cols: 50,
        keys: 20,
        seed: 7,
    })?;
    let harness = Harness::new(HarnessConfig::new(5, 3)?)?;

    let local = time_backend(LocalBackend::new(), &dataset, &harness)?;
    let dataflow = time_backend(
        DataflowBackend::new(&DataflowConfig {
            partitions: 4,
            threads: 0,
        })?,
        &dataset,
        &harness,
    )?;

    println!("{:<16} {:>12} {:>12} {:>9}", "operation", "local", "dataflow", "speedup");
    for op in Operation::ALL {
        let (Some(l), Some(d)) = (local.best_ms(op.name()), dataflow.best_ms(op.name())) else {
            continue;
        };
        let cmp = compare_backends(l, d, 5.0)?;
        println!(
            "{:<16} {:>9.4} ms {:>9.4} ms {:>8.2}x",
            op.name(),
            l,
            d,
            cmp.speedup
        );
    }

    // Extra operations over the same loaded collection
    let backend = LocalBackend::new();
    let input = backend.load(&dataset)?;
    let mut registry = OperationRegistry::<LocalCollection<Record>>::new();
    registry.register("row_count", |c: &LocalCollection<Record>| {
        Ok::<_, Infallible>(c.count())
    })?;
    registry.register("min", |c: &LocalCollection<Record>| {
        c.flat_map(|r| r.values.clone())
            .aggregate(None, |acc: Option<f64>, v| Some(acc.map_or(*v, |m| m.min(*v))))
            .ok_or(EngineError::EmptyCollection { operation: "min" })
    })?;

    let extra = registry.time_all(&input, &harness)?;
    for (name, ms) in extra.durations() {
        println!("{:<16} {:>9.4} ms", name, ms);
    }

    Ok(())
}
