//! Run Planner
//!
//! Builds the execution plan by filtering operations and choosing backends.
//!
//! Filtering options:
//! - Regex pattern matching on operation name
//! - Regex exclusion (`--skip`)
//!
//! Ordering: operations keep their declaration order so every report lists
//! them the same way; backends run baseline first.

use collbench_engine::{BackendKind, Operation};
use regex::Regex;

/// Which backends a run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BackendChoice {
    /// Sequential local collection only
    Local,
    /// Partitioned dataflow collection only
    Dataflow,
    /// Both, with a comparison per operation
    #[default]
    Both,
}

impl BackendChoice {
    /// Backends to run, baseline first
    pub fn backends(self) -> Vec<BackendKind> {
        match self {
            BackendChoice::Local => vec![BackendKind::Local],
            BackendChoice::Dataflow => vec![BackendKind::Dataflow],
            BackendChoice::Both => BackendKind::ALL.to_vec(),
        }
    }
}

/// Execution plan for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// Operations to time, in report order
    pub operations: Vec<Operation>,
    /// Backends to time them on
    pub backends: Vec<BackendKind>,
}

impl ExecutionPlan {
    /// Whether there is nothing to run
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty() || self.backends.is_empty()
    }

    /// Number of timed operation/backend pairs
    pub fn len(&self) -> usize {
        self.operations.len() * self.backends.len()
    }
}

/// Build the execution plan from the operation set and CLI selections
pub fn build_plan(
    operations: impl IntoIterator<Item = Operation>,
    filter: Option<&Regex>,
    skip: Option<&Regex>,
    backends: BackendChoice,
) -> ExecutionPlan {
    let operations = operations
        .into_iter()
        .filter(|op| {
            // Apply regex filter on operation name
            if let Some(re) = filter {
                if !re.is_match(op.name()) {
                    return false;
                }
            }

            // Apply exclusion filter
            if let Some(re) = skip {
                if re.is_match(op.name()) {
                    return false;
                }
            }

            true
        })
        .collect();

    ExecutionPlan {
        operations,
        backends: backends.backends(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filter() {
        let plan = build_plan(Operation::ALL, None, None, BackendChoice::Both);

        assert_eq!(plan.operations, Operation::ALL.to_vec());
        assert_eq!(plan.backends, vec![BackendKind::Local, BackendKind::Dataflow]);
        assert_eq!(plan.len(), 14);
    }

    #[test]
    fn test_regex_filter() {
        let re = Regex::new("by_key$").unwrap();
        let plan = build_plan(Operation::ALL, Some(&re), None, BackendChoice::Local);

        assert_eq!(
            plan.operations,
            vec![Operation::ReduceByKey, Operation::GroupByKey]
        );
        assert_eq!(plan.backends, vec![BackendKind::Local]);
    }

    #[test]
    fn test_skip_filter() {
        let skip = Regex::new("^(collect|map)$").unwrap();
        let plan = build_plan(Operation::ALL, None, Some(&skip), BackendChoice::Dataflow);

        assert_eq!(plan.operations.len(), 5);
        assert!(!plan.operations.contains(&Operation::Collect));
        assert!(!plan.operations.contains(&Operation::Map));
    }

    #[test]
    fn test_nothing_matches() {
        let re = Regex::new("average").unwrap();
        let plan = build_plan(Operation::ALL, Some(&re), None, BackendChoice::Both);
        assert!(plan.is_empty());
    }
}
