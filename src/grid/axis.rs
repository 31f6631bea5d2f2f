use std::collections::HashMap;
use crate::model::{Instance, RunSummary, TaskState};

/// Ordered run ids forming the grid's columns. Order is the caller's and is
/// never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunAxis {
    run_ids: Vec<String>,
}

impl RunAxis {
    pub fn new(run_ids: Vec<String>) -> Self {
        Self { run_ids }
    }

    pub fn from_runs(runs: &[RunSummary]) -> Self {
        Self::new(runs.iter().map(|r| r.run_id.clone()).collect())
    }

    pub fn run_ids(&self) -> &[String] {
        &self.run_ids
    }

    pub fn len(&self) -> usize {
        self.run_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.run_ids.is_empty()
    }

    pub fn contains(&self, run_id: &str) -> bool {
        self.run_ids.iter().any(|r| r == run_id)
    }

    /// Left-joins a task's sparse instances onto the axis: exactly one cell
    /// per run, in axis order. Instances for runs outside the axis are dropped.
    pub fn join<'a>(&'a self, instances: &'a [Instance]) -> Vec<Cell<'a>> {
        let mut by_run: HashMap<&str, &Instance> = HashMap::with_capacity(instances.len());
        for instance in instances {
            // First record wins if a run is duplicated.
            by_run.entry(instance.run_id.as_str()).or_insert(instance);
        }

        self.run_ids
            .iter()
            .map(|run_id| match by_run.get(run_id.as_str()) {
                Some(&instance) => Cell::Instance(instance),
                None => Cell::Empty { run_id },
            })
            .collect()
    }
}

/// One slot of a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Instance(&'a Instance),
    /// The task did not run in this run.
    Empty { run_id: &'a str },
}

impl<'a> Cell<'a> {
    pub fn run_id(&self) -> &'a str {
        match *self {
            Cell::Instance(i) => &i.run_id,
            Cell::Empty { run_id } => run_id,
        }
    }

    pub fn instance(&self) -> Option<&'a Instance> {
        match *self {
            Cell::Instance(i) => Some(i),
            Cell::Empty { .. } => None,
        }
    }

    pub fn state(&self) -> Option<&'a TaskState> {
        self.instance().and_then(|i| i.state.as_ref())
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Cell::Empty { .. })
    }
}
