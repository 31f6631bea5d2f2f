use crate::grid::selection::Selection;
use crate::model::{Instance, RunSummary, RunType, Snapshot, TaskNode};

const RUN_LABEL_FORMAT: &str = "%Y-%m-%d, %H:%M:%S UTC";

/// Which details view the current selection routes to. Lookups that miss in
/// the snapshot come back as `None` rather than errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Details<'a> {
    Workflow {
        workflow_id: &'a str,
    },
    Run {
        run_id: &'a str,
        run: Option<&'a RunSummary>,
    },
    Instance {
        run_id: &'a str,
        task_id: &'a str,
        run: Option<&'a RunSummary>,
        task: Option<&'a TaskNode>,
        instance: Option<&'a Instance>,
    },
}

impl<'a> Details<'a> {
    pub fn resolve(workflow_id: &'a str, selection: &'a Selection, snapshot: &'a Snapshot) -> Self {
        match selection {
            Selection::Empty => Details::Workflow { workflow_id },
            Selection::Run { run_id } => Details::Run {
                run_id: run_id.as_str(),
                run: snapshot.run(run_id),
            },
            Selection::Instance { run_id, task_id } => {
                let task = snapshot.groups.find(task_id);
                Details::Instance {
                    run_id: run_id.as_str(),
                    task_id: task_id.as_str(),
                    run: snapshot.run(run_id),
                    task,
                    instance: task.and_then(|t| t.instance(run_id)),
                }
            }
        }
    }
}

/// One breadcrumb of the details header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: &'static str,
    pub value: String,
    pub is_current: bool,
    /// Selection to apply when the crumb is clicked; `None` for the current task crumb.
    pub target: Option<Selection>,
}

/// Workflow, then run, then task: the last crumb present is the current page.
pub fn breadcrumbs(workflow_id: &str, selection: &Selection, snapshot: &Snapshot) -> Vec<Breadcrumb> {
    let run_id = selection.run_id();
    let task_id = selection.task_id();

    let mut crumbs = vec![Breadcrumb {
        label: "DAG",
        value: workflow_id.to_string(),
        is_current: run_id.is_none() && task_id.is_none(),
        target: Some(Selection::Empty),
    }];

    if let Some(run_id) = run_id {
        crumbs.push(Breadcrumb {
            label: "Run",
            value: run_label(snapshot.run(run_id)),
            is_current: task_id.is_none(),
            target: Some(Selection::run(run_id)),
        });
    }

    if let Some(task_id) = task_id {
        crumbs.push(Breadcrumb {
            label: "Task",
            value: task_id.to_string(),
            is_current: true,
            target: None,
        });
    }

    crumbs
}

/// Data-interval end of the run, `▶`-prefixed for manual runs. Empty when
/// the run is unknown.
pub fn run_label(run: Option<&RunSummary>) -> String {
    let Some(run) = run else {
        return String::new();
    };
    let when = run
        .data_interval_end
        .map(|end| end.format(RUN_LABEL_FORMAT).to_string())
        .unwrap_or_default();
    if run.run_type == RunType::Manual {
        format!("▶ {}", when)
    } else {
        when
    }
}
