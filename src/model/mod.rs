pub mod builder;
pub mod loader;

use std::fmt;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One polled data snapshot: the task hierarchy plus the ordered run axis.
/// Replaced wholesale on every refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub groups: TaskNode,
    #[serde(default)]
    pub dag_runs: Vec<RunSummary>,
}

impl Snapshot {
    pub fn new(groups: TaskNode, dag_runs: Vec<RunSummary>) -> Self {
        Self { groups, dag_runs }
    }

    /// Run ids in caller-supplied order.
    pub fn run_ids(&self) -> Vec<String> {
        self.dag_runs.iter().map(|r| r.run_id.clone()).collect()
    }

    pub fn run(&self, run_id: &str) -> Option<&RunSummary> {
        self.dag_runs.iter().find(|r| r.run_id == run_id)
    }
}

/// A node of the task hierarchy.
///
/// `children` being present (even empty) marks a group; absent marks a leaf task.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskNode {
    #[serde(default, deserialize_with = "nullable_string")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TaskNode>>,
    #[serde(default)]
    pub is_mapped: bool,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

impl TaskNode {
    pub fn is_group(&self) -> bool {
        self.children.is_some()
    }

    pub fn children(&self) -> &[TaskNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Row label relative to the parent: `"B.1"` under `"B"` becomes `"1"`.
    pub fn label(&self, parent_id: &str) -> String {
        let name = if parent_id.is_empty() {
            self.id.as_str()
        } else {
            self.id
                .strip_prefix(parent_id)
                .and_then(|rest| rest.strip_prefix('.'))
                .unwrap_or(&self.id)
        };
        if self.is_mapped {
            format!("{} [ ]", name)
        } else {
            name.to_string()
        }
    }

    /// Depth-first lookup by id, the receiver included.
    pub fn find(&self, id: &str) -> Option<&TaskNode> {
        if self.id == id {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(id))
    }

    pub fn instance(&self, run_id: &str) -> Option<&Instance> {
        self.instances.iter().find(|i| i.run_id == run_id)
    }
}

/// One task's execution record within one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub run_id: String,
    pub task_id: String,
    #[serde(default)]
    pub state: Option<TaskState>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub try_number: Option<u32>,
    /// Scheduling metadata the grid never interprets.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Instance {
    pub fn new(run_id: &str, task_id: &str, state: Option<TaskState>) -> Self {
        Self {
            run_id: run_id.to_string(),
            task_id: task_id.to_string(),
            state,
            start_date: None,
            end_date: None,
            try_number: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskState {
    Success,
    Failed,
    Running,
    Queued,
    Scheduled,
    UpForRetry,
    UpForReschedule,
    UpstreamFailed,
    Skipped,
    Removed,
    Deferred,
    NoStatus,
    Other(String),
}

impl TaskState {
    pub fn as_str(&self) -> &str {
        match self {
            TaskState::Success => "success",
            TaskState::Failed => "failed",
            TaskState::Running => "running",
            TaskState::Queued => "queued",
            TaskState::Scheduled => "scheduled",
            TaskState::UpForRetry => "up_for_retry",
            TaskState::UpForReschedule => "up_for_reschedule",
            TaskState::UpstreamFailed => "upstream_failed",
            TaskState::Skipped => "skipped",
            TaskState::Removed => "removed",
            TaskState::Deferred => "deferred",
            TaskState::NoStatus => "no_status",
            TaskState::Other(s) => s,
        }
    }
}

impl From<String> for TaskState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "success" => TaskState::Success,
            "failed" => TaskState::Failed,
            "running" => TaskState::Running,
            "queued" => TaskState::Queued,
            "scheduled" => TaskState::Scheduled,
            "up_for_retry" => TaskState::UpForRetry,
            "up_for_reschedule" => TaskState::UpForReschedule,
            "upstream_failed" => TaskState::UpstreamFailed,
            "skipped" => TaskState::Skipped,
            "removed" => TaskState::Removed,
            "deferred" => TaskState::Deferred,
            "no_status" | "none" => TaskState::NoStatus,
            _ => TaskState::Other(s),
        }
    }
}

impl From<TaskState> for String {
    fn from(state: TaskState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column header data for one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: String,
    #[serde(default)]
    pub data_interval_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data_interval_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub run_type: RunType,
    #[serde(default)]
    pub state: Option<TaskState>,
}

impl RunSummary {
    pub fn new(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            data_interval_start: None,
            data_interval_end: None,
            start_date: None,
            end_date: None,
            run_type: RunType::default(),
            state: None,
        }
    }

    pub fn with_run_type(mut self, run_type: RunType) -> Self {
        self.run_type = run_type;
        self
    }

    pub fn with_state(mut self, state: TaskState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_data_interval_end(mut self, end: DateTime<Utc>) -> Self {
        self.data_interval_end = Some(end);
        self
    }

    /// `None` until the run has both a start and an end.
    pub fn duration(&self) -> Option<Duration> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(end.signed_duration_since(start)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunType {
    Manual,
    #[default]
    Scheduled,
    Backfill,
    DatasetTriggered,
    Other(String),
}

impl From<String> for RunType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "manual" => RunType::Manual,
            "scheduled" => RunType::Scheduled,
            "backfill" => RunType::Backfill,
            "dataset_triggered" => RunType::DatasetTriggered,
            _ => RunType::Other(s),
        }
    }
}

impl From<RunType> for String {
    fn from(run_type: RunType) -> Self {
        match run_type {
            RunType::Manual => "manual".to_string(),
            RunType::Scheduled => "scheduled".to_string(),
            RunType::Backfill => "backfill".to_string(),
            RunType::DatasetTriggered => "dataset_triggered".to_string(),
            RunType::Other(s) => s,
        }
    }
}

// The root group arrives with `"id": null`.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
