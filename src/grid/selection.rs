use tracing::debug;

/// What the details panel is focused on.
///
/// Three addressable states: nothing (the workflow itself), a whole run, or a
/// single task within a run. A group header selected in a run column is an
/// `Instance` whose `task_id` is the group id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    #[default]
    Empty,
    Run { run_id: String },
    Instance { run_id: String, task_id: String },
}

impl Selection {
    pub fn run(run_id: &str) -> Self {
        Selection::Run {
            run_id: run_id.to_string(),
        }
    }

    pub fn instance(run_id: &str, task_id: &str) -> Self {
        Selection::Instance {
            run_id: run_id.to_string(),
            task_id: task_id.to_string(),
        }
    }

    /// A run selection, narrowed to one task when `task_id` is given.
    pub fn from_ids(run_id: &str, task_id: Option<&str>) -> Self {
        match task_id {
            Some(task_id) => Self::instance(run_id, task_id),
            None => Self::run(run_id),
        }
    }

    pub fn run_id(&self) -> Option<&str> {
        match self {
            Selection::Empty => None,
            Selection::Run { run_id } | Selection::Instance { run_id, .. } => Some(run_id.as_str()),
        }
    }

    pub fn task_id(&self) -> Option<&str> {
        match self {
            Selection::Instance { task_id, .. } => Some(task_id.as_str()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Empty)
    }
}

/// Sole owner and writer of the current [`Selection`].
#[derive(Debug, Default)]
pub struct SelectionController {
    current: Selection,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Selection {
        &self.current
    }

    /// Selecting the current value again clears it; anything else replaces
    /// the previous selection outright.
    pub fn select(&mut self, candidate: Selection) -> &Selection {
        if self.current == candidate {
            debug!(selection = ?self.current, "Selection toggled off");
            self.current = Selection::Empty;
        } else {
            debug!(selection = ?candidate, "Selection changed");
            self.current = candidate;
        }
        &self.current
    }

    pub fn clear(&mut self) {
        self.current = Selection::Empty;
    }

    /// Exact (run, task) match.
    pub fn is_selected(&self, run_id: &str, task_id: &str) -> bool {
        self.current.run_id() == Some(run_id) && self.current.task_id() == Some(task_id)
    }

    /// Row-level highlight: the selected task, in whichever run.
    pub fn is_row_selected(&self, task_id: &str) -> bool {
        self.current.task_id() == Some(task_id)
    }
}
