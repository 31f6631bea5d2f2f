use crate::grid::axis::Cell;
use crate::grid::hover::HoverBroadcaster;
use crate::grid::selection::Selection;
use crate::model::TaskState;

/// Identity of a grid cell: one task in one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub run_id: String,
    pub task_id: String,
}

impl CellKey {
    pub fn new(run_id: &str, task_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            task_id: task_id.to_string(),
        }
    }
}

/// Style hint for the rendering layer. Selection wins over hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStyle {
    Selected,
    Hovered,
    #[default]
    Default,
}

impl CellStyle {
    pub fn resolve(key: &CellKey, selection: &Selection, hover: &HoverBroadcaster) -> Self {
        let selected = match selection {
            Selection::Empty => false,
            Selection::Run { run_id } => *run_id == key.run_id,
            Selection::Instance { run_id, task_id } => *run_id == key.run_id && *task_id == key.task_id,
        };

        if selected {
            CellStyle::Selected
        } else if hover.is_highlighted(key) {
            CellStyle::Hovered
        } else {
            CellStyle::Default
        }
    }
}

/// Everything the rendering layer needs for one status indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusCell<'a> {
    pub key: CellKey,
    pub cell: Cell<'a>,
    pub style: CellStyle,
    /// Cell sits on a group row.
    pub is_group: bool,
}

impl<'a> StatusCell<'a> {
    pub fn state(&self) -> Option<&'a TaskState> {
        self.cell.state()
    }

    pub fn is_placeholder(&self) -> bool {
        self.cell.is_placeholder()
    }
}
