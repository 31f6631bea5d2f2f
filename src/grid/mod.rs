pub mod axis;
pub mod cell;
pub mod details;
pub mod expansion;
pub mod hover;
pub mod selection;
pub mod tree;

use std::sync::Arc;
use anyhow::Result;
use tracing::{debug, error, info};
use crate::error::GridError;
use crate::model::{Snapshot, TaskNode};
use crate::store::GroupExpansionStore;
use self::axis::{Cell, RunAxis};
use self::cell::{CellKey, CellStyle, StatusCell};
use self::details::{breadcrumbs, Breadcrumb, Details};
use self::expansion::OpenGroups;
use self::hover::HoverBroadcaster;
use self::selection::{Selection, SelectionController};
use self::tree::{Row, TaskTree};

/// State of one workflow's grid: expansion, data, selection and hover.
///
/// Driven from a single event loop. Every mutation goes through `&mut self`,
/// so toggles on the same grid are serialized and their effect on visibility
/// is in place before the next call reads rows.
pub struct TreeGrid {
    workflow_id: String,
    store: Arc<dyn GroupExpansionStore>,
    open_groups: OpenGroups,
    snapshot: Snapshot,
    axis: RunAxis,
    selection: SelectionController,
    hover: HoverBroadcaster,
    auto_refresh: bool,
}

impl TreeGrid {
    /// Reads the workflow's expansion record once. A missing or unreadable
    /// record leaves every group closed.
    pub async fn mount(workflow_id: &str, store: Arc<dyn GroupExpansionStore>) -> Self {
        let open_groups = OpenGroups::load(store.as_ref(), workflow_id).await;
        info!(workflow_id, store = store.name(), open = open_groups.len(), "Grid mounted");
        Self {
            workflow_id: workflow_id.to_string(),
            store,
            open_groups,
            snapshot: Snapshot::default(),
            axis: RunAxis::default(),
            selection: SelectionController::new(),
            hover: HoverBroadcaster::new(),
            auto_refresh: true,
        }
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    /// Re-reads the expansion record, picking up writes made by other grids
    /// on the same workflow. Keeps the current view if the store fails.
    pub async fn reload_expansion(&mut self) {
        match self.store.open_groups(&self.workflow_id).await {
            Ok(groups) => {
                self.open_groups = OpenGroups::new(groups.unwrap_or_default());
                self.sync_hover_registry();
            }
            Err(e) => {
                error!(workflow_id = %self.workflow_id, error = %e, "Failed to reload open groups");
            }
        }
    }

    /// Swaps in a new data snapshot wholesale.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.axis = RunAxis::from_runs(&snapshot.dag_runs);
        self.snapshot = snapshot;
        self.sync_hover_registry();
        debug!(workflow_id = %self.workflow_id, runs = self.axis.len(), "Snapshot applied");
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn axis(&self) -> &RunAxis {
        &self.axis
    }

    pub fn open_groups(&self) -> &OpenGroups {
        &self.open_groups
    }

    pub fn tree(&self) -> TaskTree<'_> {
        TaskTree::new(&self.snapshot.groups, &self.open_groups)
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.tree().rows()
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.tree().visible_rows()
    }

    /// The run-axis join for one task.
    pub fn cells(&self, task_id: &str) -> Result<Vec<Cell<'_>>> {
        let task = self.find_task(task_id)?;
        Ok(self.axis.join(&task.instances))
    }

    /// Joined cells with their style hints resolved.
    pub fn status_cells(&self, task_id: &str) -> Result<Vec<StatusCell<'_>>> {
        let task = self.find_task(task_id)?;
        let cells = self
            .axis
            .join(&task.instances)
            .into_iter()
            .map(|cell| {
                let key = CellKey::new(cell.run_id(), &task.id);
                let style = CellStyle::resolve(&key, self.selection.current(), &self.hover);
                StatusCell {
                    key,
                    cell,
                    style,
                    is_group: task.is_group(),
                }
            })
            .collect();
        Ok(cells)
    }

    /// Flips a group's open state and persists it. Visibility changes
    /// immediately; a failed write is logged and the in-process state kept.
    /// Returns the new open state.
    pub async fn toggle_group(&mut self, group_id: &str) -> bool {
        let open = self.open_groups.toggle(group_id);
        self.sync_hover_registry();
        debug!(workflow_id = %self.workflow_id, group_id, open, "Group toggled");

        if let Err(e) = self.store.set_open(&self.workflow_id, group_id, open).await {
            error!(workflow_id = %self.workflow_id, group_id, store = self.store.name(), error = %e, "Failed to persist group state");
        }
        open
    }

    pub fn is_group_open(&self, group_id: &str) -> bool {
        self.open_groups.is_open(group_id)
    }

    pub fn selection(&self) -> &Selection {
        self.selection.current()
    }

    pub fn select(&mut self, candidate: Selection) -> &Selection {
        self.selection.select(candidate)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Click on a status cell: drop the run's hover highlight first so the
    /// two styles never stack, then toggle the selection.
    pub fn click_cell(&mut self, run_id: &str, task_id: &str) -> &Selection {
        self.hover.leave_run(run_id);
        self.selection.select(Selection::instance(run_id, task_id))
    }

    /// Click on a run column header.
    pub fn click_run(&mut self, run_id: &str) -> &Selection {
        self.hover.leave_run(run_id);
        self.selection.select(Selection::run(run_id))
    }

    pub fn enter_run(&mut self, run_id: &str) -> bool {
        self.hover.enter_run(run_id, self.selection.current())
    }

    pub fn leave_run(&mut self, run_id: &str) {
        self.hover.leave_run(run_id);
    }

    pub fn hover(&self) -> &HoverBroadcaster {
        &self.hover
    }

    pub fn cell_style(&self, run_id: &str, task_id: &str) -> CellStyle {
        CellStyle::resolve(&CellKey::new(run_id, task_id), self.selection.current(), &self.hover)
    }

    pub fn is_row_selected(&self, task_id: &str) -> bool {
        self.selection.is_row_selected(task_id)
    }

    /// The polling layer reads this flag; the grid only owns it.
    pub fn toggle_auto_refresh(&mut self) -> bool {
        self.auto_refresh = !self.auto_refresh;
        info!(workflow_id = %self.workflow_id, auto_refresh = self.auto_refresh, "Auto-refresh toggled");
        self.auto_refresh
    }

    pub fn set_auto_refresh(&mut self, on: bool) {
        self.auto_refresh = on;
    }

    pub fn is_auto_refresh_on(&self) -> bool {
        self.auto_refresh
    }

    pub fn details(&self) -> Details<'_> {
        Details::resolve(&self.workflow_id, self.selection.current(), &self.snapshot)
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        breadcrumbs(&self.workflow_id, self.selection.current(), &self.snapshot)
    }

    fn find_task(&self, task_id: &str) -> Result<&TaskNode> {
        self.snapshot
            .groups
            .find(task_id)
            .ok_or_else(|| GridError::UnknownTask(task_id.to_string()).into())
    }

    // Cells are "mounted" while their row is visible.
    fn sync_hover_registry(&mut self) {
        let tree = TaskTree::new(&self.snapshot.groups, &self.open_groups);
        let run_ids = self.axis.run_ids();
        let cells: Vec<CellKey> = tree
            .visible_rows()
            .flat_map(|row| run_ids.iter().map(move |run_id| CellKey::new(run_id, row.task_id())))
            .collect();
        self.hover.sync(cells);
    }
}
