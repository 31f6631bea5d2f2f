use std::collections::{HashMap, HashSet};
use tracing::trace;
use crate::grid::cell::CellKey;
use crate::grid::selection::Selection;

/// Run-column hover highlight.
///
/// Cells register under their run id when they appear and deregister when
/// they go away; a broadcast walks this index instead of any rendered tree.
/// Highlight is a per-run flag, not a counter: entering twice is one
/// highlight and a single leave clears it.
#[derive(Debug, Default)]
pub struct HoverBroadcaster {
    // Map<RunId, Cells>
    registry: HashMap<String, HashSet<CellKey>>,
    highlighted: HashSet<String>,
}

impl HoverBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, cell: CellKey) {
        self.registry.entry(cell.run_id.clone()).or_default().insert(cell);
    }

    pub fn deregister(&mut self, cell: &CellKey) {
        if let Some(cells) = self.registry.get_mut(&cell.run_id) {
            cells.remove(cell);
            if cells.is_empty() {
                self.registry.remove(&cell.run_id);
            }
        }
    }

    /// Replaces the registry with exactly `cells`. Highlights for runs that
    /// no longer have any cell are dropped.
    pub fn sync<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = CellKey>,
    {
        self.registry.clear();
        for cell in cells {
            self.register(cell);
        }
        let registry = &self.registry;
        self.highlighted.retain(|run_id| registry.contains_key(run_id));
    }

    /// Highlights every cell of `run_id`, unless that run is the selected one.
    /// Returns whether a highlight is now applied for the run.
    pub fn enter_run(&mut self, run_id: &str, selection: &Selection) -> bool {
        if selection.run_id() == Some(run_id) {
            trace!(run_id, "Hover suppressed on selected run");
            return false;
        }
        if self.highlighted.insert(run_id.to_string()) {
            trace!(run_id, cells = self.cells(run_id).count(), "Hover highlight applied");
        }
        true
    }

    /// Removes the run's highlight; a leave without an enter is ignored.
    pub fn leave_run(&mut self, run_id: &str) {
        if self.highlighted.remove(run_id) {
            trace!(run_id, "Hover highlight removed");
        }
    }

    pub fn is_run_highlighted(&self, run_id: &str) -> bool {
        self.highlighted.contains(run_id)
    }

    /// Only registered cells carry the highlight.
    pub fn is_highlighted(&self, cell: &CellKey) -> bool {
        self.is_run_highlighted(&cell.run_id)
            && self.registry.get(&cell.run_id).is_some_and(|c| c.contains(cell))
    }

    pub fn cells<'a>(&'a self, run_id: &str) -> impl Iterator<Item = &'a CellKey> + use<'a> {
        self.registry.get(run_id).into_iter().flatten()
    }

    pub fn highlighted_cells(&self) -> impl Iterator<Item = &CellKey> {
        self.highlighted
            .iter()
            .filter_map(|run_id| self.registry.get(run_id))
            .flatten()
    }
}
