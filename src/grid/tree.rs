use std::slice;
use crate::grid::expansion::OpenGroups;
use crate::model::TaskNode;

/// One row of the grid, emitted for every node whether or not it is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    pub task: &'a TaskNode,
    /// Name relative to the parent group, with the mapped marker applied.
    pub label: String,
    /// Depth below the root; drives indentation.
    pub level: usize,
    pub is_group: bool,
    /// Own open state. Always false for leaves.
    pub is_open: bool,
    /// True when every ancestor group is open.
    pub visible: bool,
}

impl Row<'_> {
    pub fn task_id(&self) -> &str {
        &self.task.id
    }
}

/// Walks a task hierarchy against an expansion snapshot.
///
/// Holds only borrows, so a fresh walk per render pass is cheap and always
/// reflects the current open state.
#[derive(Debug, Clone, Copy)]
pub struct TaskTree<'a> {
    root: &'a TaskNode,
    open: &'a OpenGroups,
}

impl<'a> TaskTree<'a> {
    pub fn new(root: &'a TaskNode, open: &'a OpenGroups) -> Self {
        Self { root, open }
    }

    /// Pre-order rows for every descendant of the root. The root itself is
    /// not a row; its children sit at level 0.
    pub fn rows(&self) -> RowIter<'a> {
        RowIter {
            open: self.open,
            stack: vec![Frame {
                parent_id: &self.root.id,
                children: self.root.children().iter(),
                level: 0,
                visible: true,
            }],
        }
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = Row<'a>> + use<'a> {
        self.rows().filter(|r| r.visible)
    }
}

struct Frame<'a> {
    parent_id: &'a str,
    children: slice::Iter<'a, TaskNode>,
    level: usize,
    // Whether rows in this frame are visible.
    visible: bool,
}

/// Lazy pre-order iterator over [`Row`]s, driven by an explicit stack.
pub struct RowIter<'a> {
    open: &'a OpenGroups,
    stack: Vec<Frame<'a>>,
}

impl<'a> Iterator for RowIter<'a> {
    type Item = Row<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some(task) = frame.children.next() else {
                self.stack.pop();
                continue;
            };

            let level = frame.level;
            let visible = frame.visible;
            let label = task.label(frame.parent_id);
            let is_group = task.is_group();
            let is_open = is_group && self.open.is_open(&task.id);

            if is_group {
                self.stack.push(Frame {
                    parent_id: &task.id,
                    children: task.children().iter(),
                    level: level + 1,
                    visible: visible && is_open,
                });
            }

            return Some(Row {
                task,
                label,
                level,
                is_group,
                is_open,
                visible,
            });
        }
    }
}
