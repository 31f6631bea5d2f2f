use crate::model::{Instance, TaskNode, TaskState};

/// Fluent construction of task hierarchies, mainly for tests and demos.
///
/// ```
/// use taskgrid::model::builder::TaskTreeBuilder;
/// use taskgrid::model::TaskState;
///
/// let root = TaskTreeBuilder::root()
///     .child(TaskTreeBuilder::task("A").instance("r1", TaskState::Success))
///     .child(TaskTreeBuilder::group("B").child(TaskTreeBuilder::task("B.1")))
///     .build();
/// assert!(root.find("B").unwrap().is_group());
/// ```
pub struct TaskTreeBuilder {
    node: TaskNode,
}

impl TaskTreeBuilder {
    /// The unnamed root group whose children are the top-level rows.
    pub fn root() -> Self {
        Self::group("")
    }

    pub fn group(id: &str) -> Self {
        Self {
            node: TaskNode {
                id: id.to_string(),
                children: Some(Vec::new()),
                is_mapped: false,
                instances: Vec::new(),
            },
        }
    }

    pub fn task(id: &str) -> Self {
        Self {
            node: TaskNode {
                id: id.to_string(),
                children: None,
                is_mapped: false,
                instances: Vec::new(),
            },
        }
    }

    pub fn mapped(mut self) -> Self {
        self.node.is_mapped = true;
        self
    }

    /// Adds an instance of this node for `run_id`.
    pub fn instance(mut self, run_id: &str, state: impl Into<Option<TaskState>>) -> Self {
        let instance = Instance::new(run_id, &self.node.id, state.into());
        self.node.instances.push(instance);
        self
    }

    /// Appends a child; a leaf receiving a child becomes a group.
    pub fn child(mut self, child: TaskTreeBuilder) -> Self {
        self.node.children.get_or_insert_with(Vec::new).push(child.build());
        self
    }

    pub fn build(self) -> TaskNode {
        self.node
    }
}
