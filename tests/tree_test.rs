use taskgrid::grid::expansion::OpenGroups;
use taskgrid::grid::tree::TaskTree;
use taskgrid::model::builder::TaskTreeBuilder;
use taskgrid::model::{TaskNode, TaskState};

// root -> [A(leaf), B(group) -> [B.1(leaf)]]
fn simple_tree() -> TaskNode {
    TaskTreeBuilder::root()
        .child(TaskTreeBuilder::task("A").instance("r1", TaskState::Success))
        .child(TaskTreeBuilder::group("B").child(TaskTreeBuilder::task("B.1")))
        .build()
}

// root -> [G -> [G.H -> [G.H.x], G.y], Z]
fn nested_tree() -> TaskNode {
    TaskTreeBuilder::root()
        .child(
            TaskTreeBuilder::group("G")
                .child(TaskTreeBuilder::group("G.H").child(TaskTreeBuilder::task("G.H.x")))
                .child(TaskTreeBuilder::task("G.y")),
        )
        .child(TaskTreeBuilder::task("Z"))
        .build()
}

fn visible_ids(root: &TaskNode, open: &OpenGroups) -> Vec<String> {
    TaskTree::new(root, open)
        .visible_rows()
        .map(|r| r.task_id().to_string())
        .collect()
}

#[test]
fn test_closed_group_hides_children() {
    let root = simple_tree();
    let open = OpenGroups::default();

    assert_eq!(visible_ids(&root, &open), vec!["A", "B"]);

    // Hidden rows are still emitted, flagged invisible.
    let all: Vec<_> = TaskTree::new(&root, &open).rows().collect();
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].task_id(), "B.1");
    assert!(!all[2].visible);
}

#[test]
fn test_open_group_shows_children_one_level_deeper() {
    let root = simple_tree();
    let mut open = OpenGroups::default();
    assert!(open.toggle("B"));

    let rows: Vec<_> = TaskTree::new(&root, &open).visible_rows().collect();
    let ids: Vec<_> = rows.iter().map(|r| r.task_id()).collect();
    assert_eq!(ids, vec!["A", "B", "B.1"]);

    let b1 = &rows[2];
    assert_eq!(b1.level, 1);
    assert_eq!(b1.label, "1");
    assert!(!b1.is_group);

    let b = &rows[1];
    assert!(b.is_group);
    assert!(b.is_open);
}

#[test]
fn test_visibility_is_and_of_ancestors() {
    let root = nested_tree();

    // Inner group open, outer closed: nothing below G shows.
    let mut open = OpenGroups::default();
    open.set_open("G.H", true);
    assert_eq!(visible_ids(&root, &open), vec!["G", "Z"]);

    // Outer open only: inner group's children stay hidden.
    let mut open = OpenGroups::default();
    open.set_open("G", true);
    assert_eq!(visible_ids(&root, &open), vec!["G", "G.H", "G.y", "Z"]);

    // Both open.
    open.set_open("G.H", true);
    assert_eq!(visible_ids(&root, &open), vec!["G", "G.H", "G.H.x", "G.y", "Z"]);

    for row in TaskTree::new(&root, &open).rows() {
        let expected_level = row.task_id().matches('.').count();
        assert_eq!(row.level, expected_level, "level of {}", row.task_id());
    }
}

#[test]
fn test_toggle_does_not_affect_siblings() {
    let root = TaskTreeBuilder::root()
        .child(TaskTreeBuilder::group("P").child(TaskTreeBuilder::task("P.a")))
        .child(TaskTreeBuilder::group("Q").child(TaskTreeBuilder::task("Q.a")))
        .build();

    let mut open = OpenGroups::default();
    open.set_open("Q", true);
    let before: Vec<_> = TaskTree::new(&root, &open)
        .rows()
        .filter(|r| r.task_id().starts_with('Q'))
        .map(|r| (r.task_id().to_string(), r.visible))
        .collect();

    open.toggle("P");
    let after: Vec<_> = TaskTree::new(&root, &open)
        .rows()
        .filter(|r| r.task_id().starts_with('Q'))
        .map(|r| (r.task_id().to_string(), r.visible))
        .collect();

    assert_eq!(before, after);
    assert_eq!(visible_ids(&root, &open), vec!["P", "P.a", "Q", "Q.a"]);
}

#[test]
fn test_empty_group_is_togglable() {
    let root = TaskTreeBuilder::root()
        .child(TaskTreeBuilder::group("empty"))
        .build();
    let mut open = OpenGroups::default();

    let row = TaskTree::new(&root, &open).rows().next().expect("row");
    assert!(row.is_group);
    assert!(!row.is_open);

    assert!(open.toggle("empty"));
    let rows: Vec<_> = TaskTree::new(&root, &open).rows().collect();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_open);
}

#[test]
fn test_rows_restart_from_the_top() {
    let root = simple_tree();
    let open = OpenGroups::default();
    let tree = TaskTree::new(&root, &open);

    let first: Vec<_> = tree.rows().map(|r| r.task_id().to_string()).collect();
    let second: Vec<_> = tree.rows().map(|r| r.task_id().to_string()).collect();
    assert_eq!(first, second);
}

#[test]
fn test_mapped_task_label() {
    let root = TaskTreeBuilder::root()
        .child(TaskTreeBuilder::group("grp").child(TaskTreeBuilder::task("grp.fan_out").mapped()))
        .build();
    let mut open = OpenGroups::default();
    open.set_open("grp", true);

    let rows: Vec<_> = TaskTree::new(&root, &open).visible_rows().collect();
    assert_eq!(rows[1].label, "fan_out [ ]");
}
