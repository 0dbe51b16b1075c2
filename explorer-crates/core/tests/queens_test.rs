#![cfg(test)]

mod helpers;

use explorer_core::int_space::models::n_queens;
use explorer_core::int_space::BranchingStrategy;
use explorer_core::int_space::IntegerSpace;
use explorer_core::termination::Indefinite;
use explorer_core::termination::NodeBudget;
use explorer_core::ExplorationMode;
use explorer_core::ExplorationOptions;
use explorer_core::ExplorationOutcome;
use explorer_core::ExplorationStrategy;
use explorer_core::ExplorerOptions;
use explorer_core::ForcedStatus;
use explorer_core::NodeId;
use explorer_core::NodeStatus;
use explorer_core::Relation;
use explorer_core::SearchTree;
use explorer_core::SharedTree;
use explorer_core::SolverState;
use explorer_core::SpaceStatus;
use explorer_core::SpecialDescriptor;
use explorer_core::StatusKind;
use helpers::explore_fully;

fn queens_tree(
    n: u32,
    branching: BranchingStrategy,
    options: ExplorerOptions,
) -> SharedTree<IntegerSpace> {
    SharedTree::new(SearchTree::new(n_queens(n, branching).into_space(), options))
}

#[test]
fn queens_solution_counts_match_known_values() {
    for (n, expected) in [(4, 2), (5, 10), (6, 4), (7, 40), (8, 92)] {
        for branching in [BranchingStrategy::Split, BranchingStrategy::Enumerate] {
            let tree = queens_tree(n, branching, ExplorerOptions::default());
            let report = explore_fully(&tree, ExplorationOptions::default());

            assert_eq!(expected, report.solutions, "{n} queens with {branching:?}");
            assert_eq!(ExplorationOutcome::Exhausted, report.outcome);

            let summary = tree.summary();
            assert!(summary.exhausted);
            assert_eq!(expected as usize, summary.nodes[StatusKind::Solved]);
            assert_eq!(0, summary.nodes[StatusKind::Undetermined]);
        }
    }
}

#[test]
fn copy_policy_does_not_change_the_tree() {
    let reference = queens_tree(7, BranchingStrategy::Split, ExplorerOptions::default());
    let _ = explore_fully(&reference, ExplorationOptions::default());
    let expected = reference.summary();

    let policies = [
        ExplorerOptions {
            copy_distance: 1,
            adaptive_distance: None,
            last_alternative_optimisation: false,
        },
        ExplorerOptions {
            copy_distance: 100,
            adaptive_distance: None,
            last_alternative_optimisation: true,
        },
        ExplorerOptions {
            copy_distance: 4,
            adaptive_distance: Some(1),
            last_alternative_optimisation: true,
        },
    ];

    for options in policies {
        let tree = queens_tree(7, BranchingStrategy::Split, options);
        let _ = explore_fully(&tree, ExplorationOptions::default());
        let summary = tree.summary();

        assert_eq!(expected.nodes, summary.nodes, "{options:?}");
        assert_eq!(expected.max_depth, summary.max_depth, "{options:?}");
    }
}

#[test]
fn breadth_first_visits_the_same_tree() {
    let depth_first = queens_tree(6, BranchingStrategy::Enumerate, ExplorerOptions::default());
    let _ = explore_fully(&depth_first, ExplorationOptions::default());

    let breadth_first = queens_tree(6, BranchingStrategy::Enumerate, ExplorerOptions::default());
    let report = explore_fully(
        &breadth_first,
        ExplorationOptions {
            strategy: ExplorationStrategy::BreadthFirst,
            ..Default::default()
        },
    );

    assert_eq!(4, report.solutions);
    assert_eq!(depth_first.summary().nodes, breadth_first.summary().nodes);
}

#[test]
fn the_state_of_a_solved_node_is_a_solution() {
    let n = 6;
    let tree = queens_tree(n, BranchingStrategy::Split, ExplorerOptions::default());
    let _ = explore_fully(&tree, ExplorationOptions::default());

    let solved: Vec<NodeId> = {
        let tree = tree.lock();
        tree.node_ids()
            .filter(|&node| tree.status(node) == NodeStatus::Solved)
            .collect()
    };
    assert_eq!(4, solved.len());

    for node in solved {
        let mut space = tree
            .get_space(node, &mut Indefinite)
            .expect("the root copy anchors every node");
        assert_eq!(Ok(SpaceStatus::Solved), space.status(&mut Indefinite));

        let rows: Vec<i32> = (0..n)
            .map(|column| space.value(&format!("q{column}")).expect("queen is fixed"))
            .collect();

        for first in 0..rows.len() {
            for second in first + 1..rows.len() {
                let distance = (second - first) as i32;
                assert_ne!(rows[first], rows[second]);
                assert_ne!(distance, (rows[first] - rows[second]).abs());
            }
        }
    }
}

#[test]
fn next_solution_mode_stops_at_the_first_solution_and_resumes() {
    let tree = queens_tree(6, BranchingStrategy::Split, ExplorerOptions::default());
    let options = ExplorationOptions {
        mode: ExplorationMode::NextSolution,
        ..Default::default()
    };

    let mut found = vec![];
    loop {
        let report = explore_fully(&tree, options);
        match report.outcome {
            ExplorationOutcome::SolutionFound(node) => {
                assert_eq!(1, report.solutions);
                assert_eq!(NodeStatus::Solved, tree.lock().status(node));
                found.push(node);
            }
            ExplorationOutcome::Exhausted => break,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    assert_eq!(4, found.len());
    found.dedup();
    assert_eq!(4, found.len());
}

#[test]
fn node_budget_interrupts_the_exploration() {
    let tree = queens_tree(8, BranchingStrategy::Split, ExplorerOptions::default());
    let report = explorer_core::explore(
        &tree,
        NodeId::ROOT,
        ExplorationOptions::default(),
        &mut NodeBudget::new(10),
    );

    assert_eq!(ExplorationOutcome::Interrupted, report.outcome);
    assert_eq!(10, report.expanded);
    assert!(!tree.summary().exhausted);

    let rest = explore_fully(&tree, ExplorationOptions::default());
    assert_eq!(92, report.solutions + rest.solutions);
    assert!(tree.summary().exhausted);
}

#[test]
fn a_special_node_restricts_its_subtree() {
    let tree = queens_tree(4, BranchingStrategy::Split, ExplorerOptions::default());
    tree.lock()
        .set_status(
            NodeId::ROOT,
            ForcedStatus::Special(SpecialDescriptor::new("q0", Relation::Equal, 1)),
        )
        .expect("the root is undetermined");

    let report = explore_fully(&tree, ExplorationOptions::default());

    assert_eq!(1, report.solutions);
    assert_eq!(NodeStatus::Special, tree.lock().status(NodeId::ROOT));
    assert_eq!(1, tree.lock().number_of_children(NodeId::ROOT));
}

#[test]
fn purging_keeps_the_tree_explorable() {
    let tree = queens_tree(6, BranchingStrategy::Split, ExplorerOptions::default());
    let _ = explorer_core::explore(
        &tree,
        NodeId::ROOT,
        ExplorationOptions::default(),
        &mut NodeBudget::new(15),
    );

    tree.lock().purge(NodeId::ROOT);
    let summary = tree.summary();
    assert_eq!(1, summary.copies);
    assert_eq!(0, summary.working_states);

    let _ = explore_fully(&tree, ExplorationOptions::default());
    assert_eq!(4, tree.summary().nodes[StatusKind::Solved]);
}
