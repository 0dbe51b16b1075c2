#![cfg(test)]

mod helpers;

use std::thread;
use std::time::Duration;

use explorer_core::int_space::models::n_queens;
use explorer_core::int_space::BranchingStrategy;
use explorer_core::termination::Indefinite;
use explorer_core::termination::TimeBudget;
use explorer_core::ExplorationOptions;
use explorer_core::ExplorationOutcome;
use explorer_core::Explorer;
use explorer_core::ExplorerOptions;
use explorer_core::NodeId;
use explorer_core::SearchTree;
use explorer_core::SharedTree;
use explorer_core::StatusKind;
use helpers::brute_force_knapsack;
use helpers::knapsack_tree;
use helpers::sample_items;

#[test]
fn foreground_reads_while_worker_explores() {
    let tree = SharedTree::new(SearchTree::new(
        n_queens(8, BranchingStrategy::Split).into_space(),
        ExplorerOptions::default(),
    ));
    let explorer = Explorer::spawn(
        tree.clone(),
        NodeId::ROOT,
        ExplorationOptions::default(),
        Indefinite,
    );

    let mut previous = 0;
    let report = loop {
        let summary = tree.summary();
        assert!(summary.total_nodes() >= previous);
        previous = summary.total_nodes();

        if let Some(report) = explorer.try_recv() {
            break report;
        }
        thread::sleep(Duration::from_millis(1));
    };

    assert_eq!(ExplorationOutcome::Exhausted, report.outcome);
    assert_eq!(92, report.solutions);
    assert!(tree.summary().exhausted);
}

#[test]
fn cancelling_interrupts_the_worker() {
    let tree = SharedTree::new(SearchTree::new(
        n_queens(14, BranchingStrategy::Enumerate).into_space(),
        ExplorerOptions::default(),
    ));
    let explorer = Explorer::spawn(
        tree.clone(),
        NodeId::ROOT,
        ExplorationOptions::default(),
        Indefinite,
    );
    explorer.cancel();

    let report = explorer.wait().expect("worker did not panic");
    assert_eq!(ExplorationOutcome::Interrupted, report.outcome);
    assert!(!tree.summary().exhausted);
}

#[test]
fn time_budget_interrupts_the_worker() {
    let tree = SharedTree::new(SearchTree::new(
        n_queens(14, BranchingStrategy::Enumerate).into_space(),
        ExplorerOptions::default(),
    ));
    let explorer = Explorer::spawn(
        tree.clone(),
        NodeId::ROOT,
        ExplorationOptions::default(),
        TimeBudget::starting_now(Duration::from_millis(20)),
    );

    let report = explorer.wait().expect("worker did not panic");
    assert_eq!(ExplorationOutcome::Interrupted, report.outcome);
}

#[test]
fn two_workers_share_one_tree() {
    let tree = SharedTree::new(SearchTree::new(
        n_queens(7, BranchingStrategy::Split).into_space(),
        ExplorerOptions::default(),
    ));
    let first = Explorer::spawn(
        tree.clone(),
        NodeId::ROOT,
        ExplorationOptions::default(),
        Indefinite,
    );
    let second = Explorer::spawn(
        tree.clone(),
        NodeId::ROOT,
        ExplorationOptions::default(),
        Indefinite,
    );

    let first = first.wait().expect("worker did not panic");
    let second = second.wait().expect("worker did not panic");
    assert_eq!(ExplorationOutcome::Exhausted, first.outcome);
    assert_eq!(ExplorationOutcome::Exhausted, second.outcome);

    let summary = tree.summary();
    assert!(summary.exhausted);
    assert_eq!(40, summary.nodes[StatusKind::Solved]);
    assert_eq!(0, summary.nodes[StatusKind::Undetermined]);
}

#[test]
fn branch_and_bound_in_the_background() {
    let items = sample_items();
    let tree = knapsack_tree(&items, 15, ExplorerOptions::default());
    let explorer = Explorer::spawn(
        tree.clone(),
        NodeId::ROOT,
        ExplorationOptions::default(),
        Indefinite,
    );

    let report = explorer.wait().expect("worker did not panic");
    assert_eq!(ExplorationOutcome::Exhausted, report.outcome);

    let tree = tree.try_unwrap().expect("the worker released its handle");
    assert_eq!(
        Some(brute_force_knapsack(&items, 15)),
        tree.current_best().and_then(|space| space.objective_value())
    );
}
