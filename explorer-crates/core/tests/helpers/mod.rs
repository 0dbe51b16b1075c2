//! Shared set-up for the integration tests of the explorer core.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use explorer_core::int_space::models::knapsack;
use explorer_core::int_space::models::KnapsackItem;
use explorer_core::int_space::IntegerSpace;
use explorer_core::termination::Indefinite;
use explorer_core::ExplorationOptions;
use explorer_core::ExplorationReport;
use explorer_core::ExplorerOptions;
use explorer_core::NodeId;
use explorer_core::SearchTree;
use explorer_core::SharedTree;

/// Explore the whole tree below the root without any limit.
pub(crate) fn explore_fully(
    tree: &SharedTree<IntegerSpace>,
    options: ExplorationOptions,
) -> ExplorationReport {
    explorer_core::explore(tree, NodeId::ROOT, options, &mut Indefinite)
}

pub(crate) fn sample_items() -> Vec<KnapsackItem> {
    [(12, 4), (2, 2), (1, 1), (4, 10), (1, 2), (7, 5), (3, 6), (9, 7)]
        .into_iter()
        .map(|(weight, profit)| KnapsackItem { weight, profit })
        .collect()
}

/// The optimal profit, by trying every subset of items.
pub(crate) fn brute_force_knapsack(items: &[KnapsackItem], capacity: i64) -> i64 {
    (0_u32..1 << items.len())
        .filter_map(|subset| {
            let chosen = items
                .iter()
                .enumerate()
                .filter(|(index, _)| subset & (1 << index) != 0)
                .map(|(_, item)| item);

            let (weight, profit) = chosen.fold((0_i64, 0_i64), |(weight, profit), item| {
                (
                    weight + i64::from(item.weight),
                    profit + i64::from(item.profit),
                )
            });
            (weight <= capacity).then_some(profit)
        })
        .max()
        .unwrap_or(0)
}

/// A branch-and-bound tree over the knapsack model of `items`.
pub(crate) fn knapsack_tree(
    items: &[KnapsackItem],
    capacity: i64,
    options: ExplorerOptions,
) -> SharedTree<IntegerSpace> {
    let model = knapsack(items, capacity);
    let comparator = model
        .comparator()
        .expect("the knapsack model has an objective");
    SharedTree::new(SearchTree::with_comparator(
        model.into_space(),
        comparator,
        options,
    ))
}
