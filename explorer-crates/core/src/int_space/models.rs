//! Sample problems for [`super::IntegerSpace`].
use super::BranchingStrategy;
use super::Domain;
use super::IntegerModel;

/// Place `n` queens on an `n` by `n` board so that no two attack each other. Variable `q{i}` is
/// the row of the queen in column `i`.
pub fn n_queens(n: u32, branching: BranchingStrategy) -> IntegerModel {
    let mut model = IntegerModel::default();
    let size = n as i32;
    let queens: Vec<_> = (0..size)
        .map(|column| model.new_variable(format!("q{column}"), Domain::interval(0, size - 1)))
        .collect();

    model.all_different(queens.iter().map(|&queen| (queen, 0)));
    model.all_different(queens.iter().zip(0..).map(|(&queen, column)| (queen, column)));
    model.all_different(queens.iter().zip(0..).map(|(&queen, column)| (queen, -column)));
    model.set_branching(branching);
    model
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KnapsackItem {
    pub weight: i32,
    pub profit: i32,
}

/// Choose items (`x{i}` is 1 when item `i` is packed) of maximal profit without exceeding the
/// capacity.
pub fn knapsack(items: &[KnapsackItem], capacity: i64) -> IntegerModel {
    let mut model = IntegerModel::default();
    let packed: Vec<_> = (0..items.len())
        .map(|index| model.new_variable(format!("x{index}"), Domain::interval(0, 1)))
        .collect();

    model.linear_less_or_equal(
        items.iter().zip(&packed).map(|(item, &variable)| (item.weight, variable)),
        capacity,
    );
    model.maximise(items.iter().zip(&packed).map(|(item, &variable)| (item.profit, variable)));
    model
}
