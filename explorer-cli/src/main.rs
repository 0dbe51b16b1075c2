mod result;
mod signals;

use std::io::Write;
use std::time::Duration;

use clap::ArgAction;
use clap::Parser;
use clap::Subcommand;
use explorer_core::asserts::EXPLORER_ASSERT_LEVEL_DEFINITION;
use explorer_core::asserts::EXPLORER_ASSERT_MODERATE;
use explorer_core::int_space::models::knapsack;
use explorer_core::int_space::models::n_queens;
use explorer_core::int_space::models::KnapsackItem;
use explorer_core::int_space::BranchingStrategy;
use explorer_core::int_space::IntegerModel;
use explorer_core::int_space::IntegerSpace;
use explorer_core::statistics::configure_statistic_logging;
use explorer_core::statistics::log_statistic_postfix;
use explorer_core::statistics::StatisticOptions;
use explorer_core::termination::Combinator;
use explorer_core::termination::Indefinite;
use explorer_core::termination::NodeBudget;
use explorer_core::termination::TimeBudget;
use explorer_core::AllocationFailurePolicy;
use explorer_core::ExplorationMode;
use explorer_core::ExplorationOptions;
use explorer_core::ExplorationOutcome;
use explorer_core::ExplorationReport;
use explorer_core::ExplorationStrategy;
use explorer_core::Explorer;
use explorer_core::ExplorerError;
use explorer_core::ExplorerOptions;
use explorer_core::NodeId;
use explorer_core::SearchTree;
use explorer_core::SharedTree;
use explorer_core::SolverState;
use log::error;
use log::info;
use log::warn;
use log::LevelFilter;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
use result::ExplorerCliError;
use result::ExplorerCliResult;

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about,
    arg_required_else_help = true
)]
struct Args {
    /// The problem whose search tree is explored.
    #[command(subcommand)]
    problem: Problem,

    /// A branch node whose state had to be rebuilt from more than this many decisions keeps the
    /// state as a copy.
    ///
    /// Smaller values use more memory and recompute less. Values below 1 are treated as 1.
    ///
    /// Possible values: u32
    #[arg(long = "copy-distance", default_value_t = 8, verbatim_doc_comment)]
    copy_distance: u32,

    /// When a recomputation replays more than this many decisions, a copy half-way down the
    /// replayed path is stored as well.
    ///
    /// Possible values: u32
    #[arg(long = "adaptive-distance", default_value_t = 2, verbatim_doc_comment)]
    adaptive_distance: u32,

    /// Disables the intermediate copies stored during long recomputations.
    ///
    /// Possible values: bool
    #[arg(long = "no-adaptive-copies", verbatim_doc_comment)]
    no_adaptive_copies: bool,

    /// Disables handing the copy of a node to its last unexplored child.
    ///
    /// Possible values: bool
    #[arg(long = "no-last-alternative-optimisation", verbatim_doc_comment)]
    no_last_alternative_optimisation: bool,

    /// The order in which open nodes are expanded.
    #[arg(long, value_enum, default_value_t)]
    strategy: ExplorationStrategy,

    /// Whether to explore the whole tree or to stop at the first solution.
    #[arg(long, value_enum, default_value_t)]
    mode: ExplorationMode,

    /// What to do when a solver state cannot be allocated.
    #[arg(long = "on-allocation-failure", value_enum, default_value_t)]
    allocation_failure_policy: AllocationFailurePolicy,

    /// How the integer model splits a state which is not solved yet.
    #[arg(long, value_enum, default_value_t)]
    branching: BranchingStrategy,

    /// The time budget for the exploration, in milliseconds.
    #[arg(short = 't', long = "time-limit")]
    time_limit: Option<u64>,

    /// The maximum number of nodes the exploration determines.
    #[arg(long = "node-limit")]
    node_limit: Option<u64>,

    /// How often, in milliseconds, a summary of the tree is logged while the exploration runs.
    ///
    /// The summaries are logged at the info level, so at least one `-v` is needed to see them.
    #[arg(long = "report-interval", default_value_t = 1000, verbatim_doc_comment)]
    report_interval: u64,

    /// Log the statistics of the search tree once the exploration has ended.
    ///
    /// Possible values: bool
    #[arg(short = 's', long = "log-statistics", verbatim_doc_comment)]
    log_statistics: bool,

    /// Increase the verbosity of the log messages. Once enables the progress summaries, twice
    /// logs every decision the tree makes about states.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, verbatim_doc_comment)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Problem {
    /// Place N queens on an N by N board so that no two attack each other.
    Queens {
        /// The size of the board.
        n: u32,
    },
    /// Pack a random selection of items of maximal profit into a knapsack.
    Knapsack {
        /// The number of generated items.
        #[arg(long = "items", default_value_t = 12)]
        num_items: usize,

        /// The capacity of the knapsack.
        #[arg(long, default_value_t = 30)]
        capacity: i64,

        /// The seed of the generator of item weights and profits.
        #[arg(long = "random-seed", default_value_t = 42)]
        random_seed: u64,
    },
}

impl Problem {
    fn into_model(self, branching: BranchingStrategy) -> ExplorerCliResult<IntegerModel> {
        match self {
            Problem::Queens { n } => {
                if n == 0 {
                    return Err(ExplorerCliError::EmptyProblem("queen"));
                }
                Ok(n_queens(n, branching))
            }
            Problem::Knapsack {
                num_items,
                capacity,
                random_seed,
            } => {
                if num_items == 0 {
                    return Err(ExplorerCliError::EmptyProblem("item"));
                }
                let mut rng = SmallRng::seed_from_u64(random_seed);
                let items: Vec<_> = (0..num_items)
                    .map(|_| KnapsackItem {
                        weight: rng.gen_range(1..=20),
                        profit: rng.gen_range(1..=30),
                    })
                    .collect();
                info!("generated items {items:?}");

                let mut model = knapsack(&items, capacity);
                model.set_branching(branching);
                Ok(model)
            }
        }
    }
}

fn configure_logging(verbose: u8, log_statistics: bool) {
    if log_statistics {
        configure_statistic_logging(
            StatisticOptions::new("%%%explorer-stat:").with_postfix("%%%explorer-stat-end"),
        );
    }
    let level_filter = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            write!(buf, "% ")?;

            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> ExplorerCliResult<()> {
    let args = Args::parse();
    configure_logging(args.verbose, args.log_statistics);

    if EXPLORER_ASSERT_LEVEL_DEFINITION >= EXPLORER_ASSERT_MODERATE {
        warn!(
            "Potential performance degradation: the explorer assert level is set to {}, meaning many debug asserts are active which may result in performance degradation.",
            EXPLORER_ASSERT_LEVEL_DEFINITION
        );
    }

    let explorer_options = ExplorerOptions {
        copy_distance: args.copy_distance,
        adaptive_distance: (!args.no_adaptive_copies).then_some(args.adaptive_distance),
        last_alternative_optimisation: !args.no_last_alternative_optimisation,
    };
    let exploration_options = ExplorationOptions {
        strategy: args.strategy,
        mode: args.mode,
        allocation_failure_policy: args.allocation_failure_policy,
    };

    let model = args.problem.into_model(args.branching)?;
    let tree = match model.comparator() {
        Some(comparator) => {
            SearchTree::with_comparator(model.into_space(), comparator, explorer_options)
        }
        None => SearchTree::new(model.into_space(), explorer_options),
    };
    let tree = SharedTree::new(tree);

    let termination = Combinator::new(
        signals::stop_on_signal()?,
        Combinator::new(
            args.time_limit
                .map(|milliseconds| TimeBudget::starting_now(Duration::from_millis(milliseconds))),
            args.node_limit.map(NodeBudget::new),
        ),
    );
    let explorer = Explorer::spawn(
        tree.clone(),
        NodeId::ROOT,
        exploration_options,
        termination,
    );

    let report = follow(&tree, explorer, Duration::from_millis(args.report_interval.max(1)))?;
    print_result(&tree, report)?;

    if args.log_statistics {
        tree.lock().log_statistics();
        log_statistic_postfix();
    }

    match report.outcome {
        ExplorationOutcome::Aborted(error) => Err(error.into()),
        ExplorationOutcome::Exhausted
        | ExplorationOutcome::Incomplete
        | ExplorationOutcome::SolutionFound(_)
        | ExplorationOutcome::Interrupted => Ok(()),
    }
}

/// Log a summary of the tree every `interval` until the worker reports.
fn follow(
    tree: &SharedTree<IntegerSpace>,
    explorer: Explorer,
    interval: Duration,
) -> ExplorerCliResult<ExplorationReport> {
    loop {
        if let Some(report) = explorer.wait_timeout(interval) {
            return Ok(report);
        }
        if explorer.is_finished() {
            return explorer.wait().ok_or(ExplorerCliError::WorkerLost);
        }
        info!("{}", tree.summary());
    }
}

fn print_result(
    tree: &SharedTree<IntegerSpace>,
    report: ExplorationReport,
) -> ExplorerCliResult<()> {
    if report.outcome == ExplorationOutcome::Interrupted {
        info!("exploration interrupted before the tree was exhausted");
    }

    println!("{report}");
    println!("{}", tree.summary());

    if let ExplorationOutcome::SolutionFound(node) = report.outcome {
        let mut solution = tree.get_space(node, &mut Indefinite)?;
        let _ = solution
            .status(&mut Indefinite)
            .map_err(ExplorerError::from)?;
        println!("solution: {solution}");
    }

    let tree = tree.lock();
    if let Some(best) = tree.current_best() {
        println!("best: {best}");
        if let Some(objective) = best.objective_value() {
            println!("objective: {objective}");
        }
    }

    Ok(())
}
