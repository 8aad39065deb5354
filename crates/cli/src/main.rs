//! packplan command-line interface.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use packplan::{NextFitPolicy, PackingConfig, Planner, SortOrder, StrategyKind};
use packplan_cli::{
    to_json, write_text, BenchmarkConfig, BenchmarkRunner, DatasetKind, InputParser, PlanInput,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "packplan")]
#[command(about = "Weight- and count-constrained pack planner")]
#[command(version)]
struct Cli {
    /// Log strategy and sorter decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan packs for an input file (stdin when omitted)
    Plan {
        /// Input file: header line, then one item per line
        file: Option<PathBuf>,

        /// Packing strategy
        #[arg(short, long, value_enum, default_value = "blocking")]
        strategy: StrategyArg,

        /// Worker threads (0 = hardware concurrency)
        #[arg(short, long, default_value = "0")]
        threads: usize,

        /// Override the sort order from the input header
        #[arg(long, value_enum)]
        order: Option<OrderArg>,

        /// What next-fit does with an item that no longer fits
        #[arg(long, value_enum, default_value = "open-new-pack")]
        next_fit_policy: PolicyArg,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Print packs only, without the timing block
        #[arg(short, long)]
        quiet: bool,
    },

    /// Compare strategies on generated inputs
    Bench {
        /// Input sizes
        #[arg(long, value_delimiter = ',', default_values_t = vec![100, 1_000, 5_000, 10_000, 15_000])]
        sizes: Vec<usize>,

        /// Strategies to run (all when omitted)
        #[arg(short, long, value_enum, value_delimiter = ',')]
        strategies: Vec<StrategyArg>,

        /// Sort orders to run each strategy under
        #[arg(long, value_enum, value_delimiter = ',', default_values_t = vec![OrderArg::Natural])]
        orders: Vec<OrderArg>,

        /// Worker threads (0 = hardware concurrency)
        #[arg(short, long, default_value = "0")]
        threads: usize,

        /// Item generator
        #[arg(long, value_enum, default_value = "uniform")]
        dataset: DatasetArg,

        /// Generator seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Also run the fixed edge-case configurations
        #[arg(long)]
        guard: bool,

        /// Output file for results (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a synthetic input file
    Generate {
        /// Item generator
        #[arg(short, long, value_enum, default_value = "uniform")]
        kind: DatasetArg,

        /// Number of items
        #[arg(short, long, default_value = "1000")]
        count: usize,

        /// Generator seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Sort order written to the header
        #[arg(long, value_enum, default_value = "natural")]
        order: OrderArg,

        /// Item ceiling written to the header
        #[arg(long, default_value = "100")]
        max_items: u32,

        /// Weight ceiling written to the header
        #[arg(long, default_value = "1000")]
        max_weight: f64,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Sequential first-fit
    Blocking,
    /// Only the most recent pack is considered
    NextFit,
    /// Chunked first-fit across workers
    Parallel,
    /// Chunked first-fit with a shared result queue
    LockFree,
    /// Tightest pack that still accepts the item
    BestFit,
    /// Best-fit over work-stolen batches
    ParallelBestFit,
    /// Per-item map phase, sequential reduce
    Async,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Blocking => StrategyKind::Blocking,
            StrategyArg::NextFit => StrategyKind::NextFit,
            StrategyArg::Parallel => StrategyKind::Parallel,
            StrategyArg::LockFree => StrategyKind::LockFree,
            StrategyArg::BestFit => StrategyKind::BestFit,
            StrategyArg::ParallelBestFit => StrategyKind::ParallelBestFit,
            StrategyArg::Async => StrategyKind::Async,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OrderArg {
    Natural,
    ShortToLong,
    LongToShort,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Natural => SortOrder::Natural,
            OrderArg::ShortToLong => SortOrder::ShortToLong,
            OrderArg::LongToShort => SortOrder::LongToShort,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Keep placing the item in a fresh pack
    OpenNewPack,
    /// Drop the rest of the item
    SkipOnFull,
}

impl From<PolicyArg> for NextFitPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::OpenNewPack => NextFitPolicy::OpenNewPack,
            PolicyArg::SkipOnFull => NextFitPolicy::SkipOnFull,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DatasetArg {
    Uniform,
    Stress,
    Problematic,
}

impl From<DatasetArg> for DatasetKind {
    fn from(arg: DatasetArg) -> Self {
        match arg {
            DatasetArg::Uniform => DatasetKind::Uniform,
            DatasetArg::Stress => DatasetKind::Stress,
            DatasetArg::Problematic => DatasetKind::Problematic,
        }
    }
}

fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> ExitCode {
    let start = Instant::now();
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Fatal error: {e:#}");
            eprintln!(
                "Execution time before error: {:.3} ms",
                start.elapsed().as_secs_f64() * 1000.0
            );
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Plan {
            file,
            strategy,
            threads,
            order,
            next_fit_policy,
            json,
            quiet,
        } => {
            let parser = InputParser::new();
            let input = match &file {
                Some(path) => parser
                    .parse_file(path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => parser.parse_reader(io::stdin().lock()).context("reading stdin")?,
            };

            let mut config = input.config(
                PackingConfig::new()
                    .with_strategy(strategy.into())
                    .with_threads(threads)
                    .with_next_fit_policy(next_fit_policy.into()),
            );
            if let Some(order) = order {
                config = config.with_sort_order(order.into());
            }

            let result = Planner::new().plan(&config, &input.items);

            let stdout = io::stdout();
            let mut out = stdout.lock();
            if json {
                writeln!(out, "{}", to_json(&result)?)?;
            } else {
                write_text(&mut out, &result, !quiet)?;
            }
            out.flush()?;
        }

        Commands::Bench {
            sizes,
            strategies,
            orders,
            threads,
            dataset,
            seed,
            guard,
            output,
        } => {
            let strategies: Vec<StrategyKind> = if strategies.is_empty() {
                StrategyKind::all().to_vec()
            } else {
                strategies.into_iter().map(Into::into).collect()
            };

            let config = BenchmarkConfig::new()
                .with_sizes(sizes)
                .with_strategies(strategies)
                .with_sort_orders(orders.into_iter().map(Into::into).collect())
                .with_threads(threads)
                .with_dataset(dataset.into(), seed);

            let runner = BenchmarkRunner::new(config);
            let results = runner.run();

            results.print_summary();

            println!();
            println!("Strategy comparison:");
            for summary in results.summary_by_strategy() {
                println!(
                    "  {:<28} runs: {:<4} avg total: {:>10.3} ms  avg items/sec: {:>12.0}  avg util: {:.1}%",
                    summary.strategy,
                    summary.run_count,
                    summary.avg_total_ms,
                    summary.avg_items_per_second,
                    summary.avg_utilization
                );
            }

            if guard {
                println!();
                println!("Edge-case configurations:");
                for check in runner.run_guard_checks() {
                    println!(
                        "  {:<18} {:<28} max {}/{:.1}: {} packs, {}/{} units, {:.3} ms",
                        check.name,
                        check.strategy,
                        check.max_items,
                        check.max_weight,
                        check.packs,
                        check.packed_items,
                        check.total_items,
                        check.total_ms
                    );
                }
            }

            if let Some(path) = output {
                results.save_json(&path)?;
                println!("Results saved to: {}", path.display());
            }
        }

        Commands::Generate {
            kind,
            count,
            seed,
            order,
            max_items,
            max_weight,
            output,
        } => {
            let input = PlanInput {
                sort_order: order.into(),
                max_items,
                max_weight,
                items: DatasetKind::from(kind).generate(count, seed),
            };

            match output {
                Some(path) => {
                    fs::write(&path, input.to_string())
                        .with_context(|| format!("writing {}", path.display()))?;
                    log::info!("wrote {} items to {}", input.items.len(), path.display());
                }
                None => print!("{input}"),
            }
        }
    }
    Ok(())
}
