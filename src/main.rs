use std::path::PathBuf;

use clap::{Parser, Subcommand};
use parking_consolidator::consolidate::{self, ConsolidateOptions};
use parking_consolidator::model::ConsolidatedDataset;
use parking_consolidator::summary::DEFAULT_CAPACITY;
use parking_consolidator::{ConsolidationError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose)?;
    match cli.command {
        Command::Consolidate(args) => execute_consolidate(args),
        Command::Check(args) => execute_check(args),
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ConsolidationError::Logging(error.to_string()))
}

fn execute_consolidate(args: ConsolidateArgs) -> Result<()> {
    let options = args.inputs.options(args.workbook);
    let dataset = consolidate::consolidate_to_file(
        &args.inputs.assignments,
        &args.inputs.master,
        &args.output,
        &options,
    )?;
    print_overview(&dataset);
    println!("output: {}", args.output.display());
    Ok(())
}

fn execute_check(args: InputArgs) -> Result<()> {
    let options = args.options(None);
    let dataset = consolidate::consolidate(&args.assignments, &args.master, &options)?;
    print_overview(&dataset);
    for warning in &dataset.warnings {
        let row = warning
            .row
            .map(|row| format!(" row {row}"))
            .unwrap_or_default();
        println!("  [{:?}] {}{row}: {}", warning.kind, warning.sheet, warning.message);
    }
    Ok(())
}

fn print_overview(dataset: &ConsolidatedDataset) {
    let summary = &dataset.summary;
    println!(
        "capacity {}: {} allocated, {} free, {} unknown ({}% utilized)",
        summary.capacity, summary.allocated, summary.free, summary.unknown, summary.utilization_rate
    );
    for zone in &summary.zones {
        println!(
            "  {:<22} {:>3} allocated {:>3} free {:>5.1}%",
            zone.zone.display_name(),
            zone.allocated_count,
            zone.free_count,
            zone.percentage_of_total
        );
    }
    println!("warnings: {}", dataset.warnings.len());
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Consolidate parking assignment spreadsheets into one normalized dataset."
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge the inputs and write the record file.
    Consolidate(ConsolidateArgs),
    /// Merge the inputs and report aggregates and warnings without writing.
    Check(InputArgs),
}

#[derive(clap::Args)]
struct InputArgs {
    /// Assignment workbook (sheets "Постоянни паркоместа" and "Изтрити").
    assignments: PathBuf,

    /// Master parking table workbook.
    master: PathBuf,

    /// Barrier entry/exit export to merge into the vehicle registry.
    #[arg(long)]
    gate_log: Option<PathBuf>,

    /// Number of spots on the site.
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Fail when any data-quality warning is recorded.
    #[arg(long)]
    strict: bool,
}

impl InputArgs {
    fn options(&self, workbook: Option<PathBuf>) -> ConsolidateOptions {
        ConsolidateOptions {
            capacity: self.capacity,
            gate_log: self.gate_log.clone(),
            workbook,
            strict: self.strict,
        }
    }
}

#[derive(clap::Args)]
struct ConsolidateArgs {
    #[command(flatten)]
    inputs: InputArgs,

    /// Output record file.
    #[arg(default_value = "parking_data.json")]
    output: PathBuf,

    /// Also export the consolidated tables as an Excel workbook.
    #[arg(long)]
    workbook: Option<PathBuf>,
}
