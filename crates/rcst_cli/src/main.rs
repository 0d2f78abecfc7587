use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use rcst_core::batch::{self, BatchOptions};
use rcst_core::core_api::{BatchSummary, ContainerComponents, CoreError, OperationOutcome};
use rcst_core::operation::OperationList;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Directory holding the .rcst containers to edit.
    #[arg(long = "input-dir", visible_alias = "inputDir", value_name = "DIR")]
    input_dir: PathBuf,
    /// Directory receiving the edited containers. Emptied before the run.
    #[arg(
        long = "output-dir",
        visible_alias = "outputDir",
        value_name = "DIR",
        required_unless_present = "list_components"
    )]
    output_dir: Option<PathBuf>,
    /// JSON file with an `operation_list` array.
    #[arg(
        long = "operation-list",
        visible_alias = "operationList",
        value_name = "FILE",
        required_unless_present = "list_components"
    )]
    operation_list: Option<PathBuf>,
    /// Directory where each container's edited members are also staged.
    #[arg(long = "temp-dir", visible_alias = "tempDir", value_name = "DIR")]
    temp_dir: Option<PathBuf>,
    /// Print the maze components of every input container and exit.
    #[arg(
        long = "list-components",
        conflicts_with_all = ["output_dir", "operation_list", "temp_dir"]
    )]
    list_components: bool,
    #[arg(long)]
    json: bool,
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list_components {
        let listing = batch::list_components(&cli.input_dir)
            .unwrap_or_else(|e| fail("Failed to list components", e));
        if cli.json {
            print_json(&listing);
        } else {
            print_components(&listing);
        }
        return;
    }

    let (Some(output_dir), Some(operation_list)) = (cli.output_dir, cli.operation_list) else {
        eprintln!("--output-dir and --operation-list are required unless --list-components is set");
        process::exit(2);
    };

    let operations = OperationList::load(&operation_list)
        .unwrap_or_else(|e| fail("Failed to load operation list", e));
    if operations.is_empty() {
        info!(path = %operation_list.display(), "operation list holds no applicable operations");
    }

    let options = BatchOptions {
        input_dir: cli.input_dir,
        output_dir,
        temp_dir: cli.temp_dir,
    };
    let summary =
        batch::run_batch(&options, &operations).unwrap_or_else(|e| fail("Batch run failed", e));

    if cli.json {
        print_json(&summary);
    } else {
        print_summary(&summary, &options.output_dir);
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "rcst_core=debug,rcst_batch=debug"
        } else {
            "rcst_core=info,rcst_batch=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
}

fn fail(context: &str, e: CoreError) -> ! {
    error!("{context}: {e}");
    process::exit(1);
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error rendering JSON output: {e}");
            process::exit(1);
        }
    }
}

fn print_summary(summary: &BatchSummary, output_dir: &Path) {
    for report in &summary.containers {
        println!("{}", report.file_name);
        for outcome in &report.outcomes {
            println!("  {}", format_outcome(outcome));
        }
    }

    let missed: usize = summary.containers.iter().map(|r| r.missed().count()).sum();
    println!(
        "Processed {} container(s) into {} ({} operation(s) found nothing, {} skipped)",
        summary.containers.len(),
        output_dir.display(),
        missed,
        summary.skipped_operations
    );
}

fn format_outcome(outcome: &OperationOutcome) -> String {
    let status = if outcome.found { "applied" } else { "not found" };
    match outcome.operation.target() {
        Some(target) => format!("{} {target}: {status}", outcome.operation.type_name()),
        None => format!("{}: {status}", outcome.operation.type_name()),
    }
}

fn print_components(listing: &[ContainerComponents]) {
    for container in listing {
        println!("{}", container.file_name);
        if container.components.is_empty() {
            println!("  (no maze components)");
        }
        for component in &container.components {
            let id = component.id.as_deref().unwrap_or("-");
            let weight = component
                .weight
                .map(|w| w.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  [{}] {} id={} weight={}",
                component.index, component.maze_id, id, weight
            );
        }
    }
}
