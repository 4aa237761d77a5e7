use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the fleet registry workspace",
    long_about = "Runs the fleet demo, tests, benchmarks and CI checks for the workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the fleet walkthrough on the sample data
    Demo {
        /// Log verbosity passed to the fleet binary (0-3)
        #[arg(long, default_value_t = 0)]
        verbose: u8,
    },
    /// Run every test in the workspace
    Test,
    /// Run Criterion benchmarks
    Bench {
        /// Only run benchmarks whose name contains this filter
        filter: Option<String>,
    },
    /// Run CI checks (fmt, clippy, tests, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Run the demo binary end to end
    Demo,
    /// Compile and run benchmarks
    Bench,
    /// Run check + demo + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn demo_args(verbose: u8) -> Vec<String> {
    let mut args: Vec<String> = ["run", "-p", "fleet_cli", "--bin", "fleet", "--"]
        .map(String::from)
        .to_vec();
    if verbose > 0 {
        args.push(format!("-{}", "v".repeat(usize::from(verbose.min(3)))));
    }
    args.push("demo".to_string());
    args
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test fleet_core");
    run_cargo(&["test", "-p", "fleet_core"]);

    step("Test fleet_cli");
    run_cargo(&["test", "-p", "fleet_cli"]);
}

fn ci_demo() {
    step("Run fleet demo");
    let args = demo_args(0);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    run_cargo(&args);
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(&["bench", "--package", "fleet_core", "--bench", "performance"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { verbose } => {
            let args = demo_args(verbose);
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            run_cargo(&args);
        }
        Commands::Test => {
            run_cargo(&["test", "--workspace"]);
        }
        Commands::Bench { filter } => {
            let mut args = vec!["bench", "--package", "fleet_core", "--bench", "performance"];
            if let Some(filter) = filter.as_deref() {
                args.extend(["--", filter]);
            }
            run_cargo(&args);
        }
        Commands::Ci { job } => match job {
            CiJob::Check => ci_check(),
            CiJob::Demo => ci_demo(),
            CiJob::Bench => ci_bench(),
            CiJob::All => {
                ci_check();
                ci_demo();
                ci_bench();
            }
        },
    }
}
