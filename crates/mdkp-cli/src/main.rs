use clap::{Parser, Subcommand};
use mdkp_solver::{ConstructionStrategy, Instance, RepairPolicy, SolveResult, Solver, SolverOptions, Summary};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser)]
#[command(name = "mdkp")]
#[command(about = "Greedy construction and repair heuristics for multidimensional knapsack instances", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an instance file and print the instances
    Parse {
        /// The instance file
        file: PathBuf,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Solve every instance in a file
    Solve {
        /// The instance file
        file: PathBuf,
        /// Initial selection (ratio, random, all)
        #[arg(short, long, default_value = "ratio")]
        construction: ConstructionStrategy,
        /// Repair policy (worst-ratio, reverse-rank)
        #[arg(short, long, default_value = "worst-ratio")]
        repair: RepairPolicy,
        /// Seed for the random construction
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
        /// Print the 0/1 selection of every instance
        #[arg(long)]
        show_selection: bool,
    },
    /// Check an instance file for errors
    Check {
        /// The file to check
        file: PathBuf,
    },
}

#[derive(serde::Serialize)]
struct SolveReport<'a> {
    options: &'a SolverOptions,
    instances: Vec<InstanceReport>,
    summary: Summary,
}

#[derive(serde::Serialize)]
struct InstanceReport {
    selection: Vec<u8>,
    majorant_value: f64,
    gap: f64,
    resolution_time_ms: f64,
    removed: usize,
}

impl From<&SolveResult> for InstanceReport {
    fn from(result: &SolveResult) -> Self {
        Self {
            selection: result.selection.to_bits(),
            majorant_value: result.majorant_value,
            gap: result.gap,
            resolution_time_ms: millis(result.resolution_time),
            removed: result.removed,
        }
    }
}

fn millis(duration: std::time::Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mdkp_cli={level},mdkp_solver={level},mdkp_format={level}")));

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn read_instances(file: &Path) -> Vec<Instance> {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };

    match mdkp_format::Parser::parse(&source) {
        Ok(instances) => instances,
        Err(e) => {
            eprintln!("Format error: {}", e);
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Parse { file, format } => {
            let instances = read_instances(&file);
            if format == "json" {
                match serde_json::to_string_pretty(&instances) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing instances: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                println!("{:#?}", instances);
            }
        }
        Commands::Solve {
            file,
            construction,
            repair,
            seed,
            format,
            show_selection,
        } => {
            let instances = read_instances(&file);

            for (index, instance) in instances.iter().enumerate() {
                let free = instance.zero_footprint_projects();
                if !free.is_empty() {
                    warn!(instance = index + 1, projects = ?free, "zero-footprint projects rank last and are removed first");
                }
            }

            let options = SolverOptions {
                construction,
                repair,
                seed,
            };
            let mut solver = Solver::with_options(options);
            let results = solver.solve_all(&instances);
            let summary = Summary::from_results(&results);

            if format == "json" {
                let report = SolveReport {
                    options: solver.options(),
                    instances: results.iter().map(InstanceReport::from).collect(),
                    summary,
                };
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing results: {}", e);
                        std::process::exit(1);
                    }
                }
                return;
            }

            println!("File: {}", file.display());
            println!("Construction: {:?}, repair: {:?}, seed: {}", construction, repair, seed);
            println!();

            for (index, (instance, result)) in instances.iter().zip(&results).enumerate() {
                println!(
                    "Instance {} ({} projects, {} resources)",
                    index + 1,
                    instance.num_projects(),
                    instance.num_resources()
                );
                println!("  Value:    {:.2}", result.majorant_value);
                println!("  Optimum:  {:.2}", instance.optimal_value());
                println!("  Gap:      {:.2}", result.gap);
                println!("  Selected: {}/{}", result.selection.count(), instance.num_projects());
                println!("  Removed:  {}", result.removed);
                println!("  Time:     {:.3} ms", millis(result.resolution_time));
                if show_selection {
                    let bits: Vec<String> = result.selection.to_bits().iter().map(|b| b.to_string()).collect();
                    println!("  Selection: {}", bits.join(" "));
                }
            }

            println!();
            println!("Summary:");
            println!("  Instances:   {}", summary.instances);
            println!("  Total value: {:.2}", summary.total_value);
            println!("  Mean gap:    {:.2}", summary.mean_gap);
            println!("  Total time:  {:.3} ms", millis(summary.total_time));
        }
        Commands::Check { file } => {
            let instances = read_instances(&file);

            println!("✓ {} is valid", file.display());
            println!("  {} instances", instances.len());
            for (index, instance) in instances.iter().enumerate() {
                let free = instance.zero_footprint_projects();
                print!(
                    "  #{}: {} projects, {} resources, optimum {}",
                    index + 1,
                    instance.num_projects(),
                    instance.num_resources(),
                    instance.optimal_value()
                );
                if free.is_empty() {
                    println!();
                } else {
                    println!(" ({} zero-footprint projects)", free.len());
                }
            }
        }
    }
}
