use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use vsc_app::{
    AppError, AppResult, BatchOptions, RunMode, SimulationRequest, SimulationResponse,
    load_inputs, run_batch_file, run_simulation, save_run,
};
use vsc_core::{NewtonOverrides, ResidualNorm};
use vsc_results::{ExportConfig, ExportFormat, RunStore, export_rows};
use vsc_sim::{AdaptiveOptions, IntegratorKind};

#[derive(Parser)]
#[command(name = "vsc-cli")]
#[command(about = "VSC RMS simulator - dq-frame converter dynamics", long_about = None)]
struct Cli {
    /// Log verbosity
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    log_level: LogLevel,
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulation
    Run(RunArgs),
    /// Run the cases of a batch file
    Batch(BatchArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Parameter file (.json, .yaml, .yml)
    #[arg(long)]
    params: PathBuf,
    /// Scenario file (.json, .yaml, .yml)
    #[arg(long)]
    scenario: PathBuf,
    /// End time
    #[arg(long, default_value_t = 1.0)]
    t_end: f64,
    /// Fixed step, or initial step when adaptive
    #[arg(long, default_value_t = 1e-3)]
    dt: f64,
    /// euler, rk1, rk2 or rk4
    #[arg(long, default_value = "euler")]
    integrator: IntegratorKind,

    /// Step-doubling adaptive time stepping
    #[arg(long)]
    adaptive: bool,
    /// Smallest adaptive step [default: dt / 1000]
    #[arg(long, requires = "adaptive")]
    dt_min: Option<f64>,
    /// Largest adaptive step [default: dt]
    #[arg(long, requires = "adaptive")]
    dt_max: Option<f64>,
    /// Local error tolerance of the adaptive stepper
    #[arg(long, requires = "adaptive")]
    tol: Option<f64>,
    /// Budget of adaptive step attempts
    #[arg(long, requires = "adaptive")]
    max_steps: Option<usize>,

    /// Newton tolerance
    #[arg(long)]
    nr_tol: Option<f64>,
    /// Newton iteration budget
    #[arg(long)]
    nr_max_iter: Option<usize>,
    /// Newton residual norm: max or l2
    #[arg(long)]
    nr_norm: Option<ResidualNorm>,
    /// Log every Newton iteration (at debug level)
    #[arg(long)]
    nr_verbose: bool,

    /// Result export format
    #[arg(long, value_enum, default_value_t = ExportArg::None)]
    export: ExportArg,
    /// Export destination, required with --export csv|json
    #[arg(long)]
    output: Option<PathBuf>,
    /// Replace an existing export file
    #[arg(long)]
    overwrite: bool,
    /// Also store the run (manifest + time series) under this directory
    #[arg(long)]
    store: Option<PathBuf>,
}

#[derive(clap::Args)]
struct BatchArgs {
    /// Batch case file (.json, .yaml, .yml)
    #[arg(long)]
    cases: PathBuf,
    /// Run cases on a thread pool
    #[arg(long)]
    parallel: bool,
    /// Worker threads with --parallel (0 = one per CPU)
    #[arg(long, default_value_t = 0)]
    workers: usize,
    /// Write per-case results as JSON here
    #[arg(long)]
    output: Option<PathBuf>,
    /// Replace an existing output file
    #[arg(long)]
    overwrite: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportArg {
    None,
    Csv,
    Json,
}

impl ExportArg {
    fn format(self) -> Option<ExportFormat> {
        match self {
            ExportArg::None => None,
            ExportArg::Csv => Some(ExportFormat::Csv),
            ExportArg::Json => Some(ExportFormat::Json),
        }
    }
}

fn init_logging(level: LogLevel, json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(level))
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_json);

    match cli.command {
        Commands::Run(args) => cmd_run(&args),
        Commands::Batch(args) => cmd_batch(&args),
    }
}

fn cmd_run(args: &RunArgs) -> AppResult<()> {
    let format = args.export.format();
    let output = match (format, &args.output) {
        (Some(_), None) => Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "--output is required when --export is csv or json",
            )
            .exit(),
        (_, output) => output.as_deref(),
    };

    let (params, scenario) = load_inputs(&args.params, &args.scenario)?;
    let request = build_request(args);

    println!(
        "Running {} simulation: t_end = {}, dt = {}, integrator = {}",
        scenario.scenario.mode.name(),
        request.t_end,
        request.mode.initial_dt(),
        request.integrator
    );
    let response = run_simulation(&params, &scenario, &request)?;
    print_summary(&response);

    if let (Some(format), Some(path)) = (format, output) {
        let config = ExportConfig {
            overwrite: args.overwrite,
        };
        export_rows(path, &response.rows(), format, &config)?;
        println!("✓ Exported {} to {}", format, path.display());
    }

    if let Some(dir) = &args.store {
        let store = RunStore::new(dir.clone())?;
        let manifest = save_run(&store, &params, &scenario, &response)?;
        println!("✓ Stored run: {}", manifest.run_id);
    }

    Ok(())
}

fn build_request(args: &RunArgs) -> SimulationRequest {
    let mode = if args.adaptive {
        let mut opts = AdaptiveOptions::new(
            args.dt,
            args.dt_min.unwrap_or(args.dt * 1e-3),
            args.dt_max.unwrap_or(args.dt),
        );
        if let Some(tol) = args.tol {
            opts = opts.with_tol(tol);
        }
        if let Some(max_steps) = args.max_steps {
            opts = opts.with_max_steps(max_steps);
        }
        RunMode::Adaptive(opts)
    } else {
        RunMode::Fixed { dt: args.dt }
    };

    SimulationRequest {
        t_end: args.t_end,
        mode,
        integrator: args.integrator,
        newton: NewtonOverrides {
            tol: args.nr_tol,
            max_iter: args.nr_max_iter,
            norm: args.nr_norm,
            verbose: args.nr_verbose,
        },
    }
}

fn print_summary(response: &SimulationResponse) {
    let trajectory = &response.trajectory;
    println!("✓ Simulation completed in {:.3}s", response.elapsed_s);
    println!("  Samples:  {}", trajectory.len());
    println!("  Attempts: {}", trajectory.attempts);
    if trajectory.newton_unconverged > 0 {
        println!("  Unconverged Newton solves: {}", trajectory.newton_unconverged);
    }
    if let Some(last) = trajectory.last() {
        println!("  Final state at t = {:.6}:", last.t);
        for (name, value) in last.x.entries().into_iter().chain(last.y.entries()) {
            println!("    {:<5} = {:.6}", name, value);
        }
    }
}

fn cmd_batch(args: &BatchArgs) -> AppResult<()> {
    if let Some(path) = &args.output
        && path.exists()
        && !args.overwrite
    {
        return Err(AppError::InvalidInput(format!(
            "output file already exists: {} (use --overwrite)",
            path.display()
        )));
    }

    let options = BatchOptions {
        parallel: args.parallel,
        workers: args.workers,
    };
    let results = run_batch_file(&args.cases, &options)?;

    let failed = results.iter().filter(|r| !r.ok).count();
    println!("Batch: {} cases, {} failed", results.len(), failed);
    for result in &results {
        match &result.error {
            None => println!("  ✓ {}", result.id),
            Some(err) => println!("  ✗ {}: {}", result.id, err),
        }
    }

    if let Some(path) = &args.output {
        write_json(path, &results)?;
        println!("✓ Wrote results to {}", path.display());
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Results(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| AppError::Results(e.to_string()))?;
    Ok(())
}
