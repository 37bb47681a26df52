use clap::{Parser, Subcommand};
use pf_core::units::{m, m3ps, mps};
use pf_hydraulics::{
    FlowState, HydraulicsError, KnownQuantities, PipeGeometry, SolverConfig, materials,
    solve_with_config,
};
use pf_project::{ProjectError, load_case, resolve_roughness, solve_case};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "pf-cli")]
#[command(about = "PipeFlow CLI - pipe friction and head-loss calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a single pipe from command-line values
    Solve(SolveArgs),
    /// Solve a case file (YAML or JSON)
    Run {
        /// Path to the case file
        case_path: PathBuf,
    },
    /// Validate case file syntax and values
    Validate {
        /// Path to the case file
        case_path: PathBuf,
    },
    /// List pipe materials and their roughness
    Materials,
}

#[derive(clap::Args, Debug)]
struct SolveArgs {
    /// Pipe material (steel, cast iron, concrete, PVC, copper tubing)
    #[arg(long, conflicts_with = "roughness", required_unless_present = "roughness")]
    material: Option<String>,
    /// Absolute roughness in meters, instead of a material
    #[arg(long)]
    roughness: Option<f64>,
    /// Pipe length in meters
    #[arg(long)]
    length: f64,
    /// Inner diameter in meters
    #[arg(long)]
    diameter: f64,
    /// Mean velocity in m/s
    #[arg(long)]
    velocity: Option<f64>,
    /// Volumetric flow rate in m3/s
    #[arg(long)]
    flow_rate: Option<f64>,
    /// Frictional head loss in meters
    #[arg(long)]
    head_loss: Option<f64>,
    /// Report an approximate result instead of failing when iteration caps are hit
    #[arg(long)]
    accept_unconverged: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Hydraulics(#[from] HydraulicsError),

    #[error(transparent)]
    Project(#[from] ProjectError),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    // Initialize tracing (RUST_LOG controls the level)
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve(args) => cmd_solve(&args),
        Commands::Run { case_path } => cmd_run(&case_path),
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Materials => {
            cmd_materials();
            Ok(())
        }
    }
}

fn cmd_solve(args: &SolveArgs) -> CliResult<()> {
    let (geometry, known, config) = inputs_from_args(args)?;
    let state = solve_with_config(&geometry, &known, &config)?;
    print_flow_state(&state);
    Ok(())
}

fn cmd_run(case_path: &Path) -> CliResult<()> {
    let case = load_case(case_path)?;
    tracing::info!(path = %case_path.display(), case = %case.name, "loaded case");
    println!("Case: {}", case.name);
    let state = solve_case(&case)?;
    print_flow_state(&state);
    Ok(())
}

fn cmd_validate(case_path: &Path) -> CliResult<()> {
    println!("Validating case: {}", case_path.display());
    // load_case rejects invalid cases
    load_case(case_path)?;
    println!("✓ Case is valid");
    Ok(())
}

fn cmd_materials() {
    println!("{:<16} {:>14}", "material", "roughness (m)");
    for entry in materials() {
        println!("{:<16} {:>14.7}", entry.name, entry.roughness_m);
    }
}

fn inputs_from_args(
    args: &SolveArgs,
) -> CliResult<(PipeGeometry, KnownQuantities, SolverConfig)> {
    let roughness = resolve_roughness(args.material.as_deref(), args.roughness)?;
    let geometry = PipeGeometry::new(m(args.length), m(args.diameter), roughness)?;

    let known = KnownQuantities {
        velocity: args.velocity.map(mps),
        flow_rate: args.flow_rate.map(m3ps),
        head_loss: args.head_loss.map(m),
    };

    let config = SolverConfig {
        accept_unconverged: args.accept_unconverged,
        ..SolverConfig::default()
    };

    Ok((geometry, known, config))
}

fn print_flow_state(state: &FlowState) {
    println!("\nResults ({} path):", state.path.label());
    println!("  Velocity (m/s):      {:.4}", state.velocity.value);
    println!("  Flow rate (m³/s):    {:.6}", state.flow_rate.value);
    println!("  Head loss (m):       {:.4}", state.head_loss.value);
    println!("  Reynolds number:     {:.2}", state.reynolds);
    println!("  Friction factor:     {:.5}", state.friction_factor);
    println!("  Regime:              {}", state.regime);
    println!("  Pressure drop (Pa):  {:.1}", state.pressure_drop.value);

    let c = &state.convergence;
    if c.converged {
        println!(
            "✓ Converged (outer iterations: {}, friction iterations: {}, residual: {:.3e})",
            c.outer_iterations, c.friction_iterations, c.residual
        );
    } else {
        println!(
            "! Not converged: result is approximate (outer iterations: {}, residual: {:.3e})",
            c.outer_iterations, c.residual
        );
    }
}
