use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use np_plasma::{PlasmaCase, solve_batch};
use np_project::{CaseFile, plasma_case, plasma_settings};
use np_props::Species;
use np_results::{RunManifest, RunRequest, RunStore, RunSummary};

mod error;
mod run;

use error::{CliError, CliResult};
use run::RunResponse;

#[derive(Parser)]
#[command(name = "nanoplasma")]
#[command(about = "Thermal plasma torch and nanoparticle reactor solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate case file syntax and values
    Validate {
        /// Path to the case YAML or JSON file
        case_path: PathBuf,
    },
    /// Solve the radial plasma profiles of a case
    Plasma {
        /// Path to the case YAML or JSON file
        case_path: PathBuf,
        /// Directory to export the profile and property tables to
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// March precursor transport through the reactor cells
    Reactor {
        /// Path to the case YAML or JSON file
        case_path: PathBuf,
        /// End time in seconds (overrides reactor.t_end_s)
        #[arg(long)]
        t_end: Option<f64>,
        /// Directory to export the time series to
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// Solve the plasma sections of several cases in parallel
    Batch {
        /// Case files sharing property tables and solver settings
        #[arg(required = true)]
        case_paths: Vec<PathBuf>,
    },
    /// Print reference data of a species
    Species {
        /// Species symbol or name (e.g. Ar, silicon)
        name: String,
    },
    /// List cached runs of a case
    Runs {
        /// Path to the case YAML or JSON file
        case_path: PathBuf,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Plasma {
            case_path,
            out,
            no_cache,
        } => cmd_plasma(&case_path, out.as_deref(), !no_cache),
        Commands::Reactor {
            case_path,
            t_end,
            out,
            no_cache,
        } => cmd_reactor(&case_path, t_end, out.as_deref(), !no_cache),
        Commands::Batch { case_paths } => cmd_batch(&case_paths),
        Commands::Species { name } => cmd_species(&name),
        Commands::Runs { case_path } => cmd_runs(&case_path),
    }
}

fn cmd_validate(case_path: &Path) -> CliResult<()> {
    println!("Validating case: {}", case_path.display());
    let case = np_project::load(case_path)?;
    if let Some(def) = &case.plasma {
        plasma_case(def)?;
    }
    if let Some(def) = &case.reactor {
        np_project::reactor_setup(def)?;
    }
    println!("✓ Case '{}' is valid", case.name);
    if case.plasma.is_some() {
        println!("  plasma section present");
    }
    if case.reactor.is_some() {
        println!("  reactor section present");
    }
    Ok(())
}

fn print_response(response: &RunResponse) {
    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!(
            "✓ Run completed in {:.2}s: {}",
            response.elapsed_s, response.run_id
        );
    }
    print_summary(&response.manifest.summary);
}

fn print_summary(summary: &RunSummary) {
    match summary {
        RunSummary::Plasma {
            converged,
            power_iterations,
            momentum_iterations,
            field_v_m,
            current_a,
            power_relative_error,
            reference_temperature_k,
            reference_density_kg_m3,
        } => {
            let status = if *converged { "converged" } else { "iteration cap reached" };
            println!("  Status: {}", status);
            println!(
                "  Power iterations: {}  momentum iterations: {}",
                power_iterations, momentum_iterations
            );
            println!("  Field: {:.2} V/m  current: {:.2} A", field_v_m, current_a);
            println!("  Power mismatch: {:.3e}", power_relative_error);
            println!(
                "  Reference density: {:.4} kg/m³ at {:.0} K",
                reference_density_kg_m3, reference_temperature_k
            );
        }
        RunSummary::Reactor {
            reached_end,
            steps,
            time_s,
            inlet_fraction,
        } => {
            let status = if *reached_end { "end time reached" } else { "step cap reached" };
            println!("  Status: {}", status);
            println!("  Steps: {}  time: {:.4e} s", steps, time_s);
            println!("  Inlet precursor fraction: {:.4e}", inlet_fraction);
        }
    }
}

fn cmd_plasma(case_path: &Path, out: Option<&Path>, use_cache: bool) -> CliResult<()> {
    let case = np_project::load(case_path)?;
    println!("Solving plasma profiles for case: {}", case.name);

    let response = run::ensure_plasma_run(case_path, &case, use_cache)?;
    print_response(&response);

    if let Some(dir) = out {
        let store = RunStore::for_case(case_path)?;
        let count = run::export_tables(&store, &response.run_id, dir)?;
        println!("✓ Exported {} tables to {}", count, dir.display());
    }
    Ok(())
}

fn cmd_reactor(
    case_path: &Path,
    t_end: Option<f64>,
    out: Option<&Path>,
    use_cache: bool,
) -> CliResult<()> {
    let case = np_project::load(case_path)?;
    println!("Running reactor transport for case: {}", case.name);

    let response = run::ensure_reactor_run(case_path, &case, t_end, use_cache)?;
    print_response(&response);

    if let Some(dir) = out {
        let store = RunStore::for_case(case_path)?;
        let count = run::export_timeseries(&store, &response.run_id, dir)?;
        println!("✓ Exported {} time points to {}", count, dir.display());
    }
    Ok(())
}

fn cmd_batch(case_paths: &[PathBuf]) -> CliResult<()> {
    let mut loaded: Vec<(&Path, CaseFile, PlasmaCase)> = Vec::with_capacity(case_paths.len());
    for path in case_paths {
        let case = np_project::load(path)?;
        let def = case.plasma.as_ref().ok_or_else(|| CliError::MissingSection {
            case: case.name.clone(),
            section: "plasma",
        })?;
        let plasma = plasma_case(def)?;
        loaded.push((path.as_path(), case, plasma));
    }

    let Some(((first_path, first, _), rest)) = loaded.split_first() else {
        return Err(CliError::InvalidArg {
            what: "no case files given".to_string(),
        });
    };
    let settings = plasma_settings(first.settings.as_ref())?;
    for (path, case, _) in rest {
        if case.property_dir != first.property_dir
            || plasma_settings(case.settings.as_ref())? != settings
        {
            return Err(CliError::InvalidArg {
                what: format!(
                    "{} does not share property tables and settings with {}",
                    path.display(),
                    first_path.display()
                ),
            });
        }
    }
    let library = run::load_library(first_path, first)?;

    println!("Solving {} cases in parallel", loaded.len());
    let cases: Vec<PlasmaCase> = loaded.iter().map(|(_, _, c)| c.clone()).collect();
    let results = solve_batch(&cases, &library, &settings);

    let mut failures = 0;
    for ((path, case, _), result) in loaded.iter().zip(results) {
        match result {
            Ok(solution) => {
                let store = RunStore::for_case(path)?;
                let run_id = run::plasma_run_id(case, &library)?;
                let manifest =
                    run::save_plasma_run(&store, &run_id, case, library.as_ref(), &solution)?;
                let status = if solution.is_converged() { "✓" } else { "~" };
                println!("{} {} -> {}", status, case.name, manifest.run_id);
            }
            Err(e) => {
                failures += 1;
                println!("✗ {}: {}", case.name, e);
            }
        }
    }
    batch_status(failures, loaded.len())
}

/// A batch fails as a whole when any of its cases failed.
fn batch_status(failed: usize, total: usize) -> CliResult<()> {
    if failed > 0 {
        return Err(CliError::BatchFailed { failed, total });
    }
    Ok(())
}

fn cmd_species(name: &str) -> CliResult<()> {
    let species: Species = name.parse()?;
    let fmt_opt = |v: Option<f64>, unit: &str| match v {
        Some(v) => format!("{} {}", v, unit),
        None => "n/a".to_string(),
    };

    println!("{}", species);
    println!("  Molar mass: {} g/mol", species.molar_mass());
    println!("  Particle mass: {:.6e} kg", species.particle_mass());
    println!(
        "  Role: {}",
        if species.is_carrier() { "carrier gas" } else { "precursor" }
    );
    println!(
        "  Bulk density (solid): {}",
        fmt_opt(species.bulk_density_solid(), "kg/m³")
    );
    println!(
        "  Bulk density (liquid): {}",
        fmt_opt(species.bulk_density_liquid(), "kg/m³")
    );
    println!("  Melting point: {}", fmt_opt(species.melting_point(), "K"));
    Ok(())
}

fn cmd_runs(case_path: &Path) -> CliResult<()> {
    let case = np_project::load(case_path)?;
    let store = RunStore::for_case(case_path)?;
    let mut runs: Vec<RunManifest> = store.list_runs(&case.name)?;
    runs.reverse();

    if runs.is_empty() {
        println!("No cached runs found for case: {}", case.name);
    } else {
        println!("Cached runs for case '{}':", case.name);
        for manifest in runs {
            let kind = match manifest.request {
                RunRequest::Plasma => "plasma".to_string(),
                RunRequest::Reactor { t_end_s, .. } => format!("reactor to {t_end_s} s"),
            };
            println!("  {} ({}, {})", manifest.run_id, kind, manifest.timestamp);
        }
    }
    Ok(())
}
