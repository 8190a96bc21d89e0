//! Cached execution of plasma and reactor runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use np_plasma::{
    PlasmaOutputs, PlasmaSolution, PlasmaTransportSolver, ThermophysicalPostProcessor,
};
use np_project::{
    CaseFile, PlasmaDef, ReactorDef, SettingsDef, plasma_case, plasma_settings, reactor_setup,
};
use np_props::PropertyLibrary;
use np_reactor::{CoupledReactor, ReactorRecord, ReferenceProfiles};
use np_results::{
    CellSnapshot, RunManifest, RunRequest, RunStore, RunSummary, TimeseriesRecord,
    compute_run_id,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{CliError, CliResult};

pub const SOLVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Step cap for reactor runs whose case gives none.
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

/// Upper bound on the time points kept for one reactor run.
const MAX_TIMESERIES_RECORDS: usize = 2_000;

#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub loaded_from_cache: bool,
    pub elapsed_s: f64,
}

fn resolve(case_path: &Path, relative: &str) -> PathBuf {
    let p = Path::new(relative);
    if p.is_absolute() {
        return p.to_path_buf();
    }
    case_path
        .parent()
        .map(|dir| dir.join(p))
        .unwrap_or_else(|| p.to_path_buf())
}

pub fn load_library(case_path: &Path, case: &CaseFile) -> CliResult<Arc<PropertyLibrary>> {
    let library = match &case.property_dir {
        Some(dir) => PropertyLibrary::from_dir(&resolve(case_path, dir))?,
        None => PropertyLibrary::builtin()?,
    };
    Ok(Arc::new(library))
}

/// What a plasma run reads. The library rows stand in for the table files.
#[derive(Serialize)]
struct PlasmaInputs<'a> {
    case: &'a str,
    plasma: &'a PlasmaDef,
    settings: Option<&'a SettingsDef>,
    tables: Vec<(&'static str, Vec<[f64; 8]>)>,
}

#[derive(Serialize)]
struct ReactorInputs<'a> {
    case: &'a str,
    reactor: &'a ReactorDef,
    profiles: Vec<[f64; 4]>,
}

fn plasma_def(case: &CaseFile) -> CliResult<&PlasmaDef> {
    case.plasma.as_ref().ok_or_else(|| CliError::MissingSection {
        case: case.name.clone(),
        section: "plasma",
    })
}

fn reactor_def(case: &CaseFile) -> CliResult<&ReactorDef> {
    case.reactor.as_ref().ok_or_else(|| CliError::MissingSection {
        case: case.name.clone(),
        section: "reactor",
    })
}

/// Run id of the plasma section of `case` solved against `library`.
pub fn plasma_run_id(case: &CaseFile, library: &PropertyLibrary) -> CliResult<String> {
    let inputs = PlasmaInputs {
        case: &case.name,
        plasma: plasma_def(case)?,
        settings: case.settings.as_ref(),
        tables: library
            .tables()
            .map(|(species, table)| (species.key(), table.rows()))
            .collect(),
    };
    Ok(compute_run_id(&inputs, &RunRequest::Plasma, SOLVER_VERSION))
}

/// Run id of the reactor section of `case` marched over `profiles`.
pub fn reactor_run_id(
    case: &CaseFile,
    profiles: &ReferenceProfiles,
    request: &RunRequest,
) -> CliResult<String> {
    let inputs = ReactorInputs {
        case: &case.name,
        reactor: reactor_def(case)?,
        profiles: profiles.rows(),
    };
    Ok(compute_run_id(&inputs, request, SOLVER_VERSION))
}

fn load_profiles(case_path: &Path, def: &ReactorDef) -> CliResult<Arc<ReferenceProfiles>> {
    let profiles = match &def.profiles {
        Some(path) => ReferenceProfiles::from_csv_path(&resolve(case_path, path))?,
        None => ReferenceProfiles::builtin()?,
    };
    Ok(Arc::new(profiles))
}

fn cached(store: &RunStore, run_id: String, started: Instant) -> CliResult<RunResponse> {
    let manifest = store.load_manifest(&run_id)?;
    info!(run_id = %run_id, "loaded cached run");
    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: true,
        elapsed_s: started.elapsed().as_secs_f64(),
    })
}

pub fn plasma_summary(solution: &PlasmaSolution) -> RunSummary {
    let power = solution.power.state();
    RunSummary::Plasma {
        converged: solution.is_converged(),
        power_iterations: solution.power.iterations(),
        momentum_iterations: solution.momentum.iterations(),
        field_v_m: power.field,
        current_a: power.current,
        power_relative_error: power.relative_error,
        reference_temperature_k: solution.reference_temperature,
        reference_density_kg_m3: solution.reference_density,
    }
}

/// Post-process a solution and write manifest and tables under `run_id`.
pub fn save_plasma_run(
    store: &RunStore,
    run_id: &str,
    case: &CaseFile,
    library: &PropertyLibrary,
    solution: &PlasmaSolution,
) -> CliResult<RunManifest> {
    let report = ThermophysicalPostProcessor::new(library.radiation()).report(solution)?;
    let outputs = PlasmaOutputs::assemble(solution, &report);
    let mut tables = outputs.tables;
    tables.insert("densRef", vec![outputs.reference_density]);

    let manifest = RunManifest::now(
        run_id.to_string(),
        &case.name,
        RunRequest::Plasma,
        plasma_summary(solution),
        SOLVER_VERSION,
    );
    store.save_run(&manifest, &[])?;
    store.save_tables(run_id, &tables)?;
    Ok(manifest)
}

/// Solve the plasma section of `case`, or load it from the run cache.
pub fn ensure_plasma_run(
    case_path: &Path,
    case: &CaseFile,
    use_cache: bool,
) -> CliResult<RunResponse> {
    let started = Instant::now();
    let def = plasma_def(case)?;
    let library = load_library(case_path, case)?;

    let run_id = plasma_run_id(case, &library)?;
    let store = RunStore::for_case(case_path)?;
    if use_cache && store.has_run(&run_id) {
        return cached(&store, run_id, started);
    }

    let mut solver = PlasmaTransportSolver::new(plasma_settings(case.settings.as_ref())?)?;
    solver.set_case(plasma_case(def)?, Arc::clone(&library))?;
    let solution = solver.solve()?;
    if !solution.is_converged() {
        warn!(case = %case.name, "plasma solve stopped at an iteration cap");
    }

    let manifest = save_plasma_run(&store, &run_id, case, &library, &solution)?;
    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        elapsed_s: started.elapsed().as_secs_f64(),
    })
}

pub fn record_to_timeseries(record: &ReactorRecord) -> TimeseriesRecord {
    let cells = record
        .precursor_fraction
        .iter()
        .zip(&record.velocity)
        .zip(&record.temperature)
        .zip(&record.pressure)
        .enumerate()
        .map(|(index, (((&x, &u), &t), &p))| CellSnapshot {
            index,
            precursor_fraction: x,
            velocity_m_s: u,
            temperature_k: t,
            pressure_pa: p,
        })
        .collect();
    TimeseriesRecord {
        time_s: record.time,
        dt_s: record.dt,
        cells,
    }
}

/// Stride between stored time points so a run keeps at most about
/// `MAX_TIMESERIES_RECORDS` of them.
fn record_interval(t_end: f64, dt: f64, max_steps: usize) -> usize {
    let expected = (t_end / dt).ceil();
    let steps = if expected.is_finite() && expected < max_steps as f64 {
        expected as usize
    } else {
        max_steps
    };
    steps.div_ceil(MAX_TIMESERIES_RECORDS).max(1)
}

/// March the reactor section of `case` to `t_end` (the case value when
/// `None`), or load the run from the cache.
pub fn ensure_reactor_run(
    case_path: &Path,
    case: &CaseFile,
    t_end: Option<f64>,
    use_cache: bool,
) -> CliResult<RunResponse> {
    let started = Instant::now();
    let def = reactor_def(case)?;
    let t_end_s = t_end.or(def.t_end_s).ok_or_else(|| CliError::InvalidArg {
        what: "no end time: pass --t-end or set reactor.t_end_s".to_string(),
    })?;
    if !(t_end_s.is_finite() && t_end_s > 0.0) {
        return Err(CliError::InvalidArg {
            what: format!("end time must be positive, got {t_end_s}"),
        });
    }
    let max_steps = def.max_steps.unwrap_or(DEFAULT_MAX_STEPS);
    let request = RunRequest::Reactor { t_end_s, max_steps };

    let profiles = load_profiles(case_path, def)?;
    let run_id = reactor_run_id(case, &profiles, &request)?;
    let store = RunStore::for_case(case_path)?;
    if use_cache && store.has_run(&run_id) {
        return cached(&store, run_id, started);
    }

    let setup = reactor_setup(def)?;
    let reactor = CoupledReactor::new(&setup, profiles)?;
    let interval = record_interval(t_end_s, reactor.solver().dt()?, max_steps);
    let mut reactor = reactor.with_record_interval(interval);
    let outcome = reactor.run_until(t_end_s, max_steps)?;
    if !outcome.is_converged() {
        warn!(
            case = %case.name,
            steps = outcome.iterations(),
            time = *outcome.state(),
            "reactor run stopped at the step cap before the end time"
        );
    }

    let summary = RunSummary::Reactor {
        reached_end: outcome.is_converged(),
        steps: outcome.iterations(),
        time_s: *outcome.state(),
        inlet_fraction: reactor.inlet_fraction(),
    };
    let records: Vec<TimeseriesRecord> =
        reactor.records().iter().map(record_to_timeseries).collect();

    let manifest = RunManifest::now(run_id.clone(), &case.name, request, summary, SOLVER_VERSION);
    store.save_run(&manifest, &records)?;
    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        elapsed_s: started.elapsed().as_secs_f64(),
    })
}

/// Copy the stored tables of a run into `out_dir`, one extensionless file
/// per table.
pub fn export_tables(store: &RunStore, run_id: &str, out_dir: &Path) -> CliResult<usize> {
    fs::create_dir_all(out_dir)?;
    let names = store.list_tables(run_id)?;
    for name in &names {
        let rows = store.load_table(run_id, name)?;
        // densRef is a bare "x value" pair, the profile tables are CSV.
        let sep = if name == "densRef" { " " } else { "," };
        let mut csv = String::new();
        for (x, v) in rows {
            csv.push_str(&format!("{}{}{}\n", x, sep, v));
        }
        fs::write(out_dir.join(name), csv)?;
    }
    Ok(names.len())
}

/// Write the time series of a reactor run into `out_dir/timeseries.csv`.
pub fn export_timeseries(store: &RunStore, run_id: &str, out_dir: &Path) -> CliResult<usize> {
    fs::create_dir_all(out_dir)?;
    let records = store.load_timeseries(run_id)?;
    let mut csv = String::from("time_s,cell,precursor_fraction,velocity_m_s,temperature_k,pressure_pa\n");
    for record in &records {
        for cell in &record.cells {
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                record.time_s,
                cell.index,
                cell.precursor_fraction,
                cell.velocity_m_s,
                cell.temperature_k,
                cell.pressure_pa
            ));
        }
    }
    fs::write(out_dir.join("timeseries.csv"), csv)?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use np_project::CompositionDef;
    use np_props::Species;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("{prefix}_{nanos}"))
    }

    fn argon_case(property_dir: Option<String>) -> CaseFile {
        CaseFile {
            version: np_project::LATEST_VERSION,
            name: "argon".to_string(),
            property_dir,
            plasma: Some(PlasmaDef {
                composition: CompositionDef::Pure {
                    species: "Ar".to_string(),
                },
                input_power_w: 15_000.0,
                flow_rate_slpm: 60.0,
                inlet_radius_m: 0.0065,
            }),
            reactor: None,
            settings: None,
        }
    }

    fn write_table(path: &Path, rows: &[[f64; 8]]) {
        let mut csv = String::from(
            "index,temperature,density,viscosity,thermal_conductivity,\
             electrical_conductivity,enthalpy,heat_capacity\n",
        );
        for row in rows {
            let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            csv.push_str(&fields.join(","));
            csv.push('\n');
        }
        fs::write(path, csv).unwrap();
    }

    #[test]
    fn edited_property_file_changes_plasma_run_id() {
        let dir = unique_temp_dir("np_cli_props");
        fs::create_dir_all(&dir).unwrap();
        let builtin = PropertyLibrary::builtin().unwrap();
        for (species, table) in builtin.tables() {
            let name = format!("{}.csv", species.key().to_lowercase());
            write_table(&dir.join(name), &table.rows());
        }
        let case_path = dir.join("case.yaml");
        let case = argon_case(Some(dir.display().to_string()));

        let library = load_library(&case_path, &case).unwrap();
        let before = plasma_run_id(&case, &library).unwrap();
        assert_eq!(before, plasma_run_id(&case, &builtin).unwrap());

        let mut rows = builtin.table(Species::Ar).unwrap().rows();
        for row in rows.iter_mut() {
            row[2] *= 2.0;
        }
        write_table(&dir.join("ar.csv"), &rows);
        let library = load_library(&case_path, &case).unwrap();
        assert_ne!(plasma_run_id(&case, &library).unwrap(), before);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn plasma_run_id_ignores_reactor_section() {
        let library = PropertyLibrary::builtin().unwrap();
        let plain = argon_case(None);
        let mut with_reactor = plain.clone();
        with_reactor.reactor = Some(ReactorDef {
            n_cells: 100,
            length_m: 0.3,
            precursor: "Si".to_string(),
            feed_rate_kg_s: 1e-6,
            carrier: CompositionDef::Pure {
                species: "Ar".to_string(),
            },
            t_end_s: Some(0.01),
            max_steps: None,
            profiles: None,
        });
        assert_eq!(
            plasma_run_id(&plain, &library).unwrap(),
            plasma_run_id(&with_reactor, &library).unwrap()
        );
        assert!(matches!(
            reactor_run_id(&plain, &ReferenceProfiles::builtin().unwrap(), &RunRequest::Plasma),
            Err(CliError::MissingSection { .. })
        ));
    }

    #[test]
    fn reactor_run_id_follows_profile_data() {
        let mut case = argon_case(None);
        case.reactor = Some(ReactorDef {
            n_cells: 10,
            length_m: 1.0,
            precursor: "Cu".to_string(),
            feed_rate_kg_s: 5e-6,
            carrier: CompositionDef::Pure {
                species: "Ar".to_string(),
            },
            t_end_s: Some(0.05),
            max_steps: None,
            profiles: None,
        });
        let request = RunRequest::Reactor {
            t_end_s: 0.05,
            max_steps: DEFAULT_MAX_STEPS,
        };
        let slow = ReferenceProfiles::from_csv_str("0,10,5000,101325\n2,10,1000,101325\n").unwrap();
        let fast = ReferenceProfiles::from_csv_str("0,20,5000,101325\n2,20,1000,101325\n").unwrap();
        assert_ne!(
            reactor_run_id(&case, &slow, &request).unwrap(),
            reactor_run_id(&case, &fast, &request).unwrap()
        );
    }

    #[test]
    fn record_interval_bounds_stored_time_points() {
        assert_eq!(record_interval(1e-3, 1e-4, DEFAULT_MAX_STEPS), 1);
        let every = record_interval(1.0, 1e-6, DEFAULT_MAX_STEPS);
        assert!(DEFAULT_MAX_STEPS.div_ceil(every) <= MAX_TIMESERIES_RECORDS);
        assert_eq!(record_interval(1.0, 1e-6, 10), 1);
    }

    #[test]
    fn exported_tables_use_comma_except_reference_density() {
        let store = RunStore::new(unique_temp_dir("np_cli_export")).unwrap();
        let summary = RunSummary::Plasma {
            converged: true,
            power_iterations: 1,
            momentum_iterations: 1,
            field_v_m: 1000.0,
            current_a: 200.0,
            power_relative_error: 0.0,
            reference_temperature_k: 300.0,
            reference_density_kg_m3: 1.623,
        };
        let manifest = RunManifest::now("run".to_string(), "argon", RunRequest::Plasma, summary, "v1");
        store.save_run(&manifest, &[]).unwrap();
        let mut tables = np_core::NamedValues::new();
        tables.insert("TR", vec![(0.0, 11000.0), (0.001, 10500.0)]);
        tables.insert("densRef", vec![(300.0, 1.623)]);
        store.save_tables("run", &tables).unwrap();

        let out = unique_temp_dir("np_cli_export_out");
        assert_eq!(export_tables(&store, "run", &out).unwrap(), 2);
        assert_eq!(fs::read_to_string(out.join("TR")).unwrap(), "0,11000\n0.001,10500\n");
        assert_eq!(fs::read_to_string(out.join("densRef")).unwrap(), "300 1.623\n");

        fs::remove_dir_all(&out).ok();
        fs::remove_dir_all(store.root_dir()).ok();
    }

    #[test]
    fn record_conversion_keeps_cell_order() {
        let record = ReactorRecord {
            time: 2e-3,
            dt: 1e-3,
            precursor_fraction: vec![0.01, 0.005],
            velocity: vec![70.0, 71.0],
            temperature: vec![8000.0, 7900.0],
            pressure: vec![101_000.0, 100_900.0],
        };
        let ts = record_to_timeseries(&record);
        assert_eq!(ts.time_s, 2e-3);
        assert_eq!(ts.cells.len(), 2);
        assert_eq!(ts.cells[1].index, 1);
        assert_eq!(ts.cells[1].precursor_fraction, 0.005);
        assert_eq!(ts.cells[1].temperature_k, 7900.0);
    }

    #[test]
    fn relative_paths_resolve_against_case_dir() {
        let case = Path::new("/data/cases/argon.yaml");
        assert_eq!(resolve(case, "props"), PathBuf::from("/data/cases/props"));
        assert_eq!(resolve(case, "/abs/props"), PathBuf::from("/abs/props"));
    }
}
