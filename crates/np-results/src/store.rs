//! Run storage API.
//!
//! Layout under the root directory:
//!
//! ```text
//! <run_id>/manifest.json
//! <run_id>/timeseries.jsonl
//! <run_id>/tables/<name>.csv
//! ```

use crate::types::{RunManifest, Table2, TimeseriesRecord};
use crate::{ResultsError, ResultsResult};
use np_core::lookup::NamedValues;
use std::fs;
use std::path::{Path, PathBuf};

const TABLE_HEADER: &str = "x,value";

#[derive(Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Store next to a case file, in `.nanoplasma/runs`.
    pub fn for_case(case_path: &Path) -> ResultsResult<Self> {
        let case_dir = case_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "case path has no parent directory".to_string(),
            })?;
        let runs_dir = case_dir.join(".nanoplasma").join("runs");
        Self::new(runs_dir)
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join("manifest.json").exists()
    }

    pub fn save_run(
        &self,
        manifest: &RunManifest,
        records: &[TimeseriesRecord],
    ) -> ResultsResult<()> {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        let manifest_path = run_dir.join("manifest.json");
        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(manifest_path, manifest_json)?;

        let timeseries_path = run_dir.join("timeseries.jsonl");
        let mut timeseries_content = String::new();
        for record in records {
            let line = serde_json::to_string(record)?;
            timeseries_content.push_str(&line);
            timeseries_content.push('\n');
        }
        fs::write(timeseries_path, timeseries_content)?;

        Ok(())
    }

    /// Write every table as `tables/<name>.csv`.
    pub fn save_tables(&self, run_id: &str, tables: &NamedValues<Table2>) -> ResultsResult<()> {
        let tables_dir = self.run_dir(run_id).join("tables");
        fs::create_dir_all(&tables_dir)?;

        for (name, rows) in tables.iter() {
            let mut csv = String::from(TABLE_HEADER);
            csv.push('\n');
            for (x, v) in rows {
                csv.push_str(&format!("{},{}\n", x, v));
            }
            fs::write(tables_dir.join(format!("{name}.csv")), csv)?;
        }
        Ok(())
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let manifest_path = self.run_dir(run_id).join("manifest.json");

        if !manifest_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    pub fn load_timeseries(&self, run_id: &str) -> ResultsResult<Vec<TimeseriesRecord>> {
        let timeseries_path = self.run_dir(run_id).join("timeseries.jsonl");

        if !timeseries_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(timeseries_path)?;
        let mut records = Vec::new();
        for line in content.lines() {
            if !line.trim().is_empty() {
                let record: TimeseriesRecord = serde_json::from_str(line)?;
                records.push(record);
            }
        }

        Ok(records)
    }

    /// Names of the stored tables, sorted.
    pub fn list_tables(&self, run_id: &str) -> ResultsResult<Vec<String>> {
        if !self.has_run(run_id) {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        let tables_dir = self.run_dir(run_id).join("tables");
        let mut names = Vec::new();
        if !tables_dir.exists() {
            return Ok(names);
        }
        for entry in fs::read_dir(&tables_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("csv")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn load_table(&self, run_id: &str, name: &str) -> ResultsResult<Table2> {
        let path = self.run_dir(run_id).join("tables").join(format!("{name}.csv"));
        if !path.exists() {
            return Err(ResultsError::TableNotFound {
                run_id: run_id.to_string(),
                name: name.to_string(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let malformed = |message: String| ResultsError::MalformedTable {
            path: path.display().to_string(),
            message,
        };
        let mut rows = Vec::new();
        for (line_no, line) in content.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            let (x, v) = line
                .split_once(',')
                .ok_or_else(|| malformed(format!("line {}: expected two columns", line_no + 1)))?;
            let x: f64 = x
                .trim()
                .parse()
                .map_err(|e| malformed(format!("line {}: {e}", line_no + 1)))?;
            let v: f64 = v
                .trim()
                .parse()
                .map_err(|e| malformed(format!("line {}: {e}", line_no + 1)))?;
            rows.push((x, v));
        }
        Ok(rows)
    }

    pub fn list_runs(&self, case_name: &str) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&run_id)
                    && manifest.case_name == case_name
                {
                    runs.push(manifest);
                }
            }
        }
        runs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}
