//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod report;
pub mod tables;

pub use report::write_report;
pub use tables::{write_combos, write_designs, write_drives, write_reactors};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("filesystem error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Unit used for accelerations in exported tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccelUnit {
    #[default]
    G,
    MilliG,
}

impl AccelUnit {
    pub fn from_milligees_flag(milligees: bool) -> Self {
        if milligees {
            AccelUnit::MilliG
        } else {
            AccelUnit::G
        }
    }

    /// Convert an acceleration in g to this unit.
    pub fn convert(self, accel_g: f64) -> f64 {
        match self {
            AccelUnit::G => accel_g,
            AccelUnit::MilliG => ppp_core::units::g_to_milligees(accel_g),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AccelUnit::G => "g",
            AccelUnit::MilliG => "mg",
        }
    }
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Write `drives.csv`, `reactors.csv`, `combos.csv` and `report.json` into `dir`.
///
/// Returns the written paths.
pub fn export_plan(
    dir: &Path,
    plan: &ppp_planner::PlanReport,
    accel: AccelUnit,
) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir)?;
    let drives = dir.join("drives.csv");
    write_drives(writer_for_path(&drives)?, &plan.drives)?;
    let reactors = dir.join("reactors.csv");
    write_reactors(writer_for_path(&reactors)?, &plan.reactors)?;
    let combos = dir.join("combos.csv");
    write_combos(writer_for_path(&combos)?, &plan.combos, accel)?;
    let report = dir.join("report.json");
    write_report(writer_for_path(&report)?, plan, None)?;
    Ok(vec![drives, reactors, combos, report])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/table.csv");
        {
            let mut writer = writer_for_path(&path).unwrap();
            writeln!(writer, "a,b").unwrap();
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n");
    }

    #[test]
    fn milligee_conversion() {
        assert_eq!(AccelUnit::MilliG.convert(0.05), 50.0);
        assert_eq!(AccelUnit::G.convert(0.05), 0.05);
        assert_eq!(AccelUnit::from_milligees_flag(true).symbol(), "mg");
    }

    #[test]
    fn export_plan_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let written =
            export_plan(dir.path(), &ppp_planner::PlanReport::default(), AccelUnit::G).unwrap();
        assert_eq!(written.len(), 4);
        assert!(written.iter().all(|p| p.is_file()));
    }
}
