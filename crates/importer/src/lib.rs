//! Game template import utilities.
//!
//! Reads the drive, power plant and research project templates shipped with the game and
//! turns them into clean [`Drive`]/[`Reactor`] records. Missing or malformed numeric fields
//! are coerced to zero so the analysis never sees invalid input.

mod projects;
mod templates;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ppp_propulsion::{Drive, Reactor};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

pub use projects::{ProjectGraph, ProjectNode};
pub use templates::{
    detect_backup_field, detect_required_class_field, parse_drives, parse_reactors,
};

pub const DRIVE_TEMPLATE: &str = "TIDriveTemplate.json";
pub const REACTOR_TEMPLATE: &str = "TIPowerPlantTemplate.json";
pub const PROJECT_TEMPLATE: &str = "TIProjectTemplate.json";
/// Environment variable naming the folder that holds the templates.
pub const TEMPLATES_DIR_ENV: &str = "TI_TEMPLATES_DIR";
pub const DEFAULT_GAME_DIR: &str = r"C:\Program Files (x86)\Steam\steamapps\common\Terra Invicta";

/// A JSON template entry.
pub type Entry = Map<String, Value>;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not find {filename}; searched {}", display_paths(.searched))]
    MissingTemplate {
        filename: String,
        searched: Vec<PathBuf>,
    },
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid template JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("template {0} is not a JSON array")]
    NotAnArray(PathBuf),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ordered list of folders searched for template files.
#[derive(Debug, Clone)]
pub struct TemplateLocator {
    search_dirs: Vec<PathBuf>,
}

impl TemplateLocator {
    /// Search `explicit` (if given), then `TI_TEMPLATES_DIR`, then the default Steam install,
    /// then the current directory.
    pub fn new(explicit: Option<&Path>) -> Self {
        let mut dirs = Vec::new();
        if let Some(dir) = explicit {
            dirs.push(dir.to_path_buf());
        }
        if let Some(env_dir) = std::env::var_os(TEMPLATES_DIR_ENV) {
            if !env_dir.is_empty() {
                dirs.push(PathBuf::from(env_dir));
            }
        }
        dirs.push(
            Path::new(DEFAULT_GAME_DIR)
                .join("TerraInvicta_Data")
                .join("StreamingAssets")
                .join("Templates"),
        );
        if let Ok(cwd) = std::env::current_dir() {
            dirs.push(cwd);
        }
        Self { search_dirs: dirs }
    }

    /// Search exactly the given folders.
    pub fn from_dirs(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    pub fn candidates(&self, filename: &str) -> Vec<PathBuf> {
        self.search_dirs.iter().map(|d| d.join(filename)).collect()
    }

    pub fn locate(&self, filename: &str) -> Result<PathBuf, ImportError> {
        let candidates = self.candidates(filename);
        match candidates.iter().find(|p| p.is_file()) {
            Some(path) => Ok(path.clone()),
            None => Err(ImportError::MissingTemplate {
                filename: filename.to_string(),
                searched: candidates,
            }),
        }
    }
}

/// Read a template file as a list of object entries. Non-object entries are skipped.
pub fn read_entries(path: &Path) -> Result<Vec<Entry>, ImportError> {
    let reader = BufReader::new(File::open(path)?);
    let value: Value = serde_json::from_reader(reader)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray(path.to_path_buf()));
    };
    let total = items.len();
    let entries: Vec<Entry> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect();
    if entries.len() != total {
        warn!(
            target: "ppp.importer",
            path = %path.display(),
            skipped = total - entries.len(),
            "non-object template entries skipped"
        );
    }
    Ok(entries)
}

/// Fully loaded game catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub drives: Vec<Drive>,
    pub reactors: Vec<Reactor>,
    pub projects: ProjectGraph,
}

impl Catalog {
    /// Load every template the locator can find. The project template is optional; without it
    /// unlock costs stay at zero.
    pub fn load(locator: &TemplateLocator) -> Result<Self, ImportError> {
        let projects = match locator.locate(PROJECT_TEMPLATE) {
            Ok(path) => ProjectGraph::from_entries(&read_entries(&path)?),
            Err(err @ ImportError::MissingTemplate { .. }) => {
                warn!(target: "ppp.importer", %err, "research costs unavailable");
                ProjectGraph::default()
            }
            Err(err) => return Err(err),
        };
        let costs = projects.total_costs();

        let reactor_entries = read_entries(&locator.locate(REACTOR_TEMPLATE)?)?;
        let reactors = parse_reactors(&reactor_entries, &costs);

        let classes = reactor_classes(&reactors);
        let drive_entries = read_entries(&locator.locate(DRIVE_TEMPLATE)?)?;
        let drives = parse_drives(&drive_entries, &classes, &costs);

        debug!(
            target: "ppp.importer",
            drives = drives.len(),
            reactors = reactors.len(),
            projects = projects.len(),
            "catalog loaded"
        );

        Ok(Self {
            drives,
            reactors,
            projects,
        })
    }

    /// Sorted, de-duplicated drive family names.
    pub fn drive_families(&self) -> Vec<String> {
        sorted_unique(self.drives.iter().map(|d| d.family.as_str()))
    }

    /// Sorted, de-duplicated reactor names.
    pub fn reactor_names(&self) -> Vec<String> {
        sorted_unique(self.reactors.iter().map(|r| r.name.as_str()))
    }
}

fn reactor_classes(reactors: &[Reactor]) -> Vec<String> {
    let mut classes: Vec<String> = Vec::new();
    for reactor in reactors {
        let class = reactor.class.trim();
        if !class.is_empty() && !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }
    classes
}

fn sorted_unique<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = names.map(str::to_string).collect();
    out.sort();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn locate_reports_every_searched_path() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let locator = TemplateLocator::from_dirs(vec![a.path().into(), b.path().into()]);
        match locator.locate(DRIVE_TEMPLATE) {
            Err(ImportError::MissingTemplate { searched, .. }) => assert_eq!(searched.len(), 2),
            other => panic!("expected missing template, got {other:?}"),
        }

        fs::write(b.path().join(DRIVE_TEMPLATE), "[]").unwrap();
        let found = locator.locate(DRIVE_TEMPLATE).unwrap();
        assert_eq!(found, b.path().join(DRIVE_TEMPLATE));
    }

    #[test]
    fn read_entries_requires_an_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"dataName": "x"}"#).unwrap();
        assert!(matches!(read_entries(&path), Err(ImportError::NotAnArray(_))));

        fs::write(&path, r#"[{"dataName": "x"}, 3, null]"#).unwrap();
        assert_eq!(read_entries(&path).unwrap().len(), 1);
    }

    #[test]
    fn catalog_loads_without_project_template() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(REACTOR_TEMPLATE),
            r#"[{"dataName": "Pile", "powerPlantClass": "Fission_Pile", "maxOutput_GW": 1}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(DRIVE_TEMPLATE),
            r#"[{"friendlyName": "Jet x1", "thrust_N": 100, "EV_kps": 10},
                {"friendlyName": "Jet x2", "thrust_N": 200, "EV_kps": 10}]"#,
        )
        .unwrap();
        let catalog = Catalog::load(&TemplateLocator::from_dirs(vec![dir.path().into()])).unwrap();
        assert_eq!(catalog.drive_families(), vec!["Jet"]);
        assert_eq!(catalog.reactor_names(), vec!["Pile"]);
        assert!(catalog.projects.is_empty());
    }
}
