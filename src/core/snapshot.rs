//! Record snapshot - the immutable input to every engine evaluation
//!
//! A snapshot is a point-in-time copy of project and concern records fetched
//! by the caller. The engine never writes to it; loading is the only
//! operation here that can fail.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::records::{ConcernRecord, ProjectRecord};
use crate::yaml::YamlError;

/// Read-only view of the records for one evaluation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,

    #[serde(default)]
    pub concerns: Vec<ConcernRecord>,
}

impl Snapshot {
    /// Load a snapshot from a YAML/JSON file, a CSV project export, or a
    /// directory of YAML fragments (merged in filename order).
    pub fn from_path(path: &Path) -> Result<Self, SnapshotError> {
        if !path.exists() {
            return Err(SnapshotError::NotFound(path.to_path_buf()));
        }
        if path.is_dir() {
            return Self::from_dir(path);
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(crate::yaml::parse_yaml_file(path)?),
            Some("json") => {
                let content = std::fs::read_to_string(path).map_err(|source| {
                    SnapshotError::Io { path: path.to_path_buf(), source }
                })?;
                serde_json::from_str(&content).map_err(|source| SnapshotError::Json {
                    path: path.to_path_buf(),
                    source,
                })
            }
            Some("csv") => Self::from_csv(path),
            _ => Err(SnapshotError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Merge every `.yaml`/`.yml` fragment under a directory.
    ///
    /// Each fragment has the same shape as a full snapshot file; fragments
    /// are visited in sorted filename order so loading is deterministic.
    fn from_dir(dir: &Path) -> Result<Self, SnapshotError> {
        let mut merged = Snapshot::default();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let ext = entry.path().extension().and_then(|e| e.to_str());
            if !matches!(ext, Some("yaml") | Some("yml")) {
                continue;
            }
            let fragment: Snapshot = crate::yaml::parse_yaml_file(entry.path())?;
            merged.projects.extend(fragment.projects);
            merged.concerns.extend(fragment.concerns);
        }

        Ok(merged)
    }

    /// Load projects from a CSV export.
    ///
    /// Column headers follow the record field names (`id`, `title`,
    /// `facility`, `vendor`, `category`, `original_budget`, `current_budget`,
    /// `amount_paid`, `original_start`, `original_end`, `current_end`,
    /// `percent_complete`, `status`, `is_delayed`, `delay_days`,
    /// `is_over_budget`, `budget_variance_pct`, `is_deleted`); dates are
    /// `YYYY-MM-DD` and empty cells become nulls.
    fn from_csv(path: &Path) -> Result<Self, SnapshotError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|source| SnapshotError::Csv { path: path.to_path_buf(), source })?;

        let mut projects = Vec::new();
        for row in reader.deserialize() {
            let project: ProjectRecord =
                row.map_err(|source| SnapshotError::Csv { path: path.to_path_buf(), source })?;
            projects.push(project);
        }

        Ok(Snapshot { projects, concerns: Vec::new() })
    }

    /// Non-deleted projects, the universe for every aggregate
    pub fn projects(&self) -> impl Iterator<Item = &ProjectRecord> {
        self.projects.iter().filter(|p| !p.deleted)
    }

    /// Concerns still open
    pub fn open_concerns(&self) -> impl Iterator<Item = &ConcernRecord> {
        self.concerns.iter().filter(|c| c.is_open())
    }

    pub fn is_empty(&self) -> bool {
        self.projects().next().is_none()
    }
}

/// Errors while loading a snapshot
#[derive(Debug, Error, Diagnostic)]
pub enum SnapshotError {
    #[error("snapshot not found at {0:?}")]
    #[diagnostic(help("pass --snapshot PATH or set snapshot: in capstat.yaml"))]
    NotFound(PathBuf),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON snapshot {path:?}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse CSV export {path:?}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("unsupported snapshot format: {0:?}")]
    #[diagnostic(help("expected a .yaml, .json, or .csv file, or a directory of YAML fragments"))]
    UnsupportedFormat(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SNAPSHOT_YAML: &str = r#"
projects:
  - id: C-1
    title: Gym Floor Replacement
    current_budget: 250000
  - id: C-2
    title: Old Contract
    is_deleted: true
concerns:
  - id: CN-1
    project_id: C-1
    severity: high
"#;

    #[test]
    fn test_load_yaml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.yaml");
        fs::write(&path, SNAPSHOT_YAML).unwrap();

        let snap = Snapshot::from_path(&path).unwrap();
        assert_eq!(snap.projects.len(), 2);
        assert_eq!(snap.projects().count(), 1);
        assert_eq!(snap.open_concerns().count(), 1);
    }

    #[test]
    fn test_load_directory_merges_fragments() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("a.yaml"),
            "projects:\n  - id: C-1\n    title: First\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("b.yml"),
            "projects:\n  - id: C-2\n    title: Second\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let snap = Snapshot::from_path(dir.path()).unwrap();
        assert_eq!(snap.projects.len(), 2);
        assert_eq!(snap.projects[0].id, "C-1");
    }

    #[test]
    fn test_load_csv_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("export.csv");
        fs::write(
            &path,
            "id,title,vendor,category,original_budget,current_budget,status,is_delayed\n\
             C-1,Roof Work,Acme,Roofing,100000,120000,Active,true\n\
             C-2,Paving,,Site Improvements,50000,,active,false\n",
        )
        .unwrap();

        let snap = Snapshot::from_path(&path).unwrap();
        assert_eq!(snap.projects.len(), 2);
        assert_eq!(snap.projects[0].vendor.as_deref(), Some("Acme"));
        assert!(snap.projects[0].delayed);
        assert_eq!(snap.projects[1].current_budget, None);
    }

    #[test]
    fn test_missing_path_errors() {
        let err = Snapshot::from_path(Path::new("/nonexistent/snapshot.yaml")).unwrap_err();
        assert!(matches!(err, SnapshotError::NotFound(_)));
    }

    #[test]
    fn test_unknown_extension_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.xlsx");
        fs::write(&path, "not a spreadsheet").unwrap();

        let err = Snapshot::from_path(&path).unwrap_err();
        assert!(matches!(err, SnapshotError::UnsupportedFormat(_)));
    }
}
