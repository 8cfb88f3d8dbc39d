//! Filesystem-backed host
//!
//! Databases are plain directories, datasets are delimited text files whose
//! header line names the fields, and diagnostics go to stderr.

use std::cell::RefCell;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use serde::Serialize;

use crate::error::HostError;

use super::{Diagnostics, Host, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum DiagnosticLevel {
    Message,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Diagnostic {
    pub(crate) level: DiagnosticLevel,
    pub(crate) message: String,
}

pub(crate) struct LocalHost {
    extensions: Vec<String>,
    server_scratch: Option<PathBuf>,
    echo: bool,
    in_memory: RefCell<Vec<String>>,
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl LocalHost {
    pub(crate) fn new(extensions: Vec<String>) -> Self {
        Self {
            extensions,
            server_scratch: None,
            echo: true,
            in_memory: RefCell::new(Vec::new()),
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Act as a server host that owns the scratch database at `path`
    pub(crate) fn with_server_scratch(mut self, path: PathBuf) -> Self {
        self.server_scratch = Some(path);
        self
    }

    /// Record diagnostics without echoing them to stderr
    #[cfg(test)]
    pub(crate) fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    pub(crate) fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    #[cfg(test)]
    pub(crate) fn stage_in_memory(&self, name: &str) {
        self.in_memory.borrow_mut().push(name.to_string());
    }

    #[cfg(test)]
    pub(crate) fn in_memory_count(&self) -> usize {
        self.in_memory.borrow().len()
    }

    fn push(&self, level: DiagnosticLevel, message: &str) {
        if self.echo {
            match level {
                DiagnosticLevel::Message => eprintln!("{message}"),
                DiagnosticLevel::Warning => eprintln!("WARNING: {message}"),
                DiagnosticLevel::Error => eprintln!("ERROR: {message}"),
            }
        }
        self.diagnostics.borrow_mut().push(Diagnostic {
            level,
            message: message.to_string(),
        });
    }
}

impl Diagnostics for LocalHost {
    fn add_message(&self, message: &str) {
        self.push(DiagnosticLevel::Message, message);
    }

    fn add_warning(&self, message: &str) {
        self.push(DiagnosticLevel::Warning, message);
    }

    fn add_error(&self, message: &str) {
        self.push(DiagnosticLevel::Error, message);
    }
}

impl Host for LocalHost {
    fn product(&self) -> Product {
        if self.server_scratch.is_some() {
            Product::Server
        } else {
            Product::Desktop
        }
    }

    fn server_scratch_database(&self) -> Option<PathBuf> {
        self.server_scratch.clone()
    }

    fn check_out_extension(&self, name: &str) -> Result<(), HostError> {
        if self.extensions.iter().any(|e| e.eq_ignore_ascii_case(name)) {
            tracing::debug!(extension = name, "extension checked out");
            Ok(())
        } else {
            Err(HostError::LicenseUnavailable {
                extension: name.to_string(),
            })
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_database(&self, folder: &Path, name: &str) -> Result<PathBuf, HostError> {
        let path = folder.join(name);
        std::fs::create_dir_all(&path).map_err(|source| HostError::CreateDatabase {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    fn clear_in_memory(&self) {
        self.in_memory.borrow_mut().clear();
    }

    fn list_fields(&self, dataset: &Path, pattern: &str) -> Result<Vec<String>, HostError> {
        let list_err = |source: std::io::Error| HostError::ListFields {
            path: dataset.to_path_buf(),
            source,
        };

        let pattern = if pattern.is_empty() { "*" } else { pattern };
        let matcher = Pattern::new(pattern).map_err(|source| HostError::FieldPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let options = MatchOptions {
            case_sensitive: false,
            ..MatchOptions::default()
        };

        let file = File::open(dataset).map_err(list_err)?;
        let mut header = String::new();
        BufReader::new(file)
            .read_line(&mut header)
            .map_err(list_err)?;

        let header = header.trim_end_matches(['\r', '\n']);
        let delimiter = if header.contains('\t') { '\t' } else { ',' };

        Ok(header
            .split(delimiter)
            .map(|f| f.trim().trim_matches('"').to_string())
            .filter(|f| !f.is_empty() && matcher.matches_with(f, options))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> LocalHost {
        LocalHost::new(vec!["Spatial".to_string()]).quiet()
    }

    #[test]
    fn test_check_out_extension() {
        let host = host();
        assert!(host.check_out_extension("spatial").is_ok());
        assert!(matches!(
            host.check_out_extension("Network"),
            Err(HostError::LicenseUnavailable { .. })
        ));
    }

    #[test]
    fn test_create_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = host().create_database(dir.path(), "scratch.gdb").unwrap();
        assert!(db.is_dir());
        assert_eq!(db, dir.path().join("scratch.gdb"));
    }

    #[test]
    fn test_list_fields_matches_wildcards() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("soils.csv");
        std::fs::write(&dataset, "\"OBJECTID\",Clay,clay_pct,Sand\n1,2,3,4\n").unwrap();

        let host = host();
        let all = host.list_fields(&dataset, "").unwrap();
        assert_eq!(all, vec!["OBJECTID", "Clay", "clay_pct", "Sand"]);

        let clay = host.list_fields(&dataset, "clay").unwrap();
        assert_eq!(clay, vec!["Clay"]);

        let prefixed = host.list_fields(&dataset, "clay*").unwrap();
        assert_eq!(prefixed, vec!["Clay", "clay_pct"]);
    }

    #[test]
    fn test_list_fields_tab_delimited() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("points.txt");
        std::fs::write(&dataset, "X\tY\tZ\r\n").unwrap();
        assert_eq!(host().list_fields(&dataset, "*").unwrap(), vec!["X", "Y", "Z"]);
    }

    #[test]
    fn test_list_fields_missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let err = host()
            .list_fields(&dir.path().join("nope.csv"), "*")
            .unwrap_err();
        assert!(matches!(err, HostError::ListFields { .. }));
    }

    #[test]
    fn test_diagnostics_recorded() {
        let host = host();
        host.add_warning("low disk");
        host.add_error("broken");
        let diags = host.diagnostics();
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].level, DiagnosticLevel::Warning);
        assert_eq!(diags[1].message, "broken");
    }

    #[test]
    fn test_clear_in_memory() {
        let host = host();
        host.stage_in_memory("slope_tmp");
        host.stage_in_memory("aspect_tmp");
        host.clear_in_memory();
        assert_eq!(host.in_memory_count(), 0);
    }
}
