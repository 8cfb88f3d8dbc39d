use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid boolean \"{input}\" (expected True, true, False or false)")]
    InvalidBool { input: String },

    #[error("Invalid node assignment \"{input}\" (expected NAME[:LABEL]=VALUE)")]
    InvalidAssignment { input: String },

    #[error("{0}")]
    Xml(#[from] XmlStoreError),

    #[error("{0}")]
    Host(#[from] HostError),

    #[error("{0}")]
    Scratch(#[from] ScratchError),

    #[error("Failed to query free space for {}: {}", .path.display(), .source)]
    DiskSpace {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub(crate) enum XmlStoreError {
    #[error("XML file \"{}\" does not exist or cannot be opened: {}", .path.display(), .source)]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse XML file \"{}\": {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: quick_xml::Error,
    },

    #[error("XML file \"{}\" has no root element", .path.display())]
    MissingRoot { path: PathBuf },

    #[error("XML file \"{}\" ends before its root element is closed", .path.display())]
    Truncated { path: PathBuf },

    #[error("Invalid node name \"{name}\"")]
    InvalidNodeName { name: String },

    #[error("Failed to write XML file \"{}\": {}", .path.display(), .source)]
    Serialize {
        path: PathBuf,
        source: quick_xml::Error,
    },

    #[error("Failed to save XML file \"{}\": {}", .path.display(), .source)]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub(crate) enum HostError {
    #[error("{extension} license not present or could not be checked out")]
    LicenseUnavailable { extension: String },

    #[error("Failed to create database {}: {}", .path.display(), .source)]
    CreateDatabase {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to list fields of {}: {}", .path.display(), .source)]
    ListFields {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid field pattern \"{pattern}\": {source}")]
    FieldPattern {
        pattern: String,
        source: glob::PatternError,
    },
}

#[derive(Debug, Error)]
pub(crate) enum ScratchError {
    #[error("Previous scratch GDB {} does not exist. Tool cannot be rerun.", .path.display())]
    PreviousScratchMissing { path: PathBuf },

    #[error("Failed to create {}: {}", .path.display(), .source)]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Xml(#[from] XmlStoreError),

    #[error("{0}")]
    Host(#[from] HostError),
}

impl ScratchError {
    /// Errors that end the tool run
    pub(crate) fn is_fatal(&self) -> bool {
        matches!(self, ScratchError::PreviousScratchMissing { .. })
    }
}
