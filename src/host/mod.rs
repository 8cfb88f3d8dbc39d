//! Host GIS environment abstraction
//!
//! Everything the tools need from the hosting engine (licenses, databases,
//! field listings, the diagnostic channel) goes through the Host trait.

pub(crate) mod local;

use std::path::{Path, PathBuf};

use crate::error::HostError;

pub(crate) use local::LocalHost;

/// The caller-visible diagnostic channel of the host
pub(crate) trait Diagnostics {
    fn add_message(&self, message: &str);
    fn add_warning(&self, message: &str);
    fn add_error(&self, message: &str);
}

/// Which flavour of host the tools are running in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Product {
    Desktop,
    /// Server hosts own the scratch workspace; no local session management
    Server,
}

pub(crate) trait Host: Diagnostics {
    fn product(&self) -> Product;

    fn check_out_extension(&self, name: &str) -> Result<(), HostError>;

    fn exists(&self, path: &Path) -> bool;

    /// Create an empty database named `name` inside `folder`
    fn create_database(&self, folder: &Path, name: &str) -> Result<PathBuf, HostError>;

    /// Scratch database provided by a server host
    fn server_scratch_database(&self) -> Option<PathBuf> {
        None
    }

    /// Drop every dataset held in the transient in-memory workspace
    fn clear_in_memory(&self);

    /// Field names of `dataset` matching the wildcard `pattern`
    fn list_fields(&self, dataset: &Path, pattern: &str) -> Result<Vec<String>, HostError>;
}
