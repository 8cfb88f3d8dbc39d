//! Per-run records kept next to a tool's outputs
//!
//! Invocation parameters go to `inputs.xml`, warnings to `warnings.xml` and
//! the scratch session of the run to `progress.xml`.

pub(crate) mod files;
pub(crate) mod params;
pub(crate) mod warnings;

pub(crate) use files::ProgressFiles;
pub(crate) use params::{ToolParam, params_as_text, write_params};
pub(crate) use warnings::log_warning;
