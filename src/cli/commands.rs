//! CLI subcommand definitions

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Check licenses and set up the scratch workspace for a tool run
    Init {
        /// Run folder holding progress.xml
        #[arg(long)]
        folder: Option<PathBuf>,
        /// Resume the scratch workspace recorded by the previous run
        #[arg(long, requires = "folder")]
        rerun: bool,
        /// Base scratch path, overriding user settings and config
        #[arg(long, value_name = "DIR")]
        scratch_path: Option<PathBuf>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Print node values from an XML store, one per line
    Read {
        file: PathBuf,
        #[arg(required = true)]
        names: Vec<String>,
        /// Don't report read errors to the diagnostic channel
        #[arg(long)]
        quiet: bool,
    },
    /// Set node values in an XML store (NAME[:LABEL]=VALUE)
    Write {
        file: PathBuf,
        #[arg(required = true, value_name = "NAME[:LABEL]=VALUE")]
        values: Vec<String>,
    },
    /// Show every node of an XML store
    Show {
        file: PathBuf,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Record tool parameters in <folder>/inputs.xml
    Params {
        #[arg(long)]
        folder: PathBuf,
        #[arg(long)]
        tool_name: Option<String>,
        #[arg(value_name = "NAME[:LABEL]=VALUE")]
        params: Vec<String>,
    },
    /// Log a warning to <folder>/warnings.xml
    Warn {
        #[arg(long)]
        folder: PathBuf,
        message: String,
    },
    /// Print free disk space (GB) for the disk holding PATH
    DiskSpace { path: PathBuf },
    /// Print whether DATASET has exactly one field matching FIELD
    CheckField { dataset: PathBuf, field: String },
    /// Remove unlocked stale scratch folders under BASE
    Cleanup {
        base: Option<PathBuf>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Parse True/true/False/false
    ParseBool { value: String },
}
