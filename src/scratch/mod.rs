//! Scratch workspace lifecycle
//!
//! Establishes the one scratch database a tool run works in: either the
//! database recorded by a previous run (rerun) or a fresh timestamped session
//! created after clearing out unlocked stale sessions.

pub(crate) mod cleanup;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::config::Config;
use crate::consts::{
    REQUIRED_EXTENSION, SCRATCH_DB_NAME, SCRATCH_FOLDER_NAME, SCRATCH_GDB_NODE,
    SCRATCH_PATH_NODE, SESSION_PREFIX,
};
use crate::error::ScratchError;
use crate::host::{Host, Product};
use crate::records::ProgressFiles;
use crate::utils::{free_disk_space_gb, run_stamp};
use crate::xml::{NodeValue, read_value, write_values};

pub(crate) use cleanup::{CleanupReport, cleanup_stale_sessions};

/// Workspace settings a tool run operates under
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub(crate) struct Environment {
    pub(crate) overwrite_output: bool,
    pub(crate) workspace: Option<PathBuf>,
    pub(crate) scratch_workspace: Option<PathBuf>,
    pub(crate) scratch_folder: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum SessionOrigin {
    Fresh,
    Resumed,
    Server,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SessionRequest<'a> {
    /// Folder holding the run's record files
    pub(crate) folder: Option<&'a Path>,
    pub(crate) rerun: bool,
    /// Base path forced by the caller, bypassing user settings
    pub(crate) scratch_path: Option<&'a Path>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SystemCheck {
    pub(crate) environment: Environment,
    pub(crate) origin: SessionOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) cleanup: Option<CleanupReport>,
    pub(crate) free_space_gb: Option<f64>,
    pub(crate) low_disk_space: bool,
}

/// Check licenses, establish the scratch workspace and check its disk space
pub(crate) fn run_system_checks(
    host: &dyn Host,
    config: &Config,
    request: &SessionRequest<'_>,
) -> Result<SystemCheck, ScratchError> {
    let mut environment = Environment {
        overwrite_output: true,
        ..Environment::default()
    };

    host.check_out_extension(REQUIRED_EXTENSION)?;

    let mut cleanup = None;
    let origin = if host.product() == Product::Server {
        let scratch = host.server_scratch_database();
        if let Some(path) = &scratch {
            host.add_message(&format!("Scratch workspace on server: {}", path.display()));
        }
        environment.workspace = scratch.clone();
        environment.scratch_workspace = scratch;
        SessionOrigin::Server
    } else {
        let resumed = match (request.rerun, request.folder) {
            (true, Some(folder)) => resume_scratch(host, folder)?,
            _ => None,
        };

        let (database, origin) = match resumed {
            Some(database) => (database, SessionOrigin::Resumed),
            None => {
                let base = resolve_base_path(config, request.scratch_path);
                create_dir(&base)?;
                cleanup = Some(cleanup_stale_sessions(&base));
                let database = create_session(host, &base, Local::now())?;
                remove_old_scratch_path(config, &base);
                if let Some(folder) = request.folder {
                    record_scratch(folder, &database)?;
                }
                (database, SessionOrigin::Fresh)
            }
        };

        let scratch_folder = database
            .parent()
            .map(|p| p.join(SCRATCH_FOLDER_NAME))
            .unwrap_or_else(|| PathBuf::from(SCRATCH_FOLDER_NAME));
        create_dir(&scratch_folder)?;

        environment.scratch_workspace = Some(database.clone());
        environment.workspace = Some(database);
        environment.scratch_folder = Some(scratch_folder);

        host.clear_in_memory();
        origin
    };

    let (free_space_gb, low_disk_space) = match &environment.scratch_workspace {
        Some(workspace) => check_disk_space(host, workspace, config.free_space_threshold_gb),
        None => (None, false),
    };

    Ok(SystemCheck {
        environment,
        origin,
        cleanup,
        free_space_gb,
        low_disk_space,
    })
}

/// The scratch database recorded by a previous run, if there is a record
fn resume_scratch(host: &dyn Host, folder: &Path) -> Result<Option<PathBuf>, ScratchError> {
    let xml_file = ProgressFiles::in_folder(folder).xml_file;
    if !xml_file.exists() {
        return Ok(None);
    }

    let recorded = PathBuf::from(read_value(&xml_file, SCRATCH_GDB_NODE, Some(host))?);
    if recorded.as_os_str().is_empty() || !host.exists(&recorded) {
        host.add_error(&format!(
            "Previous scratch GDB {} does not exist. Tool cannot be rerun.",
            recorded.display()
        ));
        host.add_error("Exiting tool");
        return Err(ScratchError::PreviousScratchMissing { path: recorded });
    }

    tracing::info!(scratch = %recorded.display(), "resuming previous scratch workspace");
    Ok(Some(recorded))
}

/// Base scratch path: caller override, then user settings, then config
fn resolve_base_path(config: &Config, forced: Option<&Path>) -> PathBuf {
    if let Some(path) = forced {
        return path.to_path_buf();
    }

    let settings = &config.user_settings_file;
    if settings.exists() {
        match read_value(settings, SCRATCH_PATH_NODE, None) {
            Ok(path) if !path.trim().is_empty() => return PathBuf::from(path.trim()),
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unreadable user settings");
            }
        }
    }

    config.scratch_path.clone()
}

/// Create `scratch_<stamp>` under `base` with an empty database inside
fn create_session(
    host: &dyn Host,
    base: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf, ScratchError> {
    let session = base.join(format!("{SESSION_PREFIX}{}", run_stamp(now)));
    create_dir(&session)?;

    let database = session.join(SCRATCH_DB_NAME);
    if host.exists(&database) {
        return Ok(database);
    }
    Ok(host.create_database(&session, SCRATCH_DB_NAME)?)
}

/// Remove the legacy scratch location unless it overlaps the active base path
fn remove_old_scratch_path(config: &Config, base: &Path) {
    if let Some(old) = &config.old_scratch_path
        && old.exists()
    {
        let old_real = fs::canonicalize(old).unwrap_or_else(|_| old.clone());
        let base_real = fs::canonicalize(base).unwrap_or_else(|_| base.to_path_buf());
        if base_real.starts_with(&old_real) || old_real.starts_with(&base_real) {
            tracing::debug!(path = %old.display(), "old scratch path overlaps active base, kept");
            return;
        }

        if let Err(e) = fs::remove_dir_all(old) {
            tracing::debug!(path = %old.display(), error = %e, "old scratch path not removed");
        }
    }
}

fn record_scratch(folder: &Path, database: &Path) -> Result<(), ScratchError> {
    create_dir(folder)?;
    let xml_file = ProgressFiles::in_folder(folder).xml_file;
    write_values(
        &xml_file,
        &[NodeValue::new(
            SCRATCH_GDB_NODE,
            database.to_string_lossy().into_owned(),
        )],
    )?;
    Ok(())
}

fn check_disk_space(host: &dyn Host, workspace: &Path, threshold_gb: f64) -> (Option<f64>, bool) {
    match free_disk_space_gb(workspace) {
        Ok(gb) if gb < threshold_gb => {
            let message = format!(
                "Disk containing scratch workspace has less than {threshold_gb}Gb free space. This may cause this tool to fail."
            );
            tracing::warn!(free_gb = gb, "{message}");
            host.add_warning(&message);
            (Some(gb), true)
        }
        Ok(gb) => (Some(gb), false),
        Err(e) => {
            tracing::warn!(path = %workspace.display(), error = %e, "cannot determine free disk space");
            (None, false)
        }
    }
}

fn create_dir(path: &Path) -> Result<(), ScratchError> {
    fs::create_dir_all(path).map_err(|source| ScratchError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
