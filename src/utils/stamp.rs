use chrono::{DateTime, Local};

use crate::consts::{RUN_STAMP_FORMAT, WARNING_STAMP_FORMAT};

/// Second-resolution stamp used for session folders and `DateTimeRun`
pub(crate) fn run_stamp(now: DateTime<Local>) -> String {
    now.format(RUN_STAMP_FORMAT).to_string()
}

/// Microsecond-resolution node name for a warning entry
pub(crate) fn warning_key(now: DateTime<Local>) -> String {
    format!("Warning_{}", now.format(WARNING_STAMP_FORMAT))
}
