/// Root element of every XML store: `<data>...</data>`
pub(crate) const XML_ROOT: &str = "data";

/// Attribute carrying a node's human-readable label
pub(crate) const DISPLAY_NAME_ATTR: &str = "displayName";

/// Session folder stamp: "20250115_093012"
pub(crate) const RUN_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Warning key stamp with microseconds: "093012123456"
pub(crate) const WARNING_STAMP_FORMAT: &str = "%H%M%S%6f";

/// Prefix of timestamped scratch session folders
pub(crate) const SESSION_PREFIX: &str = "scratch_";

pub(crate) const SCRATCH_DB_NAME: &str = "scratch.gdb";
pub(crate) const SCRATCH_FOLDER_NAME: &str = "scratch";

/// Name a stale entry is renamed to before it is deleted
pub(crate) const DELETION_NAME: &str = "ready_for_deletion";

/// Node recording the scratch database of a run, read back on rerun
pub(crate) const SCRATCH_GDB_NODE: &str = "ScratchGDB";

/// Node in the user settings file overriding the base scratch path
pub(crate) const SCRATCH_PATH_NODE: &str = "scratchPath";

/// Host extension every tool run checks out
pub(crate) const REQUIRED_EXTENSION: &str = "Spatial";

pub(crate) const DEFAULT_FREE_SPACE_GB: f64 = 3.0;

/// Pause before logging a warning so back-to-back warnings get distinct keys
pub(crate) const WARNING_DELAY_MS: u64 = 50;
