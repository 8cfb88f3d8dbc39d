use std::path::Path;
use std::thread;
use std::time::Duration;

use chrono::Local;

use crate::consts::WARNING_DELAY_MS;
use crate::error::XmlStoreError;
use crate::utils::warning_key;
use crate::xml::{NodeValue, write_values};

use super::ProgressFiles;

/// Append a timestamped warning to `warnings.xml`, returning its node name
pub(crate) fn log_warning(folder: &Path, message: &str) -> Result<String, XmlStoreError> {
    thread::sleep(Duration::from_millis(WARNING_DELAY_MS));

    let key = warning_key(Local::now());
    write_values(
        &ProgressFiles::in_folder(folder).warnings_file,
        &[NodeValue::new(key.as_str(), message)],
    )?;
    tracing::debug!(key = %key, "warning logged");
    Ok(key)
}
