use std::path::Path;

use crate::error::HostError;
use crate::host::Host;

/// True when the dataset has exactly one field matching `field_name`
pub(crate) fn check_field(
    host: &dyn Host,
    dataset: &Path,
    field_name: &str,
) -> Result<bool, HostError> {
    match host.list_fields(dataset, field_name) {
        Ok(fields) => Ok(fields.len() == 1),
        Err(e) => {
            tracing::error!(
                field = field_name,
                dataset = %dataset.display(),
                error = %e,
                "error occurred while checking if field exists"
            );
            Err(e)
        }
    }
}
