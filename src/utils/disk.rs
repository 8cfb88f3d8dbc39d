use std::path::Path;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Free space available to the current user on the disk holding `path`, in GB
pub(crate) fn free_disk_space_gb(path: &Path) -> std::io::Result<f64> {
    let bytes = fs2::available_space(path)?;
    Ok(bytes as f64 / BYTES_PER_GB)
}
