use std::fs;
use std::path::{Path, PathBuf};

use crate::ServiceResult;

/// Writes `bytes` to `dir/file_name`, creating `dir` if needed, and returns the path.
///
/// The payload goes to a `.part` sibling first and is renamed into place, so an
/// interrupted write never leaves a truncated file under the final name.
pub fn write_payload(dir: &Path, file_name: &str, bytes: &[u8]) -> ServiceResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let dest = dir.join(file_name);
    let tmp = dir.join(format!("{}.part", file_name));

    fs::write(&tmp, bytes)?;
    if let Err(e) = fs::rename(&tmp, &dest) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    log::debug!("wrote {} bytes to {}", bytes.len(), dest.display());
    Ok(dest)
}
