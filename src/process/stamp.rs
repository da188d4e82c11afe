//! Success stamp.

use std::fs::File;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Create `path` if it does not exist and set its modification time to now.
pub fn touch_stamp(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::options()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)?;
    file.set_modified(SystemTime::now())?;
    tracing::debug!(stamp = %path.display(), "touched success stamp");
    Ok(())
}
