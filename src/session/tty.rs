//! Terminal owner lookup, used as the default fallback owner.

use super::TtyLine;
use std::{os::unix::fs::MetadataExt, path::Path};
use tracing::debug;

pub const DEV_DIR: &str = "/dev";

/// Uid owning the console device `<dev_dir>/ttyN`, if it can be stat'ed.
#[must_use]
pub fn console_owner(dev_dir: &Path, vt: u32) -> Option<u32> {
    let path = dev_dir.join(TtyLine::new(vt).as_str());

    match path.metadata() {
        Ok(metadata) => Some(metadata.uid()),
        Err(e) => {
            debug!(path = %path.display(), "console owner unavailable: {e}");
            None
        }
    }
}
