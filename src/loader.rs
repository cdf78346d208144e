//! Read-only file mapping for scan input.
//!
//! The mapping is the only scoped resource in the crate: it must stay valid
//! for the full duration of a scan and is released exactly once when the
//! `MappedImage` drops, on every exit path.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use tracing::{debug, warn};

use crate::error::{Result, ScanError};

/// Maximum input size accepted for mapping (256 MiB). Real system dlls are
/// a few MiB; anything near this limit is not a candidate input.
pub const MAX_IMAGE_SIZE: u64 = 256 * 1024 * 1024;

/// A read-only memory mapping of the input file.
#[derive(Debug)]
pub struct MappedImage {
    map: Mmap,
}

impl MappedImage {
    /// Map a file read-only, enforcing [`MAX_IMAGE_SIZE`].
    pub fn map<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let size = file.metadata()?.len();

        if size > MAX_IMAGE_SIZE {
            warn!(?path, size, "refusing to map oversized input");
            return Err(ScanError::FileTooLarge {
                size,
                limit: MAX_IMAGE_SIZE,
            });
        }

        // Safety: the mapping is read-only and private; concurrent file
        // truncation is the usual mmap caveat and out of our control.
        let map = unsafe { Mmap::map(&file)? };
        debug!(?path, size, "mapped input file");
        Ok(Self { map })
    }

    /// The mapped bytes.
    pub fn data(&self) -> &[u8] {
        &self.map
    }
}
