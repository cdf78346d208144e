//! Error types for sstdump.
//!
//! One structured error enum covers every fatal-to-run condition; per-entry
//! conditions (overlong names, malformed trampolines) are logged and skipped
//! by the walker instead of surfacing here.

use thiserror::Error;

/// Main error type for scan operations.
#[derive(Debug, Error)]
pub enum ScanError {
    /// File I/O or mapping errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file exceeds the mapping limit
    #[error("File too large: {size} bytes (limit: {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    /// Buffer ends before a required structure
    #[error("Truncated image: need {expected} bytes, have {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Missing or wrong DOS/PE signature
    #[error("Invalid image format: {0}")]
    InvalidFormat(&'static str),

    /// Optional header magic is neither PE32 nor PE32+
    #[error("Invalid optional header magic: {0:#06x}")]
    InvalidMagic(u16),

    /// COFF machine field disagrees with the optional header width
    #[error("Machine {machine:#06x} does not match optional header magic {magic:#06x}")]
    WidthMismatch { machine: u16, magic: u16 },

    /// A relative address points outside every section
    #[error("Invalid RVA: {rva:#010x}")]
    InvalidRva { rva: u32 },

    /// The image has no export directory to walk
    #[error("No export directory present")]
    NoExportDirectory,

    /// Version resource did not identify a supported dll
    #[error("Unknown or unsupported dll, expected ntdll/win32u/iumdll")]
    UnknownFamily,
}

/// Result type alias for scan operations
pub type Result<T> = std::result::Result<T, ScanError>;
