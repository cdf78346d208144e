//! sstdump: extract system service numbers from Windows service dlls.
//!
//! Given ntdll.dll, win32u.dll or iumdll.dll, the scan walks the export
//! directory, filters the family's service exports by name prefix, decodes
//! the trampoline at each entry point and emits `name<TAB>number` records
//! in export-table order. x86 and x64 trampolines are decoded by walking
//! real instructions with iced-x86; ARM64 stubs are matched against the
//! fixed `svc #imm16` pattern.
//!
//! ```no_run
//! use sstdump::{detect_family, scan, MappedImage, PeView};
//!
//! # fn main() -> sstdump::Result<()> {
//! let image = MappedImage::map("ntdll.dll")?;
//! let view = PeView::parse(image.data())?;
//! let family = detect_family(&view);
//! for entry in scan(&view, family)? {
//!     println!("{}\t{}", entry.name, entry.number);
//! }
//! # Ok(())
//! # }
//! ```

pub mod decode;
pub mod error;
pub mod family;
pub mod loader;
pub mod logging;
pub mod pe;
pub mod scan;

pub use decode::DecodeOutcome;
pub use error::{Result, ScanError};
pub use family::{classify, DllFamily};
pub use loader::MappedImage;
pub use pe::version::detect_family;
pub use pe::{Machine, PeView};
pub use scan::{scan, ServiceEntry};
