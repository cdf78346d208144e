//! Symbol family classification and export-name filtering.

use std::fmt;

/// Which system dll produced the image. Drives the export-name filter and
/// the presentation rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DllFamily {
    /// ntdll.dll: scan `Zw*` exports, present them under their `Nt*` names
    Ntdll,
    /// win32u.dll: scan `Nt*` exports, presented unchanged
    Win32u,
    /// iumdll.dll: scan `Iu*` exports, presented unchanged
    IumDll,
    /// Not one of the supported dlls; the scan refuses to run
    Unknown,
}

impl DllFamily {
    /// The two-byte export-name prefix selecting candidates for this family.
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            DllFamily::Ntdll => Some("Zw"),
            DllFamily::Win32u => Some("Nt"),
            DllFamily::IumDll => Some("Iu"),
            DllFamily::Unknown => None,
        }
    }
}

impl fmt::Display for DllFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DllFamily::Ntdll => write!(f, "ntdll"),
            DllFamily::Win32u => write!(f, "win32u"),
            DllFamily::IumDll => write!(f, "iumdll"),
            DllFamily::Unknown => write!(f, "unknown"),
        }
    }
}

/// Decide whether an export name is a candidate for `family` and produce
/// its display name.
///
/// The ntdll stubs are exported under their `Zw` aliases; the documented
/// service names use the `Nt` spelling, so those get their first two bytes
/// rewritten. Pure function of its inputs.
pub fn classify(name: &str, family: DllFamily) -> Option<String> {
    let prefix = family.prefix()?;
    if !name.starts_with(prefix) {
        return None;
    }
    match family {
        DllFamily::Ntdll => Some(format!("Nt{}", &name[2..])),
        _ => Some(name.to_string()),
    }
}
