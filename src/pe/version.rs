//! Dll family detection from the version resource.
//!
//! Mirrors what the platform's version APIs would report: walk the resource
//! directory to the first RT_VERSION leaf, then pull the `InternalName`
//! string out of the version blob. The three-level tree walk is fixed-depth
//! and every read is bounds-checked, so a corrupt resource section can only
//! produce `Unknown`.

use tracing::debug;

use crate::family::DllFamily;
use crate::pe::utils::{align4, read_utf16le_string, ReadExt};
use crate::pe::{PeView, IMAGE_DIRECTORY_ENTRY_RESOURCE};

const RT_VERSION: u32 = 16;
const SUBDIR_FLAG: u32 = 0x8000_0000;

/// Cap on how much of the version blob we inspect.
const MAX_VERSION_BLOB: usize = 64 * 1024;

/// UTF-16LE bytes of the "InternalName" key.
const INTERNAL_NAME_KEY: &[u8] = b"I\0n\0t\0e\0r\0n\0a\0l\0N\0a\0m\0e\0";

/// Classify the image by the InternalName recorded in its version resource.
pub fn detect_family(view: &PeView) -> DllFamily {
    let Some(name) = internal_name(view) else {
        return DllFamily::Unknown;
    };
    debug!(internal_name = %name, "version resource internal name");

    if name.eq_ignore_ascii_case("ntdll.dll") {
        DllFamily::Ntdll
    } else if name.eq_ignore_ascii_case("win32u") {
        DllFamily::Win32u
    } else if name.eq_ignore_ascii_case("iumdll.dll") {
        DllFamily::IumDll
    } else {
        DllFamily::Unknown
    }
}

/// Read the InternalName value from the first RT_VERSION resource, if any.
pub fn internal_name(view: &PeView) -> Option<String> {
    let dir = view
        .data_directory(IMAGE_DIRECTORY_ENTRY_RESOURCE)
        .filter(|d| d.rva != 0 && d.size != 0)?;
    let base = view.rva_to_offset(dir.rva)?;
    let end = base.checked_add(dir.size as usize)?.min(view.data().len());
    let res = view.data().get(base..end)?;

    // Standard three-level tree: type / name / language
    let type_entry = find_id_entry(res, 0, RT_VERSION)?;
    let name_entry = first_entry(res, type_entry)?;
    let lang_entry = first_entry(res, name_entry)?;
    if lang_entry & SUBDIR_FLAG != 0 {
        // Deeper than the documented layout; treat as unclassifiable.
        return None;
    }

    let leaf = lang_entry as usize;
    let blob_rva = res.read_u32_le_at(leaf)?;
    let blob_size = res.read_u32_le_at(leaf + 4)? as usize;
    let blob = view.window_at_rva(blob_rva, blob_size.min(MAX_VERSION_BLOB))?;

    internal_name_from_blob(blob)
}

/// Locate the value following the UTF-16 `InternalName` key inside a
/// VS_VERSIONINFO blob. Values are 4-byte aligned after the key's NUL.
pub(crate) fn internal_name_from_blob(blob: &[u8]) -> Option<String> {
    let pos = memchr::memmem::find(blob, INTERNAL_NAME_KEY)?;
    let after_key = pos + INTERNAL_NAME_KEY.len() + 2; // key NUL terminator
    let value_off = align4(after_key);
    let value = read_utf16le_string(blob, value_off, 128)?;
    if value.is_empty() {
        return None;
    }
    Some(value)
}

/// Scan a directory's ID entries for `id`, returning its offset field.
fn find_id_entry(res: &[u8], dir_off: usize, id: u32) -> Option<u32> {
    let named = res.read_u16_le_at(dir_off + 12)? as usize;
    let ids = res.read_u16_le_at(dir_off + 14)? as usize;
    for i in 0..ids {
        let entry = dir_off + 16 + (named + i) * 8;
        let name = res.read_u32_le_at(entry)?;
        let offset = res.read_u32_le_at(entry + 4)?;
        if name == id {
            return Some(offset);
        }
    }
    None
}

/// Descend into a subdirectory entry and return its first child's offset
/// field (any name, any language).
fn first_entry(res: &[u8], entry_offset: u32) -> Option<u32> {
    if entry_offset & SUBDIR_FLAG == 0 {
        return None;
    }
    let off = (entry_offset & !SUBDIR_FLAG) as usize;
    let named = res.read_u16_le_at(off + 12)? as usize;
    let ids = res.read_u16_le_at(off + 14)? as usize;
    if named + ids == 0 {
        return None;
    }
    res.read_u32_le_at(off + 16 + 4)
}
