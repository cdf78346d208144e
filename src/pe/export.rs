//! Export directory enumeration.
//!
//! Yields every named export in name-table order, resolving the exported
//! RVA through the name-ordinal indirection. Entries with unresolvable
//! names or out-of-range ordinals are skipped individually; they never
//! abort the enumeration.

use tracing::warn;

use crate::error::{Result, ScanError};
use crate::pe::utils::ReadExt;
use crate::pe::{PeView, IMAGE_DIRECTORY_ENTRY_EXPORT};

/// Longest export name we accept. Matches the historical MAX_PATH bound;
/// anything longer only occurs in malformed tables.
pub const MAX_EXPORT_NAME_LEN: usize = 260;

/// One named export: name and the RVA of its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedExport<'data> {
    pub name: &'data str,
    pub rva: u32,
}

/// Enumerate named exports in ascending name-table order.
pub fn named_exports<'data>(view: &PeView<'data>) -> Result<Vec<NamedExport<'data>>> {
    let dir = view
        .data_directory(IMAGE_DIRECTORY_ENTRY_EXPORT)
        .filter(|d| d.rva != 0 && d.size != 0)
        .ok_or(ScanError::NoExportDirectory)?;

    let dir_off = view
        .rva_to_offset(dir.rva)
        .ok_or(ScanError::InvalidRva { rva: dir.rva })?;
    let data = view.data();
    if dir_off.saturating_add(40) > data.len() {
        return Err(ScanError::Truncated {
            expected: dir_off.saturating_add(40),
            actual: data.len(),
        });
    }

    // IMAGE_EXPORT_DIRECTORY fields we need
    let number_of_functions = data.read_u32_le_at(dir_off + 20).unwrap_or(0);
    let number_of_names = data.read_u32_le_at(dir_off + 24).unwrap_or(0);
    let functions_rva = data.read_u32_le_at(dir_off + 28).unwrap_or(0);
    let names_rva = data.read_u32_le_at(dir_off + 32).unwrap_or(0);
    let ordinals_rva = data.read_u32_le_at(dir_off + 36).unwrap_or(0);

    if number_of_names == 0 || names_rva == 0 || ordinals_rva == 0 || functions_rva == 0 {
        return Ok(Vec::new());
    }

    let names_off = view
        .rva_to_offset(names_rva)
        .ok_or(ScanError::InvalidRva { rva: names_rva })?;
    let ordinals_off = view
        .rva_to_offset(ordinals_rva)
        .ok_or(ScanError::InvalidRva { rva: ordinals_rva })?;
    let functions_off = view
        .rva_to_offset(functions_rva)
        .ok_or(ScanError::InvalidRva { rva: functions_rva })?;

    let mut out = Vec::with_capacity(number_of_names as usize);
    for i in 0..number_of_names as usize {
        let name_ptr_off = names_off + i * 4;
        let ordinal_off = ordinals_off + i * 2;

        let (Some(name_rva), Some(ordinal)) = (
            data.read_u32_le_at(name_ptr_off),
            data.read_u16_le_at(ordinal_off),
        ) else {
            // Table runs past the mapping; everything beyond is unreadable.
            warn!(index = i, "export tables truncated, stopping enumeration");
            break;
        };

        if name_rva == 0 {
            continue;
        }
        if u32::from(ordinal) >= number_of_functions {
            warn!(index = i, ordinal, "export ordinal out of range, skipped");
            continue;
        }

        let Some(name) = view.cstring_at_rva(name_rva, MAX_EXPORT_NAME_LEN + 1) else {
            warn!(index = i, rva = name_rva, "unresolvable export name, skipped");
            continue;
        };
        let Some(rva) = data.read_u32_le_at(functions_off + ordinal as usize * 4) else {
            warn!(index = i, ordinal, "export address slot unreadable, skipped");
            continue;
        };
        if rva == 0 {
            continue;
        }

        out.push(NamedExport { name, rva });
    }

    Ok(out)
}
