//! Export table walker: ties the classifier and the trampoline decoders
//! together over one pass of the export directory.

use tracing::{debug, info, warn};

use crate::decode::{decode_service, DecodeOutcome};
use crate::error::{Result, ScanError};
use crate::family::{classify, DllFamily};
use crate::pe::export::{named_exports, MAX_EXPORT_NAME_LEN};
use crate::pe::PeView;

/// One recovered service: display name and service number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEntry {
    pub name: String,
    pub number: u32,
}

/// Walk every named export of `view`, decode candidate trampolines and
/// collect the recovered service numbers in export-table order.
///
/// Each entry is processed in isolation: overlong names, forwarders and
/// malformed code are logged and skipped, never failing the scan. The only
/// fatal conditions are an `Unknown` family and an unwalkable export
/// directory.
pub fn scan(view: &PeView, family: DllFamily) -> Result<Vec<ServiceEntry>> {
    if family == DllFamily::Unknown {
        return Err(ScanError::UnknownFamily);
    }

    let machine = view.machine();
    let exports = named_exports(view)?;
    debug!(
        family = %family,
        machine = ?machine,
        exports = exports.len(),
        "walking export table"
    );

    let mut services = Vec::new();
    for export in &exports {
        if export.name.len() > MAX_EXPORT_NAME_LEN {
            warn!(
                length = export.name.len(),
                "unexpected export name length, entry skipped"
            );
            continue;
        }

        let Some(display_name) = classify(export.name, family) else {
            continue;
        };

        match decode_service(view, export.rva, machine) {
            DecodeOutcome::Number(number) => services.push(ServiceEntry {
                name: display_name,
                number,
            }),
            DecodeOutcome::NotFound => {
                debug!(name = export.name, "service number not found");
            }
            DecodeOutcome::Malformed => {
                warn!(
                    name = export.name,
                    rva = format_args!("{:#x}", export.rva),
                    "malformed code at entry point, entry skipped"
                );
            }
        }
    }

    info!(services = services.len(), "scan complete");
    Ok(services)
}
