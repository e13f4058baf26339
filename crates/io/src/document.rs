//! Document payload: the whole workbook as `{ "sheets": [...] }`.
//!
//! Loading never fails. An absent, malformed, or sheet-less payload falls
//! back to a single empty `Sheet1`.

use std::path::Path;

use sheetgrid_engine::Workbook;

use crate::IoError;

/// Strictly parse a payload. An empty `sheets` list is treated as the
/// default workbook.
pub fn parse_document(payload: &str) -> Result<Workbook, IoError> {
    let workbook: Workbook = serde_json::from_str(payload)?;
    Ok(Workbook::from_sheets(workbook.into_sheets()))
}

/// Load a payload, falling back to the default workbook.
pub fn load_document(payload: Option<&str>) -> Workbook {
    let Some(payload) = payload.filter(|p| !p.trim().is_empty()) else {
        log::info!("no document payload, starting with an empty workbook");
        return Workbook::new();
    };
    match parse_document(payload) {
        Ok(workbook) => {
            log::info!("loaded document with {} sheet(s)", workbook.sheet_count());
            workbook
        }
        Err(e) => {
            log::warn!("malformed document payload, using an empty workbook: {e}");
            Workbook::new()
        }
    }
}

pub fn to_payload(workbook: &Workbook) -> Result<String, IoError> {
    Ok(serde_json::to_string(workbook)?)
}

/// Read a payload from disk; a missing or unreadable file loads the default.
pub fn load_path(path: &Path) -> Workbook {
    match std::fs::read_to_string(path) {
        Ok(content) => load_document(Some(&content)),
        Err(e) => {
            log::warn!("could not read {}: {e}", path.display());
            Workbook::new()
        }
    }
}

pub fn save_path(workbook: &Workbook, path: &Path) -> Result<(), IoError> {
    let payload = to_payload(workbook)?;
    std::fs::write(path, payload)?;
    log::info!("saved document to {}", path.display());
    Ok(())
}
