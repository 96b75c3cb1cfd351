//! Identifier list loading
//!
//! One business identifier per line, optionally suffixed with the
//! concern marker. Blank lines are skipped; order is preserved.

use crate::domain::errors::ExporterError;
use crate::domain::ids::BusinessIdentifier;
use crate::domain::result::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Loads and parses the identifier file
///
/// Lines that are empty after trimming are skipped (and counted in a
/// debug log); every other line must parse as an identifier. An empty
/// file yields an empty batch, which is valid.
///
/// # Errors
///
/// Returns `ExporterError::Configuration` if the file is missing or a
/// non-blank line does not hold a usable identifier (for example a lone
/// concern marker).
pub fn load_identifiers(path: impl AsRef<Path>) -> Result<Vec<BusinessIdentifier>> {
    let path = path.as_ref();

    let contents = fs::read_to_string(path).map_err(|e| {
        ExporterError::Configuration(format!(
            "Failed to read identifier file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut identifiers = Vec::new();
    let mut skipped = 0usize;

    for (idx, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            skipped += 1;
            continue;
        }

        let identifier = BusinessIdentifier::parse(line).map_err(|e| {
            ExporterError::Configuration(format!(
                "Identifier file {}: line {}: {}",
                path.display(),
                idx + 1,
                e
            ))
        })?;
        identifiers.push(identifier);
    }

    if skipped > 0 {
        debug!(skipped, path = %path.display(), "skipped blank identifier lines");
    }

    Ok(identifiers)
}
