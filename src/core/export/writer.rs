//! Report file output
//!
//! Writes downloaded report bytes under the output directory. Writes
//! are idempotent: an existing file for the same identifier is
//! replaced, so re-running a batch refreshes the reports in place.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{BusinessId, ExporterError, Result};

/// Writes one report file and returns its path.
///
/// The file is named `<identifier>.<extension>` and the output
/// directory is created on first use.
pub async fn write_report(
    output_dir: &Path,
    identifier: &BusinessId,
    extension: &str,
    bytes: &[u8],
) -> Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir).await.map_err(|e| {
        ExporterError::Io(format!(
            "failed to create output directory '{}': {e}",
            output_dir.display()
        ))
    })?;

    let path = output_dir.join(format!("{identifier}.{extension}"));
    tokio::fs::write(&path, bytes).await.map_err(|e| {
        ExporterError::Io(format!("failed to write '{}': {e}", path.display()))
    })?;

    debug!(
        identifier = %identifier,
        path = %path.display(),
        bytes = bytes.len(),
        "report written"
    );
    Ok(path)
}
