//! Output directory handling and run reporting

use std::path::Path;

use crate::error::{BgClipError, BgClipResult};

pub mod report;

pub use report::ReportBuilder;

/// Create the output directory (and parents) if it does not exist
pub fn ensure_output_dir(dir: &Path) -> BgClipResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| BgClipError::OutputError {
        message: format!("cannot create {}: {}", dir.display(), e),
    })
}
