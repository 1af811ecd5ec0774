use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use once_cell::sync::OnceCell;
use thiserror::Error;

pub mod param_parser;
pub mod write_to_csv;
pub mod write_to_vtu;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write vtu: {0}")]
    Vtk(String),
}

static OUTPUT_DIR: OnceCell<PathBuf> = OnceCell::new();

/// Per-run directory `outputs/<seconds since epoch>`, created on first use.
pub fn output_dir() -> Result<&'static Path, OutputError> {
    OUTPUT_DIR
        .get_or_try_init(|| -> Result<PathBuf, OutputError> {
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            let dir = Path::new("outputs").join(timestamp.to_string());
            fs::create_dir_all(&dir)?;
            log::info!("writing output to {}", dir.display());
            Ok(dir)
        })
        .map(PathBuf::as_path)
}
