//! Error types for the headless runner.
//!
//! [`EngineError`] covers every way startup or a save can fail, so `main`
//! can attach file context with `anyhow` and propagate with `?`.

use std::path::PathBuf;

/// Top-level error for the runner binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Run configuration could not be loaded.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: growop_core::ConfigError,
    },

    /// A replacement catalog could not be loaded or failed validation.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: growop_catalog::CatalogError,
    },

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot error: {source}")]
    Snapshot {
        /// The underlying snapshot error.
        #[from]
        source: growop_core::SnapshotError,
    },

    /// Reading or writing a save file failed.
    #[error("save file {path}: {source}")]
    SaveFile {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The scheduler step is zero.
    #[error("run.step_ms must be positive")]
    ZeroStep,
}
