//! Error types for the build driver.

use bsp_render::RenderError;
use std::path::PathBuf;

/// Errors that stop a build before the toolchain can report a result.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Reading or writing a build file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The toolchain executable could not be started.
    #[error("toolchain '{tool}' not found (set {env} or pass an explicit path)", env = crate::toolchain::VIVADO_ENV)]
    ToolchainNotFound {
        /// The executable that was tried.
        tool: String,
    },

    /// The design handed to the build is not the one the batch script was
    /// rendered for.
    #[error("design '{design}' does not match the rendered artifacts (top '{top}', {sources} source(s))")]
    DesignMismatch {
        /// The rendered design name.
        design: String,
        /// Top module of the supplied design.
        top: String,
        /// Number of sources in the supplied design.
        sources: usize,
    },

    /// The build was cancelled and the toolchain process terminated.
    #[error("build cancelled")]
    Cancelled,

    /// Rendering the artifacts failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}
