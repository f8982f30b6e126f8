use std::path::PathBuf;

use thiserror::Error;

use crate::shader::ShaderStage;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to create {what}: {reason}")]
    CreateObject { what: &'static str, reason: String },

    #[error("{stage} shader compilation failed:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("shader program link failed:\n{log}")]
    Link { log: String },

    #[error("failed to read shader source {path:?}")]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ShaderError {
    /// Compiler or linker output, empty for non-GL failures
    pub fn diagnostic(&self) -> &str {
        match self {
            Self::Compile { log, .. } | Self::Link { log } => log,
            Self::CreateObject { reason, .. } => reason,
            Self::Source { .. } => "",
        }
    }
}

#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("failed to create texture for {path:?}: {reason}")]
    Upload { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("window handle unavailable: {0}")]
    Handle(#[from] raw_window_handle::HandleError),

    #[error("OpenGL display error: {0}")]
    Glutin(#[from] glutin::error::Error),

    #[error("no suitable OpenGL framebuffer config")]
    NoConfig,

    #[error("window has zero size")]
    ZeroSize,
}
