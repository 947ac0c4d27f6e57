//! Error types for SDK generation

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for generation operations
pub type GenResult<T> = Result<T, GenError>;

/// Error type for generation operations
///
/// Every variant is fatal for the run that produced it. The only lenient
/// case, a definition file without its name field, never becomes an error:
/// the loader skips it.
#[derive(Error, Debug)]
pub enum GenError {
    /// Project configuration is missing or unusable
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A definition file could not be parsed
    #[error("failed to load definition {}: {source}", path.display())]
    DefinitionLoad {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A stub template is missing from the templates tree
    #[error("stub not found: {}", .0.display())]
    StubNotFound(PathBuf),

    /// The configuration names a backend with no driver
    #[error("unsupported backend: {0}")]
    UnsupportedBackend(String),

    /// An action declares something the compiler cannot express
    #[error("invalid action {entity}.{action}: {reason}")]
    InvalidAction {
        entity: String,
        action: String,
        reason: String,
    },

    /// Filesystem failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid glob pattern built from a project path
    #[error("invalid definition pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl GenError {
    /// Short, stable label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            GenError::Configuration(_) => "configuration",
            GenError::DefinitionLoad { .. } => "definition_load",
            GenError::StubNotFound(_) => "stub_not_found",
            GenError::UnsupportedBackend(_) => "unsupported_backend",
            GenError::InvalidAction { .. } => "invalid_action",
            GenError::Io { .. } => "io",
            GenError::Pattern(_) => "pattern",
        }
    }

    /// Wrap an I/O error together with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
