// Error types for swigpp-codegen.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every failure the directive compiler can report. All of them abort the run.
#[derive(Debug, Error)]
pub enum SwigppError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse profile table {}: {source}", path.display())]
    ProfileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown profile '{name}' (known: {known})")]
    UnknownProfile { name: String, known: String },

    #[error("unresolved placeholder ${placeholder}$ in template '{template}'")]
    UnresolvedPlaceholder {
        placeholder: String,
        template: &'static str,
    },

    #[error("backend {backend} requires one of the targets: {expected}")]
    MissingTarget {
        backend: &'static str,
        expected: String,
    },

    #[error("backend {backend} does not support target '{target}'")]
    UnsupportedTarget {
        backend: &'static str,
        target: String,
    },

    #[error("failed to run {program}: {source}")]
    SwigSpawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("swig failed on {} with exit code {code}", file.display())]
    SwigFailed { file: PathBuf, code: i32 },
}

/// Convenience alias used throughout the compiler.
pub type Result<T> = std::result::Result<T, SwigppError>;

impl SwigppError {
    /// Adapter for `map_err` on filesystem calls.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> SwigppError {
        let path = path.into();
        move |source| SwigppError::Io { path, source }
    }
}
