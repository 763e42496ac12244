// Error types for the proxy runtime model.

use std::fmt;

use crate::handle::NativeHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    NullHandle,
    /// The handle is already bound to a different target-language object.
    AlreadyBound(NativeHandle),
    /// No factory is registered under the exposed class name.
    UnknownClass(String),
    Construction { class: String, message: String },
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::NullHandle => write!(f, "null native handle"),
            RuntimeError::AlreadyBound(handle) => {
                write!(f, "native handle {handle} is already bound to a director object")
            }
            RuntimeError::UnknownClass(name) => write!(f, "no factory registered for class {name}"),
            RuntimeError::Construction { class, message } => {
                write!(f, "could not instantiate class {class}: {message}")
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
