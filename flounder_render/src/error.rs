//! Error types for the Flounder render core
//!
//! Three families of failure reach the caller:
//! - configuration errors, caught before any native object is created
//! - native-resource errors reported by the graphics backend
//! - usage errors (lifecycle misuse, unknown descriptor slots)

use std::fmt;

/// Result type for render core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Render core errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Malformed vertex input, descriptor bindings, shader stages or target configuration
    InvalidConfiguration(String),

    /// Backend-specific error (Vulkan, mock, etc.)
    BackendError(String),

    /// Out of host or GPU memory
    OutOfMemory,

    /// The descriptor pool cannot satisfy another allocation
    DescriptorPoolExhausted,

    /// Programmer error: double create, unknown slot, handle used before create
    InvalidUsage(String),
}

impl Error {
    /// True for errors detected before any native call
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::InvalidConfiguration(_))
    }

    /// True for errors reported by the native API
    pub fn is_native(&self) -> bool {
        matches!(
            self,
            Error::BackendError(_) | Error::OutOfMemory | Error::DescriptorPoolExhausted
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of memory"),
            Error::DescriptorPoolExhausted => write!(f, "Descriptor pool exhausted"),
            Error::InvalidUsage(msg) => write!(f, "Invalid usage: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
