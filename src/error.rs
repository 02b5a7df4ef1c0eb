use thiserror::Error;

/// Errors raised by the fenced block transform itself.
///
/// Host concerns (configuration files, mdBook I/O) use `anyhow` instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenceError {
    /// A recognised boolean option carried a value that is not a boolean.
    #[error("Cannot parse bool value: '{0}'")]
    InvalidBool(String),
}

pub type Result<T, E = FenceError> = std::result::Result<T, E>;
