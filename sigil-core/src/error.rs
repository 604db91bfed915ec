use thiserror::Error;

/// Failures raised by the named binding layer itself.
///
/// Errors coming from the driver are never converted into this type, they are
/// propagated as they were produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The name does not appear in the current statement.
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
    /// No statement was successfully set yet.
    #[error("No statement was prepared, call `set_statement` first")]
    NotPrepared,
}
