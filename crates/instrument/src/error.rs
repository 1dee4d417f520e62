//! Error types for the instrument crate.

use crate::sdk::SdkError;
use storage::StorageError;
use thiserror::Error;

/// Result type alias for instrument repository operations.
pub type InstrumentResult<T> = Result<T, InstrumentError>;

/// Errors surfaced by instrument repository operations.
///
/// The repository adds no taxonomy of its own: SDK and record-store
/// failures pass through unchanged to the caller.
#[derive(Error, Debug)]
pub enum InstrumentError {
    /// Error raised by the measurement-device SDK.
    #[error(transparent)]
    Sdk(#[from] SdkError),

    /// Error raised by the image-association store.
    #[error(transparent)]
    Store(#[from] StorageError),
}
