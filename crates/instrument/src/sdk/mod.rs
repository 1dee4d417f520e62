//! The measurement-device SDK boundary.
//!
//! The repository never speaks the SDK's wire protocol. It sees two traits:
//! [`SdkConnector`], which opens a fresh session for every operation (the
//! SDK offers no pooling), and [`SdkSession`], the nine methods the
//! measurement server exposes. [`InMemorySdk`] implements both sides for
//! development and tests.

pub mod memory;

pub use memory::{InMemoryConnector, InMemorySdk};

use crate::types::{
    CommandDraft, DetectedAddress, InstrumentFields, SdkCommand, SdkInstrument,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

/// Result type alias for SDK calls.
pub type SdkResult<T> = Result<T, SdkError>;

/// Errors raised at the SDK boundary.
#[derive(Error, Debug, Clone)]
pub enum SdkError {
    /// The session could not be established.
    #[error("SDK connection failed: {0}")]
    Connection(String),

    /// The server does not know the requested entity.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other failure reported by the server.
    #[error("SDK error: {0}")]
    Remote(String),
}

/// Opens a fresh SDK session.
///
/// Every repository operation connects anew, mirroring the SDK's
/// one-connection-per-operation usage.
#[async_trait]
pub trait SdkConnector: Send + Sync {
    type Session: SdkSession;

    async fn connect(&self) -> SdkResult<Self::Session>;
}

/// One connected session with the measurement server.
#[async_trait]
pub trait SdkSession: Send + Sync {
    /// List all registered instruments.
    async fn get_instruments(&self) -> SdkResult<Vec<SdkInstrument>>;

    /// Fetch a single instrument.
    async fn get_instrument(&self, instrument_id: i64) -> SdkResult<SdkInstrument>;

    /// List the physical addresses currently detected on the bench.
    async fn get_detected_physical_addresses(&self) -> SdkResult<Vec<DetectedAddress>>;

    /// Register a new instrument.
    async fn create_instrument(&self, new_instrument: InstrumentFields)
        -> SdkResult<SdkInstrument>;

    /// Replace an instrument's fields.
    async fn update_instrument(
        &self,
        instrument_id: i64,
        updated_instrument: InstrumentFields,
    ) -> SdkResult<SdkInstrument>;

    /// Unregister an instrument, returning the removed record.
    async fn delete_instrument(&self, instrument_id: i64) -> SdkResult<SdkInstrument>;

    /// Commands of an instrument, keyed by command name.
    async fn get_instrument_commands(
        &self,
        instrument_id: i64,
    ) -> SdkResult<BTreeMap<String, SdkCommand>>;

    /// Register a new command for an instrument.
    async fn create_instrument_command(&self, new_command: CommandDraft) -> SdkResult<SdkCommand>;

    /// Unregister a command.
    async fn delete_instrument_command(&self, command_id: i64) -> SdkResult<()>;
}
