//! # Instrument Crate
//!
//! Data-access layer for lab instruments: a repository facade that proxies
//! CRUD operations to an external measurement-device SDK and decorates the
//! results with locally stored image metadata.
//!
//! ## Key Components
//!
//! - **Domain Types**: `SdkInstrument`/`Instrument` (numeric vs transport
//!   shape), drafts, commands, detected addresses
//! - **Traits**: `SdkConnector` and `SdkSession` for the SDK boundary
//! - **Image Catalog**: the flat-file side table mapping instrument ids to
//!   image file names
//! - **In-Memory SDK**: default implementation for testing and development
//!
//! ## Architecture
//!
//! The repository never imports a concrete transport. It is generic over
//! the connector, opens a fresh session per operation, and leaves error
//! translation to nobody: SDK and store errors propagate unchanged.
//!
//! ```text
//! service layer
//!      │
//!      ▼
//! InstrumentRepository ──► SdkConnector::connect() ──► SdkSession (9 ops)
//!      │
//!      └──► ImageCatalog ──► storage::JsonFileStore (association rows)
//! ```

pub mod error;
pub mod images;
pub mod repository;
pub mod sdk;
pub mod types;

// Re-export main types for convenience
pub use error::{InstrumentError, InstrumentResult};
pub use images::{ImageAssociation, ImageCatalog, DEFAULT_IMAGE_FILE_NAME};
pub use repository::InstrumentRepository;
pub use sdk::{InMemoryConnector, InMemorySdk, SdkConnector, SdkError, SdkResult, SdkSession};
pub use types::{
    CommandDraft, DetectedAddress, Instrument, InstrumentCommand, InstrumentDraft,
    InstrumentFields, PhysicalAddressOption, SdkCommand, SdkInstrument,
};
