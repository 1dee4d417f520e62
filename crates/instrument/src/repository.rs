//! Instrument repository - the data-access facade.
//!
//! Every operation opens a fresh SDK session, delegates the core call, and
//! for instrument-shaped results merges in the locally stored image URL and
//! stringifies the numeric id. Nothing is validated, retried, or
//! translated here; SDK and store errors reach the caller unchanged.

use crate::error::InstrumentResult;
use crate::images::ImageCatalog;
use crate::sdk::{SdkConnector, SdkSession};
use crate::types::{
    CommandDraft, Instrument, InstrumentCommand, InstrumentDraft, PhysicalAddressOption,
    SdkCommand,
};
use tracing::{debug, info, instrument};

/// Data-access facade over the SDK and the image catalog.
pub struct InstrumentRepository<C: SdkConnector> {
    connector: C,
    images: ImageCatalog,
}

impl<C: SdkConnector> InstrumentRepository<C> {
    pub fn new(connector: C, images: ImageCatalog) -> Self {
        Self { connector, images }
    }

    /// List all instruments, each decorated with its image URL.
    pub async fn get_all(&self) -> InstrumentResult<Vec<Instrument>> {
        let sdk = self.connector.connect().await?;
        let instruments = sdk.get_instruments().await?;
        debug!(count = instruments.len(), "Fetched instruments");

        let images = self.images.image_map()?;
        instruments
            .into_iter()
            .map(|instrument| {
                let url = self.images.resolve(&images, instrument.id)?;
                Ok(Instrument::from_sdk(instrument, url))
            })
            .collect()
    }

    /// Fetch one instrument, decorated with its image URL.
    pub async fn get_by_id(&self, id: i64) -> InstrumentResult<Instrument> {
        let sdk = self.connector.connect().await?;
        let instrument = sdk.get_instrument(id).await?;

        let images = self.images.image_map()?;
        let url = self.images.resolve(&images, instrument.id)?;
        Ok(Instrument::from_sdk(instrument, url))
    }

    /// Detected physical addresses as selector options.
    pub async fn get_available_physical_addresses(
        &self,
    ) -> InstrumentResult<Vec<PhysicalAddressOption>> {
        let sdk = self.connector.connect().await?;
        let detected = sdk.get_detected_physical_addresses().await?;
        Ok(detected.into_iter().map(PhysicalAddressOption::from).collect())
    }

    /// Register a new instrument.
    ///
    /// The image file name stays local: the catalog records it for the new
    /// id while only the remaining fields reach the SDK.
    #[instrument(skip(self, draft))]
    pub async fn create_instrument(&self, draft: InstrumentDraft) -> InstrumentResult<Instrument> {
        let sdk = self.connector.connect().await?;
        let InstrumentDraft { image, fields } = draft;
        let image_url = self.images.file_url(&image);

        let created = sdk.create_instrument(fields).await?;
        info!(instrument_id = created.id, "Created instrument");

        self.images.assign(created.id, &image)?;
        Ok(Instrument::from_sdk(created, image_url))
    }

    /// Replace an instrument's fields.
    ///
    /// Same image treatment as creation, except the association row is
    /// updated in place (and silently absent rows stay absent).
    #[instrument(skip(self, draft))]
    pub async fn update_instrument(
        &self,
        id: i64,
        draft: InstrumentDraft,
    ) -> InstrumentResult<Instrument> {
        let sdk = self.connector.connect().await?;
        let InstrumentDraft { image, fields } = draft;
        let image_url = self.images.file_url(&image);

        let updated = sdk.update_instrument(id, fields).await?;
        info!(instrument_id = id, "Updated instrument");

        self.images.reassign(id, &image)?;
        Ok(Instrument::from_sdk(updated, image_url))
    }

    /// Unregister an instrument and drop its image association.
    ///
    /// The echoed record carries no image URL.
    #[instrument(skip(self))]
    pub async fn delete_instrument(&self, id: i64) -> InstrumentResult<Instrument> {
        let sdk = self.connector.connect().await?;
        let deleted = sdk.delete_instrument(id).await?;
        info!(instrument_id = id, "Deleted instrument");

        self.images.remove(id)?;
        Ok(Instrument::from_sdk_without_image(deleted))
    }

    /// Commands of an instrument as a flat sequence with string ids.
    pub async fn get_instrument_commands(
        &self,
        instrument_id: i64,
    ) -> InstrumentResult<Vec<InstrumentCommand>> {
        let sdk = self.connector.connect().await?;
        let commands = sdk.get_instrument_commands(instrument_id).await?;
        Ok(commands
            .into_values()
            .map(InstrumentCommand::from)
            .collect())
    }

    /// Register a new command; the SDK's response is returned unreshaped.
    #[instrument(skip(self, draft))]
    pub async fn create_instrument_command(
        &self,
        draft: CommandDraft,
    ) -> InstrumentResult<SdkCommand> {
        let sdk = self.connector.connect().await?;
        Ok(sdk.create_instrument_command(draft).await?)
    }

    /// Unregister a command.
    #[instrument(skip(self))]
    pub async fn delete_instrument_command(&self, command_id: i64) -> InstrumentResult<()> {
        let sdk = self.connector.connect().await?;
        Ok(sdk.delete_instrument_command(command_id).await?)
    }
}
