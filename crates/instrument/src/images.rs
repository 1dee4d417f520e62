//! Image-association catalog.
//!
//! Instruments live on the measurement server; which picture to show for
//! each of them is local metadata. The catalog keeps one association row
//! per instrument id in the flat-file store and turns file names into
//! absolute URLs under the static-files base.

use config::{Settings, StaticFilesSettings};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use storage::{JsonFileStore, StorageError};
use tracing::debug;

/// Placeholder assigned to instruments that never had an image chosen.
pub const DEFAULT_IMAGE_FILE_NAME: &str = "none.svg";

/// One association row: which image file belongs to which instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAssociation {
    pub instrument_id: i64,
    pub image_file_name: String,
}

/// The local image side table plus URL derivation.
pub struct ImageCatalog {
    store: JsonFileStore<ImageAssociation>,
    static_files: StaticFilesSettings,
}

impl ImageCatalog {
    pub fn new(store: JsonFileStore<ImageAssociation>, static_files: StaticFilesSettings) -> Self {
        Self {
            store,
            static_files,
        }
    }

    /// Open the catalog at the file the settings point at.
    pub fn open(settings: &Settings) -> storage::Result<Self> {
        let store = JsonFileStore::open(&settings.images_db.path)?;
        Ok(Self::new(store, settings.static_files.clone()))
    }

    /// Absolute URL for an image file name.
    pub fn file_url(&self, file_name: &str) -> String {
        self.static_files.file_url(file_name)
    }

    /// Absolute URL of the placeholder image.
    pub fn default_image_url(&self) -> String {
        self.file_url(DEFAULT_IMAGE_FILE_NAME)
    }

    /// All associations keyed by instrument id, for bulk decoration.
    pub fn image_map(&self) -> storage::Result<HashMap<i64, ImageAssociation>> {
        Ok(self
            .store
            .all()?
            .into_iter()
            .map(|stored| (stored.record.instrument_id, stored.record))
            .collect())
    }

    /// Image URL for one instrument, against a preloaded map.
    ///
    /// An instrument with no row gets the placeholder, and the row is
    /// created as a side effect so the next lookup finds it.
    pub fn resolve(
        &self,
        map: &HashMap<i64, ImageAssociation>,
        instrument_id: i64,
    ) -> storage::Result<String> {
        match map.get(&instrument_id) {
            Some(association) => Ok(self.file_url(&association.image_file_name)),
            None => {
                debug!(instrument_id, "No image association, assigning placeholder");
                self.assign(instrument_id, DEFAULT_IMAGE_FILE_NAME)?;
                Ok(self.default_image_url())
            }
        }
    }

    /// Record an association for a freshly created instrument.
    pub fn assign(&self, instrument_id: i64, image_file_name: &str) -> storage::Result<()> {
        self.store.insert(ImageAssociation {
            instrument_id,
            image_file_name: image_file_name.to_string(),
        })?;
        Ok(())
    }

    /// Point an existing association at another file.
    ///
    /// Returns the number of rows touched; zero when the instrument never
    /// had one.
    pub fn reassign(&self, instrument_id: i64, image_file_name: &str) -> storage::Result<usize> {
        self.store.update_where(
            |association| association.instrument_id == instrument_id,
            |association| association.image_file_name = image_file_name.to_string(),
        )
    }

    /// Drop the association of a deleted instrument.
    pub fn remove(&self, instrument_id: i64) -> storage::Result<()> {
        let rows = self
            .store
            .find(|association| association.instrument_id == instrument_id)?;
        let first = rows
            .first()
            .ok_or_else(|| StorageError::NotFound(format!("instrument {}", instrument_id)))?;
        self.store.delete(first.id)
    }
}
