//! Core domain types for the instrument data-access layer.
//!
//! Two shapes exist for every instrument record:
//! - `SdkInstrument`: what the measurement-device SDK returns. Numeric id,
//!   no image field.
//! - `Instrument`: what this layer hands to the service layer. String id
//!   (large SDK ids lose precision when a browser parses them as JSON
//!   numbers) and an `image` URL merged in from the local catalog.
//!
//! Fields the SDK ships that this layer does not interpret travel through
//! untouched in the flattened `extra` maps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// An instrument record as the SDK returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdkInstrument {
    /// SDK-assigned identifier; may exceed 2^53.
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub physical_address: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub instrument_type: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Uninterpreted SDK fields, passed through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for SdkInstrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.brand, self.model)
    }
}

/// The transport-facing instrument record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Stringified SDK id.
    pub id: String,
    pub brand: String,
    pub model: String,
    pub physical_address: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub instrument_type: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Absolute image URL. Absent only on deletion results, which echo the
    /// removed record without re-reading the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Instrument {
    /// Decorate an SDK record with its image URL, stringifying the id.
    pub fn from_sdk(sdk: SdkInstrument, image_url: String) -> Self {
        Self {
            image: Some(image_url),
            ..Self::from_sdk_without_image(sdk)
        }
    }

    /// Stringify the id only; used for deletion results.
    pub fn from_sdk_without_image(sdk: SdkInstrument) -> Self {
        Self {
            id: sdk.id.to_string(),
            brand: sdk.brand,
            model: sdk.model,
            physical_address: sdk.physical_address,
            instrument_type: sdk.instrument_type,
            description: sdk.description,
            image: None,
            extra: sdk.extra,
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.brand, self.model)
    }
}

/// The instrument fields forwarded to the SDK on create and update.
///
/// Deliberately has no image field: the image file name is local metadata
/// and must never reach the measurement server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentFields {
    pub brand: String,
    pub model: String,
    pub physical_address: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub instrument_type: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Create/update payload as the service layer submits it.
///
/// The image file name is split off before the rest is forwarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentDraft {
    /// Image file name under the static-files base URL.
    pub image: String,
    #[serde(flatten)]
    pub fields: InstrumentFields,
}

/// A command record as the SDK returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdkCommand {
    /// SDK-assigned identifier; may exceed 2^53.
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The transport-facing command record, id stringified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentCommand {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<SdkCommand> for InstrumentCommand {
    fn from(command: SdkCommand) -> Self {
        Self {
            id: command.id.to_string(),
            name: command.name,
            extra: command.extra,
        }
    }
}

/// New-command payload, forwarded to the SDK verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDraft {
    pub instrument_id: i64,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A physical address the SDK detected on the bench.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedAddress {
    pub physical_address: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Selector-friendly projection of a detected address.
///
/// `label` and `value` both carry the physical address; the original
/// detection fields ride along flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalAddressOption {
    pub label: String,
    pub value: String,
    #[serde(flatten)]
    pub detected: DetectedAddress,
}

impl From<DetectedAddress> for PhysicalAddressOption {
    fn from(detected: DetectedAddress) -> Self {
        Self {
            label: detected.physical_address.clone(),
            value: detected.physical_address.clone(),
            detected,
        }
    }
}
