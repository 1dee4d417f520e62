//! In-memory SDK implementation.
//!
//! Useful for testing and local development when no measurement server is
//! reachable. Sessions share state through the connector, so "connecting"
//! hands out another view of the same bench.

use crate::sdk::{SdkConnector, SdkError, SdkResult, SdkSession};
use crate::types::{
    CommandDraft, DetectedAddress, InstrumentFields, SdkCommand, SdkInstrument,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct CommandRow {
    instrument_id: i64,
    command: SdkCommand,
}

#[derive(Debug, Default)]
struct BenchState {
    instruments: HashMap<i64, SdkInstrument>,
    commands: HashMap<i64, CommandRow>,
    detected_addresses: Vec<DetectedAddress>,
    next_instrument_id: i64,
    next_command_id: i64,
}

impl BenchState {
    fn new() -> Self {
        Self {
            next_instrument_id: 1,
            next_command_id: 1,
            ..Self::default()
        }
    }
}

/// In-memory SDK session over a shared bench.
#[derive(Debug)]
pub struct InMemorySdk {
    state: Arc<RwLock<BenchState>>,
}

impl InMemorySdk {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(BenchState::new())),
        }
    }

    /// Register an instrument directly, bypassing the session API.
    pub fn seed_instrument(&self, fields: InstrumentFields) -> i64 {
        let mut state = self.state.write();
        let id = state.next_instrument_id;
        state.next_instrument_id += 1;
        state.instruments.insert(id, materialize(id, fields));
        id
    }

    /// Make a physical address show up as detected.
    pub fn add_detected_address(&self, physical_address: impl Into<String>) {
        self.state.write().detected_addresses.push(DetectedAddress {
            physical_address: physical_address.into(),
            extra: serde_json::Map::new(),
        });
    }

    /// Number of registered instruments.
    pub fn instrument_count(&self) -> usize {
        self.state.read().instruments.len()
    }

    /// Snapshot of a registered instrument, if present.
    pub fn instrument(&self, instrument_id: i64) -> Option<SdkInstrument> {
        self.state.read().instruments.get(&instrument_id).cloned()
    }
}

impl Default for InMemorySdk {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemorySdk {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

fn materialize(id: i64, fields: InstrumentFields) -> SdkInstrument {
    SdkInstrument {
        id,
        brand: fields.brand,
        model: fields.model,
        physical_address: fields.physical_address,
        instrument_type: fields.instrument_type,
        description: fields.description,
        extra: fields.extra,
    }
}

#[async_trait]
impl SdkSession for InMemorySdk {
    async fn get_instruments(&self) -> SdkResult<Vec<SdkInstrument>> {
        let state = self.state.read();
        let mut instruments: Vec<SdkInstrument> = state.instruments.values().cloned().collect();
        instruments.sort_by_key(|instrument| instrument.id);
        Ok(instruments)
    }

    async fn get_instrument(&self, instrument_id: i64) -> SdkResult<SdkInstrument> {
        self.state
            .read()
            .instruments
            .get(&instrument_id)
            .cloned()
            .ok_or_else(|| SdkError::NotFound(format!("instrument {}", instrument_id)))
    }

    async fn get_detected_physical_addresses(&self) -> SdkResult<Vec<DetectedAddress>> {
        Ok(self.state.read().detected_addresses.clone())
    }

    async fn create_instrument(
        &self,
        new_instrument: InstrumentFields,
    ) -> SdkResult<SdkInstrument> {
        let mut state = self.state.write();
        let id = state.next_instrument_id;
        state.next_instrument_id += 1;
        let instrument = materialize(id, new_instrument);
        state.instruments.insert(id, instrument.clone());
        Ok(instrument)
    }

    async fn update_instrument(
        &self,
        instrument_id: i64,
        updated_instrument: InstrumentFields,
    ) -> SdkResult<SdkInstrument> {
        let mut state = self.state.write();
        if !state.instruments.contains_key(&instrument_id) {
            return Err(SdkError::NotFound(format!("instrument {}", instrument_id)));
        }
        let instrument = materialize(instrument_id, updated_instrument);
        state.instruments.insert(instrument_id, instrument.clone());
        Ok(instrument)
    }

    async fn delete_instrument(&self, instrument_id: i64) -> SdkResult<SdkInstrument> {
        let mut state = self.state.write();
        let instrument = state
            .instruments
            .remove(&instrument_id)
            .ok_or_else(|| SdkError::NotFound(format!("instrument {}", instrument_id)))?;
        state
            .commands
            .retain(|_, row| row.instrument_id != instrument_id);
        Ok(instrument)
    }

    async fn get_instrument_commands(
        &self,
        instrument_id: i64,
    ) -> SdkResult<BTreeMap<String, SdkCommand>> {
        let state = self.state.read();
        if !state.instruments.contains_key(&instrument_id) {
            return Err(SdkError::NotFound(format!("instrument {}", instrument_id)));
        }
        Ok(state
            .commands
            .values()
            .filter(|row| row.instrument_id == instrument_id)
            .map(|row| (row.command.name.clone(), row.command.clone()))
            .collect())
    }

    async fn create_instrument_command(
        &self,
        new_command: CommandDraft,
    ) -> SdkResult<SdkCommand> {
        let mut state = self.state.write();
        if !state.instruments.contains_key(&new_command.instrument_id) {
            return Err(SdkError::NotFound(format!(
                "instrument {}",
                new_command.instrument_id
            )));
        }
        let id = state.next_command_id;
        state.next_command_id += 1;
        let command = SdkCommand {
            id,
            name: new_command.name,
            extra: new_command.extra,
        };
        state.commands.insert(
            id,
            CommandRow {
                instrument_id: new_command.instrument_id,
                command: command.clone(),
            },
        );
        Ok(command)
    }

    async fn delete_instrument_command(&self, command_id: i64) -> SdkResult<()> {
        let mut state = self.state.write();
        state
            .commands
            .remove(&command_id)
            .ok_or_else(|| SdkError::NotFound(format!("command {}", command_id)))?;
        Ok(())
    }
}

/// Connector handing out sessions over one shared in-memory bench.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConnector {
    sdk: InMemorySdk,
}

impl InMemoryConnector {
    pub fn new(sdk: InMemorySdk) -> Self {
        Self { sdk }
    }

    /// Direct handle to the shared bench.
    pub fn sdk(&self) -> &InMemorySdk {
        &self.sdk
    }
}

#[async_trait]
impl SdkConnector for InMemoryConnector {
    type Session = InMemorySdk;

    async fn connect(&self) -> SdkResult<Self::Session> {
        Ok(self.sdk.clone())
    }
}
