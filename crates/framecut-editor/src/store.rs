//! Construction persistence seam
//!
//! The editor persists confirmed parameters through [`ConstructionStore`]
//! and only from an explicit confirmation, never from draft edits.

use crate::error::StoreError;
use async_trait::async_trait;
use framecut_core::FrameParameters;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Payload of a construction update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructionUpdate {
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beam_thickness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saw_thickness: Option<f64>,
}

impl From<&FrameParameters> for ConstructionUpdate {
    fn from(params: &FrameParameters) -> Self {
        Self {
            width: params.width,
            height: params.height,
            beam_thickness: Some(params.beam_thickness),
            saw_thickness: Some(params.saw_thickness),
        }
    }
}

#[async_trait]
pub trait ConstructionStore: Send + Sync {
    async fn update(&self, id: u64, update: ConstructionUpdate) -> Result<(), StoreError>;
}

/// Store backed by a map; unknown ids are created on first update
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<u64, ConstructionUpdate>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: u64) -> Option<ConstructionUpdate> {
        self.records.read().get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl ConstructionStore for InMemoryStore {
    async fn update(&self, id: u64, update: ConstructionUpdate) -> Result<(), StoreError> {
        let mut records = self.records.write();
        let record = records.entry(id).or_insert(update);
        // omitted optional fields keep their stored value
        record.width = update.width;
        record.height = update.height;
        if update.beam_thickness.is_some() {
            record.beam_thickness = update.beam_thickness;
        }
        if update.saw_thickness.is_some() {
            record.saw_thickness = update.saw_thickness;
        }
        debug!("Construction {} updated to {:?}", id, record);
        Ok(())
    }
}
