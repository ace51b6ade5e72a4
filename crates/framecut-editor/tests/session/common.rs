use async_trait::async_trait;
use framecut_core::{EventBus, EventBusConfig, FrameParameters};
use framecut_designer::{build_frame, ReferenceModel};
use framecut_editor::{
    AssetError, AssetSource, ConstructionStore, ConstructionUpdate, EditorSession, InMemoryStore,
    SessionConfig, StoreError,
};
use framecut_visualizer::Ray;
use glam::Vec3;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

pub fn recording_bus() -> Arc<EventBus> {
    Arc::new(EventBus::with_config(EventBusConfig {
        enable_history: true,
        ..Default::default()
    }))
}

pub fn session_with(store: Arc<dyn ConstructionStore>, config: SessionConfig) -> EditorSession {
    EditorSession::new(42, FrameParameters::default(), config, store, recording_bus()).unwrap()
}

pub fn session() -> EditorSession {
    session_with(Arc::new(InMemoryStore::new()), SessionConfig::default())
}

/// GLB of the default procedural frame
pub fn reference_glb() -> Vec<u8> {
    ReferenceModel::from_beams(&build_frame(523.0, 400.0, 22.0).unwrap())
        .to_glb()
        .unwrap()
}

/// Ray straight down onto the frame plane
pub fn down_z(x: f32, y: f32) -> Ray {
    Ray::new(Vec3::new(x, y, 500.0), Vec3::NEG_Z).unwrap()
}

/// Store that rejects every update
pub struct RejectingStore {
    pub calls: AtomicUsize,
}

impl RejectingStore {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConstructionStore for RejectingStore {
    async fn update(&self, _id: u64, _update: ConstructionUpdate) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Rejected("backend unavailable".to_string()))
    }
}

/// Assets served from memory; unknown URLs are rejected
#[derive(Default)]
pub struct MemoryAssets {
    pub assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    pub fn with(url: &str, bytes: Vec<u8>) -> Self {
        let mut assets = HashMap::new();
        assets.insert(url.to_string(), bytes);
        Self { assets }
    }
}

#[async_trait]
impl AssetSource for MemoryAssets {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        self.assets
            .get(url)
            .cloned()
            .ok_or_else(|| AssetError::Rejected(format!("404 {}", url)))
    }
}

/// Holds every fetch until the gate opens
pub struct GatedAssets {
    pub inner: MemoryAssets,
    pub gate: Arc<Notify>,
}

#[async_trait]
impl AssetSource for GatedAssets {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        self.gate.notified().await;
        self.inner.fetch(url).await
    }
}

/// Holds every update until the gate opens, then saves in memory
pub struct GatedStore {
    pub inner: InMemoryStore,
    pub gate: Arc<Notify>,
}

impl GatedStore {
    pub fn new(gate: Arc<Notify>) -> Self {
        Self {
            inner: InMemoryStore::new(),
            gate,
        }
    }
}

#[async_trait]
impl ConstructionStore for GatedStore {
    async fn update(&self, id: u64, update: ConstructionUpdate) -> Result<(), StoreError> {
        self.gate.notified().await;
        self.inner.update(id, update).await
    }
}
