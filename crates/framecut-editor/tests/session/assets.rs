use crate::common::{down_z, reference_glb, session, GatedAssets, MemoryAssets};
use framecut_core::{AssetEvent, BeamName, EditorEvent, PartId};
use framecut_editor::{
    confirm_draft, load_reference, AssetError, AssetOutcome, FileAssetSource, SharedSession,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;

#[tokio::test]
async fn rejected_fetch_keeps_procedural_beams() {
    let shared: SharedSession = Arc::new(Mutex::new(session()));
    let outcome = load_reference(&shared, &MemoryAssets::default(), "https://cdn/frame.glb").await;
    assert!(matches!(outcome, AssetOutcome::Failed(AssetError::Rejected(_))));

    let mut session = shared.lock();
    assert!(session.scene().is_procedural());
    assert_eq!(session.scene().parts().len(), 4);
    assert!(session.imported().is_none());

    let hit = session.scene().pick(&down_z(13.7, 191.3)).unwrap();
    assert_eq!(hit.part, PartId::Beam(BeamName::Top));
    session.scene_mut().select(Some(hit.part)).unwrap();
    assert_eq!(session.export_selected_gcode().unwrap().part_name, "TOP");

    assert!(session.bus().history(None).iter().any(|e| matches!(
        e,
        EditorEvent::Asset(AssetEvent::Failed { url, .. }) if url == "https://cdn/frame.glb"
    )));
}

#[tokio::test]
async fn loaded_model_follows_confirmed_parameters() {
    let shared: SharedSession = Arc::new(Mutex::new(session()));
    let assets = MemoryAssets::with("frame.glb", reference_glb());
    let outcome = load_reference(&shared, &assets, "frame.glb").await;
    assert!(matches!(outcome, AssetOutcome::Loaded { parts: 4 }));
    assert!(!shared.lock().scene().is_procedural());

    {
        let mut session = shared.lock();
        session.draft_mut().width = 800.0;
        session.draft_mut().height = 600.0;
    }
    confirm_draft(&shared).await.unwrap();

    let session = shared.lock();
    assert!(!session.scene().is_procedural());
    let bounds = session.scene().bounds().unwrap();
    assert!((bounds.size().x - 800.0).abs() < 1e-2);
    assert!((bounds.size().y - 600.0).abs() < 1e-2);
    assert!(session.scene().pick(&down_z(13.7, 291.3)).is_some());
}

#[tokio::test]
async fn fetch_resolving_after_confirm_fits_new_parameters() {
    let mut session = session();
    let ticket = session.begin_asset_load("frame.glb");

    session.draft_mut().width = 700.0;
    session.confirm().await.unwrap();
    assert_eq!(session.pending_load(), Some(&ticket));

    let outcome = session.complete_asset_load(&ticket, Ok(reference_glb()));
    assert!(outcome.is_loaded());
    assert!(session.pending_load().is_none());
    let bounds = session.scene().bounds().unwrap();
    assert!((bounds.size().x - 700.0).abs() < 1e-2);
}

#[tokio::test]
async fn superseded_ticket_is_discarded() {
    let mut session = session();
    let stale = session.begin_asset_load("old.glb");
    let fresh = session.begin_asset_load("new.glb");
    let generation = session.scene().generation();

    let outcome = session.complete_asset_load(&stale, Ok(reference_glb()));
    assert!(matches!(outcome, AssetOutcome::Discarded));
    assert!(session.scene().is_procedural());
    assert_eq!(session.scene().generation(), generation);
    assert_eq!(session.pending_load(), Some(&fresh));
}

#[tokio::test]
async fn newer_fetch_wins() {
    let shared: SharedSession = Arc::new(Mutex::new(session()));
    let gate = Arc::new(Notify::new());
    let assets = GatedAssets {
        inner: MemoryAssets::with("old.glb", reference_glb()),
        gate: gate.clone(),
    };

    let interact = async {
        // the first fetch is parked on the gate; the scene stays usable
        let mut session = shared.lock();
        assert!(session.scene().pick(&down_z(13.7, 191.3)).is_some());
        session.begin_asset_load("new.glb");
        drop(session);
        gate.notify_one();
    };
    let (outcome, ()) = tokio::join!(load_reference(&shared, &assets, "old.glb"), interact);

    assert!(matches!(outcome, AssetOutcome::Discarded));
    let session = shared.lock();
    assert!(session.scene().is_procedural());
    assert_eq!(session.pending_load().unwrap().url, "new.glb");
}

#[tokio::test]
async fn undecodable_asset_is_reported() {
    let mut session = session();
    let ticket = session.begin_asset_load("broken.glb");
    let outcome = session.complete_asset_load(&ticket, Ok(b"not a model".to_vec()));
    assert!(matches!(outcome, AssetOutcome::Failed(AssetError::Decode(_))));
    assert!(session.scene().is_procedural());
    assert!(session.pending_load().is_none());
}

#[tokio::test]
async fn failure_after_load_falls_back_to_procedural() {
    let mut session = session();
    let ticket = session.begin_asset_load("frame.glb");
    assert!(session.complete_asset_load(&ticket, Ok(reference_glb())).is_loaded());

    let ticket = session.begin_asset_load("missing.glb");
    let error = AssetError::Rejected("404".to_string());
    assert!(matches!(
        session.complete_asset_load(&ticket, Err(error)),
        AssetOutcome::Failed(_)
    ));
    assert!(session.scene().is_procedural());
    assert!(session.imported().is_none());
    assert_eq!(session.scene().parts().len(), 4);
}

#[tokio::test]
async fn loads_from_the_filesystem() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("frame.glb"), reference_glb()).unwrap();

    let shared: SharedSession = Arc::new(Mutex::new(session()));
    let source = FileAssetSource::with_root(dir.path());
    let outcome = load_reference(&shared, &source, "frame.glb").await;
    assert!(outcome.is_loaded());

    shared.lock().clear_reference();
    assert!(shared.lock().scene().is_procedural());
}
