use crate::common::{
    reference_glb, session, session_with, GatedAssets, GatedStore, MemoryAssets, RejectingStore,
};
use framecut_core::{EditorEvent, FrameParameters};
use framecut_editor::{
    confirm_draft, load_reference, ConstructionStore, EditorError, InMemoryStore, SessionConfig,
    SharedSession,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;

fn assert_send<T: Send>(_: &T) {}

fn top_program_header(session: &framecut_editor::EditorSession) -> String {
    let programs = session.export_all_gcode();
    programs[0].program_text.lines().nth(1).unwrap().to_string()
}

#[tokio::test]
async fn draft_edits_do_not_reach_geometry_or_gcode() {
    let mut session = session();
    let generation = session.scene().generation();

    session.draft_mut().width = 600.0;

    assert!(session.has_unconfirmed_changes());
    assert_eq!(session.confirmed().width, 523.0);
    assert_eq!(session.scene().generation(), generation);
    let bounds = session.scene().bounds().unwrap();
    assert!((bounds.size().x - 523.0).abs() < 1e-2);
    assert_eq!(
        top_program_header(&session),
        "(PART TOP L=523.000 T=22.000 KERF=1.344)"
    );
}

#[tokio::test]
async fn confirm_persists_and_rebuilds() {
    let store = Arc::new(InMemoryStore::new());
    let mut session = session_with(store.clone(), SessionConfig::default());
    let generation = session.scene().generation();

    session.draft_mut().width = 600.0;
    session.confirm().await.unwrap();

    assert!(!session.has_unconfirmed_changes());
    assert_eq!(session.confirmed().width, 600.0);
    assert_eq!(session.scene().generation(), generation + 1);
    assert_eq!(store.get(42).unwrap().width, 600.0);
    let bounds = session.scene().bounds().unwrap();
    assert!((bounds.size().x - 600.0).abs() < 1e-2);
    assert_eq!(
        top_program_header(&session),
        "(PART TOP L=600.000 T=22.000 KERF=1.344)"
    );
    assert!(session.bus().history(None).iter().any(|e| matches!(
        e,
        EditorEvent::ParametersConfirmed(p) if p.width == 600.0
    )));
}

#[tokio::test]
async fn failed_save_keeps_confirmed_parameters() {
    let store = Arc::new(RejectingStore::new());
    let mut session = session_with(store.clone(), SessionConfig::default());
    let generation = session.scene().generation();

    session.draft_mut().height = 900.0;
    let result = session.confirm().await;

    assert!(matches!(result, Err(EditorError::Store(_))));
    assert_eq!(store.calls(), 1);
    assert_eq!(session.confirmed(), &FrameParameters::default());
    assert_eq!(session.draft().height, 900.0);
    assert_eq!(session.scene().generation(), generation);
    assert_eq!(session.beams()[2].length, 400.0);
    assert!(matches!(
        session.bus().history(None).last(),
        Some(EditorEvent::ConfirmFailed { .. })
    ));
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_store() {
    let store = Arc::new(RejectingStore::new());
    let mut session = session_with(store.clone(), SessionConfig::default());

    for bad in [0.0, -5.0, f64::NAN] {
        session.draft_mut().beam_thickness = bad;
        assert!(matches!(
            session.confirm().await,
            Err(EditorError::InvalidParameters(_))
        ));
    }
    session.set_draft(FrameParameters::new(80.0, 400.0, 22.0, 1.344));
    assert!(matches!(
        session.confirm().await,
        Err(EditorError::InvalidParameters(_))
    ));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn revert_restores_confirmed() {
    let mut session = session();
    session.draft_mut().saw_thickness = 3.0;
    session.revert_draft();
    assert!(!session.has_unconfirmed_changes());
}

#[tokio::test]
async fn store_is_usable_as_trait_object() {
    let store: Arc<dyn ConstructionStore> = Arc::new(InMemoryStore::new());
    let mut session = session_with(store, SessionConfig::default());
    session.set_draft(FrameParameters::new(700.0, 1200.0, 30.0, 2.0));
    session.confirm().await.unwrap();
    assert_eq!(session.beams()[0].thickness, 30.0);
}

#[tokio::test]
async fn failed_save_keeps_imported_model_at_confirmed_size() {
    let store = Arc::new(RejectingStore::new());
    let mut session = session_with(store.clone(), SessionConfig::default());
    let ticket = session.begin_asset_load("frame.glb");
    assert!(session
        .complete_asset_load(&ticket, Ok(reference_glb()))
        .is_loaded());
    let generation = session.scene().generation();

    session.draft_mut().width = 800.0;
    assert!(matches!(
        session.confirm().await,
        Err(EditorError::Store(_))
    ));

    assert_eq!(store.calls(), 1);
    assert_eq!(session.confirmed().width, 523.0);
    assert_eq!(session.draft().width, 800.0);
    let derived = session.imported().and_then(|m| m.derived()).unwrap();
    assert_eq!(derived.width, 523.0);
    assert!(!session.scene().is_procedural());
    assert_eq!(session.scene().generation(), generation);
    let bounds = session.scene().bounds().unwrap();
    assert!((bounds.size().x - 523.0).abs() < 1e-2);
}

#[tokio::test]
async fn confirm_during_fetch_applies_model_at_new_size() {
    let shared: SharedSession = Arc::new(Mutex::new(session()));
    let gate = Arc::new(Notify::new());
    let assets = GatedAssets {
        inner: MemoryAssets::with("frame.glb", reference_glb()),
        gate: gate.clone(),
    };

    let edit = async {
        // the fetch is parked on the gate while the user confirms
        shared.lock().draft_mut().width = 700.0;
        confirm_draft(&shared).await.unwrap();
        gate.notify_one();
    };
    let (outcome, ()) = tokio::join!(load_reference(&shared, &assets, "frame.glb"), edit);

    assert!(outcome.is_loaded());
    let session = shared.lock();
    assert!(session.pending_load().is_none());
    assert!(!session.scene().is_procedural());
    let derived = session.imported().and_then(|m| m.derived()).unwrap();
    assert_eq!(derived.width, 700.0);
    let bounds = session.scene().bounds().unwrap();
    assert!((bounds.size().x - 700.0).abs() < 1e-2);
}

#[tokio::test]
async fn session_stays_usable_while_saving() {
    let gate = Arc::new(Notify::new());
    let store = Arc::new(GatedStore::new(gate.clone()));
    let shared: SharedSession = Arc::new(Mutex::new(session_with(
        store.clone(),
        SessionConfig::default(),
    )));
    shared.lock().draft_mut().width = 600.0;

    let save = confirm_draft(&shared);
    assert_send(&save);
    let ui = async {
        {
            let session = shared.lock();
            assert_eq!(session.scene().parts().len(), 4);
            assert_eq!(session.confirmed().width, 523.0);
        }
        gate.notify_one();
    };
    let (saved, ()) = tokio::join!(save, ui);

    saved.unwrap();
    assert_eq!(shared.lock().confirmed().width, 600.0);
    assert_eq!(store.inner.get(42).unwrap().width, 600.0);
}
