use framecut_core::{
    BeamName, EditorEvent, EventBus, EventBusConfig, EventCategory, EventFilter, GizmoMode,
    PartId, ViewMode,
};
use framecut_designer::{
    build_frame, scale_reference, PartNameMap, ReferenceDimensions, ReferenceModel,
};
use framecut_visualizer::Scene;
use std::sync::Arc;

fn recording_bus() -> Arc<EventBus> {
    Arc::new(EventBus::with_config(EventBusConfig {
        enable_history: true,
        ..Default::default()
    }))
}

fn priority_order() -> Vec<PartId> {
    vec![
        BeamName::Top.into(),
        BeamName::Left.into(),
        BeamName::Bottom.into(),
        BeamName::Right.into(),
    ]
}

#[test]
fn rebuild_publishes_both_orders() {
    let bus = recording_bus();
    let mut scene = Scene::new(bus.clone());
    scene.rebuild_from_beams(&build_frame(523.0, 400.0, 22.0).unwrap());

    let events = bus.history(None);
    let Some(EditorEvent::PartsRebuilt {
        generation,
        parts,
        ordered,
        procedural,
    }) = events.last()
    else {
        panic!("expected a rebuild event, got {:?}", events);
    };
    assert_eq!(*generation, 1);
    assert!(*procedural);
    assert_eq!(
        parts,
        &vec![
            PartId::Beam(BeamName::Top),
            PartId::Beam(BeamName::Bottom),
            PartId::Beam(BeamName::Left),
            PartId::Beam(BeamName::Right),
        ]
    );
    assert_eq!(ordered, &priority_order());
}

#[test]
fn ordering_is_stable_across_rebuilds() {
    let mut scene = Scene::new(Arc::new(EventBus::new()));
    for (width, height) in [(523.0, 400.0), (900.0, 2100.0), (523.0, 400.0)] {
        scene.rebuild_from_beams(&build_frame(width, height, 22.0).unwrap());
        assert_eq!(scene.ordered_ids(), priority_order());
    }
    assert_eq!(scene.generation(), 3);
}

#[test]
fn switching_selection_moves_the_outline() {
    let bus = recording_bus();
    let mut scene = Scene::new(bus.clone());
    scene.rebuild_from_beams(&build_frame(523.0, 400.0, 22.0).unwrap());

    scene.select(Some(BeamName::Top.into())).unwrap();
    scene.select(Some(BeamName::Right.into())).unwrap();

    assert_eq!(scene.selected(), Some(&PartId::Beam(BeamName::Right)));
    assert_eq!(scene.outline_count(), 1);
    assert!(scene.part(&BeamName::Top.into()).unwrap().outline.is_none());
    assert!(scene.part(&BeamName::Right.into()).unwrap().outline.is_some());

    let last = bus.history(None).pop().unwrap();
    assert_eq!(
        last,
        EditorEvent::SelectionChanged {
            previous: Some(BeamName::Top.into()),
            current: Some(BeamName::Right.into()),
        }
    );
}

#[test]
fn rebuild_tears_down_selection() {
    let bus = recording_bus();
    let mut scene = Scene::new(bus.clone());
    scene.rebuild_from_beams(&build_frame(523.0, 400.0, 22.0).unwrap());
    scene.select(Some(BeamName::Left.into())).unwrap();

    scene.rebuild_from_beams(&build_frame(600.0, 400.0, 22.0).unwrap());
    assert!(scene.selected().is_none());
    assert_eq!(scene.outline_count(), 0);
    assert_eq!(scene.generation(), 2);

    let events = bus.history(None);
    let tail = &events[events.len() - 2..];
    assert!(matches!(
        tail[0],
        EditorEvent::SelectionChanged { current: None, .. }
    ));
    assert!(matches!(tail[1], EditorEvent::PartsRebuilt { generation: 2, .. }));
}

#[test]
fn rebuild_keeps_view_mode() {
    let mut scene = Scene::new(Arc::new(EventBus::new()));
    scene.set_view_mode(ViewMode::Wireframe);
    scene.rebuild_from_beams(&build_frame(523.0, 400.0, 22.0).unwrap());
    assert!(scene.parts().iter().all(|p| p.material.wireframe && !p.material.show_faces));
}

#[test]
fn camera_reframes_on_rebuild() {
    let mut scene = Scene::new(Arc::new(EventBus::new()));
    scene.rebuild_from_beams(&build_frame(523.0, 400.0, 22.0).unwrap());
    let near = scene.camera().distance;
    scene.rebuild_from_beams(&build_frame(2000.0, 400.0, 22.0).unwrap());
    let far = scene.camera().distance;
    assert!((far / near - 2000.0 / 523.0).abs() < 1e-2);
}

#[test]
fn derived_models_keep_unmapped_parts() {
    let reference = ReferenceModel::from_beams(&build_frame(523.0, 400.0, 22.0).unwrap());
    let names = PartNameMap::from_entries([
        ("TOP", BeamName::Top),
        ("BOTTOM", BeamName::Bottom),
        ("LEFT", BeamName::Left),
    ]);
    let derived = scale_reference(
        &reference,
        &ReferenceDimensions::default(),
        &names,
        800.0,
        600.0,
        22.0,
    )
    .unwrap();

    let mut scene = Scene::new(Arc::new(EventBus::new()));
    scene.rebuild_from_derived(&derived);
    assert!(!scene.is_procedural());
    assert_eq!(
        scene.ordered_ids(),
        vec![
            PartId::Beam(BeamName::Top),
            PartId::Beam(BeamName::Left),
            PartId::Beam(BeamName::Bottom),
            PartId::Named("RIGHT".to_string()),
        ]
    );
    scene.select(Some(PartId::Named("RIGHT".to_string()))).unwrap();
    assert_eq!(scene.outline_count(), 1);
}

#[test]
fn mode_changes_are_published() {
    let bus = Arc::new(EventBus::new());
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = seen.clone();
    bus.subscribe(EventFilter::Categories(vec![EventCategory::View]), move |event| {
        sink.lock().unwrap().push(event);
    });

    let mut scene = Scene::new(bus);
    scene.set_view_mode(ViewMode::Mixed);
    scene.set_view_mode(ViewMode::Mixed);
    scene.set_gizmo_mode(GizmoMode::Rotate);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            EditorEvent::ViewModeChanged(ViewMode::Mixed),
            EditorEvent::GizmoModeChanged(GizmoMode::Rotate),
        ]
    );
}
