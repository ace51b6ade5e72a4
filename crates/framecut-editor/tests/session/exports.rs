use crate::common::{reference_glb, session, session_with};
use framecut_camtools::{generate, DirectorySink, LabelRef};
use framecut_core::{BeamName, EditorEvent, PartId};
use framecut_designer::PartNameMap;
use framecut_editor::{EditorError, InMemoryStore, SessionConfig};
use std::sync::Arc;

#[test]
fn export_without_selection_is_refused() {
    let session = session();
    assert!(matches!(
        session.export_selected_gcode(),
        Err(EditorError::NoSelection)
    ));
    assert!(matches!(
        session.bus().history(None).last(),
        Some(EditorEvent::ExportRefused { reason }) if reason == "No part selected"
    ));
}

#[test]
fn export_selected_uses_confirmed_parameters() {
    let mut session = session();
    session.scene_mut().select(Some(BeamName::Left.into())).unwrap();
    session.draft_mut().height = 1000.0;

    let artifact = session.export_selected_gcode().unwrap();
    assert_eq!(artifact.file_name(), "LEFT_400x22.cnc");
    assert_eq!(artifact.program_text, generate("LEFT", 523.0, 400.0, 22.0, 1.344));
    assert!(matches!(
        session.bus().history(None).last(),
        Some(EditorEvent::ExportCompleted { file_name }) if file_name == "LEFT_400x22.cnc"
    ));
}

#[test]
fn export_all_follows_part_order() {
    let session = session();
    let names: Vec<String> = session
        .export_all_gcode()
        .iter()
        .map(|a| a.file_name())
        .collect();
    assert_eq!(
        names,
        vec![
            "TOP_523x22.cnc",
            "LEFT_400x22.cnc",
            "BOTTOM_523x22.cnc",
            "RIGHT_400x22.cnc",
        ]
    );
}

#[test]
fn unmapped_parts_have_no_program() {
    let config = SessionConfig {
        part_names: PartNameMap::from_entries([("Top", BeamName::Top)]),
        ..SessionConfig::default()
    };
    let mut session = session_with(Arc::new(InMemoryStore::new()), config);
    let ticket = session.begin_asset_load("frame.glb");
    assert!(session.complete_asset_load(&ticket, Ok(reference_glb())).is_loaded());

    let unmapped = PartId::Named("LEFT".to_string());
    session.scene_mut().select(Some(unmapped.clone())).unwrap();
    assert!(matches!(
        session.export_selected_gcode(),
        Err(EditorError::NotABeam(id)) if id == unmapped
    ));

    session.scene_mut().select(Some(BeamName::Top.into())).unwrap();
    assert_eq!(session.export_selected_gcode().unwrap().part_name, "TOP");
}

#[test]
fn labels_carry_the_confirmed_size() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session();
    session.draft_mut().width = 999.0;

    let data = session.label_data("Acme", Some("Sash".to_string()), Some("0007".to_string()));
    assert_eq!(data.construction_size, "523 x 400");

    let reference = LabelRef {
        order_number: "2024-117".to_string(),
        construction_no: 3,
        detail_no: 1,
    };
    let mut sink = DirectorySink::new(dir.path());
    let artifact = session.export_label(&data, &reference, &mut sink).unwrap();
    assert_eq!(artifact.png_file_name(), "Label_2024-117_C3_D1_Sash.png");
    assert_eq!(sink.written().len(), 1);
    assert!(artifact.svg.contains("S/N 0007"));

    let empty = session.label_data("", None, None);
    assert!(matches!(
        session.export_label(&empty, &reference, &mut sink),
        Err(EditorError::Export(_))
    ));
}
