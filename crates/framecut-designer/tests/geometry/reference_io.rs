use framecut_designer::{
    build_frame, scale_reference, PartNameMap, ReferenceDimensions, ReferenceModel,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_reference_model_survives_a_glb_file() {
    let beams = build_frame(523.0, 400.0, 22.0).unwrap();
    let model = ReferenceModel::from_beams(&beams);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frame.glb");
    fs::write(&path, model.to_glb().unwrap()).unwrap();

    let loaded = ReferenceModel::from_glb(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(loaded.parts().len(), 4);
    for (a, b) in loaded.parts().iter().zip(model.parts()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.mesh.indices, b.mesh.indices);
        assert!((a.position - b.position).norm() < 1e-3);
    }

    let dims = ReferenceDimensions::new(523.0, 400.0, 22.0);
    let names = PartNameMap::default();
    let from_file = scale_reference(&loaded, &dims, &names, 700.0, 500.0, 22.0).unwrap();
    let from_memory = scale_reference(&model, &dims, &names, 700.0, 500.0, 22.0).unwrap();
    let (a_min, a_max) = from_file.bounds();
    let (b_min, b_max) = from_memory.bounds();
    assert!((a_min - b_min).norm() < 1e-3);
    assert!((a_max - b_max).norm() < 1e-3);
}

#[test]
fn test_garbage_is_rejected() {
    assert!(ReferenceModel::from_glb(b"definitely not a model").is_err());
}
