//! End-to-end Wavefront loading from real files: OBJ files pulling in
//! material libraries by relative path, and material libraries pulling in
//! texture images through the injected decoder.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use approx::assert_relative_eq;
use model_loader::{
    DiskImageDecoder, ImageData, ImageDecoder, ImageError, ObjLoader, Severity,
};

/// Decoder stub that records the paths it is asked for.
struct RecordingDecoder {
    seen: Mutex<Vec<PathBuf>>,
}

impl RecordingDecoder {
    fn new() -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl ImageDecoder for RecordingDecoder {
    fn decode(&self, path: &Path) -> Result<ImageData, ImageError> {
        self.seen.lock().unwrap().push(path.to_path_buf());
        Ok(ImageData::solid_color(1, 1, [128, 128, 128, 255]))
    }
}

#[test]
fn obj_load_resolves_material_library_relative_to_the_obj() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("ship.mtl"),
        "newmtl hull_steel\nKd 0.6 0.6 0.7\nNs 96\n\nnewmtl sail_cloth\nKd 0.9 0.9 0.8\nd 0.95\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("ship.obj"),
        "mtllib ship.mtl\n\
         o ship\n\
         v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
         g hull\n\
         usemtl hull_steel\n\
         f 1 2 3\nf 1 3 4\n\
         g sail\n\
         usemtl sail_cloth\n\
         f 2 3 4\n",
    )
    .unwrap();

    let result = ObjLoader::load(dir.path().join("ship.obj"), None).unwrap();
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        result.diagnostics
    );

    let scene = &result.model;
    assert_eq!(scene.object_name(), Some("ship"));
    assert_eq!(scene.vertices().len(), 4);
    assert_eq!(scene.materials().len(), 2);
    assert_eq!(scene.groups().len(), 2);
    assert!(scene.ungrouped_faces().is_empty());

    let hull = &scene.groups()[0];
    assert_eq!(hull.names(), &["hull".to_owned()]);
    assert_eq!(hull.faces().len(), 2);
    let hull_material = scene.face_material(&hull.faces()[0]).unwrap();
    assert_eq!(hull_material.name, "hull_steel");
    assert_relative_eq!(hull_material.diffuse.r, 0.6);
    assert_relative_eq!(hull_material.shininess, 96.0);

    let sail = &scene.groups()[1];
    let sail_material = scene.face_material(&sail.faces()[0]).unwrap();
    assert_eq!(sail_material.name, "sail_cloth");
    assert_relative_eq!(sail_material.transparency.unwrap(), 0.95);
}

#[test]
fn duplicate_material_names_resolve_to_the_first_library_loaded() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("first.mtl"),
        "newmtl paint\nKd 1 0 0\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("second.mtl"),
        "newmtl paint\nKd 0 0 1\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("part.obj"),
        "mtllib first.mtl\nmtllib second.mtl\nv 0 0 0\nusemtl paint\nf 1 1 1\n",
    )
    .unwrap();

    let result = ObjLoader::load(dir.path().join("part.obj"), None).unwrap();
    assert!(result.diagnostics.is_empty());

    // Both libraries loaded, duplicates unmerged; lookup returns the
    // first match in load order.
    let scene = &result.model;
    assert_eq!(scene.materials().len(), 2);
    let bound = scene.face_material(&scene.ungrouped_faces()[0]).unwrap();
    assert_eq!(bound.diffuse.r, 1.0);
    assert_eq!(bound.diffuse.b, 0.0);
}

#[test]
fn texture_images_resolve_relative_to_the_mtl_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("materials");
    fs::create_dir(&nested).unwrap();
    fs::write(
        nested.join("ship.mtl"),
        "newmtl hull\nmap_Kd plates.png\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("ship.obj"),
        "mtllib materials/ship.mtl\nv 0 0 0\nusemtl hull\nf 1 1 1\n",
    )
    .unwrap();

    let decoder = RecordingDecoder::new();
    let result = ObjLoader::load(dir.path().join("ship.obj"), Some(&decoder)).unwrap();
    assert!(result.diagnostics.is_empty());

    // The decoder was handed the path relative to the MTL file, not the OBJ.
    let seen = decoder.seen.lock().unwrap();
    assert_eq!(seen.as_slice(), &[nested.join("plates.png")]);

    let material = &result.model.materials()[0];
    let map = material.texture_map_diffuse.as_ref().unwrap();
    assert_eq!(map.path, PathBuf::from("plates.png"));
    let image = map.image.as_ref().unwrap();
    assert_eq!((image.width, image.height), (1, 1));
}

#[test]
fn lazy_load_keeps_texture_references_without_images() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("m.mtl"), "newmtl hull\nmap_Kd plates.png\n").unwrap();
    fs::write(
        dir.path().join("part.obj"),
        "mtllib m.mtl\nv 0 0 0\nusemtl hull\nf 1 1 1\n",
    )
    .unwrap();

    let result = ObjLoader::load(dir.path().join("part.obj"), None).unwrap();
    assert!(result.diagnostics.is_empty());

    let map = result.model.materials()[0]
        .texture_map_diffuse
        .as_ref()
        .unwrap();
    assert_eq!(map.path, PathBuf::from("plates.png"));
    assert!(map.image.is_none());
}

#[test]
fn missing_texture_file_is_an_error_diagnostic_not_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("m.mtl"), "newmtl hull\nmap_Kd nowhere.png\n").unwrap();
    fs::write(
        dir.path().join("part.obj"),
        "mtllib m.mtl\nv 0 0 0\nusemtl hull\nf 1 1 1\n",
    )
    .unwrap();

    let result = ObjLoader::load(dir.path().join("part.obj"), Some(&DiskImageDecoder)).unwrap();
    assert_eq!(result.errors().count(), 1);
    let error = result.errors().next().unwrap();
    assert_eq!(error.severity, Severity::Error);
    assert!(error.details.contains("nowhere.png"));
    assert!(error.cause.is_some());

    // The material keeps the reference, imageless.
    let map = result.model.materials()[0]
        .texture_map_diffuse
        .as_ref()
        .unwrap();
    assert!(map.image.is_none());
}

#[test]
fn broken_material_library_does_not_abort_the_obj() {
    let dir = tempfile::tempdir().unwrap();
    // A library whose second material has a broken color line.
    fs::write(
        dir.path().join("m.mtl"),
        "newmtl good\nKd 0 1 0\nnewmtl bad\nKd zero one zero\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("part.obj"),
        "mtllib m.mtl\nv 0 0 0\nusemtl good\nf 1 1 1\n",
    )
    .unwrap();

    let result = ObjLoader::load(dir.path().join("part.obj"), None).unwrap();
    // The MTL diagnostic is carried through to the OBJ result.
    assert_eq!(result.errors().count(), 1);
    assert!(result.errors().next().unwrap().cause.is_some());

    // Both materials exist; the broken line only lost its own data.
    assert_eq!(result.model.materials().len(), 2);
    let bound = result
        .model
        .face_material(&result.model.ungrouped_faces()[0])
        .unwrap();
    assert_eq!(bound.name, "good");
}
