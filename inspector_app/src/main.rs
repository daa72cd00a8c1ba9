//! Model inspector
//!
//! Loads an STL or Wavefront OBJ model, prints a geometry summary and the
//! full diagnostic trail, and reflects the worst diagnostic severity in
//! its exit code. Useful for checking what a viewer would actually get
//! out of a model file before pointing a renderer at it.
//!
//! Usage: model_inspector <model.{stl,obj,mtl}> [config.toml]

mod config;

use std::path::Path;
use std::process::ExitCode;

use model_loader::{
    Diagnostic, DiskImageDecoder, ImageDecoder, MtlLoader, ObjLoader, Scene, StlDocument,
};
use thiserror::Error;

use crate::config::{ConfigError, InspectorConfig};

#[derive(Error, Debug)]
enum InspectorError {
    #[error("failed to load STL document: {0}")]
    Stl(#[from] model_loader::StlError),
    #[error("failed to load model: {0}")]
    Wavefront(#[from] model_loader::WavefrontError),
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <model.{{stl,obj,mtl}}> [config.toml]", args[0]);
        return ExitCode::from(2);
    }

    match run(&args[1], args.get(2).map(String::as_str)) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(model_path: &str, config_path: Option<&str>) -> Result<bool, InspectorError> {
    let config = match config_path {
        Some(path) => InspectorConfig::load_from_file(path)?,
        None => InspectorConfig::default(),
    };
    inspect(model_path, &config)
}

/// Inspect one model file. Returns whether any error diagnostics were
/// collected.
fn inspect(path: &str, config: &InspectorConfig) -> Result<bool, InspectorError> {
    let extension = Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());

    let decoder: Option<&dyn ImageDecoder> = if config.load_textures {
        Some(&DiskImageDecoder)
    } else {
        None
    };

    match extension.as_deref() {
        Some("stl") => {
            let document = StlDocument::open(path)?;
            print_stl_summary(path, &document);
            Ok(false)
        }
        Some("obj") => {
            let result = ObjLoader::load(path, decoder)?;
            print_scene_summary(path, &result.model, config);
            print_diagnostics(&result.diagnostics);
            Ok(result.has_errors())
        }
        Some("mtl") => {
            let result = MtlLoader::load(path, decoder)?;
            println!("{}: {} materials", path, result.model.len());
            for material in &result.model {
                print_material(material);
            }
            print_diagnostics(&result.diagnostics);
            Ok(result.has_errors())
        }
        _ => Err(InspectorError::UnsupportedFormat(path.to_owned())),
    }
}

fn print_stl_summary(path: &str, document: &StlDocument) {
    match document.name {
        Some(ref name) => println!("{}: solid '{}'", path, name),
        None => println!("{}: unnamed solid", path),
    }
    println!("  facets: {}", document.facets.len());

    if let Some(first) = document.facets.first() {
        let mut min = first.vertices[0].position;
        let mut max = min;
        for vertex in document.facets.iter().flat_map(|f| f.vertices.iter()) {
            min = min.inf(&vertex.position);
            max = max.sup(&vertex.position);
        }
        println!(
            "  bounds: [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }
}

fn print_scene_summary(path: &str, scene: &Scene, config: &InspectorConfig) {
    match scene.object_name() {
        Some(name) => println!("{}: object '{}'", path, name),
        None => println!("{}: unnamed object", path),
    }
    println!(
        "  pools: {} vertices, {} normals, {} uvs",
        scene.vertices().len(),
        scene.normals().len(),
        scene.uvs().len()
    );
    println!("  ungrouped faces: {}", scene.ungrouped_faces().len());

    if config.show_groups {
        for group in scene.groups() {
            let smoothing = match group.smoothing_group() {
                Some(s) => format!(", smoothing {}", s),
                None => String::new(),
            };
            println!(
                "  group {}: {} faces{}",
                group.names().join("/"),
                group.faces().len(),
                smoothing
            );
        }
    }

    if config.show_materials {
        for material in scene.materials() {
            print_material(material);
        }
    }
}

fn print_material(material: &model_loader::Material) {
    let maps = [
        material.texture_map_ambient.as_ref(),
        material.texture_map_diffuse.as_ref(),
        material.texture_map_specular.as_ref(),
        material.texture_map_specular_highlight.as_ref(),
        material.texture_map_alpha.as_ref(),
        material.texture_map_bump.as_ref(),
    ];
    let map_count = maps.iter().flatten().count();
    let loaded_count = maps.iter().flatten().filter(|m| m.image.is_some()).count();
    println!(
        "  material {}: illum {}, {} texture maps ({} loaded)",
        material.name, material.illumination_model, map_count, loaded_count
    );
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        println!("  {}", diagnostic);
    }
    if diagnostics.is_empty() {
        log::debug!("No diagnostics collected");
    }
}
