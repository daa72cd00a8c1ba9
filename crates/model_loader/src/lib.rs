//! # Model Loader
//!
//! Model file ingestion for 3D viewers: parsers that turn STL (binary
//! and ASCII) and Wavefront OBJ/MTL files into validated, cross-referenced
//! in-memory geometry, with a diagnostic trail alongside every load.
//!
//! ## Design
//!
//! - **Best-effort loading**: the Wavefront loaders isolate failures per
//!   line and return a [`FileLoadResult`] pairing the partial model with
//!   ordered [`Diagnostic`]s. Only structurally fatal STL conditions
//!   (broken binary framing, a broken ASCII grammar) abort a file.
//! - **No ambient state**: every load call owns its pools, groups and
//!   diagnostics; texture decoding is an injected [`ImageDecoder`]
//!   capability rather than shared loader state, so independent files
//!   can be parsed concurrently.
//! - **Immutable results**: a [`Scene`] is built once by a single parse
//!   and only exposes read-only views.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use model_loader::{DiskImageDecoder, ObjLoader, StlDocument};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // STL: fatal on malformed data, framing detected automatically.
//!     let document = StlDocument::open("part.stl")?;
//!     println!("{} facets", document.facets.len());
//!
//!     // OBJ: best-effort, with a diagnostic trail worth inspecting
//!     // even on success.
//!     let result = ObjLoader::load("ship.obj", Some(&DiskImageDecoder))?;
//!     for diagnostic in &result.diagnostics {
//!         eprintln!("{}", diagnostic);
//!     }
//!     println!("{} vertices", result.model.vertices().len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::missing_errors_doc)]

pub mod diagnostics;
pub mod image_loader;
pub mod math;
pub mod stl;
pub mod wavefront;

pub use diagnostics::{Diagnostic, DiagnosticCause, FileLoadResult, Severity};
pub use image_loader::{DiskImageDecoder, ImageData, ImageDecoder, ImageError};
pub use math::{Vec2, Vec3, VertexPositionNormal};
pub use stl::{Facet, StlDocument, StlError};
pub use wavefront::{
    Color, Face, Group, Index, LoadContext, Material, MtlLoader, ObjLoader, Scene, TextureMap,
    WavefrontError,
};
