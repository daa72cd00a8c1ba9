//! Wavefront OBJ/MTL model ingestion
//!
//! The OBJ loader produces a [`Scene`]; `mtllib` references pull named
//! [`Material`] records in through the MTL loader, which can in turn
//! resolve texture images through an injected [`ImageDecoder`]. Both
//! loaders isolate failures per line: a malformed line becomes an error
//! diagnostic on the [`FileLoadResult`](crate::FileLoadResult) and
//! parsing resumes on the next line.

pub mod line;
pub mod material;
pub mod mtl;
pub mod obj;
pub mod scene;

pub use material::{Color, Material, TextureMap};
pub use mtl::MtlLoader;
pub use obj::ObjLoader;
pub use scene::{Face, Group, Index, Scene};

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::image_loader::ImageDecoder;

/// Errors that abort a Wavefront file load outright.
///
/// Everything recoverable is reported through diagnostics instead; only
/// the inability to read the input at all is an `Err`.
#[derive(Error, Debug)]
pub enum WavefrontError {
    /// IO error against the input stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-call loading context.
///
/// Bundles the source path (used for diagnostics and for resolving
/// relative `mtllib`/texture references) with the optional image decoder
/// for eager texture loading. Every load call owns its context; the
/// loaders keep no state between invocations, so independent files can be
/// parsed concurrently.
#[derive(Default, Clone, Copy)]
pub struct LoadContext<'a> {
    path: Option<&'a Path>,
    decoder: Option<&'a dyn ImageDecoder>,
}

impl<'a> LoadContext<'a> {
    /// A context with no source path and no decoder, for parsing from
    /// in-memory data.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context rooted at the given source file.
    pub fn with_path(path: &'a Path) -> Self {
        Self {
            path: Some(path),
            decoder: None,
        }
    }

    /// Attach an image decoder, enabling eager texture-image loading.
    #[must_use]
    pub fn with_decoder(mut self, decoder: &'a dyn ImageDecoder) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// The decoder to resolve texture images with, if any.
    pub(crate) fn decoder(&self) -> Option<&'a dyn ImageDecoder> {
        self.decoder
    }

    /// The source file name for diagnostics.
    pub(crate) fn file_name(&self) -> Option<String> {
        self.path.map(|p| p.display().to_string())
    }

    /// The directory that relative references resolve against.
    pub(crate) fn directory(&self) -> Option<&'a Path> {
        self.path.and_then(Path::parent)
    }

    /// Resolve a file reference from the payload of a directive.
    pub(crate) fn resolve(&self, reference: &str) -> PathBuf {
        let reference_path = Path::new(reference);
        if reference_path.is_absolute() {
            return reference_path.to_path_buf();
        }
        match self.directory() {
            Some(dir) => dir.join(reference_path),
            None => reference_path.to_path_buf(),
        }
    }
}

impl std::fmt::Debug for LoadContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadContext")
            .field("path", &self.path)
            .field("decoder", &self.decoder.map(|_| "..."))
            .finish()
    }
}

/// Failures inside a single line, recorded as diagnostic causes.
#[derive(Error, Debug)]
pub(crate) enum LineError {
    /// Too few numeric components in the payload
    #[error("expected {expected} numeric components but found {found}")]
    MissingComponents {
        expected: usize,
        found: usize,
    },

    /// A component failed to parse as a float
    #[error(transparent)]
    Float(#[from] std::num::ParseFloatError),

    /// A component failed to parse as an integer
    #[error(transparent)]
    Int(#[from] std::num::ParseIntError),

    /// A relative index reached below the start of its pool
    #[error("index {index} is out of range for a pool of {pool_len} elements")]
    IndexOutOfRange {
        index: i64,
        pool_len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_against_source_directory() {
        let context = LoadContext::with_path(Path::new("models/ship/hull.obj"));
        assert_eq!(
            context.resolve("hull.mtl"),
            Path::new("models/ship/hull.mtl")
        );
    }

    #[test]
    fn test_resolve_absolute_passes_through() {
        let context = LoadContext::with_path(Path::new("models/hull.obj"));
        assert_eq!(context.resolve("/textures/rust.png"), Path::new("/textures/rust.png"));
    }

    #[test]
    fn test_resolve_without_path_context() {
        let context = LoadContext::new();
        assert_eq!(context.resolve("hull.mtl"), Path::new("hull.mtl"));
    }
}
