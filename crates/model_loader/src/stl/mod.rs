//! STL model ingestion
//!
//! STL stores one logical entity, the triangle facet, in two framings: a
//! line-oriented ASCII template and a fixed-width little-endian binary
//! record. The facet codec handles one facet at a time; [`StlDocument`]
//! wraps it with the file-level framing (header, facet count, solid
//! name).
//!
//! Malformed STL data is fatal for the remainder of the file. Unlike the
//! Wavefront loaders there is no per-line recovery here: a binary stream
//! that loses alignment or an ASCII file that breaks the facet grammar
//! cannot be meaningfully resumed.

pub mod document;
pub mod facet;

pub use document::StlDocument;
pub use facet::Facet;

use thiserror::Error;

/// Errors raised while reading or writing STL data.
///
/// Every variant other than `Io` is a format error: the stream does not
/// hold well-formed STL and the current file's parse is abandoned.
#[derive(Error, Debug)]
pub enum StlError {
    /// IO error against the underlying stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A binary record was truncated mid-field
    #[error("truncated binary record: expected {expected} bytes but found {found}")]
    ShortRead {
        /// Bytes the field requires
        expected: usize,
        /// Bytes actually available
        found: usize,
    },

    /// A coordinate token did not parse as a decimal
    #[error("could not parse the {axis} coordinate {token:?} as a decimal")]
    InvalidCoordinate {
        /// Which coordinate failed (X, Y or Z)
        axis: char,
        /// The offending token
        token: String,
    },

    /// A line did not match the ASCII facet grammar
    #[error("malformed STL line: {0:?}")]
    MalformedLine(String),

    /// The stream ended in the middle of a facet
    #[error("unexpected end of stream inside a facet")]
    UnexpectedEnd,

    /// The file-level header was missing or unrecognizable
    #[error("invalid STL header: {0}")]
    InvalidHeader(String),
}
