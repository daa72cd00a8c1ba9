//! File-level STL framing
//!
//! Binary STL: an opaque 80-byte header, a little-endian `u32` facet
//! count, then the facet records. The declared count is read but not
//! validated against the actual record count. ASCII STL: a `solid <name>`
//! line, the facet blocks, and an `endsolid` terminator.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::stl::facet::{strip_keyword, Facet};
use crate::stl::StlError;

const BINARY_HEADER_SIZE: usize = 80;

/// An STL model: an optional solid name plus its facets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StlDocument {
    /// The name from the `solid` line; binary files have none.
    pub name: Option<String>,
    /// The facets in file order.
    pub facets: Vec<Facet>,
}

impl StlDocument {
    /// Read a document, detecting the framing by peeking for the literal
    /// `solid` keyword at the start of the stream.
    ///
    /// The check is the conventional, naive one: a binary file whose
    /// 80-byte header happens to begin with `solid` will be misdetected.
    /// Callers that know the framing should use [`Self::read_ascii`] or
    /// [`Self::read_binary`] directly.
    pub fn read<R: BufRead>(reader: &mut R) -> Result<Self, StlError> {
        let head = reader.fill_buf()?;
        let looks_ascii = head.len() >= 5 && head[..5].eq_ignore_ascii_case(b"solid");
        if looks_ascii {
            Self::read_ascii(reader)
        } else {
            Self::read_binary(reader)
        }
    }

    /// Read an ASCII STL document.
    ///
    /// The first line must begin with the `solid` keyword; anything else
    /// is a fatal [`StlError::InvalidHeader`].
    pub fn read_ascii<R: BufRead>(reader: &mut R) -> Result<Self, StlError> {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            return Err(StlError::InvalidHeader("the stream is empty".to_owned()));
        }

        let trimmed = header.trim();
        let name = match strip_keyword(trimmed, "solid") {
            Some(rest) => {
                let rest = rest.trim();
                (!rest.is_empty()).then(|| rest.to_owned())
            }
            None => {
                return Err(StlError::InvalidHeader(format!(
                    "expected a line starting with \"solid\" but found {:?}",
                    trimmed
                )))
            }
        };

        let mut facets = Vec::new();
        while let Some(facet) = Facet::read_ascii(reader)? {
            facets.push(facet);
        }

        log::debug!("Read {} facets from ASCII STL", facets.len());
        Ok(Self { name, facets })
    }

    /// Read a binary STL document.
    pub fn read_binary<R: Read>(reader: &mut R) -> Result<Self, StlError> {
        // The 80-byte header is opaque; consume and discard it.
        let mut header = [0_u8; BINARY_HEADER_SIZE];
        read_exactly(reader, &mut header)?;

        let mut count_bytes = [0_u8; 4];
        read_exactly(reader, &mut count_bytes)?;
        let declared_count = u32::from_le_bytes(count_bytes);

        let mut facets = Vec::new();
        while let Some(facet) = Facet::read_binary(reader)? {
            facets.push(facet);
        }

        // The declared count is informational only; files in the wild
        // routinely get it wrong.
        if facets.len() != declared_count as usize {
            log::debug!(
                "Binary STL declared {} facets but contained {}",
                declared_count,
                facets.len()
            );
        }

        Ok(Self { name: None, facets })
    }

    /// Write the document in the ASCII framing.
    pub fn write_ascii<W: Write>(&self, writer: &mut W) -> Result<(), StlError> {
        let name = self.name.as_deref().unwrap_or("");
        writeln!(writer, "solid {}", name)?;
        for facet in &self.facets {
            facet.write_ascii(writer)?;
        }
        writeln!(writer, "endsolid {}", name)?;
        Ok(())
    }

    /// Write the document in the binary framing with a zero-filled header.
    pub fn write_binary<W: Write>(&self, writer: &mut W) -> Result<(), StlError> {
        writer.write_all(&[0_u8; BINARY_HEADER_SIZE])?;
        writer.write_all(&(self.facets.len() as u32).to_le_bytes())?;
        for facet in &self.facets {
            facet.write_binary(writer)?;
        }
        Ok(())
    }

    /// Open and read a document from a file, detecting the framing.
    ///
    /// The file handle is scoped to this call.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StlError> {
        let path = path.as_ref();
        log::debug!("Loading STL document from {:?}", path);
        let mut reader = BufReader::new(File::open(path)?);
        Self::read(&mut reader)
    }

    /// Write the document to a file in the ASCII framing.
    pub fn save_ascii<P: AsRef<Path>>(&self, path: P) -> Result<(), StlError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_ascii(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write the document to a file in the binary framing.
    pub fn save_binary<P: AsRef<Path>>(&self, path: P) -> Result<(), StlError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_binary(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Read a fixed-size framing field, reporting a truncation with counts.
fn read_exactly<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), StlError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            return Err(StlError::ShortRead {
                expected: buf.len(),
                found: filled,
            });
        }
        filled += n;
    }
    Ok(())
}
