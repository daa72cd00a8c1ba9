//! STL facet codec
//!
//! A facet is one triangle of an STL model: a directionality vector plus
//! exactly three vertices, with a 16-bit attribute word in the binary
//! framing. [`Facet::read_ascii`] and [`Facet::read_binary`] decode one
//! facet from the corresponding framing, returning `Ok(None)` at a clean
//! end of stream; the symmetric writers reproduce the framings exactly.

use std::io::{BufRead, Read, Write};

use crate::math::{Vec3, VertexPositionNormal};
use crate::stl::StlError;

const VECTOR3_SIZE: usize = 4 * 3;

/// A representation of a facet defined by its location (`vertices`) and
/// directionality (`normal`).
#[derive(Debug, Clone)]
pub struct Facet {
    /// Indicates the directionality of the facet.
    pub normal: Vec3,
    /// Indicates the location of the facet.
    pub vertices: [VertexPositionNormal; 3],
    /// Additional data attached to the facet.
    ///
    /// Depending on the source of the STL, this could be used to indicate
    /// such things as the color of the facet. This functionality only
    /// exists in binary STLs; ASCII facets carry 0.
    pub attribute_byte_count: u16,
}

impl Facet {
    /// Create a facet from a normal and three vertex positions.
    ///
    /// Each vertex inherits the facet normal, as both STL framings carry
    /// per-facet normals only.
    pub fn new(normal: Vec3, positions: [Vec3; 3], attribute_byte_count: u16) -> Self {
        Self {
            normal,
            vertices: positions.map(|p| VertexPositionNormal::new(p, normal)),
            attribute_byte_count,
        }
    }

    /// Read a single facet from an ASCII STL stream.
    ///
    /// Returns `Ok(None)` at end of stream or on the `endsolid`
    /// terminator. Any other line that does not match the facet grammar
    /// is a fatal [`StlError`]: a malformed ASCII STL cannot be resumed.
    pub fn read_ascii<R: BufRead>(reader: &mut R) -> Result<Option<Self>, StlError> {
        // Read the normal.
        let normal = match read_line(reader)? {
            None => return Ok(None),
            Some(line) => match parse_vector_line(&line)? {
                Some(normal) => normal,
                None => {
                    // The `endsolid` terminator ends the facet list; any
                    // other unmatched line means the file is unusable.
                    if strip_keyword(line.trim_start(), "endsolid").is_some() {
                        return Ok(None);
                    }
                    return Err(StlError::MalformedLine(line));
                }
            },
        };

        // Skip the "outer loop".
        if read_line(reader)?.is_none() {
            return Err(StlError::UnexpectedEnd);
        }

        // Read 3 vertices; fewer than 3 parseable vertices is a failure.
        let mut positions = [Vec3::zeros(); 3];
        for position in &mut positions {
            let line = read_line(reader)?.ok_or(StlError::UnexpectedEnd)?;
            *position = parse_vector_line(&line)?.ok_or(StlError::MalformedLine(line))?;
        }

        // Read the "endloop" and "endfacet".
        read_line(reader)?;
        read_line(reader)?;

        Ok(Some(Self::new(normal, positions, 0)))
    }

    /// Read a single facet from a binary STL stream.
    ///
    /// A read of exactly 0 bytes at the start of the record signals a
    /// clean end of stream; any other short read is a fatal
    /// [`StlError::ShortRead`] carrying the expected and actual counts.
    pub fn read_binary<R: Read>(reader: &mut R) -> Result<Option<Self>, StlError> {
        // Read the normal.
        let normal = match read_vector3(reader, true)? {
            None => return Ok(None),
            Some(normal) => normal,
        };

        // Read 3 vertices. End of stream is no longer acceptable here: a
        // truncated record is a format error, not a shorter facet.
        let mut positions = [Vec3::zeros(); 3];
        for position in &mut positions {
            *position = read_vector3(reader, false)?.ok_or(StlError::ShortRead {
                expected: VECTOR3_SIZE,
                found: 0,
            })?;
        }

        // Read the attribute byte count.
        let mut attribute = [0_u8; 2];
        let read = read_up_to(reader, &mut attribute)?;
        if read != attribute.len() {
            return Err(StlError::ShortRead {
                expected: attribute.len(),
                found: read,
            });
        }

        Ok(Some(Self::new(
            normal,
            positions,
            u16::from_le_bytes(attribute),
        )))
    }

    /// Write the facet as text to the `writer`.
    pub fn write_ascii<W: Write>(&self, writer: &mut W) -> Result<(), StlError> {
        writeln!(
            writer,
            "\tfacet normal {} {} {}",
            self.normal.x, self.normal.y, self.normal.z
        )?;
        writeln!(writer, "\t\touter loop")?;

        for vertex in &self.vertices {
            let p = vertex.position;
            writeln!(writer, "\t\t\tvertex {} {} {}", p.x, p.y, p.z)?;
        }

        writeln!(writer, "\t\tendloop")?;
        writeln!(writer, "\tendfacet")?;
        Ok(())
    }

    /// Write the facet as binary to the `writer`.
    pub fn write_binary<W: Write>(&self, writer: &mut W) -> Result<(), StlError> {
        write_vector3(writer, self.normal)?;
        for vertex in &self.vertices {
            write_vector3(writer, vertex.position)?;
        }
        writer.write_all(&self.attribute_byte_count.to_le_bytes())?;
        Ok(())
    }
}

/// Facet equality compares the normal and the vertex sequence element-wise
/// in order; winding matters, so `[a, b, c]` and `[b, c, a]` differ. The
/// attribute word does not participate.
impl PartialEq for Facet {
    fn eq(&self, other: &Self) -> bool {
        self.normal == other.normal && self.vertices == other.vertices
    }
}

/// Read one line, stripping the trailing newline. `Ok(None)` at end of
/// stream.
fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>, StlError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Some(line))
}

/// Match a `facet normal X Y Z` or `vertex X Y Z` line, whitespace
/// tolerant and case insensitive.
///
/// Returns `Ok(None)` when the line does not carry either keyword. A line
/// that carries the keyword but whose coordinates do not parse as
/// decimals is a fatal error.
fn parse_vector_line(line: &str) -> Result<Option<Vec3>, StlError> {
    let trimmed = line.trim_start();

    let rest = match strip_keyword(trimmed, "facet normal")
        .or_else(|| strip_keyword(trimmed, "vertex"))
    {
        Some(rest) => rest,
        None => return Ok(None),
    };

    // The keyword must be followed by whitespace and three numeric tokens.
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return Ok(None);
    }
    let mut tokens = rest.split_whitespace();
    let mut coordinates = [0.0_f32; 3];
    for (coordinate, axis) in coordinates.iter_mut().zip(['X', 'Y', 'Z']) {
        let token = tokens.next().ok_or_else(|| StlError::MalformedLine(line.to_owned()))?;
        *coordinate = token.parse().map_err(|_| StlError::InvalidCoordinate {
            axis,
            token: token.to_owned(),
        })?;
    }

    Ok(Some(Vec3::new(
        coordinates[0],
        coordinates[1],
        coordinates[2],
    )))
}

/// Strip a leading ASCII keyword, case insensitively. Returns the rest of
/// the string after the keyword, or `None` if the keyword is absent.
pub(crate) fn strip_keyword<'a>(s: &'a str, keyword: &str) -> Option<&'a str> {
    if s.len() >= keyword.len()
        && s.is_char_boundary(keyword.len())
        && s[..keyword.len()].eq_ignore_ascii_case(keyword)
    {
        Some(&s[keyword.len()..])
    } else {
        None
    }
}

/// Read 12 bytes as three little-endian single-precision floats.
///
/// When `start_of_record` is set, a 0-byte read reports a clean end of
/// stream as `Ok(None)`; otherwise every short read (including 0) is a
/// [`StlError::ShortRead`].
fn read_vector3<R: Read>(reader: &mut R, start_of_record: bool) -> Result<Option<Vec3>, StlError> {
    let mut data = [0_u8; VECTOR3_SIZE];
    let read = read_up_to(reader, &mut data)?;

    if read == 0 && start_of_record {
        return Ok(None);
    }
    if read != data.len() {
        return Err(StlError::ShortRead {
            expected: data.len(),
            found: read,
        });
    }

    let component =
        |i: usize| f32::from_le_bytes([data[i * 4], data[i * 4 + 1], data[i * 4 + 2], data[i * 4 + 3]]);
    Ok(Some(Vec3::new(component(0), component(1), component(2))))
}

fn write_vector3<W: Write>(writer: &mut W, v: Vec3) -> Result<(), StlError> {
    writer.write_all(&v.x.to_le_bytes())?;
    writer.write_all(&v.y.to_le_bytes())?;
    writer.write_all(&v.z.to_le_bytes())?;
    Ok(())
}

/// Fill `buf` as far as the stream allows, returning the number of bytes
/// actually read. Unlike `read_exact`, a short read is reported with its
/// length rather than as a bare error.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, StlError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_facet() -> Facet {
        Facet::new(
            Vec3::new(0.0, 0.0, 1.0),
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            0,
        )
    }

    #[test]
    fn test_binary_round_trip_exact() {
        let mut facet = sample_facet();
        facet.attribute_byte_count = 0xBEEF;

        let mut bytes = Vec::new();
        facet.write_binary(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 50);

        let read = Facet::read_binary(&mut Cursor::new(bytes)).unwrap().unwrap();
        assert_eq!(read, facet);
        assert_eq!(read.attribute_byte_count, 0xBEEF);
    }

    #[test]
    fn test_binary_round_trip_awkward_floats() {
        // Values with no short decimal representation must survive the
        // binary framing bit for bit.
        let facet = Facet::new(
            Vec3::new(0.1, -1.0e-7, 3.402_823_5e38),
            [
                Vec3::new(f32::MIN_POSITIVE, 2.5e-4, -0.0),
                Vec3::new(1.0 / 3.0, -7.77e5, 42.4242),
                Vec3::new(-1.5, 0.0, 9.999_999e-10),
            ],
            7,
        );

        let mut bytes = Vec::new();
        facet.write_binary(&mut bytes).unwrap();
        let read = Facet::read_binary(&mut Cursor::new(bytes)).unwrap().unwrap();
        assert_eq!(read, facet);
        assert_eq!(read.attribute_byte_count, 7);
    }

    #[test]
    fn test_binary_end_of_stream_is_clean() {
        let empty: &[u8] = &[];
        assert!(Facet::read_binary(&mut Cursor::new(empty))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_binary_short_read_is_fatal() {
        for len in [1_usize, 11, 13, 47] {
            let bytes = vec![0_u8; len];
            let err = Facet::read_binary(&mut Cursor::new(bytes)).unwrap_err();
            match err {
                StlError::ShortRead { expected, found } => {
                    assert_eq!(expected, 12, "length {}", len);
                    assert_eq!(found, len % 12, "length {}", len);
                }
                other => panic!("expected ShortRead for length {}, got {:?}", len, other),
            }
        }
    }

    #[test]
    fn test_binary_missing_attribute_word_is_fatal() {
        // 48 bytes covers the floats but not the attribute count.
        let bytes = vec![0_u8; 48];
        let err = Facet::read_binary(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            StlError::ShortRead {
                expected: 2,
                found: 0
            }
        ));
    }

    #[test]
    fn test_ascii_round_trip() {
        let facet = sample_facet();

        let mut text = Vec::new();
        facet.write_ascii(&mut text).unwrap();

        let read = Facet::read_ascii(&mut Cursor::new(text)).unwrap().unwrap();
        assert_eq!(read, facet);
        assert_eq!(read.attribute_byte_count, 0);
    }

    #[test]
    fn test_ascii_round_trip_awkward_floats() {
        // Display of f32 emits the shortest digits that parse back to the
        // same value, so the text framing is lossless too.
        let facet = Facet::new(
            Vec3::new(0.1, -0.333_333_34, 1.0e-6),
            [
                Vec3::new(f32::MIN_POSITIVE, 2.5e-4, -0.0),
                Vec3::new(1.0 / 3.0, -777_000.0, 42.4242),
                Vec3::new(-1.5, 0.0, 123_456_790.0),
            ],
            0,
        );

        let mut text = Vec::new();
        facet.write_ascii(&mut text).unwrap();
        let read = Facet::read_ascii(&mut Cursor::new(text)).unwrap().unwrap();
        assert_eq!(read, facet);
    }

    #[test]
    fn test_ascii_accepts_exponents_and_signs() {
        let text = "facet normal -1.0e-2 +0.5 2E3\n\
                    outer loop\n\
                    vertex 1 2 3\n\
                    vertex -1 -2 -3\n\
                    vertex 0.25 0.5 0.75\n\
                    endloop\n\
                    endfacet\n";
        let facet = Facet::read_ascii(&mut Cursor::new(text)).unwrap().unwrap();
        assert_eq!(facet.normal, Vec3::new(-0.01, 0.5, 2000.0));
        assert_eq!(facet.vertices[1].position, Vec3::new(-1.0, -2.0, -3.0));
        // Vertices inherit the facet normal.
        assert_eq!(facet.vertices[0].normal, facet.normal);
    }

    #[test]
    fn test_ascii_end_of_stream() {
        assert!(Facet::read_ascii(&mut Cursor::new("")).unwrap().is_none());
    }

    #[test]
    fn test_ascii_endsolid_terminates() {
        let mut cursor = Cursor::new("endsolid model\n");
        assert!(Facet::read_ascii(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn test_ascii_garbage_line_is_fatal() {
        let mut cursor = Cursor::new("this is not stl\n");
        assert!(matches!(
            Facet::read_ascii(&mut cursor).unwrap_err(),
            StlError::MalformedLine(_)
        ));
    }

    #[test]
    fn test_ascii_unparseable_coordinate_is_fatal() {
        let text = "facet normal 0 0 bogus\n";
        let err = Facet::read_ascii(&mut Cursor::new(text)).unwrap_err();
        match err {
            StlError::InvalidCoordinate { axis, token } => {
                assert_eq!(axis, 'Z');
                assert_eq!(token, "bogus");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_ascii_truncated_facet_is_fatal() {
        let text = "facet normal 0 0 1\nouter loop\nvertex 0 0 0\n";
        let err = Facet::read_ascii(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(err, StlError::UnexpectedEnd));
    }

    #[test]
    fn test_equality_ignores_attribute_but_not_order() {
        let a = sample_facet();
        let mut b = sample_facet();
        b.attribute_byte_count = 99;
        assert_eq!(a, b);

        let mut c = sample_facet();
        c.vertices.swap(0, 1);
        assert_ne!(a, c);
    }
}
