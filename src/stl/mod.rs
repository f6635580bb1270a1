//! [STL] (.stl) decoder and binary encoder.
//!
//! [STL]: https://en.wikipedia.org/wiki/STL_(file_format)

mod ascii;

use std::io;

use crate::{
    error::{Error, Location, Result},
    normalize, Format, Mesh, RawMesh, Triangle, Vec3,
};

/// Decodes binary or ASCII STL, choosing the representation with [`sniff`].
pub fn from_slice(bytes: &[u8]) -> Result<Mesh> {
    match sniff(bytes) {
        Format::AsciiStl => from_ascii_slice(bytes),
        _ => from_binary_slice(bytes),
    }
}

/// Decodes ASCII STL text. Facets that do not follow the STL grammar are skipped.
pub fn from_ascii_slice(bytes: &[u8]) -> Result<Mesh> {
    let raw = ascii::read_ascii_stl(bytes)?;
    tracing::debug!(triangles = raw.triangle_count(), "decoded ASCII STL");
    Ok(normalize::finalize(raw))
}

/// Decodes binary STL.
pub fn from_binary_slice(bytes: &[u8]) -> Result<Mesh> {
    let raw = read_binary_stl(bytes)?;
    tracing::debug!(triangles = raw.triangle_count(), "decoded binary STL");
    Ok(normalize::finalize(raw))
}

/// Classifies `bytes` as [`Format::AsciiStl`] or [`Format::BinaryStl`].
///
/// Only the first 80 bytes are inspected. If, after leading whitespace, they
/// begin with `solid`, the input is taken to be ASCII; anything else is
/// binary. A binary header that happens to begin with `solid` is therefore
/// reported as ASCII; use [`from_binary_slice`] when the representation is
/// known.
#[must_use]
pub fn sniff(bytes: &[u8]) -> Format {
    let header = &bytes[..bytes.len().min(HEADER_SIZE)];
    // Bytes are read as Latin-1, where 0xA0 is a no-break space.
    let start = header
        .iter()
        .position(|&b| !(crate::utils::bytes::is_space(b) || b == 0xA0))
        .unwrap_or(header.len());
    if header[start..].starts_with(b"solid") {
        Format::AsciiStl
    } else {
        Format::BinaryStl
    }
}

/*
https://en.wikipedia.org/wiki/STL_(file_format)#Binary_STL

UINT8[80]    – Header                 -     80 bytes
UINT32       – Number of triangles    -      4 bytes

foreach triangle                      - 50 bytes:
    REAL32[3] – Normal vector             - 12 bytes
    REAL32[3] – Vertex 1                  - 12 bytes
    REAL32[3] – Vertex 2                  - 12 bytes
    REAL32[3] – Vertex 3                  - 12 bytes
    UINT16    – Attribute byte count      -  2 bytes
end
*/
const HEADER_SIZE: usize = 80;
const TRIANGLE_COUNT_SIZE: usize = 4;
const TRIANGLE_SIZE: usize = 50;
// Normal and vertices; the attribute field is never read.
const TRIANGLE_DATA_SIZE: usize = 48;

/// Written at the start of encoded files. Must not begin with `solid`.
const ENCODER_HEADER: &[u8] = b"binary STL written by mesh-decoder";

fn read_binary_stl(bytes: &[u8]) -> Result<RawMesh> {
    let num_triangles = match bytes.get(HEADER_SIZE..HEADER_SIZE + TRIANGLE_COUNT_SIZE) {
        Some(&[a, b, c, d]) => u32::from_le_bytes([a, b, c, d]),
        _ => {
            return Err(Error::TruncatedInput {
                what: "header bytes",
                expected: HEADER_SIZE + TRIANGLE_COUNT_SIZE,
                found: bytes.len(),
            })
        }
    };

    let expected = (HEADER_SIZE + TRIANGLE_COUNT_SIZE) as u64
        + u64::from(num_triangles) * TRIANGLE_SIZE as u64;
    let actual = bytes.len() as u64;
    // The last record may be missing one byte of its (unused) attribute field.
    if num_triangles == 0 || expected > actual + 1 {
        return Err(Error::SizeMismatch {
            triangles: num_triangles,
            expected,
            actual,
        });
    }
    if expected < actual {
        tracing::warn!(
            triangles = num_triangles,
            trailing = actual - expected,
            "ignoring trailing bytes after binary STL triangles"
        );
    }

    let mut raw = RawMesh::default();
    raw.reserve(num_triangles as usize);
    let body = &bytes[HEADER_SIZE + TRIANGLE_COUNT_SIZE..];
    for i in 0..num_triangles as usize {
        let record = body
            .get(i * TRIANGLE_SIZE..i * TRIANGLE_SIZE + TRIANGLE_DATA_SIZE)
            .ok_or(Error::TruncatedInput {
                what: "triangle records",
                expected: num_triangles as usize,
                found: i,
            })?;
        let triangle = read_binary_triangle(record).ok_or_else(|| {
            Error::malformed("non-finite float", Location::Triangle(i))
        })?;
        raw.push_triangle(&triangle);
    }
    Ok(raw)
}

/// Reads a 48-byte record. Returns `None` if any component is not finite.
fn read_binary_triangle(mut buf: &[u8]) -> Option<Triangle> {
    fn vec3(buf: &mut &[u8]) -> Option<Vec3> {
        let mut v = [0.; 3];
        for x in &mut v {
            let (head, tail) = buf.split_at(4);
            *x = f32::from_le_bytes([head[0], head[1], head[2], head[3]]);
            *buf = tail;
        }
        v.iter().all(|x| x.is_finite()).then_some(v)
    }

    let normal = vec3(&mut buf)?;
    let vertex1 = vec3(&mut buf)?;
    let vertex2 = vec3(&mut buf)?;
    let vertex3 = vec3(&mut buf)?;
    Some(Triangle {
        normal,
        vertices: [vertex1, vertex2, vertex3],
    })
}

/// Writes `mesh` as binary STL.
///
/// Each record carries the normal of the triangle's first corner and a zero
/// attribute field.
pub fn write_binary<W: io::Write>(mesh: &Mesh, mut writer: W) -> io::Result<()> {
    let num_triangles = u32::try_from(mesh.triangle_count()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "number of triangles is greater than u32::MAX",
        )
    })?;

    let mut header = [0_u8; HEADER_SIZE];
    header[..ENCODER_HEADER.len()].copy_from_slice(ENCODER_HEADER);
    writer.write_all(&header)?;
    writer.write_all(&num_triangles.to_le_bytes())?;

    let mut record = [0_u8; TRIANGLE_SIZE];
    for (vertices, normals) in mesh
        .positions()
        .chunks_exact(3)
        .zip(mesh.normals().chunks_exact(3))
    {
        let fields = [normals[0], vertices[0], vertices[1], vertices[2]];
        for (chunk, v) in record.chunks_exact_mut(12).zip(fields) {
            for (bytes, x) in chunk.chunks_exact_mut(4).zip(v) {
                bytes.copy_from_slice(&x.to_le_bytes());
            }
        }
        writer.write_all(&record)?;
    }
    writer.flush()
}

/// Encodes `mesh` as binary STL.
pub fn to_binary(mesh: &Mesh) -> io::Result<Vec<u8>> {
    let mut out =
        Vec::with_capacity(HEADER_SIZE + TRIANGLE_COUNT_SIZE + mesh.triangle_count() * TRIANGLE_SIZE);
    write_binary(mesh, &mut out)?;
    Ok(out)
}
