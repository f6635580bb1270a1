//! [OFF] (.off) decoder, including the COFF variant with per-face colors.
//!
//! [OFF]: https://en.wikipedia.org/wiki/OFF_(file_format)

use std::str::SplitAsciiWhitespace;

use crate::{
    common::DEFAULT_COLOR,
    error::{Error, Location, Result},
    normalize,
    utils::{bytes::Lines, float},
    Mesh, RawMesh, Triangle, Vec3,
};

/// Decodes OFF/COFF text.
pub fn from_str(text: &str) -> Result<Mesh> {
    let raw = read_off(text)?;
    Ok(normalize::finalize(raw))
}

/// Decodes OFF/COFF bytes. Invalid UTF-8 is replaced with U+FFFD.
pub fn from_slice(bytes: &[u8]) -> Result<Mesh> {
    from_str(&String::from_utf8_lossy(bytes))
}

/*
https://en.wikipedia.org/wiki/OFF_(file_format)

[C]OFF [vertex_count face_count edge_count]
vertex_count face_count edge_count
x y z
...
n i0 i1 ... i(n-1) [r g b [a]]
...
*/

struct Face {
    /// Range in the shared index buffer.
    start: usize,
    len: usize,
    color: Option<Vec3>,
}

fn read_off(text: &str) -> Result<RawMesh> {
    let mut lines = Lines::new(text)
        .map(|(n, line)| (n, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

    // [C]OFF
    let (header_line, header) = lines.next().unwrap_or((1, ""));
    let Some(rest) = strip_keyword(header) else {
        return Err(Error::InvalidHeader {
            line: header_line,
            found: header.to_owned(),
        });
    };

    // vertex_count face_count [edge_count]
    let (counts_line, counts) = if rest.is_empty() {
        lines.next().ok_or(Error::TruncatedInput {
            what: "count lines",
            expected: 1,
            found: 0,
        })?
    } else {
        (header_line, rest)
    };
    let mut tokens = counts.split_ascii_whitespace();
    let (Some(v), Some(f)) = (tokens.next(), tokens.next()) else {
        return Err(Error::InvalidHeader {
            line: counts_line,
            found: counts.to_owned(),
        });
    };
    let num_vertices = parse_index(text, v)?;
    let num_faces = parse_index(text, f)?;
    // The edge count, and anything after it, is ignored.

    // x y z
    let mut vertices = Vec::with_capacity(num_vertices.min(text.len()));
    for i in 0..num_vertices {
        let (_, line) = lines.next().ok_or(Error::TruncatedInput {
            what: "vertex lines",
            expected: num_vertices,
            found: i,
        })?;
        vertices.push(read_vertex(text, line)?);
    }

    // n i0 ... i(n-1) [r g b [a]]
    let mut faces = Vec::with_capacity(num_faces.min(text.len()));
    let mut indices = vec![];
    for i in 0..num_faces {
        let (_, line) = lines.next().ok_or(Error::TruncatedInput {
            what: "face lines",
            expected: num_faces,
            found: i,
        })?;
        faces.push(read_face(text, line, num_vertices, &mut indices)?);
    }

    Ok(triangulate(&vertices, &faces, &indices))
}

/// Strips the `OFF`/`COFF` keyword, returning the rest of the header line.
fn strip_keyword(line: &str) -> Option<&str> {
    let b = line.as_bytes();
    let n = if b.len() >= 4 && b[..4].eq_ignore_ascii_case(b"COFF") {
        4
    } else if b.len() >= 3 && b[..3].eq_ignore_ascii_case(b"OFF") {
        3
    } else {
        return None;
    };
    let rest = &line[n..];
    if rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace()) {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn read_vertex(text: &str, line: &str) -> Result<Vec3> {
    let mut tokens = line.split_ascii_whitespace();
    let mut v = [0.; 3];
    for x in &mut v {
        *x = next_float(text, line, &mut tokens)?;
    }
    // Anything after z (e.g. per-vertex colors) is ignored.
    Ok(v)
}

fn read_face(
    text: &str,
    line: &str,
    num_vertices: usize,
    indices: &mut Vec<usize>,
) -> Result<Face> {
    let mut tokens = line.split_ascii_whitespace();
    let n = match tokens.next() {
        Some(token) => parse_index(text, token)?,
        None => return Err(Error::malformed("", location_at_end(text, line))),
    };

    let start = indices.len();
    for j in 0..n {
        let Some(token) = tokens.next() else {
            return Err(Error::TruncatedInput {
                what: "face indices",
                expected: n,
                found: j,
            });
        };
        let index = parse_index(text, token)?;
        if index >= num_vertices {
            return Err(Error::IndexOutOfRange {
                index,
                vertices: num_vertices,
                location: location_of(text, token),
            });
        }
        indices.push(index);
    }

    // Trailing values must be numbers. A color needs at least three of them;
    // anything after the third (usually alpha) is read but not used.
    let mut rgb = [0.; 3];
    let mut components = 0;
    for token in tokens {
        let c = parse_float(text, token)?;
        if let Some(slot) = rgb.get_mut(components) {
            *slot = c;
        }
        components += 1;
    }
    let color = (components >= 3).then_some(rgb);

    Ok(Face {
        start,
        len: n,
        color,
    })
}

/// Fan-triangulates every face around its first vertex.
///
/// If any face color has a component above 1, colors are taken to be in
/// 0..=255 and every emitted color is divided by 255. The decision is global
/// and is made only after all faces have been read.
fn triangulate(vertices: &[Vec3], faces: &[Face], indices: &[usize]) -> RawMesh {
    let colored = faces.iter().any(|f| f.color.is_some());
    let rescale = faces
        .iter()
        .filter_map(|f| f.color)
        .flatten()
        .any(|c| c > 1.);
    let divisor = if rescale { 255. } else { 1. };

    let mut raw = RawMesh {
        colors: colored.then(Vec::new),
        ..RawMesh::default()
    };
    raw.reserve(faces.iter().map(|f| f.len.saturating_sub(2)).sum());

    for face in faces {
        let face_indices = &indices[face.start..face.start + face.len];
        let color = face
            .color
            .unwrap_or(DEFAULT_COLOR)
            .map(|c| (c / divisor).clamp(0., 1.));
        // n < 3 yields no triangles.
        for k in 1..face.len.saturating_sub(1) {
            let triangle = Triangle {
                normal: [0.; 3],
                vertices: [
                    vertices[face_indices[0]],
                    vertices[face_indices[k]],
                    vertices[face_indices[k + 1]],
                ],
            };
            if colored {
                raw.push_colored_triangle(&triangle, color);
            } else {
                raw.push_triangle(&triangle);
            }
        }
    }

    tracing::debug!(
        vertices = vertices.len(),
        faces = faces.len(),
        triangles = raw.triangle_count(),
        colored,
        rescale,
        "decoded OFF"
    );
    raw
}

fn next_float(text: &str, line: &str, tokens: &mut SplitAsciiWhitespace<'_>) -> Result<f32> {
    match tokens.next() {
        Some(token) => parse_float(text, token),
        None => Err(Error::malformed("", location_at_end(text, line))),
    }
}

fn parse_float(text: &str, token: &str) -> Result<f32> {
    float::parse_finite(token.as_bytes())
        .ok_or_else(|| Error::malformed(token, location_of(text, token)))
}

fn parse_index(text: &str, token: &str) -> Result<usize> {
    token
        .parse()
        .map_err(|_| Error::malformed(token, location_of(text, token)))
}

// `token` is always a subslice of `text`.
#[cold]
fn location_of(text: &str, token: &str) -> Location {
    let pos = (token.as_ptr() as usize).saturating_sub(text.as_ptr() as usize);
    Location::find(pos.min(text.len()), text.as_bytes())
}

#[cold]
fn location_at_end(text: &str, line: &str) -> Location {
    location_of(text, &line[line.len()..])
}
