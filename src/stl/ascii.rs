/*
https://en.wikipedia.org/wiki/STL_(file_format)#ASCII_STL

solid name

facet normal ni nj nk
  outer loop
    vertex v1x v1y v1z
    vertex v2x v2y v2z
    vertex v3x v3y v3z
  endloop
endfacet

endsolid name
*/

use std::borrow::Cow;

use crate::{
    error::{Error, Location, Result},
    utils::{bytes::Tokens, float},
    RawMesh, Triangle, Vec3,
};

/// One element of the facet grammar.
#[derive(Clone, Copy)]
enum Pattern {
    Keyword(&'static [u8]),
    Float,
}

use self::Pattern::{Float, Keyword};

const FACET: [Pattern; 21] = [
    Keyword(b"facet"),
    Keyword(b"normal"),
    Float,
    Float,
    Float,
    Keyword(b"outer"),
    Keyword(b"loop"),
    Keyword(b"vertex"),
    Float,
    Float,
    Float,
    Keyword(b"vertex"),
    Float,
    Float,
    Float,
    Keyword(b"vertex"),
    Float,
    Float,
    Float,
    Keyword(b"endloop"),
    Keyword(b"endfacet"),
];

const NUM_FLOATS: usize = 12;

/// Scans `bytes` for every facet that matches the grammar, in order.
///
/// Matching works on whitespace-separated tokens, so a keyword only counts
/// when it is a whole token: `xfacet normal ...` or `facet normal 0 0 1outer`
/// is not a facet. Anything between facets, including `solid`/`endsolid`
/// lines and facets written in some other form, is skipped. The grammar only admits plain
/// decimal numbers, so the only numeric failure left is overflow (e.g. `1e99`).
pub(super) fn read_ascii_stl(bytes: &[u8]) -> Result<RawMesh> {
    let text = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = text {
        tracing::debug!("ASCII STL contains invalid UTF-8; decoding lossily");
    }
    let text = text.as_bytes();
    let tokens: Vec<(usize, &[u8])> = Tokens::new(text).collect();

    let mut raw = RawMesh::default();
    let mut skipped = 0_usize;
    let mut i = 0;
    while i < tokens.len() {
        match match_facet(&tokens[i..]) {
            Some(floats) => {
                raw.push_triangle(&read_triangle(text, &floats)?);
                i += FACET.len();
            }
            None => {
                skipped += 1;
                i += 1;
            }
        }
    }
    tracing::trace!(
        facets = raw.triangle_count(),
        skipped_tokens = skipped,
        "scanned ASCII STL"
    );
    Ok(raw)
}

/// Returns the 12 float tokens if `tokens` starts with a complete facet.
fn match_facet<'a>(tokens: &[(usize, &'a [u8])]) -> Option<[(usize, &'a [u8]); NUM_FLOATS]> {
    let tokens = tokens.get(..FACET.len())?;
    let mut floats = [(0, &b""[..]); NUM_FLOATS];
    let mut n = 0;
    for (&(pos, token), pattern) in tokens.iter().zip(FACET) {
        match pattern {
            Keyword(keyword) => {
                if token != keyword {
                    return None;
                }
            }
            Float => {
                if !float::is_decimal(token) {
                    return None;
                }
                floats[n] = (pos, token);
                n += 1;
            }
        }
    }
    Some(floats)
}

fn read_triangle(text: &[u8], floats: &[(usize, &[u8]); NUM_FLOATS]) -> Result<Triangle> {
    let mut values = [0_f32; NUM_FLOATS];
    for (value, &(pos, token)) in values.iter_mut().zip(floats) {
        *value = float::parse_finite(token).ok_or_else(|| {
            Error::malformed(
                String::from_utf8_lossy(token),
                Location::find(pos, text),
            )
        })?;
    }
    let vec3 = |i: usize| -> Vec3 { [values[i], values[i + 1], values[i + 2]] };
    Ok(Triangle {
        normal: vec3(0),
        vertices: [vec3(3), vec3(6), vec3(9)],
    })
}
