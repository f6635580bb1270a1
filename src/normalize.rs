//! Post-processing shared by every decoder.

use crate::{BoundingBox, BoundingSphere, Mesh, RawMesh, Vec3};

/// Turns raw triangle soup into a finished [`Mesh`].
///
/// Normals declared by the source are replaced with normals computed from the
/// triangle geometry, then the mesh is moved so that its bounding-box center
/// is the origin.
pub(crate) fn finalize(raw: RawMesh) -> Mesh {
    let RawMesh {
        mut positions,
        mut normals,
        colors,
    } = raw;
    debug_assert_eq!(positions.len() % 3, 0);
    debug_assert_eq!(positions.len(), normals.len());
    debug_assert!(colors.as_ref().map_or(true, |c| c.len() == positions.len()));

    compute_normals(&positions, &mut normals);

    let center = BoundingBox::from_points(&positions).center();
    for p in &mut positions {
        *p = sub(*p, center);
    }

    let bounding_box = BoundingBox::from_points(&positions);
    // Squared distances of coordinates near f32::MAX overflow f32.
    #[allow(clippy::cast_possible_truncation)]
    let radius = positions
        .iter()
        .map(|p| dot(widen(*p), widen(*p)))
        .fold(0_f64, f64::max)
        .sqrt()
        .min(f64::from(f32::MAX)) as f32;

    tracing::trace!(
        triangles = positions.len() / 3,
        ?center,
        radius,
        "normalized mesh"
    );

    Mesh {
        positions,
        normals,
        colors,
        bounding_box,
        bounding_sphere: BoundingSphere {
            center: [0.; 3],
            radius,
        },
    }
}

/// Overwrites `normals` with one face normal per corner, `(c - b) x (a - b)`.
///
/// The cross product is taken in `f64` so that long edges do not overflow.
fn compute_normals(positions: &[Vec3], normals: &mut [Vec3]) {
    for (tri, out) in positions.chunks_exact(3).zip(normals.chunks_exact_mut(3)) {
        let (a, b, c) = (widen(tri[0]), widen(tri[1]), widen(tri[2]));
        let n = normalized(cross(sub(c, b), sub(a, b)));
        out.fill(n);
    }
}

type DVec3 = [f64; 3];

fn widen(v: Vec3) -> DVec3 {
    v.map(f64::from)
}

fn sub<T: Copy + std::ops::Sub<Output = T>>(a: [T; 3], b: [T; 3]) -> [T; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: DVec3, b: DVec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: DVec3, b: DVec3) -> DVec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

// Degenerate triangles keep a zero normal.
#[allow(clippy::cast_possible_truncation)]
fn normalized(v: DVec3) -> Vec3 {
    let len = dot(v, v).sqrt();
    if len > 0. && len.is_finite() {
        v.map(|x| (x / len) as f32)
    } else {
        [0.; 3]
    }
}
