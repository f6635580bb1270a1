pub type Vec3 = [f32; 3];

/// Color assigned to OFF faces that do not carry their own color.
pub(crate) const DEFAULT_COLOR: Vec3 = [0.8, 0.8, 0.8];

/// Normalized triangle soup.
///
/// Every triangle corner owns its position, normal and (optionally) color;
/// nothing is indexed or shared. The mesh is centered so that the center of
/// its bounding box is the origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub(crate) positions: Vec<Vec3>,
    pub(crate) normals: Vec<Vec3>,
    pub(crate) colors: Option<Vec<Vec3>>,
    pub(crate) bounding_box: BoundingBox,
    pub(crate) bounding_sphere: BoundingSphere,
}

impl Mesh {
    /// Corner positions, three per triangle.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Corner normals, computed from triangle geometry.
    #[must_use]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Corner colors in `[0, 1]`, or `None` if the source carried no color.
    #[must_use]
    pub fn colors(&self) -> Option<&[Vec3]> {
        self.colors.as_deref()
    }

    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    #[must_use]
    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.bounding_sphere
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns `(positions, normals, colors)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Vec3>, Vec<Vec3>, Option<Vec<Vec3>>) {
        (self.positions, self.normals, self.colors)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[non_exhaustive]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Computes the bounding box of `points`. Returns an all-zero box for an
    /// empty slice.
    pub(crate) fn from_points(points: &[Vec3]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let mut min = *first;
        let mut max = *first;
        for p in &points[1..] {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Self { min, max }
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        // Halve first; `min + max` overflows near f32::MAX.
        [
            self.min[0] * 0.5 + self.max[0] * 0.5,
            self.min[1] * 0.5 + self.max[1] * 0.5,
            self.min[2] * 0.5 + self.max[2] * 0.5,
        ]
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[non_exhaustive]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

pub(crate) struct Triangle {
    pub(crate) normal: Vec3,
    pub(crate) vertices: [Vec3; 3],
}

/// Triangle soup as produced by a decoder, before normalization.
#[derive(Debug, Default)]
pub(crate) struct RawMesh {
    pub(crate) positions: Vec<Vec3>,
    pub(crate) normals: Vec<Vec3>,
    pub(crate) colors: Option<Vec<Vec3>>,
}

impl RawMesh {
    /// Reserves capacity for at least `num_triangles` more triangles.
    pub(crate) fn reserve(&mut self, num_triangles: usize) {
        let corners = num_triangles.saturating_mul(3);
        self.positions.reserve_exact(corners);
        self.normals.reserve_exact(corners);
        if let Some(colors) = &mut self.colors {
            colors.reserve_exact(corners);
        }
    }

    /// Appends a triangle, replicating its declared normal on every corner.
    pub(crate) fn push_triangle(&mut self, triangle: &Triangle) {
        self.positions.extend_from_slice(&triangle.vertices);
        self.normals.extend_from_slice(&[triangle.normal; 3]);
    }

    /// Appends a triangle whose three corners share `color`.
    pub(crate) fn push_colored_triangle(&mut self, triangle: &Triangle, color: Vec3) {
        self.push_triangle(triangle);
        self.colors
            .get_or_insert_with(Vec::new)
            .extend_from_slice(&[color; 3]);
    }

    pub(crate) fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }
}
