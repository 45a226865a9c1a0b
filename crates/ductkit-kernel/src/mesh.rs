//! Flat triangle meshes for export.

use crate::polygon::Polygon;

/// Output triangle mesh for export and measurement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
    /// Flat array of vertex normals, same length as `vertices`.
    pub normals: Vec<f32>,
}

/// One triangle with its facet normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Facet normal.
    pub normal: [f32; 3],
    /// Corner positions, counter-clockwise seen from outside.
    pub corners: [[f32; 3]; 3],
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_polygons(polygons: &[Polygon]) -> Self {
        let mut mesh = Self::new();
        for polygon in polygons {
            let offset = mesh.num_vertices() as u32;
            let n = polygon.plane().normal;
            for p in polygon.vertices() {
                mesh.vertices
                    .extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
                mesh.normals
                    .extend_from_slice(&[n.x as f32, n.y as f32, n.z as f32]);
            }
            for tri in polygon.fan() {
                mesh.indices
                    .extend(tri.iter().map(|&i| offset + i as u32));
            }
        }
        mesh
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    fn position(&self, index: u32) -> [f32; 3] {
        let i = index as usize * 3;
        [self.vertices[i], self.vertices[i + 1], self.vertices[i + 2]]
    }

    /// Iterate triangles with facet normals taken from the first corner.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            let i = tri[0] as usize * 3;
            Triangle {
                normal: [self.normals[i], self.normals[i + 1], self.normals[i + 2]],
                corners: [
                    self.position(tri[0]),
                    self.position(tri[1]),
                    self.position(tri[2]),
                ],
            }
        })
    }

    /// Signed volume by the divergence theorem.
    pub fn volume(&self) -> f64 {
        self.triangles()
            .map(|t| {
                let [a, b, c] = t.corners.map(|p| p.map(f64::from));
                (a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
                    + a[2] * (b[0] * c[1] - b[1] * c[0]))
                    / 6.0
            })
            .sum()
    }
}
