//! Convex planar polygons and plane splitting.

use ductkit_math::{Plane, Point3, Tolerance, Transform, Vec3};

use crate::Rgba;

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

/// A convex planar polygon with counter-clockwise winding seen from outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point3>,
    plane: Plane,
    color: Option<Rgba>,
}

/// Buckets filled by [`Polygon::split`].
#[derive(Debug, Default)]
pub(crate) struct Split {
    pub coplanar_front: Vec<Polygon>,
    pub coplanar_back: Vec<Polygon>,
    pub front: Vec<Polygon>,
    pub back: Vec<Polygon>,
}

impl Polygon {
    /// Build a polygon from its vertices.
    ///
    /// Consecutive duplicate points are dropped. Returns `None` when fewer
    /// than three distinct points remain or the points enclose no area.
    pub fn new(vertices: Vec<Point3>, color: Option<Rgba>) -> Option<Self> {
        let vertices = dedup_ring(vertices);
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_normal_and_point(&newell_normal(&vertices), &vertices[0])?;
        Some(Self {
            vertices,
            plane,
            color,
        })
    }

    fn with_plane(vertices: Vec<Point3>, plane: Plane, color: Option<Rgba>) -> Self {
        Self {
            vertices,
            plane,
            color,
        }
    }

    /// Vertex positions in winding order.
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Supporting plane; its normal points outward.
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Display color, if one was assigned.
    pub fn color(&self) -> Option<Rgba> {
        self.color
    }

    pub(crate) fn set_color(&mut self, color: Rgba) {
        self.color = Some(color);
    }

    /// Reverse the winding and the plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane = self.plane.flipped();
    }

    /// Map every vertex through `transform`.
    ///
    /// Mirroring transforms reverse the winding so the normal stays outward.
    pub(crate) fn transformed(&self, transform: &Transform) -> Option<Self> {
        let mut vertices: Vec<Point3> = self
            .vertices
            .iter()
            .map(|p| transform.apply_point(p))
            .collect();
        if transform.is_mirroring() {
            vertices.reverse();
        }
        Self::new(vertices, self.color)
    }

    /// Classify against `plane` and distribute into the split buckets,
    /// cutting spanning polygons in two.
    pub(crate) fn split(&self, plane: &Plane, out: &mut Split) {
        let eps = Tolerance::PLANE.linear;
        let mut kind = COPLANAR;
        let sides: Vec<u8> = self
            .vertices
            .iter()
            .map(|p| {
                let t = plane.signed_distance(p);
                let side = if t < -eps {
                    BACK
                } else if t > eps {
                    FRONT
                } else {
                    COPLANAR
                };
                kind |= side;
                side
            })
            .collect();

        match kind {
            COPLANAR => {
                if plane.normal.dot(&self.plane.normal) > 0.0 {
                    out.coplanar_front.push(self.clone());
                } else {
                    out.coplanar_back.push(self.clone());
                }
            }
            FRONT => out.front.push(self.clone()),
            BACK => out.back.push(self.clone()),
            _ => {
                let n = self.vertices.len();
                let mut f = Vec::with_capacity(n + 1);
                let mut b = Vec::with_capacity(n + 1);
                for i in 0..n {
                    let j = (i + 1) % n;
                    let (si, sj) = (sides[i], sides[j]);
                    let (vi, vj) = (self.vertices[i], self.vertices[j]);
                    if si != BACK {
                        f.push(vi);
                    }
                    if si != FRONT {
                        b.push(vi);
                    }
                    if si | sj == SPANNING {
                        let edge: Vec3 = vj - vi;
                        let t = -plane.signed_distance(&vi) / plane.normal.dot(&edge);
                        let v = vi + edge * t;
                        f.push(v);
                        b.push(v);
                    }
                }
                if f.len() >= 3 {
                    out.front.push(Self::with_plane(f, self.plane, self.color));
                }
                if b.len() >= 3 {
                    out.back.push(Self::with_plane(b, self.plane, self.color));
                }
            }
        }
    }

    /// Fan triangulation as index triples into [`Polygon::vertices`].
    pub(crate) fn fan(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        (1..self.vertices.len() - 1).map(|i| [0, i, i + 1])
    }
}

fn newell_normal(vertices: &[Point3]) -> Vec3 {
    let mut normal = Vec3::zeros();
    for (i, a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

fn dedup_ring(mut vertices: Vec<Point3>) -> Vec<Point3> {
    let tol = Tolerance::DEFAULT;
    vertices.dedup_by(|a, b| tol.points_equal(a, b));
    while vertices.len() > 1 && tol.points_equal(&vertices[0], &vertices[vertices.len() - 1]) {
        vertices.pop();
    }
    vertices
}
