//! Incremental 3D convex hull.
//!
//! Seeds a tetrahedron from extreme points, then folds in every remaining
//! point: faces that see the point are removed and the horizon is capped
//! with a fan to the new apex.

use std::collections::HashSet;

use ductkit_math::{Point3, Vec3};

use crate::polygon::Polygon;

/// Relative coplanarity band, scaled by the extent of the cloud.
const EPSILON: f64 = 1e-9;

struct Face {
    verts: [usize; 3],
    normal: Vec3,
    offset: f64,
}

impl Face {
    fn new(points: &[Point3], verts: [usize; 3]) -> Self {
        let [a, b, c] = verts.map(|i| points[i]);
        let normal = (b - a).cross(&(c - a)).normalize();
        Self {
            verts,
            normal,
            offset: normal.dot(&a.coords),
        }
    }

    fn distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&p.coords) - self.offset
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.verts;
        [(a, b), (b, c), (c, a)]
    }
}

/// Outward-wound triangles of the hull of `points`. Empty when the
/// points span no volume.
pub(crate) fn hull(points: &[Point3]) -> Vec<Polygon> {
    let Some(extent) = extent(points) else {
        return Vec::new();
    };
    let eps = EPSILON * extent.max(1.0);
    let Some(seed) = seed_tetrahedron(points, eps) else {
        return Vec::new();
    };

    let centroid = Point3::from(
        seed.iter().map(|&i| points[i].coords).sum::<Vec3>() / 4.0,
    );
    let [a, b, c, d] = seed;
    let mut faces: Vec<Face> = [[a, b, c], [a, b, d], [a, c, d], [b, c, d]]
        .into_iter()
        .map(|[x, y, z]| {
            let face = Face::new(points, [x, y, z]);
            if face.distance(&centroid) > 0.0 {
                Face::new(points, [x, z, y])
            } else {
                face
            }
        })
        .collect();

    for (i, p) in points.iter().enumerate() {
        if seed.contains(&i) {
            continue;
        }
        let (visible, kept): (Vec<Face>, Vec<Face>) =
            faces.into_iter().partition(|f| f.distance(p) > eps);
        faces = kept;
        if visible.is_empty() {
            continue;
        }
        let edges: HashSet<(usize, usize)> = visible.iter().flat_map(Face::edges).collect();
        for &(u, v) in &edges {
            if !edges.contains(&(v, u)) {
                faces.push(Face::new(points, [u, v, i]));
            }
        }
    }

    faces
        .iter()
        .filter_map(|f| Polygon::new(f.verts.iter().map(|&i| points[i]).collect(), None))
        .collect()
}

fn extent(points: &[Point3]) -> Option<f64> {
    let first = points.first()?;
    let (mut min, mut max) = (first.coords, first.coords);
    for p in points {
        min = min.inf(&p.coords);
        max = max.sup(&p.coords);
    }
    Some((max - min).amax())
}

fn farthest(points: &[Point3], metric: impl Fn(&Point3) -> f64) -> (usize, f64) {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, metric(p)))
        .fold((0, f64::NEG_INFINITY), |best, cur| if cur.1 > best.1 { cur } else { best })
}

fn seed_tetrahedron(points: &[Point3], eps: f64) -> Option<[usize; 4]> {
    let (a, _) = farthest(points, |p| -p.x);
    let (b, ab) = farthest(points, |p| (p - points[a]).norm());
    if ab <= eps {
        return None;
    }
    let line = (points[b] - points[a]) / ab;
    let (c, off_line) = farthest(points, |p| (p - points[a]).cross(&line).norm());
    if off_line <= eps {
        return None;
    }
    let normal = (points[b] - points[a])
        .cross(&(points[c] - points[a]))
        .normalize();
    let (d, off_plane) = farthest(points, |p| normal.dot(&(p - points[a])).abs());
    if off_plane <= eps {
        return None;
    }
    Some([a, b, c, d])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners(size: f64) -> Vec<Point3> {
        (0..8)
            .map(|i| {
                Point3::new(
                    if i & 1 != 0 { size } else { 0.0 },
                    if i & 2 != 0 { size } else { 0.0 },
                    if i & 4 != 0 { size } else { 0.0 },
                )
            })
            .collect()
    }

    #[test]
    fn test_hull_of_cube_corners_has_twelve_triangles() {
        let mut points = corners(2.0);
        points.push(Point3::new(1.0, 1.0, 1.0));
        let faces = hull(&points);
        assert_eq!(faces.len(), 12);
        let center = Point3::new(1.0, 1.0, 1.0);
        assert!(faces
            .iter()
            .all(|f| f.plane().signed_distance(&center) < 0.0));
    }

    #[test]
    fn test_coplanar_points_have_no_hull() {
        let points: Vec<Point3> = corners(1.0).into_iter().filter(|p| p.z == 0.0).collect();
        assert!(hull(&points).is_empty());
        assert!(hull(&[]).is_empty());
    }
}
