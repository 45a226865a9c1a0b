#![warn(missing_docs)]

//! Polygon-mesh solid kernel for ductkit.
//!
//! Provides the [`Solid`] type: an immutable closed polygon soup that can
//! be created from primitives, combined with BSP boolean operations,
//! transformed, colored and measured.
//!
//! # Example
//!
//! ```
//! use ductkit_kernel::Solid;
//! use ductkit_math::Vec3;
//!
//! let cube = Solid::cuboid(&Vec3::new(10.0, 20.0, 30.0)).unwrap();
//! let hole = Solid::cylinder(2.0, 40.0, 16).unwrap();
//! let part = cube.difference(&hole);
//! assert!(part.to_mesh().num_triangles() > 12);
//! ```

mod bsp;
pub mod error;
mod hull;
pub mod mesh;
pub mod polygon;
mod primitives;

pub use ductkit_math;
pub use error::KernelError;
pub use mesh::{Triangle, TriangleMesh};
pub use polygon::Polygon;

use ductkit_math::{Point3, Transform, Vec3};

use bsp::Node;
use error::Result;

/// Linear RGBA color, each channel in `0.0..=1.0`.
pub type Rgba = [f64; 4];

/// Boolean set operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    /// A ∪ B
    Union,
    /// A − B
    Difference,
    /// A ∩ B
    Intersection,
}

/// A 3D solid geometry object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solid {
    polygons: Vec<Polygon>,
}

impl Solid {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create an empty solid.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an existing closed polygon soup.
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// Box of the given `(width, height, depth)` centered on the origin.
    pub fn cuboid(size: &Vec3) -> Result<Self> {
        primitives::cuboid(size).map(Self::from_polygons)
    }

    /// Cylinder along Z, centered on the origin.
    pub fn cylinder(radius: f64, height: f64, segments: u32) -> Result<Self> {
        primitives::frustum(radius, radius, height, segments).map(Self::from_polygons)
    }

    /// Cone or frustum along Z, centered on the origin.
    pub fn cone(radius_bottom: f64, radius_top: f64, height: f64, segments: u32) -> Result<Self> {
        primitives::frustum(radius_bottom, radius_top, height, segments).map(Self::from_polygons)
    }

    /// UV sphere centered on the origin.
    pub fn sphere(radius: f64, segments: u32) -> Result<Self> {
        primitives::sphere(radius, segments).map(Self::from_polygons)
    }

    /// Prism along Z over a rounded rectangle, centered on the origin.
    /// `radii` are `[top_left, top_right, bottom_right, bottom_left]`.
    pub fn round_rect(
        width: f64,
        height: f64,
        depth: f64,
        radii: [f64; 4],
        segments: u32,
    ) -> Result<Self> {
        primitives::round_rect(width, height, depth, radii, segments).map(Self::from_polygons)
    }

    /// Convex hull of every vertex of `solids`. Empty when the vertices
    /// span no volume.
    pub fn hull<'a>(solids: impl IntoIterator<Item = &'a Solid>) -> Solid {
        let points: Vec<Point3> = solids
            .into_iter()
            .flat_map(|s| s.polygons.iter().flat_map(|p| p.vertices().iter().copied()))
            .collect();
        Self::from_polygons(hull::hull(&points))
    }

    // =========================================================================
    // CSG boolean operations
    // =========================================================================

    /// Boolean union (self ∪ other).
    pub fn union(&self, other: &Solid) -> Solid {
        self.boolean(other, BooleanOp::Union)
    }

    /// Boolean difference (self − other).
    pub fn difference(&self, other: &Solid) -> Solid {
        self.boolean(other, BooleanOp::Difference)
    }

    /// Boolean intersection (self ∩ other).
    pub fn intersection(&self, other: &Solid) -> Solid {
        self.boolean(other, BooleanOp::Intersection)
    }

    /// Apply `op` with `other` as the right-hand operand.
    pub fn boolean(&self, other: &Solid, op: BooleanOp) -> Solid {
        if self.is_empty() || other.is_empty() {
            return match op {
                BooleanOp::Union if self.is_empty() => other.clone(),
                BooleanOp::Union | BooleanOp::Difference => self.clone(),
                BooleanOp::Intersection => Solid::empty(),
            };
        }
        if !self.overlaps(other) {
            return match op {
                BooleanOp::Union => {
                    let mut polygons = self.polygons.clone();
                    polygons.extend(other.polygons.iter().cloned());
                    Solid { polygons }
                }
                BooleanOp::Difference => self.clone(),
                BooleanOp::Intersection => Solid::empty(),
            };
        }

        let mut a = Node::new(self.polygons.clone());
        let mut b = Node::new(other.polygons.clone());
        match op {
            BooleanOp::Union => {
                a.clip_to(&b);
                b.clip_to(&a);
                b.invert();
                b.clip_to(&a);
                b.invert();
                a.build(b.all_polygons());
            }
            BooleanOp::Difference => {
                a.invert();
                a.clip_to(&b);
                b.clip_to(&a);
                b.invert();
                b.clip_to(&a);
                b.invert();
                a.build(b.all_polygons());
                a.invert();
            }
            BooleanOp::Intersection => {
                a.invert();
                b.clip_to(&a);
                b.invert();
                a.clip_to(&b);
                b.clip_to(&a);
                a.build(b.all_polygons());
                a.invert();
            }
        }
        Solid {
            polygons: a.all_polygons(),
        }
    }

    // =========================================================================
    // Transforms & appearance
    // =========================================================================

    /// Map the solid through an affine transform.
    ///
    /// Mirroring transforms flip polygon winding so faces stay outward.
    /// Singular or non-finite matrices are rejected.
    pub fn transform(&self, transform: &Transform) -> Result<Solid> {
        if transform.matrix.iter().any(|v| !v.is_finite()) {
            return Err(KernelError::NonFinite("transform matrix"));
        }
        if transform.is_singular() {
            return Err(KernelError::SingularTransform {
                determinant: transform.determinant(),
            });
        }
        Ok(Solid {
            polygons: self
                .polygons
                .iter()
                .filter_map(|p| p.transformed(transform))
                .collect(),
        })
    }

    /// Assign one color to every face.
    pub fn colorize(&self, color: Rgba) -> Solid {
        let mut polygons = self.polygons.clone();
        for polygon in &mut polygons {
            polygon.set_color(color);
        }
        Solid { polygons }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Check if the solid is empty (has no faces).
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// The faces of the solid.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Axis-aligned bounding box as `(min, max)`, or `None` when empty.
    pub fn bounding_box(&self) -> Option<([f64; 3], [f64; 3])> {
        let mut points = self.polygons.iter().flat_map(|p| p.vertices().iter());
        let first = points.next()?;
        let mut min = [first.x, first.y, first.z];
        let mut max = min;
        for p in points {
            for (axis, v) in [p.x, p.y, p.z].into_iter().enumerate() {
                min[axis] = min[axis].min(v);
                max[axis] = max[axis].max(v);
            }
        }
        Some((min, max))
    }

    fn overlaps(&self, other: &Solid) -> bool {
        match (self.bounding_box(), other.bounding_box()) {
            (Some((amin, amax)), Some((bmin, bmax))) => {
                (0..3).all(|i| amin[i] <= bmax[i] && amax[i] >= bmin[i])
            }
            _ => false,
        }
    }

    /// Fan-triangulated mesh of every face.
    pub fn to_mesh(&self) -> TriangleMesh {
        TriangleMesh::from_polygons(&self.polygons)
    }

    /// Enclosed volume.
    pub fn volume(&self) -> f64 {
        self.to_mesh().volume()
    }

    /// Number of triangles in the tessellated mesh.
    pub fn num_triangles(&self) -> usize {
        self.polygons.iter().map(|p| p.vertices().len() - 2).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ductkit_math::{Plane, Point3};

    fn cube(size: f64) -> Solid {
        Solid::cuboid(&Vec3::new(size, size, size)).unwrap()
    }

    fn shifted(solid: &Solid, x: f64, y: f64, z: f64) -> Solid {
        solid
            .transform(&Transform::translation(&Vec3::new(x, y, z)))
            .unwrap()
    }

    #[test]
    fn test_cuboid_is_centered() {
        let (min, max) = Solid::cuboid(&Vec3::new(2.0, 4.0, 6.0))
            .unwrap()
            .bounding_box()
            .unwrap();
        assert_eq!(min, [-1.0, -2.0, -3.0]);
        assert_eq!(max, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_cuboid_volume() {
        assert_relative_eq!(cube(10.0).volume(), 1000.0, epsilon = 1e-3);
        assert_eq!(cube(10.0).num_triangles(), 12);
    }

    #[test]
    fn test_degenerate_primitives_fail() {
        assert!(matches!(
            Solid::cuboid(&Vec3::new(0.0, 1.0, 1.0)),
            Err(KernelError::Degenerate { primitive: "cuboid", .. })
        ));
        assert!(Solid::cylinder(1.0, 1.0, 2).is_err());
        assert!(Solid::cone(0.0, 0.0, 1.0, 16).is_err());
        assert!(matches!(
            Solid::sphere(f64::NAN, 16),
            Err(KernelError::NonFinite("sphere"))
        ));
    }

    #[test]
    fn test_cylinder_bounds() {
        let (min, max) = Solid::cylinder(5.0, 10.0, 32)
            .unwrap()
            .bounding_box()
            .unwrap();
        assert_relative_eq!(min[0], -5.0, epsilon = 1e-9);
        assert_relative_eq!(max[1], 5.0, epsilon = 1e-9);
        assert_relative_eq!(min[2], -5.0);
        assert_relative_eq!(max[2], 5.0);
    }

    #[test]
    fn test_cone_volume_approaches_formula() {
        let cone = Solid::cone(3.0, 0.0, 6.0, 64).unwrap();
        let exact = std::f64::consts::PI * 9.0 * 6.0 / 3.0;
        assert_relative_eq!(cone.volume(), exact, max_relative = 0.01);
    }

    #[test]
    fn test_union_of_overlapping_cubes() {
        let a = cube(2.0);
        let b = shifted(&a, 1.0, 0.0, 0.0);
        let u = a.union(&b);
        assert_relative_eq!(u.volume(), 12.0, epsilon = 1e-3);
        let (min, max) = u.bounding_box().unwrap();
        assert_relative_eq!(min[0], -1.0, epsilon = 1e-9);
        assert_relative_eq!(max[0], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_difference_removes_overlap() {
        let a = cube(2.0);
        let b = shifted(&a, 1.0, 0.0, 0.0);
        let d = a.difference(&b);
        assert_relative_eq!(d.volume(), 4.0, epsilon = 1e-3);
        let (_, max) = d.bounding_box().unwrap();
        assert_relative_eq!(max[0], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_intersection_keeps_overlap() {
        let a = cube(2.0);
        let b = shifted(&a, 1.0, 0.0, 0.0);
        let i = a.intersection(&b);
        assert_relative_eq!(i.volume(), 4.0, epsilon = 1e-3);
        let (min, max) = i.bounding_box().unwrap();
        assert_relative_eq!(min[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(max[0], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_disjoint_operands_short_circuit() {
        let a = cube(2.0);
        let b = shifted(&a, 10.0, 0.0, 0.0);
        assert_eq!(a.union(&b).polygons().len(), 12);
        assert_eq!(a.difference(&b), a);
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn test_empty_operands() {
        let a = cube(2.0);
        let e = Solid::empty();
        assert_eq!(e.union(&a), a);
        assert_eq!(a.union(&e), a);
        assert_eq!(a.difference(&e), a);
        assert!(e.difference(&a).is_empty());
        assert!(a.intersection(&e).is_empty());
        assert!(e.bounding_box().is_none());
    }

    #[test]
    fn test_mirror_preserves_volume_sign() {
        let a = shifted(&cube(2.0), 3.0, 0.0, 0.0);
        let plane = Plane::from_normal_and_point(&Vec3::x(), &Point3::origin()).unwrap();
        let m = a.transform(&Transform::mirror(&plane)).unwrap();
        assert_relative_eq!(m.volume(), 8.0, epsilon = 1e-3);
        let (min, max) = m.bounding_box().unwrap();
        assert_relative_eq!(min[0], -4.0, epsilon = 1e-9);
        assert_relative_eq!(max[0], -2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_round_rect_volume_and_bounds() {
        let square = Solid::round_rect(10.0, 6.0, 2.0, [0.0; 4], 32).unwrap();
        assert_relative_eq!(square.volume(), 120.0, epsilon = 1e-6);

        let r = 2.0;
        let rounded = Solid::round_rect(10.0, 6.0, 2.0, [r; 4], 256).unwrap();
        let exact = (60.0 - (4.0 - std::f64::consts::PI) * r * r) * 2.0;
        assert_relative_eq!(rounded.volume(), exact, max_relative = 1e-3);
        let (min, max) = rounded.bounding_box().unwrap();
        assert_relative_eq!(min[0], -5.0, epsilon = 1e-9);
        assert_relative_eq!(max[1], 3.0, epsilon = 1e-9);
        assert_relative_eq!(max[2], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_round_rect_mixed_corners_and_full_round_ends() {
        let one = Solid::round_rect(4.0, 4.0, 1.0, [2.0, 0.0, 0.0, 0.0], 64).unwrap();
        let exact = 16.0 - (4.0 - std::f64::consts::PI);
        assert_relative_eq!(one.volume(), exact, max_relative = 1e-3);
        let slot = Solid::round_rect(10.0, 4.0, 1.0, [2.0; 4], 64).unwrap();
        assert!(slot.volume() > 0.0);
    }

    #[test]
    fn test_round_rect_rejects_oversized_radii() {
        assert!(matches!(
            Solid::round_rect(4.0, 4.0, 1.0, [3.0, 3.0, 0.0, 0.0], 32),
            Err(KernelError::Degenerate { primitive: "round_rect", .. })
        ));
        assert!(Solid::round_rect(4.0, 4.0, 1.0, [-1.0, 0.0, 0.0, 0.0], 32).is_err());
    }

    #[test]
    fn test_hull_of_two_spaced_cubes() {
        let a = cube(2.0);
        let b = shifted(&a, 4.0, 0.0, 0.0);
        let h = Solid::hull([&a, &b]);
        assert_relative_eq!(h.volume(), 24.0, epsilon = 1e-6);
        let (min, max) = h.bounding_box().unwrap();
        assert_relative_eq!(min[0], -1.0, epsilon = 1e-9);
        assert_relative_eq!(max[0], 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hull_of_nothing_is_empty() {
        assert!(Solid::hull(Vec::<&Solid>::new()).is_empty());
        assert!(Solid::hull([&Solid::empty()]).is_empty());
    }

    #[test]
    fn test_small_uniform_scale_is_accepted() {
        let tiny = cube(10.0)
            .transform(&Transform::scaling(&Vec3::new(0.0005, 0.0005, 0.0005)))
            .unwrap();
        assert_relative_eq!(tiny.volume(), 1.25e-7, max_relative = 1e-6);
    }

    #[test]
    fn test_singular_transform_rejected() {
        let err = cube(1.0)
            .transform(&Transform::scaling(&Vec3::new(1.0, 0.0, 1.0)))
            .unwrap_err();
        assert!(matches!(err, KernelError::SingularTransform { .. }));
    }

    #[test]
    fn test_colorize_survives_union() {
        let red = cube(2.0).colorize([1.0, 0.0, 0.0, 1.0]);
        let u = red.union(&shifted(&cube(2.0), 1.0, 0.0, 0.0));
        assert!(u
            .polygons()
            .iter()
            .any(|p| p.color() == Some([1.0, 0.0, 0.0, 1.0])));
        assert!(u.polygons().iter().any(|p| p.color().is_none()));
    }
}
