//! Axis-aligned bounding boxes and the anchors read from them.
//!
//! Axis convention: X runs left to right, Y bottom to top, Z back to front.

use std::fmt;

use ductkit_kernel::Solid;
use ductkit_math::{Point3, Vec3};
use tracing::trace;

use crate::error::Result;
use crate::shape::Shape;

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left/right.
    X,
    /// Bottom/top.
    Y,
    /// Back/front.
    Z,
}

impl Axis {
    /// Component index into a vector.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit vector along the axis.
    pub fn unit(self) -> Vec3 {
        let mut v = Vec3::zeros();
        v[self.index()] = 1.0;
        v
    }
}

/// A named coordinate of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Minimum X.
    Left,
    /// Maximum X.
    Right,
    /// Minimum Y.
    Bottom,
    /// Maximum Y.
    Top,
    /// Minimum Z.
    Back,
    /// Maximum Z.
    Front,
    /// Center on X.
    CenterX,
    /// Center on Y.
    CenterY,
    /// Center on Z.
    CenterZ,
}

impl Anchor {
    /// The axis this anchor constrains.
    pub fn axis(self) -> Axis {
        match self {
            Anchor::Left | Anchor::Right | Anchor::CenterX => Axis::X,
            Anchor::Bottom | Anchor::Top | Anchor::CenterY => Axis::Y,
            Anchor::Back | Anchor::Front | Anchor::CenterZ => Axis::Z,
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Anchor::Left => "left",
            Anchor::Right => "right",
            Anchor::Bottom => "bottom",
            Anchor::Top => "top",
            Anchor::Back => "back",
            Anchor::Front => "front",
            Anchor::CenterX => "center_x",
            Anchor::CenterY => "center_y",
            Anchor::CenterZ => "center_z",
        };
        f.write_str(name)
    }
}

/// Normalized axis-aligned box: `left <= right`, `bottom <= top`,
/// `back <= front`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum X.
    pub left: f64,
    /// Maximum X.
    pub right: f64,
    /// Minimum Y.
    pub bottom: f64,
    /// Maximum Y.
    pub top: f64,
    /// Minimum Z.
    pub back: f64,
    /// Maximum Z.
    pub front: f64,
}

impl BoundingBox {
    /// Box spanned by two opposite corners, in any order.
    pub fn from_corners(a: [f64; 3], b: [f64; 3]) -> Self {
        Self {
            left: a[0].min(b[0]),
            right: a[0].max(b[0]),
            bottom: a[1].min(b[1]),
            top: a[1].max(b[1]),
            back: a[2].min(b[2]),
            front: a[2].max(b[2]),
        }
    }

    /// Measure a raw solid; `None` when it has no faces.
    pub fn of_solid(solid: &Solid) -> Option<Self> {
        let (min, max) = solid.bounding_box()?;
        trace!(?min, ?max, "measured solid");
        Some(Self::from_corners(min, max))
    }

    /// Minimum corner.
    pub fn min(&self) -> Point3 {
        Point3::new(self.left, self.bottom, self.back)
    }

    /// Maximum corner.
    pub fn max(&self) -> Point3 {
        Point3::new(self.right, self.top, self.front)
    }

    /// Center point.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min(), &self.max())
    }

    /// Extent along X.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Extent along Y.
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Extent along Z.
    pub fn depth(&self) -> f64 {
        self.front - self.back
    }

    /// Smallest box containing both.
    pub fn combine(&self, other: &BoundingBox) -> BoundingBox {
        Self {
            left: self.left.min(other.left),
            right: self.right.max(other.right),
            bottom: self.bottom.min(other.bottom),
            top: self.top.max(other.top),
            back: self.back.min(other.back),
            front: self.front.max(other.front),
        }
    }

    /// The coordinate named by `anchor`.
    pub fn anchor(&self, anchor: Anchor) -> f64 {
        let center = self.center();
        match anchor {
            Anchor::Left => self.left,
            Anchor::Right => self.right,
            Anchor::Bottom => self.bottom,
            Anchor::Top => self.top,
            Anchor::Back => self.back,
            Anchor::Front => self.front,
            Anchor::CenterX => center.x,
            Anchor::CenterY => center.y,
            Anchor::CenterZ => center.z,
        }
    }
}

/// Fold optional boxes; `None` entries are skipped, all-`None` stays `None`.
pub fn combine_all(boxes: impl IntoIterator<Item = Option<BoundingBox>>) -> Option<BoundingBox> {
    boxes
        .into_iter()
        .flatten()
        .reduce(|acc, b| acc.combine(&b))
}

/// Bounds of a single shape, after all of its pending operations.
pub fn bounds(shape: &Shape) -> Result<Option<BoundingBox>> {
    shape.bounds()
}

/// Combined bounds of several shapes; `None` for an empty slice.
pub fn bounds_all(shapes: &[Shape]) -> Result<Option<BoundingBox>> {
    let boxes = shapes
        .iter()
        .map(Shape::bounds)
        .collect::<Result<Vec<_>>>()?;
    Ok(combine_all(boxes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ductkit_math::{Plane, Transform};

    fn cube_at(size: f64, x: f64, y: f64, z: f64) -> Shape {
        Solid::cuboid(&Vec3::new(size, size, size))
            .unwrap()
            .transform(&Transform::translation(&Vec3::new(x, y, z)))
            .unwrap()
            .into()
    }

    #[test]
    fn test_corners_are_resorted() {
        let b = BoundingBox::from_corners([3.0, -1.0, 5.0], [-3.0, 1.0, -5.0]);
        assert_eq!(b.left, -3.0);
        assert_eq!(b.right, 3.0);
        assert_eq!(b.back, -5.0);
        assert_eq!(b.front, 5.0);
        assert_eq!((b.width(), b.height(), b.depth()), (6.0, 2.0, 10.0));
    }

    #[test]
    fn test_anchor_values() {
        let b = BoundingBox::from_corners([0.0, 0.0, 0.0], [2.0, 4.0, 6.0]);
        assert_eq!(b.anchor(Anchor::Right), 2.0);
        assert_eq!(b.anchor(Anchor::Top), 4.0);
        assert_eq!(b.anchor(Anchor::CenterZ), 3.0);
        assert_eq!(Anchor::Front.axis(), Axis::Z);
        assert_eq!(Anchor::CenterY.to_string(), "center_y");
    }

    #[test]
    fn test_mirrored_solid_stays_normalized() {
        let shape = cube_at(2.0, 5.0, 0.0, 0.0);
        let plane = Plane::from_normal_and_point(&Vec3::x(), &ductkit_math::Point3::origin())
            .unwrap();
        let mirrored = shape.transformed(&Transform::mirror(&plane)).unwrap();
        let b = bounds(&mirrored).unwrap().unwrap();
        assert!(b.left <= b.right);
        assert_relative_eq!(b.left, -6.0, epsilon = 1e-9);
        assert_relative_eq!(b.right, -4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_array_bounds_equal_union_of_elements() {
        let shapes = vec![cube_at(2.0, 0.0, 0.0, 0.0), cube_at(2.0, 10.0, -3.0, 4.0)];
        let all = bounds_all(&shapes).unwrap().unwrap();
        let a = bounds(&shapes[0]).unwrap().unwrap();
        let b = bounds(&shapes[1]).unwrap().unwrap();
        assert_eq!(all, a.combine(&b));
        assert_eq!(all.left, -1.0);
        assert_eq!(all.right, 11.0);
        assert_eq!(all.bottom, -4.0);
        assert_eq!(all.front, 5.0);
    }

    #[test]
    fn test_empty_inputs_have_no_bounds() {
        assert_eq!(bounds_all(&[]).unwrap(), None);
        assert_eq!(bounds(&Shape::from(Solid::empty())).unwrap(), None);
        assert_eq!(combine_all([None, None]), None);
    }
}
