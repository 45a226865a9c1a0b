#![warn(missing_docs)]

//! Math types for the ductkit geometry stack.
//!
//! Thin wrappers around nalgebra: points, vectors, affine transforms,
//! oriented planes and the tolerance constants shared by the kernel and
//! the alignment algebra. Matrices act on column vectors, so
//! `a.then(&b)` applies `b` first.

use nalgebra::{Matrix3, Matrix4, Unit, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// Smallest `|det| / (|c0| |c1| |c2|)` of an invertible linear part.
const SINGULAR_RATIO: f64 = 1e-12;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `offset`.
    pub fn translation(offset: &Vec3) -> Self {
        Self {
            matrix: Matrix4::new_translation(offset),
        }
    }

    /// Non-uniform scale by `(sx, sy, sz)` about the origin.
    pub fn scaling(factors: &Vec3) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(factors),
        }
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        Self::rotation_about_axis(&Vec3::x_axis(), angle)
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        Self::rotation_about_axis(&Vec3::y_axis(), angle)
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        Self::rotation_about_axis(&Vec3::z_axis(), angle)
    }

    /// Rotation about an axis through the origin by `angle` radians.
    pub fn rotation_about_axis(axis: &Dir3, angle: f64) -> Self {
        Self {
            matrix: Matrix4::from_axis_angle(axis, angle),
        }
    }

    /// Tait-Bryan rotation: roll about X, then pitch about Y, then yaw about Z.
    pub fn tait_bryan(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self::rotation_z(yaw)
            .then(&Self::rotation_y(pitch))
            .then(&Self::rotation_x(roll))
    }

    /// Reflection through `plane`.
    ///
    /// A point `p` maps to `p - 2 (n·p - w) n`.
    pub fn mirror(plane: &Plane) -> Self {
        let n = plane.normal.into_inner();
        let linear = Matrix3::identity() - 2.0 * n * n.transpose();
        let mut matrix = linear.to_homogeneous();
        matrix
            .fixed_view_mut::<3, 1>(0, 3)
            .copy_from(&(2.0 * plane.w * n));
        Self { matrix }
    }

    /// Compose: `self` then `other` (self * other), so `other` acts first.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        self.matrix.fixed_view::<3, 3>(0, 0).determinant()
    }

    /// True when the transform flips orientation (reflections).
    pub fn is_mirroring(&self) -> bool {
        self.determinant() < 0.0
    }

    /// True when the linear part collapses a direction. The determinant is
    /// compared against the product of the column lengths, so uniformly
    /// small scales stay invertible.
    pub fn is_singular(&self) -> bool {
        let linear = self.matrix.fixed_view::<3, 3>(0, 0);
        let volume: f64 = linear.column_iter().map(|c| c.norm()).product();
        self.determinant().abs() <= SINGULAR_RATIO * volume
    }

    /// Exact identity check.
    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix4::identity()
    }

    /// The translation column.
    pub fn translation_part(&self) -> Vec3 {
        self.matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Column-major copy of the matrix entries.
    pub fn to_cols_array(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(self.matrix.as_slice());
        out
    }

    /// Rebuild from column-major entries.
    pub fn from_cols_array(values: &[f64; 16]) -> Self {
        Self {
            matrix: Matrix4::from_column_slice(values),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// An oriented plane `n·p = w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal.
    pub normal: Dir3,
    /// Signed offset along the normal.
    pub w: f64,
}

impl Plane {
    /// The plane `z = 0` facing +Z.
    pub fn xy() -> Self {
        Self {
            normal: Vec3::z_axis(),
            w: 0.0,
        }
    }

    /// Plane through `point` with the given normal.
    ///
    /// Returns `None` when `normal` has zero length.
    pub fn from_normal_and_point(normal: &Vec3, point: &Point3) -> Option<Self> {
        let normal = Dir3::try_new(*normal, Tolerance::DEFAULT.linear)?;
        Some(Self {
            w: normal.dot(&point.coords),
            normal,
        })
    }

    /// Signed distance of `p` from the plane.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&p.coords) - self.w
    }

    /// The same plane facing the other way.
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            w: -self.w,
        }
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self::xy()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default tolerances (1e-9 mm linear, 1e-9 rad angular).
    pub const DEFAULT: Self = Self {
        linear: 1e-9,
        angular: 1e-9,
    };

    /// Coplanarity band used when splitting polygons.
    pub const PLANE: Self = Self {
        linear: 1e-5,
        angular: 1e-9,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
