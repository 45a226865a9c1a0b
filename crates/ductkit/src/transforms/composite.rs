use ductkit_math::{Point3, Transform, Vec3};
use tracing::warn;

use super::{
    Align, AlignTo, AlignToPosition, FromStage, Mirror, Move, Position, Rotate, Scale, Stage,
    Step, ThenAll,
};
use crate::bounds::Anchor;
use crate::error::{FitError, Result};
use crate::shape::Shape;

/// One independent step per target.
///
/// Setters are broadcast to every element; terminal calls return results
/// in target order.
#[derive(Debug, Clone)]
pub struct All<T> {
    items: Vec<T>,
    pending: Option<FitError>,
}

/// Align several shapes.
pub type AlignAll = All<Align>;
/// Align several shapes to references.
pub type AlignAllTo = All<AlignTo>;
/// Align several shapes to coordinates.
pub type AlignAllToPosition = All<AlignToPosition>;
/// Mirror several shapes.
pub type MirrorAll = All<Mirror>;
/// Move several shapes.
pub type MoveAll = All<Move>;
/// Position several shapes.
pub type PositionAll = All<Position>;
/// Rotate several shapes.
pub type RotateAll = All<Rotate>;
/// Scale several shapes.
pub type ScaleAll = All<Scale>;

impl<T: FromStage> All<T> {
    /// Seed one step per shape from the identity.
    pub fn new(shapes: impl IntoIterator<Item = impl Into<Shape>>) -> Self {
        let items: Vec<T> = shapes
            .into_iter()
            .map(|shape| T::from_stage(Stage::new(shape, Transform::identity())))
            .collect();
        if items.is_empty() {
            warn!("composite step created without targets");
        }
        Self {
            items,
            pending: None,
        }
    }

    /// Seed one step per shape from index-paired incoming matrices.
    pub fn with_matrices(
        shapes: impl IntoIterator<Item = impl Into<Shape>>,
        matrices: Vec<Transform>,
    ) -> Result<Self> {
        let shapes: Vec<Shape> = shapes.into_iter().map(Into::into).collect();
        if shapes.len() != matrices.len() {
            return Err(FitError::ArityMismatch {
                what: "matrices",
                expected: shapes.len(),
                found: matrices.len(),
            });
        }
        Ok(Self::seeded(shapes, Ok(matrices)))
    }

    /// Seed from an upstream result. A failure is returned by the
    /// terminal calls of the new composite.
    pub(crate) fn seeded(shapes: Vec<Shape>, matrices: Result<Vec<Transform>>) -> Self {
        match matrices {
            Ok(matrices) => Self {
                items: shapes
                    .into_iter()
                    .zip(matrices)
                    .map(|(shape, matrix)| T::from_stage(Stage::new(shape, matrix)))
                    .collect(),
                pending: None,
            },
            Err(error) => Self {
                items: shapes
                    .into_iter()
                    .map(|shape| T::from_stage(Stage::from_result(shape, Err(error.clone()))))
                    .collect(),
                pending: Some(error),
            },
        }
    }
}

impl<T: Step> All<T> {
    /// Number of targets.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True without targets.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Rebuild every step with `f`.
    pub fn each(mut self, f: impl FnMut(T) -> T) -> Self {
        self.items = self.items.into_iter().map(f).collect();
        self
    }

    fn map<U>(self, f: impl FnMut(T) -> U) -> All<U> {
        All {
            items: self.items.into_iter().map(f).collect(),
            pending: self.pending,
        }
    }

    /// Untransformed targets, in order.
    pub fn geometries(&self) -> Vec<&Shape> {
        self.items.iter().map(Step::geometry).collect()
    }

    /// Per-target matrices, in order. The first failure wins.
    pub fn matrices(&self) -> Result<Vec<Transform>> {
        if let Some(error) = &self.pending {
            return Err(error.clone());
        }
        self.items.iter().map(Step::matrix).collect()
    }

    /// Bake each matrix into its target.
    pub fn apply(self) -> Result<Vec<Shape>> {
        let matrices = self.matrices()?;
        self.items
            .into_iter()
            .zip(matrices)
            .map(|(item, matrix)| item.into_stage().into_geometry().transformed(&matrix))
            .collect()
    }

    /// Continue every target with another step.
    pub fn then(self) -> ThenAll {
        let matrices = self.matrices();
        let shapes = self
            .items
            .into_iter()
            .map(|item| item.into_stage().into_geometry())
            .collect();
        ThenAll::new(shapes, matrices)
    }
}

/// Forwards setters of a step type to every element of its composite.
macro_rules! broadcast {
    ($ty:ty { $( $(#[$doc:meta])* fn $name:ident($($arg:ident: $argty:ty),*); )* }) => {
        impl All<$ty> {
            $(
                $(#[$doc])*
                pub fn $name(self, $($arg: $argty),*) -> Self {
                    self.each(|item| item.$name($($arg),*))
                }
            )*
        }
    };
}

macro_rules! broadcast_anchors {
    ($ty:ty) => {
        broadcast!($ty {
            /// Anchor on every target.
            fn anchor(anchor: Anchor);
            /// Maximum Y on every target.
            fn top();
            /// Minimum Y on every target.
            fn bottom();
            /// Minimum X on every target.
            fn left();
            /// Maximum X on every target.
            fn right();
            /// Maximum Z on every target.
            fn front();
            /// Minimum Z on every target.
            fn back();
            /// X center on every target.
            fn center_x();
            /// Y center on every target.
            fn center_y();
            /// Z center on every target.
            fn center_z();
        });
    };
}

broadcast_anchors!(Align);
broadcast_anchors!(AlignTo);
broadcast_anchors!(Mirror);

broadcast!(Align {
    /// Center on all axes for every target.
    fn center();
});

broadcast!(AlignTo {
    /// Center on all axes for every reference.
    fn center();
});

broadcast!(Mirror {
    /// Same explicit plane for every target.
    fn plane(normal: Vec3, point: Point3);
});

broadcast!(AlignToPosition {
    /// Target X.
    fn x(pos: f64);
    /// Target Y.
    fn y(pos: f64);
    /// Target Z.
    fn z(pos: f64);
    /// Target X and Y.
    fn xy(x: f64, y: f64);
    /// Target X and Z.
    fn xz(x: f64, z: f64);
    /// Target point.
    fn xyz(x: f64, y: f64, z: f64);
    /// Target point as a vector.
    fn pos(p: Vec3);
    /// Target the origin.
    fn origin();
});

broadcast!(Position {
    /// Center on X.
    fn x(pos: f64);
    /// Center on Y.
    fn y(pos: f64);
    /// Center on Z.
    fn z(pos: f64);
    /// Center on X and Y.
    fn xy(x: f64, y: f64);
    /// Center on X and Z.
    fn xz(x: f64, z: f64);
    /// Center on all axes.
    fn xyz(x: f64, y: f64, z: f64);
    /// Center at `p`.
    fn pos(p: Vec3);
    /// Center at the origin.
    fn origin();
});

broadcast!(Move {
    /// Up on every target.
    fn up(margin: f64);
    /// Down on every target.
    fn down(margin: f64);
    /// Left on every target.
    fn left(margin: f64);
    /// Right on every target.
    fn right(margin: f64);
    /// Forward on every target.
    fn forward(margin: f64);
    /// Backward on every target.
    fn backward(margin: f64);
    /// Replace every offset.
    fn xyz(delta: Vec3);
});

broadcast!(Rotate {
    /// Roll every target.
    fn x(angle: impl Into<Option<f64>> + Copy);
    /// Pitch every target.
    fn y(angle: impl Into<Option<f64>> + Copy);
    /// Yaw every target.
    fn z(angle: impl Into<Option<f64>> + Copy);
    /// Same angle about X and Y.
    fn xy(angle: impl Into<Option<f64>> + Copy);
    /// Same angle about X and Z.
    fn xz(angle: impl Into<Option<f64>> + Copy);
    /// Same angle about Y and Z.
    fn yz(angle: impl Into<Option<f64>> + Copy);
    /// Same angle about all axes.
    fn xyz(angle: impl Into<Option<f64>> + Copy);
});

broadcast!(Scale {
    /// Factor on X.
    fn width(factor: f64);
    /// Factor on Y.
    fn height(factor: f64);
    /// Factor on Z.
    fn depth(factor: f64);
    /// Uniform factor.
    fn factor(factor: f64);
});

impl All<Align> {
    /// Align every target to the same reference, measured once.
    pub fn to(self, reference: impl Into<Shape>) -> AlignAllTo {
        let reference = Stage::new(reference, Transform::identity());
        reference.measure();
        self.map(|item| AlignTo::new(item, reference.clone()))
    }

    /// Align each target to the reference at the same index.
    pub fn to_each(
        self,
        references: impl IntoIterator<Item = impl Into<Shape>>,
    ) -> Result<AlignAllTo> {
        let references: Vec<Shape> = references.into_iter().map(Into::into).collect();
        if references.len() != self.len() {
            return Err(FitError::ArityMismatch {
                what: "references",
                expected: self.len(),
                found: references.len(),
            });
        }
        Ok(All {
            items: self
                .items
                .into_iter()
                .zip(references)
                .map(|(item, reference)| {
                    AlignTo::new(item, Stage::new(reference, Transform::identity()))
                })
                .collect(),
            pending: self.pending,
        })
    }

    /// Align every target to itself in the frame so far.
    pub fn to_self(self) -> AlignAllTo {
        self.map(Align::to_self)
    }

    /// Align every target's anchors to coordinates.
    pub fn to_position(self) -> AlignAllToPosition {
        self.map(Align::to_position)
    }
}

impl All<Move> {
    /// Continue every target with absolute placement.
    pub fn to(self) -> PositionAll {
        self.map(Move::to)
    }
}

impl All<Mirror> {
    /// Measure mirror anchors on `target` for every element.
    pub fn about(self, target: impl Into<Shape>) -> Self {
        let bounds = target.into().bounds();
        self.each(|item| item.with_bounds(bounds.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::{align_all, move_all, rotate_all};
    use approx::assert_relative_eq;
    use ductkit_kernel::Solid;

    fn cube_at(size: f64, at: Vec3) -> Shape {
        Shape::from(Solid::cuboid(&Vec3::new(size, size, size)).unwrap())
            .transformed(&Transform::translation(&at))
            .unwrap()
    }

    fn centers(shapes: &[Shape]) -> Vec<Vec3> {
        shapes
            .iter()
            .map(|s| s.bounds().unwrap().unwrap().center().coords)
            .collect()
    }

    #[test]
    fn test_shared_reference_preserves_order() {
        let parts = vec![
            cube_at(2.0, Vec3::new(-10.0, 0.0, 0.0)),
            cube_at(4.0, Vec3::new(10.0, 5.0, 0.0)),
        ];
        let floor = cube_at(20.0, Vec3::zeros());
        let placed = align_all(parts)
            .bottom()
            .to(floor)
            .top()
            .apply()
            .unwrap();
        let c = centers(&placed);
        assert_relative_eq!(c[0], Vec3::new(-10.0, 11.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(c[1], Vec3::new(10.0, 12.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_per_index_references() {
        let parts = vec![cube_at(2.0, Vec3::zeros()), cube_at(2.0, Vec3::zeros())];
        let refs = vec![
            cube_at(2.0, Vec3::new(5.0, 0.0, 0.0)),
            cube_at(2.0, Vec3::new(-5.0, 0.0, 0.0)),
        ];
        let placed = align_all(parts)
            .center_x()
            .to_each(refs)
            .unwrap()
            .center_x()
            .apply()
            .unwrap();
        let c = centers(&placed);
        assert_relative_eq!(c[0].x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(c[1].x, -5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reference_arity_mismatch() {
        let parts = vec![cube_at(1.0, Vec3::zeros()), cube_at(1.0, Vec3::zeros())];
        let err = align_all(parts)
            .top()
            .to_each(vec![cube_at(1.0, Vec3::zeros())])
            .unwrap_err();
        assert_eq!(
            err,
            FitError::ArityMismatch {
                what: "references",
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_matrix_arity_mismatch() {
        let err = RotateAll::with_matrices(
            vec![cube_at(1.0, Vec3::zeros())],
            vec![Transform::identity(), Transform::identity()],
        )
        .unwrap_err();
        assert!(matches!(err, FitError::ArityMismatch { what: "matrices", .. }));
    }

    #[test]
    fn test_broadcast_and_chain() {
        let parts = vec![
            cube_at(2.0, Vec3::new(1.0, 0.0, 0.0)),
            cube_at(2.0, Vec3::new(0.0, 1.0, 0.0)),
        ];
        let placed = move_all(parts)
            .up(3.0)
            .then()
            .rotate()
            .z(None)
            .apply()
            .unwrap();
        let c = centers(&placed);
        // yaw maps (x, y) to (-y, x)
        assert_relative_eq!(c[0], Vec3::new(-3.0, 1.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(c[1], Vec3::new(-4.0, 0.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_failure_surfaces_after_then() {
        let parts = vec![Shape::from(Solid::empty())];
        let err = align_all(parts)
            .top()
            .then()
            .rotate()
            .x(None)
            .matrices()
            .unwrap_err();
        assert_eq!(err, FitError::UndefinedBounds { anchor: Anchor::Top });
    }

    #[test]
    fn test_empty_composite_applies_to_nothing() {
        let all = rotate_all(Vec::<Shape>::new()).x(None);
        assert!(all.is_empty());
        assert!(all.apply().unwrap().is_empty());
    }
}
