//! Bounding-box relative transform steps.
//!
//! A step holds a shape, the matrix accumulated so far, and its own
//! component state (a translation vector, rotation angles, a mirror plane,
//! scale factors). Fluent setters consume and return the step; the
//! terminal calls ([`Step::apply`], [`Step::apply_to_target_and`],
//! [`Step::apply_to`], [`Step::then`]) consume it for good.
//!
//! ```
//! use ductkit::{align, Geometry, Step};
//! use ductkit_kernel::Solid;
//! use ductkit_math::Vec3;
//!
//! let base = Geometry::new(Solid::cuboid(&Vec3::new(20.0, 20.0, 20.0)).unwrap(), "base");
//! let cap = Geometry::new(Solid::cuboid(&Vec3::new(10.0, 10.0, 10.0)).unwrap(), "cap");
//!
//! // Sit the cap on top of the base, flush with its left face.
//! let placed = align(&cap)
//!     .bottom()
//!     .left()
//!     .to(&base)
//!     .top()
//!     .left()
//!     .apply()
//!     .unwrap();
//! let b = placed.bounds().unwrap().unwrap();
//! assert_eq!((b.bottom, b.left), (10.0, -10.0));
//! ```
//!
//! A failure such as reading an anchor from an empty shape does not
//! panic mid-chain; it is recorded on the step and returned by the
//! terminal call.

use std::cell::OnceCell;

use ductkit_math::Transform;

use crate::bounds::{Anchor, BoundingBox};
use crate::error::{FitError, Result};
use crate::shape::Shape;

/// Anchor setters shared by the steps that read translations from bounds.
macro_rules! anchor_methods {
    ($field:ident) => {
        /// Read `anchor` from the bounds into its axis.
        pub fn anchor(mut self, anchor: Anchor) -> Self {
            self.$field.read(anchor);
            self
        }

        /// Maximum Y.
        pub fn top(self) -> Self {
            self.anchor(Anchor::Top)
        }

        /// Minimum Y.
        pub fn bottom(self) -> Self {
            self.anchor(Anchor::Bottom)
        }

        /// Minimum X.
        pub fn left(self) -> Self {
            self.anchor(Anchor::Left)
        }

        /// Maximum X.
        pub fn right(self) -> Self {
            self.anchor(Anchor::Right)
        }

        /// Maximum Z.
        pub fn front(self) -> Self {
            self.anchor(Anchor::Front)
        }

        /// Minimum Z.
        pub fn back(self) -> Self {
            self.anchor(Anchor::Back)
        }

        /// Center on X.
        pub fn center_x(self) -> Self {
            self.anchor(Anchor::CenterX)
        }

        /// Center on Y.
        pub fn center_y(self) -> Self {
            self.anchor(Anchor::CenterY)
        }

        /// Center on Z.
        pub fn center_z(self) -> Self {
            self.anchor(Anchor::CenterZ)
        }

        /// Center on all three axes.
        pub fn center(self) -> Self {
            self.center_x().center_y().center_z()
        }
    };
}

mod align;
mod composite;
mod reflection;
mod rotation;
mod scale;
mod then;
mod translation;

pub use align::{AlignTo, AlignToPosition};
pub use composite::{
    AlignAll, AlignAllTo, AlignAllToPosition, All, MirrorAll, MoveAll, PositionAll, RotateAll,
    ScaleAll,
};
pub use reflection::Mirror;
pub use rotation::Rotate;
pub use scale::Scale;
pub use then::{Then, ThenAll};
pub use translation::{Align, Group, Move, Position, Translation};

/// The state every step starts from: a shape, the matrix accumulated so
/// far, and the shape's bounds under that matrix (measured at most once).
#[derive(Debug, Clone)]
pub struct Stage {
    geometry: Shape,
    matrix: Transform,
    bounds: OnceCell<Result<Option<BoundingBox>>>,
    error: Option<FitError>,
}

impl Stage {
    /// Start from `geometry` under `matrix`.
    pub fn new(geometry: impl Into<Shape>, matrix: Transform) -> Self {
        Self {
            geometry: geometry.into(),
            matrix,
            bounds: OnceCell::new(),
            error: None,
        }
    }

    /// Start from an upstream result; an upstream failure is carried to
    /// this step's terminal call.
    pub fn from_result(geometry: impl Into<Shape>, matrix: Result<Transform>) -> Self {
        match matrix {
            Ok(matrix) => Self::new(geometry, matrix),
            Err(error) => Self {
                error: Some(error),
                ..Self::new(geometry, Transform::identity())
            },
        }
    }

    /// The untransformed shape.
    pub fn geometry(&self) -> &Shape {
        &self.geometry
    }

    /// The matrix accumulated before this step.
    pub fn incoming(&self) -> &Transform {
        &self.matrix
    }

    /// Bounds of the shape under the incoming matrix.
    pub fn bounds(&self) -> Result<Option<BoundingBox>> {
        self.bounds
            .get_or_init(|| self.geometry.measure(&self.matrix))
            .clone()
    }

    /// Fill the bounds cache so clones taken afterwards share the result.
    pub(crate) fn measure(&self) {
        self.bounds.get_or_init(|| self.geometry.measure(&self.matrix));
    }

    pub(crate) fn override_bounds(&mut self, bounds: Result<Option<BoundingBox>>) {
        self.bounds = OnceCell::from(bounds);
    }

    /// Keep the first failure only.
    pub(crate) fn record(&mut self, error: FitError) {
        self.error.get_or_insert(error);
    }

    /// Bounds for reading `anchor`, recording a failure when there are none.
    pub(crate) fn anchored(&mut self, anchor: Anchor) -> Option<BoundingBox> {
        match self.bounds() {
            Ok(Some(bounds)) => Some(bounds),
            Ok(None) => {
                self.record(FitError::UndefinedBounds { anchor });
                None
            }
            Err(error) => {
                self.record(error);
                None
            }
        }
    }

    pub(crate) fn anchor_value(&mut self, anchor: Anchor) -> Option<f64> {
        self.anchored(anchor).map(|b| b.anchor(anchor))
    }

    /// The first recorded failure, if any.
    pub fn check(&self) -> Result<()> {
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    pub(crate) fn into_geometry(self) -> Shape {
        self.geometry
    }
}

/// One transform step.
///
/// Implementors supply their own matrix through [`Step::base_matrix`];
/// the provided methods compose it after the incoming matrix and bake the
/// result into shapes.
pub trait Step: Sized {
    /// Shared state.
    fn stage(&self) -> &Stage;

    /// Give up the shared state.
    fn into_stage(self) -> Stage;

    /// This step's own adjustment.
    fn base_matrix(&self) -> Transform;

    /// The shape this step moves.
    fn geometry(&self) -> &Shape {
        self.stage().geometry()
    }

    /// `base_matrix ∘ incoming`: the incoming matrix acts on points first.
    fn matrix(&self) -> Result<Transform> {
        self.stage().check()?;
        Ok(self.base_matrix().then(self.stage().incoming()))
    }

    /// Bake the matrix into the target.
    fn apply(self) -> Result<Shape> {
        let matrix = self.matrix()?;
        self.into_stage().geometry().transformed(&matrix)
    }

    /// Bake the same matrix into the target and every extra shape; the
    /// target comes first in the result.
    fn apply_to_target_and<I, S>(self, others: I) -> Result<Vec<Shape>>
    where
        I: IntoIterator<Item = S>,
        S: Into<Shape>,
    {
        let matrix = self.matrix()?;
        std::iter::once(self.into_stage().into_geometry())
            .chain(others.into_iter().map(Into::into))
            .map(|shape| shape.transformed(&matrix))
            .collect()
    }

    /// Bake the matrix into `others` only.
    fn apply_to<I, S>(self, others: I) -> Result<Vec<Shape>>
    where
        I: IntoIterator<Item = S>,
        S: Into<Shape>,
    {
        transform(&self.matrix()?, others)
    }

    /// Continue with another step from the geometry and matrix so far.
    fn then(self) -> Then {
        let matrix = self.matrix();
        Then::new(self.into_stage().into_geometry(), matrix)
    }
}

/// Steps that can be seeded directly from a [`Stage`].
pub trait FromStage: Step {
    /// Build the step with neutral component state.
    fn from_stage(stage: Stage) -> Self;
}

// =============================================================================
// Entry points
// =============================================================================

/// Align `shape` by its bounds.
pub fn align(shape: impl Into<Shape>) -> Align {
    Align::from_stage(Stage::new(shape, Transform::identity()))
}

/// Move `shape` by explicit offsets.
pub fn move_(shape: impl Into<Shape>) -> Move {
    Move::from_stage(Stage::new(shape, Transform::identity()))
}

/// Put `shape`'s center at absolute coordinates.
pub fn position(shape: impl Into<Shape>) -> Position {
    Position::from_stage(Stage::new(shape, Transform::identity()))
}

/// Mirror `shape` through a plane.
pub fn mirror(shape: impl Into<Shape>) -> Mirror {
    Mirror::from_stage(Stage::new(shape, Transform::identity()))
}

/// Rotate `shape` about the origin.
pub fn rotate(shape: impl Into<Shape>) -> Rotate {
    Rotate::from_stage(Stage::new(shape, Transform::identity()))
}

/// Scale `shape` about the origin.
pub fn scale(shape: impl Into<Shape>) -> Scale {
    Scale::from_stage(Stage::new(shape, Transform::identity()))
}

/// Treat several shapes as one for a chain of steps.
pub fn group<I, S>(shapes: I) -> Group
where
    I: IntoIterator<Item = S>,
    S: Into<Shape>,
{
    let members: Vec<Shape> = shapes.into_iter().map(Into::into).collect();
    Group::from_stage(Stage::new(members, Transform::identity()))
}

/// Align each shape by its own bounds.
pub fn align_all(shapes: impl IntoIterator<Item = impl Into<Shape>>) -> AlignAll {
    All::new(shapes)
}

/// Move each shape.
pub fn move_all(shapes: impl IntoIterator<Item = impl Into<Shape>>) -> MoveAll {
    All::new(shapes)
}

/// Position each shape.
pub fn position_all(shapes: impl IntoIterator<Item = impl Into<Shape>>) -> PositionAll {
    All::new(shapes)
}

/// Mirror each shape through a plane derived from its own bounds.
pub fn mirror_all(shapes: impl IntoIterator<Item = impl Into<Shape>>) -> MirrorAll {
    All::new(shapes)
}

/// Rotate each shape.
pub fn rotate_all(shapes: impl IntoIterator<Item = impl Into<Shape>>) -> RotateAll {
    All::new(shapes)
}

/// Scale each shape.
pub fn scale_all(shapes: impl IntoIterator<Item = impl Into<Shape>>) -> ScaleAll {
    All::new(shapes)
}

/// Apply one precomputed matrix to every shape.
pub fn transform<I, S>(matrix: &Transform, shapes: I) -> Result<Vec<Shape>>
where
    I: IntoIterator<Item = S>,
    S: Into<Shape>,
{
    shapes
        .into_iter()
        .map(|shape| shape.into().transformed(matrix))
        .collect()
}
