use ductkit_math::Transform;

use super::{
    Align, AlignAll, All, FromStage, Mirror, MirrorAll, Move, MoveAll, Position, PositionAll,
    Rotate, RotateAll, Scale, ScaleAll, Stage,
};
use crate::error::Result;
use crate::shape::Shape;

/// Continuation of a single chain: the shape plus the matrix computed so
/// far. Every step started here composes after that matrix.
#[derive(Debug, Clone)]
pub struct Then {
    geometry: Shape,
    matrix: Result<Transform>,
}

impl Then {
    pub(crate) fn new(geometry: Shape, matrix: Result<Transform>) -> Self {
        Self { geometry, matrix }
    }

    fn start<T: FromStage>(self) -> T {
        T::from_stage(Stage::from_result(self.geometry, self.matrix))
    }

    /// Continue with an alignment.
    pub fn align(self) -> Align {
        self.start()
    }

    /// Continue with relative offsets.
    pub fn move_(self) -> Move {
        self.start()
    }

    /// Continue with absolute placement.
    pub fn position(self) -> Position {
        self.start()
    }

    /// Continue with a reflection.
    pub fn mirror(self) -> Mirror {
        self.start()
    }

    /// Continue with a rotation.
    pub fn rotate(self) -> Rotate {
        self.start()
    }

    /// Continue with a scale.
    pub fn scale(self) -> Scale {
        self.start()
    }

    /// The untransformed shape.
    pub fn geometry(&self) -> &Shape {
        &self.geometry
    }

    /// The matrix so far.
    pub fn matrix(&self) -> Result<Transform> {
        self.matrix.clone()
    }
}

/// Continuation of a composite chain.
#[derive(Debug, Clone)]
pub struct ThenAll {
    geometries: Vec<Shape>,
    matrices: Result<Vec<Transform>>,
}

impl ThenAll {
    pub(crate) fn new(geometries: Vec<Shape>, matrices: Result<Vec<Transform>>) -> Self {
        Self {
            geometries,
            matrices,
        }
    }

    fn start<T: FromStage>(self) -> All<T> {
        All::seeded(self.geometries, self.matrices)
    }

    /// Continue every target with an alignment.
    pub fn align(self) -> AlignAll {
        self.start()
    }

    /// Continue every target with relative offsets.
    pub fn move_(self) -> MoveAll {
        self.start()
    }

    /// Continue every target with absolute placement.
    pub fn position(self) -> PositionAll {
        self.start()
    }

    /// Continue every target with a reflection.
    pub fn mirror(self) -> MirrorAll {
        self.start()
    }

    /// Continue every target with a rotation.
    pub fn rotate(self) -> RotateAll {
        self.start()
    }

    /// Continue every target with a scale.
    pub fn scale(self) -> ScaleAll {
        self.start()
    }

    /// The untransformed targets.
    pub fn geometries(&self) -> &[Shape] {
        &self.geometries
    }

    /// The matrices so far.
    pub fn matrices(&self) -> Result<Vec<Transform>> {
        self.matrices.clone()
    }
}
