use ductkit_math::{Transform, Vec3};

use super::{AlignTo, AlignToPosition, FromStage, Stage, Step};
use crate::bounds::Anchor;
use crate::error::Result;
use crate::shape::Shape;

/// A plain translation.
#[derive(Debug, Clone)]
pub struct Translation {
    pub(crate) stage: Stage,
    offset: Vec3,
}

impl Translation {
    /// Replace the offset.
    pub fn by(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Current offset.
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Negate the offset.
    pub fn invert(mut self) -> Self {
        self.offset = -self.offset;
        self
    }

    /// Copy `anchor` from the bounds into its axis.
    pub(crate) fn read(&mut self, anchor: Anchor) {
        if let Some(value) = self.stage.anchor_value(anchor) {
            self.offset[anchor.axis().index()] = value;
        }
    }

    /// Set the axis of `anchor` so that the anchor lands on `target`.
    pub(crate) fn place(&mut self, anchor: Anchor, target: f64) {
        if let Some(value) = self.stage.anchor_value(anchor) {
            self.offset[anchor.axis().index()] = target - value;
        }
    }

    pub(crate) fn set(&mut self, anchor: Anchor, value: f64) {
        self.offset[anchor.axis().index()] = value;
    }
}

impl Step for Translation {
    fn stage(&self) -> &Stage {
        &self.stage
    }

    fn into_stage(self) -> Stage {
        self.stage
    }

    fn base_matrix(&self) -> Transform {
        Transform::translation(&self.offset)
    }
}

impl FromStage for Translation {
    fn from_stage(stage: Stage) -> Self {
        Self {
            stage,
            offset: Vec3::zeros(),
        }
    }
}

/// Implements [`Step`] and [`FromStage`] for a wrapper around [`Translation`].
macro_rules! translation_step {
    ($ty:ident) => {
        impl Step for $ty {
            fn stage(&self) -> &Stage {
                &self.inner.stage
            }

            fn into_stage(self) -> Stage {
                self.inner.stage
            }

            fn base_matrix(&self) -> Transform {
                self.inner.base_matrix()
            }
        }

        impl FromStage for $ty {
            fn from_stage(stage: Stage) -> Self {
                Self {
                    inner: Translation::from_stage(stage),
                }
            }
        }
    };
}

/// Source side of an alignment: anchors read from the shape's own bounds.
///
/// On its own, applying an `Align` moves the shape by the anchor
/// coordinates; it is normally finished with [`Align::to`],
/// [`Align::to_self`] or [`Align::to_position`].
#[derive(Debug, Clone)]
pub struct Align {
    inner: Translation,
}

impl Align {
    anchor_methods!(inner);

    /// Align the chosen anchors to anchors of `reference`.
    pub fn to(self, reference: impl Into<Shape>) -> AlignTo {
        AlignTo::new(self, Stage::new(reference, Transform::identity()))
    }

    /// Align the chosen anchors to anchors of the same shape, measured in
    /// the frame established so far.
    pub fn to_self(self) -> AlignTo {
        let reference = Stage::new(self.geometry().clone(), *self.stage().incoming());
        AlignTo::new(self, reference)
    }

    /// Align the chosen anchors to absolute coordinates.
    pub fn to_position(self) -> AlignToPosition {
        AlignToPosition::new(self)
    }

    /// Anchor coordinates read so far; unset axes are zero.
    pub fn offset(&self) -> Vec3 {
        self.inner.offset()
    }

    /// The matrix that moves the chosen anchors to the origin.
    pub(crate) fn to_origin(&self) -> Result<Transform> {
        self.inner.stage.check()?;
        Ok(Transform::translation(&-self.offset()).then(self.stage().incoming()))
    }
}

translation_step!(Align);

/// Absolute placement of the shape's center, per axis.
#[derive(Debug, Clone)]
pub struct Position {
    inner: Translation,
}

impl Position {
    /// Center on X at `pos`.
    pub fn x(mut self, pos: f64) -> Self {
        self.inner.place(Anchor::CenterX, pos);
        self
    }

    /// Center on Y at `pos`.
    pub fn y(mut self, pos: f64) -> Self {
        self.inner.place(Anchor::CenterY, pos);
        self
    }

    /// Center on Z at `pos`.
    pub fn z(mut self, pos: f64) -> Self {
        self.inner.place(Anchor::CenterZ, pos);
        self
    }

    /// Center on X and Y.
    pub fn xy(self, x: f64, y: f64) -> Self {
        self.x(x).y(y)
    }

    /// Center on X and Z.
    pub fn xz(self, x: f64, z: f64) -> Self {
        self.x(x).z(z)
    }

    /// Center on all axes.
    pub fn xyz(self, x: f64, y: f64, z: f64) -> Self {
        self.x(x).y(y).z(z)
    }

    /// Center at `p`.
    pub fn pos(self, p: Vec3) -> Self {
        self.xyz(p.x, p.y, p.z)
    }

    /// Center at the origin.
    pub fn origin(self) -> Self {
        self.xyz(0.0, 0.0, 0.0)
    }
}

translation_step!(Position);

/// Relative offsets along named directions. Each setter replaces the
/// offset on its axis.
#[derive(Debug, Clone)]
pub struct Move {
    inner: Translation,
}

impl Move {
    /// `+margin` on Y.
    pub fn up(mut self, margin: f64) -> Self {
        self.inner.set(Anchor::Top, margin);
        self
    }

    /// `-margin` on Y.
    pub fn down(mut self, margin: f64) -> Self {
        self.inner.set(Anchor::Bottom, -margin);
        self
    }

    /// `-margin` on X.
    pub fn left(mut self, margin: f64) -> Self {
        self.inner.set(Anchor::Left, -margin);
        self
    }

    /// `+margin` on X.
    pub fn right(mut self, margin: f64) -> Self {
        self.inner.set(Anchor::Right, margin);
        self
    }

    /// `+margin` on Z.
    pub fn forward(mut self, margin: f64) -> Self {
        self.inner.set(Anchor::Front, margin);
        self
    }

    /// `-margin` on Z.
    pub fn backward(mut self, margin: f64) -> Self {
        self.inner.set(Anchor::Back, -margin);
        self
    }

    /// Replace the whole offset.
    pub fn xyz(mut self, delta: Vec3) -> Self {
        self.inner = self.inner.by(delta);
        self
    }

    /// Continue with absolute placement from the moved frame.
    pub fn to(self) -> Position {
        let matrix = self.matrix();
        Position::from_stage(Stage::from_result(self.into_stage().into_geometry(), matrix))
    }
}

translation_step!(Move);

/// Identity step over a group, used to start a chain with
/// [`Step::then`].
#[derive(Debug, Clone)]
pub struct Group {
    stage: Stage,
}

impl Step for Group {
    fn stage(&self) -> &Stage {
        &self.stage
    }

    fn into_stage(self) -> Stage {
        self.stage
    }

    fn base_matrix(&self) -> Transform {
        Transform::identity()
    }
}

impl FromStage for Group {
    fn from_stage(stage: Stage) -> Self {
        Self { stage }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::{align, group, move_, position};
    use approx::assert_relative_eq;
    use ductkit_kernel::Solid;

    fn cube(size: f64) -> Shape {
        Solid::cuboid(&Vec3::new(size, size, size)).unwrap().into()
    }

    fn cube_at(size: f64, at: Vec3) -> Shape {
        cube(size)
            .transformed(&Transform::translation(&at))
            .unwrap()
    }

    #[test]
    fn test_translation_invert() {
        let t = Translation::from_stage(Stage::new(cube(1.0), Transform::identity()))
            .by(Vec3::new(1.0, -2.0, 3.0))
            .invert();
        assert_eq!(t.offset(), Vec3::new(-1.0, 2.0, -3.0));
        let b = t.apply().unwrap().bounds().unwrap().unwrap();
        assert_relative_eq!(b.center().coords, Vec3::new(-1.0, 2.0, -3.0));
    }

    #[test]
    fn test_align_anchor_last_write_wins() {
        let a = align(cube(2.0)).top().bottom().right();
        assert_eq!(a.offset(), Vec3::new(1.0, -1.0, 0.0));
    }

    #[test]
    fn test_move_setters_replace_their_axis() {
        let m = move_(cube(2.0)).up(3.0).down(1.0).forward(2.0).left(4.0);
        let b = m.apply().unwrap().bounds().unwrap().unwrap();
        assert_relative_eq!(b.center().coords, Vec3::new(-4.0, -1.0, 2.0));
    }

    #[test]
    fn test_position_centers() {
        let shape = cube_at(2.0, Vec3::new(7.0, 7.0, 7.0));
        let placed = position(shape.clone()).x(1.0).z(-1.0).apply().unwrap();
        let b = placed.bounds().unwrap().unwrap();
        assert_relative_eq!(b.center().coords, Vec3::new(1.0, 7.0, -1.0));
        let origin = position(shape).origin().apply().unwrap();
        let b = origin.bounds().unwrap().unwrap();
        assert_relative_eq!(b.center().coords, Vec3::zeros());
    }

    #[test]
    fn test_move_to_uses_moved_frame() {
        let shape = cube_at(2.0, Vec3::new(5.0, 0.0, 0.0));
        let placed = move_(shape).up(10.0).to().x(0.0).apply().unwrap();
        let b = placed.bounds().unwrap().unwrap();
        assert_relative_eq!(b.center().coords, Vec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn test_group_moves_members_together() {
        let g = group([cube_at(2.0, Vec3::new(-5.0, 0.0, 0.0)), cube_at(2.0, Vec3::new(5.0, 0.0, 0.0))]);
        let moved = g.then().move_().to().origin().apply().unwrap();
        let members = moved.unpack();
        assert_eq!(members.len(), 2);
        let left = members[0].bounds().unwrap().unwrap();
        let right = members[1].bounds().unwrap().unwrap();
        assert_relative_eq!(left.left, -6.0);
        assert_relative_eq!(right.right, 6.0);
    }

    #[test]
    fn test_anchor_on_empty_shape_fails_at_terminal() {
        let err = align(Solid::empty()).top().apply().unwrap_err();
        assert_eq!(
            err,
            crate::error::FitError::UndefinedBounds { anchor: Anchor::Top }
        );
    }
}
