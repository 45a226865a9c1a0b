use ductkit_math::{Transform, Vec3};

use super::{Align, FromStage, Stage, Step, Translation};
use crate::bounds::Anchor;
use crate::error::Result;

/// Reference side of an alignment.
///
/// The matrix first undoes the source anchors (moving them to the
/// origin) and then applies the reference anchors, so the chosen source
/// anchors land exactly on the chosen reference anchors. Axes without an
/// anchor on either side count as zero.
#[derive(Debug, Clone)]
pub struct AlignTo {
    source: Align,
    inner: Translation,
}

impl AlignTo {
    pub(crate) fn new(source: Align, reference: Stage) -> Self {
        Self {
            source,
            inner: Translation::from_stage(reference),
        }
    }

    anchor_methods!(inner);

    /// Anchor coordinates read from the reference.
    pub fn reference_offset(&self) -> Vec3 {
        self.inner.offset()
    }

    /// Anchor coordinates read from the source.
    pub fn source_offset(&self) -> Vec3 {
        self.source.offset()
    }
}

impl Step for AlignTo {
    fn stage(&self) -> &Stage {
        self.source.stage()
    }

    fn into_stage(self) -> Stage {
        self.source.into_stage()
    }

    fn base_matrix(&self) -> Transform {
        Transform::translation(&(self.reference_offset() - self.source_offset()))
    }

    fn matrix(&self) -> Result<Transform> {
        self.inner.stage.check()?;
        Ok(self.inner.base_matrix().then(&self.source.to_origin()?))
    }
}

/// Alignment of source anchors to absolute coordinates.
#[derive(Debug, Clone)]
pub struct AlignToPosition {
    source: Align,
    target: Vec3,
}

impl AlignToPosition {
    pub(crate) fn new(source: Align) -> Self {
        Self {
            source,
            target: Vec3::zeros(),
        }
    }

    /// Target X coordinate.
    pub fn x(mut self, pos: f64) -> Self {
        self.target.x = pos;
        self
    }

    /// Target Y coordinate.
    pub fn y(mut self, pos: f64) -> Self {
        self.target.y = pos;
        self
    }

    /// Target Z coordinate.
    pub fn z(mut self, pos: f64) -> Self {
        self.target.z = pos;
        self
    }

    /// Target X and Y.
    pub fn xy(self, x: f64, y: f64) -> Self {
        self.x(x).y(y)
    }

    /// Target X and Z.
    pub fn xz(self, x: f64, z: f64) -> Self {
        self.x(x).z(z)
    }

    /// Target point.
    pub fn xyz(self, x: f64, y: f64, z: f64) -> Self {
        self.x(x).y(y).z(z)
    }

    /// Target point as a vector.
    pub fn pos(self, p: Vec3) -> Self {
        self.xyz(p.x, p.y, p.z)
    }

    /// Target the origin.
    pub fn origin(self) -> Self {
        self.xyz(0.0, 0.0, 0.0)
    }
}

impl Step for AlignToPosition {
    fn stage(&self) -> &Stage {
        self.source.stage()
    }

    fn into_stage(self) -> Stage {
        self.source.into_stage()
    }

    fn base_matrix(&self) -> Transform {
        Transform::translation(&(self.target - self.source.offset()))
    }

    fn matrix(&self) -> Result<Transform> {
        Ok(Transform::translation(&self.target).then(&self.source.to_origin()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::BoundingBox;
    use crate::error::FitError;
    use crate::shape::Shape;
    use crate::transforms::{align, rotate};
    use approx::assert_relative_eq;
    use ductkit_kernel::Solid;

    fn cube_at(size: f64, at: Vec3) -> Shape {
        Shape::from(Solid::cuboid(&Vec3::new(size, size, size)).unwrap())
            .transformed(&Transform::translation(&at))
            .unwrap()
    }

    fn boxed(shape: &Shape) -> BoundingBox {
        shape.bounds().unwrap().unwrap()
    }

    #[test]
    fn test_corner_to_opposite_corner() {
        let small = cube_at(10.0, Vec3::zeros());
        let large = cube_at(20.0, Vec3::zeros());
        let placed = align(small)
            .bottom()
            .left()
            .back()
            .to(large)
            .top()
            .right()
            .front()
            .apply()
            .unwrap();
        assert_relative_eq!(boxed(&placed).center().coords, Vec3::new(15.0, 15.0, 15.0));
    }

    #[test]
    fn test_source_anchor_lands_on_reference_anchor() {
        let source = cube_at(3.0, Vec3::new(-7.0, 2.5, 11.0));
        let reference = cube_at(8.0, Vec3::new(4.0, -6.0, 1.5));
        let placed = align(source)
            .top()
            .center_x()
            .front()
            .to(reference.clone())
            .bottom()
            .left()
            .center_z()
            .apply()
            .unwrap();
        let p = boxed(&placed);
        let r = boxed(&reference);
        assert_relative_eq!(p.top, r.bottom, epsilon = 1e-9);
        assert_relative_eq!(p.center().x, r.left, epsilon = 1e-9);
        assert_relative_eq!(p.front, r.center().z, epsilon = 1e-9);
    }

    #[test]
    fn test_realigning_is_idempotent() {
        let source = cube_at(3.0, Vec3::new(1.0, 2.0, 3.0));
        let reference = cube_at(5.0, Vec3::new(-4.0, 0.0, 9.0));
        let once = align(source)
            .left()
            .top()
            .to(reference.clone())
            .left()
            .top()
            .apply()
            .unwrap();
        let matrix = align(once.clone())
            .left()
            .top()
            .to(reference)
            .left()
            .top()
            .matrix()
            .unwrap();
        assert_relative_eq!(matrix.translation_part(), Vec3::zeros(), epsilon = 1e-9);
        let twice = align(once.clone()).left().top().to_self().left().top().matrix().unwrap();
        assert!(twice.is_identity() || twice.translation_part().norm() < 1e-12);
    }

    #[test]
    fn test_unset_axes_stay_put() {
        let source = cube_at(2.0, Vec3::new(0.0, 0.0, 40.0));
        let reference = cube_at(2.0, Vec3::new(10.0, 10.0, 10.0));
        let placed = align(source).left().to(reference).right().apply().unwrap();
        let b = boxed(&placed);
        assert_relative_eq!(b.left, 11.0);
        assert_relative_eq!(b.center().z, 40.0);
    }

    #[test]
    fn test_to_self_uses_frame_so_far() {
        let slab = Shape::from(Solid::cuboid(&Vec3::new(10.0, 2.0, 4.0)).unwrap());
        let placed = rotate(slab)
            .x(None)
            .then()
            .align()
            .back()
            .to_self()
            .center_z()
            .apply()
            .unwrap();
        let b = boxed(&placed);
        // quarter turn about X: depth 4 becomes height, height 2 becomes depth
        assert_relative_eq!(b.height(), 4.0, epsilon = 1e-9);
        assert_relative_eq!(b.back, 0.0, epsilon = 1e-9);
        assert_relative_eq!(b.front, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_to_position_places_anchor() {
        let source = cube_at(4.0, Vec3::new(9.0, 9.0, 9.0));
        let placed = align(source)
            .bottom()
            .center_x()
            .to_position()
            .x(1.0)
            .y(2.0)
            .apply()
            .unwrap();
        let b = boxed(&placed);
        assert_relative_eq!(b.center().x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(b.bottom, 2.0, epsilon = 1e-9);
        assert_relative_eq!(b.center().z, 9.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_reference_fails() {
        let err = align(cube_at(1.0, Vec3::zeros()))
            .top()
            .to(Solid::empty())
            .bottom()
            .apply()
            .unwrap_err();
        assert_eq!(err, FitError::UndefinedBounds { anchor: Anchor::Bottom });
    }

    #[test]
    fn test_then_continues_from_aligned_frame() {
        let source = cube_at(2.0, Vec3::zeros());
        let reference = cube_at(10.0, Vec3::zeros());
        let placed = align(source)
            .bottom()
            .to(reference)
            .top()
            .then()
            .move_()
            .forward(3.0)
            .apply()
            .unwrap();
        let b = boxed(&placed);
        assert_relative_eq!(b.bottom, 5.0);
        assert_relative_eq!(b.center().z, 3.0);
    }
}
