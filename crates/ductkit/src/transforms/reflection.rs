use ductkit_math::{Plane, Point3, Transform, Vec3};

use super::{FromStage, Stage, Step};
use crate::bounds::{Anchor, BoundingBox};
use crate::error::{FitError, Result};
use crate::shape::Shape;

/// Reflection through a plane. Without a plane setter it mirrors through
/// `z = 0`.
///
/// The anchor setters pick a plane through the center of the bounds,
/// perpendicular to the anchor's axis and passing through the anchor:
/// `mirror(part).right()` flips the part about its own right face.
#[derive(Debug, Clone)]
pub struct Mirror {
    stage: Stage,
    plane: Plane,
}

impl Mirror {
    /// Measure anchors on `target` instead of the mirrored shape.
    pub fn about(self, target: impl Into<Shape>) -> Self {
        let bounds = target.into().bounds();
        self.with_bounds(bounds)
    }

    pub(crate) fn with_bounds(mut self, bounds: Result<Option<BoundingBox>>) -> Self {
        self.stage.override_bounds(bounds);
        self
    }

    /// Mirror through the plane perpendicular to `anchor`'s axis at the
    /// anchor.
    pub fn anchor(mut self, anchor: Anchor) -> Self {
        if let Some(bounds) = self.stage.anchored(anchor) {
            let axis = anchor.axis();
            let mut point = bounds.center();
            point[axis.index()] = bounds.anchor(anchor);
            self = self.plane(axis.unit(), point);
        }
        self
    }

    /// Plane at the maximum Y.
    pub fn top(self) -> Self {
        self.anchor(Anchor::Top)
    }

    /// Plane at the minimum Y.
    pub fn bottom(self) -> Self {
        self.anchor(Anchor::Bottom)
    }

    /// Plane at the minimum X.
    pub fn left(self) -> Self {
        self.anchor(Anchor::Left)
    }

    /// Plane at the maximum X.
    pub fn right(self) -> Self {
        self.anchor(Anchor::Right)
    }

    /// Plane at the maximum Z.
    pub fn front(self) -> Self {
        self.anchor(Anchor::Front)
    }

    /// Plane at the minimum Z.
    pub fn back(self) -> Self {
        self.anchor(Anchor::Back)
    }

    /// Plane through the X center.
    pub fn center_x(self) -> Self {
        self.anchor(Anchor::CenterX)
    }

    /// Plane through the Y center.
    pub fn center_y(self) -> Self {
        self.anchor(Anchor::CenterY)
    }

    /// Plane through the Z center.
    pub fn center_z(self) -> Self {
        self.anchor(Anchor::CenterZ)
    }

    /// An explicit plane. A zero normal is recorded as an error.
    pub fn plane(mut self, normal: Vec3, point: Point3) -> Self {
        match Plane::from_normal_and_point(&normal, &point) {
            Some(plane) => self.plane = plane,
            None => self.stage.record(FitError::ZeroNormal),
        }
        self
    }
}

impl Step for Mirror {
    fn stage(&self) -> &Stage {
        &self.stage
    }

    fn into_stage(self) -> Stage {
        self.stage
    }

    fn base_matrix(&self) -> Transform {
        Transform::mirror(&self.plane)
    }
}

impl FromStage for Mirror {
    fn from_stage(stage: Stage) -> Self {
        Self {
            stage,
            plane: Plane::xy(),
        }
    }
}
