use std::f64::consts::FRAC_PI_2;

use ductkit_math::{Transform, Vec3};

use super::{FromStage, Stage, Step};

/// Rotation about the origin by Tait-Bryan angles: X (roll) acts first,
/// then Y (pitch), then Z (yaw). Angles are in radians; setters called
/// with `None` use a quarter turn.
#[derive(Debug, Clone)]
pub struct Rotate {
    stage: Stage,
    angles: Vec3,
}

fn or_quarter(angle: impl Into<Option<f64>>) -> f64 {
    angle.into().unwrap_or(FRAC_PI_2)
}

impl Rotate {
    /// Roll about X.
    pub fn x(mut self, angle: impl Into<Option<f64>>) -> Self {
        self.angles.x = or_quarter(angle);
        self
    }

    /// Pitch about Y.
    pub fn y(mut self, angle: impl Into<Option<f64>>) -> Self {
        self.angles.y = or_quarter(angle);
        self
    }

    /// Yaw about Z.
    pub fn z(mut self, angle: impl Into<Option<f64>>) -> Self {
        self.angles.z = or_quarter(angle);
        self
    }

    /// Same angle about X and Y.
    pub fn xy(self, angle: impl Into<Option<f64>>) -> Self {
        let angle = or_quarter(angle);
        self.x(angle).y(angle)
    }

    /// Same angle about X and Z.
    pub fn xz(self, angle: impl Into<Option<f64>>) -> Self {
        let angle = or_quarter(angle);
        self.x(angle).z(angle)
    }

    /// Same angle about Y and Z.
    pub fn yz(self, angle: impl Into<Option<f64>>) -> Self {
        let angle = or_quarter(angle);
        self.y(angle).z(angle)
    }

    /// Same angle about all three axes.
    pub fn xyz(self, angle: impl Into<Option<f64>>) -> Self {
        let angle = or_quarter(angle);
        self.x(angle).y(angle).z(angle)
    }

    /// Current `(roll, pitch, yaw)`.
    pub fn angles(&self) -> Vec3 {
        self.angles
    }
}

impl Step for Rotate {
    fn stage(&self) -> &Stage {
        &self.stage
    }

    fn into_stage(self) -> Stage {
        self.stage
    }

    fn base_matrix(&self) -> Transform {
        Transform::tait_bryan(self.angles.z, self.angles.y, self.angles.x)
    }
}

impl FromStage for Rotate {
    fn from_stage(stage: Stage) -> Self {
        Self {
            stage,
            angles: Vec3::zeros(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::shape::Shape;
    use crate::transforms::{rotate, Step};
    use approx::assert_relative_eq;
    use ductkit_kernel::Solid;
    use ductkit_math::Vec3;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn slab() -> Shape {
        Solid::cuboid(&Vec3::new(10.0, 2.0, 4.0)).unwrap().into()
    }

    #[test]
    fn test_default_is_quarter_turn() {
        assert_eq!(rotate(slab()).x(None).angles().x, FRAC_PI_2);
        assert_eq!(rotate(slab()).yz(PI).angles(), Vec3::new(0.0, PI, PI));
    }

    #[test]
    fn test_yaw_swaps_width_and_height() {
        let b = rotate(slab())
            .z(None)
            .apply()
            .unwrap()
            .bounds()
            .unwrap()
            .unwrap();
        assert_relative_eq!(b.width(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(b.height(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(b.depth(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rotation_composes_after_incoming() {
        let b = rotate(slab())
            .x(None)
            .then()
            .rotate()
            .y(None)
            .apply()
            .unwrap()
            .bounds()
            .unwrap()
            .unwrap();
        // x turn: (10, 2, 4) -> (10, 4, 2); y turn: -> (2, 4, 10)
        assert_relative_eq!(b.width(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(b.height(), 4.0, epsilon = 1e-9);
        assert_relative_eq!(b.depth(), 10.0, epsilon = 1e-9);
    }
}
