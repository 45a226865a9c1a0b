use ductkit_math::{Transform, Vec3};

use super::{FromStage, Stage, Step};

/// Scaling about the origin. Factors default to 1.
#[derive(Debug, Clone)]
pub struct Scale {
    stage: Stage,
    factors: Vec3,
}

impl Scale {
    /// Factor on X.
    pub fn width(mut self, factor: f64) -> Self {
        self.factors.x = factor;
        self
    }

    /// Factor on Y.
    pub fn height(mut self, factor: f64) -> Self {
        self.factors.y = factor;
        self
    }

    /// Factor on Z.
    pub fn depth(mut self, factor: f64) -> Self {
        self.factors.z = factor;
        self
    }

    /// Uniform factor.
    pub fn factor(mut self, factor: f64) -> Self {
        self.factors = Vec3::repeat(factor);
        self
    }

    /// Current factors.
    pub fn factors(&self) -> Vec3 {
        self.factors
    }
}

impl Step for Scale {
    fn stage(&self) -> &Stage {
        &self.stage
    }

    fn into_stage(self) -> Stage {
        self.stage
    }

    fn base_matrix(&self) -> Transform {
        Transform::scaling(&self.factors)
    }
}

impl FromStage for Scale {
    fn from_stage(stage: Stage) -> Self {
        Self {
            stage,
            factors: Vec3::repeat(1.0),
        }
    }
}
