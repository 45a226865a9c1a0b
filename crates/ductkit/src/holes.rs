//! Round holes placed from a target's bounds.
//!
//! A hole runs along Z through the center of the target's depth. Without
//! an explicit depth it spans the whole target; a chamfer widens its
//! front end.
//!
//! ```
//! use ductkit::{drill, Geometry, Hole};
//! use ductkit_kernel::Solid;
//! use ductkit_math::Vec3;
//!
//! let plate = Geometry::new(Solid::cuboid(&Vec3::new(40.0, 20.0, 4.0)).unwrap(), "plate");
//! let drilled = drill(&plate, &[Hole::new(-15.0, 0.0, 1.6), Hole::new(15.0, 0.0, 1.6)]).unwrap();
//! assert!(drilled.solid().unwrap().volume() < plate.solid().unwrap().volume());
//! ```

use ductkit_kernel::Solid;
use ductkit_math::{Transform, Vec3};

use crate::bounds::Anchor;
use crate::error::{FitError, Result};
use crate::geometry::{subtract, DebugMode, Geometry};
use crate::shape::Shape;

/// One hole: position in the XY plane, radius and optional extras.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hole {
    /// Center X.
    pub x: f64,
    /// Center Y.
    pub y: f64,
    /// Bore radius.
    pub radius: f64,
    /// Length along Z; the target's depth when `None`.
    pub depth: Option<f64>,
    /// Extra radius gained over the chamfer's length at the front end.
    pub chamfer: Option<f64>,
    /// Segment count of the bore.
    pub segments: u32,
}

impl Hole {
    /// A plain bore through the whole target.
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            x,
            y,
            radius,
            depth: None,
            chamfer: None,
            segments: 32,
        }
    }

    /// Limit the bore to `depth`, centered on the target's depth.
    pub fn depth(mut self, depth: f64) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Add a 45 degree chamfer of `size` at the front end.
    pub fn chamfer(mut self, size: f64) -> Self {
        self.chamfer = Some(size);
        self
    }

    /// Segment count for the bore and chamfer.
    pub fn segments(mut self, segments: u32) -> Self {
        self.segments = segments;
        self
    }
}

/// The cutters for `h` in `target`: the bore, then the chamfer cone
/// if one is set.
pub fn hole(h: &Hole, target: &Shape) -> Result<Vec<Geometry>> {
    let bounds = target.bounds()?.ok_or(FitError::UndefinedBounds {
        anchor: Anchor::CenterZ,
    })?;
    let mode = target.debug_mode();
    let center_z = bounds.center().z;
    let height = h.depth.unwrap_or_else(|| bounds.depth());

    let bore = Solid::cylinder(h.radius, height, h.segments)
        .map_err(|e| FitError::kernel("hole", e))?;
    let mut cutters = vec![place(bore, h.x, h.y, center_z, "hole", mode)?];

    if let Some(chamfer) = h.chamfer {
        let cone = Solid::cone(h.radius, h.radius + chamfer, chamfer, h.segments)
            .map_err(|e| FitError::kernel("chamfer", e))?;
        let z = center_z + height / 2.0 - chamfer / 2.0;
        cutters.push(place(cone, h.x, h.y, z, "chamfer", mode)?);
    }
    Ok(cutters)
}

/// Subtract every hole in `holes` from `target`.
pub fn drill(target: impl Into<Shape>, holes: &[Hole]) -> Result<Geometry> {
    let target = target.into();
    let mut operands = vec![target.clone()];
    for h in holes {
        operands.extend(hole(h, &target)?.into_iter().map(Shape::from));
    }
    subtract(operands)
}

fn place(solid: Solid, x: f64, y: f64, z: f64, name: &str, mode: DebugMode) -> Result<Geometry> {
    let moved = solid
        .transform(&Transform::translation(&Vec3::new(x, y, z)))
        .map_err(|e| FitError::kernel(name, e))?;
    Ok(Geometry::with_mode(moved, name, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn plate() -> Geometry {
        // 20 x 20 x 4, front face at z = 4
        let solid = Solid::cuboid(&Vec3::new(20.0, 20.0, 4.0))
            .unwrap()
            .transform(&Transform::translation(&Vec3::new(0.0, 0.0, 2.0)))
            .unwrap();
        Geometry::new(solid, "plate")
    }

    #[test]
    fn test_hole_spans_target_depth() {
        let cutters = hole(&Hole::new(3.0, -2.0, 1.0), &Shape::from(plate())).unwrap();
        assert_eq!(cutters.len(), 1);
        let b = cutters[0].bounds().unwrap().unwrap();
        assert_relative_eq!(b.back, 0.0, epsilon = 1e-9);
        assert_relative_eq!(b.front, 4.0, epsilon = 1e-9);
        assert_relative_eq!(b.center().x, 3.0, epsilon = 1e-9);
        assert_relative_eq!(b.center().y, -2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_explicit_depth_is_centered() {
        let cutters = hole(&Hole::new(0.0, 0.0, 1.0).depth(2.0), &Shape::from(plate())).unwrap();
        let b = cutters[0].bounds().unwrap().unwrap();
        assert_relative_eq!(b.back, 1.0, epsilon = 1e-9);
        assert_relative_eq!(b.front, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_chamfer_sits_at_front_end() {
        let cutters = hole(&Hole::new(0.0, 0.0, 1.0).chamfer(0.5), &Shape::from(plate())).unwrap();
        assert_eq!(cutters.len(), 2);
        assert_eq!(cutters[1].name(), "chamfer");
        let b = cutters[1].bounds().unwrap().unwrap();
        assert_relative_eq!(b.back, 3.5, epsilon = 1e-9);
        assert_relative_eq!(b.front, 4.0, epsilon = 1e-9);
        assert_relative_eq!(b.right, 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_drill_removes_bores() {
        let h = Hole::new(-5.0, 0.0, 1.0).segments(64);
        let drilled = drill(plate(), &[h, Hole { x: 5.0, ..h }]).unwrap();
        assert_eq!(drilled.name(), "plate (-) hole (-) hole");
        let removed = 1600.0 - drilled.solid().unwrap().volume();
        assert_relative_eq!(removed, 2.0 * PI * 4.0, max_relative = 0.01);
    }

    #[test]
    fn test_empty_target_has_no_anchor() {
        let err = hole(&Hole::new(0.0, 0.0, 1.0), &Shape::from(Solid::empty())).unwrap_err();
        assert!(matches!(err, FitError::UndefinedBounds { anchor: Anchor::CenterZ }));
    }

    #[test]
    fn test_cutters_follow_target_debug_mode() {
        let cube = Solid::cuboid(&Vec3::repeat(4.0)).unwrap();
        let target = Geometry::with_mode(cube, "t", DebugMode::On);
        let cutters = hole(&Hole::new(0.0, 0.0, 1.0), &Shape::from(&target)).unwrap();
        assert_eq!(cutters[0].mode(), DebugMode::On);
    }
}
