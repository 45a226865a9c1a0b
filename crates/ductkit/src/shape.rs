//! The values the transform algebra moves around.

use ductkit_kernel::Solid;
use ductkit_math::Transform;

use crate::bounds::{combine_all, BoundingBox};
use crate::error::{FitError, Result};
use crate::geometry::{DebugMode, Geometry};

/// Anything that can be measured and transformed.
#[derive(Debug, Clone)]
pub enum Shape {
    /// A raw kernel solid, transformed eagerly.
    Solid(Solid),
    /// A named graph node, transformed lazily.
    Geometry(Geometry),
    /// Unrelated shapes moved together.
    Group(GeometryGroup),
}

impl Shape {
    /// Bounds after all pending operations; `None` when empty.
    pub fn bounds(&self) -> Result<Option<BoundingBox>> {
        match self {
            Shape::Solid(solid) => Ok(BoundingBox::of_solid(solid)),
            Shape::Geometry(geometry) => geometry.bounds(),
            Shape::Group(group) => {
                let boxes = group
                    .members()
                    .iter()
                    .map(Shape::bounds)
                    .collect::<Result<Vec<_>>>()?;
                Ok(combine_all(boxes))
            }
        }
    }

    /// Bounds the shape would have under `matrix`, without building a node.
    pub fn measure(&self, matrix: &Transform) -> Result<Option<BoundingBox>> {
        if matrix.is_identity() {
            return self.bounds();
        }
        match self {
            Shape::Solid(solid) => measure_solid(solid, matrix, "primitive"),
            Shape::Geometry(geometry) => measure_solid(geometry.solid()?, matrix, geometry.name()),
            Shape::Group(group) => {
                let boxes = group
                    .members()
                    .iter()
                    .map(|m| m.measure(matrix))
                    .collect::<Result<Vec<_>>>()?;
                Ok(combine_all(boxes))
            }
        }
    }

    /// Bake `matrix` into the shape. Groups are transformed member-wise.
    pub fn transformed(&self, matrix: &Transform) -> Result<Shape> {
        Ok(match self {
            Shape::Solid(solid) => Shape::Solid(
                solid
                    .transform(matrix)
                    .map_err(|e| FitError::kernel("transform(primitive)", e))?,
            ),
            Shape::Geometry(geometry) => Shape::Geometry(geometry.transform(matrix)),
            Shape::Group(group) => Shape::Group(
                group
                    .members()
                    .iter()
                    .map(|m| m.transformed(matrix))
                    .collect::<Result<GeometryGroup>>()?,
            ),
        })
    }

    /// Flatten nested groups into a sequence of solids and nodes.
    pub fn unpack(self) -> Vec<Shape> {
        match self {
            Shape::Group(group) => group.into_members().into_iter().flat_map(Shape::unpack).collect(),
            other => vec![other],
        }
    }

    /// Wrap into graph nodes, flattening groups. Raw solids become
    /// unnamed nodes in `mode`.
    pub fn into_geometries(self, mode: DebugMode) -> Vec<Geometry> {
        self.unpack()
            .into_iter()
            .filter_map(|s| match s {
                Shape::Solid(solid) => Some(Geometry::with_mode(solid, "", mode)),
                Shape::Geometry(geometry) => Some(geometry),
                Shape::Group(_) => None,
            })
            .collect()
    }

    /// `On` if any node in the shape records lineage.
    pub fn debug_mode(&self) -> DebugMode {
        match self {
            Shape::Solid(_) => DebugMode::Off,
            Shape::Geometry(geometry) => geometry.mode(),
            Shape::Group(group) => DebugMode::any(group.members().iter().map(Shape::debug_mode)),
        }
    }

    /// Evaluate down to raw solids, flattening groups.
    pub fn solids(&self) -> Result<Vec<Solid>> {
        match self {
            Shape::Solid(solid) => Ok(vec![solid.clone()]),
            Shape::Geometry(geometry) => Ok(vec![geometry.solid()?.clone()]),
            Shape::Group(group) => unwrap(group.members()),
        }
    }

    /// The node, if this shape is one.
    pub fn as_geometry(&self) -> Option<&Geometry> {
        match self {
            Shape::Geometry(geometry) => Some(geometry),
            _ => None,
        }
    }

    /// Consume into a node, wrapping raw solids. Groups are returned unchanged.
    pub fn into_geometry(self, mode: DebugMode) -> std::result::Result<Geometry, Shape> {
        match self {
            Shape::Solid(solid) => Ok(Geometry::with_mode(solid, "", mode)),
            Shape::Geometry(geometry) => Ok(geometry),
            group @ Shape::Group(_) => Err(group),
        }
    }
}

fn measure_solid(solid: &Solid, matrix: &Transform, name: &str) -> Result<Option<BoundingBox>> {
    let moved = solid
        .transform(matrix)
        .map_err(|e| FitError::kernel(format!("measure({name})"), e))?;
    Ok(BoundingBox::of_solid(&moved))
}

impl From<Solid> for Shape {
    fn from(solid: Solid) -> Self {
        Shape::Solid(solid)
    }
}

impl From<Geometry> for Shape {
    fn from(geometry: Geometry) -> Self {
        Shape::Geometry(geometry)
    }
}

impl From<&Geometry> for Shape {
    fn from(geometry: &Geometry) -> Self {
        Shape::Geometry(geometry.clone())
    }
}

impl From<GeometryGroup> for Shape {
    fn from(group: GeometryGroup) -> Self {
        Shape::Group(group)
    }
}

impl From<Vec<Shape>> for Shape {
    fn from(members: Vec<Shape>) -> Self {
        Shape::Group(GeometryGroup::new(members))
    }
}

/// Ordered shapes that share one transform and are unpacked afterwards.
/// Not a boolean operand in its own right.
#[derive(Debug, Clone, Default)]
pub struct GeometryGroup {
    members: Vec<Shape>,
}

impl GeometryGroup {
    /// Group the given shapes.
    pub fn new(members: Vec<Shape>) -> Self {
        Self { members }
    }

    /// Members in order.
    pub fn members(&self) -> &[Shape] {
        &self.members
    }

    /// Take the members back.
    pub fn into_members(self) -> Vec<Shape> {
        self.members
    }

    /// Number of direct members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<Shape> for GeometryGroup {
    fn from_iter<I: IntoIterator<Item = Shape>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Wrap a raw solid as a named node in `mode`.
pub fn wrap(solid: Solid, name: &str, mode: DebugMode) -> Geometry {
    Geometry::with_mode(solid, name, mode)
}

/// Evaluate shapes down to raw solids, flattening groups.
pub fn unwrap(shapes: &[Shape]) -> Result<Vec<Solid>> {
    let mut out = Vec::with_capacity(shapes.len());
    for shape in shapes {
        out.extend(shape.solids()?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ductkit_math::Vec3;

    fn cube(size: f64) -> Solid {
        Solid::cuboid(&Vec3::new(size, size, size)).unwrap()
    }

    #[test]
    fn test_unpack_flattens_nested_groups() {
        let inner: Shape = vec![Shape::from(cube(1.0)), Shape::from(cube(2.0))].into();
        let outer: Shape = vec![inner, Shape::from(wrap(cube(3.0), "c", DebugMode::Off))].into();
        let flat = outer.unpack();
        assert_eq!(flat.len(), 3);
        assert!(flat[2].as_geometry().is_some());
    }

    #[test]
    fn test_unwrap_evaluates_nodes() {
        let a = wrap(cube(2.0), "a", DebugMode::Off);
        let b = wrap(cube(2.0), "b", DebugMode::Off)
            .transform(&Transform::translation(&Vec3::new(1.0, 0.0, 0.0)));
        let solids = unwrap(&[Shape::from(a.union([b])), cube(1.0).into()]).unwrap();
        assert_eq!(solids.len(), 2);
        let (min, max) = solids[0].bounding_box().unwrap();
        assert_eq!(min[0], -1.0);
        assert_eq!(max[0], 2.0);
    }

    #[test]
    fn test_measure_does_not_move_the_shape() {
        let shape = Shape::from(cube(2.0));
        let moved = shape
            .measure(&Transform::translation(&Vec3::new(0.0, 5.0, 0.0)))
            .unwrap()
            .unwrap();
        assert_eq!(moved.bottom, 4.0);
        assert_eq!(shape.bounds().unwrap().unwrap().bottom, -1.0);
    }

    #[test]
    fn test_singular_transform_reports_kernel_error() {
        let err = Shape::from(cube(1.0))
            .transformed(&Transform::scaling(&Vec3::new(0.0, 1.0, 1.0)))
            .unwrap_err();
        assert!(matches!(err, FitError::Kernel { .. }));
    }

    #[test]
    fn test_debug_mode_of_group_is_any_member() {
        let off: Shape = vec![
            Shape::from(cube(1.0)),
            Shape::from(wrap(cube(1.0), "a", DebugMode::Off)),
        ]
        .into();
        assert_eq!(off.debug_mode(), DebugMode::Off);
        let on: Shape = vec![off, Shape::from(wrap(cube(1.0), "b", DebugMode::On))].into();
        assert_eq!(on.debug_mode(), DebugMode::On);
    }

    #[test]
    fn test_group_transforms_each_member() {
        let node = wrap(cube(2.0), "n", DebugMode::Off);
        let group: Shape = vec![Shape::from(cube(2.0)), Shape::from(node)].into();
        let moved = group
            .transformed(&Transform::translation(&Vec3::new(10.0, 0.0, 0.0)))
            .unwrap();
        for member in moved.unpack() {
            assert_eq!(member.bounds().unwrap().unwrap().left, 9.0);
        }
    }
}
