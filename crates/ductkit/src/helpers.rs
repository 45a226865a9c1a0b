//! Named placement closures shared between part recipes.
//!
//! One recipe can compute where something goes (usually from an
//! alignment matrix) and store it under a name; a later recipe that owns
//! the part calls [`Helpers::place`] without knowing how it was derived.

use std::collections::HashMap;
use std::fmt;

use crate::error::{FitError, Result};
use crate::shape::Shape;

type Placement = Box<dyn Fn(Shape) -> Result<Shape>>;

/// Registry of placement closures keyed by name.
#[derive(Default)]
pub struct Helpers {
    placements: HashMap<String, Placement>,
}

impl Helpers {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `placement` under `name`, replacing any earlier entry.
    pub fn set<F>(&mut self, name: impl Into<String>, placement: F)
    where
        F: Fn(Shape) -> Result<Shape> + 'static,
    {
        self.placements.insert(name.into(), Box::new(placement));
    }

    /// True if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.placements.contains_key(name)
    }

    /// Run the placement stored under `name` on `shape`.
    pub fn place(&self, name: &str, shape: impl Into<Shape>) -> Result<Shape> {
        let placement = self
            .placements
            .get(name)
            .ok_or_else(|| FitError::MissingHelper(name.to_string()))?;
        placement(shape.into())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.placements.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Helpers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Helpers")
            .field("placements", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::{align, transform, Step};
    use approx::assert_relative_eq;
    use ductkit_kernel::Solid;
    use ductkit_math::{Transform, Vec3};

    fn cube_at(size: f64, at: Vec3) -> Shape {
        Shape::from(Solid::cuboid(&Vec3::new(size, size, size)).unwrap())
            .transformed(&Transform::translation(&at))
            .unwrap()
    }

    #[test]
    fn test_place_uses_stored_matrix() {
        let block = cube_at(2.0, Vec3::zeros());
        let shelf = cube_at(10.0, Vec3::new(0.0, 20.0, 0.0));
        let matrix = align(block).bottom().to(shelf).top().matrix().unwrap();

        let mut helpers = Helpers::new();
        helpers.set("on_shelf", move |shape| {
            transform(&matrix, [shape])?
                .pop()
                .ok_or(FitError::NoOperands("on_shelf"))
        });
        assert!(helpers.contains("on_shelf"));

        let sibling = cube_at(2.0, Vec3::new(3.0, 0.0, 0.0));
        let placed = helpers.place("on_shelf", sibling).unwrap();
        let b = placed.bounds().unwrap().unwrap();
        assert_relative_eq!(b.bottom, 25.0);
        assert_relative_eq!(b.center().x, 3.0);
    }

    #[test]
    fn test_missing_helper() {
        let helpers = Helpers::new();
        let err = helpers.place("nowhere", Solid::empty()).unwrap_err();
        assert_eq!(err, FitError::MissingHelper("nowhere".to_string()));
    }

    #[test]
    fn test_names_sorted_and_replaced() {
        let mut helpers = Helpers::new();
        helpers.set("b", Ok);
        helpers.set("a", Ok);
        helpers.set("b", |_| Err(FitError::ZeroNormal));
        assert_eq!(helpers.names(), vec!["a", "b"]);
        assert!(helpers.place("b", Solid::empty()).is_err());
    }
}
