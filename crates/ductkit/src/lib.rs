#![warn(missing_docs)]

//! ductkit: bounding-box alignment for parametric printer parts
//!
//! Parts are described relative to each other: "sit this bracket on top of
//! the rail, flush with its left face", instead of hand-computed offsets.
//! Shapes are lazily evaluated CSG nodes; transform steps read anchors
//! from their bounds and bake one matrix in at the end.
//!
//! # Example
//!
//! ```rust
//! use ductkit::{align, mirror, Geometry, Step};
//! use ductkit_kernel::Solid;
//! use ductkit_math::Vec3;
//!
//! let rail = Geometry::new(Solid::cuboid(&Vec3::new(100.0, 10.0, 10.0)).unwrap(), "rail");
//! let clip = Geometry::new(Solid::cuboid(&Vec3::new(8.0, 6.0, 12.0)).unwrap(), "clip");
//!
//! let left = align(&clip)
//!     .bottom()
//!     .left()
//!     .to(&rail)
//!     .top()
//!     .left()
//!     .apply()
//!     .unwrap();
//! let right = mirror(left.clone()).about(&rail).center_x().apply().unwrap();
//!
//! let b = right.bounds().unwrap().unwrap();
//! assert_eq!((b.right, b.bottom), (50.0, 5.0));
//! ```

pub mod bounds;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod graph;
pub mod helpers;
pub mod holes;
pub mod shape;
pub mod transforms;

pub use ductkit_kernel;
pub use ductkit_math;

pub use bounds::{bounds, bounds_all, Anchor, Axis, BoundingBox};
pub use config::Config;
pub use error::{CadError, FitError, Result};
pub use geometry::{document, hull, hull_chain, intersect, subtract, union, DebugMode, Geometry};
pub use graph::Operation;
pub use helpers::Helpers;
pub use holes::{drill, hole, Hole};
pub use shape::{unwrap, wrap, GeometryGroup, Shape};
pub use transforms::{
    align, align_all, group, mirror, mirror_all, move_, move_all, position, position_all, rotate,
    rotate_all, scale, scale_all, transform, Align, AlignAll, AlignAllTo, AlignAllToPosition,
    AlignTo, AlignToPosition, All, FromStage, Group, Mirror, MirrorAll, Move, MoveAll, Position,
    PositionAll, Rotate, RotateAll, Scale, ScaleAll, Stage, Step, Then, ThenAll, Translation,
};
