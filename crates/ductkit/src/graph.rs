//! Pending operations over graph nodes.

use ductkit_kernel::{BooleanOp, Rgba, Solid};
use ductkit_math::Transform;
use tracing::debug;

use crate::error::{FitError, Result};
use crate::geometry::{DebugMode, Geometry};

const UNNAMED: &str = "primitive";

/// An operation that has not been evaluated yet.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Boolean fold over the operands; the first is the receiver.
    Boolean {
        /// Which boolean.
        op: BooleanOp,
        /// Operands in order.
        operands: Vec<Geometry>,
    },
    /// Convex hull of every operand's vertices.
    Hull {
        /// Operands in order.
        operands: Vec<Geometry>,
    },
    /// Affine transform of one operand.
    Transform {
        /// Matrix to apply.
        matrix: Transform,
        /// The transformed node.
        operand: Geometry,
    },
    /// Color assignment on one operand.
    Colorize {
        /// RGBA color.
        color: Rgba,
        /// The colored node.
        operand: Geometry,
    },
}

impl Operation {
    /// Nodes this operation reads from, in order.
    pub fn operands(&self) -> &[Geometry] {
        match self {
            Operation::Boolean { operands, .. } | Operation::Hull { operands } => operands,
            Operation::Transform { operand, .. } | Operation::Colorize { operand, .. } => {
                std::slice::from_ref(operand)
            }
        }
    }

    /// Diagnostic name built from the operand names.
    pub fn name(&self) -> String {
        match self {
            Operation::Boolean { op, operands } => {
                let sep = match op {
                    BooleanOp::Union => " (v) ",
                    BooleanOp::Difference => " (-) ",
                    BooleanOp::Intersection => " (^) ",
                };
                operands
                    .iter()
                    .map(|g| display_name(g.name()))
                    .collect::<Vec<_>>()
                    .join(sep)
            }
            Operation::Hull { operands } => format!(
                "hull({})",
                operands
                    .iter()
                    .map(|g| display_name(g.name()))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Operation::Transform { operand, .. } => {
                format!("transform({})", display_name(operand.name()))
            }
            Operation::Colorize { operand, .. } => {
                format!("colorize({})", display_name(operand.name()))
            }
        }
    }

    /// Debug mode inherited by the result: on if any operand is on.
    pub fn mode(&self) -> DebugMode {
        DebugMode::any(self.operands().iter().map(Geometry::mode))
    }

    /// Wrap the operation in a new node. Nothing is computed until the
    /// node's solid or bounds are requested.
    pub fn eval(self, name: Option<String>) -> Geometry {
        let name = name.unwrap_or_else(|| self.name());
        Geometry::derived(self, name)
    }

    pub(crate) fn compute(&self, name: &str) -> Result<Solid> {
        let solid = match self {
            Operation::Boolean { op, operands } => {
                let mut operands = operands.iter();
                let Some(first) = operands.next() else {
                    return Err(FitError::NoOperands("boolean"));
                };
                let mut acc = first.solid()?.clone();
                for operand in operands {
                    acc = acc.boolean(operand.solid()?, *op);
                }
                acc
            }
            Operation::Hull { operands } => {
                let solids = operands
                    .iter()
                    .map(Geometry::solid)
                    .collect::<Result<Vec<_>>>()?;
                Solid::hull(solids)
            }
            Operation::Transform { matrix, operand } => operand
                .solid()?
                .transform(matrix)
                .map_err(|e| FitError::kernel(name, e))?,
            Operation::Colorize { color, operand } => operand.solid()?.colorize(*color),
        };
        debug!(node = name, faces = solid.polygons().len(), "evaluated");
        Ok(solid)
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        UNNAMED
    } else {
        name
    }
}
