//! Named graph nodes with lazily evaluated solids.
//!
//! A [`Geometry`] is a cheap handle to an immutable node. Every operation
//! returns a new node that points at an [`Operation`]; the solid and the
//! bounds are computed on first request and cached for the life of the
//! node, so shared sub-results are evaluated once.
//!
//! In [`DebugMode::On`] each derived node also keeps a back-reference to
//! its generating operation. Operands flagged with [`Geometry::debug`]
//! can then be recovered from the final result with
//! [`Geometry::find_debug`].

use std::cell::OnceCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use ductkit_ir::{CsgOp, Document, Node as IrNode, NodeId};
use ductkit_kernel::{BooleanOp, Rgba, Solid};
use ductkit_math::Transform;

use crate::bounds::BoundingBox;
use crate::error::{FitError, Result};
use crate::graph::Operation;
use crate::shape::Shape;

/// Global atomic counter for unique node IDs.
static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

fn alloc_node_id() -> NodeId {
    NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Whether nodes record their ancestry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DebugMode {
    /// No ancestry; `find_debug` always returns nothing.
    #[default]
    Off,
    /// Derived nodes keep a pointer to their generating operation.
    On,
}

impl DebugMode {
    /// `On` if any of `modes` is on.
    pub fn any(modes: impl IntoIterator<Item = DebugMode>) -> DebugMode {
        if modes.into_iter().any(|m| m == DebugMode::On) {
            DebugMode::On
        } else {
            DebugMode::Off
        }
    }
}

/// Colors cycled through by [`Geometry::debug_overlays`].
const OVERLAY_PALETTE: [Rgba; 6] = [
    [0.90, 0.10, 0.10, 0.6],
    [0.10, 0.60, 0.90, 0.6],
    [0.95, 0.75, 0.10, 0.6],
    [0.20, 0.80, 0.30, 0.6],
    [0.70, 0.30, 0.90, 0.6],
    [0.95, 0.45, 0.10, 0.6],
];

struct Body {
    operation: Option<Rc<Operation>>,
    solid: OnceCell<Result<Solid>>,
    bounds: OnceCell<Result<Option<BoundingBox>>>,
}

struct Node {
    id: NodeId,
    name: String,
    mode: DebugMode,
    flagged: bool,
    body: Rc<Body>,
    lineage: Option<Rc<Operation>>,
}

/// A named, immutable geometry node.
#[derive(Clone)]
pub struct Geometry {
    node: Rc<Node>,
}

impl Geometry {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Wrap a raw solid with debug tracking off.
    pub fn new(solid: Solid, name: &str) -> Self {
        Self::with_mode(solid, name, DebugMode::Off)
    }

    /// Wrap a raw solid in the given debug mode.
    pub fn with_mode(solid: Solid, name: &str, mode: DebugMode) -> Self {
        let body = Body {
            operation: None,
            solid: OnceCell::from(Ok(solid)),
            bounds: OnceCell::new(),
        };
        Self::from_parts(name.to_string(), mode, false, Rc::new(body), None)
    }

    pub(crate) fn derived(operation: Operation, name: String) -> Self {
        let mode = operation.mode();
        let operation = Rc::new(operation);
        let lineage = match mode {
            DebugMode::On => Some(Rc::clone(&operation)),
            DebugMode::Off => None,
        };
        let body = Body {
            operation: Some(operation),
            solid: OnceCell::new(),
            bounds: OnceCell::new(),
        };
        Self::from_parts(name, mode, false, Rc::new(body), lineage)
    }

    fn from_parts(
        name: String,
        mode: DebugMode,
        flagged: bool,
        body: Rc<Body>,
        lineage: Option<Rc<Operation>>,
    ) -> Self {
        Self {
            node: Rc::new(Node {
                id: alloc_node_id(),
                name,
                mode,
                flagged,
                body,
                lineage,
            }),
        }
    }

    fn sibling(&self, name: String, flagged: bool) -> Self {
        Self::from_parts(
            name,
            self.node.mode,
            flagged,
            Rc::clone(&self.node.body),
            self.node.lineage.clone(),
        )
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Unique id of this node.
    pub fn id(&self) -> NodeId {
        self.node.id
    }

    /// Diagnostic name; empty for unnamed leaves.
    pub fn name(&self) -> &str {
        &self.node.name
    }

    /// Debug mode this node was built in.
    pub fn mode(&self) -> DebugMode {
        self.node.mode
    }

    /// Whether this node was flagged with [`Geometry::debug`].
    pub fn is_flagged(&self) -> bool {
        self.node.flagged
    }

    /// A copy flagged for debug display. Shares the cached result.
    pub fn debug(&self) -> Geometry {
        self.sibling(self.node.name.clone(), true)
    }

    /// A copy under another name. Shares the cached result.
    pub fn renamed(&self, name: impl Into<String>) -> Geometry {
        self.sibling(name.into(), self.node.flagged)
    }

    /// The operation that produced this node, `None` for leaves.
    pub fn operation(&self) -> Option<&Operation> {
        self.node.body.operation.as_deref()
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    /// The evaluated solid, computed once.
    pub fn solid(&self) -> Result<&Solid> {
        let body = &self.node.body;
        body.solid
            .get_or_init(|| match &body.operation {
                Some(operation) => operation.compute(&self.node.name),
                None => Ok(Solid::empty()),
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Bounds of the evaluated solid, computed once.
    pub fn bounds(&self) -> Result<Option<BoundingBox>> {
        self.node
            .body
            .bounds
            .get_or_init(|| self.solid().map(BoundingBox::of_solid))
            .clone()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Union with `others`.
    pub fn union<I, S>(&self, others: I) -> Geometry
    where
        I: IntoIterator<Item = S>,
        S: Into<Shape>,
    {
        self.boolean(BooleanOp::Union, others)
    }

    /// Subtract every shape in `others`.
    pub fn subtract<I, S>(&self, others: I) -> Geometry
    where
        I: IntoIterator<Item = S>,
        S: Into<Shape>,
    {
        self.boolean(BooleanOp::Difference, others)
    }

    /// Intersect with `others`.
    pub fn intersect<I, S>(&self, others: I) -> Geometry
    where
        I: IntoIterator<Item = S>,
        S: Into<Shape>,
    {
        self.boolean(BooleanOp::Intersection, others)
    }

    /// Convex hull of this node together with `others`.
    pub fn hull<I, S>(&self, others: I) -> Geometry
    where
        I: IntoIterator<Item = S>,
        S: Into<Shape>,
    {
        let operands = self.with_operands(others);
        Operation::Hull { operands }.eval(None)
    }

    fn boolean<I, S>(&self, op: BooleanOp, others: I) -> Geometry
    where
        I: IntoIterator<Item = S>,
        S: Into<Shape>,
    {
        let operands = self.with_operands(others);
        Operation::Boolean { op, operands }.eval(None)
    }

    /// `self` followed by `others` as nodes. Raw solids join in debug
    /// mode when any operand is in it.
    fn with_operands<I, S>(&self, others: I) -> Vec<Geometry>
    where
        I: IntoIterator<Item = S>,
        S: Into<Shape>,
    {
        let others: Vec<Shape> = others.into_iter().map(Into::into).collect();
        let mode = DebugMode::any(
            std::iter::once(self.mode()).chain(others.iter().map(Shape::debug_mode)),
        );
        let mut operands = vec![self.clone()];
        for other in others {
            operands.extend(other.into_geometries(mode));
        }
        operands
    }

    /// Apply an affine transform.
    pub fn transform(&self, matrix: &Transform) -> Geometry {
        Operation::Transform {
            matrix: *matrix,
            operand: self.clone(),
        }
        .eval(None)
    }

    /// Assign a color.
    pub fn colorize(&self, color: Rgba) -> Geometry {
        Operation::Colorize {
            color,
            operand: self.clone(),
        }
        .eval(None)
    }

    // =========================================================================
    // Debug ancestry
    // =========================================================================

    /// Flagged ancestors in pre-order, each listed once. The node itself
    /// is not included. Empty unless built in [`DebugMode::On`].
    pub fn find_debug(&self) -> Vec<Geometry> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();
        self.collect_debug(&mut found, &mut seen);
        found
    }

    fn collect_debug(&self, found: &mut Vec<Geometry>, seen: &mut HashSet<NodeId>) {
        let Some(operation) = &self.node.lineage else {
            return;
        };
        for operand in operation.operands() {
            if !seen.insert(operand.id()) {
                continue;
            }
            if operand.is_flagged() {
                found.push(operand.clone());
            }
            operand.collect_debug(found, seen);
        }
    }

    /// Flagged ancestors recolored for display, innermost last.
    pub fn debug_overlays(&self) -> Vec<Geometry> {
        self.find_debug()
            .into_iter()
            .rev()
            .zip(OVERLAY_PALETTE.iter().cycle())
            .map(|(g, color)| g.colorize(*color))
            .collect()
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Record the construction graph below this node.
    pub fn to_document(&self) -> Document {
        document(std::slice::from_ref(self))
    }

    fn record(&self, doc: &mut Document) {
        let op = match self.operation() {
            None => CsgOp::Primitive {
                faces: self
                    .node
                    .body
                    .solid
                    .get()
                    .and_then(|s| s.as_ref().ok())
                    .map_or(0, |s| s.polygons().len()),
            },
            Some(Operation::Boolean { op, operands }) => {
                let operands = operands.iter().map(Geometry::id).collect();
                match op {
                    BooleanOp::Union => CsgOp::Union { operands },
                    BooleanOp::Difference => CsgOp::Difference { operands },
                    BooleanOp::Intersection => CsgOp::Intersection { operands },
                }
            }
            Some(Operation::Hull { operands }) => CsgOp::Hull {
                operands: operands.iter().map(Geometry::id).collect(),
            },
            Some(Operation::Transform { matrix, operand }) => CsgOp::Transform {
                child: operand.id(),
                matrix: matrix.to_cols_array(),
            },
            Some(Operation::Colorize { color, operand }) => CsgOp::Colorize {
                child: operand.id(),
                color: *color,
            },
        };
        let inserted = doc.insert(IrNode {
            id: self.id(),
            name: (!self.name().is_empty()).then(|| self.name().to_string()),
            debug: self.is_flagged(),
            op,
        });
        if inserted {
            if let Some(operation) = self.operation() {
                for operand in operation.operands() {
                    operand.record(doc);
                }
            }
        }
    }
}

impl fmt::Debug for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Geometry")
            .field("id", &self.node.id)
            .field("name", &self.node.name)
            .field("flagged", &self.node.flagged)
            .finish_non_exhaustive()
    }
}

/// Record the construction graphs of several result nodes in one document.
pub fn document(roots: &[Geometry]) -> Document {
    let mut doc = Document::new();
    for root in roots {
        root.record(&mut doc);
        doc.roots.push(root.id());
    }
    doc
}

fn nodes(
    name: &'static str,
    shapes: impl IntoIterator<Item = impl Into<Shape>>,
) -> Result<Vec<Geometry>> {
    let shapes: Vec<Shape> = shapes.into_iter().map(Into::into).collect();
    let mode = DebugMode::any(shapes.iter().map(Shape::debug_mode));
    let nodes: Vec<Geometry> = shapes
        .into_iter()
        .flat_map(|s| s.into_geometries(mode))
        .collect();
    if nodes.is_empty() {
        return Err(FitError::NoOperands(name));
    }
    Ok(nodes)
}

fn fold(
    name: &'static str,
    op: BooleanOp,
    shapes: impl IntoIterator<Item = impl Into<Shape>>,
) -> Result<Geometry> {
    let nodes = nodes(name, shapes)?;
    let (first, rest) = nodes.split_first().ok_or(FitError::NoOperands(name))?;
    Ok(first.boolean(op, rest))
}

/// Union of all shapes; the first is the receiver.
pub fn union(shapes: impl IntoIterator<Item = impl Into<Shape>>) -> Result<Geometry> {
    fold("union", BooleanOp::Union, shapes)
}

/// The first shape minus all others.
pub fn subtract(shapes: impl IntoIterator<Item = impl Into<Shape>>) -> Result<Geometry> {
    fold("subtract", BooleanOp::Difference, shapes)
}

/// Intersection of all shapes; the first is the receiver.
pub fn intersect(shapes: impl IntoIterator<Item = impl Into<Shape>>) -> Result<Geometry> {
    fold("intersect", BooleanOp::Intersection, shapes)
}

/// Convex hull of all shapes.
pub fn hull(shapes: impl IntoIterator<Item = impl Into<Shape>>) -> Result<Geometry> {
    let nodes = nodes("hull", shapes)?;
    let (first, rest) = nodes.split_first().ok_or(FitError::NoOperands("hull"))?;
    Ok(first.hull(rest))
}

/// Union of the hulls of each consecutive pair, sweeping a convex shape
/// along the sequence. A single shape gives its own hull.
pub fn hull_chain(shapes: impl IntoIterator<Item = impl Into<Shape>>) -> Result<Geometry> {
    let nodes = nodes("hull_chain", shapes)?;
    if let [only] = nodes.as_slice() {
        return Ok(only.hull(std::iter::empty::<Shape>()));
    }
    let links: Vec<Geometry> = nodes.windows(2).map(|w| w[0].hull([&w[1]])).collect();
    fold("hull_chain", BooleanOp::Union, links)
}

// =============================================================================
// Operator overloads
// =============================================================================

/// `a + b` is `a.union([b])`.
impl std::ops::Add for &Geometry {
    type Output = Geometry;
    fn add(self, rhs: &Geometry) -> Geometry {
        self.union([rhs])
    }
}

/// `a + b` is `a.union([b])`.
impl std::ops::Add for Geometry {
    type Output = Geometry;
    fn add(self, rhs: Geometry) -> Geometry {
        self.union([rhs])
    }
}

/// `a - b` is `a.subtract([b])`.
impl std::ops::Sub for &Geometry {
    type Output = Geometry;
    fn sub(self, rhs: &Geometry) -> Geometry {
        self.subtract([rhs])
    }
}

/// `a - b` is `a.subtract([b])`.
impl std::ops::Sub for Geometry {
    type Output = Geometry;
    fn sub(self, rhs: Geometry) -> Geometry {
        self.subtract([rhs])
    }
}

/// `a & b` is `a.intersect([b])`.
impl std::ops::BitAnd for &Geometry {
    type Output = Geometry;
    fn bitand(self, rhs: &Geometry) -> Geometry {
        self.intersect([rhs])
    }
}

/// `a & b` is `a.intersect([b])`.
impl std::ops::BitAnd for Geometry {
    type Output = Geometry;
    fn bitand(self, rhs: Geometry) -> Geometry {
        self.intersect([rhs])
    }
}
