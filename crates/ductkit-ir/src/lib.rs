//! Serializable record of a ductkit construction graph.
//!
//! The record is declarative: leaves carry only their face count, inner
//! nodes reference their operands by [`NodeId`]. It is written for
//! inspection and diffing of generated models, not for re-evaluation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a node in the graph.
pub type NodeId = u64;

/// Operation recorded for a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CsgOp {
    /// A solid supplied directly by the kernel.
    Primitive {
        /// Number of polygon faces.
        faces: usize,
    },
    /// Union of all operands.
    Union {
        /// Operands in order; the first is the receiver.
        operands: Vec<NodeId>,
    },
    /// First operand minus every other operand.
    Difference {
        /// Operands in order; the first is the receiver.
        operands: Vec<NodeId>,
    },
    /// Intersection of all operands.
    Intersection {
        /// Operands in order; the first is the receiver.
        operands: Vec<NodeId>,
    },
    /// Convex hull of all operands.
    Hull {
        /// Operands in order.
        operands: Vec<NodeId>,
    },
    /// Affine transform of a child.
    Transform {
        /// Child node.
        child: NodeId,
        /// Column-major 4x4 matrix.
        matrix: [f64; 16],
    },
    /// Color assignment.
    Colorize {
        /// Child node.
        child: NodeId,
        /// RGBA in 0.0..1.0.
        color: [f64; 4],
    },
}

impl CsgOp {
    /// Nodes this operation reads from.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            CsgOp::Primitive { .. } => Vec::new(),
            CsgOp::Union { operands }
            | CsgOp::Difference { operands }
            | CsgOp::Intersection { operands }
            | CsgOp::Hull { operands } => operands.clone(),
            CsgOp::Transform { child, .. } | CsgOp::Colorize { child, .. } => vec![*child],
        }
    }
}

/// A node in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// Diagnostic name, absent for unnamed leaves.
    pub name: Option<String>,
    /// Whether the node was flagged for debug display.
    #[serde(default)]
    pub debug: bool,
    /// The operation this node represents.
    pub op: CsgOp,
}

/// A serialized construction graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Format version string.
    pub version: String,
    /// All nodes, keyed by [`NodeId`].
    pub nodes: HashMap<NodeId, Node>,
    /// Result nodes in output order.
    pub roots: Vec<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            nodes: HashMap::new(),
            roots: Vec::new(),
        }
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, returning `false` if its id was already present.
    pub fn insert(&mut self, node: Node) -> bool {
        if self.nodes.contains_key(&node.id) {
            return false;
        }
        self.nodes.insert(node.id, node);
        true
    }

    /// Flagged nodes, sorted by id.
    pub fn debug_nodes(&self) -> Vec<&Node> {
        let mut flagged: Vec<&Node> = self.nodes.values().filter(|n| n.debug).collect();
        flagged.sort_by_key(|n| n.id);
        flagged
    }

    /// Ids referenced by some node but missing from the document.
    pub fn dangling(&self) -> Vec<NodeId> {
        let mut missing: Vec<NodeId> = self
            .nodes
            .values()
            .flat_map(|n| n.op.children())
            .chain(self.roots.iter().copied())
            .filter(|id| !self.nodes.contains_key(id))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: NodeId, name: &str) -> Node {
        Node {
            id,
            name: Some(name.to_string()),
            debug: false,
            op: CsgOp::Primitive { faces: 6 },
        }
    }

    #[test]
    fn test_roundtrip_document() {
        let mut doc = Document::new();
        doc.insert(leaf(1, "plate"));
        doc.insert(Node {
            debug: true,
            ..leaf(2, "pogo")
        });
        doc.insert(Node {
            id: 3,
            name: Some("plate (-) pogo".to_string()),
            debug: false,
            op: CsgOp::Difference {
                operands: vec![1, 2],
            },
        });
        doc.roots.push(3);

        let json = doc.to_json().unwrap();
        let restored = Document::from_json(&json).unwrap();
        assert_eq!(doc, restored);
        assert!(restored.dangling().is_empty());
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let mut doc = Document::new();
        assert!(doc.insert(leaf(7, "a")));
        assert!(!doc.insert(leaf(7, "b")));
        assert_eq!(doc.nodes[&7].name.as_deref(), Some("a"));
    }

    #[test]
    fn test_debug_nodes_and_dangling() {
        let mut doc = Document::new();
        doc.insert(Node {
            debug: true,
            ..leaf(5, "x")
        });
        doc.insert(Node {
            id: 6,
            name: None,
            debug: false,
            op: CsgOp::Transform {
                child: 4,
                matrix: [0.0; 16],
            },
        });
        doc.roots.push(9);
        assert_eq!(doc.debug_nodes().len(), 1);
        assert_eq!(doc.dangling(), vec![4, 9]);
    }

    #[test]
    fn test_serde_tagged_enum() {
        let op = CsgOp::Colorize {
            child: 1,
            color: [1.0, 0.5, 0.0, 1.0],
        };
        let json = serde_json::to_string(&op).unwrap();
        assert!(json.contains(r#""type":"Colorize""#));
        let restored: CsgOp = serde_json::from_str(&json).unwrap();
        assert_eq!(op, restored);
    }

    #[test]
    fn test_hull_lists_operands_as_children() {
        let op: CsgOp = serde_json::from_str(r#"{"type":"Hull","operands":[3,5]}"#).unwrap();
        assert_eq!(op.children(), vec![3, 5]);
    }

    #[test]
    fn test_missing_debug_flag_defaults_false() {
        let node: Node =
            serde_json::from_str(r#"{"id":1,"name":null,"op":{"type":"Primitive","faces":6}}"#)
                .unwrap();
        assert!(!node.debug);
    }
}
