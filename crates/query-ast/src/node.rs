use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a node inside one [`QueryAst`](crate::QueryAst).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Node types produced by the query grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Union,
    Intersection,
    Equal,
    Like,
    Function,
    Sequence,
    Range,
    BoolTrue,
    /// An omitted operand, e.g. an open range bound.
    Unknown,
}

impl NodeKind {
    /// Field comparisons, `==` and `~=`.
    pub fn is_comparison(self) -> bool {
        matches!(self, NodeKind::Equal | NodeKind::Like)
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, NodeKind::Union | NodeKind::Intersection)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Union => write!(f, "union"),
            NodeKind::Intersection => write!(f, "intersection"),
            NodeKind::Equal => write!(f, "equal"),
            NodeKind::Like => write!(f, "like"),
            NodeKind::Function => write!(f, "function"),
            NodeKind::Sequence => write!(f, "sequence"),
            NodeKind::Range => write!(f, "range"),
            NodeKind::BoolTrue => write!(f, "true"),
            NodeKind::Unknown => write!(f, "unknown"),
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct NodeFlags: u8 {
        const NEGATED       = 0b001;
        const MIN_INCLUSIVE = 0b010;
        const MAX_INCLUSIVE = 0b100;
    }
}

fn default_boost() -> f32 {
    1.0
}

/// A single node of the parsed query.
///
/// `literal` is only meaningful for [`NodeKind::Sequence`], the inclusivity
/// flags only for [`NodeKind::Range`]. `function` names the evaluator(s) a
/// [`NodeKind::Function`] node is bound to; the compiler resolves the name
/// against its function registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default = "default_boost")]
    pub boost: f32,
    #[serde(default)]
    pub flags: NodeFlags,
    #[serde(default)]
    pub literal: Vec<u8>,
    #[serde(default)]
    pub function: Option<String>,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Node {
            id,
            kind,
            children: Vec::new(),
            boost: default_boost(),
            flags: NodeFlags::empty(),
            literal: Vec::new(),
            function: None,
        }
    }

    pub fn is_negated(&self) -> bool {
        self.flags.contains(NodeFlags::NEGATED)
    }

    pub fn min_inclusive(&self) -> bool {
        self.flags.contains(NodeFlags::MIN_INCLUSIVE)
    }

    pub fn max_inclusive(&self) -> bool {
        self.flags.contains(NodeFlags::MAX_INCLUSIVE)
    }

    pub fn function_name(&self) -> Option<&str> {
        self.function.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(42).to_string(), "@42");
    }

    #[test]
    fn test_node_flags() {
        let mut node = Node::new(NodeId(0), NodeKind::Range);
        assert!(!node.min_inclusive());

        node.flags |= NodeFlags::MIN_INCLUSIVE;
        assert!(node.min_inclusive());
        assert!(!node.max_inclusive());
        assert!(!node.is_negated());
    }

    #[test]
    fn test_node_kind_classification() {
        assert!(NodeKind::Equal.is_comparison());
        assert!(NodeKind::Like.is_comparison());
        assert!(!NodeKind::Function.is_comparison());
        assert!(NodeKind::Union.is_boolean());
        assert!(!NodeKind::BoolTrue.is_boolean());
    }
}
