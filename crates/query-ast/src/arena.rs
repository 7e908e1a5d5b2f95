use crate::{
    display::SubtreeDisplay,
    error::AstError,
    node::{Node, NodeFlags, NodeId, NodeKind},
};
use serde::{Deserialize, Serialize};

/// Append-only node table produced by the query parser.
///
/// Nodes are addressed by [`NodeId`], which is always the node's index in the
/// table. Children must be allocated before their parents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryAst {
    nodes: Vec<Node>,
}

impl QueryAst {
    pub fn new() -> Self {
        QueryAst { nodes: Vec::new() }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Render the subtree rooted at `id` for diagnostics.
    pub fn display(&self, id: NodeId) -> SubtreeDisplay<'_> {
        SubtreeDisplay::new(self, id)
    }

    pub fn sequence(&mut self, literal: impl AsRef<[u8]>) -> NodeId {
        let id = self.alloc(NodeKind::Sequence, Vec::new());
        self.nodes[id.index()].literal = literal.as_ref().to_vec();
        id
    }

    pub fn unknown(&mut self) -> NodeId {
        self.alloc(NodeKind::Unknown, Vec::new())
    }

    pub fn bool_true(&mut self) -> NodeId {
        self.alloc(NodeKind::BoolTrue, Vec::new())
    }

    pub fn range(
        &mut self,
        min: NodeId,
        max: NodeId,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> NodeId {
        let id = self.alloc(NodeKind::Range, vec![min, max]);
        let flags = &mut self.nodes[id.index()].flags;
        flags.set(NodeFlags::MIN_INCLUSIVE, min_inclusive);
        flags.set(NodeFlags::MAX_INCLUSIVE, max_inclusive);
        id
    }

    pub fn equal(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.alloc(NodeKind::Equal, vec![left, right])
    }

    pub fn like(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.alloc(NodeKind::Like, vec![left, right])
    }

    /// `field == value`, expressed the way the grammar does: an equality
    /// against a closed single-point range.
    pub fn field_eq(&mut self, field: &str, value: impl AsRef<[u8]>) -> NodeId {
        let field = self.sequence(field);
        let min = self.sequence(value.as_ref());
        let max = self.sequence(value.as_ref());
        let range = self.range(min, max, true, true);
        self.equal(field, range)
    }

    /// `field ~= text`
    pub fn field_like(&mut self, field: &str, text: &str) -> NodeId {
        let field = self.sequence(field);
        let text = self.sequence(text);
        self.like(field, text)
    }

    pub fn function(
        &mut self,
        name: impl Into<String>,
        args: impl IntoIterator<Item = NodeId>,
    ) -> NodeId {
        let id = self.alloc(NodeKind::Function, args.into_iter().collect());
        self.nodes[id.index()].function = Some(name.into());
        id
    }

    pub fn union(&mut self, children: impl IntoIterator<Item = NodeId>) -> NodeId {
        self.alloc(NodeKind::Union, children.into_iter().collect())
    }

    pub fn intersection(&mut self, children: impl IntoIterator<Item = NodeId>) -> NodeId {
        self.alloc(NodeKind::Intersection, children.into_iter().collect())
    }

    /// Toggle the negation flag of `id`.
    pub fn negate(&mut self, id: NodeId) -> NodeId {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.flags.toggle(NodeFlags::NEGATED);
        }
        id
    }

    pub fn set_boost(&mut self, id: NodeId, boost: f32) -> NodeId {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.boost = boost;
        }
        id
    }

    /// Check the arena invariants after deserialization.
    pub fn validate(&self) -> Result<(), AstError> {
        for (index, node) in self.nodes.iter().enumerate() {
            if node.id.index() != index {
                return Err(AstError::MisplacedNode { id: node.id, index });
            }
            // children precede their parent, which also rules out cycles
            if let Some(child) = node.children.iter().find(|c| c.index() >= index) {
                return Err(AstError::DanglingChild {
                    parent: node.id,
                    child: *child,
                });
            }
        }
        Ok(())
    }

    fn alloc(&mut self, kind: NodeKind, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let mut node = Node::new(id, kind);
        node.children = children;
        self.nodes.push(node);
        id
    }
}
