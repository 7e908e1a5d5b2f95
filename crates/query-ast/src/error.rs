use crate::node::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AstError {
    #[error("Node {id} stored at index {index}")]
    MisplacedNode { id: NodeId, index: usize },

    #[error("Node {parent} references child {child} which does not precede it")]
    DanglingChild { parent: NodeId, child: NodeId },

    #[error("Query root {0} is not part of the node table")]
    MissingRoot(NodeId),

    #[error("Invalid query document: {0}")]
    Json(#[from] serde_json::Error),
}
