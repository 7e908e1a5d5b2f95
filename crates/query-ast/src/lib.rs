pub mod arena;
pub mod display;
pub mod error;
pub mod node;
pub mod query;

pub use arena::QueryAst;
pub use error::AstError;
pub use node::{Node, NodeFlags, NodeId, NodeKind};
pub use query::{ParsedQuery, SortTerm, SyntaxError};
