use crate::{arena::QueryAst, error::AstError, node::NodeId};
use serde::{Deserialize, Serialize};

/// One `SORT` term: the node to turn into a scorer and its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortTerm {
    pub node: NodeId,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

fn default_ascending() -> bool {
    true
}

/// Parser failure reported before compilation starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxError {
    pub offset: usize,
    pub message: String,
}

/// Everything the parser hands over to the filter compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub ast: QueryAst,
    pub filter: NodeId,
    #[serde(default)]
    pub order: Vec<SortTerm>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub syntax_error: Option<SyntaxError>,
}

impl ParsedQuery {
    pub fn new(ast: QueryAst, filter: NodeId) -> Self {
        ParsedQuery {
            ast,
            filter,
            order: Vec::new(),
            limit: None,
            syntax_error: None,
        }
    }

    pub fn with_order(mut self, node: NodeId, ascending: bool) -> Self {
        self.order.push(SortTerm { node, ascending });
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_syntax_error(mut self, offset: usize, message: impl Into<String>) -> Self {
        self.syntax_error = Some(SyntaxError {
            offset,
            message: message.into(),
        });
        self
    }

    /// Load a captured query document and check its node table.
    pub fn from_json(input: &str) -> Result<Self, AstError> {
        let query: ParsedQuery = serde_json::from_str(input)?;
        query.ast.validate()?;
        if query.ast.get(query.filter).is_none() {
            return Err(AstError::MissingRoot(query.filter));
        }
        if let Some(term) = query.order.iter().find(|t| query.ast.get(t.node).is_none()) {
            return Err(AstError::MissingRoot(term.node));
        }
        Ok(query)
    }

    pub fn to_json(&self) -> Result<String, AstError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
