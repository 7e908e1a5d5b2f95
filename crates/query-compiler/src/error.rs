use crate::analysis::error::AnalyzerError;
use query_ast::NodeId;
use search_filter::FilterError;
use thiserror::Error;

/// Where compilation of a subtree went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CompileFailure {
    /// The enclosing call failed for a reason not tied to one of its
    /// children. Its caller substitutes its own node id.
    #[error("compilation failed in the enclosing node")]
    Unlocated,

    #[error("compilation failed at node {0}")]
    At(NodeId),
}

impl CompileFailure {
    /// Attribute an unlocated failure to `owner`, keep a located one.
    pub fn resolve(self, owner: NodeId) -> Self {
        match self {
            CompileFailure::Unlocated => CompileFailure::At(owner),
            located => located,
        }
    }

    pub fn node(self) -> Option<NodeId> {
        match self {
            CompileFailure::Unlocated => None,
            CompileFailure::At(id) => Some(id),
        }
    }
}

pub type Outcome<T = ()> = std::result::Result<T, CompileFailure>;

pub(crate) trait Blame<T> {
    fn blame(self, owner: NodeId) -> Outcome<T>;
}

impl<T> Blame<T> for Outcome<T> {
    fn blame(self, owner: NodeId) -> Outcome<T> {
        self.map_err(|failure| failure.resolve(owner))
    }
}

/// Error reported by a registered evaluator or branch builder.
#[derive(Debug, Error)]
pub enum FunctionError {
    #[error("Invalid function arguments for {function}: {message}")]
    InvalidFunctionArgs { function: String, message: String },

    /// An argument failed to compile or evaluate; carries its location.
    #[error("Argument failed: {0}")]
    Argument(#[from] CompileFailure),

    #[error("Filter construction failed: {0}")]
    Filter(#[from] FilterError),

    #[error("Text analysis failed: {0}")]
    Analysis(#[from] AnalyzerError),
}

impl FunctionError {
    pub fn invalid_args(function: &str, message: impl Into<String>) -> Self {
        FunctionError::InvalidFunctionArgs {
            function: function.to_string(),
            message: message.into(),
        }
    }

    /// Location to report: nested argument failures keep theirs, anything
    /// else is the calling node's fault.
    pub fn into_failure(self) -> CompileFailure {
        match self {
            FunctionError::Argument(failure) => failure,
            _ => CompileFailure::Unlocated,
        }
    }
}

pub type FunctionResult<T = ()> = std::result::Result<T, FunctionError>;
