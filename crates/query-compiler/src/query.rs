use search_filter::{Filter, Order};
use serde::Serialize;

/// Result of compiling one parsed query.
///
/// Check [`CompiledQuery::error`] before executing: a failed compilation
/// carries an error filter and neither order nor limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub filter: Filter,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl CompiledQuery {
    pub fn failed(message: impl Into<String>) -> Self {
        CompiledQuery {
            filter: Filter::error(message),
            order: None,
            limit: None,
        }
    }

    /// Pass a parser failure through unchanged.
    pub fn syntax_error(offset: usize, message: &str) -> Self {
        Self::failed(format!("syntax error at offset {}: {}", offset, message))
    }

    pub fn error(&self) -> Option<&str> {
        self.filter.error_message()
    }

    pub fn is_ok(&self) -> bool {
        !self.filter.is_error()
    }
}
