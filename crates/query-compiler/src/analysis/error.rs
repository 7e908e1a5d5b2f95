use super::Rule;
use pest::error::Error as PestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Failed to segment text at line {line}, column {column}: {message}")]
    Segmentation {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Value is not valid UTF-8 text at byte {0}")]
    InvalidUtf8(usize),

    #[error("Analyzer cache lock poisoned")]
    CachePoisoned,
}

impl AnalyzerError {
    pub fn from_pest_error(err: PestError<Rule>) -> Self {
        use pest::error::LineColLocation;

        let (line, column) = match err.line_col {
            LineColLocation::Pos((l, c)) => (l, c),
            LineColLocation::Span((l, c), _) => (l, c),
        };

        AnalyzerError::Segmentation {
            message: format!("{}", err.variant),
            line,
            column,
        }
    }
}
