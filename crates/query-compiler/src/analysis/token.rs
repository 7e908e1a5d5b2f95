use std::fmt;

/// A term produced by the text analyzer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub term: String,
    /// Position in the token stream, counting dropped stop words.
    pub position: u32,
    /// Byte span in the analyzed text.
    pub span: (usize, usize),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.term, self.position)
    }
}
