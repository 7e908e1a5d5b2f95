use serde::Serialize;
use std::fmt;

/// Upper bound on the number of range terms that contribute to scoring.
pub const DEFAULT_SCORED_TERMS_LIMIT: usize = 1024;

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Exact match of a single term
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TermFilter {
    pub field: String,
    pub value: Vec<u8>,
}

impl TermFilter {
    pub fn new(field: impl Into<String>, value: impl AsRef<[u8]>) -> Self {
        TermFilter {
            field: field.into(),
            value: value.as_ref().to_vec(),
        }
    }
}

impl fmt::Display for TermFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} == '{}'", self.field, lossy(&self.value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundType {
    Inclusive,
    Exclusive,
}

impl BoundType {
    pub fn from_inclusive(inclusive: bool) -> Self {
        if inclusive {
            BoundType::Inclusive
        } else {
            BoundType::Exclusive
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeBound {
    pub value: Vec<u8>,
    pub kind: BoundType,
}

impl RangeBound {
    pub fn new(value: impl AsRef<[u8]>, kind: BoundType) -> Self {
        RangeBound {
            value: value.as_ref().to_vec(),
            kind,
        }
    }
}

/// Term range scan. An absent bound is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeFilter {
    pub field: String,
    pub min: Option<RangeBound>,
    pub max: Option<RangeBound>,
    pub scored_terms_limit: usize,
}

impl Default for RangeFilter {
    fn default() -> Self {
        RangeFilter {
            field: String::new(),
            min: None,
            max: None,
            scored_terms_limit: DEFAULT_SCORED_TERMS_LIMIT,
        }
    }
}

impl RangeFilter {
    pub fn new(field: impl Into<String>) -> Self {
        RangeFilter {
            field: field.into(),
            ..Default::default()
        }
    }

    pub fn with_min(mut self, value: impl AsRef<[u8]>, kind: BoundType) -> Self {
        self.min = Some(RangeBound::new(value, kind));
        self
    }

    pub fn with_max(mut self, value: impl AsRef<[u8]>, kind: BoundType) -> Self {
        self.max = Some(RangeBound::new(value, kind));
        self
    }

    pub fn with_scored_terms_limit(mut self, limit: usize) -> Self {
        self.scored_terms_limit = limit;
        self
    }

    /// A closed range over a single value, which should have been a term.
    pub fn is_single_point(&self) -> bool {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => {
                min.kind == BoundType::Inclusive
                    && max.kind == BoundType::Inclusive
                    && min.value == max.value
            }
            _ => false,
        }
    }
}

impl fmt::Display for RangeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} IN ", self.field)?;
        match &self.min {
            Some(RangeBound {
                value,
                kind: BoundType::Inclusive,
            }) => write!(f, "['{}'", lossy(value))?,
            Some(RangeBound { value, .. }) => write!(f, "('{}'", lossy(value))?,
            None => write!(f, "(*")?,
        }
        match &self.max {
            Some(RangeBound {
                value,
                kind: BoundType::Inclusive,
            }) => write!(f, ", '{}']", lossy(value)),
            Some(RangeBound { value, .. }) => write!(f, ", '{}')", lossy(value)),
            None => write!(f, ", *)"),
        }
    }
}

/// One position of a phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhrasePart {
    Term { value: Vec<u8> },
    Prefix { value: Vec<u8> },
    Wildcard { pattern: Vec<u8> },
    Range { min: Option<RangeBound>, max: Option<RangeBound> },
}

impl PhrasePart {
    pub fn term(value: impl AsRef<[u8]>) -> Self {
        PhrasePart::Term {
            value: value.as_ref().to_vec(),
        }
    }

    pub fn prefix(value: impl AsRef<[u8]>) -> Self {
        PhrasePart::Prefix {
            value: value.as_ref().to_vec(),
        }
    }
}

impl fmt::Display for PhrasePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhrasePart::Term { value } => write!(f, "'{}'", lossy(value)),
            PhrasePart::Prefix { value } => write!(f, "'{}'*", lossy(value)),
            PhrasePart::Wildcard { pattern } => write!(f, "wildcard('{}')", lossy(pattern)),
            PhrasePart::Range { min, max } => {
                let bound = |b: &Option<RangeBound>| {
                    b.as_ref()
                        .map(|b| format!("'{}'", lossy(&b.value)))
                        .unwrap_or_else(|| "*".to_string())
                };
                write!(f, "range({}, {})", bound(min), bound(max))
            }
        }
    }
}

/// One part of a phrase and how many positions separate it from the part
/// before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhrasePosition {
    pub offset: u32,
    pub part: PhrasePart,
}

/// Ordered sequence of parts that must occur at consecutive positions,
/// except where a part carries a non-zero offset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhraseFilter {
    pub field: String,
    pub parts: Vec<PhrasePosition>,
}

impl PhraseFilter {
    pub fn new(field: impl Into<String>) -> Self {
        PhraseFilter {
            field: field.into(),
            parts: Vec::new(),
        }
    }

    /// Append `part` right after the previous one.
    pub fn push(&mut self, part: PhrasePart) -> &mut Self {
        self.push_at(part, 0)
    }

    /// Append `part`, skipping `offset` positions after the previous one.
    pub fn push_at(&mut self, part: PhrasePart, offset: u32) -> &mut Self {
        self.parts.push(PhrasePosition { offset, part });
        self
    }

    pub fn push_term(&mut self, value: impl AsRef<[u8]>) -> &mut Self {
        self.push(PhrasePart::term(value))
    }

    pub fn push_term_at(&mut self, value: impl AsRef<[u8]>, offset: u32) -> &mut Self {
        self.push_at(PhrasePart::term(value), offset)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl fmt::Display for PhraseFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // a skipped position renders as `?`
        let mut parts = Vec::with_capacity(self.parts.len());
        for position in &self.parts {
            parts.extend((0..position.offset).map(|_| "?".to_string()));
            parts.push(position.part.to_string());
        }
        write!(f, "{} ~= [{}]", self.field, parts.join(", "))
    }
}
