use crate::{
    boolean::{AllFilter, AndFilter, NotFilter, OrFilter},
    leaf::{PhraseFilter, RangeFilter, TermFilter},
};
use serde::Serialize;
use std::fmt;

/// Discriminant of a [`Filter`], used to report proxy misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterTag {
    Empty,
    All,
    Term,
    Range,
    Phrase,
    And,
    Or,
    Not,
    Error,
}

impl fmt::Display for FilterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterTag::Empty => "empty",
            FilterTag::All => "all",
            FilterTag::Term => "term",
            FilterTag::Range => "range",
            FilterTag::Phrase => "phrase",
            FilterTag::And => "and",
            FilterTag::Or => "or",
            FilterTag::Not => "not",
            FilterTag::Error => "error",
        };
        f.write_str(name)
    }
}

/// Sentinel returned in place of a filter tree when compilation fails.
/// It is never executable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorFilter {
    pub message: String,
}

impl ErrorFilter {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorFilter {
            message: message.into(),
        }
    }
}

/// A compiled filter tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    /// Matches nothing. What an unused proxy slot turns into.
    Empty,
    All(AllFilter),
    Term(TermFilter),
    Range(RangeFilter),
    Phrase(PhraseFilter),
    And(AndFilter),
    Or(OrFilter),
    Not(NotFilter),
    Error(ErrorFilter),
}

impl Filter {
    pub fn tag(&self) -> FilterTag {
        match self {
            Filter::Empty => FilterTag::Empty,
            Filter::All(_) => FilterTag::All,
            Filter::Term(_) => FilterTag::Term,
            Filter::Range(_) => FilterTag::Range,
            Filter::Phrase(_) => FilterTag::Phrase,
            Filter::And(_) => FilterTag::And,
            Filter::Or(_) => FilterTag::Or,
            Filter::Not(_) => FilterTag::Not,
            Filter::Error(_) => FilterTag::Error,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Filter::Error(ErrorFilter::new(message))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Filter::Error(_))
    }

    /// Message stored in the error sentinel, if this is one.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Filter::Error(err) => Some(&err.message),
            _ => None,
        }
    }

    pub fn not(inner: Filter) -> Self {
        Filter::Not(NotFilter::new(inner))
    }
}

/// A concrete filter type a [`ProxyFilter`](crate::ProxyFilter) can be
/// materialized as.
pub trait FilterKind: Default + Into<Filter> {
    const TAG: FilterTag;

    /// Borrow `Self` back out of a filter of the matching variant.
    fn from_filter_mut(filter: &mut Filter) -> Option<&mut Self>;
}

macro_rules! filter_kind {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Filter {
            fn from(value: $ty) -> Self {
                Filter::$variant(value)
            }
        }

        impl FilterKind for $ty {
            const TAG: FilterTag = FilterTag::$variant;

            fn from_filter_mut(filter: &mut Filter) -> Option<&mut Self> {
                match filter {
                    Filter::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

filter_kind!(AllFilter, All);
filter_kind!(TermFilter, Term);
filter_kind!(RangeFilter, Range);
filter_kind!(PhraseFilter, Phrase);
filter_kind!(AndFilter, And);
filter_kind!(OrFilter, Or);
filter_kind!(NotFilter, Not);
filter_kind!(ErrorFilter, Error);

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Empty => write!(f, "EMPTY"),
            Filter::All(all) => write!(f, "{}", all),
            Filter::Term(term) => write!(f, "{}", term),
            Filter::Range(range) => write!(f, "{}", range),
            Filter::Phrase(phrase) => write!(f, "{}", phrase),
            Filter::And(and) => write!(f, "{}", and),
            Filter::Or(or) => write!(f, "{}", or),
            Filter::Not(not) => write!(f, "{}", not),
            Filter::Error(err) => write!(f, "ERROR({})", err.message),
        }
    }
}
