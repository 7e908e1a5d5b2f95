use crate::filter::{Filter, FilterKind};
use serde::Serialize;
use std::fmt;

fn write_boost(f: &mut fmt::Formatter<'_>, boost: f32) -> fmt::Result {
    if boost != 1.0 {
        write!(f, "^{}", boost)?;
    }
    Ok(())
}

/// Matches every document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllFilter {
    pub boost: f32,
}

impl Default for AllFilter {
    fn default() -> Self {
        AllFilter { boost: 1.0 }
    }
}

impl fmt::Display for AllFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ALL")?;
        write_boost(f, self.boost)
    }
}

/// Shared surface of [`AndFilter`] and [`OrFilter`].
pub trait BooleanFilter: FilterKind {
    fn boost(&self) -> f32;
    fn set_boost(&mut self, boost: f32);
    fn children(&self) -> &[Filter];
    fn push(&mut self, filter: Filter);
}

macro_rules! boolean_filter {
    ($name:ident, $op:literal) => {
        #[derive(Debug, Clone, PartialEq, Serialize)]
        pub struct $name {
            pub boost: f32,
            pub children: Vec<Filter>,
        }

        impl Default for $name {
            fn default() -> Self {
                $name {
                    boost: 1.0,
                    children: Vec::new(),
                }
            }
        }

        impl $name {
            pub fn new(children: Vec<Filter>) -> Self {
                $name {
                    boost: 1.0,
                    children,
                }
            }

            pub fn with_boost(mut self, boost: f32) -> Self {
                self.boost = boost;
                self
            }

            pub fn len(&self) -> usize {
                self.children.len()
            }

            pub fn is_empty(&self) -> bool {
                self.children.is_empty()
            }
        }

        impl BooleanFilter for $name {
            fn boost(&self) -> f32 {
                self.boost
            }

            fn set_boost(&mut self, boost: f32) {
                self.boost = boost;
            }

            fn children(&self) -> &[Filter] {
                &self.children
            }

            fn push(&mut self, filter: Filter) {
                self.children.push(filter);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let children = self
                    .children
                    .iter()
                    .map(Filter::to_string)
                    .collect::<Vec<_>>();
                write!(f, "({})", children.join($op))?;
                write_boost(f, self.boost)
            }
        }
    };
}

boolean_filter!(AndFilter, " AND ");
boolean_filter!(OrFilter, " OR ");

/// Complement of the wrapped filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotFilter {
    pub filter: Box<Filter>,
}

impl Default for NotFilter {
    fn default() -> Self {
        NotFilter {
            filter: Box::new(Filter::Empty),
        }
    }
}

impl NotFilter {
    pub fn new(filter: Filter) -> Self {
        NotFilter {
            filter: Box::new(filter),
        }
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn set(&mut self, filter: Filter) {
        *self.filter = filter;
    }
}

impl fmt::Display for NotFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NOT {}", self.filter)
    }
}
