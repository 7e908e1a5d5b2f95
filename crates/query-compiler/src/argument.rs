use crate::error::{CompileFailure, Outcome};
use query_ast::NodeId;
use search_filter::ProxyFilter;
use std::fmt;

pub type ValueThunk<'a> = Box<dyn Fn(&mut Vec<u8>, &[Argument<'a>]) -> Outcome + 'a>;
pub type PredicateThunk<'a> = Box<dyn Fn(&mut ProxyFilter, &[Argument<'a>]) -> Outcome + 'a>;

/// How a consumer intends to use an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Append the argument's bytes to a buffer.
    Value,
    /// Build the argument into a filter slot.
    Predicate,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Value => write!(f, "value"),
            ParamKind::Predicate => write!(f, "predicate"),
        }
    }
}

pub enum ValueSource<'a> {
    Literal(Vec<u8>),
    /// Produced on demand by a sequence function.
    Evaluated(ValueThunk<'a>),
}

/// What an argument can be consumed as.
///
/// A function bound both as a sequence and as a boolean evaluator yields
/// `Both`; the consumer picks through [`Argument::resolve`].
pub enum ArgumentRole<'a> {
    Value(ValueSource<'a>),
    Predicate(PredicateThunk<'a>),
    Both(ValueSource<'a>, PredicateThunk<'a>),
}

/// One compiled function argument. Lives only as long as the compilation
/// that produced it.
pub struct Argument<'a> {
    node: NodeId,
    args: Vec<Argument<'a>>,
    role: ArgumentRole<'a>,
}

/// An argument narrowed to the role its consumer asked for.
pub enum Resolved<'r, 'a> {
    Value(&'r ValueSource<'a>),
    Predicate(&'r PredicateThunk<'a>),
}

impl<'a> Argument<'a> {
    pub fn literal(node: NodeId, bytes: impl Into<Vec<u8>>) -> Self {
        Argument {
            node,
            args: Vec::new(),
            role: ArgumentRole::Value(ValueSource::Literal(bytes.into())),
        }
    }

    pub fn predicate(
        node: NodeId,
        args: Vec<Argument<'a>>,
        build: impl Fn(&mut ProxyFilter, &[Argument<'a>]) -> Outcome + 'a,
    ) -> Self {
        Argument {
            node,
            args,
            role: ArgumentRole::Predicate(Box::new(build)),
        }
    }

    pub fn with_role(node: NodeId, args: Vec<Argument<'a>>, role: ArgumentRole<'a>) -> Self {
        Argument { node, args, role }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Nested arguments, for function-call arguments.
    pub fn args(&self) -> &[Argument<'a>] {
        &self.args
    }

    pub fn role(&self) -> &ArgumentRole<'a> {
        &self.role
    }

    pub fn accepts(&self, kind: ParamKind) -> bool {
        matches!(
            (&self.role, kind),
            (ArgumentRole::Value(_) | ArgumentRole::Both(..), ParamKind::Value)
                | (
                    ArgumentRole::Predicate(_) | ArgumentRole::Both(..),
                    ParamKind::Predicate
                )
        )
    }

    /// Literal bytes if the argument is a plain literal.
    pub fn as_literal(&self) -> Option<&[u8]> {
        match &self.role {
            ArgumentRole::Value(ValueSource::Literal(bytes))
            | ArgumentRole::Both(ValueSource::Literal(bytes), _) => Some(bytes),
            _ => None,
        }
    }

    pub fn resolve(&self, kind: ParamKind) -> Outcome<Resolved<'_, 'a>> {
        match (&self.role, kind) {
            (ArgumentRole::Value(value) | ArgumentRole::Both(value, _), ParamKind::Value) => {
                Ok(Resolved::Value(value))
            }
            (
                ArgumentRole::Predicate(build) | ArgumentRole::Both(_, build),
                ParamKind::Predicate,
            ) => Ok(Resolved::Predicate(build)),
            _ => Err(CompileFailure::At(self.node)),
        }
    }

    /// Append the argument's value to `out`.
    pub fn value(&self, out: &mut Vec<u8>) -> Outcome {
        match self.resolve(ParamKind::Value)? {
            Resolved::Value(ValueSource::Literal(bytes)) => {
                out.extend_from_slice(bytes);
                Ok(())
            }
            Resolved::Value(ValueSource::Evaluated(eval)) => eval(out, &self.args)
                .map_err(|failure| failure.resolve(self.node)),
            Resolved::Predicate(_) => Err(CompileFailure::At(self.node)),
        }
    }

    pub fn to_bytes(&self) -> Outcome<Vec<u8>> {
        let mut out = Vec::new();
        self.value(&mut out)?;
        Ok(out)
    }

    /// Build the argument into `target`.
    pub fn build(&self, target: &mut ProxyFilter) -> Outcome {
        match self.resolve(ParamKind::Predicate)? {
            Resolved::Predicate(build) => {
                build(target, &self.args).map_err(|failure| failure.resolve(self.node))
            }
            Resolved::Value(_) => Err(CompileFailure::At(self.node)),
        }
    }
}

impl fmt::Debug for Argument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match &self.role {
            ArgumentRole::Value(ValueSource::Literal(bytes)) => {
                format!("literal({:?})", String::from_utf8_lossy(bytes))
            }
            ArgumentRole::Value(ValueSource::Evaluated(_)) => "value".to_string(),
            ArgumentRole::Predicate(_) => "predicate".to_string(),
            ArgumentRole::Both(..) => "value|predicate".to_string(),
        };
        f.debug_struct("Argument")
            .field("node", &self.node)
            .field("role", &role)
            .field("args", &self.args)
            .finish()
    }
}
