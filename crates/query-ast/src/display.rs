use crate::{
    arena::QueryAst,
    node::{Node, NodeId, NodeKind},
};
use std::fmt;

/// Single-quoted literal with `'` and `\` escaped.
fn write_quoted(f: &mut fmt::Formatter<'_>, literal: &[u8]) -> fmt::Result {
    f.write_str("'")?;
    for c in String::from_utf8_lossy(literal).chars() {
        if c == '\'' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{}", c)?;
    }
    f.write_str("'")
}

/// Printable view of the subtree rooted at one node.
pub struct SubtreeDisplay<'a> {
    ast: &'a QueryAst,
    id: NodeId,
}

impl<'a> SubtreeDisplay<'a> {
    pub(crate) fn new(ast: &'a QueryAst, id: NodeId) -> Self {
        SubtreeDisplay { ast, id }
    }

    fn child(&self, id: NodeId) -> SubtreeDisplay<'a> {
        SubtreeDisplay { ast: self.ast, id }
    }

    fn write_joined(&self, f: &mut fmt::Formatter<'_>, node: &Node, sep: &str) -> fmt::Result {
        for (i, child) in node.children.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{}", self.child(*child))?;
        }
        Ok(())
    }

    fn write_bound(&self, f: &mut fmt::Formatter<'_>, id: NodeId) -> fmt::Result {
        match self.ast.get(id) {
            Some(node) if node.kind == NodeKind::Unknown => f.write_str("*"),
            _ => write!(f, "{}", self.child(id)),
        }
    }
}

impl fmt::Display for SubtreeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(node) = self.ast.get(self.id) else {
            return write!(f, "<missing {}>", self.id);
        };

        if node.is_negated() {
            f.write_str("!")?;
        }

        match (node.kind, node.children.as_slice()) {
            (NodeKind::Union, _) => {
                f.write_str("(")?;
                self.write_joined(f, node, " || ")?;
                f.write_str(")")?;
            }
            (NodeKind::Intersection, _) => {
                f.write_str("(")?;
                self.write_joined(f, node, " && ")?;
                f.write_str(")")?;
            }
            (NodeKind::Equal, [left, right]) => {
                write!(f, "{} == {}", self.child(*left), self.child(*right))?;
            }
            (NodeKind::Like, [left, right]) => {
                write!(f, "{} ~= {}", self.child(*left), self.child(*right))?;
            }
            (NodeKind::Range, [min, max]) => {
                f.write_str(if node.min_inclusive() { "[" } else { "(" })?;
                self.write_bound(f, *min)?;
                f.write_str(", ")?;
                self.write_bound(f, *max)?;
                f.write_str(if node.max_inclusive() { "]" } else { ")" })?;
            }
            (NodeKind::Function, _) => {
                write!(f, "{}(", node.function_name().unwrap_or("<unbound>"))?;
                self.write_joined(f, node, ", ")?;
                f.write_str(")")?;
            }
            (NodeKind::Sequence, _) => {
                write_quoted(f, &node.literal)?;
            }
            (NodeKind::BoolTrue, _) => f.write_str("true")?,
            (NodeKind::Unknown, _) => f.write_str("*")?,
            // malformed arity, print generically so the problem is visible
            (kind, _) => {
                write!(f, "{}(", kind)?;
                self.write_joined(f, node, ", ")?;
                f.write_str(")")?;
            }
        }

        if node.boost != 1.0 {
            write!(f, "^{}", node.boost)?;
        }

        Ok(())
    }
}
