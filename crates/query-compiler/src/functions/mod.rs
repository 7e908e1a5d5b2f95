pub mod boolean;
pub mod order;
pub mod string;

use crate::{
    argument::Argument,
    context::ExecContext,
    error::{FunctionError, FunctionResult},
};
use search_filter::{Order, ProxyFilter};
use std::{collections::HashMap, fmt, sync::Arc};

/// Appends a computed value to the buffer.
pub type SequenceFn =
    Arc<dyn Fn(&mut Vec<u8>, &ExecContext<'_>, &[Argument<'_>]) -> FunctionResult + Send + Sync>;

/// Builds a predicate into the filter slot.
pub type BooleanFn =
    Arc<dyn Fn(&mut ProxyFilter, &ExecContext<'_>, &[Argument<'_>]) -> FunctionResult + Send + Sync>;

/// Appends a sort entry; the flag is the requested direction (ascending).
pub type OrderFn = Arc<
    dyn Fn(&mut Order, &ExecContext<'_>, bool, &[Argument<'_>]) -> FunctionResult + Send + Sync,
>;

/// Evaluators a `Function` node can be bound to, looked up by name.
///
/// One name may be registered in several tables at once; such a node is then
/// usable both as a value and as a predicate.
#[derive(Clone)]
pub struct FunctionRegistry {
    sequence: HashMap<String, SequenceFn>,
    boolean: HashMap<String, BooleanFn>,
    order: HashMap<String, OrderFn>,
}

impl FunctionRegistry {
    /// Create a new function registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register_sequence("lower", string::eval_lower);
        registry.register_sequence("upper", string::eval_upper);
        registry.register_sequence("concat", string::eval_concat);

        registry.register_boolean("term", boolean::eval_term);
        registry.register_boolean("prefix", boolean::eval_prefix);
        registry.register_boolean("any", boolean::eval_any);
        registry.register_boolean("all", boolean::eval_all);

        registry.register_order("bm25", order::eval_bm25);
        registry.register_order("tfidf", order::eval_tfidf);
        registry.register_order("field", order::eval_field);

        registry
    }

    pub fn empty() -> Self {
        Self {
            sequence: HashMap::new(),
            boolean: HashMap::new(),
            order: HashMap::new(),
        }
    }

    pub fn register_sequence<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&mut Vec<u8>, &ExecContext<'_>, &[Argument<'_>]) -> FunctionResult
            + Send
            + Sync
            + 'static,
    {
        self.sequence.insert(name.to_lowercase(), Arc::new(func));
    }

    pub fn register_boolean<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&mut ProxyFilter, &ExecContext<'_>, &[Argument<'_>]) -> FunctionResult
            + Send
            + Sync
            + 'static,
    {
        self.boolean.insert(name.to_lowercase(), Arc::new(func));
    }

    pub fn register_order<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&mut Order, &ExecContext<'_>, bool, &[Argument<'_>]) -> FunctionResult
            + Send
            + Sync
            + 'static,
    {
        self.order.insert(name.to_lowercase(), Arc::new(func));
    }

    pub fn sequence(&self, name: &str) -> Option<&SequenceFn> {
        self.sequence.get(&name.to_lowercase())
    }

    pub fn boolean(&self, name: &str) -> Option<&BooleanFn> {
        self.boolean.get(&name.to_lowercase())
    }

    pub fn order(&self, name: &str) -> Option<&OrderFn> {
        self.order.get(&name.to_lowercase())
    }

    pub fn has_function(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.sequence.contains_key(&name)
            || self.boolean.contains_key(&name)
            || self.order.contains_key(&name)
    }

    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .sequence
            .keys()
            .chain(self.boolean.keys())
            .chain(self.order.keys())
            .map(|s| s.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.function_names())
            .finish()
    }
}

/// Exactly `expected` arguments or an argument error naming `function`.
pub(crate) fn expect_args<'r, 'a>(
    function: &str,
    args: &'r [Argument<'a>],
    expected: usize,
) -> Result<&'r [Argument<'a>], FunctionError> {
    if args.len() != expected {
        return Err(FunctionError::invalid_args(
            function,
            format!(
                "Expected {} argument{}, got {}",
                expected,
                if expected == 1 { "" } else { "s" },
                args.len()
            ),
        ));
    }
    Ok(args)
}

/// Evaluate `arg` as UTF-8 text.
pub(crate) fn text_arg(
    function: &str,
    arg: &Argument<'_>,
) -> Result<String, FunctionError> {
    String::from_utf8(arg.to_bytes()?).map_err(|_| {
        FunctionError::invalid_args(function, "Expected UTF-8 text")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use query_ast::NodeId;

    #[test]
    fn test_registry_has_builtin_functions() {
        let registry = FunctionRegistry::new();
        assert!(registry.sequence("lower").is_some());
        assert!(registry.sequence("concat").is_some());
        assert!(registry.boolean("term").is_some());
        assert!(registry.boolean("any").is_some());
        assert!(registry.order("bm25").is_some());
        assert!(registry.order("field").is_some());
    }

    #[test]
    fn test_registry_case_insensitive() {
        let registry = FunctionRegistry::new();
        assert!(registry.has_function("LOWER"));
        assert!(registry.has_function("Term"));
        assert!(registry.order("BM25").is_some());
    }

    #[test]
    fn test_tables_are_separate() {
        let registry = FunctionRegistry::new();
        assert!(registry.boolean("lower").is_none());
        assert!(registry.sequence("term").is_none());
        assert!(registry.order("term").is_none());
    }

    #[test]
    fn test_empty_registry() {
        let registry = FunctionRegistry::empty();
        assert!(registry.function_names().is_empty());
        assert!(!registry.has_function("lower"));
    }

    #[test]
    fn test_custom_function_registration() {
        let mut registry = FunctionRegistry::empty();
        registry.register_sequence("tag", |out, _ctx, args| {
            out.extend_from_slice(b"tag:");
            for arg in args {
                arg.value(out)?;
            }
            Ok(())
        });
        registry.register_boolean("tag", |_target, _ctx, _args| {
            Err(FunctionError::invalid_args("tag", "not a predicate here"))
        });

        assert_eq!(registry.function_names(), vec!["tag"]);

        let eval = registry.sequence("tag").unwrap();
        let mut out = Vec::new();
        eval(
            &mut out,
            &ExecContext::default(),
            &[Argument::literal(NodeId(0), "x")],
        )
        .unwrap();
        assert_eq!(out, b"tag:x");
    }

    #[test]
    fn test_expect_args_message() {
        let args = [Argument::literal(NodeId(0), "a")];
        let err = expect_args("field", &args, 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid function arguments for field: Expected 2 arguments, got 1"
        );
        assert!(expect_args("field", &args, 1).is_ok());
    }
}
