use crate::{
    analysis::AnalyzerCache,
    argument::{Argument, ArgumentRole, PredicateThunk, ValueSource, ValueThunk},
    branch::{BranchBuilders, BuildContext, RangeArgs},
    context::ExecContext,
    error::{Blame, CompileFailure, FunctionError, Outcome},
    functions::{BooleanFn, FunctionRegistry, OrderFn, SequenceFn},
    query::CompiledQuery,
    settings::CompilerSettings,
};
use query_ast::{Node, NodeId, NodeKind, ParsedQuery};
use search_filter::{
    AllFilter, AndFilter, BooleanFilter, FilterKind, NotFilter, OrFilter, Order, ProxyFilter,
};
use tracing::{debug, info, trace, warn};

fn slot<K: FilterKind>(target: &mut ProxyFilter) -> Outcome<&mut K> {
    target.materialize::<K>().map_err(|err| {
        debug!(error = %err, "Filter slot rejected");
        CompileFailure::Unlocated
    })
}

fn reported(evaluator: &str, err: FunctionError) -> CompileFailure {
    warn!(evaluator, error = %err, "Evaluator failed");
    err.into_failure()
}

/// Owns everything needed to compile queries repeatedly.
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    functions: FunctionRegistry,
    branches: BranchBuilders,
    settings: CompilerSettings,
}

impl QueryCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = functions;
        self
    }

    pub fn with_branches(mut self, branches: BranchBuilders) -> Self {
        self.branches = branches;
        self
    }

    pub fn with_settings(mut self, settings: CompilerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    pub fn compile(&self, query: &ParsedQuery, ctx: &ExecContext<'_>) -> CompiledQuery {
        self.builder(query, ctx).build()
    }

    /// Compile and splice the result into `root`, see [`TreeBuilder::build_linked`].
    pub fn compile_linked(
        &self,
        query: &ParsedQuery,
        ctx: &ExecContext<'_>,
        root: &mut ProxyFilter,
    ) -> CompiledQuery {
        self.builder(query, ctx).build_linked(root)
    }

    fn builder<'a>(&'a self, query: &'a ParsedQuery, ctx: &'a ExecContext<'a>) -> TreeBuilder<'a> {
        TreeBuilder::new(query, ctx, &self.functions, &self.branches, &self.settings)
    }
}

/// Compile `query` once with the given collaborators.
pub fn compile(
    query: &ParsedQuery,
    ctx: &ExecContext<'_>,
    functions: &FunctionRegistry,
    branches: &BranchBuilders,
    settings: &CompilerSettings,
) -> CompiledQuery {
    TreeBuilder::new(query, ctx, functions, branches, settings).build()
}

/// Single-use compiler over one parsed query.
///
/// Failures travel up as [`CompileFailure`]: a callee that cannot name the
/// offending node returns `Unlocated` and its caller substitutes the node it
/// was working on, so the reported id is always the deepest one known.
pub struct TreeBuilder<'a> {
    query: &'a ParsedQuery,
    ctx: &'a ExecContext<'a>,
    functions: &'a FunctionRegistry,
    branches: &'a BranchBuilders,
    settings: &'a CompilerSettings,
    analyzers: &'a AnalyzerCache,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(
        query: &'a ParsedQuery,
        ctx: &'a ExecContext<'a>,
        functions: &'a FunctionRegistry,
        branches: &'a BranchBuilders,
        settings: &'a CompilerSettings,
    ) -> Self {
        TreeBuilder {
            query,
            ctx,
            functions,
            branches,
            settings,
            analyzers: AnalyzerCache::global(),
        }
    }

    /// Use a private analyzer cache instead of the process-wide one.
    pub fn with_analyzers(mut self, analyzers: &'a AnalyzerCache) -> Self {
        self.analyzers = analyzers;
        self
    }

    pub fn build(&self) -> CompiledQuery {
        if let Some(syntax) = &self.query.syntax_error {
            debug!(offset = syntax.offset, "Passing through syntax error");
            return CompiledQuery::syntax_error(syntax.offset, &syntax.message);
        }
        // recursion below relies on children preceding their parents
        if let Err(err) = self.query.ast.validate() {
            info!(error = %err, "Rejecting malformed query tree");
            return CompiledQuery::failed(format!("invalid query tree: {}", err));
        }

        // the parsed root is the only branch of an implicit union
        let root = self.query.filter;
        let mut filter = OrFilter::default();
        if let Err(failure) = self.build_branch(&mut filter, root) {
            return self.failed("filter", failure);
        }

        let order = if self.query.order.is_empty() {
            None
        } else {
            match self.compile_order() {
                Ok(order) => Some(order),
                Err(failure) => return self.failed("order", failure),
            }
        };

        info!(
            nodes = self.query.ast.len(),
            sort_terms = self.query.order.len(),
            limit = ?self.query.limit,
            "Compiled query"
        );
        CompiledQuery {
            filter: filter.into(),
            order,
            limit: self.query.limit,
        }
    }

    /// Like [`TreeBuilder::build`], and also append the compiled filter as a
    /// branch of `root`, which becomes a disjunction if it is still empty.
    /// `root` is left untouched when compilation fails.
    pub fn build_linked(&self, root: &mut ProxyFilter) -> CompiledQuery {
        let compiled = self.build();
        if !compiled.is_ok() {
            return compiled;
        }

        match root.materialize::<OrFilter>() {
            Ok(branches) => {
                branches.push(compiled.filter.clone());
                compiled
            }
            Err(err) => {
                warn!(error = %err, "Cannot link compiled filter");
                CompiledQuery::failed(format!("link error: {}", err))
            }
        }
    }

    fn failed(&self, stage: &str, failure: CompileFailure) -> CompiledQuery {
        let node = failure.node().unwrap_or(self.query.filter);
        info!(stage, node = %node, "Query compilation failed");
        CompiledQuery::failed(format!(
            "{} conversion error, node: {}\n{}",
            stage,
            node,
            self.query.ast.display(node)
        ))
    }

    fn node(&self, id: NodeId) -> Outcome<&'a Node> {
        self.query.ast.get(id).ok_or_else(|| {
            debug!(node = %id, "Node missing from query");
            CompileFailure::At(id)
        })
    }

    fn function_name(node: &'a Node) -> Option<&'a str> {
        if node.kind != NodeKind::Function {
            return None;
        }
        node.function_name()
    }

    fn sequence_fn(&self, node: &'a Node) -> Option<(&'a str, &'a SequenceFn)> {
        let name = Self::function_name(node)?;
        self.functions.sequence(name).map(|eval| (name, eval))
    }

    fn boolean_fn(&self, node: &'a Node) -> Option<(&'a str, &'a BooleanFn)> {
        let name = Self::function_name(node)?;
        self.functions.boolean(name).map(|eval| (name, eval))
    }

    fn order_fn(&self, node: &'a Node) -> Option<(&'a str, &'a OrderFn)> {
        let name = Self::function_name(node)?;
        self.functions.order(name).map(|eval| (name, eval))
    }

    fn build_context(&self) -> BuildContext<'a> {
        BuildContext {
            exec: self.ctx,
            analyzers: self.analyzers,
            settings: self.settings,
        }
    }

    /// Whether `node` may appear as a branch of a union or intersection.
    fn is_branch(&self, node: &'a Node) -> bool {
        if node.kind.is_boolean() || node.kind.is_comparison() {
            return true;
        }
        node.kind == NodeKind::Function && self.boolean_fn(node).is_some()
    }

    /// Compile child `id` into a new branch of `target`. Nodes that are not
    /// boolean-shaped are skipped.
    fn build_branch<B: BooleanFilter>(&self, target: &mut B, id: NodeId) -> Outcome {
        let node = self.node(id)?;
        if !self.is_branch(node) {
            trace!(node = %id, kind = %node.kind, "Skipping non-boolean branch");
            return Ok(());
        }

        trace!(node = %id, kind = %node.kind, "Building branch");
        let mut branch = ProxyFilter::new();
        self.build_into(&mut branch, node).blame(id)?;
        target.push(branch.into_filter());
        Ok(())
    }

    fn build_boolean<B: BooleanFilter>(&self, target: &mut B, node: &'a Node) -> Outcome {
        target.set_boost(node.boost);
        for &child in &node.children {
            self.build_branch(target, child)?;
        }
        Ok(())
    }

    /// Build `node` into `target`, wrapped in a negation if flagged.
    fn build_into(&self, target: &mut ProxyFilter, node: &'a Node) -> Outcome {
        if !node.is_negated() {
            return self.build_positive(target, node);
        }

        let mut inner = ProxyFilter::new();
        self.build_positive(&mut inner, node)?;
        slot::<NotFilter>(target)?.set(inner.into_filter());
        Ok(())
    }

    fn build_positive(&self, target: &mut ProxyFilter, node: &'a Node) -> Outcome {
        match node.kind {
            NodeKind::Union => self.build_boolean(slot::<OrFilter>(target)?, node),
            NodeKind::Intersection => self.build_boolean(slot::<AndFilter>(target)?, node),
            NodeKind::BoolTrue => {
                slot::<AllFilter>(target)?.boost = node.boost;
                Ok(())
            }
            _ => self.init_comparison(target, node),
        }
    }

    fn init_comparison(&self, target: &mut ProxyFilter, node: &'a Node) -> Outcome {
        match node.kind {
            NodeKind::Function => {
                let (name, eval) = self.boolean_fn(node).ok_or(CompileFailure::Unlocated)?;
                let args = self.compile_args(node)?;
                eval(target, self.ctx, &args).map_err(|err| reported(name, err))
            }
            NodeKind::Equal => self.build_equal(target, node),
            NodeKind::Like => self.build_like(target, node),
            _ => Err(CompileFailure::Unlocated),
        }
    }

    fn operands(node: &'a Node) -> Outcome<(NodeId, NodeId)> {
        match *node.children.as_slice() {
            [left, right] => Ok((left, right)),
            _ => {
                debug!(node = %node.id, operands = node.children.len(), "Expected two operands");
                Err(CompileFailure::Unlocated)
            }
        }
    }

    fn build_equal(&self, target: &mut ProxyFilter, node: &'a Node) -> Outcome {
        let (left, right) = Self::operands(node)?;
        let field = self.eval_field(left)?;

        let range = self.node(right)?;
        if range.kind != NodeKind::Range {
            debug!(node = %right, kind = %range.kind, "Expected a range");
            return Err(CompileFailure::At(right));
        }
        let (min, max) = Self::operands(range).blame(right)?;

        let args = RangeArgs {
            min: self.compile_bound(min)?,
            max: self.compile_bound(max)?,
        };
        self.branches
            .build_range(
                &self.build_context(),
                target,
                &field,
                (range.min_inclusive(), range.max_inclusive()),
                &args,
            )
            .map_err(|err| reported("range", err))
    }

    fn build_like(&self, target: &mut ProxyFilter, node: &'a Node) -> Outcome {
        let (left, right) = Self::operands(node)?;
        let field = self.eval_field(left)?;
        let value = self.compile_arg(right)?;

        self.branches
            .build_similar(&self.build_context(), target, &field, &value)
            .map_err(|err| reported("similar", err))
    }

    fn eval_sequence(&self, out: &mut Vec<u8>, id: NodeId) -> Outcome {
        let node = self.node(id)?;
        match node.kind {
            NodeKind::Sequence => {
                out.extend_from_slice(&node.literal);
                Ok(())
            }
            NodeKind::Function => {
                let (name, eval) = self.sequence_fn(node).ok_or(CompileFailure::Unlocated)?;
                let args = self.compile_args(node)?;
                eval(out, self.ctx, &args).map_err(|err| reported(name, err))
            }
            _ => Err(CompileFailure::Unlocated),
        }
    }

    /// Evaluate `id` as a non-empty UTF-8 field name.
    fn eval_field(&self, id: NodeId) -> Outcome<String> {
        let mut buf = Vec::new();
        self.eval_sequence(&mut buf, id).blame(id)?;

        match String::from_utf8(buf) {
            Ok(field) if !field.is_empty() => Ok(field),
            _ => {
                debug!(node = %id, "Field name is empty or not UTF-8");
                Err(CompileFailure::At(id))
            }
        }
    }

    fn compile_bound(&self, id: NodeId) -> Outcome<Option<Argument<'_>>> {
        if self.node(id)?.kind == NodeKind::Unknown {
            return Ok(None);
        }
        self.compile_arg(id).map(Some)
    }

    fn compile_args(&self, node: &'a Node) -> Outcome<Vec<Argument<'_>>> {
        node.children
            .iter()
            .map(|&child| self.compile_arg(child))
            .collect()
    }

    fn compile_arg(&self, id: NodeId) -> Outcome<Argument<'_>> {
        let node = self.node(id)?;
        match node.kind {
            NodeKind::Sequence => Ok(Argument::literal(id, node.literal.clone())),
            NodeKind::Union
            | NodeKind::Intersection
            | NodeKind::BoolTrue
            | NodeKind::Equal
            | NodeKind::Like => Ok(Argument::predicate(id, Vec::new(), move |target, _| {
                self.build_into(target, node)
            })),
            NodeKind::Function => self.compile_function_arg(node),
            NodeKind::Range | NodeKind::Unknown => {
                debug!(node = %id, kind = %node.kind, "Node cannot be an argument");
                Err(CompileFailure::At(id))
            }
        }
    }

    fn compile_function_arg(&self, node: &'a Node) -> Outcome<Argument<'_>> {
        let args = self.compile_args(node)?;

        let value = self
            .sequence_fn(node)
            .map(|(name, eval)| ValueSource::Evaluated(self.value_thunk(name, eval)));
        let predicate = self
            .boolean_fn(node)
            .map(|(name, eval)| self.predicate_thunk(name, eval, node.is_negated()));

        let role = match (value, predicate) {
            (Some(value), Some(predicate)) => ArgumentRole::Both(value, predicate),
            (Some(value), None) => ArgumentRole::Value(value),
            (None, Some(predicate)) => ArgumentRole::Predicate(predicate),
            (None, None) => {
                debug!(
                    node = %node.id,
                    function = node.function_name().unwrap_or_default(),
                    "Function has no usable evaluator"
                );
                return Err(CompileFailure::At(node.id));
            }
        };
        Ok(Argument::with_role(node.id, args, role))
    }

    fn value_thunk(&self, name: &'a str, eval: &'a SequenceFn) -> ValueThunk<'_> {
        Box::new(move |out: &mut Vec<u8>, args: &[Argument<'_>]| {
            eval(out, self.ctx, args).map_err(|err| reported(name, err))
        })
    }

    /// A negated predicate wraps whatever the evaluator builds, rather than
    /// the call itself.
    fn predicate_thunk(
        &self,
        name: &'a str,
        eval: &'a BooleanFn,
        negated: bool,
    ) -> PredicateThunk<'_> {
        Box::new(move |target: &mut ProxyFilter, args: &[Argument<'_>]| {
            if !negated {
                return eval(target, self.ctx, args).map_err(|err| reported(name, err));
            }

            let mut inner = ProxyFilter::new();
            eval(&mut inner, self.ctx, args).map_err(|err| reported(name, err))?;
            slot::<NotFilter>(target)?.set(inner.into_filter());
            Ok(())
        })
    }

    fn compile_order(&self) -> Outcome<Order> {
        let mut order = Order::new();

        for term in &self.query.order {
            let node = self.node(term.node)?;
            let Some((name, eval)) = self.order_fn(node) else {
                debug!(node = %term.node, "Sort term has no order evaluator");
                return Err(CompileFailure::At(term.node));
            };

            let args = self.compile_args(node).blame(term.node)?;
            eval(&mut order, self.ctx, term.ascending, &args)
                .map_err(|err| reported(name, err))
                .blame(term.node)?;
        }

        Ok(order)
    }
}
