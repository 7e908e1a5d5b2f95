#![allow(dead_code)]

use query_ast::ParsedQuery;
use query_compiler::{CompiledQuery, ExecContext, QueryCompiler};
use search_filter::Filter;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Compile with built-in functions, default builders and settings.
pub fn compile(query: &ParsedQuery) -> CompiledQuery {
    init_tracing();
    QueryCompiler::new().compile(query, &ExecContext::default())
}

/// Branches of the implicit top-level union.
pub fn branches(compiled: &CompiledQuery) -> &[Filter] {
    match &compiled.filter {
        Filter::Or(root) => &root.children,
        other => panic!("expected the top-level union, got {}", other),
    }
}

/// The single branch the query compiled to.
pub fn single(compiled: &CompiledQuery) -> &Filter {
    let branches = branches(compiled);
    assert_eq!(branches.len(), 1, "expected one branch, got {:?}", branches);
    &branches[0]
}
