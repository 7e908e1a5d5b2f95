//! Sort terms, limits, linking into a caller-owned root and captured queries

mod common;

use common::{branches, compile, init_tracing};
use query_ast::{ParsedQuery, QueryAst};
use query_compiler::{ExecContext, FunctionError, FunctionRegistry, QueryCompiler};
use search_filter::{Filter, Order, ProxyFilter, Scorer, TermFilter};

const CATALOG: &str = include_str!("fixtures/catalog.json");

#[test]
fn test_sort_terms_in_order() {
    // a == 1 SORT bm25() DESC, field('price') ASC LIMIT 20
    let mut ast = QueryAst::new();
    let eq = ast.field_eq("a", "1");
    let bm25 = ast.function("bm25", Vec::new());
    let price = ast.sequence("price");
    let field = ast.function("field", [price]);
    let query = ParsedQuery::new(ast, eq)
        .with_order(bm25, false)
        .with_order(field, true)
        .with_limit(20);

    let compiled = compile(&query);
    assert!(compiled.is_ok(), "{:?}", compiled.error());

    let mut expected = Order::new();
    expected
        .add(Scorer::new("bm25"), false)
        .add(Scorer::new("field").with_options("price"), true);
    assert_eq!(compiled.order, Some(expected));
    assert_eq!(compiled.limit, Some(20));
    assert_eq!(
        compiled.order.unwrap().to_string(),
        "bm25 DESC, field('price') ASC"
    );
}

#[test]
fn test_no_sort_terms() {
    let mut ast = QueryAst::new();
    let eq = ast.field_eq("a", "1");
    let compiled = compile(&ParsedQuery::new(ast, eq).with_limit(5));

    assert!(compiled.order.is_none());
    assert_eq!(compiled.limit, Some(5));
}

#[test]
fn test_order_names_are_case_insensitive() {
    let mut ast = QueryAst::new();
    let eq = ast.field_eq("a", "1");
    let tfidf = ast.function("TfIdf", Vec::new());
    let compiled = compile(&ParsedQuery::new(ast, eq).with_order(tfidf, true));

    assert_eq!(compiled.order.unwrap().to_string(), "tfidf ASC");
}

#[test]
fn test_custom_order_function() {
    let mut functions = FunctionRegistry::new();
    functions.register_order("distance", |order, _ctx, ascending, args| {
        let [lat, lon] = args else {
            return Err(FunctionError::invalid_args("distance", "Expected 2 arguments"));
        };
        let mut options = lat.to_bytes()?;
        options.push(b',');
        lon.value(&mut options)?;
        order.add(Scorer::new("distance").with_options(options), ascending);
        Ok(())
    });
    let compiler = QueryCompiler::new().with_functions(functions);

    let mut ast = QueryAst::new();
    let eq = ast.field_eq("kind", "cafe");
    let lat = ast.sequence("52.5");
    let lon = ast.sequence("13.4");
    let distance = ast.function("distance", [lat, lon]);
    let query = ParsedQuery::new(ast, eq).with_order(distance, true);

    init_tracing();
    let compiled = compiler.compile(&query, &ExecContext::default());
    assert_eq!(
        compiled.order.unwrap().to_string(),
        "distance('52.5,13.4') ASC"
    );
}

#[test]
fn test_linked_compilations_share_root() {
    init_tracing();
    let compiler = QueryCompiler::new();
    let ctx = ExecContext::default();
    let mut root = ProxyFilter::new();

    let mut first = QueryAst::new();
    let a = first.field_eq("a", "1");
    let first = ParsedQuery::new(first, a);

    let mut second = QueryAst::new();
    let b = second.field_eq("b", "2");
    let second = ParsedQuery::new(second, b);

    let compiled = compiler.compile_linked(&first, &ctx, &mut root);
    assert!(compiled.is_ok());
    let compiled = compiler.compile_linked(&second, &ctx, &mut root);
    assert!(compiled.is_ok());

    // each compilation still returns its own filter
    assert_eq!(branches(&compiled), &[Filter::Term(TermFilter::new("b", "2"))]);
    assert_eq!(
        root.into_filter().to_string(),
        "((a == '1') OR (b == '2'))"
    );
}

#[test]
fn test_link_into_foreign_root() {
    init_tracing();
    let mut root = ProxyFilter::new();
    *root.materialize::<TermFilter>().unwrap() = TermFilter::new("x", "y");

    let mut ast = QueryAst::new();
    let eq = ast.field_eq("a", "1");
    let query = ParsedQuery::new(ast, eq);

    let compiled = QueryCompiler::new().compile_linked(&query, &ExecContext::default(), &mut root);
    assert!(compiled.filter.is_error());
    assert!(compiled.error().unwrap().starts_with("link error: "));
    assert_eq!(root.into_filter(), Filter::Term(TermFilter::new("x", "y")));
}

#[test]
fn test_captured_query_document() {
    let query = ParsedQuery::from_json(CATALOG).unwrap();
    let compiled = compile(&query);
    assert!(compiled.is_ok(), "{:?}", compiled.error());

    assert_eq!(
        compiled.filter.to_string(),
        "(((color == 'red' OR title ~= ['rust', 'book']) AND price IN ['10', '20'))^1.5)"
    );
    assert_eq!(
        compiled.order.as_ref().map(Order::to_string).as_deref(),
        Some("bm25 DESC, field('price') ASC")
    );
    assert_eq!(compiled.limit, Some(25));

    // the document survives a serialization round trip unchanged
    let reloaded = ParsedQuery::from_json(&query.to_json().unwrap()).unwrap();
    assert_eq!(compile(&reloaded), compiled);
}
