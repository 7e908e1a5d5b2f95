use crate::{
    argument::Argument,
    context::ExecContext,
    error::{FunctionError, FunctionResult},
    functions::{expect_args, text_arg},
};
use search_filter::{
    AndFilter, BooleanFilter, OrFilter, PhraseFilter, PhrasePart, ProxyFilter, TermFilter,
};

fn field_arg(function: &str, arg: &Argument<'_>) -> Result<String, FunctionError> {
    let field = text_arg(function, arg)?;
    if field.is_empty() {
        return Err(FunctionError::invalid_args(function, "Field name is empty"));
    }
    Ok(field)
}

/// `term(field, value)`: exact match.
pub fn eval_term(
    target: &mut ProxyFilter,
    _ctx: &ExecContext<'_>,
    args: &[Argument<'_>],
) -> FunctionResult {
    let args = expect_args("term", args, 2)?;
    let field = field_arg("term", &args[0])?;
    let value = args[1].to_bytes()?;

    *target.materialize::<TermFilter>()? = TermFilter::new(field, value);
    Ok(())
}

/// `prefix(field, value)`: single-position phrase matching terms that start
/// with `value`.
pub fn eval_prefix(
    target: &mut ProxyFilter,
    _ctx: &ExecContext<'_>,
    args: &[Argument<'_>],
) -> FunctionResult {
    let args = expect_args("prefix", args, 2)?;
    let field = field_arg("prefix", &args[0])?;
    let value = args[1].to_bytes()?;

    let phrase = target.materialize::<PhraseFilter>()?;
    phrase.field = field;
    phrase.parts.clear();
    phrase.push(PhrasePart::prefix(value));
    Ok(())
}

fn combine<B: BooleanFilter>(
    function: &str,
    target: &mut ProxyFilter,
    args: &[Argument<'_>],
) -> FunctionResult {
    if args.is_empty() {
        return Err(FunctionError::invalid_args(
            function,
            "Expected at least 1 argument, got 0",
        ));
    }

    let mut branches = Vec::with_capacity(args.len());
    for arg in args {
        let mut branch = ProxyFilter::new();
        arg.build(&mut branch)?;
        branches.push(branch.into_filter());
    }

    let combined = target.materialize::<B>()?;
    for branch in branches {
        combined.push(branch);
    }
    Ok(())
}

/// `any(pred, ...)`: disjunction of predicate arguments.
pub fn eval_any(
    target: &mut ProxyFilter,
    _ctx: &ExecContext<'_>,
    args: &[Argument<'_>],
) -> FunctionResult {
    combine::<OrFilter>("any", target, args)
}

/// `all(pred, ...)`: conjunction of predicate arguments.
pub fn eval_all(
    target: &mut ProxyFilter,
    _ctx: &ExecContext<'_>,
    args: &[Argument<'_>],
) -> FunctionResult {
    combine::<AndFilter>("all", target, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileFailure;
    use query_ast::NodeId;
    use search_filter::Filter;

    fn term_arg<'a>(node: u32, field: &'static str, value: &'static str) -> Argument<'a> {
        Argument::predicate(NodeId(node), Vec::new(), move |target, _| {
            *target
                .materialize::<TermFilter>()
                .map_err(|_| CompileFailure::Unlocated)? = TermFilter::new(field, value);
            Ok(())
        })
    }

    #[test]
    fn test_term() {
        let args = [
            Argument::literal(NodeId(0), "color"),
            Argument::literal(NodeId(1), "red"),
        ];
        let mut target = ProxyFilter::new();
        eval_term(&mut target, &ExecContext::default(), &args).unwrap();
        assert_eq!(target.into_filter(), Filter::Term(TermFilter::new("color", "red")));
    }

    #[test]
    fn test_term_empty_field() {
        let args = [
            Argument::literal(NodeId(0), ""),
            Argument::literal(NodeId(1), "red"),
        ];
        let mut target = ProxyFilter::new();
        let err = eval_term(&mut target, &ExecContext::default(), &args).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid function arguments for term: Field name is empty"
        );
        assert!(!target.is_materialized());
    }

    #[test]
    fn test_prefix() {
        let args = [
            Argument::literal(NodeId(0), "title"),
            Argument::literal(NodeId(1), "qui"),
        ];
        let mut target = ProxyFilter::new();
        eval_prefix(&mut target, &ExecContext::default(), &args).unwrap();

        let mut expected = PhraseFilter::new("title");
        expected.push(PhrasePart::prefix("qui"));
        assert_eq!(target.into_filter(), Filter::from(expected));
    }

    #[test]
    fn test_any_and_all() {
        let args = [term_arg(0, "a", "1"), term_arg(1, "b", "2")];
        let ctx = ExecContext::default();

        let mut any = ProxyFilter::new();
        eval_any(&mut any, &ctx, &args).unwrap();
        assert_eq!(any.into_filter().to_string(), "(a == '1' OR b == '2')");

        let mut all = ProxyFilter::new();
        eval_all(&mut all, &ctx, &args).unwrap();
        assert!(matches!(all.into_filter(), Filter::And(ref and) if and.len() == 2));
    }

    #[test]
    fn test_any_rejects_value_argument() {
        let args = [term_arg(0, "a", "1"), Argument::literal(NodeId(3), "b")];
        let mut target = ProxyFilter::new();
        let err = eval_any(&mut target, &ExecContext::default(), &args).unwrap_err();
        assert_eq!(err.into_failure(), CompileFailure::At(NodeId(3)));
        assert!(!target.is_materialized());
    }

    #[test]
    fn test_all_without_arguments() {
        let mut target = ProxyFilter::new();
        assert!(eval_all(&mut target, &ExecContext::default(), &[]).is_err());
    }
}
