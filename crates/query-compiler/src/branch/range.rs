use crate::{
    argument::Argument,
    branch::{BuildContext, RangeArgs},
    error::FunctionResult,
};
use search_filter::{BoundType, ProxyFilter, RangeBound, RangeFilter, TermFilter};

fn bound(arg: Option<&Argument<'_>>, kind: BoundType) -> FunctionResult<Option<RangeBound>> {
    Ok(match arg {
        Some(arg) => Some(RangeBound::new(arg.to_bytes()?, kind)),
        None => None,
    })
}

fn fill_range(
    ctx: &BuildContext<'_>,
    target: &mut ProxyFilter,
    field: &str,
    args: &RangeArgs<'_>,
    min_kind: BoundType,
    max_kind: BoundType,
) -> FunctionResult {
    // evaluate both bounds before touching the target
    let min = bound(args.min.as_ref(), min_kind)?;
    let max = bound(args.max.as_ref(), max_kind)?;

    let range = target.materialize::<RangeFilter>()?;
    range.field = field.to_string();
    range.min = min;
    range.max = max;
    range.scored_terms_limit = ctx.settings.scored_terms_limit;
    Ok(())
}

/// `field == (min, max)`
pub fn range_exclusive_exclusive(
    ctx: &BuildContext<'_>,
    target: &mut ProxyFilter,
    field: &str,
    args: &RangeArgs<'_>,
) -> FunctionResult {
    fill_range(
        ctx,
        target,
        field,
        args,
        BoundType::Exclusive,
        BoundType::Exclusive,
    )
}

/// `field == (min, max]`
pub fn range_exclusive_inclusive(
    ctx: &BuildContext<'_>,
    target: &mut ProxyFilter,
    field: &str,
    args: &RangeArgs<'_>,
) -> FunctionResult {
    fill_range(
        ctx,
        target,
        field,
        args,
        BoundType::Exclusive,
        BoundType::Inclusive,
    )
}

/// `field == [min, max)`
pub fn range_inclusive_exclusive(
    ctx: &BuildContext<'_>,
    target: &mut ProxyFilter,
    field: &str,
    args: &RangeArgs<'_>,
) -> FunctionResult {
    fill_range(
        ctx,
        target,
        field,
        args,
        BoundType::Inclusive,
        BoundType::Exclusive,
    )
}

/// `field == [min, max]`.
///
/// A closed range that pins a single value, or has no bounds at all, is
/// built as a [`TermFilter`] (the latter with an empty value).
pub fn range_inclusive_inclusive(
    ctx: &BuildContext<'_>,
    target: &mut ProxyFilter,
    field: &str,
    args: &RangeArgs<'_>,
) -> FunctionResult {
    let min = args.min.as_ref().map(Argument::to_bytes).transpose()?;
    let max = args.max.as_ref().map(Argument::to_bytes).transpose()?;

    let value = match (min, max) {
        (None, None) => Vec::new(),
        (Some(min), Some(max)) if min == max => min,
        (min, max) => {
            let range = target.materialize::<RangeFilter>()?;
            range.field = field.to_string();
            range.min = min.map(|value| RangeBound::new(value, BoundType::Inclusive));
            range.max = max.map(|value| RangeBound::new(value, BoundType::Inclusive));
            range.scored_terms_limit = ctx.settings.scored_terms_limit;
            return Ok(());
        }
    };

    *target.materialize::<TermFilter>()? = TermFilter::new(field, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::AnalyzerCache, context::ExecContext, error::CompileFailure,
        settings::CompilerSettings,
    };
    use query_ast::NodeId;
    use search_filter::Filter;

    fn args<'a>(min: Option<&str>, max: Option<&str>) -> RangeArgs<'a> {
        RangeArgs {
            min: min.map(|v| Argument::literal(NodeId(1), v)),
            max: max.map(|v| Argument::literal(NodeId(2), v)),
        }
    }

    fn build(
        builder: fn(&BuildContext<'_>, &mut ProxyFilter, &str, &RangeArgs<'_>) -> FunctionResult,
        args: &RangeArgs<'_>,
    ) -> Filter {
        let exec = ExecContext::default();
        let analyzers = AnalyzerCache::new();
        let settings = CompilerSettings {
            scored_terms_limit: 16,
            ..CompilerSettings::default()
        };
        let ctx = BuildContext {
            exec: &exec,
            analyzers: &analyzers,
            settings: &settings,
        };

        let mut target = ProxyFilter::new();
        builder(&ctx, &mut target, "a", args).unwrap();
        target.into_filter()
    }

    #[test]
    fn test_half_open_range() {
        let filter = build(range_inclusive_exclusive, &args(Some("3"), Some("7")));
        let expected = RangeFilter::new("a")
            .with_min("3", BoundType::Inclusive)
            .with_max("7", BoundType::Exclusive)
            .with_scored_terms_limit(16);
        assert_eq!(filter, Filter::from(expected));
    }

    #[test]
    fn test_omitted_bound_left_open() {
        let filter = build(range_exclusive_inclusive, &args(None, Some("7")));
        assert_eq!(filter.to_string(), "a IN (*, '7']");

        let filter = build(range_exclusive_exclusive, &args(Some("3"), None));
        assert_eq!(filter.to_string(), "a IN ('3', *)");
    }

    #[test]
    fn test_single_point_collapses_to_term() {
        let filter = build(range_inclusive_inclusive, &args(Some("5"), Some("5")));
        assert_eq!(filter, Filter::Term(TermFilter::new("a", "5")));
    }

    #[test]
    fn test_unbounded_collapses_to_empty_term() {
        let filter = build(range_inclusive_inclusive, &args(None, None));
        assert_eq!(filter, Filter::Term(TermFilter::new("a", "")));
    }

    #[test]
    fn test_closed_range_stays_range() {
        let filter = build(range_inclusive_inclusive, &args(Some("3"), Some("7")));
        assert_eq!(filter.to_string(), "a IN ['3', '7']");

        // one open side is still a range
        let filter = build(range_inclusive_inclusive, &args(Some("3"), None));
        assert!(matches!(filter, Filter::Range(ref range) if range.max.is_none()));
    }

    #[test]
    fn test_exclusive_single_point_is_not_collapsed() {
        let filter = build(range_exclusive_exclusive, &args(Some("5"), Some("5")));
        assert!(matches!(filter, Filter::Range(_)));
    }

    #[test]
    fn test_unevaluable_bound_fails_untouched() {
        let exec = ExecContext::default();
        let analyzers = AnalyzerCache::new();
        let settings = CompilerSettings::default();
        let ctx = BuildContext {
            exec: &exec,
            analyzers: &analyzers,
            settings: &settings,
        };
        let args = RangeArgs {
            min: Some(Argument::literal(NodeId(1), "1")),
            max: Some(Argument::predicate(NodeId(6), Vec::new(), |_, _| Ok(()))),
        };

        let mut target = ProxyFilter::new();
        let err = range_inclusive_exclusive(&ctx, &mut target, "a", &args).unwrap_err();
        assert_eq!(err.into_failure(), CompileFailure::At(NodeId(6)));
        assert!(!target.is_materialized());
    }
}
