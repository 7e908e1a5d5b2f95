pub mod range;
pub mod similar;

use crate::{
    analysis::{AnalyzerCache, TextAnalyzer, error::AnalyzerError},
    argument::Argument,
    context::ExecContext,
    error::FunctionResult,
    settings::CompilerSettings,
};
use search_filter::ProxyFilter;
use std::{fmt, sync::Arc};

/// What a branch builder may consult besides its arguments.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub exec: &'a ExecContext<'a>,
    pub analyzers: &'a AnalyzerCache,
    pub settings: &'a CompilerSettings,
}

impl BuildContext<'_> {
    /// Analyzer for the current locale and configured analyzer settings.
    pub fn analyzer(&self) -> Result<Arc<TextAnalyzer>, AnalyzerError> {
        self.analyzers
            .get_or_create(self.exec.locale(), &self.settings.analyzer)
    }
}

/// Bounds of an `==` comparison. `None` is an omitted bound.
#[derive(Debug, Default)]
pub struct RangeArgs<'a> {
    pub min: Option<Argument<'a>>,
    pub max: Option<Argument<'a>>,
}

pub type RangeBuilderFn = Arc<
    dyn Fn(&BuildContext<'_>, &mut ProxyFilter, &str, &RangeArgs<'_>) -> FunctionResult
        + Send
        + Sync,
>;

pub type SimilarBuilderFn = Arc<
    dyn Fn(&BuildContext<'_>, &mut ProxyFilter, &str, &Argument<'_>) -> FunctionResult
        + Send
        + Sync,
>;

/// Strategy table for turning a field comparison into a leaf filter.
///
/// Unset entries fall back to the functions in [`range`] and [`similar`].
#[derive(Clone, Default)]
pub struct BranchBuilders {
    range_exclusive_exclusive: Option<RangeBuilderFn>,
    range_exclusive_inclusive: Option<RangeBuilderFn>,
    range_inclusive_exclusive: Option<RangeBuilderFn>,
    range_inclusive_inclusive: Option<RangeBuilderFn>,
    similar: Option<SimilarBuilderFn>,
}

macro_rules! range_override {
    ($setter:ident, $slot:ident) => {
        pub fn $setter<F>(mut self, builder: F) -> Self
        where
            F: Fn(&BuildContext<'_>, &mut ProxyFilter, &str, &RangeArgs<'_>) -> FunctionResult
                + Send
                + Sync
                + 'static,
        {
            self.$slot = Some(Arc::new(builder));
            self
        }
    };
}

impl BranchBuilders {
    pub fn new() -> Self {
        Self::default()
    }

    range_override!(with_range_exclusive_exclusive, range_exclusive_exclusive);
    range_override!(with_range_exclusive_inclusive, range_exclusive_inclusive);
    range_override!(with_range_inclusive_exclusive, range_inclusive_exclusive);
    range_override!(with_range_inclusive_inclusive, range_inclusive_inclusive);

    pub fn with_similar<F>(mut self, builder: F) -> Self
    where
        F: Fn(&BuildContext<'_>, &mut ProxyFilter, &str, &Argument<'_>) -> FunctionResult
            + Send
            + Sync
            + 'static,
    {
        self.similar = Some(Arc::new(builder));
        self
    }

    /// Build `field == [min, max]` with the builder registered for the given
    /// bound inclusivity.
    pub fn build_range(
        &self,
        ctx: &BuildContext<'_>,
        target: &mut ProxyFilter,
        field: &str,
        (min_inclusive, max_inclusive): (bool, bool),
        args: &RangeArgs<'_>,
    ) -> FunctionResult {
        let custom = match (min_inclusive, max_inclusive) {
            (false, false) => &self.range_exclusive_exclusive,
            (false, true) => &self.range_exclusive_inclusive,
            (true, false) => &self.range_inclusive_exclusive,
            (true, true) => &self.range_inclusive_inclusive,
        };
        if let Some(builder) = custom {
            return builder(ctx, target, field, args);
        }

        match (min_inclusive, max_inclusive) {
            (false, false) => range::range_exclusive_exclusive(ctx, target, field, args),
            (false, true) => range::range_exclusive_inclusive(ctx, target, field, args),
            (true, false) => range::range_inclusive_exclusive(ctx, target, field, args),
            (true, true) => range::range_inclusive_inclusive(ctx, target, field, args),
        }
    }

    /// Build `field ~= value`.
    pub fn build_similar(
        &self,
        ctx: &BuildContext<'_>,
        target: &mut ProxyFilter,
        field: &str,
        value: &Argument<'_>,
    ) -> FunctionResult {
        match &self.similar {
            Some(builder) => builder(ctx, target, field, value),
            None => similar::similar(ctx, target, field, value),
        }
    }
}

impl fmt::Debug for BranchBuilders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let overridden = |slot: bool| if slot { "custom" } else { "default" };
        f.debug_struct("BranchBuilders")
            .field(
                "range_exclusive_exclusive",
                &overridden(self.range_exclusive_exclusive.is_some()),
            )
            .field(
                "range_exclusive_inclusive",
                &overridden(self.range_exclusive_inclusive.is_some()),
            )
            .field(
                "range_inclusive_exclusive",
                &overridden(self.range_inclusive_exclusive.is_some()),
            )
            .field(
                "range_inclusive_inclusive",
                &overridden(self.range_inclusive_inclusive.is_some()),
            )
            .field("similar", &overridden(self.similar.is_some()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use query_ast::NodeId;
    use search_filter::{Filter, TermFilter};

    #[test]
    fn test_override_replaces_one_combination() {
        let builders = BranchBuilders::new().with_range_exclusive_exclusive(
            |_ctx, target, field, _args| {
                *target.materialize::<TermFilter>()? = TermFilter::new(field, "custom");
                Ok(())
            },
        );
        let exec = ExecContext::default();
        let analyzers = AnalyzerCache::new();
        let settings = CompilerSettings::default();
        let ctx = BuildContext {
            exec: &exec,
            analyzers: &analyzers,
            settings: &settings,
        };
        let args = RangeArgs {
            min: Some(Argument::literal(NodeId(0), "1")),
            max: None,
        };

        let mut custom = ProxyFilter::new();
        builders
            .build_range(&ctx, &mut custom, "a", (false, false), &args)
            .unwrap();
        assert_eq!(custom.into_filter(), Filter::Term(TermFilter::new("a", "custom")));

        let mut default = ProxyFilter::new();
        builders
            .build_range(&ctx, &mut default, "a", (true, false), &args)
            .unwrap();
        assert!(matches!(default.into_filter(), Filter::Range(_)));
    }

    #[test]
    fn test_debug_lists_overrides() {
        let builders = BranchBuilders::new().with_similar(|_, _, _, _| Ok(()));
        let debug = format!("{:?}", builders);
        assert!(debug.contains("similar: \"custom\""));
        assert!(debug.contains("range_inclusive_inclusive: \"default\""));
    }
}
