use crate::{
    argument::Argument,
    context::ExecContext,
    error::{FunctionError, FunctionResult},
    functions::{expect_args, text_arg},
};
use search_filter::{Order, Scorer};

fn relevance(
    name: &str,
    order: &mut Order,
    ascending: bool,
    args: &[Argument<'_>],
) -> FunctionResult {
    expect_args(name, args, 0)?;
    order.add(Scorer::new(name), ascending);
    Ok(())
}

/// Sort by BM25 relevance
pub fn eval_bm25(
    order: &mut Order,
    _ctx: &ExecContext<'_>,
    ascending: bool,
    args: &[Argument<'_>],
) -> FunctionResult {
    relevance("bm25", order, ascending, args)
}

/// Sort by TF-IDF relevance
pub fn eval_tfidf(
    order: &mut Order,
    _ctx: &ExecContext<'_>,
    ascending: bool,
    args: &[Argument<'_>],
) -> FunctionResult {
    relevance("tfidf", order, ascending, args)
}

/// Sort by the stored value of a field, `field(name)`.
pub fn eval_field(
    order: &mut Order,
    _ctx: &ExecContext<'_>,
    ascending: bool,
    args: &[Argument<'_>],
) -> FunctionResult {
    let args = expect_args("field", args, 1)?;
    let name = text_arg("field", &args[0])?;
    if name.is_empty() {
        return Err(FunctionError::invalid_args("field", "Field name is empty"));
    }

    order.add(Scorer::new("field").with_options(name), ascending);
    Ok(())
}
