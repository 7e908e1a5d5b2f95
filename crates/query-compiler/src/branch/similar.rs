use crate::{argument::Argument, branch::BuildContext, error::FunctionResult};
use search_filter::{PhraseFilter, ProxyFilter};
use tracing::trace;

/// `field ~= value`: tokenize the value and match the tokens as a phrase.
pub fn similar(
    ctx: &BuildContext<'_>,
    target: &mut ProxyFilter,
    field: &str,
    value: &Argument<'_>,
) -> FunctionResult {
    let text = value.to_bytes()?;
    let analyzer = ctx.analyzer()?;
    let tokens = analyzer.tokenize_bytes(&text)?;
    trace!(field, tokens = tokens.len(), "Building phrase");

    let phrase = target.materialize::<PhraseFilter>()?;
    phrase.field = field.to_string();
    // positions of dropped stop words stay as gaps between terms
    let mut next: Option<u32> = None;
    for token in tokens {
        let offset = next.map_or(0, |expected| token.position.saturating_sub(expected));
        phrase.push_term_at(token.term.as_bytes(), offset);
        next = Some(token.position + 1);
    }
    Ok(())
}
