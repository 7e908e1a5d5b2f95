use crate::filter::FilterTag;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A proxy already holds a filter of another kind.
    #[error("Proxy filter already materialized as {held}, cannot become {requested}")]
    KindMismatch { held: FilterTag, requested: FilterTag },
}
