pub mod boolean;
pub mod error;
pub mod filter;
pub mod leaf;
pub mod order;
pub mod proxy;

pub use boolean::{AllFilter, AndFilter, BooleanFilter, NotFilter, OrFilter};
pub use error::FilterError;
pub use filter::{ErrorFilter, Filter, FilterKind, FilterTag};
pub use leaf::{
    BoundType, DEFAULT_SCORED_TERMS_LIMIT, PhraseFilter, PhrasePart, PhrasePosition, RangeBound,
    RangeFilter, TermFilter,
};
pub use order::{Order, Scorer, SortEntry};
pub use proxy::ProxyFilter;
