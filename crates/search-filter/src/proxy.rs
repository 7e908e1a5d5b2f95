use crate::{
    error::FilterError,
    filter::{Filter, FilterKind, FilterTag},
};

/// Filter slot whose concrete kind is chosen by its first writer.
///
/// Once materialized the kind is fixed: asking for the same kind again hands
/// back the existing instance, asking for another kind is an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProxyFilter {
    inner: Option<Filter>,
}

impl ProxyFilter {
    pub fn new() -> Self {
        ProxyFilter { inner: None }
    }

    pub fn is_materialized(&self) -> bool {
        self.inner.is_some()
    }

    pub fn tag(&self) -> Option<FilterTag> {
        self.inner.as_ref().map(Filter::tag)
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.inner.as_ref()
    }

    pub fn materialize<K: FilterKind>(&mut self) -> Result<&mut K, FilterError> {
        let filter = self.inner.get_or_insert_with(|| K::default().into());
        let held = filter.tag();
        K::from_filter_mut(filter).ok_or(FilterError::KindMismatch {
            held,
            requested: K::TAG,
        })
    }

    /// The concrete filter, or [`Filter::Empty`] if nothing was written.
    pub fn into_filter(self) -> Filter {
        self.inner.unwrap_or(Filter::Empty)
    }
}

impl From<ProxyFilter> for Filter {
    fn from(proxy: ProxyFilter) -> Self {
        proxy.into_filter()
    }
}
