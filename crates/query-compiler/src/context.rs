use std::{any::Any, fmt};

/// Name of the locale text is analyzed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    pub fn new(name: impl Into<String>) -> Self {
        Locale(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale("C".to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller state threaded unchanged through every evaluator call.
///
/// The cookie is opaque to the compiler; evaluators downcast it to whatever
/// they were registered against (current transaction, document, ...).
#[derive(Debug, Clone, Default)]
pub struct ExecContext<'a> {
    locale: Locale,
    cookie: Option<&'a (dyn Any + Send + Sync)>,
}

impl<'a> ExecContext<'a> {
    pub fn new(locale: Locale) -> Self {
        ExecContext {
            locale,
            cookie: None,
        }
    }

    pub fn with_cookie(mut self, cookie: &'a (dyn Any + Send + Sync)) -> Self {
        self.cookie = Some(cookie);
        self
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn cookie(&self) -> Option<&'a (dyn Any + Send + Sync)> {
        self.cookie
    }

    /// Typed view of the cookie, `None` if absent or of another type.
    pub fn cookie_as<T: Any>(&self) -> Option<&'a T> {
        self.cookie.and_then(|cookie| cookie.downcast_ref::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locale() {
        let ctx = ExecContext::default();
        assert_eq!(ctx.locale().name(), "C");
        assert!(ctx.cookie().is_none());
    }

    #[test]
    fn test_cookie_downcast() {
        let txn_id: u64 = 42;
        let ctx = ExecContext::new(Locale::new("en_US")).with_cookie(&txn_id);

        assert_eq!(ctx.cookie_as::<u64>(), Some(&42));
        assert_eq!(ctx.cookie_as::<String>(), None);
        assert_eq!(ctx.locale().to_string(), "en_US");
    }
}
