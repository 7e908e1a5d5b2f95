use crate::{
    analysis::{TextAnalyzer, error::AnalyzerError},
    context::Locale,
    settings::AnalyzerSettings,
};
use lazy_static::lazy_static;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use tracing::debug;

lazy_static! {
    static ref GLOBAL_ANALYZERS: AnalyzerCache = AnalyzerCache::new();
}

/// Analyzers shared across compilations, one per locale and configuration.
#[derive(Debug, Default)]
pub struct AnalyzerCache {
    analyzers: RwLock<HashMap<Locale, HashMap<AnalyzerSettings, Arc<TextAnalyzer>>>>,
}

impl AnalyzerCache {
    pub fn new() -> Self {
        AnalyzerCache {
            analyzers: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide cache.
    pub fn global() -> &'static AnalyzerCache {
        &GLOBAL_ANALYZERS
    }

    /// Hits borrow the key; only a miss clones locale and settings.
    pub fn get_or_create(
        &self,
        locale: &Locale,
        settings: &AnalyzerSettings,
    ) -> Result<Arc<TextAnalyzer>, AnalyzerError> {
        if let Some(analyzer) = self
            .analyzers
            .read()
            .map_err(|_| AnalyzerError::CachePoisoned)?
            .get(locale)
            .and_then(|by_settings| by_settings.get(settings))
        {
            return Ok(Arc::clone(analyzer));
        }

        let mut analyzers = self
            .analyzers
            .write()
            .map_err(|_| AnalyzerError::CachePoisoned)?;
        let by_settings = analyzers.entry(locale.clone()).or_default();
        if let Some(analyzer) = by_settings.get(settings) {
            return Ok(Arc::clone(analyzer));
        }

        debug!(locale = %locale, "Creating text analyzer");
        let analyzer = Arc::new(TextAnalyzer::new(locale.clone(), settings.clone()));
        by_settings.insert(settings.clone(), Arc::clone(&analyzer));
        Ok(analyzer)
    }

    pub fn len(&self) -> usize {
        self.analyzers
            .read()
            .map(|analyzers| analyzers.values().map(HashMap::len).sum())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_shares_analyzer() {
        let cache = AnalyzerCache::new();
        let settings = AnalyzerSettings::default();

        let first = cache.get_or_create(&Locale::default(), &settings).unwrap();
        let second = cache.get_or_create(&Locale::default(), &settings).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_locales_and_settings() {
        let cache = AnalyzerCache::new();
        let settings = AnalyzerSettings::default();
        let keep_case = AnalyzerSettings {
            lowercase: false,
            ..AnalyzerSettings::default()
        };

        cache.get_or_create(&Locale::new("en"), &settings).unwrap();
        cache.get_or_create(&Locale::new("de"), &settings).unwrap();
        let raw = cache.get_or_create(&Locale::new("en"), &keep_case).unwrap();

        assert_eq!(cache.len(), 3);
        assert_eq!(raw.locale().name(), "en");
    }

    #[test]
    fn test_lookup_by_borrowed_settings() {
        let cache = AnalyzerCache::new();
        let locale = Locale::new("en");
        let stopwords = AnalyzerSettings {
            stopwords: vec!["the".to_string(), "a".to_string()],
            ..AnalyzerSettings::default()
        };

        let first = cache.get_or_create(&locale, &stopwords).unwrap();
        cache
            .get_or_create(&locale, &AnalyzerSettings::default())
            .unwrap();
        // an equal but separately built configuration hits the same entry
        let again = cache.get_or_create(&locale, &stopwords.clone()).unwrap();

        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(cache.len(), 2);
    }
}
