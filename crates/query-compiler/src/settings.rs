use search_filter::DEFAULT_SCORED_TERMS_LIMIT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to parse compiler settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid compiler setting '{name}': {message}")]
    Invalid { name: String, message: String },
}

/// How `~=` values are split into phrase terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    pub lowercase: bool,
    pub stopwords: Vec<String>,
    /// Tokens longer than this many characters are dropped.
    pub max_token_len: usize,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        AnalyzerSettings {
            lowercase: true,
            stopwords: Vec::new(),
            max_token_len: 255,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Cap on scored terms for every range filter the compiler builds.
    pub scored_terms_limit: usize,
    pub analyzer: AnalyzerSettings,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        CompilerSettings {
            scored_terms_limit: DEFAULT_SCORED_TERMS_LIMIT,
            analyzer: AnalyzerSettings::default(),
        }
    }
}

impl CompilerSettings {
    pub fn from_json(input: &str) -> Result<Self, SettingsError> {
        let settings: CompilerSettings = serde_json::from_str(input)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.scored_terms_limit == 0 {
            return Err(SettingsError::Invalid {
                name: "scored_terms_limit".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.analyzer.max_token_len == 0 {
            return Err(SettingsError::Invalid {
                name: "analyzer.max_token_len".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
