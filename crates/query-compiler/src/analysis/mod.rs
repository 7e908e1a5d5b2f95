use crate::{
    analysis::{error::AnalyzerError, token::Token},
    context::Locale,
    settings::AnalyzerSettings,
};
use pest::Parser;
use pest_derive::Parser;
use std::collections::HashSet;

pub mod cache;
pub mod error;
pub mod token;

pub use cache::AnalyzerCache;

#[derive(Parser)]
#[grammar = "analysis/text.pest"]
pub struct TextParser;

/// Splits `~=` values into the terms of a phrase.
#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    locale: Locale,
    settings: AnalyzerSettings,
    stopwords: HashSet<String>,
}

impl TextAnalyzer {
    pub fn new(locale: Locale, settings: AnalyzerSettings) -> Self {
        let stopwords = settings
            .stopwords
            .iter()
            .map(|word| {
                if settings.lowercase {
                    word.to_lowercase()
                } else {
                    word.clone()
                }
            })
            .collect();

        TextAnalyzer {
            locale,
            settings,
            stopwords,
        }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, AnalyzerError> {
        let pairs = TextParser::parse(Rule::text, input).map_err(AnalyzerError::from_pest_error)?;

        let mut tokens = Vec::new();
        let mut position = 0u32;

        for pair in pairs.flatten().filter(|p| p.as_rule() == Rule::word) {
            let span = pair.as_span();
            let term = if self.settings.lowercase {
                span.as_str().to_lowercase()
            } else {
                span.as_str().to_string()
            };

            // dropped terms still occupy a position
            let dropped = term.chars().count() > self.settings.max_token_len
                || self.stopwords.contains(&term);
            if !dropped {
                tokens.push(Token {
                    term,
                    position,
                    span: (span.start(), span.end()),
                });
            }
            position += 1;
        }

        Ok(tokens)
    }

    pub fn tokenize_bytes(&self, input: &[u8]) -> Result<Vec<Token>, AnalyzerError> {
        let text =
            std::str::from_utf8(input).map_err(|e| AnalyzerError::InvalidUtf8(e.valid_up_to()))?;
        self.tokenize(text)
    }
}
