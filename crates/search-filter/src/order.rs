use serde::Serialize;
use std::fmt;

/// A named relevance or value scorer with its serialized options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scorer {
    pub name: String,
    pub options: Vec<u8>,
}

impl Scorer {
    pub fn new(name: impl Into<String>) -> Self {
        Scorer {
            name: name.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: impl AsRef<[u8]>) -> Self {
        self.options = options.as_ref().to_vec();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortEntry {
    pub scorer: Scorer,
    pub ascending: bool,
}

/// Sort specification, applied entry by entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Order {
    entries: Vec<SortEntry>,
}

impl Order {
    pub fn new() -> Self {
        Order {
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, scorer: Scorer, ascending: bool) -> &mut Self {
        self.entries.push(SortEntry { scorer, ascending });
        self
    }

    pub fn entries(&self) -> &[SortEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self
            .entries
            .iter()
            .map(|entry| {
                let direction = if entry.ascending { "ASC" } else { "DESC" };
                if entry.scorer.options.is_empty() {
                    format!("{} {}", entry.scorer.name, direction)
                } else {
                    format!(
                        "{}('{}') {}",
                        entry.scorer.name,
                        String::from_utf8_lossy(&entry.scorer.options),
                        direction
                    )
                }
            })
            .collect::<Vec<_>>();
        write!(f, "{}", entries.join(", "))
    }
}
