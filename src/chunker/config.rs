use super::ChunkError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default maximum number of tokens per chunk
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 8;

/// Default number of context tokens required on each side of an entity
pub const DEFAULT_MIN_PADDING: usize = 2;

/// How the planner decides which tokens belong to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelevanceSource {
    /// Tokens intersecting any entity span
    #[default]
    Entities,
    /// Tokens containing an opening or closing delimiter
    Delimiters,
}

impl FromStr for RelevanceSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "entities" => Ok(Self::Entities),
            "delimiters" => Ok(Self::Delimiters),
            other => Err(format!(
                "unknown relevance source {:?} (expected \"entities\" or \"delimiters\")",
                other
            )),
        }
    }
}

/// Characters bracketing entity mentions in marked text, e.g. `[fever]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    pub open: char,
    pub close: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            open: '[',
            close: ']',
        }
    }
}

impl Delimiters {
    /// Marked form of an entity name: `fever` -> `[fever]`
    pub fn wrap(&self, name: &str) -> String {
        format!("{}{}{}", self.open, name, self.close)
    }

    /// Remove every delimiter from `text`
    pub fn strip(&self, text: &str) -> String {
        text.chars()
            .filter(|&c| c != self.open && c != self.close)
            .collect()
    }

    /// True if the token carries either delimiter
    pub fn marks(&self, token: &str) -> bool {
        token.contains(self.open) || token.contains(self.close)
    }

    /// Count of (opening, closing) delimiters in `text`
    pub fn count(&self, text: &str) -> (usize, usize) {
        text.chars().fold((0, 0), |(open, close), c| {
            if c == self.open {
                (open + 1, close)
            } else if c == self.close {
                (open, close + 1)
            } else {
                (open, close)
            }
        })
    }
}

/// Size and padding constraints for one chunking run
///
/// Missing fields fall back to their defaults when deserialized, so a JSON
/// file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Maximum tokens per chunk (at least 1)
    pub max_chunk_size: usize,
    /// Minimum context tokens before and after the entities of a chunk
    pub min_padding: usize,
    pub relevance: RelevanceSource,
    pub delimiters: Delimiters,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            min_padding: DEFAULT_MIN_PADDING,
            relevance: RelevanceSource::default(),
            delimiters: Delimiters::default(),
        }
    }
}

impl ChunkConfig {
    pub fn new(max_chunk_size: usize, min_padding: usize) -> Self {
        Self {
            max_chunk_size,
            min_padding,
            ..Self::default()
        }
    }

    /// Parse a JSON config and check it
    pub fn from_json(json: &str) -> Result<Self, ChunkError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ChunkError::InvalidConfig(format!("malformed JSON config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no plan could ever be built from
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.max_chunk_size < 1 {
            return Err(ChunkError::InvalidConfig(format!(
                "max_chunk_size must be at least 1, got {}",
                self.max_chunk_size
            )));
        }

        if self.delimiters.open == self.delimiters.close {
            return Err(ChunkError::InvalidConfig(format!(
                "opening and closing delimiters must differ, both are {:?}",
                self.delimiters.open
            )));
        }

        if self.delimiters.open.is_whitespace() || self.delimiters.close.is_whitespace() {
            return Err(ChunkError::InvalidConfig(
                "delimiters cannot be whitespace".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ChunkConfig::default();
        assert_eq!(config.max_chunk_size, DEFAULT_MAX_CHUNK_SIZE);
        assert_eq!(config.min_padding, DEFAULT_MIN_PADDING);
        assert_eq!(config.relevance, RelevanceSource::Entities);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let result = ChunkConfig::new(0, 1).validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("max_chunk_size"));
    }

    #[test]
    fn test_identical_delimiters_rejected() {
        let config = ChunkConfig {
            delimiters: Delimiters {
                open: '|',
                close: '|',
            },
            ..ChunkConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = ChunkConfig::from_json(r#"{"max_chunk_size": 4, "relevance": "delimiters"}"#)
            .unwrap();

        assert_eq!(config.max_chunk_size, 4);
        assert_eq!(config.min_padding, DEFAULT_MIN_PADDING);
        assert_eq!(config.relevance, RelevanceSource::Delimiters);
        assert_eq!(config.delimiters, Delimiters::default());
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(ChunkConfig::from_json("{not json").is_err());
        assert!(ChunkConfig::from_json(r#"{"max_chunk_size": 0}"#).is_err());
        assert!(ChunkConfig::from_json(r#"{"min_padding": -1}"#).is_err());
    }

    #[test]
    fn test_relevance_source_from_str() {
        assert_eq!("Entities".parse::<RelevanceSource>(), Ok(RelevanceSource::Entities));
        assert_eq!("delimiters".parse::<RelevanceSource>(), Ok(RelevanceSource::Delimiters));
        assert!("tokens".parse::<RelevanceSource>().is_err());
    }

    #[test]
    fn test_delimiter_helpers() {
        let d = Delimiters::default();
        assert_eq!(d.wrap("abdominal pain"), "[abdominal pain]");
        assert_eq!(d.strip("had [abdominal pain] and [fever]"), "had abdominal pain and fever");
        assert!(d.marks("pain]"));
        assert!(!d.marks("pain"));
        assert_eq!(d.count("[abdominal pain] and [fever"), (2, 1));
    }
}
