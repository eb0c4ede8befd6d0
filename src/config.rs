// File: src/config.rs
use crate::error::{Result, VocabError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Notation affixes stripped by the normalizer, in the order they are tried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffixRules {
    pub suffixes: Vec<String>,
    pub prefixes: Vec<String>,
}

impl Default for AffixRules {
    fn default() -> Self {
        Self {
            suffixes: vec!["-neg".to_string()],
            prefixes: ["nms-", "ix-", "pcl-", "mime-"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Knobs for one pipeline run. Every field has a default, so an empty TOML
/// file is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// How many of the top-ranked words feed the assembler and sampler.
    pub top_k: usize,
    /// Video categories starting with this are finished examples; the numeric
    /// remainder is the example number.
    pub finished_example_prefix: String,
    pub low_confidence_threshold: f64,
    pub max_sample_attempts: usize,
    pub video_extensions: Vec<String>,
    /// `{word}` is replaced by the source word.
    pub placeholder_translation: String,
    pub affixes: AffixRules,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: 350,
            finished_example_prefix: "finalexample".to_string(),
            low_confidence_threshold: 0.7,
            max_sample_attempts: 10,
            video_extensions: ["mp4", "webm", "mov", "m4v"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            placeholder_translation: "Example for {word}".to_string(),
            affixes: AffixRules::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(VocabError::InvalidConfig("top_k must be at least 1".into()));
        }
        if self.max_sample_attempts == 0 {
            return Err(VocabError::InvalidConfig(
                "max_sample_attempts must be at least 1".into(),
            ));
        }
        if self.finished_example_prefix.is_empty() {
            return Err(VocabError::InvalidConfig(
                "finished_example_prefix must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn placeholder_for(&self, word: &str) -> String {
        self.placeholder_translation.replace("{word}", word)
    }
}
