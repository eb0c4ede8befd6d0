use crate::config::PipelineConfig;
use crate::core::assembler::ExampleAssembler;
use crate::core::matcher::LexicalMatcher;
use crate::core::normalizer::Normalizer;
use crate::core::types::{MatchResult, RankedWord};
use crate::coverage::{self, CoverageReport};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::store::{DictionaryStore, MemoryStore};
use std::path::Path;

// The vocabulary engine is composed of the dictionary store and the pipeline
// stages. It holds no mutable state: every run reads the store and returns a
// fresh artifact.
pub struct VocabEngine<S: DictionaryStore = MemoryStore> {
    store: S,
    config: PipelineConfig,
    normalizer: Normalizer,
}

impl<S: DictionaryStore> VocabEngine<S> {
    pub fn new(store: S, config: PipelineConfig) -> Self {
        let normalizer = Normalizer::new(config.affixes.clone());
        Self {
            store,
            config,
            normalizer,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Matches every ranked word against the whole dictionary.
    pub fn match_words(&self, words: &[RankedWord]) -> Vec<MatchResult> {
        LexicalMatcher::new(self.normalizer.clone(), self.store.entries()).match_all(words)
    }

    /// Builds the dataset from previously computed matches.
    pub fn assemble(&self, matches: &[MatchResult]) -> Dataset {
        ExampleAssembler::new(&self.store, &self.config).assemble(matches)
    }

    pub fn coverage(&self, matches: &[MatchResult]) -> CoverageReport {
        coverage::analyze(&self.store, matches, &self.config)
    }

    /// Runs the full offline pipeline: 1. match, 2. assemble.
    pub fn build(&self, words: &[RankedWord]) -> (Vec<MatchResult>, Dataset) {
        let matches = self.match_words(words);
        let dataset = self.assemble(&matches);
        (matches, dataset)
    }
}

impl VocabEngine<MemoryStore> {
    /// Loads a JSON dictionary export and validates the config.
    pub fn from_file(dictionary_path: &Path, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let store = MemoryStore::load(dictionary_path)?;
        Ok(Self::new(store, config))
    }
}
