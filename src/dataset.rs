// File: src/dataset.rs
use crate::core::types::{AssembledExample, EntryId, MatchResult, SignDefinition};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The generated artifact handed to the serving layer. Read-only once built;
/// any number of readers may share it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub top_k: usize,
    /// The top-K match results, in rank order.
    pub matches: Vec<MatchResult>,
    /// Grouped by rank, then by example number.
    pub examples: Vec<AssembledExample>,
    pub definitions: BTreeMap<EntryId, SignDefinition>,
}

impl Dataset {
    /// Answers "what does sign X mean": gloss, other meanings, definition video.
    pub fn definition(&self, entry_id: EntryId) -> Option<&SignDefinition> {
        self.definitions.get(&entry_id)
    }

    pub fn examples_for(&self, entry_id: EntryId) -> impl Iterator<Item = &AssembledExample> {
        self.examples.iter().filter(move |e| e.entry_id == entry_id)
    }

    pub fn summary(&self) -> DatasetSummary {
        let mut by_category = BTreeMap::new();
        for example in &self.examples {
            *by_category.entry(example.video_type.clone()).or_insert(0) += 1;
        }
        let unique_signs: BTreeSet<EntryId> = self.examples.iter().map(|e| e.entry_id).collect();
        DatasetSummary {
            examples: self.examples.len(),
            unique_signs: unique_signs.len(),
            playable: self.examples.iter().filter(|e| e.is_playable()).count(),
            by_category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub examples: usize,
    pub unique_signs: usize,
    pub playable: usize,
    /// Example count per video category, e.g. `finalexample1 -> 120`.
    pub by_category: BTreeMap<String, usize>,
}
