// File: src/core/sampler.rs
use crate::core::types::{AssembledExample, EntryId};
use crate::dataset::Dataset;
use crate::error::{Result, VocabError};
use rand::seq::index;
use rand::Rng;
use std::collections::HashMap;
use tracing::debug;

/// Picks random playable examples from a built dataset.
///
/// The sampler only borrows the dataset and takes the random source per call,
/// so one sampler can serve concurrent requests, each with its own RNG.
pub struct Sampler<'a> {
    dataset: &'a Dataset,
    /// Indices into `dataset.examples` of the playable takes of each sign.
    playable: HashMap<EntryId, Vec<usize>>,
    max_attempts: usize,
}

impl<'a> Sampler<'a> {
    pub fn new(dataset: &'a Dataset, max_attempts: usize) -> Self {
        let mut playable: HashMap<EntryId, Vec<usize>> = HashMap::new();
        for (idx, example) in dataset.examples.iter().enumerate() {
            if example.is_playable() {
                playable.entry(example.entry_id).or_default().push(idx);
            }
        }
        Self {
            dataset,
            playable,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Draws a random top-K sign, then a random playable take of it. A sign
    /// with nothing playable costs one attempt and a fresh draw among the
    /// signs not yet tried, so a call converges whenever a playable sign is
    /// reachable within `max_attempts` draws. Otherwise it fails with
    /// `NoPlayableExample`.
    pub fn sample_one<R: Rng>(&self, rng: &mut R) -> Result<&'a AssembledExample> {
        let matches = &self.dataset.matches;
        if matches.is_empty() {
            return Err(VocabError::EmptyDataset);
        }

        // Each sign is drawn at most once per call
        let draws = matches.len().min(self.max_attempts);
        let order = index::sample(rng, matches.len(), draws);

        for (attempt, idx) in order.into_iter().enumerate() {
            let pick = &matches[idx];
            let takes = pick
                .entry_id
                .and_then(|id| self.playable.get(&id))
                .filter(|takes| !takes.is_empty());

            match takes {
                Some(takes) => {
                    let idx = takes[rng.gen_range(0..takes.len())];
                    return Ok(&self.dataset.examples[idx]);
                }
                None => debug!(
                    "Attempt {}: {} (rank {}) has no playable example",
                    attempt + 1,
                    pick.source_word,
                    pick.rank
                ),
            }
        }

        Err(VocabError::NoPlayableExample { attempts: draws })
    }
}
