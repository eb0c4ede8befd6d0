// File: src/core/assembler.rs
use crate::config::PipelineConfig;
use crate::core::sequence::parse_optional;
use crate::core::types::{
    AssembledExample, EnrichedToken, EntryId, MatchResult, SignDefinition, SignToken, VideoRecord,
};
use crate::dataset::Dataset;
use crate::store::DictionaryStore;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use url::Url;

/// Joins matched signs against their example videos and sentences and
/// denormalizes everything a learner-facing example needs.
pub struct ExampleAssembler<'a, S: DictionaryStore + ?Sized> {
    store: &'a S,
    config: &'a PipelineConfig,
}

impl<'a, S: DictionaryStore + ?Sized> ExampleAssembler<'a, S> {
    pub fn new(store: &'a S, config: &'a PipelineConfig) -> Self {
        Self { store, config }
    }

    /// Builds the dataset for the first `config.top_k` match results.
    ///
    /// Missing rows never abort the run: a video without a sentence gets a
    /// synthesized translation and an empty sign sequence, and a token whose
    /// id is not in the dictionary falls back to its surface word.
    pub fn assemble(&self, matches: &[MatchResult]) -> Dataset {
        let top: Vec<MatchResult> = matches.iter().take(self.config.top_k).cloned().collect();
        let mut examples = Vec::new();
        let mut definitions = BTreeMap::new();
        // Stand-ins for matched ids the dictionary lacks. Kept apart so that
        // tokens with those ids still fall back to their own surface word.
        let mut stand_ins = Vec::new();

        for item in &top {
            let Some(entry_id) = item.entry_id else {
                debug!("Rank {} ({}) has no sign, skipping", item.rank, item.source_word);
                continue;
            };

            // 1. The sign's own gloss and meanings
            let (definition, known) = match self.lookup_definition(entry_id) {
                Some(found) => (found, true),
                None => {
                    warn!("Rank {}: sign {entry_id} is not in the dictionary", item.rank);
                    let stand_in = SignDefinition {
                        entry_id,
                        gloss: item.source_word.clone(),
                        minor_meanings: String::new(),
                        definition_video_url: None,
                    };
                    (stand_in, false)
                }
            };

            // 2. Finished example takes, then the sentence each one records
            for (example_number, video) in self.finished_examples(entry_id) {
                let example = self.build_example(item, &definition, example_number, video, &mut definitions);
                debug!(
                    "Added: {} [{}] (rank {}) - {} - {}",
                    example.actual_gloss,
                    example.common_word,
                    example.rank,
                    example.video_type,
                    example.english_translation
                );
                examples.push(example);
            }

            if known {
                definitions.insert(entry_id, definition);
            } else {
                stand_ins.push(definition);
            }
        }

        for stand_in in stand_ins {
            definitions.entry(stand_in.entry_id).or_insert(stand_in);
        }

        let dataset = Dataset {
            top_k: self.config.top_k,
            matches: top,
            examples,
            definitions,
        };
        let summary = dataset.summary();
        info!(
            examples = summary.examples,
            unique_signs = summary.unique_signs,
            "Extracted {} video examples for the top {} signs",
            summary.examples,
            self.config.top_k
        );
        dataset
    }

    /// Finished-example videos of an entry with their example numbers, ordered
    /// by example number, then display order.
    fn finished_examples(&self, entry_id: EntryId) -> Vec<(u32, &'a VideoRecord)> {
        let prefix = self.config.finished_example_prefix.as_str();
        let mut videos: Vec<(u32, &'a VideoRecord)> = self
            .store
            .videos(entry_id)
            .iter()
            .filter(|v| v.is_finished_example(prefix))
            .filter_map(|v| match v.example_number(prefix) {
                Some(n) => Some((n, v)),
                None => {
                    warn!("Entry {entry_id}: unreadable example category {:?}", v.category);
                    None
                }
            })
            .collect();
        videos.sort_by_key(|(n, v)| (*n, v.display_order));
        videos
    }

    fn build_example(
        &self,
        item: &MatchResult,
        definition: &SignDefinition,
        example_number: u32,
        video: &VideoRecord,
        definitions: &mut BTreeMap<EntryId, SignDefinition>,
    ) -> AssembledExample {
        let sentence = self.store.sentence(definition.entry_id, example_number);
        if sentence.is_none() {
            warn!(
                "Entry {}: no sentence for example {example_number}, using placeholder",
                definition.entry_id
            );
        }

        let raw_sentence = sentence
            .and_then(|s| s.annotated_text.clone())
            .unwrap_or_default();
        let translation = sentence.and_then(|s| s.translation.clone());
        let placeholder = translation.is_none();
        let english_translation =
            translation.unwrap_or_else(|| self.config.placeholder_for(&item.source_word));

        let tokens = match sentence {
            Some(s) => parse_optional(s.annotated_text.as_deref()),
            None => Vec::new(),
        };
        let sign_sequence = tokens
            .into_iter()
            .map(|token| self.enrich(token, definitions))
            .collect();

        AssembledExample {
            entry_id: definition.entry_id,
            example_number,
            video_type: video.category.clone(),
            common_word: item.source_word.clone(),
            actual_gloss: definition.gloss.clone(),
            minor_meanings: definition.minor_meanings.clone(),
            matched_gloss: item.matched_gloss.clone(),
            provenance: item.provenance,
            rank: item.rank,
            confidence: item.confidence,
            video_url: video.url.clone(),
            english_translation,
            raw_sentence,
            placeholder,
            sign_sequence,
        }
    }

    /// Secondary lookup of a token's own sign. Unknown ids degrade to the
    /// surface word with no definition video.
    fn enrich(
        &self,
        token: SignToken,
        definitions: &mut BTreeMap<EntryId, SignDefinition>,
    ) -> EnrichedToken {
        let definition = match definitions.get(&token.id) {
            Some(known) => Some(known.clone()),
            None => self.lookup_definition(token.id).inspect(|found| {
                definitions.insert(token.id, found.clone());
            }),
        };

        match definition {
            Some(d) => EnrichedToken {
                word: token.word,
                id: token.id,
                gloss: d.gloss,
                minor_meanings: d.minor_meanings,
                definition_video_url: d.definition_video_url,
            },
            None => EnrichedToken {
                gloss: token.word.clone(),
                word: token.word,
                id: token.id,
                minor_meanings: String::new(),
                definition_video_url: None,
            },
        }
    }

    fn lookup_definition(&self, entry_id: EntryId) -> Option<SignDefinition> {
        let entry = self.store.entry(entry_id)?;
        Some(SignDefinition {
            entry_id,
            gloss: entry.gloss.clone(),
            minor_meanings: entry.minor.clone().unwrap_or_default(),
            definition_video_url: self.definition_video(entry_id),
        })
    }

    /// The entry's non-example videos in display order: the first well-formed
    /// video-file URL, else the first non-empty URL.
    fn definition_video(&self, entry_id: EntryId) -> Option<String> {
        let prefix = self.config.finished_example_prefix.as_str();
        let candidates: Vec<&str> = self
            .store
            .videos(entry_id)
            .iter()
            .filter(|v| !v.is_finished_example(prefix))
            .filter_map(VideoRecord::playable_url)
            .collect();

        candidates
            .iter()
            .find(|u| is_video_file_url(u, &self.config.video_extensions))
            .or_else(|| candidates.first())
            .map(|u| u.to_string())
    }
}

/// True for an absolute http(s) URL whose path ends in one of `extensions`.
pub fn is_video_file_url(candidate: &str, extensions: &[String]) -> bool {
    let Ok(url) = Url::parse(candidate.trim()) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    let last_segment = url.path().rsplit('/').next().unwrap_or("");
    match last_segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
        }
        _ => false,
    }
}
