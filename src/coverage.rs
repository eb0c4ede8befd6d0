// File: src/coverage.rs
use crate::config::PipelineConfig;
use crate::core::types::{EntryId, MatchResult};
use crate::store::DictionaryStore;
use serde::Serialize;
use tracing::info;

/// A top-K sign with no finished example to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingCoverage {
    pub rank: usize,
    pub word: String,
    pub entry_id: Option<EntryId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignCoverage {
    pub rank: usize,
    pub word: String,
    pub entry_id: EntryId,
    pub examples: usize,
}

/// How well the top-K signs are covered by finished example videos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    pub checked: usize,
    pub covered: Vec<SignCoverage>,
    pub missing: Vec<MissingCoverage>,
    pub total_examples: usize,
    /// Finished examples whose video URL is null or empty.
    pub missing_video_urls: usize,
}

impl CoverageReport {
    pub fn with_examples(&self) -> usize {
        self.covered.len()
    }

    pub fn without_examples(&self) -> usize {
        self.missing.len()
    }
}

/// Counts the finished examples of each of the first `top_k` matches.
pub fn analyze<S: DictionaryStore + ?Sized>(
    store: &S,
    matches: &[MatchResult],
    config: &PipelineConfig,
) -> CoverageReport {
    let prefix = config.finished_example_prefix.as_str();
    let mut report = CoverageReport {
        checked: 0,
        covered: Vec::new(),
        missing: Vec::new(),
        total_examples: 0,
        missing_video_urls: 0,
    };

    for item in matches.iter().take(config.top_k) {
        report.checked += 1;
        let finished: Vec<_> = item
            .entry_id
            .map(|id| store.videos(id))
            .unwrap_or(&[])
            .iter()
            .filter(|v| v.is_finished_example(prefix))
            .collect();

        match item.entry_id {
            Some(entry_id) if !finished.is_empty() => {
                report.total_examples += finished.len();
                report.missing_video_urls +=
                    finished.iter().filter(|v| v.playable_url().is_none()).count();
                report.covered.push(SignCoverage {
                    rank: item.rank,
                    word: item.source_word.clone(),
                    entry_id,
                    examples: finished.len(),
                });
            }
            _ => report.missing.push(MissingCoverage {
                rank: item.rank,
                word: item.source_word.clone(),
                entry_id: item.entry_id,
            }),
        }
    }

    info!(
        checked = report.checked,
        with_examples = report.with_examples(),
        without_examples = report.without_examples(),
        "Coverage: {} of {} signs have example videos",
        report.with_examples(),
        report.checked
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DictionaryEntry, Provenance, VideoRecord};
    use crate::store::{DictionarySnapshot, MemoryStore};

    fn matched(rank: usize, word: &str, entry_id: Option<EntryId>) -> MatchResult {
        MatchResult {
            rank,
            source_word: word.into(),
            entry_id,
            matched_gloss: None,
            confidence: 1.0,
            provenance: Provenance::Primary,
        }
    }

    fn video(entry_id: EntryId, category: &str, url: Option<&str>) -> VideoRecord {
        VideoRecord {
            entry_id,
            category: category.into(),
            url: url.map(str::to_string),
            display_order: 1,
        }
    }

    #[test]
    fn test_coverage_counts() {
        let store = MemoryStore::from_snapshot(DictionarySnapshot {
            words: vec![
                DictionaryEntry { id: 1, gloss: "a".into(), minor: None },
                DictionaryEntry { id: 2, gloss: "b".into(), minor: None },
            ],
            videos: vec![
                video(1, "finalexample1", Some("x.mp4")),
                video(1, "finalexample2", Some("")),
                video(1, "main", None),
                video(2, "main", Some("y.mp4")),
            ],
            examples: vec![],
        });
        let matches = vec![
            matched(1, "a", Some(1)),
            matched(2, "b", Some(2)),
            matched(3, "c", None),
            matched(4, "a", Some(1)),
        ];
        let config = PipelineConfig {
            top_k: 3,
            ..PipelineConfig::default()
        };
        let report = analyze(&store, &matches, &config);

        assert_eq!(report.checked, 3);
        assert_eq!(report.with_examples(), 1);
        assert_eq!(report.covered[0].examples, 2);
        assert_eq!(report.total_examples, 2);
        assert_eq!(report.missing_video_urls, 1);
        assert_eq!(report.without_examples(), 2);
        assert_eq!(report.missing[0].word, "b");
        assert_eq!(report.missing[1].entry_id, None);
    }
}
