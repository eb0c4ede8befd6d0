// File: src/core/matcher.rs
use crate::core::normalizer::Normalizer;
use crate::core::similarity::similarity;
use crate::core::types::{DictionaryEntry, EntryId, MatchResult, Provenance, RankedWord};
use tracing::{debug, info};

/// Rounds a score to 3 decimals for external reporting. Exact halves go to
/// the even neighbour, so 0.3125 reports as 0.312.
pub fn round_confidence(score: f64) -> f64 {
    (score * 1000.0).round_ties_even() / 1000.0
}

struct Candidate<'a> {
    entry_id: EntryId,
    gloss: &'a str,
    score: f64,
    provenance: Provenance,
}

/// Maps ranked words onto dictionary entries by best gloss similarity.
pub struct LexicalMatcher<'d> {
    normalizer: Normalizer,
    entries: &'d [DictionaryEntry],
}

impl<'d> LexicalMatcher<'d> {
    /// `entries` must already be in evaluation order (ascending id): ties go
    /// to whichever candidate is seen first.
    pub fn new(normalizer: Normalizer, entries: &'d [DictionaryEntry]) -> Self {
        Self { normalizer, entries }
    }

    /// Finds the single best candidate for `word`.
    ///
    /// Every primary gloss, then every alternate meaning, of every entry is
    /// scored against the normalized word. The first candidate seen is always
    /// taken and later ones replace it only with a strictly greater score, so
    /// the earliest candidate wins ties, including a tie at zero.
    /// Complexity: O(E * C) similarity calls for E entries with C candidates each.
    pub fn match_word(&self, word: &RankedWord) -> MatchResult {
        let target = self.normalizer.normalize(&word.text);
        let mut best: Option<Candidate<'d>> = None;

        for entry in self.entries {
            let primary = entry.primary_glosses().map(|g| (g, Provenance::Primary));
            let alternate = entry.alternate_glosses().map(|g| (g, Provenance::Alternate));
            for (gloss, provenance) in primary.chain(alternate) {
                let score = similarity(&target, &self.normalizer.normalize(gloss));
                if best.as_ref().map_or(true, |b| score > b.score) {
                    best = Some(Candidate {
                        entry_id: entry.id,
                        gloss,
                        score,
                        provenance,
                    });
                }
            }
        }

        match best {
            Some(c) => MatchResult {
                rank: word.rank,
                source_word: word.text.clone(),
                entry_id: Some(c.entry_id),
                matched_gloss: Some(c.gloss.to_string()),
                confidence: round_confidence(c.score),
                provenance: c.provenance,
            },
            None => MatchResult::no_match(word),
        }
    }

    /// One result per input word, in input order.
    pub fn match_all(&self, words: &[RankedWord]) -> Vec<MatchResult> {
        let results: Vec<MatchResult> = words
            .iter()
            .map(|word| {
                let result = self.match_word(word);
                match (&result.entry_id, &result.matched_gloss) {
                    (Some(id), Some(gloss)) => debug!(
                        "{:>3}. {:<20} -> ID: {:>4} ({}) [{:.3}]",
                        result.rank, result.source_word, id, gloss, result.confidence
                    ),
                    _ => debug!("{:>3}. {:<20} -> NO MATCH FOUND", result.rank, result.source_word),
                }
                result
            })
            .collect();

        let report = MatchReport::new(&results, 0.0);
        info!(
            matched = report.matched,
            total = report.total,
            "Matched {} out of {} words ({:.1}%)",
            report.matched,
            report.total,
            report.matched_percent()
        );
        results
    }
}

/// Summary of a matching run, with the low-confidence matches worth a manual look.
#[derive(Debug, Clone)]
pub struct MatchReport<'a> {
    pub matched: usize,
    pub total: usize,
    pub low_confidence: Vec<&'a MatchResult>,
}

impl<'a> MatchReport<'a> {
    pub fn new(results: &'a [MatchResult], threshold: f64) -> Self {
        Self {
            matched: results.iter().filter(|r| r.is_matched()).count(),
            total: results.len(),
            low_confidence: results
                .iter()
                .filter(|r| r.is_matched() && r.confidence < threshold)
                .collect(),
        }
    }

    pub fn matched_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 * 100.0 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: EntryId, gloss: &str, minor: Option<&str>) -> DictionaryEntry {
        DictionaryEntry {
            id,
            gloss: gloss.to_string(),
            minor: minor.map(str::to_string),
        }
    }

    fn word(text: &str) -> RankedWord {
        RankedWord {
            rank: 1,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_exact_primary_match() {
        let entries = vec![entry(1, "cat, kitty", None), entry(2, "dog", None)];
        let matcher = LexicalMatcher::new(Normalizer::default(), &entries);
        let result = matcher.match_word(&word("kitty"));
        assert_eq!(result.entry_id, Some(1));
        assert_eq!(result.matched_gloss.as_deref(), Some("kitty"));
        assert_eq!(result.provenance, Provenance::Primary);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_alternate_meaning_match() {
        let entries = vec![entry(1, "automobile", Some("car, vehicle")), entry(2, "dog", None)];
        let matcher = LexicalMatcher::new(Normalizer::default(), &entries);
        let result = matcher.match_word(&word("car"));
        assert_eq!(result.entry_id, Some(1));
        assert_eq!(result.matched_gloss.as_deref(), Some("car"));
        assert_eq!(result.provenance, Provenance::Alternate);
    }

    #[test]
    fn test_first_seen_wins_ties() {
        let entries = vec![entry(3, "run", None), entry(7, "run", None)];
        let matcher = LexicalMatcher::new(Normalizer::default(), &entries);
        assert_eq!(matcher.match_word(&word("run")).entry_id, Some(3));

        // Within one entry, left-to-right: primary before alternate
        let entries = vec![entry(4, "go", Some("go"))];
        let matcher = LexicalMatcher::new(Normalizer::default(), &entries);
        assert_eq!(matcher.match_word(&word("go")).provenance, Provenance::Primary);
    }

    #[test]
    fn test_zero_score_still_matches_first_entry() {
        let entries = vec![entry(10, "xyz", None), entry(11, "qqq", None)];
        let matcher = LexicalMatcher::new(Normalizer::default(), &entries);
        let result = matcher.match_word(&word("abc"));
        assert_eq!(result.entry_id, Some(10));
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.provenance, Provenance::Primary);
    }

    #[test]
    fn test_empty_dictionary_is_no_match() {
        let matcher = LexicalMatcher::new(Normalizer::default(), &[]);
        let result = matcher.match_word(&word("house"));
        assert_eq!(result.entry_id, None);
        assert_eq!(result.matched_gloss, None);
        assert_eq!(result.provenance, Provenance::None);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_notation_affixes_ignored() {
        let entries = vec![entry(1, "IX-HOUSE-NEG", None), entry(2, "horse", None)];
        let matcher = LexicalMatcher::new(Normalizer::default(), &entries);
        let result = matcher.match_word(&word("House"));
        assert_eq!(result.entry_id, Some(1));
        assert_eq!(result.confidence, 1.0);
        // The reported gloss is the raw candidate, not its normalized form
        assert_eq!(result.matched_gloss.as_deref(), Some("IX-HOUSE-NEG"));
    }

    #[test]
    fn test_confidence_rounded() {
        let entries = vec![entry(1, "kitten", None)];
        let matcher = LexicalMatcher::new(Normalizer::default(), &entries);
        let result = matcher.match_word(&word("sitting"));
        assert_eq!(result.confidence, 0.615);
    }

    #[test]
    fn test_exact_halves_round_to_even() {
        assert_eq!(round_confidence(0.3125), 0.312);
        assert_eq!(round_confidence(0.0625), 0.062);
        assert_eq!(round_confidence(0.6875), 0.688);

        // 5 shared characters over 32: 10/32
        let entries = vec![entry(1, "abcdezzzzzzzzzzz", None)];
        let matcher = LexicalMatcher::new(Normalizer::default(), &entries);
        let result = matcher.match_word(&word("abcdefghijklmnop"));
        assert_eq!(result.confidence, 0.312);
    }

    #[test]
    fn test_match_all_preserves_order_and_ranks() {
        let entries = vec![entry(1, "cat", None), entry(2, "dog", None)];
        let matcher = LexicalMatcher::new(Normalizer::default(), &entries);
        let words = RankedWord::from_list(["dog", "cat"]);
        let results = matcher.match_all(&words);
        assert_eq!(results.len(), 2);
        assert_eq!((results[0].rank, results[0].entry_id), (1, Some(2)));
        assert_eq!((results[1].rank, results[1].entry_id), (2, Some(1)));
    }

    #[test]
    fn test_report_low_confidence() {
        let entries = vec![entry(1, "kitten", None), entry(2, "dog", None)];
        let matcher = LexicalMatcher::new(Normalizer::default(), &entries);
        let results = matcher.match_all(&RankedWord::from_list(["dog", "sitting"]));
        let report = MatchReport::new(&results, 0.7);
        assert_eq!(report.matched, 2);
        assert_eq!(report.matched_percent(), 100.0);
        assert_eq!(report.low_confidence.len(), 1);
        assert_eq!(report.low_confidence[0].source_word, "sitting");
    }
}
