// src/core/types.rs
use serde::{Deserialize, Deserializer, Serialize};

/// The stable integer key of a dictionary sign entry.
pub type EntryId = i64;

/// Display order of a video row that has none; such takes sort last.
pub const UNORDERED: u32 = u32::MAX;

fn unordered() -> u32 {
    UNORDERED
}

fn order_or_last<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(UNORDERED))
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One word of the externally curated frequency list. `rank` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedWord {
    pub rank: usize,
    pub text: String,
}

impl RankedWord {
    /// Turns an ordered word list into ranked words, rank = position + 1.
    pub fn from_list<I, S>(words: I) -> Vec<RankedWord>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        words
            .into_iter()
            .enumerate()
            .map(|(i, text)| RankedWord {
                rank: i + 1,
                text: text.into(),
            })
            .collect()
    }
}

/// A sign entry as the dictionary stores it. `gloss` and `minor` are
/// comma-separated fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub id: EntryId,
    pub gloss: String,
    #[serde(default)]
    pub minor: Option<String>,
}

impl DictionaryEntry {
    /// Primary glosses, left to right, whitespace-trimmed.
    pub fn primary_glosses(&self) -> impl Iterator<Item = &str> {
        self.gloss.split(',').map(str::trim)
    }

    /// Alternate meanings, left to right. Empty when the field is absent or blank.
    pub fn alternate_glosses(&self) -> impl Iterator<Item = &str> {
        self.minor
            .as_deref()
            .filter(|m| !m.is_empty())
            .into_iter()
            .flat_map(|m| m.split(',').map(str::trim))
    }
}

/// Which dictionary field produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Primary,
    Alternate,
    None,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Alternate => write!(f, "alternate"),
            Self::None => write!(f, "none"),
        }
    }
}

/// The best dictionary candidate for one ranked word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub rank: usize,
    pub source_word: String,
    /// Absent only when the dictionary was empty.
    pub entry_id: Option<EntryId>,
    pub matched_gloss: Option<String>,
    /// Rounded to 3 decimal places.
    pub confidence: f64,
    pub provenance: Provenance,
}

impl MatchResult {
    pub fn no_match(word: &RankedWord) -> Self {
        Self {
            rank: word.rank,
            source_word: word.text.clone(),
            entry_id: None,
            matched_gloss: None,
            confidence: 0.0,
            provenance: Provenance::None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.entry_id.is_some()
    }
}

/// An annotated example sentence, e.g. `clothes[1523] plenty[3721]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleSentence {
    #[serde(rename = "word_id")]
    pub entry_id: EntryId,
    #[serde(rename = "display_order")]
    pub sequence_number: u32,
    #[serde(rename = "sentence", default)]
    pub annotated_text: Option<String>,
    #[serde(default)]
    pub translation: Option<String>,
}

/// A video row of the dictionary. Example takes carry a category such as
/// `finalexample2`; a missing URL is a known gap, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(rename = "word_id")]
    pub entry_id: EntryId,
    #[serde(rename = "video_type", default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "unordered", deserialize_with = "order_or_last")]
    pub display_order: u32,
}

impl VideoRecord {
    pub fn playable_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }

    pub fn is_finished_example(&self, prefix: &str) -> bool {
        self.category.starts_with(prefix)
    }

    /// Example number encoded after the category prefix: `finalexample3` -> 3.
    pub fn example_number(&self, prefix: &str) -> Option<u32> {
        self.category.strip_prefix(prefix)?.parse().ok()
    }
}

/// One `word[id]` occurrence in an annotated sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignToken {
    pub word: String,
    pub id: EntryId,
}

/// What the learner sees when tapping a sign: its gloss, other meanings and
/// the video that defines it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignDefinition {
    pub entry_id: EntryId,
    pub gloss: String,
    pub minor_meanings: String,
    pub definition_video_url: Option<String>,
}

/// A sign token joined back against the dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedToken {
    pub word: String,
    pub id: EntryId,
    pub gloss: String,
    pub minor_meanings: String,
    pub definition_video_url: Option<String>,
}

impl EnrichedToken {
    pub fn token(&self) -> SignToken {
        SignToken {
            word: self.word.clone(),
            id: self.id,
        }
    }
}

/// The unit served to learners: one finished video take of a matched sign,
/// its sentence, and the enriched sign sequence of that sentence.
///
/// `example_number` is shared by the sentence and the chosen video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledExample {
    pub entry_id: EntryId,
    pub example_number: u32,
    pub video_type: String,
    pub common_word: String,
    pub actual_gloss: String,
    pub minor_meanings: String,
    pub matched_gloss: Option<String>,
    pub provenance: Provenance,
    pub rank: usize,
    pub confidence: f64,
    pub video_url: Option<String>,
    pub english_translation: String,
    pub raw_sentence: String,
    /// True when no sentence row existed and the translation was synthesized.
    pub placeholder: bool,
    pub sign_sequence: Vec<EnrichedToken>,
}

impl AssembledExample {
    pub fn is_playable(&self) -> bool {
        self.video_url
            .as_deref()
            .is_some_and(|u| !u.trim().is_empty())
    }
}
