// File: src/store.rs
use crate::core::types::{DictionaryEntry, EntryId, ExampleSentence, VideoRecord};
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

/// Read-only access to the sign dictionary, keyed by entry id.
pub trait DictionaryStore {
    /// All entries in ascending id order.
    fn entries(&self) -> &[DictionaryEntry];

    fn entry(&self, id: EntryId) -> Option<&DictionaryEntry>;

    /// Every video of an entry, in display order.
    fn videos(&self, id: EntryId) -> &[VideoRecord];

    /// The example sentence with the given sequence number, if any.
    fn sentence(&self, id: EntryId, sequence_number: u32) -> Option<&ExampleSentence>;

    /// All example sentences of an entry, in sequence order.
    fn sentences(&self, id: EntryId) -> Vec<&ExampleSentence>;
}

/// The three dictionary tables as they appear in a JSON export.
///
/// Rows are read one at a time: a row that does not fit its record (a null
/// gloss, a missing id) is logged and dropped while the rest of its table
/// still loads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DictionarySnapshot {
    #[serde(deserialize_with = "lenient_rows")]
    pub words: Vec<DictionaryEntry>,
    #[serde(default, deserialize_with = "lenient_rows")]
    pub videos: Vec<VideoRecord>,
    #[serde(default, deserialize_with = "lenient_rows")]
    pub examples: Vec<ExampleSentence>,
}

fn lenient_rows<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let rows = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(rows
        .into_iter()
        .enumerate()
        .filter_map(|(idx, row)| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed row {idx}: {e}");
                None
            }
        })
        .collect())
}

/// A dictionary loaded fully into memory and indexed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<DictionaryEntry>,
    by_id: HashMap<EntryId, usize>,
    videos: HashMap<EntryId, Vec<VideoRecord>>,
    sentences: HashMap<EntryId, Vec<ExampleSentence>>,
}

impl MemoryStore {
    pub fn from_snapshot(snapshot: DictionarySnapshot) -> Self {
        let mut entries = snapshot.words;
        // Stable: rows sharing an id keep their export order
        entries.sort_by_key(|e| e.id);

        let mut by_id = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            if by_id.contains_key(&entry.id) {
                warn!("Duplicate dictionary id {}; keeping the first row", entry.id);
                continue;
            }
            by_id.insert(entry.id, idx);
        }

        let mut videos: HashMap<EntryId, Vec<VideoRecord>> = HashMap::new();
        for video in snapshot.videos {
            videos.entry(video.entry_id).or_default().push(video);
        }
        for list in videos.values_mut() {
            list.sort_by_key(|v| v.display_order);
        }

        let mut sentences: HashMap<EntryId, Vec<ExampleSentence>> = HashMap::new();
        for sentence in snapshot.examples {
            sentences.entry(sentence.entry_id).or_default().push(sentence);
        }
        for list in sentences.values_mut() {
            list.sort_by_key(|s| s.sequence_number);
        }

        Self {
            entries,
            by_id,
            videos,
            sentences,
        }
    }

    /// Loads a JSON dictionary export.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let snapshot: DictionarySnapshot = serde_json::from_reader(reader)?;
        info!(
            words = snapshot.words.len(),
            videos = snapshot.videos.len(),
            examples = snapshot.examples.len(),
            "Loaded dictionary from {}",
            path.display()
        );
        Ok(Self::from_snapshot(snapshot))
    }
}

impl DictionaryStore for MemoryStore {
    fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    fn entry(&self, id: EntryId) -> Option<&DictionaryEntry> {
        self.by_id.get(&id).map(|&idx| &self.entries[idx])
    }

    fn videos(&self, id: EntryId) -> &[VideoRecord] {
        self.videos.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn sentence(&self, id: EntryId, sequence_number: u32) -> Option<&ExampleSentence> {
        // First row wins when a sequence number repeats
        self.sentences
            .get(&id)?
            .iter()
            .find(|s| s.sequence_number == sequence_number)
    }

    fn sentences(&self, id: EntryId) -> Vec<&ExampleSentence> {
        self.sentences
            .get(&id)
            .map(|list| list.iter().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> DictionarySnapshot {
        serde_json::from_str(
            r#"{
                "words": [
                    {"id": 20, "gloss": "dog", "minor": null},
                    {"id": 10, "gloss": "cat, kitty", "minor": "feline"},
                    {"id": 10, "gloss": "duplicate"}
                ],
                "videos": [
                    {"word_id": 10, "video_type": "finalexample2", "url": "b.mp4", "display_order": 2},
                    {"word_id": 10, "video_type": "main", "url": "a.mp4", "display_order": 1}
                ],
                "examples": [
                    {"word_id": 10, "display_order": 2, "sentence": "cat[10]", "translation": "A cat."},
                    {"word_id": 10, "display_order": 1, "sentence": null, "translation": null},
                    {"word_id": 10, "display_order": 2, "sentence": "other[1]", "translation": "Second row."}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_entries_sorted_by_id() {
        let store = MemoryStore::from_snapshot(snapshot());
        let ids: Vec<_> = store.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![10, 10, 20]);
    }

    #[test]
    fn test_duplicate_id_keeps_first_row() {
        let store = MemoryStore::from_snapshot(snapshot());
        assert_eq!(store.entry(10).unwrap().gloss, "cat, kitty");
        assert!(store.entry(99).is_none());
    }

    #[test]
    fn test_videos_in_display_order() {
        let store = MemoryStore::from_snapshot(snapshot());
        let videos = store.videos(10);
        assert_eq!(videos[0].category, "main");
        assert_eq!(videos[1].category, "finalexample2");
        assert!(store.videos(20).is_empty());
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let snapshot: DictionarySnapshot = serde_json::from_str(
            r#"{
                "words": [
                    {"id": 1, "gloss": "cat"},
                    {"id": 2, "gloss": null},
                    {"id": null, "gloss": "orphan"},
                    {"id": 3, "gloss": "dog"}
                ],
                "videos": [
                    {"word_id": 1, "video_type": "finalexample1", "url": "a.mp4", "display_order": null},
                    {"word_id": 1, "video_type": "main", "url": "b.mp4", "display_order": 0}
                ],
                "examples": [
                    {"word_id": 1, "display_order": null, "sentence": "cat[1]", "translation": "Lost."},
                    {"word_id": 1, "display_order": 1, "sentence": "cat[1]", "translation": "A cat."}
                ]
            }"#,
        )
        .unwrap();
        let store = MemoryStore::from_snapshot(snapshot);

        let ids: Vec<_> = store.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(store.entry(2).is_none());

        // A take without an order is kept, after the ordered ones
        let videos = store.videos(1);
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].category, "main");
        assert_eq!(videos[1].category, "finalexample1");

        assert_eq!(store.sentences(1).len(), 1);
        assert_eq!(store.sentence(1, 1).unwrap().translation.as_deref(), Some("A cat."));
    }

    #[test]
    fn test_sentence_lookup() {
        let store = MemoryStore::from_snapshot(snapshot());
        let sentence = store.sentence(10, 2).unwrap();
        assert_eq!(sentence.translation.as_deref(), Some("A cat."));
        assert!(store.sentence(10, 3).is_none());
        assert!(store.sentence(20, 1).is_none());
        assert_eq!(store.sentences(10).len(), 3);
        assert_eq!(store.sentences(10)[0].sequence_number, 1);
    }
}
