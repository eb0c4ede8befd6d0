// File: src/persistence.rs
use crate::core::types::{MatchResult, RankedWord};
use crate::dataset::Dataset;
use crate::error::{Result, VocabError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// On-disk encodings of the dataset artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// Pretty JSON, what the web frontend fetches.
    Json,
    /// Compact bincode for fast reloads.
    Bincode,
}

impl DatasetFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("bin") => Ok(Self::Bincode),
            _ => Err(VocabError::UnknownFormat(path.to_path_buf())),
        }
    }
}

// Writes into a temp file next to `path`, then renames it over `path`, so a
// crash never leaves a half-written artifact behind.
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<()>,
{
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        write(&mut writer)?;
        writer.flush()?;
    }
    temp_file.persist(path)?;
    Ok(())
}

fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    write_atomically(path, |writer| {
        serde_json::to_writer_pretty(writer, value)?;
        Ok(())
    })
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

/// Saves the dataset in the format its extension names (`.json` or `.bin`).
pub fn save_dataset(dataset: &Dataset, path: &Path) -> Result<()> {
    match DatasetFormat::from_path(path)? {
        DatasetFormat::Json => save_json(dataset, path)?,
        DatasetFormat::Bincode => write_atomically(path, |writer| {
            bincode::serialize_into(writer, dataset)?;
            Ok(())
        })?,
    }
    info!(
        examples = dataset.examples.len(),
        "Saved dataset to {}",
        path.display()
    );
    Ok(())
}

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let dataset = match DatasetFormat::from_path(path)? {
        DatasetFormat::Json => load_json(path)?,
        DatasetFormat::Bincode => {
            let reader = BufReader::new(File::open(path)?);
            bincode::deserialize_from(reader)?
        }
    };
    Ok(dataset)
}

pub fn save_matches(matches: &[MatchResult], path: &Path) -> Result<()> {
    save_json(matches, path)
}

pub fn load_matches(path: &Path) -> Result<Vec<MatchResult>> {
    load_json(path)
}

/// Reads a JSON array of words; rank follows array order.
pub fn load_ranked_words(path: &Path) -> Result<Vec<RankedWord>> {
    let words: Vec<String> = load_json(path)?;
    Ok(RankedWord::from_list(words))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Provenance;
    use std::collections::BTreeMap;

    fn sample_matches() -> Vec<MatchResult> {
        vec![
            MatchResult {
                rank: 1,
                source_word: "the".into(),
                entry_id: Some(4),
                matched_gloss: Some("the".into()),
                confidence: 0.857,
                provenance: Provenance::Alternate,
            },
            MatchResult {
                rank: 2,
                source_word: "nothing".into(),
                entry_id: None,
                matched_gloss: None,
                confidence: 0.0,
                provenance: Provenance::None,
            },
        ]
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DatasetFormat::from_path(Path::new("a/b.json")).unwrap(), DatasetFormat::Json);
        assert_eq!(DatasetFormat::from_path(Path::new("b.BIN")).unwrap(), DatasetFormat::Bincode);
        assert!(matches!(
            DatasetFormat::from_path(Path::new("b.yaml")),
            Err(VocabError::UnknownFormat(_))
        ));
        assert!(DatasetFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_matches_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matched_signs.json");
        save_matches(&sample_matches(), &path).unwrap();
        assert_eq!(load_matches(&path).unwrap(), sample_matches());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/dataset.bin");
        let dataset = Dataset {
            top_k: 2,
            matches: sample_matches(),
            examples: vec![],
            definitions: BTreeMap::new(),
        };
        save_dataset(&dataset, &path).unwrap();
        assert_eq!(load_dataset(&path).unwrap(), dataset);
    }

    #[test]
    fn test_ranked_words_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.json");
        fs::write(&path, r#"["the", "be", "to"]"#).unwrap();
        let words = load_ranked_words(&path).unwrap();
        assert_eq!(words.len(), 3);
        assert_eq!(words[1], RankedWord { rank: 2, text: "be".into() });
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_dataset(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, VocabError::Io(_)));
    }
}
