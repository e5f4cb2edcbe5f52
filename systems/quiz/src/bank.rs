//! Vocabulary loaded from an external JSON document.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Single word together with the meaning the player must recognise.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordEntry {
    /// Word shown in the quiz banner.
    pub word: String,
    /// Meaning offered as the correct answer.
    pub meaning: String,
}

impl WordEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(word: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            meaning: meaning.into(),
        }
    }
}

/// Errors reported while loading a word bank.
#[derive(Debug, Error)]
pub enum WordBankError {
    /// The document is not a JSON array of `{ "word", "meaning" }` objects.
    #[error("failed to parse word bank")]
    Parse(#[from] serde_json::Error),
    /// The document contained no entries.
    #[error("word bank is empty")]
    Empty,
    /// An entry has an empty word or meaning.
    #[error("word bank entry {index} has a blank word or meaning")]
    BlankEntry {
        /// Zero-based position of the entry in the document.
        index: usize,
    },
}

/// Collection of word entries.
///
/// Construction rejects empty collections, so a bank always holds at least
/// one entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordBank {
    entries: Vec<WordEntry>,
}

impl WordBank {
    /// Validates the provided entries.
    pub fn from_entries(entries: Vec<WordEntry>) -> Result<Self, WordBankError> {
        if entries.is_empty() {
            return Err(WordBankError::Empty);
        }

        if let Some(index) = entries
            .iter()
            .position(|entry| entry.word.trim().is_empty() || entry.meaning.trim().is_empty())
        {
            return Err(WordBankError::BlankEntry { index });
        }

        Ok(Self { entries })
    }

    /// Parses a JSON array of entries.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, WordBankError> {
        let entries: Vec<WordEntry> = serde_json::from_slice(bytes)?;
        Self::from_entries(entries)
    }

    /// Parses a JSON array of entries from text.
    pub fn from_json_str(text: &str) -> Result<Self, WordBankError> {
        Self::from_json_slice(text.as_bytes())
    }

    /// Entries in document order.
    #[must_use]
    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    /// Draws a random entry whose word differs from `excluding`. Falls back
    /// to the whole bank when every entry carries that word.
    pub fn pick<R>(&self, rng: &mut R, excluding: Option<&str>) -> &WordEntry
    where
        R: Rng + ?Sized,
    {
        let mut pool: Vec<usize> = (0..self.entries.len())
            .filter(|&index| Some(self.entries[index].word.as_str()) != excluding)
            .collect();
        if pool.is_empty() {
            pool.extend(0..self.entries.len());
        }

        &self.entries[pool[rng.gen_range(0..pool.len())]]
    }

    /// Number of entries. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; banks are validated to hold at least one entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
