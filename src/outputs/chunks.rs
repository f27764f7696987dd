//! Raw chunk archive io.
//!
//! Archiving the un-parsed chunks (with their positioned words, when
//! captured) makes a register reproducible: the parser can be re-run against
//! the archive without re-extracting the original PDF.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::RowChunk;
use crate::util::write_json_pretty;

pub fn write_chunks(chunks: &[RowChunk], out_path: &Path) -> Result<()> {
    write_json_pretty(out_path, &chunks)
}

pub fn read_chunks(path: &Path) -> Result<Vec<RowChunk>> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryKind, PositionedWord};

    #[test]
    fn chunks_round_trip_through_json() {
        let chunks = vec![RowChunk {
            section_month: 6,
            section_year: 2025,
            kind: EntryKind::Eft,
            lines: vec!["1201 06/15/2025 Open Accounts Payable CALPERS $2,000.00".to_string()],
            line_words: Some(vec![vec![PositionedWord::new("1201", 0.0)]]),
        }];

        let json = serde_json::to_string(&chunks).unwrap();
        let back: Vec<RowChunk> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chunks);
        assert!(json.contains("\"eft\""));
    }

    #[test]
    fn text_only_chunks_omit_word_field() {
        let chunks = vec![RowChunk {
            section_month: 6,
            section_year: 2025,
            kind: EntryKind::Check,
            lines: vec!["line".to_string()],
            line_words: None,
        }];

        let json = serde_json::to_string(&chunks).unwrap();
        assert!(!json.contains("line_words"));
    }
}
