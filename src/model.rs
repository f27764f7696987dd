use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Disbursement type within the register: paper check or electronic transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Check,
    Eft,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Eft => "eft",
        }
    }
}

/// A single PDF word and the x coordinate where it starts on the page.
///
/// The y coordinate is consumed while grouping words into lines and is not
/// retained afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedWord {
    pub text: String,
    pub x0: f64,
}

impl PositionedWord {
    pub fn new(text: impl Into<String>, x0: f64) -> Self {
        Self {
            text: text.into(),
            x0,
        }
    }
}

/// One line of page-extracted text, optionally paired with the positioned
/// words that produced it. Consumed by the row chunker and not retained
/// except inside a [`RowChunk`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawLine {
    pub text: String,
    pub words: Option<Vec<PositionedWord>>,
}

impl RawLine {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            words: None,
        }
    }

    pub fn with_words(text: impl Into<String>, words: Vec<PositionedWord>) -> Self {
        Self {
            text: text.into(),
            words: Some(words),
        }
    }
}

/// Raw multi-line material for one not-yet-parsed register row.
///
/// `lines[0]` is expected to match the row anchor pattern; later lines are
/// wrapped description/amount continuations. `line_words` carries per-line
/// positioned words when geometry capture was enabled, parallel to `lines`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowChunk {
    pub section_month: u32,
    pub section_year: u32,
    pub kind: EntryKind,
    pub lines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_words: Option<Vec<Vec<PositionedWord>>>,
}

/// One parsed disbursement record.
///
/// `number` stays a string so leading zeros survive; `date` stays the packet's
/// own `MM/DD/YYYY` text; `amount` is an exact decimal so cent-level totals do
/// not drift across large registers.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckEntry {
    pub section_month: u32,
    pub section_year: u32,
    pub kind: EntryKind,
    pub number: String,
    pub date: String,
    pub status: String,
    pub source: String,
    pub payee: String,
    pub description: String,
    pub amount: Decimal,
    pub voided: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_pdf: String,
    pub source_sha256: String,
    pub page_start: usize,
    pub page_end: usize,
    pub chunk_count: usize,
    pub entry_count: usize,
    pub register_pdf: String,
    pub chunks_path: String,
    pub csv_path: String,
}
