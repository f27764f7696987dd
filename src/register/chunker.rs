//! Groups page lines into one chunk per register row.
//!
//! Section headers update the ambient month/year/type context, a row anchor
//! opens a chunk, and the chunk closes eagerly as soon as a line ends with
//! the currency amount (the amount is always the last field of a row).

use crate::model::{EntryKind, PositionedWord, RawLine, RowChunk};

use super::RegisterPatterns;

pub struct ChunkOutcome {
    pub chunks: Vec<RowChunk>,
    /// Whether any register section header was ever seen. `false` with zero
    /// chunks means the input never contained the register at all.
    pub saw_section: bool,
}

struct PendingChunk {
    month: u32,
    year: u32,
    kind: EntryKind,
    lines: Vec<String>,
    words: Vec<Option<Vec<PositionedWord>>>,
}

impl PendingChunk {
    fn push(&mut self, line: &RawLine) {
        self.lines.push(line.text.trim_end().to_string());
        self.words.push(line.words.clone());
    }

    fn into_chunk(self) -> RowChunk {
        let line_words = if self.words.iter().all(Option::is_some) {
            Some(self.words.into_iter().flatten().collect())
        } else {
            None
        };
        RowChunk {
            section_month: self.month,
            section_year: self.year,
            kind: self.kind,
            lines: self.lines,
            line_words,
        }
    }
}

/// Scan page lines in order and emit one [`RowChunk`] per register row.
pub fn chunk_lines(patterns: &RegisterPatterns, pages: &[Vec<RawLine>]) -> ChunkOutcome {
    let mut chunks: Vec<RowChunk> = Vec::new();
    let mut month: Option<u32> = None;
    let mut year: Option<u32> = None;
    let mut kind = EntryKind::Check;
    let mut saw_section = false;
    let mut current: Option<PendingChunk> = None;

    for page in pages {
        for line in page {
            let text = line.text.trim_end();

            if text.is_empty() || patterns.skip_line.is_match(text) {
                continue;
            }

            if let Some(caps) = patterns.block_hdr.captures(text) {
                // The To date labels the section; checks are listed first.
                month = caps.get(4).and_then(|m| m.as_str().parse().ok());
                year = caps.get(6).and_then(|m| m.as_str().parse().ok());
                kind = EntryKind::Check;
                saw_section = true;
                flush(&mut current, &mut chunks);
                continue;
            }

            if patterns.checks_hdr.is_match(text) {
                kind = EntryKind::Check;
                saw_section = true;
                flush(&mut current, &mut chunks);
                continue;
            }

            if patterns.efts_hdr.is_match(text) {
                kind = EntryKind::Eft;
                saw_section = true;
                flush(&mut current, &mut chunks);
                continue;
            }

            let (Some(month), Some(year)) = (month, year) else {
                continue;
            };

            if patterns.row_start.is_match(text) {
                flush(&mut current, &mut chunks);
                let mut pending = PendingChunk {
                    month,
                    year,
                    kind,
                    lines: Vec::new(),
                    words: Vec::new(),
                };
                pending.push(line);
                current = Some(pending);
            } else if let Some(pending) = current.as_mut() {
                pending.push(line);
            } else {
                continue;
            }

            // The amount terminates a row; close the chunk as soon as it
            // appears.
            if patterns.amount_tail.is_match(text) {
                flush(&mut current, &mut chunks);
            }
        }
    }

    flush(&mut current, &mut chunks);

    ChunkOutcome {
        chunks,
        saw_section,
    }
}

fn flush(current: &mut Option<PendingChunk>, chunks: &mut Vec<RowChunk>) {
    if let Some(pending) = current.take() {
        if !pending.lines.is_empty() {
            chunks.push(pending.into_chunk());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<RawLine> {
        texts.iter().map(|t| RawLine::text_only(*t)).collect()
    }

    fn patterns() -> RegisterPatterns {
        RegisterPatterns::new().unwrap()
    }

    const HDR: &str = "From Payment Date: 6/1/2025 - To Payment Date: 6/30/2025";

    #[test]
    fn single_line_rows_close_on_their_amount() {
        let page = lines(&[
            HDR,
            "Accounts Payable - Checks",
            "93336 06/12/2025 Open Accounts Payable ACME CO Toner $100.00",
            "93337 06/13/2025 Open Accounts Payable BAYSIDE INC Paper $50.00",
        ]);

        let outcome = chunk_lines(&patterns(), &[page]);
        assert!(outcome.saw_section);
        assert_eq!(outcome.chunks.len(), 2);
        assert_eq!(outcome.chunks[0].lines.len(), 1);
        assert_eq!(outcome.chunks[0].section_month, 6);
        assert_eq!(outcome.chunks[0].section_year, 2025);
        assert_eq!(outcome.chunks[0].kind, EntryKind::Check);
    }

    #[test]
    fn wrapped_rows_keep_continuation_order_until_amount() {
        let page = lines(&[
            HDR,
            "93336 06/12/2025 Open Accounts Payable ACME CO Toner and",
            "drum replacement",
            "for front office printer $1,234.56",
            "93337 06/13/2025 Open Accounts Payable BAYSIDE INC Paper $50.00",
        ]);

        let outcome = chunk_lines(&patterns(), &[page]);
        assert_eq!(outcome.chunks.len(), 2);
        assert_eq!(
            outcome.chunks[0].lines,
            vec![
                "93336 06/12/2025 Open Accounts Payable ACME CO Toner and",
                "drum replacement",
                "for front office printer $1,234.56",
            ]
        );
    }

    #[test]
    fn eft_header_switches_kind() {
        let page = lines(&[
            HDR,
            "93336 06/12/2025 Open Accounts Payable ACME CO Toner $100.00",
            "Accounts Payable - EFT's",
            "1201 06/15/2025 Open Accounts Payable CALPERS Premium $2,000.00",
        ]);

        let outcome = chunk_lines(&patterns(), &[page]);
        assert_eq!(outcome.chunks.len(), 2);
        assert_eq!(outcome.chunks[0].kind, EntryKind::Check);
        assert_eq!(outcome.chunks[1].kind, EntryKind::Eft);
    }

    #[test]
    fn dangling_chunk_is_emitted() {
        let page = lines(&[
            HDR,
            "93336 06/12/2025 Open Accounts Payable ACME CO Toner and",
            "a description that never got its amount",
        ]);

        let outcome = chunk_lines(&patterns(), &[page]);
        assert_eq!(outcome.chunks.len(), 1);
        assert_eq!(outcome.chunks[0].lines.len(), 2);
    }

    #[test]
    fn lines_outside_a_section_are_ignored() {
        let page = lines(&[
            "93336 06/12/2025 Open Accounts Payable ACME CO Toner $100.00",
            "random preamble",
        ]);

        let outcome = chunk_lines(&patterns(), &[page]);
        assert!(!outcome.saw_section);
        assert!(outcome.chunks.is_empty());
    }

    #[test]
    fn boilerplate_lines_are_filtered() {
        let page = lines(&[
            HDR,
            "City of El Cerrito",
            "Payment Register",
            "93336 06/12/2025 Open Accounts Payable ACME CO Toner $100.00",
            "TOTAL CHECKS",
            "GRAND TOTAL",
        ]);

        let outcome = chunk_lines(&patterns(), &[page]);
        assert_eq!(outcome.chunks.len(), 1);
    }

    #[test]
    fn word_lines_are_carried_when_all_present() {
        let row = RawLine::with_words(
            "93336 06/12/2025 Open Accounts Payable ACME Toner $100.00",
            vec![
                PositionedWord::new("93336", 0.0),
                PositionedWord::new("06/12/2025", 40.0),
                PositionedWord::new("Open", 80.0),
                PositionedWord::new("Accounts", 100.0),
                PositionedWord::new("Payable", 130.0),
                PositionedWord::new("ACME", 160.0),
                PositionedWord::new("Toner", 300.0),
                PositionedWord::new("$100.00", 500.0),
            ],
        );
        let page = vec![RawLine::text_only(HDR), row];

        let outcome = chunk_lines(&patterns(), &[page]);
        assert_eq!(outcome.chunks.len(), 1);
        let words = outcome.chunks[0].line_words.as_ref().unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].len(), 8);
    }
}
