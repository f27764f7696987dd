//! Register row recognition: compiled patterns, the row chunker, and the row
//! parser that turns chunks into [`crate::model::CheckEntry`] records.

mod chunker;
mod parser;

use anyhow::{Context, Result};
use regex::Regex;

pub use chunker::{ChunkOutcome, chunk_lines};
pub use parser::{MalformedRowError, RegisterParser};

/// Process-wide immutable pattern set for the register layout. Compiled once
/// at startup and shared by the page-range finder, the chunker, and the row
/// parser.
pub struct RegisterPatterns {
    /// The single line carrying both From/To payment dates, e.g.
    /// `From Payment Date: 6/1/2025 - To Payment Date: 6/30/2025`.
    pub block_hdr: Regex,
    pub checks_hdr: Regex,
    pub efts_hdr: Regex,
    /// Data row anchor: `<num> <MM/DD/YYYY> <Status> Accounts Payable <tail>`.
    pub row_start: Regex,
    pub void_marker: Regex,
    /// Trailing currency amount, optionally negative, grouped thousands.
    pub amount_tail: Regex,
    /// Obvious non-data lines (totals, boilerplate, status summaries).
    pub skip_line: Regex,
}

impl RegisterPatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            block_hdr: Regex::new(
                r"(?i)^From Payment Date:\s*(\d{1,2})/(\d{1,2})/(\d{4})\s*-\s*To Payment Date:\s*(\d{1,2})/(\d{1,2})/(\d{4})$",
            )
            .context("failed to compile payment date header regex")?,
            checks_hdr: Regex::new(r"(?i)^Accounts Payable\s*-?\s*Checks$")
                .context("failed to compile checks header regex")?,
            efts_hdr: Regex::new(r"(?i)^Accounts Payable\s*-?\s*EFT'?s$")
                .context("failed to compile EFT header regex")?,
            row_start: Regex::new(
                r"^\s*(\d{3,7})\s+(\d{2}/\d{2}/\d{4})\s+([A-Za-z /]+?)\s+(Accounts Payable)\s+(.*)$",
            )
            .context("failed to compile row anchor regex")?,
            void_marker: Regex::new(r"(?i)\bVOID(?:ED|ED/REISSUED)?\b")
                .context("failed to compile void marker regex")?,
            amount_tail: Regex::new(r"\$-?\d{1,3}(?:,\d{3})*(?:\.\d{2})?$")
                .context("failed to compile amount tail regex")?,
            skip_line: Regex::new(
                r"(?i)^(?:TOTAL CHECKS|TOTAL EFT|TOTAL EFT'S|TOTAL EFT\u{2019}S|Checks & EFT'?s|All Status|GRAND TOTAL|ACCOUNTS PAYABLE|PAYROLL|City of El Cerrito|Payment Register|Open\s+\d+|Voided|Total\s+\d+)$",
            )
            .context("failed to compile skip line regex")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::model::RawLine;

    use super::*;

    // A condensed register in the packet's own layout, exercising the whole
    // chunker -> parser -> splitter pipeline.
    const PAGE_ONE: &[&str] = &[
        "City of El Cerrito",
        "Payment Register",
        "From Payment Date: 6/1/2025 - To Payment Date: 6/30/2025",
        "Accounts Payable - Checks",
        "93336 06/12/2025 Open Accounts Payable KAISER FOUNDATION HEALTH PLAN June premiums $52,871.10",
        "93337 06/12/2025 Open Accounts Payable CITY OF RICHMOND Fire services $31,500.00",
        "93338 06/13/2025 Open Accounts Payable ACME WIDGET LLC $18,400.25",
        "93339 06/13/2025 Voided Accounts Payable GHOST VENDOR CO VOID $99,999.99",
        "93340 06/16/2025 Open Accounts Payable JONES MACHINE WORKS INVOICE 4421",
        "and freight charges $7,204.50",
        "TOTAL CHECKS",
    ];

    const PAGE_TWO: &[&str] = &[
        "Accounts Payable - EFT's",
        "1201 06/20/2025 Open Accounts Payable P E R S PE1% $64,022.00",
        "1202 06/21/2025 Open Accounts Payable MUNICIPAL POOLING AUTHORITY Quarterly pool $12,000.00",
        "GRAND TOTAL",
    ];

    #[test]
    fn pipeline_reproduces_top_payees_by_amount() {
        let patterns = RegisterPatterns::new().unwrap();
        let pages: Vec<Vec<RawLine>> = [PAGE_ONE, PAGE_TWO]
            .iter()
            .map(|page| page.iter().map(|l| RawLine::text_only(*l)).collect())
            .collect();

        let outcome = chunk_lines(&patterns, &pages);
        assert!(outcome.saw_section);
        assert_eq!(outcome.chunks.len(), 7);

        let parser = RegisterParser::new(&patterns).unwrap();
        let entries = parser.parse_chunks(&outcome.chunks);
        assert_eq!(entries.len(), 7);

        let mut nonvoid: Vec<_> = entries.iter().filter(|e| !e.voided).collect();
        nonvoid.sort_by(|a, b| b.amount.cmp(&a.amount));

        let expected_top = [
            "PERS",
            "KAISER FOUNDATION HEALTH PLAN",
            "CITY OF RICHMOND",
            "ACME WIDGET LLC",
            "MUNICIPAL POOLING AUTHORITY",
        ];
        let got: Vec<&str> = nonvoid
            .iter()
            .take(expected_top.len())
            .map(|e| e.payee.as_str())
            .collect();

        let matches = expected_top
            .iter()
            .zip(&got)
            .filter(|(want, have)| *want == *have)
            .count();
        assert!(
            matches >= expected_top.len() - 1,
            "only {matches} of {} top payees matched: {got:?}",
            expected_top.len()
        );
    }

    #[test]
    fn pipeline_marks_voided_rows_and_keeps_them() {
        let patterns = RegisterPatterns::new().unwrap();
        let pages: Vec<Vec<RawLine>> = vec![
            PAGE_ONE.iter().map(|l| RawLine::text_only(*l)).collect(),
        ];

        let outcome = chunk_lines(&patterns, &pages);
        let parser = RegisterParser::new(&patterns).unwrap();
        let entries = parser.parse_chunks(&outcome.chunks);

        let ghost = entries.iter().find(|e| e.number == "93339").unwrap();
        assert!(ghost.voided);
        assert!(entries.iter().filter(|e| e.voided).count() == 1);
    }

    #[test]
    fn pipeline_assigns_kinds_per_subsection() {
        let patterns = RegisterPatterns::new().unwrap();
        let pages: Vec<Vec<RawLine>> = [PAGE_ONE, PAGE_TWO]
            .iter()
            .map(|page| page.iter().map(|l| RawLine::text_only(*l)).collect())
            .collect();

        let outcome = chunk_lines(&patterns, &pages);
        let parser = RegisterParser::new(&patterns).unwrap();
        let entries = parser.parse_chunks(&outcome.chunks);

        use crate::model::EntryKind;
        assert!(entries.iter().take(5).all(|e| e.kind == EntryKind::Check));
        assert!(entries.iter().skip(5).all(|e| e.kind == EntryKind::Eft));
    }
}
