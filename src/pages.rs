//! Locates the check register section inside a full agenda packet and derives
//! the archive file stem from the parsed entries.

use std::collections::BTreeSet;

use crate::model::{CheckEntry, RawLine};
use crate::register::RegisterPatterns;

/// Locate the 1-indexed inclusive page range of the check register.
///
/// The section starts on the first page showing both the payment-date block
/// header and a register section header, and extends while pages keep showing
/// register data. `None` means the packet has no register section at all,
/// which callers must surface as a hard failure, distinct from a found
/// section with zero rows.
pub fn find_register_page_range(
    patterns: &RegisterPatterns,
    pages: &[Vec<RawLine>],
) -> Option<(usize, usize)> {
    let mut start_page = None;
    let mut end_page = None;
    let mut in_section = false;

    for (index, page) in pages.iter().enumerate() {
        let page_number = index + 1;
        let mut has_block = false;
        let mut has_section_hdr = false;
        let mut page_has_data = false;

        for line in page {
            let text = line.text.trim();
            if text.is_empty() {
                continue;
            }
            if patterns.block_hdr.is_match(text) {
                has_block = true;
            }
            if patterns.checks_hdr.is_match(text)
                || patterns.efts_hdr.is_match(text)
                || text.to_uppercase().contains("CHECK REGISTER")
            {
                has_section_hdr = true;
                page_has_data = true;
            } else if in_section
                && (patterns.row_start.is_match(text) || patterns.skip_line.is_match(text))
            {
                page_has_data = true;
            }
        }

        if start_page.is_none() {
            if has_block && has_section_hdr {
                start_page = Some(page_number);
                end_page = Some(page_number);
                in_section = true;
            }
        } else if in_section {
            if page_has_data {
                end_page = Some(page_number);
            } else {
                break;
            }
        }
    }

    match (start_page, end_page) {
        (Some(start), Some(end)) => Some((start, end)),
        _ => None,
    }
}

/// Archive file stem for a parsed register: `YYYY-MM` for one month,
/// `YYYY-MM-MM` for a multi-month register within one year, and
/// `YYYY-MM-YYYY-MM` across years. `None` when there are no entries to name.
pub fn default_register_stem(entries: &[CheckEntry]) -> Option<String> {
    let months: BTreeSet<(u32, u32)> = entries
        .iter()
        .map(|entry| (entry.section_year, entry.section_month))
        .collect();

    let (start_year, start_month) = *months.first()?;
    let (end_year, end_month) = *months.last()?;

    let stem = if (start_year, start_month) == (end_year, end_month) {
        format!("{start_year:04}-{start_month:02}")
    } else if start_year == end_year {
        format!("{start_year:04}-{start_month:02}-{end_month:02}")
    } else {
        format!("{start_year:04}-{start_month:02}-{end_year:04}-{end_month:02}")
    };

    Some(stem)
}

/// The year directory an archived register belongs under.
pub fn earliest_year(entries: &[CheckEntry]) -> Option<u32> {
    entries
        .iter()
        .map(|entry| (entry.section_year, entry.section_month))
        .min()
        .map(|(year, _month)| year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntryKind;
    use rust_decimal::Decimal;

    fn page(texts: &[&str]) -> Vec<RawLine> {
        texts.iter().map(|t| RawLine::text_only(*t)).collect()
    }

    fn entry(month: u32, year: u32) -> CheckEntry {
        CheckEntry {
            section_month: month,
            section_year: year,
            kind: EntryKind::Check,
            number: String::new(),
            date: String::new(),
            status: String::new(),
            source: String::new(),
            payee: String::new(),
            description: String::new(),
            amount: Decimal::ZERO,
            voided: false,
        }
    }

    const HDR: &str = "From Payment Date: 6/1/2025 - To Payment Date: 6/30/2025";

    #[test]
    fn finds_contiguous_register_pages() {
        let patterns = RegisterPatterns::new().unwrap();
        let pages = vec![
            page(&["Council agenda", "Call to order"]),
            page(&[HDR, "Accounts Payable - Checks"]),
            page(&["93336 06/12/2025 Open Accounts Payable ACME CO Toner $100.00"]),
            page(&["Resolution 2025-41", "unrelated attachment"]),
        ];

        assert_eq!(
            find_register_page_range(&patterns, &pages),
            Some((2, 3))
        );
    }

    #[test]
    fn no_register_section_yields_none() {
        let patterns = RegisterPatterns::new().unwrap();
        let pages = vec![page(&["Council agenda"]), page(&["Minutes"])];
        assert_eq!(find_register_page_range(&patterns, &pages), None);
    }

    #[test]
    fn block_header_alone_does_not_start_the_section() {
        let patterns = RegisterPatterns::new().unwrap();
        let pages = vec![page(&[HDR])];
        assert_eq!(find_register_page_range(&patterns, &pages), None);
    }

    #[test]
    fn stem_for_a_single_month() {
        assert_eq!(
            default_register_stem(&[entry(6, 2025)]).as_deref(),
            Some("2025-06")
        );
    }

    #[test]
    fn stem_for_multi_month_same_year() {
        assert_eq!(
            default_register_stem(&[entry(6, 2025), entry(7, 2025)]).as_deref(),
            Some("2025-06-07")
        );
    }

    #[test]
    fn stem_across_years() {
        assert_eq!(
            default_register_stem(&[entry(12, 2024), entry(1, 2025)]).as_deref(),
            Some("2024-12-2025-01")
        );
    }

    #[test]
    fn stem_for_no_entries_is_none() {
        assert_eq!(default_register_stem(&[]), None);
        assert_eq!(earliest_year(&[]), None);
    }
}
