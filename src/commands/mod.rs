pub mod archive;
pub mod extract;
pub mod reparse;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::model::{CheckEntry, PositionedWord, RawLine};
use crate::money::format_amount;
use crate::outputs::{write_csv, write_json, write_payee_quadtree_html};
use crate::pages::find_register_page_range;
use crate::pdf;
use crate::register::RegisterPatterns;
use crate::stats::{month_rollups, sanity};

pub(crate) struct RegisterPages {
    pub pages: Vec<Vec<RawLine>>,
    pub page_start: usize,
    pub page_end: usize,
}

/// Extract page lines for the register section of a packet.
///
/// Failing to locate the section at all is a hard error, distinct from a
/// located section that parses to zero rows. With `geometry` the lines are
/// rebuilt from positioned words so the splitter can use the column layout;
/// geometry capture degrades to text-only with a warning rather than failing
/// the run.
pub(crate) fn load_register_pages(
    patterns: &RegisterPatterns,
    pdf_path: &Path,
    geometry: bool,
) -> Result<RegisterPages> {
    let texts = pdf::extract_page_texts(pdf_path)?;
    let text_pages: Vec<Vec<RawLine>> = texts
        .iter()
        .map(|page| page.lines().map(RawLine::text_only).collect())
        .collect();

    let (page_start, page_end) = find_register_page_range(patterns, &text_pages)
        .with_context(|| format!("no check register section found in {}", pdf_path.display()))?;

    let mut pages: Vec<Vec<RawLine>> = text_pages[page_start - 1..page_end].to_vec();

    if geometry {
        match pdf::extract_page_words(pdf_path) {
            Ok(word_pages) if word_pages.len() >= page_end => {
                pages = word_pages[page_start - 1..page_end]
                    .iter()
                    .map(|lines| {
                        lines
                            .iter()
                            .map(|words| RawLine::with_words(join_words(words), words.clone()))
                            .collect()
                    })
                    .collect();
            }
            Ok(word_pages) => {
                warn!(
                    text_pages = page_end,
                    word_pages = word_pages.len(),
                    "word geometry covers fewer pages than the text layer; using text lines"
                );
            }
            Err(error) => {
                warn!(error = %error, "word geometry unavailable; using text lines");
            }
        }
    }

    Ok(RegisterPages {
        pages,
        page_start,
        page_end,
    })
}

fn join_words(words: &[PositionedWord]) -> String {
    words
        .iter()
        .map(|word| word.text.as_str())
        .collect::<Vec<&str>>()
        .join(" ")
}

pub(crate) fn write_entry_outputs(
    entries: &[CheckEntry],
    csv: Option<&Path>,
    json: Option<&Path>,
    quadtree: Option<&Path>,
) -> Result<()> {
    if let Some(path) = csv {
        write_csv(entries, path)?;
        info!(path = %path.display(), "wrote csv entries");
    }
    if let Some(path) = json {
        write_json(entries, path)?;
        info!(path = %path.display(), "wrote json entries");
    }
    if let Some(path) = quadtree {
        write_payee_quadtree_html(entries, path)?;
        info!(path = %path.display(), "wrote payee quadtree");
    }
    Ok(())
}

pub(crate) fn log_stats(entries: &[CheckEntry]) {
    let stats = sanity(entries);
    info!(
        count = stats.count,
        checks = stats.check_count,
        efts = stats.eft_count,
        total_nonvoid = %format_amount(stats.total_nonvoid),
        "register totals"
    );

    for ((year, month), totals) in month_rollups(entries) {
        info!(
            year,
            month,
            checks = %format_amount(totals.checks),
            efts = %format_amount(totals.efts),
            grand = %format_amount(totals.grand),
            "month rollup"
        );
    }
}
