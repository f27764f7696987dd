//! Poppler collaborators.
//!
//! All PDF access is delegated to the poppler command line tools: page text
//! via `pdftotext -layout`, per-word geometry via `pdftotext -bbox`, and
//! page-range slicing via `pdftocairo -pdf`. The rest of the crate only sees
//! lines and positioned words.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use regex::Regex;

use crate::model::PositionedWord;

/// Words whose yMin differ by no more than this are on the same line.
const LINE_GROUP_TOLERANCE: f64 = 3.0;

/// Extract page texts with layout preserved (column gaps survive as runs of
/// spaces, which the text splitter's double-space heuristic relies on).
pub fn extract_page_texts(pdf_path: &Path) -> Result<Vec<String>> {
    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg("-enc")
        .arg("UTF-8")
        .arg(pdf_path)
        .arg("-")
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    let mut pages: Vec<String> = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    while let Some(last_page) = pages.last() {
        if last_page.trim().is_empty() {
            pages.pop();
            continue;
        }
        break;
    }

    Ok(pages)
}

/// Extract per-page words with their positions, grouped into lines by
/// vertical proximity and sorted left to right.
pub fn extract_page_words(pdf_path: &Path) -> Result<Vec<Vec<Vec<PositionedWord>>>> {
    let output = Command::new("pdftotext")
        .arg("-bbox")
        .arg("-enc")
        .arg("UTF-8")
        .arg(pdf_path)
        .arg("-")
        .output()
        .with_context(|| {
            format!("failed to execute pdftotext -bbox for {}", pdf_path.display())
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext -bbox returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    parse_bbox_pages(&raw)
}

/// Slice an inclusive 1-indexed page range into a standalone PDF.
pub fn extract_register_pdf(
    pdf_path: &Path,
    page_start: usize,
    page_end: usize,
    out_path: &Path,
) -> Result<()> {
    let output = Command::new("pdftocairo")
        .arg("-pdf")
        .arg("-f")
        .arg(page_start.to_string())
        .arg("-l")
        .arg(page_end.to_string())
        .arg(pdf_path)
        .arg(out_path)
        .output()
        .with_context(|| format!("failed to execute pdftocairo for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftocairo returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    if !out_path.exists() {
        bail!(
            "pdftocairo did not produce expected output {}",
            out_path.display()
        );
    }

    Ok(())
}

fn parse_bbox_pages(xml: &str) -> Result<Vec<Vec<Vec<PositionedWord>>>> {
    let word_regex = Regex::new(
        r#"(?s)<word xMin="([^"]+)" yMin="([^"]+)" xMax="[^"]+" yMax="[^"]+">(.*?)</word>"#,
    )
    .context("failed to compile bbox word regex")?;

    let mut pages = Vec::new();
    for (index, segment) in xml.split("<page ").enumerate() {
        if index == 0 {
            // Preamble before the first <page> element.
            continue;
        }

        let mut words: Vec<(f64, f64, String)> = Vec::new();
        for caps in word_regex.captures_iter(segment) {
            let x: f64 = caps[1]
                .parse()
                .with_context(|| format!("invalid xMin in bbox output: {}", &caps[1]))?;
            let y: f64 = caps[2]
                .parse()
                .with_context(|| format!("invalid yMin in bbox output: {}", &caps[2]))?;
            let text = unescape_xml(&caps[3]);
            if text.trim().is_empty() {
                continue;
            }
            words.push((x, y, text.trim().to_string()));
        }

        pages.push(group_words_into_lines(words));
    }

    Ok(pages)
}

/// Group (x, y, text) words into reading-order lines: words within the
/// vertical tolerance share a line, each line sorted left to right.
fn group_words_into_lines(mut words: Vec<(f64, f64, String)>) -> Vec<Vec<PositionedWord>> {
    words.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<Vec<(f64, f64, String)>> = Vec::new();
    let mut line_y: Option<f64> = None;
    for word in words {
        let same_line = line_y.is_some_and(|y| (word.1 - y).abs() <= LINE_GROUP_TOLERANCE);
        if same_line && !lines.is_empty() {
            if let Some(line) = lines.last_mut() {
                line.push(word);
            }
        } else {
            line_y = Some(word.1);
            lines.push(vec![word]);
        }
    }

    lines
        .into_iter()
        .map(|mut line| {
            line.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
            line.into_iter()
                .map(|(x, _y, text)| PositionedWord::new(text, x))
                .collect()
        })
        .collect()
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_words_are_grouped_into_lines() {
        let xml = r#"<?xml version="1.0"?>
<html><body><doc>
<page width="612.000000" height="792.000000">
<word xMin="10.0" yMin="100.0" xMax="40.0" yMax="110.0">93336</word>
<word xMin="50.0" yMin="100.5" xMax="90.0" yMax="110.0">06/12/2025</word>
<word xMin="10.0" yMin="120.0" xMax="60.0" yMax="130.0">continuation</word>
</page>
<page width="612.000000" height="792.000000">
<word xMin="10.0" yMin="50.0" xMax="60.0" yMax="60.0">L&amp;M</word>
</page>
</doc></body></html>"#;

        let pages = parse_bbox_pages(xml).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 2);
        assert_eq!(pages[0][0].len(), 2);
        assert_eq!(pages[0][0][0].text, "93336");
        assert_eq!(pages[0][0][1].text, "06/12/2025");
        assert_eq!(pages[0][1][0].text, "continuation");
        assert_eq!(pages[1][0][0].text, "L&M");
    }

    #[test]
    fn words_sort_left_to_right_within_a_line() {
        let words = vec![
            (300.0, 100.0, "second".to_string()),
            (10.0, 101.0, "first".to_string()),
            (10.0, 200.0, "below".to_string()),
        ];
        let lines = group_words_into_lines(words);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][0].text, "first");
        assert_eq!(lines[0][1].text, "second");
        assert_eq!(lines[1][0].text, "below");
    }
}
