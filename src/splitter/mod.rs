//! Payee/description boundary inference.
//!
//! A register row loses its columnar layout when the PDF text layer collapses
//! whitespace, so the payee name and the free-text description arrive as one
//! block. This module recovers the boundary with a weighted vote over a fixed
//! catalogue of heuristics (`heuristics.rs`), then applies a small repair pass
//! for splits that leaked description tokens into the payee. A second,
//! geometry-aware path (`cluster.rs`) is used when per-word x positions are
//! available.

mod cluster;
mod heuristics;
mod lexicon;

use anyhow::{Context, Result};
use regex::Regex;

use crate::model::PositionedWord;
use heuristics::HEURISTICS;
use lexicon::{is_known_prefix, is_month, is_stopword, is_suffix};

pub(crate) struct SplitPatterns {
    pub(crate) date_token: Regex,
    pub(crate) year_token: Regex,
    pub(crate) double_space: Regex,
    comma_letter: Regex,
    amount_token: Regex,
}

impl SplitPatterns {
    fn new() -> Result<Self> {
        Ok(Self {
            date_token: Regex::new(r"^\d{1,2}/\d{1,2}/\d{2,4}$")
                .context("failed to compile date token regex")?,
            year_token: Regex::new(r"^\d{4}$").context("failed to compile year token regex")?,
            double_space: Regex::new(r"\s{2,}")
                .context("failed to compile double space regex")?,
            comma_letter: Regex::new(r",([A-Za-z])")
                .context("failed to compile comma spacing regex")?,
            amount_token: Regex::new(r"^\$-?\d{1,3}(?:,\d{3})*(?:\.\d{2})?$")
                .context("failed to compile amount token regex")?,
        })
    }
}

pub struct PayeeSplitter {
    patterns: SplitPatterns,
}

impl PayeeSplitter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            patterns: SplitPatterns::new()?,
        })
    }

    /// Split a free-text block into `(payee, description)` using weighted
    /// boundary voting.
    ///
    /// Never fails: an empty block yields `("", "")` and any non-empty block
    /// yields a non-empty payee (the unconditional fallback heuristic
    /// guarantees a winner).
    pub fn split_block(&self, block: &str) -> (String, String) {
        let cleaned = block.replace(['\r', '\n'], " ").replace(" ,", ",");
        let cleaned = cleaned.trim();
        // Re-insert the space the text layer swallowed after "Smith,John".
        let text = self
            .patterns
            .comma_letter
            .replace_all(cleaned, ", $1")
            .into_owned();
        if text.is_empty() {
            return (String::new(), String::new());
        }

        let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        let mut tokens = merge_letter_run(tokens);
        if tokens.len() == 1 {
            return (tokens.remove(0), String::new());
        }

        let boundary = self.vote_boundary(&tokens, &text);
        let boundary = clamp_to_suffix(&tokens, boundary);
        let boundary = self.repair_boundary(&tokens, boundary);
        self.finalize(&tokens, boundary)
    }

    /// Split using word x positions instead of text heuristics.
    ///
    /// Returns `None` when the geometry does not resemble a two-column row,
    /// signalling the caller to fall back to [`Self::split_block`].
    pub fn split_by_column(
        &self,
        line_words: &[Vec<PositionedWord>],
    ) -> Option<(String, String)> {
        cluster::split_by_column(line_words, &self.patterns.amount_token)
    }

    fn vote_boundary(&self, tokens: &[String], text: &str) -> usize {
        // Boundary b means payee = tokens[..b]; b == len leaves the
        // description empty, which suffix-terminated vendor names produce.
        let mut scores = vec![0_i32; tokens.len() + 1];
        for (_name, weight, heuristic) in HEURISTICS {
            if let Some(idx) = heuristic(tokens, text, &self.patterns) {
                if (1..=tokens.len()).contains(&idx) {
                    scores[idx] += weight;
                }
            }
        }

        // Ties go to the larger index: the weight-1 short-payee fallback must
        // lose to any more specific signal.
        let mut best = 1;
        for idx in 1..=tokens.len() {
            if scores[idx] >= scores[best] {
                best = idx;
            }
        }
        best
    }

    /// Detect description tokens that leaked into the payee and re-split just
    /// before the first offender.
    fn repair_boundary(&self, tokens: &[String], boundary: usize) -> usize {
        let payee = &tokens[..boundary];
        let mut needed = boundary == tokens.len();
        if !needed {
            needed = (1..payee.len()).any(|i| self.leaks_description(payee, i));
        }
        if !needed {
            return boundary;
        }

        for i in 1..tokens.len() {
            if self.leaks_description(tokens, i) {
                return i;
            }
        }
        boundary
    }

    fn leaks_description(&self, window: &[String], i: usize) -> bool {
        let tok = &window[i];
        let stripped = core(tok);
        let upper = stripped.to_uppercase();

        if is_stopword(&upper) {
            if tok.ends_with(',') {
                return false;
            }
            if i + 1 < window.len() && is_suffix(&upper_core(&window[i + 1])) {
                return false;
            }
            return true;
        }

        is_month(&upper)
            || self.patterns.date_token.is_match(stripped)
            || (has_digit(stripped) && !stripped.starts_with('#'))
    }

    fn finalize(&self, tokens: &[String], boundary: usize) -> (String, String) {
        let mut payee_tokens: Vec<String> = tokens[..boundary].to_vec();
        let mut desc_tokens: Vec<String> = tokens[boundary..].to_vec();

        // A payee wrapped mid-name leaves its trailing comma dangling; keep
        // pulling description tokens across until the comma resolves.
        while payee_tokens.last().is_some_and(|tok| tok.ends_with(','))
            && !desc_tokens.is_empty()
        {
            payee_tokens.push(desc_tokens.remove(0));
        }

        let mut payee = payee_tokens
            .join(" ")
            .trim()
            .trim_end_matches(',')
            .to_string();
        let mut desc = desc_tokens.join(" ").trim().to_string();

        if desc.is_empty() && tokens.len() > 3 {
            payee = tokens[..3].join(" ").trim().trim_end_matches(',').to_string();
            desc = tokens[3..].join(" ").trim().to_string();
        }

        if self.patterns.year_token.is_match(&desc) {
            payee = format!("{payee} {desc}")
                .trim()
                .trim_end_matches(',')
                .to_string();
            desc = String::new();
        }

        // "Smith, John" reads better as a single upper-cased name.
        if payee.contains(',') {
            let parts: Vec<&str> = payee.split(',').map(str::trim).collect();
            if parts.len() == 2 && is_title(parts[0]) && is_title(parts[1]) {
                payee = format!("{} {}", parts[0], parts[1]).to_uppercase();
            }
        }

        (payee, desc)
    }
}

/// Collapse a leading run of single letters (`P E R S`) into one token when
/// the concatenation names a known vendor. Some text layers emit short
/// acronyms one letter per word.
fn merge_letter_run(tokens: Vec<String>) -> Vec<String> {
    let mut letters: Vec<String> = Vec::new();
    let mut rest = 0;
    for tok in &tokens {
        let stripped = core(tok);
        if stripped.chars().count() == 1 && stripped.chars().all(char::is_alphabetic) {
            letters.push(stripped.to_uppercase());
            rest += 1;
        } else {
            break;
        }
    }

    if letters.len() > 1 {
        let joined = letters.concat();
        if is_known_prefix(&joined) {
            let mut merged = vec![joined];
            merged.extend(tokens[rest..].iter().cloned());
            return merged;
        }
    }
    tokens
}

/// Clamp the boundary back to just after the rightmost corporate suffix:
/// once located, the suffix outranks the vote winner unless a `#`-reference
/// follows it.
fn clamp_to_suffix(tokens: &[String], boundary: usize) -> usize {
    let mut suffix_pos = None;
    for (i, tok) in tokens.iter().enumerate() {
        if is_suffix(&upper_core(tok)) {
            suffix_pos = Some(i);
        }
    }

    match suffix_pos {
        Some(pos) if boundary > pos + 1 && !tokens[pos + 1].starts_with('#') => pos + 1,
        _ => boundary,
    }
}

pub(crate) fn core(tok: &str) -> &str {
    tok.trim_end_matches(['.', ','])
}

pub(crate) fn upper_core(tok: &str) -> String {
    core(tok).to_uppercase()
}

pub(crate) fn is_alpha(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_alphabetic)
}

pub(crate) fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

pub(crate) fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

pub(crate) fn has_alpha(s: &str) -> bool {
    s.chars().any(char::is_alphabetic)
}

/// At least one cased character and no lowercase ones.
pub(crate) fn is_upper(s: &str) -> bool {
    s.chars().any(char::is_alphabetic) && !s.chars().any(char::is_lowercase)
}

/// Title case per cased run: an uppercase letter may only open a run.
pub(crate) fn is_title(s: &str) -> bool {
    let mut cased = false;
    let mut prev_cased = false;
    for ch in s.chars() {
        if ch.is_uppercase() {
            if prev_cased {
                return false;
            }
            cased = true;
            prev_cased = true;
        } else if ch.is_lowercase() {
            if !prev_cased {
                return false;
            }
            cased = true;
            prev_cased = true;
        } else {
            prev_cased = false;
        }
    }
    cased
}
