//! The boundary-vote catalogue.
//!
//! Each heuristic inspects the token list (and sometimes the raw block) and
//! either abstains with `None` or proposes exactly one boundary index. All
//! proposals are additive; none short-circuits. Weights are calibration
//! values tuned against archived registers.

use super::lexicon::{KNOWN_PREFIXES, is_month, is_stopword, is_suffix};
use super::{SplitPatterns, core, has_alpha, has_digit, is_alpha, is_digits, is_title, is_upper, upper_core};

pub(super) type Heuristic = fn(&[String], &str, &SplitPatterns) -> Option<usize>;

pub(super) const HEURISTICS: &[(&str, i32, Heuristic)] = &[
    ("known_prefix", 5, known_prefix),
    ("fd_number", 4, fd_number),
    ("middle_initial", 4, middle_initial),
    ("comma_pair", 4, comma_pair),
    ("last_first", 6, last_first),
    ("year", 4, year),
    ("date_or_month", 4, date_or_month),
    ("alphanum", 5, alphanum),
    ("hash_follow", 6, hash_follow),
    ("two_title", 3, two_title),
    ("stopword", 4, stopword),
    ("column_alignment", 2, column_alignment),
    ("last_comma", 2, last_comma),
    ("city_of", 5, city_of),
    ("double_space", 1, double_space),
    ("suffix", 5, suffix),
    ("default", 1, default),
];

/// Exact match against the curated multi-word vendor list.
fn known_prefix(toks: &[String], _text: &str, _pats: &SplitPatterns) -> Option<usize> {
    for prefix in KNOWN_PREFIXES {
        let parts: Vec<&str> = prefix.split_whitespace().collect();
        if toks.len() >= parts.len()
            && parts
                .iter()
                .enumerate()
                .all(|(i, part)| upper_core(&toks[i]) == *part)
        {
            return Some(parts.len());
        }
    }
    None
}

/// A literal `FD` followed by a number opens the description.
fn fd_number(toks: &[String], _text: &str, _pats: &SplitPatterns) -> Option<usize> {
    for i in 0..toks.len().saturating_sub(1) {
        if toks[i].to_uppercase() == "FD" && is_digits(&toks[i + 1]) {
            return Some(i);
        }
    }
    None
}

/// `First M. Last` personal-name shape.
fn middle_initial(toks: &[String], _text: &str, _pats: &SplitPatterns) -> Option<usize> {
    if toks.len() < 3 {
        return None;
    }
    let middle = toks[1].trim_end_matches(',');
    let initial_shape = {
        let bare = middle.strip_suffix('.').unwrap_or(middle);
        bare.chars().count() == 1 && bare.chars().all(char::is_alphabetic)
    };
    if is_alpha(core(&toks[0])) && initial_shape && is_alpha(core(&toks[2])) {
        return Some(3);
    }
    None
}

/// An ordinary `Last, First` pair (not the shouted all-caps form).
fn comma_pair(toks: &[String], _text: &str, _pats: &SplitPatterns) -> Option<usize> {
    if toks.len() >= 2 && toks[0].ends_with(',') && is_alpha(core(&toks[1])) {
        let first = toks[0].trim_end_matches(',');
        if !(is_upper(first) && is_upper(&toks[1])) {
            return Some(2);
        }
    }
    None
}

/// Shouted `LAST, FIRST` (optionally with a short uppercase abbreviation).
fn last_first(toks: &[String], _text: &str, _pats: &SplitPatterns) -> Option<usize> {
    if toks.len() >= 2 && toks[0].ends_with(',') && is_alpha(core(&toks[1])) {
        let first = toks[0].trim_end_matches(',');
        if is_upper(first) && is_upper(&toks[1]) {
            if toks.len() >= 3
                && is_alpha(&toks[2])
                && is_upper(&toks[2])
                && toks[2].chars().count() <= 3
            {
                return Some(3);
            }
            return Some(2);
        }
    }
    None
}

/// A 4-digit year usually starts the description, unless the payee carries a
/// corporate suffix or the year is the final token.
fn year(toks: &[String], _text: &str, pats: &SplitPatterns) -> Option<usize> {
    for i in 1..toks.len() {
        if pats.year_token.is_match(&toks[i]) {
            if toks[..i].iter().any(|t| is_suffix(&upper_core(t))) {
                continue;
            }
            if i == toks.len() - 1 {
                continue;
            }
            return Some(i);
        }
    }
    None
}

/// First description stopword, unless it still reads as part of the vendor
/// name (trailing comma, or a corporate suffix right after it).
fn stopword(toks: &[String], _text: &str, _pats: &SplitPatterns) -> Option<usize> {
    for i in 1..toks.len() {
        let tok = &toks[i];
        if is_stopword(&tok.trim_matches(',').to_uppercase()) {
            if tok.ends_with(',') {
                continue;
            }
            if i + 1 < toks.len() && is_suffix(&upper_core(&toks[i + 1])) {
                continue;
            }
            return Some(i);
        }
    }
    None
}

/// A date-shaped token or month name marks the description.
fn date_or_month(toks: &[String], _text: &str, pats: &SplitPatterns) -> Option<usize> {
    for i in 1..toks.len() {
        let tok = toks[i].trim_end_matches([',', '.']);
        if pats.date_token.is_match(tok) || is_month(&tok.to_uppercase()) {
            return Some(i);
        }
    }
    None
}

/// First mixed letters-and-digits token (invoice ids, account codes), except
/// `#`-references which belong to the payee.
fn alphanum(toks: &[String], _text: &str, _pats: &SplitPatterns) -> Option<usize> {
    for i in 1..toks.len() {
        let tok = toks[i].trim_end_matches([',', '.']);
        if tok.starts_with('#') {
            continue;
        }
        if has_alpha(tok) && has_digit(tok) {
            return Some(i);
        }
    }
    None
}

/// `#`-reference followed by a word: the description starts after the word.
fn hash_follow(toks: &[String], _text: &str, _pats: &SplitPatterns) -> Option<usize> {
    for i in 1..toks.len().saturating_sub(1) {
        if toks[i].starts_with('#') && is_alpha(&toks[i + 1]) {
            return Some(i + 2);
        }
    }
    None
}

/// Two leading Title-Case words look like a short personal/vendor name.
fn two_title(toks: &[String], _text: &str, _pats: &SplitPatterns) -> Option<usize> {
    if toks.len() >= 2 && is_title(&toks[0]) && is_title(&toks[1]) {
        return Some(2);
    }
    None
}

/// Fixed-width fallback: the description column historically starts around
/// character 45.
fn column_alignment(toks: &[String], _text: &str, _pats: &SplitPatterns) -> Option<usize> {
    let mut pos = 0;
    for (i, tok) in toks.iter().enumerate() {
        pos += tok.chars().count() + 1;
        if pos >= 45 {
            return Some(i + 1);
        }
    }
    None
}

/// Boundary after the last comma-terminated token anywhere in the block.
fn last_comma(toks: &[String], _text: &str, _pats: &SplitPatterns) -> Option<usize> {
    let mut last = None;
    for (i, tok) in toks.iter().enumerate() {
        if tok.ends_with(',') {
            last = Some(i + 1);
        }
    }
    last
}

/// `CITY OF <X>` municipal payees (4 tokens for the SAN cities).
fn city_of(toks: &[String], _text: &str, _pats: &SplitPatterns) -> Option<usize> {
    if toks.len() >= 3 && toks[0].to_uppercase() == "CITY" && toks[1].to_uppercase() == "OF" {
        if toks.len() >= 4 && toks[2].to_uppercase() == "SAN" {
            return Some(4);
        }
        return Some(3);
    }
    None
}

/// A preserved run of 2+ spaces is the original column gap.
fn double_space(_toks: &[String], text: &str, pats: &SplitPatterns) -> Option<usize> {
    pats.double_space
        .find(text)
        .map(|m| text[..m.start()].split_whitespace().count())
}

/// Rightmost corporate suffix ends the payee.
fn suffix(toks: &[String], _text: &str, _pats: &SplitPatterns) -> Option<usize> {
    for i in (0..toks.len()).rev() {
        if is_suffix(&upper_core(&toks[i])) {
            return Some(i + 1);
        }
    }
    None
}

/// Unconditional single-token payee so a winner always exists.
fn default(_toks: &[String], _text: &str, _pats: &SplitPatterns) -> Option<usize> {
    Some(1)
}
