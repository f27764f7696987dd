//! Column inference from word x positions.
//!
//! When the extractor supplies per-word start coordinates, the payee and
//! description columns are still visible in the geometry even though the text
//! layer collapsed them. An exhaustive 1-D two-cluster split over the sorted
//! x positions recovers the column boundary without any text heuristics.

use regex::Regex;

use crate::model::PositionedWord;

/// x-gap at or under which adjacent single letters are one extracted word.
const LETTER_MERGE_GAP: f64 = 6.0;

/// Split a row's positioned words into `(payee, description)`.
///
/// The first line must carry the source-marker anchor (`PAYABLE`); everything
/// before it is row metadata and is skipped. Returns `None` when the anchor is
/// missing or the positions cannot support a two-column reading, so the caller
/// falls back to the text heuristics.
pub(super) fn split_by_column(
    line_words: &[Vec<PositionedWord>],
    amount_token: &Regex,
) -> Option<(String, String)> {
    let first_line = line_words.first()?;

    let mut tokens: Vec<PositionedWord> = Vec::new();
    let mut found_anchor = false;
    for word in first_line {
        if !found_anchor {
            if word.text.eq_ignore_ascii_case("PAYABLE") {
                found_anchor = true;
            }
            continue;
        }
        tokens.push(word.clone());
    }
    if !found_anchor {
        return None;
    }

    for words in &line_words[1..] {
        tokens.extend(words.iter().cloned());
    }
    if tokens.is_empty() {
        return None;
    }

    // The amount is always last and its wide gap would dominate the split.
    if tokens
        .last()
        .is_some_and(|word| amount_token.is_match(&word.text))
    {
        tokens.pop();
    }
    if tokens.is_empty() {
        return None;
    }

    let tokens = squeeze_letters(tokens);

    let mut xs: Vec<f64> = tokens.iter().map(|word| word.x0).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if xs.len() < 2 || xs[0] == xs[xs.len() - 1] {
        return None;
    }

    let threshold = best_two_cluster_threshold(&xs)?;

    // Partition in reading order by each token's own position, not the sort
    // order.
    let payee_tokens: Vec<&str> = tokens
        .iter()
        .filter(|word| word.x0 <= threshold)
        .map(|word| word.text.as_str())
        .collect();
    let desc_tokens: Vec<&str> = tokens
        .iter()
        .filter(|word| word.x0 > threshold)
        .map(|word| word.text.as_str())
        .collect();

    let payee = payee_tokens
        .join(" ")
        .trim()
        .trim_end_matches(',')
        .to_string();
    let desc = desc_tokens.join(" ").trim().to_string();

    if payee.is_empty() && desc.is_empty() {
        return None;
    }
    Some((payee, desc))
}

/// Exhaustive 1-D two-cluster split: choose the boundary over the sorted
/// positions minimizing the summed within-group variance, and return the
/// midpoint of the straddling pair.
fn best_two_cluster_threshold(xs: &[f64]) -> Option<f64> {
    let mut best_cost = f64::INFINITY;
    let mut best_threshold = None;

    for i in 1..xs.len() {
        let (left, right) = xs.split_at(i);
        let cost = sum_squared_deviation(left) + sum_squared_deviation(right);
        if cost < best_cost {
            best_cost = cost;
            best_threshold = Some((xs[i - 1] + xs[i]) / 2.0);
        }
    }

    best_threshold
}

fn sum_squared_deviation(values: &[f64]) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|value| (value - mean).powi(2)).sum()
}

/// Merge runs of adjacent single letters into one reconstructed word.
///
/// Short acronyms such as `P E R S` are sometimes extracted letter-by-letter;
/// the inter-letter gaps can exceed the gap to the description column, so
/// they must be merged before clustering.
fn squeeze_letters(tokens: Vec<PositionedWord>) -> Vec<PositionedWord> {
    let mut squeezed: Vec<PositionedWord> = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let word = &tokens[i];
        let single_letter =
            word.text.chars().count() == 1 && word.text.chars().all(char::is_alphabetic);
        if single_letter {
            let mut letters = word.text.clone();
            let mut x_last = word.x0;
            let mut j = i + 1;
            while j < tokens.len() {
                let next = &tokens[j];
                let next_single =
                    next.text.chars().count() == 1 && next.text.chars().all(char::is_alphabetic);
                if next_single && next.x0 - x_last <= LETTER_MERGE_GAP {
                    letters.push_str(&next.text);
                    x_last = next.x0;
                    j += 1;
                } else {
                    break;
                }
            }
            if j > i + 1 {
                squeezed.push(PositionedWord::new(letters, word.x0));
                i = j;
                continue;
            }
        }
        squeezed.push(word.clone());
        i += 1;
    }

    squeezed
}
