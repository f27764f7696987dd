//! Payee quadtree: a recursive rectangle layout of payees sized by total
//! dollar amount, rendered as a static HTML page with inline SVG.
//!
//! The layout greedily balances weights two ways, then four ways, and recurses
//! into each quadrant, so every payee's area is proportional to its share of
//! the non-voided total. Ordering is fully deterministic (value descending,
//! name ascending on ties).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::model::CheckEntry;
use crate::money::format_amount;
use crate::util::ensure_directory;

const SVG_WIDTH: f64 = 960.0;
const SVG_HEIGHT: f64 = 600.0;

/// One laid-out rectangle in the unit square, with its hover data.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadRect {
    pub payee: String,
    pub amount: f64,
    pub percent: f64,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// `number: $amount` per contributing check, populated only when more
    /// than one check rolled up into this payee.
    pub checks: String,
    pub descriptions: String,
}

type Item = (String, f64);

struct RawRect {
    label: String,
    value: f64,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

#[derive(Default)]
struct PayeeRoll {
    total: Decimal,
    checks: Vec<String>,
    descriptions: Vec<String>,
}

pub fn build_payee_quadtree(entries: &[CheckEntry]) -> Vec<QuadRect> {
    let mut rolls: BTreeMap<&str, PayeeRoll> = BTreeMap::new();
    for entry in entries {
        if entry.voided {
            continue;
        }
        let roll = rolls.entry(entry.payee.as_str()).or_default();
        roll.total += entry.amount;
        roll.checks
            .push(format!("{}: ${}", entry.number, format_amount(entry.amount)));
        if !entry.description.is_empty() {
            roll.descriptions.push(entry.description.clone());
        }
    }

    let mut items: Vec<Item> = rolls
        .iter()
        .filter_map(|(name, roll)| {
            let value = roll.total.to_f64().unwrap_or(0.0);
            (value > 0.0).then(|| (name.to_string(), value))
        })
        .collect();
    items.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut raw = Vec::new();
    draw(&items, 0.0, 0.0, 1.0, 1.0, &mut raw);

    let total_amount: f64 = raw.iter().map(|r| r.value).sum();
    raw.into_iter()
        .map(|r| {
            let roll = rolls.get(r.label.as_str());
            let (checks, descriptions) = match roll {
                Some(roll) => (
                    if roll.checks.len() > 1 {
                        roll.checks.join("; ")
                    } else {
                        String::new()
                    },
                    roll.descriptions.join("; "),
                ),
                None => (String::new(), String::new()),
            };
            QuadRect {
                payee: r.label,
                amount: r.value,
                percent: if total_amount > 0.0 {
                    r.value / total_amount * 100.0
                } else {
                    0.0
                },
                x: r.x,
                y: r.y,
                w: r.w,
                h: r.h,
                checks,
                descriptions,
            }
        })
        .collect()
}

pub fn write_payee_quadtree_html(entries: &[CheckEntry], out_path: &Path) -> Result<()> {
    let rects = build_payee_quadtree(entries);
    let html = render_html(&rects);

    if let Some(parent) = out_path.parent() {
        ensure_directory(parent)?;
    }
    fs::write(out_path, html)
        .with_context(|| format!("failed to write quadtree html: {}", out_path.display()))
}

/// Distribute items between two groups, heaviest first, always into the
/// lighter group.
fn greedy_split_2(items: &[Item]) -> (Vec<Item>, Vec<Item>, f64, f64) {
    let mut sorted: Vec<&Item> = items.iter().collect();
    sorted.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut sum_left = 0.0;
    let mut sum_right = 0.0;
    for item in sorted {
        if sum_left <= sum_right {
            left.push(item.clone());
            sum_left += item.1;
        } else {
            right.push(item.clone());
            sum_right += item.1;
        }
    }

    (left, right, sum_left, sum_right)
}

#[allow(clippy::type_complexity)]
fn greedy_split_4(
    items: &[Item],
) -> (
    (Vec<Item>, f64),
    (Vec<Item>, f64),
    (Vec<Item>, f64),
    (Vec<Item>, f64),
    f64,
    f64,
) {
    let (left_items, right_items, sum_left, sum_right) = greedy_split_2(items);
    let (nw, sw, nw_sum, sw_sum) = greedy_split_2(&left_items);
    let (ne, se, ne_sum, se_sum) = greedy_split_2(&right_items);
    (
        (nw, nw_sum),
        (sw, sw_sum),
        (ne, ne_sum),
        (se, se_sum),
        sum_left,
        sum_right,
    )
}

fn draw(items: &[Item], x: f64, y: f64, width: f64, height: f64, rects: &mut Vec<RawRect>) {
    let total: f64 = items.iter().map(|item| item.1).sum();
    if items.is_empty() || total <= 0.0 {
        return;
    }
    if let [only] = items {
        rects.push(RawRect {
            label: only.0.clone(),
            value: only.1,
            x,
            y,
            w: width,
            h: height,
        });
        return;
    }

    let (nw, sw, ne, se, sum_left, sum_right) = greedy_split_4(items);
    let left_fraction = sum_left / total;
    let split_x = width * left_fraction;

    let top_fraction_left = if sum_left > 0.0 { nw.1 / sum_left } else { 0.5 };
    let top_fraction_right = if sum_right > 0.0 { ne.1 / sum_right } else { 0.5 };
    let top_height_left = height * top_fraction_left;
    let top_height_right = height * top_fraction_right;

    draw(&nw.0, x, y + height - top_height_left, split_x, top_height_left, rects);
    draw(&sw.0, x, y, split_x, height - top_height_left, rects);
    draw(
        &ne.0,
        x + split_x,
        y + height - top_height_right,
        width - split_x,
        top_height_right,
        rects,
    );
    draw(
        &se.0,
        x + split_x,
        y,
        width - split_x,
        height - top_height_right,
        rects,
    );
}

fn render_html(rects: &[QuadRect]) -> String {
    let low = rects.iter().map(|r| r.amount).fold(f64::INFINITY, f64::min);
    let high = rects
        .iter()
        .map(|r| r.amount)
        .fold(f64::NEG_INFINITY, f64::max);

    let mut svg = String::new();
    for rect in rects {
        let px = rect.x * SVG_WIDTH;
        let pw = rect.w * SVG_WIDTH;
        let ph = rect.h * SVG_HEIGHT;
        // Unit-square y grows upward; SVG y grows downward.
        let py = (1.0 - rect.y - rect.h) * SVG_HEIGHT;

        let mut tooltip = format!(
            "{}\nTotal: ${:.2}\nShare: {:.1}%",
            rect.payee, rect.amount, rect.percent
        );
        if !rect.checks.is_empty() {
            tooltip.push_str(&format!("\nChecks: {}", rect.checks));
        }
        if !rect.descriptions.is_empty() {
            tooltip.push_str(&format!("\nDescriptions: {}", rect.descriptions));
        }

        svg.push_str(&format!(
            "  <rect x=\"{px:.2}\" y=\"{py:.2}\" width=\"{pw:.2}\" height=\"{ph:.2}\" \
             fill=\"{}\" fill-opacity=\"0.9\" stroke=\"white\" stroke-width=\"1\">\
             <title>{}</title></rect>\n",
            amount_color(rect.amount, low, high),
            escape_html(&tooltip),
        ));

        // Label only when it plausibly fits.
        let label_width = 7.0 * rect.payee.chars().count() as f64;
        if pw >= label_width + 4.0 && ph >= 14.0 {
            svg.push_str(&format!(
                "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" \
                 dominant-baseline=\"middle\" font-size=\"11\" fill=\"white\">{}</text>\n",
                px + pw / 2.0,
                py + ph / 2.0,
                escape_html(&rect.payee),
            ));
        }
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Payees by Dollar Amount</title>\n\
         <style>body {{ font-family: sans-serif; margin: 16px; }}</style>\n\
         </head>\n<body>\n\
         <svg viewBox=\"0 0 {SVG_WIDTH} {SVG_HEIGHT}\" width=\"{SVG_WIDTH}\" height=\"{SVG_HEIGHT}\">\n{svg}</svg>\n\
         </body>\n</html>\n"
    )
}

/// Linear color ramp so larger dollar amounts stand out.
fn amount_color(amount: f64, low: f64, high: f64) -> String {
    let t = if high > low {
        ((amount - low) / (high - low)).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        lerp(68.0, 253.0),
        lerp(1.0, 231.0),
        lerp(84.0, 37.0)
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntryKind;

    fn entry(number: &str, payee: &str, description: &str, cents: i64, voided: bool) -> CheckEntry {
        CheckEntry {
            section_month: 6,
            section_year: 2025,
            kind: EntryKind::Check,
            number: number.to_string(),
            date: "06/01/2025".to_string(),
            status: "Open".to_string(),
            source: "Accounts Payable".to_string(),
            payee: payee.to_string(),
            description: description.to_string(),
            amount: Decimal::new(cents, 2),
            voided,
        }
    }

    fn sample() -> Vec<CheckEntry> {
        vec![
            entry("1", "Alpha", "foo", 10000, false),
            entry("2", "Alpha", "bar", 5000, false),
            entry("3", "Beta", "baz", 1000, false),
        ]
    }

    #[test]
    fn multi_check_payees_carry_hover_details() {
        let rects = build_payee_quadtree(&sample());
        let alpha = rects.iter().find(|r| r.payee == "Alpha").unwrap();
        assert!(alpha.checks.contains("1: $100.00"));
        assert!(alpha.checks.contains("2: $50.00"));
        assert!(alpha.descriptions.contains("foo"));
        assert!(alpha.descriptions.contains("bar"));
        assert!((alpha.amount - 150.0).abs() < 1e-9);

        let beta = rects.iter().find(|r| r.payee == "Beta").unwrap();
        assert_eq!(beta.checks, "");
        assert_eq!(beta.descriptions, "baz");
    }

    #[test]
    fn voided_and_nonpositive_payees_are_excluded() {
        let entries = vec![
            entry("1", "Alpha", "", 10000, false),
            entry("2", "Ghost", "", 5000, true),
            entry("3", "Refund", "", -2000, false),
        ];
        let rects = build_payee_quadtree(&entries);
        let names: Vec<&str> = rects.iter().map(|r| r.payee.as_str()).collect();
        assert_eq!(names, vec!["Alpha"]);
    }

    #[test]
    fn layout_covers_the_unit_square() {
        let rects = build_payee_quadtree(&sample());
        let area: f64 = rects.iter().map(|r| r.w * r.h).sum();
        assert!((area - 1.0).abs() < 1e-9, "area was {area}");

        let alpha = rects.iter().find(|r| r.payee == "Alpha").unwrap();
        let beta = rects.iter().find(|r| r.payee == "Beta").unwrap();
        assert!(alpha.w * alpha.h > beta.w * beta.h);
    }

    #[test]
    fn layout_is_deterministic() {
        let first = build_payee_quadtree(&sample());
        let second = build_payee_quadtree(&sample());
        assert_eq!(first, second);
    }

    #[test]
    fn html_escapes_payee_names() {
        let entries = vec![entry("1", "A&B <Co>", "", 10000, false)];
        let html = render_html(&build_payee_quadtree(&entries));
        assert!(html.contains("<svg"));
        assert!(html.contains("A&amp;B &lt;Co&gt;"));
        assert!(!html.contains("A&B <Co>"));
    }
}
