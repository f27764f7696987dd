//! CSV and JSON writers for parsed entries.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::model::CheckEntry;
use crate::money::format_amount;
use crate::util::{ensure_directory, write_json_pretty};

const CSV_COLUMNS: [&str; 11] = [
    "section_month",
    "section_year",
    "ap_type",
    "number",
    "date",
    "status",
    "source",
    "payee",
    "description",
    "amount",
    "voided",
];

pub fn write_csv(entries: &[CheckEntry], out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        ensure_directory(parent)?;
    }

    let mut writer = csv::Writer::from_path(out_path)
        .with_context(|| format!("failed to create csv file: {}", out_path.display()))?;

    writer
        .write_record(CSV_COLUMNS)
        .context("failed to write csv header")?;

    for entry in entries {
        writer
            .write_record([
                entry.section_month.to_string(),
                entry.section_year.to_string(),
                entry.kind.as_str().to_string(),
                entry.number.clone(),
                entry.date.clone(),
                entry.status.clone(),
                entry.source.clone(),
                entry.payee.clone(),
                entry.description.clone(),
                format_amount(entry.amount),
                if entry.voided { "Y" } else { "N" }.to_string(),
            ])
            .with_context(|| format!("failed to write csv row for entry {}", entry.number))?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush csv file: {}", out_path.display()))
}

/// JSON mirror of the CSV columns. The amount is downgraded to a float here:
/// this is a display/interchange surface, not the bookkeeping one.
#[derive(Serialize)]
struct JsonEntry<'a> {
    section_month: u32,
    section_year: u32,
    ap_type: &'a str,
    number: &'a str,
    date: &'a str,
    status: &'a str,
    source: &'a str,
    payee: &'a str,
    description: &'a str,
    amount: f64,
    voided: bool,
}

impl<'a> From<&'a CheckEntry> for JsonEntry<'a> {
    fn from(entry: &'a CheckEntry) -> Self {
        Self {
            section_month: entry.section_month,
            section_year: entry.section_year,
            ap_type: entry.kind.as_str(),
            number: &entry.number,
            date: &entry.date,
            status: &entry.status,
            source: &entry.source,
            payee: &entry.payee,
            description: &entry.description,
            amount: entry.amount.to_f64().unwrap_or(0.0),
            voided: entry.voided,
        }
    }
}

pub fn write_json(entries: &[CheckEntry], out_path: &Path) -> Result<()> {
    let rows: Vec<JsonEntry<'_>> = entries.iter().map(JsonEntry::from).collect();
    write_json_pretty(out_path, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntryKind;
    use rust_decimal::Decimal;

    fn entry() -> CheckEntry {
        CheckEntry {
            section_month: 6,
            section_year: 2025,
            kind: EntryKind::Check,
            number: "00042".to_string(),
            date: "06/01/2025".to_string(),
            status: "Open".to_string(),
            source: "Accounts Payable".to_string(),
            payee: "ACME WIDGET LLC".to_string(),
            description: "Toner".to_string(),
            amount: Decimal::new(684750, 2),
            voided: false,
        }
    }

    #[test]
    fn json_rows_carry_float_amounts_and_kind_strings() {
        let binding = [entry()];
        let rows: Vec<JsonEntry<'_>> = binding.iter().map(JsonEntry::from).collect();
        let json = serde_json::to_value(&rows).unwrap();

        assert_eq!(json[0]["ap_type"], "check");
        assert_eq!(json[0]["number"], "00042");
        assert_eq!(json[0]["amount"], 6847.5);
        assert_eq!(json[0]["voided"], false);
    }

    #[test]
    fn csv_file_has_fixed_columns_and_formatting() {
        let dir = std::env::temp_dir().join(format!("checkreg_csv_{}", std::process::id()));
        let path = dir.join("entries.csv");
        write_csv(&[entry()], &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "section_month,section_year,ap_type,number,date,status,source,payee,description,amount,voided"
        );
        assert_eq!(
            lines.next().unwrap(),
            "6,2025,check,00042,06/01/2025,Open,Accounts Payable,ACME WIDGET LLC,Toner,6847.50,N"
        );

        std::fs::remove_dir_all(&dir).ok();
    }
}
