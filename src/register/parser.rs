//! Turns one [`RowChunk`] into a [`CheckEntry`].

use anyhow::Result;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::model::{CheckEntry, RowChunk};
use crate::money::parse_currency;
use crate::splitter::PayeeSplitter;

use super::RegisterPatterns;

/// The chunk's first line did not match the register row anchor. Carries the
/// offending line so callers can log-and-skip or abort with context.
#[derive(Debug, Error)]
#[error("register row does not match the expected anchor pattern: {line:?}")]
pub struct MalformedRowError {
    pub line: String,
}

pub struct RegisterParser<'a> {
    patterns: &'a RegisterPatterns,
    splitter: PayeeSplitter,
}

impl<'a> RegisterParser<'a> {
    pub fn new(patterns: &'a RegisterPatterns) -> Result<Self> {
        Ok(Self {
            patterns,
            splitter: PayeeSplitter::new()?,
        })
    }

    /// Parse every chunk, logging and skipping malformed rows so one bad row
    /// cannot take down the batch.
    pub fn parse_chunks(&self, chunks: &[RowChunk]) -> Vec<CheckEntry> {
        let mut entries = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            match self.parse_chunk(chunk) {
                Ok(entry) => entries.push(entry),
                Err(err) => warn!(line = %err.line, "skipping malformed row chunk"),
            }
        }
        entries
    }

    /// Parse a single chunk.
    ///
    /// A missing amount is not an error: the entry is emitted with a zero
    /// amount (and a warning) so the row is not silently dropped.
    pub fn parse_chunk(&self, chunk: &RowChunk) -> Result<CheckEntry, MalformedRowError> {
        let first = chunk.lines.first().map(|l| l.trim_end()).unwrap_or("");
        let caps = self
            .patterns
            .row_start
            .captures(first)
            .ok_or_else(|| MalformedRowError {
                line: first.to_string(),
            })?;

        let number = caps[1].trim().to_string();
        let date = caps[2].trim().to_string();
        let status = caps[3].trim().to_string();
        let source = caps[4].trim().to_string();
        let rest = caps.get(5).map(|m| m.as_str()).unwrap_or("");

        let voided = chunk
            .lines
            .iter()
            .any(|line| self.patterns.void_marker.is_match(line))
            || status.to_uppercase().contains("VOID");

        let (amount, block) = self.amount_and_block(rest, &chunk.lines[1..]);
        if amount.is_none() {
            warn!(number = %number, date = %date, "row has no amount; defaulting to zero");
        }
        let amount = amount.unwrap_or(Decimal::ZERO);

        let (payee, description) = match &chunk.line_words {
            Some(line_words) => self
                .splitter
                .split_by_column(line_words)
                .unwrap_or_else(|| self.splitter.split_block(&block)),
            None => self.splitter.split_block(&block),
        };

        Ok(CheckEntry {
            section_month: chunk.section_month,
            section_year: chunk.section_year,
            kind: chunk.kind,
            number,
            date,
            status,
            source,
            payee,
            description,
            amount,
            voided,
        })
    }

    /// Locate the trailing amount (first-line remainder, then continuation
    /// lines in order) and assemble the residual payee/description block from
    /// everything before it.
    fn amount_and_block(&self, rest: &str, continuations: &[String]) -> (Option<Decimal>, String) {
        let mut parts: Vec<String> = Vec::new();

        if let Some(found) = self.patterns.amount_tail.find(rest.trim_end()) {
            let lead = rest[..found.start()].trim();
            if !lead.is_empty() {
                parts.push(lead.to_string());
            }
            return (self.decode_amount(found.as_str()), parts.join(" "));
        }

        parts.push(rest.trim().to_string());
        for line in continuations {
            let text = line.trim_end();
            if let Some(found) = self.patterns.amount_tail.find(text) {
                let lead = text[..found.start()].trim();
                if !lead.is_empty() {
                    parts.push(lead.to_string());
                }
                return (self.decode_amount(found.as_str()), parts.join(" "));
            }
            parts.push(text.trim().to_string());
        }

        (None, parts.join(" "))
    }

    fn decode_amount(&self, token: &str) -> Option<Decimal> {
        match parse_currency(token) {
            Ok(amount) => Some(amount),
            Err(_) => {
                warn!(token = %token, "unparseable amount token; defaulting to zero");
                Some(Decimal::ZERO)
            }
        }
    }
}
