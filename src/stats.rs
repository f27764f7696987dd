//! Rollups and totals over parsed entries. Voided rows stay in the dataset
//! but are excluded from every sum.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::model::{CheckEntry, EntryKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterStats {
    pub count: usize,
    pub check_count: usize,
    pub eft_count: usize,
    pub total_nonvoid: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthTotals {
    pub checks: Decimal,
    pub efts: Decimal,
    pub grand: Decimal,
}

pub fn sanity(entries: &[CheckEntry]) -> RegisterStats {
    let mut stats = RegisterStats {
        count: entries.len(),
        check_count: 0,
        eft_count: 0,
        total_nonvoid: Decimal::ZERO,
    };

    for entry in entries {
        match entry.kind {
            EntryKind::Check => stats.check_count += 1,
            EntryKind::Eft => stats.eft_count += 1,
        }
        if !entry.voided {
            stats.total_nonvoid += entry.amount;
        }
    }

    stats
}

/// Per-(year, month) totals, ordered for human review.
pub fn month_rollups(entries: &[CheckEntry]) -> BTreeMap<(u32, u32), MonthTotals> {
    let mut rollups: BTreeMap<(u32, u32), MonthTotals> = BTreeMap::new();

    for entry in entries {
        let totals = rollups
            .entry((entry.section_year, entry.section_month))
            .or_default();
        if entry.voided {
            continue;
        }
        match entry.kind {
            EntryKind::Check => totals.checks += entry.amount,
            EntryKind::Eft => totals.efts += entry.amount,
        }
        totals.grand += entry.amount;
    }

    rollups
}
