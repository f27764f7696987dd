//! Curated vocabularies backing the boundary heuristics.
//!
//! These lists are calibration data tuned against archived registers; changes
//! here shift split accuracy and should be validated against the regression
//! fixtures.

/// Multi-word vendor names that always form the entire payee.
pub const KNOWN_PREFIXES: &[&str] = &[
    "ALAMEDA COUNTY FIRE DEPARTMENT",
    "BAY AREA NEWS GROUP",
    "DIEGO TRUCK REPAIR",
    "L.N. CURTIS & SONS",
    "J & O'S COMMERCIAL TIRE CENTER",
    "MUNICIPAL POOLING AUTHORITY",
    "KAISER FOUNDATION HEALTH PLAN",
    "EAST BAY REGIONAL COMMUNICATIONS SYSTEM",
    "CONTRA COSTA HEALTH SERVICES",
    "GHIRARDELLI ASSOCIATES",
    "FLOCK SAFETY",
    "PERS",
];

/// Corporate suffix tokens that terminate a vendor name.
pub const SUFFIXES: &[&str] = &[
    "LLP",
    "LLC",
    "INC",
    "CORP",
    "CORPORATION",
    "CO",
    "COMPANY",
    "LTD",
    "ASSOCIATES",
    "SUPPLY",
    "SERVICE",
    "SERVICES",
    "MANAGEMENT",
    "ELECTRIC",
];

/// Tokens that almost always open the free-text description.
pub const STOPWORDS: &[&str] = &[
    "MERCHANT",
    "OFFICE",
    "SUPPLIES",
    "EXPENSE",
    "FEE",
    "FEES",
    "PAYMENT",
    "RE",
    "RE:",
    "TOTAL",
    "REIMBURSEMENT",
    "REIMBURSE",
    "PERFORMANCE",
    "CONTRACT",
    "RENTAL",
    "PROGRAM",
    "TRAINING",
    "PER",
    "DIEM",
    "INVOICE",
    "PROFESSIONAL",
    "TUITION",
];

/// Month names and abbreviations as they appear inside descriptions.
pub const MONTHS: &[&str] = &[
    "JAN",
    "JANUARY",
    "FEB",
    "FEBRUARY",
    "MAR",
    "MARCH",
    "APR",
    "APRIL",
    "MAY",
    "JUN",
    "JUNE",
    "JUL",
    "JULY",
    "AUG",
    "AUGUST",
    "SEP",
    "SEPT",
    "SEPTEMBER",
    "OCT",
    "OCTOBER",
    "NOV",
    "NOVEMBER",
    "DEC",
    "DECEMBER",
];

/// Membership check against an uppercased, punctuation-stripped token.
pub fn is_suffix(upper: &str) -> bool {
    SUFFIXES.contains(&upper)
}

pub fn is_stopword(upper: &str) -> bool {
    STOPWORDS.contains(&upper)
}

pub fn is_month(upper: &str) -> bool {
    MONTHS.contains(&upper)
}

/// True when a reconstructed letter run (e.g. `PERS`) names a known vendor.
pub fn is_known_prefix(upper: &str) -> bool {
    KNOWN_PREFIXES.contains(&upper)
}
