//! Column cardinality heuristic
//!
//! Without table statistics the only signal is the column name. Identifier
//! suffixes always mean high cardinality; otherwise a small lexicon of
//! enum-like names marks a column as low cardinality.

/// Suffixes that mark a column as an identifier (checked first).
const IDENTIFIER_SUFFIXES: [&str; 7] = ["_id", "id", "_key", "key", "code", "num", "number"];

/// Substrings of column names that usually hold few distinct values.
const LOW_CARDINALITY_PATTERNS: [&str; 13] = [
    "status", "type", "category", "gender", "priority", "state", "active", "enabled", "flag",
    "role", "level", "tier", "color",
];

/// Estimated cardinality class of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Few distinct values (flags, statuses, categories)
    Low,
    /// Many distinct values (identifiers, free text, measurements)
    High,
}

impl Cardinality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinality::Low => "low",
            Cardinality::High => "high",
        }
    }
}

/// Classifies a column name.
pub fn estimate_cardinality(column: &str) -> Cardinality {
    let name = column.to_lowercase();

    if IDENTIFIER_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
        return Cardinality::High;
    }

    if LOW_CARDINALITY_PATTERNS
        .iter()
        .any(|pattern| name.contains(pattern))
    {
        Cardinality::Low
    } else {
        Cardinality::High
    }
}

/// Returns true if the column is estimated to hold few distinct values.
pub fn is_low_cardinality(column: &str) -> bool {
    estimate_cardinality(column) == Cardinality::Low
}
