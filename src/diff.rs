//! Diff document model and mapping-table construction.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::RemapError;

/// Lookup from old opcode value to its renumbered replacement.
pub type MappingTable = HashMap<i64, i64>;

/// One renumbering instruction. `old` and `new` carry the textual opcode in
/// their first element; anything after it is ignored.
#[derive(Debug, Deserialize)]
pub struct DiffEntry {
    pub old: Vec<String>,
    pub new: Vec<String>,
}

/// Reads the diff document at `path` and builds the mapping table.
pub fn load_mapping(path: &Path) -> Result<MappingTable, RemapError> {
    let file = File::open(path)?;
    let entries: Vec<DiffEntry> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| RemapError::from_json(path, e))?;
    tracing::debug!(entries = entries.len(), "parsed diff document");
    build_mapping(&entries)
}

/// A duplicated `old` value keeps the last entry, matching insertion into a
/// plain map.
pub fn build_mapping(entries: &[DiffEntry]) -> Result<MappingTable, RemapError> {
    let mut mapping = MappingTable::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let old = first_literal(&entry.old, index, "old")?;
        let new = first_literal(&entry.new, index, "new")?;
        mapping.insert(old, new);
    }
    Ok(mapping)
}

fn first_literal(values: &[String], index: usize, field: &'static str) -> Result<i64, RemapError> {
    let literal = values
        .first()
        .ok_or(RemapError::EmptyDiffField { index, field })?;
    parse_int(literal).map_err(|source| RemapError::BadLiteral {
        index,
        literal: literal.clone(),
        source,
    })
}

/// Base-0 integer parsing: the prefix selects the radix, no prefix means
/// decimal.
fn parse_int(s: &str) -> Result<i64, std::num::ParseIntError> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else if let Some(oct) = s.strip_prefix("0o").or_else(|| s.strip_prefix("0O")) {
        i64::from_str_radix(oct, 8)
    } else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        i64::from_str_radix(bin, 2)
    } else {
        s.parse()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn entries(json: &str) -> Vec<DiffEntry> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_int_bases() {
        assert_eq!(parse_int("16"), Ok(16));
        assert_eq!(parse_int("0x10"), Ok(16));
        assert_eq!(parse_int("0X10"), Ok(16));
        assert_eq!(parse_int("0o20"), Ok(16));
        assert_eq!(parse_int("0b10000"), Ok(16));
        assert!(parse_int("0xzz").is_err());
        assert!(parse_int("").is_err());
    }

    #[test]
    fn test_build_mapping() {
        let entries = entries(r#"[{"old": ["0x05"], "new": ["0x06"]}, {"old": ["7"], "new": ["0x20"]}]"#);
        let mapping = build_mapping(&entries).unwrap();
        assert_eq!(mapping.get(&5), Some(&6));
        assert_eq!(mapping.get(&7), Some(&32));
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn test_duplicate_old_keeps_last() {
        let entries = entries(r#"[{"old": ["1"], "new": ["2"]}, {"old": ["1"], "new": ["3"]}]"#);
        let mapping = build_mapping(&entries).unwrap();
        assert_eq!(mapping.get(&1), Some(&3));
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_trailing_elements_ignored() {
        let entries = entries(r#"[{"old": ["0x05", "LOAD_A"], "new": ["0x06", "LOAD_A"]}]"#);
        let mapping = build_mapping(&entries).unwrap();
        assert_eq!(mapping.get(&5), Some(&6));
    }

    #[test]
    fn test_empty_old_rejected() {
        let entries = entries(r#"[{"old": [], "new": ["3"]}]"#);
        assert!(matches!(
            build_mapping(&entries),
            Err(RemapError::EmptyDiffField { index: 0, field: "old" })
        ));
    }

    #[test]
    fn test_bad_literal_rejected() {
        let entries = entries(r#"[{"old": ["5"], "new": ["six"]}]"#);
        assert!(matches!(
            build_mapping(&entries),
            Err(RemapError::BadLiteral { index: 0, .. })
        ));
    }
}
