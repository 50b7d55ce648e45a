//! Legal-district reference table.
//!
//! The provider keys every request by a 5-character district code taken from
//! the national legal-dong code dataset: a tab-delimited file with one header
//! line, a 10-digit code in the first column and the full district name in
//! the second. Only the first five code characters and the first two name
//! tokens are meaningful here; rows whose name carries fewer than two
//! whitespace-separated tokens are reference noise and are dropped.

use crate::errors::IngestError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One district entry: code plus truncated display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEntry {
    /// 5-character numeric district code.
    pub code: String,
    /// Display name truncated to its first two tokens.
    pub name: String,
}

/// Ordered, read-only mapping from district code to display name.
///
/// Loaded once at process start and passed by reference to the planner;
/// never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    order: Vec<String>,
    names: HashMap<String, String>,
}

impl RegionTable {
    /// Loads the table from a file.
    ///
    /// An absent or unreadable file is a fatal startup error.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| IngestError::Reference(format!("{}: {}", path.display(), e)))?;
        Ok(Self::parse(&raw))
    }

    /// Parses the raw tab-delimited dataset.
    ///
    /// The first line is a header. Many source rows share a district prefix
    /// (one row per sub-district); duplicates keep their first insertion
    /// position and the last name seen.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut table = Self::default();
        for line in raw.lines().skip(1) {
            let mut fields = line.split('\t');
            let (Some(code_field), Some(name_field)) = (fields.next(), fields.next()) else {
                continue;
            };
            let Some(code) = code_field.get(..5) else {
                continue;
            };
            let mut tokens = name_field.split_whitespace();
            let (Some(first), Some(second)) = (tokens.next(), tokens.next()) else {
                continue;
            };
            table.insert(code, format!("{first} {second}"));
        }
        table
    }

    fn insert(&mut self, code: &str, name: String) {
        if !self.names.contains_key(code) {
            self.order.push(code.to_string());
        }
        self.names.insert(code.to_string(), name);
    }

    /// Returns the number of districts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no districts were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Looks up the display name for a code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Iterates district codes in insertion order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Returns all entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<RegionEntry> {
        self.order
            .iter()
            .filter_map(|code| {
                self.names.get(code).map(|name| RegionEntry {
                    code: code.clone(),
                    name: name.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\u{bc95}\u{c815}\u{b3d9}\u{cf54}\u{b4dc}\t\u{bc95}\u{c815}\u{b3d9}\u{ba85}\n\
        1150000000\tSeoul Gangseo-gu\n\
        1150010100\tSeoul Gangseo-gu Yeomchang-dong\n\
        4100000000\tGyeonggi-do\n\
        2644000000\tBusan Gangseo-gu\n";

    #[test]
    fn test_parse_skips_header_and_truncates_names() {
        let table = RegionTable::parse(SAMPLE);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("11500"), Some("Seoul Gangseo-gu"));
        assert_eq!(table.get("26440"), Some("Busan Gangseo-gu"));
    }

    #[test]
    fn test_parse_drops_single_token_names() {
        let table = RegionTable::parse(SAMPLE);

        // "Gyeonggi-do" has a single token and is reference noise.
        assert_eq!(table.get("41000"), None);
    }

    #[test]
    fn test_parse_truncates_to_first_two_tokens() {
        let table = RegionTable::parse(SAMPLE);

        // The sub-district row collapses onto the district prefix and its
        // name is cut at two tokens.
        assert_eq!(table.get("11500"), Some("Seoul Gangseo-gu"));
    }

    #[test]
    fn test_parse_preserves_insertion_order() {
        let table = RegionTable::parse(SAMPLE);

        let codes: Vec<&str> = table.codes().collect();
        assert_eq!(codes, vec!["11500", "26440"]);
    }

    #[test]
    fn test_duplicate_codes_keep_first_position() {
        let raw = "header\n\
            1150000000\tSeoul Gangseo-gu\n\
            2644000000\tBusan Gangseo-gu\n\
            1150099999\tSeoul Renamed-gu Annex\n";
        let table = RegionTable::parse(raw);

        let codes: Vec<&str> = table.codes().collect();
        assert_eq!(codes, vec!["11500", "26440"]);
        // Last name wins, position does not move.
        assert_eq!(table.get("11500"), Some("Seoul Renamed-gu"));
    }

    #[test]
    fn test_parse_tolerates_short_and_empty_rows() {
        let raw = "header\n\n123\tShort Code\nonly-one-field\n";
        let table = RegionTable::parse(raw);
        assert!(table.is_empty());
    }

    #[test]
    fn test_entries_round_trip() {
        let table = RegionTable::parse(SAMPLE);
        let entries = table.entries();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].code, "11500");
        assert_eq!(entries[0].name, "Seoul Gangseo-gu");
    }

    #[test]
    fn test_from_path_missing_file_is_fatal() {
        let err = RegionTable::from_path("/nonexistent/bjdcode.txt").unwrap_err();
        assert!(matches!(err, IngestError::Reference(_)));
        assert!(!err.is_skippable());
    }

    #[test]
    fn test_from_path_reads_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();

        let table = RegionTable::from_path(file.path()).unwrap();
        assert_eq!(table.len(), 2);
    }
}
