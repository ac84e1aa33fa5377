use crate::error::AnnotationError;
use log::debug;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

pub const ID_COLUMN: &str = "KO";
pub const EVALUE_COLUMN: &str = "E-value";

/// Returns the part of a node id before its first underscore.
///
/// Rendered nodes carry per-occurrence suffixes (`K00001_42`) while
/// annotation rows are keyed on the bare identifier.
pub fn strip_identifier(node_id: &str) -> &str {
    match node_id.find('_') {
        Some(idx) => &node_id[..idx],
        None => node_id,
    }
}

/// E-values keyed by stripped node identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationTable {
    scores: BTreeMap<String, f64>,
}

impl AnnotationTable {
    /// Parses a comma-delimited table with a header row naming `KO` and
    /// `E-value`. Bad rows are skipped; a bad header fails the whole parse.
    pub fn parse_csv(text: &str) -> Result<Self, AnnotationError> {
        Self::from_reader(text.as_bytes())
    }

    /// Same as [`parse_csv`](Self::parse_csv) over raw bytes. Fields are
    /// decoded lossily, so stray non-UTF-8 bytes never reject a row.
    pub fn from_reader<R: io::Read>(input: R) -> Result<Self, AnnotationError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Fields)
            .from_reader(input);

        let headers = reader.byte_headers()?.clone();
        let id_idx = headers.iter().position(|h| h == ID_COLUMN.as_bytes());
        let value_idx = headers.iter().position(|h| h == EVALUE_COLUMN.as_bytes());
        let (Some(id_idx), Some(value_idx)) = (id_idx, value_idx) else {
            return Err(AnnotationError::MissingColumns);
        };

        let mut scores = BTreeMap::new();
        for (row, record) in reader.byte_records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    debug!("skipping annotation row {}: {err}", row + 2);
                    continue;
                }
            };
            let (Some(id), Some(raw_value)) = (record.get(id_idx), record.get(value_idx)) else {
                debug!("skipping short annotation row {}", row + 2);
                continue;
            };
            if id.is_empty() {
                continue;
            }
            let raw_value = String::from_utf8_lossy(raw_value);
            let Some(value) = raw_value.parse::<f64>().ok().filter(|v| !v.is_nan()) else {
                debug!("skipping annotation row {}: bad E-value {raw_value:?}", row + 2);
                continue;
            };
            scores.insert(String::from_utf8_lossy(id).into_owned(), value);
        }

        Ok(Self { scores })
    }

    pub fn from_path(path: &Path) -> Result<Self, AnnotationError> {
        let file = File::open(path).map_err(|source| AnnotationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.scores.get(id).copied()
    }

    /// Looks a rendered node up by its stripped identifier.
    pub fn for_node(&self, node_id: &str) -> Option<f64> {
        self.get(strip_identifier(node_id))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(id, value)| (id.as_str(), *value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_at_first_underscore() {
        assert_eq!(strip_identifier("K00001_42"), "K00001");
        assert_eq!(strip_identifier("K00001_42_foo"), "K00001");
        assert_eq!(strip_identifier("K00001"), "K00001");
        assert_eq!(strip_identifier("_x"), "");
    }

    #[test]
    fn skips_bad_rows() {
        let table = AnnotationTable::parse_csv("KO,E-value\nK00001,1e-10\nK00002,abc\n,1e-5\n").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("K00001"), Some(1e-10));
        assert_eq!(table.get("K00002"), None);
    }

    #[test]
    fn missing_header_columns_fail() {
        let err = AnnotationTable::parse_csv("Foo,Bar\nK00001,1e-10\n").unwrap_err();
        assert!(matches!(err, AnnotationError::MissingColumns));
    }

    #[test]
    fn header_is_case_sensitive() {
        assert!(AnnotationTable::parse_csv("ko,e-value\nK00001,1\n").is_err());
    }

    #[test]
    fn columns_may_appear_in_any_order() {
        let csv = "Sample,E-value,Note,KO\r\nmag1,3.5e-20,x,K00845\r\n\r\nmag1,0.2\r\n";
        let table = AnnotationTable::parse_csv(csv).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.for_node("K00845_3"), Some(3.5e-20));
    }

    #[test]
    fn later_rows_overwrite_earlier() {
        let table = AnnotationTable::parse_csv("KO,E-value\nK1,0.5\nK1,0.25\n").unwrap();
        assert_eq!(table.get("K1"), Some(0.25));
    }

    #[test]
    fn header_names_are_not_trimmed() {
        let err = AnnotationTable::parse_csv(" KO,E-value \nK00001,1e-10\n").unwrap_err();
        assert!(matches!(err, AnnotationError::MissingColumns));
        let table = AnnotationTable::parse_csv("KO,E-value\n K00001 , 1e-10 \n").unwrap();
        assert_eq!(table.get("K00001"), Some(1e-10));
    }

    #[test]
    fn latin1_bytes_do_not_reject_rows() {
        let input: &[u8] = b"KO,E-value,Note\nK00001,1e-10,ok\nK00002,1e-20,caf\xE9\n";
        let table = AnnotationTable::from_reader(input).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("K00002"), Some(1e-20));
    }

    #[test]
    fn latin1_file_keeps_good_rows() {
        let path = std::env::temp_dir().join(format!("pwviz-latin1-{}.csv", std::process::id()));
        std::fs::write(&path, b"KO,E-value,Note\nK00001,1e-10,ok\nK00002,1e-20,caf\xE9\n").unwrap();
        let table = AnnotationTable::from_path(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(table.unwrap().len(), 2);
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(matches!(
            AnnotationTable::parse_csv(""),
            Err(AnnotationError::MissingColumns)
        ));
    }
}
