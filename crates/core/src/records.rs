//! Record-by-record decoding of JSON arrays
//!
//! External sources occasionally ship a malformed element in an otherwise good
//! array. Each element is decoded on its own so one bad record costs only itself.

use serde::de::DeserializeOwned;

/// Records decoded from an array, plus a description of every element that failed
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecords<T> {
    pub records: Vec<T>,
    pub skipped: Vec<String>,
}

impl<T> Default for ParsedRecords<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> ParsedRecords<T> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Decode every element of `items`, keeping array order for the ones that succeed.
pub fn parse_records<T: DeserializeOwned>(items: Vec<serde_json::Value>) -> ParsedRecords<T> {
    let mut parsed = ParsedRecords::default();

    for (idx, item) in items.into_iter().enumerate() {
        match serde_json::from_value(item) {
            Ok(record) => parsed.records.push(record),
            Err(e) => parsed.skipped.push(format!("record {idx}: {e}")),
        }
    }

    parsed
}
