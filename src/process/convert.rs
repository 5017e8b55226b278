use serde::{Deserialize, Serialize};

use crate::process::utils::{clean_str, round_numeric};
use crate::schema::{is_numeric_column, EXTRANEOUS_COLUMN, OUTPUT_WIDTH};

/// A single value written to the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Text(String),
}

impl Cell {
    pub fn empty() -> Self {
        Cell::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Text(s) if s.is_empty())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// One published row, always [`OUTPUT_WIDTH`] cells.
pub type Row = Vec<Cell>;

/// Turn a matching raw record into a sheet row:
/// trim every field, drop column AC when present, fit to A..V,
/// then coerce the numeric columns.
pub fn convert_record<'a, I>(fields: I) -> Row
where
    I: IntoIterator<Item = &'a str>,
{
    let mut cleaned: Vec<String> = fields.into_iter().map(clean_str).collect();

    if cleaned.len() > EXTRANEOUS_COLUMN {
        cleaned.remove(EXTRANEOUS_COLUMN);
    }
    cleaned.truncate(OUTPUT_WIDTH);
    cleaned.resize(OUTPUT_WIDTH, String::new());

    cleaned
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            if is_numeric_column(idx) {
                round_numeric(&value).map(Cell::Int).unwrap_or_else(Cell::empty)
            } else {
                Cell::Text(value)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(width: usize) -> Vec<String> {
        (0..width).map(|i| format!(" v{} ", i)).collect()
    }

    #[test]
    fn wide_records_are_cut_to_a_through_v() {
        let raw = record(30);
        let row = convert_record(raw.iter().map(String::as_str));
        assert_eq!(row.len(), OUTPUT_WIDTH);
        assert_eq!(row[0], Cell::from("v0"));
        assert_eq!(row[21], Cell::from("v21"));
    }

    #[test]
    fn short_records_are_padded_with_blanks() {
        let raw = record(5);
        let row = convert_record(raw.iter().map(String::as_str));
        assert_eq!(row.len(), OUTPUT_WIDTH);
        assert_eq!(row[4], Cell::from("v4"));
        assert!(row[5..].iter().all(Cell::is_empty));
    }

    #[test]
    fn numeric_columns_become_integers_or_blank() {
        let mut raw = vec![String::new(); OUTPUT_WIDTH];
        raw[6] = "12.7".into();
        raw[9] = "abc".into();
        raw[14] = " 3 ".into();
        raw[19] = "".into();
        raw[7] = "12.7".into();
        let row = convert_record(raw.iter().map(String::as_str));

        assert_eq!(row[6], Cell::Int(13));
        assert_eq!(row[9], Cell::empty());
        assert_eq!(row[14], Cell::Int(3));
        assert_eq!(row[19], Cell::empty());
        // non-numeric column keeps the text
        assert_eq!(row[7], Cell::from("12.7"));
    }

    #[test]
    fn missing_tokens_become_empty_text() {
        let mut raw = vec!["x".to_string(); OUTPUT_WIDTH];
        raw[0] = "NULL".into();
        raw[6] = "NaN".into();
        let row = convert_record(raw.iter().map(String::as_str));
        assert_eq!(row[0], Cell::empty());
        assert_eq!(row[6], Cell::empty());
    }

    #[test]
    fn cells_serialize_as_plain_json_values() {
        let row: Row = vec![Cell::from("BGL"), Cell::Int(13), Cell::empty()];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"["BGL",13,""]"#);
    }
}
