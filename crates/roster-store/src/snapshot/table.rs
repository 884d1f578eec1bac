//! Table model of a staged roster page

use roster_core::model::{EmployeeRecord, FieldRef};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// A staged roster page: ordered field names plus rows in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    fields: Arc<[String]>,
    rows: Vec<SnapshotRow>,
}

/// One staged row, addressable by field name
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    line: u64,
    fields: Arc<[String]>,
    values: Vec<String>,
}

impl Snapshot {
    /// Build a snapshot from fetched records
    ///
    /// The first record defines the columns. Later records are projected onto
    /// them: a missing attribute becomes an empty cell and an attribute outside
    /// the header is dropped. Returns `None` for an empty slice.
    pub fn from_records(records: &[EmployeeRecord]) -> Option<Self> {
        let first = records.first()?;
        let fields: Arc<[String]> = Arc::from(first.field_names());
        let known: HashSet<&str> = fields.iter().map(String::as_str).collect();

        // header is line 1
        let mut next_line = 2;
        let rows = records
            .iter()
            .map(|record| {
                for extra in record.extra.keys() {
                    if !known.contains(extra.as_str()) {
                        tracing::debug!(
                            emp_no = %record.emp_no,
                            field = %extra,
                            "attribute not in snapshot header, dropped"
                        );
                    }
                }
                let values: Vec<String> = fields
                    .iter()
                    .map(|field| render_cell(record.field(field)))
                    .collect();
                let line = next_line;
                next_line += 1 + embedded_newlines(&values);
                SnapshotRow::new(line, fields.clone(), values)
            })
            .collect();

        Some(Self { fields, rows })
    }

    pub(crate) fn from_parts(fields: Arc<[String]>, rows: Vec<SnapshotRow>) -> Self {
        Self { fields, rows }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn rows(&self) -> &[SnapshotRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl SnapshotRow {
    pub(crate) fn new(line: u64, fields: Arc<[String]>, values: Vec<String>) -> Self {
        debug_assert_eq!(fields.len(), values.len());
        Self {
            line,
            fields,
            values,
        }
    }

    /// Line number in the snapshot file where this row starts (header is line 1)
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Cell text for a field, if the snapshot has that column
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .position(|f| f == field)
            .map(|i| self.values[i].as_str())
    }

    /// Cells in column order
    pub fn values(&self) -> &[String] {
        &self.values
    }

}

/// Newlines inside quoted cells, each of which starts a new file line
fn embedded_newlines(values: &[String]) -> u64 {
    values
        .iter()
        .map(|v| v.bytes().filter(|b| *b == b'\n').count() as u64)
        .sum()
}

/// Render one attribute as snapshot cell text
///
/// Booleans as `true`/`false`, integers in decimal, JSON null and absent
/// attributes as the empty cell, nested JSON as compact JSON text.
pub fn render_cell(value: Option<FieldRef<'_>>) -> String {
    match value {
        None => String::new(),
        Some(FieldRef::Text(s)) => s.to_string(),
        Some(FieldRef::Integer(i)) => i.to_string(),
        Some(FieldRef::Boolean(b)) => b.to_string(),
        Some(FieldRef::Json(Value::Null)) => String::new(),
        Some(FieldRef::Json(Value::String(s))) => s.clone(),
        Some(FieldRef::Json(other)) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn employee(emp_no: &str) -> EmployeeRecord {
        EmployeeRecord::new(emp_no, "Given", "Sur", "Pref", "G", "Pos", "PosFr", 1, true, "g@x")
    }

    #[test]
    fn test_empty_records_have_no_snapshot() {
        assert!(Snapshot::from_records(&[]).is_none());
    }

    #[test]
    fn test_first_record_defines_columns() {
        let records = vec![
            employee("1").with_extra("site", json!("Ottawa")),
            employee("2")
                .with_extra("badge", json!(77))
                .with_extra("site", json!("Gatineau")),
            employee("3"),
        ];

        let snapshot = Snapshot::from_records(&records).unwrap();

        assert_eq!(snapshot.fields().len(), 11);
        assert_eq!(snapshot.fields()[10], "site");
        assert_eq!(snapshot.rows()[1].get("site"), Some("Gatineau"));
        assert_eq!(snapshot.rows()[1].get("badge"), None, "dropped");
        assert_eq!(snapshot.rows()[2].get("site"), Some(""), "missing is empty");
        assert!(snapshot
            .rows()
            .iter()
            .all(|r| r.values().len() == snapshot.fields().len()));
    }

    #[test]
    fn test_rows_keep_insertion_order_and_lines() {
        let records = vec![employee("b"), employee("a"), employee("c")];
        let snapshot = Snapshot::from_records(&records).unwrap();

        let keys: Vec<_> = snapshot.rows().iter().map(|r| r.get("empNo").unwrap()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(snapshot.rows()[0].line(), 2);
        assert_eq!(snapshot.rows()[2].line(), 4);
    }

    #[test]
    fn test_lines_account_for_multiline_cells() {
        let mut wrapped = employee("2");
        wrapped.given_name = "two\nthree".to_string();
        wrapped.email = "x\ny".to_string();
        let records = vec![employee("1"), wrapped, employee("3")];

        let snapshot = Snapshot::from_records(&records).unwrap();

        let lines: Vec<_> = snapshot.rows().iter().map(SnapshotRow::line).collect();
        assert_eq!(lines, vec![2, 3, 6]);
    }

    #[test]
    fn test_render_cell_encodings() {
        assert_eq!(render_cell(Some(FieldRef::Boolean(true))), "true");
        assert_eq!(render_cell(Some(FieldRef::Integer(-4))), "-4");
        assert_eq!(render_cell(Some(FieldRef::Json(&json!(null)))), "");
        assert_eq!(render_cell(Some(FieldRef::Json(&json!("x")))), "x");
        assert_eq!(render_cell(Some(FieldRef::Json(&json!([1, 2])))), "[1,2]");
        assert_eq!(render_cell(None), "");
    }
}
