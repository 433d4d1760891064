use std::borrow::Cow;

use crate::model::table::Table;

/// Quote a field when it contains a delimiter, quote or line break.
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Serialize one record, terminated by `\n`.
pub fn serialize_record<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// Serialize a whole table: header record followed by every row.
pub fn serialize_table(table: &Table) -> String {
    let mut out = serialize_record(&table.columns);
    for row in &table.rows {
        out.push_str(&serialize_record(&table.record(row)));
    }
    out
}

/// Format a float so that parsing it back yields the same value.
pub fn format_float(value: f64) -> String {
    // Display on f64 is the shortest representation that round-trips
    let s = value.to_string();
    if s.contains(['.', 'e', 'E']) || !value.is_finite() {
        s
    } else {
        format!("{}.0", s)
    }
}
