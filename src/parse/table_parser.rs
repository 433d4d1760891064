use crate::model::table::{Row, Table};

/// Error type for delimited table parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("table is empty (no header line)")]
    Empty,
    #[error("unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },
    #[error("duplicate column '{0}' in header")]
    DuplicateColumn(String),
    #[error("record {record} has {found} fields but the header has {expected}")]
    TooManyFields {
        record: usize,
        expected: usize,
        found: usize,
    },
}

/// Split comma-delimited text into records of raw fields.
///
/// Quoted fields may contain commas, doubled quotes and line breaks. Blank
/// lines are skipped. Both `\n` and `\r\n` end a record.
pub fn parse_records(text: &str) -> Result<Vec<Vec<String>>, TableError> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut line = 1;
    let mut quote_line = 1;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
                quote_line = line;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                finish_record(&mut records, &mut record, &mut field, quoted);
                quoted = false;
                line += 1;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(TableError::UnterminatedQuote { line: quote_line });
    }
    finish_record(&mut records, &mut record, &mut field, quoted);
    Ok(records)
}

fn finish_record(
    records: &mut Vec<Vec<String>>,
    record: &mut Vec<String>,
    field: &mut String,
    quoted: bool,
) {
    // A bare empty line is not a record
    if record.is_empty() && field.is_empty() && !quoted {
        return;
    }
    record.push(std::mem::take(field));
    records.push(std::mem::take(record));
}

/// Parse a table whose first record is the header.
///
/// Records shorter than the header are padded with empty cells; longer
/// records are an error since their extra values have no column.
pub fn parse_table(text: &str) -> Result<Table, TableError> {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let mut records = parse_records(text)?.into_iter();
    let columns = records.next().ok_or(TableError::Empty)?;

    for (i, name) in columns.iter().enumerate() {
        if columns[..i].contains(name) {
            return Err(TableError::DuplicateColumn(name.clone()));
        }
    }

    let mut table = Table::new(columns);
    for (i, record) in records.enumerate() {
        if record.len() > table.columns.len() {
            return Err(TableError::TooManyFields {
                record: i + 1,
                expected: table.columns.len(),
                found: record.len(),
            });
        }
        let mut row = Row::with_capacity(table.columns.len());
        let mut values = record.into_iter();
        for column in &table.columns {
            row.insert(column.clone(), values.next().unwrap_or_default());
        }
        table.rows.push(row);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_plain_records() {
        let records = parse_records("a,b\n1,2\n").unwrap();
        assert_eq!(records, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn quoted_fields_keep_commas_quotes_and_newlines() {
        let records = parse_records("x\n\"one, two\"\n\"say \"\"hi\"\"\"\n\"multi\nline\"\n").unwrap();
        assert_eq!(
            records,
            vec![
                vec!["x".to_string()],
                vec!["one, two".to_string()],
                vec!["say \"hi\"".to_string()],
                vec!["multi\nline".to_string()],
            ]
        );
    }

    #[test]
    fn crlf_and_missing_trailing_newline() {
        let records = parse_records("a,b\r\n1,2").unwrap();
        assert_eq!(records, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn blank_lines_are_skipped_but_empty_quoted_field_is_not() {
        let records = parse_records("a\n\n\"\"\n").unwrap();
        assert_eq!(records, vec![vec!["a".to_string()], vec![String::new()]]);
    }

    #[test]
    fn trailing_empty_field_is_kept() {
        let records = parse_records("a,b,\n").unwrap();
        assert_eq!(records, vec![vec!["a", "b", ""]]);
    }

    #[test]
    fn unterminated_quote_reports_line() {
        let err = parse_records("a\n\"open\n").unwrap_err();
        assert_eq!(err, TableError::UnterminatedQuote { line: 2 });
    }

    #[test]
    fn table_maps_rows_by_column() {
        let table = parse_table("\u{FEFF}name,count\nfoo,3\nbar\n").unwrap();
        assert_eq!(table.columns, vec!["name", "count"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["count"], "3");
        assert_eq!(table.rows[1]["name"], "bar");
        assert_eq!(table.rows[1]["count"], "");
    }

    #[test]
    fn table_rejects_extra_fields() {
        let err = parse_table("a,b\n1,2,3\n").unwrap_err();
        assert_eq!(
            err,
            TableError::TooManyFields {
                record: 1,
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn table_rejects_duplicate_columns() {
        let err = parse_table("a,a\n").unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("a".into()));
    }

    #[test]
    fn unnamed_index_column_is_kept() {
        let table = parse_table(",Start Frame index,End Frame index\n0,10,20\n").unwrap();
        assert_eq!(table.columns[0], "");
        assert_eq!(table.rows[0][""], "0");
        assert_eq!(table.rows[0]["End Frame index"], "20");
    }

    #[test]
    fn empty_text_has_no_header() {
        assert_eq!(parse_table("").unwrap_err(), TableError::Empty);
    }
}
