use indexmap::IndexMap;

/// One row of a delimited table, keyed by column name in header order
pub type Row = IndexMap<String, String>;

/// A delimited table: a header plus rows addressed by column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Required columns that are absent from the header, in the order given
    pub fn missing_columns<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| !self.has_column(name))
            .collect()
    }

    /// Values of `row` in header order; absent cells become empty strings
    pub fn record<'r>(&self, row: &'r Row) -> Vec<&'r str> {
        record_for(&self.columns, row)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Values of `row` ordered by `columns`; absent cells become empty strings
pub fn record_for<'r>(columns: &[String], row: &'r Row) -> Vec<&'r str> {
    columns
        .iter()
        .map(|c| row.get(c).map(String::as_str).unwrap_or(""))
        .collect()
}
