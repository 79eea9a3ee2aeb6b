use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub label: String,
    pub values: Vec<String>,
}

/// Whitespace separated table with a default for missing cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableData {
    pub default_value: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl TableData {
    pub fn row_index(&self, label: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|r| r.label.eq_ignore_ascii_case(label))
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(label))
    }

    /// Cell value, or the default when the row is short or the position doesn't exist
    pub fn value(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.values.get(column))
            .unwrap_or(&self.default_value)
    }

    /// Lookup by labels. `None` if either label is unknown.
    pub fn value_by_label(&self, row: &str, column: &str) -> Option<&str> {
        Some(self.value(self.row_index(row)?, self.column_index(column)?))
    }
}
