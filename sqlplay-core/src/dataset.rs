//! Tables and datasets.
//!
//! A [`Dataset`] is built once and never mutated by queries. Table and column
//! names are stored in canonical upper-case so lookups are case-insensitive.

use crate::error::{DatasetError, DatasetResult};
use crate::executor::DataSource;
use crate::lexer::is_keyword;
use crate::value::Value;

/// Returns true for names made only of ASCII letters, digits and `_` that
/// are not query keywords, so every table and column can be named in a query.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !is_keyword(name)
}

/// Canonical form used for table and column lookups.
pub fn canonical(name: &str) -> String {
    name.trim().to_uppercase()
}

/// A named table: a declared column list and rows aligned with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given columns, in declaration order.
    pub fn new<S: AsRef<str>>(name: &str, columns: &[S]) -> DatasetResult<Self> {
        if !is_valid_name(name) {
            return Err(DatasetError::InvalidName(name.to_string()));
        }
        let name = canonical(name);

        let mut canonical_columns: Vec<String> = Vec::with_capacity(columns.len());
        for column in columns {
            let column = column.as_ref();
            if !is_valid_name(column) {
                return Err(DatasetError::InvalidName(column.to_string()));
            }
            let column = canonical(column);
            if canonical_columns.contains(&column) {
                return Err(DatasetError::Format(format!(
                    "column {} is declared twice in table {}",
                    column, name
                )));
            }
            canonical_columns.push(column);
        }

        Ok(Self {
            name,
            columns: canonical_columns,
            rows: Vec::new(),
        })
    }

    /// Append a record. Its values must line up with the declared columns.
    pub fn push_row(&mut self, values: Vec<Value>) -> DatasetResult<()> {
        if values.len() != self.columns.len() {
            return Err(DatasetError::RowArity {
                table: self.name.clone(),
                row: self.rows.len(),
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        if let Some(pos) = values.iter().position(Value::is_null) {
            return Err(DatasetError::InvalidValue {
                table: self.name.clone(),
                column: self.columns[pos].clone(),
                found: "null".to_string(),
            });
        }
        self.rows.push(values);
        Ok(())
    }

    /// Builder form of [`Table::push_row`].
    pub fn with_row(mut self, values: Vec<Value>) -> DatasetResult<Self> {
        self.push_row(values)?;
        Ok(self)
    }

    /// Build a table from JSON records (`[{"COL": value, ...}, ...]`).
    ///
    /// The first record's key order is the declaration order; every other
    /// record must carry the same set of keys.
    pub fn from_json_records(name: &str, records: &[serde_json::Value]) -> DatasetResult<Self> {
        let Some(first) = records.first() else {
            return Table::new::<&str>(name, &[]);
        };
        let first = first.as_object().ok_or_else(|| {
            DatasetError::Format(format!("records of table {} must be objects", name))
        })?;
        let columns: Vec<&str> = first.keys().map(String::as_str).collect();
        let mut table = Table::new(name, &columns)?;

        for (row, record) in records.iter().enumerate() {
            let object = record.as_object().ok_or_else(|| {
                DatasetError::Format(format!("records of table {} must be objects", name))
            })?;
            if object.len() != columns.len() {
                return Err(DatasetError::ColumnMismatch {
                    table: table.name.clone(),
                    row,
                });
            }

            let mut values = Vec::with_capacity(columns.len());
            for column in &columns {
                let raw = object.get(*column).ok_or_else(|| DatasetError::ColumnMismatch {
                    table: table.name.clone(),
                    row,
                })?;
                let value = Value::from_json(raw).ok_or_else(|| DatasetError::InvalidValue {
                    table: table.name.clone(),
                    column: canonical(column),
                    found: raw.to_string(),
                })?;
                values.push(value);
            }
            table.push_row(values)?;
        }

        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, by canonical name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

/// The fixed collection of tables a playground queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    tables: Vec<Table>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table. Names are unique case-insensitively.
    pub fn insert_table(&mut self, table: Table) -> DatasetResult<()> {
        if self.get(table.name()).is_some() {
            return Err(DatasetError::DuplicateTable(table.name().to_string()));
        }
        self.tables.push(table);
        Ok(())
    }

    /// Builder form of [`Dataset::insert_table`].
    pub fn with_table(mut self, table: Table) -> DatasetResult<Self> {
        self.insert_table(table)?;
        Ok(self)
    }

    /// Look up a table by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&Table> {
        let name = canonical(name);
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }

    /// Parse a dataset document: `{"TABLE": [{"COL": value, ...}, ...], ...}`.
    pub fn from_json_str(input: &str) -> DatasetResult<Self> {
        let document: serde_json::Value = serde_json::from_str(input)?;
        Self::from_json(&document)
    }

    pub fn from_json(document: &serde_json::Value) -> DatasetResult<Self> {
        let tables = document.as_object().ok_or_else(|| {
            DatasetError::Format("top level must be an object of tables".to_string())
        })?;

        let mut dataset = Dataset::new();
        for (name, records) in tables {
            let records = records.as_array().ok_or_else(|| {
                DatasetError::Format(format!("table {} must be an array of records", name))
            })?;
            dataset.insert_table(Table::from_json_records(name, records)?)?;
        }
        tracing::debug!(tables = dataset.tables.len(), "Loaded dataset from JSON");
        Ok(dataset)
    }
}

impl DataSource for Dataset {
    fn table(&self, name: &str) -> Option<&Table> {
        self.get(name)
    }

    fn table_names(&self) -> Vec<String> {
        Dataset::table_names(self)
    }
}
