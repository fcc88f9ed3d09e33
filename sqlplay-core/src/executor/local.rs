//! Query executor over a borrowed data source.

use super::{DataSource, ExecutorOptions, Predicate, QueryResult, EMPTY_TABLE_HEADER};
use crate::ast::{OrderByItem, Projection, SelectStatement, StatementKind};
use crate::dataset::{canonical, Dataset, Table};
use crate::error::{ExecResult, QueryError};
use crate::parser::{classify, normalize, parse};
use crate::value::Value;

type Row = Vec<Value>;

/// Executes playground queries against a data source it only borrows.
///
/// Each call to [`execute`](QueryExecutor::execute) is independent: the data
/// source is never modified, including by simulated DML.
pub struct QueryExecutor<'a, D: DataSource + ?Sized = Dataset> {
    source: &'a D,
    options: ExecutorOptions,
}

impl<'a, D: DataSource + ?Sized> QueryExecutor<'a, D> {
    pub fn new(source: &'a D) -> Self {
        Self::with_options(source, ExecutorOptions::default())
    }

    pub fn with_options(source: &'a D, options: ExecutorOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> ExecutorOptions {
        self.options
    }

    /// Run one query.
    ///
    /// Pipeline: normalize whitespace, classify the command, parse, resolve
    /// the table, filter, order, project.
    pub fn execute(&self, query: &str) -> ExecResult<QueryResult> {
        let normalized = normalize(query);
        let statement = classify(&normalized)?;

        if statement.is_simulated() {
            tracing::debug!(%statement, "Acknowledging simulated statement");
            return Ok(QueryResult::acknowledgement(statement));
        }

        let select = parse(&normalized)?;
        self.execute_select(&select)
    }

    /// Run an already parsed `SELECT`.
    pub fn execute_select(&self, select: &SelectStatement) -> ExecResult<QueryResult> {
        let table = self.resolve_table(&select.table)?;
        let mut rows: Vec<&Row> = table.rows().iter().collect();
        tracing::trace!(table = table.name(), rows = rows.len(), "Scanning table");

        if let Some(clause) = &select.predicate {
            rows = self.filter(table, clause, rows)?;
            tracing::trace!(predicate = %clause, rows = rows.len(), "Applied predicate");
        }

        if let Some(order_by) = &select.order_by {
            self.sort(table, order_by, &mut rows)?;
        }

        let result = self.project(table, &select.projection, &rows)?;
        tracing::debug!(
            table = table.name(),
            columns = result.headers.len(),
            rows = result.rows.len(),
            "Executed SELECT"
        );
        Ok(result)
    }

    fn resolve_table(&self, name: &str) -> ExecResult<&'a Table> {
        self.source
            .table(&canonical(name))
            .ok_or_else(|| QueryError::UnknownTable {
                table: name.to_string(),
                available: self.source.table_names(),
            })
    }

    fn unknown_column(&self, table: &Table, column: &str) -> QueryError {
        QueryError::UnknownColumn {
            column: column.to_string(),
            table: table.name().to_string(),
        }
    }

    fn filter<'t>(
        &self,
        table: &Table,
        clause: &str,
        rows: Vec<&'t Row>,
    ) -> ExecResult<Vec<&'t Row>> {
        let Some(predicate) = Predicate::parse(clause) else {
            if self.options.strict {
                return Err(QueryError::UnsupportedPredicate(format!(
                    "no supported operator (=, >, <, LIKE) in '{}'",
                    clause
                )));
            }
            tracing::warn!(predicate = %clause, "No supported operator in predicate, ignoring it");
            return Ok(rows);
        };

        let Some(idx) = table.column_index(&predicate.column) else {
            if self.options.strict {
                return Err(if predicate.column.is_empty() {
                    QueryError::UnsupportedPredicate(format!("missing column before {}", predicate.op))
                } else {
                    self.unknown_column(table, &predicate.column)
                });
            }
            // a column the rows do not have excludes them all
            return Ok(Vec::new());
        };

        Ok(rows
            .into_iter()
            .filter(|row| predicate.matches(&row[idx]))
            .collect())
    }

    fn sort(&self, table: &Table, order_by: &OrderByItem, rows: &mut [&Row]) -> ExecResult<()> {
        let column = canonical(&order_by.column);
        let Some(idx) = table.column_index(&column) else {
            if self.options.strict {
                return Err(self.unknown_column(table, &column));
            }
            return Ok(());
        };

        // stable: equal keys keep their input order in both directions
        rows.sort_by(|a, b| {
            let ordering = a[idx].sort_cmp(&b[idx]);
            if order_by.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        Ok(())
    }

    fn project(
        &self,
        table: &Table,
        projection: &Projection,
        rows: &[&Row],
    ) -> ExecResult<QueryResult> {
        let (headers, rows) = match projection {
            Projection::All if table.is_empty() => {
                (vec![EMPTY_TABLE_HEADER.to_string()], Vec::new())
            }
            Projection::All => (
                table.columns().to_vec(),
                rows.iter().map(|row| (*row).clone()).collect(),
            ),
            Projection::Columns(columns) => {
                let mut indices = Vec::with_capacity(columns.len());
                for column in columns {
                    let idx = table.column_index(&canonical(column));
                    if idx.is_none() && self.options.strict {
                        return Err(self.unknown_column(table, &canonical(column)));
                    }
                    indices.push(idx);
                }

                let projected = rows
                    .iter()
                    .map(|row| {
                        indices
                            .iter()
                            .map(|idx| idx.map_or(Value::Null, |i| row[i].clone()))
                            .collect()
                    })
                    .collect();
                (columns.clone(), projected)
            }
        };

        Ok(QueryResult {
            statement: StatementKind::Select,
            headers,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryErrorKind;
    use crate::fixture::reference_dataset;

    fn run(query: &str) -> ExecResult<QueryResult> {
        let dataset = reference_dataset().unwrap();
        QueryExecutor::new(&dataset).execute(query)
    }

    fn run_strict(query: &str) -> ExecResult<QueryResult> {
        let dataset = reference_dataset().unwrap();
        QueryExecutor::with_options(&dataset, ExecutorOptions::strict()).execute(query)
    }

    fn texts(result: &QueryResult, header: &str) -> Vec<String> {
        result
            .column(header)
            .unwrap()
            .into_iter()
            .map(|v| v.to_string())
            .collect()
    }

    #[test]
    fn test_select_star() {
        let result = run("SELECT * FROM COUNTRIES").unwrap();
        assert_eq!(result.headers, vec!["COUNTRY", "POP", "AREA", "LITERACY"]);
        assert_eq!(result.row_count(), 5);
        assert!(result.rows.iter().all(|r| r.len() == result.headers.len()));
    }

    #[test]
    fn test_filter_numeric_keeps_input_order() {
        let result = run("SELECT COUNTRY FROM COUNTRIES WHERE POP > 300000000").unwrap();
        assert_eq!(texts(&result, "COUNTRY"), vec!["China", "India", "USA"]);
    }

    #[test]
    fn test_whitespace_and_case_are_normalized() {
        let result = run("  select   country\n from countries\twhere  pop < 100000000 ").unwrap();
        assert_eq!(result.headers, vec!["country"]);
        assert_eq!(texts(&result, "country"), vec!["UK"]);
    }

    #[test]
    fn test_order_by_desc() {
        let result = run("SELECT NAME FROM PERSONS ORDER BY NAME DESC").unwrap();
        assert_eq!(
            texts(&result, "NAME"),
            vec!["Santos Dumont", "Grace Hopper", "Alan Turing", "Ada Lovelace"]
        );
    }

    #[test]
    fn test_order_by_is_stable() {
        let result = run("SELECT NAME, JOB FROM PERSONS ORDER BY JOB").unwrap();
        assert_eq!(
            texts(&result, "NAME"),
            vec!["Santos Dumont", "Ada Lovelace", "Alan Turing", "Grace Hopper"]
        );

        let result = run("SELECT NAME FROM PERSONS ORDER BY JOB DESC").unwrap();
        assert_eq!(
            texts(&result, "NAME"),
            vec!["Ada Lovelace", "Alan Turing", "Grace Hopper", "Santos Dumont"]
        );
    }

    #[test]
    fn test_order_by_numbers() {
        let result = run("SELECT COUNTRY FROM COUNTRIES ORDER BY AREA").unwrap();
        assert_eq!(
            texts(&result, "COUNTRY"),
            vec!["UK", "India", "Brazil", "China", "USA"]
        );
    }

    #[test]
    fn test_like_prefix() {
        let result = run("SELECT * FROM PERSONS WHERE COUNTRY LIKE 'u%'").unwrap();
        assert_eq!(texts(&result, "COUNTRY"), vec!["UK", "UK", "USA"]);
    }

    #[test]
    fn test_unknown_table() {
        let err = run("SELECT * FROM foo").unwrap_err();
        assert_eq!(err.kind(), QueryErrorKind::UnknownTable);
        assert!(err.to_string().contains("'foo'"));
        assert!(err.to_string().contains("COUNTRIES, PERSONS"));
    }

    #[test]
    fn test_missing_projection_column_is_null() {
        let result = run("SELECT NAME, Salary FROM PERSONS").unwrap();
        assert_eq!(result.headers, vec!["NAME", "Salary"]);
        assert!(result.rows.iter().all(|r| r[1] == Value::Null));
        assert_eq!(result.row_count(), 4);
    }

    #[test]
    fn test_unknown_predicate_column_excludes_rows() {
        let result = run("SELECT * FROM PERSONS WHERE SALARY > 10").unwrap();
        assert!(result.is_empty());
        assert_eq!(result.headers.len(), 4);
    }

    #[test]
    fn test_inert_predicate_keeps_rows() {
        let result = run("SELECT * FROM PERSONS WHERE COUNTRY IS NULL").unwrap();
        assert_eq!(result.row_count(), 4);
    }

    #[test]
    fn test_unknown_order_column_is_noop() {
        let result = run("SELECT ID FROM PERSONS ORDER BY SALARY DESC").unwrap();
        assert_eq!(texts(&result, "ID"), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_strict_mode_errors() {
        let err = run_strict("SELECT NAME, Salary FROM PERSONS").unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownColumn {
                column: "SALARY".to_string(),
                table: "PERSONS".to_string()
            }
        );

        let err = run_strict("SELECT * FROM PERSONS WHERE SALARY > 10").unwrap_err();
        assert_eq!(err.kind(), QueryErrorKind::UnknownColumn);

        let err = run_strict("SELECT * FROM PERSONS ORDER BY SALARY").unwrap_err();
        assert_eq!(err.kind(), QueryErrorKind::UnknownColumn);

        let err = run_strict("SELECT * FROM PERSONS WHERE COUNTRY IS NULL").unwrap_err();
        assert_eq!(err.kind(), QueryErrorKind::UnsupportedPredicate);

        let err = run_strict("SELECT * FROM PERSONS WHERE = 3").unwrap_err();
        assert_eq!(err.kind(), QueryErrorKind::UnsupportedPredicate);

        assert!(run_strict("SELECT NAME FROM PERSONS WHERE ID < 3").is_ok());
    }

    #[test]
    fn test_simulated_dml_does_not_mutate() {
        let dataset = reference_dataset().unwrap();
        let executor = QueryExecutor::new(&dataset);

        let ack = executor
            .execute("INSERT INTO PERSONS VALUES (5, 'Linus', 'Finland', 'E')")
            .unwrap();
        assert_eq!(ack.statement, StatementKind::Insert);
        assert_eq!(ack.headers, vec!["STATUS"]);

        executor.execute("delete from persons").unwrap();
        let after = executor.execute("SELECT * FROM PERSONS").unwrap();
        assert_eq!(after.row_count(), 4);
    }

    #[test]
    fn test_unsupported_command() {
        let err = run("DROP TABLE PERSONS").unwrap_err();
        assert_eq!(err.kind(), QueryErrorKind::UnsupportedCommand);
    }

    #[test]
    fn test_empty_table_star() {
        let dataset = Dataset::new()
            .with_table(Table::new("EMPTY", &["A", "B"]).unwrap())
            .unwrap();
        let result = QueryExecutor::new(&dataset)
            .execute("SELECT * FROM empty")
            .unwrap();
        assert_eq!(result.headers, vec![EMPTY_TABLE_HEADER]);
        assert!(result.is_empty());

        let result = QueryExecutor::new(&dataset)
            .execute("SELECT a, b FROM empty")
            .unwrap();
        assert_eq!(result.headers, vec!["a", "b"]);
    }

    #[test]
    fn test_dyn_data_source() {
        let dataset = reference_dataset().unwrap();
        let source: &dyn DataSource = &dataset;
        let result = QueryExecutor::new(source)
            .execute("SELECT ID FROM persons WHERE NAME = 'grace hopper'")
            .unwrap();
        assert_eq!(result.rows, vec![vec![Value::from(3)]]);
    }
}
