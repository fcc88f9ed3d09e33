//! Reference dataset used by the lessons.

use crate::dataset::{Dataset, Table};
use crate::error::DatasetResult;
use crate::value::Value;

/// `(country, population, area in km², literacy rate in %)`
const COUNTRIES: &[(&str, i64, i64, f64)] = &[
    ("China", 1_398_000_000, 9_596_960, 96.8),
    ("India", 1_366_000_000, 3_287_263, 74.4),
    ("USA", 331_000_000, 9_833_520, 99.0),
    ("Brazil", 212_000_000, 8_516_000, 93.2),
    ("UK", 67_000_000, 242_495, 99.0),
];

/// `(id, name, country, job code)`
const PERSONS: &[(i64, &str, &str, &str)] = &[
    (1, "Ada Lovelace", "UK", "S"),
    (2, "Alan Turing", "UK", "S"),
    (3, "Grace Hopper", "USA", "S"),
    (4, "Santos Dumont", "Brazil", "E"),
];

/// Build the `COUNTRIES` and `PERSONS` tables.
pub fn reference_dataset() -> DatasetResult<Dataset> {
    let mut countries = Table::new("COUNTRIES", &["COUNTRY", "POP", "AREA", "LITERACY"])?;
    for &(country, pop, area, literacy) in COUNTRIES {
        countries.push_row(vec![
            Value::from(country),
            Value::from(pop),
            Value::from(area),
            Value::from(literacy),
        ])?;
    }

    let mut persons = Table::new("PERSONS", &["ID", "NAME", "COUNTRY", "JOB"])?;
    for &(id, name, country, job) in PERSONS {
        persons.push_row(vec![
            Value::from(id),
            Value::from(name),
            Value::from(country),
            Value::from(job),
        ])?;
    }

    Dataset::new().with_table(countries)?.with_table(persons)
}
