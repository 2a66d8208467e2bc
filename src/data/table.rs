use std::fmt;
use std::io::Read;
use std::path::Path;

use tabled::builder::Builder;
use tabled::settings::Style;
use thiserror::Error;

use super::ufloat::UFloat;

// ---------------------------------------------------------------------------
// Cell – a single value of a CSV column
// ---------------------------------------------------------------------------

/// A CSV cell after uncertainty-aware type inference.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A bare number, e.g. a walltime or timestep.
    Number(f64),
    /// A value with uncertainty, e.g. `-2.2454(6)`.
    Measured(UFloat),
    /// Anything that could not be read as a number; kept verbatim.
    Text(String),
    Empty,
}

impl Cell {
    /// Read a cell of a purely numeric column.
    fn parse_number(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return Cell::Empty;
        }
        match s.parse::<f64>() {
            Ok(v) => Cell::Number(v),
            Err(_) => Cell::Text(s.to_string()),
        }
    }

    /// Read a cell of a column that is not purely numeric. Every value goes
    /// through [`UFloat`] parsing, so a bare `-2.2448` there means
    /// -2.2448 ± 0.0001; unreadable values are kept as text.
    pub fn parse_measured(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return Cell::Empty;
        }
        match s.parse::<UFloat>() {
            Ok(u) => Cell::Measured(u),
            Err(e) => {
                log::debug!("keeping '{s}' as text: {e}");
                Cell::Text(s.to_string())
            }
        }
    }

    /// Numeric view of the cell; numbers carry no uncertainty.
    pub fn as_ufloat(&self) -> Option<UFloat> {
        match self {
            Cell::Number(v) => Some(UFloat::exact(*v)),
            Cell::Measured(u) => Some(*u),
            Cell::Text(_) | Cell::Empty => None,
        }
    }

    /// Shorthand rendering for measurements, plain rendering otherwise.
    pub fn to_shorthand(&self, sig_digits: usize) -> String {
        match self {
            Cell::Measured(u) => u.format_shorthand(sig_digits),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Measured(u) => write!(f, "{}+/-{}", u.nominal, u.std_dev),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Empty => write!(f, "<empty>"),
        }
    }
}

// ---------------------------------------------------------------------------
// MeasurementTable – the loaded CSV file
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("column '{name}' not found (available: {available})")]
    MissingColumn { name: String, available: String },

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    NonNumeric {
        row: usize,
        column: String,
        value: String,
    },
}

/// Row-oriented table with a header row.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl MeasurementTable {
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        Self::from_csv(reader)
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, TableError> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(rdr);
        Self::from_csv(reader)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, TableError> {
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut raw: Vec<Vec<String>> = Vec::new();
        for result in reader.records() {
            let record = result?;
            raw.push(record.iter().map(str::to_string).collect());
        }

        // Types are decided per column: a column is numeric only when every
        // non-empty cell reads as a float.
        let numeric: Vec<bool> = (0..headers.len())
            .map(|col| {
                raw.iter()
                    .map(|row| row[col].trim())
                    .filter(|v| !v.is_empty())
                    .all(|v| v.parse::<f64>().is_ok())
            })
            .collect();

        let rows: Vec<Vec<Cell>> = raw
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&numeric)
                    .map(|(value, &is_numeric)| {
                        if is_numeric {
                            Cell::parse_number(value)
                        } else {
                            Cell::parse_measured(value)
                        }
                    })
                    .collect()
            })
            .collect();

        log::debug!("parsed {} rows with columns {:?}", rows.len(), headers);
        Ok(MeasurementTable { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn {
                name: name.to_string(),
                available: self.headers.join(", "),
            })
    }

    /// All cells of a column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Cell>, TableError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// A column as measurements. Text or empty cells are an error.
    pub fn measured_column(&self, name: &str) -> Result<Vec<UFloat>, TableError> {
        self.column(name)?
            .into_iter()
            .enumerate()
            .map(|(row, cell)| {
                cell.as_ufloat().ok_or_else(|| TableError::NonNumeric {
                    row,
                    column: name.to_string(),
                    value: cell.to_string(),
                })
            })
            .collect()
    }

    /// Every cell rendered with [`Cell::to_shorthand`].
    pub fn to_shorthand(&self, sig_digits: usize) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_shorthand(sig_digits)).collect())
            .collect()
    }
}

impl fmt::Display for MeasurementTable {
    /// Data-frame style dump: index column, headers, shorthand values.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = f.precision().unwrap_or(1);
        let mut builder = Builder::default();

        let mut header = vec![String::new()];
        header.extend(self.headers.iter().cloned());
        builder.push_record(header);

        for (i, row) in self.to_shorthand(digits).into_iter().enumerate() {
            let mut record = vec![i.to_string()];
            record.extend(row);
            builder.push_record(record);
        }

        let mut table = builder.build();
        table.with(Style::blank());
        write!(f, "{table}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "walltime,energy,note\n\
                          10,-2.2454(6),ok\n\
                          20, -2.2448(9) ,\n\
                          40,-2.2438+/-0.0003,n/a\n";

    #[test]
    fn infers_cell_types() {
        assert_eq!(Cell::parse_number("10"), Cell::Number(10.0));
        assert_eq!(Cell::parse_measured("  "), Cell::Empty);
        assert_eq!(Cell::parse_measured("n/a"), Cell::Text("n/a".into()));
        match Cell::parse_measured("-2.2454(6)") {
            Cell::Measured(u) => assert_eq!(u.format_shorthand(1), "-2.2454(6)"),
            other => panic!("expected a measurement, got {other:?}"),
        }
    }

    #[test]
    fn loads_csv_with_mixed_cells() {
        let table = MeasurementTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["walltime", "energy", "note"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[1][2], Cell::Empty);

        let energy = table.measured_column("energy").unwrap();
        assert_eq!(energy.len(), 3);
        assert!((energy[2].std_dev - 0.0003).abs() < 1e-15);

        let walltime = table.measured_column("walltime").unwrap();
        assert_eq!(walltime[1], UFloat::exact(20.0));
    }

    #[test]
    fn bare_numbers_in_a_measurement_column_get_last_digit_errors() {
        let csv = "walltime,energy\n600,-2.2454(6)\n1200,-2.2448\n1800,\n";
        let table = MeasurementTable::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.rows[1][0], Cell::Number(1200.0));
        assert_eq!(table.rows[2][1], Cell::Empty);
        match &table.rows[1][1] {
            Cell::Measured(u) => {
                assert_eq!(u.nominal, -2.2448);
                assert!((u.std_dev - 0.0001).abs() < 1e-15);
            }
            other => panic!("expected a measurement, got {other:?}"),
        }
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let csv = "walltime,energy\n600,-2.2454(6)\n1200\n";
        assert!(matches!(
            MeasurementTable::from_reader(csv.as_bytes()),
            Err(TableError::Csv(_))
        ));
    }

    #[test]
    fn missing_column_lists_headers() {
        let table = MeasurementTable::from_reader(SAMPLE.as_bytes()).unwrap();
        let err = table.column("timestep").unwrap_err();
        assert!(err.to_string().contains("walltime, energy, note"));
    }

    #[test]
    fn text_in_numeric_column_is_reported() {
        let table = MeasurementTable::from_reader(SAMPLE.as_bytes()).unwrap();
        match table.measured_column("note") {
            Err(TableError::NonNumeric { row, column, value }) => {
                assert_eq!(row, 0);
                assert_eq!(column, "note");
                assert_eq!(value, "ok");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn ragged_rows_are_rejected_minimal() {
        let csv = "a,b\n1,2\n3\n";
        assert!(matches!(
            MeasurementTable::from_reader(csv.as_bytes()),
            Err(TableError::Csv(_))
        ));
    }

    #[test]
    fn shorthand_dump_keeps_non_measurements() {
        let table = MeasurementTable::from_reader(SAMPLE.as_bytes()).unwrap();
        let cells = table.to_shorthand(1);
        assert_eq!(cells[0], vec!["10", "-2.2454(6)", "ok"]);
        assert_eq!(cells[2][1], "-2.2438(3)");

        let printed = table.to_string();
        assert!(printed.contains("energy"));
        assert!(printed.contains("-2.2448(9)"));
    }
}
