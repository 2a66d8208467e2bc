use thiserror::Error;

use super::table::{MeasurementTable, TableError};
use super::ufloat::{nominal_values, std_devs};

// ---------------------------------------------------------------------------
// ErrorSeries – x, y and y-uncertainty, positionally aligned
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("columns are not aligned: x has {x} values, y has {y}, yerr has {yerr}")]
    LengthMismatch { x: usize, y: usize, yerr: usize },

    #[error("error bar {index} is {value}; error bars must be finite and non-negative")]
    InvalidError { index: usize, value: f64 },

    #[error(transparent)]
    Table(#[from] TableError),
}

/// One error-bar trace.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub yerr: Vec<f64>,
}

impl ErrorSeries {
    pub fn new(x: Vec<f64>, y: Vec<f64>, yerr: Vec<f64>) -> Result<Self, SeriesError> {
        if x.len() != y.len() || y.len() != yerr.len() {
            return Err(SeriesError::LengthMismatch {
                x: x.len(),
                y: y.len(),
                yerr: yerr.len(),
            });
        }
        if let Some((index, &value)) = yerr
            .iter()
            .enumerate()
            .find(|(_, e)| !e.is_finite() || **e < 0.0)
        {
            return Err(SeriesError::InvalidError { index, value });
        }
        Ok(Self { x, y, yerr })
    }

    /// Build a series from table columns.
    ///
    /// * `x_column` – nominal values are used (std-devs are ignored)
    /// * `y_column` – nominal values become y, std-devs the error bars
    /// * `yerr_column` – if given, overrides the error bars with its nominal values
    pub fn from_table(
        table: &MeasurementTable,
        x_column: &str,
        y_column: &str,
        yerr_column: Option<&str>,
    ) -> Result<Self, SeriesError> {
        let x = nominal_values(&table.measured_column(x_column)?);
        let y_values = table.measured_column(y_column)?;
        let y = nominal_values(&y_values);
        let yerr = match yerr_column {
            Some(col) => nominal_values(&table.measured_column(col)?),
            None => std_devs(&y_values),
        };
        Self::new(x, y, yerr)
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Iterate `(x, y, yerr)` triples.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.yerr)
            .map(|((&x, &y), &e)| (x, y, e))
    }

    /// `(min, max)` of the finite x values.
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.x.iter().copied())
    }

    /// `(min, max)` of y including the error bars.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        bounds(
            self.points()
                .flat_map(|(_, y, e)| [y - e, y + e]),
        )
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Union of optional bounds.
pub fn merge_bounds(a: Option<(f64, f64)>, b: Option<(f64, f64)>) -> Option<(f64, f64)> {
    match (a, b) {
        (Some((a0, a1)), Some((b0, b1))) => Some((a0.min(b0), a1.max(b1))),
        (a, None) => a,
        (None, b) => b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_misaligned_columns() {
        let err = ErrorSeries::new(vec![1.0, 2.0], vec![1.0], vec![0.1]).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::LengthMismatch { x: 2, y: 1, yerr: 1 }
        ));
    }

    #[test]
    fn rejects_negative_error_bars() {
        let err = ErrorSeries::new(vec![1.0, 2.0], vec![1.0, 2.0], vec![0.1, -0.1]).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidError { index: 1, .. }));
    }

    #[test]
    fn plain_energies_next_to_shorthand_keep_an_error_bar() {
        let csv = "walltime,energy\n600,-2.2454(6)\n1200,-2.2448\n";
        let table = MeasurementTable::from_reader(csv.as_bytes()).unwrap();
        let series = ErrorSeries::from_table(&table, "walltime", "energy", None).unwrap();
        assert_eq!(series.x, vec![600.0, 1200.0]);
        assert!((series.yerr[0] - 0.0006).abs() < 1e-15);
        assert!((series.yerr[1] - 0.0001).abs() < 1e-15);
    }

    #[test]
    fn builds_from_table_columns() {
        let csv = "walltime,energy\n10,-2.2454(6)\n20,-2.2448(9)\n";
        let table = MeasurementTable::from_reader(csv.as_bytes()).unwrap();
        let series = ErrorSeries::from_table(&table, "walltime", "energy", None).unwrap();

        assert_eq!(series.x, vec![10.0, 20.0]);
        assert_eq!(series.y, vec![-2.2454, -2.2448]);
        assert!((series.yerr[1] - 0.0009).abs() < 1e-15);
    }

    #[test]
    fn explicit_error_column_overrides_std_devs() {
        let csv = "t,e,err\n0.01,-2.2456,0.0005\n0.02,-2.2464,0.0009\n";
        let table = MeasurementTable::from_reader(csv.as_bytes()).unwrap();
        let series = ErrorSeries::from_table(&table, "t", "e", Some("err")).unwrap();
        assert_eq!(series.yerr, vec![0.0005, 0.0009]);
    }

    #[test]
    fn bounds_include_error_bars() {
        let s = ErrorSeries::new(vec![3.0, 1.0], vec![0.0, 1.0], vec![0.5, 0.25]).unwrap();
        assert_eq!(s.x_bounds(), Some((1.0, 3.0)));
        assert_eq!(s.y_bounds(), Some((-0.5, 1.25)));

        let empty = ErrorSeries::new(vec![], vec![], vec![]).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.y_bounds(), None);
        assert_eq!(merge_bounds(empty.y_bounds(), s.x_bounds()), Some((1.0, 3.0)));
    }
}
