//! Measurement series
//!
//! Paired `(x, y)` samples with their `(x, y)` uncertainties.

use crate::table::{Table, TableError};
use itertools::Itertools;
use itertools::MinMaxResult::{MinMax, NoElements, OneElement};

#[derive(thiserror::Error, Debug)]
pub enum SeriesError {
    #[error("Series length mismatch: x={x}, y={y}, x error={x_err}, y error={y_err}")]
    LengthMismatch {
        x: usize,
        y: usize,
        x_err: usize,
        y_err: usize,
    },
    #[error("Failed to extract the series from the table")]
    Table(#[from] TableError),
}
type Result<T> = std::result::Result<T, SeriesError>;

/// Positions of the series columns in a [`Table`]
///
/// Missing error columns are read as zero errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub x: usize,
    pub y: usize,
    pub x_err: Option<usize>,
    pub y_err: Option<usize>,
}
impl Columns {
    pub fn new(x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            x_err: None,
            y_err: None,
        }
    }
    pub fn x_err(self, column: usize) -> Self {
        Self {
            x_err: Some(column),
            ..self
        }
    }
    pub fn y_err(self, column: usize) -> Self {
        Self {
            y_err: Some(column),
            ..self
        }
    }
}

/// Ordered `(x, y)` measurements with errors on both axes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    x: Vec<f64>,
    y: Vec<f64>,
    x_err: Vec<f64>,
    y_err: Vec<f64>,
}
impl Series {
    pub fn new(x: Vec<f64>, y: Vec<f64>, x_err: Vec<f64>, y_err: Vec<f64>) -> Result<Self> {
        let n = x.len();
        if y.len() != n || x_err.len() != n || y_err.len() != n {
            return Err(SeriesError::LengthMismatch {
                x: n,
                y: y.len(),
                x_err: x_err.len(),
                y_err: y_err.len(),
            });
        }
        Ok(Self { x, y, x_err, y_err })
    }
    /// Series without uncertainties
    pub fn from_xy(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        let (x_err, y_err) = (vec![0f64; x.len()], vec![0f64; y.len()]);
        Self::new(x, y, x_err, y_err)
    }
    /// Extracts the series from the table `columns`
    pub fn from_table(table: &Table, columns: &Columns) -> Result<Self> {
        let zeros = || vec![0f64; table.n_rows()];
        let x = table.column(columns.x)?;
        let y = table.column(columns.y)?;
        let x_err = match columns.x_err {
            Some(index) => table.column(index)?,
            None => zeros(),
        };
        let y_err = match columns.y_err {
            Some(index) => table.column(index)?,
            None => zeros(),
        };
        log::debug!("x: {:?}", x);
        log::debug!("y: {:?}", y);
        Self::new(x, y, x_err, y_err)
    }
    pub fn len(&self) -> usize {
        self.x.len()
    }
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
    pub fn x(&self) -> &[f64] {
        &self.x
    }
    pub fn y(&self) -> &[f64] {
        &self.y
    }
    pub fn x_err(&self) -> &[f64] {
        &self.x_err
    }
    pub fn y_err(&self) -> &[f64] {
        &self.y_err
    }
    /// Iterator over `(x, y, x error, y error)`
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64, f64)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(self.x_err.iter().zip(&self.y_err))
            .map(|((&x, &y), (&ex, &ey))| (x, y, ex, ey))
    }
    /// Returns true if every uncertainty is zero
    pub fn is_unweighted(&self) -> bool {
        self.x_err.iter().chain(&self.y_err).all(|e| *e == 0f64)
    }
    /// Returns the range of the x values
    pub fn x_range(&self) -> Option<(f64, f64)> {
        match self.x.iter().cloned().minmax_by(|a, b| a.total_cmp(b)) {
            MinMax(min, max) => Some((min, max)),
            OneElement(x) => Some((x, x)),
            NoElements => None,
        }
    }
    /// Returns the extent of the data including the error whiskers
    pub fn extent(&self) -> Option<((f64, f64), (f64, f64))> {
        if self.is_empty() {
            return None;
        }
        let fold = |(lo, hi): (f64, f64), (v, e): (f64, f64)| (lo.min(v - e), hi.max(v + e));
        let init = (f64::INFINITY, f64::NEG_INFINITY);
        let x = self
            .iter()
            .map(|(x, _, ex, _)| (x, ex.abs()))
            .fold(init, fold);
        let y = self
            .iter()
            .map(|(_, y, _, ey)| (y, ey.abs()))
            .fold(init, fold);
        Some((x, y))
    }
}
