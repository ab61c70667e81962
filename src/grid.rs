//! Spatial grids of measurements
//!
//! A [`Grid`] holds one scalar per station of a rectangular sampling of the
//! image plane (e.g. the illuminance in lx). A [`LabelMap`] gives each cell of
//! a grid the identifier of its measuring station.

use crate::table::Table;
use itertools::Itertools;
use itertools::MinMaxResult::{MinMax, NoElements, OneElement};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GridError {
    #[error("Grid shape mismatch: {0:?} vs {1:?}")]
    Shape((usize, usize), (usize, usize)),
    #[error("Grid data length {len} does not match the shape {shape:?}")]
    Length { len: usize, shape: (usize, usize) },
}
type Result<T> = std::result::Result<T, GridError>;

/// Rounds to `decimals` places, ties to even on the scaled value
pub fn round(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Rows x columns array of scalars, row major
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    n_rows: usize,
    n_cols: usize,
    data: Vec<f64>,
}
impl Grid {
    pub fn new(data: Vec<f64>, (n_rows, n_cols): (usize, usize)) -> Result<Self> {
        if data.len() != n_rows * n_cols {
            return Err(GridError::Length {
                len: data.len(),
                shape: (n_rows, n_cols),
            });
        }
        Ok(Self {
            n_rows,
            n_cols,
            data,
        })
    }
    /// Grid with the rows of a table
    pub fn from_table(table: &Table) -> Self {
        Self {
            n_rows: table.n_rows(),
            n_cols: table.n_cols(),
            data: table.rows().iter().flatten().cloned().collect(),
        }
    }
    /// Returns `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.n_rows && col < self.n_cols).then(|| self.data[row * self.n_cols + col])
    }
    /// Iterator over `(row, column, value)`
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let n_cols = self.n_cols;
        self.data
            .iter()
            .enumerate()
            .map(move |(k, &v)| (k / n_cols, k % n_cols, v))
    }
    /// Returns the finite value range
    pub fn range(&self) -> Option<(f64, f64)> {
        match self
            .data
            .iter()
            .cloned()
            .filter(|v| v.is_finite())
            .minmax_by(|a, b| a.total_cmp(b))
        {
            MinMax(min, max) => Some((min, max)),
            OneElement(v) => Some((v, v)),
            NoElements => None,
        }
    }
    /// Cell-wise `round(other - self, 1)`
    pub fn difference(&self, other: &Grid) -> Result<Grid> {
        if self.shape() != other.shape() {
            return Err(GridError::Shape(self.shape(), other.shape()));
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| round(b - a, 1))
            .collect();
        Ok(Self { data, ..*self })
    }
}

/// Station identifiers aligned with the cells of a [`Grid`]
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMap(Grid);
impl LabelMap {
    pub fn new(labels: Vec<f64>, shape: (usize, usize)) -> Result<Self> {
        Ok(Self(Grid::new(labels, shape)?))
    }
    pub fn from_table(table: &Table) -> Self {
        Self(Grid::from_table(table))
    }
    pub fn shape(&self) -> (usize, usize) {
        self.0.shape()
    }
    /// Display text of the station at `(row, col)`
    pub fn label(&self, row: usize, col: usize) -> Option<String> {
        self.0.get(row, col).map(station_label)
    }
}

/// Integral identifiers are printed without decimals, others with one (3.5)
pub fn station_label(id: f64) -> String {
    if id.fract() == 0f64 {
        format!("{:.0}", id)
    } else {
        format!("{:.1}", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_table() {
        let table: Table = "1 2 3\n4 5 6\n".parse().unwrap();
        let grid = Grid::from_table(&table);
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.get(1, 0), Some(4.));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.range(), Some((1., 6.)));
    }

    #[test]
    fn difference() {
        let a = Grid::new(vec![2.0, 10.25, 7.1, 0.], (2, 2)).unwrap();
        let b = Grid::new(vec![2.3, 10.0, 5.0, 3.6], (2, 2)).unwrap();
        let diff = a.difference(&b).unwrap();
        assert_eq!(diff.get(0, 0), Some(0.3));
        assert_eq!(diff.get(0, 1), Some(-0.2));
        assert_eq!(diff.get(1, 0), Some(-2.1));
        assert_eq!(diff.get(1, 1), Some(3.6));
    }

    #[test]
    fn difference_shape_mismatch() {
        let a = Grid::new(vec![0.; 24], (4, 6)).unwrap();
        let b = Grid::new(vec![0.; 45], (5, 9)).unwrap();
        assert_eq!(a.difference(&b), Err(GridError::Shape((4, 6), (5, 9))));
    }

    #[test]
    fn station_labels() {
        assert_eq!(station_label(3.5), "3.5");
        assert_eq!(station_label(12.), "12");
        let labels = LabelMap::new(vec![1., 2., 3.5, 4.], (2, 2)).unwrap();
        assert_eq!(labels.label(1, 0).as_deref(), Some("3.5"));
        assert_eq!(labels.label(0, 1).as_deref(), Some("2"));
    }

    #[test]
    fn wrong_length() {
        assert!(matches!(
            Grid::new(vec![0.; 5], (2, 3)),
            Err(GridError::Length { len: 5, .. })
        ));
    }
}
