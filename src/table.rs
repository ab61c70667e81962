//! Numeric text tables
//!
//! Loads the comma or whitespace delimited measurement tables written by hand
//! during the lab sessions. Columns are addressed by position, there is no
//! header row, `#` starts a comment.

use regex::Regex;
use std::{fs::File, io::Read, path::Path};

#[derive(thiserror::Error, Debug)]
pub enum TableError {
    #[error("Failed to read the table")]
    Io(#[from] std::io::Error),
    #[error("Failed to split the table records")]
    Csv(#[from] csv::Error),
    #[error("Invalid whitespace delimiter pattern")]
    Regex(#[from] regex::Error),
    #[error("Invalid number {value:?} at line {line}, column {column}")]
    Parse {
        line: usize,
        column: usize,
        value: String,
    },
    #[error("Line {line} has {found} columns, expected {expected}")]
    Ragged {
        line: usize,
        found: usize,
        expected: usize,
    },
    #[error("Column #{index} is out of range, the table has {n_cols} columns")]
    Column { index: usize, n_cols: usize },
    #[error("The table has no data rows")]
    Empty,
}
type Result<T> = std::result::Result<T, TableError>;

/// Rectangular table of measurements
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: Vec<Vec<f64>>,
}
impl Table {
    /// Loads a table from a text file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        log::info!("Loading {:?}...", path.as_ref());
        let table = Self::from_reader(file)?;
        log::info!(
            "... {} rows x {} columns",
            table.n_rows(),
            table.n_cols()
        );
        Ok(table)
    }
    /// Loads a table from any reader
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        contents.parse()
    }
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }
    pub fn n_cols(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }
    /// Returns the rows of the table
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
    /// Returns a copy of the column at `index`
    pub fn column(&self, index: usize) -> Result<Vec<f64>> {
        if index >= self.n_cols() {
            return Err(TableError::Column {
                index,
                n_cols: self.n_cols(),
            });
        }
        Ok(self.rows.iter().map(|row| row[index]).collect())
    }
}
impl std::str::FromStr for Table {
    type Err = TableError;

    fn from_str(contents: &str) -> Result<Self> {
        // data lines with their 1-based line number in the source
        let lines: Vec<(usize, &str)> = contents
            .lines()
            .enumerate()
            .map(|(k, line)| (k + 1, line.split('#').next().unwrap_or("").trim()))
            .filter(|(_, line)| !line.is_empty())
            .collect();
        let comma = lines.first().map_or(false, |(_, line)| line.contains(','));
        let normalized = if comma {
            lines
                .iter()
                .map(|(_, line)| *line)
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            let re_blank = Regex::new(r"[ \t]+")?;
            lines
                .iter()
                .map(|(_, line)| re_blank.replace_all(line, ","))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(normalized.as_bytes());

        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(lines.len());
        for (result, (line, _)) in rdr.records().zip(lines.iter()) {
            let record = result?;
            let row = record
                .iter()
                .enumerate()
                .map(|(column, value)| {
                    value.parse::<f64>().map_err(|_| TableError::Parse {
                        line: *line,
                        column,
                        value: value.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            if let Some(expected) = rows.first().map(|first| first.len()) {
                if row.len() != expected {
                    return Err(TableError::Ragged {
                        line: *line,
                        found: row.len(),
                        expected,
                    });
                }
            }
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(TableError::Empty);
        }
        log::debug!("table: {:?}", rows);
        Ok(Self { rows })
    }
}
impl TryFrom<Vec<Vec<f64>>> for Table {
    type Error = TableError;

    /// Rows must all have the same length, `line` in errors is the 1-based row index
    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        let expected = rows.first().ok_or(TableError::Empty)?.len();
        if let Some((k, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != expected)
        {
            return Err(TableError::Ragged {
                line: k + 1,
                found: row.len(),
                expected,
            });
        }
        Ok(Self { rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_table() {
        let table: Table = "1 2.5\t3\n  4   5 6e-1 \n".parse().unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.n_cols(), 3);
        assert_eq!(table.column(2).unwrap(), vec![3., 0.6]);
    }

    #[test]
    fn comma_table() {
        let table: Table = "1, 2\n3,4\n".parse().unwrap();
        assert_eq!(table.rows(), &[vec![1., 2.], vec![3., 4.]]);
    }

    #[test]
    fn comments_and_blank_lines() {
        let table: Table = "# station value\n\n1 10 # first\n2 20\n\n"
            .parse()
            .unwrap();
        assert_eq!(table.column(1).unwrap(), vec![10., 20.]);
    }

    #[test]
    fn ragged_rows() {
        let err = "1 2 3\n4 5\n".parse::<Table>().unwrap_err();
        assert!(matches!(
            err,
            TableError::Ragged {
                line: 2,
                found: 2,
                expected: 3
            }
        ));
    }

    #[test]
    fn header_is_not_honored() {
        let err = "x y\n1 2\n".parse::<Table>().unwrap_err();
        assert!(matches!(err, TableError::Parse { line: 1, column: 0, .. }));
    }

    #[test]
    fn column_out_of_range() {
        let table: Table = "1 2\n".parse().unwrap();
        assert!(matches!(
            table.column(2),
            Err(TableError::Column {
                index: 2,
                n_cols: 2
            })
        ));
    }

    #[test]
    fn empty_table() {
        assert!(matches!(
            "# nothing\n".parse::<Table>(),
            Err(TableError::Empty)
        ));
    }

    #[test]
    fn ragged_rows_from_vec() {
        assert!(matches!(
            Table::try_from(vec![vec![1., 2., 3.], vec![4.]]),
            Err(TableError::Ragged {
                line: 2,
                found: 1,
                expected: 3
            })
        ));
        assert!(matches!(Table::try_from(vec![]), Err(TableError::Empty)));
        let table = Table::try_from(vec![vec![1., 2.], vec![3., 4.]]).unwrap();
        assert_eq!(table.column(1).unwrap(), vec![2., 4.]);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Table::from_path("no/such/table.txt"),
            Err(TableError::Io(_))
        ));
    }
}
