//! Physics laboratory data reduction
//!
//! Loads the measurement tables of a lab session, fits straight lines with
//! errors on both axes, draws grouped error bars and annotated illuminance maps.
//!
//! ```no_run
//! use labplot::{plot::linear::{lin_fit, FitPlot}, Columns, Series, Table};
//!
//! # fn main() -> anyhow::Result<()> {
//! let table = Table::from_path("a.txt")?;
//! let series = Series::from_table(&table, &Columns::new(7, 3).x_err(8).y_err(4))?;
//! let fit = lin_fit(
//!     &series,
//!     &FitPlot::new("370_a_1.svg")
//!         .title("Abbesches Verfahren 1")
//!         .x_label("1 + 1/gamma")
//!         .y_label("x [cm]"),
//! )?;
//! println!("slope: {}", fit.a);
//! # Ok(())
//! # }
//! ```

pub mod colormap;
mod error;
pub mod fit;
pub mod grid;
pub mod plot;
pub mod series;
pub mod table;

pub use colormap::ColorMap;
pub use error::{Error, Result};
pub use fit::{Fit, FitResult};
pub use grid::{Grid, LabelMap};
pub use series::{Columns, Series};
pub use table::Table;
