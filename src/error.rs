use crate::{
    fit::FitError, grid::GridError, plot::PlotError, series::SeriesError, table::TableError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `table` module")]
    Table(#[from] TableError),
    #[error("Error in the `series` module")]
    Series(#[from] SeriesError),
    #[error("Error in the `fit` module")]
    Fit(#[from] FitError),
    #[error("Error in the `grid` module")]
    Grid(#[from] GridError),
    #[error("Error in the `plot` module")]
    Plot(#[from] PlotError),
}
pub type Result<T> = std::result::Result<T, Error>;
