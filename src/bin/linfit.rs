//! Line fit
//!
//! Fits a straight line to two columns of a measurement table, with optional
//! error columns for both axes, prints the fit report and saves the figure.

use anyhow::Context;
use labplot::{
    plot::linear::{lin_fit, FitPlot},
    Columns, Series, Table,
};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "linfit", about = "Straight line fit with errors on both axes")]
struct Opt {
    /// Measurement table
    #[structopt(parse(from_os_str))]
    table: PathBuf,
    /// x column index
    #[structopt(short, long)]
    x: usize,
    /// y column index
    #[structopt(short, long)]
    y: usize,
    /// x error column index, zero errors if not given
    #[structopt(long)]
    x_err: Option<usize>,
    /// y error column index, zero errors if not given
    #[structopt(long)]
    y_err: Option<usize>,
    /// Figure title
    #[structopt(short, long, default_value = "")]
    title: String,
    /// x axis label
    #[structopt(long, default_value = "")]
    x_label: String,
    /// y axis label
    #[structopt(long, default_value = "")]
    y_label: String,
    /// Figure file (.svg or .png)
    #[structopt(short, long, parse(from_os_str), default_value = "fit.svg")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Opt::from_args();

    let mut columns = Columns::new(opt.x, opt.y);
    if let Some(column) = opt.x_err {
        columns = columns.x_err(column);
    }
    if let Some(column) = opt.y_err {
        columns = columns.y_err(column);
    }

    let table = Table::from_path(&opt.table)
        .with_context(|| format!("failed to load {:?}", opt.table))?;
    let series = Series::from_table(&table, &columns)?;
    let plot = FitPlot::new(&opt.output)
        .title(opt.title)
        .x_label(opt.x_label)
        .y_label(opt.y_label);
    lin_fit(&series, &plot).with_context(|| format!("failed to fit {:?}", opt.table))?;

    Ok(())
}
