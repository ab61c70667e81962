//! Illuminance maps
//!
//! Colored grid of the illuminance measured at each station of the image
//! plane, annotated with the station identifiers and the values.
//!
//! With `--reference`, the map shows the difference to a reference grid instead,
//! `round(grid - reference, 1)`, on a diverging color scale.

use anyhow::Context;
use labplot::{plot::heatmap::Heatmap, ColorMap, Grid, LabelMap, Table};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "heatmap", about = "Annotated illuminance maps")]
struct Opt {
    /// Grid of measurements
    #[structopt(parse(from_os_str), default_value = "aufgabe362e.txt")]
    grid: PathBuf,
    /// Reference grid, plots the difference grid - reference
    #[structopt(short, long, parse(from_os_str))]
    reference: Option<PathBuf>,
    /// Station identifiers, same shape as the grid
    #[structopt(short, long, parse(from_os_str))]
    labels: Option<PathBuf>,
    /// Color scale lower bound
    #[structopt(long, allow_hyphen_values = true)]
    min: Option<f64>,
    /// Color scale upper bound
    #[structopt(long, allow_hyphen_values = true)]
    max: Option<f64>,
    /// Color scale: plasma, viridis, inferno, magma, cividis, turbo, rdbu, bluered, rdylbu, spectral, piyg, brbg, puor
    #[structopt(short, long)]
    cmap: Option<ColorMap>,
    /// Values at or above the threshold are annotated in black, in white otherwise
    #[structopt(short, long, allow_hyphen_values = true)]
    threshold: Option<f64>,
    /// Number the rows from 1 at the top
    #[structopt(long)]
    ascending_rows: bool,
    /// Figure title
    #[structopt(long, default_value = "Bildausleuchtung dünne Kondensorlinse")]
    title: String,
    /// Colorbar label
    #[structopt(long, default_value = "Bildausleuchtung in lx")]
    colorbar_label: String,
    /// Figure file (.svg or .png)
    #[structopt(short, long, parse(from_os_str), default_value = "aufgabe362e.svg")]
    output: PathBuf,
}

fn load_grid(path: &Path) -> anyhow::Result<Grid> {
    let table = Table::from_path(path).with_context(|| format!("failed to load {:?}", path))?;
    Ok(Grid::from_table(&table))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Opt::from_args();

    let grid = load_grid(&opt.grid)?;
    let (grid, mut heatmap) = match &opt.reference {
        Some(reference) => {
            let reference = load_grid(reference)?;
            let difference = reference.difference(&grid)?;
            log::info!("difference grid: {:?}", difference);
            let heatmap = Heatmap::new(&opt.output)
                .colormap(opt.cmap.unwrap_or(ColorMap::RdBu))
                .range(opt.min.unwrap_or(-3.6), opt.max.unwrap_or(3.6))
                .threshold(opt.threshold.unwrap_or(-5.));
            (difference, heatmap)
        }
        None => {
            let mut heatmap = Heatmap::new(&opt.output)
                .colormap(opt.cmap.unwrap_or_default())
                .threshold(opt.threshold.unwrap_or(f64::INFINITY));
            match (opt.min, opt.max) {
                (Some(min), Some(max)) => heatmap = heatmap.range(min, max),
                (None, None) => (),
                _ => anyhow::bail!("--min and --max must be given together"),
            }
            (grid, heatmap)
        }
    };
    heatmap = heatmap
        .title(opt.title)
        .colorbar_label(opt.colorbar_label);
    if opt.ascending_rows {
        heatmap = heatmap.ascending_rows();
    }
    if let Some(path) = &opt.labels {
        let table =
            Table::from_path(path).with_context(|| format!("failed to load {:?}", path))?;
        heatmap = heatmap.labels(LabelMap::from_table(&table));
    }
    heatmap
        .draw(&grid)
        .with_context(|| format!("failed to draw {:?}", opt.output))?;

    Ok(())
}
