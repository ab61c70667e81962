//! Abbe method
//!
//! The two line fits of the focal length measurement with the Abbe method,
//! both from the same 11 columns table:
//!  - x [cm] against 1 + 1/γ (columns 3 & 7, errors in columns 4 & 8)
//!  - x' [cm] against 1 + γ (columns 5 & 9, errors in columns 6 & 10)

use anyhow::Context;
use labplot::{
    plot::linear::{lin_fit, FitPlot},
    Columns, Series, Table,
};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "abbe", about = "Abbe method line fits")]
struct Opt {
    /// Measurement table
    #[structopt(parse(from_os_str), default_value = "a.txt")]
    table: PathBuf,
    /// Figure files prefix, the fits are saved to `<prefix>_1.svg` and `<prefix>_2.svg`
    #[structopt(short, long, default_value = "370_a")]
    prefix: String,
    /// Save PNG instead of SVG figures
    #[structopt(long)]
    png: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Opt::from_args();
    let ext = if opt.png { "png" } else { "svg" };

    let table = Table::from_path(&opt.table)
        .with_context(|| format!("failed to load {:?}", opt.table))?;
    anyhow::ensure!(
        table.n_cols() == 11,
        "expected 11 columns in {:?}, found {}",
        opt.table,
        table.n_cols()
    );

    let fits = [
        (
            Columns::new(7, 3).x_err(8).y_err(4),
            "Abbesches Verfahren 1",
            "1 + 1/gamma",
            "x [cm]",
        ),
        (
            Columns::new(9, 5).x_err(10).y_err(6),
            "Abbesches Verfahren 2",
            "1 + gamma",
            "x' [cm]",
        ),
    ];
    for (k, (columns, title, x_label, y_label)) in fits.into_iter().enumerate() {
        let series = Series::from_table(&table, &columns)?;
        let plot = FitPlot::new(format!("{}_{}.{}", opt.prefix, k + 1, ext))
            .title(title)
            .x_label(x_label)
            .y_label(y_label);
        lin_fit(&series, &plot).with_context(|| format!("{} failed", title))?;
    }

    Ok(())
}
