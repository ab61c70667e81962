//! Station illumination
//!
//! Error bars of the illuminance measured at each station, one series per
//! setup of the condenser.

use anyhow::Context;
use labplot::{plot::errorbars::GroupedErrorBars, Table};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "illumination", about = "Grouped error bars of station illuminance")]
struct Opt {
    /// Measurement table: station followed by a (value, error) pair of columns per series
    #[structopt(parse(from_os_str), default_value = "e_bis_g.txt")]
    table: PathBuf,
    /// Series names, in table order
    #[structopt(
        short,
        long,
        use_delimiter = true,
        default_value = "362.e,362.f,362.g 1,362.g 2"
    )]
    names: Vec<String>,
    /// Figure title
    #[structopt(short, long, default_value = "Beleuchtung der Punkte")]
    title: String,
    /// x axis label
    #[structopt(long, default_value = "Messpunkt")]
    x_label: String,
    /// y axis label
    #[structopt(long, default_value = "Ausleuchtung [lx]")]
    y_label: String,
    /// Figure file (.svg or .png)
    #[structopt(short, long, parse(from_os_str), default_value = "370_e.svg")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Opt::from_args();

    let table = Table::from_path(&opt.table)
        .with_context(|| format!("failed to load {:?}", opt.table))?;
    GroupedErrorBars::new(opt.names)
        .title(opt.title)
        .x_label(opt.x_label)
        .y_label(opt.y_label)
        .output(&opt.output)
        .draw(&table)
        .with_context(|| format!("failed to plot {:?}", opt.table))?;

    Ok(())
}
