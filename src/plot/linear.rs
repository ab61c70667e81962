//! Line fit figure
//!
//! Data points with horizontal and vertical error whiskers and the fitted line.

use super::{caption, padded, save, Figure, PlotError, Result};
use crate::{
    fit::{Fit, FitResult},
    series::Series,
};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

const DATA_COLOR: RGBColor = RGBColor(0x00, 0x42, 0x87);
const FIT_COLOR: RGBColor = RGBColor(0xe9, 0x46, 0x53);
/// Number of line samples per data point
const DENSIFY: usize = 5;

/// Line fit figure options
#[derive(Debug, Clone)]
pub struct FitPlot {
    title: String,
    x_label: String,
    y_label: String,
    data_label: String,
    fit_label: String,
    output: PathBuf,
}
impl Default for FitPlot {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            data_label: String::from("Datenpunkte"),
            fit_label: String::from("Fit"),
            output: PathBuf::from("fit.svg"),
        }
    }
}
impl FitPlot {
    pub fn new<P: AsRef<Path>>(output: P) -> Self {
        Self {
            output: output.as_ref().to_path_buf(),
            ..Default::default()
        }
    }
    pub fn title<S: Into<String>>(self, title: S) -> Self {
        Self {
            title: title.into(),
            ..self
        }
    }
    pub fn x_label<S: Into<String>>(self, x_label: S) -> Self {
        Self {
            x_label: x_label.into(),
            ..self
        }
    }
    pub fn y_label<S: Into<String>>(self, y_label: S) -> Self {
        Self {
            y_label: y_label.into(),
            ..self
        }
    }
    /// Legend entries of the data points and of the line
    pub fn legend<S: Into<String>>(self, data_label: S, fit_label: S) -> Self {
        Self {
            data_label: data_label.into(),
            fit_label: fit_label.into(),
            ..self
        }
    }
    pub fn output(&self) -> &Path {
        &self.output
    }
    /// Saves the figure of `series` and of its `fit`
    pub fn draw(&self, series: &Series, fit: &FitResult) -> Result<()> {
        if series.is_empty() {
            return Err(PlotError::Empty);
        }
        save(
            &FitFigure {
                options: self,
                series,
                fit,
            },
            &self.output,
        )
    }
}

struct FitFigure<'a> {
    options: &'a FitPlot,
    series: &'a Series,
    fit: &'a FitResult,
}
impl<'a> Figure for FitFigure<'a> {
    fn draw_on<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let line = self.fit.line(self.series, DENSIFY);
        let ((x_min, x_max), (y_min, y_max)) = self.series.extent().ok_or(PlotError::Empty)?;
        let (y_min, y_max) = line
            .iter()
            .fold((y_min, y_max), |(lo, hi), (_, y)| (lo.min(*y), hi.max(*y)));

        let mut builder = ChartBuilder::on(root);
        if let Some(title) = caption(&self.options.title) {
            builder.caption(title, ("sans-serif", 20));
        }
        let mut chart = builder
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .margin(10)
            .build_cartesian_2d(padded((x_min, x_max)), padded((y_min, y_max)))?;
        chart
            .configure_mesh()
            .x_desc(self.options.x_label.as_str())
            .y_desc(self.options.y_label.as_str())
            .draw()?;

        chart.draw_series(self.series.iter().map(|(x, y, _, ey)| {
            ErrorBar::new_vertical(x, y - ey, y, y + ey, DATA_COLOR.filled(), 2)
        }))?;
        chart.draw_series(self.series.iter().map(|(x, y, ex, _)| {
            ErrorBar::new_horizontal(y, x - ex, x, x + ex, DATA_COLOR.filled(), 2)
        }))?;
        chart
            .draw_series(
                self.series
                    .iter()
                    .map(|(x, y, ..)| Cross::new((x, y), 4, DATA_COLOR.stroke_width(1))),
            )?
            .label(self.options.data_label.as_str())
            .legend(|(x, y)| Cross::new((x, y), 4, DATA_COLOR.stroke_width(1)));
        chart
            .draw_series(LineSeries::new(line, FIT_COLOR.stroke_width(2)))?
            .label(self.options.fit_label.as_str())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FIT_COLOR.stroke_width(2)));

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .position(SeriesLabelPosition::UpperLeft)
            .draw()?;
        Ok(())
    }
}

/// Fits the series, prints the report and saves the figure
pub fn lin_fit(series: &Series, plot: &FitPlot) -> crate::Result<FitResult> {
    let fit = Fit::new(series).solve()?;
    println!("{}", fit);
    plot.draw(series, &fit)?;
    Ok(fit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::{render, Format};

    fn series() -> Series {
        Series::new(
            vec![1., 2., 3., 4.],
            vec![3.1, 4.9, 7.2, 8.8],
            vec![0.1; 4],
            vec![0.2; 4],
        )
        .unwrap()
    }

    #[test]
    fn too_few_points_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("fit.svg");
        let series = Series::from_xy(vec![1.], vec![1.]).unwrap();
        assert!(matches!(
            lin_fit(&series, &FitPlot::new(&output)),
            Err(crate::Error::Fit(_))
        ));
        assert!(!output.exists());
    }

    #[test]
    fn unsupported_format_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("370_a.pdf");
        let series = series();
        let fit = Fit::new(&series).solve().unwrap();
        assert!(matches!(
            FitPlot::new(&output).draw(&series, &fit),
            Err(PlotError::Format(_))
        ));
        assert!(!output.exists());
    }

    #[test]
    #[ignore = "text layout needs a system font"]
    fn identical_renders() {
        let series = series();
        let fit = Fit::new(&series).solve().unwrap();
        let options = FitPlot::new("fit.svg")
            .title("Abbesches Verfahren 1")
            .x_label("1 + 1/gamma")
            .y_label("x [cm]");
        let figure = FitFigure {
            options: &options,
            series: &series,
            fit: &fit,
        };
        let first = render(&figure, Format::Svg).unwrap();
        let second = render(&figure, Format::Svg).unwrap();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }
}
