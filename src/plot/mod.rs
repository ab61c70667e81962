//! Figures
//!
//! Every figure is drawn in memory, either as SVG or as an RGB bitmap depending on
//! the extension of the output file, and written to disk once drawing is complete.
//! A figure that fails to draw leaves no file behind.

use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::{fmt::Display, io::Cursor, path::Path};

pub mod errorbars;
pub mod heatmap;
pub mod linear;

#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("Failed to write the figure")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode the bitmap")]
    Image(#[from] image::ImageError),
    #[error("Failed to draw the figure: {0}")]
    Drawing(String),
    #[error("Unsupported figure format {0:?}, use .svg or .png")]
    Format(String),
    #[error("Expected {expected} columns (x + {n_series} value/error pairs), found {found}")]
    ColumnCount {
        found: usize,
        expected: usize,
        n_series: usize,
    },
    #[error("Label map shape {labels:?} does not match the grid shape {grid:?}")]
    Shape {
        grid: (usize, usize),
        labels: (usize, usize),
    },
    #[error("Invalid color scale range [{0}, {1}]")]
    Range(f64, f64),
    #[error("Nothing to plot")]
    Empty,
}
impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Drawing(e.to_string())
    }
}
pub type Result<T> = std::result::Result<T, PlotError>;

/// Figure file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Svg,
    Png,
}
impl Format {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());
        match ext.as_deref() {
            Some("svg") => Ok(Format::Svg),
            Some("png") => Ok(Format::Png),
            _ => Err(PlotError::Format(path.as_ref().display().to_string())),
        }
    }
}

/// A figure that can be drawn on any plotters backend
pub trait Figure {
    /// Figure size in pixels
    fn size(&self) -> (u32, u32) {
        (768, 512)
    }
    fn draw_on<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>;
}

/// Draws the figure in memory and returns the file content
pub fn render<F: Figure>(figure: &F, format: Format) -> Result<Vec<u8>> {
    let (width, height) = figure.size();
    match format {
        Format::Svg => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
                root.fill(&WHITE)?;
                figure.draw_on(&root)?;
                root.present()?;
            }
            Ok(svg.into_bytes())
        }
        Format::Png => {
            let mut buffer = vec![0u8; width as usize * height as usize * 3];
            {
                let root =
                    BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
                root.fill(&WHITE)?;
                figure.draw_on(&root)?;
                root.present()?;
            }
            let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
                PlotError::Drawing(String::from("bitmap buffer size mismatch"))
            })?;
            let mut png = Cursor::new(Vec::new());
            image.write_to(&mut png, ImageFormat::Png)?;
            Ok(png.into_inner())
        }
    }
}

/// Draws the figure and saves it to `path`, overwriting any previous file
pub fn save<F: Figure, P: AsRef<Path>>(figure: &F, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = render(figure, Format::from_path(path)?)?;
    std::fs::write(path, bytes)?;
    log::info!("figure written to {:?}", path);
    Ok(())
}

/// Pads a data range by 5% on each side, or by 1 if the range is empty
pub(crate) fn padded((min, max): (f64, f64)) -> std::ops::Range<f64> {
    let pad = if max > min { 0.05 * (max - min) } else { 1f64 };
    (min - pad)..(max + pad)
}

/// Caption of the figure title
pub(crate) fn caption<T: Display>(title: T) -> Option<String> {
    let title = title.to_string();
    (!title.is_empty()).then_some(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats() {
        assert_eq!(Format::from_path("fit.svg").unwrap(), Format::Svg);
        assert_eq!(Format::from_path("maps/e.PNG").unwrap(), Format::Png);
        assert!(matches!(
            Format::from_path("370_a.pdf"),
            Err(PlotError::Format(_))
        ));
        assert!(matches!(Format::from_path("fit"), Err(PlotError::Format(_))));
    }

    /// Markers, whiskers and a line, without any text
    struct Shapes;
    impl Figure for Shapes {
        fn size(&self) -> (u32, u32) {
            (320, 240)
        }
        fn draw_on<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
            let mut chart = ChartBuilder::on(root)
                .margin(10)
                .build_cartesian_2d(padded((1., 4.)), padded((2., 10.)))?;
            let points = [(1., 3.1, 0.2), (2., 4.9, 0.3), (3., 7.2, 0.2), (4., 8.8, 0.4)];
            chart.draw_series(
                points
                    .iter()
                    .map(|&(x, y, e)| ErrorBar::new_vertical(x, y - e, y, y + e, BLUE.filled(), 4)),
            )?;
            chart.draw_series(
                points
                    .iter()
                    .map(|&(x, y, _)| Cross::new((x, y), 4, BLUE.stroke_width(1))),
            )?;
            chart.draw_series(LineSeries::new(
                [(1., 3.), (4., 9.)],
                RED.stroke_width(2),
            ))?;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(2.5, 2.5), (3.5, 4.)],
                GREEN.mix(0.5).filled(),
            )))?;
            Ok(())
        }
    }

    #[test]
    fn identical_renders_without_text() {
        for format in [Format::Svg, Format::Png] {
            let first = render(&Shapes, format).unwrap();
            let second = render(&Shapes, format).unwrap();
            assert!(!first.is_empty());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("shapes.png");
        std::fs::write(&output, b"stale").unwrap();
        save(&Shapes, &output).unwrap();
        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(bytes, render(&Shapes, Format::Png).unwrap());
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn padding() {
        assert_eq!(padded((0., 10.)), -0.5..10.5);
        assert_eq!(padded((2., 2.)), 1.0..3.0);
    }
}
