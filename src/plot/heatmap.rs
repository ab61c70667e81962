//! Annotated heat maps
//!
//! Each cell of a [`Grid`] is filled with the color of its value and annotated
//! with the value rounded to one decimal place, below the station identifier
//! when a [`LabelMap`] is given. The annotation is black on cells at or above
//! the text threshold and white below it.
//!
//! Row 0 of the grid is drawn at the top of the figure.

use super::{caption, save, Figure, PlotError, Result};
use crate::{
    colormap::ColorMap,
    grid::{Grid, LabelMap},
};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};

/// Annotation text color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    Black,
    White,
}
impl TextColor {
    /// Black at or above `threshold`, white below
    pub fn new(value: f64, threshold: f64) -> Self {
        if value >= threshold {
            TextColor::Black
        } else {
            TextColor::White
        }
    }
    fn rgb(&self) -> RGBColor {
        match self {
            TextColor::Black => BLACK,
            TextColor::White => WHITE,
        }
    }
}

/// A laid out heat map cell
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub value: f64,
    pub fill: RGBColor,
    /// station identifier
    pub label: Option<String>,
    /// value rounded to one decimal place
    pub text: String,
    pub text_color: TextColor,
}

/// Heat map figure options
#[derive(Debug, Clone)]
pub struct Heatmap {
    range: Option<(f64, f64)>,
    colormap: ColorMap,
    threshold: f64,
    title: String,
    colorbar_label: String,
    labels: Option<LabelMap>,
    col_ticks: Option<Vec<String>>,
    row_ticks: Option<Vec<String>>,
    ascending_rows: bool,
    output: PathBuf,
}
impl Default for Heatmap {
    fn default() -> Self {
        Self {
            range: None,
            colormap: ColorMap::default(),
            threshold: f64::INFINITY,
            title: String::new(),
            colorbar_label: String::from("Bildausleuchtung in lx"),
            labels: None,
            col_ticks: None,
            row_ticks: None,
            ascending_rows: false,
            output: PathBuf::from("heatmap.svg"),
        }
    }
}
impl Heatmap {
    pub fn new<P: AsRef<Path>>(output: P) -> Self {
        Self {
            output: output.as_ref().to_path_buf(),
            ..Default::default()
        }
    }
    /// Color scale range, the grid value range if not set
    pub fn range(self, min: f64, max: f64) -> Self {
        Self {
            range: Some((min, max)),
            ..self
        }
    }
    pub fn colormap(self, colormap: ColorMap) -> Self {
        Self { colormap, ..self }
    }
    /// Values at or above the threshold get a black annotation, others a white one
    pub fn threshold(self, threshold: f64) -> Self {
        Self { threshold, ..self }
    }
    pub fn title<S: Into<String>>(self, title: S) -> Self {
        Self {
            title: title.into(),
            ..self
        }
    }
    pub fn colorbar_label<S: Into<String>>(self, colorbar_label: S) -> Self {
        Self {
            colorbar_label: colorbar_label.into(),
            ..self
        }
    }
    pub fn labels(self, labels: LabelMap) -> Self {
        Self {
            labels: Some(labels),
            ..self
        }
    }
    /// Column tick labels, "1" to the number of columns if not set
    pub fn col_ticks(self, ticks: Vec<String>) -> Self {
        Self {
            col_ticks: Some(ticks),
            ..self
        }
    }
    /// Row tick labels from the top row, the number of rows down to "1" if not set
    pub fn row_ticks(self, ticks: Vec<String>) -> Self {
        Self {
            row_ticks: Some(ticks),
            ..self
        }
    }
    /// Numbers the default row ticks from "1" at the top
    pub fn ascending_rows(self) -> Self {
        Self {
            ascending_rows: true,
            ..self
        }
    }
    pub fn output<P: AsRef<Path>>(self, output: P) -> Self {
        Self {
            output: output.as_ref().to_path_buf(),
            ..self
        }
    }
    /// Color scale range for `grid`
    pub fn scale(&self, grid: &Grid) -> Result<(f64, f64)> {
        let (min, max) = match self.range {
            Some(range) => range,
            None => {
                let (min, max) = grid.range().ok_or(PlotError::Empty)?;
                if self.colormap.is_diverging() {
                    let extent = min.abs().max(max.abs());
                    (-extent, extent)
                } else {
                    (min, max)
                }
            }
        };
        match (min, max) {
            (min, max) if min < max => Ok((min, max)),
            (min, max) if self.range.is_none() && min == max => Ok((min - 0.5, max + 0.5)),
            (min, max) => Err(PlotError::Range(min, max)),
        }
    }
    /// Column tick labels
    pub fn x_ticks(&self, n_cols: usize) -> Vec<String> {
        self.col_ticks
            .clone()
            .unwrap_or_else(|| (1..=n_cols).map(|k| k.to_string()).collect())
    }
    /// Row tick labels, from the top row down
    pub fn y_ticks(&self, n_rows: usize) -> Vec<String> {
        self.row_ticks.clone().unwrap_or_else(|| {
            if self.ascending_rows {
                (1..=n_rows).map(|k| k.to_string()).collect()
            } else {
                (1..=n_rows).rev().map(|k| k.to_string()).collect()
            }
        })
    }
    /// Lays out the cells of `grid`
    pub fn cells(&self, grid: &Grid) -> Result<Vec<Cell>> {
        if let Some(labels) = &self.labels {
            if labels.shape() != grid.shape() {
                return Err(PlotError::Shape {
                    grid: grid.shape(),
                    labels: labels.shape(),
                });
            }
        }
        let range = self.scale(grid)?;
        Ok(grid
            .iter()
            .map(|(row, col, value)| Cell {
                row,
                col,
                value,
                fill: self.colormap.color(value, range),
                label: self
                    .labels
                    .as_ref()
                    .and_then(|labels| labels.label(row, col)),
                text: format!("{:.1}", value),
                text_color: TextColor::new(value, self.threshold),
            })
            .collect())
    }
    /// Saves the figure of `grid`
    pub fn draw(&self, grid: &Grid) -> Result<()> {
        let (n_rows, n_cols) = grid.shape();
        if n_rows == 0 || n_cols == 0 {
            return Err(PlotError::Empty);
        }
        let figure = HeatmapFigure {
            options: self,
            shape: grid.shape(),
            range: self.scale(grid)?,
            cells: self.cells(grid)?,
            x_ticks: self.x_ticks(n_cols),
            y_ticks: self.y_ticks(n_rows),
        };
        save(&figure, &self.output)
    }
}

struct HeatmapFigure<'a> {
    options: &'a Heatmap,
    shape: (usize, usize),
    range: (f64, f64),
    cells: Vec<Cell>,
    x_ticks: Vec<String>,
    y_ticks: Vec<String>,
}
impl HeatmapFigure<'_> {
    /// Tick label at the integer position `value`
    fn tick(ticks: &[String], value: f64) -> String {
        let k = value.round();
        if (value - k).abs() > 1e-6 || k < 0f64 {
            return String::new();
        }
        ticks.get(k as usize).cloned().unwrap_or_default()
    }
}
impl Figure for HeatmapFigure<'_> {
    fn size(&self) -> (u32, u32) {
        (900, 600)
    }
    fn draw_on<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let (n_rows, n_cols) = self.shape;
        let (width, _) = root.dim_in_pixel();
        let (map_area, colorbar_area) = root.split_horizontally(width.saturating_sub(140));

        // cell centers at integer coordinates, row 0 at the top
        let y_of = |row: usize| (n_rows - 1 - row) as f64;

        let mut builder = ChartBuilder::on(&map_area);
        if let Some(title) = caption(&self.options.title) {
            builder.caption(title, ("sans-serif", 22));
        }
        let mut chart = builder
            .set_label_area_size(LabelAreaPosition::Left, 40)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .margin(15)
            .build_cartesian_2d(-0.5..n_cols as f64 - 0.5, -0.5..n_rows as f64 - 0.5)?;
        let x_formatter = |v: &f64| Self::tick(&self.x_ticks, *v);
        let y_formatter = |v: &f64| {
            let k = v.round();
            if k < 0f64 || k >= n_rows as f64 {
                return String::new();
            }
            // y position k shows the row n_rows - 1 - k
            Self::tick(&self.y_ticks, (n_rows as f64 - 1f64 - k) + (v - k))
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(n_cols)
            .y_labels(n_rows)
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .draw()?;

        chart.draw_series(self.cells.iter().map(|cell| {
            let (x, y) = (cell.col as f64, y_of(cell.row));
            Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], cell.fill.filled())
        }))?;

        let has_labels = self.cells.iter().any(|cell| cell.label.is_some());
        let text_style = |color: TextColor| {
            ("sans-serif", 14)
                .into_font()
                .color(&color.rgb())
                .pos(Pos::new(HPos::Center, VPos::Center))
        };
        let value_offset = if has_labels { 8 } else { 0 };
        chart.draw_series(self.cells.iter().map(|cell| {
            EmptyElement::at((cell.col as f64, y_of(cell.row)))
                + Text::new(
                    cell.text.clone(),
                    (0, value_offset),
                    text_style(cell.text_color),
                )
        }))?;
        chart.draw_series(self.cells.iter().filter_map(|cell| {
            cell.label.as_ref().map(|label| {
                EmptyElement::at((cell.col as f64, y_of(cell.row)))
                    + Text::new(label.clone(), (0, -8), text_style(cell.text_color))
            })
        }))?;

        // colorbar
        let (min, max) = self.range;
        let mut colorbar = ChartBuilder::on(&colorbar_area)
            .margin_top(40)
            .margin_bottom(55)
            .margin_left(10)
            .set_label_area_size(LabelAreaPosition::Right, 80)
            .build_cartesian_2d(0f64..1f64, min..max)?;
        let steps = 256;
        let step = (max - min) / steps as f64;
        colorbar.draw_series((0..steps).map(|k| {
            let lo = min + k as f64 * step;
            Rectangle::new(
                [(0f64, lo), (1f64, lo + step)],
                self.options.colormap.color(lo + 0.5 * step, self.range).filled(),
            )
        }))?;
        colorbar
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .disable_x_axis()
            .y_labels(7)
            .y_desc(self.options.colorbar_label.as_str())
            .draw()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::{render, Format};

    fn grid() -> Grid {
        Grid::new(
            vec![
                2.0, 4.5, 6.0, //
                8.0, 10.0, 12.5,
            ],
            (2, 3),
        )
        .unwrap()
    }

    #[test]
    fn all_below_threshold_is_white() {
        let cells = Heatmap::default().threshold(100.).cells(&grid()).unwrap();
        assert!(cells.iter().all(|cell| cell.text_color == TextColor::White));
    }

    #[test]
    fn all_above_threshold_is_black() {
        let cells = Heatmap::default().threshold(2.).cells(&grid()).unwrap();
        assert!(cells.iter().all(|cell| cell.text_color == TextColor::Black));
    }

    #[test]
    fn mixed_values_follow_the_cell_rule() {
        let threshold = 6.;
        let labels = LabelMap::new(vec![1., 2., 3., 3.5, 5., 6.], (2, 3)).unwrap();
        let cells = Heatmap::default()
            .threshold(threshold)
            .labels(labels)
            .cells(&grid())
            .unwrap();
        let colors: Vec<_> = cells.iter().map(|cell| cell.text_color).collect();
        use TextColor::*;
        assert_eq!(colors, vec![White, White, Black, Black, Black, Black]);
        // station 3.5 follows the same rule
        let sentinel = &cells[3];
        assert_eq!(sentinel.label.as_deref(), Some("3.5"));
        assert_eq!(sentinel.text_color, TextColor::new(sentinel.value, threshold));
    }

    #[test]
    fn annotations() {
        let labels = LabelMap::new(vec![1., 2., 3., 3.5, 5., 6.], (2, 3)).unwrap();
        let cells = Heatmap::default().labels(labels).cells(&grid()).unwrap();
        assert_eq!(cells[1].label.as_deref(), Some("2"));
        assert_eq!(cells[1].text, "4.5");
        assert_eq!(cells[5].text, "12.5");
        let cells = Heatmap::default().cells(&grid()).unwrap();
        assert!(cells.iter().all(|cell| cell.label.is_none()));
    }

    #[test]
    fn label_map_shape_mismatch() {
        let labels = LabelMap::new(vec![1.; 4], (2, 2)).unwrap();
        assert!(matches!(
            Heatmap::default().labels(labels).cells(&grid()),
            Err(PlotError::Shape {
                grid: (2, 3),
                labels: (2, 2)
            })
        ));
    }

    #[test]
    fn default_ticks() {
        let heatmap = Heatmap::default();
        assert_eq!(heatmap.x_ticks(6), vec!["1", "2", "3", "4", "5", "6"]);
        assert_eq!(heatmap.y_ticks(4), vec!["4", "3", "2", "1"]);
        assert_eq!(
            Heatmap::default().ascending_rows().y_ticks(3),
            vec!["1", "2", "3"]
        );
        assert_eq!(HeatmapFigure::tick(&heatmap.x_ticks(6), 2.), "3");
        assert_eq!(HeatmapFigure::tick(&heatmap.x_ticks(6), 2.5), "");
    }

    #[test]
    fn color_scale() {
        let heatmap = Heatmap::default().range(0., 10.);
        let cells = heatmap.cells(&grid()).unwrap();
        assert_eq!(cells[0].fill, ColorMap::Plasma.eval(0.2));
        assert_eq!(cells[5].fill, ColorMap::Plasma.eval(1.));
        assert_eq!(Heatmap::default().scale(&grid()).unwrap(), (2., 12.5));
        assert_eq!(
            Heatmap::default()
                .colormap(ColorMap::RdBu)
                .scale(&grid())
                .unwrap(),
            (-12.5, 12.5)
        );
        assert!(matches!(
            Heatmap::default().range(1., 1.).scale(&grid()),
            Err(PlotError::Range(..))
        ));
    }

    #[test]
    fn difference_mode() {
        let a = Grid::new(vec![2.0, 3.1, 4.0, 5.5], (2, 2)).unwrap();
        let b = Grid::new(vec![2.3, 3.0, 4.0, 9.1], (2, 2)).unwrap();
        let diff = a.difference(&b).unwrap();
        let cells = Heatmap::default()
            .colormap(ColorMap::RdBu)
            .range(-3.6, 3.6)
            .threshold(-5.)
            .cells(&diff)
            .unwrap();
        let texts: Vec<_> = cells.iter().map(|cell| cell.text.as_str()).collect();
        assert_eq!(texts, vec!["0.3", "-0.1", "0.0", "3.6"]);
        assert!(cells.iter().all(|cell| cell.text_color == TextColor::Black));
        assert_eq!(cells[2].fill, ColorMap::RdBu.eval(0.5));
    }

    #[test]
    fn label_map_mismatch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("map.png");
        let labels = LabelMap::new(vec![1.; 6], (3, 2)).unwrap();
        assert!(Heatmap::new(&output).labels(labels).draw(&grid()).is_err());
        assert!(!output.exists());
    }

    /// Cell fills of a heat map, without annotations or ticks
    struct CellFills {
        shape: (usize, usize),
        cells: Vec<Cell>,
    }
    impl Figure for CellFills {
        fn draw_on<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
            let (n_rows, n_cols) = self.shape;
            let mut chart = ChartBuilder::on(root)
                .margin(10)
                .build_cartesian_2d(-0.5..n_cols as f64 - 0.5, -0.5..n_rows as f64 - 0.5)?;
            chart.draw_series(self.cells.iter().map(|cell| {
                let (x, y) = (cell.col as f64, (n_rows - 1 - cell.row) as f64);
                Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], cell.fill.filled())
            }))?;
            Ok(())
        }
    }

    #[test]
    fn identical_cell_renders() {
        let a = Grid::new(vec![2.0, 3.1, 4.0, 5.5, 1.2, 0.4], (2, 3)).unwrap();
        let b = Grid::new(vec![2.3, 3.0, 4.0, 9.1, 0.2, 0.9], (2, 3)).unwrap();
        let heatmap = Heatmap::default().colormap(ColorMap::RdBu).range(-3.6, 3.6);
        let figure = |grid: &Grid| CellFills {
            shape: grid.shape(),
            cells: heatmap.cells(grid).unwrap(),
        };
        for grid in [a.clone(), a.difference(&b).unwrap()] {
            for format in [Format::Png, Format::Svg] {
                assert_eq!(
                    render(&figure(&grid), format).unwrap(),
                    render(&figure(&grid), format).unwrap()
                );
            }
        }
    }

    #[test]
    #[ignore = "text layout needs a system font"]
    fn identical_renders() {
        let heatmap = Heatmap::default().threshold(6.).title("Bildausleuchtung");
        let grid = grid();
        let figure = HeatmapFigure {
            options: &heatmap,
            shape: grid.shape(),
            range: heatmap.scale(&grid).unwrap(),
            cells: heatmap.cells(&grid).unwrap(),
            x_ticks: heatmap.x_ticks(3),
            y_ticks: heatmap.y_ticks(2),
        };
        assert_eq!(
            render(&figure, Format::Png).unwrap(),
            render(&figure, Format::Png).unwrap()
        );
        assert_eq!(
            render(&figure, Format::Svg).unwrap(),
            render(&figure, Format::Svg).unwrap()
        );
    }
}
