//! Named color scales

use plotters::style::RGBColor;
use strum_macros::{Display, EnumIter, EnumString};

/// Color scale identifiers, parsed from their lowercase names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ColorMap {
    #[default]
    Plasma,
    Viridis,
    Inferno,
    Magma,
    Cividis,
    Turbo,
    RdBu,
    /// reversed [`ColorMap::RdBu`]: blue for low, red for high values
    BlueRed,
    RdYlBu,
    Spectral,
    PiYG,
    BrBG,
    PuOr,
}
impl ColorMap {
    fn gradient(&self) -> colorous::Gradient {
        match self {
            ColorMap::Plasma => colorous::PLASMA,
            ColorMap::Viridis => colorous::VIRIDIS,
            ColorMap::Inferno => colorous::INFERNO,
            ColorMap::Magma => colorous::MAGMA,
            ColorMap::Cividis => colorous::CIVIDIS,
            ColorMap::Turbo => colorous::TURBO,
            ColorMap::RdBu | ColorMap::BlueRed => colorous::RED_BLUE,
            ColorMap::RdYlBu => colorous::RED_YELLOW_BLUE,
            ColorMap::Spectral => colorous::SPECTRAL,
            ColorMap::PiYG => colorous::PINK_GREEN,
            ColorMap::BrBG => colorous::BROWN_GREEN,
            ColorMap::PuOr => colorous::PURPLE_ORANGE,
        }
    }
    /// Diverging scales are centered on the middle of the range
    pub fn is_diverging(&self) -> bool {
        !matches!(
            self,
            ColorMap::Plasma
                | ColorMap::Viridis
                | ColorMap::Inferno
                | ColorMap::Magma
                | ColorMap::Cividis
                | ColorMap::Turbo
        )
    }
    /// Color at the normalized position `t`, clamped to `[0, 1]`
    pub fn eval(&self, t: f64) -> RGBColor {
        let t = if t.is_nan() { 0f64 } else { t.clamp(0f64, 1f64) };
        let t = match self {
            ColorMap::BlueRed => 1f64 - t,
            _ => t,
        };
        let color = self.gradient().eval_continuous(t);
        RGBColor(color.r, color.g, color.b)
    }
    /// Color of `value` within `(min, max)`
    pub fn color(&self, value: f64, (min, max): (f64, f64)) -> RGBColor {
        self.eval((value - min) / (max - min))
    }
}
