//! Chart appearance as an explicit configuration value, passed into every
//! renderer call instead of living in process-wide state.

/// Slice/series colors, assigned to employees in directory order.
pub const PALETTE: &[&str] = &[
    "#4878cf", "#d65f5f", "#6acc65", "#b47cc7", "#c4ad66", "#77bedb", "#e5ae38", "#8c8c8c",
];

#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub bar_fill: &'static str,
    pub axis_color: &'static str,
    pub stroke_width: f64,
    pub font_size: f64,
    pub title_font_size: f64,
    pub palette: &'static [&'static str],
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 700.0,
            margin: 70.0,
            bar_fill: PALETTE[0],
            axis_color: "black",
            stroke_width: 2.0,
            font_size: 14.0,
            title_font_size: 20.0,
            palette: PALETTE,
        }
    }
}

impl ChartStyle {
    /// Series color for the `i`-th employee, cycling past the palette end.
    pub fn series_color(&self, i: usize) -> &'static str {
        self.palette[i % self.palette.len()]
    }
}
