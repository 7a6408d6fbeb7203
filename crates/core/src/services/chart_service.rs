use crate::models::analytics::CategoryShare;
use crate::models::chart::{Palette, PieChart, PieSlice};

/// Angle of the first slice edge, in degrees (12 o'clock).
const START_ANGLE: f64 = 90.0;

/// Generates chart-ready geometry from category distributions.
///
/// The core computes every angle and colour; the dashboard and the PDF
/// writer only draw. Each projection asks for its own chart.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Build a donut chart from a distribution.
    ///
    /// Categories with a non-positive value are dropped. Returns `None`
    /// when nothing is left to draw. Slices keep the distribution's order
    /// and run counter-clockwise from 12 o'clock.
    #[must_use]
    pub fn pie_chart(
        &self,
        distribution: &[CategoryShare],
        title: &str,
        palette: Palette,
    ) -> Option<PieChart> {
        let positive: Vec<&CategoryShare> = distribution.iter().filter(|c| c.value > 0.0).collect();
        if positive.is_empty() {
            return None;
        }

        let total: f64 = positive.iter().map(|c| c.value).sum();
        let colors = palette.colors(positive.len());

        let mut angle = START_ANGLE;
        let slices = positive
            .into_iter()
            .zip(colors)
            .map(|(category, color)| {
                let fraction = category.value / total;
                let start_angle = angle;
                angle += fraction * 360.0;
                PieSlice {
                    label: category.label.clone(),
                    value: category.value,
                    pct: fraction * 100.0,
                    color,
                    start_angle,
                    end_angle: angle,
                }
            })
            .collect();

        Some(PieChart {
            title: title.to_string(),
            slices,
        })
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
