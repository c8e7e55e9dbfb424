//! Terminal pie chart for an allocation, plus a Chart.js-compatible export.
//!
//! Rendering is pure: the same allocation always produces the same string.

use crossterm::style::{Color, Stylize};
use serde::Serialize;
use std::fmt::Write as _;

use super::allocation::Allocation;

/// Horizontal cells are half as tall as they are wide, so each sample is
/// drawn as two characters to keep the pie round.
const CELL: &str = "██";

/// Renders an allocation as a colored pie with a legend underneath.
#[derive(Debug, Clone, Copy)]
pub struct PieChart {
    radius: usize,
}

impl PieChart {
    #[must_use]
    pub const fn new(radius: usize) -> Self {
        Self { radius }
    }

    /// Draws the pie and legend into a string. With nothing allocated there
    /// is no disc to draw and only the legend is produced.
    #[must_use]
    pub fn render(&self, allocation: &Allocation) -> String {
        let shares = allocation.shares();
        let mut out = String::new();

        if shares.iter().sum::<f64>() > 0.0 {
            self.render_disc(allocation, &shares, &mut out);
        }
        Self::render_legend(allocation, &shares, &mut out);
        out
    }

    fn render_disc(&self, allocation: &Allocation, shares: &[f64], out: &mut String) {
        let r = self.radius as f64;
        let radius = i64::try_from(self.radius).unwrap_or(i64::MAX);

        for row in -radius..=radius {
            for col in -radius..=radius {
                let x = col as f64;
                let y = row as f64;
                let distance = x.hypot(y);
                if distance > r + 0.5 {
                    out.push_str("  ");
                    continue;
                }

                let slice = Self::slice_at(shares, x, y);
                let color = allocation.colors()[slice];
                // The rim takes the slice's border color, the inside its fill
                let (cr, cg, cb) = if distance > r - 0.5 {
                    let rgba = color.border;
                    (rgba.r, rgba.g, rgba.b)
                } else {
                    color.fill.over_white()
                };
                let _ = write!(out, "{}", CELL.with(Color::Rgb { r: cr, g: cg, b: cb }));
            }
            out.push('\n');
        }
        out.push('\n');
    }

    /// Which slice owns the cell at (x, y), measuring the angle clockwise
    /// from twelve o'clock the way Chart.js lays out a pie.
    fn slice_at(shares: &[f64], x: f64, y: f64) -> usize {
        let mut angle = x.atan2(-y) / std::f64::consts::TAU;
        if angle < 0.0 {
            angle += 1.0;
        }

        let mut cumulative = 0.0;
        for (i, share) in shares.iter().enumerate() {
            cumulative += share;
            if angle < cumulative {
                return i;
            }
        }
        shares.len() - 1
    }

    fn render_legend(allocation: &Allocation, shares: &[f64], out: &mut String) {
        let width = allocation
            .assets()
            .iter()
            .map(|asset| asset.as_str().len())
            .max()
            .unwrap_or(0);

        for (i, asset) in allocation.assets().iter().enumerate() {
            let rgba = allocation.colors()[i].border;
            let swatch = "■".with(Color::Rgb {
                r: rgba.r,
                g: rgba.g,
                b: rgba.b,
            });
            let _ = writeln!(
                out,
                "{swatch} {:width$}  {:>5.1}%",
                asset.as_str(),
                shares[i] * 100.0,
            );
        }
    }
}

impl Default for PieChart {
    fn default() -> Self {
        Self::new(9)
    }
}

#[derive(Debug, Serialize)]
struct ChartDataset {
    data: Vec<f64>,
    #[serde(rename = "backgroundColor")]
    background_color: Vec<String>,
    #[serde(rename = "borderColor")]
    border_color: Vec<String>,
    #[serde(rename = "borderWidth")]
    border_width: u8,
}

#[derive(Debug, Serialize)]
struct ChartData {
    labels: Vec<String>,
    datasets: Vec<ChartDataset>,
}

/// Chart.js pie configuration for an allocation
#[derive(Debug, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    kind: &'static str,
    data: ChartData,
}

impl ChartConfig {
    #[must_use]
    pub fn from_allocation(allocation: &Allocation) -> Self {
        Self {
            kind: "pie",
            data: ChartData {
                labels: allocation
                    .assets()
                    .iter()
                    .map(|asset| asset.as_str().to_string())
                    .collect(),
                datasets: vec![ChartDataset {
                    data: allocation.weights().to_vec(),
                    background_color: allocation
                        .colors()
                        .iter()
                        .map(|color| color.fill.css())
                        .collect(),
                    border_color: allocation
                        .colors()
                        .iter()
                        .map(|color| color.border.css())
                        .collect(),
                    border_width: 1,
                }],
            },
        }
    }

    /// Pretty-printed JSON form.
    ///
    /// # Errors
    /// * If serialization fails
    pub fn to_json(&self) -> eyre::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_is_idempotent() {
        let allocation = Allocation::default_mix();
        let chart = PieChart::default();
        assert_eq!(chart.render(&allocation), chart.render(&allocation));
    }

    #[test]
    fn test_legend_lists_every_asset() {
        let allocation = Allocation::default_mix();
        let rendered = PieChart::new(4).render(&allocation);
        for asset in allocation.assets() {
            assert!(rendered.contains(asset.as_str()), "missing {asset}");
        }
        assert!(rendered.contains("20.0%"));
    }

    #[test]
    fn test_slice_at_quarters() {
        // Two equal slices split the disc at six o'clock
        let shares = [0.5, 0.5];
        assert_eq!(PieChart::slice_at(&shares, 1.0, -1.0), 0);
        assert_eq!(PieChart::slice_at(&shares, 1.0, 0.0), 0);
        assert_eq!(PieChart::slice_at(&shares, -1.0, 0.0), 1);
        assert_eq!(PieChart::slice_at(&shares, -1.0, -1.0), 1);
    }

    #[test]
    fn test_zero_total_renders_legend_only() {
        use crate::portfolio::asset::{AssetName, SliceColor};

        let color = SliceColor::translucent(7, 7, 7);
        let allocation = Allocation::new(
            vec![AssetName::from("A")],
            vec![0.0],
            vec![color],
        )
        .unwrap();

        let rendered = PieChart::default().render(&allocation);
        assert!(!rendered.contains(CELL));
        assert!(rendered.contains("A"));
        assert!(rendered.contains("0.0%"));
    }

    #[test]
    fn test_chart_config_json() {
        let allocation = Allocation::default_mix();
        let json = ChartConfig::from_allocation(&allocation).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["type"], "pie");
        assert_eq!(value["data"]["labels"][1], "Bitcoin");
        let dataset = &value["data"]["datasets"][0];
        assert_eq!(dataset["data"][2], 5.0);
        assert_eq!(dataset["backgroundColor"][0], "rgba(0, 0, 255, 0.2)");
        assert_eq!(dataset["borderColor"][8], "rgba(0, 255, 255, 1)");
        assert_eq!(dataset["borderWidth"], 1);
    }
}
