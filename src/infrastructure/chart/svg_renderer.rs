// ============================================================
// SVG BAR CHART RENDERER
// ============================================================
// Grouped bars, one colour per series, zero baseline

use std::fmt::Write;

use crate::domain::chart::BarChart;

const SERIES_COLORS: [&str; 2] = ["#1f77b4", "#ff7f0e"];
const MARGIN: f64 = 40.0;

/// Renders a [`BarChart`] as a standalone SVG document
pub struct SvgRenderer {
    width: f64,
    height: f64,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 320.0,
        }
    }
}

impl SvgRenderer {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn render(&self, chart: &BarChart) -> String {
        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );

        let plot_width = (self.width - 2.0 * MARGIN).max(1.0);
        let plot_height = (self.height - 2.0 * MARGIN).max(1.0);

        // The value axis always includes zero so bars grow from a baseline
        let (lo, hi) = chart.value_range().unwrap_or((0.0, 0.0));
        let lo = lo.min(0.0);
        let hi = hi.max(0.0);
        let span = if hi > lo { hi - lo } else { 1.0 };
        let y_of = |v: f64| MARGIN + (hi - v) / span * plot_height;
        let baseline = y_of(0.0);

        let _ = write!(
            svg,
            r##"<line x1="{x1}" y1="{y:.2}" x2="{x2}" y2="{y:.2}" stroke="#333" stroke-width="1"/>"##,
            x1 = MARGIN,
            x2 = MARGIN + plot_width,
            y = baseline
        );

        let categories = chart.categories.len().max(1) as f64;
        let group_width = plot_width / categories;
        let series_count = chart.series.len().max(1) as f64;
        let bar_width = group_width * 0.8 / series_count;

        for (s, series) in chart.series.iter().enumerate() {
            let color = SERIES_COLORS[s % SERIES_COLORS.len()];
            for (c, value) in series.values.iter().enumerate() {
                let Some(v) = value else { continue };
                let x = MARGIN + c as f64 * group_width + group_width * 0.1 + s as f64 * bar_width;
                let y = y_of(v.max(0.0));
                let height = (y_of(v.min(0.0)) - y).abs();
                let _ = write!(
                    svg,
                    r#"<rect x="{x:.2}" y="{y:.2}" width="{bw:.2}" height="{height:.2}" fill="{color}"><title>{name}[{c}] = {v}</title></rect>"#,
                    bw = bar_width,
                    name = escape_xml(&series.name),
                );
            }
        }

        for (s, series) in chart.series.iter().enumerate() {
            let color = SERIES_COLORS[s % SERIES_COLORS.len()];
            let y = 14.0 + s as f64 * 16.0;
            let _ = write!(
                svg,
                r#"<rect x="{x}" y="{ry}" width="10" height="10" fill="{color}"/><text x="{tx}" y="{y}" font-size="12" font-family="sans-serif">{name}</text>"#,
                x = MARGIN,
                ry = y - 9.0,
                tx = MARGIN + 14.0,
                name = escape_xml(&series.name),
            );
        }

        svg.push_str("</svg>");
        svg
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
