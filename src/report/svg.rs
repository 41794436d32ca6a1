//! Inline SVG line and bar charts.

use std::fmt::Write as _;

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 460.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 120.0;

/// One labelled data point.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// X-axis tick label.
    pub label: String,
    /// Plotted value.
    pub value: f64,
    /// Text drawn next to the point or on top of the bar.
    pub annotation: String,
}

/// Axis titles and chart heading.
#[derive(Debug, Clone, Copy)]
pub struct ChartText<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
}

/// Escape text for use in HTML or SVG content and attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn plot_height() -> f64 {
    HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

fn plot_width() -> f64 {
    WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn y_for(value: f64, max: f64) -> f64 {
    let ratio = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
    MARGIN_TOP + plot_height() * (1.0 - ratio)
}

fn open_svg(out: &mut String, text: ChartText<'_>) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" role="img" aria-label="{title}">"#,
        title = escape(text.title)
    );
    let _ = write!(
        out,
        r#"<text x="{x}" y="28" text-anchor="middle" class="chart-title">{title}</text>"#,
        x = WIDTH / 2.0,
        title = escape(text.title)
    );
    let _ = write!(
        out,
        r#"<line x1="{MARGIN_LEFT}" y1="{bottom}" x2="{right}" y2="{bottom}" class="axis"/><line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{bottom}" class="axis"/>"#,
        bottom = HEIGHT - MARGIN_BOTTOM,
        right = WIDTH - MARGIN_RIGHT,
    );
    let _ = write!(
        out,
        r#"<text x="{x}" y="{y}" text-anchor="middle" class="axis-label">{label}</text>"#,
        x = MARGIN_LEFT + plot_width() / 2.0,
        y = HEIGHT - 12.0,
        label = escape(text.x_label)
    );
    let _ = write!(
        out,
        r#"<text x="22" y="{y}" text-anchor="middle" transform="rotate(-90 22 {y})" class="axis-label">{label}</text>"#,
        y = MARGIN_TOP + plot_height() / 2.0,
        label = escape(text.y_label)
    );
}

fn x_tick(out: &mut String, x: f64, label: &str) {
    let y = HEIGHT - MARGIN_BOTTOM + 16.0;
    let _ = write!(
        out,
        r#"<text x="{x:.1}" y="{y}" text-anchor="end" transform="rotate(-45 {x:.1} {y})" class="tick">{label}</text>"#,
        label = escape(label)
    );
}

fn max_value(points: &[ChartPoint]) -> f64 {
    points.iter().map(|p| p.value).fold(0.0, f64::max)
}

/// Render a line chart with a marker and an annotation at every point.
pub fn line_chart(text: ChartText<'_>, points: &[ChartPoint], color: &str) -> String {
    let mut out = String::new();
    open_svg(&mut out, text);

    let max = max_value(points);
    let step = if points.len() > 1 {
        plot_width() / (points.len() - 1) as f64
    } else {
        0.0
    };
    let coords: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = if points.len() > 1 {
                MARGIN_LEFT + step * i as f64
            } else {
                MARGIN_LEFT + plot_width() / 2.0
            };
            (x, y_for(p.value, max))
        })
        .collect();

    if !coords.is_empty() {
        let path: Vec<String> = coords.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect();
        let _ = write!(
            out,
            r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="4"/>"#,
            path.join(" "),
            color = escape(color)
        );
    }

    for (p, (x, y)) in points.iter().zip(&coords) {
        let _ = write!(
            out,
            r#"<circle cx="{x:.1}" cy="{y:.1}" r="5" fill="{color}"/><text x="{x:.1}" y="{ly:.1}" transform="rotate(-10 {x:.1} {ly:.1})" class="annotation">{note}</text>"#,
            ly = y - 8.0,
            color = escape(color),
            note = escape(&p.annotation)
        );
        x_tick(&mut out, *x, &p.label);
    }

    out.push_str("</svg>");
    out
}

/// Render a vertical bar chart, cycling through `palette` for bar colors.
pub fn bar_chart(text: ChartText<'_>, points: &[ChartPoint], palette: &[&str]) -> String {
    let mut out = String::new();
    open_svg(&mut out, text);

    let max = max_value(points);
    let slot = if points.is_empty() {
        0.0
    } else {
        plot_width() / points.len() as f64
    };
    let bar_width = slot * 0.7;
    let bottom = HEIGHT - MARGIN_BOTTOM;

    for (i, p) in points.iter().enumerate() {
        let center = MARGIN_LEFT + slot * (i as f64 + 0.5);
        let top = y_for(p.value, max);
        let color = if palette.is_empty() {
            "#4c72b0"
        } else {
            palette[i % palette.len()]
        };
        let _ = write!(
            out,
            r#"<rect x="{x:.1}" y="{top:.1}" width="{bar_width:.1}" height="{h:.1}" fill="{color}"/><text x="{center:.1}" y="{ly:.1}" text-anchor="middle" class="annotation">{note}</text>"#,
            x = center - bar_width / 2.0,
            h = bottom - top,
            ly = top - 6.0,
            color = escape(color),
            note = escape(&p.annotation)
        );
        x_tick(&mut out, center, &p.label);
    }

    out.push_str("</svg>");
    out
}
