//! SVG chart renderers: per-period bars, stacked bars and pies.
//!
//! Renderers are pure functions from prepared series to an [`svg::Document`];
//! writing the artifact to disk is the caller's concern.

use std::f64::consts::PI;

use svg::Document;
use svg::node::Text as TextContent;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Line, Path, Polyline, Rectangle, Text};

use crate::style::ChartStyle;

/// Horizontal reference line (flat budget average or cumulative ceiling).
#[derive(Debug, Clone)]
pub struct RefLine {
    pub value: f64,
    pub label: String,
    pub dashed: bool,
}

/// Fitted-trend overlay: one value per period, marker on the final one.
#[derive(Debug, Clone)]
pub struct TrendOverlay {
    pub curve: Vec<f64>,
}

/// Per-period bar chart with optional reference line and trend overlay.
pub fn bar_chart(
    style: &ChartStyle,
    title: &str,
    y_label: &str,
    labels: &[String],
    values: &[f64],
    reference: Option<&RefLine>,
    trend: Option<&TrendOverlay>,
) -> Document {
    let frame = Frame::fit(
        style,
        values
            .iter()
            .copied()
            .chain(reference.iter().map(|r| r.value))
            .chain(trend.iter().flat_map(|t| t.curve.iter().copied())),
        values.len(),
    );

    let mut doc = base_document(style, title, y_label, &frame);
    doc = draw_period_labels(doc, style, &frame, labels);

    let bar_w = frame.slot_width() * 0.8;
    for (i, v) in values.iter().enumerate() {
        doc = doc.add(bar(&frame, i, bar_w, 0.0, *v, style.bar_fill));
    }

    if let Some(r) = reference {
        doc = draw_ref_line(doc, style, &frame, r);
    }
    if let Some(t) = trend {
        doc = draw_trend(doc, style, &frame, t);
    }
    doc
}

/// Per-period bar chart stacked by series (one color per employee).
pub fn stacked_bar_chart(
    style: &ChartStyle,
    title: &str,
    y_label: &str,
    labels: &[String],
    series: &[(String, Vec<f64>)],
    reference: Option<&RefLine>,
    trend: Option<&TrendOverlay>,
) -> Document {
    let periods = series.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
    let mut totals = vec![0.0; periods];
    for (_, values) in series {
        for (i, v) in values.iter().enumerate() {
            totals[i] += v;
        }
    }

    let frame = Frame::fit(
        style,
        totals
            .iter()
            .copied()
            .chain(reference.iter().map(|r| r.value))
            .chain(trend.iter().flat_map(|t| t.curve.iter().copied())),
        periods,
    );

    let mut doc = base_document(style, title, y_label, &frame);
    doc = draw_period_labels(doc, style, &frame, labels);

    let bar_w = frame.slot_width() * 0.8;
    let mut offsets = vec![0.0; periods];
    for (s, (_, values)) in series.iter().enumerate() {
        let color = style.series_color(s);
        for (i, v) in values.iter().enumerate() {
            if *v == 0.0 {
                continue;
            }
            doc = doc.add(bar(&frame, i, bar_w, offsets[i], offsets[i] + v, color));
            offsets[i] += v;
        }
    }

    // Legend, one swatch per series, top-right of the plot area.
    for (s, (name, _)) in series.iter().enumerate() {
        let x = frame.right() - 150.0;
        let y = frame.top + 8.0 + s as f64 * (style.font_size + 6.0);
        doc = doc
            .add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", y)
                    .set("width", 12.0)
                    .set("height", 12.0)
                    .set("fill", style.series_color(s)),
            )
            .add(text(x + 18.0, y + 11.0, name, "start", style.font_size));
    }

    if let Some(r) = reference {
        doc = draw_ref_line(doc, style, &frame, r);
    }
    if let Some(t) = trend {
        doc = draw_trend(doc, style, &frame, t);
    }
    doc
}

/// Pie of labelled shares. With `explode_last`, the final slice is pulled
/// out of the circle (the "remaining" slice of the budget pie).
pub fn pie_chart(
    style: &ChartStyle,
    title: &str,
    slices: &[(String, f64)],
    explode_last: bool,
) -> Document {
    let mut doc = Document::new()
        .set("viewBox", (0.0, 0.0, style.width, style.height))
        .set("width", style.width)
        .set("height", style.height)
        .add(background(style))
        .add(text(
            style.width / 2.0,
            style.margin / 2.0 + style.title_font_size / 2.0,
            title,
            "middle",
            style.title_font_size,
        ));

    let total: f64 = slices.iter().map(|(_, v)| v.max(0.0)).sum();
    if total <= 0.0 {
        return doc;
    }

    let cx = style.width / 2.0;
    let cy = style.height / 2.0 + style.margin / 4.0;
    let radius = (style.width.min(style.height) / 2.0 - 2.0 * style.margin).max(10.0);

    // Start at twelve o'clock, sweep clockwise.
    let mut angle = -PI / 2.0;
    for (i, (label, value)) in slices.iter().enumerate() {
        let frac = value.max(0.0) / total;
        if frac == 0.0 {
            continue;
        }
        let a0 = angle;
        let a1 = angle + frac * 2.0 * PI;
        angle = a1;
        let mid = (a0 + a1) / 2.0;

        let exploded = explode_last && i + 1 == slices.len();
        let offset = if exploded { radius * 0.1 } else { 0.0 };
        let ox = cx + offset * mid.cos();
        let oy = cy + offset * mid.sin();

        let p0 = (ox + radius * a0.cos(), oy + radius * a0.sin());
        let p1 = (ox + radius * a1.cos(), oy + radius * a1.sin());
        let large_arc = if frac > 0.5 { 1.0 } else { 0.0 };

        let data = Data::new()
            .move_to((ox, oy))
            .line_to(p0)
            .elliptical_arc_to((radius, radius, 0.0, large_arc, 1.0, p1.0, p1.1))
            .close();
        doc = doc.add(
            Path::new()
                .set("fill", style.series_color(i))
                .set("stroke", "white")
                .set("stroke-width", 1.0)
                .set("d", data),
        );

        let pct = format!("{:.1}%", frac * 100.0);
        doc = doc.add(text(
            ox + 0.6 * radius * mid.cos(),
            oy + 0.6 * radius * mid.sin(),
            &pct,
            "middle",
            style.font_size,
        ));

        let anchor = if mid.cos() < 0.0 { "end" } else { "start" };
        doc = doc.add(text(
            ox + 1.1 * radius * mid.cos(),
            oy + 1.1 * radius * mid.sin(),
            label,
            anchor,
            style.font_size,
        ));
    }

    doc
}

/// Plot-area geometry: maps period index and value to pixel coordinates.
struct Frame {
    left: f64,
    top: f64,
    plot_w: f64,
    plot_h: f64,
    periods: usize,
    y_min: f64,
    y_span: f64,
}

impl Frame {
    fn fit(style: &ChartStyle, values: impl Iterator<Item = f64>, periods: usize) -> Self {
        let mut y_max = 0.0_f64;
        let mut y_min = 0.0_f64;
        for v in values {
            y_max = y_max.max(v);
            y_min = y_min.min(v);
        }
        y_max *= 1.05;
        let y_span = if y_max - y_min > 0.0 { y_max - y_min } else { 1.0 };
        Self {
            left: style.margin,
            top: style.margin,
            plot_w: style.width - 2.0 * style.margin,
            plot_h: style.height - 2.0 * style.margin,
            periods: periods.max(1),
            y_min,
            y_span,
        }
    }

    fn x(&self, period_index: usize) -> f64 {
        self.left + self.plot_w * (period_index as f64 + 0.5) / self.periods as f64
    }

    fn y(&self, value: f64) -> f64 {
        self.top + self.plot_h * (1.0 - (value - self.y_min) / self.y_span)
    }

    fn slot_width(&self) -> f64 {
        self.plot_w / self.periods as f64
    }

    fn right(&self) -> f64 {
        self.left + self.plot_w
    }

    fn bottom(&self) -> f64 {
        self.top + self.plot_h
    }
}

fn background(style: &ChartStyle) -> Rectangle {
    Rectangle::new()
        .set("x", 0.0)
        .set("y", 0.0)
        .set("width", style.width)
        .set("height", style.height)
        .set("fill", "white")
}

fn text(x: f64, y: f64, content: &str, anchor: &str, size: f64) -> Text {
    Text::new()
        .set("x", x)
        .set("y", y)
        .set("font-family", "sans-serif")
        .set("font-size", size)
        .set("text-anchor", anchor)
        .add(TextContent::new(content))
}

fn base_document(style: &ChartStyle, title: &str, y_label: &str, frame: &Frame) -> Document {
    let mut doc = Document::new()
        .set("viewBox", (0.0, 0.0, style.width, style.height))
        .set("width", style.width)
        .set("height", style.height)
        .add(background(style))
        .add(text(
            style.width / 2.0,
            style.margin / 2.0 + style.title_font_size / 2.0,
            title,
            "middle",
            style.title_font_size,
        ));

    // Axes: y at the left edge, x at the zero line.
    doc = doc
        .add(
            Line::new()
                .set("x1", frame.left)
                .set("x2", frame.left)
                .set("y1", frame.top)
                .set("y2", frame.bottom())
                .set("stroke", style.axis_color)
                .set("stroke-width", style.stroke_width),
        )
        .add(
            Line::new()
                .set("x1", frame.left)
                .set("x2", frame.right())
                .set("y1", frame.y(0.0))
                .set("y2", frame.y(0.0))
                .set("stroke", style.axis_color)
                .set("stroke-width", style.stroke_width),
        )
        .add(text(
            frame.left,
            frame.top - 8.0,
            y_label,
            "middle",
            style.font_size,
        ));

    // Four y ticks above the minimum.
    for tick in 1..=4 {
        let value = frame.y_min + frame.y_span * tick as f64 / 4.0;
        let y = frame.y(value);
        doc = doc
            .add(
                Line::new()
                    .set("x1", frame.left - 5.0)
                    .set("x2", frame.left)
                    .set("y1", y)
                    .set("y2", y)
                    .set("stroke", style.axis_color)
                    .set("stroke-width", 1.0),
            )
            .add(text(
                frame.left - 9.0,
                y + style.font_size / 3.0,
                &format!("{value:.0}"),
                "end",
                style.font_size,
            ));
    }

    doc
}

fn draw_period_labels(
    mut doc: Document,
    style: &ChartStyle,
    frame: &Frame,
    labels: &[String],
) -> Document {
    for (i, label) in labels.iter().enumerate() {
        if label.is_empty() {
            continue;
        }
        doc = doc.add(text(
            frame.x(i),
            frame.bottom() + style.font_size + 6.0,
            label,
            "middle",
            style.font_size,
        ));
    }
    doc
}

/// Rectangle spanning `lo..hi` on the value axis within one period slot.
fn bar(frame: &Frame, period_index: usize, width: f64, lo: f64, hi: f64, fill: &str) -> Rectangle {
    let y_lo = frame.y(lo);
    let y_hi = frame.y(hi);
    Rectangle::new()
        .set("x", frame.x(period_index) - width / 2.0)
        .set("y", y_lo.min(y_hi))
        .set("width", width)
        .set("height", (y_lo - y_hi).abs())
        .set("fill", fill)
}

fn draw_ref_line(mut doc: Document, style: &ChartStyle, frame: &Frame, r: &RefLine) -> Document {
    let y = frame.y(r.value);
    let mut line = Line::new()
        .set("x1", frame.left)
        .set("x2", frame.right())
        .set("y1", y)
        .set("y2", y)
        .set("stroke", style.axis_color)
        .set("stroke-width", style.stroke_width);
    if r.dashed {
        line = line.set("stroke-dasharray", "8,5");
    }
    doc = doc.add(line).add(text(
        frame.right(),
        y - 6.0,
        &r.label,
        "end",
        style.font_size,
    ));
    doc
}

fn draw_trend(mut doc: Document, style: &ChartStyle, frame: &Frame, t: &TrendOverlay) -> Document {
    if t.curve.is_empty() {
        return doc;
    }
    let points = t
        .curve
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{:.2},{:.2}", frame.x(i), frame.y(*v)))
        .collect::<Vec<_>>()
        .join(" ");
    doc = doc.add(
        Polyline::new()
            .set("points", points)
            .set("fill", "none")
            .set("stroke", style.axis_color)
            .set("stroke-width", style.stroke_width)
            .set("stroke-dasharray", "2,5"),
    );

    let last = t.curve.len() - 1;
    doc.add(
        Circle::new()
            .set("cx", frame.x(last))
            .set("cy", frame.y(t.curve[last]))
            .set("r", 5.0)
            .set("fill", style.axis_color),
    )
}
