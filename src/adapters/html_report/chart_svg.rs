//! Inline SVG charts for the ledger dashboard.
//!
//! Each generator returns an empty string when there is nothing to plot.

use chrono::NaiveDate;
use std::f64::consts::PI;
use std::fmt::Write;

use crate::domain::analytics::Breakdown;

const WIDTH: f64 = 500.0;
const HEIGHT: f64 = 300.0;
const PADDING: f64 = 50.0;

const PIE_COLORS: [&str; 4] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728"];
const BAR_COLORS: [&str; 2] = ["green", "red"];

fn open_svg(title: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" role="img"><title>{title}</title>"#,
        w = WIDTH,
        h = HEIGHT,
    )
}

/// Proportional pie chart with percentage labels, starting at twelve o'clock.
pub fn generate_pie_svg<K: Copy + Ord + std::fmt::Display>(breakdown: &Breakdown<K>) -> String {
    let shares = breakdown.shares();
    if shares.is_empty() {
        return String::new();
    }

    let cx = WIDTH / 2.0;
    let cy = HEIGHT / 2.0;
    let r = HEIGHT / 2.0 - PADDING / 2.0;

    let mut svg = open_svg("Buy vs Sell");

    if shares.len() == 1 {
        let (label, pct) = shares[0];
        let _ = write!(
            svg,
            r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="{}"/>"#,
            PIE_COLORS[0]
        );
        let _ = write!(
            svg,
            r#"<text x="{cx:.1}" y="{cy:.1}" text-anchor="middle">{label} {pct:.1}%</text>"#
        );
        svg.push_str("</svg>");
        return svg;
    }

    let mut angle = -PI / 2.0;
    for (i, (label, pct)) in shares.iter().enumerate() {
        let sweep = pct / 100.0 * 2.0 * PI;
        let end = angle + sweep;
        let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
        let (x2, y2) = (cx + r * end.cos(), cy + r * end.sin());
        let large_arc = if sweep > PI { 1 } else { 0 };
        let color = PIE_COLORS[i % PIE_COLORS.len()];

        let _ = write!(
            svg,
            r#"<path d="M {cx:.1} {cy:.1} L {x1:.1} {y1:.1} A {r:.1} {r:.1} 0 {large_arc} 1 {x2:.1} {y2:.1} Z" fill="{color}"/>"#
        );

        let mid = angle + sweep / 2.0;
        let (lx, ly) = (cx + r * 0.6 * mid.cos(), cy + r * 0.6 * mid.sin());
        let _ = write!(
            svg,
            r#"<text x="{lx:.1}" y="{ly:.1}" text-anchor="middle">{label} {pct:.1}%</text>"#
        );

        angle = end;
    }

    svg.push_str("</svg>");
    svg
}

/// Vertical bar chart of record counts per label.
pub fn generate_bar_svg<K: Copy + Ord + std::fmt::Display>(breakdown: &Breakdown<K>) -> String {
    if breakdown.is_empty() {
        return String::new();
    }

    let max = breakdown.entries.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1) as f64;
    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let slot = plot_width / breakdown.entries.len() as f64;
    let bar_width = slot * 0.6;
    let baseline = HEIGHT - PADDING;

    let mut svg = open_svg("Open vs Closed");
    let _ = write!(
        svg,
        r#"<line x1="{PADDING}" y1="{baseline}" x2="{x2}" y2="{baseline}" stroke="black"/>"#,
        x2 = WIDTH - PADDING
    );

    for (i, (label, count)) in breakdown.entries.iter().enumerate() {
        let h = *count as f64 / max * plot_height;
        let x = PADDING + i as f64 * slot + (slot - bar_width) / 2.0;
        let y = baseline - h;
        let color = BAR_COLORS[i % BAR_COLORS.len()];
        let _ = write!(
            svg,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_width:.1}" height="{h:.1}" fill="{color}"/>"#
        );
        let _ = write!(
            svg,
            r#"<text x="{tx:.1}" y="{ty:.1}" text-anchor="middle">{label}</text>"#,
            tx = x + bar_width / 2.0,
            ty = baseline + 20.0
        );
        let _ = write!(
            svg,
            r#"<text x="{tx:.1}" y="{ty:.1}" text-anchor="middle">{count}</text>"#,
            tx = x + bar_width / 2.0,
            ty = y - 5.0
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Line series of trades per date with a marker on every observed date.
/// Horizontal spacing follows the calendar, so gaps stay visible.
pub fn generate_frequency_svg(series: &[(NaiveDate, usize)]) -> String {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return String::new();
    };

    let span_days = (last.0 - first.0).num_days().max(1) as f64;
    let max = series.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1) as f64;
    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;

    let coords: Vec<(f64, f64)> = series
        .iter()
        .map(|(date, count)| {
            let x = if series.len() == 1 {
                WIDTH / 2.0
            } else {
                PADDING + (*date - first.0).num_days() as f64 / span_days * plot_width
            };
            let y = HEIGHT - PADDING - *count as f64 / max * plot_height;
            (x, y)
        })
        .collect();

    let mut svg = open_svg("Trade Frequency");
    let _ = write!(
        svg,
        r#"<line x1="{PADDING}" y1="{PADDING}" x2="{PADDING}" y2="{b}" stroke="black"/><line x1="{PADDING}" y1="{b}" x2="{r}" y2="{b}" stroke="black"/>"#,
        b = HEIGHT - PADDING,
        r = WIDTH - PADDING
    );

    let points: Vec<String> = coords.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect();
    let _ = write!(
        svg,
        r#"<polyline points="{}" fill="none" stroke="blue" stroke-width="2"/>"#,
        points.join(" ")
    );
    for ((date, count), (x, y)) in series.iter().zip(&coords) {
        let _ = write!(
            svg,
            r#"<circle cx="{x:.1}" cy="{y:.1}" r="4" fill="blue"><title>{date}: {count}</title></circle>"#
        );
    }

    let _ = write!(
        svg,
        r#"<text x="{cx}" y="{ty}" text-anchor="middle">Date</text><text x="15" y="{cy}" text-anchor="middle" transform="rotate(-90 15 {cy})">Number of Trades</text>"#,
        cx = WIDTH / 2.0,
        ty = HEIGHT - 10.0,
        cy = HEIGHT / 2.0
    );
    let _ = write!(
        svg,
        r#"<text x="{PADDING}" y="{ty}" text-anchor="start">{first}</text><text x="{rx}" y="{ty}" text-anchor="end">{last}</text>"#,
        first = first.0,
        last = last.0,
        rx = WIDTH - PADDING,
        ty = HEIGHT - PADDING + 18.0
    );

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analytics::{action_mix, status_mix, trade_frequency};
    use crate::domain::trade::{Action, Status, TradeRecord};

    fn record(date: &str, action: Action, status: Status) -> TradeRecord {
        TradeRecord {
            timestamp: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            title: "T".into(),
            action,
            summary: "S".into(),
            status,
            result: None,
        }
    }

    #[test]
    fn empty_inputs_render_nothing() {
        assert!(generate_pie_svg(&action_mix(&[])).is_empty());
        assert!(generate_bar_svg(&status_mix(&[])).is_empty());
        assert!(generate_frequency_svg(&[]).is_empty());
    }

    #[test]
    fn pie_labels_carry_percentages() {
        let records = vec![
            record("2024-01-01", Action::Buy, Status::Open),
            record("2024-01-01", Action::Buy, Status::Open),
            record("2024-01-01", Action::Sell, Status::Open),
        ];
        let svg = generate_pie_svg(&action_mix(&records));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Buy 66.7%"));
        assert!(svg.contains("Sell 33.3%"));
        assert_eq!(svg.matches("<path").count(), 2);
    }

    #[test]
    fn single_slice_pie_is_a_circle() {
        let records = vec![record("2024-01-01", Action::Sell, Status::Open)];
        let svg = generate_pie_svg(&action_mix(&records));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("Sell 100.0%"));
    }

    #[test]
    fn bar_chart_has_one_bar_per_status() {
        let records = vec![
            record("2024-01-01", Action::Buy, Status::Open),
            record("2024-01-01", Action::Buy, Status::Closed),
        ];
        let svg = generate_bar_svg(&status_mix(&records));
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("fill=\"green\""));
        assert!(svg.contains("fill=\"red\""));
    }

    #[test]
    fn frequency_chart_marks_each_observed_date() {
        let records = vec![
            record("2024-01-01", Action::Buy, Status::Open),
            record("2024-01-01", Action::Buy, Status::Open),
            record("2024-01-03", Action::Sell, Status::Open),
        ];
        let svg = generate_frequency_svg(&trade_frequency(&records));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains("2024-01-01: 2"));
        assert!(svg.contains("2024-01-03: 1"));
        assert!(!svg.contains("2024-01-02"));
    }
}
