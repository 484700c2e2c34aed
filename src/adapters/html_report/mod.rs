//! Static HTML dashboard for the trade ledger.
//!
//! The page is an askama template (`templates/dashboard.html`) with inline
//! SVG charts from `chart_svg`. Record text goes through askama's HTML
//! escaping; only the generated SVG is marked safe.

pub mod chart_svg;

use std::fs;
use std::path::Path;

use askama::Template;
use chrono::NaiveDateTime;

use crate::domain::analytics::{LedgerSummary, NO_TRADES};
use crate::domain::error::LedgerError;
use crate::domain::trade::{Action, Status, TIMESTAMP_FORMAT, TradeRecord};
use crate::ports::report_port::ReportPort;

struct TradeRow<'a> {
    index: usize,
    timestamp: String,
    title: &'a str,
    action: Action,
    summary: &'a str,
    status: Status,
    result: &'static str,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    generated_at: String,
    summary: &'a LedgerSummary,
    success_percent: Option<String>,
    success_note: &'static str,
    no_trades: &'static str,
    pie_svg: String,
    bar_svg: String,
    line_svg: String,
    rows: Vec<TradeRow<'a>>,
}

/// Writes the dashboard as a single self-contained HTML file.
pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        records: &[TradeRecord],
        generated_at: NaiveDateTime,
    ) -> Result<String, LedgerError> {
        let summary = LedgerSummary::compute(records);

        let rows = records
            .iter()
            .enumerate()
            .map(|(index, record)| TradeRow {
                index,
                timestamp: record.formatted_timestamp(),
                title: &record.title,
                action: record.action,
                summary: &record.summary,
                status: record.status,
                result: record.result.map(|r| r.label()).unwrap_or(""),
            })
            .collect();

        let template = DashboardTemplate {
            generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
            summary: &summary,
            success_percent: summary.success_rate.percent().map(|p| format!("{p:.1}%")),
            success_note: summary.success_rate_note().unwrap_or_default(),
            no_trades: NO_TRADES,
            pie_svg: chart_svg::generate_pie_svg(&summary.action_mix),
            bar_svg: chart_svg::generate_bar_svg(&summary.status_mix),
            line_svg: chart_svg::generate_frequency_svg(&summary.frequency),
            rows,
        };

        template
            .render()
            .map_err(|e| LedgerError::Io(std::io::Error::other(e.to_string())))
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, records: &[TradeRecord], output_path: &str) -> Result<(), LedgerError> {
        let html = self.render(records, chrono::Local::now().naive_local())?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| LedgerError::storage(parent, e))?;
        }
        fs::write(path, html).map_err(|e| LedgerError::storage(path, e))?;

        tracing::info!(path = output_path, records = records.len(), "wrote dashboard");
        Ok(())
    }
}
