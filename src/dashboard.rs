//! Presentation of the metrics: plotly charts, the single page HTML dashboard and the detailed data export.

use crate::*;   // To use everything from the crate
use serde::Serialize;
use std::{fs, path::PathBuf};

// Constants
//----------------------------------------------------
const PAGE_TITLE: &str = "🚢 NCLH Cruise Ship Fuel Analytics Dashboard";
/// plotly.js the inline charts are rendered with
const PLOTLY_JS_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";


// Structs and enums
//----------------------------------------------------
/// Everything one dashboard run needs to know
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Number of synthetic voyages to generate
    pub num_entries: usize,
    pub seed: u64,
    pub filters: FilterSelection,
    /// Grouping of the warm-up efficiency chart
    pub warmup_group: GroupKey,
    /// Grouping of the fuel usage chart
    pub fuel_group: GroupKey,
    /// Where the HTML page is written
    pub output_path: PathBuf,
    /// Where the detailed data is written as csv, if anywhere
    pub detail_csv_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> DashboardConfig {
        DashboardConfig {
            num_entries: DEFAULT_NUM_ENTRIES,
            seed: DEFAULT_SEED,
            filters: FilterSelection::default(),
            warmup_group: GroupKey::ShipName,
            fuel_group: GroupKey::ShipName,
            output_path: PathBuf::from("dashboard.html"),
            detail_csv_path: None,
        }
    }
}

/// All numbers shown on the dashboard for one filter selection
#[derive(Debug, Clone)]
pub struct DashboardReport {
    /// Filtered voyages
    pub records: Vec<AnalyzedRecord>,
    pub summary: MetricsSummary,
    pub warmup_group: GroupKey,
    pub warmup: WarmupTable,
    pub fuel_group: GroupKey,
    pub fuel: Vec<FuelUsageRow>,
}

/// One row of the detailed data export, with the dashboard's column names
#[derive(Debug, Serialize)]
struct DetailRow<'a> {
    #[serde(rename = "Subsidiary")]
    subsidiary: &'a str,
    #[serde(rename = "Ship_Name")]
    ship_name: &'a str,
    #[serde(rename = "Port_Country")]
    port_country: &'a str,
    #[serde(rename = "Port_Name")]
    port_name: &'a str,
    #[serde(rename = "Port_Status")]
    port_status: &'a str,
    #[serde(rename = "Fuel_Used_MetricTons")]
    fuel_used_metric_tons: f64,
    #[serde(rename = "Fuel_Cost_Per_Ton ($)")]
    fuel_cost_per_ton: u32,
    #[serde(rename = "Engine_WarmUp_Time (mins)")]
    engine_warmup_minutes: u32,
    #[serde(rename = "Optimal_WarmUp_Time (mins)")]
    optimal_warmup_minutes: u32,
    #[serde(rename = "Sailing_Delay_Due_To_Port_Busy")]
    sailing_delay: &'a str,
    #[serde(rename = "WarmUp_Status")]
    warmup_status: &'a str,
    #[serde(rename = "Extra_Fuel_Wasted")]
    extra_fuel_wasted: f64,
    #[serde(rename = "Financial_Loss_USD")]
    financial_loss: f64,
}

impl<'a> From<&'a AnalyzedRecord> for DetailRow<'a> {
    fn from(analyzed: &'a AnalyzedRecord) -> DetailRow<'a> {
        let record = &analyzed.record;
        DetailRow {
            subsidiary: record.subsidiary.name(),
            ship_name: record.ship_name,
            port_country: record.port_country.name(),
            port_name: record.port_name,
            port_status: record.port_status.name(),
            fuel_used_metric_tons: record.fuel_used_metric_tons,
            fuel_cost_per_ton: record.fuel_cost_per_ton,
            engine_warmup_minutes: record.engine_warmup_minutes,
            optimal_warmup_minutes: record.optimal_warmup_minutes,
            sailing_delay: if record.sailing_delay { "Yes" } else { "No" },
            warmup_status: analyzed.warmup_status.label(),
            extra_fuel_wasted: analyzed.extra_fuel_wasted,
            financial_loss: analyzed.financial_loss,
        }
    }
}


// Functions
//----------------------------------------------------
/// Generates the dataset, derives the metrics, applies the filters and aggregates.
/// Every call starts from scratch, nothing is carried over from earlier runs.
pub fn build_report(config: &DashboardConfig) -> Result<DashboardReport> {
    let records = derive(&generate(config.num_entries, config.seed)?);
    let filtered = apply_filters(&records, &config.filters);

    let report = DashboardReport {
        summary: summarize(&filtered),
        warmup_group: config.warmup_group,
        warmup: warmup_percentages(&filtered, config.warmup_group),
        fuel_group: config.fuel_group,
        fuel: fuel_usage(&filtered, config.fuel_group),
        records: filtered,
    };
    tracing::debug!(summary = %report.summary, "built dashboard report");
    return Ok(report);
}

/// Stacked bar chart of the warm-up status shares per group
pub fn warmup_chart(table: &WarmupTable, key: GroupKey) -> plotly::Plot {
    let mut figure = plotly::Plot::new();

    // One trace per status so the bars stack
    for status in WarmupStatus::ALL {
        let groups: Vec<&str> = table.keys().copied().collect();
        let percentages: Vec<f64> = table.values().map(|shares| shares.get(&status).copied().unwrap_or(0.0)).collect();
        let hover: Vec<String> = percentages.iter().map(|p| format!("{:.1}%", p)).collect();

        let trace = plotly::Bar::new(groups, percentages)
            .name(status.label())
            .hover_text_array(hover)
            .marker(plotly::common::Marker::new().color(status_color(status)));
        figure.add_trace(trace);
    }

    let layout = plotly::Layout::new()
        .title(plotly::common::Title::with_text(format!("Warm-Up Efficiency by {}", key.column_title()).as_str()))
        .bar_mode(plotly::layout::BarMode::Stack)
        .x_axis(plotly::layout::Axis::new().title(plotly::common::Title::with_text(key.column_title())))
        .y_axis(plotly::layout::Axis::new().title(plotly::common::Title::with_text("% of Trips")));
    figure.set_layout(layout);

    return figure;
}

/// Stacked bar chart of the fuel used per group, split by warm-up status. Hovering shows the number of voyages.
pub fn fuel_chart(rows: &[FuelUsageRow], key: GroupKey) -> plotly::Plot {
    let mut figure = plotly::Plot::new();

    for status in WarmupStatus::ALL {
        let status_rows: Vec<&FuelUsageRow> = rows.iter().filter(|row| row.warmup_status == status).collect();
        if status_rows.is_empty() {
            continue;
        }
        let groups: Vec<&str> = status_rows.iter().map(|row| row.group).collect();
        let fuel: Vec<f64> = status_rows.iter().map(|row| row.total_fuel_used).collect();
        let hover: Vec<String> = status_rows.iter().map(|row| format!("Count: {}", row.count)).collect();

        let trace = plotly::Bar::new(groups, fuel)
            .name(status.label())
            .hover_text_array(hover)
            .marker(plotly::common::Marker::new().color(status_color(status)));
        figure.add_trace(trace);
    }

    let layout = plotly::Layout::new()
        .title(plotly::common::Title::with_text(
            format!("Fuel Usage by {} (Split by Warm-Up Efficiency)", key.column_title()).as_str(),
        ))
        .bar_mode(plotly::layout::BarMode::Stack)
        .hover_mode(plotly::layout::HoverMode::XUnified)
        .legend(plotly::layout::Legend::new().orientation(plotly::common::Orientation::Horizontal).y(1.02).x(1.0))
        .x_axis(plotly::layout::Axis::new().title(plotly::common::Title::with_text(key.column_title())))
        .y_axis(plotly::layout::Axis::new().title(plotly::common::Title::with_text("Fuel Used (Metric Tons)")));
    figure.set_layout(layout);

    return figure;
}

/// Optimal in green, non-optimal in yellow
fn status_color(status: WarmupStatus) -> &'static str {
    match status {
        WarmupStatus::Optimal => "green",
        WarmupStatus::NonOptimal => "yellow",
    }
}

/// Metric card text for the extra fuel wasted, e.g. "12.34 Metric Tons"
pub fn format_metric_tons(mass: uom::si::f64::Mass) -> String {
    format!("{:.2} Metric Tons", mass.get::<uom::si::mass::ton>())
}

/// Metric card text for the financial loss, e.g. "$12,345.68 USD"
pub fn format_usd(amount: f64) -> String {
    format!("${} USD", with_thousands_separator(amount, 2))
}

/// Formats value with the given number of decimals and a comma between every three integer digits
pub fn with_thousands_separator(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer_part, fraction_part) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    // Insert a comma before every group of three digits counted from the right
    let mut grouped = String::with_capacity(integer_part.len() + integer_part.len() / 3 + decimals + 2);
    for (i, digit) in integer_part.chars().enumerate() {
        if i > 0 && (integer_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction_part {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    // No sign when the value rounds to zero
    let rounds_to_zero = grouped.chars().all(|c| !c.is_ascii_digit() || c == '0');
    if value < 0.0 && !rounds_to_zero {
        grouped.insert(0, '-');
    }
    return grouped;
}

/// Renders the whole dashboard as one self-contained HTML page
pub fn render_dashboard_html(report: &DashboardReport) -> String {
    let warmup_div = warmup_chart(&report.warmup, report.warmup_group).to_inline_html(Some("warmup-chart"));
    let fuel_div = fuel_chart(&report.fuel, report.fuel_group).to_inline_html(Some("fuel-chart"));

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{plotly_js}"></script>
<style>
body {{ font-family: sans-serif; margin: 2em; }}
.metrics {{ display: flex; gap: 4em; }}
.metric-value {{ font-size: 2em; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p><strong>Key Features:</strong></p>
<ul>
<li>Warm-up efficiency analysis</li>
<li>Fuel consumption and cost tracking</li>
<li>Financial impact of operational delays</li>
</ul>
<h2>Performance Metrics</h2>
<div class="metrics">
<div><div>Total Extra Fuel Wasted</div><div class="metric-value">{fuel_wasted}</div></div>
<div><div>Total Financial Loss</div><div class="metric-value">{loss}</div></div>
</div>
<h2>Warm-Up Efficiency Analysis</h2>
{warmup_div}
<h2>Fuel Consumption Analytics</h2>
{fuel_div}
</body>
</html>
"#,
        title = PAGE_TITLE,
        plotly_js = PLOTLY_JS_CDN,
        fuel_wasted = format_metric_tons(report.summary.total_extra_fuel_wasted),
        loss = format_usd(report.summary.total_financial_loss),
        warmup_div = warmup_div,
        fuel_div = fuel_div,
    )
}

/// Writes the dashboard page to config.output_path
pub fn write_dashboard(report: &DashboardReport, config: &DashboardConfig) -> Result<()> {
    fs::write(&config.output_path, render_dashboard_html(report))?;
    tracing::info!(path = %config.output_path.display(), "wrote dashboard");
    Ok(())
}

/// Voyages sorted by extra fuel wasted, most wasteful first. Ties keep their original order.
pub fn detailed_view(records: &[AnalyzedRecord]) -> Vec<AnalyzedRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.extra_fuel_wasted.total_cmp(&a.extra_fuel_wasted));
    return sorted;
}

/// Writes the detailed view of the records to a csv file.
/// Uses the dashboard's column names as header and a semicolon as delimiter.
pub fn write_detail_csv(csv_file_path: &std::path::Path, records: &[AnalyzedRecord]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_path(csv_file_path)?;

    for record in detailed_view(records).iter() {
        wtr.serialize(DetailRow::from(record))?;
    }

    wtr.flush()?;
    tracing::info!(path = %csv_file_path.display(), rows = records.len(), "wrote detailed data");
    Ok(())
}
