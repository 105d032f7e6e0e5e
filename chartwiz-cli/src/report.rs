//! Text and CSV renderings for the CLI commands.

use anyhow::{Context, Result};

use chartwiz_core::data::IndicatorConfigRecord;
use chartwiz_core::domain::{ChartPayload, IndicatorDescriptor};
use chartwiz_core::ChartPreview;

/// One table row for `indicators`.
pub fn indicator_row(descriptor: &IndicatorDescriptor) -> String {
    let marker = if descriptor.is_default() { "*" } else { " " };
    let name = descriptor.display_name();
    match descriptor {
        IndicatorDescriptor::Grouped(group) => format!(
            "{marker} {:<14} {:<34} {:<10} {:>14} {:>6}",
            descriptor.key().to_string(),
            name,
            "-",
            "group",
            group.members.len()
        ),
        IndicatorDescriptor::Flat(_) | IndicatorDescriptor::Combined(_) => {
            let (date, value, points) = descriptor
                .series()
                .map(|s| {
                    (
                        s.latest_date.to_string(),
                        format!("{:.2}", s.latest_value),
                        s.points.len(),
                    )
                })
                .unwrap_or_default();
            format!(
                "{marker} {:<14} {:<34} {:<10} {:>14} {:>6}",
                descriptor.key().to_string(),
                name,
                date,
                value,
                points
            )
        }
    }
}

pub fn indicator_header() -> String {
    format!(
        "  {:<14} {:<34} {:<10} {:>14} {:>6}",
        "Key", "Name", "Latest", "Value", "Points"
    )
}

/// One line per generated chart, for `inspect`.
pub fn summary_line(index: usize, payload: &ChartPayload) -> String {
    let names: Vec<&str> = payload
        .selected_indicators()
        .iter()
        .map(|s| s.display_name())
        .collect();
    let id = payload
        .id()
        .map(|id| format!(" (chart {id})"))
        .unwrap_or_default();
    format!(
        "{:>3}. {}{id} | {} | {} | {} | {}",
        index + 1,
        payload.title(),
        payload.category().title(),
        payload.chart_type().label(),
        payload.position().label(),
        names.join(", ")
    )
}

/// Stored settings for `indicator-config`.
pub fn config_line(id: &str, record: &IndicatorConfigRecord) -> String {
    format!(
        "{id}: {} from {} to {}",
        record.chart_type.label(),
        record.date_range_start,
        record.date_range_end
    )
}

/// Preview series as CSV.
///
/// Columns: date, indicator, value. For group selections the `date` column
/// holds the member name.
pub fn export_preview_csv(preview: &ChartPreview) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "indicator", "value"])?;

    for dataset in &preview.datasets {
        for point in &dataset.points {
            wtr.write_record([
                &point.x.to_string(),
                &dataset.label,
                &point.value.to_string(),
            ])?;
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}
