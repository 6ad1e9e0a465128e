use crate::domain::model::{ChartSlice, ChartSpec, DestinationAggregate, LegendSpec, SliceOutline};
use crate::domain::tables::ColorTable;

pub fn chart_title(period_label: &str) -> String {
    format!("Displacement Destinations ({})", period_label)
}

/// `1234567` → `"1,234,567"`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

pub fn hover_text(aggregate: &DestinationAggregate) -> String {
    format!(
        "From: {} → {}\n{} displaced",
        aggregate.origins.join(", "),
        aggregate.label,
        format_thousands(aggregate.total)
    )
}

/// Describe a pie chart of destination totals for one period.
pub fn build_chart(
    aggregates: &[DestinationAggregate],
    period_label: &str,
    colors: &ColorTable,
) -> ChartSpec {
    let slices = aggregates
        .iter()
        .map(|aggregate| ChartSlice {
            label: aggregate.label.clone(),
            value: aggregate.total,
            origins: aggregate.origins.clone(),
            hover: hover_text(aggregate),
            color: colors.color_for(&aggregate.label).to_string(),
        })
        .collect();

    ChartSpec {
        title: chart_title(period_label),
        slices,
        text_info: "percent+label".to_string(),
        hole: 0.0,
        legend: LegendSpec::default(),
        outline: SliceOutline::default(),
    }
}
