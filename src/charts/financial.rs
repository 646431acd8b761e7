// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use super::{column, figure, title, value_range, x_categories};
use crate::config::ChartConfig;
use crate::figure::{Axes, Figure, Label, LegendPosition, Line, Mark, Panel};
use crate::models::FinancialMetricSet;
use crate::palette::{Color, BLACK, GREEN, RED};

pub const ROE_REFERENCE: f64 = 15.0;
pub const GROSS_MARGIN_REFERENCE: f64 = 30.0;
pub const DEBT_WARNING: f64 = 60.0;

struct Reference {
    level: f64,
    color: Color,
    label: &'static str,
}

/// 2x2 dashboard: ROE, gross margin, P/E + P/B, debt ratio.
pub fn build_financial_metrics(
    config: &ChartConfig,
    stock_code: &str,
    metrics: &FinancialMetricSet,
) -> Figure {
    let mut fig = figure(
        config,
        config.width,
        config.height,
        Some(title(config, format!("{} Financial Metrics", stock_code))),
    );
    fig.rows = 2;
    fig.cols = 2;

    fig.panels.push(metric_panel(
        config,
        "Return on Equity (ROE)",
        &[("ROE", metrics.roe * 100.0, config.color(0))],
        Some("%"),
        Some(Reference {
            level: ROE_REFERENCE,
            color: GREEN,
            label: "Excellent (15%)",
        }),
    ));
    fig.panels.push(metric_panel(
        config,
        "Gross Margin",
        &[("Gross Margin", metrics.gross_margin * 100.0, config.color(1))],
        Some("%"),
        Some(Reference {
            level: GROSS_MARGIN_REFERENCE,
            color: GREEN,
            label: "Excellent (30%)",
        }),
    ));
    fig.panels.push(metric_panel(
        config,
        "Valuation Multiples",
        &[
            ("PE", metrics.pe_ratio, config.color(2)),
            ("PB", metrics.pb_ratio, config.color(3)),
        ],
        None,
        None,
    ));
    fig.panels.push(metric_panel(
        config,
        "Debt Ratio",
        &[("Debt Ratio", metrics.debt_ratio * 100.0, config.color(4))],
        Some("%"),
        Some(Reference {
            level: DEBT_WARNING,
            color: RED,
            label: "Warning (60%)",
        }),
    ));

    fig
}

fn metric_panel(
    config: &ChartConfig,
    panel_title: &str,
    bars: &[(&str, f64, Color)],
    unit: Option<&str>,
    reference: Option<Reference>,
) -> Panel {
    let mut extent: Vec<f64> = bars.iter().map(|&(_, v, _)| v).collect();
    if let Some(r) = &reference {
        extent.push(r.level);
    }

    let x_end = (bars.len() as f64 - 1.0) + 0.8;
    let mut panel = Panel::new(-0.8..x_end, value_range(&extent, 1.15));
    panel.title = Some(Label::new(panel_title, (0.0, 0.0), config.label_fontsize * 1.2, BLACK));
    panel.axes = Axes {
        y_ticks: true,
        y_desc: unit.map(str::to_string),
        ..Axes::default()
    };

    for (i, &(_, value, color)) in bars.iter().enumerate() {
        panel.push(column(i as f64, 0.5, value, color));
    }
    let names: Vec<&str> = bars.iter().map(|&(name, _, _)| name).collect();
    x_categories(&mut panel, &names, config.label_fontsize);

    // Reference lines annotate only; values past them are still drawn.
    if let Some(r) = reference {
        panel.push(Mark::Line(
            Line::dashed(vec![(-0.8, r.level), (x_end, r.level)], r.color).labelled(r.label),
        ));
        panel.legend = Some(LegendPosition::UpperRight);
    }

    panel
}
