// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use super::{figure, title};
use crate::config::ChartConfig;
use crate::figure::{Axes, Bar, Figure, HAlign, Label, LegendPosition, Line, Mark, Panel, VAlign};
use crate::models::RiskMap;
use crate::palette::{ColorScheme, RiskBand, BLACK, HIGH_RISK_FLOOR, LOW_RISK_CEILING};

pub const RISK_AXIS_MAX: f64 = 1.2;

pub fn build_risk_analysis(
    config: &ChartConfig,
    scheme: &ColorScheme,
    stock_code: &str,
    risks: &RiskMap,
) -> Figure {
    let mut fig = figure(
        config,
        10.0,
        6.0,
        Some(title(config, format!("{} Risk Analysis", stock_code))),
    );

    let n = risks.len().max(1) as f64;
    let (y_lo, y_hi) = (-0.6, n - 0.4);
    let mut panel = Panel::new(0.0..RISK_AXIS_MAX, y_lo..y_hi);
    panel.axes = Axes {
        x_ticks: true,
        x_desc: Some("Risk Coefficient".to_string()),
        ..Axes::default()
    };

    // First category at the bottom, matching a conventional barh layout.
    for (i, (category, value)) in risks.iter().enumerate() {
        let y = i as f64;
        panel.push(Mark::Bar(Bar {
            from: (0.0, y - 0.3),
            to: (value, y + 0.3),
            fill: scheme.risk(RiskBand::for_value(value)),
            edge: Some(BLACK),
        }));
        panel.push(Mark::Text(
            Label::new(
                format!("{:.2}", value),
                (value + 0.02, y),
                config.label_fontsize,
                BLACK,
            )
            .align(HAlign::Left, VAlign::Center),
        ));
        panel.push(Mark::Text(
            Label::new(category, (0.0, y), config.label_fontsize, BLACK)
                .align(HAlign::Right, VAlign::Center)
                .offset(-6, 0),
        ));
    }

    panel.push(Mark::Line(
        Line::dashed(
            vec![(LOW_RISK_CEILING, y_lo), (LOW_RISK_CEILING, y_hi)],
            scheme.risk_low.with_alpha(0.5),
        )
        .labelled("Low risk"),
    ));
    panel.push(Mark::Line(
        Line::dashed(
            vec![(HIGH_RISK_FLOOR, y_lo), (HIGH_RISK_FLOOR, y_hi)],
            scheme.risk_medium.with_alpha(0.5),
        )
        .labelled("Medium risk"),
    ));
    panel.legend = Some(LegendPosition::LowerRight);

    fig.panels.push(panel);
    fig
}
