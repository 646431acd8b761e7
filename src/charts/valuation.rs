// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use super::{column, figure, title, x_categories};
use crate::config::ChartConfig;
use crate::figure::{Axes, Figure, HAlign, Label, Line, Mark, Panel, VAlign};
use crate::models::ValuationTriple;
use crate::palette::{ColorScheme, BLACK, GREEN, RED};

const CATEGORIES: [&str; 3] = ["Current Price", "Fair Price", "Intrinsic Value"];

pub fn build_valuation_comparison(
    config: &ChartConfig,
    scheme: &ColorScheme,
    stock_code: &str,
    valuation: &ValuationTriple,
) -> Figure {
    let mut fig = figure(
        config,
        10.0,
        6.0,
        Some(title(config, format!("{} Valuation", stock_code))),
    );

    let values = valuation.values();
    let max = values.iter().copied().fold(0.0f64, f64::max);
    let top = if max > 0.0 { max * 1.2 } else { 1.0 };

    let mut panel = Panel::new(-0.6..2.6, 0.0..top);
    panel.axes = Axes {
        y_ticks: true,
        y_desc: Some("Price".to_string()),
        ..Axes::default()
    };

    for (i, (&value, &fill)) in values.iter().zip(&scheme.valuation_bars).enumerate() {
        let x = i as f64;
        panel.push(column(x, 0.6, value, fill));
        panel.push(Mark::Text(
            Label::new(
                format!("{:.2}", value),
                (x, value + max * 0.02),
                config.label_fontsize * 1.2,
                BLACK,
            )
            .align(HAlign::Center, VAlign::Bottom),
        ));
    }
    x_categories(&mut panel, &CATEGORIES, config.label_fontsize);

    if let Some(margin) = valuation.safety_margin() {
        let current = valuation.current;
        panel.push(Mark::Line(Line::dashed(
            vec![(-0.6, current), (2.6, current)],
            RED.with_alpha(0.5),
        )));
        panel.push(Mark::Text(
            Label::new(
                format!("Safety margin: {:.1}%", margin),
                (2.55, current),
                config.label_fontsize,
                GREEN,
            )
            .align(HAlign::Right, VAlign::Bottom)
            .offset(0, -4),
        ));
    }

    fig.panels.push(panel);
    fig
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::Bar;
    use crate::palette::BLUE;
    use approx::assert_relative_eq;

    fn build(current: f64, fair: f64, intrinsic: f64) -> Figure {
        build_valuation_comparison(
            &ChartConfig::default(),
            &ColorScheme::v1(),
            "600519",
            &ValuationTriple::new(current, fair, intrinsic),
        )
    }

    #[test]
    fn test_safety_margin_annotation_when_undervalued() {
        let fig = build(1800.0, 2000.0, 2200.0);
        assert!(fig.has_text("Safety margin: 10.0%"));

        let reference: Vec<_> = fig.panels[0].lines().filter(|l| l.dashed).collect();
        assert_eq!(reference.len(), 1);
        assert!(reference[0].points.iter().all(|&(_, y)| y == 1800.0));
    }

    #[test]
    fn test_no_safety_margin_when_overvalued() {
        let fig = build(2000.0, 1800.0, 2200.0);
        assert!(!fig.has_text("Safety margin"));
        assert_eq!(fig.panels[0].lines().count(), 0);
    }

    #[test]
    fn test_bars_have_fixed_colors_and_headroom() {
        // Colors stay bound to the role even when intrinsic is the smallest.
        let fig = build(300.0, 200.0, 100.0);
        let panel = &fig.panels[0];
        let bars: Vec<&Bar> = panel.bars().collect();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].fill, RED);
        assert_eq!(bars[1].fill, GREEN);
        assert_eq!(bars[2].fill, BLUE);
        assert_eq!(bars[0].to.1, 300.0);

        assert_relative_eq!(panel.y_range.end, 360.0);
        assert!(fig.has_text("300.00"));
        assert!(fig.has_text("Intrinsic Value"));
    }

    #[test]
    fn test_zero_prices_keep_a_usable_axis() {
        let fig = build(0.0, 0.0, 0.0);
        assert_eq!(fig.panels[0].y_range, 0.0..1.0);
    }
}
