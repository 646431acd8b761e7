// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use std::f64::consts::PI;

use super::{figure, polar, title, wedge};
use crate::config::ChartConfig;
use crate::figure::{Area, Axes, Dot, Figure, HAlign, Label, Line, Mark, Panel, VAlign};
use crate::models::SignalGaugeInput;
use crate::palette::{Color, ColorScheme, BLACK};

/// Pointer angle for a score: 0 points right, 100 points left.
pub fn gauge_angle(score: f64) -> f64 {
    (1.0 - score.clamp(0.0, 100.0) / 100.0) * PI
}

/// What the gauge will show for an input, after clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeReading {
    pub score: f64,
    pub angle: f64,
    /// Background band under the pointer.
    pub band_color: Color,
    /// Color of the signal text, from the signal table alone.
    pub signal_color: Color,
}

pub fn gauge_reading(scheme: &ColorScheme, input: &SignalGaugeInput) -> GaugeReading {
    let score = input.clamped_score();
    GaugeReading {
        score,
        angle: gauge_angle(score),
        band_color: scheme.gauge_band(score).color,
        signal_color: scheme.signal_label(&input.signal),
    }
}

pub fn build_signal_gauge(
    config: &ChartConfig,
    scheme: &ColorScheme,
    stock_code: &str,
    input: &SignalGaugeInput,
) -> Figure {
    let reading = gauge_reading(scheme, input);
    let mut fig = figure(
        config,
        8.0,
        6.0,
        Some(title(config, format!("{} Investment Signal", stock_code))),
    );

    let mut panel = Panel::new(-1.35..1.35, -0.5..1.3);
    panel.axes = Axes::hidden();
    panel.equal_aspect = true;

    for band in &scheme.gauge_bands {
        let start = gauge_angle(band.high);
        let end = gauge_angle(band.low);
        panel.push(Mark::Area(Area {
            points: wedge(0.0, 1.0, start, end - start),
            fill: band.color.with_alpha(0.3),
        }));
    }

    for tick in [0.0, 25.0, 50.0, 75.0, 100.0] {
        panel.push(Mark::Text(Label::new(
            format!("{}", tick),
            polar(1.1, gauge_angle(tick)),
            config.label_fontsize,
            BLACK,
        )));
    }

    // Arrow: shaft to the base of the head, then a triangular head.
    let angle = reading.angle;
    let (ux, uy) = (angle.cos(), angle.sin());
    let (px, py) = (-uy, ux);
    let tip = (0.9 * ux, 0.9 * uy);
    let base = (0.78 * ux, 0.78 * uy);
    panel.push(Mark::Line(Line::solid(vec![(0.0, 0.0), base], BLACK, 3)));
    panel.push(Mark::Area(Area {
        points: vec![
            tip,
            (base.0 + 0.05 * px, base.1 + 0.05 * py),
            (base.0 - 0.05 * px, base.1 - 0.05 * py),
        ],
        fill: BLACK,
    }));
    panel.push(Mark::Dot(Dot {
        at: (0.0, 0.0),
        radius: 5,
        color: BLACK,
    }));

    panel.push(Mark::Text(
        Label::new(
            format!("Score: {:.1}", reading.score),
            (0.0, -0.12),
            18.0,
            BLACK,
        )
        .align(HAlign::Center, VAlign::Top),
    ));
    panel.push(Mark::Text(
        Label::new(
            format!("Signal: {}", input.signal),
            (0.0, -0.3),
            16.0,
            reading.signal_color,
        )
        .align(HAlign::Center, VAlign::Top),
    ));

    fig.panels.push(panel);
    fig
}
