// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Pure chart builders: typed inputs in, [`Figure`] out.

pub mod financial;
pub mod gauge;
pub mod portfolio;
pub mod radar;
pub mod risk;
pub mod valuation;

pub use financial::build_financial_metrics;
pub use gauge::{build_signal_gauge, gauge_angle, gauge_reading, GaugeReading};
pub use portfolio::{build_portfolio_allocation, pie_percentages};
pub use radar::{build_score_radar, radar_vertices};
pub use risk::build_risk_analysis;
pub use valuation::build_valuation_comparison;

use std::f64::consts::PI;
use std::ops::Range;

use crate::config::ChartConfig;
use crate::figure::{Bar, Figure, HAlign, Label, Mark, Panel, VAlign};
use crate::palette::{Color, BLACK};

fn figure(config: &ChartConfig, width: f64, height: f64, title: Option<Label>) -> Figure {
    Figure {
        width,
        height,
        dpi: config.dpi,
        theme: config.theme(),
        label_size: config.label_fontsize,
        title,
        rows: 1,
        cols: 1,
        panels: Vec::new(),
    }
}

fn title(config: &ChartConfig, text: impl Into<String>) -> Label {
    Label::new(text, (0.0, 0.0), config.title_fontsize, BLACK)
}

fn polar(radius: f64, angle: f64) -> (f64, f64) {
    (radius * angle.cos(), radius * angle.sin())
}

/// Annular sector between `inner` and `outer` radii, sweeping
/// counter-clockwise from `start` by `sweep` radians.
fn wedge(inner: f64, outer: f64, start: f64, sweep: f64) -> Vec<(f64, f64)> {
    let steps = ((sweep.abs() / (2.0 * PI)) * 120.0).ceil().max(2.0) as usize;
    let at = |i: usize| start + sweep * i as f64 / steps as f64;

    let mut points: Vec<_> = (0..=steps).map(|i| polar(outer, at(i))).collect();
    if inner > 0.0 {
        points.extend((0..=steps).rev().map(|i| polar(inner, at(i))));
    } else {
        points.push((0.0, 0.0));
    }
    points
}

/// Vertical bar centred on `x`.
fn column(x: f64, width: f64, value: f64, fill: Color) -> Mark {
    Mark::Bar(Bar {
        from: (x - width / 2.0, 0.0),
        to: (x + width / 2.0, value),
        fill,
        edge: Some(BLACK),
    })
}

/// Category names under an x axis whose categories sit at 0, 1, 2, ...
fn x_categories<S: AsRef<str>>(panel: &mut Panel, names: &[S], size: f64) {
    let y = panel.y_range.start;
    for (i, name) in names.iter().enumerate() {
        panel.push(Mark::Text(
            Label::new(name.as_ref(), (i as f64, y), size, BLACK)
                .align(HAlign::Center, VAlign::Top)
                .offset(0, 6),
        ));
    }
}

/// Axis range covering zero, the values and any reference levels, padded
/// at the far end(s).
fn value_range(values: &[f64], padding: f64) -> Range<f64> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (lo, hi) = finite.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi - lo <= f64::EPSILON {
        return 0.0..1.0;
    }
    (lo * padding)..(hi * padding)
}
