// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use std::f64::consts::PI;

use super::{figure, polar, title};
use crate::config::ChartConfig;
use crate::figure::{Area, Axes, Dot, Figure, HAlign, Label, Line, Mark, Panel, VAlign};
use crate::models::ScoreSet;
use crate::palette::{Color, BLACK};

/// The radial axis is always 0-10 so radars of different stocks compare.
pub const RADAR_MAX: f64 = 10.0;

const RING_COLOR: Color = Color::rgb(0xcc, 0xcc, 0xcc);

/// `(angle, value)` per dimension, counter-clockwise from 0 rad, with the
/// first pair repeated at the end to close the polygon.
pub fn radar_vertices(scores: &ScoreSet) -> Vec<(f64, f64)> {
    let n = scores.len();
    let mut vertices: Vec<(f64, f64)> = scores
        .iter()
        .enumerate()
        .map(|(i, (_, value))| (i as f64 / n as f64 * 2.0 * PI, value))
        .collect();
    if let Some(&first) = vertices.first() {
        vertices.push(first);
    }
    vertices
}

pub fn build_score_radar(
    config: &ChartConfig,
    stock_code: &str,
    scores: &ScoreSet,
    chart_title: Option<&str>,
) -> Figure {
    let caption = chart_title
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} Overall Score", stock_code));
    let mut fig = figure(config, 8.0, 8.0, Some(title(config, caption)));

    let extent = RADAR_MAX * 1.35;
    let mut panel = Panel::new(-extent..extent, -extent..extent);
    panel.axes = Axes::hidden();
    panel.equal_aspect = true;

    draw_grid(&mut panel, config, scores);

    let color = config.color(0);
    let points: Vec<(f64, f64)> = radar_vertices(scores)
        .into_iter()
        .map(|(angle, value)| polar(value.clamp(0.0, RADAR_MAX), angle))
        .collect();

    if scores.len() >= 3 {
        panel.push(Mark::Area(Area {
            points: points[..points.len() - 1].to_vec(),
            fill: color.with_alpha(0.25),
        }));
    }
    if !points.is_empty() {
        panel.push(Mark::Line(Line::solid(points.clone(), color, 2)));
    }
    for &at in points.iter().take(scores.len()) {
        panel.push(Mark::Dot(Dot {
            at,
            radius: 4,
            color,
        }));
    }

    fig.panels.push(panel);
    fig
}

fn draw_grid(panel: &mut Panel, config: &ChartConfig, scores: &ScoreSet) {
    for ring in [2.0, 4.0, 6.0, 8.0, RADAR_MAX] {
        let circle = (0..=72)
            .map(|i| polar(ring, i as f64 / 72.0 * 2.0 * PI))
            .collect();
        panel.push(Mark::Line(Line::solid(circle, RING_COLOR, 1)));
        panel.push(Mark::Text(
            Label::new(
                format!("{}", ring),
                polar(ring, PI / 2.0 + 0.08),
                config.label_fontsize * 0.8,
                Color::rgb(0x66, 0x66, 0x66),
            )
            .align(HAlign::Right, VAlign::Bottom),
        ));
    }

    let n = scores.len();
    for (i, (name, _)) in scores.iter().enumerate() {
        let angle = i as f64 / n as f64 * 2.0 * PI;
        panel.push(Mark::Line(Line::solid(
            vec![(0.0, 0.0), polar(RADAR_MAX, angle)],
            RING_COLOR,
            1,
        )));

        let (cos, sin) = (angle.cos(), angle.sin());
        let h_align = if cos > 0.1 {
            HAlign::Left
        } else if cos < -0.1 {
            HAlign::Right
        } else {
            HAlign::Center
        };
        let v_align = if sin > 0.1 {
            VAlign::Bottom
        } else if sin < -0.1 {
            VAlign::Top
        } else {
            VAlign::Center
        };
        panel.push(Mark::Text(
            Label::new(
                name,
                polar(RADAR_MAX * 1.08, angle),
                config.label_fontsize,
                BLACK,
            )
            .align(h_align, v_align),
        ));
    }
}
