// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Backend-agnostic description of a chart image.
//!
//! Chart builders lay everything out in data coordinates here; a
//! [`RenderBackend`](crate::backend::RenderBackend) only has to rasterize
//! panels, marks and text. Angles, band colors and label positions are
//! therefore decided before any drawing surface exists.

use std::ops::Range;

use crate::config::Theme;
use crate::palette::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Canvas size in inches.
    pub width: f64,
    pub height: f64,
    pub dpi: u32,
    pub theme: Theme,
    /// Point size for tick labels, axis descriptions and legends.
    pub label_size: f64,
    pub title: Option<Label>,
    /// Panels are laid out row-major on a `rows x cols` grid.
    pub rows: usize,
    pub cols: usize,
    pub panels: Vec<Panel>,
}

impl Figure {
    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |inches: f64| ((inches * self.dpi as f64).round() as u32).max(1);
        (px(self.width), px(self.height))
    }

    /// Font size in points to whole pixels at this figure's resolution.
    pub fn points_to_px(&self, points: f64) -> u32 {
        ((points * self.dpi as f64 / 72.0).round() as u32).max(1)
    }

    /// Every text mark across all panels, for inspection.
    pub fn texts(&self) -> impl Iterator<Item = &Label> {
        self.panels.iter().flat_map(|p| p.texts())
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|l| l.text.contains(needle))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: Option<Label>,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub axes: Axes,
    /// Keep one data unit the same length on both axes (circles stay round).
    pub equal_aspect: bool,
    pub legend: Option<LegendPosition>,
    pub marks: Vec<Mark>,
}

impl Panel {
    pub fn new(x_range: Range<f64>, y_range: Range<f64>) -> Self {
        Self {
            title: None,
            x_range,
            y_range,
            axes: Axes::default(),
            equal_aspect: false,
            legend: None,
            marks: Vec::new(),
        }
    }

    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    pub fn texts(&self) -> impl Iterator<Item = &Label> {
        self.marks.iter().filter_map(|m| match m {
            Mark::Text(label) => Some(label),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.marks.iter().filter_map(|m| match m {
            Mark::Line(line) => Some(line),
            _ => None,
        })
    }

    pub fn bars(&self) -> impl Iterator<Item = &Bar> {
        self.marks.iter().filter_map(|m| match m {
            Mark::Bar(bar) => Some(bar),
            _ => None,
        })
    }

    pub fn areas(&self) -> impl Iterator<Item = &Area> {
        self.marks.iter().filter_map(|m| match m {
            Mark::Area(area) => Some(area),
            _ => None,
        })
    }
}

/// Axis decoration. Hidden axes draw no mesh, ticks or frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axes {
    pub hidden: bool,
    pub x_desc: Option<String>,
    pub y_desc: Option<String>,
    /// Numeric tick labels; category axes turn these off and place their
    /// own labels as text marks.
    pub x_ticks: bool,
    pub y_ticks: bool,
}

impl Axes {
    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    UpperRight,
    LowerRight,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Bar(Bar),
    Area(Area),
    Line(Line),
    Dot(Dot),
    Text(Label),
}

/// Axis-aligned rectangle spanning `from` to `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub fill: Color,
    pub edge: Option<Color>,
}

/// Filled polygon; the last point connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub points: Vec<(f64, f64)>,
    pub fill: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub points: Vec<(f64, f64)>,
    pub color: Color,
    pub width: u32,
    pub dashed: bool,
    /// Legend entry, if any.
    pub label: Option<String>,
}

impl Line {
    pub fn solid(points: Vec<(f64, f64)>, color: Color, width: u32) -> Self {
        Self {
            points,
            color,
            width,
            dashed: false,
            label: None,
        }
    }

    pub fn dashed(points: Vec<(f64, f64)>, color: Color) -> Self {
        Self {
            points,
            color,
            width: 2,
            dashed: true,
            label: None,
        }
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub at: (f64, f64),
    /// Radius in pixels.
    pub radius: u32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Text anchored at a data coordinate, optionally nudged by a pixel offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub at: (f64, f64),
    pub offset: (i32, i32),
    /// Font size in points.
    pub size: f64,
    pub color: Color,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

impl Label {
    pub fn new(text: impl Into<String>, at: (f64, f64), size: f64, color: Color) -> Self {
        Self {
            text: text.into(),
            at,
            offset: (0, 0),
            size,
            color,
            h_align: HAlign::Center,
            v_align: VAlign::Center,
        }
    }

    pub fn align(mut self, h_align: HAlign, v_align: VAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    pub fn offset(mut self, dx: i32, dy: i32) -> Self {
        self.offset = (dx, dy);
        self
    }
}

/// Grow one of the ranges so a `width x height` pixel area shows both axes
/// at the same scale. The ranges stay centred on their midpoints.
pub fn fit_equal_aspect(
    x: &Range<f64>,
    y: &Range<f64>,
    width: f64,
    height: f64,
) -> (Range<f64>, Range<f64>) {
    let x_span = x.end - x.start;
    let y_span = y.end - y.start;
    if width <= 0.0 || height <= 0.0 || x_span <= 0.0 || y_span <= 0.0 {
        return (x.clone(), y.clone());
    }

    let units_per_px = (x_span / width).max(y_span / height);
    let grow = |r: &Range<f64>, px: f64| {
        let mid = (r.start + r.end) / 2.0;
        let half = units_per_px * px / 2.0;
        (mid - half)..(mid + half)
    };
    (grow(x, width), grow(y, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pixel_size_scales_with_dpi() {
        let figure = Figure {
            width: 10.0,
            height: 6.0,
            dpi: 150,
            theme: Theme::from_style("white"),
            label_size: 10.0,
            title: None,
            rows: 1,
            cols: 1,
            panels: vec![],
        };
        assert_eq!(figure.pixel_size(), (1500, 900));
        assert_eq!(figure.points_to_px(12.0), 25);
        assert_eq!(figure.points_to_px(0.0), 1);
    }

    #[test]
    fn test_fit_equal_aspect_widens_x() {
        let (x, y) = fit_equal_aspect(&(-1.0..1.0), &(-1.0..1.0), 400.0, 200.0);
        assert_relative_eq!(x.start, -2.0);
        assert_relative_eq!(x.end, 2.0);
        assert_relative_eq!(y.start, -1.0);
        assert_relative_eq!(y.end, 1.0);
    }

    #[test]
    fn test_fit_equal_aspect_widens_y() {
        let (x, y) = fit_equal_aspect(&(0.0..2.0), &(0.0..1.0), 100.0, 100.0);
        assert_relative_eq!(x.start, 0.0);
        assert_relative_eq!(x.end, 2.0);
        assert_relative_eq!(y.start, -0.5);
        assert_relative_eq!(y.end, 1.5);
    }

    #[test]
    fn test_fit_equal_aspect_ignores_degenerate_areas() {
        let (x, y) = fit_equal_aspect(&(0.0..1.0), &(0.0..1.0), 0.0, 100.0);
        assert_eq!(x, 0.0..1.0);
        assert_eq!(y, 0.0..1.0);
    }
}
