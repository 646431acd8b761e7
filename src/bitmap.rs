// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::backend::RenderBackend;
use crate::config::Theme;
use crate::error::{ChartError, ChartResult};
use crate::figure::{fit_equal_aspect, Figure, HAlign, Label, LegendPosition, Mark, Panel, VAlign};
use crate::palette::Color as ChartColor;

const FONT: &str = "sans-serif";

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Raster backend on top of plotters' bitmap encoder. The file format
/// follows the path extension (PNG for every default path).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlottersBackend;

impl PlottersBackend {
    /// Text needs a resolvable font; without one every chart would fail.
    pub fn probe() -> bool {
        (FONT, 12).into_font().box_size("0").is_ok()
    }
}

impl RenderBackend for PlottersBackend {
    fn name(&self) -> &'static str {
        "plotters"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn render(&self, figure: &Figure, path: &Path) -> ChartResult<Option<PathBuf>> {
        // Surface unwritable targets as I/O errors before plotters flattens them.
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|source| ChartError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        draw_figure(figure, path).map_err(|e| ChartError::Render {
            path: path.to_path_buf(),
            message: format!("{:#}", e),
        })?;
        Ok(Some(path.to_path_buf()))
    }
}

fn rgba(color: ChartColor) -> RGBAColor {
    RGBAColor(color.r, color.g, color.b, color.alpha)
}

fn anchor(label: &Label) -> Pos {
    let h = match label.h_align {
        HAlign::Left => HPos::Left,
        HAlign::Center => HPos::Center,
        HAlign::Right => HPos::Right,
    };
    let v = match label.v_align {
        VAlign::Top => VPos::Top,
        VAlign::Center => VPos::Center,
        VAlign::Bottom => VPos::Bottom,
    };
    Pos::new(h, v)
}

fn draw_figure(figure: &Figure, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, figure.pixel_size()).into_drawing_area();
    root.fill(&rgba(figure.theme.background))?;

    let body = match &figure.title {
        Some(title) => root.titled(
            &title.text,
            (FONT, figure.points_to_px(title.size))
                .into_font()
                .color(&rgba(title.color)),
        )?,
        None => root.clone(),
    };

    let cells = body.split_evenly((figure.rows.max(1), figure.cols.max(1)));
    for (panel, cell) in figure.panels.iter().zip(cells.iter()) {
        draw_panel(&root, cell, panel, figure)?;
    }

    root.present()?;
    Ok(())
}

fn draw_panel(root: &Area<'_>, cell: &Area<'_>, panel: &Panel, figure: &Figure) -> Result<()> {
    let label_px = figure.points_to_px(figure.label_size);
    let margin = figure.points_to_px(6.0);
    let (x_area, y_area) = if panel.axes.hidden {
        (0, 0)
    } else {
        (label_px * 3, label_px * 5)
    };

    let mut builder = ChartBuilder::on(cell);
    builder
        .margin(margin)
        .x_label_area_size(x_area)
        .y_label_area_size(y_area);

    let mut caption_px = 0;
    if let Some(title) = &panel.title {
        caption_px = figure.points_to_px(title.size);
        builder.caption(
            &title.text,
            (FONT, caption_px).into_font().color(&rgba(title.color)),
        );
    }

    let (x_range, y_range) = if panel.equal_aspect {
        let (w, h) = cell.dim_in_pixel();
        let plot_w = w as f64 - 2.0 * margin as f64 - y_area as f64;
        let plot_h = h as f64 - 2.0 * margin as f64 - x_area as f64 - 1.5 * caption_px as f64;
        fit_equal_aspect(&panel.x_range, &panel.y_range, plot_w, plot_h)
    } else {
        (panel.x_range.clone(), panel.y_range.clone())
    };

    let mut chart = builder.build_cartesian_2d(x_range, y_range)?;

    if !panel.axes.hidden {
        draw_axes(&mut chart, panel, &figure.theme, label_px)?;
    }

    for mark in &panel.marks {
        match mark {
            Mark::Bar(bar) => {
                chart.draw_series(std::iter::once(Rectangle::new(
                    [bar.from, bar.to],
                    rgba(bar.fill).filled(),
                )))?;
                if let Some(edge) = bar.edge {
                    chart.draw_series(std::iter::once(Rectangle::new(
                        [bar.from, bar.to],
                        rgba(edge).stroke_width(1),
                    )))?;
                }
            }
            Mark::Area(area) => {
                chart.draw_series(std::iter::once(Polygon::new(
                    area.points.clone(),
                    rgba(area.fill).filled(),
                )))?;
            }
            Mark::Line(line) => {
                let style = rgba(line.color).stroke_width(line.width);
                let points = line.points.iter().copied();
                let series = if line.dashed {
                    chart.draw_series(DashedLineSeries::new(points, 8, 6, style))?
                } else {
                    chart.draw_series(LineSeries::new(points, style))?
                };
                if let Some(text) = &line.label {
                    series
                        .label(text.as_str())
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
                }
            }
            Mark::Dot(dot) => {
                chart.draw_series(std::iter::once(Circle::new(
                    dot.at,
                    dot.radius,
                    rgba(dot.color).filled(),
                )))?;
            }
            Mark::Text(label) => {
                // Text is placed in pixel space on the root so labels may sit
                // outside the plotting area (category names, gauge ticks).
                let (x, y) = chart.backend_coord(&label.at);
                let text_color = rgba(label.color);
                let style = TextStyle::from((FONT, figure.points_to_px(label.size)).into_font())
                    .color(&text_color)
                    .pos(anchor(label));
                root.draw_text(&label.text, &style, (x + label.offset.0, y + label.offset.1))?;
            }
        }
    }

    if let Some(position) = panel.legend {
        let position = match position {
            LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
            LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
        };
        chart
            .configure_series_labels()
            .position(position)
            .label_font((FONT, label_px).into_font())
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    Ok(())
}

fn draw_axes<'a, 'b>(
    chart: &mut ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    panel: &Panel,
    theme: &Theme,
    label_px: u32,
) -> Result<()> {
    let blank = |_: &f64| String::new();
    let hidden_line = WHITE.mix(0.0);

    let mut mesh = chart.configure_mesh();
    mesh.label_style((FONT, label_px))
        .axis_desc_style((FONT, label_px))
        .light_line_style(&hidden_line);

    match theme.grid {
        Some(grid) => {
            mesh.bold_line_style(rgba(grid).stroke_width(1));
        }
        None => {
            mesh.disable_mesh();
        }
    }

    if !panel.axes.x_ticks {
        mesh.disable_x_mesh().x_label_formatter(&blank);
    }
    if !panel.axes.y_ticks {
        mesh.disable_y_mesh().y_label_formatter(&blank);
    }
    if let Some(desc) = &panel.axes.x_desc {
        mesh.x_desc(desc.as_str());
    }
    if let Some(desc) = &panel.axes.y_desc {
        mesh.y_desc(desc.as_str());
    }

    mesh.draw()?;
    Ok(())
}
