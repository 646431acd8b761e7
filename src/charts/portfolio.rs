// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use std::f64::consts::PI;

use super::{column, figure, polar, title, wedge, x_categories};
use crate::config::ChartConfig;
use crate::figure::{Area, Axes, Figure, HAlign, Label, Mark, Panel, VAlign};
use crate::models::PortfolioEntry;
use crate::palette::{ColorScheme, BLACK, WHITE};

pub const DEFAULT_PORTFOLIO_TITLE: &str = "Portfolio Allocation";

/// Wedge shares in percent. Sizes need not sum to 1; negative sizes count
/// as 0 and an all-zero allocation yields all zeros.
pub fn pie_percentages(sizes: &[f64]) -> Vec<f64> {
    let sizes: Vec<f64> = sizes.iter().map(|s| s.max(0.0)).collect();
    let total: f64 = sizes.iter().sum();
    if total <= 0.0 {
        return vec![0.0; sizes.len()];
    }
    sizes.iter().map(|s| s / total * 100.0).collect()
}

pub fn build_portfolio_allocation(
    config: &ChartConfig,
    scheme: &ColorScheme,
    entries: &[PortfolioEntry],
    chart_title: Option<&str>,
) -> Figure {
    let mut suptitle = title(config, chart_title.unwrap_or(DEFAULT_PORTFOLIO_TITLE));
    suptitle.size = config.title_fontsize + 2.0;

    let mut fig = figure(config, 14.0, 6.0, Some(suptitle));
    fig.cols = 2;
    fig.panels.push(allocation_pie(config, entries));
    fig.panels.push(score_bars(config, scheme, entries));
    fig
}

fn allocation_pie(config: &ChartConfig, entries: &[PortfolioEntry]) -> Panel {
    let mut panel = Panel::new(-1.4..1.4, -1.4..1.4);
    panel.title = Some(Label::new(
        "Position Allocation",
        (0.0, 0.0),
        config.title_fontsize,
        BLACK,
    ));
    panel.axes = Axes::hidden();
    panel.equal_aspect = true;

    let sizes: Vec<f64> = entries.iter().map(|e| e.position_size).collect();
    let mut start = PI / 2.0;
    for (i, (entry, pct)) in entries.iter().zip(pie_percentages(&sizes)).enumerate() {
        if pct <= 0.0 {
            continue;
        }
        let sweep = pct / 100.0 * 2.0 * PI;
        let mid = start + sweep / 2.0;

        panel.push(Mark::Area(Area {
            points: wedge(0.0, 1.0, start, sweep),
            fill: config.color(i),
        }));
        panel.push(Mark::Text(Label::new(
            format!("{:.1}%", pct),
            polar(0.75, mid),
            config.label_fontsize,
            WHITE,
        )));

        let h_align = if mid.cos() >= 0.0 {
            HAlign::Left
        } else {
            HAlign::Right
        };
        panel.push(Mark::Text(
            Label::new(
                entry.stock_code.as_str(),
                polar(1.1, mid),
                config.label_fontsize,
                BLACK,
            )
            .align(h_align, VAlign::Center),
        ));

        start += sweep;
    }

    panel
}

fn score_bars(config: &ChartConfig, scheme: &ColorScheme, entries: &[PortfolioEntry]) -> Panel {
    let n = entries.len().max(1) as f64;
    let mut panel = Panel::new(-0.6..(n - 0.4), 0.0..100.0);
    panel.title = Some(Label::new(
        "Score Comparison",
        (0.0, 0.0),
        config.title_fontsize,
        BLACK,
    ));
    panel.axes = Axes {
        y_ticks: true,
        y_desc: Some("Overall Score".to_string()),
        ..Axes::default()
    };

    for (i, entry) in entries.iter().enumerate() {
        let x = i as f64;
        let score = entry.overall_score;
        panel.push(column(x, 0.8, score, scheme.signal_label(&entry.signal)));
        panel.push(Mark::Text(
            Label::new(
                format!("{:.1}", score),
                (x, score + 2.0),
                config.label_fontsize,
                BLACK,
            )
            .align(HAlign::Center, VAlign::Bottom),
        ));
    }
    let codes: Vec<&str> = entries.iter().map(|e| e.stock_code.as_str()).collect();
    x_categories(&mut panel, &codes, config.label_fontsize);

    panel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{BLUE, GREEN, NEUTRAL_GRAY, OLIVE};
    use approx::assert_relative_eq;

    fn entries() -> Vec<PortfolioEntry> {
        vec![
            PortfolioEntry::new("600519", 0.30, 78.5, "买入"),
            PortfolioEntry::new("000858", 0.20, 65.0, "持有"),
            PortfolioEntry::new("000651", 0.20, 72.0, "buy"),
            PortfolioEntry::new("600036", 0.10, 80.0, "强烈买入"),
        ]
    }

    #[test]
    fn test_percentages_normalize() {
        // Sizes sum to 0.8, labels still sum to 100.
        let pct = pie_percentages(&[0.30, 0.20, 0.20, 0.10]);
        assert_relative_eq!(pct.iter().sum::<f64>(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(pct[0], 37.5, epsilon = 1e-9);

        assert_eq!(pie_percentages(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert_eq!(pie_percentages(&[-1.0, 1.0]), vec![0.0, 100.0]);
    }

    #[test]
    fn test_pie_labels_sum_to_hundred() {
        let fig = build_portfolio_allocation(
            &ChartConfig::default(),
            &ColorScheme::v1(),
            &entries(),
            None,
        );
        let total: f64 = fig.panels[0]
            .texts()
            .filter_map(|l| l.text.strip_suffix('%'))
            .map(|t| t.parse::<f64>().unwrap())
            .sum();
        assert_relative_eq!(total, 100.0, epsilon = 0.2);
        assert_eq!(fig.panels[0].areas().count(), 4);
    }

    #[test]
    fn test_score_bars_follow_signal_colors() {
        let fig = build_portfolio_allocation(
            &ChartConfig::default(),
            &ColorScheme::v1(),
            &entries(),
            Some("2026 Portfolio"),
        );
        let colors: Vec<_> = fig.panels[1].bars().map(|b| b.fill).collect();
        assert_eq!(colors, vec![GREEN, OLIVE, GREEN, BLUE]);
        assert_eq!(fig.panels[1].y_range, 0.0..100.0);
        assert!(fig.has_text("78.5"));

        let suptitle = fig.title.unwrap();
        assert_eq!(suptitle.text, "2026 Portfolio");
        assert_eq!(suptitle.size, ChartConfig::default().title_fontsize + 2.0);
    }

    #[test]
    fn test_palette_wraps_for_large_portfolios() {
        let config = ChartConfig::builder().colors(["#111111", "#222222"]).build();
        let many: Vec<_> = (0..5)
            .map(|i| PortfolioEntry::new(format!("S{}", i), 0.2, 50.0, "???"))
            .collect();
        let fig = build_portfolio_allocation(&config, &ColorScheme::v1(), &many, None);

        let fills: Vec<_> = fig.panels[0].areas().map(|a| a.fill).collect();
        assert_eq!(fills.len(), 5);
        assert_eq!(fills[0], fills[2]);
        assert_eq!(fills[1], fills[3]);
        assert!(fig.panels[1].bars().all(|b| b.fill == NEUTRAL_GRAY));
        assert_eq!(fig.title.unwrap().text, DEFAULT_PORTFOLIO_TITLE);
    }

    #[test]
    fn test_empty_portfolio() {
        let fig =
            build_portfolio_allocation(&ChartConfig::default(), &ColorScheme::v1(), &[], None);
        assert_eq!(fig.panels[0].areas().count(), 0);
        assert_eq!(fig.panels[1].bars().count(), 0);
    }
}
