// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::palette::{default_palette, Color, NEUTRAL_GRAY, WHITE};

pub const DEFAULT_STYLE: &str = "seaborn-v0_8-whitegrid";

/// Rendering defaults shared by every chart an engine draws.
///
/// Sizes are in inches and font sizes in points; the backend converts both
/// through `dpi`. Build one with [`ChartConfig::builder`] so an empty color
/// list is replaced by the default palette.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub dpi: u32,
    pub style: String,
    pub title_fontsize: f64,
    pub label_fontsize: f64,
    pub colors: Vec<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig::builder().build()
    }
}

impl ChartConfig {
    pub fn builder() -> ChartConfigBuilder {
        ChartConfigBuilder::default()
    }

    /// Palette color by series index. Indices wrap around the palette and
    /// tokens that do not parse fall back to gray.
    pub fn color(&self, index: usize) -> Color {
        if self.colors.is_empty() {
            return NEUTRAL_GRAY;
        }
        let token = &self.colors[index % self.colors.len()];
        Color::parse(token).unwrap_or(NEUTRAL_GRAY)
    }

    pub fn theme(&self) -> Theme {
        Theme::from_style(&self.style)
    }
}

/// Every field is optional; `build` fills the gaps with defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChartConfigBuilder {
    width: Option<f64>,
    height: Option<f64>,
    dpi: Option<u32>,
    style: Option<String>,
    title_fontsize: Option<f64>,
    label_fontsize: Option<f64>,
    colors: Option<Vec<String>>,
}

impl ChartConfigBuilder {
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.dpi = Some(dpi);
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn title_fontsize(mut self, size: f64) -> Self {
        self.title_fontsize = Some(size);
        self
    }

    pub fn label_fontsize(mut self, size: f64) -> Self {
        self.label_fontsize = Some(size);
        self
    }

    pub fn colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = Some(colors.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> ChartConfig {
        let colors = match self.colors {
            Some(colors) if !colors.is_empty() => colors,
            _ => default_palette(),
        };

        ChartConfig {
            width: self.width.unwrap_or(12.0),
            height: self.height.unwrap_or(8.0),
            dpi: self.dpi.unwrap_or(100),
            style: self.style.unwrap_or_else(|| DEFAULT_STYLE.to_string()),
            title_fontsize: self.title_fontsize.unwrap_or(14.0),
            label_fontsize: self.label_fontsize.unwrap_or(10.0),
            colors,
        }
    }
}

/// Background and grid derived from the `style` identifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub grid: Option<Color>,
}

impl Theme {
    pub fn from_style(style: &str) -> Self {
        let style = style.to_ascii_lowercase();
        if style.contains("whitegrid") {
            Theme {
                background: WHITE,
                grid: Some(Color::rgb(0xdd, 0xdd, 0xdd)),
            }
        } else if style.contains("darkgrid") {
            Theme {
                background: Color::rgb(0xea, 0xea, 0xf2),
                grid: Some(WHITE),
            }
        } else {
            Theme {
                background: WHITE,
                grid: None,
            }
        }
    }
}

pub fn parse_config(config_str: &str) -> Result<ChartConfig> {
    let builder: ChartConfigBuilder = toml::from_str(config_str)?;
    Ok(builder.build())
}

pub fn load_config(config_path: &Path) -> Result<ChartConfig> {
    let config_str = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    parse_config(&config_str)
        .with_context(|| format!("Invalid chart config: {}", config_path.display()))
}

pub fn save_config(config: &ChartConfig, config_path: &Path) -> Result<()> {
    let config_str = toml::to_string_pretty(config)?;
    fs::write(config_path, config_str)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::BLUE;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ChartConfig::default();
        assert_eq!(config.width, 12.0);
        assert_eq!(config.height, 8.0);
        assert_eq!(config.dpi, 100);
        assert_eq!(config.style, DEFAULT_STYLE);
        assert_eq!(config.colors.len(), 10);
    }

    #[test]
    fn test_custom_config() {
        let config = ChartConfig::builder()
            .width(16.0)
            .height(10.0)
            .dpi(150)
            .colors(["#ff0000", "#00ff00"])
            .build();

        assert_eq!(config.width, 16.0);
        assert_eq!(config.dpi, 150);
        assert_eq!(config.colors.len(), 2);
        // Indices wrap around a short palette.
        assert_eq!(config.color(2), config.color(0));
    }

    #[test]
    fn test_empty_colors_use_default_palette() {
        let config = ChartConfig::builder().colors(Vec::<String>::new()).build();
        assert!(config.colors.len() >= 10);
        assert_eq!(config.color(0), BLUE);
    }

    #[test]
    fn test_unparseable_color_is_gray() {
        let config = ChartConfig::builder()
            .colors(["not-a-color", "#日日", "#1f77b4"])
            .build();
        assert_eq!(config.color(0), NEUTRAL_GRAY);
        assert_eq!(config.color(1), NEUTRAL_GRAY);
        assert_eq!(config.color(2), BLUE);
    }

    #[test]
    fn test_theme_from_style() {
        assert!(Theme::from_style(DEFAULT_STYLE).grid.is_some());
        assert_eq!(Theme::from_style("seaborn-v0_8-darkgrid").grid, Some(WHITE));
        assert_eq!(Theme::from_style("classic").grid, None);
    }

    #[test]
    fn test_config_file_roundtrip() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("charts.toml");

        let partial = parse_config("dpi = 200\ncolors = []\n")?;
        assert_eq!(partial.dpi, 200);
        assert_eq!(partial.width, 12.0);
        assert_eq!(partial.colors.len(), 10);

        save_config(&partial, &path)?;
        let loaded = load_config(&path)?;
        assert_eq!(loaded, partial);

        assert!(load_config(&dir.path().join("missing.toml")).is_err());
        Ok(())
    }
}
