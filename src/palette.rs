// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use serde::{Deserialize, Serialize};

/// An RGB color with an opacity in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Parse a color token: `#rrggbb`, `#rgb` or a basic color name.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(hex) = token.strip_prefix('#') {
            return parse_hex(hex);
        }
        let named = match token.to_ascii_lowercase().as_str() {
            "black" => BLACK,
            "white" => WHITE,
            "red" => RED,
            "green" => GREEN,
            "blue" => BLUE,
            "orange" => ORANGE,
            "olive" | "yellowgreen" => OLIVE,
            "gray" | "grey" => NEUTRAL_GRAY,
            "purple" => Color::rgb(0x94, 0x67, 0xbd),
            "brown" => Color::rgb(0x8c, 0x56, 0x4b),
            "pink" => Color::rgb(0xe3, 0x77, 0xc2),
            "cyan" => Color::rgb(0x17, 0xbe, 0xcf),
            _ => return None,
        };
        Some(named)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some(Color::rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const RED: Color = Color::rgb(0xd6, 0x27, 0x28);
pub const ORANGE: Color = Color::rgb(0xff, 0x7f, 0x0e);
pub const OLIVE: Color = Color::rgb(0xbc, 0xbd, 0x22);
pub const GREEN: Color = Color::rgb(0x2c, 0xa0, 0x2c);
pub const BLUE: Color = Color::rgb(0x1f, 0x77, 0xb4);
pub const NEUTRAL_GRAY: Color = Color::rgb(0x7f, 0x7f, 0x7f);

/// Qualitative palette used whenever a config carries no colors of its own.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

pub fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
}

/// Closed vocabulary of investment signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    #[serde(alias = "强烈买入", alias = "strong-buy")]
    StrongBuy,
    #[serde(alias = "买入")]
    Buy,
    #[serde(alias = "持有")]
    Hold,
    #[serde(alias = "卖出")]
    Sell,
    #[serde(alias = "强烈卖出", alias = "strong-sell")]
    StrongSell,
}

impl Signal {
    pub const ALL: [Signal; 5] = [
        Signal::StrongBuy,
        Signal::Buy,
        Signal::Hold,
        Signal::Sell,
        Signal::StrongSell,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::StrongBuy => "strong_buy",
            Signal::Buy => "buy",
            Signal::Hold => "hold",
            Signal::Sell => "sell",
            Signal::StrongSell => "strong_sell",
        }
    }

    /// Recognise a signal label in English (snake or kebab case) or Chinese.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "strong_buy" | "强烈买入" => Some(Signal::StrongBuy),
            "buy" | "买入" => Some(Signal::Buy),
            "hold" | "持有" => Some(Signal::Hold),
            "sell" | "卖出" => Some(Signal::Sell),
            "strong_sell" | "强烈卖出" => Some(Signal::StrongSell),
            _ => None,
        }
    }
}

/// Risk coefficient bands. Boundaries belong to the upper band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

pub const LOW_RISK_CEILING: f64 = 0.3;
pub const HIGH_RISK_FLOOR: f64 = 0.6;

impl RiskBand {
    pub fn for_value(value: f64) -> Self {
        if value < LOW_RISK_CEILING {
            RiskBand::Low
        } else if value < HIGH_RISK_FLOOR {
            RiskBand::Medium
        } else {
            RiskBand::High
        }
    }
}

/// A score range of the gauge background, `[low, high)`; the last band
/// also includes 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeBand {
    pub low: f64,
    pub high: f64,
    pub color: Color,
}

/// The single lookup every chart consults for label and band colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    pub version: u32,
    pub strong_buy: Color,
    pub buy: Color,
    pub hold: Color,
    pub sell: Color,
    pub strong_sell: Color,
    pub unknown_signal: Color,
    pub risk_low: Color,
    pub risk_medium: Color,
    pub risk_high: Color,
    pub gauge_bands: [GaugeBand; 5],
    /// Current price, fair price, intrinsic value.
    pub valuation_bars: [Color; 3],
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::v1()
    }
}

impl ColorScheme {
    pub fn v1() -> Self {
        Self {
            version: 1,
            strong_buy: BLUE,
            buy: GREEN,
            hold: OLIVE,
            sell: ORANGE,
            strong_sell: RED,
            unknown_signal: NEUTRAL_GRAY,
            risk_low: GREEN,
            risk_medium: ORANGE,
            risk_high: RED,
            gauge_bands: [
                GaugeBand { low: 0.0, high: 30.0, color: RED },
                GaugeBand { low: 30.0, high: 50.0, color: ORANGE },
                GaugeBand { low: 50.0, high: 70.0, color: OLIVE },
                GaugeBand { low: 70.0, high: 85.0, color: GREEN },
                GaugeBand { low: 85.0, high: 100.0, color: BLUE },
            ],
            valuation_bars: [RED, GREEN, BLUE],
        }
    }

    pub fn signal(&self, signal: Signal) -> Color {
        match signal {
            Signal::StrongBuy => self.strong_buy,
            Signal::Buy => self.buy,
            Signal::Hold => self.hold,
            Signal::Sell => self.sell,
            Signal::StrongSell => self.strong_sell,
        }
    }

    /// Color for a free-form signal label; unrecognised labels are gray.
    pub fn signal_label(&self, label: &str) -> Color {
        Signal::from_label(label)
            .map(|s| self.signal(s))
            .unwrap_or(self.unknown_signal)
    }

    pub fn risk(&self, band: RiskBand) -> Color {
        match band {
            RiskBand::Low => self.risk_low,
            RiskBand::Medium => self.risk_medium,
            RiskBand::High => self.risk_high,
        }
    }

    /// The band containing `score`, after clamping it to `[0, 100]`.
    pub fn gauge_band(&self, score: f64) -> &GaugeBand {
        let score = score.clamp(0.0, 100.0);
        self.gauge_bands
            .iter()
            .find(|band| score >= band.low && score < band.high)
            .unwrap_or(&self.gauge_bands[self.gauge_bands.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_tokens() {
        assert_eq!(Color::parse("#1f77b4"), Some(BLUE));
        assert_eq!(Color::parse("#fff"), Some(WHITE));
        assert_eq!(Color::parse("Red"), Some(RED));
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("#gg0000"), None);
        assert_eq!(Color::parse("chartreuse"), None);
        assert_eq!(Color::parse("#日日"), None);
        assert_eq!(Color::parse("#é"), None);
    }

    #[test]
    fn test_default_palette_parses() {
        assert_eq!(DEFAULT_PALETTE.len(), 10);
        for token in DEFAULT_PALETTE {
            assert!(Color::parse(token).is_some(), "bad token {}", token);
        }
    }

    #[test]
    fn test_signal_labels() {
        assert_eq!(Signal::from_label("买入"), Some(Signal::Buy));
        assert_eq!(Signal::from_label("buy"), Some(Signal::Buy));
        assert_eq!(Signal::from_label("Strong-Buy"), Some(Signal::StrongBuy));
        assert_eq!(Signal::from_label("strong_sell"), Some(Signal::StrongSell));
        assert_eq!(Signal::from_label("强烈卖出"), Some(Signal::StrongSell));
        assert_eq!(Signal::from_label("unknown"), None);

        for signal in Signal::ALL {
            assert_eq!(Signal::from_label(signal.as_str()), Some(signal));
        }
    }

    #[test]
    fn test_signal_colors() {
        let scheme = ColorScheme::v1();
        assert_eq!(scheme.signal_label("买入"), GREEN);
        assert_eq!(scheme.signal_label("strong_buy"), BLUE);
        assert_eq!(scheme.signal_label("hold"), OLIVE);
        assert_eq!(scheme.signal_label("sell"), ORANGE);
        assert_eq!(scheme.signal_label("strong_sell"), RED);
        assert_eq!(scheme.signal_label("未知"), NEUTRAL_GRAY);
    }

    #[test]
    fn test_risk_bands() {
        assert_eq!(RiskBand::for_value(0.0), RiskBand::Low);
        assert_eq!(RiskBand::for_value(0.29), RiskBand::Low);
        assert_eq!(RiskBand::for_value(0.3), RiskBand::Medium);
        assert_eq!(RiskBand::for_value(0.59), RiskBand::Medium);
        assert_eq!(RiskBand::for_value(0.6), RiskBand::High);
        assert_eq!(RiskBand::for_value(1.5), RiskBand::High);
    }

    #[test]
    fn test_gauge_bands() {
        let scheme = ColorScheme::v1();
        assert_eq!(scheme.gauge_band(0.0).color, RED);
        assert_eq!(scheme.gauge_band(29.9).color, RED);
        assert_eq!(scheme.gauge_band(30.0).color, ORANGE);
        assert_eq!(scheme.gauge_band(69.9).color, OLIVE);
        assert_eq!(scheme.gauge_band(78.5).color, GREEN);
        assert_eq!(scheme.gauge_band(85.0).color, BLUE);
        assert_eq!(scheme.gauge_band(100.0).color, BLUE);
        assert_eq!(scheme.gauge_band(250.0).color, BLUE);
        assert_eq!(scheme.gauge_band(-5.0).color, RED);
    }
}
