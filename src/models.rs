// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::palette::Signal;

/// Dimension name to score on a 0-10 scale. Insertion order fixes the
/// angular position of each dimension on the radar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreSet(IndexMap<String, f64>);

impl ScoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dimension: impl Into<String>, score: f64) {
        self.0.insert(dimension.into(), score);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn get(&self, dimension: &str) -> Option<f64> {
        self.0.get(dimension).copied()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ScoreSet {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Risk category name to coefficient in `[0, 1]`, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskMap(IndexMap<String, f64>);

impl RiskMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<String>, value: f64) {
        self.0.insert(category.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for RiskMap {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationTriple {
    pub current: f64,
    pub fair: f64,
    pub intrinsic: f64,
}

impl ValuationTriple {
    pub fn new(current: f64, fair: f64, intrinsic: f64) -> Self {
        Self {
            current,
            fair,
            intrinsic,
        }
    }

    /// Percentage by which the fair price exceeds the current price,
    /// rounded to one decimal. `None` unless `current < fair`.
    pub fn safety_margin(&self) -> Option<f64> {
        if self.current < self.fair && self.fair != 0.0 {
            let margin = (self.fair - self.current) / self.fair * 100.0;
            Some((margin * 10.0).round() / 10.0)
        } else {
            None
        }
    }

    pub fn values(&self) -> [f64; 3] {
        [self.current, self.fair, self.intrinsic]
    }
}

/// Ratios shown on the financial dashboard. ROE, gross margin and debt
/// ratio are fractions; P/E and P/B are raw multiples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialMetricSet {
    pub roe: f64,
    pub gross_margin: f64,
    pub pe_ratio: f64,
    pub pb_ratio: f64,
    pub debt_ratio: f64,
    pub current_price: f64,
}

impl FinancialMetricSet {
    /// Build from a loose key/value map; missing keys are 0.
    pub fn from_map(metrics: &HashMap<String, f64>) -> Self {
        let get = |key: &str| metrics.get(key).copied().unwrap_or(0.0);
        Self {
            roe: get("roe"),
            gross_margin: get("gross_margin"),
            pe_ratio: get("pe_ratio"),
            pb_ratio: get("pb_ratio"),
            debt_ratio: get("debt_ratio"),
            current_price: get("current_price"),
        }
    }
}

impl From<&FinancialMetrics> for FinancialMetricSet {
    fn from(fm: &FinancialMetrics) -> Self {
        Self {
            roe: fm.roe.unwrap_or(0.0),
            gross_margin: fm.gross_margin.unwrap_or(0.0),
            pe_ratio: fm.pe_ratio.unwrap_or(0.0),
            pb_ratio: fm.pb_ratio.unwrap_or(0.0),
            debt_ratio: fm.debt_ratio.unwrap_or(0.0),
            current_price: fm.current_price.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalGaugeInput {
    pub score: f64,
    pub signal: String,
}

impl SignalGaugeInput {
    pub fn new(score: f64, signal: impl Into<String>) -> Self {
        Self {
            score,
            signal: signal.into(),
        }
    }

    pub fn clamped_score(&self) -> f64 {
        self.score.clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub stock_code: String,
    #[serde(default)]
    pub position_size: f64,
    #[serde(default)]
    pub overall_score: f64,
    #[serde(default)]
    pub signal: String,
}

impl PortfolioEntry {
    pub fn new(
        stock_code: impl Into<String>,
        position_size: f64,
        overall_score: f64,
        signal: impl Into<String>,
    ) -> Self {
        Self {
            stock_code: stock_code.into(),
            position_size,
            overall_score,
            signal: signal.into(),
        }
    }
}

// Sub-records of the upstream analysis context. Only the fields the charts
// read are modelled; unknown fields are ignored on deserialization.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialMetrics {
    pub pe_ratio: Option<f64>,
    pub pb_ratio: Option<f64>,
    pub roe: Option<f64>,
    pub gross_margin: Option<f64>,
    pub debt_ratio: Option<f64>,
    pub current_price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationAnalysis {
    pub intrinsic_value: Option<f64>,
    pub fair_price: Option<f64>,
    /// 0-10
    pub valuation_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitiveMoat {
    /// 0-10
    pub overall_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskAssessment {
    pub ability_circle_match: f64,
    pub leverage_risk: f64,
    pub industry_risk: f64,
    pub company_risk: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuySignalAnalysis {
    /// 0-1
    pub confidence_score: f64,
}

/// Aggregate record produced by the analysis pipeline. Any sub-record may
/// be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReportContext {
    pub stock_code: String,
    #[serde(default)]
    pub stock_name: String,
    #[serde(default)]
    pub overall_score: f64,
    #[serde(default)]
    pub final_signal: Option<Signal>,
    #[serde(default)]
    pub financial_metrics: Option<FinancialMetrics>,
    #[serde(default)]
    pub valuation: Option<ValuationAnalysis>,
    #[serde(default)]
    pub competitive_moat: Option<CompetitiveMoat>,
    #[serde(default)]
    pub risk_assessment: Option<RiskAssessment>,
    #[serde(default)]
    pub buy_signal: Option<BuySignalAnalysis>,
}

impl AnalysisReportContext {
    pub fn new(stock_code: impl Into<String>, overall_score: f64) -> Self {
        Self {
            stock_code: stock_code.into(),
            overall_score,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_score_set_keeps_insertion_order() {
        let mut scores = ScoreSet::new();
        scores.insert("财务", 8.0);
        scores.insert("估值", 7.0);
        scores.insert("护城河", 9.0);
        scores.insert("估值", 6.5);

        let names: Vec<_> = scores.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["财务", "估值", "护城河"]);
        assert_eq!(scores.get("估值"), Some(6.5));
    }

    #[test]
    fn test_safety_margin() {
        let margin = ValuationTriple::new(1800.0, 2000.0, 2200.0).safety_margin();
        assert_relative_eq!(margin.unwrap(), 10.0, epsilon = 1e-9);

        assert!(ValuationTriple::new(2000.0, 1800.0, 2200.0)
            .safety_margin()
            .is_none());
        assert!(ValuationTriple::new(2000.0, 2000.0, 2200.0)
            .safety_margin()
            .is_none());

        let margin = ValuationTriple::new(10.0, 30.0, 0.0).safety_margin();
        assert_relative_eq!(margin.unwrap(), 66.7, epsilon = 1e-9);
    }

    #[test]
    fn test_financial_metric_set_defaults() {
        let map = HashMap::from([("roe".to_string(), 0.3), ("pe_ratio".to_string(), 30.0)]);
        let metrics = FinancialMetricSet::from_map(&map);
        assert_eq!(metrics.roe, 0.3);
        assert_eq!(metrics.pe_ratio, 30.0);
        assert_eq!(metrics.gross_margin, 0.0);
        assert_eq!(metrics.debt_ratio, 0.0);
    }

    #[test]
    fn test_gauge_input_clamps() {
        assert_eq!(SignalGaugeInput::new(150.0, "buy").clamped_score(), 100.0);
        assert_eq!(SignalGaugeInput::new(-10.0, "buy").clamped_score(), 0.0);
        assert_eq!(SignalGaugeInput::new(78.5, "buy").clamped_score(), 78.5);
    }

    #[test]
    fn test_context_from_json() -> anyhow::Result<()> {
        let ctx: AnalysisReportContext = serde_json::from_str(
            r#"{
                "stock_code": "600519",
                "overall_score": 78.5,
                "final_signal": "buy",
                "financial_metrics": { "roe": 0.3, "current_price": 1800.0, "free_cash_flow": 1.0 },
                "risk_assessment": { "leverage_risk": 0.2 }
            }"#,
        )?;

        assert_eq!(ctx.stock_code, "600519");
        assert_eq!(ctx.final_signal, Some(Signal::Buy));
        assert_eq!(ctx.financial_metrics.as_ref().and_then(|f| f.roe), Some(0.3));
        assert_eq!(ctx.risk_assessment.as_ref().map(|r| r.company_risk), Some(0.0));
        assert!(ctx.valuation.is_none());
        assert!(ctx.competitive_moat.is_none());

        let chinese: AnalysisReportContext =
            serde_json::from_str(r#"{ "stock_code": "000858", "final_signal": "持有" }"#)?;
        assert_eq!(chinese.final_signal, Some(Signal::Hold));
        Ok(())
    }
}
