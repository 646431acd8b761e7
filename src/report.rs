// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Which charts a report contains, and how their inputs are derived from an
//! [`AnalysisReportContext`].

use crate::models::{AnalysisReportContext, RiskMap, ScoreSet, SignalGaugeInput, ValuationTriple};

/// Radar score used when the valuation section carries no score.
pub const DEFAULT_VALUATION_SCORE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Radar,
    Valuation,
    Financial,
    Gauge,
    Risk,
}

impl ChartKind {
    /// Key under which the chart appears in a report's output map.
    pub fn key(&self) -> &'static str {
        match self {
            ChartKind::Radar => "radar",
            ChartKind::Valuation => "valuation",
            ChartKind::Financial => "financial",
            ChartKind::Gauge => "gauge",
            ChartKind::Risk => "risk",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::Radar => "radar.png",
            ChartKind::Valuation => "valuation.png",
            ChartKind::Financial => "financial.png",
            ChartKind::Gauge => "gauge.png",
            ChartKind::Risk => "risk.png",
        }
    }
}

/// Optional sections of the analysis context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    FinancialMetrics,
    Valuation,
    CompetitiveMoat,
    RiskAssessment,
    BuySignal,
}

impl Section {
    pub fn is_present(&self, ctx: &AnalysisReportContext) -> bool {
        match self {
            Section::FinancialMetrics => ctx.financial_metrics.is_some(),
            Section::Valuation => ctx.valuation.is_some(),
            Section::CompetitiveMoat => ctx.competitive_moat.is_some(),
            Section::RiskAssessment => ctx.risk_assessment.is_some(),
            Section::BuySignal => ctx.buy_signal.is_some(),
        }
    }
}

pub struct ReportRule {
    pub chart: ChartKind,
    pub requires: &'static [Section],
}

/// Report charts in output order with the sections each one needs. The
/// gauge needs nothing and is always drawn.
pub const REPORT_RULES: [ReportRule; 5] = [
    ReportRule {
        chart: ChartKind::Radar,
        requires: &[Section::CompetitiveMoat, Section::Valuation],
    },
    ReportRule {
        chart: ChartKind::Valuation,
        requires: &[Section::FinancialMetrics, Section::Valuation],
    },
    ReportRule {
        chart: ChartKind::Financial,
        requires: &[Section::FinancialMetrics],
    },
    ReportRule {
        chart: ChartKind::Gauge,
        requires: &[],
    },
    ReportRule {
        chart: ChartKind::Risk,
        requires: &[Section::RiskAssessment],
    },
];

impl ReportRule {
    pub fn applies(&self, ctx: &AnalysisReportContext) -> bool {
        self.requires.iter().all(|s| s.is_present(ctx))
    }
}

pub fn planned_charts(ctx: &AnalysisReportContext) -> Vec<ChartKind> {
    REPORT_RULES
        .iter()
        .filter(|rule| rule.applies(ctx))
        .map(|rule| rule.chart)
        .collect()
}

/// Radar dimensions on a 0-10 scale. Moat and valuation are always present
/// (a missing valuation score counts as 5); the other three only appear
/// when their section does.
pub fn radar_scores(ctx: &AnalysisReportContext) -> ScoreSet {
    let mut scores = ScoreSet::new();
    scores.insert(
        "Moat",
        ctx.competitive_moat.as_ref().map_or(0.0, |m| m.overall_score),
    );
    scores.insert(
        "Valuation",
        ctx.valuation
            .as_ref()
            .and_then(|v| v.valuation_score)
            .unwrap_or(DEFAULT_VALUATION_SCORE),
    );
    if let Some(fm) = &ctx.financial_metrics {
        scores.insert("Financial", (fm.roe.unwrap_or(0.0) * 30.0).min(10.0));
    }
    if let Some(risk) = &ctx.risk_assessment {
        scores.insert("Risk", 10.0 - risk.leverage_risk * 10.0);
    }
    if let Some(buy) = &ctx.buy_signal {
        scores.insert("Buy Signal", buy.confidence_score * 10.0);
    }
    scores
}

pub fn risk_map(ctx: &AnalysisReportContext) -> RiskMap {
    let mut risks = RiskMap::new();
    if let Some(r) = &ctx.risk_assessment {
        risks.insert("Leverage Risk", r.leverage_risk);
        risks.insert("Industry Risk", r.industry_risk);
        risks.insert("Company Risk", r.company_risk);
        risks.insert("Capability Mismatch", 1.0 - r.ability_circle_match);
    }
    risks
}

pub fn valuation_triple(ctx: &AnalysisReportContext) -> ValuationTriple {
    let current = ctx
        .financial_metrics
        .as_ref()
        .and_then(|f| f.current_price)
        .unwrap_or(0.0);
    let (fair, intrinsic) = ctx.valuation.as_ref().map_or((0.0, 0.0), |v| {
        (v.fair_price.unwrap_or(0.0), v.intrinsic_value.unwrap_or(0.0))
    });
    ValuationTriple::new(current, fair, intrinsic)
}

pub fn gauge_input(ctx: &AnalysisReportContext) -> SignalGaugeInput {
    let signal = ctx.final_signal.map_or("unknown", |s| s.as_str());
    SignalGaugeInput::new(ctx.overall_score, signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BuySignalAnalysis, CompetitiveMoat, FinancialMetrics, RiskAssessment, ValuationAnalysis,
    };
    use crate::palette::Signal;
    use approx::assert_relative_eq;

    fn full_context() -> AnalysisReportContext {
        let mut ctx = AnalysisReportContext::new("600519", 78.0);
        ctx.final_signal = Some(Signal::Buy);
        ctx.financial_metrics = Some(FinancialMetrics {
            roe: Some(0.25),
            current_price: Some(1800.0),
            ..Default::default()
        });
        ctx.valuation = Some(ValuationAnalysis {
            intrinsic_value: Some(2200.0),
            fair_price: Some(2000.0),
            valuation_score: Some(7.0),
        });
        ctx.competitive_moat = Some(CompetitiveMoat { overall_score: 8.5 });
        ctx.risk_assessment = Some(RiskAssessment {
            ability_circle_match: 0.8,
            leverage_risk: 0.2,
            industry_risk: 0.4,
            company_risk: 0.3,
        });
        ctx.buy_signal = Some(BuySignalAnalysis {
            confidence_score: 0.75,
        });
        ctx
    }

    #[test]
    fn test_planned_charts_for_full_context() {
        assert_eq!(
            planned_charts(&full_context()),
            vec![
                ChartKind::Radar,
                ChartKind::Valuation,
                ChartKind::Financial,
                ChartKind::Gauge,
                ChartKind::Risk
            ]
        );
    }

    #[test]
    fn test_planned_charts_with_only_financials() {
        let mut ctx = AnalysisReportContext::new("000001", 40.0);
        ctx.financial_metrics = Some(FinancialMetrics::default());
        assert_eq!(
            planned_charts(&ctx),
            vec![ChartKind::Financial, ChartKind::Gauge]
        );
    }

    #[test]
    fn test_gauge_is_always_planned() {
        let ctx = AnalysisReportContext::new("000001", 40.0);
        assert_eq!(planned_charts(&ctx), vec![ChartKind::Gauge]);
    }

    #[test]
    fn test_radar_scores() {
        let scores = radar_scores(&full_context());
        let values: Vec<_> = scores.iter().map(|(_, v)| v).collect();
        assert_eq!(scores.len(), 5);
        assert_relative_eq!(values[0], 8.5);
        assert_relative_eq!(values[1], 7.0);
        assert_relative_eq!(values[2], 7.5);
        assert_relative_eq!(values[3], 8.0);
        assert_relative_eq!(values[4], 7.5);
    }

    #[test]
    fn test_radar_scores_defaults() {
        let mut ctx = full_context();
        ctx.valuation = Some(ValuationAnalysis::default());
        ctx.financial_metrics = Some(FinancialMetrics {
            roe: Some(0.5),
            ..Default::default()
        });
        ctx.buy_signal = None;

        let scores = radar_scores(&ctx);
        assert_eq!(scores.get("Valuation"), Some(DEFAULT_VALUATION_SCORE));
        assert_eq!(scores.get("Financial"), Some(10.0));
        assert_eq!(scores.get("Buy Signal"), None);
        assert_eq!(scores.len(), 4);
    }

    #[test]
    fn test_radar_scores_with_only_gate_sections() {
        let mut ctx = AnalysisReportContext::new("X", 50.0);
        ctx.competitive_moat = Some(CompetitiveMoat { overall_score: 6.0 });
        ctx.valuation = Some(ValuationAnalysis::default());

        let scores = radar_scores(&ctx);
        let names: Vec<_> = scores.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["Moat", "Valuation"]);
    }

    #[test]
    fn test_zero_valuation_score_is_kept() {
        let mut ctx = full_context();
        ctx.valuation = Some(ValuationAnalysis {
            valuation_score: Some(0.0),
            ..Default::default()
        });
        assert_eq!(radar_scores(&ctx).get("Valuation"), Some(0.0));
    }

    #[test]
    fn test_risk_map_inverts_circle_match() {
        let risks = risk_map(&full_context());
        let entries: Vec<_> = risks.iter().collect();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0], ("Leverage Risk", 0.2));
        assert_eq!(entries[3].0, "Capability Mismatch");
        assert_relative_eq!(entries[3].1, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_valuation_triple_and_gauge_input() {
        let ctx = full_context();
        assert_eq!(
            valuation_triple(&ctx),
            ValuationTriple::new(1800.0, 2000.0, 2200.0)
        );
        let gauge = gauge_input(&ctx);
        assert_eq!(gauge.score, 78.0);
        assert_eq!(gauge.signal, "buy");

        let bare = AnalysisReportContext::new("X", 10.0);
        assert_eq!(gauge_input(&bare).signal, "unknown");
        assert_eq!(valuation_triple(&bare), ValuationTriple::new(0.0, 0.0, 0.0));
    }
}
