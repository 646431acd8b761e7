// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::backend::{detect_backend, RenderBackend};
use crate::charts::{
    build_financial_metrics, build_portfolio_allocation, build_risk_analysis, build_score_radar,
    build_signal_gauge, build_valuation_comparison,
};
use crate::config::ChartConfig;
use crate::error::{ChartError, ChartResult};
use crate::figure::Figure;
use crate::models::{
    AnalysisReportContext, FinancialMetricSet, PortfolioEntry, RiskMap, ScoreSet,
    SignalGaugeInput, ValuationTriple,
};
use crate::palette::ColorScheme;
use crate::report::{self, ChartKind, REPORT_RULES};

pub const PORTFOLIO_FILE_NAME: &str = "portfolio_allocation.png";

/// Draws the stock analysis charts into an output directory.
///
/// Every chart method returns `Ok(None)` when the engine sits on a backend
/// that cannot produce files, and the written path otherwise.
pub struct ChartEngine {
    config: ChartConfig,
    scheme: ColorScheme,
    output_dir: PathBuf,
    backend: Box<dyn RenderBackend>,
}

impl ChartEngine {
    /// Create the output directory (with parents) and pick the best
    /// available backend.
    pub fn new(config: ChartConfig, output_dir: impl Into<PathBuf>) -> ChartResult<Self> {
        Self::with_backend(config, output_dir, detect_backend())
    }

    pub fn with_backend(
        config: ChartConfig,
        output_dir: impl Into<PathBuf>,
        backend: Box<dyn RenderBackend>,
    ) -> ChartResult<Self> {
        let output_dir = output_dir.into();
        create_dir(&output_dir)?;
        if !backend.is_available() {
            warn!(
                "chart backend '{}' is unavailable, charts will be skipped",
                backend.name()
            );
        }
        Ok(Self {
            config,
            scheme: ColorScheme::default(),
            output_dir,
            backend,
        })
    }

    /// Swap the color tables used for signals, risk bands and gauge bands.
    pub fn with_scheme(mut self, scheme: ColorScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn scheme(&self) -> &ColorScheme {
        &self.scheme
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn score_radar(
        &self,
        stock_code: &str,
        scores: &ScoreSet,
        title: Option<&str>,
        save_path: Option<&Path>,
    ) -> ChartResult<Option<PathBuf>> {
        if !self.is_available() {
            return Ok(None);
        }
        let figure = build_score_radar(&self.config, stock_code, scores, title);
        let path = self.chart_path(save_path, format!("{}_radar.png", stock_code));
        self.save(&figure, &path)
    }

    pub fn valuation_comparison(
        &self,
        stock_code: &str,
        valuation: &ValuationTriple,
        save_path: Option<&Path>,
    ) -> ChartResult<Option<PathBuf>> {
        if !self.is_available() {
            return Ok(None);
        }
        let figure = build_valuation_comparison(&self.config, &self.scheme, stock_code, valuation);
        let path = self.chart_path(save_path, format!("{}_valuation.png", stock_code));
        self.save(&figure, &path)
    }

    pub fn financial_metrics(
        &self,
        stock_code: &str,
        metrics: &FinancialMetricSet,
        save_path: Option<&Path>,
    ) -> ChartResult<Option<PathBuf>> {
        if !self.is_available() {
            return Ok(None);
        }
        let figure = build_financial_metrics(&self.config, stock_code, metrics);
        let path = self.chart_path(save_path, format!("{}_financial.png", stock_code));
        self.save(&figure, &path)
    }

    /// `score` is clamped to 0-100; unknown signal labels are drawn gray.
    pub fn signal_gauge(
        &self,
        stock_code: &str,
        score: f64,
        signal: &str,
        save_path: Option<&Path>,
    ) -> ChartResult<Option<PathBuf>> {
        if !self.is_available() {
            return Ok(None);
        }
        let input = SignalGaugeInput::new(score, signal);
        let figure = build_signal_gauge(&self.config, &self.scheme, stock_code, &input);
        let path = self.chart_path(save_path, format!("{}_gauge.png", stock_code));
        self.save(&figure, &path)
    }

    pub fn portfolio_allocation(
        &self,
        entries: &[PortfolioEntry],
        title: Option<&str>,
        save_path: Option<&Path>,
    ) -> ChartResult<Option<PathBuf>> {
        if !self.is_available() {
            return Ok(None);
        }
        let figure = build_portfolio_allocation(&self.config, &self.scheme, entries, title);
        let path = self.chart_path(save_path, PORTFOLIO_FILE_NAME.to_string());
        self.save(&figure, &path)
    }

    pub fn risk_analysis(
        &self,
        stock_code: &str,
        risks: &RiskMap,
        save_path: Option<&Path>,
    ) -> ChartResult<Option<PathBuf>> {
        if !self.is_available() {
            return Ok(None);
        }
        let figure = build_risk_analysis(&self.config, &self.scheme, stock_code, risks);
        let path = self.chart_path(save_path, format!("{}_risk.png", stock_code));
        self.save(&figure, &path)
    }

    /// Draw every chart the context has data for into `output_dir`
    /// (default `<engine dir>/<stock code>`), keyed by chart name.
    pub fn generate_analysis_report(
        &self,
        ctx: &AnalysisReportContext,
        output_dir: Option<&Path>,
    ) -> ChartResult<IndexMap<String, PathBuf>> {
        let mut charts = IndexMap::new();
        if !self.is_available() {
            return Ok(charts);
        }

        let report_dir = output_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.output_dir.join(&ctx.stock_code));
        create_dir(&report_dir)?;

        for rule in &REPORT_RULES {
            let kind = rule.chart;
            if !rule.applies(ctx) {
                debug!("{}: skipping {} chart, inputs missing", ctx.stock_code, kind.key());
                continue;
            }

            let path = report_dir.join(kind.file_name());
            if let Some(written) = self.draw_report_chart(kind, ctx, &path)? {
                charts.insert(kind.key().to_string(), written);
            }
        }

        info!(
            "{}: report with {} chart(s) in {}",
            ctx.stock_code,
            charts.len(),
            report_dir.display()
        );
        Ok(charts)
    }

    fn draw_report_chart(
        &self,
        kind: ChartKind,
        ctx: &AnalysisReportContext,
        path: &Path,
    ) -> ChartResult<Option<PathBuf>> {
        let code = ctx.stock_code.as_str();
        match kind {
            ChartKind::Radar => {
                self.score_radar(code, &report::radar_scores(ctx), None, Some(path))
            }
            ChartKind::Valuation => {
                self.valuation_comparison(code, &report::valuation_triple(ctx), Some(path))
            }
            ChartKind::Financial => {
                let metrics = ctx
                    .financial_metrics
                    .as_ref()
                    .map(FinancialMetricSet::from)
                    .unwrap_or_default();
                self.financial_metrics(code, &metrics, Some(path))
            }
            ChartKind::Gauge => {
                let input = report::gauge_input(ctx);
                self.signal_gauge(code, input.score, &input.signal, Some(path))
            }
            ChartKind::Risk => self.risk_analysis(code, &report::risk_map(ctx), Some(path)),
        }
    }

    fn chart_path(&self, save_path: Option<&Path>, default_name: String) -> PathBuf {
        save_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.output_dir.join(default_name))
    }

    fn save(&self, figure: &Figure, path: &Path) -> ChartResult<Option<PathBuf>> {
        let written = self.backend.render(figure, path)?;
        if let Some(written) = &written {
            info!("✅ Chart saved to {}", written.display());
        }
        Ok(written)
    }
}

fn create_dir(path: &Path) -> ChartResult<()> {
    fs::create_dir_all(path).map_err(|source| ChartError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
