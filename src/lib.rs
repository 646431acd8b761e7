// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Chart rendering for stock analysis reports: score radars, valuation
//! comparisons, financial dashboards, signal gauges, portfolio allocation
//! and risk breakdowns.

pub mod backend;
#[cfg(feature = "bitmap-backend")]
pub mod bitmap;
pub mod charts;
pub mod config;
pub mod engine;
pub mod error;
pub mod figure;
pub mod models;
pub mod palette;
pub mod report;
pub mod telemetry;

pub use backend::{detect_backend, NoopBackend, RenderBackend};
pub use config::{load_config, ChartConfig};
pub use engine::ChartEngine;
pub use error::{ChartError, ChartResult};
pub use models::{
    AnalysisReportContext, FinancialMetricSet, PortfolioEntry, RiskMap, ScoreSet,
    SignalGaugeInput, ValuationTriple,
};
pub use palette::{ColorScheme, Signal};
