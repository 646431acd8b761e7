// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use equity_charts::models::{
    BuySignalAnalysis, CompetitiveMoat, FinancialMetrics, RiskAssessment, ValuationAnalysis,
};
use equity_charts::report;
use equity_charts::telemetry::init_tracing;
use equity_charts::{
    load_config, AnalysisReportContext, ChartConfig, ChartEngine, FinancialMetricSet,
    PortfolioEntry, Signal,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Render stock analysis charts to PNG files
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// Directory the charts are written to
    #[arg(short, long, default_value = "charts")]
    out: PathBuf,

    /// TOML file overriding the chart defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every chart an analysis context (JSON) has data for
    Report {
        /// Path to the analysis context JSON file
        #[arg(long)]
        context: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Render a portfolio allocation from a JSON array of entries
    Portfolio {
        /// Path to the portfolio entries JSON file
        #[arg(long)]
        entries: PathBuf,

        /// Chart title
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Render each chart type with built-in sample data
    Demo {
        #[command(flatten)]
        output: OutputArgs,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report { context, output } => {
            let engine = build_engine(&output)?;
            let ctx: AnalysisReportContext = read_json(&context)?;
            render_report(&engine, &ctx)?;
        }
        Commands::Portfolio {
            entries,
            title,
            output,
        } => {
            let engine = build_engine(&output)?;
            let entries: Vec<PortfolioEntry> = read_json(&entries)?;
            match engine.portfolio_allocation(&entries, title.as_deref(), None)? {
                Some(path) => println!("✅ Portfolio chart saved to {}", path.display()),
                None => println!("No chart backend available, nothing rendered"),
            }
        }
        Commands::Demo { output } => {
            let engine = build_engine(&output)?;
            run_demo(&engine)?;
        }
    }

    Ok(())
}

fn build_engine(output: &OutputArgs) -> Result<ChartEngine> {
    let config = match &output.config {
        Some(path) => load_config(path)?,
        None => ChartConfig::default(),
    };
    let engine = ChartEngine::new(config, &output.out)
        .with_context(|| format!("Failed to prepare output directory {}", output.out.display()))?;
    Ok(engine)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn render_report(engine: &ChartEngine, ctx: &AnalysisReportContext) -> Result<()> {
    let charts = engine.generate_analysis_report(ctx, None)?;
    if charts.is_empty() {
        println!("No chart backend available, nothing rendered");
        return Ok(());
    }
    println!("✅ {} chart(s) for {}:", charts.len(), ctx.stock_code);
    for (name, path) in &charts {
        println!("   {:<10} {}", name, path.display());
    }
    Ok(())
}

fn run_demo(engine: &ChartEngine) -> Result<()> {
    let ctx = sample_context();
    let code = ctx.stock_code.as_str();

    let rendered = [
        engine.score_radar(code, &report::radar_scores(&ctx), None, None)?,
        engine.valuation_comparison(code, &report::valuation_triple(&ctx), None)?,
        engine.financial_metrics(
            code,
            &ctx.financial_metrics
                .as_ref()
                .map(FinancialMetricSet::from)
                .unwrap_or_default(),
            None,
        )?,
        engine.signal_gauge(code, ctx.overall_score, "买入", None)?,
        engine.risk_analysis(code, &report::risk_map(&ctx), None)?,
        engine.portfolio_allocation(&sample_portfolio(), None, None)?,
    ];

    if !engine.is_available() {
        println!("No chart backend available, nothing rendered");
        return Ok(());
    }
    for path in rendered.iter().flatten() {
        println!("✅ {}", path.display());
    }

    render_report(engine, &ctx)
}

fn sample_context() -> AnalysisReportContext {
    let mut ctx = AnalysisReportContext::new("600519", 78.5);
    ctx.stock_name = "Kweichow Moutai".to_string();
    ctx.final_signal = Some(Signal::Buy);
    ctx.financial_metrics = Some(FinancialMetrics {
        pe_ratio: Some(28.5),
        pb_ratio: Some(8.2),
        roe: Some(0.31),
        gross_margin: Some(0.91),
        debt_ratio: Some(0.22),
        current_price: Some(1680.0),
    });
    ctx.valuation = Some(ValuationAnalysis {
        intrinsic_value: Some(2150.0),
        fair_price: Some(1950.0),
        valuation_score: Some(7.2),
    });
    ctx.competitive_moat = Some(CompetitiveMoat { overall_score: 9.1 });
    ctx.risk_assessment = Some(RiskAssessment {
        ability_circle_match: 0.85,
        leverage_risk: 0.2,
        industry_risk: 0.35,
        company_risk: 0.15,
    });
    ctx.buy_signal = Some(BuySignalAnalysis {
        confidence_score: 0.78,
    });
    ctx
}

fn sample_portfolio() -> Vec<PortfolioEntry> {
    vec![
        PortfolioEntry::new("600519", 0.30, 85.0, "strong_buy"),
        PortfolioEntry::new("000858", 0.20, 72.0, "buy"),
        PortfolioEntry::new("600036", 0.15, 64.0, "持有"),
        PortfolioEntry::new("000333", 0.10, 45.0, "sell"),
        PortfolioEntry::new("601318", 0.05, 28.0, "strong_sell"),
    ]
}
