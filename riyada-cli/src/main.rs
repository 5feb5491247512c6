use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use riyada_ai::{Assistant, GeminiClient};
use riyada_cli::commands::ai::{self, AiCommand};
use riyada_cli::commands::calc::{
    self, BreakEvenArgs, CashFlowArgs, DepreciationArgs, IncomeStatementArgs, LedgerArgs,
    RiskMatrixArgs, SalesPlanArgs, SiteSelectionArgs, StaffingArgs, TimelineArgs,
};
use riyada_cli::commands::exercise::{self, ExerciseKind};
use riyada_cli::config::{Config, DEFAULT_CONFIG_FILE};
use riyada_cli::logging;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Entrepreneurship and accounting workbook.
///
/// Financial worksheets, classroom exercises, and an AI assistant for
/// business plans, strategic analyses and practice exams.
#[derive(Debug, Parser)]
#[command(name = "riyada", version)]
struct Cli {
    /// Configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log level or filter directive; overrides RUST_LOG and the config file.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Hide log output on stderr.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Units and revenue needed to cover fixed costs.
    BreakEven(BreakEvenArgs),
    /// Simple income statement with tax.
    IncomeStatement(IncomeStatementArgs),
    /// Twelve-month cash-flow roll-forward.
    CashFlow(CashFlowArgs),
    /// Nine-month sales plan with tax on positive profit.
    SalesPlan(SalesPlanArgs),
    /// Straight-line depreciation schedule.
    Depreciation(DepreciationArgs),
    /// Running-balance cash ledger.
    Ledger(LedgerArgs),
    /// Probability × impact risk matrix with a heat map.
    RiskMatrix(RiskMatrixArgs),
    /// Weighted comparison of two candidate sites.
    SiteSelection(SiteSelectionArgs),
    /// Implementation schedule as a month-by-month chart.
    Timeline(TimelineArgs),
    /// Roles and monthly payroll.
    Staffing(StaffingArgs),
    /// Interactive classroom exercise.
    Exercise {
        #[arg(value_enum)]
        kind: ExerciseKind,
    },
    /// AI assistant tasks.
    #[command(subcommand)]
    Ai(AiCommand),
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;

    logging::init_logging(&config.logging.level);
    if let Some(level) = &cli.log_level {
        logging::set_log_level(level)?;
    }
    if let Some(path) = cli.log_file.as_ref().or(config.logging.file.as_ref()) {
        logging::enable_file_logging(path)?;
    }
    if cli.quiet {
        logging::set_stderr_enabled(false)?;
    }
    debug!(config = %cli.config.display(), "starting");

    let stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::BreakEven(args) => writeln!(stdout, "{}", calc::break_even(&args)?)?,
        Commands::IncomeStatement(args) => writeln!(stdout, "{}", calc::income_statement(&args))?,
        Commands::CashFlow(args) => writeln!(stdout, "{}", calc::cash_flow(&args)?)?,
        Commands::SalesPlan(args) => writeln!(stdout, "{}", calc::sales_plan(&args)?)?,
        Commands::Depreciation(args) => writeln!(stdout, "{}", calc::depreciation(&args)?)?,
        Commands::Ledger(args) => writeln!(stdout, "{}", calc::ledger(&args)?)?,
        Commands::RiskMatrix(args) => writeln!(stdout, "{}", calc::risk_matrix(&args)?)?,
        Commands::SiteSelection(args) => writeln!(stdout, "{}", calc::site_selection(&args)?)?,
        Commands::Timeline(args) => writeln!(stdout, "{}", calc::timeline(&args)?)?,
        Commands::Staffing(args) => writeln!(stdout, "{}", calc::staffing(&args)?)?,
        Commands::Exercise { kind } => exercise::run(kind, stdin, &mut stdout)?,
        Commands::Ai(command) => {
            let api_key = config.ai.api_key()?;
            let client = GeminiClient::new(
                &config.ai.base_url,
                &config.ai.model,
                api_key,
                config.ai.timeout(),
            )
            .context("Failed to build the assistant client")?;
            let assistant = Assistant::new(client);
            ai::run(&assistant, command, stdin, &mut stdout).await?;
        }
    }

    Ok(())
}
