//! Worksheet calculators. Each handler turns its arguments into a report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rust_decimal::Decimal;
use tracing::info;

use riyada_core::calculations::{
    BreakEvenCalculator, BreakEvenInput, CashFlowPlan, CashLedger, DepreciationTable,
    IncomeStatement, IncomeStatementInput, NewRisk, RiskId, RiskMatrix, RoleInput, SalesPlan,
    SalesPlanLine, Site, SiteMatrix, StaffingTable, Timeline,
};
use riyada_core::calculations::cash_flow::DEFAULT_OPENING_CASH;
use riyada_core::calculations::sales_plan::DEFAULT_SALES_TAX_RATE;

use crate::csv_loader;
use crate::report;
use crate::utils::parse_decimal;

// =============================================================================
// Break-even
// =============================================================================

#[derive(Debug, Clone, Default, Args)]
pub struct BreakEvenArgs {
    /// Fixed costs for the period [default: 10000]
    #[arg(long, value_parser = parse_decimal)]
    pub fixed_costs: Option<Decimal>,

    /// Selling price of one unit [default: 40]
    #[arg(long, value_parser = parse_decimal)]
    pub unit_price: Option<Decimal>,

    /// Variable cost of one unit [default: 15]
    #[arg(long, value_parser = parse_decimal)]
    pub unit_variable_cost: Option<Decimal>,
}

pub fn break_even(args: &BreakEvenArgs) -> Result<String> {
    let defaults = BreakEvenInput::default();
    let input = BreakEvenInput {
        fixed_costs: args.fixed_costs.unwrap_or(defaults.fixed_costs),
        unit_price: args.unit_price.unwrap_or(defaults.unit_price),
        unit_variable_cost: args
            .unit_variable_cost
            .unwrap_or(defaults.unit_variable_cost),
    };
    let result = BreakEvenCalculator::calculate(&input)?;
    Ok(report::break_even(&input, &result))
}

// =============================================================================
// Income statement
// =============================================================================

#[derive(Debug, Clone, Default, Args)]
pub struct IncomeStatementArgs {
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub cash_sales: Decimal,
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub credit_sales: Decimal,
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub beginning_inventory: Decimal,
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub purchases: Decimal,
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub ending_inventory: Decimal,
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub salaries: Decimal,
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub electricity: Decimal,
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub advertising: Decimal,
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub other_expenses: Decimal,
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub depreciation: Decimal,
    /// Tax rate in percent.
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub tax_rate: Decimal,
}

impl From<&IncomeStatementArgs> for IncomeStatementInput {
    fn from(args: &IncomeStatementArgs) -> Self {
        IncomeStatementInput {
            cash_sales: args.cash_sales,
            credit_sales: args.credit_sales,
            beginning_inventory: args.beginning_inventory,
            purchases: args.purchases,
            ending_inventory: args.ending_inventory,
            salaries: args.salaries,
            electricity: args.electricity,
            advertising: args.advertising,
            other_expenses: args.other_expenses,
            depreciation: args.depreciation,
            tax_rate: args.tax_rate,
        }
    }
}

pub fn income_statement(args: &IncomeStatementArgs) -> String {
    let result = IncomeStatement::calculate(&args.into());
    report::income_statement(&result)
}

// =============================================================================
// Cash flow
// =============================================================================

#[derive(Debug, Clone, Default, Args)]
pub struct CashFlowArgs {
    /// CSV with twelve monthly rows. Without it every month is zero.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Cash at the start of month one [default: 10000]
    #[arg(long, value_parser = parse_decimal)]
    pub opening_cash: Option<Decimal>,
}

pub fn cash_flow(args: &CashFlowArgs) -> Result<String> {
    let opening = args.opening_cash.unwrap_or(DEFAULT_OPENING_CASH);
    let plan = match &args.file {
        Some(path) => {
            let months = csv_loader::cash_flow_from_file(path)
                .with_context(|| format!("Failed to load cash flow: {}", path.display()))?;
            CashFlowPlan::with_months(opening, months)?
        }
        None => CashFlowPlan::new(opening),
    };
    let statement = plan.roll_forward();
    info!(closing = %statement.closing_cash, "cash flow rolled forward");
    Ok(report::cash_flow(&statement))
}

// =============================================================================
// Sales plan
// =============================================================================

#[derive(Debug, Clone, Default, Args)]
pub struct SalesPlanArgs {
    /// CSV with nine monthly rows. Without it every month is zero.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Tax rate in percent [default: 20]
    #[arg(long, value_parser = parse_decimal)]
    pub tax_rate: Option<Decimal>,

    /// Copy month one's value of this line into every month. Repeatable.
    /// One of: cash_sales, cost_of_sales, general_expenses, loan_interest,
    /// pre_operating_costs, depreciation.
    #[arg(long = "fill", value_name = "LINE")]
    pub fill: Vec<SalesPlanLine>,
}

pub fn sales_plan(args: &SalesPlanArgs) -> Result<String> {
    let rate = args.tax_rate.unwrap_or(DEFAULT_SALES_TAX_RATE);
    let mut plan = match &args.file {
        Some(path) => {
            let months = csv_loader::sales_plan_from_file(path)
                .with_context(|| format!("Failed to load sales plan: {}", path.display()))?;
            SalesPlan::with_months(rate, months)?
        }
        None => SalesPlan::new(rate),
    };
    for line in &args.fill {
        plan.fill_row(*line);
    }
    Ok(report::sales_plan(&plan.project()))
}

// =============================================================================
// Depreciation
// =============================================================================

#[derive(Debug, Clone, Default, Args)]
pub struct DepreciationArgs {
    /// CSV asset list (`name,price,rate`). Without it the course example is used.
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

pub fn depreciation(args: &DepreciationArgs) -> Result<String> {
    let table = match &args.file {
        Some(path) => {
            let assets = csv_loader::assets_from_file(path)
                .with_context(|| format!("Failed to load assets: {}", path.display()))?;
            DepreciationTable::from_inputs(assets)
        }
        None => DepreciationTable::seeded(),
    };
    Ok(report::depreciation(&table.schedule()))
}

// =============================================================================
// Ledger
// =============================================================================

#[derive(Debug, Clone, Default, Args)]
pub struct LedgerArgs {
    /// CSV of entries (`date,description,debit,credit`) to post in order.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Start from this opening balance instead of the course example.
    #[arg(long, value_parser = parse_decimal)]
    pub opening_balance: Option<Decimal>,
}

pub fn ledger(args: &LedgerArgs) -> Result<String> {
    let mut ledger = match args.opening_balance {
        Some(balance) => CashLedger::with_opening_balance("", balance),
        None => CashLedger::seeded(),
    };
    if let Some(path) = &args.file {
        let entries = csv_loader::ledger_from_file(path)
            .with_context(|| format!("Failed to load ledger entries: {}", path.display()))?;
        for (idx, entry) in entries.into_iter().enumerate() {
            ledger
                .post(entry)
                .with_context(|| format!("Row {} was rejected", idx + 1))?;
        }
    }
    info!(balance = %ledger.current_balance(), "ledger posted");
    Ok(report::ledger(ledger.rows()))
}

/// Splits `A:B:C` from the right so the first field may itself contain `:`.
fn split_triple(s: &str) -> Result<(&str, &str, &str), String> {
    let mut parts = s.rsplitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(c), Some(b), Some(a)) => Ok((a.trim(), b.trim(), c.trim())),
        _ => Err(format!("'{s}' must have three ':'-separated fields")),
    }
}

fn whole_number<T: std::str::FromStr>(
    field: &str,
    name: &str,
) -> Result<T, String> {
    field
        .parse()
        .map_err(|_| format!("{name} '{field}' is not a whole number"))
}

// =============================================================================
// Risk matrix
// =============================================================================

fn parse_risk(s: &str) -> Result<NewRisk, String> {
    let (name, probability, impact) = split_triple(s)?;
    Ok(NewRisk {
        name: name.to_string(),
        probability: whole_number(probability, "probability")?,
        impact: whole_number(impact, "impact")?,
    })
}

#[derive(Debug, Clone, Default, Args)]
pub struct RiskMatrixArgs {
    /// CSV risk list (`name,probability,impact`). Without it the course example is used.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Add a risk as NAME:PROBABILITY:IMPACT, each rating 1-5. Repeatable.
    #[arg(long = "add", value_name = "RISK", value_parser = parse_risk)]
    pub add: Vec<NewRisk>,

    /// Remove the risk with this id. Repeatable.
    #[arg(long = "remove", value_name = "ID")]
    pub remove: Vec<u64>,
}

pub fn risk_matrix(args: &RiskMatrixArgs) -> Result<String> {
    let mut matrix = match &args.file {
        Some(path) => {
            let risks = csv_loader::risks_from_file(path)
                .with_context(|| format!("Failed to load risks: {}", path.display()))?;
            RiskMatrix::from_inputs(risks)?
        }
        None => RiskMatrix::seeded(),
    };
    for id in &args.remove {
        matrix.remove(RiskId(*id))?;
    }
    for risk in &args.add {
        matrix.add(risk.clone())?;
    }
    Ok(report::risk_matrix(&matrix))
}

// =============================================================================
// Site selection
// =============================================================================

#[derive(Debug, Clone, Default, Args)]
pub struct SiteSelectionArgs {
    /// CSV criteria (`criterion,weight,site_a,site_b`). Without it the five
    /// lesson criteria are used.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Scores 0-5 for site A, one per criterion in order, e.g. `4,3,5,2,1`.
    #[arg(long, value_delimiter = ',')]
    pub site_a: Vec<u8>,

    /// Scores 0-5 for site B, one per criterion in order.
    #[arg(long, value_delimiter = ',')]
    pub site_b: Vec<u8>,
}

pub fn site_selection(args: &SiteSelectionArgs) -> Result<String> {
    let mut matrix = match &args.file {
        Some(path) => {
            let criteria = csv_loader::criteria_from_file(path)
                .with_context(|| format!("Failed to load criteria: {}", path.display()))?;
            SiteMatrix::with_criteria(criteria)?
        }
        None => SiteMatrix::seeded(),
    };
    matrix.score_site(Site::A, &args.site_a)?;
    matrix.score_site(Site::B, &args.site_b)?;
    let comparison = matrix.compare();
    info!(
        total_a = comparison.total_a,
        total_b = comparison.total_b,
        "sites compared"
    );
    Ok(report::site_selection(&matrix))
}

// =============================================================================
// Timeline
// =============================================================================

/// A `--set ID:START:DURATION` edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskEdit {
    pub id: u32,
    pub start_month: u8,
    pub duration: u8,
}

fn parse_task_edit(s: &str) -> Result<TaskEdit, String> {
    let (id, start, duration) = split_triple(s)?;
    Ok(TaskEdit {
        id: whole_number(id, "task id")?,
        start_month: whole_number(start, "start month")?,
        duration: whole_number(duration, "duration")?,
    })
}

#[derive(Debug, Clone, Default, Args)]
pub struct TimelineArgs {
    /// CSV tasks (`task,start_month,duration`). Without it the eleven
    /// factory set-up steps are used.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Number of months to chart [default: 10]
    #[arg(long)]
    pub months: Option<u8>,

    /// Reschedule a task as ID:START:DURATION. Repeatable.
    #[arg(long = "set", value_name = "EDIT", value_parser = parse_task_edit)]
    pub set: Vec<TaskEdit>,
}

pub fn timeline(args: &TimelineArgs) -> Result<String> {
    let mut plan = match &args.file {
        Some(path) => {
            let tasks = csv_loader::tasks_from_file(path)
                .with_context(|| format!("Failed to load tasks: {}", path.display()))?;
            Timeline::with_tasks(tasks)?
        }
        None => Timeline::seeded(),
    };
    if let Some(months) = args.months {
        plan.set_span(months)?;
    }
    for edit in &args.set {
        plan.set_start(edit.id, edit.start_month)?;
        plan.set_duration(edit.id, edit.duration)?;
    }
    info!(finish = plan.finish_month(), "timeline charted");
    Ok(report::timeline(&plan))
}

// =============================================================================
// Staffing
// =============================================================================

fn parse_role(s: &str) -> Result<RoleInput, String> {
    let (title, count, salary) = split_triple(s)?;
    Ok(RoleInput {
        title: title.to_string(),
        count: whole_number(count, "count")?,
        salary: parse_decimal(salary).map_err(|e| e.to_string())?,
    })
}

#[derive(Debug, Clone, Default, Args)]
pub struct StaffingArgs {
    /// CSV roles (`title,count,salary`). Without it the two starting roles are used.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Add a role as TITLE:COUNT:SALARY. Repeatable.
    #[arg(long = "add", value_name = "ROLE", value_parser = parse_role)]
    pub add: Vec<RoleInput>,
}

pub fn staffing(args: &StaffingArgs) -> Result<String> {
    let mut table = match &args.file {
        Some(path) => {
            let roles = csv_loader::roles_from_file(path)
                .with_context(|| format!("Failed to load roles: {}", path.display()))?;
            StaffingTable::from_inputs(roles)?
        }
        None => StaffingTable::seeded(),
    };
    for role in &args.add {
        table.add(role.clone())?;
    }
    let payroll = table.payroll();
    info!(monthly = %payroll.monthly_total, "payroll totalled");
    Ok(report::staffing(&payroll))
}
