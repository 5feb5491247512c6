//! CSV loaders for the worksheet tables.
//!
//! Headers are matched by name, so column order does not matter. Every
//! amount column may be left out or left empty; both read as 0. A cell that
//! is present but not a number rejects the whole file.
//!
//! | Table | Rows | Columns |
//! |-------|------|---------|
//! | cash flow | exactly 12 | `sales`, `loans`, `other_inflows`, `direct_materials`, `capital_investment`, `labor`, `general_expenses`, `capital_cost` |
//! | sales plan | exactly 9 | `cash_sales`, `cost_of_sales`, `general_expenses`, `loan_interest`, `pre_operating_costs`, `depreciation` |
//! | assets | any | `name`, `price`, `rate` |
//! | ledger | any | `date`, `description`, `debit`, `credit` |
//! | risks | any | `name`, `probability`, `impact` |
//! | site criteria | any | `criterion`, `weight`, `site_a`, `site_b` |
//! | timeline | any | `task`, `start_month`, `duration` |
//! | staffing | any | `title`, `count`, `salary` |
//!
//! An optional `month` column is accepted and ignored by the period tables.
//! Ratings, months and headcounts are whole numbers and must be filled in;
//! their ranges are checked when the table is built.
//!
//! ### Ledger example
//!
//! ```csv
//! date,description,debit,credit
//! 2024-02-01,Cash sale,1200,
//! 2024-02-03,Rent,,800
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};

use riyada_core::calculations::{
    AssetInput, CASH_FLOW_MONTHS, CashFlowMonth, Criterion, EntrySide, NewLedgerEntry, NewRisk,
    NewTask, RoleInput, SALES_PLAN_MONTHS, SalesPlanMonth,
};

use crate::utils::parse_decimal;

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bad structure, unknown column type, or a cell that is not a number.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A period table has the wrong number of rows.
    #[error("expected {expected} rows, found {found}")]
    WrongRowCount { expected: usize, found: usize },

    /// A ledger row must carry exactly one of debit or credit.
    #[error("row {row}: {reason}")]
    InvalidEntry { row: usize, reason: &'static str },
}

// ---------------------------------------------------------------------------
// Serde-compatible rows that mirror the CSV layouts
// ---------------------------------------------------------------------------

/// Reads an amount cell with the same rules as a form field.
fn amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_decimal(&raw).map_err(de::Error::custom)
}

/// Like [`amount`], but an empty cell is `None`.
fn optional_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_decimal(&raw).map(Some).map_err(de::Error::custom)
}

#[derive(Debug, Deserialize)]
struct CashFlowRow {
    #[serde(default, deserialize_with = "amount")]
    sales: Decimal,
    #[serde(default, deserialize_with = "amount")]
    loans: Decimal,
    #[serde(default, deserialize_with = "amount")]
    other_inflows: Decimal,
    #[serde(default, deserialize_with = "amount")]
    direct_materials: Decimal,
    #[serde(default, deserialize_with = "amount")]
    capital_investment: Decimal,
    #[serde(default, deserialize_with = "amount")]
    labor: Decimal,
    #[serde(default, deserialize_with = "amount")]
    general_expenses: Decimal,
    #[serde(default, deserialize_with = "amount")]
    capital_cost: Decimal,
}

impl From<CashFlowRow> for CashFlowMonth {
    fn from(row: CashFlowRow) -> Self {
        CashFlowMonth {
            sales: row.sales,
            loans: row.loans,
            other_inflows: row.other_inflows,
            direct_materials: row.direct_materials,
            capital_investment: row.capital_investment,
            labor: row.labor,
            general_expenses: row.general_expenses,
            capital_cost: row.capital_cost,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SalesPlanRow {
    #[serde(default, deserialize_with = "amount")]
    cash_sales: Decimal,
    #[serde(default, deserialize_with = "amount")]
    cost_of_sales: Decimal,
    #[serde(default, deserialize_with = "amount")]
    general_expenses: Decimal,
    #[serde(default, deserialize_with = "amount")]
    loan_interest: Decimal,
    #[serde(default, deserialize_with = "amount")]
    pre_operating_costs: Decimal,
    #[serde(default, deserialize_with = "amount")]
    depreciation: Decimal,
}

impl From<SalesPlanRow> for SalesPlanMonth {
    fn from(row: SalesPlanRow) -> Self {
        SalesPlanMonth {
            cash_sales: row.cash_sales,
            cost_of_sales: row.cost_of_sales,
            general_expenses: row.general_expenses,
            loan_interest: row.loan_interest,
            pre_operating_costs: row.pre_operating_costs,
            depreciation: row.depreciation,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AssetCsvRow {
    name: String,
    #[serde(default, deserialize_with = "amount")]
    price: Decimal,
    #[serde(default, deserialize_with = "amount")]
    rate: Decimal,
}

#[derive(Debug, Deserialize)]
struct LedgerCsvRow {
    #[serde(default)]
    date: String,
    description: String,
    #[serde(default, deserialize_with = "optional_amount")]
    debit: Option<Decimal>,
    #[serde(default, deserialize_with = "optional_amount")]
    credit: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct RiskCsvRow {
    name: String,
    probability: u8,
    impact: u8,
}

impl From<RiskCsvRow> for NewRisk {
    fn from(row: RiskCsvRow) -> Self {
        NewRisk {
            name: row.name,
            probability: row.probability,
            impact: row.impact,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CriterionCsvRow {
    criterion: String,
    weight: u8,
    #[serde(default)]
    site_a: u8,
    #[serde(default)]
    site_b: u8,
}

impl From<CriterionCsvRow> for Criterion {
    fn from(row: CriterionCsvRow) -> Self {
        Criterion {
            name: row.criterion,
            weight: row.weight,
            score_a: row.site_a,
            score_b: row.site_b,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TaskCsvRow {
    task: String,
    start_month: u8,
    duration: u8,
}

impl From<TaskCsvRow> for NewTask {
    fn from(row: TaskCsvRow) -> Self {
        NewTask {
            name: row.task,
            start_month: row.start_month,
            duration: row.duration,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RoleCsvRow {
    title: String,
    count: u32,
    #[serde(default, deserialize_with = "amount")]
    salary: Decimal,
}

impl From<RoleCsvRow> for RoleInput {
    fn from(row: RoleCsvRow) -> Self {
        RoleInput {
            title: row.title,
            count: row.count,
            salary: row.salary,
        }
    }
}

/// row_number is 1-based (for error messages).
fn convert_ledger_row(
    row: LedgerCsvRow,
    row_number: usize,
) -> Result<NewLedgerEntry, CsvLoadError> {
    let (amount, side) = match (row.debit, row.credit) {
        (Some(debit), None) => (debit, EntrySide::Debit),
        (None, Some(credit)) => (credit, EntrySide::Credit),
        (Some(_), Some(_)) => {
            return Err(CsvLoadError::InvalidEntry {
                row: row_number,
                reason: "fill in either debit or credit, not both",
            });
        }
        (None, None) => {
            return Err(CsvLoadError::InvalidEntry {
                row: row_number,
                reason: "missing debit or credit amount",
            });
        }
    };
    Ok(NewLedgerEntry {
        date: row.date,
        description: row.description,
        amount,
        side,
    })
}

// ---------------------------------------------------------------------------
// Core loaders
// ---------------------------------------------------------------------------

fn read_rows<T: DeserializeOwned>(input: &str) -> Result<Vec<T>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<T>()
        .map(|result| result.map_err(CsvLoadError::from))
        .collect()
}

fn exact_rows<T, R>(
    input: &str,
    expected: usize,
) -> Result<Vec<T>, CsvLoadError>
where
    R: DeserializeOwned + Into<T>,
{
    let rows: Vec<R> = read_rows(input)?;
    if rows.len() != expected {
        return Err(CsvLoadError::WrongRowCount {
            expected,
            found: rows.len(),
        });
    }
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Parses the twelve months of a cash-flow table.
pub fn cash_flow_from_str(input: &str) -> Result<Vec<CashFlowMonth>, CsvLoadError> {
    exact_rows::<CashFlowMonth, CashFlowRow>(input, CASH_FLOW_MONTHS)
}

/// Parses the nine months of a sales plan.
pub fn sales_plan_from_str(input: &str) -> Result<Vec<SalesPlanMonth>, CsvLoadError> {
    exact_rows::<SalesPlanMonth, SalesPlanRow>(input, SALES_PLAN_MONTHS)
}

/// Parses an asset list for the depreciation table.
pub fn assets_from_str(input: &str) -> Result<Vec<AssetInput>, CsvLoadError> {
    let rows: Vec<AssetCsvRow> = read_rows(input)?;
    Ok(rows
        .into_iter()
        .map(|r| AssetInput {
            name: r.name,
            price: r.price,
            rate: r.rate,
        })
        .collect())
}

/// Parses ledger entries in file order.
pub fn ledger_from_str(input: &str) -> Result<Vec<NewLedgerEntry>, CsvLoadError> {
    let rows: Vec<LedgerCsvRow> = read_rows(input)?;
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| convert_ledger_row(row, idx + 1))
        .collect()
}

fn converted_rows<T, R>(input: &str) -> Result<Vec<T>, CsvLoadError>
where
    R: DeserializeOwned + Into<T>,
{
    let rows: Vec<R> = read_rows(input)?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub fn risks_from_str(input: &str) -> Result<Vec<NewRisk>, CsvLoadError> {
    converted_rows::<NewRisk, RiskCsvRow>(input)
}

pub fn criteria_from_str(input: &str) -> Result<Vec<Criterion>, CsvLoadError> {
    converted_rows::<Criterion, CriterionCsvRow>(input)
}

pub fn tasks_from_str(input: &str) -> Result<Vec<NewTask>, CsvLoadError> {
    converted_rows::<NewTask, TaskCsvRow>(input)
}

pub fn roles_from_str(input: &str) -> Result<Vec<RoleInput>, CsvLoadError> {
    converted_rows::<RoleInput, RoleCsvRow>(input)
}

fn read_file(path: &Path) -> Result<String, CsvLoadError> {
    std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn cash_flow_from_file(path: &Path) -> Result<Vec<CashFlowMonth>, CsvLoadError> {
    cash_flow_from_str(&read_file(path)?)
}

pub fn sales_plan_from_file(path: &Path) -> Result<Vec<SalesPlanMonth>, CsvLoadError> {
    sales_plan_from_str(&read_file(path)?)
}

pub fn assets_from_file(path: &Path) -> Result<Vec<AssetInput>, CsvLoadError> {
    assets_from_str(&read_file(path)?)
}

pub fn ledger_from_file(path: &Path) -> Result<Vec<NewLedgerEntry>, CsvLoadError> {
    ledger_from_str(&read_file(path)?)
}

pub fn risks_from_file(path: &Path) -> Result<Vec<NewRisk>, CsvLoadError> {
    risks_from_str(&read_file(path)?)
}

pub fn criteria_from_file(path: &Path) -> Result<Vec<Criterion>, CsvLoadError> {
    criteria_from_str(&read_file(path)?)
}

pub fn tasks_from_file(path: &Path) -> Result<Vec<NewTask>, CsvLoadError> {
    tasks_from_str(&read_file(path)?)
}

pub fn roles_from_file(path: &Path) -> Result<Vec<RoleInput>, CsvLoadError> {
    roles_from_str(&read_file(path)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
