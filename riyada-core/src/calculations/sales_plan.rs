//! Nine-month sales and profit projection.
//!
//! Each month is projected independently with one tax rate shared by the
//! whole table:
//!
//! | Line | Formula |
//! |------|---------|
//! | Gross profit | Cash sales - Cost of sales |
//! | Total costs | General expenses + Loan interest + Pre-operating costs + Depreciation |
//! | Net profit | Gross profit - Total costs |
//! | Tax | Net profit × rate (zero on a loss) |
//! | Net profit after tax | Net profit - Tax |

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::{sum, tax_on_profit};

pub const SALES_PLAN_MONTHS: usize = 9;

/// Default tax rate for a fresh plan, in whole percent.
pub const DEFAULT_SALES_TAX_RATE: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SalesPlanError {
    #[error("month index {index} is out of range (plan has 9 months)")]
    MonthOutOfRange { index: usize },

    #[error("expected 9 months of data, got {0}")]
    WrongMonthCount(usize),

    #[error("unknown sales plan line '{0}'")]
    UnknownLine(String),
}

/// Input lines of the projection table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesPlanLine {
    CashSales,
    CostOfSales,
    GeneralExpenses,
    LoanInterest,
    PreOperatingCosts,
    Depreciation,
}

impl SalesPlanLine {
    pub fn all() -> &'static [SalesPlanLine] {
        &[
            SalesPlanLine::CashSales,
            SalesPlanLine::CostOfSales,
            SalesPlanLine::GeneralExpenses,
            SalesPlanLine::LoanInterest,
            SalesPlanLine::PreOperatingCosts,
            SalesPlanLine::Depreciation,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CashSales => "cash_sales",
            Self::CostOfSales => "cost_of_sales",
            Self::GeneralExpenses => "general_expenses",
            Self::LoanInterest => "loan_interest",
            Self::PreOperatingCosts => "pre_operating_costs",
            Self::Depreciation => "depreciation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CashSales => "Cash sales",
            Self::CostOfSales => "Cost of sales",
            Self::GeneralExpenses => "General expenses",
            Self::LoanInterest => "Loan interest",
            Self::PreOperatingCosts => "Pre-operating costs",
            Self::Depreciation => "Depreciation",
        }
    }
}

impl fmt::Display for SalesPlanLine {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SalesPlanLine {
    type Err = SalesPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|line| line.as_str() == s)
            .ok_or_else(|| SalesPlanError::UnknownLine(s.to_string()))
    }
}

/// Inputs for one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesPlanMonth {
    pub cash_sales: Decimal,
    pub cost_of_sales: Decimal,
    pub general_expenses: Decimal,
    pub loan_interest: Decimal,
    pub pre_operating_costs: Decimal,
    pub depreciation: Decimal,
}

impl SalesPlanMonth {
    pub fn get(
        &self,
        line: SalesPlanLine,
    ) -> Decimal {
        match line {
            SalesPlanLine::CashSales => self.cash_sales,
            SalesPlanLine::CostOfSales => self.cost_of_sales,
            SalesPlanLine::GeneralExpenses => self.general_expenses,
            SalesPlanLine::LoanInterest => self.loan_interest,
            SalesPlanLine::PreOperatingCosts => self.pre_operating_costs,
            SalesPlanLine::Depreciation => self.depreciation,
        }
    }

    pub fn set(
        &mut self,
        line: SalesPlanLine,
        value: Decimal,
    ) {
        let slot = match line {
            SalesPlanLine::CashSales => &mut self.cash_sales,
            SalesPlanLine::CostOfSales => &mut self.cost_of_sales,
            SalesPlanLine::GeneralExpenses => &mut self.general_expenses,
            SalesPlanLine::LoanInterest => &mut self.loan_interest,
            SalesPlanLine::PreOperatingCosts => &mut self.pre_operating_costs,
            SalesPlanLine::Depreciation => &mut self.depreciation,
        };
        *slot = value;
    }
}

/// Derived figures for one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesPlanResult {
    pub gross_profit: Decimal,
    pub total_costs: Decimal,
    pub net_profit: Decimal,
    pub tax: Decimal,
    pub net_profit_after_tax: Decimal,
}

/// Projects a single month at the given tax rate.
pub fn project_month(
    month: &SalesPlanMonth,
    tax_rate: Decimal,
) -> SalesPlanResult {
    let gross_profit = month.cash_sales - month.cost_of_sales;
    let total_costs = sum([
        month.general_expenses,
        month.loan_interest,
        month.pre_operating_costs,
        month.depreciation,
    ]);
    let net_profit = gross_profit - total_costs;
    let tax = tax_on_profit(net_profit, tax_rate);
    SalesPlanResult {
        gross_profit,
        total_costs,
        net_profit,
        tax,
        net_profit_after_tax: net_profit - tax,
    }
}

/// Month-by-month results plus column totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesProjection {
    pub months: Vec<SalesPlanResult>,
    pub totals: SalesPlanResult,
}

/// Editable input state for the projection table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesPlan {
    tax_rate: Decimal,
    months: [SalesPlanMonth; SALES_PLAN_MONTHS],
}

impl Default for SalesPlan {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_SALES_TAX_RATE,
            months: [SalesPlanMonth::default(); SALES_PLAN_MONTHS],
        }
    }
}

impl SalesPlan {
    pub fn new(tax_rate: Decimal) -> Self {
        Self {
            tax_rate,
            ..Self::default()
        }
    }

    pub fn with_months(
        tax_rate: Decimal,
        months: Vec<SalesPlanMonth>,
    ) -> Result<Self, SalesPlanError> {
        let months: [SalesPlanMonth; SALES_PLAN_MONTHS] = months
            .try_into()
            .map_err(|rejected: Vec<SalesPlanMonth>| SalesPlanError::WrongMonthCount(rejected.len()))?;
        Ok(Self { tax_rate, months })
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    pub fn set_tax_rate(
        &mut self,
        rate: Decimal,
    ) {
        self.tax_rate = rate;
    }

    pub fn months(&self) -> &[SalesPlanMonth; SALES_PLAN_MONTHS] {
        &self.months
    }

    /// Writes a single cell.
    pub fn set_cell(
        &mut self,
        index: usize,
        line: SalesPlanLine,
        value: Decimal,
    ) -> Result<(), SalesPlanError> {
        self.months
            .get_mut(index)
            .ok_or(SalesPlanError::MonthOutOfRange { index })?
            .set(line, value);
        Ok(())
    }

    /// Copies month one's value for `line` into every other month.
    ///
    /// Other lines are left as they are.
    pub fn fill_row(
        &mut self,
        line: SalesPlanLine,
    ) {
        let value = self.months[0].get(line);
        for month in self.months.iter_mut().skip(1) {
            month.set(line, value);
        }
    }

    /// Zeroes every month. The tax rate is kept.
    pub fn reset(&mut self) {
        self.months = [SalesPlanMonth::default(); SALES_PLAN_MONTHS];
    }

    pub fn project(&self) -> SalesProjection {
        let months: Vec<SalesPlanResult> = self
            .months
            .iter()
            .map(|m| project_month(m, self.tax_rate))
            .collect();
        let totals = SalesPlanResult {
            gross_profit: sum(months.iter().map(|m| m.gross_profit)),
            total_costs: sum(months.iter().map(|m| m.total_costs)),
            net_profit: sum(months.iter().map(|m| m.net_profit)),
            tax: sum(months.iter().map(|m| m.tax)),
            net_profit_after_tax: sum(months.iter().map(|m| m.net_profit_after_tax)),
        };
        SalesProjection { months, totals }
    }
}
