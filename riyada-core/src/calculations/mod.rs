//! Closed-form financial calculators.
//!
//! Every calculator follows the same shape: an input record that the caller
//! edits freely, and a pure function that derives all outputs from the
//! current inputs. Nothing is cached between calls.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`break_even`] | Units and revenue needed to cover fixed costs |
//! | [`depreciation`] | Straight-line depreciation of an editable asset list |
//! | [`cash_flow`] | Twelve-month cash roll-forward |
//! | [`income_statement`] | Single-period profit and tax |
//! | [`sales_plan`] | Nine-month sales and profit projection |
//! | [`ledger`] | Cash ledger with a running balance |
//! | [`risk_matrix`] | Probability × impact scoring of project risks |
//! | [`site_selection`] | Weighted comparison of two candidate sites |
//! | [`timeline`] | Month-by-month implementation schedule |
//! | [`staffing`] | Roles, headcount and monthly payroll |

pub mod break_even;
pub mod cash_flow;
pub mod common;
pub mod depreciation;
pub mod income_statement;
pub mod ledger;
pub mod risk_matrix;
pub mod sales_plan;
pub mod site_selection;
pub mod staffing;
pub mod timeline;

pub use break_even::{BreakEvenCalculator, BreakEvenError, BreakEvenInput, BreakEvenResult};
pub use cash_flow::{
    CASH_FLOW_MONTHS, CashFlowError, CashFlowMonth, CashFlowPeriod, CashFlowPlan,
    CashFlowStatement,
};
pub use depreciation::{
    AssetId, AssetInput, AssetRow, DepreciatedAsset, DepreciationError, DepreciationSchedule,
    DepreciationTable, DepreciationTotals,
};
pub use income_statement::{IncomeStatement, IncomeStatementInput, IncomeStatementResult};
pub use ledger::{CashLedger, EntrySide, LedgerError, LedgerRow, NewLedgerEntry};
pub use risk_matrix::{NewRisk, Risk, RiskError, RiskId, RiskLevel, RiskMatrix};
pub use sales_plan::{
    SALES_PLAN_MONTHS, SalesPlan, SalesPlanError, SalesPlanLine, SalesPlanMonth, SalesPlanResult,
    SalesProjection,
};
pub use site_selection::{Criterion, Site, SiteComparison, SiteMatrix, SiteSelectionError};
pub use staffing::{Payroll, Role, RoleCost, RoleId, RoleInput, StaffingError, StaffingTable};
pub use timeline::{GanttRow, NewTask, Timeline, TimelineError, TimelineTask};
