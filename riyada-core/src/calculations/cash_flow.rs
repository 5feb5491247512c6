//! Twelve-month cash-flow roll-forward.
//!
//! # Table Structure
//!
//! | Line | Description |
//! |------|-------------|
//! | Opening cash | Previous month's closing cash (user-supplied for month 1) |
//! | Sales | Cash received from sales |
//! | Loans | Loan proceeds |
//! | Other inflows | Anything else received |
//! | Total inflows | Sales + Loans + Other |
//! | Direct materials | Materials paid for |
//! | Capital investment | Equipment and other capital purchases |
//! | Labor | Wages paid |
//! | General expenses | Overheads |
//! | Capital cost | Financing costs |
//! | Total outflows | Sum of the five outflow lines |
//! | Surplus / deficit | Total inflows - Total outflows |
//! | Closing cash | Opening cash + Surplus |
//!
//! The closing cash of month `i` is the opening cash of month `i + 1`, so the
//! table is a strict left-to-right fold. Results are always derived from the
//! current inputs; editing one month changes every later month on the next
//! call to [`CashFlowPlan::roll_forward`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::sum;

/// Number of months in the plan.
pub const CASH_FLOW_MONTHS: usize = 12;

/// Opening balance used by a fresh plan.
pub const DEFAULT_OPENING_CASH: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CashFlowError {
    #[error("month index {index} is out of range (plan has 12 months)")]
    MonthOutOfRange { index: usize },

    #[error("expected 12 months of data, got {0}")]
    WrongMonthCount(usize),
}

/// Categorised cash movements for one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowMonth {
    // Inflows
    pub sales: Decimal,
    pub loans: Decimal,
    pub other_inflows: Decimal,

    // Outflows
    pub direct_materials: Decimal,
    pub capital_investment: Decimal,
    pub labor: Decimal,
    pub general_expenses: Decimal,
    pub capital_cost: Decimal,
}

impl CashFlowMonth {
    pub fn total_inflows(&self) -> Decimal {
        sum([self.sales, self.loans, self.other_inflows])
    }

    pub fn total_outflows(&self) -> Decimal {
        sum([
            self.direct_materials,
            self.capital_investment,
            self.labor,
            self.general_expenses,
            self.capital_cost,
        ])
    }
}

/// Derived figures for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowPeriod {
    pub opening_cash: Decimal,
    pub total_inflows: Decimal,
    pub total_outflows: Decimal,
    pub surplus: Decimal,
    pub closing_cash: Decimal,
}

/// The whole year, month by month, with annual totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    pub periods: Vec<CashFlowPeriod>,
    pub annual_inflows: Decimal,
    pub annual_outflows: Decimal,
    pub annual_surplus: Decimal,
    pub closing_cash: Decimal,
}

/// Editable input state for the cash-flow table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowPlan {
    opening_cash: Decimal,
    months: [CashFlowMonth; CASH_FLOW_MONTHS],
}

impl Default for CashFlowPlan {
    fn default() -> Self {
        Self {
            opening_cash: DEFAULT_OPENING_CASH,
            months: [CashFlowMonth::default(); CASH_FLOW_MONTHS],
        }
    }
}

impl CashFlowPlan {
    /// Creates a plan with the given opening balance and all months zeroed.
    pub fn new(opening_cash: Decimal) -> Self {
        Self {
            opening_cash,
            ..Self::default()
        }
    }

    /// Creates a plan from exactly twelve months of input.
    pub fn with_months(
        opening_cash: Decimal,
        months: Vec<CashFlowMonth>,
    ) -> Result<Self, CashFlowError> {
        let months: [CashFlowMonth; CASH_FLOW_MONTHS] = months
            .try_into()
            .map_err(|rejected: Vec<CashFlowMonth>| CashFlowError::WrongMonthCount(rejected.len()))?;
        Ok(Self {
            opening_cash,
            months,
        })
    }

    pub fn opening_cash(&self) -> Decimal {
        self.opening_cash
    }

    pub fn set_opening_cash(
        &mut self,
        value: Decimal,
    ) {
        self.opening_cash = value;
    }

    pub fn months(&self) -> &[CashFlowMonth; CASH_FLOW_MONTHS] {
        &self.months
    }

    pub fn month(
        &self,
        index: usize,
    ) -> Result<&CashFlowMonth, CashFlowError> {
        self.months
            .get(index)
            .ok_or(CashFlowError::MonthOutOfRange { index })
    }

    /// Replaces one month's inputs.
    pub fn set_month(
        &mut self,
        index: usize,
        month: CashFlowMonth,
    ) -> Result<(), CashFlowError> {
        let slot = self
            .months
            .get_mut(index)
            .ok_or(CashFlowError::MonthOutOfRange { index })?;
        *slot = month;
        Ok(())
    }

    /// Edits one month's inputs in place.
    pub fn update_month<F>(
        &mut self,
        index: usize,
        edit: F,
    ) -> Result<(), CashFlowError>
    where
        F: FnOnce(&mut CashFlowMonth),
    {
        let slot = self
            .months
            .get_mut(index)
            .ok_or(CashFlowError::MonthOutOfRange { index })?;
        edit(slot);
        Ok(())
    }

    /// Restores the default opening balance and zeroes every month.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Folds the months left to right, carrying each closing balance forward.
    pub fn roll_forward(&self) -> CashFlowStatement {
        debug!(opening = %self.opening_cash, "rolling cash flow forward");

        let mut opening = self.opening_cash;
        let periods: Vec<CashFlowPeriod> = self
            .months
            .iter()
            .map(|month| {
                let total_inflows = month.total_inflows();
                let total_outflows = month.total_outflows();
                let surplus = total_inflows - total_outflows;
                let closing = opening + surplus;
                let period = CashFlowPeriod {
                    opening_cash: opening,
                    total_inflows,
                    total_outflows,
                    surplus,
                    closing_cash: closing,
                };
                opening = closing;
                period
            })
            .collect();

        CashFlowStatement {
            annual_inflows: sum(periods.iter().map(|p| p.total_inflows)),
            annual_outflows: sum(periods.iter().map(|p| p.total_outflows)),
            annual_surplus: sum(periods.iter().map(|p| p.surplus)),
            closing_cash: opening,
            periods,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::MAX_AMOUNT;

    fn month(
        sales: Decimal,
        labor: Decimal,
    ) -> CashFlowMonth {
        CashFlowMonth {
            sales,
            labor,
            ..CashFlowMonth::default()
        }
    }

    // =========================================================================
    // month totals
    // =========================================================================

    #[test]
    fn month_totals_sum_each_category() {
        let m = CashFlowMonth {
            sales: dec!(5000),
            loans: dec!(2000),
            other_inflows: dec!(100),
            direct_materials: dec!(1500),
            capital_investment: dec!(800),
            labor: dec!(1200),
            general_expenses: dec!(300),
            capital_cost: dec!(50),
        };

        assert_eq!(m.total_inflows(), dec!(7100));
        assert_eq!(m.total_outflows(), dec!(3850));
    }

    // =========================================================================
    // roll_forward tests
    // =========================================================================

    #[test]
    fn default_plan_carries_opening_balance_unchanged() {
        let statement = CashFlowPlan::default().roll_forward();

        assert_eq!(statement.periods.len(), CASH_FLOW_MONTHS);
        assert_eq!(statement.periods[0].opening_cash, dec!(10000));
        assert!(statement.periods.iter().all(|p| p.closing_cash == dec!(10000)));
        assert_eq!(statement.closing_cash, dec!(10000));
    }

    #[test]
    fn first_opening_equals_configured_balance_exactly() {
        let statement = CashFlowPlan::new(dec!(1234.56)).roll_forward();

        assert_eq!(statement.periods[0].opening_cash, dec!(1234.56));
    }

    #[test]
    fn closing_balance_is_previous_closing_plus_surplus() {
        let mut plan = CashFlowPlan::new(dec!(500));
        for i in 0..CASH_FLOW_MONTHS {
            let sales = Decimal::from(i as u64 * 100);
            plan.set_month(i, month(sales, dec!(250))).unwrap();
        }

        let statement = plan.roll_forward();

        let mut previous = dec!(500);
        for period in &statement.periods {
            assert_eq!(period.opening_cash, previous);
            assert_eq!(
                period.closing_cash,
                previous + period.total_inflows - period.total_outflows
            );
            previous = period.closing_cash;
        }
        assert_eq!(statement.closing_cash, previous);
    }

    #[test]
    fn editing_a_month_propagates_to_later_months_only() {
        let mut plan = CashFlowPlan::new(dec!(1000));
        let before = plan.roll_forward();

        plan.update_month(4, |m| m.loans = dec!(3000)).unwrap();
        let after = plan.roll_forward();

        assert_eq!(before.periods[..4], after.periods[..4]);
        for i in 4..CASH_FLOW_MONTHS {
            assert_eq!(
                after.periods[i].closing_cash,
                before.periods[i].closing_cash + dec!(3000)
            );
        }
    }

    #[test]
    fn negative_balances_are_carried_forward() {
        let mut plan = CashFlowPlan::new(dec!(100));
        plan.set_month(0, month(dec!(0), dec!(400))).unwrap();

        let statement = plan.roll_forward();

        assert_eq!(statement.periods[0].surplus, dec!(-400));
        assert_eq!(statement.periods[0].closing_cash, dec!(-300));
        assert_eq!(statement.periods[1].opening_cash, dec!(-300));
    }

    #[test]
    fn annual_totals_sum_all_months() {
        let mut plan = CashFlowPlan::new(dec!(0));
        plan.set_month(0, month(dec!(1000), dec!(200))).unwrap();
        plan.set_month(11, month(dec!(500), dec!(700))).unwrap();

        let statement = plan.roll_forward();

        assert_eq!(statement.annual_inflows, dec!(1500));
        assert_eq!(statement.annual_outflows, dec!(900));
        assert_eq!(statement.annual_surplus, dec!(600));
        assert_eq!(statement.closing_cash, dec!(600));
    }

    // =========================================================================
    // editing tests
    // =========================================================================

    #[test]
    fn set_month_out_of_range_is_an_error() {
        let mut plan = CashFlowPlan::default();

        let result = plan.set_month(12, CashFlowMonth::default());

        assert_eq!(result, Err(CashFlowError::MonthOutOfRange { index: 12 }));
    }

    #[test]
    fn with_months_requires_twelve_months() {
        let result = CashFlowPlan::with_months(dec!(0), vec![CashFlowMonth::default(); 11]);

        assert_eq!(result, Err(CashFlowError::WrongMonthCount(11)));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut plan = CashFlowPlan::new(dec!(77));
        plan.set_month(3, month(dec!(10), dec!(0))).unwrap();

        plan.reset();

        assert_eq!(plan, CashFlowPlan::default());
        assert_eq!(plan.opening_cash(), dec!(10000));
    }

    #[test]
    fn changing_opening_cash_shifts_every_balance() {
        let mut plan = CashFlowPlan::new(dec!(0));
        plan.set_month(0, month(dec!(500), dec!(200))).unwrap();

        plan.set_opening_cash(dec!(1000));
        let statement = plan.roll_forward();

        assert_eq!(statement.periods[0].closing_cash, dec!(1300));
        assert_eq!(statement.closing_cash, dec!(1300));
    }

    #[test]
    fn largest_accepted_amounts_roll_forward() {
        let full = CashFlowMonth {
            sales: MAX_AMOUNT,
            loans: MAX_AMOUNT,
            other_inflows: MAX_AMOUNT,
            ..CashFlowMonth::default()
        };
        let plan = CashFlowPlan::with_months(MAX_AMOUNT, vec![full; CASH_FLOW_MONTHS]).unwrap();

        let statement = plan.roll_forward();

        assert_eq!(statement.annual_inflows, MAX_AMOUNT * dec!(36));
        assert_eq!(statement.closing_cash, MAX_AMOUNT * dec!(37));
    }
}
