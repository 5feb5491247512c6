//! Single-period income statement.
//!
//! # Statement Structure
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | Cash sales |
//! | 2    | Credit sales |
//! | 3    | Total sales (Line 1 + Line 2) |
//! | 4    | Beginning inventory |
//! | 5    | Purchases during the period |
//! | 6    | Goods available for sale (Line 4 + Line 5) |
//! | 7    | Ending inventory |
//! | 8    | Cost of goods sold (Line 6 - Line 7) |
//! | 9    | Gross profit (Line 3 - Line 8) |
//! | 10   | General expenses (salaries, electricity, advertising, other) |
//! | 11   | Depreciation |
//! | 12   | Net profit before tax (Line 9 - Line 10 - Line 11) |
//! | 13   | Tax (Line 12 × rate, zero on a loss) |
//! | 14   | Net profit after tax (Line 12 - Line 13) |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use riyada_core::calculations::{IncomeStatement, IncomeStatementInput};
//!
//! let input = IncomeStatementInput {
//!     cash_sales: dec!(5000),
//!     credit_sales: dec!(2000),
//!     beginning_inventory: dec!(1000),
//!     purchases: dec!(3000),
//!     ending_inventory: dec!(1500),
//!     salaries: dec!(1200),
//!     electricity: dec!(300),
//!     advertising: dec!(400),
//!     other_expenses: dec!(100),
//!     depreciation: dec!(500),
//!     tax_rate: dec!(20),
//! };
//!
//! let result = IncomeStatement::calculate(&input);
//!
//! assert_eq!(result.cost_of_goods_sold, dec!(2500));
//! assert_eq!(result.net_profit, dec!(2000));
//! assert_eq!(result.net_profit_after_tax, dec!(1600));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{sum, tax_on_profit};

/// Input values for the income statement. All amounts default to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatementInput {
    pub cash_sales: Decimal,
    pub credit_sales: Decimal,

    pub beginning_inventory: Decimal,
    pub purchases: Decimal,
    pub ending_inventory: Decimal,

    pub salaries: Decimal,
    pub electricity: Decimal,
    pub advertising: Decimal,
    pub other_expenses: Decimal,

    pub depreciation: Decimal,

    /// Income tax rate in whole percent.
    pub tax_rate: Decimal,
}

/// Every derived line of the statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatementResult {
    pub total_sales: Decimal,
    pub goods_available: Decimal,
    pub cost_of_goods_sold: Decimal,
    pub gross_profit: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
    pub tax: Decimal,
    pub net_profit_after_tax: Decimal,
}

/// Stateless income statement calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncomeStatement;

impl IncomeStatement {
    /// Computes every line in statement order.
    pub fn calculate(input: &IncomeStatementInput) -> IncomeStatementResult {
        let total_sales = input.cash_sales + input.credit_sales;
        let goods_available = input.beginning_inventory + input.purchases;
        let cost_of_goods_sold = goods_available - input.ending_inventory;
        let gross_profit = total_sales - cost_of_goods_sold;

        let total_expenses = sum([
            input.salaries,
            input.electricity,
            input.advertising,
            input.other_expenses,
        ]);
        let net_profit = gross_profit - total_expenses - input.depreciation;

        let tax = tax_on_profit(net_profit, input.tax_rate);
        let net_profit_after_tax = net_profit - tax;

        debug!(%net_profit, %tax, "income statement computed");

        IncomeStatementResult {
            total_sales,
            goods_available,
            cost_of_goods_sold,
            gross_profit,
            total_expenses,
            net_profit,
            tax,
            net_profit_after_tax,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn course_example() -> IncomeStatementInput {
        IncomeStatementInput {
            cash_sales: dec!(5000),
            credit_sales: dec!(2000),
            beginning_inventory: dec!(1000),
            purchases: dec!(3000),
            ending_inventory: dec!(1500),
            salaries: dec!(1000),
            electricity: dec!(250),
            advertising: dec!(500),
            other_expenses: dec!(250),
            depreciation: dec!(500),
            tax_rate: dec!(20),
        }
    }

    #[test]
    fn calculate_course_example() {
        let result = IncomeStatement::calculate(&course_example());

        assert_eq!(
            result,
            IncomeStatementResult {
                total_sales: dec!(7000),
                goods_available: dec!(4000),
                cost_of_goods_sold: dec!(2500),
                gross_profit: dec!(4500),
                total_expenses: dec!(2000),
                net_profit: dec!(2000),
                tax: dec!(400),
                net_profit_after_tax: dec!(1600),
            }
        );
    }

    #[test]
    fn calculate_all_zero_inputs() {
        let result = IncomeStatement::calculate(&IncomeStatementInput::default());

        assert_eq!(result.net_profit, dec!(0));
        assert_eq!(result.tax, dec!(0));
        assert_eq!(result.net_profit_after_tax, dec!(0));
    }

    #[test]
    fn loss_carries_no_tax() {
        let input = IncomeStatementInput {
            salaries: dec!(5000),
            tax_rate: dec!(20),
            ..course_example()
        };

        let result = IncomeStatement::calculate(&input);

        assert_eq!(result.net_profit, dec!(-2000));
        assert_eq!(result.tax, dec!(0));
        assert_eq!(result.net_profit_after_tax, dec!(-2000));
    }

    #[test]
    fn after_tax_equals_profit_minus_positive_part_times_rate() {
        for net in [dec!(-750), dec!(0), dec!(1), dec!(12345.67)] {
            let input = IncomeStatementInput {
                cash_sales: net,
                tax_rate: dec!(15),
                ..IncomeStatementInput::default()
            };

            let result = IncomeStatement::calculate(&input);

            let taxable = if net > Decimal::ZERO { net } else { Decimal::ZERO };
            assert_eq!(
                result.net_profit_after_tax,
                net - taxable * dec!(15) / dec!(100)
            );
        }
    }

    #[test]
    fn cogs_uses_inventory_movement() {
        let input = IncomeStatementInput {
            beginning_inventory: dec!(800),
            purchases: dec!(1200),
            ending_inventory: dec!(2500),
            ..IncomeStatementInput::default()
        };

        let result = IncomeStatement::calculate(&input);

        // Ending stock larger than goods available gives a negative COGS.
        assert_eq!(result.cost_of_goods_sold, dec!(-500));
        assert_eq!(result.gross_profit, dec!(500));
    }

    #[test]
    fn recomputes_from_current_inputs() {
        let mut input = course_example();
        let first = IncomeStatement::calculate(&input);

        input.credit_sales = dec!(3000);
        let second = IncomeStatement::calculate(&input);

        assert_eq!(second.gross_profit, first.gross_profit + dec!(1000));
        assert_eq!(second.tax, dec!(600));
    }
}
