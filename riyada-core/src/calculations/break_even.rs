//! Break-even analysis.
//!
//! The break-even point is the sales volume at which total revenue equals
//! total cost. Every unit sold past it contributes its full contribution
//! margin to profit.
//!
//! | Output | Formula |
//! |--------|---------|
//! | Contribution margin | `P - V` |
//! | Break-even units | `ceil(F / (P - V))` |
//! | Break-even revenue | `units × P` |
//! | Profit on the next unit | `P - V` |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use riyada_core::calculations::{BreakEvenCalculator, BreakEvenInput};
//!
//! let input = BreakEvenInput {
//!     fixed_costs: dec!(10000),
//!     unit_price: dec!(40),
//!     unit_variable_cost: dec!(15),
//! };
//!
//! let result = BreakEvenCalculator::calculate(&input).unwrap();
//!
//! assert_eq!(result.break_even_units, dec!(400));
//! assert_eq!(result.break_even_revenue, dec!(16000));
//! assert_eq!(result.next_unit_profit, dec!(25));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Validation failures that suppress the break-even figures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BreakEvenError {
    /// Price does not cover the variable cost of a unit, so no volume of
    /// sales ever recovers the fixed costs.
    #[error("unit price {price} must be greater than unit variable cost {variable_cost}")]
    NonPositiveMargin {
        price: Decimal,
        variable_cost: Decimal,
    },

    /// One of the inputs is negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeInput { field: &'static str, value: Decimal },

    /// The quotient does not fit in a decimal.
    #[error("break-even quantity is too large to represent")]
    Overflow,
}

/// Input values for the break-even calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakEvenInput {
    /// Fixed costs for the period (rent, salaries, licences).
    pub fixed_costs: Decimal,

    /// Selling price of one unit.
    pub unit_price: Decimal,

    /// Variable cost of producing one unit.
    pub unit_variable_cost: Decimal,
}

impl Default for BreakEvenInput {
    fn default() -> Self {
        Self {
            fixed_costs: Decimal::from(10_000),
            unit_price: Decimal::from(40),
            unit_variable_cost: Decimal::from(15),
        }
    }
}

/// Result of a successful break-even calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakEvenResult {
    /// Unit price minus unit variable cost.
    pub contribution_margin: Decimal,

    /// Whole units needed to cover fixed costs (rounded up).
    pub break_even_units: Decimal,

    /// Revenue at the break-even volume.
    pub break_even_revenue: Decimal,

    /// Profit earned on the first unit sold past break-even.
    pub next_unit_profit: Decimal,
}

/// Stateless break-even calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreakEvenCalculator;

impl BreakEvenCalculator {
    /// Computes the break-even point.
    ///
    /// # Errors
    ///
    /// Returns [`BreakEvenError`] if any input is negative, if the unit price
    /// does not exceed the variable cost, or if the quantity overflows.
    pub fn calculate(input: &BreakEvenInput) -> Result<BreakEvenResult, BreakEvenError> {
        Self::ensure_non_negative("fixed costs", input.fixed_costs)?;
        Self::ensure_non_negative("unit price", input.unit_price)?;
        Self::ensure_non_negative("unit variable cost", input.unit_variable_cost)?;

        let margin = Self::contribution_margin(input.unit_price, input.unit_variable_cost);
        if margin <= Decimal::ZERO {
            warn!(
                price = %input.unit_price,
                variable_cost = %input.unit_variable_cost,
                "break-even undefined for non-positive contribution margin"
            );
            return Err(BreakEvenError::NonPositiveMargin {
                price: input.unit_price,
                variable_cost: input.unit_variable_cost,
            });
        }

        let units = input
            .fixed_costs
            .checked_div(margin)
            .ok_or(BreakEvenError::Overflow)?
            .ceil();
        let revenue = units
            .checked_mul(input.unit_price)
            .ok_or(BreakEvenError::Overflow)?;

        debug!(%units, %revenue, "break-even computed");

        Ok(BreakEvenResult {
            contribution_margin: margin,
            break_even_units: units,
            break_even_revenue: revenue,
            next_unit_profit: margin,
        })
    }

    fn contribution_margin(
        price: Decimal,
        variable_cost: Decimal,
    ) -> Decimal {
        price - variable_cost
    }

    fn ensure_non_negative(
        field: &'static str,
        value: Decimal,
    ) -> Result<(), BreakEvenError> {
        if value < Decimal::ZERO {
            return Err(BreakEvenError::NegativeInput { field, value });
        }
        Ok(())
    }
}
