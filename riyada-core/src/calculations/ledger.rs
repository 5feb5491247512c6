//! Cash ledger with a running balance.
//!
//! Debits are cash coming in, credits are cash going out. Each row stores
//! the balance after it is posted, so
//! `balance[i] = balance[i - 1] + debit[i] - credit[i]`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("entry description must not be empty")]
    EmptyDescription,

    #[error("entry amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
}

/// Which side of the ledger an entry is posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    /// Cash in (+).
    Debit,
    /// Cash out (-).
    Credit,
}

/// A posted ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub id: u64,
    pub date: String,
    pub description: String,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
    pub balance: Decimal,
}

/// A new entry waiting to be posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLedgerEntry {
    pub date: String,
    pub description: String,
    pub amount: Decimal,
    pub side: EntrySide,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashLedger {
    rows: Vec<LedgerRow>,
    next_id: u64,
}

impl CashLedger {
    /// Starts a ledger whose first row is the opening balance.
    pub fn with_opening_balance(
        date: impl Into<String>,
        balance: Decimal,
    ) -> Self {
        Self {
            rows: vec![LedgerRow {
                id: 1,
                date: date.into(),
                description: "Opening balance".to_string(),
                debit: None,
                credit: None,
                balance,
            }],
            next_id: 2,
        }
    }

    /// The worked example from the course: a loan, a land payment and two
    /// equipment purchases against an opening balance of 3500.
    pub fn seeded() -> Self {
        let mut ledger = Self::with_opening_balance("23/1", Decimal::from(3_500));
        let entries = [
            ("23/1", "Cash loan received", 20_500, EntrySide::Debit),
            ("24/1", "Land payment", 8_000, EntrySide::Credit),
            ("24/1", "Equipment purchase", 2_875, EntrySide::Credit),
            ("24/1", "Hardware and fixings", 895, EntrySide::Credit),
        ];
        for (date, description, amount, side) in entries {
            let row = ledger.post_row(
                date.to_string(),
                description.to_string(),
                Decimal::from(amount),
                side,
            );
            ledger.rows.push(row);
        }
        ledger
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    /// Balance after the last posted row, or zero for an empty ledger.
    pub fn current_balance(&self) -> Decimal {
        self.rows.last().map_or(Decimal::ZERO, |r| r.balance)
    }

    /// Validates and posts an entry, returning the new row.
    pub fn post(
        &mut self,
        entry: NewLedgerEntry,
    ) -> Result<&LedgerRow, LedgerError> {
        let description = entry.description.trim();
        if description.is_empty() {
            warn!("rejected ledger entry without description");
            return Err(LedgerError::EmptyDescription);
        }
        if entry.amount <= Decimal::ZERO {
            warn!(amount = %entry.amount, "rejected non-positive ledger amount");
            return Err(LedgerError::NonPositiveAmount(entry.amount));
        }

        let row = self.post_row(entry.date, description.to_string(), entry.amount, entry.side);
        debug!(id = row.id, balance = %row.balance, "ledger entry posted");
        self.rows.push(row);
        Ok(&self.rows[self.rows.len() - 1])
    }

    /// Restores the worked example.
    pub fn reset(&mut self) {
        *self = Self::seeded();
    }

    fn post_row(
        &mut self,
        date: String,
        description: String,
        amount: Decimal,
        side: EntrySide,
    ) -> LedgerRow {
        let previous = self.current_balance();
        let (debit, credit, balance) = match side {
            EntrySide::Debit => (Some(amount), None, previous + amount),
            EntrySide::Credit => (None, Some(amount), previous - amount),
        };
        let id = self.next_id;
        self.next_id += 1;
        LedgerRow {
            id,
            date,
            description,
            debit,
            credit,
            balance,
        }
    }
}

impl Default for CashLedger {
    fn default() -> Self {
        Self::seeded()
    }
}
