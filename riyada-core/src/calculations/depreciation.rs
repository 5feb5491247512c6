//! Straight-line depreciation table.
//!
//! Each asset row carries a purchase price and an annual rate in whole
//! percent. The table derives the annual charge and the net book value after
//! one year for every row, and column totals across the whole table.
//!
//! Rows are addressed by a stable [`AssetId`]. Removing a row never
//! renumbers the others, and ids are never reused within a table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{percent_of, sum};

/// Stable identifier for a row in a [`DepreciationTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(pub u64);

/// Errors raised when editing the depreciation table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DepreciationError {
    #[error("no asset row with id {0:?}")]
    UnknownAsset(AssetId),
}

/// One fixed asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRow {
    pub id: AssetId,
    pub name: String,
    pub price: Decimal,
    /// Annual straight-line rate in whole percent.
    pub rate: Decimal,
}

/// Values to insert or write back into a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInput {
    pub name: String,
    pub price: Decimal,
    pub rate: Decimal,
}

impl Default for AssetInput {
    fn default() -> Self {
        Self {
            name: "New asset".to_string(),
            price: Decimal::ZERO,
            rate: Decimal::TEN,
        }
    }
}

/// Derived figures for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciatedAsset {
    pub id: AssetId,
    pub name: String,
    pub price: Decimal,
    pub rate: Decimal,
    pub annual_depreciation: Decimal,
    pub net_value: Decimal,
}

/// Column sums across all rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationTotals {
    pub price: Decimal,
    pub annual_depreciation: Decimal,
    pub net_value: Decimal,
}

/// Full schedule: per-row results followed by totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationSchedule {
    pub rows: Vec<DepreciatedAsset>,
    pub totals: DepreciationTotals,
}

/// Computes the annual charge and net value for a single row.
pub fn depreciate(row: &AssetRow) -> DepreciatedAsset {
    let annual_depreciation = percent_of(row.price, row.rate);
    DepreciatedAsset {
        id: row.id,
        name: row.name.clone(),
        price: row.price,
        rate: row.rate,
        annual_depreciation,
        net_value: row.price - annual_depreciation,
    }
}

/// Editable list of asset rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepreciationTable {
    rows: Vec<AssetRow>,
    next_id: u64,
}

impl DepreciationTable {
    /// Creates an empty table.
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }

    /// Creates a table with the course's worked example rows.
    pub fn seeded() -> Self {
        let mut table = Self::empty();
        for (name, price, rate) in [
            ("Vehicle", 27_500, 10),
            ("Warehouse equipment", 12_500, 20),
            ("Knives", 9_000, 20),
            ("Cooking pots", 15_000, 20),
            ("Furniture", 11_500, 20),
        ] {
            table.add(AssetInput {
                name: name.to_string(),
                price: Decimal::from(price),
                rate: Decimal::from(rate),
            });
        }
        table
    }

    /// Builds a table from pre-parsed inputs, allocating fresh ids in order.
    pub fn from_inputs<I>(inputs: I) -> Self
    where
        I: IntoIterator<Item = AssetInput>,
    {
        let mut table = Self::empty();
        for input in inputs {
            table.add(input);
        }
        table
    }

    pub fn rows(&self) -> &[AssetRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row and returns its id.
    pub fn add(
        &mut self,
        input: AssetInput,
    ) -> AssetId {
        let id = AssetId(self.next_id);
        self.next_id += 1;
        self.rows.push(AssetRow {
            id,
            name: input.name,
            price: input.price,
            rate: input.rate,
        });
        debug!(?id, "asset row added");
        id
    }

    /// Overwrites the values of an existing row.
    pub fn update(
        &mut self,
        id: AssetId,
        input: AssetInput,
    ) -> Result<(), DepreciationError> {
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DepreciationError::UnknownAsset(id))?;
        row.name = input.name;
        row.price = input.price;
        row.rate = input.rate;
        Ok(())
    }

    /// Removes a row, leaving every other row untouched.
    pub fn remove(
        &mut self,
        id: AssetId,
    ) -> Result<AssetRow, DepreciationError> {
        let index = self
            .rows
            .iter()
            .position(|r| r.id == id)
            .ok_or(DepreciationError::UnknownAsset(id))?;
        debug!(?id, "asset row removed");
        Ok(self.rows.remove(index))
    }

    /// Restores the seeded example rows.
    pub fn reset(&mut self) {
        *self = Self::seeded();
    }

    /// Derives the full schedule from the current rows.
    pub fn schedule(&self) -> DepreciationSchedule {
        let rows: Vec<DepreciatedAsset> = self.rows.iter().map(depreciate).collect();
        let totals = DepreciationTotals {
            price: sum(rows.iter().map(|r| r.price)),
            annual_depreciation: sum(rows.iter().map(|r| r.annual_depreciation)),
            net_value: sum(rows.iter().map(|r| r.net_value)),
        };
        DepreciationSchedule { rows, totals }
    }
}

impl Default for DepreciationTable {
    fn default() -> Self {
        Self::seeded()
    }
}
