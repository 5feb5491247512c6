//! Staffing plan and monthly payroll.
//!
//! Each role lists a headcount and a monthly salary per person. The role
//! costs `count × salary` a month and the payroll is the sum over all roles.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::sum;

/// Stable identifier for a row in a [`StaffingTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleId(pub u64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StaffingError {
    #[error("no role with id {0:?}")]
    UnknownRole(RoleId),

    #[error("a role needs at least one person")]
    ZeroCount,

    #[error("salary must not be negative, got {0}")]
    NegativeSalary(Decimal),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInput {
    pub title: String,
    pub count: u32,
    pub salary: Decimal,
}

impl Default for RoleInput {
    fn default() -> Self {
        Self {
            title: "New job title".to_string(),
            count: 1,
            salary: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub title: String,
    pub count: u32,
    pub salary: Decimal,
}

impl Role {
    pub fn monthly_cost(&self) -> Decimal {
        Decimal::from(self.count) * self.salary
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCost {
    pub id: RoleId,
    pub title: String,
    pub count: u32,
    pub salary: Decimal,
    pub monthly_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payroll {
    pub rows: Vec<RoleCost>,
    pub headcount: u64,
    pub monthly_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffingTable {
    roles: Vec<Role>,
    next_id: u64,
}

fn check(input: &RoleInput) -> Result<(), StaffingError> {
    if input.count == 0 {
        return Err(StaffingError::ZeroCount);
    }
    if input.salary < Decimal::ZERO {
        return Err(StaffingError::NegativeSalary(input.salary));
    }
    Ok(())
}

impl StaffingTable {
    pub fn empty() -> Self {
        Self {
            roles: Vec::new(),
            next_id: 1,
        }
    }

    /// A manager and a marketer, the lesson's starting team.
    pub fn seeded() -> Self {
        let mut table = Self::empty();
        for (title, salary) in [("Project manager", 5_000), ("Digital marketer", 3_000)] {
            table.push(RoleInput {
                title: title.to_string(),
                count: 1,
                salary: Decimal::from(salary),
            });
        }
        table
    }

    pub fn from_inputs<I>(inputs: I) -> Result<Self, StaffingError>
    where
        I: IntoIterator<Item = RoleInput>,
    {
        let mut table = Self::empty();
        for input in inputs {
            table.add(input)?;
        }
        Ok(table)
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn add(
        &mut self,
        input: RoleInput,
    ) -> Result<RoleId, StaffingError> {
        check(&input)?;
        Ok(self.push(input))
    }

    pub fn update(
        &mut self,
        id: RoleId,
        input: RoleInput,
    ) -> Result<(), StaffingError> {
        check(&input)?;
        let role = self
            .roles
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StaffingError::UnknownRole(id))?;
        role.title = input.title;
        role.count = input.count;
        role.salary = input.salary;
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::seeded();
    }

    pub fn payroll(&self) -> Payroll {
        let rows: Vec<RoleCost> = self
            .roles
            .iter()
            .map(|role| RoleCost {
                id: role.id,
                title: role.title.clone(),
                count: role.count,
                salary: role.salary,
                monthly_cost: role.monthly_cost(),
            })
            .collect();
        Payroll {
            headcount: self.roles.iter().map(|r| u64::from(r.count)).sum(),
            monthly_total: sum(rows.iter().map(|r| r.monthly_cost)),
            rows,
        }
    }

    fn push(
        &mut self,
        input: RoleInput,
    ) -> RoleId {
        let id = RoleId(self.next_id);
        self.next_id += 1;
        self.roles.push(Role {
            id,
            title: input.title,
            count: input.count,
            salary: input.salary,
        });
        debug!(?id, "role added");
        id
    }
}

impl Default for StaffingTable {
    fn default() -> Self {
        Self::seeded()
    }
}
