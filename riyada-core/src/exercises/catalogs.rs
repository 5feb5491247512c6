//! Built-in item catalogs for the classification exercises.

use serde::{Deserialize, Serialize};

use crate::exercises::classification::{CatalogItem, Category, ClassificationExercise};

/// Balance-sheet classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountCategory {
    Asset,
    Liability,
    Equity,
}

impl Category for AccountCategory {
    fn all() -> &'static [Self] {
        &[
            AccountCategory::Asset,
            AccountCategory::Liability,
            AccountCategory::Equity,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            AccountCategory::Asset => "Assets",
            AccountCategory::Liability => "Liabilities",
            AccountCategory::Equity => "Equity",
        }
    }
}

/// Which side of a journal entry an account normally sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceSide {
    Debit,
    Credit,
}

impl Category for BalanceSide {
    fn all() -> &'static [Self] {
        &[BalanceSide::Debit, BalanceSide::Credit]
    }

    fn label(&self) -> &'static str {
        match self {
            BalanceSide::Debit => "Debtor",
            BalanceSide::Credit => "Creditor",
        }
    }
}

pub const ACCOUNT_TYPES: &[CatalogItem<AccountCategory>] = &[
    CatalogItem {
        id: 1,
        name: "Cash on hand",
        category: AccountCategory::Asset,
        note: "Current",
    },
    CatalogItem {
        id: 2,
        name: "Long-term bank loan",
        category: AccountCategory::Liability,
        note: "Long-term",
    },
    CatalogItem {
        id: 3,
        name: "Delivery vehicles",
        category: AccountCategory::Asset,
        note: "Fixed",
    },
    CatalogItem {
        id: 4,
        name: "Owner's capital",
        category: AccountCategory::Equity,
        note: "",
    },
    CatalogItem {
        id: 5,
        name: "Creditors (suppliers)",
        category: AccountCategory::Liability,
        note: "Short-term",
    },
    CatalogItem {
        id: 6,
        name: "Merchandise inventory",
        category: AccountCategory::Asset,
        note: "Current",
    },
    CatalogItem {
        id: 7,
        name: "Office furniture",
        category: AccountCategory::Asset,
        note: "Fixed",
    },
    CatalogItem {
        id: 8,
        name: "Retained earnings",
        category: AccountCategory::Equity,
        note: "",
    },
];

pub const DEBTOR_CREDITOR_TERMS: &[CatalogItem<BalanceSide>] = &[
    CatalogItem {
        id: 1,
        name: "Cash",
        category: BalanceSide::Debit,
        note: "An asset the business owns (it received value)",
    },
    CatalogItem {
        id: 2,
        name: "Capital",
        category: BalanceSide::Credit,
        note: "What the business owes its owner (the owner gave value)",
    },
    CatalogItem {
        id: 3,
        name: "Bank loans",
        category: BalanceSide::Credit,
        note: "Money taken from the bank that must be repaid",
    },
    CatalogItem {
        id: 4,
        name: "Vehicles and equipment",
        category: BalanceSide::Debit,
        note: "Property of the business (fixed assets)",
    },
    CatalogItem {
        id: 5,
        name: "Suppliers",
        category: BalanceSide::Credit,
        note: "They gave you goods you have not paid for yet",
    },
    CatalogItem {
        id: 6,
        name: "Customers (receivables)",
        category: BalanceSide::Debit,
        note: "They took goods from you and have not paid yet",
    },
    CatalogItem {
        id: 7,
        name: "Expenses",
        category: BalanceSide::Debit,
        note: "Money paid out for a service, such as rent",
    },
    CatalogItem {
        id: 8,
        name: "Revenue / sales",
        category: BalanceSide::Credit,
        note: "The business's source of income (increases equity)",
    },
];

pub fn account_types_exercise() -> ClassificationExercise<AccountCategory> {
    ClassificationExercise::new(ACCOUNT_TYPES)
}

pub fn debtor_creditor_exercise() -> ClassificationExercise<BalanceSide> {
    ClassificationExercise::new(DEBTOR_CREDITOR_TERMS)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Instant;

    use pretty_assertions::assert_eq;

    use super::*;

    fn count<C: Category>(
        items: &[CatalogItem<C>],
        category: C,
    ) -> usize {
        items.iter().filter(|i| i.category == category).count()
    }

    #[test]
    fn account_types_catalog_shape() {
        assert_eq!(ACCOUNT_TYPES.len(), 8);
        assert_eq!(count(ACCOUNT_TYPES, AccountCategory::Asset), 4);
        assert_eq!(count(ACCOUNT_TYPES, AccountCategory::Liability), 2);
        assert_eq!(count(ACCOUNT_TYPES, AccountCategory::Equity), 2);
    }

    #[test]
    fn debtor_creditor_catalog_shape() {
        let debit_ids: Vec<u32> = DEBTOR_CREDITOR_TERMS
            .iter()
            .filter(|t| t.category == BalanceSide::Debit)
            .map(|t| t.id)
            .collect();

        assert_eq!(debit_ids, vec![1, 4, 6, 7]);
        assert_eq!(count(DEBTOR_CREDITOR_TERMS, BalanceSide::Credit), 4);
    }

    #[test]
    fn catalog_ids_are_unique() {
        let ids: HashSet<u32> = ACCOUNT_TYPES.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), ACCOUNT_TYPES.len());

        let ids: HashSet<u32> = DEBTOR_CREDITOR_TERMS.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), DEBTOR_CREDITOR_TERMS.len());
    }

    #[test]
    fn debtor_creditor_can_be_completed() {
        let now = Instant::now();
        let mut exercise = debtor_creditor_exercise();

        for term in DEBTOR_CREDITOR_TERMS {
            exercise.select(term.id, now).unwrap();
            exercise.place(term.category, now).unwrap();
        }

        assert!(exercise.is_complete());
        assert_eq!(exercise.bucket(BalanceSide::Credit).len(), 4);
    }
}
