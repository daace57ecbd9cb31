use std::collections::BTreeMap;

use getset::Getters;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LedgerError;

pub const PRECISION: u32 = 4;

/// Income and per-category expense totals accumulated for a single day.
#[derive(Debug, Default, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[getset(get = "pub")]
pub struct DayRecord {
    income: Decimal,
    expenses: BTreeMap<String, Decimal>,
}

impl DayRecord {
    pub fn new() -> DayRecord {
        DayRecord {
            income: Decimal::ZERO,
            expenses: BTreeMap::new(),
        }
    }

    pub fn add_income(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.income = checked_total(self.income, amount)?;

        Ok(())
    }

    /// The record is left untouched if the category total would overflow.
    pub fn add_expense(&mut self, category: &str, amount: Decimal) -> Result<(), LedgerError> {
        let total = checked_total(self.expense(category), amount)?;
        self.expenses.insert(category.to_owned(), total);

        Ok(())
    }

    pub fn expense(&self, category: &str) -> Decimal {
        self.expenses.get(category).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn total_expenses(&self) -> Result<Decimal, LedgerError> {
        self.expenses
            .values()
            .try_fold(Decimal::ZERO, |total, amount| total.checked_add(*amount).ok_or(LedgerError::AmountOverflow))
    }

    /// True when income and every expense total are non-negative.
    pub fn is_well_formed(&self) -> bool {
        self.income >= Decimal::ZERO && self.expenses.values().all(|amount| *amount >= Decimal::ZERO)
    }
}

fn checked_total(total: Decimal, amount: Decimal) -> Result<Decimal, LedgerError> {
    total
        .checked_add(amount)
        .map(|total| total.round_dp(PRECISION))
        .ok_or(LedgerError::AmountOverflow)
}
