use std::collections::BTreeMap;

use getset::{CopyGetters, Getters};
use rust_decimal::Decimal;

use super::day_record::DayRecord;
use super::month::Month;
use super::LedgerError;

/// Read-only aggregate over every day of one month.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct MonthlySummary {
    #[getset(get_copy = "pub")]
    month: Month,
    #[getset(get_copy = "pub")]
    total_income: Decimal,
    #[getset(get_copy = "pub")]
    total_expenses: Decimal,
    #[getset(get = "pub")]
    categories: BTreeMap<String, Decimal>,
}

impl MonthlySummary {
    pub(super) fn empty(month: Month) -> MonthlySummary {
        MonthlySummary {
            month,
            total_income: Decimal::ZERO,
            total_expenses: Decimal::ZERO,
            categories: BTreeMap::new(),
        }
    }

    /// Fails without changing the summary if any total would overflow.
    pub(super) fn accumulate(&mut self, day: &DayRecord) -> Result<(), LedgerError> {
        let total_income = checked_add(self.total_income, *day.income())?;
        let total_expenses = checked_add(self.total_expenses, day.total_expenses()?)?;

        let mut categories = self.categories.clone();
        for (category, amount) in day.expenses() {
            let total = categories.entry(category.clone()).or_insert(Decimal::ZERO);
            *total = checked_add(*total, *amount)?;
        }

        self.total_income = total_income;
        self.total_expenses = total_expenses;
        self.categories = categories;

        Ok(())
    }

    /// Both totals are non-negative, so the difference cannot overflow.
    pub fn balance(&self) -> Decimal {
        self.total_income - self.total_expenses
    }

    pub fn category(&self, name: &str) -> Decimal {
        self.categories.get(name).copied().unwrap_or(Decimal::ZERO)
    }
}

fn checked_add(total: Decimal, amount: Decimal) -> Result<Decimal, LedgerError> {
    total.checked_add(amount).ok_or(LedgerError::AmountOverflow)
}
