use chrono::NaiveDate;
use enum_dispatch::enum_dispatch;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::day_record::PRECISION;
use super::ledger::Ledger;
use super::{LedgerError, RecordableEntry};

#[enum_dispatch(RecordableEntry)]
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Income,
    Expense,
}

/// Rejects amounts that are not positive once rounded to `PRECISION`.
fn validate_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount.round_dp(PRECISION) <= dec!(0) {
        return Err(LedgerError::InvalidAmount);
    }

    Ok(amount)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Income {
    date: NaiveDate,
    amount: Decimal,
}

impl Income {
    pub fn new(date: NaiveDate, amount: Decimal) -> Result<Income, LedgerError> {
        Ok(Income {
            date,
            amount: validate_amount(amount)?,
        })
    }
}

impl RecordableEntry for Income {
    fn record(&self, ledger: &mut Ledger) -> Result<(), LedgerError> {
        ledger.update_day(self.date, |day| day.add_income(self.amount))
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    date: NaiveDate,
    category: String,
    amount: Decimal,
}

impl Expense {
    /// Category names are trimmed; a blank name is rejected.
    pub fn new(date: NaiveDate, category: &str, amount: Decimal) -> Result<Expense, LedgerError> {
        let amount = validate_amount(amount)?;

        let category = category.trim();
        if category.is_empty() {
            return Err(LedgerError::EmptyCategory);
        }

        Ok(Expense {
            date,
            category: category.to_owned(),
            amount,
        })
    }
}

impl RecordableEntry for Expense {
    fn record(&self, ledger: &mut Ledger) -> Result<(), LedgerError> {
        ledger.update_day(self.date, |day| day.add_expense(&self.category, self.amount))
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}
