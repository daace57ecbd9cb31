use std::collections::btree_map::Iter;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::day_record::DayRecord;
use super::entries::{Entry, Expense, Income};
use super::month::Month;
use super::summary::MonthlySummary;
use super::{LedgerError, RecordableEntry};

/// Every recorded day, keyed by date. Serializes as a JSON object keyed by
/// `YYYY-MM-DD` strings.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    pub days: BTreeMap<NaiveDate, DayRecord>,
}

impl Ledger {
    pub fn new() -> Ledger {
        Ledger { days: BTreeMap::new() }
    }

    pub fn record(&mut self, entry: Entry) -> Result<(), LedgerError> {
        entry.record(self)
    }

    pub fn add_income(&mut self, date: NaiveDate, amount: Decimal) -> Result<(), LedgerError> {
        self.record(Entry::Income(Income::new(date, amount)?))
    }

    pub fn add_expense(&mut self, date: NaiveDate, category: &str, amount: Decimal) -> Result<(), LedgerError> {
        self.record(Entry::Expense(Expense::new(date, category, amount)?))
    }

    /// Applies `update` to a copy of the record for `date` (an empty one if
    /// absent) and stores it only if the update succeeds.
    pub fn update_day<F>(&mut self, date: NaiveDate, update: F) -> Result<(), LedgerError>
    where
        F: FnOnce(&mut DayRecord) -> Result<(), LedgerError>,
    {
        let mut day = self.days.get(&date).cloned().unwrap_or_else(DayRecord::new);
        update(&mut day)?;
        self.days.insert(date, day);

        Ok(())
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days.get(&date)
    }

    pub fn days_iter(&self) -> Iter<NaiveDate, DayRecord> {
        self.days.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn monthly_summary(&self, month: Month) -> Result<MonthlySummary, LedgerError> {
        let mut summary = MonthlySummary::empty(month);
        for (_date, day) in self.days_iter().filter(|(date, _)| month.contains(**date)) {
            summary.accumulate(day)?;
        }

        Ok(summary)
    }
}
