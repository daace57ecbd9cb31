use chrono::NaiveDate;
use enum_dispatch::enum_dispatch;
use thiserror::Error;

pub mod day_record;
pub mod entries;
pub mod ledger;
pub mod month;
pub mod summary;


pub use entries::{Entry, Expense, Income};
pub use month::Month;

use ledger::Ledger;

#[derive(Debug, PartialEq, Error)]
pub enum LedgerError {
    #[error("amount must be a positive number")]
    InvalidAmount,
    #[error("expense category cannot be empty")]
    EmptyCategory,
    #[error("total would exceed the largest supported amount")]
    AmountOverflow,
}

#[enum_dispatch]
pub trait RecordableEntry {
    fn record(&self, ledger: &mut Ledger) -> Result<(), LedgerError>;

    fn date(&self) -> NaiveDate;
}
