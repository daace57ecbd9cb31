use std::borrow::Cow;
use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::accounting::ledger::Ledger;
use crate::accounting::month::Month;
use crate::accounting::summary::MonthlySummary;
use crate::config::Config;
use crate::store;

#[derive(Debug, PartialEq, Error)]
pub enum InputError {
    #[error("'{0}' is not a valid amount")]
    NotANumber(String),
    #[error("'{0}' is not a menu option")]
    UnknownChoice(String),
    #[error("file name cannot be empty")]
    EmptyFileName,
}

#[derive(Debug, PartialEq)]
pub enum MenuChoice {
    AddIncome,
    AddExpense,
    ViewSummary,
    Reset,
    Exit,
}

impl TryFrom<&str> for MenuChoice {
    type Error = InputError;

    fn try_from(input: &str) -> Result<Self, Self::Error> {
        match input.trim() {
            "1" => Ok(MenuChoice::AddIncome),
            "2" => Ok(MenuChoice::AddExpense),
            "3" => Ok(MenuChoice::ViewSummary),
            "4" => Ok(MenuChoice::Reset),
            "5" => Ok(MenuChoice::Exit),
            other => Err(InputError::UnknownChoice(other.to_owned())),
        }
    }
}

#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Exit,
}

pub fn parse_amount(input: &str) -> Result<Decimal, InputError> {
    let input = input.trim();
    Decimal::from_str(input).map_err(|_| InputError::NotANumber(input.to_owned()))
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Line-oriented menu over a ledger. Every successful mutation is saved to
/// the configured data file before the next prompt.
pub struct Shell<R, W> {
    config: Config,
    ledger: Ledger,
    input: R,
    output: W,
    today: fn() -> NaiveDate,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(config: Config, ledger: Ledger, input: R, output: W) -> Shell<R, W> {
        Shell {
            config,
            ledger,
            input,
            output,
            today: local_today,
        }
    }

    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Shell<R, W> {
        self.today = today;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until the exit option is chosen or input ends. Only a failed save
    /// after a mutation (or a broken terminal) ends the loop with an error.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.display_menu()?;
            let Some(line) = self.prompt("Choose an option (1-5): ")? else {
                break;
            };

            let flow = match MenuChoice::try_from(line.as_str()) {
                Ok(MenuChoice::AddIncome) => self.add_income()?,
                Ok(MenuChoice::AddExpense) => self.add_expense()?,
                Ok(MenuChoice::ViewSummary) => self.view_summary()?,
                Ok(MenuChoice::Reset) => self.reset()?,
                Ok(MenuChoice::Exit) => Flow::Exit,
                Err(err) => {
                    self.reject(&err)?;
                    Flow::Continue
                },
            };

            if flow == Flow::Exit {
                break;
            }
        }

        writeln!(self.output, "Exiting the Personal Budget Tracker. Goodbye!")?;

        Ok(())
    }

    fn display_menu(&mut self) -> Result<()> {
        writeln!(self.output, "Personal Budget Tracker")?;
        writeln!(self.output, "1. Add Income")?;
        writeln!(self.output, "2. Add Expense")?;
        writeln!(self.output, "3. View Monthly Summary")?;
        writeln!(self.output, "4. Reset Data File")?;
        writeln!(self.output, "5. Exit")?;

        Ok(())
    }

    /// Returns `None` once input is exhausted. Bytes that are not valid
    /// UTF-8 are replaced with U+FFFD.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }

        let line = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = line {
            debug!("replaced invalid utf-8 in input line");
        }

        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }

    fn prompt_amount(&mut self, label: &str) -> Result<Option<Result<Decimal, InputError>>> {
        let label = format!("{}{}", label, self.config.currency);
        Ok(self.prompt(&label)?.map(|line| parse_amount(&line)))
    }

    fn reject(&mut self, err: &dyn std::error::Error) -> Result<()> {
        debug!("rejected input, err={}", err);
        writeln!(self.output, "Invalid input: {}. Please try again.\n", err)?;

        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        store::save(self.config.data_file(), &self.ledger)
            .with_context(|| format!("could not save ledger to {}", self.config.data_file().display()))
    }

    fn add_income(&mut self) -> Result<Flow> {
        let amount = match self.prompt_amount("Enter income amount: ")? {
            None => return Ok(Flow::Exit),
            Some(Ok(amount)) => amount,
            Some(Err(err)) => {
                self.reject(&err)?;
                return Ok(Flow::Continue);
            },
        };

        if let Err(err) = self.ledger.add_income((self.today)(), amount) {
            self.reject(&err)?;
            return Ok(Flow::Continue);
        }

        self.persist()?;
        writeln!(self.output, "Income added successfully.\n")?;

        Ok(Flow::Continue)
    }

    fn add_expense(&mut self) -> Result<Flow> {
        let amount = match self.prompt_amount("Enter expense amount: ")? {
            None => return Ok(Flow::Exit),
            Some(Ok(amount)) => amount,
            Some(Err(err)) => {
                self.reject(&err)?;
                return Ok(Flow::Continue);
            },
        };

        let Some(category) = self.prompt("Enter expense category (e.g., Food, Transport, etc.): ")? else {
            return Ok(Flow::Exit);
        };

        if let Err(err) = self.ledger.add_expense((self.today)(), &category, amount) {
            self.reject(&err)?;
            return Ok(Flow::Continue);
        }

        self.persist()?;
        writeln!(self.output, "Expense added successfully.\n")?;

        Ok(Flow::Continue)
    }

    fn view_summary(&mut self) -> Result<Flow> {
        match self.ledger.monthly_summary(Month::of((self.today)())) {
            Ok(summary) => self.print_summary(&summary)?,
            Err(err) => self.reject(&err)?,
        }

        Ok(Flow::Continue)
    }

    fn print_summary(&mut self, summary: &MonthlySummary) -> Result<()> {
        let currency = self.config.currency;

        writeln!(self.output, "\n--- Monthly Summary for {} ---", summary.month())?;
        writeln!(self.output, "Total Income: {}{:.2}", currency, summary.total_income())?;
        writeln!(self.output, "Total Expenses: {}{:.2}", currency, summary.total_expenses())?;
        writeln!(self.output, "Expenses by Category:")?;
        for (category, amount) in summary.categories() {
            writeln!(self.output, "  {}: {}{:.2}", category, currency, amount)?;
        }
        writeln!(self.output, "Remaining Balance: {}{:.2}\n", currency, summary.balance())?;

        Ok(())
    }

    fn reset(&mut self) -> Result<Flow> {
        writeln!(self.output, "1. Reset the current file")?;
        writeln!(self.output, "2. Create a new file")?;
        let Some(choice) = self.prompt("Choose an option (1-2): ")? else {
            return Ok(Flow::Exit);
        };

        let target = match choice.trim() {
            "1" => self.config.clone(),
            "2" => {
                let Some(name) = self.prompt("Enter the name of the new file (e.g., new_budget_data.json): ")? else {
                    return Ok(Flow::Exit);
                };
                let name = name.trim();
                if name.is_empty() {
                    self.reject(&InputError::EmptyFileName)?;
                    return Ok(Flow::Continue);
                }
                self.config.with_data_file(name)
            },
            _ => {
                writeln!(self.output, "Invalid choice. Returning to the main menu.\n")?;
                return Ok(Flow::Continue);
            },
        };

        let path = target.data_file();
        match store::initialize(path).and_then(|_| store::load(path)) {
            Ok(ledger) => {
                info!("ledger reset, path={}", path.display());
                writeln!(self.output, "Data file '{}' reset successfully.\n", path.display())?;
                self.ledger = ledger;
                self.config = target;
            },
            Err(err) => {
                warn!("failed to reset ledger, err={}", err);
                writeln!(self.output, "Could not reset data file: {}\n", err)?;
            },
        }

        Ok(Flow::Continue)
    }
}
