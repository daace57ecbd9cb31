use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::tempdir;

use crate::accounting::ledger::Ledger;
use crate::config::Config;
use crate::shell::{parse_amount, InputError, MenuChoice, Shell};
use crate::store;

fn may_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

fn run_shell(config: Config, ledger: Ledger, input: impl Into<Vec<u8>>) -> Result<(Config, Ledger, String)> {
    let mut shell = Shell::new(config, ledger, Cursor::new(input.into()), Vec::new()).with_clock(may_first);
    shell.run()?;

    let config = shell.config().clone();
    let ledger = shell.ledger().clone();
    let output = String::from_utf8(shell.into_output())?;

    Ok((config, ledger, output))
}

fn config_in(dir: &Path) -> Config {
    Config::default().with_data_file(dir.join("budget_data.json"))
}

#[test]
fn test_menu_choice() {
    assert_eq!(MenuChoice::try_from("1"), Ok(MenuChoice::AddIncome));
    assert_eq!(MenuChoice::try_from(" 3 "), Ok(MenuChoice::ViewSummary));
    assert_eq!(MenuChoice::try_from("5"), Ok(MenuChoice::Exit));
    assert_eq!(MenuChoice::try_from("9"), Err(InputError::UnknownChoice("9".to_owned())));
}

#[test]
fn test_parse_amount() {
    assert_eq!(parse_amount(" 12.50 "), Ok(dec!(12.5)));
    assert_eq!(parse_amount("abc"), Err(InputError::NotANumber("abc".to_owned())));
    assert_eq!(parse_amount(""), Err(InputError::NotANumber(String::new())));
}

#[test]
fn test_income_expense_and_summary() -> Result<()> {
    let dir = tempdir()?;
    let config = config_in(dir.path());
    store::initialize(config.data_file())?;

    let (_, ledger, output) = run_shell(config.clone(), Ledger::new(), "1\n100\n2\n40\nFood\n3\n5\n")?;

    assert!(output.contains("Income added successfully."));
    assert!(output.contains("Expense added successfully."));
    assert!(output.contains("--- Monthly Summary for 2024-05 ---"));
    assert!(output.contains("Total Income: €100.00"));
    assert!(output.contains("Total Expenses: €40.00"));
    assert!(output.contains("  Food: €40.00"));
    assert!(output.contains("Remaining Balance: €60.00"));
    assert!(output.ends_with("Exiting the Personal Budget Tracker. Goodbye!\n"));

    // Every mutation is persisted immediately.
    assert_eq!(store::load(config.data_file())?, ledger);
    assert_eq!(ledger.day(may_first()).unwrap().expense("Food"), dec!(40));

    Ok(())
}

#[test]
fn test_invalid_input_leaves_state_untouched() -> Result<()> {
    let dir = tempdir()?;
    let config = config_in(dir.path());
    store::initialize(config.data_file())?;

    let (_, ledger, output) = run_shell(config.clone(), Ledger::new(), "1\nabc\n1\n-5\n2\n10\n  \n7\n5\n")?;

    assert!(output.contains("'abc' is not a valid amount"));
    assert!(output.contains("amount must be a positive number"));
    assert!(output.contains("expense category cannot be empty"));
    assert!(output.contains("'7' is not a menu option"));
    assert_eq!(ledger.is_empty(), true);
    assert_eq!(store::load(config.data_file())?.is_empty(), true);

    Ok(())
}

#[test]
fn test_end_of_input_exits() -> Result<()> {
    let dir = tempdir()?;
    let (_, ledger, output) = run_shell(config_in(dir.path()), Ledger::new(), "")?;

    assert!(output.contains("Goodbye!"));
    assert_eq!(ledger.is_empty(), true);

    Ok(())
}

#[test]
fn test_reset_current_file() -> Result<()> {
    let dir = tempdir()?;
    let config = config_in(dir.path());

    let mut ledger = Ledger::new();
    ledger.add_income(may_first(), dec!(10))?;
    store::save(config.data_file(), &ledger)?;

    let (after, ledger, output) = run_shell(config.clone(), ledger, "4\n1\n5\n")?;

    assert!(output.contains("reset successfully"));
    assert_eq!(after, config);
    assert_eq!(ledger.is_empty(), true);
    assert_eq!(fs::read_to_string(config.data_file())?.trim(), "{}");

    Ok(())
}

#[test]
fn test_reset_to_new_file_switches_data_file() -> Result<()> {
    let dir = tempdir()?;
    let config = config_in(dir.path());
    store::initialize(config.data_file())?;
    let new_file = dir.path().join("new_budget_data.json");

    let input = format!("1\n20\n4\n2\n{}\n2\n5\nRent\n5\n", new_file.display());
    let (after, ledger, _) = run_shell(config.clone(), Ledger::new(), input)?;

    assert_eq!(after.data_file(), new_file.as_path());
    assert_eq!(ledger.day(may_first()).unwrap().expense("Rent"), dec!(5));
    assert_eq!(*ledger.day(may_first()).unwrap().income(), dec!(0));

    // The old file keeps what was saved before the switch.
    assert_eq!(*store::load(config.data_file())?.day(may_first()).unwrap().income(), dec!(20));
    assert_eq!(store::load(&new_file)?, ledger);

    Ok(())
}

#[test]
fn test_failed_reset_keeps_previous_state() -> Result<()> {
    let dir = tempdir()?;
    let config = config_in(dir.path());

    let mut ledger = Ledger::new();
    ledger.add_income(may_first(), dec!(10))?;
    store::save(config.data_file(), &ledger)?;

    let unwritable = dir.path().join("missing").join("budget.json");
    let input = format!("4\n2\n{}\n5\n", unwritable.display());
    let (after, after_ledger, output) = run_shell(config.clone(), ledger.clone(), input)?;

    assert!(output.contains("Could not reset data file"));
    assert_eq!(after, config);
    assert_eq!(after_ledger, ledger);

    Ok(())
}

#[test]
fn test_failed_save_ends_the_loop() -> Result<()> {
    let dir = tempdir()?;
    let config = Config::default().with_data_file(dir.path().join("missing").join("budget.json"));

    let mut shell = Shell::new(config, Ledger::new(), Cursor::new("1\n10\n5\n".to_owned()), Vec::new()).with_clock(may_first);
    assert!(shell.run().is_err());

    Ok(())
}

#[test]
fn test_overflowing_amounts_are_reported() -> Result<()> {
    let dir = tempdir()?;
    let config = config_in(dir.path());
    store::initialize(config.data_file())?;

    let max = "79228162514264337593543950335";
    let input = format!("1\n{max}\n1\n{max}\n2\n{max}\nRent\n2\n{max}\nRent\n3\n5\n");
    let (_, ledger, output) = run_shell(config.clone(), Ledger::new(), input)?;

    assert_eq!(output.matches("total would exceed the largest supported amount").count(), 2);
    assert!(output.contains("Remaining Balance: €0.00"));
    assert!(output.ends_with("Goodbye!\n"));

    let day = ledger.day(may_first()).unwrap();
    assert_eq!(*day.income(), Decimal::MAX);
    assert_eq!(day.expense("Rent"), Decimal::MAX);
    assert_eq!(store::load(config.data_file())?, ledger);

    Ok(())
}

#[test]
fn test_invalid_utf8_input_does_not_end_the_session() -> Result<()> {
    let dir = tempdir()?;
    let config = config_in(dir.path());
    store::initialize(config.data_file())?;

    let (_, ledger, output) = run_shell(config, Ledger::new(), b"\xff\n2\n5\nCaf\xe9\n3\n5\n".to_vec())?;

    assert!(output.contains("is not a menu option"));
    assert!(output.contains("Expense added successfully."));
    assert!(output.ends_with("Goodbye!\n"));
    assert_eq!(ledger.day(may_first()).unwrap().expense("Caf\u{FFFD}"), dec!(5));

    Ok(())
}
