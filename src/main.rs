use std::io;

use anyhow::{Context, Result};
use log::info;

use budgeto::config::Config;
use budgeto::shell::Shell;
use budgeto::store;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::default();
    let ledger = store::load_or_initialize(config.data_file())
        .with_context(|| format!("could not open ledger at {}", config.data_file().display()))?;
    info!("ledger ready, path={}, days={}", config.data_file().display(), ledger.days.len());

    let stdin = io::stdin();
    let mut shell = Shell::new(config, ledger, stdin.lock(), io::stdout());
    shell.run()
}
