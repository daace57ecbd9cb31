use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::accounting::ledger::Ledger;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("failed to encode ledger for {}: {source}", .path.display())]
    Encode { path: PathBuf, source: serde_json::Error },
    #[error("negative amount recorded on {date} in {}", .path.display())]
    NegativeAmount { path: PathBuf, date: chrono::NaiveDate },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn parse(path: &Path, source: serde_json::Error) -> StoreError {
        StoreError::Parse {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Creates the file, or truncates an existing one, holding an empty ledger.
pub fn initialize(path: &Path) -> Result<(), StoreError> {
    info!("initializing ledger file, path={}", path.display());
    save(path, &Ledger::new())
}

pub fn load(path: &Path) -> Result<Ledger, StoreError> {
    debug!("loading ledger, path={}", path.display());

    let file = File::open(path).map_err(|err| StoreError::io(path, err))?;
    let ledger: Ledger = serde_json::from_reader(BufReader::new(file)).map_err(|err| StoreError::parse(path, err))?;

    if let Some((date, _)) = ledger.days_iter().find(|(_, day)| !day.is_well_formed()) {
        return Err(StoreError::NegativeAmount {
            path: path.to_path_buf(),
            date: *date,
        });
    }

    debug!("loaded ledger, days={}", ledger.days.len());

    Ok(ledger)
}

/// Loads the ledger at `path`, creating an empty file first if none exists.
pub fn load_or_initialize(path: &Path) -> Result<Ledger, StoreError> {
    if !path.exists() {
        initialize(path)?;
    }

    load(path)
}

/// Writes the whole ledger to a sibling temp file, then renames it over
/// `path`. A failed write leaves the previous content in place and removes
/// the temp file.
pub fn save(path: &Path, ledger: &Ledger) -> Result<(), StoreError> {
    let tmp_path = tmp_path_for(path);

    let file = File::create(&tmp_path).map_err(|err| StoreError::io(&tmp_path, err))?;
    let written = write_ledger(file, path, &tmp_path, ledger)
        .and_then(|_| fs::rename(&tmp_path, path).map_err(|err| StoreError::io(path, err)));

    if let Err(err) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    debug!("saved ledger, path={}, days={}", path.display(), ledger.days.len());

    Ok(())
}

fn write_ledger(file: File, path: &Path, tmp_path: &Path, ledger: &Ledger) -> Result<(), StoreError> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, ledger).map_err(|source| StoreError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|err| StoreError::io(tmp_path, err))
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
