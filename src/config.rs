use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "budget_data.json";
pub const DEFAULT_CURRENCY: &str = "€";

/// Where the ledger lives and how amounts are labelled on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_file: PathBuf,
    pub currency: &'static str,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            currency: DEFAULT_CURRENCY,
        }
    }
}

impl Config {
    pub fn with_data_file(&self, data_file: impl AsRef<Path>) -> Config {
        Config {
            data_file: data_file.as_ref().to_path_buf(),
            ..self.clone()
        }
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }
}
