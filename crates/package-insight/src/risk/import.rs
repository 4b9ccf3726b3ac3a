//! Loading rule tables from admin exports: a JSON snapshot document or one CSV per table.

use super::rules::{AccountEntry, CiiRange, PatternRule, RuleSnapshot};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum RuleImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for RuleImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleImportError::Io(err) => write!(f, "failed to read rule export: {}", err),
            RuleImportError::Csv(err) => write!(f, "invalid rule CSV data: {}", err),
            RuleImportError::Json(err) => write!(f, "invalid rule snapshot: {}", err),
        }
    }
}

impl std::error::Error for RuleImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuleImportError::Io(err) => Some(err),
            RuleImportError::Csv(err) => Some(err),
            RuleImportError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RuleImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RuleImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for RuleImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl RuleSnapshot {
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, RuleImportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, RuleImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }
}

/// ANI watchlist or VAI safe-list export (`account_number` column required).
pub fn read_accounts_csv<R: Read>(reader: R) -> Result<Vec<AccountEntry>, RuleImportError> {
    read_rows(reader)
}

/// CII range export (`min_value`, `max_value`, `points`).
pub fn read_cii_ranges_csv<R: Read>(reader: R) -> Result<Vec<CiiRange>, RuleImportError> {
    read_rows(reader)
}

/// OSI or RSI rule export (`pattern`, `points`, optional `active`).
pub fn read_pattern_rules_csv<R: Read>(reader: R) -> Result<Vec<PatternRule>, RuleImportError> {
    read_rows(reader)
}

fn read_rows<R: Read, T: DeserializeOwned>(reader: R) -> Result<Vec<T>, RuleImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<T>()
        .map(|row| row.map_err(RuleImportError::from))
        .collect()
}
