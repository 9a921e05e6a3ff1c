use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::machine::Step;
use crate::money::CoinError;
use crate::{Action, Amount, Catalog, Coin, Item, ProductCode};

/// Errors that can occur when reading or writing csv files
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open csv file: {0}")]
    Open(csv::Error),

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized action '{action}'")]
    UnrecognizedAction { line: usize, action: String },

    #[error("line {line}: {action} missing value")]
    MissingValue { line: usize, action: String },

    #[error("line {line}: {source}")]
    Coin { line: usize, source: CoinError },

    #[error("line {line}: {source}")]
    Catalog { line: usize, source: CatalogError },

    #[error("failed to write report: {0}")]
    Write(#[from] csv::Error),

    #[error("failed to flush report: {0}")]
    Flush(#[from] io::Error),
}

#[derive(Debug, Deserialize)]
struct ActionRow {
    action: String,
    #[serde(default)]
    value: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    code: ProductCode,
    name: String,
    price: u64,
}

#[derive(Debug, Serialize)]
struct StepRow {
    step: usize,
    action: String,
    outcome: String,
    state: String,
}

fn reader(path: impl AsRef<Path>) -> Result<csv::Reader<std::fs::File>, CsvError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(CsvError::Open)
}

fn parse_action(line: usize, row: ActionRow) -> Result<Action, CsvError> {
    let value = || {
        row.value.ok_or_else(|| CsvError::MissingValue {
            line,
            action: row.action.clone(),
        })
    };

    match row.action.as_str() {
        "press_insert_coin" => Ok(Action::PressInsertCoinButton),
        "insert_coin" => {
            let coin = Coin::try_from(value()?)
                .map_err(|source| CsvError::Coin { line, source })?;
            Ok(Action::InsertCoin(coin))
        }
        "press_select_product" => Ok(Action::PressSelectProductButton),
        "select_product" => Ok(Action::SelectProduct(value()?)),
        "collect_product" => Ok(Action::CollectProduct),
        "cancel" => Ok(Action::CancelRequest),
        other => Err(CsvError::UnrecognizedAction {
            line,
            action: other.to_string(),
        }),
    }
}

/// Read a customer action script from a csv file with an `action,value` header
pub fn read_actions(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Action, CsvError>>, CsvError> {
    let reader = reader(path)?;

    Ok(reader
        .into_deserialize::<ActionRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            parse_action(line, row)
        }))
}

/// Read a catalog from a csv file with a `code,name,price` header
pub fn read_catalog(path: impl AsRef<Path>) -> Result<Catalog, CsvError> {
    let reader = reader(path)?;
    let mut catalog = Catalog::new();

    for (idx, result) in reader.into_deserialize::<CatalogRow>().enumerate() {
        let line = idx + 2;
        let row = result.map_err(|source| CsvError::Parse { line, source })?;
        catalog
            .insert(row.code, Item::new(row.name, Amount::new(row.price)))
            .map_err(|source| CsvError::Catalog { line, source })?;
    }

    Ok(catalog)
}

/// Write the step report in csv format
pub fn write_steps<'a>(
    writer: impl io::Write,
    steps: impl IntoIterator<Item = &'a Step>,
) -> Result<(), CsvError> {
    let mut writer = csv::Writer::from_writer(writer);

    for (idx, step) in steps.into_iter().enumerate() {
        let outcome = match &step.result {
            Ok(outcome) => outcome.to_string(),
            Err(e) => e.to_string(),
        };
        let row = StepRow {
            step: idx + 1,
            action: step.action.to_string(),
            outcome,
            state: step.state.to_string(),
        };
        writer.serialize(&row)?;
    }

    writer.flush()?;
    Ok(())
}
