//! Error types for vending machine actions.

use thiserror::Error;

use super::MachineState;
use crate::catalog::CatalogError;
use crate::model::ActionKind;

/// The current state does not support the requested action. Nothing was mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{action} not supported in {state} state")]
pub struct ActionRejected {
    pub action: ActionKind,
    pub state: MachineState,
}

/// Top-level error returned by [`VendingMachine`](super::VendingMachine) actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("action rejected: {0}")]
    Rejected(#[from] ActionRejected),

    #[error("{0}")]
    Catalog(#[from] CatalogError),
}
