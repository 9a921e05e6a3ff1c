//! Vending machine controller.
//!
//! The controller owns the catalog, the coin ledger and the current state.
//! Every action is forwarded to the active state, which validates it and
//! computes the next state; the controller then installs that state.
//! Also supports driving the machine from an async stream of actions.

use std::time::Duration;

use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::model::{Action, ActionKind, Item, Outcome, ProductCode, SelectOutcome};
use crate::{Amount, Coin};

mod error;
pub use error::{ActionRejected, MachineError};

mod ledger;
pub use ledger::Ledger;

mod state;
pub use state::{MachineState, Transition};

/// Record of one applied action, as produced by [`VendingMachine::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub action: Action,
    pub result: Result<Outcome, MachineError>,
    /// State after the action.
    pub state: MachineState,
}

/// A single vending machine. Not shared: one caller drives it at a time.
#[derive(Debug)]
pub struct VendingMachine {
    catalog: Catalog,
    ledger: Ledger,
    state: MachineState,
}

/// Public API
impl VendingMachine {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ledger: Ledger::new(),
            state: MachineState::Idle,
        }
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn press_insert_coin_button(&mut self) -> Result<(), MachineError> {
        let result = self.state.press_insert_coin_button().map_err(MachineError::from);
        self.settle(ActionKind::PressInsertCoinButton, result)
    }

    /// Returns the ledger total including `coin`.
    pub fn insert_coin(&mut self, coin: Coin) -> Result<Amount, MachineError> {
        let state = self.state;
        let result = state.insert_coin(&mut self.ledger, coin).map_err(MachineError::from);
        let total = self.settle(ActionKind::InsertCoin, result)?;
        info!(coin = %coin, total = %total, "coin accepted");
        Ok(total)
    }

    pub fn press_select_product_button(&mut self) -> Result<(), MachineError> {
        let result = self.state.press_select_product_button().map_err(MachineError::from);
        self.settle(ActionKind::PressSelectProductButton, result)
    }

    pub fn select_product(&mut self, code: ProductCode) -> Result<SelectOutcome, MachineError> {
        let state = self.state;
        let result = state.select_product(&mut self.ledger, &self.catalog, code);
        let outcome = self.settle(ActionKind::SelectProduct, result)?;

        match &outcome {
            SelectOutcome::InsufficientFunds { price, paid, refund } => {
                warn!(
                    code,
                    price = %price,
                    paid = %paid,
                    refunded = refund.len(),
                    "insufficient funds, refunding"
                );
            }
            SelectOutcome::Dispensing { change } if !change.is_zero() => {
                info!(code, change = %change, "returning change");
            }
            SelectOutcome::Dispensing { .. } => {}
        }
        Ok(outcome)
    }

    /// Hand out the product bound when it was selected.
    pub fn collect_product(&mut self) -> Result<Item, MachineError> {
        let result = self.state.collect_product(&self.catalog);
        let item = self.settle(ActionKind::CollectProduct, result)?;
        info!(item = %item.name, "product collected");
        Ok(item)
    }

    /// Abort the transaction and return every inserted coin.
    pub fn cancel_request(&mut self) -> Result<Vec<Coin>, MachineError> {
        let state = self.state;
        let result = state.cancel_request(&mut self.ledger).map_err(MachineError::from);
        let refund = self.settle(ActionKind::CancelRequest, result)?;
        info!(refunded = refund.len(), "request cancelled");
        Ok(refund)
    }

    /// Apply a single action on top of the current machine state
    pub fn apply(&mut self, action: Action) -> Result<Outcome, MachineError> {
        match action {
            Action::PressInsertCoinButton => {
                self.press_insert_coin_button().map(|()| Outcome::Accepted)
            }
            Action::InsertCoin(coin) => self
                .insert_coin(coin)
                .map(|total| Outcome::CoinInserted { total }),
            Action::PressSelectProductButton => {
                self.press_select_product_button().map(|()| Outcome::Accepted)
            }
            Action::SelectProduct(code) => self.select_product(code).map(Outcome::Selected),
            Action::CollectProduct => self.collect_product().map(Outcome::Dispensed),
            Action::CancelRequest => self.cancel_request().map(Outcome::Refunded),
        }
    }

    /// Run the machine over the given action stream, recording every step
    pub async fn run(&mut self, stream: impl Stream<Item = Action> + Unpin) -> Vec<Step> {
        self.drive(stream, None).await
    }

    /// Like [`run`](Self::run), but a transaction left waiting for the customer
    /// longer than `idle` is cancelled and its coins refunded.
    pub async fn run_with_timeout(
        &mut self,
        stream: impl Stream<Item = Action> + Unpin,
        idle: Duration,
    ) -> Vec<Step> {
        self.drive(stream, Some(idle)).await
    }
}

/// Private API
impl VendingMachine {
    /// Install the next state of a successful transition, or log the refusal.
    /// A failed action never changes the state.
    fn settle<T>(
        &mut self,
        action: ActionKind,
        result: Result<Transition<T>, MachineError>,
    ) -> Result<T, MachineError> {
        match result {
            Ok(Transition { next, output }) => {
                if next != self.state {
                    info!(
                        action = %action,
                        from = %self.state,
                        to = %next,
                        "state changed"
                    );
                }
                self.state = next;
                Ok(output)
            }
            Err(e) => {
                info!(
                    action = %action,
                    state = %self.state,
                    reason = %e,
                    "action skipped"
                );
                Err(e)
            }
        }
    }

    fn record(&mut self, action: Action) -> Step {
        let result = self.apply(action);
        Step {
            action,
            result,
            state: self.state,
        }
    }

    async fn drive(
        &mut self,
        mut stream: impl Stream<Item = Action> + Unpin,
        idle: Option<Duration>,
    ) -> Vec<Step> {
        let mut steps = Vec::new();

        loop {
            let next = match idle {
                Some(limit) if self.state.is_awaiting_customer() => {
                    match tokio::time::timeout(limit, stream.next()).await {
                        Ok(next) => next,
                        Err(_) => {
                            warn!(
                                state = %self.state,
                                idle_secs = limit.as_secs(),
                                "session timed out, cancelling"
                            );
                            steps.push(self.record(Action::CancelRequest));
                            continue;
                        }
                    }
                }
                _ => stream.next().await,
            };

            let Some(action) = next else { break };
            // a failed action does not stop the machine, it is only recorded
            steps.push(self.record(action));
        }

        steps
    }
}

impl Default for VendingMachine {
    fn default() -> Self {
        Self::new(Catalog::standard())
    }
}
