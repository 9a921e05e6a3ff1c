//! Transition table of the vending machine.
//!
//! Every action is one exhaustive match over [`MachineState`]. An action the
//! current state does not list is rejected before anything is touched, so a
//! rejected call never leaves a partial transition behind.

use std::fmt;

use super::error::{ActionRejected, MachineError};
use super::ledger::Ledger;
use crate::catalog::Catalog;
use crate::model::{ActionKind, Item, ProductCode, SelectOutcome};
use crate::{Amount, Coin};

/// The single active state of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MachineState {
    #[default]
    Idle,
    AcceptingCoin,
    ProductSelection,
    /// Holds the product chosen in `ProductSelection`; collected without re-selecting.
    Dispensing { code: ProductCode },
}

/// State to install next, plus what the action hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<T> {
    pub next: MachineState,
    pub output: T,
}

impl<T> Transition<T> {
    fn new(next: MachineState, output: T) -> Self {
        Self { next, output }
    }
}

impl MachineState {
    pub fn name(&self) -> &'static str {
        match self {
            MachineState::Idle => "Idle",
            MachineState::AcceptingCoin => "AcceptingCoin",
            MachineState::ProductSelection => "ProductSelection",
            MachineState::Dispensing { .. } => "Dispensing",
        }
    }

    /// States in the middle of a paid transaction, where the customer can still cancel.
    pub fn is_awaiting_customer(&self) -> bool {
        matches!(
            self,
            MachineState::AcceptingCoin | MachineState::ProductSelection
        )
    }

    fn reject(self, action: ActionKind) -> ActionRejected {
        ActionRejected {
            action,
            state: self,
        }
    }

    pub fn press_insert_coin_button(self) -> Result<Transition<()>, ActionRejected> {
        match self {
            MachineState::Idle => Ok(Transition::new(MachineState::AcceptingCoin, ())),
            MachineState::AcceptingCoin
            | MachineState::ProductSelection
            | MachineState::Dispensing { .. } => {
                Err(self.reject(ActionKind::PressInsertCoinButton))
            }
        }
    }

    /// Returns the ledger total after the coin was added.
    pub fn insert_coin(
        self,
        ledger: &mut Ledger,
        coin: Coin,
    ) -> Result<Transition<Amount>, ActionRejected> {
        match self {
            MachineState::AcceptingCoin => {
                ledger.push(coin);
                Ok(Transition::new(self, ledger.total()))
            }
            MachineState::Idle
            | MachineState::ProductSelection
            | MachineState::Dispensing { .. } => Err(self.reject(ActionKind::InsertCoin)),
        }
    }

    pub fn press_select_product_button(self) -> Result<Transition<()>, ActionRejected> {
        match self {
            MachineState::AcceptingCoin => {
                Ok(Transition::new(MachineState::ProductSelection, ()))
            }
            MachineState::Idle
            | MachineState::ProductSelection
            | MachineState::Dispensing { .. } => {
                Err(self.reject(ActionKind::PressSelectProductButton))
            }
        }
    }

    /// Settle payment for `code`:
    /// - Unknown code fails before the ledger is touched
    /// - Underpayment refunds the whole ledger and returns to `Idle`
    /// - Otherwise the ledger is consumed and the machine moves to `Dispensing`
    pub fn select_product(
        self,
        ledger: &mut Ledger,
        catalog: &Catalog,
        code: ProductCode,
    ) -> Result<Transition<SelectOutcome>, MachineError> {
        match self {
            MachineState::ProductSelection => {
                let price = catalog.item(code)?.price;
                let paid = ledger.total();

                match paid.checked_sub(price) {
                    None => {
                        let refund = ledger.take();
                        Ok(Transition::new(
                            MachineState::Idle,
                            SelectOutcome::InsufficientFunds {
                                price,
                                paid,
                                refund,
                            },
                        ))
                    }
                    Some(change) => {
                        // the payment is fully consumed, nothing carries into Dispensing
                        ledger.take();
                        Ok(Transition::new(
                            MachineState::Dispensing { code },
                            SelectOutcome::Dispensing { change },
                        ))
                    }
                }
            }
            MachineState::Idle | MachineState::AcceptingCoin | MachineState::Dispensing { .. } => {
                Err(self.reject(ActionKind::SelectProduct).into())
            }
        }
    }

    pub fn collect_product(self, catalog: &Catalog) -> Result<Transition<Item>, MachineError> {
        match self {
            MachineState::Dispensing { code } => {
                let item = catalog.item(code)?.clone();
                Ok(Transition::new(MachineState::Idle, item))
            }
            MachineState::Idle | MachineState::AcceptingCoin | MachineState::ProductSelection => {
                Err(self.reject(ActionKind::CollectProduct).into())
            }
        }
    }

    pub fn cancel_request(self, ledger: &mut Ledger) -> Result<Transition<Vec<Coin>>, ActionRejected> {
        match self {
            MachineState::AcceptingCoin | MachineState::ProductSelection => {
                Ok(Transition::new(MachineState::Idle, ledger.take()))
            }
            MachineState::Idle | MachineState::Dispensing { .. } => {
                Err(self.reject(ActionKind::CancelRequest))
            }
        }
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;

    const ALL: [MachineState; 4] = [
        MachineState::Idle,
        MachineState::AcceptingCoin,
        MachineState::ProductSelection,
        MachineState::Dispensing { code: 0 },
    ];

    fn ledger_of(coins: &[Coin]) -> Ledger {
        let mut ledger = Ledger::new();
        for coin in coins {
            ledger.push(*coin);
        }
        ledger
    }

    #[test]
    fn initial_state_is_idle() {
        assert_eq!(MachineState::default(), MachineState::Idle);
    }

    #[test]
    fn idle_moves_to_accepting_coin() {
        let transition = MachineState::Idle.press_insert_coin_button().unwrap();
        assert_eq!(transition.next, MachineState::AcceptingCoin);
    }

    #[test]
    fn insert_coin_stays_in_accepting_coin() {
        let mut ledger = Ledger::new();
        let transition = MachineState::AcceptingCoin
            .insert_coin(&mut ledger, Coin::Five)
            .unwrap();
        assert_eq!(transition.next, MachineState::AcceptingCoin);
        assert_eq!(transition.output, Amount::new(5));
        assert_eq!(ledger.coins(), &[Coin::Five]);
    }

    #[test]
    fn press_select_moves_to_product_selection() {
        let transition = MachineState::AcceptingCoin
            .press_select_product_button()
            .unwrap();
        assert_eq!(transition.next, MachineState::ProductSelection);
    }

    #[test]
    fn cancel_refunds_from_both_paid_states() {
        for state in [MachineState::AcceptingCoin, MachineState::ProductSelection] {
            let mut ledger = ledger_of(&[Coin::Five, Coin::One]);
            let transition = state.cancel_request(&mut ledger).unwrap();
            assert_eq!(transition.next, MachineState::Idle);
            assert_eq!(transition.output, vec![Coin::Five, Coin::One]);
            assert!(ledger.is_empty());
        }
    }

    #[test]
    fn select_with_enough_money_binds_code() {
        let catalog = Catalog::standard();
        let mut ledger = ledger_of(&[Coin::Ten]);
        let transition = MachineState::ProductSelection
            .select_product(&mut ledger, &catalog, 1)
            .unwrap();

        assert_eq!(transition.next, MachineState::Dispensing { code: 1 });
        assert_eq!(
            transition.output,
            SelectOutcome::Dispensing {
                change: Amount::new(5)
            }
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn select_with_too_little_money_refunds() {
        let catalog = Catalog::standard();
        let mut ledger = ledger_of(&[Coin::Five]);
        let transition = MachineState::ProductSelection
            .select_product(&mut ledger, &catalog, 3)
            .unwrap();

        assert_eq!(transition.next, MachineState::Idle);
        assert_eq!(
            transition.output,
            SelectOutcome::InsufficientFunds {
                price: Amount::new(10),
                paid: Amount::new(5),
                refund: vec![Coin::Five],
            }
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn select_unknown_code_leaves_ledger_alone() {
        let catalog = Catalog::standard();
        let mut ledger = ledger_of(&[Coin::Ten]);
        let result = MachineState::ProductSelection.select_product(&mut ledger, &catalog, 99);

        assert_eq!(
            result,
            Err(MachineError::Catalog(CatalogError::UnknownProductCode(99)))
        );
        assert_eq!(ledger.coins(), &[Coin::Ten]);
    }

    #[test]
    fn collect_returns_bound_item() {
        let catalog = Catalog::standard();
        let transition = MachineState::Dispensing { code: 4 }
            .collect_product(&catalog)
            .unwrap();

        assert_eq!(transition.next, MachineState::Idle);
        assert_eq!(transition.output.name, "Soda");
    }

    #[test]
    fn unlisted_actions_are_rejected_without_mutation() {
        let catalog = Catalog::standard();

        for state in ALL {
            let mut ledger = ledger_of(&[Coin::Five]);
            let before = ledger.clone();

            if state != MachineState::Idle {
                assert_eq!(
                    state.press_insert_coin_button(),
                    Err(ActionRejected {
                        action: ActionKind::PressInsertCoinButton,
                        state
                    })
                );
            }
            if state != MachineState::AcceptingCoin {
                assert!(state.insert_coin(&mut ledger, Coin::Ten).is_err());
                assert!(state.press_select_product_button().is_err());
            }
            if state != MachineState::ProductSelection {
                assert!(matches!(
                    state.select_product(&mut ledger, &catalog, 0),
                    Err(MachineError::Rejected(_))
                ));
            }
            if !matches!(state, MachineState::Dispensing { .. }) {
                assert!(matches!(
                    state.collect_product(&catalog),
                    Err(MachineError::Rejected(_))
                ));
            }
            if !state.is_awaiting_customer() {
                assert!(state.cancel_request(&mut ledger).is_err());
            }

            assert_eq!(ledger, before);
        }
    }

    #[test]
    fn rejection_message_names_action_and_state() {
        let err = MachineState::Idle.cancel_request(&mut Ledger::new()).unwrap_err();
        assert_eq!(err.to_string(), "cancel not supported in Idle state");
    }
}
