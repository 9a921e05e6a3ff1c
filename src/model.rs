//! Core domain types for the vending machine.

use std::fmt;

use crate::{Amount, Coin};

/// Product code, unique within a [`Catalog`](crate::Catalog).
pub type ProductCode = u32;

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub price: Amount,
}

impl Item {
    pub fn new(name: impl Into<String>, price: Amount) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// A customer action, the possible inputs of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PressInsertCoinButton,
    InsertCoin(Coin),
    PressSelectProductButton,
    SelectProduct(ProductCode),
    /// Collect the product bound at selection time.
    CollectProduct,
    CancelRequest,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::PressInsertCoinButton => ActionKind::PressInsertCoinButton,
            Action::InsertCoin(_) => ActionKind::InsertCoin,
            Action::PressSelectProductButton => ActionKind::PressSelectProductButton,
            Action::SelectProduct(_) => ActionKind::SelectProduct,
            Action::CollectProduct => ActionKind::CollectProduct,
            Action::CancelRequest => ActionKind::CancelRequest,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::InsertCoin(coin) => write!(f, "{} {coin}", self.kind()),
            Action::SelectProduct(code) => write!(f, "{} {code}", self.kind()),
            _ => write!(f, "{}", self.kind()),
        }
    }
}

/// Payload-free action tag, used in rejections and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    PressInsertCoinButton,
    InsertCoin,
    PressSelectProductButton,
    SelectProduct,
    CollectProduct,
    CancelRequest,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::PressInsertCoinButton => "press_insert_coin",
            ActionKind::InsertCoin => "insert_coin",
            ActionKind::PressSelectProductButton => "press_select_product",
            ActionKind::SelectProduct => "select_product",
            ActionKind::CollectProduct => "collect_product",
            ActionKind::CancelRequest => "cancel",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a product selection that was accepted by the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Paid less than the price; every inserted coin is handed back.
    InsufficientFunds {
        price: Amount,
        paid: Amount,
        refund: Vec<Coin>,
    },
    /// Payment consumed, machine now holds the product.
    Dispensing { change: Amount },
}

/// What a successfully applied action produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed, nothing handed out.
    Accepted,
    CoinInserted { total: Amount },
    Selected(SelectOutcome),
    Dispensed(Item),
    Refunded(Vec<Coin>),
}

fn join_coins(coins: &[Coin]) -> String {
    coins
        .iter()
        .map(Coin::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Accepted => f.write_str("accepted"),
            Outcome::CoinInserted { total } => write!(f, "inserted, total {total}"),
            Outcome::Selected(SelectOutcome::InsufficientFunds { price, paid, refund }) => write!(
                f,
                "insufficient funds (paid {paid}, price {price}), refunded [{}]",
                join_coins(refund)
            ),
            Outcome::Selected(SelectOutcome::Dispensing { change }) => {
                write!(f, "dispensing, change {change}")
            }
            Outcome::Dispensed(item) => write!(f, "dispensed {}", item.name),
            Outcome::Refunded(coins) => write!(f, "refunded [{}]", join_coins(coins)),
        }
    }
}
