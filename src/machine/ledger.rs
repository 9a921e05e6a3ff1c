use crate::{Amount, Coin};

/// Coins inserted during the current transaction, in insertion order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Ledger {
    coins: Vec<Coin>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, coin: Coin) {
        self.coins.push(coin);
    }

    pub fn total(&self) -> Amount {
        self.coins.iter().copied().map(Coin::value).sum()
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Hand back every coin and leave the ledger empty.
    pub fn take(&mut self) -> Vec<Coin> {
        std::mem::take(&mut self.coins)
    }
}
