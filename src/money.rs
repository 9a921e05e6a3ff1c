use std::fmt;
use std::iter::Sum;

use thiserror::Error;

/// Cash value in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn new(value: u64) -> Self {
        Amount(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `None` when `rhs` is larger than `self`.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, amount| acc + amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoinError {
    #[error("unsupported coin denomination {0}")]
    UnsupportedDenomination(u32),
}

/// An accepted coin. Coins have no identity beyond their denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coin {
    One,
    Five,
    Ten,
}

impl Coin {
    pub const ACCEPTED: [Coin; 3] = [Coin::One, Coin::Five, Coin::Ten];

    pub fn denomination(self) -> u32 {
        match self {
            Coin::One => 1,
            Coin::Five => 5,
            Coin::Ten => 10,
        }
    }

    pub fn value(self) -> Amount {
        Amount::new(u64::from(self.denomination()))
    }
}

impl TryFrom<u32> for Coin {
    type Error = CoinError;

    fn try_from(denomination: u32) -> Result<Self, Self::Error> {
        Coin::ACCEPTED
            .into_iter()
            .find(|coin| coin.denomination() == denomination)
            .ok_or(CoinError::UnsupportedDenomination(denomination))
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.denomination())
    }
}
