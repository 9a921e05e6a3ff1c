//! Fixed mapping from product code to item.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::{Item, ProductCode};
use crate::Amount;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown product code {0}")]
    UnknownProductCode(ProductCode),
    #[error("duplicate product code {0}")]
    DuplicateCode(ProductCode),
    #[error("product {0} has a zero price")]
    ZeroPrice(ProductCode),
}

/// Read-only once handed to a [`VendingMachine`](crate::VendingMachine).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: BTreeMap<ProductCode, Item>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stock of a freshly installed machine: three slots of Coke priced 5
    /// followed by three slots of Soda priced 10.
    pub fn standard() -> Self {
        let items = (0..6)
            .map(|code| {
                let item = if code < 3 {
                    Item::new("Coke", Amount::new(5))
                } else {
                    Item::new("Soda", Amount::new(10))
                };
                (code, item)
            })
            .collect();
        Self { items }
    }

    pub fn insert(&mut self, code: ProductCode, item: Item) -> Result<(), CatalogError> {
        if item.price.is_zero() {
            return Err(CatalogError::ZeroPrice(code));
        }
        if self.items.contains_key(&code) {
            return Err(CatalogError::DuplicateCode(code));
        }
        self.items.insert(code, item);
        Ok(())
    }

    pub fn item(&self, code: ProductCode) -> Result<&Item, CatalogError> {
        self.items
            .get(&code)
            .ok_or(CatalogError::UnknownProductCode(code))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries ordered by product code.
    pub fn iter(&self) -> impl Iterator<Item = (ProductCode, &Item)> + '_ {
        self.items.iter().map(|(code, item)| (*code, item))
    }
}
