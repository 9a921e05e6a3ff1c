pub mod catalog;
pub mod csv;
pub mod machine;
pub mod model;
pub mod money;

pub use catalog::Catalog;
pub use machine::VendingMachine;
pub use model::{Action, Item, Outcome, ProductCode, SelectOutcome};
pub use money::{Amount, Coin};
