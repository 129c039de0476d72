//! Vending inventory domain module.
//!
//! This crate contains business rules for vending machines and their stock,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod item;
pub mod machine;
pub mod stock;

pub use item::{Item, NewItem, Price};
pub use machine::{NewMachine, VendingMachine};
pub use stock::StockChange;
