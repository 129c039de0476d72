//! Record store boundary.
//!
//! Durable storage for vending machines and their items. The store performs no
//! validation; every read and write happens inside a unit of work (`StoreTx`)
//! that is either committed or rolled back as a whole.

pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

pub use in_memory::{InMemoryRecordStore, InMemoryTx};
pub use r#trait::{RecordStore, StoreError, StoreResult, StoreTx};
pub use sqlite::{SqliteRecordStore, SqliteTx};
