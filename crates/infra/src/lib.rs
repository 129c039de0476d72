//! Infrastructure layer: record storage, the stock engine, configuration.

pub mod config;
pub mod record_store;
pub mod stock_engine;

pub use config::{ConfigError, Settings, StoreBackend};
pub use record_store::{InMemoryRecordStore, RecordStore, SqliteRecordStore, StoreError, StoreTx};
pub use stock_engine::{EngineError, EngineResult, StockEngine};
