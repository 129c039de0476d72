use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use vending_core::{ItemId, MachineId};
use vending_inventory::{Item, NewItem, NewMachine, VendingMachine};

pub type StoreResult<T> = Result<T, StoreError>;

/// Record store operation error.
///
/// These are **infrastructure errors** (driver failures, unreadable rows,
/// exhausted pools) as opposed to domain errors (validation, stock invariants).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("stored record is corrupt: {0}")]
    Corrupt(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Factory for units of work against the record store.
///
/// ## Unit of work
///
/// `begin()` hands out a `StoreTx`. All reads and writes go through it and
/// become visible to other units of work only after `commit()`. Dropping a
/// transaction without committing discards its writes, so early returns (`?`)
/// and cancelled futures never leave partial mutations behind.
///
/// ## Isolation
///
/// Implementations must guarantee that a read of an item's quantity and the
/// following write of its new quantity are not interleaved with another
/// mutation of the same item.
#[async_trait]
pub trait RecordStore: Send + Sync {
    type Tx: StoreTx;

    async fn begin(&self) -> StoreResult<Self::Tx>;
}

#[async_trait]
impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    type Tx = S::Tx;

    async fn begin(&self) -> StoreResult<Self::Tx> {
        (**self).begin().await
    }
}

/// A single unit of work. Ids are assigned by the store on insert.
#[async_trait]
pub trait StoreTx: Send {
    async fn insert_machine(&mut self, machine: NewMachine) -> StoreResult<VendingMachine>;

    async fn get_machine(&mut self, id: MachineId) -> StoreResult<Option<VendingMachine>>;

    /// All machines, ascending by id.
    async fn list_machines(&mut self) -> StoreResult<Vec<VendingMachine>>;

    /// Remove a machine together with every item it owns.
    ///
    /// Returns `false` if no such machine existed.
    async fn delete_machine(&mut self, id: MachineId) -> StoreResult<bool>;

    async fn insert_item(&mut self, item: NewItem) -> StoreResult<Item>;

    async fn get_item(&mut self, id: ItemId) -> StoreResult<Option<Item>>;

    /// Items owned by one machine, ascending by id.
    async fn list_items_by_machine(&mut self, machine_id: MachineId) -> StoreResult<Vec<Item>>;

    async fn set_item_quantity(&mut self, id: ItemId, quantity: i64) -> StoreResult<()>;

    async fn commit(self) -> StoreResult<()>;
}
