//! Stock engine (application-level orchestration).
//!
//! Every operation runs as one unit of work against the record store:
//!
//! ```text
//! Request
//!   ↓
//! 1. Validate input (pure domain constructors, no IO)
//!   ↓
//! 2. Begin a store transaction
//!   ↓
//! 3. Read current state (machine, item)
//!   ↓
//! 4. Decide (domain rules in `vending-inventory`)
//!   ↓
//! 5. Write + commit
//! ```
//!
//! Any failure between 2 and 5 returns early and drops the transaction, which
//! rolls it back. A rejected stock change is therefore never observable.

use thiserror::Error;
use tracing::{info, instrument, warn};

use vending_core::{DomainError, ItemId, MachineId};
use vending_inventory::{Item, NewItem, NewMachine, StockChange, VendingMachine};

use crate::record_store::{RecordStore, StoreError, StoreTx};

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Deterministic business failure (validation, missing record, stock rule).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The record store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            EngineError::Domain(e) => Some(e),
            EngineError::Store(_) => None,
        }
    }
}

/// Domain operations over vending machines and their stock.
///
/// ## Generic Parameters
///
/// - `S`: record store implementation (`InMemoryRecordStore` in tests,
///   `SqliteRecordStore` in production, or an `Arc` of either)
#[derive(Debug)]
pub struct StockEngine<S> {
    store: S,
}

impl<S> StockEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> StockEngine<S>
where
    S: RecordStore,
{
    #[instrument(skip(self))]
    pub async fn create_machine(&self, name: &str, location: &str) -> EngineResult<VendingMachine> {
        let new = NewMachine::new(name, location)?;

        let mut tx = self.store.begin().await?;
        let machine = tx.insert_machine(new).await?;
        tx.commit().await?;

        info!(machine_id = %machine.id, "vending machine created");
        Ok(machine)
    }

    /// Delete a machine and every item it owns.
    #[instrument(skip(self))]
    pub async fn delete_machine(&self, id: MachineId) -> EngineResult<()> {
        let mut tx = self.store.begin().await?;
        let items = tx.list_items_by_machine(id).await?.len();
        if !tx.delete_machine(id).await? {
            return Err(DomainError::not_found("vending machine").into());
        }
        tx.commit().await?;

        info!(machine_id = %id, items_removed = items, "vending machine deleted");
        Ok(())
    }

    #[instrument(skip(self, name))]
    pub async fn create_item(
        &self,
        machine_id: MachineId,
        name: &str,
        price: f64,
        quantity: i64,
    ) -> EngineResult<Item> {
        let new = NewItem::new(machine_id, name, price, quantity)?;

        let mut tx = self.store.begin().await?;
        require_machine(&mut tx, machine_id).await?;
        let item = tx.insert_item(new).await?;
        tx.commit().await?;

        info!(machine_id = %machine_id, item_id = %item.id, quantity, "item created");
        Ok(item)
    }

    pub async fn add_stock(&self, machine_id: MachineId, item_id: ItemId, quantity: i64) -> EngineResult<Item> {
        self.change_stock(machine_id, item_id, StockChange::Add(quantity))
            .await
    }

    pub async fn set_stock(&self, machine_id: MachineId, item_id: ItemId, quantity: i64) -> EngineResult<Item> {
        self.change_stock(machine_id, item_id, StockChange::Set(quantity))
            .await
    }

    pub async fn remove_stock(&self, machine_id: MachineId, item_id: ItemId, quantity: i64) -> EngineResult<Item> {
        self.change_stock(machine_id, item_id, StockChange::Remove(quantity))
            .await
    }

    /// Read-modify-write of one item's quantity inside a single transaction.
    #[instrument(skip(self))]
    pub async fn change_stock(
        &self,
        machine_id: MachineId,
        item_id: ItemId,
        change: StockChange,
    ) -> EngineResult<Item> {
        let mut tx = self.store.begin().await?;
        require_machine(&mut tx, machine_id).await?;
        let mut item = require_item(&mut tx, machine_id, item_id).await?;

        let next = match change.apply(item.quantity) {
            Ok(next) => next,
            Err(e) => {
                warn!(quantity = item.quantity, error = %e, "stock change rejected");
                return Err(e.into());
            }
        };

        tx.set_item_quantity(item_id, next).await?;
        tx.commit().await?;

        info!(before = item.quantity, after = next, "stock changed");
        item.quantity = next;
        Ok(item)
    }

    /// Items of one machine in ascending id order.
    #[instrument(skip(self))]
    pub async fn list_items_for_machine(&self, machine_id: MachineId) -> EngineResult<Vec<Item>> {
        let mut tx = self.store.begin().await?;
        require_machine(&mut tx, machine_id).await?;
        let items = tx.list_items_by_machine(machine_id).await?;
        tx.commit().await?;
        Ok(items)
    }

    /// All machines; an empty list is a normal result.
    #[instrument(skip(self))]
    pub async fn list_machines(&self) -> EngineResult<Vec<VendingMachine>> {
        let mut tx = self.store.begin().await?;
        let machines = tx.list_machines().await?;
        tx.commit().await?;
        Ok(machines)
    }
}

async fn require_machine<T: StoreTx>(tx: &mut T, id: MachineId) -> EngineResult<VendingMachine> {
    tx.get_machine(id)
        .await?
        .ok_or_else(|| DomainError::not_found("vending machine").into())
}

/// An item stocked in a different machine counts as missing.
async fn require_item<T: StoreTx>(tx: &mut T, machine_id: MachineId, id: ItemId) -> EngineResult<Item> {
    tx.get_item(id)
        .await?
        .filter(|item| item.machine_id == machine_id)
        .ok_or_else(|| DomainError::not_found("item").into())
}
