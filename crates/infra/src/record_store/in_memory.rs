use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use vending_core::{ItemId, MachineId};
use vending_inventory::{Item, NewItem, NewMachine, VendingMachine};

use super::r#trait::{RecordStore, StoreError, StoreResult, StoreTx};

#[derive(Debug, Clone, Default)]
struct Tables {
    machines: BTreeMap<MachineId, VendingMachine>,
    items: BTreeMap<ItemId, Item>,
    last_machine_id: i64,
    last_item_id: i64,
}

/// In-memory record store.
///
/// Intended for tests/dev. A transaction holds the table lock for its whole
/// lifetime, so units of work are fully serialised. Writes go to a staged copy
/// that replaces the tables on commit.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    type Tx = InMemoryTx;

    async fn begin(&self) -> StoreResult<InMemoryTx> {
        let guard = self.tables.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(InMemoryTx { guard, staged })
    }
}

/// Unit of work over [`InMemoryRecordStore`]. Dropping it discards `staged`.
#[derive(Debug)]
pub struct InMemoryTx {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
}

#[async_trait]
impl StoreTx for InMemoryTx {
    async fn insert_machine(&mut self, machine: NewMachine) -> StoreResult<VendingMachine> {
        self.staged.last_machine_id += 1;
        let machine = machine.into_machine(MachineId::new(self.staged.last_machine_id));
        self.staged.machines.insert(machine.id, machine.clone());
        Ok(machine)
    }

    async fn get_machine(&mut self, id: MachineId) -> StoreResult<Option<VendingMachine>> {
        Ok(self.staged.machines.get(&id).cloned())
    }

    async fn list_machines(&mut self) -> StoreResult<Vec<VendingMachine>> {
        Ok(self.staged.machines.values().cloned().collect())
    }

    async fn delete_machine(&mut self, id: MachineId) -> StoreResult<bool> {
        if self.staged.machines.remove(&id).is_none() {
            return Ok(false);
        }
        self.staged.items.retain(|_, item| item.machine_id != id);
        Ok(true)
    }

    async fn insert_item(&mut self, item: NewItem) -> StoreResult<Item> {
        if !self.staged.machines.contains_key(&item.machine_id()) {
            return Err(StoreError::Backend(format!(
                "foreign key violation: vending machine {} does not exist",
                item.machine_id()
            )));
        }
        self.staged.last_item_id += 1;
        let item = item.into_item(ItemId::new(self.staged.last_item_id));
        self.staged.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_item(&mut self, id: ItemId) -> StoreResult<Option<Item>> {
        Ok(self.staged.items.get(&id).cloned())
    }

    async fn list_items_by_machine(&mut self, machine_id: MachineId) -> StoreResult<Vec<Item>> {
        Ok(self
            .staged
            .items
            .values()
            .filter(|item| item.machine_id == machine_id)
            .cloned()
            .collect())
    }

    async fn set_item_quantity(&mut self, id: ItemId, quantity: i64) -> StoreResult<()> {
        if quantity < 0 {
            return Err(StoreError::Backend(format!(
                "check constraint failed: quantity {quantity} < 0"
            )));
        }
        match self.staged.items.get_mut(&id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(())
            }
            None => Err(StoreError::Backend(format!("no item row with id {id}"))),
        }
    }

    async fn commit(self) -> StoreResult<()> {
        let InMemoryTx { mut guard, staged } = self;
        *guard = staged;
        Ok(())
    }
}
