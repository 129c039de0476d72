//! Request handlers: decode a typed request, call the stock engine, map the
//! result to an [`Outcome`]. No business rules live here.
//!
//! Handlers are generic over the record store so they can be exercised
//! without HTTP (see the tests below) and wired to any backend by `routes`.

use vending_core::{ItemId, MachineId};
use vending_infra::{RecordStore, StockEngine};
use vending_inventory::StockChange;

use crate::app::dto::{
    CreateItemRequest, CreateMachineRequest, ItemView, MachineView, StockRequest,
};
use crate::app::outcome::Outcome;

pub const MACHINE_CREATED: &str = "Vending Machine created successfully";
pub const MACHINE_DELETED: &str = "Vending Machine deleted successfully";
pub const ITEM_CREATED: &str = "Item created successfully";
pub const STOCK_ADDED: &str = "Item stock added successfully";
pub const STOCK_UPDATED: &str = "Item stock updated successfully";
pub const STOCK_REMOVED: &str = "Item removed from stock";

pub async fn create_machine<S: RecordStore>(
    engine: &StockEngine<S>,
    req: CreateMachineRequest,
) -> Outcome {
    let (Some(name), Some(location)) = (req.name, req.location) else {
        return Outcome::validation("Name and location are required");
    };

    match engine.create_machine(&name, &location).await {
        Ok(vm) => Outcome::created(MACHINE_CREATED, vm.id),
        Err(e) => e.into(),
    }
}

pub async fn delete_machine<S: RecordStore>(engine: &StockEngine<S>, id: MachineId) -> Outcome {
    match engine.delete_machine(id).await {
        Ok(()) => Outcome::ok(MACHINE_DELETED),
        Err(e) => e.into(),
    }
}

pub async fn create_item<S: RecordStore>(
    engine: &StockEngine<S>,
    machine_id: MachineId,
    req: CreateItemRequest,
) -> Outcome {
    let (Some(name), Some(price), Some(quantity)) = (req.name, req.price, req.quantity) else {
        return Outcome::validation("Missing required parameters: name, price, quantity");
    };

    match engine.create_item(machine_id, &name, price, quantity).await {
        Ok(item) => Outcome::created(ITEM_CREATED, item.id),
        Err(e) => e.into(),
    }
}

pub async fn add_stock<S: RecordStore>(
    engine: &StockEngine<S>,
    machine_id: MachineId,
    item_id: ItemId,
    req: StockRequest,
) -> Outcome {
    change_stock(engine, machine_id, item_id, req, StockChange::Add, STOCK_ADDED).await
}

pub async fn set_stock<S: RecordStore>(
    engine: &StockEngine<S>,
    machine_id: MachineId,
    item_id: ItemId,
    req: StockRequest,
) -> Outcome {
    change_stock(engine, machine_id, item_id, req, StockChange::Set, STOCK_UPDATED).await
}

pub async fn remove_stock<S: RecordStore>(
    engine: &StockEngine<S>,
    machine_id: MachineId,
    item_id: ItemId,
    req: StockRequest,
) -> Outcome {
    change_stock(engine, machine_id, item_id, req, StockChange::Remove, STOCK_REMOVED).await
}

async fn change_stock<S: RecordStore>(
    engine: &StockEngine<S>,
    machine_id: MachineId,
    item_id: ItemId,
    req: StockRequest,
    make_change: fn(i64) -> StockChange,
    message: &str,
) -> Outcome {
    let Some(quantity) = req.quantity else {
        return Outcome::validation("Missing required parameter: quantity");
    };

    match engine
        .change_stock(machine_id, item_id, make_change(quantity))
        .await
    {
        Ok(item) => {
            let mut out = Outcome::ok(message);
            out.body["id"] = item.id.get().into();
            out.body["quantity"] = item.quantity.into();
            out
        }
        Err(e) => e.into(),
    }
}

pub async fn list_items<S: RecordStore>(engine: &StockEngine<S>, machine_id: MachineId) -> Outcome {
    match engine.list_items_for_machine(machine_id).await {
        Ok(items) => Outcome::list(items.into_iter().map(ItemView::from).collect()),
        Err(e) => e.into(),
    }
}

pub async fn list_machines<S: RecordStore>(engine: &StockEngine<S>) -> Outcome {
    match engine.list_machines().await {
        Ok(machines) => Outcome::list(machines.into_iter().map(MachineView::from).collect()),
        Err(e) => e.into(),
    }
}
