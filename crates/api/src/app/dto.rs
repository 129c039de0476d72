use serde::{Deserialize, Serialize};

use vending_core::{ItemId, MachineId};
use vending_inventory::{Item, VendingMachine};

// -------------------------
// Request DTOs
// -------------------------
//
// Every field is optional so that a missing field surfaces as a validation
// error from the handler rather than as a deserialization rejection.

#[derive(Debug, Default, Deserialize)]
pub struct CreateMachineRequest {
    pub name: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateItemRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

/// Body of add/set/remove stock requests.
#[derive(Debug, Default, Deserialize)]
pub struct StockRequest {
    pub quantity: Option<i64>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineView {
    pub id: MachineId,
    pub name: String,
    pub location: String,
}

impl From<VendingMachine> for MachineView {
    fn from(vm: VendingMachine) -> Self {
        Self {
            id: vm.id,
            name: vm.name,
            location: vm.location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

impl From<Item> for ItemView {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price.get(),
            quantity: item.quantity,
        }
    }
}
