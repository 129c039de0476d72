use serde::{Deserialize, Serialize};

use vending_core::{DomainError, DomainResult, Entity, ItemId, MachineId, ValueObject};

/// Unit price of an item. Always finite and non-negative.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(DomainError::validation("price must be a non-negative number"));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl ValueObject for Price {}

impl TryFrom<f64> for Price {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Price::new(value)
    }
}

impl From<Price> for f64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

/// A persisted item, owned by exactly one vending machine for its whole life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub machine_id: MachineId,
    pub name: String,
    pub price: Price,
    pub quantity: i64,
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }
}

/// Validated input for creating an item under a machine.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    machine_id: MachineId,
    name: String,
    price: Price,
    quantity: i64,
}

impl NewItem {
    pub fn new(
        machine_id: MachineId,
        name: impl Into<String>,
        price: f64,
        quantity: i64,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        let price = Price::new(price)?;
        if quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        Ok(Self {
            machine_id,
            name,
            price,
            quantity,
        })
    }

    pub fn machine_id(&self) -> MachineId {
        self.machine_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Attach the store-assigned id.
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            machine_id: self.machine_id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
        }
    }
}
