use serde::{Deserialize, Serialize};

use vending_core::{DomainError, DomainResult, Entity, MachineId};

/// A persisted vending machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendingMachine {
    pub id: MachineId,
    pub name: String,
    pub location: String,
}

impl Entity for VendingMachine {
    type Id = MachineId;

    fn id(&self) -> MachineId {
        self.id
    }
}

/// Validated input for creating a vending machine (not yet assigned an id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMachine {
    name: String,
    location: String,
}

impl NewMachine {
    /// Both fields must contain something other than whitespace. They are
    /// stored exactly as given.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        let location = location.into();
        if name.trim().is_empty() || location.trim().is_empty() {
            return Err(DomainError::validation("name and location are required"));
        }
        Ok(Self { name, location })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Attach the store-assigned id.
    pub fn into_machine(self, id: MachineId) -> VendingMachine {
        VendingMachine {
            id,
            name: self.name,
            location: self.location,
        }
    }
}
