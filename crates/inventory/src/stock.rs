//! Stock arithmetic.
//!
//! Every change is computed against the current quantity and either yields the
//! new quantity or a typed rejection. Nothing here mutates state; callers write
//! the returned value back inside their unit of work.

use vending_core::{DomainError, DomainResult};

/// A requested change to an item's stock level.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StockChange {
    /// Increase stock by the given amount.
    Add(i64),
    /// Overwrite stock with the given amount.
    Set(i64),
    /// Decrease stock by the given amount; fails if not enough units remain.
    Remove(i64),
}

impl StockChange {
    pub fn amount(self) -> i64 {
        match self {
            StockChange::Add(n) | StockChange::Set(n) | StockChange::Remove(n) => n,
        }
    }

    pub fn kind(self) -> &'static str {
        match self {
            StockChange::Add(_) => "add",
            StockChange::Set(_) => "set",
            StockChange::Remove(_) => "remove",
        }
    }

    /// Compute the quantity that results from applying this change to `current`.
    ///
    /// The result is always `>= 0`.
    pub fn apply(self, current: i64) -> DomainResult<i64> {
        let amount = self.amount();
        if amount < 0 {
            return Err(DomainError::invalid_quantity(format!(
                "{} quantity cannot be negative",
                self.kind()
            )));
        }

        let next = match self {
            StockChange::Add(n) => current
                .checked_add(n)
                .ok_or_else(|| DomainError::invalid_quantity("stock level overflow"))?,
            StockChange::Set(n) => n,
            StockChange::Remove(n) => {
                let next = current - n;
                if next < 0 {
                    return Err(DomainError::insufficient_stock(current, n));
                }
                next
            }
        };

        if next < 0 {
            return Err(DomainError::invalid_quantity("stock cannot go negative"));
        }
        Ok(next)
    }
}
