//! SQLite-backed record store (single-file database).
//!
//! Tables are created on connect with `CREATE TABLE IF NOT EXISTS`; there is no
//! migration machinery. Foreign keys are enforced and deleting a machine
//! cascades to its items.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, Transaction};

use vending_core::{ItemId, MachineId};
use vending_inventory::{Item, NewItem, NewMachine, Price, VendingMachine};

use super::r#trait::{RecordStore, StoreError, StoreResult, StoreTx};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS vending_machine (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        name     TEXT NOT NULL,
        location TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS item (
        id                 INTEGER PRIMARY KEY AUTOINCREMENT,
        name               TEXT NOT NULL,
        price              REAL NOT NULL CHECK (price >= 0),
        quantity           INTEGER NOT NULL CHECK (quantity >= 0),
        vending_machine_id INTEGER NOT NULL
                           REFERENCES vending_machine(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_item_vending_machine_id ON item (vending_machine_id)",
];

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Unavailable(value.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) => {
                StoreError::Corrupt(value.to_string())
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// SQLite record store.
///
/// ## Thread Safety
///
/// Uses an SQLx connection pool (`Send + Sync`, cheap to clone). With the
/// default pool size of one connection, units of work are serialised at the
/// pool: a transaction owns the only connection until it commits or is
/// dropped. This is the single-writer discipline a single-file database wants
/// and it makes in-memory databases (`sqlite::memory:`) usable.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Open (creating if missing) the database at `url` and ensure the schema.
    ///
    /// In-memory databases always get a single connection: every pooled
    /// connection would otherwise open its own empty database.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let max_connections = pool_size(url, max_connections);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            // An in-memory database lives only as long as its connection.
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and ensure the schema.
    pub async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        tracing::debug!("sqlite schema ensured");
        Ok(Self { pool })
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn pool_size(url: &str, requested: u32) -> u32 {
    if is_in_memory(url) {
        if requested > 1 {
            tracing::warn!(requested, "in-memory sqlite database limited to one connection");
        }
        1
    } else {
        requested.max(1)
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    type Tx = SqliteTx;

    /// Takes the write lock up front, so concurrent read-modify-write units
    /// of work queue on the busy timeout instead of failing on upgrade.
    async fn begin(&self) -> StoreResult<SqliteTx> {
        let tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        Ok(SqliteTx { tx })
    }
}

/// Unit of work over [`SqliteRecordStore`]: an SQLx transaction, rolled back on drop.
pub struct SqliteTx {
    tx: Transaction<'static, Sqlite>,
}

fn machine_from_row(row: &SqliteRow) -> StoreResult<VendingMachine> {
    Ok(VendingMachine {
        id: MachineId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        location: row.try_get("location")?,
    })
}

fn item_from_row(row: &SqliteRow) -> StoreResult<Item> {
    let price: f64 = row.try_get("price")?;
    let price = Price::new(price).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    Ok(Item {
        id: ItemId::new(row.try_get("id")?),
        machine_id: MachineId::new(row.try_get("vending_machine_id")?),
        name: row.try_get("name")?,
        price,
        quantity: row.try_get("quantity")?,
    })
}

#[async_trait]
impl StoreTx for SqliteTx {
    async fn insert_machine(&mut self, machine: NewMachine) -> StoreResult<VendingMachine> {
        let result = sqlx::query("INSERT INTO vending_machine (name, location) VALUES (?1, ?2)")
            .bind(machine.name())
            .bind(machine.location())
            .execute(&mut *self.tx)
            .await?;
        Ok(machine.into_machine(MachineId::new(result.last_insert_rowid())))
    }

    async fn get_machine(&mut self, id: MachineId) -> StoreResult<Option<VendingMachine>> {
        let row = sqlx::query("SELECT id, name, location FROM vending_machine WHERE id = ?1")
            .bind(id.get())
            .fetch_optional(&mut *self.tx)
            .await?;
        row.as_ref().map(machine_from_row).transpose()
    }

    async fn list_machines(&mut self) -> StoreResult<Vec<VendingMachine>> {
        let rows = sqlx::query("SELECT id, name, location FROM vending_machine ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await?;
        rows.iter().map(machine_from_row).collect()
    }

    async fn delete_machine(&mut self, id: MachineId) -> StoreResult<bool> {
        // Explicit as well as ON DELETE CASCADE: databases created without
        // `foreign_keys` enabled would otherwise keep orphaned items.
        sqlx::query("DELETE FROM item WHERE vending_machine_id = ?1")
            .bind(id.get())
            .execute(&mut *self.tx)
            .await?;
        let result = sqlx::query("DELETE FROM vending_machine WHERE id = ?1")
            .bind(id.get())
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_item(&mut self, item: NewItem) -> StoreResult<Item> {
        let result = sqlx::query(
            r#"
            INSERT INTO item (name, price, quantity, vending_machine_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(item.name())
        .bind(item.price().get())
        .bind(item.quantity())
        .bind(item.machine_id().get())
        .execute(&mut *self.tx)
        .await?;
        Ok(item.into_item(ItemId::new(result.last_insert_rowid())))
    }

    async fn get_item(&mut self, id: ItemId) -> StoreResult<Option<Item>> {
        let row = sqlx::query(
            "SELECT id, name, price, quantity, vending_machine_id FROM item WHERE id = ?1",
        )
        .bind(id.get())
        .fetch_optional(&mut *self.tx)
        .await?;
        row.as_ref().map(item_from_row).transpose()
    }

    async fn list_items_by_machine(&mut self, machine_id: MachineId) -> StoreResult<Vec<Item>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price, quantity, vending_machine_id
            FROM item
            WHERE vending_machine_id = ?1
            ORDER BY id
            "#,
        )
        .bind(machine_id.get())
        .fetch_all(&mut *self.tx)
        .await?;
        rows.iter().map(item_from_row).collect()
    }

    async fn set_item_quantity(&mut self, id: ItemId, quantity: i64) -> StoreResult<()> {
        let result = sqlx::query("UPDATE item SET quantity = ?1 WHERE id = ?2")
            .bind(quantity)
            .bind(id.get())
            .execute(&mut *self.tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::Backend(format!("no item row with id {id}")));
        }
        Ok(())
    }

    async fn commit(self) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteRecordStore {
        SqliteRecordStore::connect("sqlite::memory:", 1).await.unwrap()
    }

    #[test]
    fn in_memory_urls_get_one_connection() {
        assert_eq!(pool_size("sqlite::memory:", 4), 1);
        assert_eq!(pool_size("sqlite://file:vending?mode=memory&cache=shared", 8), 1);
        assert_eq!(pool_size("sqlite://vending.sqlite", 4), 4);
        assert_eq!(pool_size("sqlite://vending.sqlite", 0), 1);
    }

    #[tokio::test]
    async fn in_memory_store_keeps_data_with_larger_pool_request() {
        let store = SqliteRecordStore::connect("sqlite::memory:", 4).await.unwrap();
        assert_eq!(store.pool.options().get_max_connections(), 1);

        let mut tx = store.begin().await.unwrap();
        tx.insert_machine(NewMachine::new("VM1", "Loc1").unwrap())
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.list_machines().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn insert_and_read_back() {
        let store = memory_store().await;
        let mut tx = store.begin().await.unwrap();
        let vm = tx
            .insert_machine(NewMachine::new("VM1", "Loc1").unwrap())
            .await
            .unwrap();
        let item = tx
            .insert_item(NewItem::new(vm.id, "Soda", 1.5, 5).unwrap())
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.get_machine(vm.id).await.unwrap(), Some(vm.clone()));
        assert_eq!(tx.get_item(item.id).await.unwrap(), Some(item.clone()));
        assert_eq!(tx.list_items_by_machine(vm.id).await.unwrap(), vec![item]);
        assert_eq!(vm.id, MachineId::new(1));
    }

    #[tokio::test]
    async fn dropped_tx_rolls_back() {
        let store = memory_store().await;
        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_machine(NewMachine::new("VM1", "Loc1").unwrap())
                .await
                .unwrap();
        }

        let mut tx = store.begin().await.unwrap();
        assert!(tx.list_machines().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_machine_cascades() {
        let store = memory_store().await;
        let mut tx = store.begin().await.unwrap();
        let vm = tx
            .insert_machine(NewMachine::new("VM1", "Loc1").unwrap())
            .await
            .unwrap();
        let item = tx
            .insert_item(NewItem::new(vm.id, "Soda", 1.5, 5).unwrap())
            .await
            .unwrap();
        assert!(tx.delete_machine(vm.id).await.unwrap());
        assert!(!tx.delete_machine(vm.id).await.unwrap());
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        assert!(tx.get_item(item.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn item_for_unknown_machine_violates_foreign_key() {
        let store = memory_store().await;
        let mut tx = store.begin().await.unwrap();
        let err = tx
            .insert_item(NewItem::new(MachineId::new(99), "Soda", 1.5, 5).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn check_constraint_refuses_negative_quantity() {
        let store = memory_store().await;
        let mut tx = store.begin().await.unwrap();
        let vm = tx
            .insert_machine(NewMachine::new("VM1", "Loc1").unwrap())
            .await
            .unwrap();
        let item = tx
            .insert_item(NewItem::new(vm.id, "Soda", 1.5, 5).unwrap())
            .await
            .unwrap();
        assert!(tx.set_item_quantity(item.id, -1).await.is_err());
    }
}
