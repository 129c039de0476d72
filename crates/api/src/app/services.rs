//! Service wiring: which record store backs the stock engine.

use vending_infra::{InMemoryRecordStore, Settings, SqliteRecordStore, StockEngine, StoreBackend, StoreError};

/// The stock engine over the configured backend.
///
/// An enum rather than a trait object: the engine is generic over its store,
/// and `with_engine!` monomorphises each handler call per backend.
#[derive(Debug)]
pub enum AppServices {
    InMemory(StockEngine<InMemoryRecordStore>),
    Sqlite(StockEngine<SqliteRecordStore>),
}

impl AppServices {
    pub fn in_memory() -> Self {
        AppServices::InMemory(StockEngine::new(InMemoryRecordStore::new()))
    }
}

/// Run `$body` with `$engine` bound to the concrete engine of `$services`.
macro_rules! with_engine {
    ($services:expr, |$engine:ident| $body:expr) => {
        match $services {
            $crate::app::services::AppServices::InMemory($engine) => $body,
            $crate::app::services::AppServices::Sqlite($engine) => $body,
        }
    };
}

pub(crate) use with_engine;

pub async fn build_services(settings: &Settings) -> Result<AppServices, StoreError> {
    match settings.store {
        StoreBackend::Memory => {
            tracing::warn!("using in-memory record store; data is lost on exit");
            Ok(AppServices::in_memory())
        }
        StoreBackend::Sqlite => {
            let store =
                SqliteRecordStore::connect(&settings.database_url, settings.max_connections).await?;
            tracing::info!(
                database_url = %settings.database_url,
                max_connections = settings.max_connections,
                "sqlite record store ready"
            );
            Ok(AppServices::Sqlite(StockEngine::new(store)))
        }
    }
}
