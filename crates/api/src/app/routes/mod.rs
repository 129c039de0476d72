use axum::{
    routing::{delete, get, put},
    Router,
};

pub mod items;
pub mod legacy;
pub mod machines;
pub mod system;

/// Router for all vending endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route(
            "/vending-machines",
            get(machines::list_machines).post(machines::create_machine),
        )
        .route("/vending-machines/:vm_id", delete(machines::delete_machine))
        .route(
            "/vending-machines/:vm_id/items",
            get(items::list_items).post(items::create_item),
        )
        .route(
            "/vending-machines/:vm_id/items/:item_id/stock",
            put(items::set_stock),
        )
        .route(
            "/vending-machines/:vm_id/items/:item_id/stock/add",
            put(items::add_stock),
        )
        .route(
            "/vending-machines/:vm_id/items/:item_id/stock/remove",
            put(items::remove_stock),
        )
        .merge(legacy::router())
}
