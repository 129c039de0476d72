//! Flat route names used by earlier clients of the service.
//!
//! Each alias is served by the same handler as its `/vending-machines/...`
//! counterpart.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::{items, machines};

pub fn router() -> Router {
    Router::new()
        .route("/get_vending_machines", get(machines::list_machines))
        .route("/create_item/:vm_id", post(items::create_item))
        .route("/add_item_stock/:vm_id/:item_id", put(items::add_stock))
        .route("/edit_item_stock/:vm_id/:item_id", put(items::set_stock))
        .route(
            "/remove_item_from_stock/:vm_id/:item_id",
            put(items::remove_stock),
        )
        .route(
            "/view_items_in_vending_machine/:vm_id",
            get(items::list_items),
        )
}
