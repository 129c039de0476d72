use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path,
    },
    Json,
};

use vending_core::{ItemId, MachineId};

use crate::app::outcome::Outcome;
use crate::app::services::{with_engine, AppServices};
use crate::app::{dto, errors, handlers};

type StockPath = Result<Path<(MachineId, ItemId)>, PathRejection>;
type StockBody = Result<Json<dto::StockRequest>, JsonRejection>;

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    path: Result<Path<MachineId>, PathRejection>,
    body: Result<Json<dto::CreateItemRequest>, JsonRejection>,
) -> Outcome {
    let vm_id = match path {
        Ok(Path(id)) => id,
        Err(e) => return errors::path_rejection(e),
    };
    let body = match body {
        Ok(Json(body)) => body,
        Err(e) => return errors::json_rejection(e),
    };
    with_engine!(&*services, |engine| handlers::create_item(engine, vm_id, body).await)
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    path: Result<Path<MachineId>, PathRejection>,
) -> Outcome {
    let vm_id = match path {
        Ok(Path(id)) => id,
        Err(e) => return errors::path_rejection(e),
    };
    with_engine!(&*services, |engine| handlers::list_items(engine, vm_id).await)
}

fn stock_args(path: StockPath, body: StockBody) -> Result<(MachineId, ItemId, dto::StockRequest), Outcome> {
    let Path((vm_id, item_id)) = path.map_err(errors::path_rejection)?;
    let Json(body) = body.map_err(errors::json_rejection)?;
    Ok((vm_id, item_id, body))
}

pub async fn add_stock(
    Extension(services): Extension<Arc<AppServices>>,
    path: StockPath,
    body: StockBody,
) -> Outcome {
    let (vm_id, item_id, body) = match stock_args(path, body) {
        Ok(args) => args,
        Err(out) => return out,
    };
    with_engine!(&*services, |engine| handlers::add_stock(engine, vm_id, item_id, body).await)
}

pub async fn set_stock(
    Extension(services): Extension<Arc<AppServices>>,
    path: StockPath,
    body: StockBody,
) -> Outcome {
    let (vm_id, item_id, body) = match stock_args(path, body) {
        Ok(args) => args,
        Err(out) => return out,
    };
    with_engine!(&*services, |engine| handlers::set_stock(engine, vm_id, item_id, body).await)
}

pub async fn remove_stock(
    Extension(services): Extension<Arc<AppServices>>,
    path: StockPath,
    body: StockBody,
) -> Outcome {
    let (vm_id, item_id, body) = match stock_args(path, body) {
        Ok(args) => args,
        Err(out) => return out,
    };
    with_engine!(&*services, |engine| handlers::remove_stock(engine, vm_id, item_id, body).await)
}
