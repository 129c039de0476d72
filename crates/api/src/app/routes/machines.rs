use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path,
    },
    Json,
};

use vending_core::MachineId;

use crate::app::outcome::Outcome;
use crate::app::services::{with_engine, AppServices};
use crate::app::{dto, errors, handlers};

pub async fn create_machine(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateMachineRequest>, JsonRejection>,
) -> Outcome {
    let body = match body {
        Ok(Json(body)) => body,
        Err(e) => return errors::json_rejection(e),
    };
    with_engine!(&*services, |engine| handlers::create_machine(engine, body).await)
}

pub async fn delete_machine(
    Extension(services): Extension<Arc<AppServices>>,
    path: Result<Path<MachineId>, PathRejection>,
) -> Outcome {
    let vm_id = match path {
        Ok(Path(id)) => id,
        Err(e) => return errors::path_rejection(e),
    };
    with_engine!(&*services, |engine| handlers::delete_machine(engine, vm_id).await)
}

pub async fn list_machines(Extension(services): Extension<Arc<AppServices>>) -> Outcome {
    with_engine!(&*services, |engine| handlers::list_machines(engine).await)
}
