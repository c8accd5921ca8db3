//! The REST field-resolver service: single and batch resolution of custom
//! fields (user, teacher, school, car, class) from identifier-bearing
//! request bodies.

use axum::{body::Bytes, routing::any, Json, Router};
use serde_json::Value;

use crate::resolve::{resolve_batch, resolve_single, FieldShape, JsonResult};

pub(crate) fn routes() -> Router {
    Router::new()
        // batch mode
        .route("/userNames", any(user_names))
        .route("/cars", any(cars))
        .route("/classes", any(classes))
        .route("/teacherNames", any(teacher_names))
        .route("/schoolNames", any(school_names))
        // single mode
        .route("/userName", any(user_name))
        .route("/car", any(car))
        .route("/class", any(class))
        .route("/teacherName", any(teacher_name))
        .route("/schoolName", any(school_name))
}

fn batch(body: &[u8], id_field: &'static str, prefix: &str, shape: FieldShape) -> JsonResult {
    let entities: Vec<Value> = serde_json::from_slice(body)?;
    Ok(Json(resolve_batch(&entities, id_field, prefix, shape)?))
}

fn single(body: &[u8], id_field: &'static str, prefix: &str, shape: FieldShape) -> JsonResult {
    let entity: Value = serde_json::from_slice(body)?;
    Ok(Json(resolve_single(&entity, id_field, prefix, shape)?))
}

async fn user_names(body: Bytes) -> JsonResult {
    batch(&body, "uid", "uname-", FieldShape::Scalar)
}

async fn teacher_names(body: Bytes) -> JsonResult {
    batch(&body, "tid", "tname-", FieldShape::Scalar)
}

async fn school_names(body: Bytes) -> JsonResult {
    batch(&body, "sid", "sname-", FieldShape::Scalar)
}

async fn cars(body: Bytes) -> JsonResult {
    batch(&body, "uid", "car-", FieldShape::Object)
}

async fn classes(body: Bytes) -> JsonResult {
    batch(&body, "sid", "class-", FieldShape::ObjectList)
}

async fn user_name(body: Bytes) -> JsonResult {
    single(&body, "uid", "uname-", FieldShape::Scalar)
}

async fn teacher_name(body: Bytes) -> JsonResult {
    single(&body, "tid", "tname-", FieldShape::Scalar)
}

async fn school_name(body: Bytes) -> JsonResult {
    single(&body, "sid", "sname-", FieldShape::Scalar)
}

async fn car(body: Bytes) -> JsonResult {
    single(&body, "uid", "car-", FieldShape::Object)
}

async fn class(body: Bytes) -> JsonResult {
    single(&body, "sid", "class-", FieldShape::ObjectList)
}
