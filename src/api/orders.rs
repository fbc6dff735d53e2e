use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde::Deserialize;
use validator::Validate;
use super::{auth::AuthUser, exposed_all, extract::ValidJson, AppState, Exposed};
use crate::domain::aggregates::{Order, OrderStatus, PaymentStatus};
use crate::services::PlaceOrder;
use crate::Result;

#[derive(Debug, Deserialize, Validate)]
pub struct StatusUpdate { pub status: OrderStatus }

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate { pub payment_status: PaymentStatus }

pub async fn create(State(s): State<AppState>, AuthUser(user): AuthUser, ValidJson(r): ValidJson<PlaceOrder>) -> Result<(StatusCode, Json<Exposed<Order>>)> {
    Ok((StatusCode::CREATED, Json(s.orders.place_order(&user, r).await?.into())))
}

pub async fn list_mine(State(s): State<AppState>, AuthUser(user): AuthUser) -> Result<Json<Vec<Exposed<Order>>>> {
    Ok(Json(exposed_all(s.orders.list_for(&user).await?)))
}

pub async fn list_all(State(s): State<AppState>, AuthUser(user): AuthUser) -> Result<Json<Vec<Exposed<Order>>>> {
    Ok(Json(exposed_all(s.orders.list_all(&user).await?)))
}

pub async fn get(State(s): State<AppState>, AuthUser(user): AuthUser, Path(id): Path<String>) -> Result<Json<Exposed<Order>>> {
    Ok(Json(s.orders.get(&user, &id).await?.into()))
}

pub async fn set_status(State(s): State<AppState>, AuthUser(user): AuthUser, Path(id): Path<String>, ValidJson(r): ValidJson<StatusUpdate>) -> Result<Json<Exposed<Order>>> {
    Ok(Json(s.orders.set_status(&user, &id, r.status).await?.into()))
}

pub async fn request_cancellation(State(s): State<AppState>, AuthUser(user): AuthUser, Path(id): Path<String>) -> Result<Json<Exposed<Order>>> {
    Ok(Json(s.orders.request_cancellation(&user, &id).await?.into()))
}

pub async fn set_payment_status(State(s): State<AppState>, AuthUser(user): AuthUser, Path(id): Path<String>, ValidJson(r): ValidJson<PaymentUpdate>) -> Result<Json<Exposed<Order>>> {
    Ok(Json(s.orders.set_payment_status(&user, &id, r.payment_status).await?.into()))
}
