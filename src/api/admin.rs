use axum::{extract::{Path, State}, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;
use super::{auth::AuthUser, exposed_all, extract::ValidJson, AppState, Exposed};
use crate::domain::aggregates::{Role, UserSummary};
use crate::services::DashboardStats;
use crate::Result;

#[derive(Debug, Deserialize, Validate)]
pub struct RoleUpdate { pub role: Role }

pub async fn stats(State(s): State<AppState>, AuthUser(user): AuthUser) -> Result<Json<DashboardStats>> {
    Ok(Json(s.admin.stats(&user).await?))
}

pub async fn list_users(State(s): State<AppState>, AuthUser(user): AuthUser) -> Result<Json<Vec<Exposed<UserSummary>>>> {
    Ok(Json(exposed_all(s.admin.list_users(&user).await?)))
}

pub async fn set_role(State(s): State<AppState>, AuthUser(user): AuthUser, Path(id): Path<String>, ValidJson(r): ValidJson<RoleUpdate>) -> Result<Json<Exposed<UserSummary>>> {
    Ok(Json(s.admin.set_role(&user, &id, r.role).await?.into()))
}

pub async fn delete_user(State(s): State<AppState>, AuthUser(user): AuthUser, Path(id): Path<String>) -> Result<Json<Value>> {
    s.admin.delete_user(&user, &id).await?;
    Ok(Json(json!({ "message": "User removed" })))
}
