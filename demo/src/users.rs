//! `/api/users` controller
//!
//! No persistence: ids and names trigger the error paths directly.

use axum::Router;
use axum::routing::{get, patch, post};
use faultline_core::ApiError;
use serde::Deserialize;

use crate::extract::{JsonBody, UserId, ValidJson, Validate};

/// Id that never exists
const MISSING_USER: i64 = 999;

/// Name that is always taken
const TAKEN_NAME: &str = "ajinkya";

/// Minimum age to register
const ADULT_AGE: u32 = 18;

/// Body of create, register and update requests
#[derive(Debug, Clone, Deserialize)]
pub struct UserRequest {
    pub name: String,
    pub email: String,
    pub age: u32,
}

impl Validate for UserRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::bad_request("name must not be blank"));
        }

        let well_formed = self
            .email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.ends_with('.'));
        if !well_formed {
            return Err(ApiError::bad_request(format!("email '{}' is not a valid address", self.email)));
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct NameUpdate {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AgeUpdate {
    age: Option<i64>,
}

/// Routes relative to `/api/users`
pub fn router() -> Router {
    Router::new()
        .route("/all", get(list_users).delete(delete_all_users))
        .route("/createuser", post(create_user))
        .route("/register", post(register_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/{id}/name", patch(update_name))
        .route("/{id}/age", patch(update_age))
        .route("/{id}/ratio", get(user_ratio))
}

async fn list_users() -> &'static str {
    "Returning all users"
}

async fn get_user(UserId(id): UserId) -> Result<String, ApiError> {
    tracing::debug!(user_id = id, "fetching user");

    match id {
        MISSING_USER => Err(ApiError::not_found(format!("User {id} not found"))),
        0 => Err(ApiError::invalid_request("Invalid ID")),
        id if id < 0 => Err(ApiError::invalid_request("ID must be positive")),
        id => Ok(format!("User {id}")),
    }
}

async fn create_user(ValidJson(user): ValidJson<UserRequest>) -> Result<String, ApiError> {
    if user.name.eq_ignore_ascii_case("error") {
        return Err(ApiError::invalid_request("Name cannot be 'error'"));
    }

    tracing::info!(name = %user.name, "user created");
    Ok(format!("User created: {}", user.name))
}

async fn register_user(ValidJson(user): ValidJson<UserRequest>) -> Result<String, ApiError> {
    if user.age < ADULT_AGE {
        return Err(ApiError::invalid_request("User must be 18+ to register"));
    }
    if user.name.eq_ignore_ascii_case(TAKEN_NAME) {
        return Err(ApiError::conflict(format!("User already exists with name: {}", user.name)));
    }

    tracing::info!(name = %user.name, "user registered");
    Ok(format!("User registered: {}", user.name))
}

async fn update_user(UserId(id): UserId, ValidJson(user): ValidJson<UserRequest>) -> Result<String, ApiError> {
    if id == MISSING_USER {
        return Err(ApiError::not_found("Cannot update non-existing user"));
    }

    Ok(format!("Updated user {id} with name {}", user.name))
}

async fn update_name(UserId(id): UserId, JsonBody(update): JsonBody<NameUpdate>) -> Result<String, ApiError> {
    let name = update
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::invalid_request("Name cannot be empty"))?;

    Ok(format!("Updated name of user {id} to {name}"))
}

async fn update_age(UserId(id): UserId, JsonBody(update): JsonBody<AgeUpdate>) -> Result<String, ApiError> {
    let age = update
        .age
        .filter(|age| *age >= 1)
        .ok_or_else(|| ApiError::invalid_request("Age must be positive"))?;

    Ok(format!("Updated age of user {id} to {age}"))
}

async fn delete_user(UserId(id): UserId) -> Result<String, ApiError> {
    if id == MISSING_USER {
        return Err(ApiError::not_found(format!("User {id} does not exist")));
    }

    tracing::info!(user_id = id, "user deleted");
    Ok(format!("Deleted user {id}"))
}

async fn delete_all_users() -> Result<String, ApiError> {
    Err(ApiError::forbidden("Bulk delete is not allowed"))
}

/// Share of a fixed quota for the user's bucket
///
/// Users in bucket zero hit an unclassified division failure.
async fn user_ratio(UserId(id): UserId) -> Result<String, ApiError> {
    let ratio = 100_i64
        .checked_div(id % 10)
        .ok_or_else(|| anyhow::anyhow!("division by zero"))?;

    Ok(format!("Ratio for user {id}: {ratio}"))
}
