//! Self-service profile endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::profile::{UpdateProfile, UserProfile},
    AppState,
};

use super::SignedIn;

/// Profile of the signed-in user
#[utoipa::path(
    get,
    path = "/me",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current profile", body = UserProfile),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_me(user: SignedIn) -> Json<UserProfile> {
    Json(user.profile)
}

/// Update own name and email
#[utoipa::path(
    put,
    path = "/me",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_me(
    State(state): State<AppState>,
    user: SignedIn,
    Json(update): Json<UpdateProfile>,
) -> AppResult<Json<UserProfile>> {
    let profile = state
        .services
        .users
        .update_my_profile(user.profile.id, update)
        .await?;
    Ok(Json(profile))
}
