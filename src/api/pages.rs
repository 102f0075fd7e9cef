//! About and contact pages

use axum::{http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::contact::{AboutInfo, ContactMessage},
};

#[derive(Serialize, ToSchema)]
pub struct ContactAccepted {
    pub message: String,
}

/// Library description and contact details
#[utoipa::path(
    get,
    path = "/about",
    tag = "pages",
    responses(
        (status = 200, description = "About the library", body = AboutInfo)
    )
)]
pub async fn about() -> Json<AboutInfo> {
    Json(AboutInfo::default())
}

/// Send a message to the library
#[utoipa::path(
    post,
    path = "/contact",
    tag = "pages",
    request_body = ContactMessage,
    responses(
        (status = 202, description = "Message accepted", body = ContactAccepted),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn contact(Json(message): Json<ContactMessage>) -> AppResult<(StatusCode, Json<ContactAccepted>)> {
    message.validate()?;

    tracing::info!(
        from = %message.email,
        subject = %message.subject,
        "Contact message from {}",
        message.name
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(ContactAccepted {
            message: "Thank you for your message. We will get back to you soon.".to_string(),
        }),
    ))
}
