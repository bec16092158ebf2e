// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caller identity.
//!
//! Authentication happens in front of Hearth. The fronting layer asserts the
//! acting user's id in the `x-hearth-user` header; this extractor only
//! checks that the user exists.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use hearth_core::{HearthError, User};

use crate::error::ApiError;
use crate::server::AppState;

pub const USER_HEADER: &str = "x-hearth-user";

/// The user a request acts on behalf of.
#[derive(Debug, Clone)]
pub struct Actor(pub User);

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_HEADER)
            .ok_or_else(|| ApiError::unauthorized(format!("missing {USER_HEADER} header")))?;
        let user_id = raw
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .ok_or_else(|| ApiError::unauthorized(format!("{USER_HEADER} must be a user id")))?;

        match state.engine.get_user(user_id).await {
            Ok(user) => Ok(Actor(user)),
            Err(HearthError::NotFound { .. }) => {
                Err(ApiError::unauthorized(format!("unknown user {user_id}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}
