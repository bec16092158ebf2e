// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Hearth quest engine.
//!
//! A thin axum layer over [`hearth_engine::QuestEngine`]: the acting user
//! comes from the `x-hearth-user` header and engine errors are mapped to a
//! JSON error envelope.

pub mod actor;
pub mod error;
pub mod handlers;
pub mod server;

pub use actor::{Actor, USER_HEADER};
pub use error::{ApiError, ErrorCode};
pub use server::{AppState, ServerConfig, router, start_server};
