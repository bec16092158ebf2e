// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for each stored entity.
//!
//! Every function takes a plain `&rusqlite::Connection` so callers can run
//! several of them inside one transaction on the connection thread (a
//! `rusqlite::Transaction` derefs to a `Connection`).

pub mod bounties;
pub mod homes;
pub mod quests;
pub mod rewards;
pub mod subscriptions;
pub mod templates;
pub mod users;
