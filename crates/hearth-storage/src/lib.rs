// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Hearth quest engine.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, an async
//! connection handle via `tokio-rusqlite`, and typed queries for homes,
//! users, templates, quests, subscriptions, daily bounty decisions, and the
//! reward shop with its claim ledger.

pub mod database;
pub mod migrations;
pub mod queries;
pub mod sqltime;

pub use database::{Database, is_busy, is_constraint_violation, map_tr_err};
pub use queries::bounties::BountyInsert;
