// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Running engine work on the connection thread with busy retries.

use std::sync::Arc;
use std::time::Duration;

use hearth_core::HearthError;
use hearth_storage::is_busy;
use rusqlite::{Connection, TransactionBehavior};
use tracing::warn;

use crate::QuestEngine;

const RETRY_BACKOFF: Duration = Duration::from_millis(25);

/// Failure inside a unit of engine work.
///
/// SQL errors are inspected for busy/locked codes; domain errors end the
/// unit (rolling back any open transaction) and are returned as-is.
#[derive(Debug)]
pub(crate) enum TxError {
    Sql(rusqlite::Error),
    Domain(HearthError),
}

impl From<rusqlite::Error> for TxError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sql(e)
    }
}

impl From<HearthError> for TxError {
    fn from(e: HearthError) -> Self {
        Self::Domain(e)
    }
}

/// How a unit of work touches the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    /// Each statement commits on its own.
    Autocommit,
    /// One `BEGIN IMMEDIATE` transaction, holding the write lock throughout.
    Immediate,
}

enum Attempt<T> {
    Done(Result<T, HearthError>),
    Busy,
}

impl QuestEngine {
    /// Run `work` on the connection thread, retrying from scratch when
    /// SQLite reports the database busy.
    pub(crate) async fn run<T, F>(&self, op: &'static str, access: Access, work: F) -> Result<T, HearthError>
    where
        T: Send + 'static,
        F: Fn(&Connection) -> Result<T, TxError> + Send + Sync + 'static,
    {
        let work = Arc::new(work);
        let max_retries = self.settings.max_retries;

        for attempt in 0..=max_retries {
            let work = Arc::clone(&work);
            let outcome = self
                .db
                .call(move |conn| match access {
                    Access::Autocommit => settle(work(conn)),
                    Access::Immediate => {
                        let tx = match conn.transaction_with_behavior(TransactionBehavior::Immediate) {
                            Ok(tx) => tx,
                            Err(e) if is_busy(&e) => return Ok(Attempt::Busy),
                            Err(e) => return Err(e),
                        };
                        match work(&tx) {
                            Ok(value) => match tx.commit() {
                                Ok(()) => Ok(Attempt::Done(Ok(value))),
                                Err(e) if is_busy(&e) => Ok(Attempt::Busy),
                                Err(e) => Err(e),
                            },
                            // Dropping `tx` rolls back.
                            Err(e) => settle(Err(e)),
                        }
                    }
                })
                .await?;

            match outcome {
                Attempt::Done(result) => return result,
                Attempt::Busy => {
                    warn!(op, attempt, "database busy, retrying");
                    tokio::time::sleep(RETRY_BACKOFF * (attempt + 1)).await;
                }
            }
        }

        Err(HearthError::Storage {
            source: Box::new(std::io::Error::other(format!(
                "{op}: database still busy after {max_retries} retries"
            ))),
        })
    }
}

fn settle<T>(result: Result<T, TxError>) -> Result<Attempt<T>, rusqlite::Error> {
    match result {
        Ok(value) => Ok(Attempt::Done(Ok(value))),
        Err(TxError::Domain(e)) => Ok(Attempt::Done(Err(e))),
        Err(TxError::Sql(e)) if is_busy(&e) => Ok(Attempt::Busy),
        Err(TxError::Sql(e)) => Err(e),
    }
}
