// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Corruption debuff from the household's overdue quests.
//!
//! Every overdue, incomplete quest in a home lowers the rewards of every
//! completion in that home. The count is read fresh at each completion.
//! An active shield on the rewarded user cancels the debuff.

use chrono::{DateTime, Utc};
use hearth_config::model::CorruptionConfig;
use hearth_core::{HearthError, HomeId, User};
use hearth_storage::queries::quests;
use rusqlite::Connection;
use tracing::info;

use crate::QuestEngine;
use crate::rewards::Multiplier;
use crate::txn::Access;

/// Maps an overdue-quest count to a reward multiplier.
///
/// Implementations must be monotonically non-increasing in `overdue` and
/// stay within `(0, 1]`.
pub trait CorruptionCurve: Send + Sync + 'static {
    fn multiplier(&self, overdue: u32) -> Multiplier;
}

/// Fixed penalty per overdue quest up to a cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearCurve {
    per_quest_percent: u32,
    max_percent: u32,
}

impl LinearCurve {
    pub fn new(per_quest_percent: u32, max_percent: u32) -> Self {
        Self {
            per_quest_percent,
            max_percent: max_percent.min(99),
        }
    }

    pub fn from_config(config: &CorruptionConfig) -> Self {
        Self::new(config.penalty_per_quest_percent, config.max_penalty_percent)
    }
}

impl Default for LinearCurve {
    fn default() -> Self {
        Self::new(5, 50)
    }
}

impl CorruptionCurve for LinearCurve {
    fn multiplier(&self, overdue: u32) -> Multiplier {
        let penalty = overdue
            .saturating_mul(self.per_quest_percent)
            .min(self.max_percent);
        Multiplier::from_reduction_percent(penalty)
    }
}

/// Debuff state observed for one completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorruptionReading {
    pub overdue_count: u32,
    /// `1.0` when shielded.
    pub multiplier: Multiplier,
    pub shielded: bool,
}

/// Count overdue quests in `home_id` and apply `curve`, honouring `user`'s shield.
pub fn evaluate(
    conn: &Connection,
    curve: &dyn CorruptionCurve,
    home_id: HomeId,
    user: &User,
    now: DateTime<Utc>,
) -> rusqlite::Result<CorruptionReading> {
    let overdue_count = quests::count_overdue(conn, home_id, now)?;
    let shielded = user.shield_active(now);
    let multiplier = if shielded {
        Multiplier::ONE
    } else {
        curve.multiplier(overdue_count)
    };
    Ok(CorruptionReading {
        overdue_count,
        multiplier,
        shielded,
    })
}

impl QuestEngine {
    /// Mark every overdue, incomplete quest in the home as corrupted.
    ///
    /// Only changes how quests are labelled; the debuff counts overdue
    /// quests directly.
    pub async fn sweep_corruption(&self, home_id: HomeId) -> Result<usize, HearthError> {
        let now = self.now();
        let corrupted = self
            .run("sweep_corruption", Access::Autocommit, move |conn| {
                Ok(quests::corrupt_overdue(conn, home_id, now)?)
            })
            .await?;
        if corrupted > 0 {
            info!(home_id, corrupted, "overdue quests corrupted");
        }
        Ok(corrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn linear_curve_steps_and_caps() {
        let curve = LinearCurve::default();
        assert_eq!(curve.multiplier(0), Multiplier::ONE);
        assert_eq!(curve.multiplier(1).basis_points(), 9_500);
        assert_eq!(curve.multiplier(4).basis_points(), 8_000);
        assert_eq!(curve.multiplier(10).basis_points(), 5_000);
        assert_eq!(curve.multiplier(500).basis_points(), 5_000);
    }

    #[test]
    fn cap_never_reaches_zero() {
        let curve = LinearCurve::new(50, 100);
        assert!(curve.multiplier(u32::MAX).basis_points() > 0);
    }

    proptest! {
        #[test]
        fn linear_curve_is_non_increasing(
            per in 0u32..=100,
            max in 0u32..=99,
            a in 0u32..1_000,
            b in 0u32..1_000,
        ) {
            let curve = LinearCurve::new(per, max);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(curve.multiplier(hi) <= curve.multiplier(lo));
            prop_assert!(curve.multiplier(hi).basis_points() >= 1);
        }
    }
}
