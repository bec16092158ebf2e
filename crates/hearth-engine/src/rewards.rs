// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reward composition.
//!
//! Multipliers apply in a fixed order, each result truncated before the
//! next step:
//!
//! 1. daily bounty doubles XP and gold,
//! 2. the corruption debuff scales both,
//! 3. an XP boost doubles XP only.
//!
//! The corruption multiplier is held in basis points so truncation is
//! exact integer division.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 1.0 expressed in basis points.
pub const BASIS_POINTS: u32 = 10_000;

/// Reward factor for the day's bounty quest.
pub const BOUNTY_MULTIPLIER: i64 = 2;

/// XP factor while a boost is active.
pub const XP_BOOST_MULTIPLIER: i64 = 2;

/// A reward factor in `(0, 1]`, stored as basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Multiplier(u32);

impl Multiplier {
    pub const ONE: Self = Self(BASIS_POINTS);

    /// Clamp into `1..=10_000` basis points.
    pub fn from_basis_points(bp: u32) -> Self {
        Self(bp.clamp(1, BASIS_POINTS))
    }

    /// A factor that removes `percent` of the reward.
    pub fn from_reduction_percent(percent: u32) -> Self {
        Self::from_basis_points(BASIS_POINTS.saturating_sub(percent.saturating_mul(100)))
    }

    pub fn basis_points(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / f64::from(BASIS_POINTS)
    }

    /// `floor(amount * self)` for non-negative amounts.
    pub fn apply(self, amount: i64) -> i64 {
        amount.saturating_mul(i64::from(self.0)) / i64::from(BASIS_POINTS)
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.as_f64())
    }
}

/// Everything besides the base amounts that affects a payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewardModifiers {
    pub is_bounty: bool,
    pub corruption: Multiplier,
    pub xp_boost_active: bool,
}

impl RewardModifiers {
    pub fn bounty_multiplier(&self) -> i64 {
        if self.is_bounty { BOUNTY_MULTIPLIER } else { 1 }
    }

    pub fn xp_boost_multiplier(&self) -> i64 {
        if self.xp_boost_active { XP_BOOST_MULTIPLIER } else { 1 }
    }
}

/// Final payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardOutcome {
    pub xp: i64,
    pub gold: i64,
}

/// Apply bounty, then corruption, then boost to the base rewards.
pub fn compose(base_xp: i64, base_gold: i64, modifiers: &RewardModifiers) -> RewardOutcome {
    let bounty = modifiers.bounty_multiplier();
    let xp_after_bounty = base_xp.saturating_mul(bounty);
    let gold_after_bounty = base_gold.saturating_mul(bounty);

    let xp_after_debuff = modifiers.corruption.apply(xp_after_bounty);
    let gold_after_debuff = modifiers.corruption.apply(gold_after_bounty);

    RewardOutcome {
        xp: xp_after_debuff.saturating_mul(modifiers.xp_boost_multiplier()),
        gold: gold_after_debuff,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mods(is_bounty: bool, bp: u32, boost: bool) -> RewardModifiers {
        RewardModifiers {
            is_bounty,
            corruption: Multiplier::from_basis_points(bp),
            xp_boost_active: boost,
        }
    }

    #[test]
    fn all_multipliers_stack_in_order() {
        let out = compose(100, 100, &mods(true, 8_000, true));
        assert_eq!(out, RewardOutcome { xp: 320, gold: 160 });
    }

    #[test]
    fn no_modifiers_is_identity() {
        assert_eq!(
            compose(37, 11, &RewardModifiers::default()),
            RewardOutcome { xp: 37, gold: 11 }
        );
    }

    #[test]
    fn boost_never_touches_gold() {
        let out = compose(10, 10, &mods(false, BASIS_POINTS, true));
        assert_eq!(out, RewardOutcome { xp: 20, gold: 10 });
    }

    #[test]
    fn truncation_happens_after_bounty_not_before() {
        // Debuffing first would give floor(7 * 0.95) * 2 = 12.
        assert_eq!(compose(7, 7, &mods(true, 9_500, false)).xp, 13);
        assert_eq!(compose(7, 7, &mods(false, 9_500, false)).xp, 6);
    }

    #[test]
    fn debuff_is_truncated_before_boost() {
        // floor(3 * 0.5) = 1, boosted to 2 (not floor(3) = 3).
        assert_eq!(compose(3, 3, &mods(false, 5_000, true)).xp, 2);
    }

    #[test]
    fn multiplier_bounds() {
        assert_eq!(Multiplier::from_basis_points(0).basis_points(), 1);
        assert_eq!(Multiplier::from_basis_points(20_000), Multiplier::ONE);
        assert_eq!(Multiplier::from_reduction_percent(20).basis_points(), 8_000);
        assert_eq!(Multiplier::from_reduction_percent(150).basis_points(), 1);
        assert!((Multiplier::from_basis_points(8_000).as_f64() - 0.8).abs() < f64::EPSILON);
        assert_eq!(Multiplier::from_basis_points(8_000).to_string(), "0.80");
    }

    proptest! {
        #[test]
        fn payout_never_exceeds_full_multiplier(
            base_xp in 0i64..=10_000,
            base_gold in 0i64..=10_000,
            is_bounty: bool,
            boost: bool,
            bp in 1u32..=BASIS_POINTS,
        ) {
            let m = mods(is_bounty, bp, boost);
            let out = compose(base_xp, base_gold, &m);
            prop_assert!(out.xp >= 0 && out.gold >= 0);
            prop_assert!(out.xp <= base_xp * m.bounty_multiplier() * m.xp_boost_multiplier());
            prop_assert!(out.gold <= base_gold * m.bounty_multiplier());
        }

        #[test]
        fn payout_is_monotonic_in_corruption(
            base in 0i64..=10_000,
            lo in 1u32..=BASIS_POINTS,
            hi in 1u32..=BASIS_POINTS,
            is_bounty: bool,
            boost: bool,
        ) {
            let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
            let weak = compose(base, base, &mods(is_bounty, lo, boost));
            let strong = compose(base, base, &mods(is_bounty, hi, boost));
            prop_assert!(weak.xp <= strong.xp);
            prop_assert!(weak.gold <= strong.gold);
        }
    }
}
