// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Level curve derived from total XP.
//!
//! Level 1 starts at 0 XP. Reaching level `n + 1` takes `n * 100` XP more
//! than reaching level `n`, giving thresholds 100, 300, 600, 1000, ...

const XP_PER_LEVEL_STEP: i64 = 100;

/// Total XP required to reach `level`.
pub fn xp_for_level(level: u32) -> i64 {
    let n = i64::from(level.saturating_sub(1));
    XP_PER_LEVEL_STEP * n * (n + 1) / 2
}

/// Level reached with `xp` total experience. Negative XP counts as zero.
pub fn level_for_xp(xp: i64) -> u32 {
    let mut level = 1u32;
    while xp >= xp_for_level(level + 1) {
        level += 1;
    }
    level
}
