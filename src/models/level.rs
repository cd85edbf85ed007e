// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Levels derived from cumulative points.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Minimum points required for each level (index = level).
pub const LEVEL_THRESHOLDS: [u64; 8] = [0, 100, 250, 500, 1000, 2000, 5000, 10000];

/// Highest reachable level.
pub const MAX_LEVEL: u8 = (LEVEL_THRESHOLDS.len() - 1) as u8;

const LEVEL_TITLES: [&str; 8] = [
    "Seed", "Sprout", "Bloom", "Growth", "Flourish", "Harvest", "Champion", "Legend",
];

const LEVEL_BADGES: [&str; 8] = ["🌱", "🌿", "🌸", "🌳", "🌺", "🌾", "🏆", "👑"];

/// Display information for a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct LevelInfo {
    pub level: u8,
    pub badge: &'static str,
    pub title: &'static str,
    /// Points needed for the next level (the top threshold once maxed out)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub next_threshold: u64,
}

/// Highest level whose threshold is covered by `total_points`.
pub fn level_of(total_points: u64) -> u8 {
    LEVEL_THRESHOLDS
        .iter()
        .rposition(|&threshold| total_points >= threshold)
        .unwrap_or(0) as u8
}

/// Badge, title and next threshold for a level, clamped to the last entry.
pub fn level_info(level: u8) -> LevelInfo {
    let idx = usize::from(level.min(MAX_LEVEL));
    let next_threshold = LEVEL_THRESHOLDS
        .get(idx + 1)
        .copied()
        .unwrap_or(LEVEL_THRESHOLDS[LEVEL_THRESHOLDS.len() - 1]);

    LevelInfo {
        level: idx as u8,
        badge: LEVEL_BADGES[idx],
        title: LEVEL_TITLES[idx],
        next_threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level_of(0), 0);
        assert_eq!(level_of(99), 0);
        assert_eq!(level_of(100), 1);
        assert_eq!(level_of(249), 1);
        assert_eq!(level_of(250), 2);
        assert_eq!(level_of(999), 3);
        assert_eq!(level_of(1000), 4);
        assert_eq!(level_of(5000), 6);
        assert_eq!(level_of(10000), 7);
        assert_eq!(level_of(u64::MAX), 7);
    }

    #[test]
    fn test_level_is_monotonic() {
        let mut previous = 0;
        for points in (0..12_000).step_by(7) {
            let level = level_of(points);
            assert!(level >= previous, "level dropped at {} points", points);
            previous = level;
        }
    }

    #[test]
    fn test_level_info_lookup() {
        let info = level_info(0);
        assert_eq!(info.title, "Seed");
        assert_eq!(info.badge, "🌱");
        assert_eq!(info.next_threshold, 100);

        let info = level_info(6);
        assert_eq!(info.title, "Champion");
        assert_eq!(info.next_threshold, 10000);
    }

    #[test]
    fn test_level_info_clamps_out_of_range() {
        let top = level_info(MAX_LEVEL);
        assert_eq!(top.title, "Legend");
        assert_eq!(top.next_threshold, 10000);

        assert_eq!(level_info(42), top);
    }
}
