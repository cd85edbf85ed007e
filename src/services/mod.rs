// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod diversity;
pub mod events;
pub mod insights;
pub mod ledger;
pub mod matching;
pub mod points;
pub mod similarity;

pub use ledger::{InterestInput, InterestOutcome, LedgerError, NewActivity};
pub use matching::{MatchReport, MatchingService};
pub use insights::UserInsights;
pub use points::{InterestResult, PointsService, PointsSummary, RecordedActivity, UserLocks};
pub use similarity::RankOptions;
