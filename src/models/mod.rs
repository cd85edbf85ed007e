// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod event;
pub mod level;
pub mod matching;
pub mod points;
pub mod profile;

pub use event::{Event, EventPairing, EventPairings, EventRecommendation, PairedUser};
pub use level::{level_info, level_of, LevelInfo};
pub use matching::{CommunityDiversity, MatchResult};
pub use points::{
    ActivityMetadata, ActivityType, InterestedRequest, PointsActivity, PointsAnalytics,
    UserPointsRecord,
};
pub use profile::{CulturalProfile, ParticipationRecord, ParticipationRole, VolunteerProfile};
