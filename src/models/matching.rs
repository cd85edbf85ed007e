// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Match and community diversity results.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Pairwise similarity between two cultural profiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub user_id1: String,
    pub user_id2: String,
    /// Weighted overlap in [0, 1]
    pub similarity_score: f64,
    pub shared_languages: Vec<String>,
    pub shared_interests: Vec<String>,
    /// Value of connecting users across cultures, in [0, 1]
    pub cultural_bridge_potential: f64,
    pub recommendation_reason: String,
}

impl MatchResult {
    /// Sort key used when cross-cultural matches are prioritised.
    pub fn cross_cultural_score(&self) -> f64 {
        self.similarity_score + self.cultural_bridge_potential * 0.5
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LanguageCount {
    pub language: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GroupCount {
    pub group: String,
    pub count: u32,
}

/// Community-wide language and cultural group breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct CommunityDiversity {
    pub total_users: u32,
    pub languages_represented: Vec<LanguageCount>,
    pub cultural_groups: Vec<GroupCount>,
    /// Simpson diversity index scaled to 0-100
    pub diversity_score: u32,
    pub bridging_opportunities: Vec<String>,
}
