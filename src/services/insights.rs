// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user analytics insights: ranking, growth suggestions and
//! engagement metrics derived from a points record.

use crate::models::level::LEVEL_THRESHOLDS;
use crate::models::{PointsAnalytics, UserPointsRecord};
use crate::services::ledger::{self, InterestRecommendations};
use crate::time_utils::days_between;
use chrono::NaiveDate;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Community-wide average used before any interest has been recorded.
pub const FALLBACK_AVERAGE_POINTS: f64 = 100.0;
const TOP_CATEGORY_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl Tier {
    pub fn from_percentile(percentile: u32) -> Self {
        match percentile {
            90.. => Tier::Diamond,
            75..=89 => Tier::Platinum,
            50..=74 => Tier::Gold,
            25..=49 => Tier::Silver,
            _ => Tier::Bronze,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_points: u64,
    pub level: u8,
    pub current_streak: u32,
    pub best_streak: u32,
    pub total_activities: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    pub percentile: u32,
    pub tier: Tier,
    /// Points to the next level threshold (0 at the top level)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points_until_next_tier: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetrics {
    pub activities_per_day: f64,
    /// Spread of interest across categories, 0-100
    pub diversity_score: u32,
    /// Current streak as a percentage of the best streak
    pub consistency_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CategoryCount {
    pub category: String,
    pub count: u32,
}

/// Everything the insights panel shows for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserInsights {
    pub user_id: String,
    pub user_stats: UserStats,
    pub ranking: Ranking,
    pub recommendations: InterestRecommendations,
    pub growth_opportunities: Vec<String>,
    pub engagement_metrics: EngagementMetrics,
    pub top_categories: Vec<CategoryCount>,
}

pub fn ranking(record: &UserPointsRecord, analytics: &PointsAnalytics) -> Ranking {
    let average = if analytics.average_points_per_interest > 0.0 {
        analytics.average_points_per_interest
    } else {
        FALLBACK_AVERAGE_POINTS
    };
    let percentile = (record.total_points as f64 / (average * 10.0) * 100.0)
        .round()
        .min(100.0) as u32;

    let points_until_next_tier = LEVEL_THRESHOLDS
        .iter()
        .find(|&&t| t > record.total_points)
        .map(|t| t - record.total_points)
        .unwrap_or(0);

    Ranking {
        percentile,
        tier: Tier::from_percentile(percentile),
        points_until_next_tier,
    }
}

pub fn growth_opportunities(record: &UserPointsRecord, analytics: &PointsAnalytics) -> Vec<String> {
    let mut out = Vec::new();

    if let Some((category, _)) = record.category_preferences.iter().find(|(_, n)| **n == 0) {
        out.push(format!("Try {} requests for new experiences", category));
    }

    match record.current_streak {
        0 | 1 => out.push("Start a streak by being active daily!".to_string()),
        6 => out.push("One more day to earn your 7-day streak bonus!".to_string()),
        _ => {}
    }

    let popular = &analytics.most_popular_category;
    if record.category_preferences.get(popular) == Some(&0) {
        out.push(format!("{} is trending - check it out!", popular));
    }

    out
}

/// Normalized Shannon entropy of the category counts, scaled to 0-100.
pub fn diversity_score(record: &UserPointsRecord) -> u32 {
    let counts: Vec<f64> = record
        .category_preferences
        .values()
        .map(|&n| f64::from(n))
        .collect();
    let total: f64 = counts.iter().sum();
    if total == 0.0 || counts.len() < 2 {
        return 0;
    }

    let entropy: f64 = counts
        .iter()
        .filter(|&&n| n > 0.0)
        .map(|&n| {
            let p = n / total;
            -p * p.log2()
        })
        .sum();
    (entropy / (counts.len() as f64).log2() * 100.0).round() as u32
}

pub fn engagement_metrics(record: &UserPointsRecord, today: NaiveDate) -> EngagementMetrics {
    let days = record
        .last_activity_date
        .map(|d| days_between(d, today))
        .unwrap_or(0);
    let activities_per_day = if days > 0 {
        (record.activities.len() as f64 / days as f64 * 100.0).round() / 100.0
    } else {
        0.0
    };

    let consistency_score = if record.best_streak > 0 {
        (f64::from(record.current_streak) / f64::from(record.best_streak) * 100.0).round() as u32
    } else {
        0
    };

    EngagementMetrics {
        activities_per_day,
        diversity_score: diversity_score(record),
        consistency_score,
    }
}

/// Most-used categories, ties in category order.
pub fn top_categories(record: &UserPointsRecord) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = record
        .category_preferences
        .iter()
        .map(|(category, &count)| CategoryCount {
            category: category.clone(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_CATEGORY_COUNT);
    counts
}

pub fn user_insights(
    record: &UserPointsRecord,
    analytics: &PointsAnalytics,
    today: NaiveDate,
) -> UserInsights {
    UserInsights {
        user_id: record.user_id.clone(),
        user_stats: UserStats {
            total_points: record.total_points,
            level: record.level,
            current_streak: record.current_streak,
            best_streak: record.best_streak,
            total_activities: record.activities.len(),
        },
        ranking: ranking(record, analytics),
        recommendations: ledger::interest_recommendations(record),
        growth_opportunities: growth_opportunities(record, analytics),
        engagement_metrics: engagement_metrics(record, today),
        top_categories: top_categories(record),
    }
}
