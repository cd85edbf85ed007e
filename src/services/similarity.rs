// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cultural similarity scoring and match ranking.
//!
//! Pure functions over [`CulturalProfile`]s; no I/O. All string comparisons
//! are case-insensitive and shared lists keep the first profile's spelling.

use crate::models::profile::same_text;
use crate::models::{CulturalProfile, MatchResult};
use std::cmp::Ordering;

/// Weights of the similarity components. They sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityWeights {
    pub language: f64,
    pub interest: f64,
    pub location: f64,
    pub cultural: f64,
}

/// The one weighting used for every similarity score.
pub const WEIGHTS: SimilarityWeights = SimilarityWeights {
    language: 0.3,
    interest: 0.4,
    location: 0.2,
    cultural: 0.1,
};

/// Default number of matches returned.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Ranking options for a match search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankOptions {
    pub max_results: usize,
    /// Rank by `similarity + 0.5 * bridge potential` instead of similarity alone
    pub prioritize_cross_cultural: bool,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            prioritize_cross_cultural: true,
        }
    }
}

fn contains_ignore_case(list: &[String], value: &str) -> bool {
    list.iter().any(|v| same_text(v, value))
}

/// Distinct entries of `a` that also appear in `b`.
fn shared(a: &[String], b: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in a {
        if contains_ignore_case(b, v) && !contains_ignore_case(&out, v) {
            out.push(v.clone());
        }
    }
    out
}

/// `|shared| / max(|a|, |b|)`, or 0 with nothing shared.
fn overlap_score(shared: usize, a: usize, b: usize) -> f64 {
    if shared == 0 {
        return 0.0;
    }
    shared as f64 / a.max(b) as f64
}

/// Compare two profiles.
///
/// The bridge potential branches are checked in order: disjoint cultural
/// backgrounds with a shared interest, then more than one shared language.
pub fn similarity(a: &CulturalProfile, b: &CulturalProfile) -> MatchResult {
    let shared_languages = shared(&a.languages, &b.languages);
    let shared_interests = shared(&a.interests, &b.interests);
    let shared_locations = shared(&a.location_preferences, &b.location_preferences);

    let language_score = overlap_score(shared_languages.len(), a.languages.len(), b.languages.len());
    let interest_score = overlap_score(shared_interests.len(), a.interests.len(), b.interests.len());
    let location_score = overlap_score(
        shared_locations.len(),
        a.location_preferences.len(),
        b.location_preferences.len(),
    );

    let different_cultures = !a
        .cultural_background
        .iter()
        .any(|bg| b.cultural_background.contains(bg));

    let cultural_bridge_potential = if different_cultures && !shared_interests.is_empty() {
        (shared_interests.len() as f64 * 0.3 + shared_languages.len() as f64 * 0.2).min(1.0)
    } else if shared_languages.len() > 1 {
        0.7
    } else {
        0.0
    };

    let similarity_score = language_score * WEIGHTS.language
        + interest_score * WEIGHTS.interest
        + location_score * WEIGHTS.location
        + cultural_bridge_potential * WEIGHTS.cultural;

    let recommendation_reason = recommendation_reason(
        &shared_languages,
        &shared_interests,
        &shared_locations,
        different_cultures,
    );

    MatchResult {
        user_id1: a.user_id.clone(),
        user_id2: b.user_id.clone(),
        similarity_score,
        shared_languages,
        shared_interests,
        cultural_bridge_potential,
        recommendation_reason,
    }
}

fn first_three(items: &[String]) -> String {
    items.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
}

fn recommendation_reason(
    shared_languages: &[String],
    shared_interests: &[String],
    shared_locations: &[String],
    different_cultures: bool,
) -> String {
    if !shared_interests.is_empty() && different_cultures {
        format!(
            "Despite different cultural backgrounds, you share interests in {}. \
             This is a great opportunity for cross-cultural collaboration!",
            first_three(shared_interests)
        )
    } else if shared_languages.len() > 1 {
        format!(
            "You both speak {}, making communication easy and creating opportunities \
             to bridge communities.",
            shared_languages.join(" and ")
        )
    } else if shared_interests.len() > 2 {
        format!(
            "You share strong interests in {}, suggesting great collaboration potential.",
            first_three(shared_interests)
        )
    } else if let Some(location) = shared_locations.first() {
        format!(
            "You both engage in events at {}, making it easy to connect in person.",
            location
        )
    } else {
        "Complementary skills and backgrounds could lead to unique partnerships.".to_string()
    }
}

/// Score every candidate against `target` and keep the best `max_results`.
///
/// Candidates with the target's own user id are skipped. Ties keep the
/// candidates' original order.
pub fn rank_matches(
    target: &CulturalProfile,
    candidates: &[CulturalProfile],
    options: RankOptions,
) -> Vec<MatchResult> {
    let mut matches: Vec<MatchResult> = candidates
        .iter()
        .filter(|c| c.user_id != target.user_id)
        .map(|c| similarity(target, c))
        .collect();

    sort_matches(&mut matches, options.prioritize_cross_cultural);
    matches.truncate(options.max_results);
    matches
}

/// Sort descending by the ranking score.
pub fn sort_matches(matches: &mut [MatchResult], prioritize_cross_cultural: bool) {
    let key = |m: &MatchResult| {
        if prioritize_cross_cultural {
            m.cross_cultural_score()
        } else {
            m.similarity_score
        }
    };
    matches.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::infer_cultural_background;

    fn profile(id: &str, languages: &[&str], interests: &[&str], locations: &[&str]) -> CulturalProfile {
        let languages: Vec<String> = languages.iter().map(|s| s.to_string()).collect();
        CulturalProfile {
            user_id: id.to_string(),
            cultural_background: infer_cultural_background(&languages),
            languages,
            interests: interests.iter().map(|s| s.to_string()).collect(),
            location_preferences: locations.iter().map(|s| s.to_string()).collect(),
            participation_history: vec![],
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_cross_cultural_scenario() {
        let a = profile("a", &["English", "Spanish"], &["music", "food"], &[]);
        let b = profile("b", &["English", "Arabic"], &["food", "sports"], &[]);

        let result = similarity(&a, &b);
        assert_eq!(result.shared_languages, vec!["English"]);
        assert_eq!(result.shared_interests, vec!["food"]);
        assert!(approx(result.cultural_bridge_potential, 0.5));
        assert!(approx(result.similarity_score, 0.4));
        assert!(result
            .recommendation_reason
            .starts_with("Despite different cultural backgrounds"));
    }

    #[test]
    fn test_bilingual_bridge_when_cultures_overlap() {
        let a = profile("a", &["English", "Spanish"], &["music"], &[]);
        let b = profile("b", &["spanish", "english", "French"], &["art"], &[]);

        let result = similarity(&a, &b);
        assert_eq!(result.shared_languages, vec!["English", "Spanish"]);
        assert!(approx(result.cultural_bridge_potential, 0.7));
        assert_eq!(
            result.recommendation_reason,
            "You both speak English and Spanish, making communication easy and creating \
             opportunities to bridge communities."
        );
        // 0.3 * 2/3 + 0.1 * 0.7
        assert!(approx(result.similarity_score, 0.27));
    }

    #[test]
    fn test_bridge_potential_is_capped() {
        let a = profile("a", &["Hindi", "English"], &["food", "music", "art", "sports"], &[]);
        let b = profile("b", &["Polish", "English"], &["food", "music", "art", "sports"], &[]);

        let result = similarity(&a, &b);
        assert!(approx(result.cultural_bridge_potential, 1.0));
    }

    #[test]
    fn test_shared_interest_reason() {
        // Same background, one shared language, three shared interests
        let a = profile("a", &["Spanish"], &["food", "music", "art", "health"], &[]);
        let b = profile("b", &["Spanish"], &["art", "music", "food"], &[]);

        let result = similarity(&a, &b);
        assert!(approx(result.cultural_bridge_potential, 0.0));
        assert_eq!(
            result.recommendation_reason,
            "You share strong interests in food, music, art, suggesting great collaboration potential."
        );
    }

    #[test]
    fn test_location_and_fallback_reasons() {
        let a = profile("a", &["English"], &[], &["Aston", "Digbeth"]);
        let b = profile("b", &["English"], &[], &["digbeth"]);
        let result = similarity(&a, &b);
        assert_eq!(
            result.recommendation_reason,
            "You both engage in events at Digbeth, making it easy to connect in person."
        );
        // 0.3 * 1 + 0.2 * 1/2
        assert!(approx(result.similarity_score, 0.4));

        let c = profile("c", &["Korean"], &[], &[]);
        let result = similarity(&a, &c);
        assert_eq!(
            result.recommendation_reason,
            "Complementary skills and backgrounds could lead to unique partnerships."
        );
        assert!(approx(result.similarity_score, 0.0));
    }

    #[test]
    fn test_empty_profiles_score_zero() {
        let a = profile("a", &[], &[], &[]);
        let b = profile("b", &[], &[], &[]);
        let result = similarity(&a, &b);
        assert!(approx(result.similarity_score, 0.0));
        assert!(result.similarity_score.is_finite());
    }

    #[test]
    fn test_sort_prioritizes_bridge_potential() {
        let make = |id: &str, score: f64, bridge: f64| MatchResult {
            user_id1: "t".to_string(),
            user_id2: id.to_string(),
            similarity_score: score,
            shared_languages: vec![],
            shared_interests: vec![],
            cultural_bridge_potential: bridge,
            recommendation_reason: String::new(),
        };

        let mut matches = vec![make("x", 0.8, 0.0), make("y", 0.6, 0.5), make("z", 0.9, 0.0)];
        sort_matches(&mut matches, true);
        let order: Vec<&str> = matches.iter().map(|m| m.user_id2.as_str()).collect();
        assert_eq!(order, vec!["z", "y", "x"]);

        sort_matches(&mut matches, false);
        let order: Vec<&str> = matches.iter().map(|m| m.user_id2.as_str()).collect();
        assert_eq!(order, vec!["z", "x", "y"]);
    }

    #[test]
    fn test_rank_skips_self_and_truncates() {
        let target = profile("t", &["English"], &["food"], &[]);
        let candidates = vec![
            profile("t", &["English"], &["food"], &[]),
            profile("a", &["English"], &["food"], &[]),
            profile("b", &["English"], &[], &[]),
            profile("c", &["Arabic"], &[], &[]),
        ];

        let ranked = rank_matches(
            &target,
            &candidates,
            RankOptions {
                max_results: 2,
                prioritize_cross_cultural: false,
            },
        );
        let ids: Vec<&str> = ranked.iter().map(|m| m.user_id2.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_non_ascii_case_variants_count_once() {
        let built = CulturalProfile::build(&crate::models::VolunteerProfile {
            user_id: "a".to_string(),
            name: String::new(),
            languages: vec!["Español".to_string(), "ESPAÑOL".to_string()],
            declared_interests: vec![],
            participation: vec![],
        });
        let b = profile("b", &["español"], &[], &[]);

        let result = similarity(&built, &b);
        assert_eq!(result.shared_languages, vec!["Español"]);
        assert!(approx(result.cultural_bridge_potential, 0.0));
        assert!(!result.recommendation_reason.contains("ESPAÑOL"));

        // Duplicates in a hand-built profile are not double counted either
        let a = profile("a", &["Español", "ESPAÑOL"], &[], &[]);
        let result = similarity(&a, &b);
        assert_eq!(result.shared_languages, vec!["Español"]);
        assert!(approx(result.cultural_bridge_potential, 0.0));
    }
}
