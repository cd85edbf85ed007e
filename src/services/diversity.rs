// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Community-wide language and cultural diversity analysis.

use crate::models::matching::{CommunityDiversity, GroupCount, LanguageCount};
use crate::models::profile::cultural_group_for;
use crate::models::VolunteerProfile;

/// Language groups of at least this size can host multilingual events.
const LARGE_LANGUAGE_GROUP: u32 = 5;
/// Cultural groups smaller than this need outreach.
const SMALL_CULTURAL_GROUP: u32 = 3;

/// Count `key` in a first-seen-ordered tally.
fn tally(counts: &mut Vec<(String, u32)>, key: &str) {
    match counts.iter_mut().find(|(k, _)| k == key) {
        Some((_, count)) => *count += 1,
        None => counts.push((key.to_string(), 1)),
    }
}

/// Simpson diversity index `1 - Σp²` scaled to 0-100.
pub fn simpson_score(counts: &[u32]) -> u32 {
    let total: u32 = counts.iter().sum();
    if total == 0 {
        return 0;
    }
    let sum_of_squares: f64 = counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total as f64;
            p * p
        })
        .sum();
    ((1.0 - sum_of_squares) * 100.0).round() as u32
}

/// Analyse languages and cultural groups across all profiles.
///
/// Profiles without any language are not counted. A user contributes one
/// count to a cultural group per language that maps to it.
pub fn analyze(profiles: &[VolunteerProfile]) -> CommunityDiversity {
    let mut languages: Vec<(String, u32)> = Vec::new();
    let mut groups: Vec<(String, u32)> = Vec::new();
    let mut total_users = 0;

    for profile in profiles {
        let spoken: Vec<&str> = profile
            .languages
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();
        if spoken.is_empty() {
            continue;
        }
        total_users += 1;

        for lang in spoken {
            tally(&mut languages, lang);
            if let Some(group) = cultural_group_for(lang) {
                tally(&mut groups, group);
            }
        }
    }

    // Stable sorts keep first-seen order among equal counts
    languages.sort_by(|a, b| b.1.cmp(&a.1));
    groups.sort_by(|a, b| b.1.cmp(&a.1));

    let group_counts: Vec<u32> = groups.iter().map(|(_, c)| *c).collect();
    let languages_represented: Vec<LanguageCount> = languages
        .into_iter()
        .map(|(language, count)| LanguageCount { language, count })
        .collect();
    let cultural_groups: Vec<GroupCount> = groups
        .into_iter()
        .map(|(group, count)| GroupCount { group, count })
        .collect();

    let bridging_opportunities = bridging_opportunities(&languages_represented, &cultural_groups);

    CommunityDiversity {
        total_users,
        languages_represented,
        cultural_groups,
        diversity_score: simpson_score(&group_counts),
        bridging_opportunities,
    }
}

/// Suggestions for connecting communities, based on group sizes.
pub fn bridging_opportunities(languages: &[LanguageCount], groups: &[GroupCount]) -> Vec<String> {
    let mut opportunities = Vec::new();

    let large: Vec<&LanguageCount> = languages
        .iter()
        .filter(|l| l.count >= LARGE_LANGUAGE_GROUP)
        .collect();
    if large.len() >= 2 {
        opportunities.push(format!(
            "Host multilingual events featuring {} and {} to bridge communities",
            large[0].language, large[1].language
        ));
    }

    if groups.len() >= 3 {
        let names: Vec<&str> = groups.iter().take(3).map(|g| g.group.as_str()).collect();
        opportunities.push(format!(
            "Create cultural exchange programs connecting {}",
            names.join(", ")
        ));
    }

    let small: Vec<&str> = groups
        .iter()
        .filter(|g| g.count < SMALL_CULTURAL_GROUP)
        .map(|g| g.group.as_str())
        .collect();
    if !small.is_empty() {
        opportunities.push(format!(
            "Increase outreach to underrepresented communities: {}",
            small.join(", ")
        ));
    }

    if languages.len() >= 5 {
        opportunities
            .push("Recruit multilingual volunteers as cultural ambassadors and translators".to_string());
    }

    opportunities
}
