// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Volunteer profiles and the cultural profiles derived from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Interest keywords recognised in event names.
pub const INTEREST_KEYWORDS: [&str; 16] = [
    "food",
    "music",
    "art",
    "sports",
    "education",
    "health",
    "environment",
    "community",
    "technology",
    "culture",
    "charity",
    "children",
    "elderly",
    "homeless",
    "animals",
    "sustainability",
];

/// Language assumed when a profile lists none.
pub const DEFAULT_LANGUAGE: &str = "English";

/// Role a user played at an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationRole {
    Volunteer,
    Attendee,
    Organizer,
}

/// One event a user took part in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationRecord {
    pub event_id: String,
    pub event_name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub location: Option<String>,
    pub role: ParticipationRole,
}

/// Persisted volunteer/attendee data that cultural profiles are built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerProfile {
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub languages: Vec<String>,
    /// Interests the user picked explicitly (in addition to inferred ones)
    #[serde(default)]
    pub declared_interests: Vec<String>,
    #[serde(default)]
    pub participation: Vec<ParticipationRecord>,
}

/// Recommendation input, recomputed on demand from a `VolunteerProfile`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct CulturalProfile {
    pub user_id: String,
    pub languages: Vec<String>,
    pub cultural_background: Vec<String>,
    pub interests: Vec<String>,
    pub location_preferences: Vec<String>,
    pub participation_history: Vec<ParticipationRecord>,
}

impl CulturalProfile {
    /// Derive a cultural profile from persisted volunteer data.
    pub fn build(profile: &VolunteerProfile) -> Self {
        let mut languages = Vec::new();
        for lang in &profile.languages {
            push_unique(&mut languages, lang.trim());
        }
        if languages.is_empty() {
            languages.push(DEFAULT_LANGUAGE.to_string());
        }

        let mut interests = Vec::new();
        for interest in &profile.declared_interests {
            push_unique(&mut interests, interest.trim());
        }
        let event_names: Vec<&str> = profile
            .participation
            .iter()
            .map(|p| p.event_name.as_str())
            .collect();
        for keyword in extract_interests(&event_names) {
            push_unique(&mut interests, keyword);
        }

        let mut location_preferences = Vec::new();
        for location in profile.participation.iter().filter_map(|p| p.location.as_deref()) {
            push_unique(&mut location_preferences, location.trim());
        }

        Self {
            user_id: profile.user_id.clone(),
            cultural_background: infer_cultural_background(&languages),
            languages,
            interests,
            location_preferences,
            participation_history: profile.participation.clone(),
        }
    }
}

/// Case-insensitive text equality, shared by profile building and scoring.
pub fn same_text(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Append `value` unless it is empty or already present (case-insensitive).
fn push_unique(list: &mut Vec<String>, value: &str) {
    if value.is_empty() || list.iter().any(|v| same_text(v, value)) {
        return;
    }
    list.push(value.to_string());
}

/// Cultural group associated with a language, if any.
pub fn cultural_group_for(language: &str) -> Option<&'static str> {
    let group = match language.trim().to_lowercase().as_str() {
        "spanish" => "Hispanic/Latino",
        "chinese" | "mandarin" | "cantonese" | "japanese" | "korean" => "East Asian",
        "arabic" => "Middle Eastern",
        "hindi" | "urdu" => "South Asian",
        "french" => "Francophone",
        "portuguese" => "Lusophone",
        "polish" | "russian" => "Eastern European",
        "vietnamese" | "tagalog" => "Southeast Asian",
        "italian" | "greek" => "Mediterranean",
        "german" => "Germanic European",
        _ => return None,
    };
    Some(group)
}

/// Distinct cultural groups for a list of languages, in first-seen order.
pub fn infer_cultural_background<S: AsRef<str>>(languages: &[S]) -> Vec<String> {
    let mut backgrounds: Vec<String> = Vec::new();
    for group in languages.iter().filter_map(|l| cultural_group_for(l.as_ref())) {
        if !backgrounds.iter().any(|b| b == group) {
            backgrounds.push(group.to_string());
        }
    }
    backgrounds
}

/// Interest keywords that appear in any of the event names.
pub fn extract_interests(event_names: &[&str]) -> Vec<&'static str> {
    let lowered: Vec<String> = event_names.iter().map(|n| n.to_lowercase()).collect();
    INTEREST_KEYWORDS
        .iter()
        .copied()
        .filter(|keyword| lowered.iter().any(|name| name.contains(keyword)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participation(name: &str, location: Option<&str>) -> ParticipationRecord {
        ParticipationRecord {
            event_id: name.to_lowercase().replace(' ', "-"),
            event_name: name.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            location: location.map(String::from),
            role: ParticipationRole::Volunteer,
        }
    }

    #[test]
    fn test_infer_cultural_background_dedups() {
        let langs = ["English", "Mandarin", "Japanese", "Spanish"];
        assert_eq!(
            infer_cultural_background(&langs),
            vec!["East Asian".to_string(), "Hispanic/Latino".to_string()]
        );
        assert!(infer_cultural_background(&["English"]).is_empty());
    }

    #[test]
    fn test_extract_interests_from_event_names() {
        let names = ["Community Food Drive", "Park Cleanup for the Environment"];
        assert_eq!(
            extract_interests(&names),
            vec!["food", "environment", "community"]
        );
    }

    #[test]
    fn test_build_defaults_to_english() {
        let profile = VolunteerProfile {
            user_id: "v1".to_string(),
            name: "Ada".to_string(),
            languages: vec![],
            declared_interests: vec![],
            participation: vec![],
        };

        let cultural = CulturalProfile::build(&profile);
        assert_eq!(cultural.languages, vec!["English".to_string()]);
        assert!(cultural.cultural_background.is_empty());
        assert!(cultural.interests.is_empty());
    }

    #[test]
    fn test_build_merges_declared_and_inferred_interests() {
        let profile = VolunteerProfile {
            user_id: "v2".to_string(),
            name: "Bo".to_string(),
            languages: vec![" Arabic ".to_string(), "English".to_string()],
            declared_interests: vec!["Music".to_string(), "food".to_string()],
            participation: vec![
                participation("Food Bank Shift", Some("Birmingham")),
                participation("Music in the Park", Some("birmingham")),
                participation("Charity Run", None),
            ],
        };

        let cultural = CulturalProfile::build(&profile);
        assert_eq!(cultural.languages, vec!["Arabic", "English"]);
        assert_eq!(cultural.cultural_background, vec!["Middle Eastern"]);
        assert_eq!(cultural.interests, vec!["Music", "food", "charity"]);
        assert_eq!(cultural.location_preferences, vec!["Birmingham"]);
        assert_eq!(cultural.participation_history.len(), 3);
    }

    #[test]
    fn test_build_dedups_non_ascii_case_variants() {
        let profile = VolunteerProfile {
            user_id: "v3".to_string(),
            name: "Lucía".to_string(),
            languages: vec![
                "Español".to_string(),
                "ESPAÑOL".to_string(),
                " español ".to_string(),
            ],
            declared_interests: vec!["Música".to_string(), "MÚSICA".to_string()],
            participation: vec![],
        };

        let cultural = CulturalProfile::build(&profile);
        assert_eq!(cultural.languages, vec!["Español"]);
        assert_eq!(cultural.interests, vec!["Música"]);
        assert!(same_text("ÉTÉ", "été"));
    }
}
