// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event recommendations and per-event volunteer/attendee pairings.
//!
//! Pure functions over profiles and events; the caller loads them.

use crate::models::profile::same_text;
use crate::models::{
    CulturalProfile, Event, EventPairing, EventPairings, EventRecommendation, PairedUser,
    ParticipationRole, VolunteerProfile,
};
use crate::services::similarity::similarity;
use chrono::NaiveDate;

/// Event name mentions one of the user's interests.
pub const INTEREST_MATCH_POINTS: u32 = 40;
/// Event is at one of the user's past locations.
pub const LOCATION_MATCH_POINTS: u32 = 30;
/// User took part in an event about the same interest before.
pub const HISTORY_MATCH_POINTS: u32 = 20;
/// Nudge for users with few interests toward something new.
pub const NEW_EXPERIENCE_POINTS: u32 = 10;

/// Events scoring below this are not recommended.
pub const MINIMUM_MATCH_SCORE: u32 = 40;
/// Upcoming events considered, soonest first.
pub const MAX_CANDIDATE_EVENTS: usize = 50;
pub const DEFAULT_MAX_EVENT_RECOMMENDATIONS: usize = 10;
pub const MAX_COMPATIBLE_USERS: usize = 5;
pub const MAX_PAIRINGS: usize = 20;

const STOP_WORDS: [&str; 11] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for",
];

/// Lowercased words of an event name longer than three characters.
pub fn event_keywords(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() > 3 && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Match score and the reasons behind it for one event.
pub fn score_event(profile: &CulturalProfile, event: &Event) -> (u32, Vec<String>) {
    let name = event.name.to_lowercase();
    let matching: Vec<&String> = profile
        .interests
        .iter()
        .filter(|i| name.contains(&i.to_lowercase()))
        .collect();

    let mut score = 0;
    let mut reasons = Vec::new();

    if !matching.is_empty() {
        score += INTEREST_MATCH_POINTS;
        let names: Vec<&str> = matching.iter().map(|i| i.as_str()).collect();
        reasons.push(format!("Matches your interests in {}", names.join(", ")));
    }

    if let Some(location) = event.location.as_deref().filter(|loc| {
        profile
            .location_preferences
            .iter()
            .any(|pref| same_text(pref, loc))
    }) {
        score += LOCATION_MATCH_POINTS;
        reasons.push(format!("In your preferred area: {}", location));
    }

    if let Some(interest) = matching.first() {
        let interest = interest.to_lowercase();
        if profile
            .participation_history
            .iter()
            .any(|h| h.event_name.to_lowercase().contains(&interest))
        {
            score += HISTORY_MATCH_POINTS;
            reasons.push("Similar to events you enjoyed before".to_string());
        }
    }

    if matching.is_empty() && profile.interests.len() < 3 {
        score += NEW_EXPERIENCE_POINTS;
        reasons.push("Opportunity to explore new interests".to_string());
    }

    (score, reasons)
}

/// Rating out of 5, one decimal.
pub fn predicted_satisfaction(score: u32) -> f64 {
    ((f64::from(score) / 20.0 * 10.0).round() / 10.0).min(5.0)
}

fn display_name(profile: &VolunteerProfile) -> &str {
    profile
        .name
        .split_whitespace()
        .next()
        .unwrap_or(&profile.user_id)
}

/// Volunteers (other than `exclude`) who helped at events sharing the
/// event name's first keyword. A name without keywords matches any event.
pub fn compatible_volunteers(
    event: &Event,
    community: &[VolunteerProfile],
    exclude: &str,
) -> Vec<String> {
    let keyword = event_keywords(&event.name)
        .into_iter()
        .next()
        .unwrap_or_default();

    community
        .iter()
        .filter(|p| p.user_id != exclude)
        .filter(|p| {
            p.participation.iter().any(|r| {
                r.role == ParticipationRole::Volunteer
                    && r.event_name.to_lowercase().contains(&keyword)
            })
        })
        .take(MAX_COMPATIBLE_USERS)
        .map(|p| format!("{} (Volunteer)", display_name(p)))
        .collect()
}

/// Upcoming events for `profile`, best first.
///
/// Only the `MAX_CANDIDATE_EVENTS` soonest events on or after `today` are
/// scored. Equal scores keep date order.
pub fn recommend_events(
    profile: &CulturalProfile,
    events: &[Event],
    community: &[VolunteerProfile],
    today: NaiveDate,
    max_results: usize,
) -> Vec<EventRecommendation> {
    let mut upcoming: Vec<&Event> = events.iter().filter(|e| e.date >= today).collect();
    upcoming.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.event_id.cmp(&b.event_id)));
    upcoming.truncate(MAX_CANDIDATE_EVENTS);

    let mut recommendations: Vec<EventRecommendation> = upcoming
        .into_iter()
        .filter_map(|event| {
            let (match_score, relevance_reasons) = score_event(profile, event);
            if match_score < MINIMUM_MATCH_SCORE {
                return None;
            }
            Some(EventRecommendation {
                event_id: event.event_id.clone(),
                event_name: event.name.clone(),
                date: event.date,
                match_score,
                relevance_reasons,
                compatible_users: compatible_volunteers(event, community, &profile.user_id),
                predicted_satisfaction: predicted_satisfaction(match_score),
            })
        })
        .collect();

    recommendations.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    recommendations.truncate(max_results);
    recommendations
}

fn paired_user(profile: &VolunteerProfile) -> PairedUser {
    let name = if profile.name.trim().is_empty() {
        profile.user_id.clone()
    } else {
        profile.name.clone()
    };
    PairedUser {
        user_id: profile.user_id.clone(),
        name,
    }
}

/// Pair every volunteer of `event` with every attendee, best first.
///
/// Organizers are not paired. Someone listed in both roles is never paired
/// with themselves.
pub fn smart_pairings(event: &Event, profiles: &[VolunteerProfile]) -> EventPairings {
    let with_role = |role: ParticipationRole| {
        profiles
            .iter()
            .filter(|p| {
                p.participation
                    .iter()
                    .any(|r| r.event_id == event.event_id && r.role == role)
            })
            .map(|p| (p, CulturalProfile::build(p)))
            .collect::<Vec<_>>()
    };
    let volunteers = with_role(ParticipationRole::Volunteer);
    let attendees = with_role(ParticipationRole::Attendee);

    let mut pairs = Vec::new();
    for (volunteer, v_profile) in &volunteers {
        for (attendee, a_profile) in &attendees {
            if volunteer.user_id == attendee.user_id {
                continue;
            }
            let result = similarity(v_profile, a_profile);
            pairs.push(EventPairing {
                volunteer: paired_user(volunteer),
                attendee: paired_user(attendee),
                match_score: (result.similarity_score * 100.0).round() as u32,
                reason: result.recommendation_reason,
            });
        }
    }

    pairs.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    let total_pairs = pairs.len();
    pairs.truncate(MAX_PAIRINGS);

    EventPairings {
        event_id: event.event_id.clone(),
        event_name: event.name.clone(),
        total_pairs,
        pairs,
    }
}
