//! Preset challenges offered on the create form

use serde::Serialize;

use crate::entities::VerificationType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChallengeTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub points_per_checkin: i32,
    pub streak_bonus: i32,
    pub verification_type: VerificationType,
    pub suggested_duration: u32,
}

pub const CHALLENGE_TEMPLATES: &[ChallengeTemplate] = &[
    ChallengeTemplate {
        id: "exercise",
        name: "Exercise Daily",
        description: "Commit to at least 30 minutes of exercise every day.",
        icon: "\u{1F3C3}",
        points_per_checkin: 10,
        streak_bonus: 5,
        verification_type: VerificationType::PhotoOptional,
        suggested_duration: 30,
    },
    ChallengeTemplate {
        id: "reading",
        name: "Read Every Day",
        description: "Read for at least 20 minutes daily. Books, articles, or long-form content.",
        icon: "\u{1F4D6}",
        points_per_checkin: 10,
        streak_bonus: 5,
        verification_type: VerificationType::None,
        suggested_duration: 30,
    },
    ChallengeTemplate {
        id: "meditation",
        name: "Daily Meditation",
        description: "Practice mindfulness or meditation for at least 10 minutes each day.",
        icon: "\u{1F9D8}",
        points_per_checkin: 10,
        streak_bonus: 5,
        verification_type: VerificationType::None,
        suggested_duration: 21,
    },
    ChallengeTemplate {
        id: "no_social_media",
        name: "No Social Media",
        description: "Stay off social media platforms for the duration of the challenge.",
        icon: "\u{1F4F5}",
        points_per_checkin: 15,
        streak_bonus: 8,
        verification_type: VerificationType::None,
        suggested_duration: 14,
    },
    ChallengeTemplate {
        id: "hydration",
        name: "Drink 8 Glasses of Water",
        description: "Stay hydrated by drinking at least 8 glasses of water every day.",
        icon: "\u{1F4A7}",
        points_per_checkin: 10,
        streak_bonus: 3,
        verification_type: VerificationType::None,
        suggested_duration: 30,
    },
    ChallengeTemplate {
        id: "journaling",
        name: "Daily Journaling",
        description: "Write in your journal every day. Reflect on your goals, wins, and learnings.",
        icon: "\u{1F4DD}",
        points_per_checkin: 10,
        streak_bonus: 5,
        verification_type: VerificationType::None,
        suggested_duration: 30,
    },
    ChallengeTemplate {
        id: "early_riser",
        name: "Wake Up Before 7 AM",
        description: "Start your day early. Check in before 7 AM to prove you are up.",
        icon: "\u{2600}\u{FE0F}",
        points_per_checkin: 15,
        streak_bonus: 10,
        verification_type: VerificationType::PhotoOptional,
        suggested_duration: 21,
    },
    ChallengeTemplate {
        id: "coding",
        name: "Code Every Day",
        description: "Write code daily. Ship features, fix bugs, or learn something new.",
        icon: "\u{1F4BB}",
        points_per_checkin: 10,
        streak_bonus: 5,
        verification_type: VerificationType::PhotoOptional,
        suggested_duration: 30,
    },
];

pub fn find_template(id: &str) -> Option<&'static ChallengeTemplate> {
    CHALLENGE_TEMPLATES.iter().find(|t| t.id == id)
}
