//! Data-driven bot difficulty presets

use serde::{Deserialize, Serialize};

/// Bot skill levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BotSkill {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl BotSkill {
    pub fn as_str(&self) -> &'static str {
        match self {
            BotSkill::Easy => "Easy",
            BotSkill::Normal => "Normal",
            BotSkill::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(BotSkill::Easy),
            "normal" | "medium" => Some(BotSkill::Normal),
            "hard" => Some(BotSkill::Hard),
            _ => None,
        }
    }

    /// Distance at which a hazard triggers evasion
    pub fn evade_distance(&self) -> f32 {
        match self {
            BotSkill::Easy => 120.0,
            BotSkill::Normal => 160.0,
            BotSkill::Hard => 200.0,
        }
    }

    /// Cargo fullness ratio that sends the bot to the hub
    pub fn bank_ratio(&self) -> f32 {
        match self {
            BotSkill::Easy => 1.0,
            BotSkill::Normal => 0.75,
            BotSkill::Hard => 0.5,
        }
    }

    /// Seconds between behavior re-executions (transition checks are never
    /// delayed)
    pub fn reaction_delay(&self) -> f32 {
        match self {
            BotSkill::Easy => 0.8,
            BotSkill::Normal => 0.5,
            BotSkill::Hard => 0.25,
        }
    }

    /// Steering accuracy in (0, 1]; lower values add more aim noise
    pub fn accuracy(&self) -> f32 {
        match self {
            BotSkill::Easy => 0.6,
            BotSkill::Normal => 0.8,
            BotSkill::Hard => 0.95,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_round_trips() {
        for skill in [BotSkill::Easy, BotSkill::Normal, BotSkill::Hard] {
            assert_eq!(BotSkill::from_str(skill.as_str()), Some(skill));
        }
        assert_eq!(BotSkill::from_str("medium"), Some(BotSkill::Normal));
        assert_eq!(BotSkill::from_str("nightmare"), None);
    }

    #[test]
    fn test_harder_bots_react_faster_and_bank_sooner() {
        assert!(BotSkill::Hard.reaction_delay() < BotSkill::Easy.reaction_delay());
        assert!(BotSkill::Hard.bank_ratio() < BotSkill::Easy.bank_ratio());
        assert!(BotSkill::Hard.evade_distance() > BotSkill::Easy.evade_distance());
        assert!(BotSkill::Hard.accuracy() > BotSkill::Easy.accuracy());
    }
}
