use serde::{Deserialize, Serialize};

use crate::engine::mapper;
use crate::model::game_state::GameStatePatch;

pub const OPPONENT_SLOTS: usize = 3;

/* =========================
   Age
   ========================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Age {
    #[default]
    One,
    Two,
    Three,
}

impl Age {
    pub const ALL: [Age; 3] = [Age::One, Age::Two, Age::Three];

    pub fn label(self) -> &'static str {
        match self {
            Age::One => "Age I",
            Age::Two => "Age II",
            Age::Three => "Age III",
        }
    }
}

impl TryFrom<u8> for Age {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Age::One),
            2 => Ok(Age::Two),
            3 => Ok(Age::Three),
            other => Err(format!("age must be 1, 2 or 3 (got {other})")),
        }
    }
}

impl From<Age> for u8 {
    fn from(age: Age) -> Self {
        match age {
            Age::One => 1,
            Age::Two => 2,
            Age::Three => 3,
        }
    }
}

/* =========================
   Form State
   ========================= */

/// One opponent row of the form. A slot with zero military strength is
/// left out of the request, which is how the user removes an opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpponentSlot {
    pub military_strength: u32,
    pub culture_production: u32,
    pub culture_points: u32,
}

impl Default for OpponentSlot {
    fn default() -> Self {
        Self {
            military_strength: 6,
            culture_production: 2,
            culture_points: 5,
        }
    }
}

/// Everything the user can type in, kept flat the way the form shows it.
/// List fields hold comma-separated text and are only split when mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub age: Age,
    pub round: u32,
    pub player_count: u32,

    pub civil_actions: u32,
    pub military_actions: u32,
    pub food_production: u32,
    pub ore_production: u32,
    pub science_production: u32,
    pub culture_production: u32,
    pub military_strength: u32,
    pub culture_points: u32,

    pub leader: String,
    pub wonders_complete: String,
    pub wonders_in_progress: String,
    pub technologies: String,
    pub hand_cards: String,

    pub opponents: [OpponentSlot; OPPONENT_SLOTS],

    pub card_row: String,
    pub next_event: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            age: Age::One,
            round: 1,
            player_count: 4,

            civil_actions: 5,
            military_actions: 3,
            food_production: 5,
            ore_production: 4,
            science_production: 2,
            culture_production: 2,
            military_strength: 6,
            culture_points: 5,

            leader: String::new(),
            wonders_complete: String::new(),
            wonders_in_progress: String::new(),
            technologies: String::new(),
            hand_cards: String::new(),

            opponents: [OpponentSlot::default(); OPPONENT_SLOTS],

            card_row: String::new(),
            next_event: String::new(),
        }
    }
}

/* =========================
   Reducer
   ========================= */

#[derive(Debug, Clone)]
pub enum FormAction {
    SetAge(Age),
    /// Replace the whole form, e.g. when a preset is loaded
    Replace(FormState),
    /// Merge a parsed screenshot into the current values
    ApplyGameState(GameStatePatch),
    Reset,
}

impl FormState {
    pub fn apply(&mut self, action: FormAction) {
        match action {
            FormAction::SetAge(age) => self.age = age,
            FormAction::Replace(form) => *self = form,
            FormAction::ApplyGameState(patch) => {
                *self = mapper::apply_game_state(self, &patch);
            }
            FormAction::Reset => *self = FormState::default(),
        }
    }

    pub fn strongest_opponent(&self) -> u32 {
        self.opponents
            .iter()
            .map(|o| o.military_strength)
            .max()
            .unwrap_or(0)
    }
}

/// Parse a typed counter. Anything that does not start with digits is 0,
/// so negative input can never reach the form.
pub fn parse_count(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());

    trimmed[..digits_end].parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::game_state::{MetaPatch, PlayerPatch};

    #[test]
    fn parse_count_defaults_to_zero() {
        assert_eq!(parse_count("12"), 12);
        assert_eq!(parse_count("  7 "), 7);
        assert_eq!(parse_count("12abc"), 12);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count("-3"), 0);
        assert_eq!(parse_count("99999999999999"), 0);
    }

    #[test]
    fn age_only_accepts_one_to_three() {
        assert_eq!(Age::try_from(2), Ok(Age::Two));
        assert!(Age::try_from(0).is_err());
        assert!(Age::try_from(4).is_err());
        assert_eq!(u8::from(Age::Three), 3);
    }

    #[test]
    fn age_serde_uses_integers() {
        assert_eq!(serde_json::to_string(&Age::Two).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Age>("3").unwrap(), Age::Three);
        assert!(serde_json::from_str::<Age>("7").is_err());
    }

    #[test]
    fn reducer_replaces_and_resets() {
        let mut form = FormState::default();
        form.apply(FormAction::SetAge(Age::Three));
        assert_eq!(form.age, Age::Three);

        let mut other = FormState::default();
        other.leader = "Moses".into();
        form.apply(FormAction::Replace(other.clone()));
        assert_eq!(form, other);

        form.apply(FormAction::Reset);
        assert_eq!(form, FormState::default());
    }

    #[test]
    fn reducer_merges_screenshot_patch() {
        let mut form = FormState::default();
        form.leader = "Caesar".into();

        form.apply(FormAction::ApplyGameState(GameStatePatch {
            meta: Some(MetaPatch {
                round: Some(4),
                ..Default::default()
            }),
            player: Some(PlayerPatch {
                culture_points: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        }));

        assert_eq!(form.round, 4);
        assert_eq!(form.culture_points, 0);
        assert_eq!(form.leader, "Caesar");
        assert_eq!(form.age, Age::One);
    }

    #[test]
    fn strongest_opponent_counts_every_slot() {
        let mut form = FormState::default();
        form.opponents[2].military_strength = 11;
        form.opponents[0].military_strength = 0;
        assert_eq!(form.strongest_opponent(), 11);
    }
}
