use crate::model::form_state::{Age, FormState, OpponentSlot};

/// A named example game state the user can load instead of typing.
pub struct Preset {
    pub name: &'static str,
    build: fn() -> FormState,
}

impl Preset {
    /// Preset values laid over the default form.
    pub fn form(&self) -> FormState {
        (self.build)()
    }
}

pub const PRESETS: [Preset; 3] = [
    Preset {
        name: "Age I — Needs 5th CA",
        build: needs_fifth_civil_action,
    },
    Preset {
        name: "Age II — Military Crisis (Shakespeare)",
        build: military_crisis,
    },
    Preset {
        name: "Age II — Balanced Mid-Game",
        build: balanced_mid_game,
    },
];

fn opp(military_strength: u32, culture_production: u32, culture_points: u32) -> OpponentSlot {
    OpponentSlot {
        military_strength,
        culture_production,
        culture_points,
    }
}

fn needs_fifth_civil_action() -> FormState {
    FormState {
        age: Age::One,
        round: 3,
        player_count: 4,
        civil_actions: 4,
        military_actions: 2,
        food_production: 5,
        ore_production: 3,
        science_production: 1,
        culture_production: 2,
        military_strength: 5,
        culture_points: 4,
        leader: "Moses".into(),
        technologies: "Bronze Age".into(),
        opponents: [opp(7, 2, 5), opp(6, 3, 6), opp(4, 2, 3)],
        card_row: "Code of Laws, Swordsmen, Library, Irrigation".into(),
        next_event: "Age of Expansion".into(),
        ..FormState::default()
    }
}

fn military_crisis() -> FormState {
    FormState {
        age: Age::Two,
        round: 2,
        player_count: 4,
        civil_actions: 5,
        military_actions: 3,
        food_production: 9,
        ore_production: 7,
        science_production: 5,
        culture_production: 8,
        military_strength: 10,
        culture_points: 28,
        leader: "Shakespeare".into(),
        wonders_complete: "Pyramids".into(),
        technologies: "Chivalry, Printing Press, Philosophy".into(),
        hand_cards: "Drama".into(),
        opponents: [opp(16, 5, 22), opp(12, 6, 25), opp(11, 4, 18)],
        card_row: "Knights, Tactics, Code of Laws, Alchemy".into(),
        next_event: "Military Dominance".into(),
        ..FormState::default()
    }
}

fn balanced_mid_game() -> FormState {
    FormState {
        age: Age::Two,
        round: 4,
        player_count: 4,
        civil_actions: 5,
        military_actions: 3,
        food_production: 8,
        ore_production: 6,
        science_production: 4,
        culture_production: 7,
        military_strength: 12,
        culture_points: 34,
        leader: "Caesar".into(),
        wonders_complete: "Hanging Gardens".into(),
        technologies: "Chivalry, Printing Press".into(),
        hand_cards: "Code of Laws, Drama".into(),
        opponents: [opp(14, 5, 28), opp(11, 7, 32), opp(13, 4, 20)],
        card_row: "Philosophy, Tactics, Aqueduct, Shakespeare".into(),
        next_event: "Exploration".into(),
        ..FormState::default()
    }
}
