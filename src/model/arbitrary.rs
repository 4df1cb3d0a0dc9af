use quickcheck::{Arbitrary, Gen};

use crate::engine::mapper::opponent_id;
use crate::model::form_state::{Age, FormState, OpponentSlot, OPPONENT_SLOTS};
use crate::model::game_state::{CardRow, Events, GameState, Meta, OpponentState, PlayerState};

const CARD_NAMES: [&str; 8] = [
    "Knights",
    "Tactics",
    "Code of Laws",
    "Drama",
    "Library",
    "Printing Press",
    "Pyramids",
    "Swordsmen",
];

impl Arbitrary for Age {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&Age::ALL).unwrap()
    }
}

impl Arbitrary for OpponentSlot {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            military_strength: u32::from(u8::arbitrary(g) % 4) * u32::from(u8::arbitrary(g) % 8),
            culture_production: u32::arbitrary(g),
            culture_points: u32::arbitrary(g),
        }
    }
}

/// Mostly card-like text with the odd stray comma and blank token.
fn list_text(g: &mut Gen) -> String {
    if bool::arbitrary(g) {
        return String::arbitrary(g);
    }
    let len = usize::arbitrary(g) % 5;
    (0..len)
        .map(|_| match u8::arbitrary(g) % 4 {
            0 => " ".to_string(),
            _ => format!(" {} ", g.choose(&CARD_NAMES).unwrap()),
        })
        .collect::<Vec<_>>()
        .join(",")
}

impl Arbitrary for FormState {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            age: Age::arbitrary(g),
            round: u32::arbitrary(g),
            player_count: u32::arbitrary(g),
            civil_actions: u32::arbitrary(g),
            military_actions: u32::arbitrary(g),
            food_production: u32::arbitrary(g),
            ore_production: u32::arbitrary(g),
            science_production: u32::arbitrary(g),
            culture_production: u32::arbitrary(g),
            military_strength: u32::arbitrary(g),
            culture_points: u32::arbitrary(g),
            leader: String::arbitrary(g),
            wonders_complete: list_text(g),
            wonders_in_progress: list_text(g),
            technologies: list_text(g),
            hand_cards: list_text(g),
            opponents: [
                OpponentSlot::arbitrary(g),
                OpponentSlot::arbitrary(g),
                OpponentSlot::arbitrary(g),
            ],
            card_row: list_text(g),
            next_event: String::arbitrary(g),
        }
    }
}

/// A game state in the shape the mapper itself produces: clean card names,
/// one populated card-row group, and every opponent slot filled with a
/// positive strength (a slot the state leaves out would keep the default
/// form's strength of 6 and reappear on the way back).
#[derive(Debug, Clone)]
pub struct RoundTripState(pub GameState);

fn cards(g: &mut Gen) -> Vec<String> {
    let len = usize::arbitrary(g) % 4;
    (0..len)
        .map(|_| g.choose(&CARD_NAMES).unwrap().to_string())
        .collect()
}

fn optional_name(g: &mut Gen) -> Option<String> {
    bool::arbitrary(g).then(|| g.choose(&CARD_NAMES).unwrap().to_string())
}

impl Arbitrary for RoundTripState {
    fn arbitrary(g: &mut Gen) -> Self {
        let age = Age::arbitrary(g);
        let row = cards(g);
        let card_row = match age {
            Age::One => CardRow { age_1_cards: row, ..CardRow::default() },
            Age::Two => CardRow { age_2_cards: row, ..CardRow::default() },
            Age::Three => CardRow { age_3_cards: row, ..CardRow::default() },
        };

        let opponents = (0..OPPONENT_SLOTS)
            .map(|slot| OpponentState {
                id: opponent_id(slot),
                military_strength: u32::from(u8::arbitrary(g)) + 1,
                culture_production_estimate: u32::arbitrary(g),
                culture_points_estimate: u32::arbitrary(g),
            })
            .collect();

        RoundTripState(GameState {
            meta: Meta {
                age,
                round: u32::arbitrary(g),
                player_count: u32::arbitrary(g),
            },
            player: PlayerState {
                civil_actions: u32::arbitrary(g),
                military_actions: u32::arbitrary(g),
                food_production: u32::arbitrary(g),
                ore_production: u32::arbitrary(g),
                science_production: u32::arbitrary(g),
                culture_production: u32::arbitrary(g),
                military_strength: u32::arbitrary(g),
                culture_points: u32::arbitrary(g),
                leader: optional_name(g),
                wonders_complete: cards(g),
                wonders_in_progress: cards(g),
                technologies: cards(g),
                hand_cards: cards(g),
            },
            opponents,
            card_row,
            events: Events {
                next_visible: optional_name(g),
            },
        })
    }
}
