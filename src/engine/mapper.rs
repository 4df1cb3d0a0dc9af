//! Conversion between the flat form and the nested backend game state.
//!
//! `to_game_state` is total: every form maps to a valid request body.
//! `apply_game_state` merges a (possibly partial) game state back into a
//! form. A field that is missing or `null` in the incoming state keeps the
//! current form value; anything present, including `0` and `""`, wins.

use tracing::{debug, warn};

use crate::model::form_state::{Age, FormState, OpponentSlot, OPPONENT_SLOTS};
use crate::model::game_state::{
    CardRow, Events, GameState, GameStatePatch, Meta, OpponentPatch, OpponentState, PlayerState,
};

/// Split comma-separated form text into trimmed, non-empty tokens.
/// Order and duplicates are kept.
pub fn parse_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}

pub fn opponent_id(slot: usize) -> String {
    format!("opp{}", slot + 1)
}

/// Free text goes out as typed; only an empty field becomes `null`.
fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

pub fn to_game_state(form: &FormState) -> GameState {
    let opponents: Vec<OpponentState> = form
        .opponents
        .iter()
        .enumerate()
        .map(|(slot, o)| OpponentState {
            id: opponent_id(slot),
            military_strength: o.military_strength,
            culture_production_estimate: o.culture_production,
            culture_points_estimate: o.culture_points,
        })
        .filter(|o| o.military_strength > 0)
        .collect();

    if opponents.len() < OPPONENT_SLOTS {
        debug!(
            kept = opponents.len(),
            "opponents with zero military strength left out"
        );
    }

    // Only the current age's row is sent; text typed under another age is dropped.
    let cards = parse_list(&form.card_row);
    let card_row = match form.age {
        Age::One => CardRow {
            age_1_cards: cards,
            ..CardRow::default()
        },
        Age::Two => CardRow {
            age_2_cards: cards,
            ..CardRow::default()
        },
        Age::Three => CardRow {
            age_3_cards: cards,
            ..CardRow::default()
        },
    };

    GameState {
        meta: Meta {
            age: form.age,
            round: form.round,
            player_count: form.player_count,
        },
        player: PlayerState {
            civil_actions: form.civil_actions,
            military_actions: form.military_actions,
            food_production: form.food_production,
            ore_production: form.ore_production,
            science_production: form.science_production,
            culture_production: form.culture_production,
            military_strength: form.military_strength,
            culture_points: form.culture_points,
            leader: non_empty(&form.leader),
            wonders_complete: parse_list(&form.wonders_complete),
            wonders_in_progress: parse_list(&form.wonders_in_progress),
            technologies: parse_list(&form.technologies),
            hand_cards: parse_list(&form.hand_cards),
        },
        opponents,
        card_row,
        events: Events {
            next_visible: non_empty(&form.next_event),
        },
    }
}

/* =========================
   Reverse direction
   ========================= */

fn merge_count(target: &mut u32, incoming: Option<i64>) {
    if let Some(value) = incoming {
        *target = u32::try_from(value.max(0)).unwrap_or(u32::MAX);
    }
}

fn merge_text(target: &mut String, incoming: &Option<String>) {
    if let Some(value) = incoming {
        *target = value.clone();
    }
}

fn merge_list(target: &mut String, incoming: &Option<Vec<String>>) {
    if let Some(items) = incoming {
        *target = join_list(items);
    }
}

/// Which form slot an incoming opponent belongs to: its `oppN` id when it
/// has one, otherwise its position in the list. The first opponent to claim
/// a slot keeps it.
fn opponent_slot(index: usize, opponent: &OpponentPatch) -> Option<usize> {
    let by_id = opponent
        .id
        .as_deref()
        .and_then(|id| id.strip_prefix("opp"))
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|n| (1..=OPPONENT_SLOTS).contains(n))
        .map(|n| n - 1);

    by_id.or((index < OPPONENT_SLOTS).then_some(index))
}

fn merge_opponent(slot: &mut OpponentSlot, incoming: &OpponentPatch) {
    merge_count(&mut slot.military_strength, incoming.military_strength);
    merge_count(&mut slot.culture_production, incoming.culture_production_estimate);
    merge_count(&mut slot.culture_points, incoming.culture_points_estimate);
}

pub fn apply_game_state(form: &FormState, state: &GameStatePatch) -> FormState {
    let mut next = form.clone();

    if let Some(meta) = &state.meta {
        if let Some(age) = meta.age {
            match u8::try_from(age).map_err(|e| e.to_string()).and_then(Age::try_from) {
                Ok(age) => next.age = age,
                Err(reason) => warn!(age, %reason, "ignoring out-of-range age"),
            }
        }
        merge_count(&mut next.round, meta.round);
        merge_count(&mut next.player_count, meta.player_count);
    }

    if let Some(p) = &state.player {
        merge_count(&mut next.civil_actions, p.civil_actions);
        merge_count(&mut next.military_actions, p.military_actions);
        merge_count(&mut next.food_production, p.food_production);
        merge_count(&mut next.ore_production, p.ore_production);
        merge_count(&mut next.science_production, p.science_production);
        merge_count(&mut next.culture_production, p.culture_production);
        merge_count(&mut next.military_strength, p.military_strength);
        merge_count(&mut next.culture_points, p.culture_points);
        merge_text(&mut next.leader, &p.leader);
        merge_list(&mut next.wonders_complete, &p.wonders_complete);
        merge_list(&mut next.wonders_in_progress, &p.wonders_in_progress);
        merge_list(&mut next.technologies, &p.technologies);
        merge_list(&mut next.hand_cards, &p.hand_cards);
    }

    if let Some(opponents) = &state.opponents {
        let mut filled = [false; OPPONENT_SLOTS];

        for (index, opponent) in opponents.iter().enumerate() {
            match opponent_slot(index, opponent) {
                Some(slot) if filled[slot] => {
                    warn!(index, slot, id = ?opponent.id, "opponent slot already filled, skipping")
                }
                Some(slot) => {
                    filled[slot] = true;
                    merge_opponent(&mut next.opponents[slot], opponent);
                }
                None => warn!(index, id = ?opponent.id, "no form slot for opponent"),
            }
        }
    }

    if let Some(row) = &state.card_row {
        let groups = [&row.age_1_cards, &row.age_2_cards, &row.age_3_cards];
        if groups.iter().any(|g| g.is_some()) {
            let cards: Vec<String> = groups.into_iter().flatten().flatten().cloned().collect();
            next.card_row = join_list(&cards);
        }
    }

    if let Some(events) = &state.events {
        merge_text(&mut next.next_event, &events.next_visible);
    }

    next
}
