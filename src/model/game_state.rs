use serde::{Deserialize, Serialize};

use crate::model::form_state::Age;

/// Nested game state consumed by the coaching backend.
/// Built from the form by `engine::mapper::to_game_state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub meta: Meta,
    pub player: PlayerState,
    pub opponents: Vec<OpponentState>,
    pub card_row: CardRow,
    pub events: Events,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub age: Age,
    pub round: u32,
    pub player_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub civil_actions: u32,
    pub military_actions: u32,
    pub food_production: u32,
    pub ore_production: u32,
    pub science_production: u32,
    pub culture_production: u32,
    pub military_strength: u32,
    pub culture_points: u32,

    /// Serialized as `null` when the form field is blank
    pub leader: Option<String>,

    pub wonders_complete: Vec<String>,
    pub wonders_in_progress: Vec<String>,
    pub technologies: Vec<String>,
    pub hand_cards: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentState {
    pub id: String,
    pub military_strength: u32,
    pub culture_production_estimate: u32,
    pub culture_points_estimate: u32,
}

/// Only the list matching `meta.age` is ever populated by the mapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRow {
    pub age_1_cards: Vec<String>,
    pub age_2_cards: Vec<String>,
    pub age_3_cards: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Events {
    pub next_visible: Option<String>,
}

/* =========================
   Partial state (screenshot parsing)
   ========================= */

/// A partial game state as read back from a screenshot.
///
/// Every group and every field may be missing. A missing field and an
/// explicit `null` mean the same thing: leave the form value alone.
/// Numbers are signed because the model occasionally emits negatives;
/// they are clamped at zero when applied.
///
/// The backend forwards whatever the vision model produced, so decoding is
/// lenient: a value of the wrong shape is logged and dropped on its own
/// instead of failing the whole reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStatePatch {
    #[serde(deserialize_with = "lenient::group")]
    pub meta: Option<MetaPatch>,
    #[serde(deserialize_with = "lenient::group")]
    pub player: Option<PlayerPatch>,
    #[serde(deserialize_with = "lenient::items")]
    pub opponents: Option<Vec<OpponentPatch>>,
    #[serde(deserialize_with = "lenient::group")]
    pub card_row: Option<CardRowPatch>,
    #[serde(deserialize_with = "lenient::group")]
    pub events: Option<EventsPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaPatch {
    #[serde(deserialize_with = "lenient::count")]
    pub age: Option<i64>,
    #[serde(deserialize_with = "lenient::count")]
    pub round: Option<i64>,
    #[serde(deserialize_with = "lenient::count")]
    pub player_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerPatch {
    #[serde(deserialize_with = "lenient::count")]
    pub civil_actions: Option<i64>,
    #[serde(deserialize_with = "lenient::count")]
    pub military_actions: Option<i64>,
    #[serde(deserialize_with = "lenient::count")]
    pub food_production: Option<i64>,
    #[serde(deserialize_with = "lenient::count")]
    pub ore_production: Option<i64>,
    #[serde(deserialize_with = "lenient::count")]
    pub science_production: Option<i64>,
    #[serde(deserialize_with = "lenient::count")]
    pub culture_production: Option<i64>,
    #[serde(deserialize_with = "lenient::count")]
    pub military_strength: Option<i64>,
    #[serde(deserialize_with = "lenient::count")]
    pub culture_points: Option<i64>,
    #[serde(deserialize_with = "lenient::text")]
    pub leader: Option<String>,
    #[serde(deserialize_with = "lenient::names")]
    pub wonders_complete: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::names")]
    pub wonders_in_progress: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::names")]
    pub technologies: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::names")]
    pub hand_cards: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentPatch {
    /// Any JSON scalar; `1` reads as `"1"`
    #[serde(deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub military_strength: Option<i64>,
    #[serde(deserialize_with = "lenient::count")]
    pub culture_production_estimate: Option<i64>,
    #[serde(deserialize_with = "lenient::count")]
    pub culture_points_estimate: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardRowPatch {
    #[serde(deserialize_with = "lenient::names")]
    pub age_1_cards: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::names")]
    pub age_2_cards: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::names")]
    pub age_3_cards: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsPatch {
    #[serde(deserialize_with = "lenient::text")]
    pub next_visible: Option<String>,
}

/// Field decoders that never fail on a well-formed JSON value.
/// Anything unusable becomes `None` (or is skipped inside a list).
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::warn;

    fn value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
        Ok(Option::<Value>::deserialize(deserializer)?.filter(|v| !v.is_null()))
    }

    fn whole(number: f64) -> Option<i64> {
        (number.is_finite() && number.fract() == 0.0).then_some(number as i64)
    }

    /// Integers, whole floats (`3.0`) and numeric strings (`"3"`).
    pub fn count_of(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(whole))
            }
            _ => None,
        }
    }

    pub fn text_of(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        Ok(value(deserializer)?.and_then(|v| {
            let count = count_of(&v);
            if count.is_none() {
                warn!(value = %v, "ignoring unreadable number in game state");
            }
            count
        }))
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(value(deserializer)?.and_then(|v| {
            let text = text_of(&v);
            if text.is_none() {
                warn!(value = %v, "ignoring non-text value in game state");
            }
            text
        }))
    }

    /// A list of names; non-scalar entries are dropped one by one.
    pub fn names<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<String>>, D::Error> {
        Ok(value(deserializer)?.and_then(|v| match v {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| {
                        let name = text_of(item);
                        if name.is_none() && !item.is_null() {
                            warn!(value = %item, "ignoring non-text list entry in game state");
                        }
                        name
                    })
                    .collect(),
            ),
            other => {
                warn!(value = %other, "ignoring non-list value in game state");
                None
            }
        }))
    }

    pub fn group<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(value(deserializer)?.and_then(|v| match serde_json::from_value::<T>(v) {
            Ok(group) => Some(group),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable group in game state");
                None
            }
        }))
    }

    /// Each entry is decoded on its own; a bad entry is skipped.
    pub fn items<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(value(deserializer)?.and_then(|v| match v {
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|item| match serde_json::from_value::<T>(item) {
                        Ok(entry) => Some(entry),
                        Err(e) => {
                            warn!(error = %e, "skipping unreadable entry in game state");
                            None
                        }
                    })
                    .collect(),
            ),
            other => {
                warn!(value = %other, "ignoring non-list value in game state");
                None
            }
        }))
    }
}

impl From<&GameState> for GameStatePatch {
    fn from(state: &GameState) -> Self {
        let p = &state.player;

        GameStatePatch {
            meta: Some(MetaPatch {
                age: Some(i64::from(u8::from(state.meta.age))),
                round: Some(state.meta.round.into()),
                player_count: Some(state.meta.player_count.into()),
            }),
            player: Some(PlayerPatch {
                civil_actions: Some(p.civil_actions.into()),
                military_actions: Some(p.military_actions.into()),
                food_production: Some(p.food_production.into()),
                ore_production: Some(p.ore_production.into()),
                science_production: Some(p.science_production.into()),
                culture_production: Some(p.culture_production.into()),
                military_strength: Some(p.military_strength.into()),
                culture_points: Some(p.culture_points.into()),
                leader: p.leader.clone(),
                wonders_complete: Some(p.wonders_complete.clone()),
                wonders_in_progress: Some(p.wonders_in_progress.clone()),
                technologies: Some(p.technologies.clone()),
                hand_cards: Some(p.hand_cards.clone()),
            }),
            opponents: Some(
                state
                    .opponents
                    .iter()
                    .map(|o| OpponentPatch {
                        id: Some(o.id.clone()),
                        military_strength: Some(o.military_strength.into()),
                        culture_production_estimate: Some(o.culture_production_estimate.into()),
                        culture_points_estimate: Some(o.culture_points_estimate.into()),
                    })
                    .collect(),
            ),
            card_row: Some(CardRowPatch {
                age_1_cards: Some(state.card_row.age_1_cards.clone()),
                age_2_cards: Some(state.card_row.age_2_cards.clone()),
                age_3_cards: Some(state.card_row.age_3_cards.clone()),
            }),
            events: Some(EventsPatch {
                next_visible: state.events.next_visible.clone(),
            }),
        }
    }
}
