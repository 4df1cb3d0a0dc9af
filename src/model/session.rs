use tracing::debug;

use crate::engine::image_normalizer::PreviewImage;
use crate::engine::mapper::to_game_state;
use crate::engine::military_status::{self, MilitaryStatus};
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::form_state::{FormAction, FormState};
use crate::model::presets::Preset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceAction {
    Suggest,
    Evaluate,
}

/// Everything the window shows, owned by the UI thread.
///
/// Actions that need the engine return the command to send, or `None` when
/// the request must not start (one already in flight, nothing to evaluate).
#[derive(Default)]
pub struct CoachSession {
    pub form: FormState,
    pub proposed_move: String,

    pub advice: String,
    pub advice_error: Option<String>,
    /// Shared by both advice actions
    pub loading: bool,
    pub last_action: Option<AdviceAction>,

    pub parsing: bool,
    pub parse_notes: Option<String>,
    pub parse_error: Option<String>,
    new_preview: Option<PreviewImage>,

    pub checking_health: bool,
    pub health: Option<Result<String, String>>,
}

impl CoachSession {
    pub fn military_status(&self) -> MilitaryStatus {
        military_status::evaluate(&self.form)
    }

    /// True while any engine response is still outstanding.
    pub fn waiting(&self) -> bool {
        self.loading || self.parsing || self.checking_health
    }

    pub fn can_evaluate(&self) -> bool {
        !self.loading && !self.proposed_move.trim().is_empty()
    }

    fn begin_advice(&mut self, action: AdviceAction) {
        self.loading = true;
        self.last_action = Some(action);
        self.advice.clear();
        self.advice_error = None;
    }

    pub fn suggest_moves(&mut self) -> Option<EngineCommand> {
        if self.loading {
            return None;
        }
        self.begin_advice(AdviceAction::Suggest);

        Some(EngineCommand::SuggestMoves {
            game_state: to_game_state(&self.form),
        })
    }

    pub fn evaluate_move(&mut self) -> Option<EngineCommand> {
        if !self.can_evaluate() {
            return None;
        }
        self.begin_advice(AdviceAction::Evaluate);

        Some(EngineCommand::EvaluateMove {
            game_state: to_game_state(&self.form),
            proposed_move: self.proposed_move.trim().to_string(),
        })
    }

    pub fn load_screenshot(&mut self, image: Vec<u8>) -> Option<EngineCommand> {
        if self.parsing {
            debug!("screenshot ignored, another one is being parsed");
            return None;
        }
        self.parsing = true;
        self.parse_notes = None;
        self.parse_error = None;

        Some(EngineCommand::ParseScreenshot { image })
    }

    pub fn load_preset(&mut self, preset: &Preset) {
        self.form.apply(FormAction::Replace(preset.form()));
    }

    pub fn check_health(&mut self) -> EngineCommand {
        self.health = None;
        self.checking_health = true;
        EngineCommand::CheckHealth
    }

    /// Hand a freshly decoded screenshot to the view, once.
    pub fn take_new_preview(&mut self) -> Option<PreviewImage> {
        self.new_preview.take()
    }

    pub fn apply(&mut self, response: EngineResponse) {
        match response {
            EngineResponse::AdviceReady { advice } => {
                self.loading = false;
                self.advice = advice;
            }
            EngineResponse::AdviceFailed { message } => {
                self.loading = false;
                self.advice_error = Some(message);
            }
            EngineResponse::ScreenshotPreview(preview) => {
                self.new_preview = Some(preview);
            }
            EngineResponse::ScreenshotParsed { game_state, notes } => {
                self.parsing = false;
                self.form.apply(FormAction::ApplyGameState(game_state));
                self.parse_notes = Some(notes);
            }
            EngineResponse::ScreenshotFailed { message } => {
                self.parsing = false;
                self.parse_error = Some(message);
            }
            EngineResponse::HealthChecked(result) => {
                self.checking_health = false;
                self.health = Some(result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::form_state::Age;
    use crate::model::game_state::{GameStatePatch, MetaPatch, PlayerPatch};
    use crate::model::presets;

    #[test]
    fn only_one_advice_request_at_a_time() {
        let mut session = CoachSession::default();
        session.proposed_move = "Draft Knights".into();

        assert!(session.suggest_moves().is_some());
        assert!(session.loading);
        assert!(session.suggest_moves().is_none());
        assert!(session.evaluate_move().is_none());

        session.apply(EngineResponse::AdviceReady {
            advice: "Go wide.".into(),
        });
        assert!(!session.loading);
        assert_eq!(session.advice, "Go wide.");
        assert!(session.evaluate_move().is_some());
        assert_eq!(session.last_action, Some(AdviceAction::Evaluate));
    }

    #[test]
    fn blank_move_is_not_sent() {
        let mut session = CoachSession::default();
        session.proposed_move = "  \n ".into();
        assert!(!session.can_evaluate());
        assert!(session.evaluate_move().is_none());
        assert!(!session.loading);
    }

    #[test]
    fn evaluate_sends_trimmed_move_and_current_form() {
        let mut session = CoachSession::default();
        session.form.age = Age::Two;
        session.proposed_move = " Build a temple ".into();

        match session.evaluate_move() {
            Some(EngineCommand::EvaluateMove {
                game_state,
                proposed_move,
            }) => {
                assert_eq!(proposed_move, "Build a temple");
                assert_eq!(game_state.meta.age, Age::Two);
            }
            _ => panic!("expected an evaluate command"),
        }
    }

    #[test]
    fn new_request_clears_previous_result() {
        let mut session = CoachSession::default();
        session.suggest_moves();
        session.apply(EngineResponse::AdviceFailed {
            message: "HTTP 502".into(),
        });
        assert_eq!(session.advice_error.as_deref(), Some("HTTP 502"));

        session.suggest_moves();
        assert!(session.advice_error.is_none());
        assert!(session.advice.is_empty());
    }

    #[test]
    fn parsed_screenshot_updates_the_form() {
        let mut session = CoachSession::default();
        session.form.leader = "Moses".into();

        assert!(session.load_screenshot(vec![1, 2, 3]).is_some());
        assert!(session.load_screenshot(vec![4]).is_none());

        session.apply(EngineResponse::ScreenshotPreview(PreviewImage {
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 255],
        }));
        assert!(session.take_new_preview().is_some());
        assert!(session.take_new_preview().is_none());

        session.apply(EngineResponse::ScreenshotParsed {
            game_state: GameStatePatch {
                meta: Some(MetaPatch {
                    age: Some(3),
                    ..Default::default()
                }),
                player: Some(PlayerPatch {
                    food_production: Some(0),
                    ..Default::default()
                }),
                ..Default::default()
            },
            notes: "Leader not visible.".into(),
        });

        assert!(!session.parsing);
        assert_eq!(session.form.age, Age::Three);
        assert_eq!(session.form.food_production, 0);
        assert_eq!(session.form.leader, "Moses");
        assert_eq!(session.parse_notes.as_deref(), Some("Leader not visible."));
    }

    #[test]
    fn failed_screenshot_keeps_the_form() {
        let mut session = CoachSession::default();
        session.load_screenshot(vec![0]);
        session.apply(EngineResponse::ScreenshotFailed {
            message: "Could not read the screenshot".into(),
        });

        assert!(!session.parsing);
        assert_eq!(session.form, FormState::default());
        assert!(session.parse_error.is_some());
        assert!(session.parse_notes.is_none());
    }

    #[test]
    fn preset_replaces_the_form() {
        let mut session = CoachSession::default();
        session.form.hand_cards = "Drama".into();
        session.load_preset(&presets::PRESETS[0]);

        assert_eq!(session.form, presets::PRESETS[0].form());
        assert_eq!(session.form.hand_cards, "");
    }

    #[test]
    fn health_result_is_stored() {
        let mut session = CoachSession::default();
        assert!(matches!(session.check_health(), EngineCommand::CheckHealth));
        assert!(session.waiting());
        session.apply(EngineResponse::HealthChecked(Err("refused".into())));
        assert_eq!(session.health, Some(Err("refused".to_string())));
        assert!(!session.waiting());
    }
}
