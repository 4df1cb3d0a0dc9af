use std::time::Duration;

use crate::engine::image_normalizer::{NormalizeOptions, PreviewImage};
use crate::model::game_state::{GameState, GameStatePatch};

/// Engine settings that can change while the app is running.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub backend_url: String,
    pub timeout: Duration,
    pub normalize: NormalizeOptions,
}

/// Which engine worker runs a command. Screenshot parsing has its own
/// worker so a slow upload never holds up advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    Advice,
    Screenshot,
}

#[derive(Clone)]
pub enum EngineCommand {
    SuggestMoves {
        game_state: GameState,
    },
    EvaluateMove {
        game_state: GameState,
        proposed_move: String,
    },
    /// Raw bytes of an image file in any supported format
    ParseScreenshot {
        image: Vec<u8>,
    },
    CheckHealth,
    Reconfigure(EngineConfig),
}

impl EngineCommand {
    pub fn lanes(&self) -> &'static [Lane] {
        match self {
            EngineCommand::SuggestMoves { .. }
            | EngineCommand::EvaluateMove { .. }
            | EngineCommand::CheckHealth => &[Lane::Advice],
            EngineCommand::ParseScreenshot { .. } => &[Lane::Screenshot],
            EngineCommand::Reconfigure(_) => &[Lane::Advice, Lane::Screenshot],
        }
    }
}

#[derive(Debug)]
pub enum EngineResponse {
    AdviceReady {
        advice: String,
    },
    AdviceFailed {
        message: String,
    },

    /// Sent as soon as the screenshot is decoded, before it is uploaded
    ScreenshotPreview(PreviewImage),
    ScreenshotParsed {
        game_state: GameStatePatch,
        notes: String,
    },
    ScreenshotFailed {
        message: String,
    },

    HealthChecked(Result<String, String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mapper::to_game_state;
    use crate::model::form_state::FormState;

    #[test]
    fn screenshots_run_beside_advice() {
        let suggest = EngineCommand::SuggestMoves {
            game_state: to_game_state(&FormState::default()),
        };
        let parse = EngineCommand::ParseScreenshot { image: vec![] };

        assert_eq!(suggest.lanes(), &[Lane::Advice]);
        assert_eq!(EngineCommand::CheckHealth.lanes(), &[Lane::Advice]);
        assert_eq!(parse.lanes(), &[Lane::Screenshot]);
    }

    #[test]
    fn reconfigure_reaches_every_worker() {
        let config = EngineConfig {
            backend_url: "http://localhost:9000".into(),
            timeout: Duration::from_secs(5),
            normalize: NormalizeOptions::default(),
        };

        assert_eq!(
            EngineCommand::Reconfigure(config).lanes(),
            &[Lane::Advice, Lane::Screenshot]
        );
    }
}
