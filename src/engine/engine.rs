use std::sync::mpsc::{Receiver, Sender};

use tracing::{error, info, warn};

use crate::engine::coach_client::{CoachBackend, CoachClient, HealthStatus, ScreenshotReading};
use crate::engine::error::CoachError;
use crate::engine::image_normalizer::{self, NormalizeOptions, NormalizedImage};
use crate::engine::protocol::{EngineCommand, EngineConfig, EngineResponse};
use crate::model::game_state::GameState;

const PREVIEW_SIDE: u32 = 480;

/// Runs the slow work (image decoding, HTTP) off the UI thread.
/// Commands are handled strictly one at a time, in order.
pub struct Engine {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    backend: Box<dyn CoachBackend>,
    normalize: NormalizeOptions,
}

impl Engine {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        config: &EngineConfig,
    ) -> Self {
        Self::with_backend(rx, tx, connect(config), config.normalize)
    }

    pub fn with_backend(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        backend: Box<dyn CoachBackend>,
        normalize: NormalizeOptions,
    ) -> Self {
        Self {
            rx,
            tx,
            backend,
            normalize,
        }
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                EngineCommand::SuggestMoves { game_state } => {
                    info!("requesting move suggestions");
                    let result = self.backend.suggest_moves(&game_state);
                    self.send_advice(result);
                }

                EngineCommand::EvaluateMove {
                    game_state,
                    proposed_move,
                } => {
                    info!(%proposed_move, "requesting move evaluation");
                    let result = self.backend.evaluate_move(&game_state, &proposed_move);
                    self.send_advice(result);
                }

                EngineCommand::ParseScreenshot { image } => {
                    self.parse_screenshot(&image);
                }

                EngineCommand::CheckHealth => {
                    let result = self
                        .backend
                        .check_health()
                        .map(|h| h.summary())
                        .map_err(|e| e.to_string());
                    self.send(EngineResponse::HealthChecked(result));
                }

                EngineCommand::Reconfigure(config) => {
                    info!(backend_url = %config.backend_url, timeout = ?config.timeout, "engine reconfigured");
                    self.backend = connect(&config);
                    self.normalize = config.normalize;
                }
            }
        }
    }

    fn parse_screenshot(&self, image: &[u8]) {
        match image_normalizer::preview(image, PREVIEW_SIDE) {
            Ok(preview) => self.send(EngineResponse::ScreenshotPreview(preview)),
            Err(e) => {
                warn!(error = %e, "screenshot could not be decoded");
                self.send(EngineResponse::ScreenshotFailed {
                    message: e.to_string(),
                });
                return;
            }
        }

        let result = image_normalizer::normalize(image, &self.normalize)
            .map_err(CoachError::from)
            .and_then(|normalized| self.backend.parse_screenshot(&normalized));

        match result {
            Ok(reading) => {
                info!(notes = %reading.notes, "screenshot parsed");
                self.send(EngineResponse::ScreenshotParsed {
                    game_state: reading.game_state,
                    notes: reading.notes,
                });
            }
            Err(e) => {
                warn!(error = %e, "screenshot parsing failed");
                self.send(EngineResponse::ScreenshotFailed {
                    message: e.to_string(),
                });
            }
        }
    }

    fn send_advice(&self, result: Result<String, CoachError>) {
        let response = match result {
            Ok(advice) => EngineResponse::AdviceReady { advice },
            Err(e) => {
                warn!(error = %e, "advice request failed");
                EngineResponse::AdviceFailed {
                    message: e.to_string(),
                }
            }
        };
        self.send(response);
    }

    fn send(&self, response: EngineResponse) {
        // The UI may already be gone during shutdown
        let _ = self.tx.send(response);
    }
}

fn connect(config: &EngineConfig) -> Box<dyn CoachBackend> {
    match CoachClient::new(&config.backend_url, config.timeout) {
        Ok(client) => Box::new(client),
        Err(e) => {
            error!(error = %e, backend_url = %config.backend_url, "HTTP client could not be built");
            Box::new(Unavailable(e.to_string()))
        }
    }
}

/// Stands in for the HTTP client when it could not be built; every request
/// fails with the build error instead of going out without a timeout.
struct Unavailable(String);

impl Unavailable {
    fn error(&self) -> CoachError {
        CoachError::Unavailable(self.0.clone())
    }
}

impl CoachBackend for Unavailable {
    fn suggest_moves(&self, _: &GameState) -> Result<String, CoachError> {
        Err(self.error())
    }

    fn evaluate_move(&self, _: &GameState, _: &str) -> Result<String, CoachError> {
        Err(self.error())
    }

    fn parse_screenshot(&self, _: &NormalizedImage) -> Result<ScreenshotReading, CoachError> {
        Err(self.error())
    }

    fn check_health(&self) -> Result<HealthStatus, CoachError> {
        Err(self.error())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::mpsc;

    use image::{DynamicImage, ImageFormat, RgbImage};
    use reqwest::StatusCode;

    use super::*;
    use crate::engine::coach_client::MockCoachBackend;
    use crate::engine::mapper::to_game_state;
    use crate::model::form_state::FormState;
    use crate::model::game_state::{GameStatePatch, MetaPatch};

    /// Run the engine over `commands` until the queue is drained.
    fn run_engine(backend: MockCoachBackend, commands: Vec<EngineCommand>) -> Vec<EngineResponse> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        for cmd in commands {
            cmd_tx.send(cmd).unwrap();
        }
        drop(cmd_tx);

        Engine::with_backend(cmd_rx, resp_tx, Box::new(backend), NormalizeOptions::default()).run();
        resp_rx.try_iter().collect()
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn suggest_moves_returns_advice() {
        let mut backend = MockCoachBackend::new();
        backend
            .expect_suggest_moves()
            .withf(|state| state.meta.round == 1)
            .times(1)
            .returning(|_| Ok("Build a farm.".to_string()));

        let responses = run_engine(
            backend,
            vec![EngineCommand::SuggestMoves {
                game_state: to_game_state(&FormState::default()),
            }],
        );

        assert!(matches!(
            responses.as_slice(),
            [EngineResponse::AdviceReady { advice }] if advice == "Build a farm."
        ));
    }

    #[test]
    fn failed_evaluation_becomes_a_message() {
        let mut backend = MockCoachBackend::new();
        backend
            .expect_evaluate_move()
            .withf(|_, proposed| proposed.to_string() == "Draft Knights")
            .returning(|_, _| {
                Err(CoachError::Api {
                    status: StatusCode::BAD_GATEWAY,
                    message: "Claude API error: overloaded".into(),
                })
            });

        let responses = run_engine(
            backend,
            vec![EngineCommand::EvaluateMove {
                game_state: to_game_state(&FormState::default()),
                proposed_move: "Draft Knights".into(),
            }],
        );

        assert!(matches!(
            responses.as_slice(),
            [EngineResponse::AdviceFailed { message }] if message == "Claude API error: overloaded"
        ));
    }

    #[test]
    fn screenshot_is_previewed_normalized_and_parsed() {
        let mut backend = MockCoachBackend::new();
        backend
            .expect_parse_screenshot()
            .withf(|image| image.width == 1920 && image.height == 540)
            .returning(|_| {
                Ok(ScreenshotReading {
                    game_state: GameStatePatch {
                        meta: Some(MetaPatch {
                            round: Some(6),
                            ..Default::default()
                        }),
                        ..Default::default()
                    },
                    notes: "Card row partly hidden.".into(),
                })
            });

        let responses = run_engine(
            backend,
            vec![EngineCommand::ParseScreenshot { image: png(2560, 720) }],
        );

        assert_eq!(responses.len(), 2);
        assert!(matches!(&responses[0], EngineResponse::ScreenshotPreview(p) if p.width <= PREVIEW_SIDE));
        match &responses[1] {
            EngineResponse::ScreenshotParsed { game_state, notes } => {
                assert_eq!(notes, "Card row partly hidden.");
                assert_eq!(game_state.meta.as_ref().unwrap().round, Some(6));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn undecodable_screenshot_never_reaches_the_backend() {
        let mut backend = MockCoachBackend::new();
        backend.expect_parse_screenshot().never();

        let responses = run_engine(
            backend,
            vec![EngineCommand::ParseScreenshot {
                image: b"not an image".to_vec(),
            }],
        );

        assert!(matches!(
            responses.as_slice(),
            [EngineResponse::ScreenshotFailed { message }] if message.starts_with("Could not read the screenshot")
        ));
    }

    #[test]
    fn health_check_reports_summary() {
        let mut backend = MockCoachBackend::new();
        backend.expect_check_health().returning(|| {
            Ok(HealthStatus {
                status: "ok".into(),
                strategy_loaded: false,
            })
        });

        let responses = run_engine(backend, vec![EngineCommand::CheckHealth]);

        assert!(matches!(
            responses.as_slice(),
            [EngineResponse::HealthChecked(Ok(summary))] if summary == "Connected (ok, strategy NOT loaded)"
        ));
    }

    #[test]
    fn commands_are_answered_in_order() {
        let mut backend = MockCoachBackend::new();
        let mut seq = mockall::Sequence::new();
        backend
            .expect_suggest_moves()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("first".into()));
        backend
            .expect_evaluate_move()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok("second".into()));

        let state = to_game_state(&FormState::default());
        let responses = run_engine(
            backend,
            vec![
                EngineCommand::SuggestMoves {
                    game_state: state.clone(),
                },
                EngineCommand::EvaluateMove {
                    game_state: state,
                    proposed_move: "Pass".into(),
                },
            ],
        );

        let advice: Vec<&str> = responses
            .iter()
            .filter_map(|r| match r {
                EngineResponse::AdviceReady { advice } => Some(advice.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(advice, vec!["first", "second"]);
    }

    #[test]
    fn unavailable_client_answers_every_request_with_an_error() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        cmd_tx
            .send(EngineCommand::SuggestMoves {
                game_state: to_game_state(&FormState::default()),
            })
            .unwrap();
        cmd_tx.send(EngineCommand::CheckHealth).unwrap();
        drop(cmd_tx);

        let backend = Box::new(Unavailable("no TLS backend".into()));
        Engine::with_backend(cmd_rx, resp_tx, backend, NormalizeOptions::default()).run();
        let responses: Vec<_> = resp_rx.try_iter().collect();

        assert!(matches!(
            responses.as_slice(),
            [
                EngineResponse::AdviceFailed { message },
                EngineResponse::HealthChecked(Err(health)),
            ] if message.contains("no TLS backend") && health.contains("no TLS backend")
        ));
    }
}
