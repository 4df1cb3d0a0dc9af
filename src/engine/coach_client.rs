use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::engine::error::CoachError;
use crate::engine::image_normalizer::{NormalizedImage, JPEG_MEDIA_TYPE};
use crate::model::game_state::{GameState, GameStatePatch};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_PARSE_NOTES: &str = "Game state loaded from screenshot.";

/* =========================
   Wire types
   ========================= */

#[derive(Serialize)]
struct SuggestMovesRequest<'a> {
    game_state: &'a GameState,
}

#[derive(Serialize)]
struct EvaluateMoveRequest<'a> {
    game_state: &'a GameState,
    proposed_move: &'a str,
}

#[derive(Serialize)]
struct ParseScreenshotRequest {
    image_base64: String,
    media_type: &'static str,
}

#[derive(Deserialize)]
struct AdviceResponse {
    advice: Option<String>,
    model: Option<String>,
}

#[derive(Deserialize)]
struct ParseScreenshotResponse {
    game_state: Option<GameStatePatch>,
    notes: Option<String>,
}

/// What the backend read off a screenshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenshotReading {
    pub game_state: GameStatePatch,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub strategy_loaded: bool,
}

impl HealthStatus {
    pub fn summary(&self) -> String {
        if self.strategy_loaded {
            format!("Connected ({}, strategy loaded)", self.status)
        } else {
            format!("Connected ({}, strategy NOT loaded)", self.status)
        }
    }
}

/* =========================
   Backend seam
   ========================= */

/// The coaching backend as seen by the engine thread.
#[cfg_attr(test, mockall::automock)]
pub trait CoachBackend: Send {
    fn suggest_moves(&self, game_state: &GameState) -> Result<String, CoachError>;

    fn evaluate_move(
        &self,
        game_state: &GameState,
        proposed_move: &str,
    ) -> Result<String, CoachError>;

    fn parse_screenshot(&self, image: &NormalizedImage) -> Result<ScreenshotReading, CoachError>;

    fn check_health(&self) -> Result<HealthStatus, CoachError>;
}

/// HTTP client for the coaching API. Every request is bounded by `timeout`;
/// there is no retry.
pub struct CoachClient {
    client: Client,
    base_url: String,
}

impl CoachClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CoachError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CoachError> {
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            let message = error_message(status, &body);
            warn!(%status, %message, "backend returned an error");
            return Err(CoachError::Api { status, message });
        }

        serde_json::from_str(&body).map_err(|e| CoachError::InvalidResponse(e.to_string()))
    }

    fn request_advice<B: Serialize>(&self, path: &str, body: &B) -> Result<String, CoachError> {
        let response: AdviceResponse = self.send(self.client.post(self.url(path)).json(body))?;
        let advice = response.advice.ok_or(CoachError::MissingField("advice"))?;

        info!(
            path,
            model = response.model.as_deref().unwrap_or("unknown"),
            chars = advice.len(),
            "advice received"
        );
        Ok(advice)
    }
}

impl CoachBackend for CoachClient {
    fn suggest_moves(&self, game_state: &GameState) -> Result<String, CoachError> {
        self.request_advice("/api/suggest-moves", &SuggestMovesRequest { game_state })
    }

    fn evaluate_move(
        &self,
        game_state: &GameState,
        proposed_move: &str,
    ) -> Result<String, CoachError> {
        let proposed_move = proposed_move.trim();
        if proposed_move.is_empty() {
            return Err(CoachError::EmptyMove);
        }

        self.request_advice(
            "/api/evaluate-move",
            &EvaluateMoveRequest {
                game_state,
                proposed_move,
            },
        )
    }

    fn parse_screenshot(&self, image: &NormalizedImage) -> Result<ScreenshotReading, CoachError> {
        let body = ParseScreenshotRequest {
            image_base64: image.to_base64(),
            media_type: JPEG_MEDIA_TYPE,
        };
        debug!(bytes = image.bytes.len(), "uploading screenshot");

        let response: ParseScreenshotResponse =
            self.send(self.client.post(self.url("/api/parse-screenshot")).json(&body))?;

        Ok(ScreenshotReading {
            game_state: response
                .game_state
                .ok_or(CoachError::MissingField("game_state"))?,
            notes: response
                .notes
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_PARSE_NOTES.to_string()),
        })
    }

    fn check_health(&self) -> Result<HealthStatus, CoachError> {
        self.send(self.client.get(self.url("/api/health")))
    }
}

/// User-facing text for a failed request: the JSON `detail` string when
/// there is one, `HTTP <code>` for JSON without it, and the status reason
/// phrase when the body is not JSON at all.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = || format!("HTTP {}", status.as_u16());

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => json
            .get("detail")
            .and_then(|d| d.as_str())
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(fallback),
        Err(_) => status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(fallback),
    }
}
