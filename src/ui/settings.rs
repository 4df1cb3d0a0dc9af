use std::collections::HashMap;
use std::time::Duration;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::engine::coach_client::{DEFAULT_BACKEND_URL, DEFAULT_TIMEOUT};
use crate::engine::image_normalizer::NormalizeOptions;
use crate::engine::military_status::StatusLevel;
use crate::engine::protocol::EngineConfig;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct UiSettings {
    pub ui_scale: f32,

    pub backend_url: String,
    pub request_timeout_secs: u64,

    // Screenshot upload
    pub max_image_width: u32,
    pub jpeg_quality: f32,

    // Military status → color mapping
    pub status_colors: HashMap<String, [u8; 4]>,
}

impl Default for UiSettings {
    fn default() -> Self {
        let normalize = NormalizeOptions::default();

        let mut status_colors = HashMap::new();
        status_colors.insert(status_key(StatusLevel::Urgent).into(), [200, 60, 60, 255]);
        status_colors.insert(status_key(StatusLevel::Caution).into(), [215, 150, 40, 255]);
        status_colors.insert(status_key(StatusLevel::Ok).into(), [90, 160, 90, 255]);
        status_colors.insert(status_key(StatusLevel::Tied).into(), [80, 140, 200, 255]);
        status_colors.insert(status_key(StatusLevel::Leading).into(), [80, 140, 200, 255]);

        Self {
            ui_scale: 1.0,
            backend_url: DEFAULT_BACKEND_URL.into(),
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            max_image_width: normalize.max_width,
            jpeg_quality: normalize.quality,
            status_colors,
        }
    }
}

pub fn status_key(level: StatusLevel) -> &'static str {
    match level {
        StatusLevel::Urgent => "Urgent",
        StatusLevel::Caution => "Caution",
        StatusLevel::Ok => "Ok",
        StatusLevel::Tied => "Tied",
        StatusLevel::Leading => "Leading",
    }
}

impl UiSettings {
    pub fn status_color(&self, level: StatusLevel) -> Color32 {
        self.status_colors
            .get(status_key(level))
            .map(|c| Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]))
            .unwrap_or(Color32::WHITE)
    }

    pub fn set_status_color(&mut self, level: StatusLevel, color: Color32) {
        self.status_colors.insert(
            status_key(level).to_string(),
            [color.r(), color.g(), color.b(), color.a()],
        );
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            backend_url: self.backend_url.trim().to_string(),
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            normalize: NormalizeOptions {
                max_width: self.max_image_width.max(1),
                quality: self.jpeg_quality.clamp(0.01, 1.0),
            },
        }
    }
}
