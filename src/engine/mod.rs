pub mod engine;
pub mod protocol;
pub mod error;

pub mod mapper;
pub mod military_status;
pub mod image_normalizer;
pub mod coach_client;
pub mod advice_parser;
