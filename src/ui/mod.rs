pub mod app;
pub mod form_panel;
pub mod coaching_panel;
pub mod settings_window;

pub mod settings;
pub mod settings_io;
